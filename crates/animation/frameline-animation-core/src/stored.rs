//! Stored node format.
//!
//! A JSON description of a node's animations and keyframe tracks:
//!
//! ```json
//! {
//!   "id": "Box",
//!   "animations": [{ "markers": [{ "id": "start", "frame": 0, "action": "play" }] }],
//!   "animators": [{
//!     "targetProperty": "Position",
//!     "keys": [{ "frame": 0, "value": { "type": "vec2", "data": [0, 0] }, "function": "linear" }]
//!   }]
//! }
//! ```
//!
//! Only authored data is stored. Animation time, running state and bindings
//! are runtime state and are rebuilt after loading.

use serde::{Deserialize, Serialize};

use frameline_api_core::{
    Color4, Matrix44, Quaternion, Thickness, Value, ValueKind, Vector2, Vector3,
};

use crate::animation::Animation;
use crate::animator::{Animator, DynAnimator};
use crate::binding::AnimationTarget;
use crate::error::AnimationError;
use crate::interp::Animatable;
use crate::keyframe::Keyframe;
use crate::keyframe_list::KeyframeList;
use crate::marker::{Marker, MarkerList};
use crate::node::Node;

pub type StoredKeyframe = Keyframe<Value>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trigger: String,
    #[serde(default)]
    pub animations: Vec<StoredAnimation>,
    #[serde(default)]
    pub animators: Vec<StoredAnimator>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnimation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAnimator {
    pub target_property: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_id: Option<String>,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    /// Value kind of the track; inferred from the first key when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    #[serde(default)]
    pub keys: Vec<StoredKeyframe>,
}

fn enabled_default() -> bool {
    true
}

/// Parse a stored node document.
pub fn parse_stored_node_json(s: &str) -> Result<StoredNode, AnimationError> {
    serde_json::from_str(s).map_err(|e| AnimationError::Stored(format!("parse error: {e}")))
}

impl StoredNode {
    /// Build a live node around `object`. Animators stay unbound until the
    /// first apply, so tracks naming missing properties load fine.
    pub fn into_node<O: AnimationTarget>(self, object: O) -> Result<Node<O>, AnimationError> {
        let mut node = Node::new(object);
        node.set_id(self.id);
        node.set_trigger(self.trigger);
        for sa in self.animations {
            let markers: MarkerList = sa.markers.into_iter().collect();
            node.animations_mut()
                .add(Animation::new(sa.id).with_markers(markers))?;
        }
        for sa in &self.animators {
            let animator = build_animator(sa)?;
            node.animators_mut().add(animator);
        }
        Ok(node)
    }
}

impl StoredAnimator {
    /// Declared kind, or the kind of the first key.
    pub fn resolved_kind(&self) -> Option<ValueKind> {
        self.kind
            .or_else(|| self.keys.first().map(|k| k.value.kind()))
    }
}

fn build_animator(sa: &StoredAnimator) -> Result<Box<dyn DynAnimator>, AnimationError> {
    let kind = sa.resolved_kind().ok_or_else(|| AnimationError::InvalidKeys {
        path: sa.target_property.clone(),
        reason: "empty track without a kind".to_string(),
    })?;
    match kind {
        ValueKind::Float => typed_animator::<f32>(sa),
        ValueKind::Int => typed_animator::<i32>(sa),
        ValueKind::Bool => typed_animator::<bool>(sa),
        ValueKind::Vec2 => typed_animator::<Vector2>(sa),
        ValueKind::Vec3 => typed_animator::<Vector3>(sa),
        ValueKind::Quat => typed_animator::<Quaternion>(sa),
        ValueKind::ColorRgba => typed_animator::<Color4>(sa),
        ValueKind::Matrix44 => typed_animator::<Matrix44>(sa),
        ValueKind::Thickness => typed_animator::<Thickness>(sa),
        ValueKind::Text => typed_animator::<String>(sa),
    }
}

fn typed_animator<T: Animatable>(
    sa: &StoredAnimator,
) -> Result<Box<dyn DynAnimator>, AnimationError> {
    let invalid = |reason: String| AnimationError::InvalidKeys {
        path: sa.target_property.clone(),
        reason,
    };
    let mut keys = KeyframeList::new();
    for k in &sa.keys {
        if k.frame < 0 {
            return Err(invalid(format!("negative frame {}", k.frame)));
        }
        let value = T::from_value(&k.value).ok_or_else(|| {
            invalid(format!(
                "frame {}: expected {:?}, found {:?}",
                k.frame,
                T::KIND,
                k.value.kind()
            ))
        })?;
        keys.add(k.frame, value, k.function);
    }
    let mut animator = Animator::<T>::new(sa.target_property.clone()).with_keys(keys);
    animator.set_animation_id(sa.animation_id.clone());
    animator.set_enabled(sa.enabled);
    Ok(Box::new(animator))
}

impl<O: AnimationTarget> Node<O> {
    /// Authored data of this node in stored form.
    pub fn to_stored(&self) -> StoredNode {
        StoredNode {
            id: self.id().map(str::to_string),
            trigger: self.trigger().to_string(),
            animations: self
                .animations()
                .iter()
                .map(|a| StoredAnimation {
                    id: a.id().map(str::to_string),
                    markers: a.markers().iter().cloned().collect(),
                })
                .collect(),
            animators: self
                .animators()
                .iter()
                .map(|a| StoredAnimator {
                    target_property: a.target_property().to_string(),
                    animation_id: a.animation_id().map(str::to_string),
                    enabled: a.enabled(),
                    kind: Some(a.value_kind()),
                    keys: a.value_keys(),
                })
                .collect(),
        }
    }
}
