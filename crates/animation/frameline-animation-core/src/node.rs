//! Animation host: an object plus its animators and animations.
//!
//! [`Node`] wraps any [`AnimationTarget`] and adds the `Trigger` pseudo
//! property. Trigger keys write a `marker[@animation]` list into it; once a
//! tick has applied every animator the node runs the named markers.

use frameline_api_core::{PropertyPath, Value, ValueKind};

use crate::animation::{Animation, AnimationCollection, AnimationContext};
use crate::binding::{AnimationTarget, FiredTrigger, PropertyInfo, TargetHandle};
use crate::collection::AnimatorCollection;
use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::AnimationError;
use crate::marker::MarkerList;
use crate::trigger::parse_trigger;

pub const TRIGGER_PROPERTY: &str = "Trigger";

/// Handle reserved for the trigger property. Object adapters must not issue it.
pub const TRIGGER_HANDLE: TargetHandle = TargetHandle(u32::MAX);

/// Routes `Trigger` to the node and everything else to the object.
struct NodeTarget<'a, O> {
    object: &'a mut O,
    trigger: &'a mut String,
}

impl<O: AnimationTarget> AnimationTarget for NodeTarget<'_, O> {
    fn resolve(&mut self, path: &PropertyPath) -> Option<PropertyInfo> {
        if path.is_single(TRIGGER_PROPERTY) {
            return Some(PropertyInfo {
                handle: TRIGGER_HANDLE,
                kind: ValueKind::Text,
                writable: true,
                triggerable: true,
                len: None,
            });
        }
        self.object.resolve(path)
    }

    fn write(&mut self, handle: TargetHandle, index: Option<usize>, value: Value) {
        if handle == TRIGGER_HANDLE {
            if let Value::Text(s) = value {
                *self.trigger = s;
            }
            return;
        }
        self.object.write(handle, index, value);
    }

    fn invalidate(&mut self) {
        self.object.invalidate();
    }
}

#[derive(Debug)]
pub struct Node<O> {
    id: Option<String>,
    object: O,
    trigger: String,
    animators: AnimatorCollection,
    animations: AnimationCollection,
    running_animation_count: usize,
    config: Config,
    diagnostics: Diagnostics,
}

impl<O: AnimationTarget> Node<O> {
    pub fn new(object: O) -> Self {
        Self {
            id: None,
            object,
            trigger: String::new(),
            animators: AnimatorCollection::new(),
            animations: AnimationCollection::new(),
            running_animation_count: 0,
            config: Config::default(),
            diagnostics: Diagnostics::silent(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn label(&self) -> String {
        self.id.clone().unwrap_or_else(|| "<unnamed>".to_string())
    }

    pub fn object(&self) -> &O {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut O {
        &mut self.object
    }

    pub fn into_object(self) -> O {
        self.object
    }

    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    pub fn set_trigger(&mut self, trigger: impl Into<String>) {
        self.trigger = trigger.into();
    }

    pub fn animators(&self) -> &AnimatorCollection {
        &self.animators
    }

    pub fn animators_mut(&mut self) -> &mut AnimatorCollection {
        &mut self.animators
    }

    pub fn animations(&self) -> &AnimationCollection {
        &self.animations
    }

    /// Direct access to the animations. Call
    /// [`refresh_running_animation_count`](Self::refresh_running_animation_count)
    /// after starting or stopping animations through it.
    pub fn animations_mut(&mut self) -> &mut AnimationCollection {
        &mut self.animations
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    pub fn set_diagnostics_sink(&mut self, sink: impl FnMut(&Diagnostic) + 'static) {
        self.diagnostics.set_sink(sink);
    }

    pub fn running_animation_count(&self) -> usize {
        self.running_animation_count
    }

    pub fn refresh_running_animation_count(&mut self) {
        self.running_animation_count = self.animations.running_count();
    }

    /// Forget every animator binding, e.g. after the object's property set
    /// changed. Zombies get another chance on the next apply.
    pub fn unbind_animators(&mut self) {
        self.animators.unbind_all();
    }

    /// Advance every running animation by `delta` seconds, then run the
    /// markers named by any trigger keys that fired.
    ///
    /// Each fired trigger keeps the `Trigger` text as it stood right after
    /// its own animation applied, so two animations keying the trigger on
    /// the same frame both get their markers run.
    pub fn advance_animation(&mut self, delta: f64) {
        if self.running_animation_count == 0 {
            return;
        }
        let mut fired: Vec<(FiredTrigger, String)> = Vec::new();
        {
            let Node {
                object,
                trigger,
                animators,
                animations,
                config,
                diagnostics,
                ..
            } = self;
            for animation in animations.iter_mut() {
                let mut batch: Vec<FiredTrigger> = Vec::new();
                {
                    let mut target = NodeTarget {
                        object: &mut *object,
                        trigger: &mut *trigger,
                    };
                    let mut ctx = AnimationContext {
                        animators: &mut *animators,
                        target: &mut target,
                        triggers: &mut batch,
                        diagnostics: &mut *diagnostics,
                    };
                    animation.advance(delta, config, &mut ctx);
                }
                fired.extend(batch.into_iter().map(|t| (t, trigger.clone())));
            }
        }
        for (t, value) in fired {
            self.handle_trigger(&t.property, &value, t.time_correction);
        }
        self.refresh_running_animation_count();
    }

    /// Handle a fired trigger key. Only `Trigger` is meaningful: an empty
    /// trigger restarts the default animation, otherwise every
    /// `marker[@animation]` token is run.
    pub fn on_trigger(&mut self, property: &str, time_correction: f64) {
        let value = self.trigger.clone();
        self.handle_trigger(property, &value, time_correction);
    }

    fn handle_trigger(&mut self, property: &str, value: &str, time_correction: f64) {
        if property != TRIGGER_PROPERTY {
            return;
        }
        if value.is_empty() {
            let animation = self.animations.default_mut();
            animation.set_time(time_correction);
            animation.set_running(true);
            self.refresh_running_animation_count();
            return;
        }
        let parsed = parse_trigger(value);
        for token in parsed.malformed {
            self.diagnostics.emit(Diagnostic::MalformedTrigger { token });
        }
        for token in parsed.tokens {
            let animation = token.animation.as_deref();
            if !self.try_run_animation(&token.marker, animation, time_correction) {
                self.diagnostics.emit(Diagnostic::MarkerNotFound {
                    animation: token.animation.clone(),
                    marker: token.marker.clone(),
                });
            }
        }
    }

    /// Probe form: false if the animation or marker does not exist.
    pub fn try_run_animation(
        &mut self,
        marker_id: &str,
        animation_id: Option<&str>,
        time_correction: f64,
    ) -> bool {
        if !self.animations.try_run(animation_id, marker_id, time_correction) {
            return false;
        }
        self.after_run(animation_id);
        true
    }

    /// Asserting form: the error names this node and the missing id.
    pub fn run_animation(
        &mut self,
        marker_id: &str,
        animation_id: Option<&str>,
    ) -> Result<&mut Self, AnimationError> {
        let label = self.label();
        self.animations.run(&label, animation_id, marker_id)?;
        self.after_run(animation_id);
        Ok(self)
    }

    fn after_run(&mut self, animation_id: Option<&str>) {
        if self.config.apply_on_run {
            self.apply_animation(animation_id);
        }
        self.refresh_running_animation_count();
    }

    /// Write one animation's animators at its current time; no triggers fire.
    pub fn apply_animation(&mut self, animation_id: Option<&str>) {
        let Node {
            object,
            trigger,
            animators,
            animations,
            diagnostics,
            ..
        } = self;
        let Some(animation) = animations.find_mut(animation_id) else {
            return;
        };
        let mut target = NodeTarget { object, trigger };
        let mut ignored: Vec<FiredTrigger> = Vec::new();
        let mut ctx = AnimationContext {
            animators,
            target: &mut target,
            triggers: &mut ignored,
            diagnostics,
        };
        if animation.apply_animators(&mut ctx) > 0 {
            ctx.target.invalidate();
        }
    }

    // Default-animation accessors.

    pub fn default_animation(&mut self) -> &mut Animation {
        self.animations.default_mut()
    }

    pub fn is_running(&self) -> bool {
        self.animations
            .default_animation()
            .is_some_and(Animation::is_running)
    }

    pub fn set_running(&mut self, running: bool) {
        self.animations.default_mut().set_running(running);
        self.refresh_running_animation_count();
    }

    pub fn animation_time(&self) -> f64 {
        self.animations
            .default_animation()
            .map_or(0.0, Animation::time)
    }

    pub fn set_animation_time(&mut self, time: f64) {
        self.animations.default_mut().set_time(time);
    }

    pub fn animation_frame(&self) -> i32 {
        self.animations
            .default_animation()
            .map_or(0, Animation::frame)
    }

    pub fn set_animation_frame(&mut self, frame: i32) {
        self.animations.default_mut().set_frame(frame);
    }

    /// Marker the default animation was last started from.
    pub fn current_animation(&self) -> Option<&str> {
        self.animations
            .default_animation()
            .and_then(Animation::running_marker_id)
    }

    pub fn markers_mut(&mut self) -> &mut MarkerList {
        self.animations.default_mut().markers_mut()
    }

    /// One-shot callback for the default animation. Runs clear it, so install
    /// it after `run_animation`.
    pub fn set_on_animation_stopped(&mut self, callback: impl FnOnce() + 'static) {
        self.animations.default_mut().set_on_stopped(callback);
    }
}

impl<O: AnimationTarget + Clone> Node<O> {
    /// Copy the node; animators share key lists with the original and
    /// rebind lazily. The diagnostics sink and stopped callbacks are not
    /// carried over.
    pub fn shared_clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            object: self.object.clone(),
            trigger: self.trigger.clone(),
            animators: self.animators.shared_clone(),
            animations: self.animations.clone(),
            running_animation_count: self.running_animation_count,
            config: self.config.clone(),
            diagnostics: Diagnostics::silent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::Animator;
    use crate::keyframe::KeyFunction;
    use crate::keyframe_list::KeyframeList;
    use crate::marker::Marker;
    use frameline_api_core::PropertyBag;

    fn node() -> Node<PropertyBag> {
        let mut bag = PropertyBag::new();
        bag.define("X", Value::Float(0.0));
        let mut keys = KeyframeList::new();
        keys.add(0, 0.0f32, KeyFunction::Linear);
        keys.add(30, 30.0, KeyFunction::Linear);
        let mut node = Node::new(bag).with_id("Box");
        node.animators_mut().insert(Animator::new("X").with_keys(keys));
        node.markers_mut().add_ordered(Marker::play("start", 0));
        node.markers_mut().add_ordered(Marker::play("mid", 15));
        node
    }

    #[test]
    fn run_applies_immediately_when_configured() {
        let mut n = node();
        n.run_animation("mid", None).unwrap();
        assert_eq!(n.object().get("X"), Some(&Value::Float(15.0)));
        assert_eq!(n.current_animation(), Some("mid"));
        assert_eq!(n.running_animation_count(), 1);

        let mut n = node().with_config(Config {
            apply_on_run: false,
            ..Config::default()
        });
        n.run_animation("mid", None).unwrap();
        assert_eq!(n.object().get("X"), Some(&Value::Float(0.0)));
    }

    #[test]
    fn run_errors_name_the_node() {
        let mut n = node();
        let err = n.run_animation("nowhere", None).unwrap_err();
        assert_eq!(
            err,
            AnimationError::MarkerNotFound {
                node: "Box".into(),
                animation: "<default>".into(),
                marker: "nowhere".into()
            }
        );
        assert!(!n.try_run_animation("start", Some("Ghost"), 0.0));
        assert!(!n.is_running());
    }

    #[test]
    fn advance_is_skipped_when_nothing_runs() {
        let mut n = node();
        n.advance_animation(0.5);
        assert_eq!(n.object().writes(), 0);
        n.set_running(true);
        n.advance_animation(0.5);
        assert_eq!(n.object().get("X"), Some(&Value::Float(15.0)));
        assert_eq!(n.animation_frame(), 15);
    }

    #[test]
    fn trigger_property_is_resolved_by_the_node() {
        let mut n = node();
        let mut keys = KeyframeList::new();
        keys.add(3, "mid".to_string(), KeyFunction::Steep);
        n.animators_mut().insert(Animator::new(TRIGGER_PROPERTY).with_keys(keys));
        n.set_running(true);
        n.advance_animation(3.0 / 30.0);
        assert_eq!(n.trigger(), "mid");
        // The trigger restarted the default animation at "mid".
        assert_eq!(n.animation_frame(), 15);
        assert_eq!(n.current_animation(), Some("mid"));
    }

    #[test]
    fn empty_trigger_restarts_default_animation() {
        let mut n = node();
        n.set_animation_time(0.8);
        n.on_trigger(TRIGGER_PROPERTY, 0.01);
        assert!(n.is_running());
        assert!((n.animation_time() - 0.01).abs() < 1e-12);
        n.on_trigger("Other", 0.0);
        assert_eq!(n.running_animation_count(), 1);
    }
}
