//! Frameline Animation Core (object-model agnostic)
//!
//! Keyframe tracks bound to object properties at runtime, evaluated per
//! frame and steered by markers and trigger keys. The object model is
//! reached only through [`AnimationTarget`]; [`PropertyBag`] is the bundled
//! reference implementation.
//!
//! Everything here is single-threaded: key lists are shared between cloned
//! animators through `Rc` and privatized on first write.

pub mod animation;
pub mod animator;
pub mod binding;
pub mod collection;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod interp;
pub mod keyframe;
pub mod keyframe_list;
pub mod marker;
pub mod node;
pub mod stored;
pub mod time;
pub mod trigger;

// Re-exports for consumers (adapters)
pub use animation::{Animation, AnimationCollection, AnimationContext, StoppedCallback};
pub use animator::{Animator, ApplyStatus, DynAnimator};
pub use binding::{
    bind_property, AnimationTarget, BindFailure, Binding, BindingState, FiredTrigger,
    PropertyInfo, TargetHandle, TriggerSink,
};
pub use collection::AnimatorCollection;
pub use config::Config;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::AnimationError;
pub use interp::Animatable;
pub use keyframe::{KeyFunction, Keyframe};
pub use keyframe_list::{KeyframeList, SharedKeyframes};
pub use marker::{Marker, MarkerAction, MarkerList};
pub use node::{Node, TRIGGER_HANDLE, TRIGGER_PROPERTY};
pub use stored::{
    parse_stored_node_json, StoredAnimation, StoredAnimator, StoredKeyframe, StoredNode,
};
pub use time::{frames_to_seconds, seconds_to_frames, FRAMES_PER_SECOND};
pub use trigger::{parse_trigger, ParsedTrigger, TriggerToken};
pub use frameline_api_core::{
    Color4, Matrix44, PropertyBag, PropertyFlags, PropertyPath, Quaternion, Thickness, Value,
    ValueKind, Vector2, Vector3,
};
