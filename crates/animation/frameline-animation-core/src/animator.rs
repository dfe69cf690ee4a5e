//! Animator: one keyframe track bound to one property of one object.
//!
//! Evaluation keeps the active segment cached. While time quantizes to a
//! frame inside it, `calc_value` is a straight interpolation; when it
//! leaves, the new segment is found by walking from the last key index rather
//! than searching the whole list, which is O(1) amortized for forward
//! playback.
//!
//! Binding is lazy. The first `apply` resolves the target property; if that
//! fails the animator becomes a zombie and ignores every later `apply` until
//! `unbind`. Stale tracks on partially matching objects therefore play back
//! as no-ops instead of erroring.

use std::any::Any;
use std::fmt;

use frameline_api_core::{Value, ValueKind};

use crate::binding::{bind_property, AnimationTarget, BindFailure, BindingState, TriggerSink};
use crate::interp::Animatable;
use crate::keyframe::{KeyFunction, Keyframe};
use crate::keyframe_list::{KeyframeList, SharedKeyframes};
use crate::time::{frames_to_seconds, seconds_to_frames};

/// Outcome of a single `apply` call.
#[derive(Clone, Debug, PartialEq)]
pub enum ApplyStatus {
    Written,
    Disabled,
    /// Already inert from an earlier failed bind.
    Zombie,
    /// This call tried to bind and failed; the animator is now a zombie.
    BindFailed(BindFailure),
}

#[derive(Clone, Debug)]
struct SegmentCache<T> {
    // Window membership is tested on quantized frames, matching the frame
    // used to pick the segment.
    min_frame: i32,
    max_frame: i32,
    min_time: f64,
    max_time: f64,
    function: KeyFunction,
    key_index: usize,
    v1: T,
    v2: T,
    v3: T,
    v4: T,
    version: u64,
    recomputes: u64,
}

impl<T: Default> Default for SegmentCache<T> {
    fn default() -> Self {
        Self {
            min_frame: 0,
            max_frame: 0,
            min_time: 0.0,
            max_time: 0.0,
            function: KeyFunction::Steep,
            key_index: 0,
            v1: T::default(),
            v2: T::default(),
            v3: T::default(),
            v4: T::default(),
            version: 0,
            recomputes: 0,
        }
    }
}

#[derive(Debug)]
pub struct Animator<T: Animatable> {
    target_property: String,
    animation_id: Option<String>,
    enabled: bool,
    keys: SharedKeyframes<T>,
    binding: BindingState,
    cache: SegmentCache<T>,
}

impl<T: Animatable> Animator<T> {
    pub fn new(target_property: impl Into<String>) -> Self {
        Self {
            target_property: target_property.into(),
            animation_id: None,
            enabled: true,
            keys: SharedKeyframes::default(),
            binding: BindingState::Unbound,
            cache: SegmentCache::default(),
        }
    }

    pub fn with_animation_id(mut self, id: impl Into<String>) -> Self {
        self.animation_id = Some(id.into());
        self
    }

    pub fn with_keys(mut self, keys: KeyframeList<T>) -> Self {
        self.keys = SharedKeyframes::new(keys);
        self.reset_cache();
        self
    }

    pub fn target_property(&self) -> &str {
        &self.target_property
    }

    /// Retarget the animator; clears any binding.
    pub fn set_target_property(&mut self, path: impl Into<String>) {
        self.target_property = path.into();
        self.unbind();
    }

    pub fn animation_id(&self) -> Option<&str> {
        self.animation_id.as_deref()
    }

    pub fn set_animation_id(&mut self, id: Option<String>) {
        self.animation_id = id;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Read-only view of the keys; never copies.
    pub fn keys(&self) -> &KeyframeList<T> {
        &self.keys
    }

    pub fn shared_keys(&self) -> &SharedKeyframes<T> {
        &self.keys
    }

    /// Writable keys. Privatizes the list first if another animator shares it.
    pub fn keys_mut(&mut self) -> &mut KeyframeList<T> {
        self.reset_cache();
        self.keys.make_mut()
    }

    /// Replace the key storage (e.g. to share an existing list).
    pub fn set_keys(&mut self, keys: SharedKeyframes<T>) {
        self.keys = keys;
        self.reset_cache();
    }

    /// Frame of the last key.
    pub fn duration(&self) -> i32 {
        self.keys.last_frame()
    }

    /// First key frame at or after `from`.
    pub fn next_key_frame(&self, from: i32) -> Option<i32> {
        self.keys.iter().map(|k| k.frame).find(|&f| f >= from)
    }

    pub fn binding_state(&self) -> &BindingState {
        &self.binding
    }

    pub fn is_zombie(&self) -> bool {
        self.binding.is_zombie()
    }

    pub fn is_triggerable(&self) -> bool {
        matches!(&self.binding, BindingState::Bound(b) if b.triggerable)
    }

    /// Forget the resolved target (and zombie state). Keys are untouched.
    pub fn unbind(&mut self) {
        self.binding = BindingState::Unbound;
    }

    /// Force the next evaluation to recompute the active segment.
    pub fn reset_cache(&mut self) {
        self.cache.min_frame = 0;
        self.cache.max_frame = 0;
    }

    /// How many times the active segment has been recomputed.
    pub fn interval_recomputes(&self) -> u64 {
        self.cache.recomputes
    }

    /// Cached `[min_time, max_time)` window in seconds.
    pub fn cached_interval(&self) -> (f64, f64) {
        (self.cache.min_time, self.cache.max_time)
    }

    /// Bind lazily and write the value at `time` through the target.
    pub fn apply(&mut self, time: f64, target: &mut dyn AnimationTarget) -> ApplyStatus {
        if !self.enabled {
            return ApplyStatus::Disabled;
        }
        let binding = match self.binding {
            BindingState::Bound(b) => b,
            BindingState::Zombie(_) => return ApplyStatus::Zombie,
            BindingState::Unbound => {
                match bind_property(target, &self.target_property, T::KIND) {
                    Ok(b) => {
                        self.binding = BindingState::Bound(b);
                        b
                    }
                    Err(failure) => {
                        self.binding = BindingState::Zombie(failure.clone());
                        return ApplyStatus::BindFailed(failure);
                    }
                }
            }
        };
        let value = self.calc_value(time);
        target.write(binding.handle, binding.index, value.into_value());
        ApplyStatus::Written
    }

    /// Fire the owner's trigger if the key found by the last evaluation sits
    /// exactly on `frame`. Only meaningful after `apply` for the same time.
    pub fn invoke_trigger(&self, frame: i32, time_correction: f64, sink: &mut dyn TriggerSink) {
        if !self.enabled || !self.is_triggerable() {
            return;
        }
        if self.keys.get(self.cache.key_index).map(|k| k.frame) == Some(frame) {
            sink.on_trigger(&self.target_property, time_correction);
        }
    }

    /// Interpolated value at `time` seconds.
    pub fn calc_value(&mut self, time: f64) -> T {
        let frame = seconds_to_frames(time);
        if frame < self.cache.min_frame
            || frame >= self.cache.max_frame
            || self.cache.version != self.keys.version()
        {
            self.cache_interpolation_parameters(frame);
        }
        let c = &self.cache;
        match c.function {
            KeyFunction::Steep => c.v2.clone(),
            KeyFunction::Linear => {
                let t = segment_t(time, c.min_time, c.max_time);
                T::interpolate_linear(&c.v2, &c.v3, t)
            }
            KeyFunction::Spline | KeyFunction::ClosedSpline => {
                let t = segment_t(time, c.min_time, c.max_time);
                T::interpolate_splined(&c.v1, &c.v2, &c.v3, &c.v4, t)
            }
        }
    }

    fn cache_interpolation_parameters(&mut self, frame: i32) {
        let keys = self.keys.as_slice();
        let cache = &mut self.cache;
        cache.recomputes += 1;
        cache.version = self.keys.version();

        let count = keys.len();
        if count == 0 {
            cache.v2 = T::default();
            cache.min_frame = i32::MIN;
            cache.max_frame = i32::MAX;
            cache.min_time = f64::NEG_INFINITY;
            cache.max_time = f64::INFINITY;
            cache.function = KeyFunction::Steep;
            cache.key_index = 0;
            return;
        }

        // Rightmost key at or before `frame`, walking from the last position.
        let mut i = cache.key_index.min(count - 1);
        while i < count - 1 && frame > keys[i].frame {
            i += 1;
        }
        let mut found = Some(i);
        while let Some(j) = found {
            if frame >= keys[j].frame {
                break;
            }
            found = j.checked_sub(1);
        }

        match found {
            None => {
                cache.key_index = 0;
                cache.min_frame = i32::MIN;
                cache.max_frame = keys[0].frame;
                cache.min_time = f64::NEG_INFINITY;
                cache.max_time = frames_to_seconds(keys[0].frame);
                cache.v2 = keys[0].value.clone();
                cache.function = KeyFunction::Steep;
            }
            Some(i) if i == count - 1 => {
                cache.key_index = i;
                cache.min_frame = keys[i].frame;
                cache.max_frame = i32::MAX;
                cache.min_time = frames_to_seconds(keys[i].frame);
                cache.max_time = f64::INFINITY;
                cache.v2 = keys[i].value.clone();
                cache.function = KeyFunction::Steep;
            }
            Some(i) => {
                let key1 = &keys[i];
                let key2 = &keys[i + 1];
                cache.key_index = i;
                cache.min_frame = key1.frame;
                cache.max_frame = key2.frame;
                cache.min_time = frames_to_seconds(key1.frame);
                cache.max_time = frames_to_seconds(key2.frame);
                cache.v2 = key1.value.clone();
                cache.v3 = key2.value.clone();
                cache.function = key1.function;
                match key1.function {
                    KeyFunction::Spline => {
                        let prev = if i < 1 { 0 } else { i - 1 };
                        let next = if i + 1 >= count - 1 { count - 1 } else { i + 2 };
                        cache.v1 = keys[prev].value.clone();
                        cache.v4 = keys[next].value.clone();
                    }
                    KeyFunction::ClosedSpline => {
                        // The list is a loop whose first and last keys coincide.
                        let prev = if i < 1 { count - 2 } else { i - 1 };
                        let next = if i + 1 >= count - 1 { 1 } else { i + 2 };
                        cache.v1 = keys[prev].value.clone();
                        cache.v4 = keys[next].value.clone();
                    }
                    KeyFunction::Steep | KeyFunction::Linear => {}
                }
            }
        }
    }
}

/// Segment parameter; a time that quantizes onto the left key but sits a
/// hair below it in seconds evaluates as that key.
fn segment_t(time: f64, min_time: f64, max_time: f64) -> f32 {
    ((time - min_time) / (max_time - min_time)).clamp(0.0, 1.0) as f32
}

/// Clones share the key list and start unbound.
impl<T: Animatable> Clone for Animator<T> {
    fn clone(&self) -> Self {
        Self {
            target_property: self.target_property.clone(),
            animation_id: self.animation_id.clone(),
            enabled: self.enabled,
            keys: self.keys.share(),
            binding: BindingState::Unbound,
            cache: SegmentCache::default(),
        }
    }
}

/// Type-erased animator, so one collection can hold tracks of any value type.
pub trait DynAnimator: fmt::Debug {
    fn target_property(&self) -> &str;
    fn animation_id(&self) -> Option<&str>;
    fn enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
    fn value_kind(&self) -> ValueKind;
    fn duration(&self) -> i32;
    fn key_count(&self) -> usize;
    /// Live references to this animator's key list.
    fn keys_ref_count(&self) -> usize;
    fn apply(&mut self, time: f64, target: &mut dyn AnimationTarget) -> ApplyStatus;
    fn invoke_trigger(&self, frame: i32, time_correction: f64, sink: &mut dyn TriggerSink);
    fn binding_state(&self) -> &BindingState;
    fn is_triggerable(&self) -> bool;
    fn unbind(&mut self);
    fn reset_cache(&mut self);
    fn next_key_frame(&self, from: i32) -> Option<i32>;
    /// Keys with values converted to [`Value`].
    fn value_keys(&self) -> Vec<Keyframe<Value>>;
    fn box_clone(&self) -> Box<dyn DynAnimator>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Animatable> DynAnimator for Animator<T> {
    fn target_property(&self) -> &str {
        &self.target_property
    }

    fn animation_id(&self) -> Option<&str> {
        self.animation_id.as_deref()
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn value_kind(&self) -> ValueKind {
        T::KIND
    }

    fn duration(&self) -> i32 {
        Animator::duration(self)
    }

    fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn keys_ref_count(&self) -> usize {
        self.keys.ref_count()
    }

    fn apply(&mut self, time: f64, target: &mut dyn AnimationTarget) -> ApplyStatus {
        Animator::apply(self, time, target)
    }

    fn invoke_trigger(&self, frame: i32, time_correction: f64, sink: &mut dyn TriggerSink) {
        Animator::invoke_trigger(self, frame, time_correction, sink)
    }

    fn binding_state(&self) -> &BindingState {
        &self.binding
    }

    fn is_triggerable(&self) -> bool {
        Animator::is_triggerable(self)
    }

    fn unbind(&mut self) {
        Animator::unbind(self)
    }

    fn reset_cache(&mut self) {
        Animator::reset_cache(self)
    }

    fn next_key_frame(&self, from: i32) -> Option<i32> {
        Animator::next_key_frame(self, from)
    }

    fn value_keys(&self) -> Vec<Keyframe<Value>> {
        self.keys
            .iter()
            .map(|k| Keyframe::new(k.frame, k.value.clone().into_value(), k.function))
            .collect()
    }

    fn box_clone(&self) -> Box<dyn DynAnimator> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frameline_api_core::PropertyBag;

    fn linear_0_10() -> Animator<f32> {
        let mut keys = KeyframeList::new();
        keys.add(0, 0.0, KeyFunction::Linear);
        keys.add(10, 10.0, KeyFunction::Linear);
        Animator::new("X").with_keys(keys)
    }

    #[test]
    fn walks_backward_after_seek() {
        let mut a = linear_0_10();
        a.keys_mut().add(20, 0.0, KeyFunction::Linear);
        let v = a.calc_value(frames_to_seconds(15));
        assert!((v - 5.0).abs() < 1e-4);
        let v = a.calc_value(frames_to_seconds(5));
        assert!((v - 5.0).abs() < 1e-4);
        assert_eq!(a.cached_interval(), (0.0, frames_to_seconds(10)));
    }

    #[test]
    fn time_just_below_a_key_stays_cached() {
        let mut a = linear_0_10();
        a.keys_mut().add(20, 0.0, KeyFunction::Linear);
        // Quantizes onto frame 10 although it is below the key in seconds.
        let t = frames_to_seconds(10) - 1e-9;
        assert_eq!(seconds_to_frames(t), 10);
        assert_eq!(a.calc_value(t), 10.0);
        assert_eq!(a.cached_interval(), (frames_to_seconds(10), frames_to_seconds(20)));
        let recomputes = a.interval_recomputes();
        for _ in 0..4 {
            assert_eq!(a.calc_value(t), 10.0);
        }
        assert_eq!(a.interval_recomputes(), recomputes);
    }

    #[test]
    fn invoke_trigger_before_apply_is_a_no_op() {
        let mut bag = PropertyBag::new();
        bag.define_with(
            "Trigger",
            Value::text(""),
            frameline_api_core::PropertyFlags {
                writable: true,
                triggerable: true,
            },
        );
        let mut keys = KeyframeList::new();
        keys.add(0, "go".to_string(), KeyFunction::Steep);
        let mut a = Animator::<String>::new("Trigger").with_keys(keys);
        let mut fired = Vec::new();
        a.invoke_trigger(0, 0.0, &mut fired);
        assert!(fired.is_empty());
        assert_eq!(a.apply(0.0, &mut bag), ApplyStatus::Written);
        a.invoke_trigger(0, 0.0, &mut fired);
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn keys_mut_invalidates_cache() {
        let mut a = linear_0_10();
        let _ = a.calc_value(frames_to_seconds(5));
        let before = a.interval_recomputes();
        a.keys_mut().set_at(1, 20.0, KeyFunction::Linear);
        let v = a.calc_value(frames_to_seconds(5));
        assert!((v - 10.0).abs() < 1e-4);
        assert_eq!(a.interval_recomputes(), before + 1);
    }
}
