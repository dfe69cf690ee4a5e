//! Named timelines.
//!
//! An [`Animation`] owns a time cursor and a marker list. Each `advance`
//! moves the cursor, resolves the markers crossed on the way, applies every
//! animator carrying the same animation id and only then fires trigger keys,
//! so trigger handlers see fully updated property state.

use std::fmt;

use log::{debug, warn};

use crate::animator::ApplyStatus;
use crate::binding::{AnimationTarget, TriggerSink};
use crate::collection::AnimatorCollection;
use crate::config::Config;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{animation_label, AnimationError};
use crate::marker::{MarkerAction, MarkerList};
use crate::time::{frames_to_seconds, seconds_to_frames};

/// One-shot callback fired when a stop marker halts the animation.
pub type StoppedCallback = Box<dyn FnOnce()>;

/// Everything an animation touches while advancing, borrowed from its owner.
pub struct AnimationContext<'a> {
    pub animators: &'a mut AnimatorCollection,
    pub target: &'a mut dyn AnimationTarget,
    pub triggers: &'a mut dyn TriggerSink,
    pub diagnostics: &'a mut Diagnostics,
}

#[derive(Default)]
pub struct Animation {
    id: Option<String>,
    time: f64,
    is_running: bool,
    running_marker_id: Option<String>,
    markers: MarkerList,
    on_stopped: Option<StoppedCallback>,
}

impl Animation {
    /// `None` is the node's default animation.
    pub fn new(id: Option<String>) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_markers(mut self, markers: MarkerList) -> Self {
        self.markers = markers;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub fn frame(&self) -> i32 {
        seconds_to_frames(self.time)
    }

    pub fn set_frame(&mut self, frame: i32) {
        self.time = frames_to_seconds(frame);
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn set_running(&mut self, running: bool) {
        self.is_running = running;
    }

    /// Halt without firing the stopped callback.
    pub fn stop(&mut self) {
        self.is_running = false;
    }

    pub fn running_marker_id(&self) -> Option<&str> {
        self.running_marker_id.as_deref()
    }

    pub fn markers(&self) -> &MarkerList {
        &self.markers
    }

    pub fn markers_mut(&mut self) -> &mut MarkerList {
        &mut self.markers
    }

    /// Install the stopped callback. A later run clears it, so install it
    /// after starting the animation.
    pub fn set_on_stopped(&mut self, callback: impl FnOnce() + 'static) {
        self.on_stopped = Some(Box::new(callback));
    }

    pub fn has_on_stopped(&self) -> bool {
        self.on_stopped.is_some()
    }

    /// Start at `marker_id`, offset by `time_correction` seconds.
    /// Returns false if the marker does not exist.
    pub fn try_run(&mut self, marker_id: &str, time_correction: f64) -> bool {
        let Some(marker) = self.markers.find(marker_id) else {
            return false;
        };
        self.time = frames_to_seconds(marker.frame) + time_correction;
        self.running_marker_id = Some(marker_id.to_string());
        self.is_running = true;
        self.on_stopped = None;
        debug!(
            "animation {} running from marker '{}' at frame {}",
            animation_label(self.id()),
            marker_id,
            self.frame()
        );
        true
    }

    /// Asserting form of [`try_run`](Self::try_run); `node` names the owner
    /// in the error.
    pub fn run(&mut self, marker_id: &str, node: &str) -> Result<(), AnimationError> {
        if self.try_run(marker_id, 0.0) {
            Ok(())
        } else {
            Err(AnimationError::MarkerNotFound {
                node: node.to_string(),
                animation: animation_label(self.id()),
                marker: marker_id.to_string(),
            })
        }
    }

    /// Move the cursor by `delta` seconds and drive this animation's
    /// animators. No-op while stopped.
    pub fn advance(&mut self, delta: f64, config: &Config, ctx: &mut AnimationContext<'_>) {
        if !self.is_running {
            return;
        }
        let prev_frame = self.frame();
        let stopped = self.process_markers(self.time + delta, config, ctx.diagnostics);

        let written = self.apply_animators(ctx);
        let frame = self.frame();
        if frame != prev_frame {
            let correction = self.time - frames_to_seconds(frame);
            for a in ctx.animators.iter() {
                if a.animation_id() == self.id() {
                    a.invoke_trigger(frame, correction, &mut *ctx.triggers);
                }
            }
        }
        if written > 0 {
            ctx.target.invalidate();
        }
        if stopped {
            if let Some(callback) = self.on_stopped.take() {
                callback();
            }
        }
    }

    /// Write every animator of this animation at the current time without
    /// firing triggers. Returns how many values were written.
    pub fn apply_animators(&mut self, ctx: &mut AnimationContext<'_>) -> usize {
        let mut written = 0;
        for a in ctx.animators.iter_mut() {
            if a.animation_id() != self.id.as_deref() {
                continue;
            }
            match a.apply(self.time, &mut *ctx.target) {
                ApplyStatus::Written => written += 1,
                ApplyStatus::BindFailed(failure) => {
                    ctx.diagnostics.emit(Diagnostic::BindingFailed {
                        path: a.target_property().to_string(),
                        failure,
                    })
                }
                ApplyStatus::Disabled | ApplyStatus::Zombie => {}
            }
        }
        written
    }

    /// Resolve markers crossed between the current time and `time`, then
    /// store the resulting time. Returns true if a stop marker was hit.
    fn process_markers(&mut self, mut time: f64, config: &Config, diagnostics: &mut Diagnostics) -> bool {
        let mut from = self.frame();
        let mut jumps = 0u32;
        let mut stopped = false;
        while let Some(marker) = self.markers.first_in_range(from, seconds_to_frames(time)) {
            match marker.action {
                MarkerAction::Play => from = marker.frame,
                MarkerAction::Stop => {
                    time = frames_to_seconds(marker.frame);
                    self.is_running = false;
                    stopped = true;
                    debug!(
                        "animation {} stopped at marker '{}'",
                        animation_label(self.id()),
                        marker.id
                    );
                    break;
                }
                MarkerAction::Jump => {
                    let target = marker
                        .jump_to
                        .as_deref()
                        .and_then(|id| self.markers.find(id));
                    let Some(target) = target.filter(|t| t.id != marker.id) else {
                        if let Some(missing) = marker.jump_to.as_deref() {
                            if missing != marker.id {
                                diagnostics.emit(Diagnostic::MarkerNotFound {
                                    animation: self.id.clone(),
                                    marker: missing.to_string(),
                                });
                            }
                        }
                        from = marker.frame;
                        continue;
                    };
                    if jumps >= config.max_jumps_per_advance {
                        warn!(
                            "animation {}: jump limit ({}) reached at marker '{}'",
                            animation_label(self.id()),
                            jumps,
                            marker.id
                        );
                        diagnostics.emit(Diagnostic::JumpLimitReached {
                            animation: self.id.clone(),
                            jumps,
                        });
                        // Park just before the marker so the next tick crosses it again.
                        time = frames_to_seconds(marker.frame - 1);
                        break;
                    }
                    let overshoot = time - frames_to_seconds(marker.frame);
                    time = frames_to_seconds(target.frame) + overshoot;
                    from = target.frame;
                    jumps += 1;
                    debug!(
                        "animation {} jumped '{}' -> '{}'",
                        animation_label(self.id()),
                        marker.id,
                        target.id
                    );
                }
            }
        }
        self.time = time;
        stopped
    }
}

/// Clones copy the cursor and markers; the stopped callback stays behind.
impl Clone for Animation {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            time: self.time,
            is_running: self.is_running,
            running_marker_id: self.running_marker_id.clone(),
            markers: self.markers.clone(),
            on_stopped: None,
        }
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("id", &self.id)
            .field("time", &self.time)
            .field("is_running", &self.is_running)
            .field("running_marker_id", &self.running_marker_id)
            .field("markers", &self.markers)
            .field("on_stopped", &self.on_stopped.is_some())
            .finish()
    }
}

/// Animations of one node, unique by id.
#[derive(Clone, Debug, Default)]
pub struct AnimationCollection {
    animations: Vec<Animation>,
}

impl AnimationCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default (unnamed) animation, created on first access.
    pub fn default_mut(&mut self) -> &mut Animation {
        let i = match self.animations.iter().position(|a| a.id.is_none()) {
            Some(i) => i,
            None => {
                self.animations.push(Animation::new(None));
                self.animations.len() - 1
            }
        };
        &mut self.animations[i]
    }

    pub fn default_animation(&self) -> Option<&Animation> {
        self.find(None)
    }

    pub fn find(&self, id: Option<&str>) -> Option<&Animation> {
        self.animations.iter().find(|a| a.id() == id)
    }

    pub fn find_mut(&mut self, id: Option<&str>) -> Option<&mut Animation> {
        self.animations.iter_mut().find(|a| a.id() == id)
    }

    pub fn add(&mut self, animation: Animation) -> Result<&mut Animation, AnimationError> {
        if self.find(animation.id()).is_some() {
            return Err(AnimationError::DuplicateAnimation {
                id: animation_label(animation.id()),
            });
        }
        self.animations.push(animation);
        let last = self.animations.len() - 1;
        Ok(&mut self.animations[last])
    }

    pub fn remove(&mut self, id: Option<&str>) -> Option<Animation> {
        let i = self.animations.iter().position(|a| a.id() == id)?;
        Some(self.animations.remove(i))
    }

    /// Probe form: false if either the animation or the marker is missing.
    /// The default animation is created on demand.
    pub fn try_run(&mut self, animation_id: Option<&str>, marker_id: &str, time_correction: f64) -> bool {
        let animation = match animation_id {
            None => Some(self.default_mut()),
            Some(id) => self.find_mut(Some(id)),
        };
        animation.is_some_and(|a| a.try_run(marker_id, time_correction))
    }

    /// Asserting form; errors name `node` and the missing id.
    pub fn run(
        &mut self,
        node: &str,
        animation_id: Option<&str>,
        marker_id: &str,
    ) -> Result<&mut Animation, AnimationError> {
        let animation = match animation_id {
            None => self.default_mut(),
            Some(id) => self
                .find_mut(Some(id))
                .ok_or_else(|| AnimationError::AnimationNotFound {
                    node: node.to_string(),
                    animation: id.to_string(),
                })?,
        };
        animation.run(marker_id, node)?;
        Ok(animation)
    }

    pub fn running_count(&self) -> usize {
        self.animations.iter().filter(|a| a.is_running).count()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Animation> {
        self.animations.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Animation> {
        self.animations.iter_mut()
    }
}
