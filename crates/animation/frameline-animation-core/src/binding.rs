//! Property binding contracts.
//!
//! An animator never touches an object directly. It asks an
//! [`AnimationTarget`] to resolve its property path once, keeps the returned
//! [`TargetHandle`], and from then on writes values through that handle.
//! Adapters over a concrete object model implement the trait; the crate
//! ships an implementation for [`PropertyBag`].

use frameline_api_core::{PropertyBag, PropertyPath, Value, ValueKind};
use thiserror::Error;

/// Opaque handle issued by a target for one resolved property.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetHandle(pub u32);

/// What a target reports about a resolved property.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyInfo {
    pub handle: TargetHandle,
    pub kind: ValueKind,
    pub writable: bool,
    /// Writes are a signal to the owner (see [`TriggerSink`]).
    pub triggerable: bool,
    /// Element count when the property is a list.
    pub len: Option<usize>,
}

/// Object-model capability consumed by animators.
pub trait AnimationTarget {
    /// Resolve a path to a property, or `None` if it does not exist.
    fn resolve(&mut self, path: &PropertyPath) -> Option<PropertyInfo>;

    /// Write a value through a handle previously returned by `resolve`.
    /// `index` addresses a list element when the bound path ended in `[i]`.
    fn write(&mut self, handle: TargetHandle, index: Option<usize>, value: Value);

    /// Repaint hook; called once per advance in which any value was written.
    fn invalidate(&mut self) {}
}

/// Receiver for trigger keyframes.
pub trait TriggerSink {
    fn on_trigger(&mut self, property: &str, time_correction: f64);
}

/// A trigger recorded for deferred handling by the owner.
#[derive(Clone, Debug, PartialEq)]
pub struct FiredTrigger {
    pub property: String,
    pub time_correction: f64,
}

impl TriggerSink for Vec<FiredTrigger> {
    fn on_trigger(&mut self, property: &str, time_correction: f64) {
        self.push(FiredTrigger {
            property: property.to_string(),
            time_correction,
        });
    }
}

/// Why a binding attempt left an animator inert.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum BindFailure {
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("property not found")]
    MissingProperty,
    #[error("property is read-only")]
    ReadOnly,
    #[error("kind mismatch: animator {expected:?}, property {actual:?}")]
    KindMismatch { expected: ValueKind, actual: ValueKind },
    /// Path ends in `[i]` but the property is not a list.
    #[error("indexed path on a non-list property")]
    NotIndexable,
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Resolved binding held by a bound animator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub handle: TargetHandle,
    pub index: Option<usize>,
    pub triggerable: bool,
}

/// Per-animator binding lifecycle:
/// `Unbound -> (apply) -> Bound | Zombie`; `unbind` or clone returns to `Unbound`.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum BindingState {
    #[default]
    Unbound,
    Bound(Binding),
    /// Permanently inert until `unbind`.
    Zombie(BindFailure),
}

impl BindingState {
    pub fn is_zombie(&self) -> bool {
        matches!(self, BindingState::Zombie(_))
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, BindingState::Bound(_))
    }
}

/// Resolve `path` on `target` and validate it for values of `kind`.
pub fn bind_property(
    target: &mut dyn AnimationTarget,
    path: &str,
    kind: ValueKind,
) -> Result<Binding, BindFailure> {
    let parsed =
        PropertyPath::parse(path).map_err(|e| BindFailure::InvalidPath(e.to_string()))?;
    let info = target
        .resolve(&parsed)
        .ok_or(BindFailure::MissingProperty)?;
    if !info.writable {
        return Err(BindFailure::ReadOnly);
    }
    if info.kind != kind {
        return Err(BindFailure::KindMismatch {
            expected: kind,
            actual: info.kind,
        });
    }
    let index = parsed.last_index();
    if let Some(index) = index {
        let len = info.len.ok_or(BindFailure::NotIndexable)?;
        if index >= len {
            return Err(BindFailure::IndexOutOfRange { index, len });
        }
    }
    Ok(Binding {
        handle: info.handle,
        index,
        triggerable: info.triggerable,
    })
}

impl AnimationTarget for PropertyBag {
    fn resolve(&mut self, path: &PropertyPath) -> Option<PropertyInfo> {
        let (slot_index, slot) = self.slot_for(path)?;
        Some(PropertyInfo {
            handle: TargetHandle(slot_index as u32),
            kind: slot.kind,
            writable: slot.flags.writable,
            triggerable: slot.flags.triggerable,
            len: slot.len(),
        })
    }

    fn write(&mut self, handle: TargetHandle, index: Option<usize>, value: Value) {
        self.write_slot(handle.0 as usize, index, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frameline_api_core::PropertyFlags;

    fn bag() -> PropertyBag {
        let mut bag = PropertyBag::new();
        bag.define("Opacity", Value::Float(1.0));
        bag.define_with("Id", Value::Int(7), PropertyFlags::READ_ONLY);
        bag.define_list("Points", ValueKind::Vec2, vec![Value::vec2(0.0, 0.0); 2]);
        bag
    }

    #[test]
    fn binds_plain_and_indexed_properties() {
        let mut bag = bag();
        let b = bind_property(&mut bag, "Opacity", ValueKind::Float).unwrap();
        assert_eq!(b.index, None);
        let b = bind_property(&mut bag, "Points[1]", ValueKind::Vec2).unwrap();
        assert_eq!(b.index, Some(1));
    }

    #[test]
    fn reports_each_failure_kind() {
        let mut bag = bag();
        assert!(matches!(
            bind_property(&mut bag, "Op acity", ValueKind::Float),
            Err(BindFailure::InvalidPath(_))
        ));
        assert_eq!(
            bind_property(&mut bag, "Missing", ValueKind::Float),
            Err(BindFailure::MissingProperty)
        );
        assert_eq!(
            bind_property(&mut bag, "Id", ValueKind::Int),
            Err(BindFailure::ReadOnly)
        );
        assert_eq!(
            bind_property(&mut bag, "Opacity", ValueKind::Vec2),
            Err(BindFailure::KindMismatch {
                expected: ValueKind::Vec2,
                actual: ValueKind::Float
            })
        );
        assert_eq!(
            bind_property(&mut bag, "Opacity[0]", ValueKind::Float),
            Err(BindFailure::NotIndexable)
        );
        assert_eq!(
            bind_property(&mut bag, "Points[2]", ValueKind::Vec2),
            Err(BindFailure::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn failures_render_readable_messages() {
        assert_eq!(BindFailure::MissingProperty.to_string(), "property not found");
        assert_eq!(
            BindFailure::IndexOutOfRange { index: 3, len: 2 }.to_string(),
            "index 3 out of range (len 2)"
        );
        assert_eq!(
            BindFailure::KindMismatch {
                expected: ValueKind::Vec2,
                actual: ValueKind::Float
            }
            .to_string(),
            "kind mismatch: animator Vec2, property Float"
        );
        let err: &dyn std::error::Error = &BindFailure::ReadOnly;
        assert!(err.source().is_none());
    }

    #[test]
    fn fired_triggers_collect_in_order() {
        let mut fired: Vec<FiredTrigger> = Vec::new();
        fired.on_trigger("Trigger", 0.0);
        fired.on_trigger("Trigger", 0.01);
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[1].time_correction, 0.01);
    }
}
