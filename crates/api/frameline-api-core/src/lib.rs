//! frameline-api-core: shared value model, property paths and a reference
//! dynamic object model (engine-agnostic).

pub mod bag;
pub mod math;
pub mod property_path;
pub mod value;

pub use bag::{PropertyBag, PropertyFlags, Slot, SlotData};
pub use math::{Color4, Matrix44, Quaternion, Thickness, Vector2, Vector3};
pub use property_path::{PathError, PathSegment, PropertyPath};
pub use value::{Value, ValueKind};
