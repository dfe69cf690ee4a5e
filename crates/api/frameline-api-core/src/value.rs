//! Value: runtime instances carried between animators and property targets.
//! All floating point payloads use f32.

use serde::{Deserialize, Serialize};

/// Lightweight kind enum used for binding checks and quick dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Float,
    Int,
    Bool,
    Vec2,
    Vec3,
    Quat,
    ColorRgba,
    Matrix44,
    Thickness,
    Text,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// Integer; interpolated results are rounded
    Int(i32),

    /// Boolean (step)
    Bool(bool),

    /// 2D vector
    Vec2([f32; 2]),

    /// 3D vector
    Vec3([f32; 3]),

    /// Quaternion (x, y, z, w)
    Quat([f32; 4]),

    /// RGBA color
    ColorRgba([f32; 4]),

    /// Row-major 4x4 matrix
    Matrix44([f32; 16]),

    /// Rectangle thickness (left, right, top, bottom)
    Thickness([f32; 4]),

    /// Text / string; step-only for interpolation
    Text(String),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Int(_) => ValueKind::Int,
            Value::Bool(_) => ValueKind::Bool,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Quat(_) => ValueKind::Quat,
            Value::ColorRgba(_) => ValueKind::ColorRgba,
            Value::Matrix44(_) => ValueKind::Matrix44,
            Value::Thickness(_) => ValueKind::Thickness,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Convenience constructors
    pub fn f(v: f32) -> Self {
        Value::Float(v)
    }

    pub fn vec2(x: f32, y: f32) -> Self {
        Value::Vec2([x, y])
    }

    pub fn vec3(x: f32, y: f32, z: f32) -> Self {
        Value::Vec3([x, y, z])
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Zero/default value for a kind. Used when a property is declared
    /// without an initial value.
    pub fn default_for(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Int => Value::Int(0),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Vec2 => Value::Vec2([0.0; 2]),
            ValueKind::Vec3 => Value::Vec3([0.0; 3]),
            ValueKind::Quat => Value::Quat([0.0, 0.0, 0.0, 1.0]),
            ValueKind::ColorRgba => Value::ColorRgba([0.0; 4]),
            ValueKind::Matrix44 => Value::Matrix44([0.0; 16]),
            ValueKind::Thickness => Value::Thickness([0.0; 4]),
            ValueKind::Text => Value::Text(String::new()),
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_and_data_tags() {
        let s = serde_json::to_string(&Value::Vec2([1.0, 2.0])).unwrap();
        assert_eq!(s, r#"{"type":"vec2","data":[1.0,2.0]}"#);
        let back: Value = serde_json::from_str(r#"{"type":"colorRgba","data":[1,0,0,1]}"#).unwrap();
        assert_eq!(back, Value::ColorRgba([1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn default_for_matches_kind() {
        for kind in [
            ValueKind::Float,
            ValueKind::Int,
            ValueKind::Bool,
            ValueKind::Vec2,
            ValueKind::Vec3,
            ValueKind::Quat,
            ValueKind::ColorRgba,
            ValueKind::Matrix44,
            ValueKind::Thickness,
            ValueKind::Text,
        ] {
            assert_eq!(Value::default_for(kind).kind(), kind);
        }
    }
}
