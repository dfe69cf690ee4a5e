//! Per-type interpolation.
//!
//! Every animated value type implements [`Animatable`]. `Steep` segments never
//! reach these hooks; `Linear` calls [`Animatable::interpolate_linear`] with
//! the two bracketing values, and `Spline`/`ClosedSpline` call
//! [`Animatable::interpolate_splined`] with the outer neighbours as well.
//! Types without a meaningful blend keep the defaults, which hold the left
//! value (and splines fall back to linear).

pub mod functions;

use frameline_api_core::{Color4, Matrix44, Quaternion, Thickness, Value, ValueKind, Vector2, Vector3};

use functions::{catmull_rom, catmull_rom_array, lerp_array, lerp_f32, slerp_quat};

pub trait Animatable: Clone + Default + std::fmt::Debug + 'static {
    /// Kind a bound property must declare to accept this type.
    const KIND: ValueKind;

    fn interpolate_linear(v2: &Self, _v3: &Self, _t: f32) -> Self {
        v2.clone()
    }

    fn interpolate_splined(_v1: &Self, v2: &Self, v3: &Self, _v4: &Self, t: f32) -> Self {
        Self::interpolate_linear(v2, v3, t)
    }

    fn into_value(self) -> Value;

    fn from_value(value: &Value) -> Option<Self>;
}

impl Animatable for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn interpolate_linear(v2: &Self, v3: &Self, t: f32) -> Self {
        lerp_f32(*v2, *v3, t)
    }

    fn interpolate_splined(v1: &Self, v2: &Self, v3: &Self, v4: &Self, t: f32) -> Self {
        catmull_rom(t, *v1, *v2, *v3, *v4)
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl Animatable for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn interpolate_linear(v2: &Self, v3: &Self, t: f32) -> Self {
        lerp_f32(*v2 as f32, *v3 as f32, t).round() as i32
    }

    fn interpolate_splined(v1: &Self, v2: &Self, v3: &Self, v4: &Self, t: f32) -> Self {
        catmull_rom(t, *v1 as f32, *v2 as f32, *v3 as f32, *v4 as f32).round() as i32
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl Animatable for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Animatable for String {
    const KIND: ValueKind = ValueKind::Text;

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

impl Animatable for Vector2 {
    const KIND: ValueKind = ValueKind::Vec2;

    fn interpolate_linear(v2: &Self, v3: &Self, t: f32) -> Self {
        Vector2::new(lerp_f32(v2.x, v3.x, t), lerp_f32(v2.y, v3.y, t))
    }

    fn interpolate_splined(v1: &Self, v2: &Self, v3: &Self, v4: &Self, t: f32) -> Self {
        Vector2::new(
            catmull_rom(t, v1.x, v2.x, v3.x, v4.x),
            catmull_rom(t, v1.y, v2.y, v3.y, v4.y),
        )
    }

    fn into_value(self) -> Value {
        self.into()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Vector2::try_from(value).ok()
    }
}

impl Animatable for Vector3 {
    const KIND: ValueKind = ValueKind::Vec3;

    fn interpolate_linear(v2: &Self, v3: &Self, t: f32) -> Self {
        Vector3::new(
            lerp_f32(v2.x, v3.x, t),
            lerp_f32(v2.y, v3.y, t),
            lerp_f32(v2.z, v3.z, t),
        )
    }

    fn interpolate_splined(v1: &Self, v2: &Self, v3: &Self, v4: &Self, t: f32) -> Self {
        let [x, y, z] = catmull_rom_array(
            t,
            [v1.x, v1.y, v1.z],
            [v2.x, v2.y, v2.z],
            [v3.x, v3.y, v3.z],
            [v4.x, v4.y, v4.z],
        );
        Vector3::new(x, y, z)
    }

    fn into_value(self) -> Value {
        self.into()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Vector3::try_from(value).ok()
    }
}

impl Animatable for Color4 {
    const KIND: ValueKind = ValueKind::ColorRgba;

    fn interpolate_linear(v2: &Self, v3: &Self, t: f32) -> Self {
        let [r, g, b, a] = lerp_array([v2.r, v2.g, v2.b, v2.a], [v3.r, v3.g, v3.b, v3.a], t);
        Color4::new(r, g, b, a)
    }

    fn into_value(self) -> Value {
        self.into()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Color4::try_from(value).ok()
    }
}

impl Animatable for Quaternion {
    const KIND: ValueKind = ValueKind::Quat;

    fn interpolate_linear(v2: &Self, v3: &Self, t: f32) -> Self {
        Quaternion::from_array(slerp_quat(v2.to_array(), v3.to_array(), t))
    }

    fn into_value(self) -> Value {
        self.into()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Quaternion::try_from(value).ok()
    }
}

impl Animatable for Matrix44 {
    const KIND: ValueKind = ValueKind::Matrix44;

    fn interpolate_linear(v2: &Self, v3: &Self, t: f32) -> Self {
        Matrix44 {
            m: lerp_array(v2.m, v3.m, t),
        }
    }

    fn into_value(self) -> Value {
        self.into()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Matrix44::try_from(value).ok()
    }
}

impl Animatable for Thickness {
    const KIND: ValueKind = ValueKind::Thickness;

    fn interpolate_linear(v2: &Self, v3: &Self, t: f32) -> Self {
        Thickness::new(
            lerp_f32(v2.left, v3.left, t),
            lerp_f32(v2.right, v3.right, t),
            lerp_f32(v2.top, v3.top, t),
            lerp_f32(v2.bottom, v3.bottom, t),
        )
    }

    fn interpolate_splined(v1: &Self, v2: &Self, v3: &Self, v4: &Self, t: f32) -> Self {
        Thickness::new(
            catmull_rom(t, v1.left, v2.left, v3.left, v4.left),
            catmull_rom(t, v1.right, v2.right, v3.right, v4.right),
            catmull_rom(t, v1.top, v2.top, v3.top, v4.top),
            catmull_rom(t, v1.bottom, v2.bottom, v3.bottom, v4.bottom),
        )
    }

    fn into_value(self) -> Value {
        self.into()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Thickness::try_from(value).ok()
    }
}
