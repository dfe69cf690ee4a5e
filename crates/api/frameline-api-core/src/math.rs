//! Plain value types animated by the engine. They convert losslessly to and
//! from the array payloads carried by [`Value`].

use serde::{Deserialize, Serialize};

use crate::Value;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// RGBA color with components in 0..1.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4 {
    pub const WHITE: Color4 = Color4::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color4 = Color4::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Rotation quaternion (x, y, z, w).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians around the (unit) `axis`.
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Row-major 4x4 matrix.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix44 {
    pub m: [f32; 16],
}

impl Matrix44 {
    pub const IDENTITY: Matrix44 = Matrix44 {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.m[12] = x;
        out.m[13] = y;
        out.m[14] = z;
        out
    }
}

impl Default for Matrix44 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-edge rectangle thickness (padding/margins).
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Thickness {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Thickness {
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub const fn uniform(v: f32) -> Self {
        Self::new(v, v, v, v)
    }
}

impl From<Vector2> for Value {
    fn from(v: Vector2) -> Self {
        Value::Vec2([v.x, v.y])
    }
}

impl From<Vector3> for Value {
    fn from(v: Vector3) -> Self {
        Value::Vec3([v.x, v.y, v.z])
    }
}

impl From<Color4> for Value {
    fn from(c: Color4) -> Self {
        Value::ColorRgba([c.r, c.g, c.b, c.a])
    }
}

impl From<Quaternion> for Value {
    fn from(q: Quaternion) -> Self {
        Value::Quat(q.to_array())
    }
}

impl From<Matrix44> for Value {
    fn from(m: Matrix44) -> Self {
        Value::Matrix44(m.m)
    }
}

impl From<Thickness> for Value {
    fn from(t: Thickness) -> Self {
        Value::Thickness([t.left, t.right, t.top, t.bottom])
    }
}

impl TryFrom<&Value> for Vector2 {
    type Error = ();
    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Vec2(a) => Ok(Vector2::new(a[0], a[1])),
            _ => Err(()),
        }
    }
}

impl TryFrom<&Value> for Vector3 {
    type Error = ();
    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Vec3(a) => Ok(Vector3::new(a[0], a[1], a[2])),
            _ => Err(()),
        }
    }
}

impl TryFrom<&Value> for Color4 {
    type Error = ();
    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::ColorRgba(a) => Ok(Color4::new(a[0], a[1], a[2], a[3])),
            _ => Err(()),
        }
    }
}

impl TryFrom<&Value> for Quaternion {
    type Error = ();
    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Quat(a) => Ok(Quaternion::from_array(*a)),
            _ => Err(()),
        }
    }
}

impl TryFrom<&Value> for Matrix44 {
    type Error = ();
    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Matrix44(m) => Ok(Matrix44 { m: *m }),
            _ => Err(()),
        }
    }
}

impl TryFrom<&Value> for Thickness {
    type Error = ();
    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Thickness(a) => Ok(Thickness::new(a[0], a[1], a[2], a[3])),
            _ => Err(()),
        }
    }
}
