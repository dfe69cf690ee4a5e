//! Interpolation helpers:
//! - lerp (scalar and fixed arrays)
//! - catmull_rom (uniform Catmull-Rom through p1..p2)
//! - slerp_quat (spherical lerp with shortest-arc correction)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_array<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
    let mut out = a;
    for i in 0..N {
        out[i] = lerp_f32(a[i], b[i], t);
    }
    out
}

/// Uniform Catmull-Rom segment between `p1` (t = 0) and `p2` (t = 1), with
/// `p0`/`p3` as the outer neighbours shaping the tangents.
#[inline]
pub fn catmull_rom(t: f32, p0: f32, p1: f32, p2: f32, p3: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    p1 + 0.5
        * ((p2 - p0) * t
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
            + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

#[inline]
pub fn catmull_rom_array<const N: usize>(
    t: f32,
    p0: [f32; N],
    p1: [f32; N],
    p2: [f32; N],
    p3: [f32; N],
) -> [f32; N] {
    let mut out = p1;
    for i in 0..N {
        out[i] = catmull_rom(t, p0[i], p1[i], p2[i], p3[i]);
    }
    out
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
fn normalize4(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        for c in &mut q {
            *c *= inv_len;
        }
    }
    q
}

/// Quaternion SLERP (x,y,z,w) with shortest-arc correction.
/// Falls back to normalized lerp when the inputs are nearly parallel.
pub fn slerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    let mut d = dot4(a, b);
    if d < 0.0 {
        for c in &mut b {
            *c = -*c;
        }
        d = -d;
    }
    if d > 0.9995 {
        return normalize4(lerp_array(a, b, t));
    }
    let theta = d.clamp(-1.0, 1.0).acos();
    let sin_theta = theta.sin();
    let wa = ((1.0 - t) * theta).sin() / sin_theta;
    let wb = (t * theta).sin() / sin_theta;
    [
        a[0] * wa + b[0] * wb,
        a[1] * wa + b[1] * wb,
        a[2] * wa + b[2] * wb,
        a[3] * wa + b[3] * wb,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
    }

    #[test]
    fn catmull_rom_passes_through_control_points() {
        approx(catmull_rom(0.0, -3.0, 1.0, 4.0, 9.0), 1.0, 1e-6);
        approx(catmull_rom(1.0, -3.0, 1.0, 4.0, 9.0), 4.0, 1e-5);
    }

    #[test]
    fn catmull_rom_on_a_line_is_linear() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            approx(catmull_rom(t, 0.0, 1.0, 2.0, 3.0), 1.0 + t, 1e-5);
        }
    }

    #[test]
    fn slerp_halfway_about_z() {
        let half = std::f32::consts::FRAC_PI_4;
        let a = [0.0, 0.0, 0.0, 1.0];
        // 90 degrees about Z
        let b = [0.0, 0.0, (half).sin(), (half).cos()];
        let q = slerp_quat(a, b, 0.5);
        // 45 degrees about Z
        let expect = (std::f32::consts::FRAC_PI_8).sin();
        approx(q[2], expect, 1e-5);
        approx(dot4(q, q), 1.0, 1e-5);
    }

    #[test]
    fn slerp_takes_shortest_arc() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let b = [0.0, 0.0, 0.0, -1.0];
        let q = slerp_quat(a, b, 0.5);
        approx(q[3].abs(), 1.0, 1e-5);
    }
}
