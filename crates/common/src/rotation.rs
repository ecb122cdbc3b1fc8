//! Axis-angle quaternions and their matrix form.
//!
//! The matrix conversion is written out term by term rather than delegated to
//! glam so the column order and sign conventions stay pinned to what the
//! instance wire format encodes; a test checks it against `Mat4::from_quat`.

use glam::{Mat4, Quat, Vec3, Vec4};

/// Quaternion for a rotation of `angle` radians about `axis`.
///
/// `axis` must already be unit length; no normalization is performed here.
pub fn axis_angle(axis: Vec3, angle: f32) -> Quat {
    let (s, c) = (angle * 0.5).sin_cos();
    Quat::from_xyzw(axis.x * s, axis.y * s, axis.z * s, c)
}

/// Homogeneous rotation matrix for a unit quaternion, via the double-angle
/// expansion.
pub fn rotation_matrix(q: Quat) -> Mat4 {
    let (x, y, z, w) = (q.x, q.y, q.z, q.w);
    let xx = 2.0 * x * x;
    let yy = 2.0 * y * y;
    let zz = 2.0 * z * z;
    let xy = 2.0 * x * y;
    let xz = 2.0 * x * z;
    let yz = 2.0 * y * z;
    let wx = 2.0 * w * x;
    let wy = 2.0 * w * y;
    let wz = 2.0 * w * z;
    Mat4::from_cols(
        Vec4::new(1.0 - yy - zz, xy + wz, xz - wy, 0.0),
        Vec4::new(xy - wz, 1.0 - xx - zz, yz + wx, 0.0),
        Vec4::new(xz + wy, yz - wx, 1.0 - xx - yy, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    )
}
