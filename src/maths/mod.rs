pub use std::f32::consts::PI;

mod color;
pub use color::Color;

pub use glam::{Mat4, Vec2, Vec3};

/// Builds the world-to-eye transform for a camera at `pos` looking along
/// `dir`, plus its inverse (world space again) computed via the cheap
/// transpose trick rather than a general 4x4 inverse.
///
/// Fails only if `dir` has zero length.
pub fn look_at_direction(pos: Vec3, dir: Vec3) -> Option<(Mat4, Mat4)> {
    let r = dir.length();
    if r == 0. {
        return None;
    }

    let theta = f32::atan2(-dir.y, -dir.x);
    let phi = f32::acos(-dir.z / r);

    let mat_tr = Mat4::from_translation(-pos);
    let mat_rot = Mat4::from_rotation_z(-(theta + PI / 2.)) * Mat4::from_rotation_x(-phi);

    let forward = mat_rot * mat_tr;

    // mat_rot is a pure rotation: its inverse is its transpose. mat_tr's
    // inverse is translation by +pos. Composing avoids a general inverse.
    let inv_tr = Mat4::from_translation(pos);
    let inv = inv_tr * mat_rot.transpose();

    Some((forward, inv))
}

/// `(-p.x/p.z, -p.y/p.z)`. Caller must ensure `p.z != 0`.
pub fn project(p: Vec3) -> Vec2 {
    debug_assert!(p.z != 0., "projection undefined at z=0");
    Vec2::new(-p.x / p.z, -p.y / p.z)
}

/// Projects `p` into pixel coordinates given scale `d` and `offset`.
pub fn project_pixel(p: Vec3, d: f32, offset: Vec2) -> Vec2 {
    project(p) * d + offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_direction_fails_on_zero_vector() {
        assert!(look_at_direction(Vec3::ZERO, Vec3::ZERO).is_none());
    }

    #[test]
    fn look_at_direction_inverse_round_trips() {
        let pos = Vec3::new(1., 2., 13.);
        let dir = Vec3::new(-1., -2., -13.);
        let (forward, inv) = look_at_direction(pos, dir).unwrap();
        let round_trip = inv * forward;
        let id = Mat4::IDENTITY;
        for col in 0..4 {
            for row in 0..4 {
                assert!((round_trip.col(col)[row] - id.col(col)[row]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn project_round_trip() {
        let p = Vec3::new(0.3, -0.2, -5.);
        let d = 10.;
        let offset = Vec2::new(50., 50.);
        let px = project_pixel(p, d, offset);
        let back = (px - offset) / d;
        assert!((back.x - (-p.x / p.z)).abs() < 1e-5);
        assert!((back.y - (-p.y / p.z)).abs() < 1e-5);
    }
}
