pub mod buckyball;
pub mod cylinder_cone;
pub mod fractal;
pub mod menger;
pub mod platonic;
pub mod sphere;
pub mod thicken;
pub mod torus;
pub mod wavefront;

use glam::{Mat4, Vec3};

/// `rotateX/Y/Z` (degrees) · `scale` · `center`, applied in that order,
/// matching spec.md §6's `[FigureN]` transform keys.
#[derive(Debug, Clone, Copy)]
pub struct FigureTransform {
    pub rotate_deg: Vec3,
    pub scale: f32,
    pub center: Vec3,
}

impl Default for FigureTransform {
    fn default() -> Self {
        Self {
            rotate_deg: Vec3::ZERO,
            scale: 1.,
            center: Vec3::ZERO,
        }
    }
}

impl FigureTransform {
    pub fn matrix(&self) -> Mat4 {
        let r = Vec3::new(
            self.rotate_deg.x.to_radians(),
            self.rotate_deg.y.to_radians(),
            self.rotate_deg.z.to_radians(),
        );
        Mat4::from_translation(self.center)
            * Mat4::from_rotation_z(r.z)
            * Mat4::from_rotation_y(r.y)
            * Mat4::from_rotation_x(r.x)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}
