use glam::{Mat4, Vec2, Vec3};

use crate::maths::Color;
use crate::raster::depth_buffer::DepthBuffer;
use crate::scene::triangle_figure::TriangleFigure;

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Unit direction the light travels *toward* the scene.
    pub direction: Vec3,
    pub diffuse: Color,
    pub specular: Color,
}

/// Cache filled during the shadow prepass; lifetime is one render.
#[derive(Debug, Clone, Default)]
pub struct PointLightCache {
    pub light_eye: Option<Mat4>,
    pub depth: Option<DepthBuffer>,
    pub d: f32,
    pub offset: Vec2,
}

#[derive(Debug, Clone)]
pub struct PointLight {
    pub point: Vec3,
    pub diffuse: Color,
    pub specular: Color,
    /// Cosine of the spotlight half-angle; 1.0 disables the spot falloff
    /// (point behaves as omnidirectional within line-of-sight).
    pub spot_angle_cos: f32,
    pub casts_shadow: bool,
    pub cached: PointLightCache,
}

impl PointLight {
    pub fn new(point: Vec3, diffuse: Color, specular: Color) -> Self {
        Self {
            point,
            diffuse,
            specular,
            spot_angle_cos: -1.0,
            casts_shadow: false,
            cached: PointLightCache::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Lights {
    pub directional: Vec<DirectionalLight>,
    pub point: Vec<PointLight>,
    pub ambient: Color,
    pub eye: Mat4,
    pub inv_eye: Mat4,
    /// Accepted but never sampled; see DESIGN.md Open Question 3.
    pub cubemap: Option<()>,
    /// Resolution hint for shadow maps, typically a multiple of the
    /// output image size.
    pub shadow_mask: u32,
    pub shadows_enabled: bool,
    pub shadow_casters: Vec<TriangleFigure>,
}

impl Lights {
    pub fn any_shadow_casting_light(&self) -> bool {
        self.shadows_enabled && self.point.iter().any(|l| l.casts_shadow)
    }
}
