pub mod light;
pub mod line_figure;
pub mod texture;
pub mod triangle_figure;

use glam::Vec3;

use crate::geometry::frustum::Frustum;
use crate::maths::Color;
use crate::scene::light::Lights;
use crate::scene::line_figure::LineFigure;
use crate::scene::triangle_figure::TriangleFigure;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pos: Vec3,
    pub dir: Vec3,
    pub frustum: Frustum,
}

/// A fully-constructed scene, ready for the core pipeline. Produced by
/// the scene loader (`crate::config`) or a shape generator
/// (`crate::shapes`); the core has no opinion about where it came from.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub figures: Vec<TriangleFigure>,
    /// Raw wireframe figures (`[FigureN] type = LineDrawing`). Read by
    /// `render::render_wireframe` (the `Wireframe`/`ZBufferedWireframe`
    /// modes); the lit z-buffered pipeline in `crate::render::render`
    /// doesn't consult it. `crate::config` converts L-system/line figures
    /// it needs lit and depth-tested into regular `TriangleFigure`s via
    /// `shapes::thicken` (`Thick*` figure types) instead of populating
    /// this field.
    pub lines: Vec<LineFigure>,
    pub lights: Lights,
    pub camera: Option<Camera>,
    pub background: Color,
    pub size: u32,
}
