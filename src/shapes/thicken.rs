use glam::Vec3;

use crate::scene::line_figure::LineFigure;
use crate::scene::triangle_figure::{Face, TriangleFigure};

/// Turns each edge of a `LineFigure` into a solid cylindrical tube of the
/// given `radius` and `sides`, so wireframe figures (L-systems, line-based
/// shapes) can be rendered through the same lit, depth-tested triangle
/// path as everything else.
pub fn thicken(lines: &LineFigure, radius: f32, sides: u32) -> TriangleFigure {
    let mut points = Vec::with_capacity(lines.edges.len() * sides as usize * 2);
    let mut faces = Vec::with_capacity(lines.edges.len() * sides as usize * 2);

    for edge in &lines.edges {
        let a = lines.points[edge.a as usize];
        let b = lines.points[edge.b as usize];
        let axis = (b - a).normalize_or_zero();
        if axis == Vec3::ZERO {
            continue;
        }
        let helper = if axis.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        let u = axis.cross(helper).normalize();
        let w = axis.cross(u);

        let base = points.len() as u32;
        for i in 0..sides {
            let theta = 2. * crate::maths::PI * i as f32 / sides as f32;
            let offset = (u * theta.cos() + w * theta.sin()) * radius;
            points.push(a + offset);
        }
        for i in 0..sides {
            let theta = 2. * crate::maths::PI * i as f32 / sides as f32;
            let offset = (u * theta.cos() + w * theta.sin()) * radius;
            points.push(b + offset);
        }
        for i in 0..sides {
            let j = (i + 1) % sides;
            faces.push(Face::new(base + i, base + j, base + sides + i));
            faces.push(Face::new(base + j, base + sides + j, base + sides + i));
        }
    }

    TriangleFigure::new(points, faces)
}
