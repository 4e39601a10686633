use glam::Vec3;

use crate::scene::triangle_figure::{Face, TriangleFigure};
use crate::shapes::platonic;

/// Generic corner-replacement fractal: at each level, `base` is replaced
/// by one half-scale copy of itself at each of its own vertices,
/// recursing `depth` times. Matches the `[FigureN] type = Fractal*`
/// family (`FractalTetrahedron`, `FractalCube`, `FractalIcosahedron`, ...)
/// per spec.md §6 — every member shares this one construction, keyed only
/// by which platonic solid seeds it.
pub fn corner_fractal(base: TriangleFigure, depth: u32) -> TriangleFigure {
    let mut points = Vec::new();
    let mut faces = Vec::new();
    recurse(&base, Vec3::ZERO, 1., depth, &mut points, &mut faces);
    TriangleFigure::new(points, faces)
}

/// `corner_fractal(platonic::tetrahedron(), depth)`, the most common case.
pub fn sierpinski_tetrahedron(depth: u32) -> TriangleFigure {
    corner_fractal(platonic::tetrahedron(), depth)
}

fn recurse(unit: &TriangleFigure, center: Vec3, scale: f32, depth: u32, points: &mut Vec<Vec3>, faces: &mut Vec<Face>) {
    if depth == 0 {
        let base = points.len() as u32;
        points.extend(unit.points.iter().map(|p| center + *p * scale));
        faces.extend(unit.faces.iter().map(|f| Face::new(base + f.a, base + f.b, base + f.c)));
        return;
    }
    let half = scale / 2.;
    for corner in &unit.points {
        recurse(unit, center + *corner * half, half, depth - 1, points, faces);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_is_a_single_tetrahedron() {
        let f = sierpinski_tetrahedron(0);
        assert_eq!(f.faces.len(), platonic::tetrahedron().faces.len());
    }

    #[test]
    fn each_level_quadruples_the_copy_count() {
        let base_faces = platonic::tetrahedron().faces.len();
        let f = sierpinski_tetrahedron(2);
        assert_eq!(f.faces.len(), base_faces * 4 * 4);
    }

    #[test]
    fn corner_fractal_works_for_any_seed_solid() {
        let base_faces = platonic::cube().faces.len();
        let f = corner_fractal(platonic::cube(), 1);
        assert_eq!(f.faces.len(), base_faces * 8);
    }
}
