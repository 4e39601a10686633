use glam::Vec3;

use crate::scene::triangle_figure::{Face, TriangleFigure};

/// Cylinder of unit radius along z, from 0 to `height`, approximated by
/// `n` sides with triangulated top/bottom caps.
pub fn cylinder(n: u32, height: f32) -> TriangleFigure {
    let mut points = Vec::with_capacity(n as usize * 2 + 2);
    for i in 0..n {
        let a = 2. * crate::maths::PI * i as f32 / n as f32;
        points.push(Vec3::new(a.cos(), a.sin(), 0.));
    }
    for i in 0..n {
        let a = 2. * crate::maths::PI * i as f32 / n as f32;
        points.push(Vec3::new(a.cos(), a.sin(), height));
    }
    let bottom_center = points.len() as u32;
    points.push(Vec3::new(0., 0., 0.));
    let top_center = points.len() as u32;
    points.push(Vec3::new(0., 0., height));

    let mut faces = Vec::new();
    for i in 0..n {
        let j = (i + 1) % n;
        faces.push(Face::new(i, j, n + i));
        faces.push(Face::new(j, n + j, n + i));
        faces.push(Face::new(bottom_center, j, i));
        faces.push(Face::new(top_center, n + i, n + j));
    }

    TriangleFigure::new(points, faces)
}

/// Cone of unit base radius along z, apex at `height`, approximated by
/// `n` sides with a triangulated base cap.
pub fn cone(n: u32, height: f32) -> TriangleFigure {
    let mut points = Vec::with_capacity(n as usize + 2);
    for i in 0..n {
        let a = 2. * crate::maths::PI * i as f32 / n as f32;
        points.push(Vec3::new(a.cos(), a.sin(), 0.));
    }
    let apex = points.len() as u32;
    points.push(Vec3::new(0., 0., height));
    let base_center = points.len() as u32;
    points.push(Vec3::new(0., 0., 0.));

    let mut faces = Vec::new();
    for i in 0..n {
        let j = (i + 1) % n;
        faces.push(Face::new(i, j, apex));
        faces.push(Face::new(base_center, j, i));
    }

    TriangleFigure::new(points, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_has_expected_triangle_count() {
        let c = cylinder(8, 2.);
        assert_eq!(c.faces.len(), 8 * 4);
    }

    #[test]
    fn cone_has_expected_triangle_count() {
        let c = cone(8, 2.);
        assert_eq!(c.faces.len(), 8 * 2);
    }
}
