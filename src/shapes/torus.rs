use glam::Vec3;

use crate::maths::PI;
use crate::scene::triangle_figure::{Face, TriangleFigure};

/// Torus centered at the origin, major radius `major` in the xy-plane,
/// tube radius `minor`, tessellated into `major_segments` x `minor_segments`
/// quads (each split into 2 triangles).
pub fn torus(major: f32, minor: f32, major_segments: u32, minor_segments: u32) -> TriangleFigure {
    let mut points = Vec::with_capacity((major_segments * minor_segments) as usize);
    let mut normals = Vec::with_capacity(points.capacity());

    for i in 0..major_segments {
        let u = 2. * PI * i as f32 / major_segments as f32;
        let (cu, su) = (u.cos(), u.sin());
        for j in 0..minor_segments {
            let v = 2. * PI * j as f32 / minor_segments as f32;
            let (cv, sv) = (v.cos(), v.sin());
            let ring = major + minor * cv;
            points.push(Vec3::new(ring * cu, ring * su, minor * sv));
            normals.push(Vec3::new(cv * cu, cv * su, sv));
        }
    }

    let idx = |i: u32, j: u32| i * minor_segments + (j % minor_segments);
    let mut faces = Vec::with_capacity((major_segments * minor_segments * 2) as usize);
    for i in 0..major_segments {
        let i2 = (i + 1) % major_segments;
        for j in 0..minor_segments {
            let j2 = j + 1;
            faces.push(Face::new(idx(i, j), idx(i2, j), idx(i2, j2)));
            faces.push(Face::new(idx(i, j), idx(i2, j2), idx(i, j2)));
        }
    }

    let mut figure = TriangleFigure::new(points, faces);
    figure.normals = normals;
    figure
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torus_vertex_count_matches_grid() {
        let t = torus(2., 0.5, 12, 8);
        assert_eq!(t.points.len(), 12 * 8);
        assert_eq!(t.faces.len(), 12 * 8 * 2);
    }

    #[test]
    fn torus_points_stay_within_major_plus_minor_radius() {
        let t = torus(2., 0.5, 12, 8);
        for p in &t.points {
            assert!(p.length() <= 2.5 + 1e-4);
        }
    }
}
