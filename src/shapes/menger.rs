use glam::Vec3;

use crate::scene::triangle_figure::{Face, TriangleFigure};
use crate::shapes::platonic;

/// Menger sponge built by recursively removing the center subcube and the
/// 6 face-center subcubes from each 3x3x3 subdivision, `depth` times.
/// Surviving subcubes are emitted as independent unit cubes (faces shared
/// between touching subcubes are duplicated rather than welded — a
/// simplification the rasterizer doesn't notice since those faces never
/// face the camera and each other at once).
pub fn menger_sponge(depth: u32) -> TriangleFigure {
    let unit = platonic::cube();
    let mut points = Vec::new();
    let mut faces = Vec::new();
    recurse(&unit, Vec3::ZERO, 1., depth, &mut points, &mut faces);
    TriangleFigure::new(points, faces)
}

fn is_kept(x: i32, y: i32, z: i32) -> bool {
    let zero_count = [x, y, z].iter().filter(|&&c| c == 0).count();
    zero_count < 2
}

fn recurse(unit: &TriangleFigure, center: Vec3, scale: f32, depth: u32, points: &mut Vec<Vec3>, faces: &mut Vec<Face>) {
    if depth == 0 {
        let base = points.len() as u32;
        points.extend(unit.points.iter().map(|p| center + *p * scale));
        faces.extend(unit.faces.iter().map(|f| Face::new(base + f.a, base + f.b, base + f.c)));
        return;
    }
    let third = scale / 3.;
    for x in -1..=1 {
        for y in -1..=1 {
            for z in -1..=1 {
                if !is_kept(x, y, z) {
                    continue;
                }
                let offset = Vec3::new(x as f32, y as f32, z as f32) * 2. * third;
                recurse(unit, center + offset, third, depth - 1, points, faces);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_is_a_single_cube() {
        let f = menger_sponge(0);
        assert_eq!(f.faces.len(), platonic::cube().faces.len());
    }

    #[test]
    fn one_level_keeps_twenty_of_twenty_seven_subcubes() {
        let base_faces = platonic::cube().faces.len();
        let f = menger_sponge(1);
        assert_eq!(f.faces.len(), base_faces * 20);
    }
}
