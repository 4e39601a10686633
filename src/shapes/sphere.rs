use std::collections::HashMap;

use crate::scene::triangle_figure::{Face, TriangleFigure};
use crate::shapes::platonic;

/// Sphere built by bisecting an icosahedron's faces `n` times, normalizing
/// new vertices back onto the unit sphere after each pass. Shared edges
/// are deduplicated so each new midpoint is created once.
pub fn sphere(n: u32) -> TriangleFigure {
    let mut figure = platonic::icosahedron();

    for _ in 0..n {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut new_faces = Vec::with_capacity(figure.faces.len() * 4);

        let faces = figure.faces.clone();
        for face in &faces {
            let [a, b, c] = face.indices();
            let ab = midpoint(&mut figure, &mut midpoints, a, b);
            let bc = midpoint(&mut figure, &mut midpoints, b, c);
            let ca = midpoint(&mut figure, &mut midpoints, c, a);
            new_faces.push(Face::new(a, ab, ca));
            new_faces.push(Face::new(b, bc, ab));
            new_faces.push(Face::new(c, ca, bc));
            new_faces.push(Face::new(ab, bc, ca));
        }

        figure.faces = new_faces;
    }

    figure
}

fn midpoint(figure: &mut TriangleFigure, cache: &mut HashMap<(u32, u32), u32>, a: u32, b: u32) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&idx) = cache.get(&key) {
        return idx;
    }
    let mid = ((figure.points[a as usize] + figure.points[b as usize]) / 2.).normalize();
    figure.points.push(mid);
    let idx = figure.points.len() as u32 - 1;
    cache.insert(key, idx);
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_vertex_lands_on_the_unit_sphere() {
        let s = sphere(3);
        for p in &s.points {
            assert!((p.length() - 1.).abs() < 1e-5);
        }
    }

    #[test]
    fn subdividing_quadruples_face_count_each_step() {
        let base = platonic::icosahedron().faces.len();
        let s = sphere(3);
        assert_eq!(s.faces.len(), base * 4usize.pow(3));
    }
}
