use std::collections::HashMap;

use crate::scene::triangle_figure::{Face, TriangleFigure};
use crate::shapes::platonic;

/// Truncated icosahedron ("buckyball"), approximated by trisecting each
/// icosahedron edge and cutting the corner off at each original vertex.
/// See DESIGN.md Open Question 2: the original engine's buckyball geometry
/// isn't pinned down anywhere reachable, so this derives it from the
/// icosahedron the same way `sphere` does, rather than hand-typing the
/// Archimedean solid's coordinates.
pub fn buckyball() -> TriangleFigure {
    let ico = platonic::icosahedron();

    // Two trisection points per edge, shared between the edge's two faces.
    let mut thirds: HashMap<(u32, u32), (u32, u32)> = HashMap::new();
    let mut points = ico.points.clone();

    let mut third_of = |points: &mut Vec<_>, a: u32, b: u32| -> (u32, u32) {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        if let Some(&t) = thirds.get(&(lo, hi)) {
            return if a == lo { t } else { (t.1, t.0) };
        }
        let pa = ico.points[lo as usize];
        let pb = ico.points[hi as usize];
        let near_lo = pa.lerp(pb, 1. / 3.);
        let near_hi = pa.lerp(pb, 2. / 3.);
        let i0 = points.len() as u32;
        points.push(near_lo);
        points.push(near_hi);
        thirds.insert((lo, hi), (i0, i0 + 1));
        if a == lo { (i0, i0 + 1) } else { (i0 + 1, i0) }
    };

    // Hexagonal face per original triangle: 6 trisection points, the
    // original corners clipped away.
    let mut faces = Vec::new();
    for f in &ico.faces {
        let [a, b, c] = f.indices();
        let (ab0, ab1) = third_of(&mut points, a, b);
        let (bc0, bc1) = third_of(&mut points, b, c);
        let (ca0, ca1) = third_of(&mut points, c, a);
        // Fan-triangulate the hexagon ab0,ab1,bc0,bc1,ca0,ca1.
        let hexagon = [ab0, ab1, bc0, bc1, ca0, ca1];
        for i in 1..hexagon.len() - 1 {
            faces.push(Face::new(hexagon[0], hexagon[i], hexagon[i + 1]));
        }
    }

    // Pentagonal cap at each original vertex, fanned from its incident
    // edges' near-trisection points, in the icosahedron's own
    // edge-winding order (each vertex has exactly 5 incident faces).
    let mut caps: Vec<Vec<u32>> = vec![Vec::new(); ico.points.len()];
    for f in &ico.faces {
        let [a, b, c] = f.indices();
        for &(v, prev, next) in &[(a, c, b), (b, a, c), (c, b, a)] {
            let (near, _) = third_of(&mut points, v, next);
            caps[v as usize].push(near);
            let _ = prev;
        }
    }
    for (vertex_idx, cap) in caps.iter().enumerate() {
        if cap.len() != 5 {
            continue;
        }
        let axis = ico.points[vertex_idx];
        let mut ordered = cap.clone();
        ordered.sort_by(|&i, &j| {
            let vi = points[i as usize] - axis * points[i as usize].dot(axis);
            let vj = points[j as usize] - axis * points[j as usize].dot(axis);
            platonic::angle_around(axis, vi).partial_cmp(&platonic::angle_around(axis, vj)).unwrap()
        });
        for i in 1..ordered.len() - 1 {
            faces.push(Face::new(ordered[0], ordered[i], ordered[i + 1]));
        }
    }

    let mut figure = TriangleFigure::new(points, faces);
    for p in &mut figure.points {
        *p = p.normalize();
    }
    figure
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckyball_vertices_land_on_the_unit_sphere() {
        let b = buckyball();
        for p in &b.points {
            assert!((p.length() - 1.).abs() < 1e-4);
        }
    }

    #[test]
    fn buckyball_has_hexagon_and_pentagon_faces() {
        let b = buckyball();
        // 20 hexagons (4 triangles each) + 12 pentagons (3 triangles each).
        assert_eq!(b.faces.len(), 20 * 4 + 12 * 3);
    }
}
