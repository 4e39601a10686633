use glam::Vec3;

use crate::scene::triangle_figure::{Face, TriangleFigure};

pub fn cube() -> TriangleFigure {
    let points = vec![
        Vec3::new(1., -1., -1.),
        Vec3::new(-1., 1., -1.),
        Vec3::new(1., 1., 1.),
        Vec3::new(-1., -1., 1.),
        Vec3::new(1., 1., -1.),
        Vec3::new(-1., -1., -1.),
        Vec3::new(1., -1., 1.),
        Vec3::new(-1., 1., 1.),
    ];
    let faces = vec![
        Face::new(0, 4, 2),
        Face::new(0, 2, 6),
        Face::new(4, 1, 7),
        Face::new(4, 7, 2),
        Face::new(1, 5, 3),
        Face::new(1, 3, 7),
        Face::new(5, 0, 6),
        Face::new(5, 6, 3),
        Face::new(6, 2, 7),
        Face::new(6, 7, 3),
        Face::new(0, 5, 1),
        Face::new(0, 1, 4),
    ];
    TriangleFigure::new(points, faces)
}

pub fn tetrahedron() -> TriangleFigure {
    let points = vec![Vec3::new(1., -1., -1.), Vec3::new(-1., 1., -1.), Vec3::new(1., 1., 1.), Vec3::new(-1., -1., 1.)];
    let faces = vec![Face::new(0, 1, 2), Face::new(1, 3, 2), Face::new(0, 3, 1), Face::new(0, 2, 3)];
    TriangleFigure::new(points, faces)
}

pub fn octahedron() -> TriangleFigure {
    let points = vec![
        Vec3::new(1., 0., 0.),
        Vec3::new(0., 1., 0.),
        Vec3::new(-1., 0., 0.),
        Vec3::new(0., -1., 0.),
        Vec3::new(0., 0., -1.),
        Vec3::new(0., 0., 1.),
    ];
    let faces = vec![
        Face::new(0, 1, 5),
        Face::new(1, 2, 5),
        Face::new(2, 3, 5),
        Face::new(3, 0, 5),
        Face::new(1, 0, 4),
        Face::new(2, 1, 4),
        Face::new(3, 2, 4),
        Face::new(0, 3, 4),
    ];
    TriangleFigure::new(points, faces)
}

/// Icosahedron with the standard golden-ratio vertex construction.
pub fn icosahedron() -> TriangleFigure {
    let phi = (1. + 5f32.sqrt()) / 2.;
    let points = [
        (0., phi, 1.), (0., phi, -1.), (0., -phi, 1.), (0., -phi, -1.),
        (1., 0., phi), (-1., 0., phi), (1., 0., -phi), (-1., 0., -phi),
        (phi, 1., 0.), (-phi, 1., 0.), (phi, -1., 0.), (-phi, -1., 0.),
    ]
    .into_iter()
    .map(|(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();

    let faces = vec![
        Face::new(0, 1, 8), Face::new(0, 9, 1), Face::new(0, 4, 5), Face::new(0, 5, 9), Face::new(0, 8, 4),
        Face::new(1, 6, 8), Face::new(1, 7, 6), Face::new(1, 9, 7), Face::new(2, 3, 11), Face::new(2, 4, 10),
        Face::new(2, 5, 4), Face::new(2, 10, 3), Face::new(2, 11, 5), Face::new(3, 6, 7), Face::new(3, 7, 11),
        Face::new(3, 10, 6), Face::new(4, 8, 10), Face::new(5, 11, 9), Face::new(6, 10, 8), Face::new(7, 9, 11),
    ];
    TriangleFigure::new(points, faces)
}

/// Regular dodecahedron, built as the dual of the icosahedron (one vertex
/// per icosahedron face, at the face centroid normalized to unit length).
pub fn dodecahedron() -> TriangleFigure {
    let ico = icosahedron();
    let points: Vec<Vec3> = ico
        .faces
        .iter()
        .map(|f| {
            let [a, b, c] = f.indices().map(|i| ico.points[i as usize]);
            ((a + b + c) / 3.).normalize()
        })
        .collect();

    // Each icosahedron vertex is shared by 5 faces; the dodecahedron face
    // at that vertex is the (convex, CCW-ish) fan of those 5 dual points.
    let mut pentagon_faces: Vec<Vec<u32>> = vec![Vec::new(); ico.points.len()];
    for (face_idx, face) in ico.faces.iter().enumerate() {
        for v in face.indices() {
            pentagon_faces[v as usize].push(face_idx as u32);
        }
    }

    let mut faces = Vec::new();
    for (vertex_idx, fan) in pentagon_faces.into_iter().enumerate() {
        if fan.len() != 5 {
            continue;
        }
        let center = ico.points[vertex_idx];
        let mut fan = fan;
        fan.sort_by(|&a, &b| {
            let va = points[a as usize] - center;
            let vb = points[b as usize] - center;
            angle_around(center, va).partial_cmp(&angle_around(center, vb)).unwrap()
        });
        for i in 1..fan.len() - 1 {
            faces.push(Face::new(fan[0], fan[i], fan[i + 1]));
        }
    }

    TriangleFigure::new(points, faces)
}

pub(crate) fn angle_around(axis: Vec3, v: Vec3) -> f32 {
    let helper = if axis.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let u = axis.cross(helper).normalize();
    let w = axis.cross(u);
    f32::atan2(v.dot(w), v.dot(u))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_eight_points_and_twelve_faces() {
        let c = cube();
        assert_eq!(c.points.len(), 8);
        assert_eq!(c.faces.len(), 12);
    }

    #[test]
    fn icosahedron_vertices_are_unit_length() {
        let ico = icosahedron();
        for p in &ico.points {
            assert!((p.length() - 1.).abs() < 1e-5);
        }
        assert_eq!(ico.faces.len(), 20);
    }

    #[test]
    fn dodecahedron_has_twelve_pentagonal_faces_worth_of_triangles() {
        let dodeca = dodecahedron();
        assert_eq!(dodeca.points.len(), 20);
        assert_eq!(dodeca.faces.len(), 12 * 3);
    }
}
