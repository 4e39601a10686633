use std::io::BufRead;

use glam::{Vec2, Vec3};
use obj::raw::object::Polygon;

use crate::error::{EngineError, EngineResult};
use crate::scene::triangle_figure::{Face, TriangleFigure};

/// Loads a Wavefront `.obj` mesh. Polygons with more than 3 vertices are
/// fan-triangulated. `obj-rs`'s raw parser already resolves relative
/// (negative) vertex/uv/normal references to absolute indices, so callers
/// never see a negative index here (see DESIGN.md Open Question 1).
pub fn load_obj(input: impl BufRead) -> EngineResult<TriangleFigure> {
    let raw = obj::raw::parse_obj(input).map_err(|e| EngineError::Parse(format!("invalid OBJ: {e}")))?;

    let positions: Vec<Vec3> = raw.positions.iter().map(|&(x, y, z, _)| Vec3::new(x, y, z)).collect();
    let raw_tex_coords: Vec<Vec2> = raw.tex_coords.iter().map(|&(u, v, _)| Vec2::new(u, v)).collect();
    let raw_normals: Vec<Vec3> = raw.normals.iter().map(|&(x, y, z)| Vec3::new(x, y, z)).collect();

    // `faces`/`face_normal()`/shading all index by position, but `vt`/`vn`
    // have their own index space (a cube has 8 positions and 6 normals).
    // Resolve each polygon vertex's (position, uv)/(position, normal) pair
    // down into arrays keyed by position index instead of keeping the raw
    // `vt`/`vn` index, so `uvs`/`normals` stay the same length as `points`.
    // A position referenced with more than one normal/uv across faces (hard
    // edges, uv seams) keeps whichever one was written last.
    let mut uvs = vec![Vec2::ZERO; positions.len()];
    let mut normals = vec![Vec3::ZERO; positions.len()];
    let mut faces = Vec::new();
    let mut has_uv = false;
    let mut has_normals = false;

    for polygon in &raw.polygons {
        let indices: Vec<usize> = match polygon {
            Polygon::P(p) => p.clone(),
            Polygon::PT(p) => {
                has_uv = true;
                for &(pi, ti) in p {
                    uvs[pi] = raw_tex_coords[ti];
                }
                p.iter().map(|&(pi, _)| pi).collect()
            }
            Polygon::PN(p) => {
                has_normals = true;
                for &(pi, ni) in p {
                    normals[pi] = raw_normals[ni];
                }
                p.iter().map(|&(pi, _)| pi).collect()
            }
            Polygon::PTN(p) => {
                has_uv = true;
                has_normals = true;
                for &(pi, ti, ni) in p {
                    uvs[pi] = raw_tex_coords[ti];
                    normals[pi] = raw_normals[ni];
                }
                p.iter().map(|&(pi, _, _)| pi).collect()
            }
        };
        if indices.len() < 3 {
            continue;
        }
        for i in 1..indices.len() - 1 {
            faces.push(Face::new(indices[0] as u32, indices[i] as u32, indices[i + 1] as u32));
        }
    }

    let mut figure = TriangleFigure::new(positions, faces);
    if has_uv {
        figure.uvs = uvs;
    }
    if has_normals {
        figure.normals = normals;
    } else {
        figure.normals = vec![Vec3::ZERO; figure.points.len()];
        recompute_vertex_normals(&mut figure);
    }
    Ok(figure)
}

fn recompute_vertex_normals(figure: &mut TriangleFigure) {
    for face in &figure.faces {
        let [a, b, c] = face.indices().map(|i| figure.points[i as usize]);
        let n = (b - a).cross(c - a);
        for i in face.indices() {
            figure.normals[i as usize] += n;
        }
    }
    for n in &mut figure.normals {
        *n = n.normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn loads_a_triangle_and_recomputes_its_normal() {
        let obj_text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let figure = load_obj(Cursor::new(obj_text)).unwrap();
        assert_eq!(figure.points.len(), 3);
        assert_eq!(figure.faces.len(), 1);
        assert!((figure.normals[0] - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn fan_triangulates_a_quad() {
        let obj_text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let figure = load_obj(Cursor::new(obj_text)).unwrap();
        assert_eq!(figure.faces.len(), 2);
    }

    #[test]
    fn per_face_normals_resolve_into_per_position_array_even_when_counts_differ() {
        // 4 positions, only 2 distinct normals (shared across faces) — the
        // common case where #vn != #positions.
        let obj_text = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
                         vn 0 0 1\nvn 0 0 -1\n\
                         f 1//1 2//1 3//1\nf 1//2 3//2 4//2\n";
        let figure = load_obj(Cursor::new(obj_text)).unwrap();
        assert_eq!(figure.points.len(), 4);
        assert_eq!(figure.normals.len(), 4);
        assert!((figure.normals[0] - Vec3::Z).length() < 1e-5);
        assert!((figure.normals[2] - (-Vec3::Z)).length() < 1e-5);
    }

    #[test]
    fn negative_relative_indices_resolve_to_the_preceding_vertices() {
        let obj_text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let figure = load_obj(Cursor::new(obj_text)).unwrap();
        assert_eq!(figure.faces.len(), 1);
        assert_eq!(figure.faces[0].indices(), [0, 1, 2]);
    }
}
