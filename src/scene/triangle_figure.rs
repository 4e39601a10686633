use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};

use crate::geometry::rect::Rect;
use crate::maths::Color;
use crate::scene::texture::Texture;

/// Indices into `TriangleFigure::points` (and, unless `separate_uv`, also
/// into `uvs`).
#[derive(Debug, Clone, Copy)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Face {
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    pub fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }
}

/// A mesh of triangles plus its material and shading flags. See spec.md
/// §3's `TriangleFigure` entity.
#[derive(Debug, Clone)]
pub struct TriangleFigure {
    pub points: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub texture: Option<Arc<Texture>>,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    pub reflection: f32,
    /// `normals.len() == faces.len()` when true, else `== points.len()`.
    pub face_normals: bool,
    pub can_cull: bool,
    pub clipped: bool,
    pub separate_uv: bool,
}

impl TriangleFigure {
    pub fn new(points: Vec<Vec3>, faces: Vec<Face>) -> Self {
        Self {
            points,
            uvs: Vec::new(),
            normals: Vec::new(),
            faces,
            texture: None,
            ambient: Color::new(1., 1., 1.),
            diffuse: Color::BLACK,
            specular: Color::BLACK,
            reflection: 0.,
            face_normals: false,
            can_cull: true,
            clipped: false,
            separate_uv: false,
        }
    }

    pub fn face_normal(&self, face_index: usize) -> Vec3 {
        if self.face_normals {
            self.normals[face_index]
        } else {
            let f = self.faces[face_index];
            let n = self.normals[f.a as usize] + self.normals[f.b as usize] + self.normals[f.c as usize];
            n.normalize_or_zero()
        }
    }

    pub fn transform(&mut self, m: Mat4) {
        for p in &mut self.points {
            *p = m.transform_point3(*p);
        }
        let normal_mat = m.inverse().transpose();
        for n in &mut self.normals {
            *n = normal_mat.transform_vector3(*n).normalize_or_zero();
        }
    }

    /// Projected 2D bounds of the figure. Per spec.md §4.2: once
    /// `clipped`, some points may be orphaned by the clip, so iterate
    /// surviving faces, not all points.
    pub fn bounds_projected(&self, project: impl Fn(Vec3) -> Vec2) -> Option<Rect> {
        let mut iter: Box<dyn Iterator<Item = Vec3>> = if self.clipped {
            Box::new(
                self.faces
                    .iter()
                    .flat_map(|f| f.indices())
                    .map(|i| self.points[i as usize]),
            )
        } else {
            Box::new(self.points.iter().copied())
        };

        let first = iter.next()?;
        let mut rect = Rect::point(project(first));
        for p in iter {
            rect.extend(project(p));
        }
        Some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_projected_ignores_orphans_when_clipped() {
        let mut fig = TriangleFigure::new(
            vec![
                Vec3::new(-1., -1., -1.),
                Vec3::new(1., -1., -1.),
                Vec3::new(0., 1., -1.),
                Vec3::new(1000., 1000., -1.), // orphaned by a hypothetical clip
            ],
            vec![Face::new(0, 1, 2)],
        );
        fig.clipped = true;
        let rect = fig.bounds_projected(crate::maths::project).unwrap();
        assert!(rect.max.x < 10.);
    }
}
