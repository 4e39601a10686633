use glam::Vec3;

use crate::scene::triangle_figure::{Face, TriangleFigure};

/// Six-plane view frustum: near, far, vertical field of view, and
/// width/height aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    pub near: f32,
    pub far: f32,
    pub fov: f32,
    pub aspect: f32,
}

impl Frustum {
    pub fn new(near: f32, far: f32, fov: f32, aspect: f32) -> Self {
        debug_assert!(near > 0. && far > near);
        Self { near, far, fov, aspect }
    }

    /// Clips `figure` (already in eye space) against all six planes in
    /// order near, far, right, left, top, bottom. Triangles outside a
    /// plane are split, shrunk, or removed per spec.md §4.2. Sets
    /// `figure.clipped` if anything changed.
    pub fn clip(&self, figure: &mut TriangleFigure) {
        let n = self.near;
        let f = self.far;
        let t = (self.fov / 2.).tan() * n;
        let a = self.aspect;

        // near / far only depend on z, so `to.z`/`from.z` suffice.
        self.clip_plane(figure, |p| -p.z < n, move |from: Vec3, to: Vec3| (-n - to.z) / (from.z - to.z));
        self.clip_plane(figure, |p| -p.z > f, move |from: Vec3, to: Vec3| (-f - to.z) / (from.z - to.z));

        let g_right = move |p: Vec3| p.x * n + t * p.z;
        self.clip_plane(figure, move |p| g_right(p) > 0., move |from, to| {
            g_right(to) / (g_right(to) - g_right(from))
        });

        let g_left = move |p: Vec3| p.x * n - t * p.z;
        self.clip_plane(figure, move |p| g_left(p) < 0., move |from, to| {
            g_left(to) / (g_left(to) - g_left(from))
        });

        let t_a = t / a;
        let g_top = move |p: Vec3| p.y * n + t_a * p.z;
        self.clip_plane(figure, move |p| g_top(p) > 0., move |from, to| {
            g_top(to) / (g_top(to) - g_top(from))
        });

        let g_down = move |p: Vec3| p.y * n - t_a * p.z;
        self.clip_plane(figure, move |p| g_down(p) < 0., move |from, to| {
            g_down(to) / (g_down(to) - g_down(from))
        });
    }

    /// One clip pass. `outside` classifies a vertex; `param(from, to)`
    /// gives the interpolation parameter `s` such that the plane
    /// intersection is `to.lerp(from, s)`.
    fn clip_plane(
        &self,
        figure: &mut TriangleFigure,
        outside: impl Fn(Vec3) -> bool,
        param: impl Fn(Vec3, Vec3) -> f32,
    ) {
        let mut i = 0;
        while i < figure.faces.len() {
            let face = figure.faces[i];
            let [ia, ib, ic] = face.indices();
            let pa = figure.points[ia as usize];
            let pb = figure.points[ib as usize];
            let pc = figure.points[ic as usize];

            let oa = outside(pa);
            let ob = outside(pb);
            let oc = outside(pc);
            let code = (oa as u8) | (ob as u8) << 1 | (oc as u8) << 2;

            match code {
                0b000 => {
                    i += 1;
                }
                0b111 => {
                    figure.faces.swap_remove(i);
                    if figure.face_normals {
                        figure.normals.swap_remove(i);
                    }
                    figure.clipped = true;
                    // don't advance i: a different face now sits at i
                }
                // One vertex outside: split into two triangles.
                0b001 => {
                    self.split_one_outside(figure, i, ia, ib, ic, &param);
                    i += 1;
                }
                0b010 => {
                    self.split_one_outside(figure, i, ib, ic, ia, &param);
                    i += 1;
                }
                0b100 => {
                    self.split_one_outside(figure, i, ic, ia, ib, &param);
                    i += 1;
                }
                // Two vertices outside: shrink toward the one inside vertex.
                0b110 => {
                    self.shrink_two_outside(figure, i, ib, ic, ia, &param);
                    i += 1;
                }
                0b101 => {
                    self.shrink_two_outside(figure, i, ic, ia, ib, &param);
                    i += 1;
                }
                0b011 => {
                    self.shrink_two_outside(figure, i, ia, ib, ic, &param);
                    i += 1;
                }
                _ => unreachable!(),
            }
        }
    }

    /// `out` is the single outside vertex; `in1`, `in2` are the two
    /// inside vertices. Replaces face `i` with `(out', in1, in2)` and
    /// appends `(out'', out', in2)` where `out'`/`out''` are the two new
    /// vertices on the plane, producing a quad tessellated into two
    /// triangles.
    fn split_one_outside(
        &self,
        figure: &mut TriangleFigure,
        i: usize,
        out: u32,
        in1: u32,
        in2: u32,
        param: &impl Fn(Vec3, Vec3) -> f32,
    ) {
        let new_a = interpolate_vertex(figure, out, in1, param);
        let new_b = interpolate_vertex(figure, out, in2, param);
        figure.faces[i] = Face::new(new_a, in1, in2);
        figure.faces.push(Face::new(new_b, new_a, in2));
        if figure.face_normals {
            let n = figure.normals[i];
            figure.normals.push(n);
        }
        figure.clipped = true;
        figure.can_cull = false;
    }

    /// `out1`, `out2` are the two outside vertices; `keep` is the one
    /// inside vertex. Shrinks face `i` to `(keep, out1', out2')`.
    fn shrink_two_outside(
        &self,
        figure: &mut TriangleFigure,
        i: usize,
        out1: u32,
        out2: u32,
        keep: u32,
        param: &impl Fn(Vec3, Vec3) -> f32,
    ) {
        let new_a = interpolate_vertex(figure, out1, keep, param);
        let new_b = interpolate_vertex(figure, out2, keep, param);
        figure.faces[i] = Face::new(keep, new_a, new_b);
        figure.clipped = true;
        figure.can_cull = false;
    }
}

/// Pushes a new vertex at the plane intersection between `from` and `to`
/// (point indices), interpolating UV and vertex normal (renormalized)
/// when present, and returns its index.
fn interpolate_vertex(figure: &mut TriangleFigure, from: u32, to: u32, param: &impl Fn(Vec3, Vec3) -> f32) -> u32 {
    let p_from = figure.points[from as usize];
    let p_to = figure.points[to as usize];
    let s = param(p_from, p_to);
    let new_point = p_to.lerp(p_from, s);
    figure.points.push(new_point);
    let new_index = figure.points.len() as u32 - 1;

    if !figure.uvs.is_empty() && !figure.separate_uv {
        let uv = figure.uvs[to as usize].lerp(figure.uvs[from as usize], s);
        figure.uvs.push(uv);
    }

    if !figure.face_normals && !figure.normals.is_empty() {
        let n = figure.normals[to as usize].lerp(figure.normals[from as usize], s).normalize_or_zero();
        figure.normals.push(n);
    }

    new_index
}
