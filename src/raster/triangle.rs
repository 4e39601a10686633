use glam::{Vec2, Vec3};

use crate::raster::depth_buffer::{DepthBuffer, TaggedDepthBuffer};

/// Depth-replacement bias applied multiplicatively during rasterization
/// to avoid z-fighting between coplanar triangles.
pub const RASTER_BIAS: f32 = 1.00001;

/// Projects eye-space `p` to pixel coordinates using its own `d/-z`.
fn project_px(p: Vec3, d: f32, offset: Vec2) -> Vec2 {
    Vec2::new(p.x * (d / -p.z) + offset.x, p.y * (d / -p.z) + offset.y)
}

fn x_at(y: f32, p: Vec2, q: Vec2) -> f32 {
    q.x + (p.x - q.x) * (y - q.y) / (p.y - q.y)
}

/// Scans the triangle's covered pixels, computing linearly-interpolated
/// 1/z without per-pixel division, and calls `replace_fn(x, y, inv_z)`
/// for each. Implements spec.md §4.3.
fn scan_triangle(a: Vec3, b: Vec3, c: Vec3, d: f32, offset: Vec2, bias: f32, mut replace_fn: impl FnMut(u32, u32, f32)) {
    let (az, bz, cz) = (a.z, b.z, c.z);
    if az == 0. || bz == 0. || cz == 0. {
        return;
    }

    let mut inv_g_z = (bz * cz + az * cz + az * bz) / (3. * az * bz * cz);
    inv_g_z *= bias;

    let w = (b - a).cross(c - a);
    let dk = d * w.dot(a);
    if dk == 0. {
        return; // degenerate (edge-on) triangle
    }
    let dzdx = -w.x / dk;
    let dzdy = -w.y / dk;

    let pa = project_px(a, d, offset);
    let pb = project_px(b, d, offset);
    let pc = project_px(c, d, offset);
    let g_x = (pa.x + pb.x + pc.x) / 3.;
    let g_y = (pa.y + pb.y + pc.y) / 3.;

    let mut pts = [pa, pb, pc];
    pts.sort_by(|p, q| p.y.partial_cmp(&q.y).unwrap());
    let [top, mid, bot] = pts;

    let mut fill_range = |y0: f32, y1: f32, edge_a: (Vec2, Vec2), edge_b: (Vec2, Vec2)| {
        let from_y = y0.floor() as i64 + 1;
        let to_y = y1.floor() as i64;
        for y in from_y..=to_y {
            if y < 0 {
                continue;
            }
            let yf = y as f32;
            let xa = x_at(yf, edge_a.0, edge_a.1);
            let xb = x_at(yf, edge_b.0, edge_b.1);
            let (x_min, x_max) = if xa <= xb { (xa, xb) } else { (xb, xa) };
            let from_x = x_min.floor() as i64 + 1;
            let to_x = x_max.floor() as i64;
            for x in from_x..=to_x {
                if x < 0 {
                    continue;
                }
                let xf = x as f32;
                let inv_z = inv_g_z + (yf - g_y) * dzdy + (xf - g_x) * dzdx;
                replace_fn(x as u32, y as u32, inv_z);
            }
        }
    };

    fill_range(top.y, mid.y, (top, bot), (top, mid));
    fill_range(mid.y, bot.y, (top, bot), (mid, bot));
}

/// Rasterizes into a plain depth buffer, invoking `on_write` for every
/// pixel whose depth test passed. Used by the shadow prepass, which has
/// no id bookkeeping to do.
pub fn rasterize_triangle_depth(
    a: Vec3,
    b: Vec3,
    c: Vec3,
    d: f32,
    offset: Vec2,
    bias: f32,
    depth: &mut DepthBuffer,
    mut on_write: impl FnMut(u32, u32, f32),
) {
    scan_triangle(a, b, c, d, offset, bias, |x, y, inv_z| {
        if depth.in_bounds(x as i64, y as i64) && depth.replace(x, y, inv_z) {
            on_write(x, y, inv_z);
        }
    });
}

/// Rasterizes into a tagged depth buffer, recording `(figure_id,
/// triangle_id)` on every pixel whose depth test passed.
pub fn rasterize_triangle_tagged(
    a: Vec3,
    b: Vec3,
    c: Vec3,
    d: f32,
    offset: Vec2,
    bias: f32,
    tagged: &mut TaggedDepthBuffer,
    figure_id: u32,
    triangle_id: u32,
) {
    let (w, h) = (tagged.width(), tagged.height());
    scan_triangle(a, b, c, d, offset, bias, |x, y, inv_z| {
        if x < w && y < h {
            tagged.replace(x, y, inv_z, figure_id, triangle_id);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_matches_plane_interpolation_at_centroid() {
        let a = Vec3::new(-10., -10., -10.);
        let b = Vec3::new(10., -10., -10.);
        let c = Vec3::new(0., 10., -10.);
        let d = 5.;
        let offset = Vec2::new(50., 50.);
        let mut depth = DepthBuffer::new(100, 100);
        let expected = 1. / -10f32;
        rasterize_triangle_depth(a, b, c, d, offset, 1.0, &mut depth, |_, _, inv_z| {
            assert!((inv_z - expected).abs() / expected.abs() < 1e-3);
        });
    }

    #[test]
    fn covers_a_nonzero_area() {
        let a = Vec3::new(-10., -10., -10.);
        let b = Vec3::new(10., -10., -10.);
        let c = Vec3::new(0., 10., -10.);
        let mut depth = DepthBuffer::new(100, 100);
        let mut count = 0;
        rasterize_triangle_depth(a, b, c, 5., Vec2::new(50., 50.), 1.0, &mut depth, |_, _, _| count += 1);
        assert!(count > 100);
    }
}
