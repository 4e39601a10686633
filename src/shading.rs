use glam::{Mat2, Vec2, Vec3};

use crate::maths::Color;
use crate::scene::light::Lights;
use crate::scene::triangle_figure::TriangleFigure;

/// Bias subtracted from the surface's 1/z before comparing against a
/// light's shadow map; guards against self-shadowing from numerical
/// noise. See spec.md §4.5/GLOSSARY.
pub const SHADOW_BIAS: f32 = 1.5e-6;

/// Reconstructs the eye-space point whose projection lands at pixel
/// `(x, y)` with interpolated reciprocal depth `inv_z`.
pub fn reconstruct_point(x: f32, y: f32, inv_z: f32, d: f32, offset: Vec2) -> Vec3 {
    let denom = d * -inv_z;
    Vec3::new((x - offset.x) / denom, (y - offset.y) / denom, 1. / inv_z)
}

/// Per-pixel shading kernel of spec.md §4.6. `figure`/`triangle_index`
/// identify the covered triangle; `point` is the reconstructed eye-space
/// surface position.
pub fn shade_pixel(figure: &TriangleFigure, triangle_index: usize, point: Vec3, lights: &Lights) -> Color {
    let face = figure.faces[triangle_index];
    let mut n = figure.face_normal(triangle_index);
    let cam_dir = point.normalize_or_zero();

    if n.dot(cam_dir) > 0. {
        n = -n;
    }

    let mut color = figure.ambient * lights.ambient;

    for light in &lights.directional {
        let dot = n.dot(-light.direction);
        if dot > 0. {
            color += figure.diffuse * light.diffuse * dot;
            if figure.reflection > 0. {
                let r = n * (2. * dot) + light.direction;
                let rdot = r.dot(-cam_dir);
                if rdot > 0. {
                    color += figure.specular * light.specular * rdot.powf(figure.reflection);
                }
            }
        }
    }

    for light in &lights.point {
        let dir = (point - light.point).normalize_or_zero();
        let dot = n.dot(-dir);
        if dot <= 0. {
            continue;
        }
        if light.casts_shadow && lights.shadows_enabled && is_shadowed(point, light) {
            continue;
        }
        let falloff = (1. - (1. - dot) / (1. - light.spot_angle_cos)).max(0.);
        if falloff <= 0. {
            continue;
        }
        color += figure.diffuse * light.diffuse * falloff;
        if figure.reflection > 0. {
            let r = n * (2. * dot) + dir;
            let rdot = r.dot(-cam_dir);
            if rdot > 0. {
                color += figure.specular * light.specular * (rdot.powf(figure.reflection) * falloff);
            }
        }
    }

    if let Some(texture) = &figure.texture {
        if !figure.uvs.is_empty() {
            let a = figure.points[face.a as usize];
            let b = figure.points[face.b as usize];
            let c = figure.points[face.c as usize];
            if let Some((u, v)) = barycentric_uv(a, b, c, point) {
                let uv_a = figure.uvs[face.a as usize];
                let uv_b = figure.uvs[face.b as usize];
                let uv_c = figure.uvs[face.c as usize];
                let uv = uv_a + (uv_b - uv_a) * u + (uv_c - uv_a) * v;
                color = color * texture.get_clamped(uv.x, uv.y);
            }
        }
    }

    color.clamped()
}

/// Bilinearly samples `light`'s cached depth buffer at the projection of
/// `point_eye` (already in the main camera's eye space) and compares
/// against the surface's own depth, per spec.md §4.5.
fn is_shadowed(point_eye: Vec3, light: &crate::scene::light::PointLight) -> bool {
    let Some(light_eye) = light.cached.light_eye else {
        return false;
    };
    let Some(depth) = &light.cached.depth else {
        return false;
    };

    let p_light = light_eye.transform_point3(point_eye);
    if p_light.z == 0. {
        return false;
    }
    let surface_inv_z = 1. / p_light.z;

    let px = crate::maths::project_pixel(p_light, light.cached.d, light.cached.offset);
    let x0 = px.x.floor();
    let y0 = px.y.floor();
    let tx = px.x - x0;
    let ty = px.y - y0;

    let sample = |x: f32, y: f32| -> Option<f32> {
        if x < 0. || y < 0. {
            return None;
        }
        let (xu, yu) = (x as u32, y as u32);
        if xu >= depth.width || yu >= depth.height {
            return None;
        }
        Some(depth.get(xu, yu))
    };

    let (Some(d00), Some(d10), Some(d01), Some(d11)) = (sample(x0, y0), sample(x0 + 1., y0), sample(x0, y0 + 1.), sample(x0 + 1., y0 + 1.)) else {
        return false;
    };
    let stored = d00 * (1. - tx) * (1. - ty) + d10 * tx * (1. - ty) + d01 * (1. - tx) * ty + d11 * tx * ty;

    // Nearer surfaces have smaller (more negative) 1/z; the point is in
    // shadow if something closer to the light was recorded there.
    stored + SHADOW_BIAS < surface_inv_z
}

/// Barycentric (u, v) weights of `p` inside triangle `(a, b, c)`, solved
/// in whichever 2D projection (XY, XZ, YZ) has the largest-magnitude
/// determinant, for numerical stability.
fn barycentric_uv(a: Vec3, b: Vec3, c: Vec3, p: Vec3) -> Option<(f32, f32)> {
    let proj_xy = |v: Vec3| Vec2::new(v.x, v.y);
    let proj_xz = |v: Vec3| Vec2::new(v.x, v.z);
    let proj_yz = |v: Vec3| Vec2::new(v.y, v.z);

    let candidates: [fn(Vec3) -> Vec2; 3] = [proj_xy, proj_xz, proj_yz];
    let mut best: Option<(f32, fn(Vec3) -> Vec2)> = None;
    for proj in candidates {
        let (a2, b2, c2) = (proj(a), proj(b), proj(c));
        let mat = Mat2::from_cols(b2 - a2, c2 - a2);
        let det = mat.determinant();
        if best.map(|(d, _)| det.abs() > d.abs()).unwrap_or(true) {
            best = Some((det, proj));
        }
    }
    let (det, proj) = best?;
    if det.abs() < 1e-12 {
        return None;
    }

    let (a2, b2, c2) = (proj(a), proj(b), proj(c));
    let mat = Mat2::from_cols(b2 - a2, c2 - a2);
    let uv = mat.inverse() * (proj(p) - a2);
    Some((uv.x, uv.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::triangle_figure::Face;

    #[test]
    fn ambient_only_when_no_lights() {
        let mut fig = TriangleFigure::new(
            vec![Vec3::new(-1., -1., -5.), Vec3::new(1., -1., -5.), Vec3::new(0., 1., -5.)],
            vec![Face::new(0, 1, 2)],
        );
        fig.ambient = Color::new(1., 0., 0.);
        fig.normals = vec![Vec3::new(0., 0., 1.)];
        fig.face_normals = true;
        let lights = Lights {
            ambient: Color::new(1., 1., 1.),
            ..Default::default()
        };
        let color = shade_pixel(&fig, 0, Vec3::new(0., 0., -5.), &lights);
        assert_eq!(color, Color::new(1., 0., 0.));
    }

    #[test]
    fn barycentric_uv_recovers_vertex_weights() {
        let a = Vec3::new(0., 0., -5.);
        let b = Vec3::new(1., 0., -5.);
        let c = Vec3::new(0., 1., -5.);
        let (u, v) = barycentric_uv(a, b, c, a).unwrap();
        assert!(u.abs() < 1e-5 && v.abs() < 1e-5);
        let (u, v) = barycentric_uv(a, b, c, b).unwrap();
        assert!((u - 1.).abs() < 1e-5 && v.abs() < 1e-5);
    }
}
