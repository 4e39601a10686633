use std::collections::HashSet;

use glam::{Vec2, Vec3};
use rayon::prelude::*;

use crate::geometry::rect::Rect;
use crate::image::Image;
use crate::maths::{look_at_direction, project, project_pixel, Color};
use crate::raster::depth_buffer::{DepthBuffer, TaggedDepthBuffer};
use crate::raster::lines::{draw_line, draw_line_z};
use crate::raster::triangle::{rasterize_triangle_depth, rasterize_triangle_tagged, RASTER_BIAS};
use crate::scene::triangle_figure::TriangleFigure;
use crate::scene::Scene;
use crate::shading::{reconstruct_point, shade_pixel};

/// `(image_width, image_height, d, offset)` from spec.md §4.4: scales the
/// larger axis of the projected bounds to `size` pixels and centers the
/// result so it occupies ~95% of the image.
pub fn image_parameters(bounds: Rect, size: u32) -> (u32, u32, f32, Vec2) {
    let size_x = bounds.width().max(1e-6);
    let size_y = bounds.height().max(1e-6);
    let img_s = size as f32 / size_x.max(size_y);
    let img_x = (size_x * img_s).round().max(1.) as u32;
    let img_y = (size_y * img_s).round().max(1.) as u32;
    let d = img_x as f32 / size_x * 0.95;
    let offset = Vec2::new(
        (img_x as f32 - d * (bounds.min.x + bounds.max.x)) / 2.,
        (img_y as f32 - d * (bounds.min.y + bounds.max.y)) / 2.,
    );
    (img_x, img_y, d, offset)
}

fn projected_bounds(figures: &[TriangleFigure]) -> Option<Rect> {
    figures.iter().filter_map(|f| f.bounds_projected(project)).reduce(|a, b| a | b)
}

/// Runs the full six-stage pipeline of spec.md §2 and returns the
/// rendered image. An empty projected bounds yields a 0x0 image per
/// spec.md §7.
pub fn render(scene: &Scene) -> Image {
    let Some(camera) = scene.camera else {
        return Image::new(0, 0, scene.background);
    };

    let Some((eye, inv_eye)) = look_at_direction(camera.pos, camera.dir) else {
        return Image::new(0, 0, scene.background);
    };

    let mut lights = scene.lights.clone();
    lights.eye = eye;
    lights.inv_eye = inv_eye;
    for light in &mut lights.directional {
        light.direction = eye.transform_vector3(light.direction).normalize_or_zero();
    }
    for light in &mut lights.point {
        light.point = eye.transform_point3(light.point);
    }

    let mut figures: Vec<TriangleFigure> = scene.figures.clone();
    for figure in &mut figures {
        figure.transform(eye);
        camera.frustum.clip(figure);
    }

    if lights.any_shadow_casting_light() {
        let casters: Vec<TriangleFigure> = if lights.shadow_casters.is_empty() {
            figures.clone()
        } else {
            lights.shadow_casters.iter().map(|f| {
                let mut f = f.clone();
                f.transform(eye);
                f
            }).collect()
        };
        run_shadow_prepass(&camera.frustum, &mut lights, &casters);
    }

    let Some(bounds) = projected_bounds(&figures) else {
        return Image::new(0, 0, scene.background);
    };

    let (width, height, d, offset) = image_parameters(bounds, scene.size);
    let mut tagged = TaggedDepthBuffer::new(width, height);

    for (figure_id, figure) in figures.iter().enumerate() {
        for (triangle_id, face) in figure.faces.iter().enumerate() {
            let [a, b, c] = face.indices().map(|i| figure.points[i as usize]);
            rasterize_triangle_tagged(a, b, c, d, offset, RASTER_BIAS, &mut tagged, figure_id as u32, triangle_id as u32);
        }
    }

    let mut image = Image::new(width, height, scene.background);
    let rows: Vec<(u32, Vec<[u8; 3]>)> = (0..height)
        .into_par_iter()
        .map(|y| {
            let mut row = vec![scene.background.to_rgb8(); width as usize];
            for x in 0..width {
                if let Some((figure_id, triangle_id)) = tagged.tag_at(x, y) {
                    let figure = &figures[figure_id as usize];
                    let inv_z = tagged.depth_at(x, y);
                    let point = reconstruct_point(x as f32, y as f32, inv_z, d, offset);
                    let color = shade_pixel(figure, triangle_id as usize, point, &lights);
                    row[x as usize] = color.to_rgb8();
                }
            }
            (y, row)
        })
        .collect();

    for (y, row) in rows {
        for (x, px) in row.into_iter().enumerate() {
            let [r, g, b] = px;
            image.set(x as u32, y, crate::maths::Color::new(r as f32 / 255., g as f32 / 255., b as f32 / 255.));
        }
    }

    image
}

/// Deduplicated triangle edges of a clipped figure, in eye space.
fn figure_edges(figure: &TriangleFigure) -> Vec<(Vec3, Vec3)> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for face in &figure.faces {
        for (i, j) in [(face.a, face.b), (face.b, face.c), (face.c, face.a)] {
            let key = if i < j { (i, j) } else { (j, i) };
            if seen.insert(key) {
                edges.push((figure.points[i as usize], figure.points[j as usize]));
            }
        }
    }
    edges
}

/// Renders the unlit `Wireframe`/`ZBufferedWireframe` modes of spec.md
/// §4.7/§6: every figure contributes its (deduplicated) triangle edges,
/// every raw `LineDrawing` figure (`Scene::lines`) contributes its edges
/// directly, drawn with its `ambientReflection`/`color`. `with_depth`
/// selects the plain 2D line renderer versus the depth-buffered one.
pub fn render_wireframe(scene: &Scene, with_depth: bool) -> Image {
    let Some(camera) = scene.camera else {
        return Image::new(0, 0, scene.background);
    };
    let Some((eye, _)) = look_at_direction(camera.pos, camera.dir) else {
        return Image::new(0, 0, scene.background);
    };

    let mut figures: Vec<TriangleFigure> = scene.figures.clone();
    for figure in &mut figures {
        figure.transform(eye);
        camera.frustum.clip(figure);
    }

    let mut segments: Vec<(Vec3, Vec3, Color)> = Vec::new();
    for figure in &figures {
        for (a, b) in figure_edges(figure) {
            segments.push((a, b, figure.ambient));
        }
    }
    for line in &scene.lines {
        let points: Vec<Vec3> = line.points.iter().map(|p| eye.transform_point3(*p)).collect();
        for edge in &line.edges {
            let (a, b) = (points[edge.a as usize], points[edge.b as usize]);
            if a.z < 0. && b.z < 0. {
                segments.push((a, b, line.color));
            }
        }
    }

    let Some(bounds) = segments.iter().fold(None, |acc: Option<Rect>, (a, b, _)| {
        let mut r = Rect::point(project(*a));
        r.extend(project(*b));
        Some(match acc {
            Some(existing) => existing | r,
            None => r,
        })
    }) else {
        return Image::new(0, 0, scene.background);
    };

    let (width, height, d, offset) = image_parameters(bounds, scene.size);
    let mut image = Image::new(width, height, scene.background);
    let mut depth = DepthBuffer::new(width, height);

    for (a, b, color) in segments {
        let pa = project_pixel(a, d, offset);
        let pb = project_pixel(b, d, offset);
        if with_depth {
            draw_line_z(&mut image, &mut depth, pa, 1. / a.z, pb, 1. / b.z, color);
        } else {
            draw_line(&mut image, pa, pb, color);
        }
    }

    image
}

fn run_shadow_prepass(frustum: &crate::geometry::frustum::Frustum, lights: &mut crate::scene::light::Lights, casters: &[TriangleFigure]) {
    let shadow_mask = lights.shadow_mask.max(1);

    let updates: Vec<(usize, crate::scene::light::PointLightCache)> = lights
        .point
        .par_iter()
        .enumerate()
        .filter(|(_, l)| l.casts_shadow)
        .filter_map(|(i, light)| {
            let dir = -light.point;
            let (light_eye, _) = look_at_direction(light.point, dir)?;

            let mut snapshots: Vec<TriangleFigure> = casters.to_vec();
            for fig in &mut snapshots {
                fig.transform(light_eye);
                frustum.clip(fig);
            }
            let bounds = snapshots.iter().filter_map(|f| f.bounds_projected(project)).reduce(|a, b| a | b)?;
            let (w, h, d, offset) = image_parameters(bounds, shadow_mask);
            let mut depth = DepthBuffer::new(w, h);

            for fig in &snapshots {
                for face in &fig.faces {
                    let [pa, pb, pc] = face.indices().map(|idx| fig.points[idx as usize]);
                    if fig.can_cull {
                        let normal = (pb - pa).cross(pc - pa);
                        if normal.dot(pa) >= 0. {
                            continue;
                        }
                    }
                    rasterize_triangle_depth(pa, pb, pc, d, offset, RASTER_BIAS, &mut depth, |_, _, _| {});
                }
            }

            Some((
                i,
                crate::scene::light::PointLightCache {
                    light_eye: Some(light_eye),
                    depth: Some(depth),
                    d,
                    offset,
                },
            ))
        })
        .collect();

    for (i, cache) in updates {
        lights.point[i].cached = cache;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::frustum::Frustum;
    use crate::maths::Color;
    use crate::scene::light::{DirectionalLight, Lights};
    use crate::scene::triangle_figure::Face;
    use crate::scene::Camera;

    fn unit_cube_figure(color: Color) -> TriangleFigure {
        let pts = vec![
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
        ];
        let mut fig = TriangleFigure::new(pts, vec![Face::new(0, 1, 2), Face::new(0, 2, 3)]);
        fig.normals = vec![Vec3::new(0., 0., 1.), Vec3::new(0., 0., 1.)];
        fig.face_normals = true;
        fig.ambient = color;
        fig
    }

    #[test]
    fn scenario_1_solid_ambient_cube_renders_red_center_and_background_corner() {
        let mut scene = Scene {
            background: Color::BLACK,
            size: 100,
            ..Default::default()
        };
        scene.figures.push(unit_cube_figure(Color::new(1., 0., 0.)));
        scene.lights.ambient = Color::new(1., 1., 1.);
        scene.camera = Some(Camera {
            pos: Vec3::new(0., 0., 5.),
            dir: Vec3::new(0., 0., -1.),
            frustum: Frustum::new(0.1, 100., std::f32::consts::FRAC_PI_2, 1.),
        });

        let image = render(&scene);
        assert_eq!(image.width, 100);
        assert_eq!(image.get(50, 50), [255, 0, 0]);
        assert_eq!(image.get(0, 0), [0, 0, 0]);
    }

    #[test]
    fn scenario_2_directional_light_lights_facing_face_full_white() {
        let mut scene = Scene {
            background: Color::BLACK,
            size: 100,
            ..Default::default()
        };
        let mut cube = unit_cube_figure(Color::BLACK);
        cube.diffuse = Color::new(1., 1., 1.);
        scene.figures.push(cube);
        scene.lights.directional.push(DirectionalLight {
            direction: Vec3::new(0., 0., -1.),
            diffuse: Color::new(1., 1., 1.),
            specular: Color::BLACK,
        });
        scene.camera = Some(Camera {
            pos: Vec3::new(0., 0., 5.),
            dir: Vec3::new(0., 0., -1.),
            frustum: Frustum::new(0.1, 100., std::f32::consts::FRAC_PI_2, 1.),
        });

        let image = render(&scene);
        assert_eq!(image.get(50, 50), [255, 255, 255]);
    }

    #[test]
    fn scenario_3_nearer_cube_wins_depth_test() {
        let mut scene = Scene {
            background: Color::BLACK,
            size: 50,
            ..Default::default()
        };
        let mut far = unit_cube_figure(Color::new(0., 0., 1.));
        far.transform(glam::Mat4::from_translation(Vec3::new(0., 0., -5.)));
        let mut near = unit_cube_figure(Color::new(1., 0., 0.));
        near.transform(glam::Mat4::from_translation(Vec3::new(0., 0., -3.)));
        scene.figures.push(far);
        scene.figures.push(near);
        scene.lights.ambient = Color::new(1., 1., 1.);
        scene.camera = Some(Camera {
            pos: Vec3::ZERO,
            dir: Vec3::new(0., 0., -1.),
            frustum: Frustum::new(0.1, 100., std::f32::consts::FRAC_PI_2, 1.),
        });

        let image = render(&scene);
        let center = image.width / 2;
        assert_eq!(image.get(center, center), [255, 0, 0]);
    }

    #[test]
    fn wireframe_draws_the_shared_diagonal_through_the_center() {
        let mut scene = Scene {
            background: Color::BLACK,
            size: 100,
            ..Default::default()
        };
        scene.figures.push(unit_cube_figure(Color::new(1., 0., 0.)));
        scene.camera = Some(Camera {
            pos: Vec3::new(0., 0., 5.),
            dir: Vec3::new(0., 0., -1.),
            frustum: Frustum::new(0.1, 100., std::f32::consts::FRAC_PI_2, 1.),
        });

        let image = render_wireframe(&scene, false);
        let center = image.width / 2;
        assert_eq!(image.get(center, center), [255, 0, 0]);
        assert_eq!(image.get(0, image.height - 1), [0, 0, 0]);
    }

    #[test]
    fn zbuffered_wireframe_draws_the_nearer_edge_at_an_overlap() {
        let mut scene = Scene {
            background: Color::BLACK,
            size: 50,
            ..Default::default()
        };
        let mut far = unit_cube_figure(Color::new(0., 0., 1.));
        far.transform(glam::Mat4::from_translation(Vec3::new(0., 0., -5.)));
        let mut near = unit_cube_figure(Color::new(1., 0., 0.));
        near.transform(glam::Mat4::from_translation(Vec3::new(0., 0., -3.)));
        scene.figures.push(far);
        scene.figures.push(near);
        scene.camera = Some(Camera {
            pos: Vec3::ZERO,
            dir: Vec3::new(0., 0., -1.),
            frustum: Frustum::new(0.1, 100., std::f32::consts::FRAC_PI_2, 1.),
        });

        let image = render_wireframe(&scene, true);
        let center = image.width / 2;
        assert_eq!(image.get(center, center), [255, 0, 0]);
    }
}
