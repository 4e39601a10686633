pub mod ini;
pub mod intro;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use glam::Vec3;

pub use ini::{Configuration, Section};

use crate::error::{EngineError, EngineResult};
use crate::geometry::frustum::Frustum;
use crate::image::Image;
use crate::lsystem::{self, parser::LSystem2D};
use crate::maths::Color;
use crate::scene::light::{DirectionalLight, Lights, PointLight};
use crate::scene::line_figure::{Edge, LineFigure};
use crate::scene::triangle_figure::TriangleFigure;
use crate::scene::{Camera, Scene};
use crate::shapes::{self, FigureTransform};

/// Builds a full 3D `Scene` from a `[General]`/`[FigureN]`/`[LightN]`
/// configuration, per spec.md §6. `base_dir` resolves relative file
/// references (L-system grammars, Wavefront meshes) against the
/// directory the `.ini` file itself lives in. `lit` distinguishes
/// `LightedZBuffering`/wireframe modes (read `[LightN]`, shade normally)
/// from `ZBuffering` (every figure is drawn flat in its own
/// `ambientReflection`/`color`, `[LightN]` is not consulted at all).
pub fn build_scene(config: &Configuration, base_dir: &Path, lit: bool) -> EngineResult<Scene> {
    let general = config.section("General")?;
    let size = general.get("size")?.as_u32()?;
    let background = general.get("backgroundcolor")?.as_color()?;
    let eye = general.get("eye")?.as_vec3()?;
    let view_direction = general
        .get_opt("viewdirection")
        .map(|v| v.as_vec3())
        .transpose()?
        .unwrap_or(-eye);

    let fov = general.get_opt("fov").map(|v| v.as_f32()).transpose()?.unwrap_or(90.).to_radians();
    let aspect = general.get_opt("aspectratio").map(|v| v.as_f32()).transpose()?.unwrap_or(1.);
    let near = general.get_opt("near").map(|v| v.as_f32()).transpose()?.unwrap_or(0.1);
    let far = general.get_opt("far").map(|v| v.as_f32()).transpose()?.unwrap_or(1000.);

    let nr_figures = general.get_opt("nrFigures").map(|v| v.as_u32()).transpose()?.unwrap_or(0);

    let mut figures = Vec::with_capacity(nr_figures as usize);
    let mut lines = Vec::new();
    for i in 0..nr_figures {
        let section = config.section(&format!("Figure{i}"))?;
        let kind = section.get("type")?.as_str().to_string();
        if kind == "LineDrawing" {
            lines.push(build_line_figure("LineDrawing", section, base_dir)?);
        } else {
            figures.push(build_figure(section, base_dir)?);
        }
    }

    let mut lights = Lights {
        ambient: if lit {
            general.get_opt("ambientlight").map(|v| v.as_color()).transpose()?.unwrap_or(Color::BLACK)
        } else {
            Color::new(1., 1., 1.)
        },
        shadow_mask: general.get_opt("shadowMask").map(|v| v.as_u32()).transpose()?.unwrap_or(400),
        shadows_enabled: lit && general.get_opt("shadowEnabled").map(|v| v.as_bool()).transpose()?.unwrap_or(false),
        ..Default::default()
    };
    if lit {
        let nr_lights = general.get_opt("nrLights").map(|v| v.as_u32()).transpose()?.unwrap_or(0);
        for i in 0..nr_lights {
            let section = config.section(&format!("Light{i}"))?;
            add_light(section, &mut lights)?;
        }
    }

    Ok(Scene {
        figures,
        lines,
        lights,
        camera: Some(Camera {
            pos: eye,
            dir: view_direction,
            frustum: Frustum::new(near, far, fov, aspect),
        }),
        background,
        size,
    })
}

fn build_figure(section: &Section, base_dir: &Path) -> EngineResult<TriangleFigure> {
    let kind = section.get("type")?.as_str().to_string();
    let transform = FigureTransform {
        rotate_deg: Vec3::new(
            section.get_opt("rotateX").map(|v| v.as_f32()).transpose()?.unwrap_or(0.),
            section.get_opt("rotateY").map(|v| v.as_f32()).transpose()?.unwrap_or(0.),
            section.get_opt("rotateZ").map(|v| v.as_f32()).transpose()?.unwrap_or(0.),
        ),
        scale: section.get_opt("scale").map(|v| v.as_f32()).transpose()?.unwrap_or(1.),
        center: section.get_opt("center").map(|v| v.as_vec3()).transpose()?.unwrap_or(Vec3::ZERO),
    };

    let mut figure = if let Some(base_name) = kind.strip_prefix("Fractal") {
        let base = base_shape_for(base_name)?;
        let depth = section.get_opt("fractalDepth").map(|v| v.as_u32()).transpose()?.unwrap_or(2);
        shapes::fractal::corner_fractal(base, depth)
    } else if let Some(inner_name) = kind.strip_prefix("Thick") {
        let lines = build_line_figure(inner_name, section, base_dir)?;
        let radius = section.get_opt("lineRadius").map(|v| v.as_f32()).transpose()?.unwrap_or(0.02);
        let sides = section.get_opt("lineSides").map(|v| v.as_u32()).transpose()?.unwrap_or(8);
        shapes::thicken::thicken(&lines, radius, sides)
    } else {
        match kind.as_str() {
            "Cube" => shapes::platonic::cube(),
            "Tetrahedron" => shapes::platonic::tetrahedron(),
            "Octahedron" => shapes::platonic::octahedron(),
            "Icosahedron" => shapes::platonic::icosahedron(),
            "Dodecahedron" => shapes::platonic::dodecahedron(),
            "Sphere" => {
                let n = section.get_opt("n").map(|v| v.as_u32()).transpose()?.unwrap_or(3);
                shapes::sphere::sphere(n)
            }
            "BuckyBall" => shapes::buckyball::buckyball(),
            "Cylinder" => {
                let height = section.get_opt("height").map(|v| v.as_f32()).transpose()?.unwrap_or(1.);
                let n = section.get_opt("n").map(|v| v.as_u32()).transpose()?.unwrap_or(16);
                shapes::cylinder_cone::cylinder(n, height)
            }
            "Cone" => {
                let height = section.get_opt("height").map(|v| v.as_f32()).transpose()?.unwrap_or(1.);
                let n = section.get_opt("n").map(|v| v.as_u32()).transpose()?.unwrap_or(16);
                shapes::cylinder_cone::cone(n, height)
            }
            "Torus" => {
                let r = section.get_opt("R").map(|v| v.as_f32()).transpose()?.unwrap_or(1.);
                let r_tube = section.get_opt("r").map(|v| v.as_f32()).transpose()?.unwrap_or(0.25);
                let n = section.get_opt("n").map(|v| v.as_u32()).transpose()?.unwrap_or(24);
                let m = section.get_opt("m").map(|v| v.as_u32()).transpose()?.unwrap_or(12);
                shapes::torus::torus(r, r_tube, n, m)
            }
            "MengerSponge" => {
                let depth = section.get_opt("fractalDepth").map(|v| v.as_u32()).transpose()?.unwrap_or(2);
                shapes::menger::menger_sponge(depth)
            }
            "Wavefront" => {
                let file = section.get("file")?.as_str();
                let path = base_dir.join(file);
                let reader = BufReader::new(File::open(&path)?);
                shapes::wavefront::load_obj(reader)?
            }
            "LineDrawing" => {
                return Err(EngineError::Config(
                    "LineDrawing has no surface; wrap it as ThickLineDrawing or list it under [FigureN] to keep it unlit".into(),
                ));
            }
            "3DLSystem" => {
                return Err(EngineError::Config(
                    "3DLSystem is not supported; the L-system interpreter only defines a 2D turtle (see DESIGN.md)".into(),
                ));
            }
            other => return Err(EngineError::Config(format!("unknown figure type '{other}'"))),
        }
    };

    // spec.md §6: a figure's base color comes from `ambientReflection`, or
    // `color` for the flat (unlit) figure types that only ever specify that.
    figure.ambient = section
        .get_opt("ambientReflection")
        .or_else(|| section.get_opt("color"))
        .map(|v| v.as_color())
        .transpose()?
        .unwrap_or(Color::new(1., 1., 1.));
    figure.diffuse = section.get_opt("diffuseReflection").map(|v| v.as_color()).transpose()?.unwrap_or(Color::BLACK);
    figure.specular = section.get_opt("specularReflection").map(|v| v.as_color()).transpose()?.unwrap_or(Color::BLACK);
    figure.reflection = section.get_opt("reflectionCoefficient").map(|v| v.as_f32()).transpose()?.unwrap_or(1.);

    if figure.normals.is_empty() {
        figure.normals = vec![Vec3::ZERO; figure.points.len()];
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

    figure.transform(transform.matrix());
    Ok(figure)
}

/// Resolves the base solid named by a `Fractal<Name>` figure type.
fn base_shape_for(name: &str) -> EngineResult<TriangleFigure> {
    Ok(match name {
        "Cube" => shapes::platonic::cube(),
        "Tetrahedron" => shapes::platonic::tetrahedron(),
        "Octahedron" => shapes::platonic::octahedron(),
        "Icosahedron" => shapes::platonic::icosahedron(),
        "Dodecahedron" => shapes::platonic::dodecahedron(),
        "BuckyBall" => shapes::buckyball::buckyball(),
        other => return Err(EngineError::Config(format!("unknown fractal base shape '{other}'"))),
    })
}

/// Builds a `LineFigure` for a standalone `LineDrawing` figure, or for the
/// wireframe wrapped by a `Thick<Name>` figure type.
fn build_line_figure(kind: &str, section: &Section, base_dir: &Path) -> EngineResult<LineFigure> {
    match kind {
        "LineDrawing" => {
            let color = section
                .get_opt("ambientReflection")
                .or_else(|| section.get_opt("color"))
                .map(|v| v.as_color())
                .transpose()?
                .unwrap_or(Color::new(1., 1., 1.));
            let mut figure = LineFigure::new(color);

            let nr_points = section.get_opt("nrPoints").map(|v| v.as_u32()).transpose()?.unwrap_or(0);
            for i in 0..nr_points {
                figure.points.push(section.get(&format!("point{i}"))?.as_vec3()?);
            }

            let nr_lines = section.get_opt("nrLines").map(|v| v.as_u32()).transpose()?.unwrap_or(0);
            for i in 0..nr_lines {
                let (a, b) = section.get(&format!("line{i}"))?.as_index_pair()?;
                figure.edges.push(Edge::new(a, b));
            }
            Ok(figure)
        }
        "2DLSystem" => {
            let file = section.get("inputfile")?.as_str();
            let path = base_dir.join(file);
            let reader = BufReader::new(File::open(&path)?);
            let system = LSystem2D::parse(reader)?;
            let color = section.get_opt("ambientReflection").map(|v| v.as_color()).transpose()?.unwrap_or(Color::new(1., 1., 1.));
            Ok(lsystem::draw(&system, color))
        }
        other => Err(EngineError::Config(format!("unknown line figure type '{other}'"))),
    }
}

fn add_light(section: &Section, lights: &mut Lights) -> EngineResult<()> {
    let diffuse = section.get_opt("diffuseLight").map(|v| v.as_color()).transpose()?.unwrap_or(Color::BLACK);
    let specular = section.get_opt("specularLight").map(|v| v.as_color()).transpose()?.unwrap_or(Color::BLACK);

    // `infinity` is the spec's authoritative directional/point discriminator;
    // fall back to key presence for configs that omit it.
    let infinity = match section.get_opt("infinity") {
        Some(v) => v.as_bool()?,
        None => section.get_opt("direction").is_some() && section.get_opt("location").is_none(),
    };

    if infinity {
        let direction = section.get("direction")?.as_vec3()?.normalize_or_zero();
        lights.directional.push(DirectionalLight { direction, diffuse, specular });
    } else if let Some(location) = section.get_opt("location") {
        let point = location.as_vec3()?;
        let mut light = PointLight::new(point, diffuse, specular);
        if let Some(angle) = section.get_opt("spotAngle") {
            light.spot_angle_cos = angle.as_f32()?.to_radians().cos();
        }
        light.casts_shadow = section.get_opt("castShadow").map(|v| v.as_bool()).transpose()?.unwrap_or(false);
        lights.point.push(light);
    } else {
        lights.ambient += section.get_opt("ambientLight").map(|v| v.as_color()).transpose()?.unwrap_or(Color::BLACK);
    }
    Ok(())
}

/// Renders a standalone `[2DLSystem]` config directly into an `Image`,
/// bypassing the 3D pipeline entirely: the turtle's line segments are
/// scaled to fill the output image and drawn unlit, per spec.md §6.
pub fn render_2d_lsystem(config: &Configuration, base_dir: &Path) -> EngineResult<Image> {
    let general = config.section("General")?;
    let size = general.get("size")?.as_u32()?;
    let background = general.get("backgroundcolor")?.as_color()?;

    let section = config.section("2DLSystem")?;
    let line_color = section.get_opt("color").map(|v| v.as_color()).transpose()?.unwrap_or(Color::new(1., 1., 1.));
    let file = section.get("inputfile")?.as_str();
    let path = base_dir.join(file);
    let reader = BufReader::new(File::open(&path)?);
    let system = LSystem2D::parse(reader)?;
    let lines = lsystem::draw(&system, line_color);

    let Some(first) = lines.points.first() else {
        return Ok(Image::new(0, 0, background));
    };
    let mut min = glam::Vec2::new(first.x, first.y);
    let mut max = min;
    for p in &lines.points {
        min = min.min(glam::Vec2::new(p.x, p.y));
        max = max.max(glam::Vec2::new(p.x, p.y));
    }

    let extent = (max - min).max(glam::Vec2::splat(1e-6));
    let scale = size as f32 / extent.x.max(extent.y) * 0.95;
    let img_w = ((extent.x * scale) / 0.95).round().max(1.) as u32;
    let img_h = ((extent.y * scale) / 0.95).round().max(1.) as u32;
    let offset = glam::Vec2::new(
        (img_w as f32 - scale * (min.x + max.x)) / 2.,
        (img_h as f32 - scale * (min.y + max.y)) / 2.,
    );

    let mut image = Image::new(img_w, img_h, background);
    for edge in &lines.edges {
        let a = lines.points[edge.a as usize];
        let b = lines.points[edge.b as usize];
        let pa = glam::Vec2::new(a.x, a.y) * scale + offset;
        let pb = glam::Vec2::new(b.x, b.y) * scale + offset;
        crate::raster::lines::draw_line(&mut image, pa, pb, lines.color);
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn builds_a_minimal_single_cube_scene() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 1\nnrLights = 0\n\
                     \n[Figure0]\ntype = Cube\nambientReflection = [1,0,0]\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let scene = build_scene(&conf, Path::new("."), true).unwrap();
        assert_eq!(scene.figures.len(), 1);
        assert_eq!(scene.size, 200);
    }

    #[test]
    fn rejects_unknown_figure_type() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 1\nnrLights = 0\n\
                     \n[Figure0]\ntype = NotAShape\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        assert!(build_scene(&conf, Path::new("."), true).is_err());
    }

    #[test]
    fn accepts_the_exact_buckyball_capitalization() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 1\nnrLights = 0\n\
                     \n[Figure0]\ntype = BuckyBall\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        assert!(build_scene(&conf, Path::new("."), true).is_ok());
    }

    #[test]
    fn fractal_wildcard_dispatches_on_the_named_base_solid() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 1\nnrLights = 0\n\
                     \n[Figure0]\ntype = FractalIcosahedron\nfractalDepth = 1\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let scene = build_scene(&conf, Path::new("."), true).unwrap();
        assert!(!scene.figures[0].faces.is_empty());
    }

    #[test]
    fn rejects_an_unknown_fractal_base_solid() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 1\nnrLights = 0\n\
                     \n[Figure0]\ntype = FractalSphere\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        assert!(build_scene(&conf, Path::new("."), true).is_err());
    }

    #[test]
    fn line_drawing_figures_go_into_scene_lines_not_figures() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 1\nnrLights = 0\n\
                     \n[Figure0]\ntype = LineDrawing\nnrPoints = 2\npoint0 = [0,0,0]\npoint1 = [1,1,1]\nnrLines = 1\nline0 = [0,1]\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let scene = build_scene(&conf, Path::new("."), true).unwrap();
        assert!(scene.figures.is_empty());
        assert_eq!(scene.lines.len(), 1);
        assert_eq!(scene.lines[0].edges.len(), 1);
    }

    #[test]
    fn thick_line_drawing_produces_a_solid_tube() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 1\nnrLights = 0\n\
                     \n[Figure0]\ntype = ThickLineDrawing\nnrPoints = 2\npoint0 = [0,0,0]\npoint1 = [1,0,0]\nnrLines = 1\nline0 = [0,1]\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let scene = build_scene(&conf, Path::new("."), true).unwrap();
        assert_eq!(scene.figures.len(), 1);
        assert!(scene.lines.is_empty());
        assert!(!scene.figures[0].faces.is_empty());
    }

    #[test]
    fn rejects_3d_lsystem_as_out_of_scope() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 1\nnrLights = 0\n\
                     \n[Figure0]\ntype = 3DLSystem\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        assert!(build_scene(&conf, Path::new("."), true).is_err());
    }

    #[test]
    fn infinity_flag_selects_a_directional_light_even_with_a_location_present() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 0\nnrLights = 1\n\
                     \n[Light0]\ninfinity = true\ndirection = [0,-1,0]\ndiffuseLight = [1,1,1]\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let scene = build_scene(&conf, Path::new("."), true).unwrap();
        assert_eq!(scene.lights.directional.len(), 1);
        assert!(scene.lights.point.is_empty());
    }

    #[test]
    fn location_without_infinity_key_is_a_point_light() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 0\nnrLights = 1\n\
                     \n[Light0]\nlocation = [0,5,0]\ndiffuseLight = [1,1,1]\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let scene = build_scene(&conf, Path::new("."), true).unwrap();
        assert_eq!(scene.lights.point.len(), 1);
        assert!(scene.lights.directional.is_empty());
    }

    #[test]
    fn unlit_scene_ignores_light_sections_and_forces_white_ambient() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 1\nnrLights = 1\nambientlight = [0,0,0]\n\
                     \n[Figure0]\ntype = Cube\nambientReflection = [1,0,0]\n\
                     \n[Light0]\ninfinity = true\ndirection = [0,-1,0]\ndiffuseLight = [1,1,1]\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let scene = build_scene(&conf, Path::new("."), false).unwrap();
        assert_eq!(scene.lights.ambient, Color::new(1., 1., 1.));
        assert!(scene.lights.directional.is_empty());
        assert!(scene.lights.point.is_empty());
        assert!(!scene.lights.shadows_enabled);
    }

    #[test]
    fn color_key_is_a_fallback_for_ambient_reflection() {
        let text = "[General]\nsize = 200\nbackgroundcolor = [0,0,0]\neye = [0,0,5]\nnrFigures = 1\nnrLights = 0\n\
                     \n[Figure0]\ntype = Cube\ncolor = [0,1,0]\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let scene = build_scene(&conf, Path::new("."), true).unwrap();
        assert_eq!(scene.figures[0].ambient, Color::new(0., 1., 0.));
    }
}
