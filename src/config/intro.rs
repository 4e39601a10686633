//! The three non-3D demo render modes of `[General] type`:
//! `IntroColorRectangle`, `IntroBlocks`, `IntroLines`. Grounded on
//! `original_source/src/intro.cpp`.

use glam::Vec2;

use crate::config::Configuration;
use crate::error::{EngineError, EngineResult};
use crate::image::Image;
use crate::maths::Color;
use crate::raster::lines::draw_line;

fn image_dims(config: &Configuration) -> EngineResult<(u32, u32)> {
    let props = config.section("ImageProperties")?;
    let width = props.get("width")?.as_u32()?;
    let height = props.get("height")?.as_u32()?;
    if width == 0 || height == 0 {
        return Err(EngineError::Config("ImageProperties width/height must be nonzero".into()));
    }
    Ok((width, height))
}

/// Per-pixel gradient test pattern: red ramps with x, green with y, blue is
/// their (wrapped) sum.
pub fn color_rectangle(config: &Configuration) -> EngineResult<Image> {
    let (width, height) = image_dims(config)?;
    let mut image = Image::new(width, height, Color::BLACK);
    for x in 0..width {
        for y in 0..height {
            let r = x * 256 / width;
            let g = y * 256 / height;
            let b = (r + g) % 256;
            image.set(x, y, Color::new(r as f32 / 255., g as f32 / 255., b as f32 / 255.));
        }
    }
    Ok(image)
}

/// Checkerboard of `nrXBlocks` x `nrYBlocks` alternating cells.
pub fn blocks(config: &Configuration) -> EngineResult<Image> {
    let (width, height) = image_dims(config)?;
    let props = config.section("BlockProperties")?;
    let mut color_a = props.get("colorWhite")?.as_color()?;
    let mut color_b = props.get("colorBlack")?.as_color()?;
    let n_x = props.get("nrXBlocks")?.as_u32()?.max(1);
    let n_y = props.get("nrYBlocks")?.as_u32()?.max(1);
    if props.get_opt("invertColors").map(|v| v.as_bool()).transpose()?.unwrap_or(false) {
        std::mem::swap(&mut color_a, &mut color_b);
    }

    let mut image = Image::new(width, height, Color::BLACK);
    for x in 0..width {
        for y in 0..height {
            let bx = x * n_x / width;
            let by = y * n_y / height;
            image.set(x, y, if (bx + by) % 2 == 0 { color_a } else { color_b });
        }
    }
    Ok(image)
}

/// Draws `n` lines fanning out from a corner of `ox,oy,w,h`, optionally
/// mirrored along each axis. Integer math matches `intro.cpp`'s
/// `lines_part` exactly so the fan spacing is identical.
#[allow(clippy::too_many_arguments)]
fn lines_part(image: &mut Image, fg: Color, n: u32, ox: u32, oy: u32, w: u32, h: u32, flip_x: bool, flip_y: bool) {
    for i in 0..n {
        let mut x = i * (w - 1) * 2 / (n - 1);
        let mut y = i * (h - 1) * 2 / (n - 1);
        x = ((x + 1) & !1) / 2;
        y = ((y + 1) & !1) / 2;
        if flip_x != flip_y {
            y = h - 1 - y;
        }
        let a = Vec2::new((ox + x) as f32, (oy + if flip_y { 0 } else { h - 1 }) as f32);
        let b = Vec2::new((ox + if flip_x { w - 1 } else { 0 }) as f32, (oy + y) as f32);
        draw_line(image, a, b, fg);
    }
}

fn lines_quartercircle(image: &mut Image, fg: Color, n: u32) {
    lines_part(image, fg, n, 0, 0, image.width, image.height, false, false);
}

fn lines_diamond(image: &mut Image, fg: Color, n: u32) {
    let (x, y) = (image.width / 2, image.height / 2);
    lines_part(image, fg, n, 0, 0, x, y, true, false);
    lines_part(image, fg, n, x - 1, y - 1, x, y, false, true);
    lines_part(image, fg, n, x - 1, 0, x, y, false, false);
    lines_part(image, fg, n, 0, y - 1, x, y, true, true);
}

fn lines_eye(image: &mut Image, fg: Color, n: u32) {
    lines_part(image, fg, n, 0, 0, image.width, image.height, false, false);
    lines_part(image, fg, n, 0, 0, image.width, image.height, true, true);
}

/// One of three hand-drawn line fans (`QuarterCircle`, `Diamond`, `Eye`),
/// selected by `[LineProperties] figure`.
pub fn lines(config: &Configuration) -> EngineResult<Image> {
    let (width, height) = image_dims(config)?;
    let props = config.section("LineProperties")?;
    let kind = props.get("figure")?.as_str().to_string();
    let background = props.get("backgroundcolor")?.as_color()?;
    let fg = props.get("lineColor")?.as_color()?;
    let n = props.get("nrLines")?.as_u32()?;
    if n < 2 {
        return Err(EngineError::Config("nrLines must be at least 2".into()));
    }

    let mut image = Image::new(width, height, background);
    match kind.as_str() {
        "QuarterCircle" => lines_quartercircle(&mut image, fg, n),
        "Diamond" => lines_diamond(&mut image, fg, n),
        "Eye" => lines_eye(&mut image, fg, n),
        other => return Err(EngineError::Config(format!("unknown LineProperties figure '{other}'"))),
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn color_rectangle_corners_are_black_and_near_white() {
        let text = "[ImageProperties]\nwidth = 256\nheight = 256\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let img = color_rectangle(&conf).unwrap();
        assert_eq!(img.get(0, 0), [0, 0, 0]);
    }

    #[test]
    fn blocks_alternate_starting_with_white() {
        let text = "[ImageProperties]\nwidth = 100\nheight = 100\n\
                     \n[BlockProperties]\ncolorWhite = [1,1,1]\ncolorBlack = [0,0,0]\nnrXBlocks = 4\nnrYBlocks = 4\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let img = blocks(&conf).unwrap();
        assert_eq!(img.get(0, 0), [255, 255, 255]);
    }

    #[test]
    fn lines_rejects_an_unknown_figure_name() {
        let text = "[ImageProperties]\nwidth = 50\nheight = 50\n\
                     \n[LineProperties]\nfigure = Hexagon\nbackgroundcolor = [0,0,0]\nlineColor = [1,1,1]\nnrLines = 10\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        assert!(lines(&conf).is_err());
    }

    #[test]
    fn lines_draws_a_quarter_circle_without_panicking() {
        let text = "[ImageProperties]\nwidth = 50\nheight = 50\n\
                     \n[LineProperties]\nfigure = QuarterCircle\nbackgroundcolor = [0,0,0]\nlineColor = [1,1,1]\nnrLines = 10\n";
        let conf = Configuration::parse(Cursor::new(text)).unwrap();
        let img = lines(&conf).unwrap();
        assert_eq!(img.width, 50);
    }
}
