use glam::Vec2;

use crate::image::Image;
use crate::maths::Color;
use crate::raster::depth_buffer::DepthBuffer;

/// Clips a 2D segment against the image rectangle `[0,width] x
/// [0,height]`, interpolating the (optional) endpoint z values.
/// Returns `None` if the segment lies entirely outside.
pub fn clip_segment(mut a: Vec2, mut b: Vec2, mut az: f32, mut bz: f32, width: f32, height: f32) -> Option<(Vec2, Vec2, f32, f32)> {
    if !clip_axis_x(&mut a, &mut b, &mut az, &mut bz, 0., width) {
        return None;
    }
    if !clip_axis_y(&mut a, &mut b, &mut az, &mut bz, 0., height) {
        return None;
    }
    Some((a, b, az, bz))
}

fn clip_axis_x(a: &mut Vec2, b: &mut Vec2, az: &mut f32, bz: &mut f32, lo: f32, hi: f32) -> bool {
    clip_line_1d(&mut a.x, &mut a.y, az, &mut b.x, &mut b.y, bz, lo, hi)
}

fn clip_axis_y(a: &mut Vec2, b: &mut Vec2, az: &mut f32, bz: &mut f32, lo: f32, hi: f32) -> bool {
    clip_line_1d(&mut a.y, &mut a.x, az, &mut b.y, &mut b.x, bz, lo, hi)
}

/// Liang-Barsky-style single-axis clip: `a_main`/`b_main` are the
/// coordinate being bounded to `[lo, hi]`; `a_other`/`b_other` and
/// `a_z`/`b_z` are interpolated to match.
#[allow(clippy::too_many_arguments)]
fn clip_line_1d(a_main: &mut f32, a_other: &mut f32, a_z: &mut f32, b_main: &mut f32, b_other: &mut f32, b_z: &mut f32, lo: f32, hi: f32) -> bool {
    if *a_main < lo {
        if *b_main < lo {
            return false;
        }
        let t = (lo - *a_main) / (*b_main - *a_main);
        *a_other += t * (*b_other - *a_other);
        *a_z += t * (*b_z - *a_z);
        *a_main = lo;
    }
    if *b_main < lo {
        let t = (lo - *b_main) / (*a_main - *b_main);
        *b_other += t * (*a_other - *b_other);
        *b_z += t * (*a_z - *b_z);
        *b_main = lo;
    }
    if *a_main > hi {
        if *b_main > hi {
            return false;
        }
        let t = (hi - *a_main) / (*b_main - *a_main);
        *a_other += t * (*b_other - *a_other);
        *a_z += t * (*b_z - *a_z);
        *a_main = hi;
    }
    if *b_main > hi {
        let t = (hi - *b_main) / (*a_main - *b_main);
        *b_other += t * (*a_other - *b_other);
        *b_z += t * (*a_z - *b_z);
        *b_main = hi;
    }
    true
}

/// Plain Bresenham-like stepping: one pixel per step of the major axis.
/// Per spec.md §4.7, the segment is first clipped against the image
/// rectangle so the stepping loop never has to test bounds itself.
pub fn draw_line(image: &mut Image, a: Vec2, b: Vec2, color: Color) {
    let Some((a, b, _, _)) = clip_segment(a, b, 0., 0., (image.width.max(1) - 1) as f32, (image.height.max(1) - 1) as f32) else {
        return;
    };

    let dx = b.x - a.x;
    let dy = b.y - a.y;

    if dx == 0. && dy == 0. {
        put(image, a.x, a.y, color);
        return;
    }

    if dy.abs() <= dx.abs() {
        let (from, to) = if a.x <= b.x { (a, b) } else { (b, a) };
        let m = (to.y - from.y) / (to.x - from.x);
        let x0 = from.x.round() as i64;
        let x1 = to.x.round() as i64;
        for x in x0..=x1 {
            let y = from.y + m * (x as f32 - from.x);
            put(image, x as f32, y.round(), color);
        }
    } else {
        let (from, to) = if a.y <= b.y { (a, b) } else { (b, a) };
        let m = (to.x - from.x) / (to.y - from.y);
        let y0 = from.y.round() as i64;
        let y1 = to.y.round() as i64;
        for y in y0..=y1 {
            let x = from.x + m * (y as f32 - from.y);
            put(image, x.round(), y as f32, color);
        }
    }
}

fn put(image: &mut Image, x: f32, y: f32, color: Color) {
    if image.in_bounds(x as i64, y as i64) {
        image.set(x as u32, y as u32, color);
    }
}

/// Depth-buffered 3D line: interpolates `1/z` linearly along the longest
/// axis and updates the depth buffer before drawing. Per spec.md §4.7,
/// the segment (with its endpoint depths) is clipped against the image
/// rectangle first, same as `draw_line`.
pub fn draw_line_z(image: &mut Image, depth: &mut DepthBuffer, a: Vec2, az: f32, b: Vec2, bz: f32, color: Color) {
    let Some((a, az, b, bz)) = clip_segment(a, b, az, bz, (image.width.max(1) - 1) as f32, (image.height.max(1) - 1) as f32)
        .map(|(a, b, az, bz)| (a, az, b, bz))
    else {
        return;
    };

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let steps = dx.abs().max(dy.abs()).round().max(1.) as i64;

    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = (a.x + dx * t).round();
        let y = (a.y + dy * t).round();
        let inv_z = az + (bz - az) * t;
        if image.in_bounds(x as i64, y as i64) {
            let (xu, yu) = (x as u32, y as u32);
            if depth.replace(xu, yu, inv_z) {
                image.set(xu, yu, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_line_fills_every_x() {
        let mut img = Image::new(10, 10, Color::BLACK);
        draw_line(&mut img, Vec2::new(0., 5.), Vec2::new(9., 5.), Color::new(1., 1., 1.));
        for x in 0..10 {
            assert_eq!(img.get(x, 5), [255, 255, 255]);
        }
    }

    #[test]
    fn clip_rejects_segment_entirely_outside() {
        let out = clip_segment(Vec2::new(-10., -10.), Vec2::new(-5., -5.), -1., -1., 10., 10.);
        assert!(out.is_none());
    }

    #[test]
    fn clip_keeps_segment_entirely_inside() {
        let out = clip_segment(Vec2::new(2., 2.), Vec2::new(5., 5.), -1., -1., 10., 10.);
        assert!(out.is_some());
    }

    #[test]
    fn draw_line_clips_a_segment_straddling_the_image_edge() {
        let mut img = Image::new(10, 10, Color::BLACK);
        draw_line(&mut img, Vec2::new(-5., 5.), Vec2::new(5., 5.), Color::new(1., 1., 1.));
        assert_eq!(img.get(0, 5), [255, 255, 255]);
        assert_eq!(img.get(5, 5), [255, 255, 255]);
    }

    #[test]
    fn draw_line_skips_a_segment_entirely_outside_the_image() {
        let mut img = Image::new(10, 10, Color::BLACK);
        draw_line(&mut img, Vec2::new(-20., -20.), Vec2::new(-15., -15.), Color::new(1., 1., 1.));
        for y in 0..10 {
            for x in 0..10 {
                assert_eq!(img.get(x, y), [0, 0, 0]);
            }
        }
    }
}
