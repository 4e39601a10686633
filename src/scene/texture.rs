use crate::maths::Color;

/// Shared, read-only, many-reader image sample source. Figures hold
/// `Arc<Texture>` so several meshes can reuse one loaded image.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Color>,
}

impl Texture {
    pub fn new(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self { width, height, pixels }
    }

    pub fn solid(color: Color) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
        }
    }

    /// Nearest-neighbor sample with clamped addressing.
    pub fn get_clamped(&self, u: f32, v: f32) -> Color {
        let x = ((u * self.width as f32).round() as i64).clamp(0, self.width as i64 - 1) as u32;
        let y = ((v * self.height as f32).round() as i64).clamp(0, self.height as i64 - 1) as u32;
        self.pixels[(y * self.width + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_sample_stays_in_bounds() {
        let tex = Texture::new(2, 2, vec![Color::new(1., 0., 0.); 4]);
        assert_eq!(tex.get_clamped(2.0, 2.0), Color::new(1., 0., 0.));
        assert_eq!(tex.get_clamped(-1.0, -1.0), Color::new(1., 0., 0.));
    }
}
