use std::io::{self, Write};

use crate::maths::Color;

/// Row-major 24-bit image. Size is fixed at creation.
#[derive(Debug, Clone)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pixels: Vec<[u8; 3]>,
}

impl Image {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![background.to_rgb8(); (width * height) as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel ({x},{y}) out of bounds {}x{}", self.width, self.height);
        (y * self.width + x) as usize
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color.to_rgb8();
    }

    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.index(x, y)]
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Writes a 24-bit BGR BMP: 14-byte file header, 40-byte info header,
    /// rows padded to 4 bytes, bottom-up row order, little-endian fields,
    /// 300dpi (`hres=vres=11811`). See spec.md §6.
    pub fn write_bmp(&self, mut w: impl Write) -> io::Result<()> {
        const FILE_HEADER_SIZE: u32 = 14;
        const INFO_HEADER_SIZE: u32 = 40;
        let row_bytes = (self.width * 3 + 3) & !3;
        let pixel_array_size = row_bytes * self.height;
        let file_size = FILE_HEADER_SIZE + INFO_HEADER_SIZE + pixel_array_size;
        let pixel_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

        // bmpfile_magic
        w.write_all(b"BM")?;
        // bmpfile_header
        w.write_all(&file_size.to_le_bytes())?;
        w.write_all(&0u16.to_le_bytes())?; // reserved_1
        w.write_all(&0u16.to_le_bytes())?; // reserved_2
        w.write_all(&pixel_offset.to_le_bytes())?;
        // bmp_header (BITMAPINFOHEADER)
        w.write_all(&INFO_HEADER_SIZE.to_le_bytes())?;
        w.write_all(&(self.width as i32).to_le_bytes())?;
        w.write_all(&(self.height as i32).to_le_bytes())?;
        w.write_all(&1u16.to_le_bytes())?; // nplanes
        w.write_all(&24u16.to_le_bytes())?; // bits_per_pixel
        w.write_all(&0u32.to_le_bytes())?; // compress_type
        w.write_all(&pixel_array_size.to_le_bytes())?;
        w.write_all(&11811i32.to_le_bytes())?; // hres
        w.write_all(&11811i32.to_le_bytes())?; // vres
        w.write_all(&0u32.to_le_bytes())?; // ncolors
        w.write_all(&0u32.to_le_bytes())?; // nimpcolors

        let padding = vec![0u8; (row_bytes - self.width * 3) as usize];
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let [r, g, b] = self.get(x, y);
                w.write_all(&[b, g, r])?;
            }
            w.write_all(&padding)?;
        }

        Ok(())
    }
}
