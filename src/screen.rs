use std::fs::File;
use std::io::{Write, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

use crate::material::{Color, to_rgba};

/// Caller-owned pixel buffer the rasterizer draws into. Row-major, origin top-left.
pub struct ScreenSpace {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ScreenSpace {
    pub fn new(width: u32, height: u32) -> Self {
        let size_calc = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![0; size_calc],
        }
    }
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height { return; }
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height { return None }
        Some(self.pixels[self.index(x, y)])
    }
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }
    /// Pixels as `r, g, b, a` bytes, the layout image files and textures expect.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let big_endian: Vec<u32> = self.pixels.iter().map(|pixel| pixel.to_be()).collect();
        bytemuck::cast_slice::<u32, u8>(&big_endian).to_vec()
    }
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let img = RgbaImage::from_raw(self.width, self.height, self.to_rgba_bytes())
            .context("pixel buffer does not match its dimensions")?;
        img.save(path).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
    /// Writes an uncompressed 24-bit BMP, dropping alpha.
    pub fn write_bmp<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let width = self.width;
        let height = self.height;
        let row_stride = (3 * width as u64 + 3) & !3;
        let pixel_array_size = u32::try_from(row_stride * height as u64)
            .ok()
            .filter(|size| *size <= u32::MAX - 54)
            .with_context(|| format!("{}x{} is too large for a BMP file", width, height))?;
        let file_size = 54 + pixel_array_size;
        let padding = vec![0u8; (row_stride - 3 * width as u64) as usize];
        let path = path.as_ref();
        let mut file = BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        );
        file.write_all(b"BM")?;
        file.write_all(&file_size.to_le_bytes())?;
        file.write_all(&[0u8; 4])?;
        file.write_all(&54u32.to_le_bytes())?;
        file.write_all(&[40u8, 0, 0, 0])?;
        file.write_all(&(width as i32).to_le_bytes())?;
        file.write_all(&(height as i32).to_le_bytes())?;
        file.write_all(&[1, 0])?;
        file.write_all(&[24, 0])?;
        file.write_all(&[0u8; 4])?;
        file.write_all(&pixel_array_size.to_le_bytes())?;
        file.write_all(&[0u8; 16])?;
        // bottom-up rows
        for y in (0..height).rev() {
            for x in 0..width {
                let (r, g, b, _) = to_rgba(self.pixels[self.index(x, y)]);
                file.write_all(&[b, g, r])?;
            }
            file.write_all(&padding)?;
        }
        file.flush()?;
        Ok(())
    }
    /// Saves as BMP for a `.bmp` extension, otherwise through the `image` encoders.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let is_bmp = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"));
        if is_bmp {
            self.write_bmp(path)
        } else {
            self.save_png(path)
        }
    }
}
