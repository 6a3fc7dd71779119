use std::time::Instant;

use log::debug;
use rayon::prelude::*;

use crate::error::RasterError;
use crate::material::{Color, MaterialTable};
use crate::perf::RenderStats;
use crate::scanline::{MAX_HITS_PER_TRIANGLE, Scanline, Scanlines};
use crate::stack::ActiveStack;
use crate::triangle::Triangle2D;

/// Fills one row of pixels from its sorted scanline.
///
/// Each hit toggles its triangle on the active stack at the hit's column,
/// and each pixel takes the colour of the most recently opened triangle
/// still open. Hits left of column 0 are applied at column 0; hits at or
/// past the end of the row never apply. A triangle with an odd hit count
/// stays open to the end of the row.
pub fn rasterize_row(
    pixels: &mut [Color],
    scanline: &Scanline,
    materials: &MaterialTable,
    background: Color,
    stack: &mut ActiveStack,
) {
    stack.clear();
    let hits = scanline.intersections();
    debug_assert!(hits.windows(2).all(|pair| pair[0].x <= pair[1].x), "scanline is not sorted");

    let mut next = 0;
    for (col, pixel) in pixels.iter_mut().enumerate() {
        let col = col as i32;
        while next < hits.len() && hits[next].x <= col {
            stack.toggle(hits[next].triangle);
            next += 1;
        }
        *pixel = match stack.top() {
            Some(id) => materials.color_for(id),
            None => background,
        };
    }
}

fn check_sizes(pixels: &[Color], width: usize, height: usize, scanlines: &Scanlines) -> Result<(), RasterError> {
    let expected = width * height;
    if pixels.len() != expected {
        return Err(RasterError::BufferSize { expected, actual: pixels.len() });
    }
    if scanlines.len() < height {
        return Err(RasterError::MissingScanlines { expected: height, actual: scanlines.len() });
    }
    Ok(())
}

/// Writes every pixel of a row-major `width * height` buffer.
pub fn rasterize(
    pixels: &mut [Color],
    width: usize,
    height: usize,
    scanlines: &Scanlines,
    materials: &MaterialTable,
    background: Color,
) -> Result<(), RasterError> {
    check_sizes(pixels, width, height, scanlines)?;
    if width == 0 || height == 0 {
        return Ok(());
    }

    let mut stack = ActiveStack::new();
    for (row, scanline) in pixels.chunks_mut(width).zip(scanlines.rows()) {
        rasterize_row(row, scanline, materials, background, &mut stack);
    }
    Ok(())
}

/// [`rasterize`] with rows spread over the current rayon pool.
pub fn rasterize_parallel(
    pixels: &mut [Color],
    width: usize,
    height: usize,
    scanlines: &Scanlines,
    materials: &MaterialTable,
    background: Color,
) -> Result<(), RasterError> {
    check_sizes(pixels, width, height, scanlines)?;
    if width == 0 || height == 0 {
        return Ok(());
    }

    pixels
        .par_chunks_mut(width)
        .zip(scanlines.rows().par_iter())
        .for_each_init(ActiveStack::new, |stack, (row, scanline)| {
            rasterize_row(row, scanline, materials, background, stack);
        });
    Ok(())
}

/// Owns scanline storage for a fixed viewport and runs both stages.
///
/// Scanlines are rebuilt on every render; storage is regrown when the
/// triangle count outgrows it.
pub struct Rasterizer {
    width: usize,
    height: usize,
    background: Color,
    triangle_capacity: usize,
    scanlines: Scanlines,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        Rasterizer {
            width,
            height,
            background: 0,
            triangle_capacity: 0,
            scanlines: Scanlines::for_triangles(height, 0),
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn scanlines(&self) -> &Scanlines {
        &self.scanlines
    }

    fn reserve(&mut self, triangle_count: usize) {
        if triangle_count > self.triangle_capacity {
            debug!(
                "growing scanline storage to {} intersections per row",
                triangle_count * MAX_HITS_PER_TRIANGLE
            );
            self.scanlines = Scanlines::for_triangles(self.height, triangle_count);
            self.triangle_capacity = triangle_count;
        }
    }

    pub fn render(
        &mut self,
        triangles: &[Triangle2D],
        materials: &MaterialTable,
        pixels: &mut [Color],
    ) -> Result<RenderStats, RasterError> {
        self.reserve(triangles.len());

        let start = Instant::now();
        self.scanlines.build_into(triangles)?;
        let scanline_time = start.elapsed();

        let start = Instant::now();
        rasterize(pixels, self.width, self.height, &self.scanlines, materials, self.background)?;
        let raster_time = start.elapsed();

        Ok(RenderStats { scanline_time, raster_time, intersections: self.scanlines.total_intersections() })
    }

    pub fn render_parallel(
        &mut self,
        triangles: &[Triangle2D],
        materials: &MaterialTable,
        pixels: &mut [Color],
    ) -> Result<RenderStats, RasterError> {
        self.reserve(triangles.len());

        let start = Instant::now();
        self.scanlines.build_parallel(triangles)?;
        let scanline_time = start.elapsed();

        let start = Instant::now();
        rasterize_parallel(pixels, self.width, self.height, &self.scanlines, materials, self.background)?;
        let raster_time = start.elapsed();

        Ok(RenderStats { scanline_time, raster_time, intersections: self.scanlines.total_intersections() })
    }
}
