use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::error::RasterError;
use crate::intersect::{Ray, has_intersection, intersect};
use crate::triangle::{Triangle2D, TriangleId};

/// Most hits a single triangle may contribute to one row.
pub const MAX_HITS_PER_TRIANGLE: usize = 2;

/// One edge crossing on a row: the pixel column and the triangle it belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Intersection {
    pub x: i32,
    pub triangle: TriangleId,
}

/// Edge crossings of one triangle with one row, as pixel columns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct TriangleHits {
    xs: [i32; 3],
    count: usize,
}

impl TriangleHits {
    pub fn as_slice(&self) -> &[i32] {
        &self.xs[..self.count]
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn push(&mut self, x: i32) {
        self.xs[self.count] = x;
        self.count += 1;
    }
}

#[inline(always)]
fn to_column(x: f32) -> i32 {
    x.floor() as i32
}

/// Every edge of `triangle` that meets the ray's row, before the duplicate cap.
///
/// Horizontal edges are skipped: they have no single crossing, and when one
/// lies on the row its endpoints are already reported by the neighbouring edges.
pub fn raw_hits(ray: &Ray, triangle: &Triangle2D) -> TriangleHits {
    let mut hits = TriangleHits::default();
    for edge in triangle.edges().iter() {
        if edge.is_horizontal() {
            continue;
        }
        if has_intersection(ray, edge) {
            hits.push(to_column(intersect(ray, edge)));
        }
    }
    hits
}

/// Limits a triangle's hits on one row to two.
///
/// Three hits only happen when the row runs through a vertex shared by two
/// edges. One copy of the duplicated column is kept together with the
/// remaining hit; with no duplicate the first two are kept.
pub fn cap_hits(hits: TriangleHits) -> TriangleHits {
    if hits.count <= MAX_HITS_PER_TRIANGLE {
        return hits;
    }
    let [a, b, c] = hits.xs;
    // a == c or b == c: the first two already hold one copy and the unique hit
    let kept = if a == b { [a, c] } else { [a, b] };
    TriangleHits { xs: [kept[0], kept[1], 0], count: 2 }
}

pub fn triangle_hits(ray: &Ray, triangle: &Triangle2D) -> TriangleHits {
    cap_hits(raw_hits(ray, triangle))
}

/// Intersections on one row, sorted by column after a build.
#[derive(Debug, Clone, Default)]
pub struct Scanline {
    intersections: Vec<Intersection>,
    capacity: usize,
}

impl Scanline {
    pub fn with_capacity(capacity: usize) -> Self {
        Scanline { intersections: Vec::with_capacity(capacity), capacity }
    }

    /// Wraps a hand-made list, unsorted and uncapped. Capacity is its length.
    pub fn from_intersections(intersections: Vec<Intersection>) -> Self {
        let capacity = intersections.len();
        Scanline { intersections, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    pub fn clear(&mut self) {
        self.intersections.clear();
    }

    /// Appends a hit. Returns false, storing nothing, when the row is full.
    pub fn push(&mut self, intersection: Intersection) -> bool {
        if self.intersections.len() >= self.capacity {
            return false;
        }
        self.intersections.push(intersection);
        true
    }

    /// Stable sort by column; equal columns keep insertion (input) order.
    pub fn sort(&mut self) {
        self.intersections.sort_by_key(|hit| hit.x);
    }
}

/// Per-row intersection storage, one [`Scanline`] per output row.
#[derive(Debug, Clone, Default)]
pub struct Scanlines {
    rows: Vec<Scanline>,
}

fn fill_row(scanline: &mut Scanline, row: usize, triangles: &[Triangle2D]) -> Result<(), RasterError> {
    scanline.clear();
    let ray = Ray::horizontal(row as f32);
    for (index, triangle) in triangles.iter().enumerate() {
        let hits = triangle_hits(&ray, triangle);
        for &x in hits.as_slice() {
            if !scanline.push(Intersection { x, triangle: TriangleId(index) }) {
                return Err(RasterError::CapacityExceeded { row, capacity: scanline.capacity() });
            }
        }
    }
    scanline.sort();
    trace!("row {}: {} intersections", row, scanline.len());
    Ok(())
}

fn warn_degenerate(triangles: &[Triangle2D]) {
    let degenerate = triangles.iter().filter(|t| t.is_degenerate()).count();
    if degenerate > 0 {
        warn!("{} of {} triangles have zero area", degenerate, triangles.len());
    }
}

impl Scanlines {
    /// `rows` empty scanlines each holding up to `capacity` intersections.
    pub fn with_capacity(rows: usize, capacity: usize) -> Self {
        Scanlines { rows: (0..rows).map(|_| Scanline::with_capacity(capacity)).collect() }
    }

    /// Storage sized for the worst case: two hits per triangle on every row.
    pub fn for_triangles(rows: usize, triangle_count: usize) -> Self {
        Self::with_capacity(rows, triangle_count * MAX_HITS_PER_TRIANGLE)
    }

    pub fn from_rows(rows: Vec<Scanline>) -> Self {
        Scanlines { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Scanline> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[Scanline] {
        &self.rows
    }

    pub fn total_intersections(&self) -> usize {
        self.rows.iter().map(Scanline::len).sum()
    }

    /// Rebuilds every row from `triangles`, replacing previous contents.
    pub fn build_into(&mut self, triangles: &[Triangle2D]) -> Result<(), RasterError> {
        warn_degenerate(triangles);
        for (row, scanline) in self.rows.iter_mut().enumerate() {
            fill_row(scanline, row, triangles)?;
        }
        debug!(
            "built {} scanlines from {} triangles ({} intersections)",
            self.rows.len(),
            triangles.len(),
            self.total_intersections()
        );
        Ok(())
    }

    /// Same result as [`Scanlines::build_into`], rows built on the current rayon pool.
    pub fn build_parallel(&mut self, triangles: &[Triangle2D]) -> Result<(), RasterError> {
        warn_degenerate(triangles);
        self.rows
            .par_iter_mut()
            .enumerate()
            .try_for_each(|(row, scanline)| fill_row(scanline, row, triangles))?;
        debug!(
            "built {} scanlines in parallel from {} triangles ({} intersections)",
            self.rows.len(),
            triangles.len(),
            self.total_intersections()
        );
        Ok(())
    }
}

/// Builds worst-case sized scanlines for rows `0..rows`.
pub fn build_scanlines(triangles: &[Triangle2D], rows: usize) -> Result<Scanlines, RasterError> {
    let mut scanlines = Scanlines::for_triangles(rows, triangles.len());
    scanlines.build_into(triangles)?;
    Ok(scanlines)
}
