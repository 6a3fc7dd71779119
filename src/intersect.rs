use crate::point2d::Point2D;
use crate::triangle::Edge;

/// Half-line `origin + t * direction`, t >= 0.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Point2D,
    pub direction: Point2D,
}

impl Ray {
    /// Ray along row `h`, starting at column 0 and pointing toward +x.
    pub fn horizontal(h: f32) -> Self {
        Ray {
            origin: Point2D::new(0.0, h),
            direction: Point2D::new(1.0, 0.0),
        }
    }

    pub fn evaluate(&self, t: f32) -> Point2D {
        self.origin + self.direction * t
    }

    pub fn height(&self) -> f32 {
        self.origin.y
    }
}

/// True when the edge straddles the ray's row, or touches it with either endpoint.
///
/// Only valid for horizontal rays. Touching endpoints are included so every
/// edge meeting the row is seen; shared vertices then report twice and the
/// scanline builder caps the hits per triangle.
#[inline(always)]
pub fn has_intersection(ray: &Ray, edge: &Edge) -> bool {
    let h = ray.height();
    let to_end = edge.end.y - h;
    let to_start = edge.start.y - h;
    let straddles = (to_end < 0.0 && to_start > 0.0) || (to_end > 0.0 && to_start < 0.0);
    straddles || to_end == 0.0 || to_start == 0.0
}

/// X coordinate where the line through `edge` crosses the ray's row.
///
/// Call only when [`has_intersection`] holds and the edge is not horizontal.
#[inline(always)]
pub fn intersect(ray: &Ray, edge: &Edge) -> f32 {
    let h = ray.height();
    // exact at vertices so both edges sharing one agree on the column
    if edge.start.y == h {
        return edge.start.x;
    }
    if edge.end.y == h {
        return edge.end.x;
    }
    let slope = edge.delta();
    debug_assert!(slope.y != 0.0, "horizontal edge has no single crossing");
    edge.start.x + (h - edge.start.y) * (slope.x / slope.y)
}
