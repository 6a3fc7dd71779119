use crate::point2d::{Point2D, perp, dot2};

/// Stable identity of a triangle: its index in the caller's triangle list.
/// Two geometrically identical triangles at different indices are distinct.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(pub usize);

/// Directed segment between two triangle vertices.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Edge {
    pub start: Point2D,
    pub end: Point2D,
}

impl Edge {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Edge { start, end }
    }

    pub fn delta(&self) -> Point2D {
        self.end - self.start
    }

    pub fn is_horizontal(&self) -> bool {
        self.start.y == self.end.y
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle2D {
    pub points: [Point2D; 3],
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min: Point2D,
    pub max: Point2D,
}

pub fn signed_triangle_area(t1: Point2D, t2: Point2D, p: Point2D) -> f32 {
    let ap = p - t1;
    let t1t2perp: Point2D = perp(t2 - t1);
    dot2(ap, t1t2perp) / 2.0
}

impl Triangle2D {
    pub fn new(a: Point2D, b: Point2D, c: Point2D) -> Self {
        Triangle2D { points: [a, b, c] }
    }

    pub fn from_coords(coords: [f32; 6]) -> Self {
        let [x1, y1, x2, y2, x3, y3] = coords;
        Triangle2D::new(Point2D::new(x1, y1), Point2D::new(x2, y2), Point2D::new(x3, y3))
    }

    /// Edges as a closed loop: (v0->v1), (v1->v2), (v2->v0).
    pub fn edges(&self) -> [Edge; 3] {
        let [a, b, c] = self.points;
        [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)]
    }

    /// Rotates the vertex list so the vertex with the greatest y leads.
    ///
    /// Only rotations are applied, so the winding of the loop is preserved.
    /// Ties fall through to leading with the last vertex.
    pub fn reordered(&self) -> Triangle2D {
        let [a, b, c] = self.points;
        if a.y > b.y && a.y > c.y {
            *self
        } else if b.y > a.y && b.y > c.y {
            Triangle2D::new(b, c, a)
        } else {
            Triangle2D::new(c, a, b)
        }
    }

    pub fn signed_area(&self) -> f32 {
        let [a, b, c] = self.points;
        signed_triangle_area(a, b, c)
    }

    pub fn is_degenerate(&self) -> bool {
        self.signed_area() == 0.0
    }

    pub fn bounds(&self) -> Bounds {
        let [a, b, c] = self.points;
        Bounds {
            min: Point2D::new(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y)),
            max: Point2D::new(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y)),
        }
    }
}
