//! Scanline triangle rasterizer
//! Triangles become per-row edge crossings, which become coloured spans.
//! Overlaps resolve to the most recently opened triangle, not by depth.

pub mod config;
pub mod error;
pub mod intersect;
pub mod material;
pub mod perf;
pub mod point2d;
pub mod raster;
pub mod scanline;
pub mod scene;
pub mod screen;
pub mod stack;
pub mod triangle;

pub use error::RasterError;
pub use intersect::{Ray, has_intersection, intersect};
pub use material::{Color, MaterialTable, UNSET_COLOR};
pub use perf::{PerfTimer, RenderStats};
pub use point2d::Point2D;
pub use raster::{Rasterizer, rasterize, rasterize_parallel};
pub use scanline::{Intersection, Scanline, Scanlines, build_scanlines};
pub use scene::Scene;
pub use screen::ScreenSpace;
pub use stack::ActiveStack;
pub use triangle::{Edge, Triangle2D, TriangleId};
