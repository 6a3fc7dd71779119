use log::warn;

use crate::triangle::TriangleId;

/// Packed `0xRRGGBBAA` colour.
pub type Color = u32;

/// Returned for triangles with no entry in the table.
pub const UNSET_COLOR: Color = 0x0000_0000;

pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
    u32::from_be_bytes([r, g, b, a])
}

pub fn to_rgba(color: Color) -> (u8, u8, u8, u8) {
    let [r, g, b, a] = color.to_be_bytes();
    (r, g, b, a)
}

/// Flat colour per triangle, index-aligned with the triangle list.
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    colors: Vec<Color>,
}

impl MaterialTable {
    pub fn new(colors: Vec<Color>) -> Self {
        MaterialTable { colors }
    }

    /// Builds the table and warns when the colour list does not line up with the triangles.
    pub fn for_triangles(colors: Vec<Color>, triangle_count: usize) -> Self {
        if colors.len() != triangle_count {
            warn!(
                "{} colours supplied for {} triangles, missing entries render as unset",
                colors.len(),
                triangle_count
            );
        }
        Self::new(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline(always)]
    pub fn color_for(&self, id: TriangleId) -> Color {
        self.colors.get(id.0).copied().unwrap_or(UNSET_COLOR)
    }
}
