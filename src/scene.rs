use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, warn};
use rand::Rng;

use crate::material::{Color, MaterialTable, rgba};
use crate::point2d::Point2D;
use crate::triangle::Triangle2D;

/// Triangles plus their index-aligned flat colours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub triangles: Vec<Triangle2D>,
    pub colors: Vec<Color>,
}

impl Scene {
    pub fn push(&mut self, triangle: Triangle2D, color: Color) {
        self.triangles.push(triangle);
        self.colors.push(color);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn materials(&self) -> MaterialTable {
        MaterialTable::for_triangles(self.colors.clone(), self.triangles.len())
    }

    /// Rotates every triangle's vertices so its greatest-y vertex comes first.
    pub fn reorder(&mut self) {
        for triangle in self.triangles.iter_mut() {
            *triangle = triangle.reordered();
        }
    }

    /// Parses triangle definitions, one per line: `x1,y1 x2,y2 x3,y3 colorHex`.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn parse(source: &str) -> Result<Scene> {
        let mut scene = Scene::default();
        for (index, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (triangle, color) = parse_definition(line)
                .with_context(|| format!("line {}: invalid triangle definition `{}`", index + 1, line))?;
            if triangle.is_degenerate() {
                warn!("line {}: triangle has zero area", index + 1);
            }
            scene.push(triangle, color);
        }
        debug!("parsed {} triangles", scene.len());
        Ok(scene)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Scene> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read triangle definitions from {}", path.display()))?;
        Scene::parse(&source).with_context(|| format!("in {}", path.display()))
    }

    /// `count` triangles with vertices inside `width x height` and random opaque colours.
    pub fn random<R: Rng>(count: usize, width: u32, height: u32, rng: &mut R) -> Scene {
        let mut scene = Scene::default();
        let max_x = width.max(1) as f32;
        let max_y = height.max(1) as f32;
        for _ in 0..count {
            let mut vertex = || Point2D::new(rng.gen_range(0.0..max_x), rng.gen_range(0.0..max_y));
            let triangle = Triangle2D::new(vertex(), vertex(), vertex());
            let color = rgba(rng.gen_range(0..=255), rng.gen_range(0..=255), rng.gen_range(0..=255), 255);
            scene.push(triangle, color);
        }
        scene
    }
}

fn parse_point(token: &str) -> Result<Point2D> {
    let (x, y) = token
        .split_once(',')
        .ok_or_else(|| anyhow!("expected `x,y`, found `{}`", token))?;
    let x = x.trim().parse::<f32>().with_context(|| format!("bad x coordinate `{}`", x))?;
    let y = y.trim().parse::<f32>().with_context(|| format!("bad y coordinate `{}`", y))?;
    Ok(Point2D::new(x, y))
}

pub fn parse_color(token: &str) -> Result<Color> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u32::from_str_radix(digits, 16).with_context(|| format!("bad hex colour `{}`", token))
}

fn parse_definition(line: &str) -> Result<(Triangle2D, Color)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 4 {
        bail!("expected 3 points and a colour, found {} fields", tokens.len());
    }
    let a = parse_point(tokens[0])?;
    let b = parse_point(tokens[1])?;
    let c = parse_point(tokens[2])?;
    let color = parse_color(tokens[3])?;
    Ok((Triangle2D::new(a, b, c), color))
}
