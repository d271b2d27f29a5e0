pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Straight-alpha RGBA8 colour of the debug overlay strokes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// CSS `green` (`#008000`), the wireframe colour of the debug overlay.
    pub const GREEN: Self = Self::new(0, 128, 0, 255);

    /// Build a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::GREEN
    }
}

/// Closed triangle path through three points.
pub fn triangle_path(p0: Point, p1: Point, p2: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(p0);
    path.line_to(p1);
    path.line_to(p2);
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
