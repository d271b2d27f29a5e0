//! Textured-triangle rasterization on top of clip-and-blit surfaces.

pub mod affine;
pub mod triangle;

use crate::foundation::core::Point;

/// A decoded pose vertex: screen-space position plus texture coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vertex {
    /// Screen-space x.
    pub x: f64,
    /// Screen-space y.
    pub y: f64,
    /// Texture u (normalized, or pixels once scaled).
    pub u: f64,
    /// Texture v (normalized, or pixels once scaled).
    pub v: f64,
}

impl Vertex {
    /// Build a vertex from position and texture coordinate.
    pub const fn new(x: f64, y: f64, u: f64, v: f64) -> Self {
        Self { x, y, u, v }
    }

    /// Screen-space position.
    pub fn position(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Three textured vertices; the unit of work handed to the triangle blitter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderTriangle {
    /// Vertices in index-list order.
    pub vertices: [Vertex; 3],
}

impl RenderTriangle {
    /// Build a triangle from three vertices.
    pub const fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Copy of this triangle with UVs multiplied by the texture's pixel size.
    pub fn with_pixel_uvs(&self, width: f64, height: f64) -> Self {
        Self {
            vertices: self.vertices.map(|v| Vertex {
                u: v.u * width,
                v: v.v * height,
                ..v
            }),
        }
    }

    /// Screen-space corner positions.
    pub fn positions(&self) -> [Point; 3] {
        self.vertices.map(Vertex::position)
    }
}
