//! Turns a slot's attachment into decoded vertices, a triangle list and a texture.

use crate::atlas::{Bitmap, TextureLookup, TextureRegion};
use crate::pose::{Attachment, POSITION_OFFSET, QUAD_VERTEX_COUNT, Slot, UV_OFFSET, VERTEX_STRIDE};
use crate::raster::{RenderTriangle, Vertex};

/// Index pattern splitting a region quad into two triangles.
pub static QUAD_TRIANGLES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Which drawable shape an attachment resolved from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttachmentShape {
    /// Region quad, with the attachment's local rotation in degrees.
    Quad {
        /// Local rotation relative to the bone, in degrees.
        rotation: f64,
    },
    /// Free-form mesh.
    Mesh,
}

/// A drawable attachment with its buffers decoded.
#[derive(Clone, Debug)]
pub struct ResolvedAttachment<'a> {
    /// Source shape.
    pub shape: AttachmentShape,
    /// Decoded world vertices with normalized UVs.
    pub vertices: Vec<Vertex>,
    /// Triangle list indexing into `vertices`.
    pub triangles: &'a [u16],
    /// Texture region the UVs address.
    pub region: &'a TextureRegion,
}

impl ResolvedAttachment<'_> {
    /// Page bitmap sampled by this attachment.
    pub fn bitmap(&self) -> &Bitmap {
        &self.region.page
    }

    /// Triangles in index-list order. UVs stay normalized.
    pub fn render_triangles(&self) -> impl Iterator<Item = RenderTriangle> + '_ {
        self.triangles.chunks_exact(3).map(|t| {
            RenderTriangle::new(
                self.vertices[usize::from(t[0])],
                self.vertices[usize::from(t[1])],
                self.vertices[usize::from(t[2])],
            )
        })
    }
}

/// Decode a flat world-vertex buffer into named records.
///
/// Returns `None` when the buffer is not a whole number of records.
pub fn decode_vertices(buffer: &[f32]) -> Option<Vec<Vertex>> {
    if buffer.len() % VERTEX_STRIDE != 0 {
        return None;
    }
    Some(
        buffer
            .chunks_exact(VERTEX_STRIDE)
            .map(|r| {
                Vertex::new(
                    f64::from(r[POSITION_OFFSET]),
                    f64::from(r[POSITION_OFFSET + 1]),
                    f64::from(r[UV_OFFSET]),
                    f64::from(r[UV_OFFSET + 1]),
                )
            })
            .collect(),
    )
}

/// Resolve the drawable content of `slot`.
///
/// Empty slots, non-drawable attachment kinds, unknown regions and malformed buffers all
/// yield `None`; a frame never fails because of one slot.
pub fn resolve_slot<'a, T>(slot: &'a Slot, textures: &'a T) -> Option<ResolvedAttachment<'a>>
where
    T: TextureLookup + ?Sized,
{
    let (shape, buffer, triangles, region_name) = match slot.attachment.as_ref()? {
        Attachment::Region(r) => (
            AttachmentShape::Quad {
                rotation: r.rotation,
            },
            r.world_vertices.as_slice(),
            QUAD_TRIANGLES.as_slice(),
            r.region.as_str(),
        ),
        Attachment::Mesh(m) => (
            AttachmentShape::Mesh,
            m.world_vertices.as_slice(),
            m.triangles.as_slice(),
            m.region.as_str(),
        ),
        other @ (Attachment::BoundingBox { .. }
        | Attachment::Path { .. }
        | Attachment::Point { .. }
        | Attachment::Clipping { .. }) => {
            tracing::trace!(slot = %slot.name, attachment = other.name(), "non-drawable attachment");
            return None;
        }
    };

    let Some(vertices) = decode_vertices(buffer) else {
        tracing::warn!(slot = %slot.name, len = buffer.len(), "vertex buffer is not whole records");
        return None;
    };
    if matches!(shape, AttachmentShape::Quad { .. }) && vertices.len() != QUAD_VERTEX_COUNT {
        tracing::warn!(slot = %slot.name, count = vertices.len(), "region quad needs 4 vertices");
        return None;
    }
    if triangles.len() % 3 != 0 || triangles.iter().any(|&i| usize::from(i) >= vertices.len()) {
        tracing::warn!(slot = %slot.name, "triangle list does not fit the vertex buffer");
        return None;
    }

    let Some(region) = textures.region(region_name) else {
        tracing::warn!(slot = %slot.name, region = region_name, "texture region not loaded");
        return None;
    };

    Some(ResolvedAttachment {
        shape,
        vertices,
        triangles,
        region,
    })
}

#[cfg(test)]
#[path = "../tests/unit/resolve.rs"]
mod tests;
