//! Per-frame pose data handed over by the skeletal solver.
//!
//! A [`Pose`] is read-only for the renderer and lives for a single frame. Vertex buffers are
//! already in world space; the renderer never skins or transforms them itself.

use crate::foundation::error::{BoneCanvasError, BoneCanvasResult};
use crate::surface::BlendMode;

/// Floats per world vertex record.
pub const VERTEX_STRIDE: usize = 8;
/// Offset of `x` (followed by `y`) inside a vertex record.
pub const POSITION_OFFSET: usize = 0;
/// Offset of `u` (followed by `v`) inside a vertex record.
pub const UV_OFFSET: usize = 6;
/// Vertices in a region quad.
pub const QUAD_VERTEX_COUNT: usize = 4;

/// Slots in back-to-front draw order.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Pose {
    /// Draw order. Earlier slots are painted first.
    pub slots: Vec<Slot>,
}

/// A drawing site holding at most one attachment.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Slot {
    /// Slot name, for diagnostics.
    pub name: String,
    /// Accumulated world rotation (x axis) of the slot's bone, in degrees.
    #[serde(default)]
    pub bone_rotation: f64,
    /// Blend mode requested for this slot.
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// Current attachment, if any.
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

/// Attachment shapes a slot can hold.
///
/// Only [`Attachment::Region`] and [`Attachment::Mesh`] are drawable; the rest carry no texture
/// and are skipped by the renderer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Attachment {
    /// Textured quad.
    Region(RegionAttachment),
    /// Textured triangle mesh.
    Mesh(MeshAttachment),
    /// Hit-test polygon.
    BoundingBox {
        /// Attachment name.
        name: String,
    },
    /// Spline used by path constraints.
    Path {
        /// Attachment name.
        name: String,
    },
    /// Single oriented point.
    Point {
        /// Attachment name.
        name: String,
    },
    /// Clipping polygon.
    Clipping {
        /// Attachment name.
        name: String,
    },
}

impl Attachment {
    /// Attachment name, for diagnostics.
    pub fn name(&self) -> &str {
        match self {
            Self::Region(r) => &r.name,
            Self::Mesh(m) => &m.name,
            Self::BoundingBox { name }
            | Self::Path { name }
            | Self::Point { name }
            | Self::Clipping { name } => name,
        }
    }
}

/// A single textured quad.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegionAttachment {
    /// Attachment name.
    pub name: String,
    /// Atlas region name.
    pub region: String,
    /// Local rotation relative to the bone, in degrees.
    #[serde(default)]
    pub rotation: f64,
    /// Four world vertex records, computed without premultiplied colour.
    ///
    /// Corners run bottom-left, top-left, top-right, bottom-right of the image. UVs are
    /// page-normalized with `v = 0` at the top row, so an unrotated region has `(u, v2)` at
    /// the bottom-left; a region stored rotated in its page has `(u2, v2)` there and the
    /// remaining corners follow the rotation.
    pub world_vertices: Vec<f32>,
}

/// An arbitrary textured triangle mesh.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeshAttachment {
    /// Attachment name.
    pub name: String,
    /// Atlas region name.
    pub region: String,
    /// World vertex records, computed without premultiplied colour.
    pub world_vertices: Vec<f32>,
    /// Triangle list, three vertex indices per triangle.
    pub triangles: Vec<u16>,
}

impl Pose {
    /// Parse a pose from JSON.
    pub fn from_json(text: &str) -> BoneCanvasResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check every drawable attachment's buffers.
    ///
    /// Rendering tolerates these problems by skipping the slot; this reports them up front.
    pub fn validate(&self) -> BoneCanvasResult<()> {
        for slot in &self.slots {
            match &slot.attachment {
                Some(Attachment::Region(r)) => {
                    if r.world_vertices.len() != QUAD_VERTEX_COUNT * VERTEX_STRIDE {
                        return Err(BoneCanvasError::validation(format!(
                            "slot '{}': region '{}' needs {} vertex floats, got {}",
                            slot.name,
                            r.name,
                            QUAD_VERTEX_COUNT * VERTEX_STRIDE,
                            r.world_vertices.len()
                        )));
                    }
                }
                Some(Attachment::Mesh(m)) => check_mesh(&slot.name, m)?,
                _ => {}
            }
        }
        Ok(())
    }
}

fn check_mesh(slot: &str, mesh: &MeshAttachment) -> BoneCanvasResult<()> {
    if mesh.world_vertices.len() % VERTEX_STRIDE != 0 {
        return Err(BoneCanvasError::validation(format!(
            "slot '{slot}': mesh '{}' vertex buffer is not a multiple of {VERTEX_STRIDE}",
            mesh.name
        )));
    }
    if mesh.triangles.len() % 3 != 0 {
        return Err(BoneCanvasError::validation(format!(
            "slot '{slot}': mesh '{}' triangle list is not a multiple of 3",
            mesh.name
        )));
    }
    let count = mesh.world_vertices.len() / VERTEX_STRIDE;
    if let Some(bad) = mesh.triangles.iter().find(|&&i| usize::from(i) >= count) {
        return Err(BoneCanvasError::validation(format!(
            "slot '{slot}': mesh '{}' index {bad} out of range for {count} vertices",
            mesh.name
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/pose.rs"]
mod tests;
