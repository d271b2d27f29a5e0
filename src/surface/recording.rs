//! A surface that records draw calls instead of producing pixels.

use crate::atlas::{Bitmap, BitmapId};
use crate::foundation::core::{Affine, BezPath, Rect, Rgba8};
use crate::surface::{BlendMode, Surface};

/// One recorded surface call, with the state it ran under.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// `save()`.
    Save,
    /// `restore()`.
    Restore,
    /// Transform replaced (directly or via a transform helper).
    SetTransform(Affine),
    /// Clip pushed.
    Clip {
        /// Path in user space.
        path: BezPath,
        /// Transform active when the clip was set.
        transform: Affine,
    },
    /// Image blit.
    DrawImage {
        /// Source bitmap.
        bitmap: BitmapId,
        /// Source rectangle in bitmap pixels.
        src: Rect,
        /// Destination rectangle in user space.
        dst: Rect,
        /// Transform active at draw time.
        transform: Affine,
        /// Number of clips active at draw time.
        clip_depth: usize,
    },
    /// Debug stroke.
    Stroke {
        /// Path in user space.
        path: BezPath,
        /// Stroke colour.
        color: Rgba8,
        /// Transform active at draw time.
        transform: Affine,
    },
    /// Blend mode switch.
    SetBlendMode(BlendMode),
}

impl SurfaceOp {
    /// Device-space bounding box of a draw or clip, `None` for state ops.
    pub fn device_bounds(&self) -> Option<Rect> {
        match self {
            Self::DrawImage { dst, transform, .. } => Some(transform.transform_rect_bbox(*dst)),
            Self::Clip { path, transform } | Self::Stroke { path, transform, .. } => {
                let mut device = path.clone();
                device.apply_affine(*transform);
                Some(kurbo::Shape::bounding_box(&device))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
struct SavedState {
    transform: Affine,
    clip_depth: usize,
    blend: BlendMode,
}

/// Records every call and tracks transform, clip and blend state like a canvas would.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    transform: Affine,
    clips: Vec<(BezPath, Affine)>,
    blend: BlendMode,
    stack: Vec<SavedState>,
    unmatched_restores: usize,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            transform: Affine::IDENTITY,
            clips: Vec::new(),
            blend: BlendMode::Normal,
            stack: Vec::new(),
            unmatched_restores: 0,
        }
    }
}

impl RecordingSurface {
    /// Empty recorder with identity transform and no clip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Only the image blits, in call order.
    pub fn draws(&self) -> impl Iterator<Item = &SurfaceOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::DrawImage { .. }))
    }

    /// Bitmap ids of all blits, in call order.
    pub fn drawn_bitmaps(&self) -> Vec<BitmapId> {
        self.draws()
            .filter_map(|op| match op {
                SurfaceOp::DrawImage { bitmap, .. } => Some(*bitmap),
                _ => None,
            })
            .collect()
    }

    /// Clips currently in effect.
    pub fn clip_depth(&self) -> usize {
        self.clips.len()
    }

    /// Open `save()` calls without a matching `restore()`.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Blend mode currently in effect.
    pub fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    /// `true` when every save was restored and no restore ran without a save.
    pub fn is_balanced(&self) -> bool {
        self.stack.is_empty() && self.unmatched_restores == 0
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(SavedState {
            transform: self.transform,
            clip_depth: self.clips.len(),
            blend: self.blend,
        });
        self.ops.push(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(SurfaceOp::Restore);
        let Some(state) = self.stack.pop() else {
            self.unmatched_restores += 1;
            return;
        };
        self.transform = state.transform;
        self.clips.truncate(state.clip_depth);
        self.blend = state.blend;
    }

    fn current_transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.ops.push(SurfaceOp::SetTransform(transform));
    }

    fn clip(&mut self, path: &BezPath) {
        self.clips.push((path.clone(), self.transform));
        self.ops.push(SurfaceOp::Clip {
            path: path.clone(),
            transform: self.transform,
        });
    }

    fn draw_image(&mut self, bitmap: &Bitmap, src: Rect, dst: Rect) {
        self.ops.push(SurfaceOp::DrawImage {
            bitmap: bitmap.id(),
            src,
            dst,
            transform: self.transform,
            clip_depth: self.clips.len(),
        });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Rgba8) {
        self.ops.push(SurfaceOp::Stroke {
            path: path.clone(),
            color,
            transform: self.transform,
        });
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
        self.ops.push(SurfaceOp::SetBlendMode(mode));
    }
}
