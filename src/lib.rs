//! bonecanvas draws skeletal 2D animation poses on surfaces that only know how to clip,
//! transform and blit whole images.
//!
//! - Fit the animation's bounds to the surface once per resize with [`compute_fit`]
//! - Each frame, hand the solver's [`Pose`] to [`render_frame`] together with a
//!   [`TextureLookup`] and a [`Surface`]
//!
//! Textured triangles are faked per triangle: clip to the triangle, apply the affine map from
//! texture pixels to screen, blit the whole page.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod atlas;
pub mod pose;
pub mod raster;
pub mod render;
pub mod resolve;
pub mod surface;
pub mod viewport;

pub use crate::atlas::{Atlas, Bitmap, BitmapId, TextureLookup, TextureRegion};
pub use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Size, Vec2};
pub use crate::foundation::error::{BoneCanvasError, BoneCanvasResult};
pub use crate::pose::{Attachment, MeshAttachment, Pose, RegionAttachment, Slot};
pub use crate::raster::{RenderTriangle, Vertex};
pub use crate::render::config::{DrawMode, RenderConfig};
pub use crate::render::frame::{FrameStats, blend_transitions, render_frame};
pub use crate::surface::cpu::{CpuSurface, CpuSurfaceOpts, FrameRGBA};
pub use crate::surface::recording::{RecordingSurface, SurfaceOp};
pub use crate::surface::{BlendMode, StateGuard, Surface};
pub use crate::viewport::{FitTransform, OVERSCAN, compute_fit};
