//! The minimal drawing surface the renderer targets.
//!
//! A [`Surface`] offers what a 2D canvas context offers: a transform stack, path clipping,
//! whole-image blits and (for diagnostics) path stroking. There is no textured-triangle
//! primitive; [`crate::raster::triangle`] builds one out of clip + transform + blit.

pub mod cpu;
pub mod recording;

use std::ops::{Deref, DerefMut};

use crate::atlas::Bitmap;
use crate::foundation::core::{Affine, BezPath, Rect, Rgba8};

/// Compositing mode requested by a slot.
///
/// The renderer only reports boundaries between modes; compositing is the surface's job.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Source-over.
    #[default]
    Normal,
    /// Additive.
    Additive,
    /// Multiply.
    Multiply,
    /// Screen.
    Screen,
}

/// Stateful 2D drawing context.
///
/// Transform helpers post-multiply onto the current transform, like a canvas context.
pub trait Surface {
    /// Push the current transform, clip and blend state.
    fn save(&mut self);

    /// Pop the state pushed by the matching [`Surface::save`].
    fn restore(&mut self);

    /// Current user-space to device-space transform.
    fn current_transform(&self) -> Affine;

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);

    /// Intersect the clip region with `path`, given in current user space.
    fn clip(&mut self, path: &BezPath);

    /// Draw the `src` sub-rectangle of `bitmap` into `dst` (user space).
    ///
    /// Both rectangles are normalized first, as in a canvas `drawImage` call: negative
    /// extents move the rectangle's origin but never mirror the image.
    fn draw_image(&mut self, bitmap: &Bitmap, src: Rect, dst: Rect);

    /// Stroke `path` (user space) with a hairline of `color`.
    fn stroke_path(&mut self, path: &BezPath, color: Rgba8);

    /// Switch the blend mode used by subsequent draws.
    fn set_blend_mode(&mut self, _mode: BlendMode) {}

    /// Reset the transform to identity.
    fn reset_transform(&mut self) {
        self.set_transform(Affine::IDENTITY);
    }

    /// Post-multiply `transform` onto the current transform.
    fn transform(&mut self, transform: Affine) {
        let next = self.current_transform() * transform;
        self.set_transform(next);
    }

    /// Post-multiply a translation.
    fn translate(&mut self, tx: f64, ty: f64) {
        self.transform(Affine::translate((tx, ty)));
    }

    /// Post-multiply a non-uniform scale.
    fn scale(&mut self, sx: f64, sy: f64) {
        self.transform(Affine::scale_non_uniform(sx, sy));
    }

    /// Post-multiply a rotation (radians, clockwise in y-down space).
    fn rotate(&mut self, radians: f64) {
        self.transform(Affine::rotate(radians));
    }

    /// Draw the whole bitmap at its natural size with its top-left at the user-space origin.
    fn draw_bitmap(&mut self, bitmap: &Bitmap) {
        let full = bitmap.bounds();
        self.draw_image(bitmap, full, full);
    }
}

/// Saves surface state on creation and restores it on drop.
///
/// Every exit path of a draw, including early returns, leaves the surface as it found it.
pub struct StateGuard<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> StateGuard<'a, S> {
    /// Save `surface` state and return a guard that restores it.
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for StateGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for StateGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for StateGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/guard.rs"]
mod tests;
