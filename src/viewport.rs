//! Fitting an animation's bounds into the drawing surface.

use crate::foundation::core::{Affine, Point, Rect, Size};
use crate::surface::Surface;

/// Extra zoom-out applied on top of the cover fit.
pub const OVERSCAN: f64 = 1.2;

/// A computed view transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitTransform {
    /// Content units per surface pixel (`max(sx, sy) * OVERSCAN`).
    pub scale: f64,
    /// Centre of the target bounds, in content units.
    pub center: Point,
    /// Surface size multiplied by `scale`, in content units.
    pub scaled_surface: Size,
}

/// Compute the transform that frames `bounds` on a `surface`-sized viewport.
///
/// The larger of the two axis ratios wins, then [`OVERSCAN`] adds a 20% margin. Zero-sized
/// surfaces yield a non-finite scale; callers must not pass them.
pub fn compute_fit(bounds: Rect, surface: Size) -> FitTransform {
    let scale_x = bounds.width() / surface.width;
    let scale_y = bounds.height() / surface.height;
    let scale = scale_x.max(scale_y) * OVERSCAN;

    FitTransform {
        scale,
        center: bounds.center(),
        scaled_surface: Size::new(surface.width * scale, surface.height * scale),
    }
}

impl FitTransform {
    /// The composed view matrix: `scale(1/s) * translate(-center) * translate(scaled / 2)`.
    pub fn to_affine(&self) -> Affine {
        let inv = 1.0 / self.scale;
        Affine::scale(inv)
            * Affine::translate((-self.center.x, -self.center.y))
            * Affine::translate((
                self.scaled_surface.width / 2.0,
                self.scaled_surface.height / 2.0,
            ))
    }

    /// Replace `surface`'s transform with this view.
    ///
    /// The transform is reset first so repeated fits do not compound.
    pub fn apply<S: Surface + ?Sized>(&self, surface: &mut S) {
        let inv = 1.0 / self.scale;
        surface.reset_transform();
        surface.scale(inv, inv);
        surface.translate(-self.center.x, -self.center.y);
        surface.translate(
            self.scaled_surface.width / 2.0,
            self.scaled_surface.height / 2.0,
        );
    }
}

#[cfg(test)]
#[path = "../tests/unit/viewport.rs"]
mod tests;
