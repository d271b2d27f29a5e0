//! One textured triangle drawn as clip + affine transform + whole-bitmap blit.

use crate::atlas::Bitmap;
use crate::foundation::core::triangle_path;
use crate::raster::RenderTriangle;
use crate::raster::affine::solve_affine;
use crate::surface::{StateGuard, Surface};

/// Draw `tri` (normalized UVs) textured from `bitmap`.
///
/// The clip is set to the triangle's screen footprint before the transform changes, so the
/// blit of the whole bitmap only lands inside the triangle. Surface state is restored on
/// every path. Returns `false` when the triangle is degenerate in texture space and nothing
/// was drawn.
pub fn blit_triangle<S: Surface + ?Sized>(
    surface: &mut S,
    bitmap: &Bitmap,
    tri: &RenderTriangle,
) -> bool {
    let mut scope = StateGuard::new(surface);

    let [p0, p1, p2] = tri.positions();
    scope.clip(&triangle_path(p0, p1, p2));

    let Some(uv_to_screen) = solve_affine(&tri.with_pixel_uvs(bitmap.width(), bitmap.height()))
    else {
        return false;
    };

    scope.transform(uv_to_screen);
    scope.draw_bitmap(bitmap);
    true
}

#[cfg(test)]
#[path = "../../tests/unit/raster/triangle.rs"]
mod tests;
