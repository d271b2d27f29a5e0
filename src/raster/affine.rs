//! Texture-to-screen affine solve for a single textured triangle.

use crate::foundation::core::Affine;
use crate::raster::RenderTriangle;

/// Solve the affine map that sends each vertex's `(u, v)` onto its `(x, y)`.
///
/// UVs must already be in texture pixel space. Returns `None` when the two UV edges are
/// collinear (zero texture-space area), in which case no finite map exists.
pub fn solve_affine(tri: &RenderTriangle) -> Option<Affine> {
    let [v0, v1, v2] = tri.vertices;

    let (x1, y1) = (v1.x - v0.x, v1.y - v0.y);
    let (x2, y2) = (v2.x - v0.x, v2.y - v0.y);
    let (u1, w1) = (v1.u - v0.u, v1.v - v0.v);
    let (u2, w2) = (v2.u - v0.u, v2.v - v0.v);

    let det = u1 * w2 - u2 * w1;
    let magnitude = (u1 * w2).abs() + (u2 * w1).abs();
    if !det.is_finite() || det.abs() <= f64::EPSILON * magnitude || det == 0.0 {
        return None;
    }

    let a = (w2 * x1 - w1 * x2) / det;
    let b = (w2 * y1 - w1 * y2) / det;
    let c = (u1 * x2 - u2 * x1) / det;
    let d = (u1 * y2 - u2 * y1) / det;
    let e = v0.x - a * v0.u - c * v0.v;
    let f = v0.y - b * v0.u - d * v0.v;

    let coeffs = [a, b, c, d, e, f];
    coeffs
        .iter()
        .all(|k| k.is_finite())
        .then(|| Affine::new(coeffs))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/affine.rs"]
mod tests;
