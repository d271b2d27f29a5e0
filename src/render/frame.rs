//! Walking the draw order and issuing surface calls.

use std::f64::consts::FRAC_PI_2;

use kurbo::Shape;

use crate::atlas::TextureLookup;
use crate::foundation::core::{Rect, triangle_path};
use crate::pose::{Pose, Slot};
use crate::raster::triangle::blit_triangle;
use crate::render::config::{DrawMode, RenderConfig};
use crate::resolve::{AttachmentShape, ResolvedAttachment, resolve_slot};
use crate::surface::{BlendMode, StateGuard, Surface};

/// Counters for one [`render_frame`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Slots that produced draw calls.
    pub slots_drawn: usize,
    /// Slots skipped (empty, non-drawable, unresolvable, or not a quad in image mode).
    pub slots_skipped: usize,
    /// Triangles blitted.
    pub triangles_drawn: usize,
    /// Triangles skipped for zero texture-space area.
    pub triangles_degenerate: usize,
    /// Blend mode boundaries reported to the surface.
    pub blend_changes: usize,
}

/// Positions in `modes` where the mode differs from the one before it.
///
/// The first element always starts a run, since no mode is active before a frame.
pub fn blend_transitions<I>(modes: I) -> Vec<(usize, BlendMode)>
where
    I: IntoIterator<Item = BlendMode>,
{
    modes
        .into_iter()
        .enumerate()
        .scan(None, |running: &mut Option<BlendMode>, (i, mode)| {
            let changed = *running != Some(mode);
            *running = Some(mode);
            Some(changed.then_some((i, mode)))
        })
        .flatten()
        .collect()
}

/// Draw `pose` in slot order.
///
/// Never fails: slots that cannot be drawn and degenerate triangles are skipped, and the
/// surface's transform and clip are the same on return as on entry.
#[tracing::instrument(skip(pose, textures, surface), fields(slots = pose.slots.len()))]
pub fn render_frame<S, T>(
    pose: &Pose,
    textures: &T,
    surface: &mut S,
    config: &RenderConfig,
) -> FrameStats
where
    S: Surface + ?Sized,
    T: TextureLookup + ?Sized,
{
    let stats = match config.mode {
        DrawMode::Images => draw_images(pose, textures, surface, config),
        DrawMode::Triangles => draw_triangles(pose, textures, surface, config),
    };
    tracing::debug!(?stats, "frame rendered");
    stats
}

fn draw_images<S, T>(
    pose: &Pose,
    textures: &T,
    surface: &mut S,
    config: &RenderConfig,
) -> FrameStats
where
    S: Surface + ?Sized,
    T: TextureLookup + ?Sized,
{
    let mut stats = FrameStats::default();
    for slot in &pose.slots {
        let Some(resolved) = resolve_slot(slot, textures) else {
            stats.slots_skipped += 1;
            continue;
        };
        let AttachmentShape::Quad { rotation } = resolved.shape else {
            tracing::trace!(slot = %slot.name, "meshes are not drawn in image mode");
            stats.slots_skipped += 1;
            continue;
        };
        draw_quad_image(surface, slot, &resolved, rotation, config);
        stats.slots_drawn += 1;
    }
    stats
}

/// One rotated, scaled blit of the region's sub-rectangle.
///
/// Width and height come from the quad's two edges at vertex 0, so a sheared quad is drawn
/// as the rectangle those edges span.
fn draw_quad_image<S>(
    surface: &mut S,
    slot: &Slot,
    quad: &ResolvedAttachment<'_>,
    attachment_rotation: f64,
    config: &RenderConfig,
) where
    S: Surface + ?Sized,
{
    let (origin, up, right) = (quad.vertices[0], quad.vertices[1], quad.vertices[3]);
    let w = (right.x - origin.x).hypot(right.y - origin.y);
    let h = -(up.x - origin.x).hypot(up.y - origin.y);
    let angle = (slot.bone_rotation - attachment_rotation).to_radians();

    let region = quad.region;
    let src = region.page_rect();

    let mut scope = StateGuard::new(surface);
    scope.translate(origin.x, origin.y);
    scope.rotate(angle);
    if region.rotate {
        let mut turned = StateGuard::new(&mut *scope);
        turned.rotate(FRAC_PI_2);
        turned.draw_image(&region.page, src, Rect::new(0.0, 0.0, h, -w));
    } else {
        scope.draw_image(&region.page, src, Rect::new(0.0, 0.0, w, h));
    }

    if config.debug {
        let outline = Rect::new(0.0, 0.0, w, h).to_path(0.1);
        scope.stroke_path(&outline, config.debug_color);
    }
}

fn draw_triangles<S, T>(
    pose: &Pose,
    textures: &T,
    surface: &mut S,
    config: &RenderConfig,
) -> FrameStats
where
    S: Surface + ?Sized,
    T: TextureLookup + ?Sized,
{
    let mut stats = FrameStats::default();

    let drawable: Vec<(&Slot, ResolvedAttachment<'_>)> = pose
        .slots
        .iter()
        .filter_map(|slot| resolve_slot(slot, textures).map(|r| (slot, r)))
        .collect();
    stats.slots_skipped = pose.slots.len() - drawable.len();

    let transitions = blend_transitions(drawable.iter().map(|(slot, _)| slot.blend_mode));
    let mut transitions = transitions.into_iter().peekable();

    for (i, (slot, attachment)) in drawable.iter().enumerate() {
        if let Some(&(at, mode)) = transitions.peek()
            && at == i
        {
            surface.set_blend_mode(mode);
            stats.blend_changes += 1;
            transitions.next();
        }

        for tri in attachment.render_triangles() {
            if blit_triangle(surface, attachment.bitmap(), &tri) {
                stats.triangles_drawn += 1;
            } else {
                tracing::trace!(slot = %slot.name, "degenerate triangle skipped");
                stats.triangles_degenerate += 1;
            }

            if config.debug {
                let [p0, p1, p2] = tri.positions();
                surface.stroke_path(&triangle_path(p0, p1, p2), config.debug_color);
            }
        }
        stats.slots_drawn += 1;
    }
    stats
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
