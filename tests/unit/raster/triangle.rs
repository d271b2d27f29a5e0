use super::*;
use crate::atlas::BitmapId;
use crate::foundation::core::{Affine, Point, Rect};
use crate::raster::Vertex;
use crate::surface::recording::{RecordingSurface, SurfaceOp};

fn page() -> Bitmap {
    Bitmap::blank(BitmapId(3), 100, 50).unwrap()
}

fn tri(offset: f64) -> RenderTriangle {
    RenderTriangle::new(
        Vertex::new(offset, 0.0, 0.0, 0.0),
        Vertex::new(offset + 20.0, 0.0, 0.5, 0.0),
        Vertex::new(offset, 10.0, 0.0, 1.0),
    )
}

#[test]
fn blit_clips_transforms_draws_and_restores() {
    let bmp = page();
    let mut surface = RecordingSurface::new();
    assert!(blit_triangle(&mut surface, &bmp, &tri(0.0)));
    assert!(surface.is_balanced());
    assert_eq!(surface.clip_depth(), 0);
    assert_eq!(surface.current_transform(), Affine::IDENTITY);

    let ops = surface.ops();
    assert_eq!(ops.len(), 5);
    assert_eq!(ops[0], SurfaceOp::Save);
    let SurfaceOp::Clip { path, transform } = &ops[1] else {
        panic!("expected clip, got {:?}", ops[1]);
    };
    assert_eq!(*transform, Affine::IDENTITY);
    assert_eq!(
        kurbo::Shape::bounding_box(path),
        Rect::new(0.0, 0.0, 20.0, 10.0)
    );
    assert!(matches!(ops[2], SurfaceOp::SetTransform(_)));
    let SurfaceOp::DrawImage {
        src,
        dst,
        transform,
        clip_depth,
        ..
    } = &ops[3]
    else {
        panic!("expected draw, got {:?}", ops[3]);
    };
    assert_eq!(*src, bmp.bounds());
    assert_eq!(*dst, bmp.bounds());
    assert_eq!(*clip_depth, 1);

    // Pixel-space UV corners land on the triangle corners.
    let hit = *transform * Point::new(50.0, 0.0);
    assert!((hit.x - 20.0).abs() < 1e-9 && hit.y.abs() < 1e-9);
    let hit = *transform * Point::new(0.0, 50.0);
    assert!(hit.x.abs() < 1e-9 && (hit.y - 10.0).abs() < 1e-9);

    assert_eq!(ops[4], SurfaceOp::Restore);
}

#[test]
fn degenerate_triangle_draws_nothing_but_stays_balanced() {
    let bmp = page();
    let flat = RenderTriangle::new(
        Vertex::new(0.0, 0.0, 0.2, 0.2),
        Vertex::new(10.0, 0.0, 0.4, 0.4),
        Vertex::new(0.0, 10.0, 0.6, 0.6),
    );
    let mut surface = RecordingSurface::new();
    assert!(!blit_triangle(&mut surface, &bmp, &flat));
    assert!(surface.is_balanced());
    assert_eq!(surface.draws().count(), 0);
    assert_eq!(surface.ops().first(), Some(&SurfaceOp::Save));
    assert_eq!(surface.ops().last(), Some(&SurfaceOp::Restore));
}

#[test]
fn consecutive_blits_do_not_share_clips() {
    let bmp = page();
    let mut surface = RecordingSurface::new();
    surface.translate(3.0, 4.0);
    let before = surface.current_transform();

    assert!(blit_triangle(&mut surface, &bmp, &tri(0.0)));
    assert!(blit_triangle(&mut surface, &bmp, &tri(100.0)));

    let depths: Vec<_> = surface
        .draws()
        .map(|op| match op {
            SurfaceOp::DrawImage { clip_depth, .. } => *clip_depth,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(depths, vec![1, 1]);
    assert_eq!(surface.current_transform(), before);
    assert!(surface.is_balanced());

    // The second clip is set under the caller's transform, not the first triangle's.
    let clips: Vec<_> = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            SurfaceOp::Clip { transform, .. } => Some(*transform),
            _ => None,
        })
        .collect();
    assert_eq!(clips, vec![before, before]);
}
