use super::*;
use crate::raster::triangle::blit_triangle;
use crate::raster::{RenderTriangle, Vertex};

fn solid(id: u32, w: u32, h: u32, rgba: [u8; 4]) -> Bitmap {
    let bytes: Vec<u8> = std::iter::repeat_n(rgba, (w * h) as usize)
        .flatten()
        .collect();
    Bitmap::from_rgba8_premul(BitmapId(id), w, h, &bytes).unwrap()
}

fn corner_triangle() -> RenderTriangle {
    RenderTriangle::new(
        Vertex::new(4.0, 4.0, 0.0, 0.0),
        Vertex::new(60.0, 4.0, 1.0, 0.0),
        Vertex::new(4.0, 60.0, 0.0, 1.0),
    )
}

#[test]
fn rejects_empty_and_oversized_surfaces() {
    assert!(CpuSurface::new(0, 10, CpuSurfaceOpts::default()).is_err());
    assert!(CpuSurface::new(10, 70_000, CpuSurfaceOpts::default()).is_err());
    let s = CpuSurface::new(32, 16, CpuSurfaceOpts::default()).unwrap();
    assert_eq!((s.width(), s.height()), (32, 16));
}

#[test]
fn clear_colour_fills_frame() {
    let opts = CpuSurfaceOpts::default().with_clear_rgba(Some([0, 0, 255, 255]));
    let frame = CpuSurface::new(8, 8, opts).unwrap().finish();
    assert_eq!(frame.data.len(), 8 * 8 * 4);
    assert!(frame.premultiplied);
    assert_eq!(frame.pixel(3, 3), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(8, 0), None);
}

#[test]
fn textured_triangle_stays_inside_its_clip() {
    let red = solid(1, 16, 16, [255, 0, 0, 255]);
    let mut surface = CpuSurface::new(64, 64, CpuSurfaceOpts::default()).unwrap();
    assert!(blit_triangle(&mut surface, &red, &corner_triangle()));
    let frame = surface.finish();

    let inside = frame.pixel(12, 12).unwrap();
    assert!(inside[0] > 200 && inside[3] > 200, "inside: {inside:?}");
    let outside = frame.pixel(50, 50).unwrap();
    assert_eq!(outside[3], 0, "outside: {outside:?}");
}

#[test]
fn restore_pops_clip_layers() {
    let red = solid(1, 16, 16, [255, 0, 0, 255]);
    let blue = solid(2, 64, 64, [0, 0, 255, 255]);
    let mut surface = CpuSurface::new(64, 64, CpuSurfaceOpts::default()).unwrap();
    assert!(blit_triangle(&mut surface, &red, &corner_triangle()));
    surface.draw_bitmap(&blue);
    let frame = surface.finish();

    let far = frame.pixel(50, 50).unwrap();
    assert!(far[2] > 200 && far[3] > 200, "far: {far:?}");
}

#[test]
fn draw_image_maps_source_rect_onto_destination() {
    // Left half red, right half green; only the green half is drawn.
    let mut bytes = Vec::new();
    for _y in 0..4 {
        for x in 0..8 {
            bytes.extend_from_slice(if x < 4 {
                &[255, 0, 0, 255]
            } else {
                &[0, 255, 0, 255]
            });
        }
    }
    let page = Bitmap::from_rgba8_premul(BitmapId(5), 8, 4, &bytes).unwrap();

    let mut surface = CpuSurface::new(32, 32, CpuSurfaceOpts::default()).unwrap();
    surface.draw_image(
        &page,
        Rect::new(4.0, 0.0, 8.0, 4.0),
        Rect::new(0.0, 0.0, 32.0, 32.0),
    );
    let frame = surface.finish();
    let px = frame.pixel(4, 16).unwrap();
    assert!(px[1] > 200 && px[0] < 60, "px: {px:?}");
}

#[test]
fn negative_extents_move_the_destination_without_mirroring() {
    // Top half red, bottom half blue.
    let mut bytes = Vec::new();
    for y in 0..8 {
        for _x in 0..4 {
            bytes.extend_from_slice(if y < 4 {
                &[255, 0, 0, 255]
            } else {
                &[0, 0, 255, 255]
            });
        }
    }
    let page = Bitmap::from_rgba8_premul(BitmapId(6), 4, 8, &bytes).unwrap();

    let mut surface = CpuSurface::new(32, 32, CpuSurfaceOpts::default()).unwrap();
    surface.translate(0.0, 32.0);
    surface.draw_image(&page, page.bounds(), Rect::new(0.0, 0.0, 32.0, -32.0));
    let frame = surface.finish();

    let top = frame.pixel(16, 4).unwrap();
    let bottom = frame.pixel(16, 28).unwrap();
    assert!(top[0] > 200 && top[2] < 60, "top: {top:?}");
    assert!(bottom[2] > 200 && bottom[0] < 60, "bottom: {bottom:?}");
}

#[test]
fn stroke_marks_pixels_on_the_path() {
    let mut surface = CpuSurface::new(32, 32, CpuSurfaceOpts::default()).unwrap();
    let mut path = BezPath::new();
    path.move_to((2.0, 10.5));
    path.line_to((30.0, 10.5));
    surface.stroke_path(&path, Rgba8::GREEN);
    let frame = surface.finish();
    assert!(frame.pixel(16, 10).unwrap()[1] > 0);
    assert_eq!(frame.pixel(16, 20).unwrap()[3], 0);
}

#[test]
fn blend_mode_is_tracked_and_restored() {
    let mut surface = CpuSurface::new(4, 4, CpuSurfaceOpts::default()).unwrap();
    surface.save();
    surface.set_blend_mode(BlendMode::Additive);
    assert_eq!(surface.blend_mode(), BlendMode::Additive);
    surface.restore();
    assert_eq!(surface.blend_mode(), BlendMode::Normal);
}

#[test]
fn save_png_writes_straight_alpha() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![64, 0, 0, 128, 0, 0, 0, 0],
        premultiplied: true,
    };
    let path = std::env::temp_dir().join(format!("bonecanvas_frame_{}.png", std::process::id()));
    frame.save_png(&path).unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [128, 0, 0, 128]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 0]);
    std::fs::remove_file(&path).unwrap();
}
