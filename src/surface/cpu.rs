//! Raster [`Surface`] backed by `vello_cpu`.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use crate::atlas::{Bitmap, BitmapId};
use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8};
use crate::foundation::error::{BoneCanvasError, BoneCanvasResult};
use crate::surface::{BlendMode, Surface};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Write the frame as a straight-alpha PNG.
    pub fn save_png(&self, path: &Path) -> BoneCanvasResult<()> {
        let mut straight = self.data.clone();
        if self.premultiplied {
            for px in straight.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| BoneCanvasError::surface("frame byte length mismatch"))?;
        img.save(path)
            .with_context(|| format!("write frame png {}", path.display()))?;
        Ok(())
    }
}

/// Options for [`CpuSurface`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuSurfaceOpts {
    /// If set, the surface starts filled with this straight-alpha RGBA8 colour.
    pub clear_rgba: Option<[u8; 4]>,
}

impl CpuSurfaceOpts {
    /// Return options with a configured clear colour.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

#[derive(Clone, Copy, Debug)]
struct SavedState {
    transform: Affine,
    clip_depth: usize,
    blend: BlendMode,
}

/// Canvas-style drawing context over a `vello_cpu` render context.
///
/// Clips become clip layers; `restore()` pops every layer pushed since its `save()`.
/// Blend modes are tracked but composited as source-over.
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    transform: Affine,
    clip_depth: usize,
    blend: BlendMode,
    stack: Vec<SavedState>,
    image_cache: HashMap<BitmapId, vello_cpu::Image>,
}

impl CpuSurface {
    /// Create a surface of `width x height` pixels.
    pub fn new(width: u32, height: u32, opts: CpuSurfaceOpts) -> BoneCanvasResult<Self> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| BoneCanvasError::surface("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| BoneCanvasError::surface("surface height exceeds u16"))?;
        if width_u16 == 0 || height_u16 == 0 {
            return Err(BoneCanvasError::surface("surface must be at least 1x1"));
        }

        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        if let Some([r, g, b, a]) = opts.clear_rgba {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width_u16),
                f64::from(height_u16),
            ));
        }

        Ok(Self {
            width: width_u16,
            height: height_u16,
            ctx,
            transform: Affine::IDENTITY,
            clip_depth: 0,
            blend: BlendMode::Normal,
            stack: Vec::new(),
            image_cache: HashMap::new(),
        })
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Blend mode most recently requested.
    pub fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    /// Rasterize everything drawn so far and read the pixels back.
    pub fn finish(mut self) -> FrameRGBA {
        if !self.stack.is_empty() {
            tracing::warn!(
                open = self.stack.len(),
                "finishing surface with unrestored saves"
            );
        }
        for _ in 0..self.clip_depth {
            self.ctx.pop_layer();
        }

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn image_paint_for(&mut self, bitmap: &Bitmap) -> vello_cpu::Image {
        self.image_cache
            .entry(bitmap.id())
            .or_insert_with(|| vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(bitmap.pixmap().clone()),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            })
            .clone()
    }
}

impl Surface for CpuSurface {
    fn save(&mut self) {
        self.stack.push(SavedState {
            transform: self.transform,
            clip_depth: self.clip_depth,
            blend: self.blend,
        });
    }

    fn restore(&mut self) {
        let Some(state) = self.stack.pop() else {
            tracing::warn!("restore without matching save");
            return;
        };
        while self.clip_depth > state.clip_depth {
            self.ctx.pop_layer();
            self.clip_depth -= 1;
        }
        self.transform = state.transform;
        self.blend = state.blend;
    }

    fn current_transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn clip(&mut self, path: &BezPath) {
        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx.push_clip_layer(&bezpath_to_cpu(path));
        self.clip_depth += 1;
    }

    fn draw_image(&mut self, bitmap: &Bitmap, src: Rect, dst: Rect) {
        let (src, dst) = (src.abs(), dst.abs());
        if src.is_zero_area() || dst.is_zero_area() {
            return;
        }
        let paint = self.image_paint_for(bitmap);

        // Image pixels -> destination rectangle, in user space.
        let image_to_dst = Affine::translate((dst.x0, dst.y0))
            * Affine::scale_non_uniform(dst.width() / src.width(), dst.height() / src.height())
            * Affine::translate((-src.x0, -src.y0));

        self.ctx.set_transform(affine_to_cpu(self.transform));
        self.ctx.set_paint_transform(affine_to_cpu(image_to_dst));
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&rect_to_cpu(dst));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    fn stroke_path(&mut self, path: &BezPath, color: Rgba8) {
        // Hairline in device pixels regardless of the current scale.
        let mut device = path.clone();
        device.apply_affine(self.transform);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(1.0));
        let paint = vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, color.a);
        self.ctx.set_paint(paint);
        self.ctx.stroke_path(&bezpath_to_cpu(&device));
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        tracing::trace!(?mode, "blend mode change (composited as normal)");
        self.blend = mode;
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/surface/cpu.rs"]
mod tests;
