//! Texture pages and the named regions packed into them.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Rect;
use crate::foundation::error::{BoneCanvasError, BoneCanvasResult};

/// Stable identity of a loaded bitmap, used for paint caching and draw recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitmapId(pub u32);

/// A loaded premultiplied RGBA8 texture page.
///
/// Cloning is cheap; pixels are shared.
#[derive(Clone, Debug)]
pub struct Bitmap {
    id: BitmapId,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl Bitmap {
    /// Wrap an existing pixmap.
    pub fn new(id: BitmapId, pixmap: vello_cpu::Pixmap) -> Self {
        Self {
            id,
            pixmap: Arc::new(pixmap),
        }
    }

    /// A transparent bitmap of the given size.
    pub fn blank(id: BitmapId, width: u32, height: u32) -> BoneCanvasResult<Self> {
        let (w, h) = pixmap_dims(width, height)?;
        Ok(Self::new(id, vello_cpu::Pixmap::new(w, h)))
    }

    /// Build a bitmap from tightly packed premultiplied RGBA8 bytes.
    pub fn from_rgba8_premul(
        id: BitmapId,
        width: u32,
        height: u32,
        rgba8_premul: &[u8],
    ) -> BoneCanvasResult<Self> {
        let (w, h) = pixmap_dims(width, height)?;
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(BoneCanvasError::validation(
                "bitmap byte length does not match its dimensions",
            ));
        }

        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for px in rgba8_premul.chunks_exact(4) {
            let a = px[3];
            may_have_opacities |= a != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a,
            });
        }

        Ok(Self::new(
            id,
            vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities),
        ))
    }

    /// Decode an encoded image (PNG, ...) and premultiply its alpha.
    pub fn decode(id: BitmapId, bytes: &[u8]) -> BoneCanvasResult<Self> {
        let dyn_img = image::load_from_memory(bytes)
            .context("decode texture page from memory")
            .map_err(|e| BoneCanvasError::decode(format!("{e:#}")))?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut rgba8_premul = rgba.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self::from_rgba8_premul(id, width, height, &rgba8_premul)
    }

    /// Read and decode an image file.
    pub fn open(id: BitmapId, path: &Path) -> BoneCanvasResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read texture page {}", path.display()))?;
        Self::decode(id, &bytes)
    }

    /// Identity of this bitmap.
    pub fn id(&self) -> BitmapId {
        self.id
    }

    /// Width in pixels.
    pub fn width(&self) -> f64 {
        f64::from(self.pixmap.width())
    }

    /// Height in pixels.
    pub fn height(&self) -> f64 {
        f64::from(self.pixmap.height())
    }

    /// `(0, 0, width, height)`.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width(), self.height())
    }

    /// Shared pixel storage.
    pub fn pixmap(&self) -> &Arc<vello_cpu::Pixmap> {
        &self.pixmap
    }
}

fn pixmap_dims(width: u32, height: u32) -> BoneCanvasResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| BoneCanvasError::validation("bitmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| BoneCanvasError::validation("bitmap height exceeds u16"))?;
    Ok((w, h))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

/// A named sub-rectangle of a texture page.
#[derive(Clone, Debug)]
pub struct TextureRegion {
    /// The page the region lives on.
    pub page: Bitmap,
    /// Left edge in page pixels.
    pub x: f64,
    /// Top edge in page pixels.
    pub y: f64,
    /// Width as drawn (before any atlas rotation).
    pub width: f64,
    /// Height as drawn (before any atlas rotation).
    pub height: f64,
    /// Stored rotated 90 degrees in the page.
    pub rotate: bool,
}

impl TextureRegion {
    /// The region's footprint on its page.
    ///
    /// Rotated regions occupy `height x width` pixels.
    pub fn page_rect(&self) -> Rect {
        let (w, h) = if self.rotate {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };
        Rect::new(self.x, self.y, self.x + w, self.y + h)
    }
}

/// Resolves region names to loaded textures.
pub trait TextureLookup {
    /// Region named `name`, if loaded.
    fn region(&self, name: &str) -> Option<&TextureRegion>;
}

impl TextureLookup for HashMap<String, TextureRegion> {
    fn region(&self, name: &str) -> Option<&TextureRegion> {
        self.get(name)
    }
}

/// On-disk description of an atlas: page image files plus region rectangles.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct AtlasManifest {
    /// Page image paths, relative to the manifest directory.
    pub pages: Vec<String>,
    /// Packed regions.
    pub regions: Vec<RegionDef>,
}

/// One region entry of an [`AtlasManifest`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegionDef {
    /// Lookup name.
    pub name: String,
    /// Index into [`AtlasManifest::pages`].
    pub page: usize,
    /// Left edge in page pixels.
    pub x: f64,
    /// Top edge in page pixels.
    pub y: f64,
    /// Unrotated width.
    pub width: f64,
    /// Unrotated height.
    pub height: f64,
    /// Stored rotated 90 degrees.
    #[serde(default)]
    pub rotate: bool,
}

/// Loaded pages and their named regions.
#[derive(Clone, Debug, Default)]
pub struct Atlas {
    pages: Vec<Bitmap>,
    regions: HashMap<String, TextureRegion>,
}

impl Atlas {
    /// Empty atlas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loaded pages in registration order.
    pub fn pages(&self) -> &[Bitmap] {
        &self.pages
    }

    /// Register a region; it must fit inside its page.
    pub fn add_region(&mut self, def: &RegionDef) -> BoneCanvasResult<()> {
        let page = self.pages.get(def.page).ok_or_else(|| {
            BoneCanvasError::validation(format!(
                "region '{}' references missing page {}",
                def.name, def.page
            ))
        })?;
        let region = TextureRegion {
            page: page.clone(),
            x: def.x,
            y: def.y,
            width: def.width,
            height: def.height,
            rotate: def.rotate,
        };

        let rect = region.page_rect();
        if def.width < 0.0
            || def.height < 0.0
            || rect.x0 < 0.0
            || rect.y0 < 0.0
            || rect.x1 > page.width()
            || rect.y1 > page.height()
        {
            return Err(BoneCanvasError::validation(format!(
                "region '{}' does not fit its page",
                def.name
            )));
        }

        self.regions.insert(def.name.clone(), region);
        Ok(())
    }

    /// Build an atlas from a manifest with already-decoded pages.
    pub fn from_pages(pages: Vec<Bitmap>, regions: &[RegionDef]) -> BoneCanvasResult<Self> {
        let mut atlas = Self {
            pages,
            regions: HashMap::new(),
        };
        for def in regions {
            atlas.add_region(def)?;
        }
        Ok(atlas)
    }

    /// Load a JSON manifest and decode its pages from `manifest_path`'s directory.
    pub fn load(manifest_path: &Path) -> BoneCanvasResult<Self> {
        let text = std::fs::read_to_string(manifest_path)
            .with_context(|| format!("read atlas manifest {}", manifest_path.display()))?;
        let manifest: AtlasManifest = serde_json::from_str(&text)?;
        let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));

        let pages = manifest
            .pages
            .iter()
            .enumerate()
            .map(|(i, rel)| Bitmap::open(BitmapId(i as u32), &base.join(rel)))
            .collect::<BoneCanvasResult<Vec<_>>>()?;
        Self::from_pages(pages, &manifest.regions)
    }
}

impl TextureLookup for Atlas {
    fn region(&self, name: &str) -> Option<&TextureRegion> {
        self.regions.get(name)
    }
}

#[cfg(test)]
#[path = "../tests/unit/atlas.rs"]
mod tests;
