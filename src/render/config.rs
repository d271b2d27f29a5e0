//! Renderer settings and their environment overrides.

use crate::foundation::core::Rgba8;
use crate::foundation::error::BoneCanvasResult;

/// How attachments are turned into surface calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// One rotated whole-image blit per region quad; meshes are not drawn.
    Images,
    /// Every region and mesh decomposed into textured triangles.
    #[default]
    Triangles,
}

impl std::str::FromStr for DrawMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "images" | "image" => Ok(Self::Images),
            "triangles" | "triangle" => Ok(Self::Triangles),
            other => Err(format!("unknown draw mode '{other}'")),
        }
    }
}

/// Per-call renderer settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Drawing strategy.
    pub mode: DrawMode,
    /// Stroke the outline of every drawn quad/triangle.
    pub debug: bool,
    /// Outline colour for `debug`.
    pub debug_color: Rgba8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: DrawMode::Triangles,
            debug: false,
            debug_color: Rgba8::GREEN,
        }
    }
}

/// Environment variable toggling the wireframe overlay.
pub const ENV_DEBUG: &str = "BONECANVAS_DEBUG";
/// Environment variable selecting the draw mode.
pub const ENV_MODE: &str = "BONECANVAS_MODE";

impl RenderConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(text: &str) -> BoneCanvasResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply `BONECANVAS_DEBUG` / `BONECANVAS_MODE` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; unparsable values are ignored with a warning.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(ENV_DEBUG) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.debug = true,
                "0" | "false" | "no" | "off" | "" => self.debug = false,
                other => tracing::warn!(value = other, "ignoring {ENV_DEBUG}"),
            }
        }
        if let Some(raw) = lookup(ENV_MODE) {
            match raw.parse::<DrawMode>() {
                Ok(mode) => self.mode = mode,
                Err(err) => tracing::warn!(%err, "ignoring {ENV_MODE}"),
            }
        }
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/config.rs"]
mod tests;
