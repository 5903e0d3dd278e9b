//! Public types for the preview renderer.

use crate::error::Error;
use std::path::Path;

/// Output format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    /// Raster output through the bitmap backend (`.png`, `.jpg`, `.bmp`).
    Bitmap,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" | "jpg" | "jpeg" | "bmp" => Ok(OutputFormat::Bitmap),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Presentation knobs that are not part of the geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Drawn above the plot area when set.
    pub title: Option<String>,
    /// Print values next to bars, stages and slices.
    pub value_labels: bool,
    pub font_px: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: None,
            value_labels: true,
            font_px: 12,
        }
    }
}
