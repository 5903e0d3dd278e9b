//! Layout configuration shared by every chart family.
//!
//! All fields have defaults, so a layout file only needs the keys it overrides:
//! ```json
//! { "width": 800, "height": 480, "padding": { "left": 64 }, "radarLevels": 4 }
//! ```

use crate::error::{Error, Result};
use crate::geometry::{PlotArea, Point};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn uniform(p: f64) -> Self {
        Self {
            top: p,
            right: p,
            bottom: p,
            left: p,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 24.0,
            right: 24.0,
            bottom: 40.0,
            left: 48.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutParams {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
    /// Fraction of a category slot a bar occupies.
    pub bar_width_ratio: f64,
    pub gauge_stroke_width: f64,
    /// Narrowest funnel stage as a fraction of the widest.
    pub funnel_min_width_ratio: f64,
    pub funnel_gap: f64,
    pub radar_levels: usize,
    /// Radar label distance as a fraction of the radius.
    pub radar_label_offset: f64,
    pub donut_inner_ratio: f64,
    /// Locale tag for value labels (`en`, `de`, ...).
    pub locale: String,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            padding: Padding::default(),
            bar_width_ratio: 0.6,
            gauge_stroke_width: 18.0,
            funnel_min_width_ratio: 0.2,
            funnel_gap: 4.0,
            radar_levels: 5,
            radar_label_offset: 1.12,
            donut_inner_ratio: 0.6,
            locale: "en".to_string(),
        }
    }
}

impl LayoutParams {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Load overrides from a JSON file; missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn plot_area(&self) -> PlotArea {
        PlotArea::new(
            self.padding.left,
            self.padding.top,
            self.width - self.padding.left - self.padding.right,
            self.height - self.padding.top - self.padding.bottom,
        )
    }

    pub fn center(&self) -> Point {
        self.plot_area().center()
    }

    /// Largest radius that fits the plot area.
    pub fn radius(&self) -> f64 {
        let area = self.plot_area();
        (area.width.min(area.height) / 2.0).max(0.0)
    }
}
