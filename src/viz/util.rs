//! Utility functions for the renderer: tone colours, locale mapping, value formatting.

use crate::geometry::{Point, Tone};
use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

pub const POSITIVE: RGBColor = RGBColor(112, 173, 71);
pub const WARNING: RGBColor = RGBColor(255, 192, 0);
pub const NEGATIVE: RGBColor = RGBColor(192, 0, 0);
pub const NEUTRAL: RGBColor = RGBColor(165, 165, 165);
pub const REFERENCE: RGBColor = RGBColor(191, 191, 191);
pub const GRID: RGBColor = RGBColor(224, 224, 224);
pub const INK: RGBColor = RGBColor(64, 64, 64);

/// Get a color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> RGBColor {
    OFFICE10[idx % OFFICE10.len()]
}

pub fn tone_color(tone: Tone) -> RGBColor {
    match tone {
        Tone::Positive => POSITIVE,
        Tone::Warning => WARNING,
        Tone::Negative => NEGATIVE,
        Tone::Neutral => NEUTRAL,
        Tone::Reference => REFERENCE,
        Tone::Series(i) => office_color(i),
    }
}

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `zh`, `zh_CN`, `ja`, `de`,
/// `de_DE`, `german`, `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().replace('-', "_").as_str() {
        "zh" | "zh_cn" | "chinese" => (&Locale::zh, '.'),
        "ja" | "ja_jp" => (&Locale::ja, '.'),
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Locale-formatted number: grouped thousands, 0-2 decimals by magnitude, trailing
/// zeros dropped (`1,234,567`, `12.5`, `0.25`).
pub fn format_value(v: f64, locale_tag: &str) -> String {
    if !v.is_finite() {
        return "-".to_string();
    }
    let (locale, dec_sep) = map_locale(locale_tag);
    let a = v.abs();
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    let fixed = format!("{:.*}", prec, a);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let int: u64 = int_part.parse().unwrap_or(0);

    let mut out = String::new();
    if v < 0.0 && (int > 0 || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&int.to_formatted_string(locale));
    if !frac.is_empty() {
        out.push(dec_sep);
        out.push_str(frac);
    }
    out
}

/// `12.3%`, one decimal, trailing `.0` dropped.
pub fn format_percent(p: f64) -> String {
    if !p.is_finite() {
        return "-".to_string();
    }
    let s = format!("{p:.1}");
    format!("{}%", s.strip_suffix(".0").unwrap_or(&s))
}

#[inline]
pub fn px(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}
