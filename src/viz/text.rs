//! Text measurement and truncation for axis and stage labels.

/// Full-width scripts (CJK, kana, hangul) take about one em; Latin text about 0.6.
fn char_width_em(ch: char) -> f32 {
    match ch as u32 {
        0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFF00..=0xFF60 => {
            1.0
        }
        _ => 0.6,
    }
}

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    let ems: f32 = text.chars().map(char_width_em).sum();
    (ems * font_px as f32).ceil() as u32
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let budget = max_px.saturating_sub(estimate_text_width_px("…", font_px));
    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if estimate_text_width_px(&out, font_px) > budget {
            out.pop();
            break;
        }
    }
    if out.is_empty() {
        return out;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cjk_is_wider_than_latin() {
        assert!(estimate_text_width_px("年月", 10) > estimate_text_width_px("ab", 10));
        assert_eq!(estimate_text_width_px("年", 10), 10);
    }

    #[test]
    fn truncation_ends_with_ellipsis() {
        let t = truncate_to_width("Northern Europe", 10, 40);
        assert!(t.ends_with('…'));
        assert!(estimate_text_width_px(&t, 10) <= 40);
        assert_eq!(truncate_to_width("Jan", 10, 40), "Jan");
    }
}
