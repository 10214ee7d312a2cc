use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Cuts `text` so that it occupies at most `width` terminal columns.
///
/// Wide characters that would straddle the limit are dropped rather than split.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    let mut rendered = String::new();
    let mut used = 0usize;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        rendered.push(ch);
        used += ch_width;
    }
    rendered
}
