use std::fmt;

use crate::text_layout::{display_width, truncate_to_width};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub selected: bool,
}

/// One line of buffer labels scrolled so that the selected label stays in view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    segments: Vec<Segment>,
}

impl StatusLine {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn width(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| display_width(&segment.text))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

// Left-edge labels drop their leading space; the selected label trades its
// trailing space for angle brackets.
fn label(name: &str, left_edge: bool, selected: bool) -> String {
    let lead = if left_edge { "" } else { " " };
    if selected {
        format!("{lead}<{name}>")
    } else {
        format!("{lead}{name} ")
    }
}

fn label_width(name_width: usize, left_edge: bool, selected: bool) -> usize {
    let lead = usize::from(!left_edge);
    let trim = if selected { 2 } else { 1 };
    lead + name_width + trim
}

/// Sweeps the labels up to `current` and returns the index that must sit at the left
/// edge for `current` to remain visible within `width` columns.
fn first_visible(name_widths: &[usize], current: usize, width: usize) -> usize {
    let mut anchor = 0usize;
    let mut used = 0usize;
    for (idx, name_width) in name_widths.iter().copied().enumerate().take(current + 1) {
        let selected = idx == current;
        let needed = label_width(name_width, idx == anchor, selected);
        if idx != anchor && used + needed > width {
            anchor = idx;
            used = label_width(name_width, true, selected);
        } else {
            used += needed;
        }
    }
    anchor
}

pub fn render_status_line<S: AsRef<str>>(names: &[S], current: usize, width: usize) -> StatusLine {
    if names.is_empty() {
        return StatusLine::default();
    }
    let current = current.min(names.len() - 1);
    let name_widths: Vec<usize> = names
        .iter()
        .map(|name| display_width(name.as_ref()))
        .collect();
    let anchor = first_visible(&name_widths, current, width);

    let mut segments = Vec::new();
    let mut used = 0usize;
    for (idx, name) in names.iter().enumerate().skip(anchor) {
        let left_edge = idx == anchor;
        let selected = idx == current;
        let needed = label_width(name_widths[idx], left_edge, selected);
        if used + needed > width {
            if left_edge {
                segments.push(Segment {
                    text: truncate_to_width(&label(name.as_ref(), true, selected), width),
                    selected,
                });
            }
            break;
        }
        segments.push(Segment {
            text: label(name.as_ref(), left_edge, selected),
            selected,
        });
        used += needed;
    }
    StatusLine { segments }
}
