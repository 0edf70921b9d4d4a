use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::diff::DiffRow;
use crate::report::bar_segments;

pub const BASELINE_COLOR: Color = Color::Blue;
pub const ADDED_COLOR: Color = Color::Red;
pub const REMOVED_COLOR: Color = Color::Green;

const BAR_CHAR: &str = "█";

/// One horizontal bar: right-aligned filename, baseline/added/removed
/// segments, then the current total.
pub fn bar_line(row: &DiffRow, max_extent: u64, name_width: usize, bar_width: usize) -> Line<'static> {
    let (base, added, removed) = bar_segments(row, max_extent, bar_width);
    Line::from(vec![
        Span::raw(format!("{:>name_width$} ", truncate_left(&row.filename, name_width))),
        Span::styled(BAR_CHAR.repeat(base), Style::default().fg(BASELINE_COLOR)),
        Span::styled(BAR_CHAR.repeat(added), Style::default().fg(ADDED_COLOR)),
        Span::styled(BAR_CHAR.repeat(removed), Style::default().fg(REMOVED_COLOR)),
        Span::raw(format!(" {}", row.current_total)),
    ])
}

pub fn legend_line(color: Color, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("██", Style::default().fg(color)),
        Span::raw(format!(" {label}")),
    ])
}

pub fn bold(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

/// Keep the end of long names, which is where they differ.
fn truncate_left(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - max.saturating_sub(1)).collect();
        format!("…{tail}")
    }
}
