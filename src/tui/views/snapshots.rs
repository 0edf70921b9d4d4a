use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::model::Snapshot;
use crate::report::{
    snapshot_title, FileTable, EMPTY_HISTORY, NON_EMPTY_LINES_LABEL, TOTAL_LINES_LABEL,
};
use crate::timeline::TimelineEntry;

use super::super::state::TuiState;

/// Render the full history as text, newest snapshot first.
pub fn draw_snapshots_view(f: &mut Frame, area: Rect, state: &TuiState) {
    let lines = snapshot_lines(&state.context.history, &state.timeline);
    let para = Paragraph::new(lines)
        .block(Block::default().title("Snapshots").borders(Borders::ALL))
        .scroll((state.snapshots_scroll, 0));
    f.render_widget(para, area);
}

pub fn snapshot_lines(history: &[Snapshot], timeline: &[TimelineEntry]) -> Vec<Line<'static>> {
    if history.is_empty() {
        return vec![Line::from(EMPTY_HISTORY)];
    }

    let title = Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD);
    let weekday = Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD);
    let total = Style::default().fg(Color::Yellow);
    let non_empty = Style::default().fg(Color::Green);

    let mut lines = Vec::new();
    for (snapshot, entry) in history.iter().zip(timeline).rev() {
        let mut header = vec![Span::styled(snapshot_title(snapshot, entry), title)];
        if !entry.weekday.is_empty() {
            header.push(Span::raw("  "));
            header.push(Span::styled(entry.weekday.clone(), weekday));
        }
        lines.push(Line::from(header));

        if snapshot.files.is_empty() {
            lines.push(Line::from("(no files)"));
            lines.push(Line::from(""));
            continue;
        }

        let table = FileTable::new(&snapshot.files);
        lines.push(Line::from(Span::styled(
            table.header(),
            Style::default().fg(Color::Magenta),
        )));
        lines.push(Line::from(table.rule('-')));

        for file in &snapshot.files {
            let [name, total_cell, non_empty_cell, percent] = table.cells(file);
            lines.push(Line::from(vec![
                Span::raw(name),
                Span::styled(total_cell, total),
                Span::raw("  "),
                Span::styled(non_empty_cell, non_empty),
                Span::raw(format!("  {percent}")),
            ]));
        }

        let totals = snapshot.totals();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw(TOTAL_LINES_LABEL),
            Span::styled(totals.total_lines.to_string(), total),
        ]));
        lines.push(Line::from(vec![
            Span::raw(NON_EMPTY_LINES_LABEL),
            Span::styled(totals.non_empty_lines.to_string(), non_empty),
        ]));
        lines.push(Line::from(table.rule('=')));
        lines.push(Line::from(""));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileMeasurement;
    use crate::timeline::annotate;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn newest_snapshot_comes_first() {
        let history = vec![
            Snapshot {
                id: 1,
                timestamp: "2024-01-01T09:00:00".into(),
                files: vec![FileMeasurement::new("a.py", 4, 2)],
            },
            Snapshot {
                id: 2,
                timestamp: "2024-01-02T09:00:00".into(),
                files: Vec::new(),
            },
        ];
        let lines = snapshot_lines(&history, &annotate(&history));
        assert_eq!(text(&lines[0]), "Snapshot 2 - 2024-01-02T09:00:00  TUESDAY");
        assert_eq!(text(&lines[1]), "(no files)");
        assert_eq!(text(&lines[3]), "Snapshot 1 - 2024-01-01T09:00:00  MONDAY");
        assert!(lines.iter().any(|l| text(l).ends_with("50.0%")));
    }

    #[test]
    fn empty_history_message() {
        let lines = snapshot_lines(&[], &[]);
        assert_eq!(lines.len(), 1);
        assert!(text(&lines[0]).starts_with("No snapshots yet"));
    }
}
