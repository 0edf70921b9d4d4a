use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::diff::{DiffOutcome, NoDataReason};
use crate::model::Totals;
use crate::report::{NON_EMPTY_LINES_LABEL, TOTAL_LINES_LABEL};

use super::super::draw::{bar_line, bold, legend_line, ADDED_COLOR, BASELINE_COLOR, REMOVED_COLOR};
use super::super::state::TuiState;

const MIN_BAR_WIDTH: usize = 10;
const MAX_NAME_WIDTH: usize = 32;

/// Render the bar comparison of the viewed snapshot against its predecessor.
pub fn draw_graph_view(f: &mut Frame, area: Rect, state: &TuiState) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let (title, lines) = graph_lines(state, inner_width);
    let para = Paragraph::new(lines)
        .block(Block::default().title(title).borders(Borders::ALL))
        .scroll((state.graph_scroll, 0));
    f.render_widget(para, area);
}

fn totals_lines(totals: &Totals) -> Vec<Line<'static>> {
    vec![
        bold(format!("{TOTAL_LINES_LABEL}{}", totals.total_lines)),
        bold(format!("{NON_EMPTY_LINES_LABEL}{}", totals.non_empty_lines)),
        Line::from(""),
    ]
}

/// Block title and body lines for a graph area `width` cells wide.
pub fn graph_lines(state: &TuiState, width: usize) -> (String, Vec<Line<'static>>) {
    let count = state.context.history.len();
    match state.context.outcome() {
        DiffOutcome::NoSnapshots => (
            "No snapshots available.".to_string(),
            vec![Line::from("No snapshots available.")],
        ),
        DiffOutcome::NoData {
            index,
            timestamp,
            reason,
            totals,
            ..
        } => {
            let mut lines = totals_lines(&totals);
            lines.push(Line::from(match reason {
                NoDataReason::NoFiles => "No file data.",
                NoDataReason::AllZero => "All totals are zero.",
            }));
            (showing(index, count, &timestamp), lines)
        }
        DiffOutcome::Compared(diff) => {
            let mut lines = totals_lines(&diff.totals);
            lines.push(legend_line(
                BASELINE_COLOR,
                "Baseline lines (previous snapshot, or current for the first)",
            ));
            lines.push(legend_line(ADDED_COLOR, "New lines in this snapshot"));
            lines.push(legend_line(REMOVED_COLOR, "Removed lines vs previous"));
            lines.push(Line::from(""));

            let name_width = diff
                .rows
                .iter()
                .map(|r| r.filename.chars().count())
                .max()
                .unwrap_or(0)
                .min(MAX_NAME_WIDTH);
            let label_width = diff.max_extent.to_string().len() + 1;
            let bar_width = width
                .saturating_sub(name_width + 1 + label_width)
                .max(MIN_BAR_WIDTH);

            for row in &diff.rows {
                lines.push(bar_line(row, diff.max_extent, name_width, bar_width));
            }
            (showing(diff.index, count, &diff.timestamp), lines)
        }
    }
}

fn showing(index: usize, count: usize, timestamp: &str) -> String {
    format!("Showing snapshot {} of {} (timestamp {})", index + 1, count, timestamp)
}
