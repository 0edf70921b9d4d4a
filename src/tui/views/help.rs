use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::centered_rect;

fn section(title: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )])
}

/// Draw the modal help overlay describing tabs and navigation keys.
pub fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let block = Block::default().title("Help").borders(Borders::ALL);
    let help_area = centered_rect(60, 60, area);

    f.render_widget(Clear, help_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "linehist - Help",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        section("Tabs:"),
        Line::from("  F1          Snapshots"),
        Line::from("  F2          Graph"),
        Line::from("  Tab         Switch tab"),
        Line::from(""),
        section("Graph:"),
        Line::from("  ↑ / k       Newer snapshot"),
        Line::from("  ↓ / j       Older snapshot"),
        Line::from("  g / G       Oldest / newest snapshot"),
        Line::from("  PgUp/PgDn   Scroll bars"),
        Line::from(""),
        section("Snapshots:"),
        Line::from("  ↑↓ / j k    Scroll"),
        Line::from("  PgUp/PgDn   Scroll by 10 lines"),
        Line::from(""),
        section("General:"),
        Line::from("  h, ?        Toggle this help"),
        Line::from("  q, Esc      Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press 'h' or 'Esc' to close this help",
            Style::default().fg(Color::Gray),
        )]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(ratatui::widgets::Wrap { trim: false });
    f.render_widget(help_paragraph, help_area);
}
