use std::io;

use crossterm::event::{poll, read, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Terminal;
use tracing::error;

use crate::model::Snapshot;

use super::events::handle_key_event;
use super::layout::main_chunks;
use super::state::{Tab, TuiState};
use super::views::{draw_graph_view, draw_help_overlay, draw_snapshots_view};

const STATUS: &str =
    " F1: Snapshots | F2: Graph | ↑/k: newer snapshot | ↓/j: older snapshot (Graph tab) | h: help | q: quit";

pub fn run(history: Vec<Snapshot>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, TuiState::new(history));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut state: TuiState,
) -> io::Result<()> {
    terminal.clear()?;

    loop {
        let draw_result = terminal.draw(|f| {
            let size = f.size();
            let (tabs_area, body, status_area) = main_chunks(size);

            let tabs = Tabs::new(vec!["Snapshots (F1)", "Graph (F2)"])
                .block(Block::default().borders(Borders::ALL).title("linehist"))
                .highlight_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .select(state.tab.index());
            f.render_widget(tabs, tabs_area);

            match state.tab {
                Tab::Snapshots => draw_snapshots_view(f, body, &state),
                Tab::Graph => draw_graph_view(f, body, &state),
            }

            f.render_widget(
                Paragraph::new(STATUS).style(Style::default().fg(Color::Gray)),
                status_area,
            );

            if state.show_help {
                draw_help_overlay(f, size);
            }
        });

        if let Err(e) = draw_result {
            error!("TUI draw error: {e}");
        }

        if poll(std::time::Duration::from_millis(200))? {
            if let Event::Key(key_event) = read()? {
                if handle_key_event(key_event, &mut state) {
                    break;
                }
            }
        }
    }

    Ok(())
}
