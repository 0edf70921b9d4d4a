use crate::diff::{compare, DiffOutcome};
use crate::model::Snapshot;
use crate::timeline::{annotate, TimelineEntry};

/// The history being viewed and which snapshot the graph shows.
///
/// `viewed_index` is chronological: 0 is the oldest snapshot.
pub struct ViewContext {
    pub history: Vec<Snapshot>,
    pub viewed_index: usize,
}

impl ViewContext {
    /// Starts on the newest snapshot.
    pub fn new(history: Vec<Snapshot>) -> Self {
        let viewed_index = history.len().saturating_sub(1);
        Self {
            history,
            viewed_index,
        }
    }

    pub fn newer(&mut self) {
        if self.viewed_index + 1 < self.history.len() {
            self.viewed_index += 1;
        }
    }

    pub fn older(&mut self) {
        self.viewed_index = self.viewed_index.saturating_sub(1);
    }

    pub fn oldest(&mut self) {
        self.viewed_index = 0;
    }

    pub fn newest(&mut self) {
        self.viewed_index = self.history.len().saturating_sub(1);
    }

    pub fn outcome(&self) -> DiffOutcome {
        compare(&self.history, self.viewed_index)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Snapshots,
    Graph,
}

impl Tab {
    pub fn index(self) -> usize {
        match self {
            Tab::Snapshots => 0,
            Tab::Graph => 1,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Tab::Snapshots => Tab::Graph,
            Tab::Graph => Tab::Snapshots,
        }
    }
}

pub struct TuiState {
    pub context: ViewContext,
    /// Day-boundary flags, computed once per load.
    pub timeline: Vec<TimelineEntry>,
    pub tab: Tab,
    pub show_help: bool,
    pub snapshots_scroll: u16,
    pub graph_scroll: u16,
}

impl TuiState {
    pub fn new(history: Vec<Snapshot>) -> Self {
        let timeline = annotate(&history);
        Self {
            context: ViewContext::new(history),
            timeline,
            tab: Tab::Snapshots,
            show_help: false,
            snapshots_scroll: 0,
            graph_scroll: 0,
        }
    }
}
