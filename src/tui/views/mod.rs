mod graph;
mod help;
mod snapshots;

pub use graph::{draw_graph_view, graph_lines};
pub use help::draw_help_overlay;
pub use snapshots::{draw_snapshots_view, snapshot_lines};
