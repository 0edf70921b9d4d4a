pub mod cli;
pub mod config;
pub mod counter;
pub mod diff;
pub mod error;
pub mod logging;
pub mod model;
pub mod policy;
pub mod record;
pub mod report;
pub mod store;
pub mod timeline;
pub mod tui;
