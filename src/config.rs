use std::path::PathBuf;

use crate::cli::CommonArgs;

/// File extensions measured when `--ext` is not given.
pub const DEFAULT_EXTENSIONS: [&str; 5] = ["py", "c", "h", "cpp", "hpp"];

/// History database file name, created inside the scanned directory.
pub const DB_NAME: &str = "line_history.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub dir: PathBuf,
    pub db_path: PathBuf,
    pub exclude_name: String,
    pub extensions: Vec<String>,
    pub record: bool,
}

impl Config {
    pub fn from_args(args: &CommonArgs) -> std::io::Result<Self> {
        let dir = match &args.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let db_path = args.db.clone().unwrap_or_else(|| dir.join(DB_NAME));

        let exclude_name = args.exclude.clone().unwrap_or_else(own_file_name);

        let extensions = match &args.ext {
            Some(list) => normalize_extensions(list),
            None => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        };

        Ok(Config {
            dir,
            db_path,
            exclude_name,
            extensions,
            record: !args.no_record,
        })
    }
}

/// File name of the running executable, so the tool never measures itself.
fn own_file_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

pub fn normalize_extensions(list: &[String]) -> Vec<String> {
    let mut exts: Vec<String> = list
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_string())
        .filter(|e| !e.is_empty())
        .collect();
    exts.sort();
    exts.dedup();
    exts
}
