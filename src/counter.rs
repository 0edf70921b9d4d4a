//! Per-file line counting for a single directory.
//!
//! Only the top level of the directory is listed. Hidden and ignored files
//! are measured like any other; the extension allow-list and the excluded
//! file name are the only filters.

use std::io;
use std::path::Path;

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::error::{LinehistError, Result};
use crate::model::{FileMeasurement, ScanResult, SkippedFile};

/// Returns `(total_lines, non_empty_lines)` for raw file content.
///
/// Invalid UTF-8 sequences are dropped. Lines end at `\n`, `\r\n` or a lone
/// `\r`; a final line without a terminator still counts.
pub fn count_lines(bytes: &[u8]) -> (u32, u32) {
    let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();

    let (mut total, mut non_empty) = (0, 0);
    let mut rest = text.as_str();
    while !rest.is_empty() {
        let (line, next) = match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(i) => {
                let width = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                (&rest[..i], &rest[i + width..])
            }
            None => (rest, ""),
        };
        total += 1;
        if !line.trim().is_empty() {
            non_empty += 1;
        }
        rest = next;
    }
    (total, non_empty)
}

fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
}

pub fn collect_stats(dir: &Path, exclude_name: &str, extensions: &[String]) -> Result<ScanResult> {
    collect_stats_with(dir, exclude_name, extensions, |path| std::fs::read(path))
}

/// Walk `dir` and measure every matching file with the bytes `read` returns.
/// A file `read` fails on is recorded as skipped.
fn collect_stats_with<F>(
    dir: &Path,
    exclude_name: &str,
    extensions: &[String],
    read: F,
) -> Result<ScanResult>
where
    F: Fn(&Path) -> io::Result<Vec<u8>>,
{
    if !dir.is_dir() {
        return Err(LinehistError::Scan(format!(
            "{} is not a readable directory",
            dir.display()
        )));
    }

    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .follow_links(true)
        .build();

    let mut result = ScanResult::default();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable directory entry: {e}");
                continue;
            }
        };

        if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();

        if name == exclude_name || !has_allowed_extension(path, extensions) {
            continue;
        }

        match read(path).map(|bytes| count_lines(&bytes)) {
            Ok((total, non_empty)) => {
                debug!(file = %name, total, non_empty, "counted");
                result.total_lines += total as u64;
                result.total_non_empty += non_empty as u64;
                result.files.push(FileMeasurement::new(name, total, non_empty));
            }
            Err(e) => {
                warn!(file = %name, "skipping file: {e}");
                result.skipped.push(SkippedFile {
                    filename: name,
                    reason: e.to_string(),
                });
            }
        }
    }

    result.files.sort_by(|a, b| a.filename.cmp(&b.filename));
    result.skipped.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXTENSIONS;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn default_exts() -> Vec<String> {
        DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn counts_terminated_and_trailing_lines() {
        assert_eq!(count_lines(b""), (0, 0));
        assert_eq!(count_lines(b"a\nb\n"), (2, 2));
        assert_eq!(count_lines(b"a\nb"), (2, 2));
        assert_eq!(count_lines(b"a\n\n   \n\tb\n"), (4, 2));
        assert_eq!(count_lines(b"x = 1\r\n\r\ny = 2\r\n"), (3, 2));
    }

    #[test]
    fn lone_carriage_return_ends_a_line() {
        assert_eq!(count_lines(b"a\rb\r"), (2, 2));
        assert_eq!(count_lines(b"a\r\r\nb"), (3, 2));
        assert_eq!(count_lines(b"\r"), (1, 0));
    }

    #[test]
    fn invalid_utf8_is_dropped() {
        assert_eq!(count_lines(&[0xff, 0xfe, b'\n']), (1, 0));
        let bytes = [b'o', b'k', b'\n', 0xff, 0xfe, b'\n', b'\n'];
        assert_eq!(count_lines(&bytes), (3, 1));
        // the dropped byte sits between \r and \n, which then form one terminator
        assert_eq!(count_lines(&[b'x', b'\r', 0x80, b'\n', b'y']), (2, 2));
    }

    #[test]
    fn filters_by_extension_and_exclusion() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.py"), "print(1)\n\nprint(2)\n").unwrap();
        fs::write(dir.path().join("a.c"), "int main() {}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored\n").unwrap();
        fs::write(dir.path().join("tool.py"), "me\n").unwrap();
        fs::write(dir.path().join("Upper.PY"), "case matters\n").unwrap();
        fs::create_dir(dir.path().join("pkg.py")).unwrap();
        fs::write(dir.path().join("pkg.py").join("nested.py"), "deep\n").unwrap();

        let result = collect_stats(dir.path(), "tool.py", &default_exts()).unwrap();

        assert_eq!(
            result.files,
            vec![
                FileMeasurement::new("a.c", 1, 1),
                FileMeasurement::new("b.py", 3, 2),
            ]
        );
        assert_eq!(result.total_lines, 4);
        assert_eq!(result.total_non_empty, 3);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn hidden_files_are_measured() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.h"), "#pragma once\n").unwrap();
        let result = collect_stats(dir.path(), "", &default_exts()).unwrap();
        assert_eq!(result.files, vec![FileMeasurement::new(".hidden.h", 1, 1)]);
    }

    #[test]
    fn scanning_twice_is_deterministic() {
        let dir = tempdir().unwrap();
        for (name, body) in [("z.hpp", "a\n"), ("m.cpp", "b\n\n"), ("a.py", "")] {
            fs::write(dir.path().join(name), body).unwrap();
        }
        let first = collect_stats(dir.path(), "", &default_exts()).unwrap();
        let second = collect_stats(dir.path(), "", &default_exts()).unwrap();
        assert_eq!(first.files, second.files);
        let names: Vec<_> = first.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["a.py", "m.cpp", "z.hpp"]);
    }

    #[test]
    fn custom_allow_list_replaces_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("lib.rs"), "fn x() {}\n").unwrap();
        fs::write(dir.path().join("main.py"), "x\n").unwrap();
        let result = collect_stats(dir.path(), "", &["rs".to_string()]).unwrap();
        assert_eq!(result.files, vec![FileMeasurement::new("lib.rs", 1, 1)]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(collect_stats(&missing, "", &default_exts()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_counted() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join("real.txt"), "a\nb\n").unwrap();
        symlink(dir.path().join("real.txt"), dir.path().join("link.py")).unwrap();
        symlink(dir.path().join("gone.txt"), dir.path().join("dangling.py")).unwrap();

        let result = collect_stats(dir.path(), "", &default_exts()).unwrap();
        assert_eq!(result.files, vec![FileMeasurement::new("link.py", 2, 2)]);
    }

    #[test]
    fn unreadable_file_is_reported_as_skipped() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("locked.py"), "secret\n").unwrap();
        fs::write(dir.path().join("open.py"), "fine\n").unwrap();

        let result = collect_stats_with(dir.path(), "", &default_exts(), |path| {
            if path.ends_with("locked.py") {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
            } else {
                fs::read(path)
            }
        })
        .unwrap();

        assert_eq!(result.files, vec![FileMeasurement::new("open.py", 1, 1)]);
        assert_eq!(result.total_lines, 1);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].filename, "locked.py");
        assert_eq!(result.skipped[0].reason, "permission denied");
    }
}
