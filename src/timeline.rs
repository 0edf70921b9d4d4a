//! Day-boundary annotation of the snapshot history.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;

use crate::model::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub index: usize,
    pub last_of_day: bool,
    /// Upper-case day name for the last snapshot of a day, otherwise empty.
    pub weekday: String,
}

/// Flag the chronologically last snapshot of every calendar day.
///
/// The date is the stored timestamp's date component, taken as-is. This is a
/// full O(n) pass over the history; callers recompute it once per load, not
/// per rendered frame.
pub fn annotate(history: &[Snapshot]) -> Vec<TimelineEntry> {
    let mut last_index_for_date: HashMap<&str, usize> = HashMap::new();
    for (idx, snapshot) in history.iter().enumerate() {
        last_index_for_date.insert(snapshot.date(), idx);
    }

    history
        .iter()
        .enumerate()
        .map(|(idx, snapshot)| {
            let last_of_day = last_index_for_date.get(snapshot.date()) == Some(&idx);
            let weekday = if last_of_day {
                weekday_label(&snapshot.timestamp)
            } else {
                String::new()
            };
            TimelineEntry {
                index: idx,
                last_of_day,
                weekday,
            }
        })
        .collect()
}

/// `MONDAY`, `TUESDAY`, ... for a stored timestamp; empty when it does not parse.
pub fn weekday_label(timestamp: &str) -> String {
    parse_date(timestamp)
        .map(|date| weekday_name(date.weekday()).to_string())
        .unwrap_or_default()
}

fn parse_date(timestamp: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(timestamp, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| NaiveDate::parse_from_str(timestamp, "%Y-%m-%d").ok())
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(timestamps: &[&str]) -> Vec<Snapshot> {
        timestamps
            .iter()
            .enumerate()
            .map(|(i, ts)| Snapshot {
                id: i as i64 + 1,
                timestamp: ts.to_string(),
                files: Vec::new(),
            })
            .collect()
    }

    fn flags(entries: &[TimelineEntry]) -> Vec<bool> {
        entries.iter().map(|e| e.last_of_day).collect()
    }

    #[test]
    fn last_snapshot_of_each_day_is_flagged() {
        let h = history(&["2024-01-01T09:00:00", "2024-01-01T17:00:00", "2024-01-02T09:00:00"]);
        let entries = annotate(&h);
        assert_eq!(flags(&entries), vec![false, true, true]);
        assert_eq!(entries[0].weekday, "");
        assert_eq!(entries[1].weekday, "MONDAY");
        assert_eq!(entries[2].weekday, "TUESDAY");
    }

    #[test]
    fn exactly_one_flag_per_day() {
        let h = history(&[
            "2024-02-28T08:00:00",
            "2024-02-28T09:00:00",
            "2024-02-28T10:00:00",
            "2024-02-29T10:00:00",
            "2024-03-01T00:00:01",
            "2024-03-01T23:59:59",
        ]);
        let entries = annotate(&h);
        assert_eq!(flags(&entries), vec![false, false, true, true, false, true]);
        assert_eq!(entries[3].weekday, "THURSDAY");
    }

    #[test]
    fn malformed_timestamp_keeps_flag_but_loses_weekday() {
        let h = history(&["2024-01-01T09:00:00", "garbage"]);
        let entries = annotate(&h);
        assert_eq!(flags(&entries), vec![true, true]);
        assert_eq!(entries[1].weekday, "");
    }

    #[test]
    fn weekday_label_accepts_common_iso_forms() {
        assert_eq!(weekday_label("2024-06-15T12:30:00"), "SATURDAY");
        assert_eq!(weekday_label("2024-06-15T12:30:00.123456"), "SATURDAY");
        assert_eq!(weekday_label("2024-06-16 12:30:00"), "SUNDAY");
        assert_eq!(weekday_label("2024-06-16"), "SUNDAY");
        assert_eq!(weekday_label("2024-13-01T00:00:00"), "");
        assert_eq!(weekday_label(""), "");
    }

    #[test]
    fn empty_history_has_no_entries() {
        assert!(annotate(&[]).is_empty());
    }
}
