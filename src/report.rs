use crate::domain::HistoryEntry;
use crate::persistence::atomic_write;
use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::path::Path;
use tracing::warn;

/// Render the completion history as markdown in local time
pub fn render_history(history: &[HistoryEntry]) -> String {
    render_history_in(history, &Local)
}

/// Render the completion history as markdown, one section per day.
/// Entries keep the log's newest-first order.
pub fn render_history_in<Tz>(history: &[HistoryEntry], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::from("# TaskiPin History\n\n");

    // Timestamps outside chrono's range have no day to file under
    let dated: Vec<_> = history
        .iter()
        .filter_map(|entry| match DateTime::from_timestamp_millis(entry.completed_at) {
            Some(at) => Some((entry, at.with_timezone(tz))),
            None => {
                warn!(entry_id = %entry.id, completed_at = entry.completed_at, "skipping undatable history entry");
                None
            }
        })
        .collect();

    if dated.is_empty() {
        out.push_str("_No completed tasks yet._\n");
        return out;
    }

    out.push_str(&format!("**Completed:** {}\n", dated.len()));

    let mut current_day: Option<String> = None;
    for (entry, at) in dated {

        let day = at.format("%Y-%m-%d").to_string();
        if current_day.as_deref() != Some(day.as_str()) {
            out.push_str(&format!("\n## {}\n\n", day));
            current_day = Some(day);
        }

        match &entry.group_name {
            Some(group) => out.push_str(&format!(
                "- {} ✓ {} _({})_\n",
                at.format("%H:%M"),
                entry.task_title,
                group
            )),
            None => out.push_str(&format!("- {} ✓ {}\n", at.format("%H:%M"), entry.task_title)),
        }
    }

    out
}

/// Write the rendered history to `path`
pub fn write_history_report(history: &[HistoryEntry], path: &Path) -> Result<()> {
    atomic_write(path, &render_history(history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(title: &str, completed_at: i64, group: Option<&str>) -> HistoryEntry {
        let mut entry = HistoryEntry::new(title.to_string(), completed_at, group.map(str::to_string));
        entry.id = title.to_string();
        entry
    }

    #[test]
    fn test_empty_history() {
        let report = render_history_in(&[], &Utc);
        assert!(report.contains("No completed tasks yet"));
    }

    #[test]
    fn test_sections_per_day() {
        // 2024-03-02 09:30 UTC, 2024-03-01 18:05 UTC, 2024-03-01 08:00 UTC
        let history = vec![
            entry("Ship release", 1_709_371_800_000, Some("Work")),
            entry("Buy milk", 1_709_316_300_000, None),
            entry("Stretch", 1_709_280_000_000, None),
        ];
        let report = render_history_in(&history, &Utc);

        assert!(report.contains("**Completed:** 3"));
        let first = report.find("## 2024-03-02").unwrap();
        let second = report.find("## 2024-03-01").unwrap();
        assert!(first < second);
        assert_eq!(report.matches("## 2024-03-01").count(), 1);
        assert!(report.contains("- 09:30 ✓ Ship release _(Work)_"));
        assert!(report.contains("- 18:05 ✓ Buy milk\n"));
        assert!(report.contains("- 08:00 ✓ Stretch\n"));
    }

    #[test]
    fn test_count_skips_undatable_entries() {
        let history = vec![
            entry("Far future", i64::MAX, None),
            entry("Stretch", 1_709_280_000_000, None),
        ];
        let report = render_history_in(&history, &Utc);

        assert!(report.contains("**Completed:** 1\n"));
        assert!(report.contains("- 08:00 ✓ Stretch\n"));
        assert!(!report.contains("Far future"));

        let report = render_history_in(&[entry("Far future", i64::MIN, None)], &Utc);
        assert!(report.contains("No completed tasks yet"));
        assert!(!report.contains("**Completed:**"));
    }

    #[test]
    fn test_write_history_report() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("history.md");
        write_history_report(&[entry("Read", 1_709_280_000_000, None)], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# TaskiPin History"));
        assert!(content.contains("Read"));
    }
}
