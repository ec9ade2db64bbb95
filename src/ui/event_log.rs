//! Capped, most-recent-first log of zone enter/exit notifications
//!
//! Events are ephemeral: they exist only in this log, which holds at
//! most [`MAX_EVENTS`] entries. Older entries fall off the bottom.

use crate::api::types::ZoneEventKind;
use chrono::{DateTime, Local};
use std::collections::VecDeque;

pub const MAX_EVENTS: usize = 10;

/// One zone transition as displayed in the log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub vehicle_id: String,
    pub kind: ZoneEventKind,
    pub zone_name: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    pub fn zone_label(&self) -> &str {
        self.zone_name.as_deref().unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends an event, dropping the oldest entry past the cap.
    pub fn push(&mut self, vehicle_id: String, kind: ZoneEventKind, zone_name: Option<String>) {
        self.entries.push_front(LogEntry {
            vehicle_id,
            kind,
            zone_name,
            timestamp: Local::now(),
        });
        self.entries.truncate(MAX_EVENTS);
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_entry_is_first() {
        let mut log = EventLog::new();
        log.push("a".to_string(), ZoneEventKind::Enter, Some("Downtown".to_string()));
        log.push("b".to_string(), ZoneEventKind::Exit, Some("Downtown".to_string()));

        let ids: Vec<&str> = log.entries().map(|e| e.vehicle_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_log_is_capped() {
        let mut log = EventLog::new();
        for i in 0..25 {
            log.push(format!("truck-{i}"), ZoneEventKind::Enter, None);
        }

        assert_eq!(log.len(), MAX_EVENTS);
        // Newest first, oldest dropped.
        assert_eq!(log.entries().next().unwrap().vehicle_id, "truck-24");
        assert!(log.entries().all(|e| e.vehicle_id != "truck-0"));
    }

    #[test]
    fn test_clear() {
        let mut log = EventLog::new();
        log.push("a".to_string(), ZoneEventKind::Enter, None);
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_missing_zone_name_label() {
        let mut log = EventLog::new();
        log.push("a".to_string(), ZoneEventKind::Exit, None);
        assert_eq!(log.entries().next().unwrap().zone_label(), "Unknown");
    }
}
