//! Command and poll history for debugging and diagnostics.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::Display;

/// Type of event in the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A command sent to the vendor API.
    Command,
    /// A state refresh.
    Poll,
    /// Either of the above that failed.
    Error,
}

/// A recorded event in the history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub event_type: EventType,
    pub device: String,
    pub method: String,
    pub params: Value,
    /// Seconds since history creation
    pub timestamp: f64,
}

/// Bounded log of what the integration asked of the API.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    counts: HashMap<EventType, usize>,
    last_error: Option<String>,
    start_time: Instant,
    entries: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHistory {
    pub const DEFAULT_MAX_ENTRIES: usize = 100;

    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            last_error: None,
            start_time: Instant::now(),
            entries: VecDeque::new(),
            max_entries: Self::DEFAULT_MAX_ENTRIES,
        }
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::new()
        }
    }

    pub fn record(&mut self, event_type: EventType, device: &str, method: &str, params: Value) {
        *self.counts.entry(event_type).or_default() += 1;

        self.entries.push_back(HistoryEntry {
            event_type,
            device: device.to_string(),
            method: method.to_string(),
            params,
            timestamp: self.start_time.elapsed().as_secs_f64(),
        });

        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn record_error(&mut self, device: &str, method: &str, error: &str) {
        self.record(
            EventType::Error,
            device,
            method,
            Value::String(error.to_string()),
        );
        self.last_error = Some(error.to_string());
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Entries concerning one device, oldest first.
    pub fn for_device<'a>(&'a self, device: &'a str) -> impl Iterator<Item = &'a HistoryEntry> {
        self.entries.iter().filter(move |e| e.device == device)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.entries.clear();
        self.last_error = None;
    }

    pub fn summary(&self) -> HistorySummary {
        let count = |t: EventType| self.counts.get(&t).copied().unwrap_or(0);
        HistorySummary {
            command_count: count(EventType::Command),
            poll_count: count(EventType::Poll),
            error_count: count(EventType::Error),
            total_entries: self.entries.len(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Summary of the history for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySummary {
    pub command_count: usize,
    pub poll_count: usize,
    pub error_count: usize,
    pub total_entries: usize,
    pub last_error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_command() {
        let mut history = CommandHistory::new();
        history.record(
            EventType::Command,
            "AA:BB",
            "set_brightness",
            json!({"brightness": 254}),
        );

        assert_eq!(history.len(), 1);
        assert_eq!(history.summary().command_count, 1);
    }

    #[test]
    fn test_record_error() {
        let mut history = CommandHistory::new();
        history.record_error("AA:BB", "turn_on", "Connection timeout");
        assert_eq!(history.last_error(), Some("Connection timeout"));
        assert_eq!(history.summary().error_count, 1);
    }

    #[test]
    fn test_max_entries() {
        let mut history = CommandHistory::with_max_entries(2);
        for i in 0..5 {
            history.record(EventType::Poll, "AA:BB", &format!("method{i}"), Value::Null);
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.entries().next().unwrap().method, "method3");
        assert_eq!(history.summary().poll_count, 5);
    }

    #[test]
    fn test_for_device() {
        let mut history = CommandHistory::new();
        history.record(EventType::Command, "a", "turn_on", Value::Null);
        history.record(EventType::Command, "b", "turn_on", Value::Null);
        history.record(EventType::Command, "a", "turn_off", Value::Null);
        let methods: Vec<_> = history.for_device("a").map(|e| e.method.as_str()).collect();
        assert_eq!(methods, ["turn_on", "turn_off"]);
    }
}
