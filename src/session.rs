//! Session history and context
//!
//! The history is owned by the presentation layer, which appends exactly one
//! entry per successful resolution. The pipeline itself never reads it.

use chrono::{DateTime, Local};

use crate::article::ArticleRecord;

/// One past query with the title it resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Query text as the user submitted it
    pub query: String,
    /// Canonical title it resolved to
    pub title: String,
    /// Wall-clock time of the successful resolution
    pub timestamp: DateTime<Local>,
}

/// Append-only log of past queries within one session
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, stamped with the current wall-clock time
    pub fn push(&mut self, query: impl Into<String>, title: impl Into<String>) {
        self.entries.push(HistoryEntry {
            query: query.into(),
            title: title.into(),
            timestamp: Local::now(),
        });
    }

    /// All entries in chronological append order
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// The most recent `n` entries, oldest first
    #[must_use]
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        &self.entries[self.entries.len().saturating_sub(n)..]
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-session state owned by the presentation layer
#[derive(Debug, Default)]
pub struct SessionContext {
    /// Query log, appended once per successful resolution
    pub history: SessionHistory,
    /// Most recent query text
    pub last_query: Option<String>,
}

impl SessionContext {
    /// Create an empty session context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful resolution
    pub fn record(&mut self, query: &str, record: &ArticleRecord) {
        self.history.push(query, record.title.clone());
        self.last_query = Some(query.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            summary: String::new(),
            content: String::new(),
            url: String::new(),
        }
    }

    #[test]
    fn appends_in_chronological_order() {
        let mut ctx = SessionContext::new();
        ctx.record("einstein", &record("Albert Einstein"));
        ctx.record("india", &record("India"));
        ctx.record("water cycle", &record("Water cycle"));

        let entries = ctx.history.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].query, "einstein");
        assert_eq!(entries[2].title, "Water cycle");
        assert!(entries[0].timestamp <= entries[1].timestamp);
        assert!(entries[1].timestamp <= entries[2].timestamp);
        assert_eq!(ctx.last_query.as_deref(), Some("water cycle"));
    }

    #[test]
    fn recent_returns_suffix_oldest_first() {
        let mut history = SessionHistory::new();
        for i in 0..5 {
            history.push(format!("q{i}"), format!("t{i}"));
        }

        let recent = history.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].query, "q2");
        assert_eq!(recent[2].query, "q4");
    }

    #[test]
    fn recent_handles_short_history() {
        let mut history = SessionHistory::new();
        history.push("only", "Only");
        assert_eq!(history.recent(3).len(), 1);
        assert!(SessionHistory::new().recent(3).is_empty());
    }
}
