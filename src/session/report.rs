//! Outcome of a session operation, in the shape callers report back.

use serde::{Deserialize, Serialize};

use crate::error::MonkError;

/// What an operation did, for display or for a dispatch layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReport {
    /// Operation name, e.g. "create_drum_pattern"
    pub tool: String,
    /// One-line human summary
    pub summary: String,
    /// Whether the project or files on disk changed
    pub made_changes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolReport {
    pub fn changed(tool: &str, summary: impl Into<String>) -> Self {
        Self {
            tool: tool.to_string(),
            summary: summary.into(),
            made_changes: true,
            error: None,
        }
    }

    /// Failed form: nothing changed, error text doubles as the summary.
    pub fn from_error(tool: &str, err: &MonkError) -> Self {
        Self {
            tool: tool.to_string(),
            summary: err.to_string(),
            made_changes: false,
            error: Some(err.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error() {
        let err = MonkError::TempoOutOfRange {
            bpm: 300.0,
            min: 40.0,
            max: 240.0,
        };
        let report = ToolReport::from_error("set_tempo", &err);
        assert!(report.is_error());
        assert!(!report.made_changes);
        assert_eq!(report.summary, "Tempo must be between 40 and 240 BPM, got 300");
    }

    #[test]
    fn test_success_serializes_without_error() {
        let report = ToolReport::changed("add_track", "Added track 'Bass'");
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"tool":"add_track","summary":"Added track 'Bass'","made_changes":true}"#
        );
    }
}
