//! Text summary builder for CLI output.
//!
//! Formats the one-shot status (and restart) report as human-readable lines.

use crate::model::{ContainerStatus, RestartOutcome};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary from the fetched status and an optional restart
/// outcome. A failed status fetch still produces a line, never silence.
pub(crate) fn build_summary(
    status: Option<&ContainerStatus>,
    status_error: Option<&str>,
    restart: Option<&RestartOutcome>,
) -> TextSummary {
    let mut lines = Vec::new();

    if let Some(outcome) = restart {
        lines.push(outcome.to_message());
    }

    match status {
        Some(s) => {
            lines.push(format!("Container: {}", s.container.as_deref().unwrap_or("-")));
            lines.push(format!("Status: {}", s.status));
        }
        None => {
            lines.push(format!(
                "Status check failed: {}",
                status_error.unwrap_or("unknown error")
            ));
        }
    }

    TextSummary { lines }
}
