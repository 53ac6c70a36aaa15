use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    pub blink_interval_ms: u64,
    pub user_agent: String,
}

/// Body of `GET /api/status-nginx`. The server sends both fields, but only
/// `status` is promised by the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerStatus {
    #[serde(default)]
    pub container: Option<String>,
    pub status: String,
}

/// Body of `POST /api/restart-nginx`, on both the 200 and 500 paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestartResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RestartOutcome {
    Completed { message: String },
    Failed { error: String },
}

impl RestartOutcome {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            RestartOutcome::Completed { message } => message.clone(),
            RestartOutcome::Failed { error } => format!("Restart failed: {error}"),
        }
    }
}

/// Events emitted by the controller and consumed by presentation layers.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    StatusUpdated { status: ContainerStatus },
    StatusCheckFailed { error: String },
    RestartStarted,
    RestartFinished { outcome: RestartOutcome },
    Info(InfoEvent),
}

/// Structured info events generated outside the restart flow itself.
#[derive(Debug, Clone)]
pub enum InfoEvent {
    Message(String),
    RestartPending,
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::RestartPending => "Restart already in progress".to_string(),
        }
    }
}

/// Printed by the JSON one-shot mode.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub timestamp_utc: String,
    pub base_url: String,
    pub status: Option<ContainerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart: Option<RestartOutcome>,
}
