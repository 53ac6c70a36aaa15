use crate::indicator::{color_for_status, Blink, IndicatorColor};
use crate::model::{ClientConfig, MonitorEvent, RestartOutcome};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct UiState {
    pub base_url: String,
    pub status: Option<crate::model::ContainerStatus>,
    pub last_checked: Option<String>,
    pub last_outcome: Option<RestartOutcome>,
    pub blink: Blink,
    pub spinner_idx: usize,
    pub info: String,
    pub show_help: bool,
}

impl UiState {
    pub fn new(cfg: &ClientConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            status: None,
            last_checked: None,
            last_outcome: None,
            blink: Blink::default(),
            spinner_idx: 0,
            info: String::new(),
            show_help: false,
        }
    }

    pub fn apply_event(&mut self, ev: MonitorEvent) {
        match ev {
            MonitorEvent::StatusUpdated { status } => {
                self.status = Some(status);
                self.last_checked = Some(clock_time());
            }
            MonitorEvent::StatusCheckFailed { error } => {
                // Previous indicator stays; the failure is surfaced instead
                // of being dropped.
                self.info = format!("Status check failed: {error}");
            }
            MonitorEvent::RestartStarted => {
                self.blink.start();
                self.spinner_idx = 0;
                self.info = "Restarting container…".into();
            }
            MonitorEvent::RestartFinished { outcome } => {
                self.blink.finish();
                self.info = outcome.to_message();
                self.last_outcome = Some(outcome);
            }
            MonitorEvent::Info(info) => self.info = info.to_message(),
        }
    }

    /// Advance the blink and spinner animation by one frame.
    pub fn on_tick(&mut self) {
        self.blink.tick();
        if self.blink.is_active() {
            self.spinner_idx = (self.spinner_idx + 1) % SPINNER_FRAMES.len();
        }
    }

    /// What the status circle shows right now. A pending restart blink
    /// overrides the last fetched status until the final fetch lands.
    pub fn indicator(&self) -> (IndicatorColor, String) {
        if let Some(s) = self.blink.current_status() {
            return (color_for_status(s), s.to_string());
        }
        match self.status.as_ref() {
            Some(s) => (color_for_status(&s.status), s.status.clone()),
            None => (IndicatorColor::Gray, "unknown".into()),
        }
    }

    pub fn restart_enabled(&self) -> bool {
        !self.blink.is_active()
    }

    pub fn spinner(&self) -> Option<&'static str> {
        self.blink
            .is_active()
            .then(|| SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()])
    }

    pub fn container_name(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.container.as_deref())
    }
}

fn clock_time() -> String {
    let fmt = time::macros::format_description!("[hour]:[minute]:[second]");
    time::OffsetDateTime::now_local()
        .unwrap_or_else(|_| time::OffsetDateTime::now_utc())
        .format(&fmt)
        .unwrap_or_else(|_| "now".into())
}
