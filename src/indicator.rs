//! Status indicator styling and the pending-restart blink.

pub const INDICATOR_GLYPH: &str = "●";

/// Colors the status circle can take. Unknown status strings render gray
/// rather than being rejected; the raw string is still shown as the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColor {
    Green,
    Yellow,
    Red,
    Black,
    Gray,
}

/// Map a container status string to an indicator color.
///
/// Docker reports created/restarting/running/removing/paused/exited/dead;
/// `loading` and `black` are the two blink frames.
pub fn color_for_status(status: &str) -> IndicatorColor {
    match status {
        "running" => IndicatorColor::Green,
        "created" | "restarting" | "removing" | "paused" | "loading" => IndicatorColor::Yellow,
        "exited" | "dead" => IndicatorColor::Red,
        "black" => IndicatorColor::Black,
        _ => IndicatorColor::Gray,
    }
}

/// Two-state blink shown while a restart is pending.
///
/// Starts lit on the `loading` frame, flips to `black` and back on every
/// tick, and stops when the restart flow reports completion. Its lifetime
/// is bounded by the request, not by polling a shared flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blink {
    active: bool,
    lit: bool,
}

impl Blink {
    pub fn start(&mut self) {
        self.active = true;
        self.lit = true;
    }

    pub fn tick(&mut self) {
        if self.active {
            self.lit = !self.lit;
        }
    }

    pub fn finish(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Status string the blink is currently showing, if it is running.
    pub fn current_status(&self) -> Option<&'static str> {
        if !self.active {
            None
        } else if self.lit {
            Some("loading")
        } else {
            Some("black")
        }
    }
}
