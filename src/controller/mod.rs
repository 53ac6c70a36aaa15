//! Restart flow orchestration.
//!
//! This module owns the restart lifecycle (trigger, completion, cleanup) and
//! the status fetches around it. UI layers send commands in and consume
//! events out, keeping presentation separated from control.

mod lifecycle;

pub(crate) use lifecycle::{run_controller, UiCommand};
