//! Restart lifecycle controller.
//!
//! Owns the status fetches and the restart flow and emits events for
//! presentation layers.

use crate::client::DashboardClient;
use crate::model::{InfoEvent, MonitorEvent, RestartOutcome, RestartResponse};
use anyhow::Result;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Refresh,
    Restart,
    Quit,
}

/// Handle for a restart request running as its own task.
struct RestartCtx {
    handle: Option<tokio::task::JoinHandle<Result<RestartResponse>>>,
}

/// Fetch the current status and report it as an event. Both branches are
/// reported: a failed fetch leaves the previous indicator in place but
/// surfaces the error instead of dropping it.
async fn report_status(client: &DashboardClient, event_tx: &UnboundedSender<MonitorEvent>) {
    match client.fetch_status().await {
        Ok(status) => {
            let _ = event_tx.send(MonitorEvent::StatusUpdated { status });
        }
        Err(e) => {
            let _ = event_tx.send(MonitorEvent::StatusCheckFailed {
                error: format!("{e:#}"),
            });
        }
    }
}

/// Spawn the restart request and hand back its handle.
fn start_restart(
    client: &DashboardClient,
    event_tx: &UnboundedSender<MonitorEvent>,
) -> RestartCtx {
    let _ = event_tx.send(MonitorEvent::RestartStarted);
    let client = client.clone();
    let handle = tokio::spawn(async move { client.restart().await });
    RestartCtx {
        handle: Some(handle),
    }
}

/// Drive the status/restart flows based on UI commands and emit events back
/// to presentation layers.
///
/// Restarts never overlap: a second restart command while one is pending is
/// dropped and reported, not queued. Whatever way the pending request
/// settles, the finished event and a fresh status fetch are always emitted,
/// so the UI is never left with the restart control disabled.
pub(crate) async fn run_controller(
    client: DashboardClient,
    event_tx: UnboundedSender<MonitorEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    // Initial render: a single fetch at startup, no periodic poll.
    report_status(&client, &event_tx).await;

    let mut restart_ctx: Option<RestartCtx> = None;
    let mut quit_pending = false;
    let mut cmd_closed = false;

    loop {
        tokio::select! {
            // A closed command channel would make recv() permanently ready;
            // the guard stops polling it once closure has been observed.
            cmd = cmd_rx.recv(), if !cmd_closed => {
                match cmd {
                    Some(UiCommand::Refresh) => {
                        report_status(&client, &event_tx).await;
                    }
                    Some(UiCommand::Restart) => {
                        if restart_ctx.is_some() {
                            let _ = event_tx.send(MonitorEvent::Info(InfoEvent::RestartPending));
                        } else {
                            restart_ctx = Some(start_restart(&client, &event_tx));
                        }
                    }
                    // Quit waits for a pending restart to settle so the final
                    // status is still observed.
                    Some(UiCommand::Quit) => {
                        if restart_ctx.is_some() {
                            if !quit_pending {
                                quit_pending = true;
                                let _ = event_tx.send(MonitorEvent::Info(InfoEvent::Message(
                                    "Waiting for restart to finish…".into(),
                                )));
                            }
                        } else {
                            break;
                        }
                    }
                    // Channel closure counts as quit.
                    None => {
                        cmd_closed = true;
                        if restart_ctx.is_some() {
                            quit_pending = true;
                        } else {
                            break;
                        }
                    }
                }
            }
            // Do not take the JoinHandle before this branch wins; otherwise it
            // can be dropped when another branch is chosen, and completion is
            // never observed.
            maybe_done = async {
                if let Some(ctx) = &mut restart_ctx {
                    if let Some(h) = ctx.handle.as_mut() {
                        return Some(h.await);
                    }
                }
                futures::future::pending().await
            } => {
                if let Some(join_res) = maybe_done {
                    if let Some(ctx) = &mut restart_ctx {
                        ctx.handle.take();
                    }
                    let outcome = match join_res {
                        Ok(Ok(resp)) => RestartOutcome::Completed { message: resp.message },
                        Ok(Err(e)) => RestartOutcome::Failed { error: format!("{e:#}") },
                        Err(e) => RestartOutcome::Failed {
                            error: format!("restart task join failed: {e}"),
                        },
                    };
                    let _ = event_tx.send(MonitorEvent::RestartFinished { outcome });
                    // Final authoritative render: the indicator must reflect a
                    // fresh fetch, not the last blink frame.
                    report_status(&client, &event_tx).await;
                    restart_ctx = None;
                    if quit_pending {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClientConfig;
    use crate::testutil::{serve_responses, CannedResponse};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn config(base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            blink_interval_ms: 100,
            user_agent: "nginx-ui-cli/test".to_string(),
        }
    }

    /// Queue commands up front, run the controller to completion, and
    /// collect every event it emitted.
    async fn run_to_completion(
        responses: Vec<CannedResponse>,
        commands: Vec<UiCommand>,
    ) -> Vec<MonitorEvent> {
        let base = serve_responses(responses).await;
        let client = DashboardClient::new(&config(&base)).expect("client");
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        for cmd in commands {
            cmd_tx.send(cmd).expect("queue command");
        }
        drop(cmd_tx);

        run_controller(client, event_tx, cmd_rx)
            .await
            .expect("controller");

        let mut events = Vec::new();
        while let Some(ev) = event_rx.recv().await {
            events.push(ev);
        }
        events
    }

    #[tokio::test]
    async fn startup_fetch_is_reported_once() {
        let events = run_to_completion(
            vec![CannedResponse::ok(r#"{"container":"nginx","status":"running"}"#)],
            vec![UiCommand::Quit],
        )
        .await;

        assert_eq!(events.len(), 1);
        let MonitorEvent::StatusUpdated { status } = &events[0] else {
            panic!("expected status event, got {:?}", events[0]);
        };
        assert_eq!(status.status, "running");
    }

    #[tokio::test]
    async fn refresh_failure_is_surfaced_not_dropped() {
        // Only the startup response is served; the refresh hits a closed port.
        let events = run_to_completion(
            vec![CannedResponse::ok(r#"{"container":"nginx","status":"running"}"#)],
            vec![UiCommand::Refresh, UiCommand::Quit],
        )
        .await;

        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], MonitorEvent::StatusUpdated { .. }));
        assert!(matches!(&events[1], MonitorEvent::StatusCheckFailed { .. }));
    }

    #[tokio::test]
    async fn restart_failure_still_reports_fresh_status() {
        let events = run_to_completion(
            vec![
                CannedResponse::ok(r#"{"container":"nginx","status":"running"}"#),
                CannedResponse::server_error(r#"{"message":"Error: boom"}"#)
                    .delayed(Duration::from_millis(100)),
                CannedResponse::ok(r#"{"container":"nginx","status":"exited"}"#),
            ],
            vec![UiCommand::Restart, UiCommand::Quit],
        )
        .await;

        let started = events
            .iter()
            .position(|e| matches!(e, MonitorEvent::RestartStarted))
            .expect("restart started");
        let finished = events
            .iter()
            .position(|e| matches!(e, MonitorEvent::RestartFinished { .. }))
            .expect("restart finished");
        let MonitorEvent::RestartFinished {
            outcome: RestartOutcome::Failed { error },
        } = &events[finished]
        else {
            panic!("expected failed outcome, got {:?}", events[finished]);
        };
        assert!(error.contains("boom"));

        // Cleanup ordering: started → finished → authoritative re-fetch.
        let last_status = events
            .iter()
            .rposition(|e| matches!(e, MonitorEvent::StatusUpdated { .. }))
            .expect("post-restart status");
        assert!(started < finished);
        assert!(finished < last_status);
        let MonitorEvent::StatusUpdated { status } = &events[last_status] else {
            unreachable!();
        };
        assert_eq!(status.status, "exited");
    }

    #[tokio::test]
    async fn concurrent_restart_commands_are_dropped() {
        let events = run_to_completion(
            vec![
                CannedResponse::ok(r#"{"container":"nginx","status":"running"}"#),
                CannedResponse::ok(r#"{"message":"Nginx container restarted"}"#)
                    .delayed(Duration::from_millis(200)),
                CannedResponse::ok(r#"{"container":"nginx","status":"running"}"#),
            ],
            vec![UiCommand::Restart, UiCommand::Restart, UiCommand::Quit],
        )
        .await;

        let started = events
            .iter()
            .filter(|e| matches!(e, MonitorEvent::RestartStarted))
            .count();
        assert_eq!(started, 1, "second restart must not spawn a request");
        assert!(events
            .iter()
            .any(|e| matches!(e, MonitorEvent::Info(InfoEvent::RestartPending))));

        let MonitorEvent::RestartFinished {
            outcome: RestartOutcome::Completed { message },
        } = events
            .iter()
            .find(|e| matches!(e, MonitorEvent::RestartFinished { .. }))
            .expect("restart finished")
        else {
            panic!("expected completed outcome");
        };
        assert_eq!(message, "Nginx container restarted");
    }
}
