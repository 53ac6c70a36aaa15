mod help;
mod state;

use crate::cli::{build_config, Cli};
use crate::client::DashboardClient;
use crate::controller::{self, UiCommand};
use crate::indicator::{IndicatorColor, INDICATOR_GLYPH};
use crate::model::{ClientConfig, MonitorEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use state::UiState;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    // Client construction is the only fallible setup; do it before taking
    // over the terminal so a bad base URL fails as a plain error.
    let client = DashboardClient::new(&cfg)?;

    // Unbounded channels avoid backpressure between the UI and the controller.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<MonitorEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the
    // Tokio runtime.
    let ui_cfg = cfg.clone();
    let ui_handle = std::thread::spawn(move || run_threaded(ui_cfg, event_rx, cmd_tx));

    let res = controller::run_controller(client, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    cfg: ClientConfig,
    mut event_rx: UnboundedReceiver<MonitorEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState::new(&cfg);

    // The tick doubles as the blink interval while a restart is pending.
    let tick_rate = Duration::from_millis(cfg.blink_interval_ms.max(10));
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain events without blocking to keep the UI responsive.
        while let Ok(ev) = event_rx.try_recv() {
            state.apply_event(ev);
        }

        if last_tick.elapsed() >= tick_rate {
            // Draw before advancing so a freshly started blink shows its
            // `loading` frame first.
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            state.on_tick();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match (k.modifiers, k.code) {
                    (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                    (_, KeyCode::Char('r')) => {
                        if state.restart_enabled() {
                            state.info = "Restart requested…".into();
                            let _ = cmd_tx.send(UiCommand::Restart);
                        } else {
                            state.info = "Restart already in progress".into();
                        }
                    }
                    (_, KeyCode::Char('s')) => {
                        state.info = "Refreshing status…".into();
                        let _ = cmd_tx.send(UiCommand::Refresh);
                    }
                    (_, KeyCode::Char('?')) => {
                        state.show_help = !state.show_help;
                    }
                    (_, KeyCode::Esc) => {
                        state.show_help = false;
                    }
                    _ => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn style_color(c: IndicatorColor) -> Color {
    match c {
        IndicatorColor::Green => Color::Green,
        IndicatorColor::Yellow => Color::Yellow,
        IndicatorColor::Red => Color::Red,
        IndicatorColor::Black => Color::Black,
        IndicatorColor::Gray => Color::DarkGray,
    }
}

fn status_kv(out: &mut Vec<Line<'static>>, label: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    out.push(Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
        Span::raw(value.to_string()),
    ]));
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(7),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("nginx-ui-cli", Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(state.base_url.clone(), Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    if state.show_help {
        help::draw_help(chunks[1], f);
    } else {
        draw_status(chunks[1], f, state);
    }

    let info = Paragraph::new(state.info.clone())
        .block(Block::default().borders(Borders::ALL).title("Messages"));
    f.render_widget(info, chunks[2]);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)].as_ref())
        .split(area);

    let (color, label) = state.indicator();
    let mut lines = vec![
        Line::from(vec![
            Span::raw("  "),
            Span::styled(INDICATOR_GLYPH, Style::default().fg(style_color(color))),
            Span::raw("  "),
            Span::styled(label, Style::default().fg(style_color(color))),
        ]),
        Line::from(""),
    ];
    status_kv(&mut lines, "Container", state.container_name().unwrap_or("-"));
    status_kv(
        &mut lines,
        "Checked",
        state.last_checked.as_deref().unwrap_or("-"),
    );
    if let Some(outcome) = state.last_outcome.as_ref() {
        status_kv(&mut lines, "Last restart", &outcome.to_message());
    }
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, rows[0]);

    let restart_style = if state.restart_enabled() {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut control = vec![Line::from(vec![
        Span::styled("[r]", restart_style),
        Span::raw(" Restart   "),
        Span::styled("[s]", Style::default().fg(Color::Magenta)),
        Span::raw(" Refresh   "),
        Span::styled("[?]", Style::default().fg(Color::Magenta)),
        Span::raw(" Help   "),
        Span::styled("[q]", Style::default().fg(Color::Magenta)),
        Span::raw(" Quit"),
    ])];
    if let Some(frame) = state.spinner() {
        control.push(Line::from(vec![
            Span::styled(frame, Style::default().fg(Color::Yellow)),
            Span::raw(" Restart in progress…"),
        ]));
    }
    let p = Paragraph::new(control).block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(p, rows[1]);
}
