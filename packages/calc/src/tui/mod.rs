mod keypad;

use anyhow::{Result, bail};
use calc_core::{ArithmeticService, SessionError, SessionHandle, Snapshot, spawn_session};
use ratatui::{
    DefaultTerminal,
    crossterm::{
        event::{
            self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
            MouseButton, MouseEvent, MouseEventKind,
        },
        execute,
    },
};
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info};

use keypad::{KeypadLayout, View};

/// Run the clickable keypad until the user quits.
///
/// Keys are entered with the mouse only; the keyboard is read for q/Esc.
pub async fn run<S: ArithmeticService>(service: S) -> Result<()> {
    let session = spawn_session(Arc::new(service));
    let events = session.subscribe();
    let initial = session.snapshot().await?;
    let runtime = Handle::current();

    tokio::task::spawn_blocking(move || {
        let mut terminal = ratatui::init();
        let result = execute!(stdout(), EnableMouseCapture)
            .map_err(anyhow::Error::from)
            .and_then(|()| event_loop(&mut terminal, &runtime, &session, events, initial));
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();
        result
    })
    .await?
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    runtime: &Handle,
    session: &SessionHandle,
    mut events: broadcast::Receiver<Snapshot>,
    initial: Snapshot,
) -> Result<()> {
    let mut view = View::new(initial);
    let mut layout = KeypadLayout::default();

    loop {
        // Completed calculations arrive here, not through press().
        loop {
            match events.try_recv() {
                Ok(snapshot) => view.snapshot = snapshot,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Lagged(_)) => view.snapshot = runtime.block_on(session.snapshot())?,
                Err(TryRecvError::Closed) => bail!("calculator session ended"),
            }
        }
        if !view.snapshot.loading {
            view.status = None;
        }

        terminal.draw(|frame| {
            layout = KeypadLayout::new(frame.area());
            keypad::render(frame, &layout, &view);
        })?;
        if view.snapshot.loading {
            view.tick = view.tick.wrapping_add(1);
        }

        if !event::poll(Duration::from_millis(80))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    info!("keypad closed");
                    return Ok(());
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                let Some(key) = layout.hit(column, row) else {
                    continue;
                };
                debug!(%key, "clicked");
                match runtime.block_on(session.press(key)) {
                    Ok(snapshot) => view.snapshot = snapshot,
                    Err(SessionError::Input(e)) => {
                        debug!(%key, error = %e, "key ignored");
                        view.status = Some(e.to_string());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            _ => {}
        }
    }
}
