//! Session actor: owns a [`Calculator`] and drives its arithmetic calls.
//!
//! Key presses are processed one at a time by a single task. A compute
//! transition spawns the service call and reports back through a completion
//! channel, so the session keeps answering (and rejecting) presses while a
//! calculation is loading.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::arithmetic::{ArithmeticError, ArithmeticService, evaluate};
use crate::key::Key;
use crate::machine::{Calculator, Completion, InputError, RequestId, Transition};
use crate::state::CalculatorState;

/// What a view needs to draw the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: CalculatorState,
    pub loading: bool,
}

impl Snapshot {
    fn of(calc: &Calculator) -> Self {
        Self {
            state: calc.state().clone(),
            loading: calc.is_loading(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("calculator session closed")]
    Closed,
}

/// Messages that can be sent to the session actor
enum SessionMessage {
    Press {
        key: Key,
        respond_to: oneshot::Sender<Result<Snapshot, InputError>>,
    },
    GetSnapshot {
        respond_to: oneshot::Sender<Snapshot>,
    },
}

struct CalculationDone {
    id: RequestId,
    outcome: Result<f64, ArithmeticError>,
}

struct SessionActor<S> {
    calculator: Calculator,
    service: Arc<S>,
    receiver: mpsc::Receiver<SessionMessage>,
    done_tx: mpsc::UnboundedSender<CalculationDone>,
    done_rx: mpsc::UnboundedReceiver<CalculationDone>,
    pending_task: Option<AbortHandle>,
    events: broadcast::Sender<Snapshot>,
}

impl<S: ArithmeticService> SessionActor<S> {
    fn new(
        service: Arc<S>,
        state: CalculatorState,
        receiver: mpsc::Receiver<SessionMessage>,
        events: broadcast::Sender<Snapshot>,
    ) -> Self {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        Self {
            calculator: Calculator::from_state(state),
            service,
            receiver,
            done_tx,
            done_rx,
            pending_task: None,
            events,
        }
    }

    async fn run(mut self) {
        info!("calculator session started");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle_message(msg),
                    None => break,
                },
                Some(done) = self.done_rx.recv() => self.handle_done(done),
            }
        }

        if let Some(task) = self.pending_task.take() {
            task.abort();
        }
        info!("calculator session shutting down");
    }

    fn handle_message(&mut self, msg: SessionMessage) {
        match msg {
            SessionMessage::Press { key, respond_to } => {
                let result = self.handle_press(key);
                let _ = respond_to.send(result);
            }
            SessionMessage::GetSnapshot { respond_to } => {
                let _ = respond_to.send(Snapshot::of(&self.calculator));
            }
        }
    }

    fn handle_press(&mut self, key: Key) -> Result<Snapshot, InputError> {
        let transition = self.calculator.press(key)?;

        if key == Key::Clear {
            if let Some(task) = self.pending_task.take() {
                task.abort();
            }
        }

        if let Transition::Compute(request) = transition {
            let service = Arc::clone(&self.service);
            let done_tx = self.done_tx.clone();
            let task = tokio::spawn(async move {
                let outcome = evaluate(&*service, request.operator, request.lhs, request.rhs).await;
                // Ignore send errors (session gone)
                let _ = done_tx.send(CalculationDone {
                    id: request.id,
                    outcome,
                });
            });
            self.pending_task = Some(task.abort_handle());
        }

        Ok(self.publish())
    }

    fn handle_done(&mut self, done: CalculationDone) {
        match self.calculator.complete(done.id, done.outcome) {
            Completion::Applied => {
                self.pending_task = None;
                self.publish();
            }
            Completion::Discarded => {
                debug!(request = %done.id, "late calculation ignored");
            }
        }
    }

    fn publish(&self) -> Snapshot {
        let snapshot = Snapshot::of(&self.calculator);
        // Ignore send errors (no subscribers)
        let _ = self.events.send(snapshot.clone());
        snapshot
    }
}

/// Cheap, cloneable handle to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
    events: broadcast::Sender<Snapshot>,
}

/// Start a session actor on the current tokio runtime.
pub fn spawn_session<S: ArithmeticService>(service: Arc<S>) -> SessionHandle {
    spawn_session_with_state(service, CalculatorState::default())
}

/// Start a session actor resuming from `state`.
pub fn spawn_session_with_state<S: ArithmeticService>(
    service: Arc<S>,
    state: CalculatorState,
) -> SessionHandle {
    let (msg_tx, msg_rx) = mpsc::channel(32);
    let (events, _) = broadcast::channel(64);

    let actor = SessionActor::new(service, state, msg_rx, events.clone());
    tokio::spawn(actor.run());

    SessionHandle {
        sender: msg_tx,
        events,
    }
}

impl SessionHandle {
    /// Press a key. Returns as soon as the press is applied; if it started a
    /// calculation the snapshot is `loading` and the result arrives later
    /// through [`SessionHandle::subscribe`].
    pub async fn press(&self, key: Key) -> Result<Snapshot, SessionError> {
        let (respond_to, rx) = oneshot::channel();
        self.sender
            .send(SessionMessage::Press { key, respond_to })
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(rx.await.map_err(|_| SessionError::Closed)??)
    }

    /// Press a key and wait for any calculation it started to finish.
    pub async fn press_settled(&self, key: Key) -> Result<Snapshot, SessionError> {
        let mut events = self.subscribe();
        let snapshot = self.press(key).await?;
        if !snapshot.loading {
            return Ok(snapshot);
        }

        loop {
            match events.recv().await {
                Ok(s) if !s.loading => return Ok(s),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    let s = self.snapshot().await?;
                    if !s.loading {
                        return Ok(s);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => return Err(SessionError::Closed),
            }
        }
    }

    pub async fn snapshot(&self) -> Result<Snapshot, SessionError> {
        let (respond_to, rx) = oneshot::channel();
        self.sender
            .send(SessionMessage::GetSnapshot { respond_to })
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Every change to the session, including completed calculations.
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.events.subscribe()
    }
}
