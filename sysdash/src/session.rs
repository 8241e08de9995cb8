//! Push-stream lifecycle as an explicit state machine.
//!
//! Every transport callback goes through exactly one handler (`on_open`,
//! `on_frame`, `on_transport_error`, `close`) and every handler consults
//! [`transition`] under the state lock. Frames are committed while that lock
//! is held, so once `close` returns nothing else reaches the store.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::StreamExt;
use reqwest::Client;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Endpoints;
use crate::decode::decode_metrics;
use crate::error::TransportError;
use crate::store::StateStore;
use crate::types::ConnectionState;
use crate::{sse, ws};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Opened,
    Frame,
    TransportFault,
    Close,
}

/// The transition table. `None` means the event is ignored in that state.
pub fn transition(from: ConnectionState, event: SessionEvent) -> Option<ConnectionState> {
    use ConnectionState::*;
    use SessionEvent::*;
    match (from, event) {
        (Connecting, Opened) => Some(Open),
        (Open, Frame) => Some(Open),
        (Connecting | Open, TransportFault) => Some(Error),
        (Connecting | Open | Error, Close) => Some(Closed),
        _ => None,
    }
}

/// What happened to one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Decoded and now the current snapshot.
    Committed,
    /// Failed to decode; the previous snapshot stays.
    Rejected,
    /// Arrived while not open (or after teardown) and was dropped unread.
    Discarded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub committed: u64,
    pub rejected: u64,
    pub last_fault: Option<String>,
}

#[derive(Debug)]
struct Core {
    state: Mutex<ConnectionState>,
    store: StateStore,
    transport: Mutex<Option<AbortHandle>>,
    opened: AtomicBool,
    committed: AtomicU64,
    rejected: AtomicU64,
    last_fault: Mutex<Option<String>>,
}

/// One push connection, from connect to close. Clones share the session.
#[derive(Debug, Clone)]
pub struct StreamSession {
    core: Arc<Core>,
}

impl StreamSession {
    pub fn new(store: StateStore) -> Self {
        store.observe_connection(ConnectionState::Connecting);
        Self {
            core: Arc::new(Core {
                state: Mutex::new(ConnectionState::Connecting),
                store,
                transport: Mutex::new(None),
                opened: AtomicBool::new(false),
                committed: AtomicU64::new(0),
                rejected: AtomicU64::new(0),
                last_fault: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *lock(&self.core.state)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            committed: self.core.committed.load(Ordering::Relaxed),
            rejected: self.core.rejected.load(Ordering::Relaxed),
            last_fault: lock(&self.core.last_fault).clone(),
        }
    }

    /// Start connecting on a background task. Must be called inside a tokio runtime.
    pub fn open(&self, endpoints: &Endpoints, client: &Client) {
        if self.core.opened.swap(true, Ordering::SeqCst) {
            warn!("stream session opened twice; ignoring");
            return;
        }
        if self.state() != ConnectionState::Connecting {
            return;
        }
        info!(url = %endpoints.stream, "connecting to metrics stream");

        let session = self.clone();
        let url = endpoints.stream.clone();
        let websocket = endpoints.is_websocket();
        let client = client.clone();
        let task = tokio::spawn(async move { session.drive(client, url, websocket).await });
        *lock(&self.core.transport) = Some(task.abort_handle());

        // close() may have raced with the spawn above
        if matches!(self.state(), ConnectionState::Error | ConnectionState::Closed) {
            self.release_transport();
        }
    }

    /// Handshake done; frames may now be committed.
    pub fn on_open(&self) {
        let mut state = lock(&self.core.state);
        if let Some(next) = transition(*state, SessionEvent::Opened) {
            self.set_state(&mut state, next);
            info!("metrics stream open");
        }
    }

    /// Decode and commit one frame. A bad frame never touches the stored snapshot.
    pub fn on_frame(&self, raw: &str) -> FrameOutcome {
        let state = lock(&self.core.state);
        if transition(*state, SessionEvent::Frame).is_none() {
            debug!(state = ?*state, "frame discarded");
            return FrameOutcome::Discarded;
        }
        match decode_metrics(raw) {
            Ok(snapshot) => {
                if !self.core.store.commit_metrics(snapshot) {
                    return FrameOutcome::Discarded;
                }
                self.core.committed.fetch_add(1, Ordering::Relaxed);
                FrameOutcome::Committed
            }
            Err(e) => {
                self.core.rejected.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, payload = %preview(&e.raw), "rejected metrics frame");
                FrameOutcome::Rejected
            }
        }
    }

    /// Connection-level fault: go to `Error`, drop the transport, remember why.
    pub fn on_transport_error(&self, cause: TransportError) {
        let mut state = lock(&self.core.state);
        let Some(next) = transition(*state, SessionEvent::TransportFault) else {
            debug!(state = ?*state, error = %cause, "transport fault after shutdown ignored");
            return;
        };
        self.set_state(&mut state, next);
        warn!(error = %cause, "metrics stream failed");
        *lock(&self.core.last_fault) = Some(cause.to_string());
        drop(state);
        self.release_transport();
    }

    /// Idempotent; valid from every state.
    pub fn close(&self) {
        let mut state = lock(&self.core.state);
        if let Some(next) = transition(*state, SessionEvent::Close) {
            self.set_state(&mut state, next);
            info!("metrics stream closed");
        }
        drop(state);
        self.release_transport();
    }

    fn set_state(&self, state: &mut MutexGuard<'_, ConnectionState>, next: ConnectionState) {
        **state = next;
        self.core.store.observe_connection(next);
    }

    fn release_transport(&self) {
        if let Some(handle) = lock(&self.core.transport).take() {
            handle.abort();
        }
    }

    async fn drive(self, client: Client, url: Url, websocket: bool) {
        let connected = if websocket {
            ws::connect(&url).await
        } else {
            sse::connect(&client, &url).await
        };
        let mut frames = match connected {
            Ok(f) => f,
            Err(e) => return self.on_transport_error(e),
        };
        self.on_open();

        while let Some(item) = frames.next().await {
            match item {
                Ok(raw) => {
                    if self.on_frame(&raw) == FrameOutcome::Discarded {
                        return;
                    }
                }
                Err(e) => return self.on_transport_error(e),
            }
        }
        self.on_transport_error(TransportError::EndOfStream);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn preview(raw: &str) -> String {
    const MAX: usize = 120;
    if raw.chars().count() <= MAX {
        return raw.to_string();
    }
    let mut s: String = raw.chars().take(MAX).collect();
    s.push('…');
    s
}
