// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session coordinator — the single-flight state machine between callers and
// the scanner surface.
//
// States are Idle and Awaiting. All transitions run under one mutex around
// the session slot. A pending session is removed from the slot before its
// completion callback runs, and the callback always runs outside the lock:
// whoever takes the pending session is the only one who can complete it, so
// each caller hears back exactly once, and the coordinator is already Idle
// when they do.
//
// The coordinator imposes no timeout: a capture stays Awaiting until the
// surface reports or the host is torn down.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Utc};
use scanwerk_bridge::{CaptureHints, OutcomeSink, ScannerSurface};
use scanwerk_core::error::ScanError;
use scanwerk_core::{CaptureOutcome, ScanOutcome, ScanRequest, SessionId};
use scanwerk_document::ResponseAssembler;
use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};

/// Callback receiving the single result of a session.
pub type Completion = Box<dyn FnOnce(ScanOutcome) + Send>;

/// Observable coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Awaiting {
        id: SessionId,
        started_at: DateTime<Utc>,
    },
}

/// Events the host or surface pushes into the coordinator.
#[derive(Debug)]
pub enum SessionEvent {
    /// The capture UI finished. `session: None` targets whatever session is
    /// pending.
    Outcome {
        session: Option<SessionId>,
        outcome: CaptureOutcome,
    },
    /// The presenting surface (activity, window) went away.
    HostDisrupted,
}

struct PendingSession {
    id: SessionId,
    request: ScanRequest,
    started_at: DateTime<Utc>,
    completion: Completion,
}

impl PendingSession {
    fn complete(self, result: ScanOutcome) {
        let elapsed_ms = (Utc::now() - self.started_at).num_milliseconds();
        match &result {
            Ok(Some(payload)) => info!(
                session = %self.id,
                elapsed_ms,
                pages = payload.pages.len(),
                document = payload.document.is_some(),
                "scan completed"
            ),
            Ok(None) => info!(session = %self.id, elapsed_ms, "scan cancelled by user"),
            Err(e) => warn!(session = %self.id, elapsed_ms, code = e.code(), error = %e, "scan failed"),
        }
        (self.completion)(result);
    }
}

/// The session slot. Holds at most one pending session.
#[derive(Default)]
struct Session {
    pending: Option<PendingSession>,
}

impl Session {
    /// Remove the pending session, if any and if it matches `id`.
    ///
    /// This is the only way out of Awaiting; the first caller gets the
    /// session, everyone after gets `None`.
    fn take(&mut self, id: Option<SessionId>) -> Option<PendingSession> {
        match (&self.pending, id) {
            (Some(pending), Some(id)) if pending.id != id => None,
            _ => self.pending.take(),
        }
    }
}

struct Inner {
    surface: Box<dyn ScannerSurface>,
    assembler: ResponseAssembler,
    session: Mutex<Session>,
}

impl Inner {
    fn session(&self) -> MutexGuard<'_, Session> {
        // Every critical section leaves the slot consistent, so a panic in
        // another thread cannot leave it half-updated.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_pending(&self, id: Option<SessionId>) -> Option<PendingSession> {
        self.session().take(id)
    }

    fn handle_outcome(&self, id: Option<SessionId>, outcome: CaptureOutcome) {
        let kind = outcome.kind();
        let Some(pending) = self.take_pending(id) else {
            warn!(session = ?id, outcome = kind, "stale capture outcome ignored");
            return;
        };
        debug!(session = %pending.id, outcome = kind, "capture outcome received");

        let result = match outcome {
            CaptureOutcome::Cancelled => Ok(None),
            CaptureOutcome::Pages(pages) => self.assembler.assemble(&pending.request, pages).map(Some),
            CaptureOutcome::LaunchFailed(reason) => Err(ScanError::ScanFailed(reason)),
        };
        pending.complete(result);
    }

    fn interrupt(&self, reason: &str) -> bool {
        match self.take_pending(None) {
            Some(pending) => {
                pending.complete(Err(ScanError::SessionInterrupted(reason.to_owned())));
                true
            }
            None => false,
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let pending = self
            .session
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .take();
        if let Some(pending) = pending {
            pending.complete(Err(ScanError::SessionInterrupted(
                "scanner was released during the scan".into(),
            )));
        }
    }
}

/// Coordinates scan sessions against one scanner surface.
///
/// Cheap to clone; all clones share the same session slot.
#[derive(Clone)]
pub struct SessionCoordinator {
    inner: Arc<Inner>,
}

impl SessionCoordinator {
    pub fn new(surface: Box<dyn ScannerSurface>, assembler: ResponseAssembler) -> Self {
        Self {
            inner: Arc::new(Inner {
                surface,
                assembler,
                session: Mutex::new(Session::default()),
            }),
        }
    }

    /// Name of the surface this coordinator drives.
    pub fn surface_name(&self) -> &str {
        self.inner.surface.name()
    }

    /// Start a scan session.
    ///
    /// `on_complete` is invoked exactly once: immediately with
    /// `ScanAlreadyInProgress` or `ScannerUnsupported`, immediately if the
    /// surface fails to launch, or later when the capture finishes or the
    /// host is disrupted. Never blocks waiting for the capture.
    ///
    /// Returns the session id when the capture UI was launched.
    #[instrument(skip_all, fields(surface = self.inner.surface.name()))]
    pub fn start(
        &self,
        request: ScanRequest,
        on_complete: impl FnOnce(ScanOutcome) + Send + 'static,
    ) -> Option<SessionId> {
        let id = SessionId::new();
        let hints = CaptureHints::from(&request);
        // Asked before locking: a surface may consult the coordinator.
        let supported = self.inner.surface.is_supported();

        {
            let mut session = self.inner.session();
            if let Some(current) = &session.pending {
                warn!(current = %current.id, "scan rejected: another scan is in progress");
                drop(session);
                on_complete(Err(ScanError::ScanAlreadyInProgress));
                return None;
            }
            if !supported {
                drop(session);
                warn!("scan rejected: scanner unsupported");
                on_complete(Err(ScanError::ScannerUnsupported(None)));
                return None;
            }
            session.pending = Some(PendingSession {
                id,
                request,
                started_at: Utc::now(),
                completion: Box::new(on_complete),
            });
        }
        info!(session = %id, ?hints, "scan session started");

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let sink = OutcomeSink::new(id, move |outcome| match weak.upgrade() {
            Some(inner) => inner.handle_outcome(Some(id), outcome),
            None => debug!(session = %id, "outcome after coordinator shut down"),
        });

        // Launch outside the lock: a surface may deliver synchronously.
        match self.inner.surface.launch(hints, sink) {
            Ok(()) => Some(id),
            Err(err) => {
                warn!(session = %id, error = %err, "scanner launch failed");
                if let Some(pending) = self.inner.take_pending(Some(id)) {
                    pending.complete(Err(err.into()));
                }
                None
            }
        }
    }

    /// Async form of [`start`](Self::start): resolves with the session's result.
    pub async fn scan(&self, request: ScanRequest) -> ScanOutcome {
        let (tx, rx) = oneshot::channel();
        self.start(request, move |result| {
            let _ = tx.send(result);
        });
        rx.await.unwrap_or_else(|_| {
            Err(ScanError::SessionInterrupted(
                "completion dropped before delivery".into(),
            ))
        })
    }

    /// Route a capture outcome to whichever session is pending.
    pub fn on_outcome(&self, outcome: CaptureOutcome) {
        self.inner.handle_outcome(None, outcome);
    }

    /// Route a capture outcome to `session`; a no-op if it is not pending.
    pub fn on_outcome_for(&self, session: SessionId, outcome: CaptureOutcome) {
        self.inner.handle_outcome(Some(session), outcome);
    }

    /// The host surface was torn down. Fails the pending session with
    /// `SessionInterrupted`; a no-op when Idle.
    pub fn on_host_disrupted(&self) {
        if self.inner.interrupt("the host surface was closed during the scan") {
            info!("pending scan interrupted by host disruption");
        } else {
            debug!("host disruption while idle ignored");
        }
    }

    /// Apply a queued event.
    pub fn dispatch(&self, event: SessionEvent) {
        match event {
            SessionEvent::Outcome { session, outcome } => self.inner.handle_outcome(session, outcome),
            SessionEvent::HostDisrupted => self.on_host_disrupted(),
        }
    }

    /// Interrupt any pending session because the plugin is going away.
    pub fn shutdown(&self) {
        if self.inner.interrupt("the scanner was detached during the scan") {
            info!("pending scan interrupted by shutdown");
        }
    }

    pub fn state(&self) -> SessionState {
        match &self.inner.session().pending {
            Some(pending) => SessionState::Awaiting {
                id: pending.id,
                started_at: pending.started_at,
            },
            None => SessionState::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state() == SessionState::Idle
    }

    #[cfg(test)]
    fn pending_request(&self) -> Option<ScanRequest> {
        self.inner.session().pending.as_ref().map(|p| p.request.clone())
    }
}
