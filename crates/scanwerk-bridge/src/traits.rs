// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic contract for the native capture UI.

use std::fmt;
use std::sync::Arc;

use scanwerk_core::error::ScanError;
use scanwerk_core::{CaptureOutcome, ScanRequest, ScannerMode, SessionId};
use thiserror::Error;

/// What the capture UI needs to know about a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureHints {
    pub allow_gallery_import: bool,
    /// The request's `maxPages`; surfaces may or may not enforce it.
    pub page_limit: Option<u32>,
    pub scanner_mode: ScannerMode,
    pub want_images: bool,
    pub want_document: bool,
}

impl From<&ScanRequest> for CaptureHints {
    fn from(request: &ScanRequest) -> Self {
        Self {
            allow_gallery_import: request.allow_gallery_import,
            page_limit: request.max_pages.map(|limit| limit.get()),
            scanner_mode: request.scanner_mode,
            want_images: request.return_images,
            want_document: request.return_document,
        }
    }
}

/// Synchronous launch failure.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The device has no usable scanner (e.g. missing system module).
    #[error("document scanner unsupported")]
    Unsupported(Option<String>),

    #[error("failed to start document scanner: {0}")]
    Failed(String),
}

impl From<LaunchError> for ScanError {
    fn from(err: LaunchError) -> Self {
        match err {
            LaunchError::Unsupported(detail) => ScanError::ScannerUnsupported(detail),
            LaunchError::Failed(reason) => ScanError::ScanFailed(reason),
        }
    }
}

/// One-shot handle through which a surface reports its outcome.
///
/// Tagged with the session it belongs to; delivering consumes the sink, so a
/// surface cannot report twice through the same handle. The coordinator
/// ignores deliveries for sessions that have already completed.
pub struct OutcomeSink {
    session: SessionId,
    deliver: Box<dyn FnOnce(CaptureOutcome) + Send>,
}

impl OutcomeSink {
    pub fn new(session: SessionId, deliver: impl FnOnce(CaptureOutcome) + Send + 'static) -> Self {
        Self {
            session,
            deliver: Box::new(deliver),
        }
    }

    /// Session this sink reports to.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Hand the outcome to the coordinator. Safe to call from any thread.
    pub fn deliver(self, outcome: CaptureOutcome) {
        (self.deliver)(outcome);
    }
}

impl fmt::Debug for OutcomeSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutcomeSink")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// The native capture UI as seen by the coordinator.
pub trait ScannerSurface: Send + Sync {
    /// Human-readable surface name (e.g. "ML Kit", "VisionKit", "directory").
    fn name(&self) -> &str;

    /// Capability check. When false the coordinator never calls `launch`.
    fn is_supported(&self) -> bool;

    /// Show the capture UI.
    ///
    /// Returns once the UI is up (or failed to come up). The outcome arrives
    /// later, on any thread, through `sink`. On `Err` the sink must not be
    /// used.
    fn launch(&self, hints: CaptureHints, sink: OutcomeSink) -> Result<(), LaunchError>;
}

/// Shared surfaces: the host can keep a handle to the surface it gave the
/// coordinator (e.g. to forward native callbacks).
impl<S: ScannerSurface + ?Sized> ScannerSurface for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn launch(&self, hints: CaptureHints, sink: OutcomeSink) -> Result<(), LaunchError> {
        (**self).launch(hints, sink)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn hints_mirror_request() {
        let request = ScanRequest {
            allow_gallery_import: false,
            max_pages: NonZeroU32::new(3),
            return_images: false,
            return_document: true,
            image_quality: 0.5,
            scanner_mode: ScannerMode::BaseWithFilter,
            enforce_max_page_limit: true,
        };
        let hints = CaptureHints::from(&request);
        assert!(!hints.allow_gallery_import);
        assert_eq!(hints.page_limit, Some(3));
        assert_eq!(hints.scanner_mode, ScannerMode::BaseWithFilter);
        assert!(!hints.want_images);
        assert!(hints.want_document);
    }

    #[test]
    fn launch_errors_map_to_scan_errors() {
        let err: ScanError = LaunchError::Unsupported(Some("no module".into())).into();
        assert_eq!(err.code(), "DOCUMENT_SCANNER_UNSUPPORTED");
        assert_eq!(err.details().as_deref(), Some("no module"));

        let err: ScanError = LaunchError::Failed("camera busy".into()).into();
        assert!(matches!(err, ScanError::ScanFailed(ref r) if r == "camera busy"));
    }

    #[test]
    fn sink_delivers_across_threads() {
        let (tx, rx) = mpsc::channel();
        let id = SessionId::new();
        let sink = OutcomeSink::new(id, move |outcome| {
            tx.send(outcome.kind()).unwrap();
        });
        assert_eq!(sink.session(), id);

        std::thread::spawn(move || sink.deliver(CaptureOutcome::Cancelled))
            .join()
            .unwrap();
        assert_eq!(rx.recv().unwrap(), "cancelled");
    }
}
