// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner plugin — the host-facing entry point.
//
// Validates incoming calls and hands accepted requests to the coordinator.
// Validation failures are answered synchronously and never touch the session
// state.
//
// The plugin only scans while a host is attached. It starts detached; calls
// made before `attach_host` or after `detach_host` are refused with
// `HostDetached` without launching anything.

use std::sync::atomic::{AtomicBool, Ordering};

use scanwerk_core::config::RequestDefaults;
use scanwerk_core::error::ScanError;
use scanwerk_core::validate_with;
use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};

use crate::channel::{MethodCall, MethodReply};
use crate::coordinator::SessionCoordinator;

/// The only method the plugin answers.
pub const METHOD_SCAN_DOCUMENTS: &str = "scanDocuments";

pub struct ScannerPlugin {
    coordinator: SessionCoordinator,
    defaults: RequestDefaults,
    attached: AtomicBool,
}

impl ScannerPlugin {
    pub fn new(coordinator: SessionCoordinator, defaults: RequestDefaults) -> Self {
        Self {
            coordinator,
            defaults,
            attached: AtomicBool::new(false),
        }
    }

    pub fn coordinator(&self) -> &SessionCoordinator {
        &self.coordinator
    }

    /// Handle one call. `reply` is invoked exactly once, possibly on another
    /// thread and possibly long after this returns.
    #[instrument(skip_all, fields(method = %call.method))]
    pub fn on_method_call(&self, call: MethodCall, reply: impl FnOnce(MethodReply) + Send + 'static) {
        if call.method != METHOD_SCAN_DOCUMENTS {
            debug!("method not implemented");
            reply(MethodReply::NotImplemented);
            return;
        }

        if !self.is_attached() {
            warn!("scan request rejected: no host attached");
            reply(MethodReply::error(&ScanError::HostDetached));
            return;
        }

        let request = match validate_with(&call.arguments, &self.defaults) {
            Ok(request) => request,
            Err(err) => {
                warn!(code = err.code(), error = %err, "scan request rejected");
                reply(MethodReply::error(&err));
                return;
            }
        };

        self.coordinator
            .start(request, move |outcome| reply(MethodReply::from(outcome)));
    }

    /// Async form of [`on_method_call`](Self::on_method_call).
    pub async fn call(&self, call: MethodCall) -> MethodReply {
        let (tx, rx) = oneshot::channel();
        self.on_method_call(call, move |reply| {
            let _ = tx.send(reply);
        });
        rx.await.unwrap_or_else(|_| {
            MethodReply::error(&ScanError::SessionInterrupted(
                "reply dropped before delivery".into(),
            ))
        })
    }

    /// A host surface is available to present the capture UI.
    pub fn attach_host(&self) {
        if !self.attached.swap(true, Ordering::SeqCst) {
            info!("host attached");
        }
    }

    /// The host surface went away (activity destroyed, window closed).
    /// Later calls are refused until the next `attach_host`.
    pub fn detach_host(&self) {
        self.attached.store(false, Ordering::SeqCst);
        info!("host detached");
        self.coordinator.on_host_disrupted();
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// The plugin is being unregistered.
    pub fn shutdown(&self) {
        info!("scanner plugin shutting down");
        self.coordinator.shutdown();
    }
}
