// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub surface for desktop/CI builds where no native capture UI exists.
//
// Reports itself as unsupported, so the coordinator answers every scan with
// `ScannerUnsupported` without ever launching.

use crate::traits::*;

/// No-op surface returned when no native capture UI is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubSurface;

impl ScannerSurface for StubSurface {
    fn name(&self) -> &str {
        "Desktop (stub)"
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn launch(&self, _hints: CaptureHints, _sink: OutcomeSink) -> Result<(), LaunchError> {
        tracing::warn!("ScannerSurface::launch called on stub surface");
        Err(LaunchError::Unsupported(Some(
            "no native document scanner on this platform".into(),
        )))
    }
}
