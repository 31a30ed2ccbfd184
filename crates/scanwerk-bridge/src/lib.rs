// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Scanwerk — Scanner surface abstractions.
//!
//! The native capture UI is an external collaborator: it is launched once per
//! session and eventually reports exactly one `CaptureOutcome` through the
//! `OutcomeSink` it was handed. This crate defines that contract and the
//! surfaces available without a native SDK.

pub mod directory;
pub mod stub;
pub mod traits;

pub use directory::DirectorySurface;
pub use stub::StubSurface;
pub use traits::{CaptureHints, LaunchError, OutcomeSink, ScannerSurface};
