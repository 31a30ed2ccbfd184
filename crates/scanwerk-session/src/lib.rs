// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-session — The scan-session coordinator.
//
// Enforces single-flight scanning, routes the capture outcome (or a host
// disruption) to exactly one waiting caller, and exposes the coordinator to
// hosts through a method-channel style plugin.

pub mod channel;
pub mod coordinator;
pub mod plugin;

pub use channel::{MethodCall, MethodReply};
pub use coordinator::{SessionCoordinator, SessionEvent, SessionState};
pub use plugin::ScannerPlugin;
