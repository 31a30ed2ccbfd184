// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanwerk — Core types, error taxonomy, configuration, and request validation
// shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;
pub mod validate;

pub use config::ScannerConfig;
pub use error::ScanError;
pub use types::*;
pub use validate::{validate, validate_with};
