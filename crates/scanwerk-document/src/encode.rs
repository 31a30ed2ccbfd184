// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encoder seams used by the response assembler.
//
// Both encoders are treated as pure functions of their input: no state is
// carried between calls, so the assembler may call them in any order.

use scanwerk_core::RawPage;
use thiserror::Error;

/// Failure reported by an encoder. The assembler attaches the context
/// (page index or document) when turning it into a `ScanError`.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct EncodeError {
    pub reason: String,
}

impl EncodeError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Encode one page as a compressed image.
pub trait ImageEncoder: Send + Sync {
    /// `quality` is in `[0, 1]`, already validated.
    fn encode_page(&self, page: &RawPage, quality: f64) -> Result<Vec<u8>, EncodeError>;
}

/// Encode an ordered list of pages as one paginated document.
pub trait DocumentEncoder: Send + Sync {
    fn encode_document(&self, pages: &[RawPage]) -> Result<Vec<u8>, EncodeError>;
}
