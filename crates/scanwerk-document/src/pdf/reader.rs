// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — inspect produced scan documents using the `lopdf` crate.
//
// Hosts use it to check a returned document before handing it on.

use lopdf::Document;
use scanwerk_core::error::ScanError;
use tracing::{debug, instrument};

/// Read-only view of an existing PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ScanError> {
        let document = Document::load_mem(data).map_err(|err| {
            ScanError::DocumentEncodingFailed(format!("failed to load PDF from memory: {}", err))
        })?;
        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_rejected() {
        let err = PdfReader::from_bytes(b"definitely not a pdf").err().unwrap();
        assert_eq!(err.code(), "DOCUMENT_ENCODING_FAILED");
    }
}
