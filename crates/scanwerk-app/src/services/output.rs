// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan output — writes a response payload to disk with a manifest.
//
// Layout of the output directory:
//   page-000.jpg, page-001.jpg, ...   one per returned page, by index
//   document.pdf                      when a document was returned
//   manifest.json                     every file above with its SHA-256
//
// The document is parsed before anything is written. A PDF that does not
// load is rejected; otherwise its page count goes into the manifest.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use scanwerk_core::error::Result;
use scanwerk_core::ResponsePayload;
use scanwerk_document::PdfReader;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const DOCUMENT_FILE: &str = "document.pdf";

/// One written file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub file: String,
    pub bytes: usize,
    pub sha256: String,
    /// Page count, for documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub created_at: DateTime<Utc>,
    pub pages: Vec<ManifestEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<ManifestEntry>,
}

/// Lowercase hex SHA-256 of `data`.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

pub fn page_file_name(index: u32) -> String {
    format!("page-{index:03}.jpg")
}

fn write_entry(dir: &Path, file: String, data: &[u8]) -> Result<ManifestEntry> {
    let path = dir.join(&file);
    std::fs::write(&path, data)?;
    debug!(path = %path.display(), bytes = data.len(), "file written");
    Ok(ManifestEntry {
        file,
        bytes: data.len(),
        sha256: hash_bytes(data),
        pages: None,
    })
}

/// Write every part of `payload` into `dir` (created if needed) and return
/// the manifest that was written alongside.
pub fn write_payload(dir: &Path, payload: &ResponsePayload) -> Result<Manifest> {
    let document_pages = payload
        .document
        .as_deref()
        .map(|pdf| PdfReader::from_bytes(pdf).map(|reader| reader.page_count()))
        .transpose()?;

    std::fs::create_dir_all(dir)?;

    let pages = payload
        .pages
        .iter()
        .map(|page| write_entry(dir, page_file_name(page.index), &page.bytes))
        .collect::<Result<Vec<_>>>()?;

    let document = payload
        .document
        .as_deref()
        .map(|pdf| {
            write_entry(dir, DOCUMENT_FILE.to_owned(), pdf).map(|entry| ManifestEntry {
                pages: document_pages,
                ..entry
            })
        })
        .transpose()?;

    let manifest = Manifest {
        created_at: Utc::now(),
        pages,
        document,
    };
    std::fs::write(dir.join(MANIFEST_FILE), serde_json::to_string_pretty(&manifest)?)?;

    info!(
        dir = %dir.display(),
        pages = manifest.pages.len(),
        document = manifest.document.is_some(),
        "scan output written"
    );
    Ok(manifest)
}

/// Paths of every file recorded in `manifest`, relative to `dir`.
pub fn manifest_paths(dir: &Path, manifest: &Manifest) -> Vec<PathBuf> {
    manifest
        .pages
        .iter()
        .chain(manifest.document.iter())
        .map(|entry| dir.join(&entry.file))
        .collect()
}
