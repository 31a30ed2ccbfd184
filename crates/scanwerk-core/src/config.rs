// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner configuration and its JSON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::ScannerMode;

/// Persistent scanner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Values the validator uses for options the caller leaves out.
    pub defaults: RequestDefaults,
    /// Layout settings for the combined document.
    pub document: DocumentSettings,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            defaults: RequestDefaults::default(),
            document: DocumentSettings::default(),
            log_filter: "info".into(),
        }
    }
}

/// Documented defaults for omitted request options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub allow_gallery_import: bool,
    pub return_images: bool,
    pub return_document: bool,
    pub image_quality: f64,
    /// Also the fallback for unrecognised scanner modes.
    pub scanner_mode: ScannerMode,
    pub enforce_max_page_limit: bool,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            allow_gallery_import: true,
            return_images: true,
            return_document: false,
            image_quality: 0.9,
            scanner_mode: ScannerMode::Full,
            enforce_max_page_limit: true,
        }
    }
}

/// PDF output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Title embedded in the PDF metadata.
    pub title: String,
    /// Resolution used to derive page size from pixel dimensions.
    pub dpi: f32,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            title: "Scanned Document".into(),
            dpi: 150.0,
        }
    }
}

impl ScannerConfig {
    /// Read a config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&data)?;
        debug!(path = %path.as_ref().display(), "scanner config loaded");
        Ok(config)
    }

    /// Read a config file, falling back to defaults if it is absent or broken.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no scanner config, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable scanner config, using defaults");
                Self::default()
            }
        }
    }

    /// Write the config as pretty-printed JSON, creating parent directories.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
