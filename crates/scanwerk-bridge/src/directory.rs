// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory import surface — stands in for the gallery-import path of a
// native scanner on desktop.
//
// Every decodable image in the directory becomes one page, ordered by file
// name. Pages are read on a background thread and delivered through the
// session's sink, which exercises the same asynchronous path as a native UI.
// The page limit hint is not enforced here; truncation is left to the
// coordinator's assembler.

use std::path::{Path, PathBuf};
use std::time::Duration;

use image::ImageFormat;
use scanwerk_core::{CaptureOutcome, RawPage};
use tracing::{debug, info, instrument, warn};

use crate::traits::*;

/// Imports page images from a directory.
#[derive(Debug, Clone)]
pub struct DirectorySurface {
    dir: PathBuf,
    /// Pause before delivering, to mimic the user working in the capture UI.
    delay: Option<Duration>,
}

impl DirectorySurface {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            delay: None,
        }
    }

    /// Wait `delay` after launch before delivering the pages.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Image files in `dir`, sorted by file name.
fn page_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && ImageFormat::from_path(path).is_ok())
        .collect();
    files.sort();
    Ok(files)
}

/// Decode every file in order; the first failure becomes `LaunchFailed`.
fn import_pages(files: &[PathBuf]) -> CaptureOutcome {
    let mut pages = Vec::with_capacity(files.len());
    for path in files {
        match image::open(path) {
            Ok(img) => {
                debug!(path = %path.display(), width = img.width(), height = img.height(), "page imported");
                pages.push(RawPage::new(img));
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "page import failed");
                return CaptureOutcome::LaunchFailed(format!(
                    "failed to read {}: {}",
                    path.display(),
                    err
                ));
            }
        }
    }
    CaptureOutcome::Pages(pages)
}

impl ScannerSurface for DirectorySurface {
    fn name(&self) -> &str {
        "directory import"
    }

    fn is_supported(&self) -> bool {
        true
    }

    #[instrument(skip(self, sink), fields(dir = %self.dir.display(), session = %sink.session()))]
    fn launch(&self, hints: CaptureHints, sink: OutcomeSink) -> Result<(), LaunchError> {
        if !hints.allow_gallery_import {
            return Err(LaunchError::Failed(
                "directory import requires allowGalleryImport".into(),
            ));
        }
        if !self.dir.is_dir() {
            return Err(LaunchError::Failed(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }

        let dir = self.dir.clone();
        let delay = self.delay;
        std::thread::Builder::new()
            .name("scanwerk-directory-import".into())
            .spawn(move || {
                if let Some(delay) = delay {
                    std::thread::sleep(delay);
                }
                let outcome = match page_files(&dir) {
                    Ok(files) => {
                        info!(files = files.len(), "importing pages");
                        import_pages(&files)
                    }
                    Err(err) => CaptureOutcome::LaunchFailed(format!(
                        "failed to list {}: {}",
                        dir.display(),
                        err
                    )),
                };
                sink.deliver(outcome);
            })
            .map_err(|err| LaunchError::Failed(format!("failed to start import thread: {err}")))?;

        Ok(())
    }
}
