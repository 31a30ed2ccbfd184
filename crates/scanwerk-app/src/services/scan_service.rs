// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan service — runs one scan session for the command line.
//
// Ctrl-C while the capture is pending counts as the host going away: the
// session is interrupted and the command reports `SessionInterrupted`. If
// the Ctrl-C listener itself cannot be installed the scan runs on.

use std::path::Path;
use std::time::Duration;

use scanwerk_bridge::{DirectorySurface, ScannerSurface};
use scanwerk_core::config::RequestDefaults;
use scanwerk_core::{ScanOutcome, ScannerConfig, validate_with};
use scanwerk_document::ResponseAssembler;
use scanwerk_session::SessionCoordinator;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

pub struct ScanService {
    coordinator: SessionCoordinator,
    defaults: RequestDefaults,
}

impl ScanService {
    pub fn new(config: &ScannerConfig, surface: Box<dyn ScannerSurface>) -> Self {
        Self {
            coordinator: SessionCoordinator::new(
                surface,
                ResponseAssembler::from_settings(&config.document),
            ),
            defaults: config.defaults.clone(),
        }
    }

    /// Service importing pages from `dir`, optionally after `delay`.
    pub fn for_directory(config: &ScannerConfig, dir: &Path, delay: Option<Duration>) -> Self {
        let mut surface = DirectorySurface::new(dir);
        if let Some(delay) = delay {
            surface = surface.with_delay(delay);
        }
        Self::new(config, Box::new(surface))
    }

    /// Validate `arguments` and run the scan to completion.
    #[instrument(skip_all, fields(surface = self.coordinator.surface_name()))]
    pub async fn run(&self, arguments: &Map<String, Value>) -> ScanOutcome {
        let request = validate_with(arguments, &self.defaults)?;
        info!(?request, "scan request accepted");

        let scan = self.coordinator.scan(request);
        tokio::pin!(scan);

        let signal = tokio::select! {
            outcome = &mut scan => return outcome,
            signal = tokio::signal::ctrl_c() => signal,
        };
        self.on_signal(signal);
        scan.await
    }

    /// React to the Ctrl-C listener firing. Only a real interrupt disturbs
    /// the pending session.
    fn on_signal(&self, signal: std::io::Result<()>) {
        match signal {
            Ok(()) => {
                warn!("interrupted, abandoning scan");
                self.coordinator.on_host_disrupted();
            }
            Err(e) => warn!(error = %e, "ctrl-c listener failed, waiting for the scan"),
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};
    use scanwerk_bridge::StubSurface;
    use scanwerk_core::error::ScanError;
    use serde_json::json;

    use super::*;

    fn arguments(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn write_pages(dir: &Path, count: u8) {
        for i in 0..count {
            GrayImage::from_pixel(16, 16, Luma([40 * i]))
                .save(dir.join(format!("scan-{i}.png")))
                .unwrap();
        }
    }

    #[tokio::test]
    async fn directory_scan_truncates_and_builds_document() {
        let dir = tempfile::tempdir().unwrap();
        write_pages(dir.path(), 4);

        let service = ScanService::for_directory(&ScannerConfig::default(), dir.path(), None);
        let payload = service
            .run(&arguments(json!({"maxPages": 3, "returnDocument": true})))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(payload.pages.len(), 3);
        assert!(payload.pages.iter().all(|p| p.bytes.starts_with(&[0xFF, 0xD8])));
        let pdf = payload.document.unwrap();
        assert_eq!(scanwerk_document::PdfReader::from_bytes(&pdf).unwrap().page_count(), 3);
    }

    #[tokio::test]
    async fn validation_errors_surface_before_scanning() {
        let service = ScanService::new(&ScannerConfig::default(), Box::new(StubSurface));
        let err = service
            .run(&arguments(json!({"imageQuality": -0.1})))
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidImageQuality(_)));
    }

    #[tokio::test]
    async fn config_defaults_fill_omitted_options() {
        let dir = tempfile::tempdir().unwrap();
        write_pages(dir.path(), 1);

        let mut config = ScannerConfig::default();
        config.defaults.return_images = false;
        config.defaults.return_document = true;

        let service = ScanService::for_directory(&config, dir.path(), None);
        let payload = service.run(&Map::new()).await.unwrap().unwrap();
        assert!(payload.pages.is_empty());
        assert!(payload.document.is_some());
    }

    #[tokio::test]
    async fn empty_directory_reports_no_pages() {
        let dir = tempfile::tempdir().unwrap();
        let service = ScanService::for_directory(&ScannerConfig::default(), dir.path(), None);
        let err = service.run(&Map::new()).await.unwrap_err();
        assert!(matches!(err, ScanError::NoPagesCaptured));
    }

    fn pending_service(dir: &Path) -> (ScanService, std::sync::mpsc::Receiver<ScanOutcome>) {
        write_pages(dir, 1);
        let service = ScanService::for_directory(
            &ScannerConfig::default(),
            dir,
            Some(Duration::from_secs(30)),
        );
        let request = validate_with(&Map::new(), &service.defaults).unwrap();
        let (tx, rx) = std::sync::mpsc::channel::<ScanOutcome>();
        service
            .coordinator
            .start(request, move |outcome: ScanOutcome| {
                let _ = tx.send(outcome);
            })
            .unwrap();
        (service, rx)
    }

    #[test]
    fn failed_signal_listener_leaves_the_scan_running() {
        let dir = tempfile::tempdir().unwrap();
        let (service, rx) = pending_service(dir.path());

        service.on_signal(Err(std::io::Error::other("no signal handler")));
        assert!(!service.coordinator.is_idle());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn interrupt_signal_ends_the_scan() {
        let dir = tempfile::tempdir().unwrap();
        let (service, rx) = pending_service(dir.path());

        service.on_signal(Ok(()));
        assert!(service.coordinator.is_idle());
        let err = rx.try_recv().unwrap().unwrap_err();
        assert_eq!(err.code(), "SESSION_INTERRUPTED");
    }

    #[tokio::test]
    async fn gallery_import_disabled_fails_the_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_pages(dir.path(), 1);
        let service = ScanService::for_directory(&ScannerConfig::default(), dir.path(), None);
        let err = service
            .run(&arguments(json!({"allowGalleryImport": false})))
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::ScanFailed(_)));
    }
}
