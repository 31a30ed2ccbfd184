// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Response assembly — turns captured pages plus the original request into the
// payload handed back to the caller.
//
// Order of operations is fixed: truncate, check for pages, encode images,
// encode document. Truncation happens before any encoding, so a page past the
// limit can never fail the request. Encoding is all-or-nothing: the first
// failure aborts the whole response and nothing partial escapes.

use scanwerk_core::config::DocumentSettings;
use scanwerk_core::error::{Result, ScanError};
use scanwerk_core::{PagePayload, RawPage, ResponsePayload, ScanRequest};
use tracing::{debug, info, instrument, warn};

use crate::encode::{DocumentEncoder, ImageEncoder};
use crate::image::encoder::JpegPageEncoder;
use crate::pdf::writer::PdfWriter;

/// Builds `ResponsePayload`s from captured pages.
pub struct ResponseAssembler {
    image_encoder: Box<dyn ImageEncoder>,
    document_encoder: Box<dyn DocumentEncoder>,
}

impl ResponseAssembler {
    /// Assemble with custom encoders.
    pub fn new(
        image_encoder: Box<dyn ImageEncoder>,
        document_encoder: Box<dyn DocumentEncoder>,
    ) -> Self {
        Self {
            image_encoder,
            document_encoder,
        }
    }

    /// JPEG pages and a PDF laid out per `settings`.
    pub fn from_settings(settings: &DocumentSettings) -> Self {
        Self::new(
            Box::new(JpegPageEncoder::new()),
            Box::new(PdfWriter::from_settings(settings)),
        )
    }

    /// Build the response for `request` from the pages a capture produced.
    ///
    /// Takes the pages by value: bitmaps are dropped as soon as the payload
    /// is built and never retained.
    #[instrument(skip_all, fields(captured = pages.len()))]
    pub fn assemble(&self, request: &ScanRequest, mut pages: Vec<RawPage>) -> Result<ResponsePayload> {
        if let Some(limit) = request.enforced_page_limit()
            && pages.len() > limit
        {
            warn!(captured = pages.len(), limit, "truncating pages beyond maxPages");
            pages.truncate(limit);
        }

        if pages.is_empty() {
            return Err(ScanError::NoPagesCaptured);
        }

        let mut payload = ResponsePayload::default();

        if request.return_images {
            payload.pages = pages
                .iter()
                .enumerate()
                .map(|(index, page)| -> Result<PagePayload> {
                    let bytes = self
                        .image_encoder
                        .encode_page(page, request.image_quality)
                        .map_err(|err| ScanError::ImageEncodingFailed {
                            index,
                            reason: err.reason,
                        })?;
                    debug!(index, bytes = bytes.len(), "page payload ready");
                    Ok(PagePayload {
                        index: index as u32,
                        bytes,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
        }

        if request.return_document {
            let document = self
                .document_encoder
                .encode_document(&pages)
                .map_err(|err| ScanError::DocumentEncodingFailed(err.reason))?;
            payload.document = Some(document);
        }

        info!(
            pages = payload.pages.len(),
            document_bytes = payload.document.as_ref().map_or(0, Vec::len),
            "response assembled"
        );
        Ok(payload)
    }
}

impl Default for ResponseAssembler {
    fn default() -> Self {
        Self::from_settings(&DocumentSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::encode::EncodeError;
    use image::{DynamicImage, GrayImage, Luma};
    use scanwerk_core::ScannerMode;

    /// Encodes a page as its single shade byte so tests can see which
    /// original page ended up where.
    struct ShadeEncoder {
        fail_on_shade: Option<u8>,
        calls: Arc<AtomicUsize>,
    }

    impl ImageEncoder for ShadeEncoder {
        fn encode_page(&self, page: &RawPage, _quality: f64) -> std::result::Result<Vec<u8>, EncodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let shade = page.as_dynamic().to_luma8().get_pixel(0, 0).0[0];
            if Some(shade) == self.fail_on_shade {
                return Err(EncodeError::new("simulated failure"));
            }
            Ok(vec![shade])
        }
    }

    /// Records how many pages the document contained.
    struct CountingDocument {
        fail: bool,
    }

    impl DocumentEncoder for CountingDocument {
        fn encode_document(&self, pages: &[RawPage]) -> std::result::Result<Vec<u8>, EncodeError> {
            if self.fail {
                return Err(EncodeError::new("renderer crashed"));
            }
            Ok(vec![pages.len() as u8])
        }
    }

    fn assembler(fail_on_shade: Option<u8>, fail_document: bool) -> ResponseAssembler {
        ResponseAssembler::new(
            Box::new(ShadeEncoder {
                fail_on_shade,
                calls: Arc::new(AtomicUsize::new(0)),
            }),
            Box::new(CountingDocument {
                fail: fail_document,
            }),
        )
    }

    fn pages(n: u8) -> Vec<RawPage> {
        (0..n)
            .map(|shade| RawPage::new(DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([shade])))))
            .collect()
    }

    fn request() -> ScanRequest {
        ScanRequest {
            allow_gallery_import: true,
            max_pages: None,
            return_images: true,
            return_document: false,
            image_quality: 0.9,
            scanner_mode: ScannerMode::Full,
            enforce_max_page_limit: true,
        }
    }

    #[test]
    fn images_only_has_indexed_pages_and_no_document() {
        let payload = assembler(None, false).assemble(&request(), pages(3)).unwrap();
        assert_eq!(payload.pages.len(), 3);
        for (i, page) in payload.pages.iter().enumerate() {
            assert_eq!(page.index, i as u32);
            assert_eq!(page.bytes, vec![i as u8]);
        }
        assert!(payload.document.is_none());
    }

    #[test]
    fn truncation_keeps_first_pages_reindexed() {
        let req = ScanRequest {
            max_pages: NonZeroU32::new(2),
            return_document: true,
            ..request()
        };
        let payload = assembler(None, false).assemble(&req, pages(5)).unwrap();
        let bytes: Vec<Vec<u8>> = payload.pages.iter().map(|p| p.bytes.clone()).collect();
        assert_eq!(bytes, vec![vec![0], vec![1]]);
        assert_eq!(payload.pages[1].index, 1);
        assert_eq!(payload.document, Some(vec![2]));
    }

    #[test]
    fn truncation_law_for_several_limits() {
        for k in 1..6u32 {
            for n in (k + 1)..8 {
                let req = ScanRequest {
                    max_pages: NonZeroU32::new(k),
                    ..request()
                };
                let payload = assembler(None, false).assemble(&req, pages(n as u8)).unwrap();
                let indices: Vec<u32> = payload.pages.iter().map(|p| p.index).collect();
                assert_eq!(indices, (0..k).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn no_truncation_when_enforcement_is_off() {
        let req = ScanRequest {
            max_pages: NonZeroU32::new(2),
            enforce_max_page_limit: false,
            ..request()
        };
        let payload = assembler(None, false).assemble(&req, pages(4)).unwrap();
        assert_eq!(payload.pages.len(), 4);
    }

    #[test]
    fn failure_beyond_limit_is_never_reached() {
        let req = ScanRequest {
            max_pages: NonZeroU32::new(2),
            ..request()
        };
        // Page with shade 3 would fail, but it is truncated away first.
        assert!(assembler(Some(3), false).assemble(&req, pages(5)).is_ok());
    }

    #[test]
    fn zero_pages_is_an_error() {
        let err = assembler(None, false).assemble(&request(), Vec::new()).unwrap_err();
        assert!(matches!(err, ScanError::NoPagesCaptured));
    }

    #[test]
    fn single_image_failure_aborts_everything() {
        let req = ScanRequest {
            return_document: true,
            ..request()
        };
        let err = assembler(Some(1), false).assemble(&req, pages(3)).unwrap_err();
        match err {
            ScanError::ImageEncodingFailed { index, reason } => {
                assert_eq!(index, 1);
                assert_eq!(reason, "simulated failure");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn image_failure_stops_encoding_further_pages() {
        let calls = Arc::new(AtomicUsize::new(0));
        let assembler = ResponseAssembler::new(
            Box::new(ShadeEncoder {
                fail_on_shade: Some(0),
                calls: Arc::clone(&calls),
            }),
            Box::new(CountingDocument { fail: false }),
        );
        assert!(assembler.assemble(&request(), pages(4)).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn document_failure_discards_good_images() {
        let req = ScanRequest {
            return_document: true,
            ..request()
        };
        let err = assembler(None, true).assemble(&req, pages(2)).unwrap_err();
        assert!(matches!(err, ScanError::DocumentEncodingFailed(ref r) if r == "renderer crashed"));
    }

    #[test]
    fn document_only_leaves_pages_empty() {
        let req = ScanRequest {
            return_images: false,
            return_document: true,
            ..request()
        };
        let payload = assembler(None, false).assemble(&req, pages(3)).unwrap();
        assert!(payload.pages.is_empty());
        assert_eq!(payload.document, Some(vec![3]));
    }

    #[test]
    fn real_encoders_produce_jpeg_and_pdf() {
        let req = ScanRequest {
            return_document: true,
            ..request()
        };
        let payload = ResponseAssembler::default().assemble(&req, pages(2)).unwrap();
        assert_eq!(payload.pages.len(), 2);
        assert!(payload.pages.iter().all(|p| p.bytes.starts_with(&[0xFF, 0xD8])));
        let document = payload.document.unwrap();
        assert_eq!(crate::PdfReader::from_bytes(&document).unwrap().page_count(), 2);
    }
}
