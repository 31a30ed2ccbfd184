// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JPEG page encoder — compresses captured page bitmaps using the `image`
// crate's baseline JPEG encoder.

use image::codecs::jpeg::JpegEncoder;
use scanwerk_core::RawPage;
use tracing::{debug, instrument};

use crate::encode::{EncodeError, ImageEncoder};

/// Encodes pages as baseline JPEG.
///
/// Quality in `[0, 1]` maps linearly onto the encoder's `1..=100` scale;
/// `0.0` still yields the lowest valid JPEG quality rather than an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegPageEncoder;

impl JpegPageEncoder {
    pub fn new() -> Self {
        Self
    }
}

/// Map a `[0, 1]` fidelity onto JPEG quality `1..=100`.
pub fn jpeg_quality(quality: f64) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

impl ImageEncoder for JpegPageEncoder {
    #[instrument(skip(self, page), fields(width = page.width(), height = page.height()))]
    fn encode_page(&self, page: &RawPage, quality: f64) -> Result<Vec<u8>, EncodeError> {
        let quality = jpeg_quality(quality);
        let mut buffer = Vec::new();
        let rgb = page.as_dynamic().to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| EncodeError::new(format!("JPEG encoding failed: {err}")))?;
        debug!(quality, bytes = buffer.len(), "page encoded");
        Ok(buffer)
    }
}
