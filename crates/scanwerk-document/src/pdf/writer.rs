// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — combine scanned pages into one multi-page PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use scanwerk_core::RawPage;
use scanwerk_core::config::DocumentSettings;
use tracing::{debug, info, instrument, warn};

use crate::encode::{DocumentEncoder, EncodeError};

const MM_PER_INCH: f32 = 25.4;

/// Builds a PDF with one page per scanned image.
///
/// Each page is sized to its image at the configured DPI, so a scan keeps
/// its aspect ratio and no margins are added.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: String,
    /// Pixels per inch used to convert image size to page size.
    dpi: f32,
}

impl PdfWriter {
    /// Create a writer with the given title and resolution.
    ///
    /// Non-positive or non-finite `dpi` falls back to the default of 150.
    pub fn new(title: impl Into<String>, dpi: f32) -> Self {
        let dpi = if dpi.is_finite() && dpi > 0.0 {
            dpi
        } else {
            warn!(dpi, "invalid document dpi, using default");
            DocumentSettings::default().dpi
        };
        Self {
            title: title.into(),
            dpi,
        }
    }

    /// Create a writer from persisted document settings.
    pub fn from_settings(settings: &DocumentSettings) -> Self {
        Self::new(settings.title.clone(), settings.dpi)
    }

    /// Page size in millimetres for an image of `width` x `height` pixels.
    fn page_dimensions(&self, width: u32, height: u32) -> (Mm, Mm) {
        (
            Mm(width as f32 / self.dpi * MM_PER_INCH),
            Mm(height as f32 / self.dpi * MM_PER_INCH),
        )
    }

    /// Create a PDF containing the pages in order.
    #[instrument(skip(self, pages), fields(pages = pages.len()))]
    pub fn create_from_pages(&self, pages: &[RawPage]) -> Result<Vec<u8>, EncodeError> {
        if pages.is_empty() {
            return Err(EncodeError::new("cannot build a document without pages"));
        }

        info!(title = %self.title, dpi = self.dpi, "Creating scan PDF");

        let mut doc = PdfDocument::new(&self.title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for (index, page) in pages.iter().enumerate() {
            let (width, height) = (page.width(), page.height());
            if width == 0 || height == 0 {
                return Err(EncodeError::new(format!("page {index} has no pixels")));
            }

            // Convert to RGB8 for printpdf.
            let rgb = page.as_dynamic().to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // At the writer's DPI the image exactly fills the page.
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(self.dpi),
                    rotate: None,
                },
            }];

            let (page_w, page_h) = self.page_dimensions(width, height);
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
            debug!(index, width, height, "page placed");
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "PDF serialised with warnings");
        }

        Ok(output)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::from_settings(&DocumentSettings::default())
    }
}

impl DocumentEncoder for PdfWriter {
    fn encode_document(&self, pages: &[RawPage]) -> Result<Vec<u8>, EncodeError> {
        self.create_from_pages(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use image::{DynamicImage, Luma, GrayImage};

    fn page(w: u32, h: u32, shade: u8) -> RawPage {
        RawPage::new(DynamicImage::ImageLuma8(GrayImage::from_pixel(w, h, Luma([shade]))))
    }

    #[test]
    fn one_pdf_page_per_scan() {
        let pages = vec![page(30, 40, 200), page(40, 30, 100), page(10, 10, 0)];
        let bytes = PdfWriter::default().create_from_pages(&pages).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(PdfReader::from_bytes(&bytes).unwrap().page_count(), 3);
    }

    #[test]
    fn empty_page_list_is_an_error() {
        assert!(PdfWriter::default().create_from_pages(&[]).is_err());
    }

    #[test]
    fn page_size_follows_dpi() {
        let writer = PdfWriter::new("t", 100.0);
        let (w, h) = writer.page_dimensions(100, 200);
        assert!((w.0 - 25.4).abs() < 1e-3);
        assert!((h.0 - 50.8).abs() < 1e-3);
    }

    #[test]
    fn invalid_dpi_uses_default() {
        let writer = PdfWriter::new("t", 0.0);
        assert_eq!(writer.dpi, 150.0);
        let writer = PdfWriter::new("t", f32::NAN);
        assert_eq!(writer.dpi, 150.0);
    }
}
