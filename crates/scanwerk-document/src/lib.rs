// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanwerk-document — Output side of a scan session.
//
// Encodes captured pages as JPEG images, combines them into one multi-page
// PDF, and assembles the final response with truncation and all-or-nothing
// failure semantics.

pub mod assemble;
pub mod encode;
pub mod image;
pub mod pdf;

// Re-export the primary structs so callers can use `scanwerk_document::PdfWriter` etc.
pub use assemble::ResponseAssembler;
pub use encode::{DocumentEncoder, EncodeError, ImageEncoder};
pub use self::image::encoder::JpegPageEncoder;
pub use pdf::reader::PdfReader;
pub use pdf::writer::PdfWriter;
