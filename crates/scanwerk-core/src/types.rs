// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Scanwerk scan sessions.

use std::num::NonZeroU32;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScanError;

/// Unique identifier for one scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capture UI flavour requested from the native scanner.
///
/// Passed through opaquely to the scanner surface; Scanwerk itself never
/// changes behaviour based on the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScannerMode {
    /// Full feature set: filters, cleanup, and automatic capture.
    Full,
    /// Basic capture plus image filters.
    BaseWithFilter,
    /// Basic capture only.
    Base,
}

impl ScannerMode {
    /// Integer used for this mode on the method channel.
    pub fn channel_value(&self) -> i64 {
        match self {
            Self::Full => 1,
            Self::BaseWithFilter => 2,
            Self::Base => 3,
        }
    }

    /// Look up a mode by its channel integer.
    pub fn from_channel_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Full),
            2 => Some(Self::BaseWithFilter),
            3 => Some(Self::Base),
            _ => None,
        }
    }

    /// Look up a mode by name (`full`, `base_with_filter`, `base`), ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Self::Full),
            "base_with_filter" | "base-with-filter" => Some(Self::BaseWithFilter),
            "base" => Some(Self::Base),
            _ => None,
        }
    }
}

/// A validated scan request. Immutable once produced by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Whether the capture UI may import existing images from the gallery.
    pub allow_gallery_import: bool,
    /// Upper bound on captured pages; `None` means unbounded.
    pub max_pages: Option<NonZeroU32>,
    /// Return each page as a compressed image.
    pub return_images: bool,
    /// Return all pages combined into one paginated document.
    pub return_document: bool,
    /// Compression fidelity for image output, in `[0, 1]`.
    pub image_quality: f64,
    /// Platform hint for the capture UI.
    pub scanner_mode: ScannerMode,
    /// Truncate surplus pages locally instead of trusting the surface's limit.
    pub enforce_max_page_limit: bool,
}

impl ScanRequest {
    /// Page limit to apply locally, if enforcement is on and a limit is set.
    pub fn enforced_page_limit(&self) -> Option<usize> {
        if self.enforce_max_page_limit {
            self.max_pages.map(|limit| limit.get() as usize)
        } else {
            None
        }
    }
}

/// A raw page image handed over by the scanner surface.
///
/// Ordering within a capture is the order of the `Vec` the surface delivers.
#[derive(Debug, Clone)]
pub struct RawPage {
    image: DynamicImage,
}

impl RawPage {
    /// Wrap an already-decoded bitmap.
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying bitmap.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }
}

/// Terminal event of one capture attempt.
#[derive(Debug, Clone)]
pub enum CaptureOutcome {
    /// The user dismissed the capture UI.
    Cancelled,
    /// Zero or more captured pages, in capture order.
    Pages(Vec<RawPage>),
    /// The capture UI could not run or reported an error.
    LaunchFailed(String),
}

impl CaptureOutcome {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Pages(_) => "pages",
            Self::LaunchFailed(_) => "launch_failed",
        }
    }
}

/// One encoded page in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePayload {
    /// Position in the response, `0..count` after truncation.
    pub index: u32,
    /// Compressed image bytes.
    pub bytes: Vec<u8>,
}

/// Successful result of a scan session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// Encoded pages; empty when images were not requested.
    pub pages: Vec<PagePayload>,
    /// Combined paginated document, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Vec<u8>>,
}

/// What a completed session hands back: `Ok(None)` means the user cancelled.
pub type ScanOutcome = Result<Option<ResponsePayload>, ScanError>;

/// Classification of errors for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// The request itself was invalid; retrying unchanged cannot help.
    CallerError,
    /// Lifecycle or launch hiccup; starting a new session may succeed.
    Transient,
    /// Cannot be fixed by retrying on this device.
    Permanent,
}
