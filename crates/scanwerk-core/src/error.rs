// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanwerk.

use thiserror::Error;

use crate::types::ErrorClass;

/// Top-level error type for all Scanwerk operations.
///
/// Every variant carries a stable wire code (see [`ScanError::code`]) so that
/// hosts can branch on the failure kind without parsing messages.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Validation errors (caller mistakes, never reach the coordinator) --
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("at least one of returnImages or returnDocument must be true")]
    NoOutputFormatsRequested,

    #[error("maxPages must be a positive integer, got {0}")]
    InvalidMaxPages(i64),

    #[error("imageQuality must be between 0 and 1, got {0}")]
    InvalidImageQuality(f64),

    // -- Session errors --
    #[error("no host is attached to the scanner")]
    HostDetached,

    #[error("this device does not support the document scanner")]
    ScannerUnsupported(Option<String>),

    #[error("another scan is already in progress")]
    ScanAlreadyInProgress,

    #[error("document scanning failed: {0}")]
    ScanFailed(String),

    #[error("scan session interrupted: {0}")]
    SessionInterrupted(String),

    // -- Assembly errors --
    #[error("no pages were captured")]
    NoPagesCaptured,

    #[error("failed to encode page {index}: {reason}")]
    ImageEncodingFailed { index: usize, reason: String },

    #[error("failed to encode document: {0}")]
    DocumentEncodingFailed(String),

    // -- Host-side persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScanError {
    /// Stable error code reported to the host over the method channel.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NoOutputFormatsRequested => "NO_OUTPUT_FORMATS",
            Self::InvalidMaxPages(_) => "INVALID_MAX_PAGES",
            Self::InvalidImageQuality(_) => "INVALID_IMAGE_QUALITY",
            Self::HostDetached => "NO_ACTIVITY",
            Self::ScannerUnsupported(_) => "DOCUMENT_SCANNER_UNSUPPORTED",
            Self::ScanAlreadyInProgress => "SCAN_IN_PROGRESS",
            Self::ScanFailed(_) => "SCAN_FAILED",
            Self::SessionInterrupted(_) => "SESSION_INTERRUPTED",
            Self::NoPagesCaptured => "NO_PAGES",
            Self::ImageEncodingFailed { .. } => "IMAGE_ENCODING_FAILED",
            Self::DocumentEncodingFailed(_) => "DOCUMENT_ENCODING_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Low-level detail for the `details` slot of a channel error, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::ScannerUnsupported(detail) => detail.clone(),
            Self::ScanFailed(reason)
            | Self::SessionInterrupted(reason)
            | Self::DocumentEncodingFailed(reason)
            | Self::ImageEncodingFailed { reason, .. } => Some(reason.clone()),
            Self::Io(err) => Some(err.kind().to_string()),
            _ => None,
        }
    }

    /// Classify the error for retry decisions.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidArgument(_)
            | Self::NoOutputFormatsRequested
            | Self::InvalidMaxPages(_)
            | Self::InvalidImageQuality(_) => ErrorClass::CallerError,

            Self::HostDetached
            | Self::ScanAlreadyInProgress
            | Self::ScanFailed(_)
            | Self::SessionInterrupted(_) => ErrorClass::Transient,

            Self::ScannerUnsupported(_)
            | Self::NoPagesCaptured
            | Self::ImageEncodingFailed { .. }
            | Self::DocumentEncodingFailed(_)
            | Self::Serialization(_) => ErrorClass::Permanent,

            Self::Io(err) => match err.kind() {
                std::io::ErrorKind::Interrupted | std::io::ErrorKind::TimedOut => {
                    ErrorClass::Transient
                }
                _ => ErrorClass::Permanent,
            },
        }
    }

    /// Whether calling `start` again with the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }

    /// Whether this error was produced by request validation.
    pub fn is_validation(&self) -> bool {
        self.class() == ErrorClass::CallerError
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
