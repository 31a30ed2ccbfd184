// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people holding the phone.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how a host presents the message.

use crate::error::ScanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something interrupted the scan — just try again.
    Transient,
    /// The app (not the user) asked for something impossible.
    Developer,
    /// Cannot be fixed by retrying on this device.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether starting a new scan may help.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `ScanError` into a `HumanError` suitable for end users.
pub fn humanize_error(err: &ScanError) -> HumanError {
    let retriable = err.is_retryable();
    match err {
        // -- Validation (developer) errors --
        ScanError::InvalidArgument(_)
        | ScanError::NoOutputFormatsRequested
        | ScanError::InvalidMaxPages(_)
        | ScanError::InvalidImageQuality(_) => HumanError {
            message: "The scanner was started with invalid settings.".into(),
            suggestion: format!("This is a problem in the app, not your document. ({err})"),
            retriable,
            severity: Severity::Developer,
        },

        // -- Session errors --
        ScanError::HostDetached => HumanError {
            message: "The scanner isn't ready yet.".into(),
            suggestion: "Return to the app window and try scanning again.".into(),
            retriable,
            severity: Severity::Transient,
        },

        ScanError::ScannerUnsupported(_) => HumanError {
            message: "This device can't scan documents.".into(),
            suggestion: "Document scanning needs a camera and an up-to-date system scanner. Try importing a photo instead.".into(),
            retriable,
            severity: Severity::Permanent,
        },

        ScanError::ScanAlreadyInProgress => HumanError {
            message: "A scan is already open.".into(),
            suggestion: "Finish or close the scan that's already running, then try again.".into(),
            retriable,
            severity: Severity::Transient,
        },

        ScanError::ScanFailed(_) => HumanError {
            message: "The scanner couldn't start.".into(),
            suggestion: "Close other camera apps and try again.".into(),
            retriable,
            severity: Severity::Transient,
        },

        ScanError::SessionInterrupted(_) => HumanError {
            message: "The scan was interrupted.".into(),
            suggestion: "The screen was closed while scanning. Please scan the pages again.".into(),
            retriable,
            severity: Severity::Transient,
        },

        // -- Assembly errors --
        ScanError::NoPagesCaptured => HumanError {
            message: "No pages were scanned.".into(),
            suggestion: "Hold the camera over the page until it is detected, then capture it.".into(),
            retriable,
            severity: Severity::Permanent,
        },

        ScanError::ImageEncodingFailed { index, .. } => HumanError {
            message: format!("Page {} couldn't be saved.", index + 1),
            suggestion: "The device may be low on memory. Close other apps and scan again.".into(),
            retriable,
            severity: Severity::Permanent,
        },

        ScanError::DocumentEncodingFailed(_) => HumanError {
            message: "The PDF couldn't be created.".into(),
            suggestion: "Try scanning fewer pages at once, or ask for images instead of a PDF.".into(),
            retriable,
            severity: Severity::Permanent,
        },

        // -- Host-side persistence --
        ScanError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "A file or folder is missing.".into(),
                suggestion: format!("Check the path and try again. ({io_err})"),
                retriable,
                severity: Severity::Permanent,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "Permission denied.".into(),
                suggestion: "Choose a folder you're allowed to write to.".into(),
                retriable,
                severity: Severity::Permanent,
            },
            _ => HumanError {
                message: "Saving the scan failed.".into(),
                suggestion: format!("Check free space and try again. ({io_err})"),
                retriable,
                severity: Severity::Permanent,
            },
        },

        ScanError::Serialization(_) => HumanError {
            message: "The scanner settings file is damaged.".into(),
            suggestion: "Delete the settings file to restore the defaults.".into(),
            retriable,
            severity: Severity::Permanent,
        },
    }
}
