// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request validation — turns the untyped argument map sent by the host into a
// `ScanRequest`.
//
// Contract:
//   * Type errors fail first with `InvalidArgument` naming the field.
//   * Then, in order: no output format -> `NoOutputFormatsRequested`,
//     maxPages <= 0 -> `InvalidMaxPages`, quality outside [0, 1] ->
//     `InvalidImageQuality`.
//   * Scanner mode is lenient: an unknown or malformed value falls back to
//     the default mode and never fails validation.
//   * `null` counts as absent and unknown keys are ignored.

use std::num::NonZeroU32;

use serde_json::{Map, Value};
use tracing::{instrument, warn};

use crate::config::RequestDefaults;
use crate::error::{Result, ScanError};
use crate::types::{ScanRequest, ScannerMode};

/// Argument keys. Legacy names follow the primary one and lose to it.
const ALLOW_GALLERY_IMPORT: &[&str] = &["allowGalleryImport"];
const MAX_PAGES: &[&str] = &["maxPages"];
const RETURN_IMAGES: &[&str] = &["returnImages", "returnJpegs"];
const RETURN_DOCUMENT: &[&str] = &["returnDocument", "returnPdf"];
const IMAGE_QUALITY: &[&str] = &["imageQuality", "jpegQuality"];
const ENFORCE_MAX_PAGE_LIMIT: &[&str] = &["enforceMaxPageLimit"];
const SCANNER_MODE: &str = "scannerMode";
const ANDROID_SECTION: &str = "android";

/// Validate a raw argument map using the built-in defaults.
pub fn validate(raw: &Map<String, Value>) -> Result<ScanRequest> {
    validate_with(raw, &RequestDefaults::default())
}

/// Validate a raw argument map, filling omitted options from `defaults`.
#[instrument(skip_all, fields(keys = raw.len()))]
pub fn validate_with(raw: &Map<String, Value>, defaults: &RequestDefaults) -> Result<ScanRequest> {
    let allow_gallery_import = bool_arg(raw, ALLOW_GALLERY_IMPORT, defaults.allow_gallery_import)?;
    let return_images = bool_arg(raw, RETURN_IMAGES, defaults.return_images)?;
    let return_document = bool_arg(raw, RETURN_DOCUMENT, defaults.return_document)?;
    let enforce_max_page_limit =
        bool_arg(raw, ENFORCE_MAX_PAGE_LIMIT, defaults.enforce_max_page_limit)?;
    let max_pages = integer_arg(raw, MAX_PAGES)?;
    let image_quality = number_arg(raw, IMAGE_QUALITY)?.unwrap_or(defaults.image_quality);

    if !return_images && !return_document {
        return Err(ScanError::NoOutputFormatsRequested);
    }

    let max_pages = match max_pages {
        None => None,
        Some(value) if value <= 0 => return Err(ScanError::InvalidMaxPages(value)),
        Some(value) => {
            let value = u32::try_from(value).map_err(|_| {
                ScanError::InvalidArgument(format!("maxPages {value} is too large"))
            })?;
            NonZeroU32::new(value)
        }
    };

    if !image_quality.is_finite() || !(0.0..=1.0).contains(&image_quality) {
        return Err(ScanError::InvalidImageQuality(image_quality));
    }

    let scanner_mode = scanner_mode_arg(raw, defaults.scanner_mode);

    Ok(ScanRequest {
        allow_gallery_import,
        max_pages,
        return_images,
        return_document,
        image_quality,
        scanner_mode,
        enforce_max_page_limit,
    })
}

/// First non-null value among `keys`, with the key it was found under.
fn lookup<'a>(raw: &'a Map<String, Value>, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|key| raw.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)))
}

fn bool_arg(raw: &Map<String, Value>, keys: &[&'static str], default: bool) -> Result<bool> {
    match lookup(raw, keys) {
        None => Ok(default),
        Some((_, Value::Bool(b))) => Ok(*b),
        Some((key, other)) => Err(ScanError::InvalidArgument(format!(
            "{key} must be a boolean, got {other}"
        ))),
    }
}

fn number_arg(raw: &Map<String, Value>, keys: &[&'static str]) -> Result<Option<f64>> {
    match lookup(raw, keys) {
        None => Ok(None),
        Some((key, Value::Number(n))) => n.as_f64().map(Some).ok_or_else(|| {
            ScanError::InvalidArgument(format!("{key} is not representable as a number"))
        }),
        Some((key, other)) => Err(ScanError::InvalidArgument(format!(
            "{key} must be numeric, got {other}"
        ))),
    }
}

fn integer_arg(raw: &Map<String, Value>, keys: &[&'static str]) -> Result<Option<i64>> {
    let Some((key, value)) = lookup(raw, keys) else {
        return Ok(None);
    };
    let not_integer = || ScanError::InvalidArgument(format!("{key} must be an integer, got {value}"));
    let Value::Number(n) = value else {
        return Err(not_integer());
    };
    if let Some(i) = n.as_i64() {
        return Ok(Some(i));
    }
    // Integer-valued floats such as `2.0` are accepted; `u64` beyond `i64`
    // and fractional values are not.
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(not_integer()),
    }
}

fn scanner_mode_arg(raw: &Map<String, Value>, default: ScannerMode) -> ScannerMode {
    let value = raw
        .get(SCANNER_MODE)
        .filter(|v| !v.is_null())
        .or_else(|| {
            raw.get(ANDROID_SECTION)
                .and_then(Value::as_object)
                .and_then(|section| section.get(SCANNER_MODE))
                .filter(|v| !v.is_null())
        });

    let Some(value) = value else {
        return default;
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(ScannerMode::from_channel_value),
        Value::String(s) => ScannerMode::from_name(s),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        warn!(value = %value, fallback = ?default, "unrecognised scanner mode");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn empty_map_yields_defaults() {
        let request = validate(&Map::new()).unwrap();
        assert!(request.allow_gallery_import);
        assert_eq!(request.max_pages, None);
        assert!(request.return_images);
        assert!(!request.return_document);
        assert!((request.image_quality - 0.9).abs() < f64::EPSILON);
        assert_eq!(request.scanner_mode, ScannerMode::Full);
        assert!(request.enforce_max_page_limit);
    }

    #[test]
    fn full_request_is_parsed() {
        let request = validate(&args(json!({
            "allowGalleryImport": false,
            "maxPages": 4,
            "returnImages": false,
            "returnDocument": true,
            "imageQuality": 0.5,
            "scannerMode": 3,
            "enforceMaxPageLimit": false,
        })))
        .unwrap();

        assert!(!request.allow_gallery_import);
        assert_eq!(request.max_pages, NonZeroU32::new(4));
        assert!(!request.return_images);
        assert!(request.return_document);
        assert_eq!(request.image_quality, 0.5);
        assert_eq!(request.scanner_mode, ScannerMode::Base);
        assert!(!request.enforce_max_page_limit);
    }

    #[test]
    fn no_output_formats_is_rejected() {
        let err = validate(&args(json!({ "returnImages": false }))).unwrap_err();
        assert!(matches!(err, ScanError::NoOutputFormatsRequested));
    }

    #[test]
    fn output_formats_checked_before_max_pages() {
        let err = validate(&args(json!({
            "returnImages": false,
            "returnDocument": false,
            "maxPages": 0,
            "imageQuality": 7.0,
        })))
        .unwrap_err();
        assert!(matches!(err, ScanError::NoOutputFormatsRequested));
    }

    #[test]
    fn max_pages_checked_before_quality() {
        let err = validate(&args(json!({ "maxPages": -2, "imageQuality": 1.5 }))).unwrap_err();
        assert!(matches!(err, ScanError::InvalidMaxPages(-2)));
    }

    #[test]
    fn zero_max_pages_is_rejected() {
        let err = validate(&args(json!({ "maxPages": 0 }))).unwrap_err();
        assert!(matches!(err, ScanError::InvalidMaxPages(0)));
    }

    #[test]
    fn integer_valued_float_max_pages_is_accepted() {
        let request = validate(&args(json!({ "maxPages": 3.0 }))).unwrap();
        assert_eq!(request.max_pages, NonZeroU32::new(3));
    }

    #[test]
    fn fractional_max_pages_is_invalid_argument() {
        let err = validate(&args(json!({ "maxPages": 2.5 }))).unwrap_err();
        assert!(matches!(err, ScanError::InvalidArgument(_)));
    }

    #[test]
    fn oversized_max_pages_is_invalid_argument() {
        let err = validate(&args(json!({ "maxPages": 5_000_000_000i64 }))).unwrap_err();
        assert!(matches!(err, ScanError::InvalidArgument(_)));
    }

    #[test]
    fn quality_bounds_are_inclusive() {
        assert!(validate(&args(json!({ "imageQuality": 0.0 }))).is_ok());
        assert!(validate(&args(json!({ "imageQuality": 1 }))).is_ok());
        let err = validate(&args(json!({ "imageQuality": 1.01 }))).unwrap_err();
        assert!(matches!(err, ScanError::InvalidImageQuality(_)));
        let err = validate(&args(json!({ "imageQuality": -0.1 }))).unwrap_err();
        assert!(matches!(err, ScanError::InvalidImageQuality(_)));
    }

    #[test]
    fn non_numeric_quality_is_invalid_argument() {
        let err = validate(&args(json!({ "imageQuality": "high" }))).unwrap_err();
        match err {
            ScanError::InvalidArgument(msg) => assert!(msg.contains("imageQuality")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_boolean_flag_is_invalid_argument() {
        let err = validate(&args(json!({ "returnDocument": "yes" }))).unwrap_err();
        assert!(matches!(err, ScanError::InvalidArgument(_)));
    }

    #[test]
    fn null_values_count_as_absent() {
        let request = validate(&args(json!({
            "maxPages": null,
            "imageQuality": null,
            "returnImages": null,
        })))
        .unwrap();
        assert_eq!(request, validate(&Map::new()).unwrap());
    }

    #[test]
    fn legacy_names_are_accepted() {
        let request = validate(&args(json!({
            "returnJpegs": false,
            "returnPdf": true,
            "jpegQuality": 0.25,
        })))
        .unwrap();
        assert!(!request.return_images);
        assert!(request.return_document);
        assert_eq!(request.image_quality, 0.25);
    }

    #[test]
    fn primary_name_wins_over_legacy() {
        let request = validate(&args(json!({
            "returnImages": true,
            "returnJpegs": false,
        })))
        .unwrap();
        assert!(request.return_images);
    }

    #[test]
    fn unknown_scanner_mode_falls_back_to_full() {
        for raw in [json!(9), json!("turbo"), json!(true), json!([1])] {
            let request = validate(&args(json!({ "scannerMode": raw }))).unwrap();
            assert_eq!(request.scanner_mode, ScannerMode::Full);
        }
    }

    #[test]
    fn scanner_mode_by_name_and_nested_section() {
        let request = validate(&args(json!({ "scannerMode": "base_with_filter" }))).unwrap();
        assert_eq!(request.scanner_mode, ScannerMode::BaseWithFilter);

        let request = validate(&args(json!({ "android": { "scannerMode": 2 } }))).unwrap();
        assert_eq!(request.scanner_mode, ScannerMode::BaseWithFilter);

        let request = validate(&args(json!({
            "scannerMode": 3,
            "android": { "scannerMode": 2 },
        })))
        .unwrap();
        assert_eq!(request.scanner_mode, ScannerMode::Base);
    }

    #[test]
    fn configured_defaults_apply() {
        let defaults = RequestDefaults {
            return_document: true,
            image_quality: 0.4,
            scanner_mode: ScannerMode::Base,
            ..RequestDefaults::default()
        };
        let request = validate_with(&args(json!({ "scannerMode": 42 })), &defaults).unwrap();
        assert!(request.return_document);
        assert_eq!(request.image_quality, 0.4);
        assert_eq!(request.scanner_mode, ScannerMode::Base);
    }

    #[test]
    fn validation_is_deterministic() {
        let raw = args(json!({ "maxPages": 2, "imageQuality": 0.7, "scannerMode": 2 }));
        assert_eq!(validate(&raw).unwrap(), validate(&raw).unwrap());

        let bad = args(json!({ "maxPages": -1 }));
        assert_eq!(
            validate(&bad).unwrap_err().code(),
            validate(&bad).unwrap_err().code()
        );
    }
}
