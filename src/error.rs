//! Error types for the edgequake-md2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Md2PdfError`] (**fatal**): the report cannot be produced at all
//!   (invalid geometry, an element that can never fit on a page). Returned
//!   as `Err(Md2PdfError)` from [`crate::render()`] and friends, before any
//!   bytes exist.
//!
//! * [`ImageError`] (**non-fatal**): the embedded image could not be read or
//!   decoded. The report is still produced without it and the error is
//!   stored in [`crate::output::ImageOutcome::Skipped`] so callers can see
//!   what happened.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-md2pdf library.
///
/// Image failures use [`ImageError`] and never abort a render.
#[derive(Debug, Error)]
pub enum Md2PdfError {
    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Layout errors ─────────────────────────────────────────────────────
    /// A single row or block is taller than the page content area, so no
    /// number of page breaks can place it.
    #[error(
        "{element} is {height_mm:.1}mm tall but a page only has {available_mm:.1}mm of content height"
    )]
    LayoutOverflow {
        element: String,
        height_mm: f32,
        available_mm: f32,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for the embedded image.
///
/// The report renders without an image section when any of these occur.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ImageError {
    /// No file at the given path.
    #[error("image not found: '{path}'")]
    NotFound { path: PathBuf },

    /// The file exists but could not be opened or read.
    #[error("image '{path}' could not be read: {detail}")]
    Unreadable { path: PathBuf, detail: String },

    /// The bytes are not a decodable PNG/JPEG.
    #[error("image '{path}' could not be decoded: {detail}")]
    Decode { path: PathBuf, detail: String },

    /// Decoded fine but has a zero width or height.
    #[error("image '{path}' has no pixels ({width}x{height})")]
    EmptyImage {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_overflow_display() {
        let e = Md2PdfError::LayoutOverflow {
            element: "body row".into(),
            height_mm: 300.0,
            available_mm: 267.0,
        };
        let msg = e.to_string();
        assert!(msg.contains("body row"), "got: {msg}");
        assert!(msg.contains("300.0mm"), "got: {msg}");
        assert!(msg.contains("267.0mm"), "got: {msg}");
    }

    #[test]
    fn invalid_config_display() {
        let e = Md2PdfError::InvalidConfig("margin too large".into());
        assert_eq!(e.to_string(), "Invalid configuration: margin too large");
    }

    #[test]
    fn image_error_display_mentions_path() {
        let e = ImageError::NotFound {
            path: PathBuf::from("/tmp/missing.png"),
        };
        assert!(e.to_string().contains("/tmp/missing.png"));

        let e = ImageError::EmptyImage {
            path: PathBuf::from("x.png"),
            width: 0,
            height: 12,
        };
        assert!(e.to_string().contains("0x12"));
    }

    #[test]
    fn image_error_serialises() {
        let e = ImageError::Decode {
            path: PathBuf::from("scan.png"),
            detail: "bad header".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("Decode"));
        assert!(json.contains("bad header"));
    }
}
