#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! PDF text extraction for event listings.
//!
//! Turns the bytes of a PDF event listing into plain text plus the
//! hyperlinks found in it, then hands both to
//! [`event_listing_extract::EventExtractor`]. The caller picks the
//! [`ExtractionMode`] explicitly:
//!
//! * [`ExtractionMode::Direct`] reads the embedded text layer with
//!   [`pdf_extract`] and the link annotations with [`lopdf`].
//! * [`ExtractionMode::Ocr`] delegates to a caller-supplied [`OcrEngine`].
//!   OCR never yields hyperlinks.
//!
//! A direct text layer that is suspiciously small (a scanned document)
//! is reported as [`PdfError::InsufficientText`] so the caller can retry
//! with OCR.

pub mod annotations;

use event_listing_event_models::{EventRecord, ExtractionMode, Hyperlink};
use event_listing_extract::{ConfigError, EventExtractor, tables::ExtractionTables};

/// Direct extraction yielding fewer trimmed characters than this is treated
/// as a scanned document.
pub const MIN_DIRECT_TEXT_CHARS: usize = 100;

/// Errors specific to PDF extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// The text layer is too small to be the real content.
    #[error("PDF text layer has only {chars} characters; it is probably scanned")]
    InsufficientText {
        /// Number of non-whitespace-trimmed characters extracted.
        chars: usize,
    },

    /// OCR mode was requested without an OCR engine.
    #[error("OCR extraction requested but no OCR engine is configured")]
    OcrUnavailable,

    /// The OCR engine failed.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// The extraction tables could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Optical character recognition over a whole PDF.
///
/// Rendering pages and choosing an engine are left to the implementor.
pub trait OcrEngine: Send + Sync {
    /// Recognizes the text of every page of the PDF in `bytes`, pages
    /// separated by newlines.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Ocr`] if recognition fails.
    fn recognize(&self, bytes: &[u8]) -> Result<String, PdfError>;
}

/// Text and hyperlinks pulled from a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub text: String,
    pub hyperlinks: Vec<Hyperlink>,
}

/// Extracts text (and, in direct mode, hyperlinks) from the PDF in `bytes`.
///
/// # Errors
///
/// * [`PdfError::Extraction`] if the PDF cannot be parsed.
/// * [`PdfError::InsufficientText`] if direct extraction yields fewer than
///   [`MIN_DIRECT_TEXT_CHARS`] characters.
/// * [`PdfError::OcrUnavailable`] if OCR mode is requested with no engine.
/// * [`PdfError::Ocr`] if the OCR engine fails.
pub fn extract_document(
    bytes: &[u8],
    mode: ExtractionMode,
    ocr: Option<&dyn OcrEngine>,
) -> Result<ExtractedDocument, PdfError> {
    match mode {
        ExtractionMode::Direct => extract_direct(bytes),
        ExtractionMode::Ocr => {
            let engine = ocr.ok_or(PdfError::OcrUnavailable)?;
            let text = engine.recognize(bytes)?;
            log::info!("OCR recognized {} characters of text", text.len());

            Ok(ExtractedDocument {
                text,
                hyperlinks: Vec::new(),
            })
        }
    }
}

fn extract_direct(bytes: &[u8]) -> Result<ExtractedDocument, PdfError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::Extraction(e.to_string()))?;

    let chars = text.trim().chars().count();
    if chars < MIN_DIRECT_TEXT_CHARS {
        log::warn!("Direct extraction found only {chars} characters; the PDF might be scanned");
        return Err(PdfError::InsufficientText { chars });
    }
    log::info!("Extracted {} characters of text", text.len());

    let hyperlinks = annotations::extract_hyperlinks(bytes).unwrap_or_else(|e| {
        log::warn!("Failed to read link annotations: {e}");
        Vec::new()
    });

    Ok(ExtractedDocument { text, hyperlinks })
}

/// Extracts the PDF in `bytes` and segments it into events.
///
/// # Errors
///
/// Returns [`PdfError`] if text extraction fails; see
/// [`extract_document`].
pub fn extract_events(
    bytes: &[u8],
    mode: ExtractionMode,
    ocr: Option<&dyn OcrEngine>,
    extractor: &EventExtractor,
) -> Result<Vec<EventRecord>, PdfError> {
    let document = extract_document(bytes, mode, ocr)?;
    let events = extractor.extract(&document.text, &document.hyperlinks);
    log::info!(
        "Extracted {} events from PDF ({} hyperlinks)",
        events.len(),
        document.hyperlinks.len()
    );

    Ok(events)
}

/// Like [`extract_events`], building the extractor from `tables` first.
///
/// # Errors
///
/// Returns [`PdfError::Config`] if the tables cannot be compiled, or any
/// error of [`extract_document`].
pub fn extract_events_with_tables(
    bytes: &[u8],
    mode: ExtractionMode,
    ocr: Option<&dyn OcrEngine>,
    tables: &ExtractionTables,
) -> Result<Vec<EventRecord>, PdfError> {
    let extractor = EventExtractor::new(tables)?;
    extract_events(bytes, mode, ocr, &extractor)
}
