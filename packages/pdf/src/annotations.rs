//! Hyperlink annotations from the PDF object tree.
//!
//! `pdf-extract` only returns text, so link annotations are read with
//! [`lopdf`] directly. Every `/Link` annotation whose action carries a
//! `/URI` becomes a [`Hyperlink`].

use event_listing_event_models::Hyperlink;
use lopdf::{Dictionary, Document, Object};

use crate::PdfError;

/// Characters of page text taken on each side of a link's position.
const CONTEXT_RADIUS: usize = 100;

/// Reads every URI link annotation from the PDF in `bytes`, in page order.
///
/// # Errors
///
/// Returns [`PdfError::Extraction`] if the document cannot be parsed.
pub fn extract_hyperlinks(bytes: &[u8]) -> Result<Vec<Hyperlink>, PdfError> {
    let doc = Document::load_mem(bytes).map_err(|e| PdfError::Extraction(e.to_string()))?;
    let mut hyperlinks = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        let Ok(page) = doc.get_dictionary(page_id) else {
            log::debug!("extract_hyperlinks: page {page_number} is not a dictionary");
            continue;
        };

        let annotations = page_annotations(&doc, page);
        if annotations.is_empty() {
            continue;
        }

        let page_text = doc.extract_text(&[page_number]).unwrap_or_default();

        for annotation in annotations {
            let Some(url) = link_uri(&doc, annotation) else {
                continue;
            };
            let context = link_y(annotation)
                .map(|y| context_window(&page_text, y))
                .unwrap_or_default();

            hyperlinks.push(Hyperlink::new(url, context, page_number));
        }
    }

    log::debug!("extract_hyperlinks: found {} link(s)", hyperlinks.len());

    Ok(hyperlinks)
}

fn page_annotations<'a>(doc: &'a Document, page: &'a Dictionary) -> Vec<&'a Dictionary> {
    let Ok(annots) = page.get(b"Annots") else {
        return Vec::new();
    };
    let Ok((_, annots)) = doc.dereference(annots) else {
        return Vec::new();
    };
    let Ok(annots) = annots.as_array() else {
        return Vec::new();
    };

    annots
        .iter()
        .filter_map(|annot| doc.dereference(annot).ok())
        .filter_map(|(_, annot)| annot.as_dict().ok())
        .collect()
}

fn link_uri(doc: &Document, annotation: &Dictionary) -> Option<String> {
    let subtype = annotation.get(b"Subtype").and_then(Object::as_name).ok()?;
    if subtype != b"Link" {
        return None;
    }

    let (_, action) = doc.dereference(annotation.get(b"A").ok()?).ok()?;
    let uri = action.as_dict().ok()?.get(b"URI").ok()?;
    let (_, uri) = doc.dereference(uri).ok()?;
    let uri = String::from_utf8_lossy(uri.as_str().ok()?).trim().to_string();

    (!uri.is_empty()).then_some(uri)
}

/// Lower `y` coordinate of the annotation rectangle.
fn link_y(annotation: &Dictionary) -> Option<f32> {
    let rect = annotation.get(b"Rect").and_then(Object::as_array).ok()?;
    rect.get(1)?.as_float().ok()
}

/// Page text within [`CONTEXT_RADIUS`] characters of `y`, used as a
/// character index.
///
/// This is a coarse approximation: PDF coordinates and text offsets are
/// unrelated, but listings with one link per event usually place the
/// event's title close enough for the matcher to find it.
fn context_window(page_text: &str, y: f32) -> String {
    let total = page_text.chars().count();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let center = if y.is_finite() && y > 0.0 {
        y as usize
    } else {
        0
    };

    let start = center.saturating_sub(CONTEXT_RADIUS).min(total);
    let end = center.saturating_add(CONTEXT_RADIUS).min(total);

    page_text.chars().skip(start).take(end - start).collect()
}
