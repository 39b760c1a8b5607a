use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{pkg::internal::errors::ExtractionError, prelude::Result};

/// Largest base64 body that can decode to `max_bytes` raw bytes.
pub fn encoded_cap(max_bytes: usize) -> usize {
    max_bytes.div_ceil(3) * 4
}

/// Decodes the transport-encoded document body into raw bytes. The size
/// cap is checked on the encoded length first, so an oversized upload is
/// refused before any decode allocation happens.
pub fn decode_payload(encoded: &str, max_bytes: usize) -> Result<Vec<u8>> {
    let encoded = encoded.trim();
    if encoded.is_empty() {
        return Err(ExtractionError::EmptyPayload.into());
    }
    if encoded.len() > encoded_cap(max_bytes) {
        return Err(ExtractionError::TooLarge.into());
    }
    let data = STANDARD.decode(encoded).map_err(|e| {
        tracing::warn!("base64 decode failed: {}", e);
        ExtractionError::MalformedDocument
    })?;
    if data.is_empty() {
        return Err(ExtractionError::EmptyPayload.into());
    }
    Ok(data)
}

/// Parses a decoded document buffer into plain text. Pure with respect to
/// the buffer; the caller is responsible for whitespace and page-break
/// artifacts in the output.
pub fn extract_document(data: &[u8], extension: &str, max_bytes: usize) -> Result<String> {
    if data.is_empty() {
        return Err(ExtractionError::EmptyPayload.into());
    }
    if data.len() > max_bytes {
        return Err(ExtractionError::TooLarge.into());
    }
    match extension {
        "pdf" => extract_text_from_pdf(data),
        "docx" => extract_text_from_docx(data),
        _ => Err(ExtractionError::MalformedDocument.into()),
    }
}

fn extract_text_from_pdf(data: &[u8]) -> Result<String> {
    use lopdf::Document;
    let cursor = Cursor::new(data);
    let doc = Document::load_from(cursor).map_err(|e| {
        tracing::warn!("failed to load pdf: {}", e);
        ExtractionError::MalformedDocument
    })?;

    let pages = doc.get_pages();
    let mut text = String::new();

    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push(' ');
            }
            Err(e) => {
                tracing::warn!("failed to extract text from page {}: {}", page_num, e);
            }
        }
    }

    if text.trim().is_empty() {
        return Err(ExtractionError::MalformedDocument.into());
    }
    Ok(text.trim().to_string())
}

fn extract_text_from_docx(data: &[u8]) -> Result<String> {
    use docx_rs::read_docx;
    let docx = read_docx(data).map_err(|e| {
        tracing::warn!("failed to load docx: {:?}", e);
        ExtractionError::MalformedDocument
    })?;
    let mut text = String::new();
    for paragraph in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = paragraph {
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    if text.trim().is_empty() {
        return Err(ExtractionError::MalformedDocument.into());
    }
    Ok(text)
}
