//! PDF text extraction via the poppler `pdftotext` binary.


use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

/// One page of extracted text with its source metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPage {
    pub source: String,
    /// 1-based page number
    pub page_number: usize,
    pub text: String,
}

/// Extract the pages of a PDF file.
///
/// Requires `pdftotext` (poppler-utils) on the PATH. Pages with no visible
/// text are dropped.
#[inline]
pub fn extract_pages(path: &Path) -> Result<Vec<DocumentPage>> {
    let source = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document.pdf")
        .to_string();

    info!("Extracting text from {} with pdftotext", path.display());

    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg("-enc")
        .arg("UTF-8")
        .arg(path)
        .arg("-")
        .output()
        .map_err(|e| anyhow!("pdftotext command failed: {e} (is poppler installed?)"))?;

    if !output.status.success() {
        let error_msg = String::from_utf8_lossy(&output.stderr);
        warn!("pdftotext failed: {}", error_msg);
        return Err(anyhow!("pdftotext failed: {error_msg}"));
    }

    let text = String::from_utf8(output.stdout).context("pdftotext output was not UTF-8")?;
    if text.trim().is_empty() {
        return Err(anyhow!(
            "No text could be extracted from {}",
            path.display()
        ));
    }

    let pages = pages_from_text(&source, &text);
    debug!("Extracted {} non-empty pages from {}", pages.len(), source);
    Ok(pages)
}

/// Split raw `pdftotext` output into pages on the form-feed separator.
#[inline]
pub fn pages_from_text(source: &str, text: &str) -> Vec<DocumentPage> {
    text.split('\u{c}')
        .enumerate()
        .filter_map(|(page_idx, page_text)| {
            let trimmed = page_text.trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(DocumentPage {
                source: source.to_string(),
                page_number: page_idx + 1,
                text: trimmed.to_string(),
            })
        })
        .collect()
}
