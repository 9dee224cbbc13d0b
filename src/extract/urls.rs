//! File and page URL extraction from a matched page
//!
//! File candidates are read from `href`, `src`, and `data-src` attributes
//! (an element may contribute several); page links read `href` only.
//! Candidates are resolved to absolute URLs against the current page, with
//! embedded `data:` URIs and unparseable values dropped.

use super::{Extractor, PageDocument};
use crate::Result;
use url::Url;

/// Attributes a file-selector match may carry a URL in, probed in order
const FILE_URL_ATTRS: [&str; 3] = ["href", "src", "data-src"];

/// Extracts the file URLs one extractor finds on a page
///
/// Selector-derived URLs come first (each passed through the extractor's
/// `file_url_modifier` hook, which may expand or drop them), then URLs from
/// the `additional_file_urls` hook are appended.
pub fn extract_file_urls(
    extractor: &Extractor,
    page_url: &Url,
    doc: &PageDocument,
) -> Result<Vec<Url>> {
    let mut urls = Vec::new();

    if let Some(css) = &extractor.file_selector {
        for element in doc.select(css)? {
            for attr in FILE_URL_ATTRS {
                if let Some(raw) = element.value().attr(attr) {
                    if let Some(resolved) = resolve_candidate(raw, page_url) {
                        urls.extend(extractor.hooks().file_url_modifier(resolved, page_url));
                    }
                }
            }
        }
    }

    for raw in extractor.hooks().additional_file_urls(page_url, doc) {
        if let Some(resolved) = resolve_candidate(&raw, page_url) {
            urls.push(resolved);
        }
    }

    Ok(urls)
}

/// Extracts the follow-up page URLs one extractor finds on a page
///
/// Page links have no modifier hook; `additional_page_urls` results are
/// appended after the selector-derived links.
pub fn extract_page_urls(
    extractor: &Extractor,
    page_url: &Url,
    doc: &PageDocument,
) -> Result<Vec<Url>> {
    let mut urls = Vec::new();

    if let Some(css) = &extractor.page_selector {
        for element in doc.select(css)? {
            if let Some(raw) = element.value().attr("href") {
                if let Some(resolved) = resolve_candidate(raw, page_url) {
                    urls.push(resolved);
                }
            }
        }
    }

    for raw in extractor.hooks().additional_page_urls(page_url, doc) {
        if let Some(resolved) = resolve_candidate(&raw, page_url) {
            urls.push(resolved);
        }
    }

    Ok(urls)
}

/// Resolves a raw attribute value to an absolute URL
///
/// Returns None for empty values, embedded `data:` URIs, and values the
/// base URL cannot resolve.
fn resolve_candidate(raw: &str, page_url: &Url) -> Option<Url> {
    let raw = raw.trim();

    if raw.is_empty() || raw.starts_with("data:") {
        return None;
    }

    match page_url.join(raw) {
        Ok(resolved) => Some(resolved),
        Err(e) => {
            tracing::debug!("Dropping unresolvable URL '{}' on {}: {}", raw, page_url, e);
            None
        }
    }
}
