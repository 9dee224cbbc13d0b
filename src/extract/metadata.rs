//! Metadata extraction from a matched page
//!
//! Applies one extractor's metadata selector map to a parsed document and
//! produces a fresh [`MetaMap`]. A plain string selector collects element
//! text: exactly one match collapses to a bare string, zero or several
//! matches become an ordered list. An `{entry, key, value}` selector builds
//! an insertion-ordered key/value table from repeated entry elements.

use super::{element_text, parse_selector, Extractor, PageDocument};
use crate::config::MetaSelector;
use crate::metadata::{MetaMap, MetaValue};
use crate::Result;
use url::Url;

/// Extracts one extractor's metadata fields from a page
///
/// The inherited metadata is never touched; the caller merges the returned
/// mapping over it (extracted fields win).
pub fn extract_metadata(
    extractor: &Extractor,
    page_url: &Url,
    doc: &PageDocument,
) -> Result<MetaMap> {
    let mut extracted = MetaMap::new();

    for (field, selector) in &extractor.metadata_selectors {
        let raw = match selector {
            MetaSelector::Text(css) => collect_text(doc, css)?,
            MetaSelector::Entries { entry, key, value } => {
                collect_entries(doc, entry, key, value)?
            }
        };
        let value = extractor.hooks().metadata_modifier(field, raw);
        extracted.insert(field.clone(), value);
    }

    // Hook-supplied fields win over selector-derived ones of the same name
    extracted.extend(extractor.hooks().additional_metadata(page_url, doc));

    Ok(extracted)
}

/// String selector: trimmed text per matched element, collapsed to a bare
/// string on exactly one match
fn collect_text(doc: &PageDocument, css: &str) -> Result<MetaValue> {
    let mut texts: Vec<String> = doc
        .select(css)?
        .iter()
        .map(element_text)
        .collect();

    Ok(if texts.len() == 1 {
        MetaValue::Text(texts.remove(0))
    } else {
        MetaValue::List(texts)
    })
}

/// Entry selector: key/value table from repeated entry elements
///
/// An entry whose key and value are both empty after trimming is skipped;
/// a duplicate key overwrites the earlier value in place, keeping the
/// original position.
fn collect_entries(
    doc: &PageDocument,
    entry_css: &str,
    key_css: &str,
    value_css: &str,
) -> Result<MetaValue> {
    let key_selector = parse_selector(key_css)?;
    let value_selector = parse_selector(value_css)?;

    let mut pairs: Vec<(String, String)> = Vec::new();
    for entry in doc.select(entry_css)? {
        let key = entry
            .select(&key_selector)
            .next()
            .map(|e| element_text(&e))
            .unwrap_or_default();
        let value = entry
            .select(&value_selector)
            .next()
            .map(|e| element_text(&e))
            .unwrap_or_default();

        if key.is_empty() && value.is_empty() {
            continue;
        }

        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => pairs.push((key, value)),
        }
    }

    Ok(MetaValue::Table(pairs))
}
