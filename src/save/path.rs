//! Save-path templating, sanitization, and file naming
//!
//! Directory components come from templated option strings: `{{key}}`
//! placeholders are substituted with metadata text values, then the result
//! is sanitized for use as a single path component. File names are derived
//! from the trailing path segments of the file's URL.

use crate::metadata::MetaMap;
use crate::options::OptionView;
use crate::{MagpieError, Result};
use std::path::PathBuf;
use url::Url;

/// Characters replaced with `-` in rendered directory components
const SANITIZED_CHARS: [char; 8] = ['/', '%', '*', ':', '|', '"', '<', '>'];

/// Makes a rendered template safe to use as one path component
pub fn sanitize_component(component: &str) -> String {
    component
        .chars()
        .map(|c| if SANITIZED_CHARS.contains(&c) { '-' } else { c })
        .collect()
}

/// Substitutes `{{key}}` placeholders with metadata text values
///
/// Only text values substitute; a placeholder naming a missing field or a
/// list/table value is a configuration error.
pub fn render_template(template: &str, metadata: &MetaMap) -> Result<String> {
    let mut rendered = template.to_string();
    for (key, value) in metadata {
        if let Some(text) = value.as_text() {
            rendered = rendered.replace(&format!("{{{{{}}}}}", key), text);
        }
    }

    if let Some(start) = rendered.find("{{") {
        let rest = &rendered[start + 2..];
        let placeholder = rest.split("}}").next().unwrap_or(rest).to_string();
        return Err(MagpieError::Template {
            template: template.to_string(),
            placeholder,
        });
    }

    Ok(rendered)
}

/// Derives the save directory for a page from its options and metadata
pub fn resolve_save_dir(view: &OptionView<'_>, metadata: &MetaMap) -> Result<PathBuf> {
    let mut dir = PathBuf::from(view.root());
    for template in view.sub_dirs() {
        let rendered = render_template(template, metadata)?;
        dir.push(sanitize_component(&rendered));
    }
    Ok(dir)
}

/// Derives a file name from the trailing segments of a file URL
///
/// The scheme and query/fragment are stripped, the remaining
/// `domain/path` is split on `/`, and the last `name_level` segments are
/// joined with `_`. A level of 0 keeps all segments; a level larger than
/// the available depth keeps what there is.
pub fn file_name_for(url: &Url, name_level: usize) -> Result<String> {
    let s = url.as_str();
    let stripped = s.split_once("://").map_or(s, |(_, rest)| rest);
    let end = stripped
        .find(|c| c == '?' || c == '#')
        .unwrap_or(stripped.len());
    let stripped = &stripped[..end];

    let segments: Vec<&str> = stripped.split('/').filter(|seg| !seg.is_empty()).collect();
    if segments.is_empty() {
        return Err(MagpieError::EmptyFileName {
            url: url.to_string(),
        });
    }

    let keep = if name_level == 0 {
        segments.len()
    } else {
        name_level.min(segments.len())
    };

    Ok(segments[segments.len() - keep..].join("_"))
}
