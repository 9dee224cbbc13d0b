use crate::options::OptionOverrides;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for magpie
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Seed page URLs, queued in order at startup
    #[serde(default)]
    pub pages: Vec<String>,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    /// Global option overrides, merged over the built-in defaults
    #[serde(default)]
    pub options: OptionOverrides,

    /// Extractor rules, applied to each page in declaration order
    #[serde(default, rename = "extractor")]
    pub extractors: Vec<ExtractorConfig>,
}

/// Declarative configuration of one extractor
///
/// Every field is optional: an unset URL pattern matches every page, unset
/// selectors yield empty URL lists, an empty metadata table extracts
/// nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractorConfig {
    /// Label used in logs
    #[serde(default)]
    pub description: String,

    /// Regex matched against the full page URL
    #[serde(rename = "url-pattern")]
    pub url_pattern: Option<String>,

    /// CSS selector for follow-up page links
    #[serde(rename = "page-selector")]
    pub page_selector: Option<String>,

    /// CSS selector for downloadable files
    #[serde(rename = "file-selector")]
    pub file_selector: Option<String>,

    /// Metadata field name to selector
    #[serde(default)]
    pub metadata: BTreeMap<String, MetaSelector>,

    /// Options shadowing the globals while this extractor runs
    #[serde(default)]
    pub options: OptionOverrides,
}

/// A metadata selector, in one of two shapes
///
/// A bare string is a plain CSS selector whose matched elements' text
/// becomes the value. The `{entry, key, value}` form builds a key/value
/// table from repeated entry elements.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MetaSelector {
    Text(String),
    Entries {
        entry: String,
        key: String,
        value: String,
    },
}
