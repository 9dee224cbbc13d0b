//! Extractor rules and the document query handle
//!
//! An [`Extractor`] is a named rule bundle applied to every page it matches:
//! CSS selectors for metadata fields, downloadable files, and follow-up page
//! links, plus a partial options override scoped to the extractor. Dynamic
//! behavior beyond what selectors express is supplied through the
//! [`ExtractorHooks`] capability trait, whose methods all default to
//! identity/no-op.

pub mod metadata;
pub mod urls;

use crate::config::{ExtractorConfig, MetaSelector};
use crate::options::OptionOverrides;
use crate::{ConfigError, MagpieError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use url::Url;

pub use metadata::extract_metadata;
pub use urls::{extract_file_urls, extract_page_urls};

/// A parsed page exposed to selectors and hooks
pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    /// Parses decoded page text into a queryable document
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    /// Returns all elements matching a CSS selector, in document order
    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, MagpieError> {
        let parsed = parse_selector(selector)?;
        Ok(self.html.select(&parsed).collect())
    }

    /// The underlying parsed document, for hook implementations that need
    /// more than selector queries
    pub fn html(&self) -> &Html {
        &self.html
    }
}

/// Parses a CSS selector string, mapping the parse error into [`MagpieError`]
pub(crate) fn parse_selector(selector: &str) -> Result<Selector, MagpieError> {
    Selector::parse(selector).map_err(|e| MagpieError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Collects an element's text content, trimmed
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Dynamic extension points for an extractor
///
/// Every method has an identity/no-op default, so implementations override
/// only the hooks they need. An absent hook is not an error.
pub trait ExtractorHooks: Send + Sync {
    /// Additional match predicate, ANDed with the extractor's URL pattern.
    /// Defaults to matching every page.
    fn is_matched(&self, _url: &Url, _doc: &PageDocument) -> bool {
        true
    }

    /// Rewrites one resolved file URL into zero or more URLs to fetch
    fn file_url_modifier(&self, url: Url, _page_url: &Url) -> Vec<Url> {
        vec![url]
    }

    /// Replaces a raw metadata value after selector extraction; may change
    /// the value's shape
    fn metadata_modifier(&self, _field: &str, value: crate::MetaValue) -> crate::MetaValue {
        value
    }

    /// Extra file URLs beyond what the file selector finds; resolved
    /// against the page URL and appended
    fn additional_file_urls(&self, _url: &Url, _doc: &PageDocument) -> Vec<String> {
        Vec::new()
    }

    /// Extra page URLs beyond what the page selector finds; resolved
    /// against the page URL and appended
    fn additional_page_urls(&self, _url: &Url, _doc: &PageDocument) -> Vec<String> {
        Vec::new()
    }

    /// Extra metadata merged on top of selector-derived fields (hook keys
    /// win on collision)
    fn additional_metadata(&self, _url: &Url, _doc: &PageDocument) -> crate::MetaMap {
        crate::MetaMap::new()
    }
}

/// The default hook set: every method keeps its no-op behavior
struct NoHooks;

impl ExtractorHooks for NoHooks {}

/// A matching-and-extraction rule bundle applied per visited page
pub struct Extractor {
    /// Label used in logs
    pub description: String,

    /// Declarative match predicate over the page URL
    url_pattern: Option<Regex>,

    /// CSS selector for follow-up page links (`href` attributes)
    pub page_selector: Option<String>,

    /// CSS selector for downloadable files (`href`/`src`/`data-src`)
    pub file_selector: Option<String>,

    /// Metadata field name to selector
    pub metadata_selectors: BTreeMap<String, MetaSelector>,

    /// Options shadowing the globals while this extractor is applied
    pub options: OptionOverrides,

    hooks: Box<dyn ExtractorHooks>,
}

impl Extractor {
    /// Builds an extractor from its declarative configuration
    pub fn from_config(config: ExtractorConfig) -> Result<Self, ConfigError> {
        let url_pattern = config
            .url_pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|e| ConfigError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            description: config.description,
            url_pattern,
            page_selector: config.page_selector,
            file_selector: config.file_selector,
            metadata_selectors: config.metadata,
            options: config.options,
            hooks: Box::new(NoHooks),
        })
    }

    /// Installs custom hooks, replacing the no-op defaults
    pub fn with_hooks(mut self, hooks: Box<dyn ExtractorHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Whether this extractor applies to the given page
    ///
    /// True when the URL pattern (if any) matches the page URL and the
    /// `is_matched` hook accepts the page. With neither configured an
    /// extractor matches every page.
    pub fn matches(&self, url: &Url, doc: &PageDocument) -> bool {
        if let Some(pattern) = &self.url_pattern {
            if !pattern.is_match(url.as_str()) {
                return false;
            }
        }
        self.hooks.is_matched(url, doc)
    }

    pub(crate) fn hooks(&self) -> &dyn ExtractorHooks {
        &*self.hooks
    }
}
