use crate::config::types::{Config, ExtractorConfig, MetaSelector};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
///
/// Everything checkable without fetching a page is checked here, so bad
/// selectors and patterns fail at startup instead of mid-crawl.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_pages(&config.pages)?;
    validate_save_root(config)?;
    for extractor in &config.extractors {
        validate_extractor(extractor)?;
    }
    Ok(())
}

/// Validates seed page URLs
fn validate_pages(pages: &[String]) -> Result<(), ConfigError> {
    if pages.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed page is required".to_string(),
        ));
    }

    for page in pages {
        let url = Url::parse(page)
            .map_err(|e| ConfigError::InvalidUrl(format!("seed '{}': {}", page, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "seed '{}' must use the http or https scheme",
                page
            )));
        }
    }

    Ok(())
}

/// Validates the effective save root is not empty
fn validate_save_root(config: &Config) -> Result<(), ConfigError> {
    if let Some(root) = &config.options.save_dir.root {
        if root.is_empty() {
            return Err(ConfigError::Validation(
                "options.save-dir.root cannot be empty".to_string(),
            ));
        }
    }
    Ok(())
}

/// Validates one extractor's selectors and URL pattern
fn validate_extractor(extractor: &ExtractorConfig) -> Result<(), ConfigError> {
    if let Some(pattern) = &extractor.url_pattern {
        Regex::new(pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!(
                "extractor '{}': {}",
                extractor.description, e
            ))
        })?;
    }

    if let Some(css) = &extractor.page_selector {
        validate_selector(css)?;
    }
    if let Some(css) = &extractor.file_selector {
        validate_selector(css)?;
    }

    for selector in extractor.metadata.values() {
        match selector {
            MetaSelector::Text(css) => validate_selector(css)?,
            MetaSelector::Entries { entry, key, value } => {
                validate_selector(entry)?;
                validate_selector(key)?;
                validate_selector(value)?;
            }
        }
    }

    if let Some(root) = &extractor.options.save_dir.root {
        if root.is_empty() {
            return Err(ConfigError::Validation(format!(
                "extractor '{}': save-dir.root override cannot be empty",
                extractor.description
            )));
        }
    }

    Ok(())
}

/// Validates a CSS selector string parses
fn validate_selector(css: &str) -> Result<(), ConfigError> {
    Selector::parse(css)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", css, e)))?;
    Ok(())
}
