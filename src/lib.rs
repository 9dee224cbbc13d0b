//! Magpie: a configurable page crawler and file harvester
//!
//! This crate implements a scripted crawler that walks a graph of pages from
//! seed URLs, applies user-supplied extractor rules (CSS-selector matchers)
//! to each page, and saves matched files plus scraped metadata into a
//! templated local directory tree.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod metadata;
pub mod options;
pub mod save;

use thiserror::Error;

/// Main error type for magpie operations
#[derive(Debug, Error)]
pub enum MagpieError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Gave up on {url} after {attempts} attempts: {message}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        message: String,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Unresolved template placeholder '{{{{{placeholder}}}}}' in '{template}'")]
    Template {
        template: String,
        placeholder: String,
    },

    #[error("Could not derive a file name from {url}")]
    EmptyFileName { url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector in config: {0}")]
    InvalidSelector(String),

    #[error("Invalid URL pattern in config: {0}")]
    InvalidPattern(String),
}

/// Result type alias for magpie operations
pub type Result<T> = std::result::Result<T, MagpieError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlSummary, Engine, PageWorkItem};
pub use extract::{Extractor, ExtractorHooks, PageDocument};
pub use metadata::{MetaMap, MetaValue, URL_KEY};
pub use options::{OptionOverrides, OptionView, Options};
