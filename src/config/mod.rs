//! Configuration loading and validation
//!
//! The config file is TOML: seed pages, an optional user agent, a partial
//! global options table, and the ordered extractor rules.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, ExtractorConfig, MetaSelector};
pub use validation::validate;
