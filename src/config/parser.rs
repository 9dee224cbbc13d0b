use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use magpie::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Seed pages: {}", config.pages.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so differing crawl outputs can be traced back to the
/// configuration revision that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetaSelector;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r##"
pages = ["https://example.com/start"]
user-agent = "test-agent/1.0"

[options.save-dir]
root = "./out"
sub-dirs = ["{{site}}"]

[options.file]
name-level = 2
overwrite = true
min-size = 100

[[extractor]]
description = "gallery"
url-pattern = "/gallery/"
page-selector = "a.next"
file-selector = "img.photo"

[extractor.metadata]
title = "h1"
specs = { entry = "table tr", key = "th", value = "td" }

[extractor.options.file]
overwrite = false
"##;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.pages, vec!["https://example.com/start".to_string()]);
        assert_eq!(config.user_agent.as_deref(), Some("test-agent/1.0"));
        assert_eq!(config.options.save_dir.root.as_deref(), Some("./out"));
        assert_eq!(config.options.file.name_level, Some(2));
        assert_eq!(config.extractors.len(), 1);

        let extractor = &config.extractors[0];
        assert_eq!(extractor.description, "gallery");
        assert_eq!(extractor.page_selector.as_deref(), Some("a.next"));
        assert!(matches!(
            extractor.metadata.get("title"),
            Some(MetaSelector::Text(s)) if s == "h1"
        ));
        assert!(matches!(
            extractor.metadata.get("specs"),
            Some(MetaSelector::Entries { .. })
        ));
        assert_eq!(extractor.options.file.overwrite, Some(false));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        // Invalid seed URL fails validation, not parsing
        let config_content = r#"
pages = ["not a url"]
"#;
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let config_content = "test content";
        let file = create_temp_config(config_content);

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA-256 produces 64 hex characters
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
