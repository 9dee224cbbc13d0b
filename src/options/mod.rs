//! Crawl options and per-extractor overrides
//!
//! Options resolve through three levels: built-in defaults, the user's
//! global `[options]` table merged over them at load time, and the
//! currently matching extractor's `[extractor.options]` table consulted
//! per lookup. The merge rule is structural: scalar fields are taken from
//! the override when present, array fields are replaced wholesale (never
//! concatenated).
//!
//! Extractor scoping is resolved by explicit parameter passing: the engine
//! builds an [`OptionView`] for the extractor it is currently applying
//! rather than mutating shared state, so lookups stay reentrant.

use serde::Deserialize;

/// Fully resolved options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub save_dir: SaveDirOptions,
    pub file: FileOptions,
}

/// Where files and metadata sidecars are saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDirOptions {
    /// Root directory for all saved output
    pub root: String,

    /// Subdirectory components below the root; each may contain `{{key}}`
    /// metadata placeholders
    pub sub_dirs: Vec<String>,
}

/// Per-file saving behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOptions {
    /// How many trailing URL path segments make up the file name (0 = all)
    pub name_level: usize,

    /// Whether an existing file at the target path is overwritten
    pub overwrite: bool,

    /// Files smaller than this many bytes are discarded without error
    pub min_size: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            save_dir: SaveDirOptions {
                root: "./download".to_string(),
                sub_dirs: Vec::new(),
            },
            file: FileOptions {
                name_level: 1,
                overwrite: false,
                min_size: 0,
            },
        }
    }
}

impl Options {
    /// Builds the global options by merging a partial override over the
    /// built-in defaults.
    pub fn merged(overrides: &OptionOverrides) -> Self {
        let mut options = Options::default();
        if let Some(root) = &overrides.save_dir.root {
            options.save_dir.root = root.clone();
        }
        if let Some(sub_dirs) = &overrides.save_dir.sub_dirs {
            options.save_dir.sub_dirs = sub_dirs.clone();
        }
        if let Some(name_level) = overrides.file.name_level {
            options.file.name_level = name_level;
        }
        if let Some(overwrite) = overrides.file.overwrite {
            options.file.overwrite = overwrite;
        }
        if let Some(min_size) = overrides.file.min_size {
            options.file.min_size = min_size;
        }
        options
    }
}

/// A partial options table; every leaf is optional
///
/// Used both for the user's global `[options]` table and for per-extractor
/// `[extractor.options]` overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionOverrides {
    #[serde(rename = "save-dir", default)]
    pub save_dir: SaveDirOverrides,

    #[serde(default)]
    pub file: FileOverrides,
}

/// Partial save-directory options
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaveDirOverrides {
    pub root: Option<String>,

    #[serde(rename = "sub-dirs")]
    pub sub_dirs: Option<Vec<String>>,
}

/// Partial file options
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileOverrides {
    #[serde(rename = "name-level")]
    pub name_level: Option<usize>,

    pub overwrite: Option<bool>,

    #[serde(rename = "min-size")]
    pub min_size: Option<u64>,
}

/// Resolves option lookups against the currently matching extractor
///
/// Each leaf falls back independently: a value set in the scoped overrides
/// shadows the global one, everything else reads through.
#[derive(Debug, Clone, Copy)]
pub struct OptionView<'a> {
    global: &'a Options,
    scoped: Option<&'a OptionOverrides>,
}

impl<'a> OptionView<'a> {
    /// View scoped to one extractor's overrides
    pub fn new(global: &'a Options, scoped: &'a OptionOverrides) -> Self {
        Self {
            global,
            scoped: Some(scoped),
        }
    }

    /// View with no extractor in scope (global values only)
    pub fn unscoped(global: &'a Options) -> Self {
        Self {
            global,
            scoped: None,
        }
    }

    pub fn root(&self) -> &str {
        self.scoped
            .and_then(|s| s.save_dir.root.as_deref())
            .unwrap_or(&self.global.save_dir.root)
    }

    pub fn sub_dirs(&self) -> &[String] {
        self.scoped
            .and_then(|s| s.save_dir.sub_dirs.as_deref())
            .unwrap_or(&self.global.save_dir.sub_dirs)
    }

    pub fn name_level(&self) -> usize {
        self.scoped
            .and_then(|s| s.file.name_level)
            .unwrap_or(self.global.file.name_level)
    }

    pub fn overwrite(&self) -> bool {
        self.scoped
            .and_then(|s| s.file.overwrite)
            .unwrap_or(self.global.file.overwrite)
    }

    pub fn min_size(&self) -> u64 {
        self.scoped
            .and_then(|s| s.file.min_size)
            .unwrap_or(self.global.file.min_size)
    }
}
