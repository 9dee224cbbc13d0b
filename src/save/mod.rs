//! Saving downloaded files and metadata sidecars
//!
//! Each extractor match on a page resolves a save directory from templated
//! options, writes the page's merged metadata there as `info.json`
//! (rewritten on every match, last write wins), and downloads the matched
//! file URLs into the same directory. Individual file failures are logged
//! and skipped; they never abort the rest of the batch.

mod path;

pub use path::{file_name_for, render_template, resolve_save_dir, sanitize_component};

use crate::crawler::fetcher::PageFetcher;
use crate::metadata::MetaMap;
use crate::options::OptionView;
use crate::Result;
use std::path::Path;
use url::Url;

/// Name of the metadata sidecar written beside saved files
pub const INFO_FILE: &str = "info.json";

/// Counters for one save batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    pub saved: u64,
    pub skipped_existing: u64,
    pub skipped_small: u64,
    pub skipped_dryrun: u64,
    pub failed: u64,
}

/// Saves one extractor match's file batch plus the metadata sidecar
///
/// The directory is created (and `info.json` written) even when the batch
/// is empty. In dry-run mode nothing is written at all. Errors resolving
/// or creating the directory fail the whole batch; per-file errors are
/// caught, logged, and counted.
pub async fn save_files(
    fetcher: &PageFetcher,
    view: &OptionView<'_>,
    metadata: &MetaMap,
    file_urls: &[Url],
    dryrun: bool,
) -> Result<SaveOutcome> {
    let dir = resolve_save_dir(view, metadata)?;

    if dryrun {
        tracing::debug!("[dry-run] Would create {}", dir.display());
    } else {
        std::fs::create_dir_all(&dir)?;
        write_sidecar(&dir, metadata)?;
    }

    let mut outcome = SaveOutcome::default();
    for url in file_urls {
        if let Err(e) = save_file(fetcher, view, &dir, url, dryrun, &mut outcome).await {
            tracing::warn!("Failed to save {}: {}", url, e);
            outcome.failed += 1;
        }
    }

    Ok(outcome)
}

/// Downloads and writes a single file, honoring overwrite/min-size/dry-run
async fn save_file(
    fetcher: &PageFetcher,
    view: &OptionView<'_>,
    dir: &Path,
    url: &Url,
    dryrun: bool,
    outcome: &mut SaveOutcome,
) -> Result<()> {
    let name = file_name_for(url, view.name_level())?;
    let target = dir.join(&name);

    if target.exists() && !view.overwrite() {
        tracing::info!("Skipping {}: {} already exists", url, target.display());
        outcome.skipped_existing += 1;
        return Ok(());
    }

    if dryrun {
        tracing::info!("[dry-run] Would download {} to {}", url, target.display());
        outcome.skipped_dryrun += 1;
        return Ok(());
    }

    let bytes = fetcher.fetch_bytes(url).await?;
    if (bytes.len() as u64) < view.min_size() {
        tracing::info!(
            "Discarding {}: {} bytes is below min-size {}",
            url,
            bytes.len(),
            view.min_size()
        );
        outcome.skipped_small += 1;
        return Ok(());
    }

    std::fs::write(&target, &bytes)?;
    tracing::info!("Saved {} ({} bytes)", target.display(), bytes.len());
    outcome.saved += 1;
    Ok(())
}

fn write_sidecar(dir: &Path, metadata: &MetaMap) -> Result<()> {
    let json = serde_json::to_vec_pretty(metadata)?;
    std::fs::write(dir.join(INFO_FILE), json)?;
    Ok(())
}
