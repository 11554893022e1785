pub mod cache;
pub mod client;
pub mod extract;

pub use cache::*;
pub use client::*;
pub use extract::*;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::ui::{Phase, Ui};

/// Make sure the latest YAML export is extracted in the cache.
///
/// Returns the export directory and its checksum. If the checksum can't be
/// fetched (offline) and something is cached, the newest cached export is
/// used instead.
pub fn ensure_sde_downloaded(
    cache_dir: Option<PathBuf>,
    force: bool,
    ui: &mut impl Ui,
) -> Result<(PathBuf, String)> {
    let cache = CacheManager::new(cache_dir)?;
    let client = SdeClient::new()?;

    ui.set_phase(Phase::Checking);
    ui.set_info(format!("Cache: {:?}", cache.cache_dir()));

    let checksum = match client.fetch_checksum() {
        Ok(checksum) => checksum,
        Err(e) => {
            if let Some((path, checksum)) = cache.latest_cached()? {
                ui.log(format!("{:#}; using cached export {}", e, checksum));
                return Ok((path, checksum));
            }
            return Err(e);
        }
    };
    ui.log(format!("Latest SDE checksum: {}", checksum));

    if !force && cache.is_cached(&checksum) {
        ui.log("Export already cached");
        return Ok((cache.build_dir(&checksum), checksum));
    }

    ui.set_phase(Phase::Downloading);
    let zip_path = cache.zip_path(&checksum);
    client.download_zip(&zip_path, ui)?;
    ui.clear_progress();

    ui.set_phase(Phase::Extracting);
    let build_dir = cache.build_dir(&checksum);
    if build_dir.exists() {
        fs::remove_dir_all(&build_dir)
            .with_context(|| format!("Failed to clear {:?}", build_dir))?;
    }
    extract_sde(&zip_path, &build_dir, ui)?;
    ui.clear_progress();

    fs::remove_file(&zip_path).ok();
    cache.cleanup_old_builds(&checksum)?;

    Ok((build_dir, checksum))
}
