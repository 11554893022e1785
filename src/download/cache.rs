use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::transform::SdeLayout;

/// Extracted exports, one directory per published checksum
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(custom_dir: Option<PathBuf>) -> Result<Self> {
        let cache_dir = match custom_dir {
            Some(dir) => dir,
            None => {
                let proj_dirs = ProjectDirs::from("", "", "eve-universe-to-sqlite")
                    .context("Could not determine cache directory")?;
                proj_dirs.cache_dir().to_path_buf()
            }
        };

        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Directory an export with this checksum is extracted into
    pub fn build_dir(&self, checksum: &str) -> PathBuf {
        self.cache_dir.join(checksum)
    }

    /// Check if an export is already extracted
    pub fn is_cached(&self, checksum: &str) -> bool {
        SdeLayout::new(self.build_dir(checksum)).universe_dir().is_dir()
    }

    pub fn zip_path(&self, checksum: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.zip", checksum))
    }

    /// Most recently extracted export, used when the checksum can't be fetched
    pub fn latest_cached(&self) -> Result<Option<(PathBuf, String)>> {
        let mut latest: Option<(SystemTime, PathBuf, String)> = None;

        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            if !path.is_dir() || !self.is_cached(&name) {
                continue;
            }

            let modified = fs::metadata(&path)?.modified()?;
            if latest.as_ref().map_or(true, |(t, _, _)| modified > *t) {
                latest = Some((modified, path, name));
            }
        }

        Ok(latest.map(|(_, path, name)| (path, name)))
    }

    /// Remove every cached export and zip except the given one
    pub fn cleanup_old_builds(&self, keep: &str) -> Result<()> {
        let keep_zip = format!("{}.zip", keep);

        for entry in fs::read_dir(&self.cache_dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if path.is_dir() && name != keep && self.is_cached(name) {
                fs::remove_dir_all(&path).ok();
            } else if path.is_file() && name.ends_with(".zip") && name != keep_zip {
                fs::remove_file(&path).ok();
            }
        }
        Ok(())
    }
}
