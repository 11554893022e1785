use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

use crate::ui::Ui;

/// Flat tables the import reads besides the universe tree
const FLAT_TABLES: &[&str] = &["bsd/invNames.yaml", "bsd/staStations.yaml"];

/// Extract the parts of the SDE zip the import needs into `dest_dir`.
///
/// Returns the number of files written.
pub fn extract_sde(zip_path: &Path, dest_dir: &Path, ui: &mut impl Ui) -> Result<u64> {
    let file = File::open(zip_path).context("Failed to open zip file")?;
    let reader = BufReader::new(file);
    let mut archive = ZipArchive::new(reader).context("Failed to read zip archive")?;

    fs::create_dir_all(dest_dir).context("Failed to create destination directory")?;

    let total_files = archive.len() as u64;
    let mut written = 0;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .context("Failed to read file from archive")?;

        ui.set_progress(i as u64 + 1, total_files, "Extracting");

        if entry.is_dir() {
            continue;
        }
        // enclosed_name rejects absolute paths and `..` traversal
        let Some(rel) = entry.enclosed_name().and_then(|p| sde_relative_path(&p)) else {
            continue;
        };

        let dest_path = dest_dir.join(&rel);
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let mut dest_file = File::create(&dest_path)
            .with_context(|| format!("Failed to create file: {:?}", dest_path))?;
        io::copy(&mut entry, &mut dest_file)
            .with_context(|| format!("Failed to extract: {:?}", rel))?;

        written += 1;
    }

    ui.log(format!("Extracted {} files", written));
    Ok(written)
}

/// Map an archive path to its place in the export layout, or `None` if the
/// import does not need it. The archive's leading `sde/` directory is dropped.
fn sde_relative_path(name: &Path) -> Option<PathBuf> {
    let mut parts: Vec<&str> = name
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .collect();

    if parts.first() == Some(&"sde") {
        parts.remove(0);
    }

    let rel = parts.join("/");
    let wanted = (parts.first() == Some(&"universe") && parts.len() > 1)
        || FLAT_TABLES.contains(&rel.as_str());

    wanted.then(|| parts.iter().collect())
}
