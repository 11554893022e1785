use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use std::io::{Read, Write};
use std::path::Path;

use crate::ui::Ui;

const CHECKSUM_URL: &str =
    "https://eve-static-data-export.s3-eu-west-1.amazonaws.com/tranquility/checksum";
const ZIP_URL: &str = "https://eve-static-data-export.s3-eu-west-1.amazonaws.com/tranquility/sde.zip";

pub struct SdeClient {
    client: Client,
}

impl SdeClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("eve-universe-to-sqlite/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Fetch the checksum of the currently published export
    pub fn fetch_checksum(&self) -> Result<String> {
        let text = self
            .client
            .get(CHECKSUM_URL)
            .send()
            .and_then(|r| r.error_for_status())
            .context("Failed to fetch SDE checksum")?
            .text()
            .context("Failed to read response")?;

        parse_checksum(&text)
    }

    /// Download the SDE zip file to the given path
    pub fn download_zip(&self, dest: &Path, ui: &mut impl Ui) -> Result<()> {
        let mut response = self
            .client
            .get(ZIP_URL)
            .send()
            .and_then(|r| r.error_for_status())
            .context("Failed to start download")?;

        let total_size = response.content_length().unwrap_or(0);

        let mut file = std::fs::File::create(dest).context("Failed to create destination file")?;

        let mut downloaded: u64 = 0;
        let mut buffer = [0u8; 8192];

        loop {
            let bytes_read = response
                .read(&mut buffer)
                .context("Failed to read from response")?;

            if bytes_read == 0 {
                break;
            }

            file.write_all(&buffer[..bytes_read])
                .context("Failed to write to file")?;

            downloaded += bytes_read as u64;
            ui.set_progress(downloaded, total_size, format_bytes(downloaded, total_size));
        }

        ui.log("Download complete");
        Ok(())
    }
}

/// The checksum file holds a hex digest, optionally followed by a file name
fn parse_checksum(text: &str) -> Result<String> {
    let Some(token) = text.split_whitespace().next() else {
        bail!("Empty SDE checksum");
    };

    if !token.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("Unexpected SDE checksum: {:?}", token);
    }

    Ok(token.to_ascii_lowercase())
}

/// Format bytes as human-readable string
fn format_bytes(current: u64, total: u64) -> String {
    fn fmt(bytes: u64) -> String {
        if bytes >= 1_000_000_000 {
            format!("{:.1} GB", bytes as f64 / 1_000_000_000.0)
        } else if bytes >= 1_000_000 {
            format!("{:.1} MB", bytes as f64 / 1_000_000.0)
        } else if bytes >= 1_000 {
            format!("{:.1} KB", bytes as f64 / 1_000.0)
        } else {
            format!("{} B", bytes)
        }
    }

    if total == 0 {
        fmt(current)
    } else {
        format!("{} / {}", fmt(current), fmt(total))
    }
}
