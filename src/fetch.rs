use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Download `url` into `dest`, overwriting any existing file.
///
/// Any non-success status aborts; there is no retry.
pub async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> Result<()> {
    info!("Downloading {} -> {:?}", url, dest);

    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;
    if !response.status().is_success() {
        return Err(anyhow!("GET {} returned {}", url, response.status()));
    }

    let bar = match response.content_length() {
        Some(len) => {
            let bar = ProgressBar::new(len);
            bar.set_style(ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap());
            bar
        }
        None => ProgressBar::new_spinner(),
    };

    let mut file =
        File::create(dest).with_context(|| format!("failed to create {}", dest.display()))?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk)?;
        bar.inc(chunk.len() as u64);
    }
    bar.finish_and_clear();

    info!("Saved to {:?}", dest);
    Ok(())
}
