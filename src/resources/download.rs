// Artifact download helper.
//
// Fetches the exported vectorizer and classifier from a base URL
// (SENTISCOPE_ARTIFACT_URL) and writes the stopword list next to them.
//
// Files are stored in a platform-appropriate directory
// (~/.local/share/sentiscope/artifacts/ on Linux) so they persist across runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::loader::{CLASSIFIER_FILE, STOPWORDS_FILE, VECTORIZER_FILE};
use crate::text::stopwords;

/// Returns the default directory for model artifacts.
/// Uses the platform data directory: ~/.local/share/sentiscope/artifacts/ on Linux.
pub fn default_artifact_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sentiscope")
        .join("artifacts")
}

/// Check whether both model files exist. The stopword file is optional.
pub fn artifacts_present(dir: &Path) -> bool {
    dir.join(VECTORIZER_FILE).exists() && dir.join(CLASSIFIER_FILE).exists()
}

/// Download the model artifacts into `dir`.
///
/// Skips files that already exist. Without a base URL, only the stopword
/// list is written and missing model files are reported as an error.
pub async fn download_artifacts(dir: &Path, base_url: Option<&str>) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create artifact directory: {}", dir.display()))?;

    let stopwords_path = dir.join(STOPWORDS_FILE);
    if stopwords_path.exists() {
        println!("  {} (already exists)", STOPWORDS_FILE);
    } else {
        let words = stopwords::bundled_english();
        std::fs::write(&stopwords_path, stopwords::render_list(&words))
            .with_context(|| format!("Failed to write {}", stopwords_path.display()))?;
        info!(count = words.len(), "Wrote bundled stopword list");
        println!("  {} ({} words)", STOPWORDS_FILE, words.len());
    }

    for file in [VECTORIZER_FILE, CLASSIFIER_FILE] {
        let dest = dir.join(file);
        if dest.exists() {
            info!("{file} already exists, skipping");
            println!("  {file} (already exists)");
            continue;
        }

        let Some(base) = base_url else {
            anyhow::bail!(
                "{file} is missing from {} and SENTISCOPE_ARTIFACT_URL is not set.\n\
                 Set it to the location of the exported model, or copy the files in by hand.",
                dir.display()
            );
        };

        println!("  Downloading {file}...");
        download_file(&format!("{}/{}", base.trim_end_matches('/'), file), &dest).await?;
    }

    Ok(())
}

/// Download a single file from a URL to a local path with a progress bar.
async fn download_file(url: &str, dest: &Path) -> Result<()> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .expect("valid template")
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("    {spinner} {bytes}")
                    .expect("valid template"),
            );
            pb
        }
    };

    let bytes = response
        .bytes()
        .await
        .context("Failed to read response body")?;
    pb.set_position(bytes.len() as u64);

    // Refuse to store something the loader would reject later
    serde_json::from_slice::<serde_json::Value>(&bytes)
        .with_context(|| format!("{} did not return JSON", url))?;

    std::fs::write(dest, &bytes).with_context(|| format!("Failed to write {}", dest.display()))?;
    pb.finish_and_clear();

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}
