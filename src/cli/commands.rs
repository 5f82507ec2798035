//! Command handlers for the chartfile CLI

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::app::category::{Category, CategoryFilter};
use crate::app::client::{DocumentsClient, EmptyReason};
use crate::app::models::{CandidateFile, DocumentId, PatientId};
use crate::app::store::DocumentStore;
use crate::cli::args::Cli;
use crate::config::{generate_default_config_content, AppConfig};
use crate::errors::{AppError, Result};

/// Build the store from configuration and global flags
async fn build_store(cli: &Cli, patient: &str) -> Result<DocumentStore> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config.server.base_url = base_url.clone();
    }

    let client = DocumentsClient::with_config(&config.server.base_url, &config.client_config())?;
    Ok(DocumentStore::new(
        Arc::new(client),
        Some(PatientId::new(patient)),
    ))
}

/// Handle the list command
pub async fn handle_list(cli: &Cli, patient: &str, category: Option<&str>) -> Result<()> {
    let mut store = build_store(cli, patient).await?;

    if let Some(label) = category {
        let filter = CategoryFilter::parse(label)
            .ok_or_else(|| AppError::generic(format!("Unknown category '{label}'")))?;
        store.set_filter(filter);
    }

    store.refresh().await;

    if let Some((status, detail)) = store.last_degradation() {
        return Err(AppError::generic(format!(
            "Backend returned HTTP {status}: {detail}"
        )));
    }

    let visible = store.visible();
    if visible.is_empty() {
        match store.empty_reason() {
            Some(EmptyReason::Unreachable) => {
                return Err(AppError::generic("Backend could not be reached"))
            }
            Some(EmptyReason::FallbackFailed) => {
                return Err(AppError::generic(
                    "Filtered listing was rejected and the fallback failed",
                ))
            }
            _ => println!("No documents for patient {patient}"),
        }
        return Ok(());
    }

    println!(
        "{:<12} {:<36} {:<16} {}",
        "ID", "FILE", "CATEGORY", "UPLOADED"
    );
    for doc in &visible {
        println!(
            "{:<12} {:<36} {:<16} {}",
            doc.id,
            doc.file_name,
            Category::classify(&doc.file_name),
            doc.uploaded_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!("\n{} document(s)", visible.len());
    Ok(())
}

/// Handle the upload command
pub async fn handle_upload(
    cli: &Cli,
    patient: &str,
    file_path: &Path,
    mime_override: Option<&str>,
) -> Result<()> {
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::generic(format!("Bad file path: {}", file_path.display())))?
        .to_string();

    let mime_type = match mime_override {
        Some(mime) => mime.to_string(),
        None => mime_guess::from_path(file_path)
            .first_or_octet_stream()
            .essence_str()
            .to_string(),
    };

    let content = tokio::fs::read(file_path).await?;
    debug!(file_name = %file_name, mime_type = %mime_type, bytes = content.len(), "Read upload candidate");
    let candidate = CandidateFile::new(file_name.clone(), mime_type, content);

    let mut store = build_store(cli, patient).await?;

    // Drive a progress bar off the shared display cell while the upload runs
    let percent = store.display_percent();
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:.bold} [{bar:40.cyan/blue}] {pos:>3}%")
            .map_err(|e| AppError::generic(format!("Bad progress template: {e}")))?
            .progress_chars("=>-"),
    );
    bar.set_message(file_name.clone());
    let bar_task = {
        let bar = bar.clone();
        tokio::spawn(async move {
            loop {
                bar.set_position(u64::from(percent.get()));
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        })
    };

    let result = store.upload(candidate).await;
    bar_task.abort();

    match result {
        Ok(id) => {
            bar.set_position(100);
            bar.finish_with_message(format!("{file_name} uploaded"));
            info!(document_id = %id, "Upload complete");
            println!("Uploaded {file_name} (document {id})");
            Ok(())
        }
        Err(e) => {
            bar.abandon_with_message(format!("{file_name} failed"));
            Err(e.into())
        }
    }
}

/// Handle the delete command
pub async fn handle_delete(cli: &Cli, patient: &str, ids: &[String], yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Delete {} document(s)?", ids.len()))? {
        println!("Aborted");
        return Ok(());
    }

    let mut store = build_store(cli, patient).await?;
    for id in ids {
        store.toggle_selected(DocumentId::new(id.clone()), true);
    }

    let deleted = store.bulk_delete_selected().await?;
    println!("Deleted {deleted} document(s)");
    Ok(())
}

/// Handle the download command
pub async fn handle_download(
    cli: &Cli,
    patient: &str,
    ids: &[String],
    out: &Path,
    force: bool,
) -> Result<()> {
    let mut store = build_store(cli, patient).await?;
    store.refresh().await;

    if store.documents().is_empty() {
        println!("No documents for patient {patient}");
        return Ok(());
    }

    if ids.is_empty() {
        store.select_all_visible();
    } else {
        for id in ids {
            let id = DocumentId::new(id.clone());
            if !store.documents().iter().any(|d| d.id == id) {
                return Err(AppError::generic(format!("No document with id {id}")));
            }
            store.toggle_selected(id, true);
        }
    }

    let count = store.selection().len();
    info!(count, "Downloading documents to {}", out.display());
    let handles = store.bulk_download_selected(out.to_path_buf(), force);
    for handle in handles {
        // Individual failures were already logged by the download task
        let _ = handle.await;
    }
    println!("Downloaded {count} document(s) to {}", out.display());
    Ok(())
}

/// Handle the config command
pub async fn handle_config(cli: &Cli, init: bool) -> Result<()> {
    if init {
        let path = PathBuf::from("chartfile.toml");
        if path.exists() {
            return Err(AppError::generic(format!(
                "{} already exists",
                path.display()
            )));
        }
        std::fs::write(&path, generate_default_config_content())?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    let rendered =
        toml::to_string_pretty(&config).map_err(|e| AppError::generic(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}

/// Prompt for a yes/no confirmation on stdin
fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
