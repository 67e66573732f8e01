use crate::error::{ApkError, Result};
use crate::logging::{progress_bar_style, spinner_style};
use crate::source::{ArtifactDownload, ArtifactSource};
use futures_util::StreamExt;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// Where an artifact is stored locally: `<storage_dir>/<relative_path>`.
///
/// Rejects relative paths that could land outside of `storage_dir`.
pub fn destination_path(storage_dir: &Path, relative_path: &str) -> Result<PathBuf> {
    let relative = Path::new(relative_path);
    let is_contained = !relative_path.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !is_contained {
        return Err(ApkError::UnsafeArtifactPath(relative_path.to_string()));
    }
    Ok(storage_dir.join(relative))
}

/// Downloads an artifact into `storage_dir` and returns its local path.
///
/// A file that is already there with exactly the announced size is reused
/// without reading the response body. Any other existing file is replaced.
#[instrument(skip_all)]
pub async fn download_artifact<S: ArtifactSource>(
    source: &S,
    storage_dir: &Path,
    relative_path: &str,
) -> Result<PathBuf> {
    let destination = destination_path(storage_dir, relative_path)?;
    let download = source.open_artifact(relative_path).await?;

    ensure_storage_dir(storage_dir).await?;
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    if let Ok(metadata) = tokio::fs::metadata(&destination).await {
        if Some(metadata.len()) == download.content_length {
            tracing::info!("File already downloaded");
            return Ok(destination);
        }
        tracing::info!("File already downloaded, but file size does not match, downloading it again");
        tokio::fs::remove_file(&destination).await?;
    }

    tracing::info!("Starting download");
    let file_name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| relative_path.to_string());

    let current_span = tracing::Span::current();
    match download.content_length {
        Some(total) => {
            current_span.pb_set_style(&progress_bar_style());
            current_span.pb_set_length(total);
        }
        None => {
            current_span.pb_set_style(&spinner_style("{msg} {bytes} ({bytes_per_sec})"));
        }
    }
    current_span.pb_set_message(&format!("downloading {file_name}"));
    current_span.pb_set_finish_message(&format!("downloading {file_name}... Complete!"));

    let expected = download.content_length;
    let written = write_body(download, &destination)
        .await
        .map_err(ApkError::DownloadFailed)?;

    if let Some(expected) = expected
        && expected != written
    {
        tracing::warn!("Server announced {expected} bytes but sent {written}");
    }

    Ok(destination)
}

/// Creates the storage directory itself; its parent has to exist already.
async fn ensure_storage_dir(storage_dir: &Path) -> Result<()> {
    match tokio::fs::create_dir(storage_dir).await {
        Ok(()) => {
            tracing::debug!("Created storage directory {}", storage_dir.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists && storage_dir.is_dir() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn write_body(download: ArtifactDownload, destination: &Path) -> std::io::Result<u64> {
    let mut file = tokio::fs::File::create(destination).await?;
    let mut body = download.body;
    let mut downloaded = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        tracing::Span::current().pb_set_position(downloaded);
    }

    file.flush().await?;
    Ok(downloaded)
}
