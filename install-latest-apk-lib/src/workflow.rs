use crate::bridge::DeviceBridge;
use crate::config::Config;
use crate::download::download_artifact;
use crate::error::Result;
use crate::resolver::resolve_package;
use crate::source::ArtifactSource;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct WorkflowOptions {
    /// Stop once the package is on disk.
    pub skip_install: bool,
}

/// Resolves, downloads and installs the latest package, in that order.
/// The first failing stage aborts the rest.
///
/// Returns the local path of the package.
pub async fn run<S: ArtifactSource, B: DeviceBridge>(
    config: &Config,
    source: &S,
    bridge: &B,
    options: &WorkflowOptions,
) -> Result<PathBuf> {
    let artifact = resolve_package(source).await?;
    tracing::info!("Latest package: {}", artifact.file_name);

    let package = download_artifact(source, &config.storage_dir, &artifact.relative_path).await?;

    if options.skip_install {
        tracing::debug!("Skipping install of {}", package.display());
        return Ok(package);
    }

    bridge.install(&package).await?;
    Ok(package)
}
