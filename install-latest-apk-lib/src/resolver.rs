use crate::error::{ApkError, Result};
use crate::source::ArtifactSource;
use serde::{Deserialize, Serialize};

pub const PACKAGE_EXTENSION: &str = ".apk";

/// A single build output, as listed by the CI server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub file_name: String,
    pub relative_path: String,
}

/// Matches the `lastSuccessfulBuild/api/json?tree=artifacts[*]` response
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
pub struct ArtifactManifest {
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl Artifact {
    pub fn is_package(&self) -> bool {
        self.file_name.ends_with(PACKAGE_EXTENSION)
    }
}

/// Picks the package to install. When the build produced several, the last
/// one in list order wins.
pub fn select_package(artifacts: &[Artifact]) -> Result<&Artifact> {
    artifacts
        .iter()
        .rfind(|artifact| artifact.is_package())
        .ok_or(ApkError::NoPackageFound)
}

pub async fn resolve_package<S: ArtifactSource>(source: &S) -> Result<Artifact> {
    let artifacts = source.artifacts().await?;
    tracing::debug!("Last successful build has {} artifacts", artifacts.len());
    select_package(&artifacts).cloned()
}
