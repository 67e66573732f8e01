use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApkError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid job URL '{url}': {reason}")]
    InvalidJobUrl { url: String, reason: String },
}

#[derive(Error, Debug)]
pub enum ApkError {
    #[error("No apk file found in the last successful build")]
    NoPackageFound,

    #[error("CI server returned {status} for {url}")]
    Http { status: StatusCode, url: String },

    #[error("Request to CI server failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse artifact list: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Artifact path '{0}' points outside of the storage directory")]
    UnsafeArtifactPath(String),

    #[error("Download file failed: {0}")]
    DownloadFailed(#[source] std::io::Error),

    #[error("Failed to launch device bridge '{program}': {source}")]
    BridgeUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("install failed, {}", describe_exit(.code))]
    InstallFailed { code: Option<i32> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("device bridge exited with code {code}"),
        None => "device bridge was terminated by a signal".to_string(),
    }
}
