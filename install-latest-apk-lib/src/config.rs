use crate::error::ConfigError;
use reqwest::Url;
use std::path::{Path, PathBuf};

pub const JOB_URL_ENV: &str = "INSTALL_LATEST_APK_JOB_URL";
pub const STORAGE_PATH_ENV: &str = "INSTALL_LATEST_APK_STORAGE_PATH";
pub const ADB_ENV: &str = "INSTALL_LATEST_APK_ADB";
pub const SERIAL_ENV: &str = "ANDROID_SERIAL";

pub const DEFAULT_BRIDGE_PROGRAM: &str = "adb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the CI job, its path always ends with `/`
    pub job_url: Url,

    /// Directory the downloaded packages are stored in
    pub storage_dir: PathBuf,

    /// How to reach the device the package gets installed on
    pub bridge: BridgeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Device bridge executable, looked up on PATH when not absolute.
    pub program: String,

    /// Serial of the one device to install on. `None` lets the bridge pick.
    pub serial: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_BRIDGE_PROGRAM.to_string(),
            serial: None,
        }
    }
}

impl Config {
    pub fn new(job_url: &str, storage_dir: &Path) -> Result<Self, ConfigError> {
        let job_url = job_url.trim();
        if job_url.is_empty() {
            return Err(ConfigError::Missing(JOB_URL_ENV));
        }
        if storage_dir.as_os_str().is_empty() {
            return Err(ConfigError::Missing(STORAGE_PATH_ENV));
        }

        let parsed = Url::parse(job_url).map_err(|e| ConfigError::InvalidJobUrl {
            url: job_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidJobUrl {
                url: job_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        // Endpoints are appended to the job URL, so it has to end with a slash.
        let mut job_url = parsed;
        if !job_url.path().ends_with('/') {
            let path = format!("{}/", job_url.path());
            job_url.set_path(&path);
        }

        Ok(Self {
            job_url,
            storage_dir: storage_dir.to_path_buf(),
            bridge: BridgeConfig::default(),
        })
    }

    pub fn with_bridge(self, bridge: BridgeConfig) -> Self {
        Self { bridge, ..self }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let job_url = non_empty(JOB_URL_ENV).ok_or(ConfigError::Missing(JOB_URL_ENV))?;
        let storage_dir =
            non_empty(STORAGE_PATH_ENV).ok_or(ConfigError::Missing(STORAGE_PATH_ENV))?;

        let bridge = BridgeConfig {
            program: non_empty(ADB_ENV).unwrap_or_else(|| DEFAULT_BRIDGE_PROGRAM.to_string()),
            serial: non_empty(SERIAL_ENV),
        };

        Ok(Self::new(&job_url, Path::new(&storage_dir))?.with_bridge(bridge))
    }

    /// Metadata endpoint listing the artifacts of the last successful build.
    pub fn manifest_url(&self) -> String {
        format!("{}lastSuccessfulBuild/api/json?tree=artifacts[*]", self.job_url)
    }

    /// Download URL of an artifact. Each path segment is percent-encoded.
    pub fn artifact_url(&self, relative_path: &str) -> Url {
        let mut url = self.job_url.clone();
        // http(s) URLs always have path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["lastSuccessfulBuild", "artifact"])
                .extend(relative_path.split('/'));
        }
        url
    }
}
