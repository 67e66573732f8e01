use anyhow::{Context, Result};
use clap::Parser;
use install_latest_apk_lib::bridge::AdbBridge;
use install_latest_apk_lib::config::{BridgeConfig, Config, DEFAULT_BRIDGE_PROGRAM};
use install_latest_apk_lib::jenkins::JenkinsClient;
use install_latest_apk_lib::workflow::{self, WorkflowOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "install-latest-apk")]
#[command(about = "Install the apk of the last successful CI build on a connected device")]
#[command(version)]
pub struct Cli {
    /// Base URL of the CI job (e.g., https://ci.example.com/job/my-app/)
    #[arg(long, env = "INSTALL_LATEST_APK_JOB_URL")]
    pub job_url: String,

    /// Directory the downloaded apk files are kept in
    #[arg(long, env = "INSTALL_LATEST_APK_STORAGE_PATH")]
    pub storage_path: PathBuf,

    /// Device bridge executable
    #[arg(long, env = "INSTALL_LATEST_APK_ADB", default_value = DEFAULT_BRIDGE_PROGRAM)]
    pub adb: String,

    /// Serial of the device to install on
    #[arg(short, long, env = "ANDROID_SERIAL")]
    pub serial: Option<String>,

    /// Download the apk but don't install it
    #[arg(long)]
    pub download_only: bool,

    /// Print debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> Result<Config> {
        let config = Config::new(&self.job_url, &self.storage_path)
            .context("Invalid configuration")?
            .with_bridge(BridgeConfig {
                program: self.adb.clone(),
                serial: self.serial.clone(),
            });
        Ok(config)
    }

    pub async fn run(&self, config: Config) -> Result<PathBuf> {
        let client = JenkinsClient::new(&config).context("Failed to create HTTP client")?;
        let bridge = AdbBridge::new(&config.bridge);
        let options = WorkflowOptions {
            skip_install: self.download_only,
        };

        let package = workflow::run(&config, &client, &bridge, &options).await?;
        Ok(package)
    }
}
