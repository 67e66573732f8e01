use crate::bridge::DeviceBridge;
use crate::error::{ApkError, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Records install requests instead of talking to a device.
pub struct MockDeviceBridge {
    exit_code: i32,
    installed: Mutex<Vec<PathBuf>>,
}

impl MockDeviceBridge {
    pub fn new(exit_code: i32) -> Self {
        Self {
            exit_code,
            installed: Mutex::new(Vec::new()),
        }
    }

    pub fn installed(&self) -> Vec<PathBuf> {
        self.installed
            .lock()
            .map(|installed| installed.clone())
            .unwrap_or_default()
    }
}

impl DeviceBridge for MockDeviceBridge {
    async fn install(&self, package: &Path) -> Result<()> {
        if let Ok(mut installed) = self.installed.lock() {
            installed.push(package.to_path_buf());
        }
        match self.exit_code {
            0 => Ok(()),
            code => Err(ApkError::InstallFailed { code: Some(code) }),
        }
    }
}
