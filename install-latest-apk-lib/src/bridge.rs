use crate::config::BridgeConfig;
use crate::error::{ApkError, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Installs packages on a device.
pub trait DeviceBridge {
    fn install(&self, package: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Installs through `adb install -r`, replacing any existing app.
#[derive(Debug, Clone)]
pub struct AdbBridge {
    program: String,
    serial: Option<String>,
}

impl AdbBridge {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            program: config.program.clone(),
            serial: config.serial.clone(),
        }
    }

    pub fn install_args(&self, package: &Path) -> Vec<OsString> {
        let mut args = Vec::new();
        if let Some(serial) = &self.serial {
            args.push("-s".into());
            args.push(serial.into());
        }
        args.push("install".into());
        args.push("-r".into());
        args.push(package.as_os_str().to_owned());
        args
    }

    /// Human readable form of the install command, for echoing.
    pub fn command_line(&self, package: &Path) -> String {
        let args = self
            .install_args(package)
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ");
        format!("{} {}", self.program, args)
    }
}

impl DeviceBridge for AdbBridge {
    async fn install(&self, package: &Path) -> Result<()> {
        tracing::info!("{}", self.command_line(package));

        // Arguments are passed as-is, no shell is involved.
        let mut child = Command::new(&self.program)
            .args(self.install_args(package))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ApkError::BridgeUnavailable {
                program: self.program.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (status, (), ()) = tokio::join!(
            child.wait(),
            forward_lines(stdout, OutputStream::Stdout),
            forward_lines(stderr, OutputStream::Stderr),
        );
        let status = status?;

        if status.success() {
            Ok(())
        } else {
            Err(ApkError::InstallFailed {
                code: status.code(),
            })
        }
    }
}

#[derive(Clone, Copy)]
enum OutputStream {
    Stdout,
    Stderr,
}

/// Logs every line the bridge prints until the stream closes.
///
/// Output is read as raw bytes so a non UTF-8 line never stops the draining;
/// closing the pipe early would kill the bridge with SIGPIPE.
async fn forward_lines<R: AsyncRead + Unpin>(reader: Option<R>, stream: OutputStream) {
    let Some(reader) = reader else {
        return;
    };
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                match stream {
                    OutputStream::Stdout => tracing::info!("{line}"),
                    OutputStream::Stderr => tracing::warn!("{line}"),
                }
            }
            Err(e) => {
                tracing::debug!("Stopped reading device bridge output: {e}");
                break;
            }
        }
    }
}
