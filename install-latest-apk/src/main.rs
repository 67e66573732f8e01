mod cli;
mod ui;

use clap::Parser;
use cli::Cli;
use install_latest_apk_lib::logging::initialize_logging;
use std::process::ExitCode;

/// Exit code for unusable configuration, matching clap's usage errors.
const CONFIG_ERROR_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logging(cli.verbose);

    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            ui::error(&format!("{e:#}"));
            return ExitCode::from(CONFIG_ERROR_EXIT);
        }
    };

    if cli.download_only {
        ui::warning("--download-only: the apk will not be installed");
    }

    let result = cli.run(config).await;
    ui::info("finished");

    match result {
        Ok(package) if cli.download_only => {
            ui::success(&format!("Downloaded {}", package.display()));
            ExitCode::SUCCESS
        }
        Ok(package) => {
            ui::success(&format!("Installed {}", package.display()));
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
