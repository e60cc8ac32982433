//! TerraControl panel entry point
//!
//! Loads the configuration, applies command-line overrides, sets up logging
//! and hands over to the interactive panel, the log tail or a one-shot
//! command.

use anyhow::anyhow;
use clap::Parser;
use panel_core::PanelConfig;
use tracing::{error, info};

use crate::cli::{Args, Command};
use crate::config::AppConfig;
use crate::logging::{setup_logging, LogOutput};

mod cli;
mod commands;
mod config;
mod logging;
mod session;
mod signals;
mod tail;
mod ui;

/// Resolved configuration plus the command to run.
struct Application {
    command: Command,
    config: PanelConfig,
}

impl Application {
    async fn new(args: Args) -> anyhow::Result<Self> {
        // Configuration comes first so logging can honour it
        let mut app_config = AppConfig::load_from_file(&args.config).await?;
        app_config.apply_overrides(&args);
        app_config
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {e}"))?;

        let command = args.command.clone().unwrap_or(Command::Panel);
        let output = LogOutput::for_command(command == Command::Panel, &app_config.logging);
        setup_logging(&app_config.logging, &output)?;

        let config = app_config.to_panel_config()?;
        info!(
            "📂 Config: {} | Server: {}",
            args.config.display(),
            config.base_url
        );
        Ok(Self { command, config })
    }

    async fn run(self) -> anyhow::Result<()> {
        match &self.command {
            Command::Panel => ui::run_panel(self.config).await,
            Command::Tail => tail::run_tail(&self.config).await,
            command => commands::run_action(&self.config, command).await,
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let args = Args::parse();

    let app = match Application::new(args).await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("❌ Failed to start: {e:#}");
            std::process::exit(1);
        }
    };

    if let Err(e) = app.run().await {
        error!("❌ {e:#}");
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}
