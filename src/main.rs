// src/main.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod config;
mod controller;
mod format;
mod model;
mod state;
mod ui;
mod worker;

use crate::app::InsightApp;
use crate::config::AppConfig;

/// Desktop viewer for course comment analyses.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Backend base URL, e.g. http://127.0.0.1:8000
    #[arg(long, env = "COMMENT_INSIGHT_SERVER")]
    server: Option<String>,

    /// Page to open first: /, /history, /analysis or /analysis/<id>
    #[arg(long)]
    path: Option<String>,

    /// Config file to use instead of the one in the user config directory
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let restore_view = cli.path.is_none();
    config.apply_overrides(cli.server, cli.path);
    config.validate()?;

    let config_path = cli.config.or_else(AppConfig::default_path);
    tracing::info!(server = %config.server_url, start = %config.start_path, "starting comment insight");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Comment Insight"),
        ..Default::default()
    };

    eframe::run_native(
        "Comment Insight",
        options,
        Box::new(move |cc| Box::new(InsightApp::new(cc, config, config_path, restore_view))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))
}
