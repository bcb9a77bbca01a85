//! Desktop GUI for the tenant access-request service: request group
//! access and export the credential config, each in a modal workflow
//! backed by a worker thread.

mod backend_bridge;
mod controller;
mod platform;
mod settings;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::ui::app::AccessDeskApp;

#[derive(Parser, Debug)]
#[command(name = "access-desk", about = "Tenant access request desktop client")]
struct Args {
    /// Base URL of the access-request service. Overrides the config
    /// file and ACCESS_DESK_SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
}

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = settings::load_settings(args.server_url);
    tracing::info!(server_url = %settings.server_url, "starting");

    let (cmd_tx, cmd_rx) = bounded(64);
    let (ui_tx, ui_rx) = bounded(256);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 480.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Tenant Access Desk",
        options,
        Box::new(|_cc| Ok(Box::new(AccessDeskApp::new(cmd_tx, ui_rx)))),
    )
}
