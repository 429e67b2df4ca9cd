//! Peerchat desktop client.

mod app;
mod components;
mod config;
mod events;
mod pages;

use app::App;
use clap::Parser;
use config::AppConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "peerchat")]
#[command(about = "Peer-to-peer chat addressed by short session codes")]
struct Args {
    /// Connect to this code right away instead of showing the start screen
    #[arg(long, value_name = "CODE")]
    code: Option<String>,
    /// Configuration file (default: search for peerchat.conf)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the signaling relay URL
    #[arg(long, value_name = "URL")]
    relay: Option<String>,
}

fn main() {
    let args = Args::parse();

    let mut config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(relay) = args.relay {
        config.relay_url = relay;
    }

    let logger = match logging::Logger::with_component(
        config.log_path.clone(),
        config.log_level,
        "Frontend".to_string(),
        false,
    ) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logger: {}", e);
            std::process::exit(1);
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 720.0])
            .with_min_inner_size([420.0, 520.0])
            .with_title("Peerchat"),
        ..Default::default()
    };

    let launch_code = args.code;
    if let Err(e) = eframe::run_native(
        "Peerchat",
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_theme(egui::Theme::Dark);

            let mut style = (*cc.egui_ctx.style()).clone();
            style.visuals.window_fill = egui::Color32::from_rgb(15, 23, 42);
            style.visuals.panel_fill = egui::Color32::from_rgb(15, 23, 42);
            cc.egui_ctx.set_style(style);

            Ok(Box::new(App::new(&cc.egui_ctx, &config, logger, launch_code)))
        }),
    ) {
        eprintln!("Failed to start the UI: {}", e);
        std::process::exit(1);
    }
}
