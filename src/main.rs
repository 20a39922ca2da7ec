//! appshell binary entry point.

use anyhow::Result;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use appshell::app::ShellApp;
use appshell::env::{self, Paths};
use appshell::icons;
use appshell::settings::Settings;

const APP_NAME: &str = "appshell";

fn main() -> Result<()> {
    let debug = env::debug_from_args(std::env::args().skip(1));
    init_logging(debug);

    let paths = Paths::resolve();
    info!(
        version = appshell::VERSION,
        tmp = %paths.tmp.display(),
        home = %paths.home.display(),
        "starting"
    );

    let settings = Settings::open(
        paths
            .home
            .join(".config")
            .join(APP_NAME)
            .join("settings.json"),
    );

    eframe::run_native(
        APP_NAME,
        native_options(),
        Box::new(move |cc| Ok(Box::new(ShellApp::new(cc, settings)))),
    )
    .map_err(|err| anyhow::anyhow!("event loop failed: {err}"))
}

fn init_logging(debug: bool) {
    let default_directive = if debug {
        "appshell=debug"
    } else {
        "appshell=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn native_options() -> eframe::NativeOptions {
    let mut viewport = egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([480.0, 320.0]);

    let icon = icons::find_icon("applications-system", 48);
    if let Some((rgba, width, height)) = icon.load_rgba() {
        viewport = viewport.with_icon(egui::IconData {
            rgba,
            width,
            height,
        });
    }

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}
