//! Application shell state and lifecycle.
//!
//! A minimal top-level window that owns the signal router and the
//! settings store, pumps signal-sourced events every frame, and persists
//! window state across sessions.

use std::cell::Cell;
use std::rc::Rc;

use eframe::egui;
use tracing::{info, warn};

use crate::settings::{Key, Settings};
use crate::signals::{MainWindow, SignalBridge, SignalRouter};

/// Whether the window was maximized when the app last exited.
pub const WINDOW_MAXIMIZED: Key<bool> = Key::new("window-maximized");

/// [`MainWindow`] implementation driving the eframe viewport.
pub struct ViewportWindow {
    ctx: egui::Context,
}

impl ViewportWindow {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl MainWindow for ViewportWindow {
    fn hide(&mut self) {
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Visible(false));
    }

    fn close(&mut self) {
        self.ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn quit(&mut self) {
        // eframe ends the event loop when the last viewport closes.
        self.ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    fn is_maximized(&self) -> bool {
        self.ctx.input(|i| i.viewport().maximized.unwrap_or(false))
    }

    fn show_maximized(&mut self) {
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Visible(true));
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Minimized(false));
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Maximized(true));
        self.ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
    }

    fn show_normal(&mut self) {
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Visible(true));
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Minimized(false));
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Maximized(false));
        self.ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
    }
}

/// Main application shell.
pub struct ShellApp {
    router: SignalRouter<ViewportWindow>,
    settings: Settings,
    user_signals: Rc<Cell<u32>>,
    maximized: bool,
}

impl ShellApp {
    /// Build the shell: install the signal bridge, register the viewport
    /// as the top-level window, and restore persisted window state.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let waker_ctx = cc.egui_ctx.clone();
        let bridge = SignalBridge::install(move || waker_ctx.request_repaint());

        let mut router = SignalRouter::new(bridge);
        router.attach(ViewportWindow::new(cc.egui_ctx.clone()));

        let user_signals = Rc::new(Cell::new(0u32));
        let counter = user_signals.clone();
        router.on_custom(move || {
            counter.set(counter.get() + 1);
            info!("user signal received");
        });

        let maximized = settings.get(&WINDOW_MAXIMIZED, false);
        if maximized {
            cc.egui_ctx
                .send_viewport_cmd(egui::ViewportCommand::Maximized(true));
        }

        Self {
            router,
            settings,
            user_signals,
            maximized,
        }
    }
}

impl eframe::App for ShellApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
        self.router.pump();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("appshell");
            ui.label(format!("version {}", crate::VERSION));
            ui.separator();
            ui.label(
                "Running. Interrupt or terminate to quit; the second user signal restores the window.",
            );
            if self.user_signals.get() > 0 {
                ui.label(format!("User signals received: {}", self.user_signals.get()));
            }
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.set(&WINDOW_MAXIMIZED, &self.maximized);
        if let Err(err) = self.settings.save() {
            warn!(%err, "could not persist settings");
        }
    }
}
