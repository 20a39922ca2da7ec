//! appshell - shared application-shell utilities for a desktop GUI app.
//!
//! ## Features
//!
//! - Host platform family detection
//! - Environment path resolution with warned, non-fatal fallbacks
//! - Unix signal to event-loop bridging (shutdown, custom, restore)
//! - Icon theme lookup with a bundled-resource fallback
//! - Type-safe persistent settings storage

pub mod app;
pub mod env;
pub mod icons;
pub mod platform;
pub mod settings;
pub mod signals;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::{ShellApp, ViewportWindow};
pub use env::Paths;
pub use icons::{IconSource, ThemeIcon};
pub use platform::Family;
pub use settings::{FallbackReason, Key, Lookup, Settings, SettingsError};
pub use signals::{MainWindow, SignalBridge, SignalEvent, SignalRouter};
