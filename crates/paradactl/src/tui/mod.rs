//! Interactive dashboard TUI.
//!
//! - app: UI state (focus, overlays, slice selection)
//! - event_loop: terminal setup, polling wiring, key handling
//! - render: drawing functions

mod app;
mod event_loop;
mod render;

pub use app::{App, AuthField, Overlay};
pub use event_loop::run;
