//! Paradactl library - exposes modules for integration tests.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod controller;
pub mod errors;
pub mod forms;
pub mod logging;
pub mod session;
pub mod tui;
