pub mod address;
pub mod config;
pub mod docker;
pub mod env_file;
pub mod errors;
pub mod gui;
pub mod history;
pub mod icon;
pub mod launcher;
pub mod logs;
pub mod theme;

pub use errors::{LauncherError, Result};
