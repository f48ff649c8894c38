// src/config/mod.rs

//! Configuration: optional TOML file + CLI flags, merged into [`Settings`].

pub mod loader;
pub mod model;
pub mod shorthand;
pub mod validate;

pub use loader::{load_from_fs, load_from_path, resolve_settings};
pub use model::{RawConfigFile, RunSection, Settings, WatchSection};
pub use shorthand::expand_commands;
