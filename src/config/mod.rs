//! Configuration management for Dockerfile Templater
//!
//! Flags and their `DTPL_*` environment variables are handled by the CLI;
//! this module covers the optional YAML settings file passed with `--config`.

pub mod loader;

pub use loader::{DockerfileSettings, OutputSettings, Settings, VariantsSettings};
