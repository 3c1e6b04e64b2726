/// Handles argument parsing and the run orchestration.
pub mod cli;

/// Settings file handling.
pub mod config;

/// Constants used throughout the templater.
pub mod constants;

/// Defines custom error types.
pub mod error;

/// Extension traits for std types.
pub mod ext;

/// A set of helpers for working with the file system.
pub mod ioutils;

/// Template parsing and rendering functionality.
pub mod renderer;

/// Rendering variants into Dockerfiles.
pub mod template;

/// Loading, validating and adjusting variants.
pub mod variants;
