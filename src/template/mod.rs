//! Dockerfile rendering for Dockerfile Templater
//!
//! This module contains the output side of a run:
//! - `operation`: Defines the filesystem operations a render produces
//! - `processor`: Renders every variant and writes the resulting Dockerfiles

pub mod operation;
pub mod processor;

pub use operation::TemplateOperation;
pub use processor::DockerfileProcessor;
