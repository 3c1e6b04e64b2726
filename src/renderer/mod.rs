//! Template rendering engine
//!
//! This module contains the engine components:
//! - `template`: Compiling primary files and fragment directories into a [`Template`]
//! - `definitions`: Splitting `define` blocks into named sub-templates
//! - `inclusion`: The recursion guarded `include` and `tpl` functions
//! - `filters`: The function library available to every template

pub mod definitions;
pub mod filters;
pub mod inclusion;
pub mod interface;
pub mod template;

pub use inclusion::{wire_inclusion_functions, InclusionContext, InclusionGuard};
pub use interface::TemplateRenderer;
pub use template::Template;
