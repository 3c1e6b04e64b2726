//! Variant resolution
//!
//! This module contains the variant pipeline components:
//! - `variant`: A single variant and its open-ended data bag
//! - `loader`: Loading a variant set from a plain or templated definition
//! - `overrides`: Scoped `key=value` overrides applied before rendering

pub mod loader;
pub mod overrides;
pub mod variant;

pub use loader::VariantSet;
pub use overrides::apply_overrides;
pub use variant::{Image, Variant};
