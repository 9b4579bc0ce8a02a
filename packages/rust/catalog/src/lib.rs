//! Algorithm catalog loading and code point validation.
//!
//! This crate provides:
//! - [`load_catalog`]: parse `generate.yml` into a typed [`oqsgen_shared::Catalog`]
//! - [`validate_code_points`]: private-use range and collision checks

mod codepoints;
mod document;
mod loader;

pub use codepoints::{CodePointRegistry, CodePointReport, validate_code_points};
pub use loader::{LoadOptions, load_catalog, parse_catalog};
