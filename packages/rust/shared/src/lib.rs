//! Shared types, error model, and settings for oqsgen.
//!
//! This crate is the foundation depended on by all other oqsgen crates.
//! It provides:
//! - [`GeneratorError`]: the unified error type
//! - The resolved catalog model ([`Catalog`], [`KemVariant`], [`HybridBinding`], [`SigVariant`])
//! - Settings ([`GeneratorSettings`], [`TargetSpec`], settings loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    DatasheetsConfig, GeneratorSettings, PathsConfig, TargetSpec, datasheet_root, init_settings,
    load_settings, load_settings_from, settings_file_path,
};
pub use error::{GeneratorError, NextFree, Result};
pub use types::{
    BitSecurity, Catalog, CodePoint, Extras, HybridBinding, KemVariant, MarkerStyle,
    PLACEHOLDER_OID, PRIVATE_USE_RANGE, SigFamily, SigVariant,
};
