//! Pipeline orchestration for oqsgen.
//!
//! This crate ties together catalog loading, datasheet resolution,
//! code point validation and fragment templating into the `generate` and
//! `check` workflows.

pub mod pipeline;
pub mod table;

pub use pipeline::{
    CatalogVariant, CheckResult, GenerateConfig, GenerateResult, ProgressReporter, SilentProgress,
    check, generate, prepare_catalog,
};
pub use table::render_table;
