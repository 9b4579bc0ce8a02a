//! Security-level resolution from liboqs algorithm datasheets.
//!
//! - [`FsDatasheets`] reads `docs/algorithms/{kem,sig}/<family>.yml`
//! - [`resolve_catalog`] attaches bit security and the NIST-curve hybrid

pub mod matching;
mod resolver;
mod source;

pub use resolver::resolve_catalog;
pub use source::{AlgorithmKind, Datasheet, DatasheetSource, FsDatasheets, ParameterSet};
