//! Fragment templating for generated provider sources and documentation.
//!
//! Each target file owns a directory of `*.fragment` templates. Every
//! fragment renders into the region between its pair of markers:
//!
//! ```text
//! ///// OQS_TEMPLATE_FRAGMENT_<ID>_START
//! ...rendered body...
//! ///// OQS_TEMPLATE_FRAGMENT_<ID>_END
//! ```

pub mod fragments;
mod populate;
mod render;
mod splice;

pub use fragments::{Fragment, base_template_path, discover_fragments};
pub use populate::{PopulateOutcome, Templater};
pub use render::{FragmentRenderer, catalog_context};
pub use splice::{Markers, SpliceMode, splice};
