//! Error types for oqsgen.
//!
//! Library crates use [`GeneratorError`] via `thiserror`.
//! The CLI prints the diagnostic and maps any error to exit code 1.

use std::fmt;
use std::path::PathBuf;

/// Next unclaimed value of the private-use range, as shown in code-point diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextFree(pub Option<u32>);

impl fmt::Display for NextFree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => f.write_str("none"),
        }
    }
}

/// Top-level error type for all generator stages.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A required environment variable is not set.
    #[error("Must include {var} in environment")]
    MissingEnvironment { var: String },

    /// Generator settings could not be loaded or are inconsistent.
    #[error("settings error: {message}")]
    Settings { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A YAML/TOML/JSON document could not be parsed.
    #[error("parse error in {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The algorithm catalog is structurally invalid.
    #[error("catalog error: {message}")]
    Catalog { message: String },

    /// No datasheet parameter set gave a usable level for a key-exchange group.
    #[error("Cannot find security level for {family} {group}")]
    UnresolvedSecurityLevel { family: String, group: String },

    /// An explicit hybrid pairing names a curve with no known strength.
    #[error("unknown hybrid curve '{curve}' for {group} in catalog")]
    UnknownHybridCurve { group: String, curve: String },

    /// The same hybrid code point is declared twice for one group.
    #[error(
        "duplicate hybrid NID for {group}: {nid} in catalog. \
         Curve NIDs may only be specified once per KEM."
    )]
    DuplicateHybridIdentifier { group: String, nid: String },

    /// A code point is neither decimal nor `0x`-prefixed hexadecimal.
    #[error("TLS group {name} has unparsable code point {value}")]
    InvalidCodePoint { name: String, value: String },

    /// A non-IANA code point lies outside the private-use range.
    #[error(
        "Non-standard TLS group {name} code point {value} not in private use range.\n\
         Next free code point in private use range: {next_free}"
    )]
    CodePointOutOfRange {
        name: String,
        value: String,
        next_free: NextFree,
    },

    /// A non-IANA code point is already claimed by another group.
    #[error(
        "Non-standard TLS group {name} code point {value} already in use.\n\
         Next free code point in private use range: {next_free}"
    )]
    CodePointCollision {
        name: String,
        value: String,
        next_free: NextFree,
    },

    /// A fragment's marker is absent from the content being spliced.
    #[error("marker '{marker}' not found in {target:?}")]
    MissingMarker { target: PathBuf, marker: String },

    /// A fragment file name cannot be turned into a marker identifier.
    #[error("invalid fragment name {path:?}: identifiers may only contain letters, digits, '_' and '-'")]
    InvalidFragmentName { path: PathBuf },

    /// Template compilation or rendering failed.
    #[error("template error in {fragment}: {message}")]
    Template { fragment: String, message: String },

    /// A harness child process exited with an unexpected code.
    #[error("`{command}` exited with {actual:?} (expected {expected})\n{output}")]
    ChildProcessUnexpectedExit {
        command: String,
        expected: i32,
        actual: Option<i32>,
        output: String,
    },

    /// A harness server never became ready.
    #[error("server not ready after {attempts} attempts")]
    ServerStartTimeout { attempts: u32 },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GeneratorError>;

impl GeneratorError {
    /// Create a settings error from any displayable message.
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings {
            message: msg.into(),
        }
    }

    /// Create a catalog error from any displayable message.
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog {
            message: msg.into(),
        }
    }

    /// Create a parse error for the document at `path`.
    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
