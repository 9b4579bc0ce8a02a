//! Fragment discovery under the template directory.
//!
//! Fragments for `oqsprov/oqsprov.c` live in
//! `<template_dir>/oqsprov/oqsprov.c/*.fragment`; the file stem is the
//! marker identifier.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use oqsgen_shared::{GeneratorError, Result};

const FRAGMENT_EXTENSION: &str = "fragment";

/// One template fragment, read into memory.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub identifier: String,
    pub path: PathBuf,
    pub body: String,
}

/// Directory holding the fragments and base template for `target`.
pub fn fragment_dir(template_dir: &Path, target: &str) -> PathBuf {
    template_dir.join(target)
}

/// `<template_dir>/<target>/<file name>.base`.
pub fn base_template_path(template_dir: &Path, target: &str) -> PathBuf {
    let file_name = Path::new(target)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    fragment_dir(template_dir, target).join(format!("{file_name}.base"))
}

/// Validate and extract the marker identifier from a fragment path.
pub fn fragment_identifier(path: &Path) -> Result<String> {
    static IDENT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| IDENT_RE.is_match(stem))
        .map(str::to_string)
        .ok_or_else(|| GeneratorError::InvalidFragmentName {
            path: path.to_path_buf(),
        })
}

/// Read every fragment for `target`, sorted by file name.
///
/// A target without a fragment directory has no fragments.
pub fn discover_fragments(template_dir: &Path, target: &str) -> Result<Vec<Fragment>> {
    let dir = fragment_dir(template_dir, target);
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "no fragment directory");
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&dir).map_err(|e| GeneratorError::io(&dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| GeneratorError::io(&dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == FRAGMENT_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let identifier = fragment_identifier(&path)?;
            let body = std::fs::read_to_string(&path).map_err(|e| GeneratorError::io(&path, e))?;
            Ok(Fragment {
                identifier,
                path,
                body,
            })
        })
        .collect()
}
