//! liboqs algorithm datasheets and where to read them from.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use oqsgen_shared::{GeneratorError, Result};

/// Datasheet subtree an algorithm lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    Kem,
    Sig,
}

impl AlgorithmKind {
    /// Directory name under `docs/algorithms`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kem => "kem",
            Self::Sig => "sig",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One family's datasheet; only the fields used for level lookup are read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Datasheet {
    #[serde(rename = "parameter-sets", default)]
    pub parameter_sets: Vec<ParameterSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterSet {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(rename = "claimed-nist-level", default)]
    pub claimed_nist_level: Option<u8>,
}

impl Datasheet {
    /// Parse a datasheet from YAML text; `origin` is used in diagnostics.
    pub fn parse(source: &str, origin: &Path) -> Result<Self> {
        serde_yaml::from_str(source).map_err(|e| GeneratorError::parse(origin, e.to_string()))
    }
}

/// Anything that can hand out datasheets by kind and file stem.
pub trait DatasheetSource {
    /// Return the datasheet named `name` (without extension) for `kind`.
    fn datasheet(&mut self, kind: AlgorithmKind, name: &str) -> Result<&Datasheet>;
}

/// Reads `<root>/docs/algorithms/<kind>/<name>.yml`, parsing each file once.
#[derive(Debug)]
pub struct FsDatasheets {
    root: PathBuf,
    cache: HashMap<(AlgorithmKind, String), Datasheet>,
}

impl FsDatasheets {
    /// `root` is the liboqs source checkout.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    pub fn path_for(&self, kind: AlgorithmKind, name: &str) -> PathBuf {
        self.root
            .join("docs")
            .join("algorithms")
            .join(kind.as_str())
            .join(format!("{name}.yml"))
    }
}

impl DatasheetSource for FsDatasheets {
    fn datasheet(&mut self, kind: AlgorithmKind, name: &str) -> Result<&Datasheet> {
        let key = (kind, name.to_string());
        if !self.cache.contains_key(&key) {
            let path = self.path_for(kind, name);
            let source =
                std::fs::read_to_string(&path).map_err(|e| GeneratorError::io(&path, e))?;
            let sheet = Datasheet::parse(&source, &path)?;
            debug!(path = %path.display(), sets = sheet.parameter_sets.len(), "loaded datasheet");
            self.cache.insert(key.clone(), sheet);
        }
        Ok(&self.cache[&key])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_root() -> PathBuf {
        PathBuf::from("../../../fixtures/liboqs")
    }

    #[test]
    fn reads_fixture_datasheet() {
        let mut source = FsDatasheets::new(fixture_root());
        let sheet = source.datasheet(AlgorithmKind::Kem, "frodokem").unwrap();
        assert_eq!(sheet.parameter_sets.len(), 3);
        assert_eq!(sheet.parameter_sets[0].name, "FrodoKEM-640-AES");
        assert_eq!(sheet.parameter_sets[2].claimed_nist_level, Some(3));
    }

    #[test]
    fn path_layout() {
        let source = FsDatasheets::new("/opt/liboqs");
        assert_eq!(
            source.path_for(AlgorithmKind::Sig, "ml_dsa"),
            PathBuf::from("/opt/liboqs/docs/algorithms/sig/ml_dsa.yml")
        );
    }

    #[test]
    fn missing_datasheet_is_io_error() {
        let mut source = FsDatasheets::new(fixture_root());
        let err = source.datasheet(AlgorithmKind::Kem, "no_such_family").unwrap_err();
        assert!(matches!(err, GeneratorError::Io { .. }));
    }

    #[test]
    fn alias_and_missing_level_are_optional() {
        let yaml = r#"
name: SNOVA
parameter-sets:
- name: SNOVA_24_5_4
  alias: snova2454
  claimed-nist-level: 1
- name: SNOVA_draft
"#;
        let sheet = Datasheet::parse(yaml, Path::new("snova.yml")).unwrap();
        assert_eq!(sheet.parameter_sets[0].alias.as_deref(), Some("snova2454"));
        assert_eq!(sheet.parameter_sets[1].claimed_nist_level, None);
    }
}
