//! Generator settings for oqsgen.
//!
//! Settings live in an optional `oqsgen.toml` at the provider root.
//! Every section has defaults that reproduce the stock target set.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};
use crate::types::MarkerStyle;

/// Settings file name, looked up at the provider root.
const SETTINGS_FILE_NAME: &str = "oqsgen.toml";

/// Delimiter for C sources and headers.
const C_DELIMITER: &str = "/////";

/// Delimiter for Python sources.
const PY_DELIMITER: &str = "#####";

/// Delimiter for Markdown documentation.
const MD_DELIMITER: &str = "<!---";

// ---------------------------------------------------------------------------
// Settings structs (matching oqsgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level generator settings, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Template and catalog locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// External datasheet lookup.
    #[serde(default)]
    pub datasheets: DatasheetsConfig,

    /// Generated sources, spliced incrementally with the production catalog.
    #[serde(default = "default_sources")]
    pub sources: Vec<TargetSpec>,

    /// Documentation, rewritten from base templates with the documentation catalog.
    #[serde(default = "default_docs")]
    pub docs: Vec<TargetSpec>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            datasheets: DatasheetsConfig::default(),
            sources: default_sources(),
            docs: default_docs(),
        }
    }
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the catalog, fragments and base templates.
    #[serde(default = "default_template_dir")]
    pub template_dir: String,

    /// Catalog file, relative to `template_dir`.
    #[serde(default = "default_catalog")]
    pub catalog: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            catalog: default_catalog(),
        }
    }
}

fn default_template_dir() -> String {
    "oqs-template".into()
}
fn default_catalog() -> String {
    "generate.yml".into()
}

/// `[datasheets]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasheetsConfig {
    /// Name of the env var holding the liboqs source root.
    #[serde(default = "default_root_env")]
    pub root_env: String,
}

impl Default for DatasheetsConfig {
    fn default() -> Self {
        Self {
            root_env: default_root_env(),
        }
    }
}

fn default_root_env() -> String {
    "LIBOQS_SRC_DIR".into()
}

/// `[[sources]]` / `[[docs]]` entry: one generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Path relative to the provider root.
    pub path: String,
    /// Comment sequence that opens every marker line.
    pub delimiter: String,
    /// Marker style; derived from the extension when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<MarkerStyle>,
}

impl TargetSpec {
    pub fn new(path: &str, delimiter: &str) -> Self {
        Self {
            path: path.into(),
            delimiter: delimiter.into(),
            style: None,
        }
    }

    /// Effective marker style.
    pub fn style(&self) -> MarkerStyle {
        self.style
            .unwrap_or_else(|| MarkerStyle::for_path(&self.path))
    }
}

fn default_sources() -> Vec<TargetSpec> {
    [
        ("oqsprov/oqsencoders.inc", C_DELIMITER),
        ("oqsprov/oqsdecoders.inc", C_DELIMITER),
        ("oqsprov/oqs_prov.h", C_DELIMITER),
        ("oqsprov/oqsprov.c", C_DELIMITER),
        ("oqsprov/oqsprov_capabilities.c", C_DELIMITER),
        ("oqsprov/oqs_kmgmt.c", C_DELIMITER),
        ("oqsprov/oqs_encode_key2any.c", C_DELIMITER),
        ("oqsprov/oqs_decode_der2key.c", C_DELIMITER),
        ("oqsprov/oqsprov_keys.c", C_DELIMITER),
        ("scripts/common.py", PY_DELIMITER),
        ("test/test_common.c", C_DELIMITER),
    ]
    .into_iter()
    .map(|(path, delimiter)| TargetSpec::new(path, delimiter))
    .collect()
}

fn default_docs() -> Vec<TargetSpec> {
    vec![
        TargetSpec::new("ALGORITHMS.md", MD_DELIMITER),
        TargetSpec::new("README.md", MD_DELIMITER),
    ]
}

impl GeneratorSettings {
    /// Template directory under the provider root.
    pub fn template_dir(&self, provider_root: &Path) -> PathBuf {
        provider_root.join(&self.paths.template_dir)
    }

    /// Catalog file under the provider root.
    pub fn catalog_path(&self, provider_root: &Path) -> PathBuf {
        self.template_dir(provider_root).join(&self.paths.catalog)
    }
}

// ---------------------------------------------------------------------------
// Settings loading
// ---------------------------------------------------------------------------

/// Path of the settings file for a provider checkout.
pub fn settings_file_path(provider_root: &Path) -> PathBuf {
    provider_root.join(SETTINGS_FILE_NAME)
}

/// Load settings for a provider checkout. Returns defaults if the file does not exist.
pub fn load_settings(provider_root: &Path) -> Result<GeneratorSettings> {
    let path = settings_file_path(provider_root);

    if !path.exists() {
        tracing::debug!(?path, "settings file not found, using defaults");
        return Ok(GeneratorSettings::default());
    }

    load_settings_from(&path)
}

/// Load settings from a specific file path.
pub fn load_settings_from(path: &Path) -> Result<GeneratorSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))?;

    let settings: GeneratorSettings = toml::from_str(&content).map_err(|e| {
        GeneratorError::settings(format!("failed to parse {}: {e}", path.display()))
    })?;

    check_targets(&settings)?;
    Ok(settings)
}

/// Write a default settings file into the provider root.
/// Returns the path to the created file.
pub fn init_settings(provider_root: &Path) -> Result<PathBuf> {
    let path = settings_file_path(provider_root);
    if path.exists() {
        return Err(GeneratorError::settings(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&GeneratorSettings::default())
        .map_err(|e| GeneratorError::settings(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| GeneratorError::io(&path, e))?;
    tracing::info!(?path, "created default settings file");

    Ok(path)
}

/// Resolve the datasheet root from the configured environment variable.
pub fn datasheet_root(settings: &GeneratorSettings) -> Result<PathBuf> {
    let var = &settings.datasheets.root_env;
    match std::env::var_os(var) {
        Some(val) if !val.is_empty() => Ok(PathBuf::from(val)),
        _ => Err(GeneratorError::MissingEnvironment { var: var.clone() }),
    }
}

/// Reject target lists that would splice the same file twice or with no delimiter.
fn check_targets(settings: &GeneratorSettings) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for target in settings.sources.iter().chain(&settings.docs) {
        if target.delimiter.trim().is_empty() {
            return Err(GeneratorError::settings(format!(
                "target {} has an empty delimiter",
                target.path
            )));
        }
        if !seen.insert(target.path.as_str()) {
            return Err(GeneratorError::settings(format!(
                "target {} is listed more than once",
                target.path
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serialize() {
        let settings = GeneratorSettings::default();
        let toml_str = toml::to_string_pretty(&settings).expect("serialize default settings");
        assert!(toml_str.contains("template_dir"));
        assert!(toml_str.contains("LIBOQS_SRC_DIR"));
        assert!(toml_str.contains("oqsprov/oqs_prov.h"));
    }

    #[test]
    fn settings_roundtrip() {
        let settings = GeneratorSettings::default();
        let toml_str = toml::to_string_pretty(&settings).expect("serialize");
        let parsed: GeneratorSettings = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.paths.catalog, "generate.yml");
        assert_eq!(parsed.sources, settings.sources);
        assert_eq!(parsed.docs, settings.docs);
    }

    #[test]
    fn default_targets_cover_sources_and_docs() {
        let settings = GeneratorSettings::default();
        assert_eq!(settings.sources.len(), 11);
        assert!(
            settings
                .sources
                .iter()
                .any(|t| t.path == "scripts/common.py" && t.delimiter == "#####")
        );
        assert!(settings.sources.iter().all(|t| t.style() == MarkerStyle::Source));
        assert!(settings.docs.iter().all(|t| t.style() == MarkerStyle::Document));
    }

    #[test]
    fn settings_with_custom_targets() {
        let toml_str = r#"
[paths]
template_dir = "templates"

[[sources]]
path = "gen/groups.h"
delimiter = "//"

[[docs]]
path = "docs/ALGS.txt"
delimiter = "<!---"
style = "document"
"#;
        let settings: GeneratorSettings = toml::from_str(toml_str).expect("parse");
        assert_eq!(settings.paths.template_dir, "templates");
        assert_eq!(settings.paths.catalog, "generate.yml");
        assert_eq!(settings.sources.len(), 1);
        assert_eq!(settings.docs[0].style(), MarkerStyle::Document);
        assert_eq!(
            settings.catalog_path(Path::new("/p")),
            PathBuf::from("/p/templates/generate.yml")
        );
    }

    #[test]
    fn duplicate_targets_rejected() {
        let settings = GeneratorSettings {
            sources: vec![TargetSpec::new("a.c", "/////"), TargetSpec::new("a.c", "/////")],
            ..GeneratorSettings::default()
        };
        let err = check_targets(&settings).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn missing_datasheet_env() {
        let mut settings = GeneratorSettings::default();
        // Use a unique env var name to avoid interfering with other tests
        settings.datasheets.root_env = "OQSGEN_TEST_NONEXISTENT_ROOT_12345".into();
        let err = datasheet_root(&settings).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingEnvironment { .. }));
        assert!(err.to_string().contains("OQSGEN_TEST_NONEXISTENT_ROOT_12345"));
    }

    #[test]
    fn init_then_load_from_provider_root() {
        let root = std::env::temp_dir().join(format!("oqsgen-settings-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&root).unwrap();

        assert_eq!(load_settings(&root).unwrap().sources.len(), 11);

        let path = init_settings(&root).unwrap();
        assert_eq!(path, root.join("oqsgen.toml"));
        let loaded = load_settings(&root).unwrap();
        assert_eq!(loaded.docs, GeneratorSettings::default().docs);

        let err = init_settings(&root).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let _ = std::fs::remove_dir_all(&root);
    }
}
