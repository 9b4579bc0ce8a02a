//! Per-target population: discover, render, splice, write.

use std::path::{Path, PathBuf};

use tera::Context;
use tracing::{debug, info, instrument};

use oqsgen_shared::{Catalog, GeneratorError, Result, TargetSpec};

use crate::fragments::{base_template_path, discover_fragments};
use crate::render::{FragmentRenderer, catalog_context};
use crate::splice::{Markers, SpliceMode, splice};

/// Result of populating one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulateOutcome {
    /// Absolute path of the written (or unchanged) target.
    pub path: PathBuf,
    /// Fragments spliced in.
    pub fragments: usize,
    /// Whether the file on disk changed.
    pub changed: bool,
}

/// Splices fragments into targets under one provider root.
pub struct Templater {
    provider_root: PathBuf,
    template_dir: PathBuf,
    context: Context,
}

impl Templater {
    /// Prepare a templater rendering against `catalog`.
    pub fn new(
        provider_root: impl Into<PathBuf>,
        template_dir: impl Into<PathBuf>,
        catalog: &Catalog,
    ) -> Result<Self> {
        Ok(Self {
            provider_root: provider_root.into(),
            template_dir: template_dir.into(),
            context: catalog_context(catalog)?,
        })
    }

    /// Render every fragment of `target` into its content and write it back.
    #[instrument(skip_all, fields(target = %target.path, mode = ?mode))]
    pub fn populate(&self, target: &TargetSpec, mode: SpliceMode) -> Result<PopulateOutcome> {
        let path = self.provider_root.join(&target.path);
        let source_path = match mode {
            SpliceMode::Incremental => path.clone(),
            SpliceMode::FullRewrite => base_template_path(&self.template_dir, &target.path),
        };
        let source = read(&source_path)?;
        let current = match mode {
            SpliceMode::Incremental => Some(source.clone()),
            SpliceMode::FullRewrite => read_if_exists(&path)?,
        };

        let fragments = discover_fragments(&self.template_dir, &target.path)?;
        let renderer = FragmentRenderer::new(&fragments)?;

        let mut contents = source;
        for fragment in &fragments {
            let markers = Markers::new(&target.delimiter, &fragment.identifier, target.style());
            let rendered = renderer.render(&fragment.identifier, &self.context)?;
            contents = splice(&contents, &markers, &rendered, mode, &path)?;
            debug!(fragment = %fragment.identifier, bytes = rendered.len(), "spliced fragment");
        }

        let changed = current.as_deref() != Some(contents.as_str());
        if changed {
            write_atomic(&path, &contents)?;
            info!(fragments = fragments.len(), "target written");
        } else {
            debug!("target unchanged");
        }

        Ok(PopulateOutcome {
            path,
            fragments: fragments.len(),
            changed,
        })
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| GeneratorError::io(path, e))
}

fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(GeneratorError::io(path, e)),
    }
}

/// Write to a sibling temp file, then rename over the target.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| GeneratorError::io(parent, e))?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, contents).map_err(|e| GeneratorError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| GeneratorError::io(path, e))
}
