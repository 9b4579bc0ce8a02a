//! End-to-end generation: catalog → resolve → validate → populate targets.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use oqsgen_catalog::{CodePointReport, LoadOptions, load_catalog, validate_code_points};
use oqsgen_datasheet::{FsDatasheets, resolve_catalog};
use oqsgen_shared::{Catalog, GeneratorSettings, Result, TargetSpec};
use oqsgen_templater::{PopulateOutcome, SpliceMode, Templater};

/// Inputs for one generator run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Root of the provider checkout; targets are relative to it.
    pub provider_root: PathBuf,
    pub settings: GeneratorSettings,
    /// Root of the liboqs tree holding `docs/algorithms`.
    pub datasheet_root: PathBuf,
}

/// Which filtering a catalog is loaded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogVariant {
    /// Enabled entries only; drives generated sources.
    Production,
    /// Also keeps disabled signatures; drives documentation.
    Documentation,
}

impl CatalogVariant {
    fn load_options(self) -> LoadOptions {
        match self {
            Self::Production => LoadOptions::production(),
            Self::Documentation => LoadOptions::documentation(),
        }
    }
}

/// Outcome of a validation-only run.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub kems: usize,
    pub hybrids: usize,
    pub sigs: usize,
    /// Signatures left at security 0.
    pub unresolved_sigs: usize,
    pub code_points: CodePointReport,
}

/// Outcome of a full generation run.
#[derive(Debug)]
pub struct GenerateResult {
    pub sources: Vec<PopulateOutcome>,
    pub docs: Vec<PopulateOutcome>,
    pub code_points: CodePointReport,
    pub elapsed: Duration,
}

impl GenerateResult {
    /// Targets whose content changed on disk.
    pub fn written(&self) -> usize {
        self.sources
            .iter()
            .chain(&self.docs)
            .filter(|o| o.changed)
            .count()
    }
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each target is populated.
    fn target_done(&self, outcome: &PopulateOutcome, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, result: &GenerateResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn target_done(&self, _outcome: &PopulateOutcome, _current: usize, _total: usize) {}
    fn done(&self, _result: &GenerateResult) {}
}

/// Load and resolve the catalog for `variant`.
#[instrument(skip_all, fields(variant = ?variant))]
pub fn prepare_catalog(config: &GenerateConfig, variant: CatalogVariant) -> Result<Catalog> {
    let path = config.settings.catalog_path(&config.provider_root);
    let catalog = load_catalog(&path, variant.load_options())?;
    let mut datasheets = FsDatasheets::new(&config.datasheet_root);
    resolve_catalog(catalog, &mut datasheets)
}

/// Load, resolve and validate the production catalog without writing.
#[instrument(skip_all, fields(root = %config.provider_root.display()))]
pub fn check(config: &GenerateConfig) -> Result<CheckResult> {
    let catalog = prepare_catalog(config, CatalogVariant::Production)?;
    let code_points = validate_code_points(&catalog)?;

    let unresolved_sigs = catalog
        .sigs
        .iter()
        .flat_map(|f| &f.variants)
        .filter(|v| v.security == 0)
        .count();

    Ok(CheckResult {
        kems: catalog.kems.len(),
        hybrids: catalog.hybrid_count(),
        sigs: catalog.sig_count(),
        unresolved_sigs,
        code_points,
    })
}

/// Run the full generator.
///
/// 1. Production catalog: load, resolve, validate
/// 2. Splice every source target incrementally
/// 3. Documentation catalog: load, resolve
/// 4. Rewrite every documentation target from its base template
///
/// Targets are written as they are processed; a failure part-way leaves
/// earlier targets updated.
#[instrument(skip_all, fields(root = %config.provider_root.display()))]
pub fn generate(config: &GenerateConfig, progress: &dyn ProgressReporter) -> Result<GenerateResult> {
    let start = Instant::now();
    let template_dir = config.settings.template_dir(&config.provider_root);

    // --- Phase 1: production catalog ---
    progress.phase("Resolving production catalog");
    let production = prepare_catalog(config, CatalogVariant::Production)?;
    let code_points = validate_code_points(&production)?;
    info!(
        claimed = code_points.claimed,
        next_free = ?code_points.next_free,
        "code points validated"
    );

    // --- Phase 2: sources ---
    progress.phase("Generating sources");
    let templater = Templater::new(&config.provider_root, &template_dir, &production)?;
    let sources = populate_all(
        &templater,
        &config.settings.sources,
        SpliceMode::Incremental,
        progress,
    )?;

    // --- Phase 3: documentation catalog ---
    progress.phase("Resolving documentation catalog");
    let documentation = prepare_catalog(config, CatalogVariant::Documentation)?;

    // --- Phase 4: docs ---
    progress.phase("Generating documentation");
    let templater = Templater::new(&config.provider_root, &template_dir, &documentation)?;
    let docs = populate_all(
        &templater,
        &config.settings.docs,
        SpliceMode::FullRewrite,
        progress,
    )?;

    let result = GenerateResult {
        sources,
        docs,
        code_points,
        elapsed: start.elapsed(),
    };
    info!(
        written = result.written(),
        elapsed_ms = result.elapsed.as_millis() as u64,
        "generation complete"
    );
    progress.done(&result);
    Ok(result)
}

fn populate_all(
    templater: &Templater,
    targets: &[TargetSpec],
    mode: SpliceMode,
    progress: &dyn ProgressReporter,
) -> Result<Vec<PopulateOutcome>> {
    let mut outcomes = Vec::with_capacity(targets.len());
    for (i, target) in targets.iter().enumerate() {
        let outcome = templater.populate(target, mode)?;
        progress.target_done(&outcome, i + 1, targets.len());
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
