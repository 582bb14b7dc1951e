// this_file: crates/mushaf-batch/src/orchestrator.rs

//! Parallel variant builds.
//!
//! Each variant runs through resolve, assemble, subset and package on its
//! own. The book and the registry are shared read-only; nothing a variant
//! produces is visible to another. One variant failing never stops the
//! rest, and the report comes back sorted by variant id whatever order
//! the workers finished in.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;

use mushaf_assemble::Assembler;
use mushaf_core::config::{BuildConfig, VariantId};
use mushaf_core::content::Book;
use mushaf_core::error::{MushafError, RegistryError, SubsetError};
use mushaf_core::glyph::{FontResource, SubsetStats};
use mushaf_core::switches;
use mushaf_core::traits::Packager;
use mushaf_fontdb::{CompatibilityRegistry, FontLibrary};
use mushaf_subset::Subsetter;

use crate::manifest::{Manifest, ManifestError};
use crate::report::BuildReport;

/// Overrides for the process-wide switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrchestratorOptions {
    /// Worker count; `None` follows `MUSHAF_THREADS`
    pub threads: Option<usize>,
    /// Subset cache; `None` follows `MUSHAF_SUBSET_CACHE`
    pub subset_cache: Option<bool>,
}

/// Progress after each finished variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub completed: usize,
    pub total: usize,
    pub variant: VariantId,
    pub success: bool,
}

type ProgressFn = dyn Fn(ProgressUpdate) + Send + Sync;

pub struct Orchestrator {
    registry: Arc<CompatibilityRegistry>,
    book: Arc<Book>,
    library: FontLibrary,
    packager: Arc<dyn Packager>,
    assembler: Assembler,
    subsetter: Subsetter,
    threads: usize,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<CompatibilityRegistry>,
        book: Arc<Book>,
        library: FontLibrary,
        packager: Arc<dyn Packager>,
    ) -> Self {
        Self::with_options(
            registry,
            book,
            library,
            packager,
            OrchestratorOptions::default(),
        )
    }

    pub fn with_options(
        registry: Arc<CompatibilityRegistry>,
        book: Arc<Book>,
        library: FontLibrary,
        packager: Arc<dyn Packager>,
        options: OrchestratorOptions,
    ) -> Self {
        let subsetter = match options.subset_cache {
            Some(enabled) => Subsetter::with_cache(enabled),
            None => Subsetter::new(),
        };
        let threads = options
            .threads
            .filter(|n| *n > 0)
            .unwrap_or_else(switches::worker_threads);

        Self {
            registry,
            book,
            library,
            packager,
            assembler: Assembler::new(),
            subsetter,
            threads,
        }
    }

    /// Replace the assembler, e.g. to set a custom book title
    pub fn with_assembler(mut self, assembler: Assembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn subsetter(&self) -> &Subsetter {
        &self.subsetter
    }

    /// Build every variant; one report per config, sorted by variant id.
    pub fn run(&self, configs: &[BuildConfig]) -> Vec<BuildReport> {
        self.run_internal(configs, None)
    }

    /// Build every variant while reporting progress.
    pub fn run_with_progress<F>(&self, configs: &[BuildConfig], progress: F) -> Vec<BuildReport>
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.run_internal(configs, Some(Arc::new(progress)))
    }

    /// Validate a manifest, then build its variants.
    pub fn run_manifest(&self, manifest: &Manifest) -> Result<Vec<BuildReport>, ManifestError> {
        manifest.validate()?;
        Ok(self.run(&manifest.variants))
    }

    fn run_internal(
        &self,
        configs: &[BuildConfig],
        progress: Option<Arc<ProgressFn>>,
    ) -> Vec<BuildReport> {
        if configs.is_empty() {
            return Vec::new();
        }

        let start = Instant::now();
        let total = configs.len();
        let counter = AtomicUsize::new(0);
        log::info!(
            "Building {} variant(s) on {} worker(s)",
            total,
            self.threads
        );

        let work = || -> Vec<BuildReport> {
            configs
                .par_iter()
                .map(|config| {
                    let report = self.build_variant(config);
                    if let Some(callback) = progress.as_ref() {
                        let completed = counter.fetch_add(1, Ordering::SeqCst) + 1;
                        callback(ProgressUpdate {
                            completed,
                            total,
                            variant: report.variant.clone(),
                            success: report.is_success(),
                        });
                    }
                    report
                })
                .collect()
        };

        let mut reports = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
        {
            Ok(pool) => pool.install(work),
            Err(e) => {
                log::warn!("Cannot size worker pool ({}); using the global pool", e);
                work()
            },
        };

        reports.sort_by(|a, b| a.variant.cmp(&b.variant));

        let failed = reports.iter().filter(|r| !r.is_success()).count();
        log::info!(
            "Built {} of {} variant(s) in {:.2?}",
            total - failed,
            total,
            start.elapsed()
        );
        reports
    }

    /// Run one variant and turn its outcome into a report line.
    pub fn build_variant(&self, config: &BuildConfig) -> BuildReport {
        match self.try_build(config) {
            Ok(report) => report,
            Err(e) => {
                log::warn!("Variant {} failed: {}", config.id, e);
                BuildReport::failure(config.id.clone(), &e)
            },
        }
    }

    fn try_build(&self, config: &BuildConfig) -> Result<BuildReport, MushafError> {
        let assignment = self.registry.resolve(config)?;
        let assembly = self.assembler.assemble(&self.book, config, assignment)?;

        let mut resources: Vec<FontResource> = Vec::new();
        let mut stats: Vec<SubsetStats> = Vec::new();
        for font in assignment.fonts() {
            // A role nothing was set in needs no program and ships no font
            if !assembly
                .fragments
                .iter()
                .any(|fragment| fragment.spans_for_font(font).next().is_some())
            {
                log::debug!("Variant {}: no spans in {}, skipped", config.id, font);
                continue;
            }
            let descriptor = self
                .registry
                .descriptor(font)
                .ok_or(RegistryError::UnknownFont(font))?;
            let program = self
                .library
                .get(font)
                .ok_or(SubsetError::FontUnavailable(font))?;
            let (resource, font_stats) =
                self.subsetter
                    .subset_fragments(descriptor, &*program, &assembly.fragments)?;
            resources.push(resource);
            stats.push(font_stats);
        }

        // Only a fully verified variant reaches the packager
        let artifact =
            self.packager
                .package(config, &assembly.fragments, &assembly.nav, &resources)?;

        log::info!(
            "Variant {} packaged by {} at {}",
            config.id,
            self.packager.name(),
            artifact.location
        );

        Ok(BuildReport::success(
            config.id.clone(),
            artifact,
            stats,
            assembly.placeholder_count(),
        ))
    }
}
