//! A project on disk and the build operations run against it.
//!
//! ```text
//! mw-gadgets.toml ─→ ProjectConfig
//! manifest ───────→ select ─→ schedule ─┐
//! src/mediawiki/ ─→ interface units ────┴─→ BuildPlan ─→ entrypoint / rollup
//! ```
//!
//! Planning never fails on bad gadgets: exclusions, unresolved units and a
//! failed interface scan are carried in the [`BuildPlan`] for reporting.

use crate::bundle::DistBundle;
use crate::config::{self, ConfigError, Engine, ProjectConfig};
use crate::emit::{self, EmitError, EmitEvent, EmitMode, EmitReport};
use crate::inputs::{self, BundleInputs};
use crate::manifest::{ManifestError, load_manifest};
use crate::payload::{CompileSources, HashSource, PayloadCompiler, Strategy};
use crate::schedule::{Schedule, Unresolved, resolve};
use crate::select::{Exclusion, select_units};
use crate::source::FsSourceTree;
use crate::transform::{Esbuild, Passthrough, Transform};
use crate::types::BuildUnit;
use crate::urls::{OriginError, StaticUrls};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Origin(#[from] OriginError),
    #[error("Emit error: {0}")]
    Emit(#[from] EmitError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything needed to emit, plus what was left out and why.
#[derive(Debug, Default)]
pub struct BuildPlan {
    pub schedule: Schedule,
    pub interface: Vec<BuildUnit>,
    pub excluded: Vec<Exclusion>,
    pub unresolved: Vec<Unresolved>,
    /// Set when `mediawiki/` could not be read; the plan has no interface code.
    pub interface_error: Option<walkdir::Error>,
}

/// How to build the entrypoint.
#[derive(Debug, Clone, Copy)]
pub struct EntrypointOptions {
    pub mode: EmitMode,
    pub strategy: Strategy,
    pub minify: bool,
    /// Point URLs at the preview server instead of the dev server.
    pub preview: bool,
}

#[derive(Debug)]
pub struct RollupReport {
    pub bundles: EmitReport,
    pub entrypoint: EmitReport,
    pub assets_copied: usize,
}

#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
    tree: FsSourceTree,
}

impl Project {
    /// Load `mw-gadgets.toml` (if any) from `root`.
    pub fn load(root: &Path) -> Result<Self, BuildError> {
        let config = config::load_config(root)?;
        Ok(Self::with_config(root, config))
    }

    pub fn with_config(root: &Path, config: ProjectConfig) -> Self {
        let tree = FsSourceTree::new(config.source_dir(root));
        Self {
            root: root.to_path_buf(),
            config,
            tree,
        }
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.config.dist_path(&self.root)
    }

    pub fn entrypoint_path(&self) -> PathBuf {
        self.config.entrypoint_path(&self.root)
    }

    /// Read the manifest and work out what to build, in which order.
    pub fn plan(&self) -> Result<BuildPlan, BuildError> {
        let manifest = load_manifest(&self.config.manifest_path(&self.root))?;
        let selection = select_units(&manifest, &self.tree);
        let resolution = resolve(selection.candidates);
        let (interface, interface_error) = match self.tree.interface_units() {
            Ok(units) => (units, None),
            Err(e) => (Vec::new(), Some(e)),
        };
        Ok(BuildPlan {
            schedule: resolution.schedule,
            interface,
            excluded: selection.excluded,
            unresolved: resolution.unresolved,
            interface_error,
        })
    }

    /// The transform configured under `[transform]`.
    pub fn transform(&self) -> Box<dyn Transform> {
        match self.config.transform.engine {
            Engine::Esbuild => Box::new(Esbuild::new(&self.config.transform.esbuild_path)),
            Engine::None => Box::new(Passthrough),
        }
    }

    /// Bundler entries and assets for the plan.
    pub fn bundle_inputs(&self, plan: &BuildPlan) -> BundleInputs {
        inputs::map_source_files(plan.schedule.units(), &plan.interface, &self.tree)
    }

    /// Write the entrypoint for `plan`.
    pub fn write_entrypoint<'a>(
        &'a self,
        plan: &BuildPlan,
        options: EntrypointOptions,
        transform: &'a dyn Transform,
        hashes: Box<dyn HashSource + 'a>,
        on_event: impl FnMut(&EmitEvent),
    ) -> Result<EmitReport, BuildError> {
        let urls = StaticUrls::new(self.config.origin(options.preview))?;
        let bundle = DistBundle::new(self.dist_dir());
        let entrypoint = self.entrypoint_path();
        let mut compiler = PayloadCompiler::new(
            &self.config.namespace,
            options.strategy,
            options.minify,
            CompileSources {
                tree: &self.tree,
                bundle: &bundle,
                urls: &urls,
                transform,
                entrypoint: &entrypoint,
            },
            hashes,
        );
        Ok(emit::write_entrypoint(
            &entrypoint,
            plan.schedule.units(),
            &plan.interface,
            options.mode,
            &mut compiler,
            on_event,
        )?)
    }

    /// Roll every unit up into its own `gadget-impl.js`, copy i18n assets
    /// and point a reference entrypoint at the bundles that were written.
    ///
    /// Bundles are served from the preview server.
    pub fn rollup<'a>(
        &'a self,
        plan: &BuildPlan,
        minify: bool,
        transform: &'a dyn Transform,
        hashes: Box<dyn HashSource + 'a>,
        mut on_event: impl FnMut(&EmitEvent),
    ) -> Result<RollupReport, BuildError> {
        let dist = self.dist_dir();
        let urls = StaticUrls::new(self.config.origin(true))?;
        let bundle = DistBundle::new(&dist);
        let entrypoint = self.entrypoint_path();
        let mut compiler = PayloadCompiler::new(
            &self.config.namespace,
            Strategy::Inline,
            minify,
            CompileSources {
                tree: &self.tree,
                bundle: &bundle,
                urls: &urls,
                transform,
                entrypoint: &entrypoint,
            },
            hashes,
        );

        let bundles = emit::write_unit_bundles(
            &dist,
            plan.schedule.units(),
            &plan.interface,
            &mut compiler,
            &mut on_event,
        )?;

        let written = |unit: &&BuildUnit| bundles.written.contains(&unit.id());
        let units: Vec<BuildUnit> = plan.schedule.units().iter().filter(written).cloned().collect();
        let interface: Vec<BuildUnit> = plan.interface.iter().filter(written).cloned().collect();
        let entrypoint = emit::write_entrypoint(
            &entrypoint,
            &units,
            &interface,
            EmitMode::Reference,
            &mut compiler,
            &mut on_event,
        )?;

        let assets = self.bundle_inputs(plan).assets;
        let assets_copied = inputs::copy_assets(&assets, &dist)?;

        Ok(RollupReport {
            bundles,
            entrypoint,
            assets_copied,
        })
    }
}
