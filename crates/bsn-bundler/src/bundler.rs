use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{self, Write};

use crate::config::Config;
use crate::finalize::{Emit, emit, finalize};
use crate::loader::{FsModuleSource, ModuleSource, load_modules, load_support_files};
use crate::minify::{CommandMinifier, Minifier};
use crate::release::ReleaseInfo;
use crate::selection::{Selection, SelectionError, SelectionFilter, resolve};
use crate::template::BundleTemplate;
use crate::universe::ModuleUniverse;

/// Per-run options, validated at construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub filter: SelectionFilter,
    pub minify: bool,
    pub emit: Emit,
}

impl BuildOptions {
    /// Take `only`, `ignore` and `minify` from the configuration.
    ///
    /// Fails when both `only` and `ignore` are set, before anything is read.
    pub fn from_config(config: &Config, emit: Emit) -> Result<Self, SelectionError> {
        Ok(Self {
            filter: SelectionFilter::from_lists(
                config.only.as_deref(),
                config.ignore.as_deref(),
            )?,
            minify: config.minify(),
            emit,
        })
    }
}

/// Runs the selection, loading, templating and finalizing stages for one build
pub struct Bundler<S = FsModuleSource> {
    source: S,
    release: ReleaseInfo,
    minifier: Box<dyn Minifier + Send + Sync>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for Bundler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("source", &self.source)
            .field("release", &self.release)
            .finish_non_exhaustive()
    }
}

impl Bundler<FsModuleSource> {
    /// Bundler reading modules from the configured directory.
    ///
    /// Reads the package manifest when version or license are not configured.
    pub fn new(config: &Config) -> Result<Self> {
        let release = ReleaseInfo::resolve(config)?;
        let minifier = CommandMinifier::from_command(&config.minifier_command())?;
        let source = FsModuleSource::new(config.lib_dir());
        Ok(Self::with_source(source, release).with_minifier(minifier))
    }
}

impl<S: ModuleSource> Bundler<S> {
    pub fn with_source(source: S, release: ReleaseInfo) -> Self {
        Self {
            source,
            release,
            minifier: Box::new(CommandMinifier::default()),
        }
    }

    #[must_use]
    pub fn with_minifier(mut self, minifier: impl Minifier + Send + Sync + 'static) -> Self {
        self.minifier = Box::new(minifier);
        self
    }

    pub fn release(&self) -> &ReleaseInfo {
        &self.release
    }

    /// Discover the module universe and resolve `filter` against it
    pub fn select(&self, filter: &SelectionFilter) -> Result<Selection> {
        let universe = ModuleUniverse::discover(&self.source)?;
        debug!("Module universe has {} modules", universe.len());
        Ok(resolve(&universe, filter)?)
    }

    /// Build the artifact and always return it, ignoring `options.emit`
    pub async fn bundle_to_string(&self, options: &BuildOptions) -> Result<String> {
        let selection = self.select(&options.filter)?;
        self.announce(&selection, options.minify);

        let (modules, support) = futures::try_join!(
            load_modules(&self.source, &selection.modules),
            load_support_files(&self.source)
        )?;

        let rendered = BundleTemplate {
            release: &self.release,
            utilities: &support.utilities,
            modules: &modules,
            init: &support.init,
        }
        .render();

        let minifier: Option<&dyn Minifier> = if options.minify {
            Some(&*self.minifier)
        } else {
            None
        };
        finalize(rendered, minifier)
    }

    /// Build the artifact and deliver it per `options.emit`: written to stdout, or
    /// returned as `Some`
    pub async fn build(&self, options: &BuildOptions) -> Result<Option<String>> {
        let artifact = self.build_artifact(options).await?;
        emit(artifact, options.emit, io::stdout().lock())
    }

    /// Like [`Bundler::build`] with an explicit sink standing in for stdout
    pub async fn build_into<W: Write>(
        &self,
        options: &BuildOptions,
        out: W,
    ) -> Result<Option<String>> {
        let artifact = self.build_artifact(options).await?;
        emit(artifact, options.emit, out)
    }

    async fn build_artifact(&self, options: &BuildOptions) -> Result<String> {
        self.bundle_to_string(options)
            .await
            .context("Bundle build failed")
    }

    /// Build summary on the diagnostics channel
    fn announce(&self, selection: &Selection, minify: bool) {
        info!(
            "Building {} {} ..",
            self.release.product,
            self.release.tagged_version()
        );
        info!("{}", if minify { "Minified Build" } else { "Unminified Build" });
        info!(
            "Included modules ({}):\n  {}",
            selection.modules.len(),
            selection
                .modules
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n  ")
        );
    }
}
