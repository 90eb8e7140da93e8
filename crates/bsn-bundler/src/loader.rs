//! Reading module sources.
//!
//! Every selected module is read concurrently and the results come back in selection
//! order. The first failed read fails the whole load; sibling reads still in flight are
//! left to finish and their results are dropped.

use anyhow::{Context, Result};
use futures::future::try_join_all;
use log::{debug, trace};
use std::future::Future;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::names::ModuleName;

/// Shared helpers prepended to every bundle
pub const UTILITIES_FILE: &str = "utils.js";

/// Initialization code appended after the module bodies
pub const INIT_FILE: &str = "utils-init.js";

/// Where module sources come from.
///
/// The filesystem implementation is [`FsModuleSource`]; tests plug in in-memory sources
/// to control read timing and to observe which files were touched.
pub trait ModuleSource: Sync {
    /// File names directly inside the module directory, in any order
    fn file_names(&self) -> Result<Vec<String>>;

    /// Read one file from the module directory as UTF-8 text
    fn read(&self, file_name: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Module sources stored as files in a single directory
#[derive(Debug, Clone)]
pub struct FsModuleSource {
    lib_dir: PathBuf,
}

impl FsModuleSource {
    pub fn new(lib_dir: impl Into<PathBuf>) -> Self {
        Self {
            lib_dir: lib_dir.into(),
        }
    }

    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }
}

impl ModuleSource for FsModuleSource {
    fn file_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.lib_dir).min_depth(1).max_depth(1) {
            let entry = entry.with_context(|| {
                format!("Failed to list module directory: {:?}", self.lib_dir)
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_owned());
            } else {
                debug!("Skipping non UTF-8 file name: {:?}", entry.path());
            }
        }
        Ok(names)
    }

    fn read(&self, file_name: &str) -> impl Future<Output = Result<String>> + Send {
        let path = self.lib_dir.join(file_name);
        async move {
            trace!("Reading {:?}", path);
            tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {:?}", path))
        }
    }
}

/// Source text of one selected module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContent {
    pub name: ModuleName,
    pub text: String,
}

/// The two fixed auxiliary files wrapped around the module bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportFiles {
    pub utilities: String,
    pub init: String,
}

/// Read every module concurrently, returning contents in the order of `modules`
pub async fn load_modules<S: ModuleSource>(
    source: &S,
    modules: &[ModuleName],
) -> Result<Vec<ModuleContent>> {
    debug!("Loading {} module sources", modules.len());
    let reads = modules.iter().map(|name| async move {
        let text = source
            .read(&name.file_name())
            .await
            .with_context(|| format!("Failed to load module {}", name))?;
        Ok::<_, anyhow::Error>(ModuleContent {
            name: name.clone(),
            text,
        })
    });
    try_join_all(reads).await
}

/// Read the utilities and initialization files
pub async fn load_support_files<S: ModuleSource>(source: &S) -> Result<SupportFiles> {
    let (utilities, init) = futures::try_join!(
        source.read(UTILITIES_FILE),
        source.read(INIT_FILE)
    )?;
    Ok(SupportFiles { utilities, init })
}
