//! Choosing which modules end up in the bundle.

use log::{debug, warn};
use thiserror::Error;

use crate::names::{ModuleName, normalize_names};
use crate::universe::ModuleUniverse;

/// Fatal problems with the requested module selection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("You cannot specify both --only and --ignore")]
    ConflictingFilters,
    #[error("No valid module names, aborting")]
    EmptySelection,
}

/// Which modules to take from the universe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionFilter {
    /// Every module, in universe order
    #[default]
    All,
    /// Exactly these modules, in this order
    AllowList(Vec<ModuleName>),
    /// Every module except these, in universe order
    DenyList(Vec<ModuleName>),
}

impl SelectionFilter {
    /// Build a filter from raw `only` / `ignore` lists.
    ///
    /// Supplying both is rejected here, so no later stage ever sees a combined state.
    /// An empty `only` list is still an allow-list and resolves to nothing.
    pub fn from_lists<S: AsRef<str>>(
        only: Option<&[S]>,
        ignore: Option<&[S]>,
    ) -> Result<Self, SelectionError> {
        match (only, ignore) {
            (Some(_), Some(_)) => Err(SelectionError::ConflictingFilters),
            (Some(only), None) => Ok(Self::AllowList(normalize_names(only))),
            (None, Some(ignore)) => Ok(Self::DenyList(normalize_names(ignore))),
            (None, None) => Ok(Self::All),
        }
    }
}

/// Result of resolving a filter against the universe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Modules to bundle, never empty
    pub modules: Vec<ModuleName>,
    /// Allow-list entries that did not name a module
    pub rejected: Vec<ModuleName>,
}

/// Compute the ordered module list for `filter`.
///
/// Unknown allow-list entries are warned about and dropped. Duplicate allow-list entries
/// are kept as given.
pub fn resolve(
    universe: &ModuleUniverse,
    filter: &SelectionFilter,
) -> Result<Selection, SelectionError> {
    let mut rejected = Vec::new();
    let modules: Vec<ModuleName> = match filter {
        SelectionFilter::All => universe.iter().cloned().collect(),
        SelectionFilter::AllowList(requested) => requested
            .iter()
            .filter_map(|name| match universe.get(name) {
                Some(known) => Some(known.clone()),
                None => {
                    warn!("{} is not a valid module name, continuing", name);
                    rejected.push(name.clone());
                    None
                }
            })
            .collect(),
        SelectionFilter::DenyList(denied) => {
            for name in denied.iter().filter(|name| !universe.contains(*name)) {
                debug!("Ignored module {} is not in the module directory", name);
            }
            universe
                .iter()
                .filter(|name| !denied.contains(*name))
                .cloned()
                .collect()
        }
    };

    if modules.is_empty() {
        return Err(SelectionError::EmptySelection);
    }

    Ok(Selection { modules, rejected })
}
