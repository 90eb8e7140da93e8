use anyhow::Result;
use indexmap::IndexSet;
use log::{debug, warn};

use crate::loader::ModuleSource;
use crate::names::{MODULE_FILE_SUFFIX, ModuleName};

/// Every module available in the module directory for this run, ordered by file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleUniverse {
    modules: IndexSet<ModuleName>,
}

impl ModuleUniverse {
    /// List the module directory. Files without the module suffix are ignored.
    pub fn discover<S: ModuleSource>(source: &S) -> Result<Self> {
        let mut file_names: Vec<String> = source
            .file_names()?
            .into_iter()
            .filter(|name| name.ends_with(MODULE_FILE_SUFFIX))
            .collect();
        file_names.sort();
        debug!("Discovered module files: {:?}", file_names);
        Ok(file_names.iter().map(String::as_str).collect())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleName> {
        self.modules.iter()
    }

    /// The universe's own spelling of `name`, if it is a member
    pub fn get(&self, name: &ModuleName) -> Option<&ModuleName> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &ModuleName) -> bool {
        self.modules.contains(name)
    }
}

impl<'a> FromIterator<&'a str> for ModuleUniverse {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut modules = IndexSet::new();
        for raw in iter {
            let name = ModuleName::new(raw);
            if let Some(existing) = modules.get(&name) {
                warn!("{} collides with {}, keeping the first", raw, existing);
                continue;
            }
            modules.insert(name);
        }
        Self { modules }
    }
}
