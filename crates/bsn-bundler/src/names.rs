use cow_utils::CowUtils;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Suffix every module source file carries, e.g. `alert-native.js`
pub const MODULE_FILE_SUFFIX: &str = "-native.js";

/// Marker users sometimes keep when naming modules on the command line
const NATIVE_MARKER: &str = "-native";

/// A module identifier compared without regard to case.
///
/// The display form is kept as normalized (`Alert`, `ScrollSpy`), while equality and
/// hashing go through the lowercased form so `alert`, `Alert` and `alert-native.js`
/// all name the same module.
#[derive(Debug, Clone)]
pub struct ModuleName(String);

impl ModuleName {
    /// Normalize a raw name (user input or file name) into a module name
    pub fn new(raw: &str) -> Self {
        Self(normalize_name(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The file holding this module's source, relative to the module directory
    pub fn file_name(&self) -> String {
        format!("{}{}", self.0.cow_to_lowercase(), MODULE_FILE_SUFFIX)
    }

    fn key(&self) -> Cow<'_, str> {
        self.0.cow_to_lowercase()
    }
}

impl PartialEq for ModuleName {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ModuleName {}

impl Hash for ModuleName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Strip the `-native.js` / `-native` suffix and upper-case the first character.
///
/// Anything else passes through untouched; validity is decided later against the
/// module universe.
pub fn normalize_name(raw: &str) -> String {
    let stem = raw
        .strip_suffix(MODULE_FILE_SUFFIX)
        .or_else(|| raw.strip_suffix(NATIVE_MARKER))
        .unwrap_or(raw);

    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Normalize a batch of raw names, preserving order and duplicates
pub fn normalize_names<I, S>(raw: I) -> Vec<ModuleName>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter().map(|s| ModuleName::new(s.as_ref())).collect()
}
