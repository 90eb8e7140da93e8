use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::combine::Combine;
use crate::dirs::{CONFIG_FILE, system_config_file, user_config_file};
use crate::minify::DEFAULT_MINIFIER;

/// Module directory used when nothing else is configured
pub const DEFAULT_LIB_DIR: &str = "lib/V4";

/// Package manifest providing version and license
pub const DEFAULT_MANIFEST: &str = "package.json";

pub const DEFAULT_PRODUCT: &str = "Native Javascript for Bootstrap 4";

pub const DEFAULT_COPYRIGHT: &str = "dnp_theme";

/// Bundler settings as read from one layer (file, environment or CLI).
///
/// Every field is optional so layers can be combined; the accessors apply defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Directory containing `<name>-native.js` modules, `utils.js` and `utils-init.js`
    pub lib_dir: Option<PathBuf>,

    /// `package.json` to read `version` and `license` from
    pub manifest: Option<PathBuf>,

    /// Overrides the manifest version
    pub version: Option<String>,

    /// Overrides the manifest license
    pub license: Option<String>,

    /// Product name shown in the header line
    pub product: Option<String>,

    /// Copyright holder shown in the header line
    pub copyright: Option<String>,

    /// Whether to compress the bundle body
    pub minify: Option<bool>,

    /// Minifier program followed by its arguments
    pub minifier: Option<Vec<String>>,

    /// Bundle only these modules
    pub only: Option<Vec<String>>,

    /// Bundle every module except these
    pub ignore: Option<Vec<String>>,
}

impl Combine for Config {
    fn combine(self, other: Self) -> Self {
        // `only` and `ignore` are one setting: a layer naming either replaces both
        let (only, ignore) = if self.only.is_some() || self.ignore.is_some() {
            (self.only, self.ignore)
        } else {
            (other.only, other.ignore)
        };

        Self {
            lib_dir: self.lib_dir.combine(other.lib_dir),
            manifest: self.manifest.combine(other.manifest),
            version: self.version.combine(other.version),
            license: self.license.combine(other.license),
            product: self.product.combine(other.product),
            copyright: self.copyright.combine(other.copyright),
            minify: self.minify.combine(other.minify),
            minifier: self.minifier.combine(other.minifier),
            only,
            ignore,
        }
    }
}

/// Parse a boolean value from string, supporting various common formats
fn parse_bool(value: &str) -> Option<bool> {
    use cow_utils::CowUtils;
    match value.cow_to_lowercase().as_ref() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated value, dropping blanks
fn parse_list(value: &str) -> Vec<String> {
    clean_list(value.split(','))
}

/// Trim module list entries and drop the empty ones
pub fn clean_list<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| value.as_ref().trim().to_owned())
        .filter(|value| !value.is_empty())
        .collect()
}

impl Config {
    pub fn lib_dir(&self) -> &Path {
        self.lib_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_LIB_DIR))
    }

    pub fn manifest(&self) -> &Path {
        self.manifest
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_MANIFEST))
    }

    pub fn product(&self) -> &str {
        self.product.as_deref().unwrap_or(DEFAULT_PRODUCT)
    }

    pub fn copyright(&self) -> &str {
        self.copyright.as_deref().unwrap_or(DEFAULT_COPYRIGHT)
    }

    pub fn minify(&self) -> bool {
        self.minify.unwrap_or(false)
    }

    /// The minifier command line, program first
    pub fn minifier_command(&self) -> Vec<String> {
        match &self.minifier {
            Some(command) => command.clone(),
            None => DEFAULT_MINIFIER.iter().map(|&s| s.to_owned()).collect(),
        }
    }

    /// Same settings with `only` and `ignore` run through [`clean_list`]
    #[must_use]
    pub fn with_clean_lists(self) -> Self {
        Self {
            only: self.only.map(clean_list),
            ignore: self.ignore.map(clean_list),
            ..self
        }
    }

    /// Settings from `BSN_*` environment variables
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok();
        Self {
            lib_dir: var("BSN_LIB_DIR").map(PathBuf::from),
            manifest: var("BSN_MANIFEST").map(PathBuf::from),
            version: var("BSN_VERSION"),
            license: var("BSN_LICENSE"),
            product: var("BSN_PRODUCT"),
            copyright: var("BSN_COPYRIGHT"),
            minify: var("BSN_MINIFY").and_then(|value| parse_bool(&value)),
            minifier: var("BSN_MINIFIER")
                .map(|value| value.split_whitespace().map(str::to_owned).collect()),
            only: var("BSN_ONLY").map(|value| parse_list(&value)),
            ignore: var("BSN_IGNORE").map(|value| parse_list(&value)),
        }
    }

    /// Load a single config file from a path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config = toml::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?
            .with_clean_lists();

        config
            .validate()
            .with_context(|| format!("Invalid settings in config file: {:?}", path))?;

        Ok(config)
    }

    fn try_load_and_combine(config: &mut Self, path: &Path, context: &str) -> Result<()> {
        if path.exists() {
            log::debug!("Loading {} from: {:?}", context, path);
            let loaded = Self::load_from_file(path)
                .with_context(|| format!("Failed to load {} from {:?}", context, path))?;
            *config = loaded.combine(config.clone());
        }
        Ok(())
    }

    /// Checks that hold for any single layer and for the combined result
    pub fn validate(&self) -> Result<()> {
        if self.minifier.as_ref().is_some_and(Vec::is_empty) {
            bail!("minifier command must not be empty");
        }
        Ok(())
    }

    /// Load configuration with hierarchical precedence:
    /// 1. CLI-provided config path (highest precedence)
    /// 2. Environment variables (BSN_*)
    /// 3. Project config (bsn-bundler.toml in current directory)
    /// 4. User config (~/.config/bsn-bundler/bsn-bundler.toml)
    /// 5. System config (/etc/bsn-bundler/bsn-bundler.toml or equivalent)
    /// 6. Default values (lowest precedence)
    ///
    /// `only` and `ignore` may both survive here; rejecting that is left to
    /// [`crate::selection::SelectionFilter::from_lists`].
    pub fn load(cli_config_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(system_config_path) = system_config_file() {
            Self::try_load_and_combine(&mut config, &system_config_path, "system config")?;
        }

        if let Some(user_config_path) = user_config_file() {
            Self::try_load_and_combine(&mut config, &user_config_path, "user config")?;
        }

        Self::try_load_and_combine(&mut config, Path::new(CONFIG_FILE), "project config")?;

        config = Self::from_env().combine(config);

        if let Some(cli_config_path) = cli_config_path {
            if !cli_config_path.exists() {
                bail!("Config file not found: {:?}", cli_config_path);
            }
            Self::try_load_and_combine(&mut config, cli_config_path, "CLI config")?;
        }

        config.validate().context("Invalid final configuration")?;
        Ok(config)
    }
}
