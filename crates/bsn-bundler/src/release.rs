use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::config::Config;

/// The fields of `package.json` stamped into the bundle
#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
    version: Option<String>,
    license: Option<String>,
}

/// Attribution and version data for the bundle header and version stamp.
///
/// Built once per run and handed to the template explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub product: String,
    /// Bare version, e.g. `2.0.27`
    pub version: String,
    pub copyright: String,
    /// License identifier as found in the manifest, e.g. `MIT`
    pub license: String,
}

impl ReleaseInfo {
    /// Resolve release data from the configuration, reading the package manifest only
    /// for fields the configuration does not set.
    pub fn resolve(config: &Config) -> Result<Self> {
        let (version, license) = match (&config.version, &config.license) {
            (Some(version), Some(license)) => (version.clone(), license.clone()),
            (version, license) => {
                let manifest = read_manifest(config.manifest())?;
                (
                    version.clone().or(manifest.version).ok_or_else(|| {
                        anyhow!("No version configured and none found in {:?}", config.manifest())
                    })?,
                    license.clone().or(manifest.license).ok_or_else(|| {
                        anyhow!("No license configured and none found in {:?}", config.manifest())
                    })?,
                )
            }
        };

        Ok(Self {
            product: config.product().to_owned(),
            version,
            copyright: config.copyright().to_owned(),
            license,
        })
    }

    /// `v`-prefixed version as shown to humans
    pub fn tagged_version(&self) -> String {
        format!("v{}", self.version)
    }

    /// The single attribution line opening every bundle, without a line break
    pub fn header_line(&self) -> String {
        format!(
            "// {} {} | © {} | {}-License",
            self.product,
            self.tagged_version(),
            self.copyright,
            self.license
        )
    }
}

fn read_manifest(path: &Path) -> Result<PackageManifest> {
    debug!("Reading package manifest from {:?}", path);
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read package manifest: {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse package manifest: {:?}", path))
}
