use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;

/// Directory holding bsn-bundler settings inside a config root
const CONFIG_DIR: &str = "bsn-bundler";

/// Settings file name, used both for the user/system layers and the project layer
pub const CONFIG_FILE: &str = "bsn-bundler.toml";

/// `<user config dir>/bsn-bundler/bsn-bundler.toml`, whether or not it exists.
///
/// The config dir is `XDG_CONFIG_HOME` or `~/.config` on Linux and macOS, and the
/// roaming AppData folder on Windows.
pub fn user_config_file() -> Option<PathBuf> {
    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(strategy.config_dir().join(CONFIG_DIR).join(CONFIG_FILE))
}

/// First `bsn-bundler/bsn-bundler.toml` found under a colon separated `XDG_CONFIG_DIRS`
/// value, defaulting to `/etc/xdg`
#[cfg(not(windows))]
fn find_in_xdg_config_dirs(xdg_config_dirs: Option<&str>) -> Option<PathBuf> {
    xdg_config_dirs
        .filter(|dirs| !dirs.is_empty())
        .unwrap_or("/etc/xdg")
        .split(':')
        .take_while(|dir| !dir.is_empty())
        .map(|dir| Path::new(dir).join(CONFIG_DIR).join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

#[cfg(windows)]
fn find_in_program_data(system_drive: &Path) -> Option<PathBuf> {
    let candidate = system_drive
        .join("ProgramData")
        .join(CONFIG_DIR)
        .join(CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}

/// Machine-wide settings file, if one exists.
///
/// Unix: `XDG_CONFIG_DIRS` entries, then `/etc/bsn-bundler/bsn-bundler.toml`.
/// Windows: `%SYSTEMDRIVE%\ProgramData\bsn-bundler\bsn-bundler.toml`.
pub fn system_config_file() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        let system_drive = std::env::var("SYSTEMDRIVE").ok()?;
        find_in_program_data(Path::new(&system_drive))
    }

    #[cfg(not(windows))]
    {
        let xdg_config_dirs = std::env::var("XDG_CONFIG_DIRS").ok();
        if let Some(path) = find_in_xdg_config_dirs(xdg_config_dirs.as_deref()) {
            return Some(path);
        }

        let etc_file = Path::new("/etc").join(CONFIG_DIR).join(CONFIG_FILE);
        match etc_file.try_exists() {
            Ok(true) => Some(etc_file),
            Ok(false) => None,
            Err(err) => {
                log::warn!("Failed to query system configuration file: {err}");
                None
            }
        }
    }
}
