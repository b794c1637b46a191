//! Configuration for hexanode.
//!
//! Layered with figment: built-in defaults, then `config.toml` in the
//! platform config directory, then `HEXANODE_*` environment variables
//! (`__` separates nested keys, e.g. `HEXANODE_DEFAULTS__OUTPUT`).
//! Command-line flags override all of these in the binary.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the persisted view state inside the state directory.
pub const STATE_FILE_NAME: &str = "devicetree.json";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Directory holding `devicetree.json`. Platform data dir when unset.
    pub state_dir: Option<PathBuf>,

    /// Device dump written by the discovery tooling.
    pub devices_file: Option<PathBuf>,

    #[serde(default)]
    pub defaults: Defaults,
}

impl Config {
    /// The state directory, falling back to the platform data directory.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(default_state_dir)
    }

    /// Full path of the persisted view state.
    pub fn devicetree_path(&self) -> PathBuf {
        self.state_dir().join(STATE_FILE_NAME)
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Name given to newly created views.
    #[serde(default = "default_view_name")]
    pub view_name: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            view_name: default_view_name(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_view_name() -> String {
    "Unnamed View".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("de", "hexabus", "hexanode")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default state directory via XDG / platform conventions.
pub fn default_state_dir() -> PathBuf {
    project_dirs().map_or_else(home_fallback, |dirs| dirs.data_dir().to_path_buf())
}

fn home_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("hexanode");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from a specific file + environment. A missing file is fine.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HEXANODE_").split("__"));

    Ok(figment.extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let cfg = load_config_from(Path::new("absent.toml")).map_err(|e| e.to_string())?;
            assert!(cfg.state_dir.is_none());
            assert_eq!(cfg.defaults.output, "table");
            assert_eq!(cfg.defaults.view_name, "Unnamed View");
            Ok(())
        });
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    state_dir = "/var/lib/hexanode"
                    devices_file = "/run/hexinfo.json"

                    [defaults]
                    output = "json"
                "#,
            )?;
            jail.set_env("HEXANODE_STATE_DIR", "/srv/hexanode");
            jail.set_env("HEXANODE_DEFAULTS__VIEW_NAME", "New View");

            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.state_dir(), PathBuf::from("/srv/hexanode"));
            assert_eq!(
                cfg.devicetree_path(),
                PathBuf::from("/srv/hexanode/devicetree.json")
            );
            assert_eq!(cfg.devices_file, Some(PathBuf::from("/run/hexinfo.json")));
            assert_eq!(cfg.defaults.output, "json");
            assert_eq!(cfg.defaults.view_name, "New View");
            Ok(())
        });
    }

    #[test]
    fn save_writes_toml_and_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let cfg = Config {
            state_dir: Some("/data".into()),
            ..Config::default()
        };
        save_config_to(&cfg, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("state_dir = \"/data\""), "{text}");
    }
}
