//! Configuration loading

use anyhow::{Context, Result};
use markertile_core::{DictionarySet, ModelMetadata};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub markers: MarkersConfig,
    #[serde(default)]
    pub model: ModelMetadata,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Installation root holding `markers/` and `models/`; resolved from the
    /// executable's location when unset
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl OutputConfig {
    /// The configured root, or the installation root of the running executable
    pub fn resolve_root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => install_root(),
        }
    }
}

/// Installation root of the running executable
pub fn install_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the markertile executable")?;
    let exe = exe
        .canonicalize()
        .with_context(|| format!("Failed to resolve executable path {}", exe.display()))?;
    let root = root_for_executable(&exe).with_context(|| {
        format!("Executable {} has no parent directory", exe.display())
    })?;
    debug!(root = %root.display(), "Resolved installation root");
    Ok(root)
}

/// The nearest ancestor of the executable's directory that already holds
/// generated assets, else the parent of that directory (`<prefix>/bin/markertile`
/// installs into `<prefix>`)
fn root_for_executable(exe: &Path) -> Option<PathBuf> {
    let bin_dir = exe.parent()?;
    bin_dir
        .ancestors()
        .find(|dir| dir.join("models").is_dir() || dir.join("markers").is_dir())
        .or_else(|| bin_dir.parent())
        .or(Some(bin_dir))
        .map(Path::to_path_buf)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkersConfig {
    /// Accepted dictionary identifiers (aruco or extended)
    #[serde(default)]
    pub dictionaries: DictionarySet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    /// Show the marker and wait for confirmation before writing the model
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Also open the marker image in the platform image viewer
    #[serde(default = "default_true")]
    pub open_viewer: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            open_viewer: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Load configuration from file, falling back to defaults when it is absent
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.output.root, None);
        assert_eq!(config.markers.dictionaries, DictionarySet::Aruco);
        assert_eq!(config.model, ModelMetadata::default());
        assert!(config.preview.enabled);
        assert!(config.preview.open_viewer);
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
[output]
root = "/srv/sim"

[markers]
dictionaries = "extended"

[model.author]
name = "Tile Maker"

[preview]
open_viewer = false
"#,
        )
        .unwrap();

        assert_eq!(config.output.root, Some(PathBuf::from("/srv/sim")));
        assert_eq!(config.output.resolve_root().unwrap(), PathBuf::from("/srv/sim"));
        assert_eq!(config.markers.dictionaries, DictionarySet::Extended);
        assert_eq!(config.model.author.name, "Tile Maker");
        assert_eq!(config.model.author.email, "remi.poree.pro@protonmail.com");
        assert_eq!(config.model.version, "1.0");
        assert!(config.preview.enabled);
        assert!(!config.preview.open_viewer);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config(&temp_dir.path().join("markertile.toml")).unwrap();
        assert_eq!(config.markers.dictionaries, DictionarySet::Aruco);
    }

    #[test]
    fn test_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("markertile.toml");
        std::fs::write(&path, "[model]\ndescription = \"Floor tile\"\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.model.description, "Floor tile");
    }

    #[test]
    fn test_unknown_dictionary_set_rejected() {
        let result: std::result::Result<Config, _> =
            toml::from_str("[markers]\ndictionaries = \"apriltag\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_root_is_parent_of_bin_dir() {
        let temp_dir = TempDir::new().unwrap();
        let bin = temp_dir.path().join("prefix").join("bin");
        std::fs::create_dir_all(&bin).unwrap();

        let root = root_for_executable(&bin.join("markertile")).unwrap();
        assert_eq!(root, temp_dir.path().join("prefix"));
    }

    #[test]
    fn test_root_prefers_existing_asset_tree() {
        let temp_dir = TempDir::new().unwrap();
        let package = temp_dir.path().join("package");
        let bin = package.join("target").join("release");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::create_dir_all(package.join("models")).unwrap();

        let root = root_for_executable(&bin.join("markertile")).unwrap();
        assert_eq!(root, package);
    }

    #[test]
    fn test_default_root_ignores_working_directory() {
        let config = Config::default();
        let root = config.output.resolve_root().unwrap();
        let exe = std::env::current_exe().unwrap().canonicalize().unwrap();
        assert!(exe.starts_with(&root), "{} not under {}", exe.display(), root.display());
        assert!(root.is_absolute());
    }
}
