//! Project configuration file for gdexport.
//!
//! A `gdexport.yaml` next to the build holds the settings that rarely
//! change between runs (clang path, include folders, plugin location).
//! Command-line values take precedence.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::{DocMode, ToolSettings, DEFAULT_GODOT_CPP};
use crate::tool::PluginLocator;

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["gdexport.yaml", ".gdexport.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    /// Path to the clang executable (default: `clang` in PATH)
    #[serde(default)]
    pub clang: Option<String>,
    /// Root of the godot-cpp checkout (default: `godot-cpp`)
    #[serde(default)]
    pub godot_cpp: Option<String>,
    /// Don't derive include paths from godot-cpp
    #[serde(default)]
    pub no_godot: bool,
    #[serde(default)]
    pub isystem: Vec<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub clang_args: Vec<String>,
    /// Exact path to the analysis plugin library
    #[serde(default)]
    pub plugin: Option<String>,
    /// Extra folders to search for the plugin library
    #[serde(default)]
    pub plugin_dirs: Vec<String>,
    /// Output folder for generated sources
    #[serde(default)]
    pub output: Option<String>,
    /// Documentation folder; `""` selects the default `doc_classes`
    #[serde(default)]
    pub doc: Option<String>,
    #[serde(default)]
    pub make_dirs: Option<bool>,
    /// Minimum clang major version
    #[serde(default)]
    pub min_clang_version: Option<u32>,
}

impl ExportConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ExportConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Look for a default-named config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Tool settings described by this config.
    pub fn tool_settings(&self) -> ToolSettings {
        let godot_cpp = if self.no_godot {
            None
        } else {
            Some(PathBuf::from(
                self.godot_cpp.as_deref().unwrap_or(DEFAULT_GODOT_CPP),
            ))
        };
        ToolSettings {
            clang: self.clang.clone().unwrap_or_else(|| "clang".to_string()),
            godot_cpp,
            system_includes: self.isystem.iter().map(PathBuf::from).collect(),
            includes: self.include.iter().map(PathBuf::from).collect(),
            extra_args: self.clang_args.clone(),
            plugin: PluginLocator {
                explicit: self.plugin.as_ref().map(PathBuf::from),
                search_dirs: self.plugin_dirs.iter().map(PathBuf::from).collect(),
            },
            min_version: self.min_clang_version,
        }
    }

    /// Documentation mode described by this config.
    pub fn doc_mode(&self) -> DocMode {
        DocMode::from_arg(self.doc.as_deref())
    }
}

/// Validate a config for correctness.
pub fn validate(config: &ExportConfig) -> anyhow::Result<()> {
    if let Some(clang) = &config.clang {
        if clang.trim().is_empty() {
            anyhow::bail!("clang must not be empty");
        }
    }
    if config.no_godot && config.godot_cpp.is_some() {
        anyhow::bail!("godot_cpp and no_godot are mutually exclusive");
    }
    if let Some(plugin) = &config.plugin {
        if plugin.trim().is_empty() {
            anyhow::bail!("plugin must not be empty");
        }
    }
    if config.min_clang_version == Some(0) {
        anyhow::bail!("min_clang_version must be at least 1");
    }
    Ok(())
}
