//! Locating the clang analysis plugin library for the host platform.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::error::{ExportError, Result};

/// Platforms with a distinct plugin library name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Other,
}

impl Platform {
    /// Platform this binary was built for.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS name as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            _ => Platform::Other,
        }
    }

    /// File name of the plugin shared library.
    pub fn plugin_file_name(&self) -> &'static str {
        match self {
            Platform::Linux => "libgdexport.so",
            Platform::MacOs => "libgdexport.dylib",
            Platform::Windows => "gdexport.dll",
            Platform::Other => "libgdexport.so",
        }
    }
}

/// Where to look for the plugin library.
#[derive(Debug, Clone, Default)]
pub struct PluginLocator {
    /// Exact path to the library; must exist when given.
    pub explicit: Option<PathBuf>,
    /// Directories searched before the install locations.
    pub search_dirs: Vec<PathBuf>,
}

impl PluginLocator {
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit: Some(path.into()),
            search_dirs: Vec::new(),
        }
    }

    /// Candidate directories in lookup order: configured ones, then
    /// `<exe-dir>/lib`, `<exe-dir>` and the user data dir's `lib/`.
    fn candidate_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = self.search_dirs.clone();
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            dirs.push(exe_dir.join("lib"));
            dirs.push(exe_dir);
        }
        if let Some(project) = ProjectDirs::from("", "", "gdexport") {
            dirs.push(project.data_dir().join("lib"));
        }
        dirs
    }

    /// Resolve the library for `platform`.
    pub fn resolve(&self, platform: Platform) -> Result<PathBuf> {
        let file_name = platform.plugin_file_name();

        if let Some(path) = &self.explicit {
            if path.is_file() {
                return Ok(path.clone());
            }
            return Err(ExportError::PluginNotFound {
                file_name: file_name.to_string(),
                searched: vec![path.clone()],
            });
        }

        let searched = self.candidate_dirs();
        let found = searched
            .iter()
            .map(|dir| dir.join(file_name))
            .find(|candidate| candidate.is_file());
        found.ok_or_else(|| ExportError::PluginNotFound {
            file_name: file_name.to_string(),
            searched,
        })
    }
}

/// The plugin library held for the duration of one export run.
///
/// The path is only reachable through a borrow of this guard, so it
/// cannot outlive the run that acquired it.
#[derive(Debug)]
pub struct PluginLibrary {
    path: PathBuf,
}

impl PluginLibrary {
    /// Acquire the plugin for the current platform.
    pub fn acquire(locator: &PluginLocator) -> Result<Self> {
        Self::acquire_for(locator, Platform::current())
    }

    pub fn acquire_for(locator: &PluginLocator, platform: Platform) -> Result<Self> {
        let path = locator.resolve(platform)?;
        tracing::trace!(plugin = %path.display(), "acquired analysis plugin");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PluginLibrary {
    fn drop(&mut self) {
        tracing::trace!(plugin = %self.path.display(), "released analysis plugin");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_plugin_file_names() {
        assert_eq!(Platform::from_os("linux").plugin_file_name(), "libgdexport.so");
        assert_eq!(Platform::from_os("macos").plugin_file_name(), "libgdexport.dylib");
        assert_eq!(Platform::from_os("windows").plugin_file_name(), "gdexport.dll");
        assert_eq!(Platform::from_os("freebsd"), Platform::Other);
        assert_eq!(Platform::Other.plugin_file_name(), "libgdexport.so");
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.so");
        let err = PluginLocator::with_path(&missing)
            .resolve(Platform::Linux)
            .unwrap_err();
        assert!(matches!(err, ExportError::PluginNotFound { .. }));

        let present = temp.path().join("custom.so");
        std::fs::write(&present, b"").unwrap();
        let found = PluginLocator::with_path(&present)
            .resolve(Platform::Linux)
            .unwrap();
        assert_eq!(found, present);
    }

    #[test]
    fn test_search_dirs_are_checked_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(second.path().join("gdexport.dll"), b"").unwrap();
        std::fs::write(first.path().join("gdexport.dll"), b"").unwrap();

        let locator = PluginLocator {
            explicit: None,
            search_dirs: vec![first.path().to_path_buf(), second.path().to_path_buf()],
        };
        let lib = PluginLibrary::acquire_for(&locator, Platform::Windows).unwrap();
        assert_eq!(lib.path(), first.path().join("gdexport.dll"));
    }

    #[test]
    fn test_missing_plugin_reports_searched_dirs() {
        let dir = TempDir::new().unwrap();
        let locator = PluginLocator {
            explicit: None,
            search_dirs: vec![dir.path().to_path_buf()],
        };
        match locator.resolve(Platform::MacOs) {
            Err(ExportError::PluginNotFound { file_name, searched }) => {
                assert_eq!(file_name, "libgdexport.dylib");
                assert_eq!(searched[0], dir.path());
            }
            other => panic!("expected PluginNotFound, got {:?}", other),
        }
    }
}
