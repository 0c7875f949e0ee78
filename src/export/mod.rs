//! Export pipeline: from annotated headers to generated GDExtension glue.
//!
//! - `dirs`: destination/documentation folder resolution
//! - `header`: one clang run per header
//! - `batch`: whole-job orchestration
//! - `entry`: the aggregate `<name>.lib.cpp` entry point
//! - `docs`: predicting documentation files without generating code

mod batch;
mod dirs;
mod docs;
mod entry;
mod header;

pub use batch::{generate_all, ExportOutcome};
pub use dirs::dest_folder;
pub use docs::list_doc_files;
pub use entry::{entry_point, render_entry_point, synthesize};
pub use header::{export_header, export_one, parse_doc_index, HeaderExport};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{ExportError, Result};
use crate::ident;
use crate::tool::{InvocationBuilder, PluginLocator};

/// Suffix of every generated C++ source file.
pub const SOURCE_SUFFIX: &str = ".cpp";

/// Documentation folder used when documentation is requested without a path.
pub const DEFAULT_DOC_DIR: &str = "doc_classes";

/// Default location of the godot-cpp checkout.
pub const DEFAULT_GODOT_CPP: &str = "godot-cpp";

/// Whether and where XML documentation is produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocMode {
    #[default]
    Disabled,
    /// Enabled, written to [`DEFAULT_DOC_DIR`].
    DefaultLocation,
    Directory(PathBuf),
}

impl DocMode {
    /// Interpret an optional folder argument: absent disables documentation,
    /// an empty string selects the default location.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => DocMode::Disabled,
            Some("") => DocMode::DefaultLocation,
            Some(dir) => DocMode::Directory(PathBuf::from(dir)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, DocMode::Disabled)
    }

    /// Folder documentation goes to, or `None` when disabled. An empty
    /// `Directory` means the default location.
    pub fn dir(&self) -> Option<PathBuf> {
        match self {
            DocMode::Disabled => None,
            DocMode::Directory(dir) if !dir.as_os_str().is_empty() => Some(dir.clone()),
            DocMode::DefaultLocation | DocMode::Directory(_) => {
                Some(PathBuf::from(DEFAULT_DOC_DIR))
            }
        }
    }
}

/// How to run clang and where it searches for headers.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    /// Path or name (looked up in PATH) of the clang executable.
    pub clang: String,
    /// Root of a godot-cpp checkout to derive include paths from.
    pub godot_cpp: Option<PathBuf>,
    pub system_includes: Vec<PathBuf>,
    pub includes: Vec<PathBuf>,
    /// Extra arguments forwarded to the clang frontend.
    pub extra_args: Vec<String>,
    pub plugin: PluginLocator,
    /// Oldest accepted clang major version.
    pub min_version: Option<u32>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            clang: "clang".to_string(),
            godot_cpp: Some(PathBuf::from(DEFAULT_GODOT_CPP)),
            system_includes: Vec::new(),
            includes: Vec::new(),
            extra_args: Vec::new(),
            plugin: PluginLocator::default(),
            min_version: None,
        }
    }
}

impl ToolSettings {
    /// System include paths with the godot-cpp ones appended.
    pub fn resolved_system_includes(&self) -> Vec<PathBuf> {
        let mut paths = self.system_includes.clone();
        if let Some(godot) = &self.godot_cpp {
            paths.push(godot.join("gdextension"));
            paths.push(godot.join("include"));
            paths.push(godot.join("gen").join("include"));
        }
        paths
    }

    /// Invocation builder carrying everything but documentation.
    pub fn builder(&self, plugin: &Path) -> InvocationBuilder {
        InvocationBuilder::new(self.clang.clone(), plugin)
            .system_includes(self.resolved_system_includes())
            .includes(&self.includes)
            .extra_args(&self.extra_args)
    }
}

/// One batch export request.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Extension name; must be a C++ identifier.
    pub name: String,
    pub files: Vec<PathBuf>,
    pub tool: ToolSettings,
    /// Output folder; `None` writes to the working directory.
    pub destination: Option<PathBuf>,
    pub documentation: DocMode,
    /// Create missing destination/documentation folders.
    pub create_folders: bool,
    /// Suppress status messages.
    pub quiet: bool,
}

impl ExportJob {
    pub fn new<I, P>(name: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            name: name.into(),
            files: files.into_iter().map(Into::into).collect(),
            tool: ToolSettings::default(),
            destination: None,
            documentation: DocMode::Disabled,
            create_folders: true,
            quiet: false,
        }
    }

    /// Check the name and the input files.
    pub fn validate(&self) -> Result<()> {
        if !ident::validate_name(&self.name) {
            return Err(ExportError::InvalidIdentifier(self.name.clone()));
        }
        check_inputs(&self.files)
    }
}

/// Require a non-empty list of existing files.
pub fn check_inputs(files: &[PathBuf]) -> Result<()> {
    if files.is_empty() {
        return Err(ExportError::NoInputFiles);
    }
    if let Some(missing) = files.iter().find(|f| !f.exists()) {
        return Err(ExportError::InputNotFound(missing.clone()));
    }
    Ok(())
}

/// Generated source path for `input`: `<stem>.gen.cpp` under `dest`.
pub fn artifact_path(input: &Path, dest: Option<&Path>) -> PathBuf {
    let mut file_name = input.file_stem().map(OsString::from).unwrap_or_default();
    file_name.push(".gen");
    file_name.push(SOURCE_SUFFIX);
    match dest {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Entry point path for `name`: `<name>.lib.cpp` under `dest`.
pub fn entry_point_path(name: &str, dest: Option<&Path>) -> PathBuf {
    let file_name = format!("{}.lib{}", name, SOURCE_SUFFIX);
    match dest {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
