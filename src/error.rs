//! Error types for the export pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Broad category of an [`ExportError`], so callers can branch on
/// bad input vs. filesystem vs. tool problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidIdentifier,
    MissingInput,
    DirectoryConflict,
    DirectoryCreation,
    ToolInvocation,
    OutputWrite,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidIdentifier => write!(f, "invalid_identifier"),
            ErrorKind::MissingInput => write!(f, "missing_input"),
            ErrorKind::DirectoryConflict => write!(f, "directory_conflict"),
            ErrorKind::DirectoryCreation => write!(f, "directory_creation"),
            ErrorKind::ToolInvocation => write!(f, "tool_invocation"),
            ErrorKind::OutputWrite => write!(f, "output_write"),
        }
    }
}

/// Errors that abort an export job.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("specified name is not a valid C++ identifier: {0}")]
    InvalidIdentifier(String),

    #[error("no files to process are specified")]
    NoInputFiles,

    #[error("specified file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("the specified {desc} path does not exist: {}", .path.display())]
    DirectoryMissing { desc: &'static str, path: PathBuf },

    #[error("the specified {desc} path is not a folder: {}", .path.display())]
    NotADirectory { desc: &'static str, path: PathBuf },

    #[error("failed to create {desc} folder {}: {source}", .path.display())]
    DirectoryCreation {
        desc: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {}", describe_exit(.code))]
    ToolFailed { tool: String, code: Option<i32> },

    #[error("{tool} does not report a clang version")]
    InvalidToolVersion { tool: String, output: String },

    #[error("{tool} is version {found}, at least major version {required} is required")]
    ToolTooOld {
        tool: String,
        found: String,
        required: u32,
    },

    #[error("analysis plugin {file_name} not found (searched {})", display_paths(.searched))]
    PluginNotFound {
        file_name: String,
        searched: Vec<PathBuf>,
    },

    #[error("failed to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExportError::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            ExportError::NoInputFiles | ExportError::InputNotFound(_) => ErrorKind::MissingInput,
            ExportError::DirectoryMissing { .. } | ExportError::NotADirectory { .. } => {
                ErrorKind::DirectoryConflict
            }
            ExportError::DirectoryCreation { .. } => ErrorKind::DirectoryCreation,
            ExportError::ToolLaunch { .. }
            | ExportError::ToolFailed { .. }
            | ExportError::InvalidToolVersion { .. }
            | ExportError::ToolTooOld { .. }
            | ExportError::PluginNotFound { .. } => ErrorKind::ToolInvocation,
            ExportError::OutputWrite { .. } => ErrorKind::OutputWrite,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("return code {}", c),
        None => "a signal".to_string(),
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ExportError>;
