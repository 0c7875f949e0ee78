//! Invoking clang with the gdexport analysis plugin.
//!
//! - `args`: argument templates with per-file slots
//! - `plugin`: platform-specific plugin library lookup
//!
//! Process execution sits behind [`ToolRunner`] so the export pipeline
//! can be driven without a real compiler.

mod args;
mod plugin;

pub use args::{
    BoundGeneration, BoundInvocation, InvocationBuilder, NameQuery, ToolInvocation, PLUGIN_NAME,
};
pub use plugin::{Platform, PluginLibrary, PluginLocator};

use regex::Regex;
use std::process::{Command, Stdio};

use crate::error::{ExportError, Result};

lazy_static::lazy_static! {
    static ref CLANG_VERSION: Regex = Regex::new(r"clang.*?([0-9]+)((?:\.[0-9]+)*)").unwrap();
}

/// Executes the analysis tool.
pub trait ToolRunner {
    /// Raw standard output of `<tool> --version`.
    fn version_output(&self, tool: &str) -> Result<String>;

    /// Run to completion, requiring a zero exit status.
    fn run(&self, invocation: &BoundInvocation<'_>) -> Result<()>;

    /// Run to completion, requiring a zero exit status, and return stdout.
    fn capture(&self, invocation: &BoundInvocation<'_>) -> Result<String>;
}

/// Runs the tool as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn version_output(&self, tool: &str) -> Result<String> {
        let output = Command::new(tool)
            .arg("--version")
            .output()
            .map_err(|source| ExportError::ToolLaunch {
                tool: tool.to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(ExportError::ToolFailed {
                tool: tool.to_string(),
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn run(&self, invocation: &BoundInvocation<'_>) -> Result<()> {
        tracing::debug!(argv = ?invocation.argv(), "running analysis tool");
        let status = Command::new(invocation.program())
            .args(invocation.args())
            .status()
            .map_err(|source| ExportError::ToolLaunch {
                tool: tool_name(invocation),
                source,
            })?;
        if !status.success() {
            return Err(ExportError::ToolFailed {
                tool: tool_name(invocation),
                code: status.code(),
            });
        }
        Ok(())
    }

    fn capture(&self, invocation: &BoundInvocation<'_>) -> Result<String> {
        tracing::debug!(argv = ?invocation.argv(), "running analysis tool (capturing)");
        let output = Command::new(invocation.program())
            .args(invocation.args())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| ExportError::ToolLaunch {
                tool: tool_name(invocation),
                source,
            })?;
        if !output.status.success() {
            return Err(ExportError::ToolFailed {
                tool: tool_name(invocation),
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn tool_name(invocation: &BoundInvocation<'_>) -> String {
    invocation.program().to_string_lossy().into_owned()
}

/// Version reported by the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersion {
    /// Dotted version, e.g. `19.1.7`.
    pub full: String,
    pub major: u32,
}

impl std::fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full)
    }
}

/// Extract the clang version from `--version` output.
pub fn parse_version(output: &str) -> Option<ToolVersion> {
    let caps = CLANG_VERSION.captures(output)?;
    let major_text = caps.get(1)?.as_str();
    let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let major = major_text.parse().ok()?;
    Some(ToolVersion {
        full: format!("{}{}", major_text, rest),
        major,
    })
}

/// Check that `tool` is a usable clang, optionally of a minimum major version.
pub fn probe_version(
    runner: &dyn ToolRunner,
    tool: &str,
    min_major: Option<u32>,
) -> Result<ToolVersion> {
    let output = runner.version_output(tool)?;
    let version = parse_version(&output).ok_or_else(|| ExportError::InvalidToolVersion {
        tool: tool.to_string(),
        output: output.clone(),
    })?;
    if let Some(required) = min_major {
        if version.major < required {
            return Err(ExportError::ToolTooOld {
                tool: tool.to_string(),
                found: version.full,
                required,
            });
        }
    }
    tracing::debug!(tool, version = %version, "probed analysis tool");
    Ok(version)
}
