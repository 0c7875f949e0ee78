//! Command-line interface for gdexport.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{self, ExportConfig};
use crate::error::{ErrorKind, ExportError};
use crate::export::{self, DocMode, ExportJob, ToolSettings};
use crate::report;
use crate::tool::ProcessRunner;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Generate the export interface for a GDExtension from C++ headers.
///
/// Runs clang with the gdexport plugin over every header to generate the
/// registration code for classes, methods, enums and signals marked with
/// `godot::` attributes, then writes the extension's entry point.
#[derive(Parser)]
#[command(name = "gdexport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate export sources for headers plus the entry point
    #[command(visible_alias = "gen")]
    Generate(GenerateArgs),
    /// List the XML documentation files an export would produce
    ListDocs(ListDocsArgs),
    /// Generate only the entry point
    EntryPoint(EntryPointArgs),
}

/// Options controlling how clang is run.
#[derive(Args)]
pub struct ToolArgs {
    /// Root of the godot-cpp checkout (include paths are derived from it)
    #[arg(short = 'g', long, value_name = "DIR", conflicts_with = "no_godot")]
    pub godot: Option<String>,

    /// Don't derive include paths from a godot-cpp checkout
    #[arg(long)]
    pub no_godot: bool,

    /// Path to the clang executable
    #[arg(short, long, value_name = "EXE")]
    pub clang: Option<String>,

    /// System include directory (-isystem), may be repeated
    #[arg(short = 's', long, value_name = "DIR")]
    pub isystem: Vec<String>,

    /// Include directory (-I), may be repeated
    #[arg(short = 'I', long, value_name = "DIR")]
    pub include: Vec<String>,

    /// Extra argument passed to clang, may be repeated
    #[arg(
        short = 'a',
        long = "clang-arg",
        value_name = "ARG",
        allow_hyphen_values = true
    )]
    pub clang_args: Vec<String>,

    /// Path to the analysis plugin library
    #[arg(long, value_name = "FILE")]
    pub plugin: Option<PathBuf>,

    /// Path to config file (default: auto-discover gdexport.yaml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the generate command.
#[derive(Parser)]
pub struct GenerateArgs {
    /// Name of the GDExtension; the entry symbol is `<name>_library_init`
    pub name: String,

    /// C++ header files to export Godot classes from
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub tool: ToolArgs,

    /// Output directory (default: current working directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Export XML documentation from Doxygen comments (to doc_classes if DIR is omitted)
    #[arg(short, long, value_name = "DIR", num_args = 0..=1)]
    pub doc: Option<Option<String>>,

    /// Create the output and documentation folders if they don't exist
    #[arg(short, long)]
    pub make_dirs: bool,

    /// Don't print status messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the list-docs command.
#[derive(Parser)]
pub struct ListDocsArgs {
    /// C++ header files to list documentation for
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub tool: ToolArgs,

    /// Documentation directory (default: doc_classes)
    #[arg(short, long, value_name = "DIR")]
    pub doc: Option<String>,

    /// Output format: plain or json
    #[arg(short, long, default_value = "plain")]
    pub format: String,
}

/// Arguments for the entry-point command.
#[derive(Parser)]
pub struct EntryPointArgs {
    /// Name of the GDExtension
    pub name: String,

    /// C++ header files the export sources are generated from
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// File to write (default: `<name>.lib.cpp` in the output directory)
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Output directory (default: current working directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Create the output directory if it doesn't exist
    #[arg(short, long)]
    pub make_dirs: bool,

    /// Path to config file (default: auto-discover gdexport.yaml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Install the stderr log subscriber. `RUST_LOG` overrides `verbose`.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "gdexport=warn",
        1 => "gdexport=debug",
        _ => "gdexport=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load the explicit or auto-discovered config, or defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<ExportConfig> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => ExportConfig::discover(Path::new(".")),
    };
    let config = match path {
        Some(p) => {
            tracing::debug!(config = %p.display(), "loading config");
            ExportConfig::parse_file(&p)
                .with_context(|| format!("failed to load config {}", p.display()))?
        }
        None => ExportConfig::default(),
    };
    config::validate(&config)?;
    Ok(config)
}

/// Merge command-line tool options over the config file.
pub fn resolve_tool_settings(config: &ExportConfig, args: &ToolArgs) -> ToolSettings {
    let mut settings = config.tool_settings();
    if let Some(clang) = &args.clang {
        settings.clang = clang.clone();
    }
    if args.no_godot {
        settings.godot_cpp = None;
    } else if let Some(godot) = &args.godot {
        settings.godot_cpp = Some(PathBuf::from(godot));
    }
    settings
        .system_includes
        .extend(args.isystem.iter().map(PathBuf::from));
    settings
        .includes
        .extend(args.include.iter().map(PathBuf::from));
    settings.extra_args.extend(args.clang_args.iter().cloned());
    if let Some(plugin) = &args.plugin {
        settings.plugin.explicit = Some(plugin.clone());
    }
    settings
}

/// Message printed for a failed export.
pub fn diagnostic(err: &ExportError) -> String {
    match (err.kind(), err) {
        (_, ExportError::InvalidToolVersion { .. }) => {
            "The specified clang does not appear to be a valid clang executable".to_string()
        }
        (_, ExportError::ToolFailed { code: Some(code), .. }) => {
            format!("Clang returned an error - return code {}", code)
        }
        (ErrorKind::InvalidIdentifier | ErrorKind::MissingInput, _) => {
            format!("Unable to generate interface - {}", err)
        }
        (_, ExportError::DirectoryMissing { .. }) => {
            "Destination or documentation folder does not exist".to_string()
        }
        (_, ExportError::NotADirectory { .. }) => {
            "Destination or documentation folder is a file".to_string()
        }
        (ErrorKind::DirectoryCreation | ErrorKind::OutputWrite, _) => {
            format!("Unable to create folders or files - {}", err)
        }
        _ => format!("Unable to run clang - {}", err),
    }
}

fn report_failure(err: &ExportError) -> i32 {
    tracing::debug!(kind = %err.kind(), error = ?err, "export failed");
    eprintln!("{} {}", "Error:".red().bold(), diagnostic(err));
    EXIT_FAILED
}

fn check_format(format: &str, allowed: &[&str]) -> bool {
    if allowed.contains(&format) {
        return true;
    }
    eprintln!(
        "Error: invalid format {:?}, must be one of {}",
        format,
        allowed.join(", ")
    );
    false
}

/// Run the generate command.
pub fn run_generate(args: &GenerateArgs) -> anyhow::Result<i32> {
    if !check_format(&args.format, &["pretty", "json"]) {
        return Ok(EXIT_ERROR);
    }
    let config = load_config(args.tool.config.as_deref())?;

    let documentation = match &args.doc {
        None => config.doc_mode(),
        Some(None) => DocMode::DefaultLocation,
        Some(Some(dir)) => DocMode::from_arg(Some(dir.as_str())),
    };
    let job = ExportJob {
        name: args.name.clone(),
        files: args.files.clone(),
        tool: resolve_tool_settings(&config, &args.tool),
        destination: args
            .output
            .clone()
            .or_else(|| config.output.as_ref().map(PathBuf::from)),
        documentation,
        create_folders: args.make_dirs || config.make_dirs.unwrap_or(false),
        quiet: args.quiet || args.format == "json",
    };

    let outcome = match export::generate_all(&ProcessRunner, &job) {
        Ok(outcome) => outcome,
        Err(e) => return Ok(report_failure(&e)),
    };

    if args.format == "json" {
        report::write_json(&job.name, &outcome)?;
    } else if !args.quiet {
        report::write_pretty(&job.name, &outcome);
    }
    Ok(EXIT_SUCCESS)
}

/// Run the list-docs command.
pub fn run_list_docs(args: &ListDocsArgs) -> anyhow::Result<i32> {
    if !check_format(&args.format, &["plain", "json"]) {
        return Ok(EXIT_ERROR);
    }
    let config = load_config(args.tool.config.as_deref())?;
    let settings = resolve_tool_settings(&config, &args.tool);
    let documentation = match &args.doc {
        Some(dir) => DocMode::from_arg(Some(dir.as_str())),
        None => config.doc_mode(),
    };

    let docs = match export::list_doc_files(&ProcessRunner, &args.files, &settings, &documentation)
    {
        Ok(docs) => docs,
        Err(e) => return Ok(report_failure(&e)),
    };

    if args.format == "json" {
        report::write_doc_list_json(&docs)?;
    } else {
        report::write_doc_list(&docs);
    }
    Ok(EXIT_SUCCESS)
}

/// Run the entry-point command.
pub fn run_entry_point(args: &EntryPointArgs) -> anyhow::Result<i32> {
    let config = load_config(args.config.as_deref())?;
    let destination = args
        .output
        .clone()
        .or_else(|| config.output.as_ref().map(PathBuf::from));
    let create_folders = args.make_dirs || config.make_dirs.unwrap_or(false);

    match export::entry_point(
        &args.name,
        &args.files,
        args.output_file.as_deref(),
        destination.as_deref(),
        create_folders,
    ) {
        Ok(symbol) => {
            println!("{}", symbol);
            Ok(EXIT_SUCCESS)
        }
        Err(e) => Ok(report_failure(&e)),
    }
}
