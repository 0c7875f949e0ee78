//! gdexport - GDExtension export interface generator.
//!
//! Exposes C++ classes marked with `godot::` attributes to Godot by running
//! clang with the gdexport analysis plugin over each header. The plugin
//! writes one `<header>.gen.cpp` per input (and optionally XML class
//! documentation); gdexport then writes `<name>.lib.cpp`, the entry point
//! that registers every generated module with Godot.
//!
//! # Architecture
//!
//! - `export`: job validation, per-header runs, entry point synthesis
//! - `tool`: clang argument templates, plugin lookup, process execution
//! - `ident`: C++ identifier rules and derived names
//! - `config`: YAML project configuration
//! - `report`: Output formatting (pretty, JSON)
//! - `error`: error taxonomy shared by all of the above

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ident;
pub mod report;
pub mod tool;

pub use config::ExportConfig;
pub use error::{ErrorKind, ExportError};
pub use export::{
    entry_point, export_header, generate_all, list_doc_files, DocMode, ExportJob, ExportOutcome,
    ToolSettings,
};
pub use ident::{entry_point_name, validate_name};
pub use tool::{ProcessRunner, ToolRunner};
