//! Predicting documentation output without generating code.

use std::path::PathBuf;

use super::{check_inputs, parse_doc_index, DocMode, ToolSettings, DEFAULT_DOC_DIR};
use crate::error::Result;
use crate::tool::{probe_version, PluginLibrary, ToolRunner};

/// List the XML documentation files an export of `files` would produce.
///
/// Runs the plugin in name-only mode, so nothing is written. The result
/// matches the `docs` of a [`generate_all`](super::generate_all) run with
/// the same inputs and documentation folder. A disabled `documentation`
/// lists for the default folder.
pub fn list_doc_files(
    runner: &dyn ToolRunner,
    files: &[PathBuf],
    settings: &ToolSettings,
    documentation: &DocMode,
) -> Result<Vec<PathBuf>> {
    check_inputs(files)?;
    probe_version(runner, &settings.clang, settings.min_version)?;

    let doc_dir = documentation
        .dir()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOC_DIR));

    let plugin = PluginLibrary::acquire(&settings.plugin)?;
    let mut query = settings.builder(plugin.path()).build_name_only();

    let mut result = Vec::new();
    for file in files {
        let stdout = runner.capture(&query.bind(file))?;
        result.extend(parse_doc_index(&stdout, &doc_dir));
    }
    Ok(result)
}
