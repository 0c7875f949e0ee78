//! Exporting a single header.

use std::path::{Path, PathBuf};

use super::{artifact_path, dest_folder, DocMode, ToolSettings};
use crate::error::{ExportError, Result};
use crate::tool::{probe_version, BoundGeneration, PluginLibrary, ToolRunner};

/// Result of exporting one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderExport {
    /// Generated C++ source file.
    pub artifact: PathBuf,
    /// Documentation files, or `None` when documentation is disabled.
    pub docs: Option<Vec<PathBuf>>,
}

/// Map the plugin's documentation index (one class name per line) to
/// XML file paths under `doc_dir`. Blank lines are skipped.
pub fn parse_doc_index(stdout: &str, doc_dir: &Path) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|id| doc_dir.join(format!("{}.xml", id)))
        .collect()
}

/// Run one bound generation invocation.
///
/// Without documentation only the exit status matters; with it, stdout is
/// the documentation index.
pub fn export_one(
    runner: &dyn ToolRunner,
    generation: &BoundGeneration<'_>,
    doc_dir: Option<&Path>,
) -> Result<HeaderExport> {
    let invocation = generation.invocation();
    let docs = match doc_dir {
        Some(dir) => {
            let stdout = runner.capture(invocation)?;
            Some(parse_doc_index(&stdout, dir))
        }
        None => {
            runner.run(invocation)?;
            None
        }
    };

    Ok(HeaderExport {
        artifact: generation.output().to_path_buf(),
        docs,
    })
}

/// Export a single header without generating the entry point.
///
/// `output` defaults to `<stem>.gen.cpp` in `destination` (or the
/// working directory).
pub fn export_header(
    runner: &dyn ToolRunner,
    file: &Path,
    output: Option<&Path>,
    settings: &ToolSettings,
    destination: Option<&Path>,
    documentation: &DocMode,
    create_folders: bool,
) -> Result<HeaderExport> {
    probe_version(runner, &settings.clang, settings.min_version)?;

    if !file.exists() {
        return Err(ExportError::InputNotFound(file.to_path_buf()));
    }

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let dest = dest_folder(destination, create_folders, "destination")?;
            artifact_path(file, dest.as_deref())
        }
    };
    let doc_dir = dest_folder(
        documentation.dir().as_deref(),
        create_folders,
        "documentation",
    )?;

    let plugin = PluginLibrary::acquire(&settings.plugin)?;
    let mut invocation = settings
        .builder(plugin.path())
        .documentation(doc_dir.as_deref())
        .build();
    let bound = invocation.bind(&output, file);
    export_one(runner, &bound, doc_dir.as_deref())
}
