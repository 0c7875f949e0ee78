//! Whole-job export orchestration.

use colored::*;
use std::path::PathBuf;

use super::{
    artifact_path, dest_folder, entry_point_path, export_one, synthesize, ExportJob,
};
use crate::error::Result;
use crate::ident;
use crate::tool::{probe_version, PluginLibrary, ToolRunner};

/// Everything a successful export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// Generated sources in input order, followed by the entry point.
    pub artifacts: Vec<PathBuf>,
    /// Documentation files, or `None` when documentation was disabled.
    pub docs: Option<Vec<PathBuf>>,
    /// `<name>_library_init`, to put in the `.gdextension` file.
    pub entry_symbol: String,
}

/// Export every header of `job` and generate the entry point.
///
/// Files are processed strictly in order and the first failure aborts the
/// job. Sources already generated for earlier files stay on disk.
pub fn generate_all(runner: &dyn ToolRunner, job: &ExportJob) -> Result<ExportOutcome> {
    job.validate()?;

    let version = probe_version(runner, &job.tool.clang, job.tool.min_version)?;
    if !job.quiet {
        println!(
            "Exporting C++ GDExtension interface with clang v{} [{}]{}",
            version.to_string().cyan(),
            job.tool.clang,
            if job.documentation.is_enabled() {
                " with documentation"
            } else {
                ""
            }
        );
    }

    let dest = dest_folder(job.destination.as_deref(), job.create_folders, "destination")?;
    let doc_dir = dest_folder(
        job.documentation.dir().as_deref(),
        job.create_folders,
        "documentation",
    )?;

    let mut artifacts = Vec::with_capacity(job.files.len() + 1);
    let mut docs = Vec::new();
    {
        let plugin = PluginLibrary::acquire(&job.tool.plugin)?;
        let mut invocation = job
            .tool
            .builder(plugin.path())
            .documentation(doc_dir.as_deref())
            .build();

        for file in &job.files {
            let output = artifact_path(file, dest.as_deref());
            if !job.quiet {
                println!(
                    " - Processing {} > {}",
                    file.display(),
                    output.display().to_string().dimmed()
                );
            }
            let bound = invocation.bind(&output, file);
            let export = export_one(runner, &bound, doc_dir.as_deref())?;
            artifacts.push(export.artifact);
            if let Some(generated) = export.docs {
                docs.extend(generated);
            }
        }
    }

    let library = entry_point_path(&job.name, dest.as_deref());
    if !job.quiet {
        println!(" - Generating {}", library.display().to_string().dimmed());
    }
    let ids: Vec<String> = job
        .files
        .iter()
        .map(|f| ident::module_identifier(f))
        .collect();
    let entry_symbol = synthesize(&job.name, &ids, &library)?;
    artifacts.push(library);

    tracing::info!(
        name = %job.name,
        files = job.files.len(),
        docs = docs.len(),
        "export complete"
    );

    Ok(ExportOutcome {
        artifacts,
        docs: doc_dir.map(|_| docs),
        entry_symbol,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::export::DocMode;
    use crate::tool::{BoundInvocation, PluginLocator};
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Writes the requested output file and reports one class per header.
    struct FakeClang {
        inputs: RefCell<Vec<String>>,
    }

    impl ToolRunner for FakeClang {
        fn version_output(&self, _tool: &str) -> Result<String> {
            Ok("clang version 19.1.0\n".to_string())
        }

        fn run(&self, invocation: &BoundInvocation<'_>) -> Result<()> {
            self.inputs.borrow_mut().push(invocation.input().display().to_string());
            if let Some(out) = invocation.output() {
                std::fs::write(out, "// generated\n").unwrap();
            }
            Ok(())
        }

        fn capture(&self, invocation: &BoundInvocation<'_>) -> Result<String> {
            self.run(invocation)?;
            let stem = invocation
                .input()
                .file_stem()
                .unwrap()
                .to_string_lossy()
                .to_uppercase();
            Ok(format!("{}\n\n", stem))
        }
    }

    fn job_in(temp: &TempDir, files: &[&str]) -> ExportJob {
        let plugin = temp.path().join("libgdexport.so");
        std::fs::write(&plugin, b"").unwrap();
        let paths: Vec<PathBuf> = files
            .iter()
            .map(|f| {
                let p = temp.path().join(f);
                std::fs::write(&p, "#pragma once\n").unwrap();
                p
            })
            .collect();
        let mut job = ExportJob::new("demo", paths);
        job.tool.plugin = PluginLocator::with_path(plugin);
        job.tool.godot_cpp = None;
        job.destination = Some(temp.path().join("gen"));
        job.quiet = true;
        job
    }

    #[test]
    fn test_generate_all_orders_artifacts() {
        let temp = TempDir::new().unwrap();
        let job = job_in(&temp, &["foo.h", "bar.h"]);
        let runner = FakeClang {
            inputs: RefCell::new(Vec::new()),
        };

        let outcome = generate_all(&runner, &job).unwrap();
        let gen = temp.path().join("gen");
        assert_eq!(
            outcome.artifacts,
            vec![
                gen.join("foo.gen.cpp"),
                gen.join("bar.gen.cpp"),
                gen.join("demo.lib.cpp")
            ]
        );
        assert_eq!(outcome.docs, None);
        assert_eq!(outcome.entry_symbol, "demo_library_init");
        assert_eq!(runner.inputs.borrow().len(), 2);
        assert!(gen.join("demo.lib.cpp").is_file());
    }

    #[test]
    fn test_generate_all_collects_docs_in_input_order() {
        let temp = TempDir::new().unwrap();
        let mut job = job_in(&temp, &["foo.h", "bar.h"]);
        let docdir = temp.path().join("docs");
        job.documentation = DocMode::Directory(docdir.clone());
        let runner = FakeClang {
            inputs: RefCell::new(Vec::new()),
        };

        let outcome = generate_all(&runner, &job).unwrap();
        assert_eq!(
            outcome.docs,
            Some(vec![docdir.join("FOO.xml"), docdir.join("BAR.xml")])
        );
        assert!(docdir.is_dir());
    }

    #[test]
    fn test_missing_destination_without_create_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let mut job = job_in(&temp, &["foo.h"]);
        job.create_folders = false;
        let runner = FakeClang {
            inputs: RefCell::new(Vec::new()),
        };

        let err = generate_all(&runner, &job).unwrap_err();
        assert!(matches!(err, ExportError::DirectoryMissing { .. }));
        assert!(runner.inputs.borrow().is_empty());
        assert!(!temp.path().join("gen").exists());
    }
}
