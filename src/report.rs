//! Output formatting for export results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for build scripts

use colored::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::export::ExportOutcome;

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report for `generate`.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub name: String,
    pub entry_symbol: String,
    pub sources: Vec<String>,
    pub entry_point: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<Vec<String>>,
}

impl JsonReport {
    pub fn from_outcome(name: &str, outcome: &ExportOutcome) -> Self {
        let (entry_point, sources) = match outcome.artifacts.split_last() {
            Some((last, rest)) => (path_string(last), rest.iter().map(|p| path_string(p)).collect()),
            None => (String::new(), Vec::new()),
        };
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: name.to_string(),
            entry_symbol: outcome.entry_symbol.clone(),
            sources,
            entry_point,
            docs: outcome
                .docs
                .as_ref()
                .map(|docs| docs.iter().map(|p| path_string(p)).collect()),
        }
    }
}

/// JSON report for `list-docs`.
#[derive(Serialize, Deserialize)]
pub struct JsonDocList {
    pub version: String,
    pub docs: Vec<String>,
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Write an export result in JSON format.
pub fn write_json(name: &str, outcome: &ExportOutcome) -> anyhow::Result<()> {
    let report = JsonReport::from_outcome(name, outcome);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

/// Write a documentation listing in JSON format.
pub fn write_doc_list_json(docs: &[PathBuf]) -> anyhow::Result<()> {
    let report = JsonDocList {
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: docs.iter().map(|p| path_string(p)).collect(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write an export result in pretty (human-readable) format.
pub fn write_pretty(name: &str, outcome: &ExportOutcome) {
    println!();
    print!("  ");
    print!("{}", "gdexport".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Extension: ".dimmed());
    println!("{}", name);
    print!("  {}", "Entry symbol: ".dimmed());
    println!("{}", outcome.entry_symbol.bold());
    println!();

    println!("  {} ({})", "Generated sources".bold(), outcome.artifacts.len());
    for path in &outcome.artifacts {
        println!("    {}", path.display());
    }

    if let Some(docs) = &outcome.docs {
        println!();
        println!("  {} ({})", "Documentation".bold(), docs.len());
        for path in docs {
            println!("    {}", path.display());
        }
    }

    println!();
    println!("  {}", "✓ DONE".green());
    println!();
}

/// Write a documentation listing, one path per line.
pub fn write_doc_list(docs: &[PathBuf]) {
    for path in docs {
        println!("{}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_report_splits_entry_point() {
        let outcome = ExportOutcome {
            artifacts: vec![
                PathBuf::from("gen/foo.gen.cpp"),
                PathBuf::from("gen/demo.lib.cpp"),
            ],
            docs: None,
            entry_symbol: "demo_library_init".to_string(),
        };
        let report = JsonReport::from_outcome("demo", &outcome);
        assert_eq!(report.sources, vec!["gen/foo.gen.cpp"]);
        assert_eq!(report.entry_point, "gen/demo.lib.cpp");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["entry_symbol"], "demo_library_init");
        assert!(json.get("docs").is_none());
    }

    #[test]
    fn test_json_report_includes_docs() {
        let outcome = ExportOutcome {
            artifacts: vec![PathBuf::from("demo.lib.cpp")],
            docs: Some(vec![PathBuf::from("doc_classes/Foo.xml")]),
            entry_symbol: "demo_library_init".to_string(),
        };
        let json = serde_json::to_value(JsonReport::from_outcome("demo", &outcome)).unwrap();
        assert_eq!(json["docs"][0], "doc_classes/Foo.xml");
        assert_eq!(json["sources"].as_array().unwrap().len(), 0);
    }
}
