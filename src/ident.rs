//! C++ identifier checks and the names derived from them.

use regex::Regex;
use std::path::Path;

use crate::error::{ExportError, Result};

lazy_static::lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    static ref NON_IDENTIFIER_CHAR: Regex = Regex::new(r"[^A-Za-z0-9_]").unwrap();
}

/// Checks if `name` is usable as an unqualified C++ identifier.
pub fn validate_name(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize(raw: &str) -> String {
    NON_IDENTIFIER_CHAR.replace_all(raw, "_").into_owned()
}

/// Module identifier for an input header: its file stem, sanitized.
///
/// The plugin names the generated registration function
/// `initialize_<id>` using the same rule, so the two must stay in step.
pub fn module_identifier(file: &Path) -> String {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    sanitize(&stem)
}

/// Name of the C++ function generated as the extension's entry point.
pub fn entry_point_name(name: &str) -> Result<String> {
    if !validate_name(name) {
        return Err(ExportError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("{}_library_init", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("MyExt"));
        assert!(validate_name("_ok_1"));
        assert!(validate_name("_"));
        assert!(!validate_name("2bad"));
        assert!(!validate_name("my-ext"));
        assert!(!validate_name(""));
        assert!(!validate_name("has space"));
        assert!(!validate_name("ünicode"));
    }

    #[test]
    fn test_module_identifier_sanitizes_stem() {
        assert_eq!(module_identifier(Path::new("src/my-class.v2.h")), "my_class_v2");
        assert_eq!(module_identifier(Path::new("foo.h")), "foo");
        assert_eq!(module_identifier(Path::new("dir/bar.hpp")), "bar");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize("my-class.v2");
        assert_eq!(once, "my_class_v2");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_entry_point_name() {
        assert_eq!(entry_point_name("demo").unwrap(), "demo_library_init");
        assert!(matches!(
            entry_point_name("not valid"),
            Err(ExportError::InvalidIdentifier(_))
        ));
    }
}
