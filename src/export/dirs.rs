//! Output folder resolution.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ExportError, Result};

/// Resolve an output folder, creating it when allowed.
///
/// `desc` names the folder's role ("destination", "documentation") in
/// errors. Returns `None` when no folder was given.
pub fn dest_folder(
    folder: Option<&Path>,
    create_folders: bool,
    desc: &'static str,
) -> Result<Option<PathBuf>> {
    let folder = match folder {
        Some(f) if !f.as_os_str().is_empty() => f,
        _ => return Ok(None),
    };

    if !folder.exists() {
        if !create_folders {
            return Err(ExportError::DirectoryMissing {
                desc,
                path: folder.to_path_buf(),
            });
        }
        fs::create_dir_all(folder).map_err(|source| ExportError::DirectoryCreation {
            desc,
            path: folder.to_path_buf(),
            source,
        })?;
        tracing::debug!(folder = %folder.display(), desc, "created folder");
    } else if !folder.is_dir() {
        return Err(ExportError::NotADirectory {
            desc,
            path: folder.to_path_buf(),
        });
    }

    Ok(Some(folder.to_path_buf()))
}
