//! The GDExtension entry point translation unit.
//!
//! `<name>.lib.cpp` forward-declares the `initialize_<module>` function the
//! plugin emits for every header, calls them all at scene initialization
//! level, and exposes `<name>_library_init` to Godot.
//!
//! The uninitializer is left empty: classes registered through
//! `ClassDB` are torn down by Godot itself.

use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use super::{dest_folder, entry_point_path};
use crate::error::{ExportError, Result};
use crate::ident;

const INIT_LEVEL: &str = "MODULE_INITIALIZATION_LEVEL_SCENE";

/// Render the entry point source for `name` and `module_ids`.
///
/// Identical inputs always give byte-identical output.
pub fn render_entry_point(name: &str, module_ids: &[String]) -> String {
    let mut out = String::new();
    out.push_str(
        "#include <gdextension_interface.h>\n\
         #include <godot_cpp/core/defs.hpp>\n\
         #include <godot_cpp/godot.hpp>\n\
         \n\
         using namespace godot;\n\
         \n",
    );

    for id in module_ids {
        let _ = writeln!(out, "void initialize_{}();", id);
    }

    let _ = write!(
        out,
        "\n\
         void initialize_{name}_module(ModuleInitializationLevel p_level)\n\
         {{\n\
         \x20   if(p_level != {level})\n\
         \x20   {{\n\
         \x20       return;\n\
         \x20   }}\n",
        name = name,
        level = INIT_LEVEL,
    );
    for id in module_ids {
        let _ = writeln!(out, "    initialize_{}();", id);
    }
    let _ = write!(
        out,
        "}}\n\
         \n\
         void uninitialize_{name}_module(ModuleInitializationLevel p_level)\n\
         {{\n\
         \x20   if(p_level != {level})\n\
         \x20   {{\n\
         \x20       return;\n\
         \x20   }}\n\
         }}\n\
         \n\
         extern \"C\"\n\
         {{\n\
         GDExtensionBool GDE_EXPORT {name}_library_init(\
         GDExtensionInterfaceGetProcAddress p_get_proc_address, \
         const GDExtensionClassLibraryPtr p_library, \
         GDExtensionInitialization *r_initialization)\n\
         {{\n\
         \x20   godot::GDExtensionBinding::InitObject init_obj(p_get_proc_address, p_library, r_initialization);\n\
         \x20   init_obj.register_initializer(initialize_{name}_module);\n\
         \x20   init_obj.register_terminator(uninitialize_{name}_module);\n\
         \x20   init_obj.set_minimum_library_initialization_level({level});\n\
         \x20   return init_obj.init();\n\
         }}\n\
         }}\n",
        name = name,
        level = INIT_LEVEL,
    );
    out
}

/// Write the entry point for `name` and `module_ids` to `output`.
///
/// The file is written to a temporary sibling and renamed into place, so
/// `output` is either absent, the previous version, or complete. It gets
/// the permissions of the file it replaces, or the umask default.
pub fn synthesize(name: &str, module_ids: &[String], output: &Path) -> Result<String> {
    let symbol = ident::entry_point_name(name)?;
    let source = render_entry_point(name, module_ids);

    let write_err = |source: std::io::Error| ExportError::OutputWrite {
        path: output.to_path_buf(),
        source,
    };
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    // Created like any other output file, so the umask applies.
    let mut tmp = tempfile::Builder::new()
        .prefix(".gdexport")
        .make_in(&dir, |path| fs::File::create(path))
        .map_err(write_err)?;
    tmp.write_all(source.as_bytes()).map_err(write_err)?;
    if let Ok(existing) = fs::metadata(output) {
        fs::set_permissions(tmp.path(), existing.permissions()).map_err(write_err)?;
    }
    tmp.persist(output).map_err(|e| write_err(e.error))?;

    tracing::debug!(output = %output.display(), modules = module_ids.len(), "wrote entry point");
    Ok(symbol)
}

/// Generate only the entry point for the headers in `files`.
///
/// `output` defaults to `<name>.lib.cpp` in `destination` (or the working
/// directory). The headers need not exist yet. Returns the entry symbol.
pub fn entry_point(
    name: &str,
    files: &[PathBuf],
    output: Option<&Path>,
    destination: Option<&Path>,
    create_folders: bool,
) -> Result<String> {
    if !ident::validate_name(name) {
        return Err(ExportError::InvalidIdentifier(name.to_string()));
    }
    if files.is_empty() {
        return Err(ExportError::NoInputFiles);
    }
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let dest = dest_folder(destination, create_folders, "destination")?;
            entry_point_path(name, dest.as_deref())
        }
    };
    let ids: Vec<String> = files.iter().map(|f| ident::module_identifier(f)).collect();
    synthesize(name, &ids, &output)
}
