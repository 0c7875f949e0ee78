//! Argument vectors for clang invocations.
//!
//! The builder produces a template once per job. The trailing slots
//! (output then input for generation, input alone for name-only queries)
//! are overwritten per file through [`ToolInvocation::bind`] /
//! [`NameQuery::bind`]. Binding is the only way to reach the argument
//! vector for execution, so the placeholders can never be run unfilled.
//!
//! Arguments are kept as `OsString` so paths reach clang byte for byte.

use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Name the analysis plugin registers itself under in clang.
pub const PLUGIN_NAME: &str = "gdexport";

/// Language standard the headers are parsed with.
pub const LANGUAGE_STANDARD: &str = "-std=c++17";

/// Builds argument templates for the analysis tool.
#[derive(Debug, Clone)]
pub struct InvocationBuilder {
    tool: OsString,
    plugin: OsString,
    system_includes: Vec<OsString>,
    includes: Vec<OsString>,
    documentation: Option<OsString>,
    extra_args: Vec<OsString>,
}

impl InvocationBuilder {
    /// Start a builder for `tool` loading the plugin library at `plugin`.
    pub fn new(tool: impl Into<OsString>, plugin: &Path) -> Self {
        Self {
            tool: tool.into(),
            plugin: plugin.as_os_str().to_os_string(),
            system_includes: Vec::new(),
            includes: Vec::new(),
            documentation: None,
            extra_args: Vec::new(),
        }
    }

    /// Append `-isystem` paths, preserving order.
    pub fn system_includes<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.system_includes
            .extend(paths.into_iter().map(|p| p.as_ref().as_os_str().to_os_string()));
        self
    }

    /// Append `-I` paths, preserving order.
    pub fn includes<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.includes
            .extend(paths.into_iter().map(|p| p.as_ref().as_os_str().to_os_string()));
        self
    }

    /// Request XML documentation into `dir`. Ignored by name-only queries.
    pub fn documentation(mut self, dir: Option<&Path>) -> Self {
        self.documentation = dir.map(|d| d.as_os_str().to_os_string());
        self
    }

    /// Raw arguments forwarded to the clang frontend, in order.
    pub fn extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.extra_args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    fn common_prefix(&self) -> Vec<OsString> {
        let mut plugin_flag = OsString::from("-fplugin=");
        plugin_flag.push(&self.plugin);
        let mut args = vec![
            self.tool.clone(),
            "-fsyntax-only".into(),
            "-Xclang".into(),
            LANGUAGE_STANDARD.into(),
            plugin_flag,
        ];
        for inc in &self.system_includes {
            push_frontend(&mut args, "-isystem");
            push_frontend(&mut args, inc);
        }
        for inc in &self.includes {
            push_frontend(&mut args, "-I");
            push_frontend(&mut args, inc);
        }
        for extra in &self.extra_args {
            push_frontend(&mut args, extra);
        }
        args
    }

    /// Template for code generation: ends with the output and input slots.
    pub fn build(&self) -> ToolInvocation {
        let mut args = self.common_prefix();
        if let Some(doc) = &self.documentation {
            push_plugin_arg(&mut args, "-doc");
            push_plugin_arg(&mut args, doc);
        }
        push_plugin_arg(&mut args, "-out");
        push_plugin_arg(&mut args, "");
        args.push(OsString::new());
        ToolInvocation { args }
    }

    /// Template for a name-only query: ends with the input slot.
    pub fn build_name_only(&self) -> NameQuery {
        let mut args = self.common_prefix();
        push_plugin_arg(&mut args, "-nameonly");
        args.push(OsString::new());
        NameQuery { args }
    }
}

fn push_frontend(args: &mut Vec<OsString>, value: impl AsRef<OsStr>) {
    args.push("-Xclang".into());
    args.push(value.as_ref().to_os_string());
}

fn push_plugin_arg(args: &mut Vec<OsString>, value: impl AsRef<OsStr>) {
    push_frontend(args, format!("-plugin-arg-{}", PLUGIN_NAME));
    push_frontend(args, value);
}

/// Reusable generation template. The last two elements are the output
/// and input slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    args: Vec<OsString>,
}

impl ToolInvocation {
    /// Full template including the (possibly stale) slots.
    pub fn template(&self) -> &[OsString] {
        &self.args
    }

    /// Overwrite both trailing slots and borrow the ready argument vector.
    pub fn bind<'a>(&'a mut self, output: &'a Path, input: &Path) -> BoundGeneration<'a> {
        let n = self.args.len();
        self.args[n - 2] = output.as_os_str().to_os_string();
        self.args[n - 1] = input.as_os_str().to_os_string();
        BoundGeneration {
            invocation: BoundInvocation {
                argv: &self.args,
                output: Some(output),
            },
            output,
        }
    }
}

/// Reusable name-only template. The last element is the input slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery {
    args: Vec<OsString>,
}

impl NameQuery {
    pub fn template(&self) -> &[OsString] {
        &self.args
    }

    /// Overwrite the input slot and borrow the ready argument vector.
    pub fn bind(&mut self, input: &Path) -> BoundInvocation<'_> {
        let n = self.args.len();
        self.args[n - 1] = input.as_os_str().to_os_string();
        BoundInvocation {
            argv: &self.args,
            output: None,
        }
    }
}

/// A fully populated argument vector, ready to execute.
#[derive(Debug, Clone, Copy)]
pub struct BoundInvocation<'a> {
    argv: &'a [OsString],
    output: Option<&'a Path>,
}

impl<'a> BoundInvocation<'a> {
    /// Executable to launch.
    pub fn program(&self) -> &'a OsStr {
        &self.argv[0]
    }

    /// Arguments after the executable.
    pub fn args(&self) -> &'a [OsString] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &'a [OsString] {
        self.argv
    }

    /// Path the plugin writes generated code to, for generation runs.
    pub fn output(&self) -> Option<&'a Path> {
        self.output
    }

    /// Header being analysed.
    pub fn input(&self) -> &'a Path {
        Path::new(&self.argv[self.argv.len() - 1])
    }
}

/// A bound generation run; unlike a name-only query it always has an
/// output file.
#[derive(Debug, Clone, Copy)]
pub struct BoundGeneration<'a> {
    invocation: BoundInvocation<'a>,
    output: &'a Path,
}

impl<'a> BoundGeneration<'a> {
    pub fn invocation(&self) -> &BoundInvocation<'a> {
        &self.invocation
    }

    /// Generated source file.
    pub fn output(&self) -> &'a Path {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(args: &[OsString], value: &str) -> usize {
        args.iter()
            .position(|a| a == value)
            .unwrap_or_else(|| panic!("{} not in {:?}", value, args))
    }

    #[test]
    fn test_prefix_layout() {
        let inv = InvocationBuilder::new("clang", Path::new("/lib/libgdexport.so")).build();
        let args = inv.template();
        assert_eq!(
            &args[..5],
            &[
                "clang",
                "-fsyntax-only",
                "-Xclang",
                "-std=c++17",
                "-fplugin=/lib/libgdexport.so"
            ]
        );
    }

    #[test]
    fn test_include_order_is_preserved() {
        let inv = InvocationBuilder::new("clang", Path::new("p.so"))
            .system_includes(["A", "B"])
            .includes(["C"])
            .build();
        let args = inv.template();
        let a = position(args, "A");
        let b = position(args, "B");
        let c = position(args, "C");
        assert!(a < b && b < c);
        assert_eq!(args[a - 1], "-Xclang");
        assert_eq!(args[a - 2], "-isystem");
        assert_eq!(args[c - 2], "-I");
    }

    #[test]
    fn test_extra_args_follow_includes() {
        let inv = InvocationBuilder::new("clang", Path::new("p.so"))
            .includes(["inc"])
            .extra_args(["-DFOO=1", "-Wall"])
            .build();
        let args = inv.template();
        let inc = position(args, "inc");
        let foo = position(args, "-DFOO=1");
        let wall = position(args, "-Wall");
        assert!(inc < foo && foo < wall);
        assert_eq!(args[foo - 1], "-Xclang");
        assert_eq!(args[wall - 1], "-Xclang");
    }

    #[test]
    fn test_documentation_flags_precede_output_flag() {
        let inv = InvocationBuilder::new("clang", Path::new("p.so"))
            .documentation(Some(Path::new("docs")))
            .build();
        let args = inv.template();
        let doc = position(args, "-doc");
        let dir = position(args, "docs");
        let out = position(args, "-out");
        assert!(doc < dir && dir < out);
        assert_eq!(args[doc - 2], "-plugin-arg-gdexport");
        assert_eq!(args[dir - 2], "-plugin-arg-gdexport");
    }

    #[test]
    fn test_no_documentation_flags_when_disabled() {
        let inv = InvocationBuilder::new("clang", Path::new("p.so")).build();
        assert!(!inv.template().iter().any(|a| a == "-doc"));
    }

    #[test]
    fn test_trailing_slots_are_last_two() {
        for n in 0..4 {
            let incs: Vec<String> = (0..n).map(|i| format!("inc{}", i)).collect();
            let mut inv = InvocationBuilder::new("clang", Path::new("p.so"))
                .system_includes(&incs)
                .includes(&incs)
                .extra_args(&incs)
                .documentation(Some(Path::new("docs")))
                .build();
            let len = inv.template().len();
            assert_eq!(inv.template()[len - 1], "");
            assert_eq!(inv.template()[len - 2], "");
            assert_eq!(inv.template()[len - 3], "-Xclang");

            let bound = inv.bind(Path::new("out/foo.gen.cpp"), Path::new("foo.h"));
            assert_eq!(bound.output(), Path::new("out/foo.gen.cpp"));
            let argv = bound.invocation().argv();
            assert_eq!(argv.len(), len);
            assert_eq!(argv[len - 2], "out/foo.gen.cpp");
            assert_eq!(argv[len - 1], "foo.h");
            assert_eq!(bound.invocation().input(), Path::new("foo.h"));
            assert_eq!(bound.invocation().output(), Some(Path::new("out/foo.gen.cpp")));
        }
    }

    #[test]
    fn test_rebinding_overwrites_both_slots() {
        let mut inv = InvocationBuilder::new("clang", Path::new("p.so")).build();
        inv.bind(Path::new("a.gen.cpp"), Path::new("a.h"));
        let bound = inv.bind(Path::new("b.gen.cpp"), Path::new("b.h"));
        let argv = bound.invocation().argv();
        assert_eq!(&argv[argv.len() - 2..], &["b.gen.cpp", "b.h"]);
        assert!(!argv.iter().any(|a| a == "a.h" || a == "a.gen.cpp"));
        assert_eq!(bound.output(), Path::new("b.gen.cpp"));
    }

    #[test]
    fn test_name_only_query() {
        let mut query = InvocationBuilder::new("clang", Path::new("p.so"))
            .documentation(Some(Path::new("docs")))
            .build_name_only();
        let args = query.template();
        assert!(args.iter().any(|a| a == "-nameonly"));
        assert!(!args.iter().any(|a| a == "-doc" || a == "-out"));

        let bound = query.bind(Path::new("foo.h"));
        assert_eq!(bound.input(), Path::new("foo.h"));
        assert_eq!(bound.output(), None);
        assert_eq!(bound.program(), "clang");
        assert_eq!(bound.args()[0], "-fsyntax-only");
    }

    #[cfg(unix)]
    #[test]
    fn test_paths_are_passed_byte_for_byte() {
        use std::os::unix::ffi::OsStrExt;

        let header = Path::new(OsStr::from_bytes(b"w\xffidget.h"));
        let include = Path::new(OsStr::from_bytes(b"inc\xfe"));
        let plugin = Path::new(OsStr::from_bytes(b"lib\xfd.so"));
        let mut inv = InvocationBuilder::new("clang", plugin)
            .includes([include])
            .build();
        assert!(inv.template().iter().any(|a| a.as_os_str() == include.as_os_str()));
        assert_eq!(inv.template()[4].as_bytes(), b"-fplugin=lib\xfd.so");

        let out = Path::new(OsStr::from_bytes(b"w\xffidget.gen.cpp"));
        let bound = inv.bind(out, header);
        assert_eq!(bound.invocation().input(), header);
        let argv = bound.invocation().argv();
        assert_eq!(argv[argv.len() - 2].as_bytes(), b"w\xffidget.gen.cpp");
    }
}
