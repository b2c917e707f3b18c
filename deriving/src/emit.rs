//! Assembling generated code from per-target fragments.

use std::path::Path;

use crate::decl::Declaration;
use crate::error::DeriveResult;
use crate::targets::Targets;
use crate::writer::{OutputWriter, WriteResult};

/// A generator for one trait.
///
/// Implement this to add a new trait: the orchestrator only needs a program
/// that calls [`crate::run`] with the implementation.
///
/// # Example
///
/// ```rust,ignore
/// struct Display;
///
/// impl Generator for Display {
///     fn trait_name(&self) -> &'static str { "Display" }
///     fn output_file(&self) -> &'static str { "display_gen.rs" }
///
///     fn render(&self, out: &mut String, target: &Declaration) -> DeriveResult<()> {
///         render_template(out, DISPLAY_TEMPLATE, &Data::from(target))
///     }
/// }
/// ```
pub trait Generator {
    /// Name of the trait this generator derives.
    fn trait_name(&self) -> &'static str;

    /// Path of the file the generator owns, relative to the package directory.
    fn output_file(&self) -> &'static str;

    /// Render the fragment for one target into `out`.
    fn render(&self, out: &mut String, target: &Declaration) -> DeriveResult<()>;
}

/// Header placed once at the top of every generated file.
pub fn package_header(pkg: &str) -> String {
    format!("//! Derived code for package `{pkg}`. Regenerated on every run; do not edit.\n\nuse super::*;\n")
}

impl Targets {
    /// Render every target into one source unit.
    ///
    /// The unit starts with [`package_header`] and separates fragments with
    /// a blank line. The first renderer error aborts the whole unit.
    pub fn render_each<F>(&self, mut render: F) -> DeriveResult<String>
    where
        F: FnMut(&mut String, &Declaration) -> DeriveResult<()>,
    {
        let mut buf = package_header(&self.pkg);
        for node in &self.nodes {
            buf.push('\n');
            render(&mut buf, node)?;
            buf.push('\n');
        }
        Ok(buf)
    }

    /// Run a [`Generator`] over the targets and write its output file.
    pub fn generate<G: Generator>(
        &self,
        generator: &G,
        writer: &OutputWriter,
    ) -> DeriveResult<WriteResult> {
        let content = self.render_each(|out, target| generator.render(out, target))?;
        writer.write(Path::new(generator.output_file()), &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::GeneratorArgs;
    use crate::error::{ensure, DeriveError};
    use std::fs;
    use tempfile::TempDir;

    fn targets(dir: &TempDir, code: &str, names: &[&str]) -> Targets {
        let path = dir.path().join("lib.rs");
        fs::write(&path, code).unwrap();
        Targets::from_args(GeneratorArgs::new(
            "examples",
            [path],
            names.iter().map(|n| n.to_string()),
        ))
        .unwrap()
    }

    #[test]
    fn test_render_each_layout() {
        let dir = TempDir::new().unwrap();
        let targets = targets(&dir, "struct A;\nstruct B;\n", &["A", "B"]);

        let out = targets
            .render_each(|out, target| {
                out.push_str(&format!("impl {} {{}}", target.name));
                Ok(())
            })
            .unwrap();

        let expected = format!("{}\nimpl A {{}}\n\nimpl B {{}}\n", package_header("examples"));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_error_aborts() {
        let dir = TempDir::new().unwrap();
        let targets = targets(&dir, "fn not_a_type() {}\n", &["not_a_type"]);

        let result = targets.render_each(|_, target| {
            ensure(target.node.as_type().is_some(), &target.name, "expected a type")
        });

        assert!(matches!(result, Err(DeriveError::Shape { .. })));
    }

    struct Marker;

    impl Generator for Marker {
        fn trait_name(&self) -> &'static str {
            "Marker"
        }

        fn output_file(&self) -> &'static str {
            "marker_gen.rs"
        }

        fn render(&self, out: &mut String, target: &Declaration) -> DeriveResult<()> {
            out.push_str(&format!("impl   {}{{ fn  ok(&self)->bool{{true}} }}", target.name));
            Ok(())
        }
    }

    #[test]
    fn test_generate_formats_output() {
        let dir = TempDir::new().unwrap();
        let targets = targets(&dir, "struct A;\n", &["A"]);

        let result = targets.generate(&Marker, &OutputWriter::new(true)).unwrap();

        let WriteResult::DryRun { content, path } = result else {
            panic!("expected a dry run");
        };
        assert_eq!(path, Path::new("marker_gen.rs"));
        assert!(content.starts_with("//! Derived code for package `examples`."));
        assert!(content.contains("use super::*;"));
        assert!(content.contains("impl A {\n    fn ok(&self) -> bool {\n        true\n    }\n}"));
    }
}
