//! Grouping annotated declarations by requested trait.

use crate::annotation::Annotation;
use deriving::{Declaration, GeneratorArgs};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Files and names requesting one trait across the package.
///
/// Both sets are deduplicated independently and kept sorted, so a file that
/// contributes several declarations appears once, and so does a name declared
/// in several files.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TraitGroup {
    pub files: BTreeSet<PathBuf>,
    pub names: BTreeSet<String>,
}

impl TraitGroup {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The generator arguments for this group.
    pub fn to_args(&self, pkg: &str) -> GeneratorArgs {
        GeneratorArgs::new(pkg, self.files.iter().cloned(), self.names.iter().cloned())
    }
}

/// Trait groups for a whole package, keyed by trait name.
#[derive(Debug, Default, Clone)]
pub struct TraitGroups {
    groups: BTreeMap<String, TraitGroup>,
    annotated: usize,
}

impl TraitGroups {
    /// Build groups from every declaration of a package.
    ///
    /// Declarations without an annotation are ignored.
    pub fn build(declarations: &[Declaration]) -> Self {
        let mut groups = Self::default();

        for decl in declarations {
            let Some(annotation) = Annotation::parse(decl.docs.as_deref()) else {
                continue;
            };
            groups.annotated += 1;

            tracing::trace!(
                name = %decl.name,
                file = %decl.file.display(),
                line = decl.location.line,
                traits = ?annotation.traits,
                "Annotated declaration"
            );

            for trait_name in annotation.traits {
                let group = groups.groups.entry(trait_name).or_default();
                group.files.insert(decl.file.clone());
                group.names.insert(decl.name.clone());
            }
        }

        groups
    }

    /// Group for a trait, if any declaration requested it.
    pub fn get(&self, trait_name: &str) -> Option<&TraitGroup> {
        self.groups.get(trait_name).filter(|group| !group.is_empty())
    }

    /// All groups, sorted by trait name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TraitGroup)> {
        self.groups.iter().map(|(name, group)| (name.as_str(), group))
    }

    /// Number of declarations that carried an annotation.
    pub fn annotated(&self) -> usize {
        self.annotated
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use deriving::collect_declarations;
    use proptest::prelude::*;
    use std::path::Path;

    fn arb_type_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{0,8}".prop_filter("keyword", |name| name != "Self")
    }

    proptest! {
        /// A group holds each file and each name exactly once, sorted, no
        /// matter how often they repeat across the package.
        #[test]
        fn prop_groups_are_deduplicated_and_sorted(
            placements in proptest::collection::vec((0usize..3, arb_type_name()), 1..12),
        ) {
            let mut declarations = Vec::new();
            for (file, name) in &placements {
                let code = format!("/// [deriving(Unique)]\npub struct {name}(pub Vec<i32>);");
                let syntax = syn::parse_file(&code).unwrap();
                let path = format!("f{file}.rs");
                declarations.extend(collect_declarations(&syntax, Path::new(&path), None));
            }

            let groups = TraitGroups::build(&declarations);
            let group = groups.get("Unique").unwrap();

            let expected_files: BTreeSet<PathBuf> = placements
                .iter()
                .map(|(file, _)| PathBuf::from(format!("f{file}.rs")))
                .collect();
            let expected_names: BTreeSet<String> =
                placements.iter().map(|(_, name)| name.clone()).collect();

            prop_assert_eq!(groups.annotated(), placements.len());
            prop_assert_eq!(&group.files, &expected_files);
            prop_assert_eq!(&group.names, &expected_names);

            let args = group.to_args("p").to_command_args();
            prop_assert_eq!(args[5].split(',').count(), expected_names.len());
        }
    }
}
