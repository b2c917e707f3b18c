//! Declarations found in Rust source files.
//!
//! A declaration is a named type definition or function. Declarations are
//! collected with a [`syn::visit::Visit`] walker that only descends through
//! inline `mod` blocks: items inside function bodies, impls, and traits are
//! never declarations, and a declaration is a leaf once it has been recorded.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use syn::visit::{self, Visit};
use syn::{
    Attribute, Expr, Ident, Item, ItemEnum, ItemFn, ItemMod, ItemStruct, ItemType, ItemUnion, Lit,
    Meta,
};

/// Source position of a declaration's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: usize,

    /// Column number (1-indexed).
    pub column: usize,
}

/// A named type definition or function, with its documentation.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Identifier of the declaration.
    pub name: String,

    /// File the declaration was parsed from.
    pub file: PathBuf,

    /// Names of the inline modules enclosing the declaration, outermost first.
    pub module_path: Vec<String>,

    /// Position of the declaration's identifier.
    pub location: SourceLocation,

    /// Doc comment lines joined with newlines, if any.
    pub docs: Option<String>,

    /// The syntax node itself.
    pub node: DeclNode,
}

/// The closed set of declaration kinds.
#[derive(Debug, Clone)]
pub enum DeclNode {
    /// A type definition.
    Type(TypeDef),
    /// A free function.
    Function(ItemFn),
}

/// The kinds of type definition.
#[derive(Debug, Clone)]
pub enum TypeDef {
    Struct(ItemStruct),
    Enum(ItemEnum),
    Union(ItemUnion),
    Alias(ItemType),
}

impl DeclNode {
    /// Build a declaration node from an item, if the item is a declaration.
    pub fn from_item(item: &Item) -> Option<Self> {
        match item {
            Item::Struct(s) => Some(Self::Type(TypeDef::Struct(s.clone()))),
            Item::Enum(e) => Some(Self::Type(TypeDef::Enum(e.clone()))),
            Item::Union(u) => Some(Self::Type(TypeDef::Union(u.clone()))),
            Item::Type(t) => Some(Self::Type(TypeDef::Alias(t.clone()))),
            Item::Fn(f) => Some(Self::Function(f.clone())),
            _ => None,
        }
    }

    /// Identifier of the declaration.
    pub fn ident(&self) -> &Ident {
        match self {
            Self::Type(def) => def.ident(),
            Self::Function(f) => &f.sig.ident,
        }
    }

    /// Attributes attached to the declaration, doc comments included.
    pub fn attrs(&self) -> &[Attribute] {
        match self {
            Self::Type(def) => def.attrs(),
            Self::Function(f) => &f.attrs,
        }
    }

    /// The type definition, if this is one.
    pub fn as_type(&self) -> Option<&TypeDef> {
        match self {
            Self::Type(def) => Some(def),
            Self::Function(_) => None,
        }
    }
}

impl TypeDef {
    pub fn ident(&self) -> &Ident {
        match self {
            Self::Struct(s) => &s.ident,
            Self::Enum(e) => &e.ident,
            Self::Union(u) => &u.ident,
            Self::Alias(t) => &t.ident,
        }
    }

    pub fn attrs(&self) -> &[Attribute] {
        match self {
            Self::Struct(s) => &s.attrs,
            Self::Enum(e) => &e.attrs,
            Self::Union(u) => &u.attrs,
            Self::Alias(t) => &t.attrs,
        }
    }

    pub fn generics(&self) -> &syn::Generics {
        match self {
            Self::Struct(s) => &s.generics,
            Self::Enum(e) => &e.generics,
            Self::Union(u) => &u.generics,
            Self::Alias(t) => &t.generics,
        }
    }
}

impl Declaration {
    /// Path of the declaration relative to its file, e.g. `inner::Integers`.
    pub fn qualified_name(&self) -> String {
        let mut segments = self.module_path.clone();
        segments.push(self.name.clone());
        segments.join("::")
    }
}

/// Collect declarations from a parsed file.
///
/// With `names` set, only declarations whose identifier is in the set are
/// kept; otherwise every declaration is returned. Order follows the source.
pub fn collect_declarations(
    file: &syn::File,
    path: &Path,
    names: Option<&HashSet<String>>,
) -> Vec<Declaration> {
    let mut collector = DeclarationCollector {
        path,
        names,
        module_path: Vec::new(),
        found: Vec::new(),
    };
    collector.visit_file(file);
    collector.found
}

/// Concatenate `#[doc]` attribute values, one line per attribute.
///
/// Returns `None` when the item carries no doc comment at all.
pub fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(s) => Some(s.value()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

struct DeclarationCollector<'a> {
    path: &'a Path,
    names: Option<&'a HashSet<String>>,
    module_path: Vec<String>,
    found: Vec<Declaration>,
}

impl DeclarationCollector<'_> {
    fn wants(&self, name: &str) -> bool {
        self.names.map_or(true, |names| names.contains(name))
    }
}

impl<'ast> Visit<'ast> for DeclarationCollector<'_> {
    fn visit_item(&mut self, item: &'ast Item) {
        if let Item::Mod(module) = item {
            self.visit_item_mod(module);
            return;
        }

        let name = match item {
            Item::Struct(s) => &s.ident,
            Item::Enum(e) => &e.ident,
            Item::Union(u) => &u.ident,
            Item::Type(t) => &t.ident,
            Item::Fn(f) => &f.sig.ident,
            _ => return,
        };
        if !self.wants(&name.to_string()) {
            return;
        }

        // Matched: record and stop here.
        if let Some(node) = DeclNode::from_item(item) {
            let start = node.ident().span().start();
            self.found.push(Declaration {
                name: name.to_string(),
                file: self.path.to_path_buf(),
                module_path: self.module_path.clone(),
                location: SourceLocation {
                    line: start.line,
                    column: start.column + 1,
                },
                docs: doc_text(node.attrs()),
                node,
            });
        }
    }

    fn visit_item_mod(&mut self, module: &'ast ItemMod) {
        // Out-of-line `mod foo;` has no content to walk.
        if module.content.is_none() {
            return;
        }
        self.module_path.push(module.ident.to_string());
        visit::visit_item_mod(self, module);
        self.module_path.pop();
    }
}
