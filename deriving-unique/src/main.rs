//! # deriving-unique
//!
//! Generator for the `Unique` trait. For every tuple newtype over a `Vec<T>`
//! or `Box<[T]>` it emits a `unique` method that drops repeated elements,
//! keeping the first occurrence of each.
//!
//! ```rust,ignore
//! /// [deriving(Unique)]
//! pub struct Integers(pub Vec<i32>);
//!
//! mod unique_gen;
//! ```

use std::process::ExitCode;

use deriving::{
    ensure, render_template, type_to_string, Declaration, DeriveError, DeriveResult, Generator,
    TypeDef,
};
use serde::Serialize;
use syn::{Fields, GenericArgument, PathArguments, Type};

const TEMPLATE: &str = r#"
impl {{ type_name }} {
    /// Returns a copy without repeated elements, keeping the first occurrence of each.
    pub fn unique(&self) -> Self {
        let mut seen = ::std::collections::HashSet::new();
        let mut result: ::std::vec::Vec<{{ element }}> = ::std::vec::Vec::with_capacity(self.0.len());
        for item in self.0.iter() {
            if seen.insert(item) {
                result.push(::std::clone::Clone::clone(item));
            }
        }
        Self(result.into())
    }
}
"#;

#[derive(Debug, Serialize)]
struct Data {
    type_name: String,
    element: String,
}

struct Unique;

impl Generator for Unique {
    fn trait_name(&self) -> &'static str {
        "Unique"
    }

    fn output_file(&self) -> &'static str {
        "unique_gen.rs"
    }

    fn render(&self, out: &mut String, target: &Declaration) -> DeriveResult<()> {
        let data = Data {
            type_name: target.qualified_name(),
            element: element_type(target)?,
        };
        render_template(out, TEMPLATE, &data)
    }
}

/// Element type of the collection a newtype wraps, as source text.
fn element_type(target: &Declaration) -> DeriveResult<String> {
    let def = target.node.as_type().ok_or_else(|| {
        DeriveError::shape(&target.name, "Cannot derive `Unique` for non-type declarations")
    })?;
    ensure(
        def.generics().params.is_empty(),
        &target.name,
        "Cannot derive `Unique` for generic types",
    )?;

    let wrapped = match def {
        TypeDef::Struct(s) => match &s.fields {
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => Some(&fields.unnamed[0].ty),
            _ => None,
        },
        _ => None,
    };

    wrapped
        .and_then(collection_element)
        .map(type_to_string)
        .ok_or_else(|| {
            DeriveError::shape(&target.name, "Cannot derive `Unique` for non-Vec/non-slice types")
        })
}

/// `T` for `Vec<T>` and `Box<[T]>`.
fn collection_element(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }

    let last = path.path.segments.last()?;
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    let inner = match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => inner,
        _ => return None,
    };

    if last.ident == "Vec" {
        Some(inner)
    } else if last.ident == "Box" {
        match inner {
            Type::Slice(slice) => Some(&slice.elem),
            _ => None,
        }
    } else {
        None
    }
}

fn main() -> ExitCode {
    deriving::run(Unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    fn declaration(code: &str) -> Declaration {
        let file = syn::parse_file(code).unwrap();
        let mut decls =
            deriving::collect_declarations(&file, Path::new("lib.rs"), None::<&HashSet<String>>);
        decls.remove(0)
    }

    #[test]
    fn test_vec_newtype() {
        let decl = declaration("pub struct Integers(pub Vec<i32>);");
        assert_eq!(element_type(&decl).unwrap(), "i32");
    }

    #[test]
    fn test_boxed_slice_newtype() {
        let decl = declaration("pub struct Names(Box<[String]>);");
        assert_eq!(element_type(&decl).unwrap(), "String");
    }

    #[test]
    fn test_nested_element_type() {
        let decl = declaration("pub struct Pairs(pub std::vec::Vec<(u8, Option<u16>)>);");
        assert_eq!(element_type(&decl).unwrap(), "(u8, Option<u16>)");
    }

    #[test]
    fn test_rejects_named_struct() {
        let decl = declaration("pub struct Point { x: i32, y: i32 }");
        let err = element_type(&decl).unwrap_err();
        assert!(err.to_string().contains("non-Vec/non-slice"));
    }

    #[test]
    fn test_rejects_array_and_alias() {
        let decl = declaration("pub struct Fixed([u8; 4]);");
        assert!(element_type(&decl).is_err());

        let decl = declaration("pub type Alias = Vec<u8>;");
        assert!(element_type(&decl).is_err());
    }

    #[test]
    fn test_rejects_functions() {
        let decl = declaration("fn integers() -> Vec<i32> { Vec::new() }");
        let err = element_type(&decl).unwrap_err();
        assert!(err.to_string().contains("non-type declarations"));
    }

    #[test]
    fn test_rejects_generic_types() {
        let decl = declaration("pub struct Items<T>(Vec<T>);");
        let err = element_type(&decl).unwrap_err();
        assert!(err.to_string().contains("generic types"));
    }

    #[test]
    fn test_render_uses_qualified_name() {
        let file = syn::parse_file("mod inner { pub struct Ids(pub Vec<u64>); }").unwrap();
        let decls =
            deriving::collect_declarations(&file, Path::new("lib.rs"), None::<&HashSet<String>>);

        let mut out = String::new();
        Unique.render(&mut out, &decls[0]).unwrap();

        assert!(out.starts_with("impl inner::Ids {"));
        assert!(out.contains("::std::vec::Vec<u64>"));
    }
}
