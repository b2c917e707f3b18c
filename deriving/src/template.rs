//! Text templating for code fragments.
//!
//! Templates use [`tera`] syntax with autoescaping disabled, so
//! `{{ element }}` renders `Vec<u8>` verbatim. Any parse or render failure is
//! an error; nothing is appended to the output in that case.

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::DeriveResult;

/// Render `template` with `data` and append the result to `out`.
///
/// Leading and trailing whitespace of the template is trimmed, so templates
/// can be written as indented raw strings.
///
/// ```
/// use deriving::template::render_template;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Data { name: &'static str }
///
/// let mut out = String::new();
/// render_template(&mut out, "impl {{ name }} {}", &Data { name: "Integers" }).unwrap();
/// assert_eq!(out, "impl Integers {}");
/// ```
pub fn render_template<T: Serialize>(out: &mut String, template: &str, data: &T) -> DeriveResult<()> {
    let context = Context::from_serialize(data)?;
    let rendered = Tera::one_off(template.trim(), &context, false)?;
    out.push_str(&rendered);
    Ok(())
}

/// Re-render a type expression as formatted source text.
pub fn type_to_string(ty: &syn::Type) -> String {
    let file: syn::File = syn::parse_quote! {
        type __Rendered = #ty;
    };
    let formatted = prettyplease::unparse(&file);
    formatted
        .trim()
        .strip_prefix("type __Rendered = ")
        .and_then(|rest| rest.strip_suffix(';'))
        .map(str::to_string)
        .unwrap_or_else(|| quote::quote!(#ty).to_string())
}
