//! Parsing `[deriving(...)]` annotations out of doc comments.
//!
//! ```text
//! /// A list of integers.
//! /// [deriving(Unique, Display)]
//! pub struct Integers(pub Vec<i32>);
//! ```
//!
//! Only the first matching line of a doc comment counts. Anything after the
//! closing `)]` on that line is ignored.

use regex::Regex;
use std::sync::OnceLock;

/// The reserved annotation tag.
pub const TAG: &str = "deriving";

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // At least one non-space character between the parentheses.
        let source = format!(r"\[{}\(([^)]*[^)\s][^)]*)\)\]", regex::escape(TAG));
        Regex::new(&source).expect("annotation pattern is valid")
    })
}

/// Trait names requested by one declaration, in annotation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub traits: Vec<String>,
}

impl Annotation {
    /// Parse the annotation from a doc comment.
    ///
    /// Returns `None` when there is no doc comment, no line matches, or the
    /// first matching line names no trait at all (`[deriving(,)]`).
    /// Duplicates are kept; empty entries such as the middle of `A,,B` are
    /// dropped.
    pub fn parse(docs: Option<&str>) -> Option<Self> {
        let docs = docs?;
        let captures = docs.lines().find_map(|line| pattern().captures(line))?;

        let traits: Vec<String> = captures[1]
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        (!traits.is_empty()).then_some(Self { traits })
    }
}
