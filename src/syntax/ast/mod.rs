//! Typed AST for the C# subset.
//!
//! Split by node family:
//! - [`decls`] — compilation units, usings, namespaces, types, members
//! - [`stmts`] — statements and blocks
//! - [`exprs`] — expressions
//!
//! Every node carries the `TextRange` it was parsed from; resolution locates
//! the smallest node whose range contains the cursor offset.

mod decls;
mod exprs;
mod stmts;

pub use decls::*;
pub use exprs::*;
pub use stmts::*;

use crate::base::{Name, TextRange, TextSize};

/// An identifier with its source range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: Name,
    pub range: TextRange,
}

impl Ident {
    pub fn new(name: impl Into<Name>, range: TextRange) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    // End-inclusive: an editor caret sits between characters, so the offset
    // just past the last character still addresses this identifier.
    pub fn contains(&self, offset: TextSize) -> bool {
        self.range.contains_inclusive(offset)
    }
}

/// A dot-separated name, e.g. `System.Collections.Generic`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub segments: Vec<Ident>,
    pub range: TextRange,
}

impl QualifiedName {
    /// Join all segments with `.`.
    pub fn dotted(&self) -> String {
        self.dotted_prefix(self.segments.len())
    }

    /// Join the first `len` segments with `.`.
    pub fn dotted_prefix(&self, len: usize) -> String {
        let mut out = String::new();
        for seg in self.segments.iter().take(len) {
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(seg.name.as_str());
        }
        out
    }

    /// Index of the segment containing `offset`, if any.
    pub fn segment_at(&self, offset: TextSize) -> Option<usize> {
        self.segments.iter().position(|seg| seg.contains(offset))
    }
}
