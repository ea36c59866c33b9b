//! Syntax trees for the C# subset.
//!
//! The AST is independent of the type system: every node records only names
//! and a byte-offset [`TextRange`](crate::base::TextRange). Trees are
//! immutable snapshots; an edit produces a new tree rather than patching the
//! old one in place.

pub mod ast;

mod parse_result;

pub use parse_result::{ParseError, ParseResult};
