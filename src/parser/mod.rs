//! Lexing and parsing for the C# subset.
//!
//! The lexer is Logos-generated; the parser is a hand-written recursive
//! descent with panic-mode recovery (resynchronize at `;` / `}`), so a
//! malformed program still yields a partial tree.

pub mod keywords;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;

pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::parse;
