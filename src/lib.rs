//! # minsharp
//!
//! Semantic resolver core for a C# subset: given source text and a cursor
//! offset, determine what the syntax node at that offset *means* — a type, a
//! local, a namespace, a member, an overload-resolved invocation, or an
//! explicit error.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide      → resolve-at-location façade, AnalysisHost/Analysis snapshots
//!   ↓
//! resolve  → scope builder, resolver, overload resolution, ResolveResult
//!   ↓
//! model    → type system model (namespaces, types, members, conversions)
//!   ↓
//! parser   → Logos lexer, recursive-descent parser
//!   ↓
//! syntax   → AST types with TextRange spans, ParseError/ParseResult
//!   ↓
//! base     → Primitives (Name interning, TextRange)
//! ```

/// Foundation types: Name interning, TextRange
pub mod base;

/// Syntax: AST types with spans, ParseError/ParseResult
pub mod syntax;

/// Parser: Logos lexer, recursive-descent parser
pub mod parser;

/// Type system model: namespaces, types, members, implicit conversions
pub mod model;

/// Resolution: scope reconstruction, name lookup, overload resolution
pub mod resolve;

/// Façade: resolve-at-location, AnalysisHost/Analysis snapshots
pub mod ide;

// Re-export foundation types
pub use base::{Name, TextRange, TextSize};

// Re-export the main entry points
pub use ide::{AnalysisHost, resolve_at_location};
pub use resolve::ResolveResult;
