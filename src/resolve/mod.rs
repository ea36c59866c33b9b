//! Resolution: from an offset in a parsed unit to the symbol it refers to.
//!
//! Split along the pipeline:
//! - [`scope_builder`] — one downward walk locating the target node and
//!   collecting everything visible there
//! - [`resolver`] — pure `(target, scope, model)` to result mapping
//! - [`overload`] — candidate applicability and betterness
//! - [`result`] — the [`ResolveResult`] value vocabulary
//!
//! Resolution is deterministic: equal `(source, offset, model)` inputs
//! produce equal results, with no reliance on iteration order of unordered
//! maps.

mod overload;
mod resolver;
mod result;
mod scope;
mod scope_builder;

pub use resolver::resolve;
pub use result::{
    Candidate, ErrorKind, ErrorResolveResult, InvocationResolveResult, LocalResolveResult,
    MemberResolveResult, Mismatch, NamespaceResolveResult, ResolveResult, TypeResolveResult,
};
pub use scope::{AliasTarget, LocalBinding, LocalKind, Scope, ScopeFrame, UsingScope};
pub use scope_builder::{Target, locate, scope_at};
