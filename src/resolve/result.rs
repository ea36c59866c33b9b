//! The outcome of resolving one source location.
//!
//! Results are plain values with structural equality: resolving the same
//! offset against the same model twice yields equal results. Semantic
//! failures (unknown name, ambiguous overload) are the `Error` variant, not
//! a Rust error; offsets that carry no symbol at all resolve to `None`
//! upstream and never reach this type.

use crate::base::TextRange;
use crate::model::{Conversion, MemberId, NamespaceId, TypeRef};

use super::scope::LocalBinding;

#[derive(Debug, Clone, PartialEq)]
pub enum ResolveResult {
    Type(TypeResolveResult),
    Namespace(NamespaceResolveResult),
    Local(LocalResolveResult),
    Member(MemberResolveResult),
    Invocation(InvocationResolveResult),
    Error(ErrorResolveResult),
}

/// The location refers to a type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeResolveResult {
    pub ty: TypeRef,
}

/// The location refers to a namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceResolveResult {
    pub id: NamespaceId,
    /// Dotted qualified name, `""` for the root.
    pub name: String,
}

/// The location refers to a local variable or parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalResolveResult {
    pub binding: LocalBinding,
}

/// The location refers to a member without invoking it.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberResolveResult {
    pub member: MemberId,
    /// Declared type (return type for methods), with the receiver's generic
    /// arguments substituted.
    pub ty: TypeRef,
}

/// The location refers to an invocation with one chosen overload.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResolveResult {
    pub member: MemberId,
    /// Result type of the call.
    pub ty: TypeRef,
    /// Conversion applied to each argument, in argument order.
    pub conversions: Vec<Conversion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No declaration matches the name or no overload is applicable.
    Unresolved,
    /// More than one declaration matches equally well.
    Ambiguous,
    /// The location itself was found but its type could not be computed.
    TypeError,
}

/// Why one candidate was rejected, kept for diagnostic consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Arity { expected: usize, got: usize },
    Argument { index: usize, expected: TypeRef, got: TypeRef },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub member: MemberId,
    /// Absent for the tied candidates of an ambiguity.
    pub mismatch: Option<Mismatch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResolveResult {
    pub kind: ErrorKind,
    pub candidates: Vec<Candidate>,
}

impl ResolveResult {
    pub fn unresolved() -> Self {
        ResolveResult::Error(ErrorResolveResult {
            kind: ErrorKind::Unresolved,
            candidates: Vec::new(),
        })
    }

    pub fn type_error() -> Self {
        ResolveResult::Error(ErrorResolveResult {
            kind: ErrorKind::TypeError,
            candidates: Vec::new(),
        })
    }

    /// The type this result carries. Namespaces and errors have none.
    pub fn ty(&self) -> Option<&TypeRef> {
        match self {
            ResolveResult::Type(r) => Some(&r.ty),
            ResolveResult::Local(r) => Some(&r.binding.ty),
            ResolveResult::Member(r) => Some(&r.ty),
            ResolveResult::Invocation(r) => Some(&r.ty),
            ResolveResult::Namespace(_) | ResolveResult::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResolveResult::Error(_))
    }

    /// Range of the referenced declaration, when it came from source.
    pub fn decl_range(&self) -> Option<TextRange> {
        match self {
            ResolveResult::Local(r) => Some(r.binding.decl_range),
            _ => None,
        }
    }

    pub fn into_type(self) -> Option<TypeResolveResult> {
        match self {
            ResolveResult::Type(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_namespace(self) -> Option<NamespaceResolveResult> {
        match self {
            ResolveResult::Namespace(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_local(self) -> Option<LocalResolveResult> {
        match self {
            ResolveResult::Local(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_member(self) -> Option<MemberResolveResult> {
        match self {
            ResolveResult::Member(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_invocation(self) -> Option<InvocationResolveResult> {
        match self {
            ResolveResult::Invocation(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_error(self) -> Option<ErrorResolveResult> {
        match self {
            ResolveResult::Error(r) => Some(r),
            _ => None,
        }
    }
}
