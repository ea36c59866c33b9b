//! Type definitions and resolved type references.

use super::{NamespaceId, TypeId};
use crate::base::{Name, TextRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    /// A definition the builder could not make sense of. Downstream
    /// resolution treats it as an unknown type rather than failing.
    Error,
}

/// A named type definition. Identity is the `TypeId` within one model;
/// partial declarations of the same fully qualified name share one
/// definition.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: Name,
    pub namespace: NamespaceId,
    pub containing_type: Option<TypeId>,
    pub kind: TypeKind,
    pub is_static: bool,
    /// Generic parameter names; the arity takes part in lookup identity.
    pub type_params: Vec<Name>,
    /// Declared base types (class first when present, then interfaces).
    /// An unresolvable base is recorded as [`TypeRef::Error`].
    pub bases: Vec<TypeRef>,
    pub members: Vec<super::MemberId>,
    pub nested: Vec<TypeId>,
    /// Range of the declaration name in source, absent for metadata types.
    pub decl_range: Option<TextRange>,
}

impl TypeDef {
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    pub fn is_value_type(&self) -> bool {
        matches!(self.kind, TypeKind::Struct | TypeKind::Enum)
    }

    pub fn is_error(&self) -> bool {
        self.kind == TypeKind::Error
    }
}

/// A resolved reference to a type. Equality is structural: constructed
/// generics compare by definition identity plus arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named {
        id: TypeId,
        args: Vec<TypeRef>,
    },
    Array(Box<TypeRef>),
    Pointer(Box<TypeRef>),
    TypeParam {
        owner: TypeId,
        index: u32,
        name: Name,
    },
    Void,
    /// The type of the `null` literal, convertible to any reference type.
    Null,
    Error,
}

impl TypeRef {
    pub fn named(id: TypeId) -> Self {
        TypeRef::Named {
            id,
            args: Vec::new(),
        }
    }

    pub fn as_named(&self) -> Option<(TypeId, &[TypeRef])> {
        match self {
            TypeRef::Named { id, args } => Some((*id, args)),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeRef::Error)
    }

    /// Substitute the type parameters of `owner` with `args`. Used to
    /// compute member signatures on constructed generic types.
    pub fn substitute(&self, owner: TypeId, args: &[TypeRef]) -> TypeRef {
        match self {
            TypeRef::TypeParam {
                owner: param_owner,
                index,
                ..
            } if *param_owner == owner => args
                .get(*index as usize)
                .cloned()
                .unwrap_or(TypeRef::Error),
            TypeRef::TypeParam { .. } => self.clone(),
            TypeRef::Named { id, args: inner } => TypeRef::Named {
                id: *id,
                args: inner
                    .iter()
                    .map(|a| a.substitute(owner, args))
                    .collect(),
            },
            TypeRef::Array(elem) => TypeRef::Array(Box::new(elem.substitute(owner, args))),
            TypeRef::Pointer(elem) => TypeRef::Pointer(Box::new(elem.substitute(owner, args))),
            TypeRef::Void => TypeRef::Void,
            TypeRef::Null => TypeRef::Null,
            TypeRef::Error => TypeRef::Error,
        }
    }
}
