//! Members: methods, properties, fields, events, constructors.

use super::{TypeId, TypeRef};
use crate::base::{Name, TextRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Property,
    Field,
    Event,
    Ctor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamMode {
    #[default]
    Value,
    Ref,
    Out,
    /// Trailing `params` array parameter.
    Params,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub name: Name,
    pub ty: TypeRef,
    pub mode: ParamMode,
    pub has_default: bool,
}

impl Param {
    pub fn new(name: impl Into<Name>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            mode: ParamMode::Value,
            has_default: false,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn with_mode(mut self, mode: ParamMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A member belonging to exactly one declaring type.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: Name,
    pub kind: MemberKind,
    pub declaring_type: TypeId,
    /// Return type for methods, the declared type otherwise. `Void` for
    /// constructors.
    pub ty: TypeRef,
    pub params: Vec<Param>,
    pub is_static: bool,
    pub accessibility: Accessibility,
    /// Static method whose first parameter carries `this`.
    pub is_extension: bool,
    /// Range of the declaring name in source, absent for metadata members.
    pub decl_range: Option<TextRange>,
}

impl Member {
    pub fn is_invocable(&self) -> bool {
        self.kind == MemberKind::Method || self.kind == MemberKind::Ctor
    }
}
