//! Declaration-level nodes: compilation units, using directives, namespaces,
//! type declarations and their members.

use super::{Block, Expr, Ident, QualifiedName};
use crate::base::TextRange;

/// Root of one parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub usings: Vec<UsingDirective>,
    pub members: Vec<NamespaceMember>,
    pub range: TextRange,
}

/// `using System;` or `using IO = System.IO;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingDirective {
    /// Alias identifier for `using Alias = Name;` form.
    pub alias: Option<Ident>,
    pub name: QualifiedName,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceMember {
    Namespace(NamespaceDecl),
    Type(TypeDecl),
}

impl NamespaceMember {
    pub fn range(&self) -> TextRange {
        match self {
            NamespaceMember::Namespace(n) => n.range,
            NamespaceMember::Type(t) => t.range,
        }
    }
}

/// `namespace A.B { ... }` — using directives are permitted inside the body.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub name: QualifiedName,
    pub usings: Vec<UsingDirective>,
    pub members: Vec<NamespaceMember>,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Struct,
    Interface,
    Enum,
}

/// Syntax-level accessibility modifier. `None` means the language default
/// for the declaration site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessModifier {
    #[default]
    None,
    Public,
    Internal,
    Protected,
    Private,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub access: AccessModifier,
    pub is_static: bool,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub bases: Vec<TypeSyntax>,
    pub members: Vec<MemberDecl>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberDecl {
    Method(MethodDecl),
    Field(FieldDecl),
    Property(PropertyDecl),
    Ctor(CtorDecl),
    Event(EventDecl),
    EnumVariant(EnumVariantDecl),
    Nested(TypeDecl),
}

impl MemberDecl {
    pub fn range(&self) -> TextRange {
        match self {
            MemberDecl::Method(m) => m.range,
            MemberDecl::Field(f) => f.range,
            MemberDecl::Property(p) => p.range,
            MemberDecl::Ctor(c) => c.range,
            MemberDecl::Event(e) => e.range,
            MemberDecl::EnumVariant(v) => v.range,
            MemberDecl::Nested(t) => t.range,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub access: AccessModifier,
    pub is_static: bool,
    pub return_type: TypeSyntax,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub params: Vec<ParamDecl>,
    /// Absent for interface/abstract members.
    pub body: Option<Block>,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamModifier {
    #[default]
    None,
    Ref,
    Out,
    Params,
    /// `this` on the first parameter of an extension method.
    This,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub modifier: ParamModifier,
    pub ty: TypeSyntax,
    pub name: Ident,
    pub default: Option<Expr>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub access: AccessModifier,
    pub is_static: bool,
    pub ty: TypeSyntax,
    pub name: Ident,
    pub initializer: Option<Expr>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub access: AccessModifier,
    pub is_static: bool,
    pub ty: TypeSyntax,
    pub name: Ident,
    pub has_getter: bool,
    pub has_setter: bool,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CtorDecl {
    pub access: AccessModifier,
    pub is_static: bool,
    pub name: Ident,
    pub params: Vec<ParamDecl>,
    pub body: Option<Block>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDecl {
    pub access: AccessModifier,
    pub is_static: bool,
    pub ty: TypeSyntax,
    pub name: Ident,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariantDecl {
    pub name: Ident,
    pub range: TextRange,
}

/// A type as written in source. Resolution to the model happens later; the
/// syntax only records the shape.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSyntax {
    Named(NamedTypeSyntax),
    Builtin {
        keyword: BuiltinType,
        range: TextRange,
    },
    Array {
        elem: Box<TypeSyntax>,
        range: TextRange,
    },
    Pointer {
        elem: Box<TypeSyntax>,
        range: TextRange,
    },
    /// The `var` marker of an implicitly typed local declaration.
    Var {
        range: TextRange,
    },
}

impl TypeSyntax {
    pub fn range(&self) -> TextRange {
        match self {
            TypeSyntax::Named(n) => n.range,
            TypeSyntax::Builtin { range, .. }
            | TypeSyntax::Array { range, .. }
            | TypeSyntax::Pointer { range, .. }
            | TypeSyntax::Var { range } => *range,
        }
    }

    pub fn is_var(&self) -> bool {
        matches!(self, TypeSyntax::Var { .. })
    }
}

/// A (possibly qualified, possibly generic) type name: `List<int>`,
/// `System.Exception`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTypeSyntax {
    pub name: QualifiedName,
    pub args: Vec<TypeSyntax>,
    pub range: TextRange,
}

/// Builtin type keywords, each an alias for a `System` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Bool,
    Byte,
    SByte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Char,
    String,
    Object,
    Void,
}

impl BuiltinType {
    /// The `System` type name this keyword aliases.
    pub fn system_name(self) -> &'static str {
        match self {
            BuiltinType::Bool => "Boolean",
            BuiltinType::Byte => "Byte",
            BuiltinType::SByte => "SByte",
            BuiltinType::Short => "Int16",
            BuiltinType::UShort => "UInt16",
            BuiltinType::Int => "Int32",
            BuiltinType::UInt => "UInt32",
            BuiltinType::Long => "Int64",
            BuiltinType::ULong => "UInt64",
            BuiltinType::Float => "Single",
            BuiltinType::Double => "Double",
            BuiltinType::Char => "Char",
            BuiltinType::String => "String",
            BuiltinType::Object => "Object",
            BuiltinType::Void => "Void",
        }
    }
}
