//! Expression nodes.

use super::{Ident, TypeSyntax};
use crate::base::TextRange;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(IdentExpr),
    Literal(LiteralExpr),
    Member(MemberAccessExpr),
    Invoke(InvocationExpr),
    New(ObjectCreationExpr),
    Assign(AssignExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Paren(ParenExpr),
    This(ThisExpr),
}

impl Expr {
    pub fn range(&self) -> TextRange {
        match self {
            Expr::Ident(e) => e.range,
            Expr::Literal(e) => e.range,
            Expr::Member(e) => e.range,
            Expr::Invoke(e) => e.range,
            Expr::New(e) => e.range,
            Expr::Assign(e) => e.range,
            Expr::Binary(e) => e.range,
            Expr::Unary(e) => e.range,
            Expr::Paren(e) => e.range,
            Expr::This(e) => e.range,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentExpr {
    pub name: Ident,
    pub type_args: Vec<TypeSyntax>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    Int(i32),
    Long(i64),
    Double(f64),
    Str(String),
    Char(char),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub kind: LiteralKind,
    pub range: TextRange,
}

/// `target.name` — the accessed name keeps its own range so a cursor on the
/// name can be told apart from a cursor on the receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccessExpr {
    pub target: Box<Expr>,
    pub name: Ident,
    pub type_args: Vec<TypeSyntax>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvocationExpr {
    pub target: Box<Expr>,
    pub args: Vec<Expr>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectCreationExpr {
    pub ty: TypeSyntax,
    pub args: Vec<Expr>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub target: Box<Expr>,
    pub value: Box<Expr>,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParenExpr {
    pub inner: Box<Expr>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThisExpr {
    pub range: TextRange,
}
