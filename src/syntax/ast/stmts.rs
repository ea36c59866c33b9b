//! Statement nodes.

use super::{Expr, Ident, TypeSyntax};
use crate::base::TextRange;

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Local(LocalDeclStmt),
    Expr(ExprStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Foreach(ForeachStmt),
    Try(TryStmt),
    Return(ReturnStmt),
    Block(Block),
    Empty { range: TextRange },
}

impl Stmt {
    pub fn range(&self) -> TextRange {
        match self {
            Stmt::Local(s) => s.range,
            Stmt::Expr(s) => s.range,
            Stmt::If(s) => s.range,
            Stmt::While(s) => s.range,
            Stmt::For(s) => s.range,
            Stmt::Foreach(s) => s.range,
            Stmt::Try(s) => s.range,
            Stmt::Return(s) => s.range,
            Stmt::Block(b) => b.range,
            Stmt::Empty { range } => *range,
        }
    }
}

/// `int x = 1, y;` or `var x = e;`
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDeclStmt {
    pub ty: TypeSyntax,
    pub declarators: Vec<Declarator>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: Ident,
    pub initializer: Option<Expr>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Decl(LocalDeclStmt),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub condition: Option<Expr>,
    pub update: Option<Expr>,
    pub body: Box<Stmt>,
    pub range: TextRange,
}

/// `foreach (var item in items) ...` — the iteration variable is scoped to
/// the body only.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeachStmt {
    pub ty: TypeSyntax,
    pub name: Ident,
    pub iterable: Expr,
    pub body: Box<Stmt>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub body: Block,
    pub catches: Vec<CatchClause>,
    pub finally: Option<Block>,
    pub range: TextRange,
}

/// `catch (Exception ex) { ... }` — type and variable are each optional.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub exception_type: Option<TypeSyntax>,
    pub variable: Option<Ident>,
    pub body: Block,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub range: TextRange,
}
