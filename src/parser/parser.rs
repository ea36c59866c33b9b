//! Recursive-descent parser producing the typed AST.
//!
//! Recovery strategy: on an unexpected token, record a [`ParseError`] and
//! resynchronize at the next `;` or `}`. The result always contains a tree,
//! possibly partial, so resolution keeps working on malformed input.

use super::lexer::{Token, TokenKind, tokenize};
use crate::base::{TextRange, TextSize};
use crate::syntax::ast::*;
use crate::syntax::{ParseError, ParseResult};

/// Parse a compilation unit from source text.
pub fn parse(source: &str) -> ParseResult<CompilationUnit> {
    let tokens = tokenize(source);
    let eof = TextSize::of(source);
    let mut parser = Parser {
        tokens,
        pos: 0,
        errors: Vec::new(),
        eof_range: TextRange::empty(eof),
    };
    let unit = parser.compilation_unit();
    ParseResult::with_errors(unit, parser.errors)
}

struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    errors: Vec<ParseError>,
    eof_range: TextRange,
}

impl<'a> Parser<'a> {
    // ------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn nth_text(&self, n: usize) -> Option<&'a str> {
        self.tokens.get(self.pos + n).map(|t| t.text)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.nth_kind(0) == Some(kind)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        if self.at(kind) { self.bump() } else { None }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Option<Token<'a>> {
        if let Some(tok) = self.eat(kind) {
            return Some(tok);
        }
        self.error_here(format!("expected {what}"));
        None
    }

    fn cur_range(&self) -> TextRange {
        self.peek().map_or(self.eof_range, |t| t.range)
    }

    fn cur_start(&self) -> TextSize {
        self.cur_range().start()
    }

    /// End of the most recently consumed token.
    fn prev_end(&self) -> TextSize {
        if self.pos == 0 {
            return self.cur_start();
        }
        self.tokens[self.pos - 1].range.end()
    }

    fn span_from(&self, start: TextSize) -> TextRange {
        let end = self.prev_end().max(start);
        TextRange::new(start, end)
    }

    fn error_here(&mut self, message: String) {
        let range = self.cur_range();
        self.errors.push(ParseError::new(message, range));
    }

    /// Skip tokens until just past a `;` or until a `}` / EOF.
    fn recover_statement(&mut self) {
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Semicolon => {
                    self.bump();
                    return;
                }
                TokenKind::RBrace => return,
                _ => {
                    self.bump();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Compilation unit / declarations
    // ------------------------------------------------------------------

    fn compilation_unit(&mut self) -> CompilationUnit {
        let start = self.cur_start();
        let usings = self.using_directives();
        let mut members = Vec::new();
        while !self.at_eof() {
            if let Some(member) = self.namespace_member() {
                members.push(member);
            }
        }
        CompilationUnit {
            usings,
            members,
            range: self.span_from(start),
        }
    }

    fn using_directives(&mut self) -> Vec<UsingDirective> {
        let mut usings = Vec::new();
        while self.at(TokenKind::KwUsing) {
            if let Some(using) = self.using_directive() {
                usings.push(using);
            }
        }
        usings
    }

    fn using_directive(&mut self) -> Option<UsingDirective> {
        let start = self.cur_start();
        self.bump(); // `using`

        // `using Alias = Name;` — alias iff identifier followed by `=`.
        let alias = if self.at(TokenKind::Ident) && self.nth_kind(1) == Some(TokenKind::Eq) {
            let tok = self.bump().unwrap();
            self.bump(); // `=`
            Some(ident_from(tok))
        } else {
            None
        };

        let name = self.qualified_name()?;
        self.expect(TokenKind::Semicolon, "`;` after using directive");
        Some(UsingDirective {
            alias,
            name,
            range: self.span_from(start),
        })
    }

    fn qualified_name(&mut self) -> Option<QualifiedName> {
        let start = self.cur_start();
        let first = self.expect(TokenKind::Ident, "identifier")?;
        let mut segments = vec![ident_from(first)];
        while self.at(TokenKind::Dot) && self.nth_kind(1) == Some(TokenKind::Ident) {
            self.bump(); // `.`
            let seg = self.bump().unwrap();
            segments.push(ident_from(seg));
        }
        Some(QualifiedName {
            segments,
            range: self.span_from(start),
        })
    }

    fn namespace_member(&mut self) -> Option<NamespaceMember> {
        if self.at(TokenKind::KwNamespace) {
            return self.namespace_decl().map(NamespaceMember::Namespace);
        }
        if self.at_type_decl_start() {
            return self.type_decl().map(NamespaceMember::Type);
        }
        self.error_here("expected namespace or type declaration".into());
        self.bump();
        None
    }

    fn at_type_decl_start(&self) -> bool {
        let mut n = 0;
        while matches!(
            self.nth_kind(n),
            Some(
                TokenKind::KwPublic
                    | TokenKind::KwPrivate
                    | TokenKind::KwProtected
                    | TokenKind::KwInternal
                    | TokenKind::KwStatic
            )
        ) {
            n += 1;
        }
        // `partial` is contextual and may sit directly before the keyword.
        if self.nth_kind(n) == Some(TokenKind::Ident) && self.nth_text(n) == Some("partial") {
            n += 1;
        }
        matches!(
            self.nth_kind(n),
            Some(
                TokenKind::KwClass
                    | TokenKind::KwStruct
                    | TokenKind::KwInterface
                    | TokenKind::KwEnum
            )
        )
    }

    fn namespace_decl(&mut self) -> Option<NamespaceDecl> {
        let start = self.cur_start();
        self.bump(); // `namespace`
        let name = self.qualified_name()?;
        self.expect(TokenKind::LBrace, "`{` after namespace name");
        let usings = self.using_directives();
        let mut members = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            if let Some(member) = self.namespace_member() {
                members.push(member);
            }
        }
        self.expect(TokenKind::RBrace, "`}` closing namespace");
        Some(NamespaceDecl {
            name,
            usings,
            members,
            range: self.span_from(start),
        })
    }

    fn modifiers(&mut self) -> (AccessModifier, bool) {
        let mut access = AccessModifier::None;
        let mut is_static = false;
        loop {
            match self.nth_kind(0) {
                Some(TokenKind::KwPublic) => access = AccessModifier::Public,
                Some(TokenKind::KwPrivate) => access = AccessModifier::Private,
                Some(TokenKind::KwProtected) => access = AccessModifier::Protected,
                Some(TokenKind::KwInternal) => access = AccessModifier::Internal,
                Some(TokenKind::KwStatic) => is_static = true,
                // Contextual `partial`: only a modifier when a type
                // declaration keyword follows.
                Some(TokenKind::Ident)
                    if self.nth_text(0) == Some("partial")
                        && matches!(
                            self.nth_kind(1),
                            Some(
                                TokenKind::KwClass
                                    | TokenKind::KwStruct
                                    | TokenKind::KwInterface
                            )
                        ) => {}
                _ => return (access, is_static),
            }
            self.bump();
        }
    }

    fn type_decl(&mut self) -> Option<TypeDecl> {
        let start = self.cur_start();
        let (access, is_static) = self.modifiers();
        let kind = match self.nth_kind(0) {
            Some(TokenKind::KwClass) => TypeDeclKind::Class,
            Some(TokenKind::KwStruct) => TypeDeclKind::Struct,
            Some(TokenKind::KwInterface) => TypeDeclKind::Interface,
            Some(TokenKind::KwEnum) => TypeDeclKind::Enum,
            _ => {
                self.error_here("expected type declaration".into());
                return None;
            }
        };
        self.bump();

        let name = self.expect(TokenKind::Ident, "type name").map(ident_from)?;
        let type_params = self.type_param_list();

        let mut bases = Vec::new();
        if self.eat(TokenKind::Colon).is_some() {
            loop {
                if let Some(base) = self.type_syntax() {
                    bases.push(base);
                }
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        self.expect(TokenKind::LBrace, "`{` opening type body");
        let members = if kind == TypeDeclKind::Enum {
            self.enum_body()
        } else {
            self.type_body(&name)
        };
        self.expect(TokenKind::RBrace, "`}` closing type body");

        Some(TypeDecl {
            kind,
            access,
            is_static,
            name,
            type_params,
            bases,
            members,
            range: self.span_from(start),
        })
    }

    fn type_param_list(&mut self) -> Vec<Ident> {
        let mut params = Vec::new();
        if self.eat(TokenKind::Lt).is_none() {
            return params;
        }
        loop {
            if let Some(tok) = self.expect(TokenKind::Ident, "type parameter name") {
                params.push(ident_from(tok));
            } else {
                break;
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Gt, "`>` closing type parameter list");
        params
    }

    fn enum_body(&mut self) -> Vec<MemberDecl> {
        let mut members = Vec::new();
        while self.at(TokenKind::Ident) {
            let tok = self.bump().unwrap();
            members.push(MemberDecl::EnumVariant(EnumVariantDecl {
                name: ident_from(tok),
                range: tok.range,
            }));
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        members
    }

    fn type_body(&mut self, type_name: &Ident) -> Vec<MemberDecl> {
        let mut members = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            let before = self.pos;
            if let Some(member) = self.member_decl(type_name) {
                members.push(member);
            } else if self.pos == before {
                // Nothing consumed; skip the offending token to make progress.
                self.bump();
            }
        }
        members
    }

    fn member_decl(&mut self, type_name: &Ident) -> Option<MemberDecl> {
        let start = self.cur_start();

        if self.at_type_decl_start() {
            return self.type_decl().map(MemberDecl::Nested);
        }

        let (access, is_static) = self.modifiers();

        if self.eat(TokenKind::KwEvent).is_some() {
            let ty = self.type_syntax()?;
            let name = self.expect(TokenKind::Ident, "event name").map(ident_from)?;
            self.expect(TokenKind::Semicolon, "`;` after event declaration");
            return Some(MemberDecl::Event(EventDecl {
                access,
                is_static,
                ty,
                name,
                range: self.span_from(start),
            }));
        }

        // Constructor: the declaring type's name followed by `(`.
        if self.at(TokenKind::Ident)
            && self.nth_kind(1) == Some(TokenKind::LParen)
            && self.peek().is_some_and(|t| t.text == type_name.name.as_str())
        {
            let name = ident_from(self.bump().unwrap());
            let params = self.param_list();
            let body = self.optional_body();
            return Some(MemberDecl::Ctor(CtorDecl {
                access,
                is_static,
                name,
                params,
                body,
                range: self.span_from(start),
            }));
        }

        let ty = self.type_syntax()?;
        let name = self.expect(TokenKind::Ident, "member name").map(ident_from)?;

        // Method type parameters: `T M<U>(...)`.
        let type_params = if self.at(TokenKind::Lt) {
            self.type_param_list()
        } else {
            Vec::new()
        };

        match self.nth_kind(0) {
            Some(TokenKind::LParen) => {
                let params = self.param_list();
                let body = self.optional_body();
                Some(MemberDecl::Method(MethodDecl {
                    access,
                    is_static,
                    return_type: ty,
                    name,
                    type_params,
                    params,
                    body,
                    range: self.span_from(start),
                }))
            }
            Some(TokenKind::LBrace) => {
                let (has_getter, has_setter) = self.accessor_list();
                Some(MemberDecl::Property(PropertyDecl {
                    access,
                    is_static,
                    ty,
                    name,
                    has_getter,
                    has_setter,
                    range: self.span_from(start),
                }))
            }
            _ => {
                let initializer = if self.eat(TokenKind::Eq).is_some() {
                    self.expression()
                } else {
                    None
                };
                self.expect(TokenKind::Semicolon, "`;` after field declaration");
                Some(MemberDecl::Field(FieldDecl {
                    access,
                    is_static,
                    ty,
                    name,
                    initializer,
                    range: self.span_from(start),
                }))
            }
        }
    }

    fn accessor_list(&mut self) -> (bool, bool) {
        // `{ get; set; }` — get/set are contextual, lexed as identifiers.
        let mut has_getter = false;
        let mut has_setter = false;
        self.expect(TokenKind::LBrace, "`{` opening accessor list");
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            match self.peek() {
                Some(tok) if tok.kind == TokenKind::Ident && tok.text == "get" => {
                    has_getter = true;
                    self.bump();
                    self.accessor_tail();
                }
                Some(tok) if tok.kind == TokenKind::Ident && tok.text == "set" => {
                    has_setter = true;
                    self.bump();
                    self.accessor_tail();
                }
                _ => {
                    self.error_here("expected `get` or `set`".into());
                    self.bump();
                }
            }
        }
        self.expect(TokenKind::RBrace, "`}` closing accessor list");
        (has_getter, has_setter)
    }

    fn accessor_tail(&mut self) {
        // Either `;` or a full accessor body, which we skip.
        if self.eat(TokenKind::Semicolon).is_some() {
            return;
        }
        if self.at(TokenKind::LBrace) {
            self.skip_balanced_braces();
        } else {
            self.error_here("expected `;` or accessor body".into());
        }
    }

    fn skip_balanced_braces(&mut self) {
        debug_assert!(self.at(TokenKind::LBrace));
        let mut depth = 0usize;
        while let Some(tok) = self.bump() {
            match tok.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn param_list(&mut self) -> Vec<ParamDecl> {
        let mut params = Vec::new();
        self.expect(TokenKind::LParen, "`(` opening parameter list");
        if self.eat(TokenKind::RParen).is_some() {
            return params;
        }
        loop {
            if let Some(param) = self.param_decl() {
                params.push(param);
            } else {
                self.recover_statement();
                break;
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)` closing parameter list");
        params
    }

    fn param_decl(&mut self) -> Option<ParamDecl> {
        let start = self.cur_start();
        let modifier = match self.nth_kind(0) {
            Some(TokenKind::KwRef) => {
                self.bump();
                ParamModifier::Ref
            }
            Some(TokenKind::KwOut) => {
                self.bump();
                ParamModifier::Out
            }
            Some(TokenKind::KwParams) => {
                self.bump();
                ParamModifier::Params
            }
            Some(TokenKind::KwThis) => {
                self.bump();
                ParamModifier::This
            }
            _ => ParamModifier::None,
        };
        let ty = self.type_syntax()?;
        let name = self
            .expect(TokenKind::Ident, "parameter name")
            .map(ident_from)?;
        let default = if self.eat(TokenKind::Eq).is_some() {
            self.expression()
        } else {
            None
        };
        Some(ParamDecl {
            modifier,
            ty,
            name,
            default,
            range: self.span_from(start),
        })
    }

    fn optional_body(&mut self) -> Option<Block> {
        if self.eat(TokenKind::Semicolon).is_some() {
            return None;
        }
        self.block()
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn type_syntax(&mut self) -> Option<TypeSyntax> {
        let start = self.cur_start();
        let mut ty = self.primary_type()?;
        loop {
            if self.at(TokenKind::LBracket) && self.nth_kind(1) == Some(TokenKind::RBracket) {
                self.bump();
                self.bump();
                ty = TypeSyntax::Array {
                    elem: Box::new(ty),
                    range: self.span_from(start),
                };
            } else if self.at(TokenKind::Star) {
                self.bump();
                ty = TypeSyntax::Pointer {
                    elem: Box::new(ty),
                    range: self.span_from(start),
                };
            } else {
                return Some(ty);
            }
        }
    }

    fn primary_type(&mut self) -> Option<TypeSyntax> {
        if let Some(keyword) = builtin_type(self.nth_kind(0)?) {
            let tok = self.bump().unwrap();
            return Some(TypeSyntax::Builtin {
                keyword,
                range: tok.range,
            });
        }
        if self.at(TokenKind::KwVar) {
            let tok = self.bump().unwrap();
            return Some(TypeSyntax::Var { range: tok.range });
        }
        if self.at(TokenKind::Ident) {
            let start = self.cur_start();
            let name = self.qualified_name()?;
            let args = if self.at(TokenKind::Lt) {
                self.type_arg_list().unwrap_or_default()
            } else {
                Vec::new()
            };
            return Some(TypeSyntax::Named(NamedTypeSyntax {
                name,
                args,
                range: self.span_from(start),
            }));
        }
        self.error_here("expected type".into());
        None
    }

    fn type_arg_list(&mut self) -> Option<Vec<TypeSyntax>> {
        self.expect(TokenKind::Lt, "`<`")?;
        let mut args = Vec::new();
        loop {
            args.push(self.type_syntax()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Gt, "`>` closing type argument list")?;
        Some(args)
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn block(&mut self) -> Option<Block> {
        let start = self.cur_start();
        self.expect(TokenKind::LBrace, "`{` opening block")?;
        let mut statements = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            let before = self.pos;
            if let Some(stmt) = self.statement() {
                statements.push(stmt);
            } else if self.pos == before {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "`}` closing block");
        Some(Block {
            statements,
            range: self.span_from(start),
        })
    }

    fn statement(&mut self) -> Option<Stmt> {
        match self.nth_kind(0)? {
            TokenKind::LBrace => self.block().map(Stmt::Block),
            TokenKind::Semicolon => {
                let tok = self.bump().unwrap();
                Some(Stmt::Empty { range: tok.range })
            }
            TokenKind::KwReturn => self.return_stmt(),
            TokenKind::KwIf => self.if_stmt(),
            TokenKind::KwWhile => self.while_stmt(),
            TokenKind::KwFor => self.for_stmt(),
            TokenKind::KwForeach => self.foreach_stmt(),
            TokenKind::KwTry => self.try_stmt(),
            _ => self.local_decl_or_expr_stmt(),
        }
    }

    fn return_stmt(&mut self) -> Option<Stmt> {
        let start = self.cur_start();
        self.bump(); // `return`
        let value = if self.at(TokenKind::Semicolon) {
            None
        } else {
            self.expression()
        };
        self.expect(TokenKind::Semicolon, "`;` after return");
        Some(Stmt::Return(ReturnStmt {
            value,
            range: self.span_from(start),
        }))
    }

    fn if_stmt(&mut self) -> Option<Stmt> {
        let start = self.cur_start();
        self.bump(); // `if`
        self.expect(TokenKind::LParen, "`(` after `if`");
        let condition = self.expression()?;
        self.expect(TokenKind::RParen, "`)` closing condition");
        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.eat(TokenKind::KwElse).is_some() {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Some(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
            range: self.span_from(start),
        }))
    }

    fn while_stmt(&mut self) -> Option<Stmt> {
        let start = self.cur_start();
        self.bump(); // `while`
        self.expect(TokenKind::LParen, "`(` after `while`");
        let condition = self.expression()?;
        self.expect(TokenKind::RParen, "`)` closing condition");
        let body = Box::new(self.statement()?);
        Some(Stmt::While(WhileStmt {
            condition,
            body,
            range: self.span_from(start),
        }))
    }

    fn for_stmt(&mut self) -> Option<Stmt> {
        let start = self.cur_start();
        self.bump(); // `for`
        self.expect(TokenKind::LParen, "`(` after `for`");
        let init = if self.at(TokenKind::Semicolon) {
            None
        } else if let Some(decl) = self.try_local_decl(false) {
            Some(ForInit::Decl(decl))
        } else {
            self.expression().map(ForInit::Expr)
        };
        self.expect(TokenKind::Semicolon, "`;` after for-initializer");
        let condition = if self.at(TokenKind::Semicolon) {
            None
        } else {
            self.expression()
        };
        self.expect(TokenKind::Semicolon, "`;` after for-condition");
        let update = if self.at(TokenKind::RParen) {
            None
        } else {
            self.expression()
        };
        self.expect(TokenKind::RParen, "`)` closing for clauses");
        let body = Box::new(self.statement()?);
        Some(Stmt::For(ForStmt {
            init,
            condition,
            update,
            body,
            range: self.span_from(start),
        }))
    }

    fn foreach_stmt(&mut self) -> Option<Stmt> {
        let start = self.cur_start();
        self.bump(); // `foreach`
        self.expect(TokenKind::LParen, "`(` after `foreach`");
        let ty = self.type_syntax()?;
        let name = self
            .expect(TokenKind::Ident, "iteration variable name")
            .map(ident_from)?;
        self.expect(TokenKind::KwIn, "`in`");
        let iterable = self.expression()?;
        self.expect(TokenKind::RParen, "`)` closing foreach header");
        let body = Box::new(self.statement()?);
        Some(Stmt::Foreach(ForeachStmt {
            ty,
            name,
            iterable,
            body,
            range: self.span_from(start),
        }))
    }

    fn try_stmt(&mut self) -> Option<Stmt> {
        let start = self.cur_start();
        self.bump(); // `try`
        let body = self.block()?;
        let mut catches = Vec::new();
        while self.at(TokenKind::KwCatch) {
            let catch_start = self.cur_start();
            self.bump();
            let mut exception_type = None;
            let mut variable = None;
            if self.eat(TokenKind::LParen).is_some() {
                exception_type = self.type_syntax();
                if self.at(TokenKind::Ident) {
                    variable = self.bump().map(ident_from);
                }
                self.expect(TokenKind::RParen, "`)` closing catch clause");
            }
            let body = self.block()?;
            catches.push(CatchClause {
                exception_type,
                variable,
                body,
                range: self.span_from(catch_start),
            });
        }
        let finally = if self.eat(TokenKind::KwFinally).is_some() {
            self.block()
        } else {
            None
        };
        Some(Stmt::Try(TryStmt {
            body,
            catches,
            finally,
            range: self.span_from(start),
        }))
    }

    /// Disambiguate `T x = ...;` from an expression statement.
    fn local_decl_or_expr_stmt(&mut self) -> Option<Stmt> {
        if let Some(decl) = self.try_local_decl(true) {
            return Some(Stmt::Local(decl));
        }
        let start = self.cur_start();
        let Some(expr) = self.expression() else {
            self.error_here("expected statement".into());
            self.recover_statement();
            return None;
        };
        self.expect(TokenKind::Semicolon, "`;` after expression statement");
        Some(Stmt::Expr(ExprStmt {
            expr,
            range: self.span_from(start),
        }))
    }

    /// Speculatively parse a local declaration. Rolls back both position and
    /// recorded errors if the lookahead does not pan out.
    fn try_local_decl(&mut self, eat_semicolon: bool) -> Option<LocalDeclStmt> {
        let saved_pos = self.pos;
        let saved_errors = self.errors.len();
        let start = self.cur_start();

        // `var` or a builtin type keyword cannot start an expression in this
        // subset, so those commit to the declaration parse.
        let is_certain = match self.nth_kind(0) {
            Some(TokenKind::KwVar) => true,
            Some(k) => builtin_type(k).is_some(),
            None => false,
        };

        let ty = match self.type_syntax() {
            Some(ty) => ty,
            None => {
                self.pos = saved_pos;
                self.errors.truncate(saved_errors);
                return None;
            }
        };

        // A declaration continues with an identifier; anything else means the
        // speculation was wrong (e.g. `Console.WriteLine(1);`).
        if !self.at(TokenKind::Ident) {
            if is_certain {
                self.error_here("expected variable name".into());
                self.recover_statement();
            } else {
                self.pos = saved_pos;
                self.errors.truncate(saved_errors);
            }
            return None;
        }

        let mut declarators = Vec::new();
        loop {
            let decl_start = self.cur_start();
            let Some(name) = self.expect(TokenKind::Ident, "variable name").map(ident_from)
            else {
                break;
            };
            let initializer = if self.eat(TokenKind::Eq).is_some() {
                self.expression()
            } else {
                None
            };
            declarators.push(Declarator {
                name,
                initializer,
                range: self.span_from(decl_start),
            });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        if eat_semicolon {
            self.expect(TokenKind::Semicolon, "`;` after local declaration");
        }
        Some(LocalDeclStmt {
            ty,
            declarators,
            range: self.span_from(start),
        })
    }

    // ------------------------------------------------------------------
    // Expressions (precedence climbing)
    // ------------------------------------------------------------------

    fn expression(&mut self) -> Option<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Option<Expr> {
        let start = self.cur_start();
        let lhs = self.or_expr()?;
        if self.eat(TokenKind::Eq).is_some() {
            let rhs = self.assignment()?;
            return Some(Expr::Assign(AssignExpr {
                target: Box::new(lhs),
                value: Box::new(rhs),
                range: self.span_from(start),
            }));
        }
        Some(lhs)
    }

    fn or_expr(&mut self) -> Option<Expr> {
        self.binary_level(0)
    }

    /// Binary operators by precedence level, loosest first.
    fn binary_level(&mut self, level: usize) -> Option<Expr> {
        const LEVELS: &[&[(TokenKind, BinaryOp)]] = &[
            &[(TokenKind::PipePipe, BinaryOp::Or)],
            &[(TokenKind::AmpAmp, BinaryOp::And)],
            &[(TokenKind::EqEq, BinaryOp::Eq), (TokenKind::BangEq, BinaryOp::Ne)],
            &[
                (TokenKind::Lt, BinaryOp::Lt),
                (TokenKind::LtEq, BinaryOp::Le),
                (TokenKind::Gt, BinaryOp::Gt),
                (TokenKind::GtEq, BinaryOp::Ge),
            ],
            &[(TokenKind::Plus, BinaryOp::Add), (TokenKind::Minus, BinaryOp::Sub)],
            &[
                (TokenKind::Star, BinaryOp::Mul),
                (TokenKind::Slash, BinaryOp::Div),
                (TokenKind::Percent, BinaryOp::Rem),
            ],
        ];

        if level == LEVELS.len() {
            return self.unary();
        }

        let start = self.cur_start();
        let mut lhs = self.binary_level(level + 1)?;
        'outer: loop {
            for &(kind, op) in LEVELS[level] {
                if self.at(kind) {
                    self.bump();
                    let rhs = self.binary_level(level + 1)?;
                    lhs = Expr::Binary(BinaryExpr {
                        op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                        range: self.span_from(start),
                    });
                    continue 'outer;
                }
            }
            return Some(lhs);
        }
    }

    fn unary(&mut self) -> Option<Expr> {
        let start = self.cur_start();
        let op = match self.nth_kind(0) {
            Some(TokenKind::Minus) => Some(UnaryOp::Neg),
            Some(TokenKind::Bang) => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let operand = self.unary()?;
            return Some(Expr::Unary(UnaryExpr {
                op,
                operand: Box::new(operand),
                range: self.span_from(start),
            }));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Option<Expr> {
        let start = self.cur_start();
        let mut expr = self.primary()?;
        loop {
            if self.at(TokenKind::Dot) && self.nth_kind(1) == Some(TokenKind::Ident) {
                self.bump(); // `.`
                let name = ident_from(self.bump().unwrap());
                let type_args = self.try_invocation_type_args();
                expr = Expr::Member(MemberAccessExpr {
                    target: Box::new(expr),
                    name,
                    type_args,
                    range: self.span_from(start),
                });
            } else if self.at(TokenKind::LParen) {
                let args = self.argument_list()?;
                expr = Expr::Invoke(InvocationExpr {
                    target: Box::new(expr),
                    args,
                    range: self.span_from(start),
                });
            } else {
                return Some(expr);
            }
        }
    }

    /// `M<int>(...)` — only treat `<` as a type argument list if a
    /// well-formed list followed by `(` is ahead; otherwise it is less-than.
    fn try_invocation_type_args(&mut self) -> Vec<TypeSyntax> {
        if !self.at(TokenKind::Lt) {
            return Vec::new();
        }
        let saved_pos = self.pos;
        let saved_errors = self.errors.len();
        if let Some(args) = self.type_arg_list() {
            if self.at(TokenKind::LParen) {
                return args;
            }
        }
        self.pos = saved_pos;
        self.errors.truncate(saved_errors);
        Vec::new()
    }

    fn argument_list(&mut self) -> Option<Vec<Expr>> {
        self.expect(TokenKind::LParen, "`(` opening argument list")?;
        let mut args = Vec::new();
        if self.eat(TokenKind::RParen).is_some() {
            return Some(args);
        }
        loop {
            // `ref`/`out` at an argument site just wraps the expression.
            if self.at(TokenKind::KwRef) || self.at(TokenKind::KwOut) {
                self.bump();
            }
            args.push(self.expression()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RParen, "`)` closing argument list")?;
        Some(args)
    }

    fn primary(&mut self) -> Option<Expr> {
        let tok = match self.peek() {
            Some(tok) => tok,
            None => {
                self.error_here("expected expression".into());
                return None;
            }
        };
        match tok.kind {
            TokenKind::IntLit => {
                self.bump();
                // An int literal too large for i32 is promoted to long.
                let kind = match tok.text.parse::<i32>() {
                    Ok(v) => LiteralKind::Int(v),
                    Err(_) => match tok.text.parse::<i64>() {
                        Ok(v) => LiteralKind::Long(v),
                        Err(_) => {
                            self.errors.push(ParseError::new(
                                "integer literal out of range",
                                tok.range,
                            ));
                            LiteralKind::Int(0)
                        }
                    },
                };
                Some(Expr::Literal(LiteralExpr {
                    kind,
                    range: tok.range,
                }))
            }
            TokenKind::LongLit => {
                self.bump();
                let digits = &tok.text[..tok.text.len() - 1];
                let value = digits.parse::<i64>().unwrap_or_default();
                Some(Expr::Literal(LiteralExpr {
                    kind: LiteralKind::Long(value),
                    range: tok.range,
                }))
            }
            TokenKind::FloatLit => {
                self.bump();
                let digits = tok.text.trim_end_matches(['f', 'F', 'd', 'D']);
                let value = digits.parse::<f64>().unwrap_or_default();
                Some(Expr::Literal(LiteralExpr {
                    kind: LiteralKind::Double(value),
                    range: tok.range,
                }))
            }
            TokenKind::StringLit => {
                self.bump();
                let inner = &tok.text[1..tok.text.len() - 1];
                Some(Expr::Literal(LiteralExpr {
                    kind: LiteralKind::Str(unescape(inner)),
                    range: tok.range,
                }))
            }
            TokenKind::CharLit => {
                self.bump();
                let inner = &tok.text[1..tok.text.len() - 1];
                let ch = unescape(inner).chars().next().unwrap_or('\0');
                Some(Expr::Literal(LiteralExpr {
                    kind: LiteralKind::Char(ch),
                    range: tok.range,
                }))
            }
            TokenKind::KwTrue | TokenKind::KwFalse => {
                self.bump();
                Some(Expr::Literal(LiteralExpr {
                    kind: LiteralKind::Bool(tok.kind == TokenKind::KwTrue),
                    range: tok.range,
                }))
            }
            TokenKind::KwNull => {
                self.bump();
                Some(Expr::Literal(LiteralExpr {
                    kind: LiteralKind::Null,
                    range: tok.range,
                }))
            }
            TokenKind::KwThis => {
                self.bump();
                Some(Expr::This(ThisExpr { range: tok.range }))
            }
            TokenKind::LParen => {
                let start = self.cur_start();
                self.bump();
                let inner = self.expression()?;
                self.expect(TokenKind::RParen, "`)` closing parenthesized expression");
                Some(Expr::Paren(ParenExpr {
                    inner: Box::new(inner),
                    range: self.span_from(start),
                }))
            }
            TokenKind::KwNew => {
                let start = self.cur_start();
                self.bump();
                let ty = self.type_syntax()?;
                let args = if self.at(TokenKind::LParen) {
                    self.argument_list()?
                } else {
                    Vec::new()
                };
                Some(Expr::New(ObjectCreationExpr {
                    ty,
                    args,
                    range: self.span_from(start),
                }))
            }
            TokenKind::Ident => {
                self.bump();
                let type_args = self.try_invocation_type_args();
                Some(Expr::Ident(IdentExpr {
                    name: ident_from(tok),
                    type_args,
                    range: tok.range,
                }))
            }
            _ => {
                self.error_here("expected expression".into());
                None
            }
        }
    }
}

fn ident_from(tok: Token<'_>) -> Ident {
    // Strip the verbatim prefix; `@class` and `class` name the same thing.
    let text = tok.text.strip_prefix('@').unwrap_or(tok.text);
    Ident::new(text, tok.range)
}

fn builtin_type(kind: TokenKind) -> Option<BuiltinType> {
    let b = match kind {
        TokenKind::KwBool => BuiltinType::Bool,
        TokenKind::KwByte => BuiltinType::Byte,
        TokenKind::KwSbyte => BuiltinType::SByte,
        TokenKind::KwShort => BuiltinType::Short,
        TokenKind::KwUshort => BuiltinType::UShort,
        TokenKind::KwInt => BuiltinType::Int,
        TokenKind::KwUint => BuiltinType::UInt,
        TokenKind::KwLong => BuiltinType::Long,
        TokenKind::KwUlong => BuiltinType::ULong,
        TokenKind::KwFloat => BuiltinType::Float,
        TokenKind::KwDouble => BuiltinType::Double,
        TokenKind::KwChar => BuiltinType::Char,
        TokenKind::KwString => BuiltinType::String,
        TokenKind::KwObject => BuiltinType::Object,
        TokenKind::KwVoid => BuiltinType::Void,
        _ => return None,
    };
    Some(b)
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests;
