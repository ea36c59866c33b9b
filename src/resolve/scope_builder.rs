//! Locates the target node for an offset and builds its scope in one
//! downward walk from the compilation unit root.
//!
//! The walk never climbs back up: using directives accumulate outermost-in,
//! a frame is pushed per entered block, and a local declaration registers
//! only when its declaring statement ends before the target offset. Sibling
//! branches that do not contain the offset are skipped entirely.

use crate::base::TextSize;
use crate::model::{NamespaceId, TypeSystem};
use crate::syntax::ast;

use super::resolver;
use super::scope::{AliasTarget, LocalBinding, LocalKind, Scope, ScopeFrame, UsingScope};

/// The smallest meaningful node at the requested offset.
#[derive(Debug)]
pub enum Target<'a> {
    /// A segment of a using directive's name (or its alias).
    Using {
        name: &'a ast::QualifiedName,
        segment: usize,
    },
    /// A segment of a namespace declaration's name.
    Namespace(NamespaceId),
    /// A written type.
    Type(&'a ast::TypeSyntax),
    /// A non-final segment of a qualified type name.
    TypeName {
        name: &'a ast::QualifiedName,
        segment: usize,
    },
    /// The name of the enclosing type declaration.
    TypeDeclName,
    /// The declared name of a member.
    MemberName(&'a ast::Ident),
    /// A parameter at its declaration.
    Param(&'a ast::ParamDecl),
    /// A declarator name in a local declaration.
    Declarator {
        ty: &'a ast::TypeSyntax,
        declarator: &'a ast::Declarator,
    },
    /// The `var` keyword of an implicitly typed local declaration.
    Var { init: Option<&'a ast::Expr> },
    /// The `var` keyword of a foreach statement.
    ForeachVarType(&'a ast::ForeachStmt),
    /// The iteration variable of a foreach statement.
    ForeachVar(&'a ast::ForeachStmt),
    /// The variable of a catch clause.
    CatchVar(&'a ast::CatchClause),
    /// An expression; callee names are already promoted to their
    /// invocation.
    Expr(&'a ast::Expr),
}

/// Locate the target at `offset` and build the scope visible there.
pub fn locate<'a>(
    unit: &'a ast::CompilationUnit,
    offset: TextSize,
    model: &TypeSystem,
) -> (Option<Target<'a>>, Scope) {
    let builder = ScopeBuilder {
        model,
        offset,
        scope: Scope::new(model.generation(), model.root()),
        target: None,
    };
    builder.run(unit)
}

/// The scope alone, without locating a target.
pub fn scope_at(unit: &ast::CompilationUnit, offset: TextSize, model: &TypeSystem) -> Scope {
    locate(unit, offset, model).1
}

struct ScopeBuilder<'a, 'm> {
    model: &'m TypeSystem,
    offset: TextSize,
    scope: Scope,
    target: Option<Target<'a>>,
}

impl<'a> ScopeBuilder<'a, '_> {
    fn run(mut self, unit: &'a ast::CompilationUnit) -> (Option<Target<'a>>, Scope) {
        self.add_usings(&unit.usings);
        self.visit_usings(&unit.usings);
        self.visit_namespace_members(&unit.members);
        (self.target, self.scope)
    }

    // End-inclusive: the walk visits children in source order and stops at
    // the first hit, so at a boundary the node ending at the caret wins.
    fn hit(&self, range: crate::base::TextRange) -> bool {
        range.contains_inclusive(self.offset)
    }

    // ------------------------------------------------------------------
    // Using directives and namespaces
    // ------------------------------------------------------------------

    /// Resolve the directives into the innermost using scope.
    fn add_usings(&mut self, usings: &[ast::UsingDirective]) {
        for using in usings {
            let resolved_ns = self.resolve_namespace_path(&using.name);
            let resolved_ty = match (&using.alias, resolved_ns) {
                (Some(_), None) => self.resolve_type_path_from_root(&using.name),
                _ => None,
            };
            let Some(level) = self.scope.usings.last_mut() else {
                return;
            };
            match &using.alias {
                None => {
                    if let Some(ns) = resolved_ns {
                        level.imports.push(ns);
                    }
                }
                Some(alias) => {
                    let target = resolved_ns
                        .map(AliasTarget::Namespace)
                        .or(resolved_ty.map(AliasTarget::Type));
                    if let Some(target) = target {
                        level.aliases.insert(alias.name.clone(), target);
                    }
                }
            }
        }
    }

    fn resolve_namespace_path(&self, name: &ast::QualifiedName) -> Option<NamespaceId> {
        let mut current = self.model.root();
        for segment in &name.segments {
            current = self.model.child_namespace(current, segment.name.as_str())?;
        }
        Some(current)
    }

    fn resolve_type_path_from_root(&self, name: &ast::QualifiedName) -> Option<crate::model::TypeId> {
        let (last, ns_part) = name.segments.split_last()?;
        let mut current = self.model.root();
        for segment in ns_part {
            current = self.model.child_namespace(current, segment.name.as_str())?;
        }
        self.model.find_type_by_name(current, last.name.as_str())
    }

    fn visit_usings(&mut self, usings: &'a [ast::UsingDirective]) {
        for using in usings {
            if !self.hit(using.range) {
                continue;
            }
            if let Some(segment) = using.name.segment_at(self.offset) {
                self.target = Some(Target::Using {
                    name: &using.name,
                    segment,
                });
            } else if let Some(alias) = &using.alias {
                if alias.contains(self.offset) {
                    self.target = Some(Target::Using {
                        name: &using.name,
                        segment: using.name.segments.len() - 1,
                    });
                }
            }
        }
    }

    fn visit_namespace_members(&mut self, members: &'a [ast::NamespaceMember]) {
        for member in members {
            if !self.hit(member.range()) {
                continue;
            }
            match member {
                ast::NamespaceMember::Namespace(decl) => self.visit_namespace(decl),
                ast::NamespaceMember::Type(decl) => self.visit_type(decl),
            }
        }
    }

    fn visit_namespace(&mut self, decl: &'a ast::NamespaceDecl) {
        let mut current = self.scope.namespace();
        for segment in &decl.name.segments {
            match self.model.child_namespace(current, segment.name.as_str()) {
                Some(child) => current = child,
                None => break,
            }
            if segment.contains(self.offset) {
                self.target = Some(Target::Namespace(current));
            }
        }
        self.scope.usings.push(UsingScope::new(current));
        self.add_usings(&decl.usings);
        self.visit_usings(&decl.usings);
        self.visit_namespace_members(&decl.members);
    }

    // ------------------------------------------------------------------
    // Type declarations and members
    // ------------------------------------------------------------------

    fn visit_type(&mut self, decl: &'a ast::TypeDecl) {
        let id = match self.scope.current_type {
            Some(outer) => self.model.nested_type(outer, decl.name.name.as_str()),
            None => {
                let ns = self.scope.namespace();
                self.model
                    .find_type(ns, decl.name.name.as_str(), decl.type_params.len())
                    .or_else(|| self.model.find_type_by_name(ns, decl.name.name.as_str()))
            }
        };
        self.scope.current_type = id;

        if decl.name.contains(self.offset) {
            self.target = Some(Target::TypeDeclName);
            return;
        }
        for base in &decl.bases {
            if self.hit(base.range()) {
                self.locate_type_syntax(base);
                return;
            }
        }
        for member in &decl.members {
            if self.hit(member.range()) {
                self.visit_member(member);
                return;
            }
        }
    }

    fn visit_member(&mut self, member: &'a ast::MemberDecl) {
        match member {
            ast::MemberDecl::Method(method) => {
                self.scope.in_static_context = method.is_static;
                if self.hit(method.return_type.range()) {
                    return self.locate_type_syntax(&method.return_type);
                }
                if method.name.contains(self.offset) {
                    self.target = Some(Target::MemberName(&method.name));
                    return;
                }
                if self.visit_params(&method.params) {
                    return;
                }
                if let Some(body) = &method.body {
                    if self.hit(body.range) {
                        self.enter_body(&method.params);
                        self.visit_block_statements(body);
                    }
                }
            }
            ast::MemberDecl::Ctor(ctor) => {
                self.scope.in_static_context = ctor.is_static;
                if ctor.name.contains(self.offset) {
                    self.target = Some(Target::MemberName(&ctor.name));
                    return;
                }
                if self.visit_params(&ctor.params) {
                    return;
                }
                if let Some(body) = &ctor.body {
                    if self.hit(body.range) {
                        self.enter_body(&ctor.params);
                        self.visit_block_statements(body);
                    }
                }
            }
            ast::MemberDecl::Field(field) => {
                self.scope.in_static_context = field.is_static;
                if self.hit(field.ty.range()) {
                    return self.locate_type_syntax(&field.ty);
                }
                if field.name.contains(self.offset) {
                    self.target = Some(Target::MemberName(&field.name));
                    return;
                }
                if let Some(init) = &field.initializer {
                    if self.hit(init.range()) {
                        self.visit_expr(init);
                    }
                }
            }
            ast::MemberDecl::Property(property) => {
                self.scope.in_static_context = property.is_static;
                if self.hit(property.ty.range()) {
                    return self.locate_type_syntax(&property.ty);
                }
                if property.name.contains(self.offset) {
                    self.target = Some(Target::MemberName(&property.name));
                }
            }
            ast::MemberDecl::Event(event) => {
                self.scope.in_static_context = event.is_static;
                if self.hit(event.ty.range()) {
                    return self.locate_type_syntax(&event.ty);
                }
                if event.name.contains(self.offset) {
                    self.target = Some(Target::MemberName(&event.name));
                }
            }
            ast::MemberDecl::EnumVariant(variant) => {
                if variant.name.contains(self.offset) {
                    self.target = Some(Target::MemberName(&variant.name));
                }
            }
            ast::MemberDecl::Nested(nested) => self.visit_type(nested),
        }
    }

    /// Handles a cursor inside the parameter list. Returns true when the
    /// target was found there.
    fn visit_params(&mut self, params: &'a [ast::ParamDecl]) -> bool {
        for param in params {
            if !self.hit(param.range) {
                continue;
            }
            if self.hit(param.ty.range()) {
                self.locate_type_syntax(&param.ty);
            } else if param.name.contains(self.offset) {
                self.target = Some(Target::Param(param));
            } else if let Some(default) = &param.default {
                if self.hit(default.range()) {
                    self.visit_expr(default);
                }
            }
            return self.target.is_some();
        }
        false
    }

    /// Push the body frame with one binding per parameter.
    fn enter_body(&mut self, params: &'a [ast::ParamDecl]) {
        let bindings: Vec<LocalBinding> = params
            .iter()
            .map(|param| LocalBinding {
                name: param.name.name.clone(),
                ty: resolver::resolve_type_syntax(self.model, &self.scope, &param.ty),
                kind: LocalKind::Parameter,
                decl_range: param.name.range,
            })
            .collect();
        let mut frame = ScopeFrame::default();
        for binding in bindings {
            frame.declare(binding);
        }
        self.scope.frames.push(frame);
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn visit_block_statements(&mut self, block: &'a ast::Block) {
        self.scope.frames.push(ScopeFrame::default());
        for stmt in &block.statements {
            if stmt.range().end() <= self.offset {
                // Fully before the target: its declarations are visible.
                if let ast::Stmt::Local(decl) = stmt {
                    self.register_local_decl(decl);
                }
                continue;
            }
            if self.hit(stmt.range()) {
                self.visit_stmt(stmt);
            }
            // Later statements never contribute bindings.
            break;
        }
    }

    fn register_local_decl(&mut self, decl: &'a ast::LocalDeclStmt) {
        for declarator in &decl.declarators {
            let binding = self.declarator_binding(decl, declarator);
            if let Some(frame) = self.scope.frames.last_mut() {
                frame.declare(binding);
            }
        }
    }

    fn declarator_binding(
        &self,
        decl: &ast::LocalDeclStmt,
        declarator: &ast::Declarator,
    ) -> LocalBinding {
        let ty = if decl.ty.is_var() {
            declarator
                .initializer
                .as_ref()
                .map(|init| resolver::expr_type(init, &self.scope, self.model))
                .unwrap_or(crate::model::TypeRef::Error)
        } else {
            resolver::resolve_type_syntax(self.model, &self.scope, &decl.ty)
        };
        LocalBinding {
            name: declarator.name.name.clone(),
            ty,
            kind: LocalKind::Local,
            decl_range: declarator.name.range,
        }
    }

    fn visit_stmt(&mut self, stmt: &'a ast::Stmt) {
        match stmt {
            ast::Stmt::Local(decl) => self.visit_local_decl(decl),
            ast::Stmt::Expr(stmt) => self.visit_expr(&stmt.expr),
            ast::Stmt::Return(stmt) => {
                if let Some(value) = &stmt.value {
                    if self.hit(value.range()) {
                        self.visit_expr(value);
                    }
                }
            }
            ast::Stmt::If(stmt) => {
                if self.hit(stmt.condition.range()) {
                    return self.visit_expr(&stmt.condition);
                }
                if self.hit(stmt.then_branch.range()) {
                    return self.visit_stmt(&stmt.then_branch);
                }
                if let Some(else_branch) = &stmt.else_branch {
                    if self.hit(else_branch.range()) {
                        self.visit_stmt(else_branch);
                    }
                }
            }
            ast::Stmt::While(stmt) => {
                if self.hit(stmt.condition.range()) {
                    return self.visit_expr(&stmt.condition);
                }
                if self.hit(stmt.body.range()) {
                    self.visit_stmt(&stmt.body);
                }
            }
            ast::Stmt::For(stmt) => self.visit_for(stmt),
            ast::Stmt::Foreach(stmt) => self.visit_foreach(stmt),
            ast::Stmt::Try(stmt) => self.visit_try(stmt),
            ast::Stmt::Block(block) => self.visit_block_statements(block),
            ast::Stmt::Empty { .. } => {}
        }
    }

    fn visit_local_decl(&mut self, decl: &'a ast::LocalDeclStmt) {
        if self.hit(decl.ty.range()) {
            if decl.ty.is_var() {
                let init = decl
                    .declarators
                    .first()
                    .and_then(|d| d.initializer.as_ref());
                self.target = Some(Target::Var { init });
            } else {
                self.locate_type_syntax(&decl.ty);
            }
            return;
        }
        for (i, declarator) in decl.declarators.iter().enumerate() {
            if !self.hit(declarator.range) {
                continue;
            }
            if declarator.name.contains(self.offset) {
                self.target = Some(Target::Declarator {
                    ty: &decl.ty,
                    declarator,
                });
                return;
            }
            if let Some(init) = &declarator.initializer {
                if self.hit(init.range()) {
                    // Earlier declarators of the same statement are visible
                    // in this initializer; the declarator's own is not.
                    for earlier in &decl.declarators[..i] {
                        let binding = self.declarator_binding(decl, earlier);
                        if let Some(frame) = self.scope.frames.last_mut() {
                            frame.declare(binding);
                        }
                    }
                    self.visit_expr(init);
                }
            }
            return;
        }
    }

    fn visit_for(&mut self, stmt: &'a ast::ForStmt) {
        self.scope.frames.push(ScopeFrame::default());
        if let Some(init) = &stmt.init {
            match init {
                ast::ForInit::Decl(decl) => {
                    if self.hit(decl.range) {
                        return self.visit_local_decl(decl);
                    }
                    if decl.range.end() <= self.offset {
                        self.register_local_decl(decl);
                    }
                }
                ast::ForInit::Expr(expr) => {
                    if self.hit(expr.range()) {
                        return self.visit_expr(expr);
                    }
                }
            }
        }
        if let Some(condition) = &stmt.condition {
            if self.hit(condition.range()) {
                return self.visit_expr(condition);
            }
        }
        if let Some(update) = &stmt.update {
            if self.hit(update.range()) {
                return self.visit_expr(update);
            }
        }
        if self.hit(stmt.body.range()) {
            self.visit_stmt(&stmt.body);
        }
    }

    fn visit_foreach(&mut self, stmt: &'a ast::ForeachStmt) {
        if self.hit(stmt.ty.range()) {
            if stmt.ty.is_var() {
                self.target = Some(Target::ForeachVarType(stmt));
            } else {
                self.locate_type_syntax(&stmt.ty);
            }
            return;
        }
        if stmt.name.contains(self.offset) {
            self.target = Some(Target::ForeachVar(stmt));
            return;
        }
        if self.hit(stmt.iterable.range()) {
            // The iteration variable is not in scope in the iterable.
            return self.visit_expr(&stmt.iterable);
        }
        if self.hit(stmt.body.range()) {
            let binding = resolver::foreach_binding(self.model, &self.scope, stmt);
            let mut frame = ScopeFrame::default();
            frame.declare(binding);
            self.scope.frames.push(frame);
            self.visit_stmt(&stmt.body);
        }
    }

    fn visit_try(&mut self, stmt: &'a ast::TryStmt) {
        if self.hit(stmt.body.range) {
            return self.visit_block_statements(&stmt.body);
        }
        for clause in &stmt.catches {
            if !self.hit(clause.range) {
                continue;
            }
            if let Some(ty) = &clause.exception_type {
                if self.hit(ty.range()) {
                    return self.locate_type_syntax(ty);
                }
            }
            if let Some(variable) = &clause.variable {
                if variable.contains(self.offset) {
                    self.target = Some(Target::CatchVar(clause));
                    return;
                }
            }
            if self.hit(clause.body.range) {
                // The catch variable lives in its clause only.
                let mut frame = ScopeFrame::default();
                if let Some(variable) = &clause.variable {
                    frame.declare(resolver::catch_binding(
                        self.model,
                        &self.scope,
                        clause,
                        variable,
                    ));
                }
                self.scope.frames.push(frame);
                self.visit_block_statements(&clause.body);
            }
            return;
        }
        if let Some(finally) = &stmt.finally {
            if self.hit(finally.range) {
                self.visit_block_statements(finally);
            }
        }
    }

    // ------------------------------------------------------------------
    // Expressions and written types
    // ------------------------------------------------------------------

    fn visit_expr(&mut self, expr: &'a ast::Expr) {
        if !self.hit(expr.range()) {
            return;
        }
        match expr {
            ast::Expr::Ident(id) => {
                if id.name.contains(self.offset) {
                    self.target = Some(Target::Expr(expr));
                    return;
                }
                for arg in &id.type_args {
                    if self.hit(arg.range()) {
                        return self.locate_type_syntax(arg);
                    }
                }
            }
            ast::Expr::This(_) => self.target = Some(Target::Expr(expr)),
            // A literal carries no symbol.
            ast::Expr::Literal(_) => {}
            ast::Expr::Member(access) => {
                if self.hit(access.target.range()) {
                    return self.visit_expr(&access.target);
                }
                if access.name.contains(self.offset) {
                    self.target = Some(Target::Expr(expr));
                    return;
                }
                for arg in &access.type_args {
                    if self.hit(arg.range()) {
                        return self.locate_type_syntax(arg);
                    }
                }
            }
            ast::Expr::Invoke(inv) => {
                // A cursor on the callee name resolves the whole call.
                let callee_hit = match &*inv.target {
                    ast::Expr::Ident(id) => id.name.contains(self.offset),
                    ast::Expr::Member(access) => access.name.contains(self.offset),
                    _ => false,
                };
                if callee_hit {
                    self.target = Some(Target::Expr(expr));
                    return;
                }
                if self.hit(inv.target.range()) {
                    return self.visit_expr(&inv.target);
                }
                for arg in &inv.args {
                    if self.hit(arg.range()) {
                        return self.visit_expr(arg);
                    }
                }
            }
            ast::Expr::New(creation) => {
                if self.hit(creation.ty.range()) {
                    // The created type's name resolves the construction.
                    let on_name = matches!(
                        &creation.ty,
                        ast::TypeSyntax::Named(named)
                            if named.name.range.contains_inclusive(self.offset)
                    );
                    if on_name {
                        self.target = Some(Target::Expr(expr));
                    } else {
                        self.locate_type_syntax(&creation.ty);
                    }
                    return;
                }
                for arg in &creation.args {
                    if self.hit(arg.range()) {
                        return self.visit_expr(arg);
                    }
                }
            }
            ast::Expr::Assign(assign) => {
                if self.hit(assign.target.range()) {
                    return self.visit_expr(&assign.target);
                }
                if self.hit(assign.value.range()) {
                    self.visit_expr(&assign.value);
                }
            }
            ast::Expr::Binary(bin) => {
                if self.hit(bin.lhs.range()) {
                    return self.visit_expr(&bin.lhs);
                }
                if self.hit(bin.rhs.range()) {
                    self.visit_expr(&bin.rhs);
                }
            }
            ast::Expr::Unary(unary) => {
                if self.hit(unary.operand.range()) {
                    self.visit_expr(&unary.operand);
                }
            }
            ast::Expr::Paren(paren) => {
                if self.hit(paren.inner.range()) {
                    self.visit_expr(&paren.inner);
                }
            }
        }
    }

    fn locate_type_syntax(&mut self, ty: &'a ast::TypeSyntax) {
        match ty {
            ast::TypeSyntax::Named(named) => {
                for arg in &named.args {
                    if self.hit(arg.range()) {
                        return self.locate_type_syntax(arg);
                    }
                }
                // A non-final segment resolves its qualifier prefix.
                if let Some(segment) = named.name.segment_at(self.offset) {
                    if segment + 1 < named.name.segments.len() {
                        self.target = Some(Target::TypeName {
                            name: &named.name,
                            segment,
                        });
                        return;
                    }
                }
                self.target = Some(Target::Type(ty));
            }
            ast::TypeSyntax::Array { elem, .. } | ast::TypeSyntax::Pointer { elem, .. } => {
                if self.hit(elem.range()) {
                    self.locate_type_syntax(elem);
                } else {
                    self.target = Some(Target::Type(ty));
                }
            }
            ast::TypeSyntax::Builtin { .. } | ast::TypeSyntax::Var { .. } => {
                self.target = Some(Target::Type(ty));
            }
        }
    }
}
