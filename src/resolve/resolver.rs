//! The resolver proper: maps a located target plus its scope to a
//! [`ResolveResult`].
//!
//! Everything here is a pure function of `(target, scope, model)`. Semantic
//! failures come back as `ResolveResult::Error`; `None` means the location
//! carries no symbol at all.

use tracing::trace;

use crate::model::{
    Accessibility, Member, MemberId, MemberKind, NamespaceId, TypeId, TypeKind, TypeRef,
    TypeSystem, numeric_kind, widens_to,
};
use crate::syntax::ast;

use super::overload::{OverloadOutcome, resolve_overloads, substituted_type};
use super::result::{
    Candidate, ErrorKind, ErrorResolveResult, InvocationResolveResult, LocalResolveResult,
    MemberResolveResult, NamespaceResolveResult, ResolveResult, TypeResolveResult,
};
use super::scope::{AliasTarget, LocalBinding, LocalKind, Scope};
use super::scope_builder::Target;

pub fn resolve(target: &Target<'_>, scope: &Scope, model: &TypeSystem) -> Option<ResolveResult> {
    trace!(?target, "resolving target");
    match target {
        Target::Using { name, segment } => Some(resolve_using(model, name, *segment)),
        Target::Type(ty) => Some(resolve_type_target(model, scope, ty)),
        Target::Namespace(id) => Some(ResolveResult::Namespace(NamespaceResolveResult {
            id: *id,
            name: model.namespace_qualified_name(*id),
        })),
        Target::TypeName { name, segment } => {
            let prefix: Vec<&str> = name
                .segments
                .iter()
                .take(segment + 1)
                .map(|s| s.name.as_str())
                .collect();
            Some(match resolve_type_path(model, scope, &prefix, 0) {
                Some(SegmentHit::One(NsOrType::Ty(id))) => {
                    ResolveResult::Type(TypeResolveResult {
                        ty: TypeRef::named(id),
                    })
                }
                Some(SegmentHit::One(NsOrType::Ns(ns))) => {
                    ResolveResult::Namespace(NamespaceResolveResult {
                        id: ns,
                        name: model.namespace_qualified_name(ns),
                    })
                }
                Some(SegmentHit::Ambiguous(_)) => ResolveResult::Error(ErrorResolveResult {
                    kind: ErrorKind::Ambiguous,
                    candidates: Vec::new(),
                }),
                None => ResolveResult::unresolved(),
            })
        }
        Target::ForeachVarType(stmt) => {
            let ty = element_type(model, &expr_type(&stmt.iterable, scope, model));
            Some(match ty {
                TypeRef::Error => ResolveResult::type_error(),
                ty => ResolveResult::Type(TypeResolveResult { ty }),
            })
        }
        Target::Var { init } => Some(resolve_var_keyword(model, scope, *init)),
        Target::TypeDeclName => {
            let id = scope.current_type?;
            Some(ResolveResult::Type(TypeResolveResult {
                ty: self_type(model, id),
            }))
        }
        Target::MemberName(ident) => Some(resolve_member_name(model, scope, ident)),
        Target::Param(param) => Some(ResolveResult::Local(LocalResolveResult {
            binding: LocalBinding {
                name: param.name.name.clone(),
                ty: resolve_type_syntax(model, scope, &param.ty),
                kind: LocalKind::Parameter,
                decl_range: param.name.range,
            },
        })),
        Target::Declarator { ty, declarator } => {
            let declared = if ty.is_var() {
                declarator
                    .initializer
                    .as_ref()
                    .map(|init| expr_type(init, scope, model))
                    .unwrap_or(TypeRef::Error)
            } else {
                resolve_type_syntax(model, scope, ty)
            };
            Some(ResolveResult::Local(LocalResolveResult {
                binding: LocalBinding {
                    name: declarator.name.name.clone(),
                    ty: declared,
                    kind: LocalKind::Local,
                    decl_range: declarator.name.range,
                },
            }))
        }
        Target::CatchVar(clause) => {
            let variable = clause.variable.as_ref()?;
            Some(ResolveResult::Local(LocalResolveResult {
                binding: catch_binding(model, scope, clause, variable),
            }))
        }
        Target::ForeachVar(stmt) => Some(ResolveResult::Local(LocalResolveResult {
            binding: foreach_binding(model, scope, stmt),
        })),
        Target::Expr(expr) => resolve_expr(expr, scope, model),
    }
}

/// The binding a catch clause introduces; shared with the scope builder so
/// the registered binding and the resolved one are equal values.
pub(crate) fn catch_binding(
    model: &TypeSystem,
    scope: &Scope,
    clause: &ast::CatchClause,
    variable: &ast::Ident,
) -> LocalBinding {
    let ty = clause
        .exception_type
        .as_ref()
        .map(|t| resolve_type_syntax(model, scope, t))
        .unwrap_or(TypeRef::Error);
    LocalBinding {
        name: variable.name.clone(),
        ty,
        kind: LocalKind::CatchVariable,
        decl_range: variable.range,
    }
}

/// The binding a foreach statement introduces.
pub(crate) fn foreach_binding(
    model: &TypeSystem,
    scope: &Scope,
    stmt: &ast::ForeachStmt,
) -> LocalBinding {
    let ty = if stmt.ty.is_var() {
        element_type(model, &expr_type(&stmt.iterable, scope, model))
    } else {
        resolve_type_syntax(model, scope, &stmt.ty)
    };
    LocalBinding {
        name: stmt.name.name.clone(),
        ty,
        kind: LocalKind::ForeachVariable,
        decl_range: stmt.name.range,
    }
}

fn element_type(model: &TypeSystem, iterable: &TypeRef) -> TypeRef {
    match iterable {
        TypeRef::Array(elem) => (**elem).clone(),
        TypeRef::Named { id, args } => {
            if Some(*id) == model.primitives().string {
                return primitive(model, |p| p.char);
            }
            // A single-argument generic collection yields its element type.
            match args.as_slice() {
                [elem] => elem.clone(),
                _ => TypeRef::Error,
            }
        }
        _ => TypeRef::Error,
    }
}

// ----------------------------------------------------------------------
// Using directives
// ----------------------------------------------------------------------

fn resolve_using(model: &TypeSystem, name: &ast::QualifiedName, segment: usize) -> ResolveResult {
    let mut current = model.root();
    for (i, seg) in name.segments.iter().take(segment + 1).enumerate() {
        if let Some(child) = model.child_namespace(current, seg.name.as_str()) {
            current = child;
            continue;
        }
        // The final segment of an alias target may be a type.
        if i == segment {
            if let Some(ty) = model.find_type_by_name(current, seg.name.as_str()) {
                return ResolveResult::Type(TypeResolveResult {
                    ty: TypeRef::named(ty),
                });
            }
        }
        return ResolveResult::unresolved();
    }
    ResolveResult::Namespace(NamespaceResolveResult {
        id: current,
        name: name.dotted_prefix(segment + 1),
    })
}

// ----------------------------------------------------------------------
// Type syntax
// ----------------------------------------------------------------------

fn resolve_type_target(model: &TypeSystem, scope: &Scope, ty: &ast::TypeSyntax) -> ResolveResult {
    match resolve_type_syntax_detailed(model, scope, ty) {
        Ok(resolved) => ResolveResult::Type(TypeResolveResult { ty: resolved }),
        Err(kind) => ResolveResult::Error(ErrorResolveResult {
            kind,
            candidates: Vec::new(),
        }),
    }
}

/// Resolve a written type against the scope, collapsing failures to
/// [`TypeRef::Error`].
pub(crate) fn resolve_type_syntax(
    model: &TypeSystem,
    scope: &Scope,
    ty: &ast::TypeSyntax,
) -> TypeRef {
    resolve_type_syntax_detailed(model, scope, ty).unwrap_or(TypeRef::Error)
}

fn resolve_type_syntax_detailed(
    model: &TypeSystem,
    scope: &Scope,
    ty: &ast::TypeSyntax,
) -> Result<TypeRef, ErrorKind> {
    match ty {
        ast::TypeSyntax::Builtin { keyword, .. } => builtin_type(model, *keyword),
        ast::TypeSyntax::Array { elem, .. } => {
            let elem = resolve_type_syntax_detailed(model, scope, elem)?;
            Ok(TypeRef::Array(Box::new(elem)))
        }
        ast::TypeSyntax::Pointer { elem, .. } => {
            let elem = resolve_type_syntax_detailed(model, scope, elem)?;
            Ok(TypeRef::Pointer(Box::new(elem)))
        }
        ast::TypeSyntax::Var { .. } => Err(ErrorKind::TypeError),
        ast::TypeSyntax::Named(named) => resolve_named_type(model, scope, named),
    }
}

fn builtin_type(model: &TypeSystem, keyword: ast::BuiltinType) -> Result<TypeRef, ErrorKind> {
    if keyword == ast::BuiltinType::Void {
        return Ok(TypeRef::Void);
    }
    let system = model
        .lookup_namespace("System")
        .ok_or(ErrorKind::Unresolved)?;
    model
        .find_type(system, keyword.system_name(), 0)
        .map(TypeRef::named)
        .ok_or(ErrorKind::Unresolved)
}

fn resolve_named_type(
    model: &TypeSystem,
    scope: &Scope,
    named: &ast::NamedTypeSyntax,
) -> Result<TypeRef, ErrorKind> {
    let arity = named.args.len();
    let segments: Vec<&str> = named
        .name
        .segments
        .iter()
        .map(|s| s.name.as_str())
        .collect();

    if arity == 0 && segments.len() == 1 {
        if let Some(tp) = lookup_type_param(model, scope, segments[0]) {
            return Ok(tp);
        }
    }

    let args = named
        .args
        .iter()
        .map(|a| resolve_type_syntax_detailed(model, scope, a))
        .collect::<Result<Vec<_>, _>>()?;

    match resolve_type_path(model, scope, &segments, arity) {
        Some(SegmentHit::One(NsOrType::Ty(id))) => Ok(TypeRef::Named { id, args }),
        Some(SegmentHit::One(NsOrType::Ns(_))) | None => Err(ErrorKind::Unresolved),
        Some(SegmentHit::Ambiguous(_)) => Err(ErrorKind::Ambiguous),
    }
}

fn lookup_type_param(model: &TypeSystem, scope: &Scope, name: &str) -> Option<TypeRef> {
    let mut current = scope.current_type;
    while let Some(id) = current {
        let def = model.type_def(id);
        if let Some(index) = def.type_params.iter().position(|p| p == name) {
            return Some(TypeRef::TypeParam {
                owner: id,
                index: index as u32,
                name: def.type_params[index].clone(),
            });
        }
        current = def.containing_type;
    }
    None
}

// ----------------------------------------------------------------------
// Name lookup against the namespace structure
// ----------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum NsOrType {
    Ns(NamespaceId),
    Ty(TypeId),
}

#[derive(Debug, Clone)]
enum SegmentHit {
    One(NsOrType),
    /// Two or more imported types with the same name and no alias.
    Ambiguous(Vec<TypeId>),
}

/// Look up a bare name through the using scopes, innermost first. Per
/// level: types of the enclosing namespaces, then aliases, then imported
/// types (colliding imports are ambiguous), then child namespaces.
fn lookup_segment_in_scope(
    model: &TypeSystem,
    scope: &Scope,
    name: &str,
    arity: usize,
) -> Option<SegmentHit> {
    let scopes: Vec<_> = scope.using_scopes().collect();
    for (i, level) in scopes.iter().enumerate() {
        let stop = scopes.get(i + 1).map(|outer| outer.namespace);
        let segment_namespaces = namespace_segment(model, level.namespace, stop);

        for &ns in &segment_namespaces {
            if let Some(ty) = find_type_with_arity(model, ns, name, arity) {
                return Some(SegmentHit::One(NsOrType::Ty(ty)));
            }
        }
        if let Some(target) = level.aliases.get(name) {
            return Some(SegmentHit::One(match target {
                AliasTarget::Namespace(ns) => NsOrType::Ns(*ns),
                AliasTarget::Type(ty) => NsOrType::Ty(*ty),
            }));
        }
        let mut imported: Vec<TypeId> = Vec::new();
        for &import in &level.imports {
            if let Some(ty) = find_type_with_arity(model, import, name, arity) {
                if !imported.contains(&ty) {
                    imported.push(ty);
                }
            }
        }
        match imported.as_slice() {
            [] => {}
            [single] => return Some(SegmentHit::One(NsOrType::Ty(*single))),
            _ => return Some(SegmentHit::Ambiguous(imported)),
        }
        for &ns in &segment_namespaces {
            if let Some(child) = model.child_namespace(ns, name) {
                return Some(SegmentHit::One(NsOrType::Ns(child)));
            }
        }
    }
    None
}

/// Namespaces from `from` up to but excluding `stop` (or up to the root).
fn namespace_segment(
    model: &TypeSystem,
    from: NamespaceId,
    stop: Option<NamespaceId>,
) -> Vec<NamespaceId> {
    let mut out = Vec::new();
    let mut current = Some(from);
    while let Some(ns) = current {
        if Some(ns) == stop {
            break;
        }
        out.push(ns);
        current = model.namespace(ns).parent;
    }
    out
}

fn find_type_with_arity(
    model: &TypeSystem,
    ns: NamespaceId,
    name: &str,
    arity: usize,
) -> Option<TypeId> {
    if arity == 0 {
        model.find_type_by_name(ns, name)
    } else {
        model.find_type(ns, name, arity)
    }
}

fn resolve_type_path(
    model: &TypeSystem,
    scope: &Scope,
    segments: &[&str],
    arity: usize,
) -> Option<SegmentHit> {
    let (first, rest) = segments.split_first()?;
    let first_arity = if rest.is_empty() { arity } else { 0 };
    let head = match lookup_segment_in_scope(model, scope, first, first_arity)? {
        SegmentHit::One(head) => head,
        ambiguous @ SegmentHit::Ambiguous(_) => return Some(ambiguous),
    };

    let mut current = head;
    for (i, segment) in rest.iter().enumerate() {
        let seg_arity = if i + 1 == rest.len() { arity } else { 0 };
        current = match current {
            NsOrType::Ns(ns) => {
                if let Some(ty) = find_type_with_arity(model, ns, segment, seg_arity) {
                    NsOrType::Ty(ty)
                } else {
                    NsOrType::Ns(model.child_namespace(ns, segment)?)
                }
            }
            NsOrType::Ty(ty) => NsOrType::Ty(model.nested_type(ty, segment)?),
        };
    }
    Some(SegmentHit::One(current))
}

// ----------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------

pub(crate) fn resolve_expr(
    expr: &ast::Expr,
    scope: &Scope,
    model: &TypeSystem,
) -> Option<ResolveResult> {
    match expr {
        ast::Expr::Ident(id) => Some(resolve_ident(id, scope, model)),
        ast::Expr::Member(access) => Some(resolve_member_access(access, scope, model)),
        ast::Expr::Invoke(inv) => Some(resolve_invocation(inv, scope, model)),
        ast::Expr::New(creation) => Some(resolve_object_creation(creation, scope, model)),
        ast::Expr::This(_) => this_result(scope, model),
        ast::Expr::Paren(paren) => resolve_expr(&paren.inner, scope, model),
        // Operators and literals carry no symbol of their own.
        _ => None,
    }
}

fn this_result(scope: &Scope, model: &TypeSystem) -> Option<ResolveResult> {
    if scope.in_static_context {
        return None;
    }
    let id = scope.current_type?;
    Some(ResolveResult::Type(TypeResolveResult {
        ty: self_type(model, id),
    }))
}

/// The type of a declaration as seen from inside itself: its own parameters
/// applied as arguments.
fn self_type(model: &TypeSystem, id: TypeId) -> TypeRef {
    let def = model.type_def(id);
    if def.type_params.is_empty() {
        return TypeRef::named(id);
    }
    TypeRef::Named {
        id,
        args: def
            .type_params
            .iter()
            .enumerate()
            .map(|(index, name)| TypeRef::TypeParam {
                owner: id,
                index: index as u32,
                name: name.clone(),
            })
            .collect(),
    }
}

fn resolve_ident(id: &ast::IdentExpr, scope: &Scope, model: &TypeSystem) -> ResolveResult {
    let name = id.name.name.as_str();
    let arity = id.type_args.len();

    if arity == 0 {
        if let Some(binding) = scope.lookup_local(name) {
            return ResolveResult::Local(LocalResolveResult {
                binding: binding.clone(),
            });
        }
        if let Some(tp) = lookup_type_param(model, scope, name) {
            return ResolveResult::Type(TypeResolveResult { ty: tp });
        }
    }

    if let Some((receiver, ids)) = lookup_enclosing_members(model, scope, name) {
        if let Some(result) = member_result(model, &ids, Some(&receiver)) {
            return result;
        }
    }

    let args: Vec<TypeRef> = id
        .type_args
        .iter()
        .map(|a| resolve_type_syntax(model, scope, a))
        .collect();
    match lookup_segment_in_scope(model, scope, name, arity) {
        Some(SegmentHit::One(NsOrType::Ty(ty))) => ResolveResult::Type(TypeResolveResult {
            ty: TypeRef::Named { id: ty, args },
        }),
        Some(SegmentHit::One(NsOrType::Ns(ns))) => {
            ResolveResult::Namespace(NamespaceResolveResult {
                id: ns,
                name: model.namespace_qualified_name(ns),
            })
        }
        Some(SegmentHit::Ambiguous(_)) => ResolveResult::Error(ErrorResolveResult {
            kind: ErrorKind::Ambiguous,
            candidates: Vec::new(),
        }),
        None => ResolveResult::unresolved(),
    }
}

/// Members visible through the enclosing type chain by bare name. The
/// innermost type sees its instance members (outside static contexts);
/// outer types contribute static members only. Constructors never resolve
/// by bare name, and inherited members the enclosing type cannot access
/// are excluded.
fn lookup_enclosing_members(
    model: &TypeSystem,
    scope: &Scope,
    name: &str,
) -> Option<(TypeRef, Vec<MemberId>)> {
    let mut current = scope.current_type;
    let mut innermost = true;
    while let Some(id) = current {
        let statics_only = scope.in_static_context || !innermost;
        let ids: Vec<MemberId> = model
            .members_named(id, name, true)
            .into_iter()
            .filter(|&m| {
                let member = model.member(m);
                member.kind != MemberKind::Ctor
                    && (!statics_only || member.is_static)
                    && is_accessible(model, member, scope.current_type)
            })
            .collect();
        if !ids.is_empty() {
            return Some((self_type(model, id), ids));
        }
        current = model.type_def(id).containing_type;
        innermost = false;
    }
    None
}

/// What the receiver of a member access denotes.
enum Receiver {
    Namespace(NamespaceId),
    /// A type name: static members and nested types.
    Type(TypeRef),
    /// A value: instance members.
    Value(TypeRef),
    Failed(ResolveResult),
}

fn resolve_receiver(expr: &ast::Expr, scope: &Scope, model: &TypeSystem) -> Receiver {
    match resolve_expr(expr, scope, model) {
        Some(ResolveResult::Namespace(ns)) => Receiver::Namespace(ns.id),
        Some(ResolveResult::Type(ty)) => {
            // `this` is a value even though it resolves to the type.
            if matches!(expr, ast::Expr::This(_) | ast::Expr::Paren(_)) {
                Receiver::Value(ty.ty)
            } else {
                Receiver::Type(ty.ty)
            }
        }
        Some(ResolveResult::Local(local)) => Receiver::Value(local.binding.ty),
        Some(ResolveResult::Member(member)) => Receiver::Value(member.ty),
        Some(ResolveResult::Invocation(inv)) => Receiver::Value(inv.ty),
        Some(ResolveResult::Error(_)) => Receiver::Failed(ResolveResult::type_error()),
        None => {
            let ty = expr_type(expr, scope, model);
            if ty.is_error() {
                Receiver::Failed(ResolveResult::unresolved())
            } else {
                Receiver::Value(ty)
            }
        }
    }
}

/// The type whose members a value of `ty` exposes. Arrays and unconstrained
/// type parameters fall back to `object`.
fn member_lookup_type(model: &TypeSystem, ty: &TypeRef) -> Option<TypeId> {
    match ty {
        TypeRef::Named { id, .. } => Some(*id),
        TypeRef::Array(_) | TypeRef::TypeParam { .. } => model.primitives().object,
        _ => None,
    }
}

fn resolve_member_access(
    access: &ast::MemberAccessExpr,
    scope: &Scope,
    model: &TypeSystem,
) -> ResolveResult {
    let name = access.name.name.as_str();
    match resolve_receiver(&access.target, scope, model) {
        Receiver::Failed(err) => err,
        Receiver::Namespace(ns) => {
            if let Some(child) = model.child_namespace(ns, name) {
                return ResolveResult::Namespace(NamespaceResolveResult {
                    id: child,
                    name: model.namespace_qualified_name(child),
                });
            }
            let args: Vec<TypeRef> = access
                .type_args
                .iter()
                .map(|a| resolve_type_syntax(model, scope, a))
                .collect();
            match find_type_with_arity(model, ns, name, access.type_args.len()) {
                Some(ty) => ResolveResult::Type(TypeResolveResult {
                    ty: TypeRef::Named { id: ty, args },
                }),
                None => ResolveResult::unresolved(),
            }
        }
        Receiver::Type(receiver_ty) => {
            let Some(id) = member_lookup_type(model, &receiver_ty) else {
                return ResolveResult::type_error();
            };
            let ids = members_on(model, id, name, true, scope.current_type);
            if let Some(result) = member_result(model, &ids, Some(&receiver_ty)) {
                return result;
            }
            if let Some(nested) = model.nested_type(id, name) {
                return ResolveResult::Type(TypeResolveResult {
                    ty: TypeRef::named(nested),
                });
            }
            ResolveResult::unresolved()
        }
        Receiver::Value(receiver_ty) => {
            if receiver_ty.is_error() {
                return ResolveResult::type_error();
            }
            let Some(id) = member_lookup_type(model, &receiver_ty) else {
                return ResolveResult::type_error();
            };
            let ids = members_on(model, id, name, false, scope.current_type);
            if let Some(result) = member_result(model, &ids, Some(&receiver_ty)) {
                return result;
            }
            let extensions = extension_candidates(model, scope, name, &receiver_ty);
            if let Some(result) = member_result(model, &extensions, None) {
                return result;
            }
            ResolveResult::unresolved()
        }
    }
}

/// Named members on a type, static or instance side, constructors excluded,
/// restricted to those accessible from `from`.
fn members_on(
    model: &TypeSystem,
    id: TypeId,
    name: &str,
    statics: bool,
    from: Option<TypeId>,
) -> Vec<MemberId> {
    model
        .members_named(id, name, true)
        .into_iter()
        .filter(|&m| {
            let member = model.member(m);
            member.kind != MemberKind::Ctor
                && member.is_static == statics
                && is_accessible(model, member, from)
        })
        .collect()
}

/// Whether `member` can be referenced from code lexically inside `from`.
/// The model covers a single assembly, so `internal` behaves like `public`.
fn is_accessible(model: &TypeSystem, member: &Member, from: Option<TypeId>) -> bool {
    match member.accessibility {
        Accessibility::Public | Accessibility::Internal => true,
        Accessibility::Private => {
            containing_chain(model, from).any(|id| id == member.declaring_type)
        }
        Accessibility::Protected => containing_chain(model, from)
            .any(|id| model.base_chain(id).contains(&member.declaring_type)),
    }
}

/// `from` and the types it is lexically nested in, innermost first.
fn containing_chain<'m>(
    model: &'m TypeSystem,
    from: Option<TypeId>,
) -> impl Iterator<Item = TypeId> + 'm {
    std::iter::successors(from, move |&id| model.type_def(id).containing_type)
}

/// A same-name member set outside invocation position: a single member
/// resolves directly; an overload set has no arguments to pick by and is
/// ambiguous. `None` for an empty set so callers can fall through.
fn member_result(
    model: &TypeSystem,
    ids: &[MemberId],
    receiver: Option<&TypeRef>,
) -> Option<ResolveResult> {
    match ids {
        [] => None,
        [member] => Some(ResolveResult::Member(MemberResolveResult {
            ty: substituted_type(&model.member(*member).ty, receiver),
            member: *member,
        })),
        _ => Some(ResolveResult::Error(ErrorResolveResult {
            kind: ErrorKind::Ambiguous,
            candidates: ids
                .iter()
                .map(|&member| Candidate {
                    member,
                    mismatch: None,
                })
                .collect(),
        })),
    }
}

/// Extension methods applicable to `receiver_ty`, gathered from static
/// classes in every namespace in scope (declared chain and imports).
fn extension_candidates(
    model: &TypeSystem,
    scope: &Scope,
    name: &str,
    receiver_ty: &TypeRef,
) -> Vec<MemberId> {
    let mut namespaces: Vec<NamespaceId> = Vec::new();
    for level in scope.using_scopes() {
        for ns in namespace_segment(model, level.namespace, None) {
            if !namespaces.contains(&ns) {
                namespaces.push(ns);
            }
        }
        for &import in &level.imports {
            if !namespaces.contains(&import) {
                namespaces.push(import);
            }
        }
    }

    let mut out = Vec::new();
    for ns in namespaces {
        for ty in model.namespace(ns).types() {
            if !model.type_def(ty).is_static {
                continue;
            }
            for &member_id in &model.type_def(ty).members {
                let member = model.member(member_id);
                if !member.is_extension
                    || member.name != *name
                    || !is_accessible(model, member, scope.current_type)
                {
                    continue;
                }
                let Some(first) = member.params.first() else {
                    continue;
                };
                if crate::model::classify_conversion(model, receiver_ty, &first.ty).is_some() {
                    out.push(member_id);
                }
            }
        }
    }
    out
}

// ----------------------------------------------------------------------
// Invocations
// ----------------------------------------------------------------------

fn resolve_invocation(
    inv: &ast::InvocationExpr,
    scope: &Scope,
    model: &TypeSystem,
) -> ResolveResult {
    let arg_types: Vec<TypeRef> = inv
        .args
        .iter()
        .map(|arg| expr_type(arg, scope, model))
        .collect();

    match &*inv.target {
        ast::Expr::Ident(id) => {
            let name = id.name.name.as_str();
            if let Some(binding) = scope.lookup_local(name) {
                return invoke_value(model, binding.ty.clone(), &arg_types);
            }
            if let Some((receiver, ids)) = lookup_enclosing_members(model, scope, name) {
                return invoke_members(model, &receiver, ids, &arg_types);
            }
            ResolveResult::unresolved()
        }
        ast::Expr::Member(access) => {
            let name = access.name.name.as_str();
            match resolve_receiver(&access.target, scope, model) {
                Receiver::Failed(err) => err,
                Receiver::Namespace(_) => ResolveResult::unresolved(),
                Receiver::Type(receiver_ty) => {
                    let Some(id) = member_lookup_type(model, &receiver_ty) else {
                        return ResolveResult::type_error();
                    };
                    invoke_members(
                        model,
                        &receiver_ty,
                        members_on(model, id, name, true, scope.current_type),
                        &arg_types,
                    )
                }
                Receiver::Value(receiver_ty) => {
                    let Some(id) = member_lookup_type(model, &receiver_ty) else {
                        return ResolveResult::type_error();
                    };
                    let ids = members_on(model, id, name, false, scope.current_type);
                    if !ids.is_empty() {
                        return invoke_members(model, &receiver_ty, ids, &arg_types);
                    }
                    let extensions = extension_candidates(model, scope, name, &receiver_ty);
                    if extensions.is_empty() {
                        return ResolveResult::unresolved();
                    }
                    // The receiver becomes the first argument.
                    let mut full_args = Vec::with_capacity(arg_types.len() + 1);
                    full_args.push(receiver_ty);
                    full_args.extend(arg_types);
                    run_overloads(model, &extensions, None, &full_args, None)
                }
            }
        }
        other => {
            let ty = expr_type(other, scope, model);
            invoke_value(model, ty, &arg_types)
        }
    }
}

/// Invoke a member set: methods resolve by overloading, a lone
/// delegate-typed field or property invokes through its `Invoke`.
fn invoke_members(
    model: &TypeSystem,
    receiver: &TypeRef,
    ids: Vec<MemberId>,
    args: &[TypeRef],
) -> ResolveResult {
    let methods: Vec<MemberId> = ids
        .iter()
        .copied()
        .filter(|&m| model.member(m).kind == MemberKind::Method)
        .collect();
    if !methods.is_empty() {
        return run_overloads(model, &methods, Some(receiver), args, None);
    }
    match ids.first() {
        Some(&member) => {
            let ty = substituted_type(&model.member(member).ty, Some(receiver));
            invoke_value(model, ty, args)
        }
        None => ResolveResult::unresolved(),
    }
}

/// Invoke a value: only delegate-typed values are callable.
fn invoke_value(model: &TypeSystem, ty: TypeRef, args: &[TypeRef]) -> ResolveResult {
    if ty.is_error() {
        return ResolveResult::type_error();
    }
    let Some((id, _)) = ty.as_named() else {
        return ResolveResult::type_error();
    };
    if model.type_def(id).kind != TypeKind::Delegate {
        return ResolveResult::type_error();
    }
    let invoke = model.members_named(id, "Invoke", false);
    run_overloads(model, &invoke, Some(&ty), args, None)
}

fn resolve_object_creation(
    creation: &ast::ObjectCreationExpr,
    scope: &Scope,
    model: &TypeSystem,
) -> ResolveResult {
    let created = resolve_type_syntax(model, scope, &creation.ty);
    if created.is_error() {
        return ResolveResult::unresolved();
    }
    let Some((id, _)) = created.as_named() else {
        return ResolveResult::type_error();
    };
    let arg_types: Vec<TypeRef> = creation
        .args
        .iter()
        .map(|arg| expr_type(arg, scope, model))
        .collect();
    let declared = model.ctors_of(id);
    if declared.is_empty() {
        // Implicit parameterless constructor.
        return if arg_types.is_empty() {
            ResolveResult::Type(TypeResolveResult { ty: created })
        } else {
            ResolveResult::unresolved()
        };
    }
    let ctors: Vec<MemberId> = declared
        .into_iter()
        .filter(|&c| is_accessible(model, model.member(c), scope.current_type))
        .collect();
    if ctors.is_empty() {
        return ResolveResult::unresolved();
    }
    run_overloads(model, &ctors, Some(&created), &arg_types, Some(created.clone()))
}

/// Run overload resolution and shape the outcome. `result_ty` overrides the
/// chosen member's return type (object creation yields the created type).
fn run_overloads(
    model: &TypeSystem,
    candidates: &[MemberId],
    receiver: Option<&TypeRef>,
    args: &[TypeRef],
    result_ty: Option<TypeRef>,
) -> ResolveResult {
    match resolve_overloads(model, candidates, receiver, args) {
        OverloadOutcome::Chosen {
            member,
            conversions,
        } => {
            let ty = result_ty
                .unwrap_or_else(|| substituted_type(&model.member(member).ty, receiver));
            ResolveResult::Invocation(InvocationResolveResult {
                member,
                ty,
                conversions,
            })
        }
        OverloadOutcome::Ambiguous(tied) => ResolveResult::Error(ErrorResolveResult {
            kind: ErrorKind::Ambiguous,
            candidates: tied
                .into_iter()
                .map(|member| Candidate {
                    member,
                    mismatch: None,
                })
                .collect(),
        }),
        OverloadOutcome::NoneApplicable(candidates) => ResolveResult::Error(ErrorResolveResult {
            kind: ErrorKind::Unresolved,
            candidates,
        }),
    }
}

// ----------------------------------------------------------------------
// Declared member names
// ----------------------------------------------------------------------

fn resolve_member_name(model: &TypeSystem, scope: &Scope, ident: &ast::Ident) -> ResolveResult {
    let Some(id) = scope.current_type else {
        return ResolveResult::unresolved();
    };
    let declared = model
        .members_of(id, false)
        .into_iter()
        .find(|&m| model.member(m).decl_range == Some(ident.range));
    match declared {
        Some(member) => ResolveResult::Member(MemberResolveResult {
            ty: model.member(member).ty.clone(),
            member,
        }),
        None => ResolveResult::unresolved(),
    }
}

// ----------------------------------------------------------------------
// var
// ----------------------------------------------------------------------

fn resolve_var_keyword(
    model: &TypeSystem,
    scope: &Scope,
    init: Option<&ast::Expr>,
) -> ResolveResult {
    let ty = match init {
        Some(expr) => expr_type(expr, scope, model),
        None => TypeRef::Error,
    };
    match ty {
        TypeRef::Error | TypeRef::Void | TypeRef::Null => ResolveResult::type_error(),
        ty => ResolveResult::Type(TypeResolveResult { ty }),
    }
}

// ----------------------------------------------------------------------
// Expression typing
// ----------------------------------------------------------------------

/// The type of an expression, [`TypeRef::Error`] when it cannot be
/// computed. Never fails; malformed subexpressions poison only their own
/// type.
pub(crate) fn expr_type(expr: &ast::Expr, scope: &Scope, model: &TypeSystem) -> TypeRef {
    match expr {
        ast::Expr::Literal(lit) => literal_type(model, &lit.kind),
        ast::Expr::Binary(bin) => binary_type(bin, scope, model),
        ast::Expr::Unary(unary) => match unary.op {
            ast::UnaryOp::Not => primitive(model, |p| p.boolean),
            ast::UnaryOp::Neg => expr_type(&unary.operand, scope, model),
        },
        ast::Expr::Assign(assign) => expr_type(&assign.target, scope, model),
        ast::Expr::Paren(paren) => expr_type(&paren.inner, scope, model),
        ast::Expr::This(_) => {
            if scope.in_static_context {
                return TypeRef::Error;
            }
            match scope.current_type {
                Some(id) => self_type(model, id),
                None => TypeRef::Error,
            }
        }
        _ => resolve_expr(expr, scope, model)
            .as_ref()
            .and_then(ResolveResult::ty)
            .cloned()
            .unwrap_or(TypeRef::Error),
    }
}

fn literal_type(model: &TypeSystem, kind: &ast::LiteralKind) -> TypeRef {
    let prims = model.primitives();
    let id = match kind {
        ast::LiteralKind::Int(_) => prims.int32,
        ast::LiteralKind::Long(_) => prims.int64,
        ast::LiteralKind::Double(_) => prims.double,
        ast::LiteralKind::Str(_) => prims.string,
        ast::LiteralKind::Char(_) => prims.char,
        ast::LiteralKind::Bool(_) => prims.boolean,
        ast::LiteralKind::Null => return TypeRef::Null,
    };
    id.map(TypeRef::named).unwrap_or(TypeRef::Error)
}

fn primitive(
    model: &TypeSystem,
    pick: fn(&crate::model::Primitives) -> Option<TypeId>,
) -> TypeRef {
    pick(model.primitives())
        .map(TypeRef::named)
        .unwrap_or(TypeRef::Error)
}

fn binary_type(bin: &ast::BinaryExpr, scope: &Scope, model: &TypeSystem) -> TypeRef {
    use ast::BinaryOp::*;
    match bin.op {
        Eq | Ne | Lt | Le | Gt | Ge | And | Or => primitive(model, |p| p.boolean),
        Add | Sub | Mul | Div | Rem => {
            let lhs = expr_type(&bin.lhs, scope, model);
            let rhs = expr_type(&bin.rhs, scope, model);
            if bin.op == Add && (is_string(model, &lhs) || is_string(model, &rhs)) {
                return primitive(model, |p| p.string);
            }
            promote_numeric(model, &lhs, &rhs)
        }
    }
}

fn is_string(model: &TypeSystem, ty: &TypeRef) -> bool {
    matches!(ty.as_named(), Some((id, [])) if Some(id) == model.primitives().string)
}

/// Binary numeric promotion: the wider operand's type wins.
fn promote_numeric(model: &TypeSystem, lhs: &TypeRef, rhs: &TypeRef) -> TypeRef {
    let (Some(lk), Some(rk)) = (numeric_kind(model, lhs), numeric_kind(model, rhs)) else {
        return TypeRef::Error;
    };
    if lk == rk || widens_to(rk, lk) {
        lhs.clone()
    } else if widens_to(lk, rk) {
        rhs.clone()
    } else {
        TypeRef::Error
    }
}
