//! Construction of a [`TypeSystem`] from external metadata and parsed
//! source units.
//!
//! Building is two-phase: declarations first (namespaces and type names, so
//! forward references work), then signatures (bases, member types) resolved
//! against the declaring unit's using context. Unresolvable names become
//! [`TypeRef::Error`]; construction itself never fails on them.

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use tracing::debug;

use super::{
    Accessibility, Member, MemberId, MemberKind, Namespace, NamespaceId, Param, ParamMode,
    Primitives, TypeDef, TypeId, TypeKind, TypeRef, TypeSystem,
};
use crate::base::Name;
use crate::syntax::ast;

static GENERATION: AtomicU64 = AtomicU64::new(1);

/// Errors from the programmatic metadata API. Source units never produce
/// these; their problems become error-marked types instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("`{0}` is not a valid identifier")]
    InvalidName(String),
    #[error("`{0}` is not a valid namespace name")]
    InvalidNamespaceName(String),
}

#[derive(Debug, Default)]
pub struct TypeSystemBuilder {
    namespaces: Vec<Namespace>,
    types: Vec<TypeDef>,
    members: Vec<Member>,
}

impl TypeSystemBuilder {
    pub fn new() -> Self {
        let mut builder = Self::default();
        builder.namespaces.push(Namespace::default()); // root
        builder
    }

    /// Start from an existing model, e.g. to extend a metadata context with
    /// the declarations of one source file. The input model is untouched.
    pub fn from_model(model: &TypeSystem) -> Self {
        Self {
            namespaces: model.namespaces.clone(),
            types: model.types.clone(),
            members: model.members.clone(),
        }
    }

    pub fn root(&self) -> NamespaceId {
        NamespaceId(0)
    }

    // ------------------------------------------------------------------
    // Metadata API
    // ------------------------------------------------------------------

    /// Declare (or find) a namespace by dotted name.
    pub fn declare_namespace(&mut self, dotted: &str) -> Result<NamespaceId, ModelError> {
        let mut current = self.root();
        for segment in dotted.split('.') {
            if !Name::is_valid_identifier(segment) {
                return Err(ModelError::InvalidNamespaceName(dotted.to_owned()));
            }
            current = self.ensure_child_namespace(current, Name::new(segment));
        }
        Ok(current)
    }

    /// Declare (or find) a non-generic type.
    pub fn declare_type(
        &mut self,
        ns: NamespaceId,
        name: &str,
        kind: TypeKind,
    ) -> Result<TypeId, ModelError> {
        self.declare_generic_type(ns, name, kind, &[])
    }

    /// Declare (or find) a type with generic parameters. A second
    /// declaration with the same name and arity merges into the first.
    pub fn declare_generic_type(
        &mut self,
        ns: NamespaceId,
        name: &str,
        kind: TypeKind,
        type_params: &[&str],
    ) -> Result<TypeId, ModelError> {
        if !Name::is_valid_identifier(name) {
            return Err(ModelError::InvalidName(name.to_owned()));
        }
        for param in type_params {
            if !Name::is_valid_identifier(param) {
                return Err(ModelError::InvalidName((*param).to_owned()));
            }
        }
        Ok(self.ensure_type(
            ns,
            None,
            Name::new(name),
            kind,
            type_params.iter().map(|p| Name::new(p)).collect(),
            None,
        ))
    }

    pub fn set_base(&mut self, ty: TypeId, base: TypeRef) {
        self.types[ty.0 as usize].bases.push(base);
    }

    pub fn set_static(&mut self, ty: TypeId) {
        self.types[ty.0 as usize].is_static = true;
    }

    pub fn add_method(
        &mut self,
        ty: TypeId,
        name: &str,
        ret: TypeRef,
        params: Vec<Param>,
        is_static: bool,
    ) -> Result<MemberId, ModelError> {
        self.add_member_checked(ty, name, MemberKind::Method, ret, params, is_static)
    }

    /// A static method whose first parameter is the extension receiver.
    pub fn add_extension_method(
        &mut self,
        ty: TypeId,
        name: &str,
        ret: TypeRef,
        params: Vec<Param>,
    ) -> Result<MemberId, ModelError> {
        let id = self.add_member_checked(ty, name, MemberKind::Method, ret, params, true)?;
        self.members[id.0 as usize].is_extension = true;
        Ok(id)
    }

    pub fn add_ctor(&mut self, ty: TypeId, params: Vec<Param>) -> Result<MemberId, ModelError> {
        let name = self.types[ty.0 as usize].name.as_str().to_owned();
        self.add_member_checked(ty, &name, MemberKind::Ctor, TypeRef::Void, params, false)
    }

    pub fn add_field(
        &mut self,
        ty: TypeId,
        name: &str,
        field_ty: TypeRef,
        is_static: bool,
    ) -> Result<MemberId, ModelError> {
        self.add_member_checked(ty, name, MemberKind::Field, field_ty, Vec::new(), is_static)
    }

    pub fn add_property(
        &mut self,
        ty: TypeId,
        name: &str,
        prop_ty: TypeRef,
        is_static: bool,
    ) -> Result<MemberId, ModelError> {
        self.add_member_checked(ty, name, MemberKind::Property, prop_ty, Vec::new(), is_static)
    }

    pub fn add_event(
        &mut self,
        ty: TypeId,
        name: &str,
        event_ty: TypeRef,
        is_static: bool,
    ) -> Result<MemberId, ModelError> {
        self.add_member_checked(ty, name, MemberKind::Event, event_ty, Vec::new(), is_static)
    }

    fn add_member_checked(
        &mut self,
        ty: TypeId,
        name: &str,
        kind: MemberKind,
        member_ty: TypeRef,
        params: Vec<Param>,
        is_static: bool,
    ) -> Result<MemberId, ModelError> {
        if !Name::is_valid_identifier(name) {
            return Err(ModelError::InvalidName(name.to_owned()));
        }
        Ok(self.push_member(Member {
            name: Name::new(name),
            kind,
            declaring_type: ty,
            ty: member_ty,
            params,
            is_static,
            accessibility: Accessibility::Public,
            is_extension: false,
            decl_range: None,
        }))
    }

    // ------------------------------------------------------------------
    // Source units
    // ------------------------------------------------------------------

    pub fn add_source_unit(&mut self, unit: &ast::CompilationUnit) {
        self.add_source_units(&[unit]);
    }

    /// Merge declarations from several units. Collection of declaration
    /// sites is pure per unit and runs in parallel; the merge into the
    /// arenas is sequential.
    pub fn add_source_units(&mut self, units: &[&ast::CompilationUnit]) {
        let sites: Vec<TypeSite<'_>> = units
            .par_iter()
            .map(|unit| collect_unit(unit))
            .reduce(Vec::new, |mut acc, mut chunk| {
                acc.append(&mut chunk);
                acc
            });

        // Phase 1: declare namespaces and type names so forward and
        // cross-unit references resolve.
        let mut declared: Vec<TypeId> = Vec::with_capacity(sites.len());
        for site in &sites {
            let ns = self.ensure_namespace_path(&site.ns_path);
            let id = self.declare_site(ns, None, site.decl);
            declared.push(id);
        }

        // Phase 2: resolve bases and member signatures.
        for (site, &type_id) in sites.iter().zip(&declared) {
            let ctx = self.name_context(&site.ns_path, &site.usings);
            self.fill_site(type_id, site.decl, &ctx);
        }
    }

    fn declare_site(
        &mut self,
        ns: NamespaceId,
        containing: Option<TypeId>,
        decl: &ast::TypeDecl,
    ) -> TypeId {
        let kind = match decl.kind {
            ast::TypeDeclKind::Class => TypeKind::Class,
            ast::TypeDeclKind::Struct => TypeKind::Struct,
            ast::TypeDeclKind::Interface => TypeKind::Interface,
            ast::TypeDeclKind::Enum => TypeKind::Enum,
        };
        let id = self.ensure_type(
            ns,
            containing,
            decl.name.name.clone(),
            kind,
            decl.type_params.iter().map(|p| p.name.clone()).collect(),
            Some(decl.name.range),
        );
        if decl.is_static {
            self.types[id.0 as usize].is_static = true;
        }
        for member in &decl.members {
            if let ast::MemberDecl::Nested(nested) = member {
                self.declare_site(ns, Some(id), nested);
            }
        }
        id
    }

    fn fill_site(&mut self, type_id: TypeId, decl: &ast::TypeDecl, ctx: &NameContext) {
        for base in &decl.bases {
            let resolved = self.resolve_type_syntax(ctx, Some(type_id), base);
            if resolved.is_error() {
                debug!(ty = %self.types[type_id.0 as usize].name, "unresolvable base type");
            }
            // Partial declarations may repeat the base list.
            if !self.types[type_id.0 as usize].bases.contains(&resolved) {
                self.types[type_id.0 as usize].bases.push(resolved);
            }
        }

        let is_static_class = self.types[type_id.0 as usize].is_static;

        for member in &decl.members {
            match member {
                ast::MemberDecl::Method(m) => {
                    let ret = self.resolve_type_syntax(ctx, Some(type_id), &m.return_type);
                    let mut is_extension = false;
                    let params: Vec<Param> = m
                        .params
                        .iter()
                        .enumerate()
                        .map(|(i, p)| {
                            let mode = match p.modifier {
                                ast::ParamModifier::Ref => ParamMode::Ref,
                                ast::ParamModifier::Out => ParamMode::Out,
                                ast::ParamModifier::Params => ParamMode::Params,
                                ast::ParamModifier::This => {
                                    if i == 0 && m.is_static && is_static_class {
                                        is_extension = true;
                                    }
                                    ParamMode::Value
                                }
                                ast::ParamModifier::None => ParamMode::Value,
                            };
                            Param {
                                name: p.name.name.clone(),
                                ty: self.resolve_type_syntax(ctx, Some(type_id), &p.ty),
                                mode,
                                has_default: p.default.is_some(),
                            }
                        })
                        .collect();
                    self.push_member(Member {
                        name: m.name.name.clone(),
                        kind: MemberKind::Method,
                        declaring_type: type_id,
                        ty: ret,
                        params,
                        is_static: m.is_static,
                        accessibility: accessibility_of(m.access),
                        is_extension,
                        decl_range: Some(m.name.range),
                    });
                }
                ast::MemberDecl::Field(f) => {
                    let ty = self.resolve_type_syntax(ctx, Some(type_id), &f.ty);
                    self.push_member(Member {
                        name: f.name.name.clone(),
                        kind: MemberKind::Field,
                        declaring_type: type_id,
                        ty,
                        params: Vec::new(),
                        is_static: f.is_static,
                        accessibility: accessibility_of(f.access),
                        is_extension: false,
                        decl_range: Some(f.name.range),
                    });
                }
                ast::MemberDecl::Property(p) => {
                    let ty = self.resolve_type_syntax(ctx, Some(type_id), &p.ty);
                    self.push_member(Member {
                        name: p.name.name.clone(),
                        kind: MemberKind::Property,
                        declaring_type: type_id,
                        ty,
                        params: Vec::new(),
                        is_static: p.is_static,
                        accessibility: accessibility_of(p.access),
                        is_extension: false,
                        decl_range: Some(p.name.range),
                    });
                }
                ast::MemberDecl::Ctor(c) => {
                    let params: Vec<Param> = c
                        .params
                        .iter()
                        .map(|p| Param {
                            name: p.name.name.clone(),
                            ty: self.resolve_type_syntax(ctx, Some(type_id), &p.ty),
                            mode: ParamMode::Value,
                            has_default: p.default.is_some(),
                        })
                        .collect();
                    self.push_member(Member {
                        name: c.name.name.clone(),
                        kind: MemberKind::Ctor,
                        declaring_type: type_id,
                        ty: TypeRef::Void,
                        params,
                        is_static: c.is_static,
                        accessibility: accessibility_of(c.access),
                        is_extension: false,
                        decl_range: Some(c.name.range),
                    });
                }
                ast::MemberDecl::Event(e) => {
                    let ty = self.resolve_type_syntax(ctx, Some(type_id), &e.ty);
                    self.push_member(Member {
                        name: e.name.name.clone(),
                        kind: MemberKind::Event,
                        declaring_type: type_id,
                        ty,
                        params: Vec::new(),
                        is_static: e.is_static,
                        accessibility: accessibility_of(e.access),
                        is_extension: false,
                        decl_range: Some(e.name.range),
                    });
                }
                ast::MemberDecl::EnumVariant(v) => {
                    self.push_member(Member {
                        name: v.name.name.clone(),
                        kind: MemberKind::Field,
                        declaring_type: type_id,
                        ty: TypeRef::named(type_id),
                        params: Vec::new(),
                        is_static: true,
                        accessibility: Accessibility::Public,
                        is_extension: false,
                        decl_range: Some(v.name.range),
                    });
                }
                ast::MemberDecl::Nested(nested) => {
                    let ns = self.types[type_id.0 as usize].namespace;
                    // Declared in phase 1; find it again to fill it.
                    let nested_id = self
                        .find_nested(type_id, nested.name.name.as_str())
                        .unwrap_or_else(|| self.declare_site(ns, Some(type_id), nested));
                    self.fill_site(nested_id, nested, ctx);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Name resolution against the model under construction
    // ------------------------------------------------------------------

    fn name_context(&self, ns_path: &[Name], usings: &[UsingSite]) -> NameContext {
        // Namespace chain, innermost first, root last.
        let mut chain = Vec::new();
        let mut current = self.root();
        let mut ids = vec![current];
        for segment in ns_path {
            match self.child_of(current, segment.as_str()) {
                Some(child) => {
                    current = child;
                    ids.push(child);
                }
                None => break,
            }
        }
        chain.extend(ids.into_iter().rev());

        let mut imported = Vec::new();
        let mut aliases = Vec::new();
        for using in usings {
            match &using.alias {
                None => {
                    if let Some(ns) = self.lookup_namespace_path(&using.segments) {
                        imported.push(ns);
                    }
                }
                Some(alias) => {
                    if let Some(ns) = self.lookup_namespace_path(&using.segments) {
                        aliases.push((alias.clone(), NsOrType::Ns(ns)));
                    } else if let Some(ty) = self.lookup_type_path(&using.segments, 0) {
                        aliases.push((alias.clone(), NsOrType::Ty(ty)));
                    }
                }
            }
        }

        NameContext {
            ns_chain: chain,
            imported,
            aliases,
        }
    }

    pub(crate) fn resolve_type_syntax(
        &self,
        ctx: &NameContext,
        owner: Option<TypeId>,
        ty: &ast::TypeSyntax,
    ) -> TypeRef {
        match ty {
            ast::TypeSyntax::Builtin { keyword, .. } => self.builtin_ref(*keyword),
            ast::TypeSyntax::Array { elem, .. } => {
                TypeRef::Array(Box::new(self.resolve_type_syntax(ctx, owner, elem)))
            }
            ast::TypeSyntax::Pointer { elem, .. } => {
                TypeRef::Pointer(Box::new(self.resolve_type_syntax(ctx, owner, elem)))
            }
            // `var` is meaningless in a signature position.
            ast::TypeSyntax::Var { .. } => TypeRef::Error,
            ast::TypeSyntax::Named(named) => self.resolve_named(ctx, owner, named),
        }
    }

    fn builtin_ref(&self, keyword: ast::BuiltinType) -> TypeRef {
        if keyword == ast::BuiltinType::Void {
            return TypeRef::Void;
        }
        let Some(system) = self.child_of(self.root(), "System") else {
            return TypeRef::Error;
        };
        match self.type_in(system, keyword.system_name(), 0) {
            Some(id) => TypeRef::named(id),
            None => TypeRef::Error,
        }
    }

    fn resolve_named(
        &self,
        ctx: &NameContext,
        owner: Option<TypeId>,
        named: &ast::NamedTypeSyntax,
    ) -> TypeRef {
        let arity = named.args.len();
        let segments: Vec<&str> = named
            .name
            .segments
            .iter()
            .map(|s| s.name.as_str())
            .collect();

        // A bare name may be a type parameter of the declaring type.
        if segments.len() == 1 && arity == 0 {
            if let Some(owner_id) = owner {
                let def = &self.types[owner_id.0 as usize];
                if let Some(index) = def.type_params.iter().position(|p| p == segments[0]) {
                    return TypeRef::TypeParam {
                        owner: owner_id,
                        index: index as u32,
                        name: def.type_params[index].clone(),
                    };
                }
            }
        }

        let args: Vec<TypeRef> = named
            .args
            .iter()
            .map(|a| self.resolve_type_syntax(ctx, owner, a))
            .collect();

        match self.resolve_segments(ctx, &segments, arity) {
            Some(id) => TypeRef::Named { id, args },
            None => {
                debug!(name = %named.name.dotted(), "unresolved type name");
                TypeRef::Error
            }
        }
    }

    fn resolve_segments(&self, ctx: &NameContext, segments: &[&str], arity: usize) -> Option<TypeId> {
        let (first, rest) = segments.split_first()?;
        let first_arity = if rest.is_empty() { arity } else { 0 };

        let mut start: Option<NsOrType> = None;

        // Aliases shadow everything else for the first segment.
        for (alias, target) in &ctx.aliases {
            if alias == *first {
                start = Some(target.clone());
                break;
            }
        }

        if start.is_none() {
            for &ns in &ctx.ns_chain {
                if let Some(ty) = self.type_in(ns, first, first_arity) {
                    start = Some(NsOrType::Ty(ty));
                    break;
                }
                if let Some(child) = self.child_of(ns, first) {
                    start = Some(NsOrType::Ns(child));
                    break;
                }
            }
        }

        if start.is_none() {
            // Types (not namespaces) imported via using directives.
            for &ns in &ctx.imported {
                if let Some(ty) = self.type_in(ns, first, first_arity) {
                    start = Some(NsOrType::Ty(ty));
                    break;
                }
            }
        }

        let mut current = start?;
        for (i, segment) in rest.iter().enumerate() {
            let is_last = i + 1 == rest.len();
            let seg_arity = if is_last { arity } else { 0 };
            current = match current {
                NsOrType::Ns(ns) => {
                    if let Some(ty) = self.type_in(ns, segment, seg_arity) {
                        NsOrType::Ty(ty)
                    } else {
                        NsOrType::Ns(self.child_of(ns, segment)?)
                    }
                }
                NsOrType::Ty(ty) => NsOrType::Ty(self.find_nested(ty, segment)?),
            };
        }
        match current {
            NsOrType::Ty(ty) => Some(ty),
            NsOrType::Ns(_) => None,
        }
    }

    // ------------------------------------------------------------------
    // Arena plumbing
    // ------------------------------------------------------------------

    fn ensure_namespace_path(&mut self, path: &[Name]) -> NamespaceId {
        let mut current = self.root();
        for segment in path {
            current = self.ensure_child_namespace(current, segment.clone());
        }
        current
    }

    fn ensure_child_namespace(&mut self, parent: NamespaceId, name: Name) -> NamespaceId {
        if let Some(&existing) = self.namespaces[parent.0 as usize].children.get(&name) {
            return existing;
        }
        let id = NamespaceId(self.namespaces.len() as u32);
        self.namespaces.push(Namespace {
            name: name.clone(),
            parent: Some(parent),
            ..Namespace::default()
        });
        self.namespaces[parent.0 as usize].children.insert(name, id);
        id
    }

    fn ensure_type(
        &mut self,
        ns: NamespaceId,
        containing: Option<TypeId>,
        name: Name,
        kind: TypeKind,
        type_params: Vec<Name>,
        decl_range: Option<crate::base::TextRange>,
    ) -> TypeId {
        let arity = type_params.len();
        match containing {
            None => {
                if let Some(&existing) =
                    self.namespaces[ns.0 as usize].types.get(&(name.clone(), arity))
                {
                    // Partial declaration: same identity, members unioned.
                    return existing;
                }
            }
            Some(outer) => {
                if let Some(existing) = self.find_nested(outer, name.as_str()) {
                    return existing;
                }
            }
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeDef {
            name: name.clone(),
            namespace: ns,
            containing_type: containing,
            kind,
            is_static: false,
            type_params,
            bases: Vec::new(),
            members: Vec::new(),
            nested: Vec::new(),
            decl_range,
        });
        match containing {
            None => {
                self.namespaces[ns.0 as usize].types.insert((name, arity), id);
            }
            Some(outer) => {
                self.types[outer.0 as usize].nested.push(id);
            }
        }
        id
    }

    fn push_member(&mut self, member: Member) -> MemberId {
        let declaring = member.declaring_type;
        let id = MemberId(self.members.len() as u32);
        self.members.push(member);
        self.types[declaring.0 as usize].members.push(id);
        id
    }

    fn child_of(&self, ns: NamespaceId, name: &str) -> Option<NamespaceId> {
        self.namespaces[ns.0 as usize].children.get(name).copied()
    }

    fn type_in(&self, ns: NamespaceId, name: &str, arity: usize) -> Option<TypeId> {
        self.namespaces[ns.0 as usize]
            .types
            .get(&(Name::new(name), arity))
            .copied()
    }

    fn find_nested(&self, ty: TypeId, name: &str) -> Option<TypeId> {
        self.types[ty.0 as usize]
            .nested
            .iter()
            .copied()
            .find(|&id| self.types[id.0 as usize].name == *name)
    }

    fn lookup_namespace_path(&self, segments: &[Name]) -> Option<NamespaceId> {
        let mut current = self.root();
        for segment in segments {
            current = self.child_of(current, segment.as_str())?;
        }
        Some(current)
    }

    fn lookup_type_path(&self, segments: &[Name], arity: usize) -> Option<TypeId> {
        let (last, ns_part) = segments.split_last()?;
        let mut current = self.root();
        for segment in ns_part {
            current = self.child_of(current, segment.as_str())?;
        }
        self.type_in(current, last.as_str(), arity)
    }

    // ------------------------------------------------------------------
    // Finish
    // ------------------------------------------------------------------

    pub fn finish(self) -> TypeSystem {
        let mut model = TypeSystem {
            namespaces: self.namespaces,
            types: self.types,
            members: self.members,
            primitives: Primitives::default(),
            generation: GENERATION.fetch_add(1, Ordering::Relaxed),
        };
        model.primitives = wire_primitives(&model);
        debug!(
            generation = model.generation,
            types = model.types.len(),
            "type system model built"
        );
        model
    }
}

fn wire_primitives(model: &TypeSystem) -> Primitives {
    let Some(system) = model.lookup_namespace("System") else {
        return Primitives::default();
    };
    let find = |name: &str| model.find_type(system, name, 0);
    Primitives {
        object: find("Object"),
        value_type: find("ValueType"),
        string: find("String"),
        boolean: find("Boolean"),
        char: find("Char"),
        sbyte: find("SByte"),
        byte: find("Byte"),
        int16: find("Int16"),
        uint16: find("UInt16"),
        int32: find("Int32"),
        uint32: find("UInt32"),
        int64: find("Int64"),
        uint64: find("UInt64"),
        single: find("Single"),
        double: find("Double"),
    }
}

fn accessibility_of(access: ast::AccessModifier) -> Accessibility {
    match access {
        ast::AccessModifier::Public => Accessibility::Public,
        ast::AccessModifier::Internal => Accessibility::Internal,
        ast::AccessModifier::Protected => Accessibility::Protected,
        // The language default for members is private.
        ast::AccessModifier::Private | ast::AccessModifier::None => Accessibility::Private,
    }
}

// ----------------------------------------------------------------------
// Declaration-site collection (pure, parallelizable per unit)
// ----------------------------------------------------------------------

/// One top-level type declaration together with the namespace path and the
/// using directives in scope at its declaration point.
struct TypeSite<'a> {
    ns_path: Vec<Name>,
    usings: Vec<UsingSite>,
    decl: &'a ast::TypeDecl,
}

#[derive(Clone)]
pub(crate) struct UsingSite {
    alias: Option<Name>,
    segments: Vec<Name>,
}

#[derive(Clone)]
enum NsOrType {
    Ns(NamespaceId),
    Ty(TypeId),
}

pub(crate) struct NameContext {
    /// Enclosing namespaces, innermost first; the root is always last.
    ns_chain: Vec<NamespaceId>,
    imported: Vec<NamespaceId>,
    aliases: Vec<(Name, NsOrType)>,
}

fn collect_unit(unit: &ast::CompilationUnit) -> Vec<TypeSite<'_>> {
    let mut sites = Vec::new();
    let usings: Vec<UsingSite> = unit.usings.iter().map(using_site).collect();
    collect_members(&unit.members, &mut Vec::new(), &usings, &mut sites);
    sites
}

fn collect_members<'a>(
    members: &'a [ast::NamespaceMember],
    ns_path: &mut Vec<Name>,
    usings: &[UsingSite],
    sites: &mut Vec<TypeSite<'a>>,
) {
    for member in members {
        match member {
            ast::NamespaceMember::Type(decl) => {
                sites.push(TypeSite {
                    ns_path: ns_path.clone(),
                    usings: usings.to_vec(),
                    decl,
                });
            }
            ast::NamespaceMember::Namespace(ns) => {
                let depth = ns.name.segments.len();
                for segment in &ns.name.segments {
                    ns_path.push(segment.name.clone());
                }
                let mut inner_usings = usings.to_vec();
                inner_usings.extend(ns.usings.iter().map(using_site));
                collect_members(&ns.members, ns_path, &inner_usings, sites);
                ns_path.truncate(ns_path.len() - depth);
            }
        }
    }
}

fn using_site(using: &ast::UsingDirective) -> UsingSite {
    UsingSite {
        alias: using.alias.as_ref().map(|a| a.name.clone()),
        segments: using.name.segments.iter().map(|s| s.name.clone()).collect(),
    }
}
