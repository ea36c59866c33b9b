//! Type system model: a queryable graph of namespaces, types, and members,
//! independent of any specific source edit.
//!
//! A [`TypeSystem`] is built once by [`TypeSystemBuilder`] from external
//! metadata and parsed source units, and is immutable afterwards. Editing a
//! file produces a new model value; concurrent readers keep resolving
//! against the snapshot they hold. Each model carries a monotonically
//! increasing [`TypeSystem::generation`] so consumers can discard stale
//! results without mid-resolve cancellation.

mod builder;
pub mod builtin;
mod conversions;
mod members;
mod types;

pub use builder::{ModelError, TypeSystemBuilder};
pub use conversions::{Conversion, classify_conversion};
pub(crate) use conversions::{numeric_kind, widens_to};
pub use members::{Accessibility, Member, MemberKind, Param, ParamMode};
pub use types::{TypeDef, TypeKind, TypeRef};

use crate::base::Name;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Index of a namespace node within one [`TypeSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(pub(crate) u32);

impl NamespaceId {
    pub const ROOT: NamespaceId = NamespaceId(0);
}

/// Index of a type definition within one [`TypeSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

/// Index of a member within one [`TypeSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub(crate) u32);

/// One node of the namespace segment tree. Namespaces own child namespaces
/// and the types declared directly in them, nothing else.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    pub name: Name,
    pub parent: Option<NamespaceId>,
    // IndexMap keeps declaration order, which keeps resolution deterministic.
    pub(crate) children: IndexMap<Name, NamespaceId>,
    pub(crate) types: IndexMap<(Name, usize), TypeId>,
}

impl Namespace {
    pub fn child_namespaces(&self) -> impl Iterator<Item = (&Name, NamespaceId)> {
        self.children.iter().map(|(name, &id)| (name, id))
    }

    pub fn types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.types.values().copied()
    }
}

/// Known `System` types the resolver needs by identity (primitives and the
/// roots of the conversion rules). Entries are absent when the model was
/// built without the corresponding metadata.
#[derive(Debug, Clone, Default)]
pub struct Primitives {
    pub object: Option<TypeId>,
    pub value_type: Option<TypeId>,
    pub string: Option<TypeId>,
    pub boolean: Option<TypeId>,
    pub char: Option<TypeId>,
    pub sbyte: Option<TypeId>,
    pub byte: Option<TypeId>,
    pub int16: Option<TypeId>,
    pub uint16: Option<TypeId>,
    pub int32: Option<TypeId>,
    pub uint32: Option<TypeId>,
    pub int64: Option<TypeId>,
    pub uint64: Option<TypeId>,
    pub single: Option<TypeId>,
    pub double: Option<TypeId>,
}

/// The immutable type system graph.
#[derive(Debug, Clone)]
pub struct TypeSystem {
    pub(crate) namespaces: Vec<Namespace>,
    pub(crate) types: Vec<TypeDef>,
    pub(crate) members: Vec<Member>,
    pub(crate) primitives: Primitives,
    pub(crate) generation: u64,
}

impl TypeSystem {
    /// The global (root) namespace.
    pub fn root(&self) -> NamespaceId {
        NamespaceId(0)
    }

    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.0 as usize]
    }

    pub fn type_def(&self, id: TypeId) -> &TypeDef {
        &self.types[id.0 as usize]
    }

    pub fn member(&self, id: MemberId) -> &Member {
        &self.members[id.0 as usize]
    }

    pub fn primitives(&self) -> &Primitives {
        &self.primitives
    }

    /// Monotonically increasing across all models built in this process.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ------------------------------------------------------------------
    // Namespace queries
    // ------------------------------------------------------------------

    /// Look up a namespace by dotted qualified name; `""` is the root.
    pub fn lookup_namespace(&self, qualified: &str) -> Option<NamespaceId> {
        let mut current = self.root();
        if qualified.is_empty() {
            return Some(current);
        }
        for segment in qualified.split('.') {
            current = self.child_namespace(current, segment)?;
        }
        Some(current)
    }

    pub fn child_namespace(&self, ns: NamespaceId, name: &str) -> Option<NamespaceId> {
        self.namespace(ns).children.get(name).copied()
    }

    pub fn namespace_qualified_name(&self, id: NamespaceId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(ns_id) = current {
            let ns = self.namespace(ns_id);
            if ns.parent.is_some() {
                segments.push(ns.name.as_str().to_owned());
            }
            current = ns.parent;
        }
        segments.reverse();
        segments.join(".")
    }

    // ------------------------------------------------------------------
    // Type queries
    // ------------------------------------------------------------------

    /// Find a type declared directly in `ns` with the given name and generic
    /// arity.
    pub fn find_type(&self, ns: NamespaceId, name: &str, arity: usize) -> Option<TypeId> {
        self.namespace(ns)
            .types
            .get(&(Name::new(name), arity))
            .copied()
    }

    /// Find a type by name preferring the non-generic one, falling back to
    /// the lowest declared arity. Used for simple-name lookup without
    /// explicit type arguments.
    pub fn find_type_by_name(&self, ns: NamespaceId, name: &str) -> Option<TypeId> {
        if let Some(id) = self.find_type(ns, name, 0) {
            return Some(id);
        }
        self.namespace(ns)
            .types
            .iter()
            .filter(|((n, _), _)| n.as_str() == name)
            .map(|(_, &id)| id)
            .next()
    }

    pub fn type_qualified_name(&self, id: TypeId) -> String {
        let def = self.type_def(id);
        if let Some(outer) = def.containing_type {
            let mut name = self.type_qualified_name(outer);
            name.push('.');
            name.push_str(def.name.as_str());
            return name;
        }
        let ns_name = self.namespace_qualified_name(def.namespace);
        if ns_name.is_empty() {
            def.name.as_str().to_owned()
        } else {
            format!("{}.{}", ns_name, def.name)
        }
    }

    /// Base-class chain starting at `ty` itself; interfaces excluded. Ends
    /// at `System.Object` when the metadata for it is present.
    pub fn base_chain(&self, ty: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(ty);
        while let Some(id) = current {
            if !seen.insert(id) {
                break; // inheritance cycle in malformed input
            }
            chain.push(id);
            current = self.base_class(id);
        }
        chain
    }

    /// The direct base class of `ty`, with the implicit ones filled in:
    /// structs and enums derive from `ValueType`, everything else bottoms
    /// out at `Object`.
    fn base_class(&self, ty: TypeId) -> Option<TypeId> {
        let def = self.type_def(ty);
        for base in &def.bases {
            if let TypeRef::Named { id, .. } = base {
                if self.type_def(*id).kind != TypeKind::Interface {
                    return Some(*id);
                }
            }
        }
        match def.kind {
            TypeKind::Interface | TypeKind::Error => None,
            TypeKind::Struct | TypeKind::Enum => {
                if Some(ty) == self.primitives.value_type {
                    self.primitives.object.filter(|&o| o != ty)
                } else {
                    self.primitives.value_type.filter(|&v| v != ty)
                }
            }
            TypeKind::Class | TypeKind::Delegate => {
                self.primitives.object.filter(|&o| o != ty)
            }
        }
    }

    /// All interfaces implemented by `ty`, directly or through bases.
    pub fn all_interfaces(&self, ty: TypeId) -> Vec<TypeId> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        let mut stack: Vec<TypeId> = self.base_chain(ty);
        while let Some(id) = stack.pop() {
            for base in &self.type_def(id).bases {
                if let TypeRef::Named { id: base_id, .. } = base {
                    if self.type_def(*base_id).kind == TypeKind::Interface
                        && seen.insert(*base_id)
                    {
                        out.push(*base_id);
                        stack.push(*base_id);
                    }
                }
            }
        }
        out
    }

    /// Whether `sub` is `sup` or derives from it (base chain or implemented
    /// interface).
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        if self.base_chain(sub).contains(&sup) {
            return true;
        }
        self.all_interfaces(sub).contains(&sup)
    }

    // ------------------------------------------------------------------
    // Member queries
    // ------------------------------------------------------------------

    /// Members of `ty`, optionally walking the base chain outward. A derived
    /// member hides the base one with the same name (same signature for
    /// methods) before overload sets are formed.
    pub fn members_of(&self, ty: TypeId, include_inherited: bool) -> Vec<MemberId> {
        let mut out = Vec::new();
        let mut hidden: FxHashSet<MemberKey> = FxHashSet::default();
        let chain = if include_inherited {
            self.base_chain(ty)
        } else {
            vec![ty]
        };
        for type_id in chain {
            for &member_id in &self.type_def(type_id).members {
                let member = self.member(member_id);
                if member.kind == MemberKind::Ctor {
                    // Constructors are not inherited.
                    if type_id != ty {
                        continue;
                    }
                    out.push(member_id);
                    continue;
                }
                let key = self.member_key(member);
                if hidden.insert(key) {
                    out.push(member_id);
                }
            }
        }
        out
    }

    /// Members named `name`, with inheritance and hiding applied.
    pub fn members_named(&self, ty: TypeId, name: &str, include_inherited: bool) -> Vec<MemberId> {
        self.members_of(ty, include_inherited)
            .into_iter()
            .filter(|&id| self.member(id).name == *name)
            .collect()
    }

    /// Constructors declared on `ty`.
    pub fn ctors_of(&self, ty: TypeId) -> Vec<MemberId> {
        self.type_def(ty)
            .members
            .iter()
            .copied()
            .filter(|&id| self.member(id).kind == MemberKind::Ctor)
            .collect()
    }

    /// Nested types declared on `ty`.
    pub fn nested_type(&self, ty: TypeId, name: &str) -> Option<TypeId> {
        self.type_def(ty)
            .nested
            .iter()
            .copied()
            .find(|&id| self.type_def(id).name == *name)
    }

    fn member_key(&self, member: &Member) -> MemberKey {
        let signature = if member.kind == MemberKind::Method {
            Some(member.params.iter().map(|p| p.ty.clone()).collect())
        } else {
            None
        };
        MemberKey {
            name: member.name.clone(),
            kind: member.kind,
            signature,
        }
    }

    /// Human-readable rendering of a type reference, used in diagnostics and
    /// tests.
    pub fn display_type(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named { id, args } => {
                let mut out = self.type_qualified_name(*id);
                if !args.is_empty() {
                    out.push('<');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&self.display_type(arg));
                    }
                    out.push('>');
                }
                out
            }
            TypeRef::Array(elem) => format!("{}[]", self.display_type(elem)),
            TypeRef::Pointer(elem) => format!("{}*", self.display_type(elem)),
            TypeRef::TypeParam { name, .. } => name.as_str().to_owned(),
            TypeRef::Void => "void".to_owned(),
            TypeRef::Null => "<null>".to_owned(),
            TypeRef::Error => "<error>".to_owned(),
        }
    }
}

/// Hiding key: name for fields/properties/events, name plus parameter types
/// for methods.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemberKey {
    name: Name,
    kind: MemberKind,
    signature: Option<Vec<TypeRef>>,
}
