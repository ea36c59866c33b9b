//! What is visible at one source location: local frames, using directives,
//! and the enclosing type.

use indexmap::IndexMap;
use tracing::trace;

use crate::base::{Name, TextRange};
use crate::model::{NamespaceId, TypeId, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalKind {
    Parameter,
    Local,
    CatchVariable,
    ForeachVariable,
}

/// A local binding. Identity is the full value, so resolving the same
/// location twice yields equal bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalBinding {
    pub name: Name,
    pub ty: TypeRef,
    pub kind: LocalKind,
    /// Range of the declaring name.
    pub decl_range: TextRange,
}

/// One lexical frame of local bindings, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ScopeFrame {
    bindings: IndexMap<Name, LocalBinding>,
    /// Set when a name was declared twice in this frame. The first
    /// declaration stays authoritative.
    pub has_duplicates: bool,
}

impl ScopeFrame {
    pub fn declare(&mut self, binding: LocalBinding) {
        if self.bindings.contains_key(&binding.name) {
            trace!(name = %binding.name, "duplicate declaration in one frame");
            self.has_duplicates = true;
            return;
        }
        self.bindings.insert(binding.name.clone(), binding);
    }

    pub fn get(&self, name: &str) -> Option<&LocalBinding> {
        self.bindings.get(name)
    }
}

/// Alias introduced by `using N = ...;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasTarget {
    Namespace(NamespaceId),
    Type(TypeId),
}

/// Using directives and the enclosing namespace at one nesting level.
#[derive(Debug, Clone)]
pub struct UsingScope {
    /// Namespace this level declares into; the root for the file level.
    pub namespace: NamespaceId,
    /// Namespaces imported by plain `using` directives at this level.
    pub imports: Vec<NamespaceId>,
    pub aliases: IndexMap<Name, AliasTarget>,
}

impl UsingScope {
    pub fn new(namespace: NamespaceId) -> Self {
        Self {
            namespace,
            imports: Vec::new(),
            aliases: IndexMap::new(),
        }
    }
}

/// Everything visible at the target location. Built once per query by the
/// scope builder; lookups walk innermost-first.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Outermost first.
    pub(crate) usings: Vec<UsingScope>,
    /// Outermost first.
    pub(crate) frames: Vec<ScopeFrame>,
    pub current_type: Option<TypeId>,
    /// Inside a static member; the implicit receiver is absent.
    pub in_static_context: bool,
    /// Generation of the model this scope was built against.
    pub generation: u64,
}

impl Scope {
    pub fn new(generation: u64, root: NamespaceId) -> Self {
        Self {
            usings: vec![UsingScope::new(root)],
            frames: Vec::new(),
            current_type: None,
            in_static_context: false,
            generation,
        }
    }

    pub fn lookup_local(&self, name: &str) -> Option<&LocalBinding> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Using scopes, innermost first.
    pub fn using_scopes(&self) -> impl Iterator<Item = &UsingScope> {
        self.usings.iter().rev()
    }

    /// Namespaces imported anywhere in scope, innermost level first.
    pub fn imported_namespaces(&self) -> impl Iterator<Item = NamespaceId> + '_ {
        self.using_scopes()
            .flat_map(|scope| scope.imports.iter().copied())
    }

    pub fn lookup_alias(&self, name: &str) -> Option<AliasTarget> {
        self.using_scopes()
            .find_map(|scope| scope.aliases.get(name).copied())
    }

    /// Innermost declared namespace.
    pub fn namespace(&self) -> NamespaceId {
        self.usings
            .last()
            .map(|scope| scope.namespace)
            .unwrap_or(NamespaceId::ROOT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(name: &str) -> LocalBinding {
        LocalBinding {
            name: Name::new(name),
            ty: TypeRef::Error,
            kind: LocalKind::Local,
            decl_range: TextRange::default(),
        }
    }

    #[test]
    fn first_declaration_wins_within_a_frame() {
        let mut frame = ScopeFrame::default();
        let mut first = binding("x");
        first.kind = LocalKind::Parameter;
        frame.declare(first.clone());
        frame.declare(binding("x"));
        assert!(frame.has_duplicates);
        assert_eq!(frame.get("x"), Some(&first));
    }

    #[test]
    fn inner_frames_shadow_outer_ones() {
        let mut scope = Scope::new(0, NamespaceId::ROOT);
        let mut outer = ScopeFrame::default();
        outer.declare(binding("x"));
        let mut inner = ScopeFrame::default();
        let mut shadow = binding("x");
        shadow.kind = LocalKind::ForeachVariable;
        inner.declare(shadow.clone());
        scope.frames.push(outer);
        scope.frames.push(inner);
        assert_eq!(scope.lookup_local("x"), Some(&shadow));
    }
}
