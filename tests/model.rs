//! Model construction from source: partial-type merging, member hiding,
//! unresolvable bases, namespace structure, and arity-distinguished types.

mod helpers;

use minsharp::model::{
    ModelError, TypeKind, TypeRef, TypeSystem, TypeSystemBuilder, builtin,
};
use minsharp::parser;

fn model_of(sources: &[&str]) -> TypeSystem {
    let parsed: Vec<_> = sources.iter().map(|s| parser::parse(s)).collect();
    let units: Vec<_> = parsed.iter().map(|p| &p.content).collect();
    let mut builder = TypeSystemBuilder::from_model(&builtin::core_context());
    builder.add_source_units(&units);
    builder.finish()
}

#[test]
fn partial_declarations_merge_into_one_type() {
    let model = model_of(&[
        "namespace App { partial class Widget { public int First; } }",
        "namespace App { partial class Widget { public int Second; } }",
    ]);
    let app = model.lookup_namespace("App").unwrap();
    let widget = model.find_type(app, "Widget", 0).unwrap();

    assert_eq!(model.namespace(app).types().count(), 1);
    assert!(!model.members_named(widget, "First", false).is_empty());
    assert!(!model.members_named(widget, "Second", false).is_empty());
}

#[test]
fn repeated_partial_base_is_recorded_once() {
    let model = model_of(&[
        "namespace App {\n\
             class Base { }\n\
             partial class Widget : Base { }\n\
             partial class Widget : Base { }\n\
         }\n",
    ]);
    let app = model.lookup_namespace("App").unwrap();
    let widget = model.find_type(app, "Widget", 0).unwrap();
    assert_eq!(model.type_def(widget).bases.len(), 1);
}

#[test]
fn redeclared_member_hides_the_inherited_one() {
    let model = model_of(&[
        "namespace App {\n\
             class Base { public int Value; }\n\
             class Derived : Base { public int Value; }\n\
         }\n",
    ]);
    let app = model.lookup_namespace("App").unwrap();
    let derived = model.find_type(app, "Derived", 0).unwrap();

    let named = model.members_named(derived, "Value", true);
    assert_eq!(named.len(), 1);
    assert_eq!(model.member(named[0]).declaring_type, derived);
}

#[test]
fn unresolvable_base_degrades_to_an_error_type() {
    let model = model_of(&["class Widget : Missing { public int Value; }"]);
    let widget = model.find_type(model.root(), "Widget", 0).unwrap();

    let def = model.type_def(widget);
    assert_eq!(def.bases, vec![TypeRef::Error]);
    // The type itself is intact and still inherits from object.
    assert!(!model.members_named(widget, "ToString", true).is_empty());
}

#[test]
fn base_in_a_parent_namespace_resolves_through_the_chain() {
    // The declaring unit's namespace chain, innermost first, is the context
    // bases are resolved against.
    let model = model_of(&[
        "namespace Outer {\n\
             class Helper { public int Value; }\n\
             namespace Inner { class Leaf : Helper { } }\n\
         }\n",
    ]);
    let inner = model.lookup_namespace("Outer.Inner").unwrap();
    let leaf = model.find_type(inner, "Leaf", 0).unwrap();
    assert!(!model.members_named(leaf, "Value", true).is_empty());
}

#[test]
fn nested_namespaces_build_the_full_chain() {
    let model = model_of(&[
        "namespace Outer {\n\
             namespace Inner { class Leaf { } }\n\
         }\n",
    ]);
    let inner = model.lookup_namespace("Outer.Inner").unwrap();
    assert!(model.find_type(inner, "Leaf", 0).is_some());
    assert_eq!(model.namespace_qualified_name(inner), "Outer.Inner");
}

#[test]
fn dotted_namespace_declarations_share_structure() {
    let model = model_of(&[
        "namespace A.B { class One { } }",
        "namespace A { namespace B { class Two { } } }",
    ]);
    let ab = model.lookup_namespace("A.B").unwrap();
    assert!(model.find_type(ab, "One", 0).is_some());
    assert!(model.find_type(ab, "Two", 0).is_some());
}

#[test]
fn generic_arity_distinguishes_types() {
    let model = model_of(&[
        "namespace App {\n\
             class Holder { }\n\
             class Holder<T> { public T Item; }\n\
         }\n",
    ]);
    let app = model.lookup_namespace("App").unwrap();
    let plain = model.find_type(app, "Holder", 0).unwrap();
    let generic = model.find_type(app, "Holder", 1).unwrap();
    assert_ne!(plain, generic);
    assert_eq!(model.type_def(generic).type_params.len(), 1);

    // A field typed by the class's own parameter refers back to it.
    let item = model.members_named(generic, "Item", false)[0];
    assert!(matches!(
        model.member(item).ty,
        TypeRef::TypeParam { owner, index: 0, .. } if owner == generic
    ));
}

#[test]
fn enum_variants_are_static_fields_of_the_enum() {
    let model = model_of(&["enum Color { Red, Green }"]);
    let color = model.find_type(model.root(), "Color", 0).unwrap();
    assert_eq!(model.type_def(color).kind, TypeKind::Enum);

    let red = model.members_named(color, "Red", false);
    assert_eq!(red.len(), 1);
    let member = model.member(red[0]);
    assert!(member.is_static);
    assert_eq!(member.ty, TypeRef::named(color));
}

#[test]
fn extension_methods_are_flagged_during_collection() {
    let model = model_of(&[
        "static class Ext {\n\
             public static int Twice(this int x) { return x + x; }\n\
             public static int Plain(int x) { return x; }\n\
         }\n",
    ]);
    let ext = model.find_type(model.root(), "Ext", 0).unwrap();
    assert!(model.type_def(ext).is_static);

    let twice = model.members_named(ext, "Twice", false)[0];
    let plain = model.members_named(ext, "Plain", false)[0];
    assert!(model.member(twice).is_extension);
    assert!(!model.member(plain).is_extension);
}

#[test]
fn metadata_api_rejects_invalid_names() {
    let mut builder = TypeSystemBuilder::new();
    let root = builder.root();
    let err = builder.declare_type(root, "not a name", TypeKind::Class);
    assert!(matches!(err, Err(ModelError::InvalidName(_))));

    let err = builder.declare_namespace("System..Text");
    assert!(matches!(err, Err(ModelError::InvalidNamespaceName(_))));
}

#[test]
fn extending_a_context_preserves_its_contents() {
    let base = builtin::core_context();
    let model = {
        let mut builder = TypeSystemBuilder::from_model(&base);
        let parsed = parser::parse("namespace App { class Widget { } }");
        builder.add_source_unit(&parsed.content);
        builder.finish()
    };

    let system = model.lookup_namespace("System").unwrap();
    assert!(model.find_type(system, "Console", 0).is_some());
    let app = model.lookup_namespace("App").unwrap();
    assert!(model.find_type(app, "Widget", 0).is_some());
    assert!(model.generation() > base.generation());
}
