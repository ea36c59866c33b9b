//! Dotted-name resolution: namespace chains, static versus instance
//! members, alias directives, colliding imports, extension methods, and
//! delegate-typed members.

mod helpers;

use helpers::{resolve_fixture, type_name};
use minsharp::resolve::{ErrorKind, ResolveResult};

#[test]
fn qualified_name_walks_namespaces_then_types() {
    let (_, result) = resolve_fixture(
        "class A { void M() { System.Con$sole.WriteLine(1); } }",
    );
    let result = result.unwrap();
    assert!(matches!(result, ResolveResult::Type(_)));
}

#[test]
fn namespace_segment_resolves_to_the_namespace() {
    let (_, result) = resolve_fixture(
        "class A { void M() { Sys$tem.Console.WriteLine(1); } }",
    );
    let ns = result.unwrap().into_namespace().unwrap();
    assert_eq!(ns.name, "System");
}

#[test]
fn fully_qualified_invocation_needs_no_using() {
    let (model, result) = resolve_fixture(
        "class A { void M() { System.Console.Write$Line(\"hi\"); } }",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    assert_eq!(
        model.display_type(&model.member(invocation.member).params[0].ty),
        "System.String"
    );
}

#[test]
fn own_field_resolves_by_bare_name() {
    let (model, result) = resolve_fixture(
        "class A {\n\
             int count;\n\
             void M() { var x = cou$nt; }\n\
         }\n",
    );
    let result = result.unwrap();
    assert!(matches!(result, ResolveResult::Member(_)));
    assert_eq!(type_name(&model, &result), "System.Int32");
}

#[test]
fn static_context_cannot_see_instance_members() {
    let (_, result) = resolve_fixture(
        "class A {\n\
             int count;\n\
             static void M() { var x = cou$nt; }\n\
         }\n",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Unresolved);
}

#[test]
fn instance_member_through_a_local() {
    let (model, result) = resolve_fixture(
        "using System;\n\
         class A {\n\
             void M(Exception e) { var m = e.Mess$age; }\n\
         }\n",
    );
    let result = result.unwrap();
    assert!(matches!(result, ResolveResult::Member(_)));
    assert_eq!(type_name(&model, &result), "System.String");
}

#[test]
fn inherited_members_resolve_through_the_base_chain() {
    let (model, result) = resolve_fixture(
        "using System;\n\
         class A {\n\
             void M(ArgumentException e) { var m = e.Mess$age; }\n\
         }\n",
    );
    let result = result.unwrap();
    assert_eq!(type_name(&model, &result), "System.String");
}

#[test]
fn derived_member_hides_the_base_one() {
    let (model, result) = resolve_fixture(
        "class Base { public string Name; }\n\
         class Derived : Base { public int Name; }\n\
         class A { void M(Derived d) { var n = d.Na$me; } }\n",
    );
    let result = result.unwrap();
    assert_eq!(type_name(&model, &result), "System.Int32");
}

#[test]
fn alias_directive_renames_a_namespace() {
    let (_, result) = resolve_fixture(
        "using Sys = System;\n\
         class A { void M() { Sys.Con$sole.WriteLine(1); } }\n",
    );
    let result = result.unwrap();
    assert!(matches!(result, ResolveResult::Type(_)));
}

#[test]
fn colliding_imports_are_ambiguous() {
    let (_, result) = resolve_fixture(
        "using First;\n\
         using Second;\n\
         namespace First { class Dup { } }\n\
         namespace Second { class Dup { } }\n\
         namespace App {\n\
             class A { void M() { Du$p d = null; } }\n\
         }\n",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Ambiguous);
}

#[test]
fn enclosing_namespace_type_beats_imports() {
    let (model, result) = resolve_fixture(
        "using First;\n\
         namespace First { class Dup { } }\n\
         namespace App {\n\
             class Dup { }\n\
             class A { void M() { Du$p d = null; } }\n\
         }\n",
    );
    let result = result.unwrap();
    let ty = result.clone().into_type().unwrap();
    assert_eq!(model.display_type(&ty.ty), "App.Dup");
}

#[test]
fn extension_method_applies_to_a_compatible_receiver() {
    let (model, result) = resolve_fixture(
        "static class Ext {\n\
             public static int Twice(this int x) { return x + x; }\n\
         }\n\
         class A {\n\
             void M() {\n\
                 int n = 3;\n\
                 var d = n.Tw$ice();\n\
             }\n\
         }\n",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    assert!(model.member(invocation.member).is_extension);
    assert_eq!(model.display_type(&invocation.ty), "System.Int32");
}

#[test]
fn extension_method_is_invisible_on_an_incompatible_receiver() {
    let (_, result) = resolve_fixture(
        "static class Ext {\n\
             public static int Twice(this string s) { return 2; }\n\
         }\n\
         class A {\n\
             void M() {\n\
                 int n = 3;\n\
                 var d = n.Tw$ice();\n\
             }\n\
         }\n",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Unresolved);
}

#[test]
fn delegate_typed_field_invokes_through_invoke() {
    let (model, result) = resolve_fixture(
        "using System;\n\
         class A {\n\
             EventHandler handler;\n\
             void M() { hand$ler(null, null); }\n\
         }\n",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    let chosen = model.member(invocation.member);
    assert_eq!(chosen.name, *"Invoke");
    assert_eq!(invocation.ty, minsharp::model::TypeRef::Void);
}

#[test]
fn nested_type_resolves_through_its_container() {
    let (model, result) = resolve_fixture(
        "class Outer {\n\
             public class Inner { public static int Level; }\n\
         }\n\
         class A { void M() { var x = Outer.Inner.Lev$el; } }\n",
    );
    let result = result.unwrap();
    assert!(matches!(result, ResolveResult::Member(_)));
    assert_eq!(type_name(&model, &result), "System.Int32");
}

#[test]
fn generic_member_types_substitute_receiver_arguments() {
    let (model, result) = resolve_fixture(
        "using System.Collections.Generic;\n\
         class A {\n\
             void M(List<string> items) { var n = items.Cou$nt; }\n\
         }\n",
    );
    let result = result.unwrap();
    assert_eq!(type_name(&model, &result), "System.Int32");

    let (model, result) = resolve_fixture(
        "using System.Collections.Generic;\n\
         class A {\n\
             void M(List<string> items) { items.A$dd(\"x\"); }\n\
         }\n",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    assert_eq!(
        invocation.conversions,
        vec![minsharp::model::Conversion::Identity],
        "the parameter type must substitute to System.String"
    );
}

#[test]
fn private_member_is_invisible_outside_its_type() {
    let (_, result) = resolve_fixture(
        "class B { private int secret; }\n\
         class A { void M(B b) { var s = b.sec$ret; } }\n",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Unresolved);
}

#[test]
fn protected_member_is_visible_in_a_derived_type() {
    let (model, result) = resolve_fixture(
        "class Base { protected int total; }\n\
         class Derived : Base { void M() { var t = tot$al; } }\n",
    );
    let result = result.unwrap();
    assert!(matches!(result, ResolveResult::Member(_)));
    assert_eq!(type_name(&model, &result), "System.Int32");
}

#[test]
fn protected_member_is_invisible_through_an_unrelated_receiver() {
    let (_, result) = resolve_fixture(
        "class Base { protected int total; }\n\
         class A { void M(Base b) { var t = b.tot$al; } }\n",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Unresolved);
}

#[test]
fn method_group_without_invocation_is_ambiguous() {
    let (_, result) = resolve_fixture(
        "using System;\n\
         class A { void M() { var w = Console.Write$Line; } }\n",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Ambiguous);
    assert_eq!(error.candidates.len(), 8);
}

#[test]
fn unknown_member_of_a_known_namespace_is_unresolved() {
    let (_, result) = resolve_fixture(
        "class A { void M() { System.Mis$sing.F(); } }",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Unresolved);
}
