//! End-to-end resolution at a cursor offset, including the behaviors the
//! original location-resolution API pins down: keywords resolve to nothing,
//! using names to namespaces, catch variables to typed locals, callee names
//! to their chosen overload, and `var` to the inferred type.

mod helpers;

use helpers::{fixture, resolve_fixture, type_name};
use minsharp::model::builtin;
use minsharp::resolve::{LocalKind, ResolveResult};
use minsharp::resolve_at_location;

#[test]
fn using_keyword_is_not_a_symbol() {
    let (_, result) = resolve_fixture("usi$ng System;");
    assert_eq!(result, None);
}

#[test]
fn using_name_resolves_to_the_namespace() {
    let (_, result) = resolve_fixture("using $System;");
    let ns = result.unwrap().into_namespace().unwrap();
    assert_eq!(ns.name, "System");
}

#[test]
fn using_name_prefix_resolves_to_the_prefix_namespace() {
    let (_, result) = resolve_fixture("using System.Coll$ections.Generic;");
    let ns = result.unwrap().into_namespace().unwrap();
    assert_eq!(ns.name, "System.Collections");
}

#[test]
fn catch_variable_is_a_typed_local() {
    let (model, result) = resolve_fixture(
        "using System;\n\
         class A {\n\
             void M() {\n\
                 try { } catch (Exception e$x) { }\n\
             }\n\
         }\n",
    );
    let result = result.unwrap();
    let local = result.clone().into_local().unwrap();
    assert_eq!(local.binding.name, *"ex");
    assert_eq!(local.binding.kind, LocalKind::CatchVariable);
    assert_eq!(type_name(&model, &result), "System.Exception");
}

#[test]
fn callee_name_resolves_the_invocation() {
    let (model, result) = resolve_fixture(
        "using System;\n\
         public class A {\n\
             public void M() {\n\
                 Console.W$riteLine(1);\n\
             }\n\
         }\n",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    let chosen = model.member(invocation.member);
    assert_eq!(chosen.name, *"WriteLine");
    assert_eq!(
        model.display_type(&chosen.params[0].ty),
        "System.Int32",
        "the literal 1 must pick the Int32 overload"
    );
}

#[test]
fn var_keyword_resolves_to_the_inferred_type() {
    let (model, result) = resolve_fixture(
        "using System;\n\
         class A {\n\
             void M() {\n\
                 v$ar x = Environment.TickCount;\n\
             }\n\
         }\n",
    );
    let result = result.unwrap();
    assert!(matches!(result, ResolveResult::Type(_)));
    assert_eq!(type_name(&model, &result), "System.Int32");
}

#[test]
fn var_without_initializer_is_a_type_error() {
    let (_, result) = resolve_fixture(
        "class A { void M() { v$ar x; } }",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, minsharp::resolve::ErrorKind::TypeError);
}

#[test]
fn caret_just_past_an_identifier_still_addresses_it() {
    // An editor caret sits between characters; right after the last
    // character of `x` it must still resolve the local.
    let (model, result) = resolve_fixture(
        "using System;\n\
         class A {\n\
             void M() {\n\
                 int total = 1;\n\
                 Console.WriteLine(total$);\n\
             }\n\
         }\n",
    );
    let result = result.unwrap();
    let local = result.clone().into_local().unwrap();
    assert_eq!(local.binding.name, *"total");
    assert_eq!(type_name(&model, &result), "System.Int32");
}

#[test]
fn caret_at_a_token_boundary_prefers_the_ending_identifier() {
    // `e` ends exactly where `.` begins; the caret between them addresses
    // `e`, not the member access.
    let (_, result) = resolve_fixture(
        "using System;\n\
         class A { void M(Exception e) { var m = e$.Message; } }\n",
    );
    let local = result.unwrap().into_local().unwrap();
    assert_eq!(local.binding.name, *"e");
    assert_eq!(local.binding.kind, LocalKind::Parameter);
}

#[test]
fn punctuation_and_whitespace_resolve_to_nothing() {
    for marked in [
        "class A $ { }",
        "class A {$ }",
        "class A { void M() { int x = 1 +$ 2; } }",
    ] {
        let (_, result) = resolve_fixture(marked);
        assert_eq!(result, None, "fixture: {marked}");
    }
}

#[test]
fn resolution_is_idempotent() {
    let marked = "using System;\n\
                  class A { void M() { Console.Write$Line(\"hi\"); } }\n";
    let (source, offset) = fixture(marked);
    let context = builtin::core_context();
    let first = resolve_at_location(&source, offset, &context);
    let second = resolve_at_location(&source, offset, &context);
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn context_is_not_mutated_by_resolution() {
    let context = builtin::core_context();
    let generation = context.generation();
    let (source, offset) = fixture("using $System;");
    let _ = resolve_at_location(&source, offset, &context);
    assert_eq!(context.generation(), generation);
}

#[test]
fn malformed_source_still_answers() {
    // The statement after the garbage still resolves from the recovered
    // tree.
    let (model, result) = resolve_fixture(
        "using System;\n\
         class A {\n\
             void M() {\n\
                 int y = ;\n\
                 Console.W$riteLine(true);\n\
             }\n\
         }\n",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    assert_eq!(
        model.display_type(&model.member(invocation.member).params[0].ty),
        "System.Boolean"
    );
}

#[test]
fn offset_past_the_end_resolves_to_nothing() {
    let context = builtin::core_context();
    let result = resolve_at_location("class A { }", minsharp::TextSize::new(500), &context);
    assert_eq!(result, None);
}
