//! Local visibility rules: declaration order, block confinement of catch
//! and foreach variables, shadowing, and the first-wins duplicate policy.

mod helpers;

use helpers::{resolve_fixture, type_name};
use minsharp::resolve::{ErrorKind, LocalKind, ResolveResult};

#[test]
fn local_is_visible_after_its_declaration() {
    let (model, result) = resolve_fixture(
        "using System;\n\
         class A {\n\
             void M() {\n\
                 int x = 1;\n\
                 Console.WriteLine(x$);\n\
             }\n\
         }\n",
    );
    let result = result.unwrap();
    let local = result.clone().into_local().unwrap();
    assert_eq!(local.binding.kind, LocalKind::Local);
    assert_eq!(type_name(&model, &result), "System.Int32");
}

#[test]
fn local_is_invisible_before_its_declaration() {
    let (_, result) = resolve_fixture(
        "using System;\n\
         class A {\n\
             void M() {\n\
                 Console.WriteLine(x$);\n\
                 int x = 1;\n\
             }\n\
         }\n",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Unresolved);
}

#[test]
fn parameter_is_visible_in_the_body() {
    let (model, result) = resolve_fixture(
        "class A { void M(string name) { var n = na$me; } }",
    );
    let result = result.unwrap();
    let local = result.clone().into_local().unwrap();
    assert_eq!(local.binding.kind, LocalKind::Parameter);
    assert_eq!(type_name(&model, &result), "System.String");
}

#[test]
fn parameter_name_at_its_declaration_resolves_to_itself() {
    let (model, result) = resolve_fixture("class A { void M(int cou$nt) { } }");
    let result = result.unwrap();
    let local = result.clone().into_local().unwrap();
    assert_eq!(local.binding.kind, LocalKind::Parameter);
    assert_eq!(type_name(&model, &result), "System.Int32");
}

#[test]
fn catch_variable_is_confined_to_its_clause() {
    let (_, result) = resolve_fixture(
        "using System;\n\
         class A {\n\
             void M() {\n\
                 try { } catch (Exception ex) { }\n\
                 Console.WriteLine(e$x);\n\
             }\n\
         }\n",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Unresolved);
}

#[test]
fn catch_variable_is_visible_inside_its_clause() {
    let (model, result) = resolve_fixture(
        "using System;\n\
         class A {\n\
             void M() {\n\
                 try { } catch (Exception ex) {\n\
                     Console.WriteLine(e$x.Message);\n\
                 }\n\
             }\n\
         }\n",
    );
    let result = result.unwrap();
    let local = result.clone().into_local().unwrap();
    assert_eq!(local.binding.kind, LocalKind::CatchVariable);
    assert_eq!(type_name(&model, &result), "System.Exception");
}

#[test]
fn foreach_variable_lives_in_the_body_only() {
    let inside = "using System;\n\
                  class A {\n\
                      void M(string[] args) {\n\
                          foreach (var arg in args) {\n\
                              Console.WriteLine(ar$g);\n\
                          }\n\
                      }\n\
                  }\n";
    let (model, result) = resolve_fixture(inside);
    let result = result.unwrap();
    let local = result.clone().into_local().unwrap();
    assert_eq!(local.binding.kind, LocalKind::ForeachVariable);
    assert_eq!(type_name(&model, &result), "System.String");

    let after = "using System;\n\
                 class A {\n\
                     void M(string[] args) {\n\
                         foreach (var arg in args) { }\n\
                         Console.WriteLine(ar$g);\n\
                     }\n\
                 }\n";
    let (_, result) = resolve_fixture(after);
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Unresolved);
}

#[test]
fn foreach_variable_is_not_visible_in_the_iterable() {
    let (_, result) = resolve_fixture(
        "class A { void M(string[] args) { foreach (var x in x$) { } } }",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Unresolved);
}

#[test]
fn inner_block_shadows_the_outer_binding() {
    let (model, result) = resolve_fixture(
        "class A {\n\
             void M(int x) {\n\
                 {\n\
                     string x = \"s\";\n\
                     var y = x$;\n\
                 }\n\
             }\n\
         }\n",
    );
    let result = result.unwrap();
    assert_eq!(type_name(&model, &result), "System.String");
}

#[test]
fn duplicate_declaration_in_one_block_keeps_the_first() {
    let (model, result) = resolve_fixture(
        "class A {\n\
             void M() {\n\
                 int x = 1;\n\
                 string x = \"s\";\n\
                 var y = x$;\n\
             }\n\
         }\n",
    );
    let result = result.unwrap();
    assert_eq!(type_name(&model, &result), "System.Int32");
}

#[test]
fn declarator_name_resolves_to_its_own_binding() {
    let (model, result) = resolve_fixture("class A { void M() { int co$unt = 1; } }");
    let result = result.unwrap();
    let local = result.clone().into_local().unwrap();
    assert_eq!(local.binding.name, *"count");
    assert_eq!(type_name(&model, &result), "System.Int32");
}

#[test]
fn earlier_declarator_is_visible_in_a_later_initializer() {
    let (model, result) = resolve_fixture(
        "class A { void M() { int a = 1, b = a$; } }",
    );
    let result = result.unwrap();
    assert!(matches!(result, ResolveResult::Local(_)));
    assert_eq!(type_name(&model, &result), "System.Int32");
}

#[test]
fn for_initializer_local_is_visible_in_the_loop() {
    let (model, result) = resolve_fixture(
        "class A { void M() { for (int i = 0; i$ < 10; i = i + 1) { } } }",
    );
    let result = result.unwrap();
    assert!(matches!(result, ResolveResult::Local(_)));
    assert_eq!(type_name(&model, &result), "System.Int32");
}
