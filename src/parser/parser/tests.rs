use super::parse;
use crate::syntax::ast::*;

fn parse_ok(source: &str) -> CompilationUnit {
    let result = parse(source);
    assert!(result.is_ok(), "parse errors: {:?}", result.errors);
    result.content
}

fn first_method(unit: &CompilationUnit) -> &MethodDecl {
    fn find(members: &[NamespaceMember]) -> Option<&MethodDecl> {
        for member in members {
            match member {
                NamespaceMember::Type(ty) => {
                    for m in &ty.members {
                        if let MemberDecl::Method(m) = m {
                            return Some(m);
                        }
                    }
                }
                NamespaceMember::Namespace(ns) => {
                    if let Some(m) = find(&ns.members) {
                        return Some(m);
                    }
                }
            }
        }
        None
    }
    find(&unit.members).expect("no method in fixture")
}

#[test]
fn using_directives() {
    let unit = parse_ok("using System; using IO = System.IO;");
    assert_eq!(unit.usings.len(), 2);
    assert_eq!(unit.usings[0].name.dotted(), "System");
    assert!(unit.usings[0].alias.is_none());
    let aliased = &unit.usings[1];
    assert_eq!(aliased.alias.as_ref().unwrap().name, "IO");
    assert_eq!(aliased.name.dotted(), "System.IO");
}

#[test]
fn nested_namespaces_and_types() {
    let unit = parse_ok(
        "namespace A.B { using System; class C { } namespace Inner { struct S { } } }",
    );
    let NamespaceMember::Namespace(ns) = &unit.members[0] else {
        panic!("expected namespace");
    };
    assert_eq!(ns.name.dotted(), "A.B");
    assert_eq!(ns.usings.len(), 1);
    assert_eq!(ns.members.len(), 2);
}

#[test]
fn class_members() {
    let unit = parse_ok(
        r#"class A {
            int count;
            public string Name { get; set; }
            public A(int x) { }
            public static int Add(int a, int b = 1) { return a + b; }
            public event System.EventHandler Changed;
        }"#,
    );
    let NamespaceMember::Type(ty) = &unit.members[0] else {
        panic!("expected type");
    };
    assert_eq!(ty.members.len(), 5);
    assert!(matches!(ty.members[0], MemberDecl::Field(_)));
    assert!(matches!(ty.members[1], MemberDecl::Property(_)));
    assert!(matches!(ty.members[2], MemberDecl::Ctor(_)));
    let MemberDecl::Method(method) = &ty.members[3] else {
        panic!("expected method");
    };
    assert!(method.is_static);
    assert_eq!(method.params.len(), 2);
    assert!(method.params[1].default.is_some());
    assert!(matches!(ty.members[4], MemberDecl::Event(_)));
}

#[test]
fn extension_method_this_modifier() {
    let unit = parse_ok("static class E { public static int Twice(this int x) { return x + x; } }");
    let method = first_method(&unit);
    assert_eq!(method.params[0].modifier, ParamModifier::This);
}

#[test]
fn statement_forms() {
    let unit = parse_ok(
        r#"class A { void M() {
            int x = 1, y;
            var z = x;
            if (x == 1) { } else { }
            while (x < 10) { x = x + 1; }
            for (int i = 0; i < 10; i = i + 1) { }
            foreach (var item in z) { }
            try { } catch (System.Exception ex) { } finally { }
            return;
        }}"#,
    );
    let body = first_method(&unit).body.as_ref().unwrap();
    assert_eq!(body.statements.len(), 8);
    let Stmt::Local(decl) = &body.statements[0] else {
        panic!("expected local declaration");
    };
    assert_eq!(decl.declarators.len(), 2);
    let Stmt::Local(var_decl) = &body.statements[1] else {
        panic!("expected var declaration");
    };
    assert!(var_decl.ty.is_var());
    let Stmt::Try(try_stmt) = &body.statements[6] else {
        panic!("expected try statement");
    };
    assert_eq!(try_stmt.catches.len(), 1);
    assert_eq!(
        try_stmt.catches[0].variable.as_ref().unwrap().name,
        "ex"
    );
    assert!(try_stmt.finally.is_some());
}

#[test]
fn member_call_is_not_a_declaration() {
    let unit = parse_ok(r#"class A { void M() { Console.WriteLine(1); } }"#);
    let body = first_method(&unit).body.as_ref().unwrap();
    let Stmt::Expr(stmt) = &body.statements[0] else {
        panic!("expected expression statement");
    };
    let Expr::Invoke(invoke) = &stmt.expr else {
        panic!("expected invocation");
    };
    assert_eq!(invoke.args.len(), 1);
    let Expr::Member(access) = invoke.target.as_ref() else {
        panic!("expected member access target");
    };
    assert_eq!(access.name.name, "WriteLine");
}

#[test]
fn expression_precedence() {
    let unit = parse_ok("class A { void M() { var x = 1 + 2 * 3 == 7 && true; } }");
    let body = first_method(&unit).body.as_ref().unwrap();
    let Stmt::Local(decl) = &body.statements[0] else {
        panic!("expected declaration");
    };
    let Expr::Binary(and) = decl.declarators[0].initializer.as_ref().unwrap() else {
        panic!("expected binary root");
    };
    assert_eq!(and.op, BinaryOp::And);
    let Expr::Binary(eq) = and.lhs.as_ref() else {
        panic!("expected comparison on the left");
    };
    assert_eq!(eq.op, BinaryOp::Eq);
}

#[test]
fn generic_type_syntax() {
    let unit = parse_ok("class A { System.Collections.Generic.List<int> items; }");
    let NamespaceMember::Type(ty) = &unit.members[0] else {
        panic!("expected type");
    };
    let MemberDecl::Field(field) = &ty.members[0] else {
        panic!("expected field");
    };
    let TypeSyntax::Named(named) = &field.ty else {
        panic!("expected named type");
    };
    assert_eq!(named.args.len(), 1);
    assert_eq!(named.name.segments.len(), 4);
}

#[test]
fn less_than_is_not_type_arguments() {
    let unit = parse_ok("class A { void M(int a, int b) { var r = a < b; } }");
    let body = first_method(&unit).body.as_ref().unwrap();
    let Stmt::Local(decl) = &body.statements[0] else {
        panic!("expected declaration");
    };
    let Expr::Binary(cmp) = decl.declarators[0].initializer.as_ref().unwrap() else {
        panic!("expected comparison");
    };
    assert_eq!(cmp.op, BinaryOp::Lt);
}

#[test]
fn recovers_from_malformed_statement() {
    let result = parse("class A { void M() { int x = ; Console.WriteLine(x); } }");
    assert!(!result.is_ok());
    // The tree is still usable past the error.
    let body = first_method(&result.content).body.as_ref().unwrap();
    assert!(
        body.statements
            .iter()
            .any(|s| matches!(s, Stmt::Expr(_))),
        "statements after the error should survive: {:?}",
        body.statements
    );
}

#[test]
fn node_ranges_match_source() {
    let source = "using System;";
    let unit = parse_ok(source);
    let name = &unit.usings[0].name;
    let range = name.range;
    assert_eq!(&source[range], "System");
}
