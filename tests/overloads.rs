//! Overload selection through the full pipeline: conversion ranking,
//! optional parameters, `params` expansion, and failure modes as data.

mod helpers;

use helpers::resolve_fixture;
use minsharp::model::Conversion;
use minsharp::resolve::{ErrorKind, Mismatch};
use rstest::rstest;

#[rstest]
#[case("1", "System.Int32")]
#[case("1L", "System.Int64")]
#[case("1.5", "System.Double")]
#[case("'c'", "System.Char")]
#[case("true", "System.Boolean")]
#[case("\"hi\"", "System.String")]
fn writeline_picks_the_exact_overload(#[case] arg: &str, #[case] expected: &str) {
    let marked = format!(
        "using System;\n\
         class A {{ void M() {{ Console.Write$Line({arg}); }} }}\n"
    );
    let (model, result) = resolve_fixture(&marked);
    let invocation = result.unwrap().into_invocation().unwrap();
    let chosen = model.member(invocation.member);
    assert_eq!(model.display_type(&chosen.params[0].ty), expected);
    assert_eq!(invocation.conversions, vec![Conversion::Identity]);
}

#[test]
fn widening_applies_when_no_exact_overload_exists() {
    // Max has (int,int) and (double,double); (int,double) needs one
    // widening.
    let (model, result) = resolve_fixture(
        "using System;\n\
         class A { void M() { var x = Math.M$ax(1, 2.0); } }\n",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    let chosen = model.member(invocation.member);
    assert_eq!(model.display_type(&chosen.params[0].ty), "System.Double");
    assert_eq!(
        invocation.conversions,
        vec![Conversion::NumericWidening, Conversion::Identity]
    );
}

#[test]
fn symmetric_candidates_are_ambiguous() {
    let (_, result) = resolve_fixture(
        "class A {\n\
             static void F(int a, double b) { }\n\
             static void F(double a, int b) { }\n\
             void M() { F$(1, 2); }\n\
         }\n",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Ambiguous);
    assert_eq!(error.candidates.len(), 2);
    assert!(error.candidates.iter().all(|c| c.mismatch.is_none()));
}

#[test]
fn params_array_expands_for_extra_arguments() {
    let (_, result) = resolve_fixture(
        "class A {\n\
             static void F(params int[] xs) { }\n\
             void M() { F$(1, 2, 3); }\n\
         }\n",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    assert_eq!(invocation.conversions.len(), 3);
}

#[test]
fn normal_form_wins_over_expansion() {
    let (model, result) = resolve_fixture(
        "class A {\n\
             static void F(int x) { }\n\
             static void F(params int[] xs) { }\n\
             void M() { F$(1); }\n\
         }\n",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    let chosen = model.member(invocation.member);
    assert_eq!(model.display_type(&chosen.params[0].ty), "System.Int32");
}

#[test]
fn optional_tail_parameters_may_be_omitted() {
    let (_, result) = resolve_fixture(
        "class A {\n\
             static void F(int a, int b = 0) { }\n\
             void M() { F$(1); }\n\
         }\n",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    assert_eq!(invocation.conversions, vec![Conversion::Identity]);
}

#[test]
fn fewer_defaulted_parameters_break_ties() {
    let (model, result) = resolve_fixture(
        "class A {\n\
             static void F(int a) { }\n\
             static void F(int a, int b = 0) { }\n\
             void M() { F$(1); }\n\
         }\n",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    assert_eq!(model.member(invocation.member).params.len(), 1);
}

#[test]
fn no_applicable_overload_reports_every_candidate() {
    let (_, result) = resolve_fixture(
        "using System;\n\
         class A { void M() { Math.M$ax(\"a\", \"b\"); } }\n",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Unresolved);
    assert_eq!(error.candidates.len(), 2);
    assert!(error.candidates.iter().all(|c| matches!(
        c.mismatch,
        Some(Mismatch::Argument { index: 0, .. })
    )));
}

#[test]
fn arity_mismatch_is_reported_as_such() {
    let (_, result) = resolve_fixture(
        "class A {\n\
             static void F(int a) { }\n\
             void M() { F$(1, 2, 3); }\n\
         }\n",
    );
    let error = result.unwrap().into_error().unwrap();
    assert_eq!(error.kind, ErrorKind::Unresolved);
    assert!(matches!(
        error.candidates[0].mismatch,
        Some(Mismatch::Arity {
            expected: 1,
            got: 3
        })
    ));
}

#[test]
fn constructor_overloads_resolve_like_methods() {
    let (model, result) = resolve_fixture(
        "using System;\n\
         class A { void M() { var e = new Exce$ption(\"boom\"); } }\n",
    );
    let invocation = result.unwrap().into_invocation().unwrap();
    assert_eq!(model.display_type(&invocation.ty), "System.Exception");
    let chosen = model.member(invocation.member);
    assert_eq!(chosen.params.len(), 1);
}
