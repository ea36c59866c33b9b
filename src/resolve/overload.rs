//! Overload resolution.
//!
//! Applicability admits optional-parameter tails and `params` expansion;
//! betterness is a pairwise comparison of per-argument conversion ranks.
//! Ambiguity is an outcome, not a panic: tied candidates are handed back to
//! the caller as data.

use tracing::trace;

use crate::model::{
    Conversion, MemberId, Param, ParamMode, TypeRef, TypeSystem, classify_conversion,
};

use super::result::{Candidate, Mismatch};

#[derive(Debug)]
pub(crate) enum OverloadOutcome {
    Chosen {
        member: MemberId,
        conversions: Vec<Conversion>,
    },
    Ambiguous(Vec<MemberId>),
    NoneApplicable(Vec<Candidate>),
}

/// Pick the best candidate for the given argument types. `receiver` carries
/// the constructed receiver type so generic parameters substitute into
/// signatures before conversions are classified.
pub(crate) fn resolve_overloads(
    model: &TypeSystem,
    candidates: &[MemberId],
    receiver: Option<&TypeRef>,
    args: &[TypeRef],
) -> OverloadOutcome {
    let mut applicable: Vec<Applicable> = Vec::new();
    let mut rejected: Vec<Candidate> = Vec::new();

    for &member in candidates {
        match try_apply(model, member, receiver, args) {
            Ok(found) => applicable.push(found),
            Err(mismatch) => rejected.push(Candidate {
                member,
                mismatch: Some(mismatch),
            }),
        }
    }

    if applicable.is_empty() {
        trace!(candidates = candidates.len(), "no applicable overload");
        return OverloadOutcome::NoneApplicable(rejected);
    }

    // Keep every candidate no other candidate beats.
    let best: Vec<&Applicable> = applicable
        .iter()
        .enumerate()
        .filter(|(i, a)| {
            !applicable
                .iter()
                .enumerate()
                .any(|(j, b)| *i != j && better(b, a))
        })
        .map(|(_, a)| a)
        .collect();

    match best.as_slice() {
        [single] => OverloadOutcome::Chosen {
            member: single.member,
            conversions: single.conversions.clone(),
        },
        _ => OverloadOutcome::Ambiguous(best.iter().map(|a| a.member).collect()),
    }
}

/// Substitute the receiver's generic arguments into a member's declared or
/// return type.
pub(crate) fn substituted_type(member_ty: &TypeRef, receiver: Option<&TypeRef>) -> TypeRef {
    match receiver {
        Some(TypeRef::Named { id, args }) if !args.is_empty() => member_ty.substitute(*id, args),
        _ => member_ty.clone(),
    }
}

#[derive(Debug)]
struct Applicable {
    member: MemberId,
    conversions: Vec<Conversion>,
    expanded: bool,
    defaults_used: usize,
}

fn try_apply(
    model: &TypeSystem,
    member: MemberId,
    receiver: Option<&TypeRef>,
    args: &[TypeRef],
) -> Result<Applicable, Mismatch> {
    let params: Vec<Param> = model
        .member(member)
        .params
        .iter()
        .map(|p| Param {
            ty: substituted_type(&p.ty, receiver),
            ..p.clone()
        })
        .collect();

    let normal = try_normal_form(model, member, &params, args);
    if normal.is_ok() {
        return normal;
    }
    if let Some(expanded) = try_expanded_form(model, member, &params, args) {
        return expanded;
    }
    normal
}

fn try_normal_form(
    model: &TypeSystem,
    member: MemberId,
    params: &[Param],
    args: &[TypeRef],
) -> Result<Applicable, Mismatch> {
    if args.len() > params.len() {
        return Err(Mismatch::Arity {
            expected: params.len(),
            got: args.len(),
        });
    }
    // Every parameter beyond the arguments must carry a default.
    if !params[args.len()..].iter().all(|p| p.has_default) {
        return Err(Mismatch::Arity {
            expected: params.len(),
            got: args.len(),
        });
    }
    let conversions = convert_all(model, args, |i| &params[i].ty)?;
    Ok(Applicable {
        member,
        conversions,
        expanded: false,
        defaults_used: params.len() - args.len(),
    })
}

fn try_expanded_form(
    model: &TypeSystem,
    member: MemberId,
    params: &[Param],
    args: &[TypeRef],
) -> Option<Result<Applicable, Mismatch>> {
    let last = params.last()?;
    if last.mode != ParamMode::Params {
        return None;
    }
    let TypeRef::Array(elem) = &last.ty else {
        return None;
    };
    let fixed = params.len() - 1;
    if args.len() < fixed {
        return None;
    }
    let result = convert_all(model, args, |i| {
        if i < fixed { &params[i].ty } else { elem }
    })
    .map(|conversions| Applicable {
        member,
        conversions,
        expanded: true,
        defaults_used: 0,
    });
    Some(result)
}

fn convert_all<'p>(
    model: &TypeSystem,
    args: &[TypeRef],
    param_ty: impl Fn(usize) -> &'p TypeRef,
) -> Result<Vec<Conversion>, Mismatch> {
    let mut conversions = Vec::with_capacity(args.len());
    for (i, arg) in args.iter().enumerate() {
        let expected = param_ty(i);
        match classify_conversion(model, arg, expected) {
            Some(conversion) => conversions.push(conversion),
            None => {
                return Err(Mismatch::Argument {
                    index: i,
                    expected: expected.clone(),
                    got: arg.clone(),
                });
            }
        }
    }
    Ok(conversions)
}

/// Strict "is a better candidate than" relation.
fn better(a: &Applicable, b: &Applicable) -> bool {
    if a.expanded != b.expanded {
        return !a.expanded;
    }
    let mut strictly = false;
    for (ca, cb) in a.conversions.iter().zip(&b.conversions) {
        if ca.rank() > cb.rank() {
            return false;
        }
        if ca.rank() < cb.rank() {
            strictly = true;
        }
    }
    if strictly {
        return true;
    }
    a.defaults_used < b.defaults_used
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TypeKind, TypeSystemBuilder, builtin::core_context};

    fn int_ref(model: &TypeSystem) -> TypeRef {
        TypeRef::named(model.primitives().int32.unwrap())
    }

    #[test]
    fn exact_overload_beats_widening() {
        let model = core_context();
        let system = model.lookup_namespace("System").unwrap();
        let console = model.find_type(system, "Console", 0).unwrap();
        let candidates = model.members_named(console, "WriteLine", true);

        let outcome = resolve_overloads(&model, &candidates, None, &[int_ref(&model)]);
        let OverloadOutcome::Chosen {
            member,
            conversions,
        } = outcome
        else {
            panic!("expected a single winner");
        };
        assert_eq!(conversions, vec![Conversion::Identity]);
        assert_eq!(model.member(member).params[0].ty, int_ref(&model));
    }

    #[test]
    fn symmetric_widening_is_ambiguous() {
        let mut b = TypeSystemBuilder::from_model(&core_context());
        let ns = b.declare_namespace("App").unwrap();
        let host = b.declare_type(ns, "Host", TypeKind::Class).unwrap();
        let model_probe = b.finish();
        let int = int_ref(&model_probe);
        let double = TypeRef::named(model_probe.primitives().double.unwrap());

        let mut b = TypeSystemBuilder::from_model(&model_probe);
        b.add_method(
            host,
            "M",
            TypeRef::Void,
            vec![Param::new("a", int.clone()), Param::new("b", double.clone())],
            true,
        )
        .unwrap();
        b.add_method(
            host,
            "M",
            TypeRef::Void,
            vec![Param::new("a", double), Param::new("b", int.clone())],
            true,
        )
        .unwrap();
        let model = b.finish();

        let candidates = model.members_named(host, "M", true);
        let outcome = resolve_overloads(&model, &candidates, None, &[int.clone(), int]);
        assert!(matches!(outcome, OverloadOutcome::Ambiguous(ref tied) if tied.len() == 2));
    }

    #[test]
    fn normal_form_beats_params_expansion() {
        let mut b = TypeSystemBuilder::from_model(&core_context());
        let ns = b.declare_namespace("App").unwrap();
        let host = b.declare_type(ns, "Host", TypeKind::Class).unwrap();
        let probe = b.finish();
        let int = int_ref(&probe);

        let mut b = TypeSystemBuilder::from_model(&probe);
        b.add_method(
            host,
            "F",
            TypeRef::Void,
            vec![Param::new("x", int.clone())],
            true,
        )
        .unwrap();
        b.add_method(
            host,
            "F",
            TypeRef::Void,
            vec![
                Param::new("xs", TypeRef::Array(Box::new(int.clone())))
                    .with_mode(ParamMode::Params),
            ],
            true,
        )
        .unwrap();
        let model = b.finish();

        let candidates = model.members_named(host, "F", true);
        let outcome = resolve_overloads(&model, &candidates, None, &[int.clone()]);
        let OverloadOutcome::Chosen { member, .. } = outcome else {
            panic!("expected a single winner");
        };
        assert_eq!(model.member(member).params[0].mode, ParamMode::Value);

        // Two arguments only fit the expanded form.
        let outcome = resolve_overloads(&model, &candidates, None, &[int.clone(), int]);
        let OverloadOutcome::Chosen { member, .. } = outcome else {
            panic!("expected the params overload");
        };
        assert_eq!(model.member(member).params[0].mode, ParamMode::Params);
    }

    #[test]
    fn inapplicable_candidates_carry_their_mismatch() {
        let model = core_context();
        let system = model.lookup_namespace("System").unwrap();
        let math = model.find_type(system, "Math", 0).unwrap();
        let candidates = model.members_named(math, "Max", true);

        let string = TypeRef::named(model.primitives().string.unwrap());
        let outcome =
            resolve_overloads(&model, &candidates, None, &[string.clone(), string.clone()]);
        let OverloadOutcome::NoneApplicable(rejected) = outcome else {
            panic!("expected no applicable overload");
        };
        assert_eq!(rejected.len(), 2);
        assert!(rejected.iter().all(|c| matches!(
            c.mismatch,
            Some(Mismatch::Argument { index: 0, .. })
        )));
    }
}
