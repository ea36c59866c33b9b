//! Implicit conversion classification.
//!
//! Overload resolution only needs the implicit conversions and a total order
//! on how "good" each one is: identity beats numeric widening beats
//! reference conversion beats boxing.

use super::{TypeId, TypeKind, TypeRef, TypeSystem};

/// An implicit conversion, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Conversion {
    Identity,
    NumericWidening,
    Reference,
    Boxing,
}

impl Conversion {
    /// Lower is better.
    pub fn rank(self) -> u8 {
        match self {
            Conversion::Identity => 0,
            Conversion::NumericWidening => 1,
            Conversion::Reference => 2,
            Conversion::Boxing => 3,
        }
    }
}

/// Classify the implicit conversion from `from` to `to`, or `None` when no
/// implicit conversion exists.
pub fn classify_conversion(
    model: &TypeSystem,
    from: &TypeRef,
    to: &TypeRef,
) -> Option<Conversion> {
    if from == to {
        return Some(Conversion::Identity);
    }

    // An error type converts to anything; resolution on malformed input
    // should not cascade secondary errors.
    if from.is_error() || to.is_error() {
        return Some(Conversion::Identity);
    }

    // `null` converts to any reference type.
    if matches!(from, TypeRef::Null) {
        return is_reference_type(model, to).then_some(Conversion::Reference);
    }

    if let (Some(from_num), Some(to_num)) = (numeric_kind(model, from), numeric_kind(model, to)) {
        if widens_to(from_num, to_num) {
            return Some(Conversion::NumericWidening);
        }
    }

    let (to_id, _) = to.as_named()?;

    match from {
        TypeRef::Named { id: from_id, args } => {
            let from_def = model.type_def(*from_id);
            if from_def.is_value_type() {
                // Boxing: value type to object/ValueType/implemented interface.
                let prims = model.primitives();
                if Some(to_id) == prims.object || Some(to_id) == prims.value_type {
                    return Some(Conversion::Boxing);
                }
                if model.type_def(to_id).kind == TypeKind::Interface
                    && model.all_interfaces(*from_id).contains(&to_id)
                {
                    return Some(Conversion::Boxing);
                }
                return None;
            }
            // Reference conversion: derived to base or to implemented
            // interface. Constructed generics convert only when the open
            // definition relates and arguments are untouched (identity was
            // handled above), so `args` is checked for the exact-definition
            // case only.
            if *from_id == to_id && !args.is_empty() {
                return None; // same definition, different arguments
            }
            model
                .is_subtype(*from_id, to_id)
                .then_some(Conversion::Reference)
        }
        // Arrays convert to object, nothing else in this model.
        TypeRef::Array(_) => {
            (Some(to_id) == model.primitives().object).then_some(Conversion::Reference)
        }
        _ => None,
    }
}

fn is_reference_type(model: &TypeSystem, ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Named { id, .. } => !model.type_def(*id).is_value_type(),
        TypeRef::Array(_) | TypeRef::Pointer(_) => true,
        _ => false,
    }
}

/// Numeric classification for the widening table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumericKind {
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Char,
    Single,
    Double,
}

pub(crate) fn numeric_kind(model: &TypeSystem, ty: &TypeRef) -> Option<NumericKind> {
    let (id, args) = ty.as_named()?;
    if !args.is_empty() {
        return None;
    }
    numeric_kind_of_id(model, id)
}

pub(crate) fn numeric_kind_of_id(model: &TypeSystem, id: TypeId) -> Option<NumericKind> {
    let prims = model.primitives();
    let entries = [
        (prims.sbyte, NumericKind::SByte),
        (prims.byte, NumericKind::Byte),
        (prims.int16, NumericKind::Int16),
        (prims.uint16, NumericKind::UInt16),
        (prims.int32, NumericKind::Int32),
        (prims.uint32, NumericKind::UInt32),
        (prims.int64, NumericKind::Int64),
        (prims.uint64, NumericKind::UInt64),
        (prims.char, NumericKind::Char),
        (prims.single, NumericKind::Single),
        (prims.double, NumericKind::Double),
    ];
    entries
        .into_iter()
        .find(|(prim, _)| *prim == Some(id))
        .map(|(_, kind)| kind)
}

/// The C# implicit numeric widening table.
pub(crate) fn widens_to(from: NumericKind, to: NumericKind) -> bool {
    use NumericKind::*;
    let targets: &[NumericKind] = match from {
        SByte => &[Int16, Int32, Int64, Single, Double],
        Byte => &[Int16, UInt16, Int32, UInt32, Int64, UInt64, Single, Double],
        Int16 => &[Int32, Int64, Single, Double],
        UInt16 => &[Int32, UInt32, Int64, UInt64, Single, Double],
        Int32 => &[Int64, Single, Double],
        UInt32 => &[Int64, UInt64, Single, Double],
        Int64 => &[Single, Double],
        UInt64 => &[Single, Double],
        Char => &[UInt16, Int32, UInt32, Int64, UInt64, Single, Double],
        Single => &[Double],
        Double => &[],
    };
    targets.contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builtin::core_context;

    fn prim(model: &TypeSystem, pick: fn(&crate::model::Primitives) -> Option<TypeId>) -> TypeRef {
        TypeRef::named(pick(model.primitives()).expect("primitive missing from core context"))
    }

    #[test]
    fn identity_beats_everything() {
        let model = core_context();
        let int = prim(&model, |p| p.int32);
        assert_eq!(
            classify_conversion(&model, &int, &int),
            Some(Conversion::Identity)
        );
    }

    #[test]
    fn int_widens_but_never_narrows() {
        let model = core_context();
        let int = prim(&model, |p| p.int32);
        let long = prim(&model, |p| p.int64);
        let double = prim(&model, |p| p.double);
        assert_eq!(
            classify_conversion(&model, &int, &long),
            Some(Conversion::NumericWidening)
        );
        assert_eq!(
            classify_conversion(&model, &int, &double),
            Some(Conversion::NumericWidening)
        );
        assert_eq!(classify_conversion(&model, &long, &int), None);
        assert_eq!(classify_conversion(&model, &double, &int), None);
    }

    #[test]
    fn boxing_and_reference() {
        let model = core_context();
        let int = prim(&model, |p| p.int32);
        let object = prim(&model, |p| p.object);
        let string = prim(&model, |p| p.string);
        assert_eq!(
            classify_conversion(&model, &int, &object),
            Some(Conversion::Boxing)
        );
        assert_eq!(
            classify_conversion(&model, &string, &object),
            Some(Conversion::Reference)
        );
        assert_eq!(classify_conversion(&model, &object, &string), None);
    }

    #[test]
    fn null_converts_to_reference_types_only() {
        let model = core_context();
        let int = prim(&model, |p| p.int32);
        let string = prim(&model, |p| p.string);
        assert_eq!(
            classify_conversion(&model, &TypeRef::Null, &string),
            Some(Conversion::Reference)
        );
        assert_eq!(classify_conversion(&model, &TypeRef::Null, &int), None);
    }
}
