//! A canned `System` context covering the types the resolver needs most:
//! the primitives, `Console`, `Exception`, and a small generic collection.
//!
//! Real consumers supply richer metadata through [`TypeSystemBuilder`]; this
//! context exists so a resolver is usable out of the box and so tests have a
//! stable corlib to resolve against.

use super::{Param, TypeKind, TypeRef, TypeSystem, TypeSystemBuilder};

/// Build the default context. Each call produces a fresh model with its own
/// generation.
pub fn core_context() -> TypeSystem {
    // All names below are literal valid identifiers.
    build().expect("builtin context names are valid")
}

fn build() -> Result<TypeSystem, super::ModelError> {
    let mut b = TypeSystemBuilder::new();
    let system = b.declare_namespace("System")?;

    let object = b.declare_type(system, "Object", TypeKind::Class)?;
    let object_ref = TypeRef::named(object);
    let value_type = b.declare_type(system, "ValueType", TypeKind::Class)?;
    b.set_base(value_type, object_ref.clone());

    let string = b.declare_type(system, "String", TypeKind::Class)?;
    let string_ref = TypeRef::named(string);

    let boolean = b.declare_type(system, "Boolean", TypeKind::Struct)?;
    let bool_ref = TypeRef::named(boolean);
    let char_ty = b.declare_type(system, "Char", TypeKind::Struct)?;
    let char_ref = TypeRef::named(char_ty);
    b.declare_type(system, "SByte", TypeKind::Struct)?;
    b.declare_type(system, "Byte", TypeKind::Struct)?;
    b.declare_type(system, "Int16", TypeKind::Struct)?;
    b.declare_type(system, "UInt16", TypeKind::Struct)?;
    let int32 = b.declare_type(system, "Int32", TypeKind::Struct)?;
    let int_ref = TypeRef::named(int32);
    b.declare_type(system, "UInt32", TypeKind::Struct)?;
    let int64 = b.declare_type(system, "Int64", TypeKind::Struct)?;
    let long_ref = TypeRef::named(int64);
    b.declare_type(system, "UInt64", TypeKind::Struct)?;
    b.declare_type(system, "Single", TypeKind::Struct)?;
    let double = b.declare_type(system, "Double", TypeKind::Struct)?;
    let double_ref = TypeRef::named(double);

    b.add_method(
        object,
        "ToString",
        string_ref.clone(),
        Vec::new(),
        false,
    )?;
    b.add_method(
        object,
        "Equals",
        bool_ref.clone(),
        vec![Param::new("obj", object_ref.clone())],
        false,
    )?;
    b.add_method(object, "GetHashCode", int_ref.clone(), Vec::new(), false)?;

    b.add_property(string, "Length", int_ref.clone(), false)?;
    b.add_method(
        string,
        "Substring",
        string_ref.clone(),
        vec![Param::new("startIndex", int_ref.clone())],
        false,
    )?;

    let exception = b.declare_type(system, "Exception", TypeKind::Class)?;
    let exception_ref = TypeRef::named(exception);
    b.add_property(exception, "Message", string_ref.clone(), false)?;
    b.add_ctor(exception, Vec::new())?;
    b.add_ctor(exception, vec![Param::new("message", string_ref.clone())])?;

    let argument_exception = b.declare_type(system, "ArgumentException", TypeKind::Class)?;
    b.set_base(argument_exception, exception_ref.clone());
    b.add_ctor(argument_exception, Vec::new())?;
    b.add_ctor(
        argument_exception,
        vec![Param::new("message", string_ref.clone())],
    )?;

    let event_args = b.declare_type(system, "EventArgs", TypeKind::Class)?;
    let event_args_ref = TypeRef::named(event_args);

    let event_handler = b.declare_type(system, "EventHandler", TypeKind::Delegate)?;
    b.add_method(
        event_handler,
        "Invoke",
        TypeRef::Void,
        vec![
            Param::new("sender", object_ref.clone()),
            Param::new("e", event_args_ref),
        ],
        false,
    )?;

    let console = b.declare_type(system, "Console", TypeKind::Class)?;
    b.set_static(console);
    for param_ty in [
        None,
        Some(bool_ref.clone()),
        Some(char_ref),
        Some(int_ref.clone()),
        Some(long_ref),
        Some(double_ref.clone()),
        Some(string_ref.clone()),
        Some(object_ref.clone()),
    ] {
        let params = match param_ty {
            None => Vec::new(),
            Some(ty) => vec![Param::new("value", ty)],
        };
        b.add_method(console, "WriteLine", TypeRef::Void, params, true)?;
    }

    let environment = b.declare_type(system, "Environment", TypeKind::Class)?;
    b.set_static(environment);
    b.add_property(environment, "TickCount", int_ref.clone(), true)?;

    let math = b.declare_type(system, "Math", TypeKind::Class)?;
    b.set_static(math);
    b.add_method(
        math,
        "Max",
        int_ref.clone(),
        vec![
            Param::new("val1", int_ref.clone()),
            Param::new("val2", int_ref.clone()),
        ],
        true,
    )?;
    b.add_method(
        math,
        "Max",
        double_ref.clone(),
        vec![
            Param::new("val1", double_ref.clone()),
            Param::new("val2", double_ref),
        ],
        true,
    )?;

    let generic = b.declare_namespace("System.Collections.Generic")?;
    let list = b.declare_generic_type(generic, "List", TypeKind::Class, &["T"])?;
    let elem = TypeRef::TypeParam {
        owner: list,
        index: 0,
        name: "T".into(),
    };
    b.add_ctor(list, Vec::new())?;
    b.add_property(list, "Count", int_ref, false)?;
    b.add_method(
        list,
        "Add",
        TypeRef::Void,
        vec![Param::new("item", elem)],
        false,
    )?;

    Ok(b.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_wired() {
        let model = core_context();
        let prims = model.primitives();
        assert!(prims.object.is_some());
        assert!(prims.int32.is_some());
        assert!(prims.double.is_some());
        assert_eq!(
            model.type_qualified_name(prims.int32.unwrap()),
            "System.Int32"
        );
    }

    #[test]
    fn console_has_a_writeline_overload_set() {
        let model = core_context();
        let system = model.lookup_namespace("System").unwrap();
        let console = model.find_type(system, "Console", 0).unwrap();
        let overloads = model.members_named(console, "WriteLine", true);
        assert_eq!(overloads.len(), 8);
        assert!(overloads.iter().all(|&m| model.member(m).is_static));
    }

    #[test]
    fn each_context_gets_a_fresh_generation() {
        let first = core_context();
        let second = core_context();
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn list_member_types_substitute() {
        let model = core_context();
        let generic = model.lookup_namespace("System.Collections.Generic").unwrap();
        let list = model.find_type(generic, "List", 1).unwrap();
        let add = model.members_named(list, "Add", false);
        assert_eq!(add.len(), 1);
        let string_ref = TypeRef::named(model.primitives().string.unwrap());
        let param_ty = model.member(add[0]).params[0]
            .ty
            .substitute(list, &[string_ref.clone()]);
        assert_eq!(param_ty, string_ref);
    }
}
