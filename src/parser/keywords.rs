//! Keyword table.
//!
//! The lexer produces raw identifiers and maps them through
//! [`keyword_kind`]; keeping the table here means there is exactly one place
//! that decides what is reserved.

use super::TokenKind;

/// Map an identifier spelling to its keyword token, if it is reserved.
pub fn keyword_kind(text: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let kind = match text {
        "using" => KwUsing,
        "namespace" => KwNamespace,
        "class" => KwClass,
        "struct" => KwStruct,
        "interface" => KwInterface,
        "enum" => KwEnum,
        "static" => KwStatic,
        "public" => KwPublic,
        "private" => KwPrivate,
        "protected" => KwProtected,
        "internal" => KwInternal,
        "void" => KwVoid,
        "var" => KwVar,
        "new" => KwNew,
        "this" => KwThis,
        "return" => KwReturn,
        "if" => KwIf,
        "else" => KwElse,
        "while" => KwWhile,
        "for" => KwFor,
        "foreach" => KwForeach,
        "in" => KwIn,
        "try" => KwTry,
        "catch" => KwCatch,
        "finally" => KwFinally,
        "ref" => KwRef,
        "out" => KwOut,
        "params" => KwParams,
        "event" => KwEvent,
        "true" => KwTrue,
        "false" => KwFalse,
        "null" => KwNull,
        "bool" => KwBool,
        "byte" => KwByte,
        "sbyte" => KwSbyte,
        "short" => KwShort,
        "ushort" => KwUshort,
        "int" => KwInt,
        "uint" => KwUint,
        "long" => KwLong,
        "ulong" => KwUlong,
        "float" => KwFloat,
        "double" => KwDouble,
        "char" => KwChar,
        "string" => KwString,
        "object" => KwObject,
        _ => return None,
    };
    Some(kind)
}

/// Whether `text` is a reserved word.
pub fn is_keyword(text: &str) -> bool {
    keyword_kind(text).is_some()
}
