//! Logos-based lexer for the C# subset.

use super::keywords;
use crate::base::{TextRange, TextSize};
use logos::Logos;

/// A token with its kind, text, and source range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// Fully classified token kinds, keywords included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    IntLit,
    LongLit,
    FloatLit,
    StringLit,
    CharLit,

    // Keywords (see `keywords::keyword_kind`)
    KwUsing,
    KwNamespace,
    KwClass,
    KwStruct,
    KwInterface,
    KwEnum,
    KwStatic,
    KwPublic,
    KwPrivate,
    KwProtected,
    KwInternal,
    KwVoid,
    KwVar,
    KwNew,
    KwThis,
    KwReturn,
    KwIf,
    KwElse,
    KwWhile,
    KwFor,
    KwForeach,
    KwIn,
    KwTry,
    KwCatch,
    KwFinally,
    KwRef,
    KwOut,
    KwParams,
    KwEvent,
    KwTrue,
    KwFalse,
    KwNull,
    KwBool,
    KwByte,
    KwSbyte,
    KwShort,
    KwUshort,
    KwInt,
    KwUint,
    KwLong,
    KwUlong,
    KwFloat,
    KwDouble,
    KwChar,
    KwString,
    KwObject,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Eq,
    EqEq,
    BangEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AmpAmp,
    PipePipe,
    Question,
    Colon,

    Error,
}

/// Lexer wrapping the Logos-generated tokenizer. Trivia (whitespace,
/// comments) is dropped; ranges of the remaining tokens still refer to the
/// original text.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let logos_token = self.inner.next()?;
            let text = self.inner.slice();
            let span = self.inner.span();
            let range = TextRange::new(
                TextSize::new(span.start as u32),
                TextSize::new(span.end as u32),
            );

            let kind = match logos_token {
                Ok(LogosToken::Whitespace)
                | Ok(LogosToken::LineComment)
                | Ok(LogosToken::BlockComment) => continue,
                Ok(LogosToken::Ident) => {
                    keywords::keyword_kind(text).unwrap_or(TokenKind::Ident)
                }
                Ok(t) => t.kind(),
                Err(()) => TokenKind::Error,
            };

            return Some(Token { kind, text, range });
        }
    }
}

/// Tokenize an entire string, trivia excluded.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Raw Logos token enum. Keywords are not distinguished here; the lexer maps
/// identifiers through the keyword table afterwards.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum LogosToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    // `@` prefix makes a verbatim identifier that is never a keyword.
    #[regex(r"@?[\p{L}_][\p{L}\p{N}_]*")]
    Ident,

    #[regex(r"[0-9]+[lL]")]
    LongLit,

    #[regex(r"[0-9]+")]
    IntLit,

    #[regex(r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?[fFdD]?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fFdD]?")]
    FloatLit,

    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLit,

    #[regex(r"'([^'\\]|\\.)'")]
    CharLit,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
}

impl LogosToken {
    fn kind(self) -> TokenKind {
        match self {
            LogosToken::Whitespace
            | LogosToken::LineComment
            | LogosToken::BlockComment
            | LogosToken::Ident => unreachable!("handled by the lexer loop"),
            LogosToken::IntLit => TokenKind::IntLit,
            LogosToken::LongLit => TokenKind::LongLit,
            LogosToken::FloatLit => TokenKind::FloatLit,
            LogosToken::StringLit => TokenKind::StringLit,
            LogosToken::CharLit => TokenKind::CharLit,
            LogosToken::LParen => TokenKind::LParen,
            LogosToken::RParen => TokenKind::RParen,
            LogosToken::LBrace => TokenKind::LBrace,
            LogosToken::RBrace => TokenKind::RBrace,
            LogosToken::LBracket => TokenKind::LBracket,
            LogosToken::RBracket => TokenKind::RBracket,
            LogosToken::Semicolon => TokenKind::Semicolon,
            LogosToken::Comma => TokenKind::Comma,
            LogosToken::Dot => TokenKind::Dot,
            LogosToken::EqEq => TokenKind::EqEq,
            LogosToken::BangEq => TokenKind::BangEq,
            LogosToken::LtEq => TokenKind::LtEq,
            LogosToken::GtEq => TokenKind::GtEq,
            LogosToken::AmpAmp => TokenKind::AmpAmp,
            LogosToken::PipePipe => TokenKind::PipePipe,
            LogosToken::Eq => TokenKind::Eq,
            LogosToken::Lt => TokenKind::Lt,
            LogosToken::Gt => TokenKind::Gt,
            LogosToken::Plus => TokenKind::Plus,
            LogosToken::Minus => TokenKind::Minus,
            LogosToken::Star => TokenKind::Star,
            LogosToken::Slash => TokenKind::Slash,
            LogosToken::Percent => TokenKind::Percent,
            LogosToken::Bang => TokenKind::Bang,
            LogosToken::Question => TokenKind::Question,
            LogosToken::Colon => TokenKind::Colon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("using System;"),
            vec![TokenKind::KwUsing, TokenKind::Ident, TokenKind::Semicolon]
        );
        // Verbatim identifiers are never keywords.
        assert_eq!(kinds("@class"), vec![TokenKind::Ident]);
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(kinds("1"), vec![TokenKind::IntLit]);
        assert_eq!(kinds("1L"), vec![TokenKind::LongLit]);
        assert_eq!(kinds("1.5"), vec![TokenKind::FloatLit]);
        assert_eq!(kinds("2e10"), vec![TokenKind::FloatLit]);
    }

    #[test]
    fn trivia_is_dropped_but_ranges_survive() {
        let tokens = tokenize("  x /* c */ y");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "x");
        assert_eq!(u32::from(tokens[0].range.start()), 2);
        assert_eq!(tokens[1].text, "y");
        assert_eq!(u32::from(tokens[1].range.start()), 12);
    }

    #[test]
    fn compound_punctuation() {
        assert_eq!(
            kinds("a <= b == c"),
            vec![
                TokenKind::Ident,
                TokenKind::LtEq,
                TokenKind::Ident,
                TokenKind::EqEq,
                TokenKind::Ident
            ]
        );
    }
}
