#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use jsonnet_ir::{Name, StrStyle, StringInterner, TokenKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    let interner = StringInterner::new();
    lex(src, &interner).unwrap().kinds()
}

fn lex_err(src: &str) -> LexErrorKind {
    let interner = StringInterner::new();
    lex(src, &interner).unwrap_err().kind
}

fn string(s: &str, style: StrStyle) -> TokenKind {
    TokenKind::Str(s.to_string(), style)
}

#[test]
fn test_lex_keywords_and_idents() {
    let interner = StringInterner::new();
    let tokens = lex("local x = self; std", &interner).unwrap();
    let x = interner.intern("x");
    assert_eq!(
        tokens.kinds(),
        vec![
            TokenKind::Local,
            TokenKind::Ident(x),
            TokenKind::Eq,
            TokenKind::SelfKw,
            TokenKind::Semicolon,
            TokenKind::Ident(Name::STD),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let interner = StringInterner::new();
    let tokens = lex("locals iff", &interner).unwrap();
    assert_eq!(
        tokens.kinds(),
        vec![
            TokenKind::Ident(interner.intern("locals")),
            TokenKind::Ident(interner.intern("iff")),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_lex_numbers() {
    assert_eq!(
        kinds("0 12 3.25 1e3 2.5E-2"),
        vec![
            TokenKind::Number(0.0),
            TokenKind::Number(12.0),
            TokenKind::Number(3.25),
            TokenKind::Number(1000.0),
            TokenKind::Number(0.025),
            TokenKind::Eof,
        ]
    );
    assert_eq!(lex_err("012"), LexErrorKind::LeadingZero);
    assert_eq!(lex_err("1."), LexErrorKind::MissingFraction);
    assert_eq!(lex_err("1.e3"), LexErrorKind::MissingFraction);
    assert_eq!(lex_err("1e"), LexErrorKind::MissingExponent);
    assert_eq!(lex_err("2.5e+"), LexErrorKind::MissingExponent);
    assert_eq!(lex_err("1E-"), LexErrorKind::MissingExponent);
}

#[test]
fn test_operator_maximal_munch() {
    assert_eq!(
        kinds("a::: b+:: c +::: d<=e==f!=g<<h>>i&&j||k"),
        {
            let i = StringInterner::new();
            let id = |s: &str| TokenKind::Ident(i.intern(s));
            vec![
                id("a"),
                TokenKind::ColonColonColon,
                id("b"),
                TokenKind::PlusColonColon,
                id("c"),
                TokenKind::PlusColonColonColon,
                id("d"),
                TokenKind::LtEq,
                id("e"),
                TokenKind::EqEq,
                id("f"),
                TokenKind::NotEq,
                id("g"),
                TokenKind::Shl,
                id("h"),
                TokenKind::Shr,
                id("i"),
                TokenKind::AmpAmp,
                id("j"),
                TokenKind::PipePipe,
                id("k"),
                TokenKind::Eof,
            ]
        }
    );
    // Adjacent unary operators stay separate.
    assert_eq!(
        kinds("1==-1"),
        vec![
            TokenKind::Number(1.0),
            TokenKind::EqEq,
            TokenKind::Minus,
            TokenKind::Number(1.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_comments_are_dropped() {
    assert_eq!(
        kinds("1 // one\n# two\n/* three\n */ 2"),
        vec![TokenKind::Number(1.0), TokenKind::Number(2.0), TokenKind::Eof]
    );
    assert_eq!(lex_err("1 /* open"), LexErrorKind::UnterminatedComment);
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        kinds(r#""a\"b\n\t\\\/" 'it\'s' "\u00e9\ud83d\ude00""#),
        vec![
            string("a\"b\n\t\\/", StrStyle::Double),
            string("it's", StrStyle::Single),
            string("é😀", StrStyle::Double),
            TokenKind::Eof,
        ]
    );
    assert_eq!(kinds(r#""\ud800""#)[0], string("\u{FFFD}", StrStyle::Double));
    assert_eq!(lex_err(r#""\q""#), LexErrorKind::InvalidEscape('q'));
    assert_eq!(lex_err(r#""\u12""#), LexErrorKind::InvalidUnicodeEscape);
    assert_eq!(lex_err("\"abc"), LexErrorKind::UnterminatedString);
}

#[test]
fn test_strings_may_span_lines() {
    assert_eq!(
        kinds("\"a\nb\""),
        vec![string("a\nb", StrStyle::Double), TokenKind::Eof]
    );
}

#[test]
fn test_verbatim_strings() {
    assert_eq!(
        kinds(r#"@"c:\path ""q""" @'it''s'"#),
        vec![
            string(r#"c:\path "q""#, StrStyle::VerbatimDouble),
            string("it's", StrStyle::VerbatimSingle),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_text_block() {
    let src = "|||\n  first\n    indented\n\n  last\n|||";
    assert_eq!(
        kinds(src),
        vec![
            string("first\n  indented\n\nlast\n", StrStyle::TextBlock),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_text_block_chomped() {
    let src = "x: |||-\n    a\n    b\n  |||,";
    let interner = StringInterner::new();
    let tokens = lex(src, &interner).unwrap().kinds();
    assert_eq!(tokens[2], string("a\nb", StrStyle::TextBlock));
    assert_eq!(tokens[3], TokenKind::Comma);
}

#[test]
fn test_text_block_errors() {
    assert_eq!(lex_err("||| x\n  a\n|||"), LexErrorKind::TextBlockNewline);
    assert_eq!(lex_err("|||\nno indent\n|||"), LexErrorKind::TextBlockIndent);
    assert_eq!(lex_err("|||\n  a\n b"), LexErrorKind::TextBlockUnterminated);
    assert_eq!(lex_err("|||\n  a\n"), LexErrorKind::TextBlockEof);
}

#[test]
fn test_unexpected_character() {
    let interner = StringInterner::new();
    let err = lex("1 + `", &interner).unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnexpectedChar('`'));
    assert_eq!(err.span.start, 4);
    assert_eq!(err.code(), jsonnet_diagnostic::ErrorCode::E0002);
}

#[test]
fn test_spans_and_eof() {
    let interner = StringInterner::new();
    let tokens = lex("  ab + 1", &interner).unwrap();
    let spans: Vec<(u32, u32)> = tokens.iter().map(|t| (t.span.start, t.span.end)).collect();
    assert_eq!(spans, vec![(2, 4), (5, 6), (7, 8), (8, 8)]);
}

proptest! {
    #[test]
    fn prop_integers_round_trip(n in 0u32..1_000_000) {
        let toks = kinds(&n.to_string());
        prop_assert_eq!(toks, vec![TokenKind::Number(f64::from(n)), TokenKind::Eof]);
    }

    #[test]
    fn prop_double_quoted_plain_text(s in "[a-zA-Z0-9 ,.:;!?]{0,40}") {
        let toks = kinds(&format!("\"{s}\""));
        prop_assert_eq!(toks, vec![string(&s, StrStyle::Double), TokenKind::Eof]);
    }
}
