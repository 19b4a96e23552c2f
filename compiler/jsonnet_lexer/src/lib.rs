//! Lexer for Jsonnet built on `logos`.
//!
//! - Identifiers are interned; keywords get their own token kinds
//! - String literals (`"..."`, `'...'`, `@"..."`, `@'...'`, `|||` text
//!   blocks) are decoded into their final text
//! - Comments (`//`, `#`, `/* */`) and whitespace are dropped
//! - Operators are matched longest-first over the fixed operator set
//!
//! Lexing stops at the first error; there is no recovery.

mod error;
mod raw;
mod strings;

#[cfg(test)]
mod tests;

pub use error::{LexError, LexErrorKind};

use jsonnet_ir::{Span, StrStyle, StringInterner, Token, TokenKind, TokenList};
use logos::Logos;
use raw::RawToken;

/// Tokenize `source`. The returned list always ends with [`TokenKind::Eof`].
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, LexError> {
    let mut tokens = TokenList::new();
    let mut raw = RawToken::lexer(source);

    while let Some(result) = raw.next() {
        let span = Span::from_range(raw.span());
        let kind = match result {
            Ok(tok) => match convert_token(tok, raw.slice(), interner) {
                Some(kind) => kind,
                None => continue,
            },
            Err(err) => {
                let kind = err.into_kind(raw.slice());
                tracing::debug!(?kind, ?span, "lexical error");
                return Err(LexError { kind, span });
            }
        };
        tokens.push(Token::new(kind, span));
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    tokens.push(Token::new(TokenKind::Eof, Span::point(end)));
    tracing::trace!(count = tokens.len(), "lexed");
    Ok(tokens)
}

/// Map a raw token to its final kind; comments map to `None`.
fn convert_token(raw: RawToken, slice: &str, interner: &StringInterner) -> Option<TokenKind> {
    Some(match raw {
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),
        RawToken::Number(n) => TokenKind::Number(n),
        RawToken::DoubleStr(s) => TokenKind::Str(s, StrStyle::Double),
        RawToken::SingleStr(s) => TokenKind::Str(s, StrStyle::Single),
        RawToken::VerbatimDouble(s) => TokenKind::Str(s, StrStyle::VerbatimDouble),
        RawToken::VerbatimSingle(s) => TokenKind::Str(s, StrStyle::VerbatimSingle),
        RawToken::TextBlock(s) => TokenKind::Str(s, StrStyle::TextBlock),

        RawToken::Assert => TokenKind::Assert,
        RawToken::Else => TokenKind::Else,
        RawToken::Error => TokenKind::Error,
        RawToken::False => TokenKind::False,
        RawToken::For => TokenKind::For,
        RawToken::Function => TokenKind::Function,
        RawToken::If => TokenKind::If,
        RawToken::Import => TokenKind::Import,
        RawToken::ImportStr => TokenKind::ImportStr,
        RawToken::ImportBin => TokenKind::ImportBin,
        RawToken::In => TokenKind::In,
        RawToken::Local => TokenKind::Local,
        RawToken::Null => TokenKind::Null,
        RawToken::TailStrict => TokenKind::TailStrict,
        RawToken::Then => TokenKind::Then,
        RawToken::SelfKw => TokenKind::SelfKw,
        RawToken::Super => TokenKind::Super,
        RawToken::True => TokenKind::True,

        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Dollar => TokenKind::Dollar,
        RawToken::Colon => TokenKind::Colon,
        RawToken::ColonColon => TokenKind::ColonColon,
        RawToken::ColonColonColon => TokenKind::ColonColonColon,
        RawToken::PlusColon => TokenKind::PlusColon,
        RawToken::PlusColonColon => TokenKind::PlusColonColon,
        RawToken::PlusColonColonColon => TokenKind::PlusColonColonColon,

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Assign => TokenKind::Eq,

        RawToken::LineComment | RawToken::BlockComment => return None,
    })
}
