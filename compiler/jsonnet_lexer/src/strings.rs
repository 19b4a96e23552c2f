//! Callbacks for tokens whose extent logos cannot describe with a regex:
//! strings, text blocks and block comments. Each scans `lex.remainder()`
//! by hand and bumps the lexer past what it consumed.

use crate::raw::RawToken;
use crate::LexErrorKind;
use logos::Lexer;
use memchr::memmem;
use std::str::CharIndices;

pub(crate) fn number(lex: &mut Lexer<'_, RawToken>) -> Result<f64, LexErrorKind> {
    let slice = lex.slice();
    let bytes = slice.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit() {
        return Err(LexErrorKind::LeadingZero);
    }
    let (mantissa, exponent) = match slice.find(['e', 'E']) {
        Some(at) => (&slice[..at], Some(&slice[at + 1..])),
        None => (slice, None),
    };
    if mantissa.ends_with('.') {
        return Err(LexErrorKind::MissingFraction);
    }
    if let Some(exponent) = exponent {
        if !exponent.ends_with(|c: char| c.is_ascii_digit()) {
            return Err(LexErrorKind::MissingExponent);
        }
    }
    slice.parse::<f64>().map_err(|_| LexErrorKind::MissingExponent)
}

pub(crate) fn block_comment(lex: &mut Lexer<'_, RawToken>) -> Result<(), LexErrorKind> {
    match memmem::find(lex.remainder().as_bytes(), b"*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => Err(LexErrorKind::UnterminatedComment),
    }
}

/// `"..."` or `'...'` with JSON-style escapes.
pub(crate) fn quoted(lex: &mut Lexer<'_, RawToken>, quote: char) -> Result<String, LexErrorKind> {
    let rest = lex.remainder();
    let mut out = String::new();
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        if c == quote {
            lex.bump(i + 1);
            return Ok(out);
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, esc)) = chars.next() else { break };
        match esc {
            '"' | '\'' | '\\' | '/' => out.push(esc),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let decoded = unicode_escape(&mut chars);
                match decoded {
                    Ok(ch) => out.push(ch),
                    Err(err) => {
                        lex.bump(i);
                        return Err(err);
                    }
                }
            }
            other => {
                lex.bump(i);
                return Err(LexErrorKind::InvalidEscape(other));
            }
        }
    }
    lex.bump(rest.len());
    Err(LexErrorKind::UnterminatedString)
}

fn hex4(chars: &mut CharIndices<'_>) -> Result<u32, LexErrorKind> {
    let mut value = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|(_, c)| c.to_digit(16))
            .ok_or(LexErrorKind::InvalidUnicodeEscape)?;
        value = value * 16 + digit;
    }
    Ok(value)
}

/// Decode the digits after `\u`, pairing UTF-16 surrogates. A lone
/// surrogate decodes to U+FFFD.
fn unicode_escape(chars: &mut CharIndices<'_>) -> Result<char, LexErrorKind> {
    let high = hex4(chars)?;
    if !(0xD800..0xDC00).contains(&high) {
        return Ok(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    let mut lookahead = chars.clone();
    if let (Some((_, '\\')), Some((_, 'u'))) = (lookahead.next(), lookahead.next()) {
        let low = hex4(&mut lookahead)?;
        if (0xDC00..0xE000).contains(&low) {
            *chars = lookahead;
            let cp = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            return Ok(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
    }
    Ok(char::REPLACEMENT_CHARACTER)
}

/// `@"..."` or `@'...'`: no escapes except a doubled quote.
pub(crate) fn verbatim(lex: &mut Lexer<'_, RawToken>, quote: char) -> Result<String, LexErrorKind> {
    let rest = lex.remainder();
    let mut out = String::new();
    let mut chars = rest.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != quote {
            out.push(c);
            continue;
        }
        if matches!(chars.peek(), Some((_, next)) if *next == quote) {
            chars.next();
            out.push(quote);
            continue;
        }
        lex.bump(i + 1);
        return Ok(out);
    }
    lex.bump(rest.len());
    Err(LexErrorKind::UnterminatedString)
}

/// `|||` text block. The first line fixes the indentation; the block ends
/// at the first line indented less that starts with `|||`. `|||-` drops the
/// final newline.
pub(crate) fn text_block(lex: &mut Lexer<'_, RawToken>) -> Result<String, LexErrorKind> {
    let rest = lex.remainder();
    let bytes = rest.as_bytes();
    let mut i = 0;

    let chomp = bytes.first() == Some(&b'-');
    if chomp {
        i += 1;
    }
    while matches!(bytes.get(i), Some(b' ' | b'\t' | b'\r')) {
        i += 1;
    }
    if bytes.get(i) != Some(&b'\n') {
        return Err(LexErrorKind::TextBlockNewline);
    }
    i += 1;

    let mut text = String::new();
    while bytes.get(i) == Some(&b'\n') {
        text.push('\n');
        i += 1;
    }
    let indent_len = bytes[i..]
        .iter()
        .take_while(|b| matches!(b, b' ' | b'\t'))
        .count();
    if indent_len == 0 {
        return Err(LexErrorKind::TextBlockIndent);
    }
    let indent = &bytes[i..i + indent_len];

    loop {
        i += indent_len;
        let Some(nl) = memchr::memchr(b'\n', &bytes[i..]) else {
            lex.bump(rest.len());
            return Err(LexErrorKind::TextBlockEof);
        };
        text.push_str(&rest[i..=i + nl]);
        i += nl + 1;
        while bytes.get(i) == Some(&b'\n') {
            text.push('\n');
            i += 1;
        }
        if bytes[i..].starts_with(indent) {
            continue;
        }
        while matches!(bytes.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        if i >= bytes.len() {
            lex.bump(rest.len());
            return Err(LexErrorKind::TextBlockEof);
        }
        if !bytes[i..].starts_with(b"|||") {
            lex.bump(i);
            return Err(LexErrorKind::TextBlockUnterminated);
        }
        i += 3;
        break;
    }

    if chomp && text.ends_with('\n') {
        text.pop();
    }
    lex.bump(i);
    Ok(text)
}
