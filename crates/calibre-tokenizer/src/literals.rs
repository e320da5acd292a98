//! Values of literal tokens.
//!
//! The tokenizer only classifies literals; these helpers compute what a
//! literal denotes for consumers that need it (highlighters, linters). `_`
//! separators never contribute to a value.

use text_size::{TextRange, TextSize};

use crate::{SyntaxKind, TokenFlags, Tokenizer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("integer literal is too large")]
    IntOverflow,
    #[error("invalid digit `{0}` in numeric literal")]
    InvalidDigit(char),
    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(String),
    #[error("rune literal must contain exactly one character")]
    RuneLength,
    #[error("malformed literal `{0}`")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub const fn value(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hexadecimal => 16,
        }
    }

    fn from_flags(flags: TokenFlags) -> Self {
        if flags.contains(TokenFlags::HEX) {
            Self::Hexadecimal
        } else if flags.contains(TokenFlags::BIN) {
            Self::Binary
        } else if flags.contains(TokenFlags::OCT) {
            Self::Octal
        } else {
            Self::Decimal
        }
    }
}

/// Classifies `text` as a numeric literal. Returns `None` unless the whole
/// text lexes as a single, well-formed number.
pub fn classify_number(text: &str) -> Option<(SyntaxKind, Radix)> {
    let mut tokenizer = Tokenizer::new(text);
    let index = tokenizer.next_token_index();
    let token = tokenizer.token(index);
    let is_number = matches!(
        token.kind,
        SyntaxKind::INT_NUMBER | SyntaxKind::FLOAT_NUMBER | SyntaxKind::IMAGINARY_NUMBER
    );
    let whole = token.range == TextRange::up_to(TextSize::of(text));
    (is_number && whole && tokenizer.errors().is_empty())
        .then(|| (token.kind, Radix::from_flags(token.flags)))
}

/// Splits an integer literal into its radix and digits, prefix removed.
fn int_parts(text: &str) -> (Radix, &str) {
    let bytes = text.as_bytes();
    match bytes {
        [b'0', b'x' | b'X', ..] => (Radix::Hexadecimal, &text[2..]),
        [b'0', b'b' | b'B', ..] => (Radix::Binary, &text[2..]),
        [b'0', b'o' | b'O', ..] => (Radix::Octal, &text[2..]),
        [b'0', _, ..] => (Radix::Octal, &text[1..]),
        _ => (Radix::Decimal, text),
    }
}

/// Value of an `INT_NUMBER` token.
pub fn int_value(text: &str) -> Result<u128, LiteralError> {
    let (radix, digits) = int_parts(text);
    let mut value: u128 = 0;
    let mut seen_digit = false;
    for c in digits.chars().filter(|&c| c != '_') {
        let digit = c.to_digit(radix.value()).ok_or(LiteralError::InvalidDigit(c))?;
        value = value
            .checked_mul(u128::from(radix.value()))
            .and_then(|value| value.checked_add(u128::from(digit)))
            .ok_or(LiteralError::IntOverflow)?;
        seen_digit = true;
    }
    if !seen_digit {
        return Err(LiteralError::Malformed(text.to_owned()));
    }
    Ok(value)
}

/// Value of a `FLOAT_NUMBER` token, decimal or hexadecimal.
pub fn float_value(text: &str) -> Result<f64, LiteralError> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return hex_float_value(text, hex);
    }

    let digits: String = text.chars().filter(|&c| c != '_').collect();
    digits.parse::<f64>().map_err(|_| LiteralError::Malformed(text.to_owned()))
}

fn hex_float_value(text: &str, hex: &str) -> Result<f64, LiteralError> {
    let malformed = || LiteralError::Malformed(text.to_owned());
    let (mantissa, exponent) = hex.split_once(['p', 'P']).ok_or_else(malformed)?;
    let (int_part, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut value = 0f64;
    let mut fraction_digits = 0i32;
    for (c, is_fraction) in int_part
        .chars()
        .map(|c| (c, false))
        .chain(fraction.chars().map(|c| (c, true)))
        .filter(|&(c, _)| c != '_')
    {
        let digit = c.to_digit(16).ok_or(LiteralError::InvalidDigit(c))?;
        value = value * 16.0 + f64::from(digit);
        fraction_digits += i32::from(is_fraction);
    }

    let exponent: String = exponent.chars().filter(|&c| c != '_').collect();
    let exponent = exponent.parse::<i32>().map_err(|_| malformed())?;
    Ok(value * 2f64.powi(exponent.saturating_sub(fraction_digits.saturating_mul(4))))
}

/// Magnitude of an `IMAGINARY_NUMBER` token.
///
/// A body made only of decimal digits is decimal even with a leading zero,
/// so `017i` is `17i`.
pub fn imaginary_value(text: &str) -> Result<f64, LiteralError> {
    let body = text.strip_suffix('i').ok_or_else(|| LiteralError::Malformed(text.to_owned()))?;
    if body.chars().all(|c| c.is_ascii_digit() || c == '_') {
        let digits: String = body.chars().filter(|&c| c != '_').collect();
        return digits.parse::<f64>().map_err(|_| LiteralError::Malformed(text.to_owned()));
    }

    match classify_number(body) {
        Some((SyntaxKind::INT_NUMBER, _)) => int_value(body).map(|value| value as f64),
        Some((SyntaxKind::FLOAT_NUMBER, _)) => float_value(body),
        _ => Err(LiteralError::Malformed(text.to_owned())),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    String,
    Rune,
}

/// Decodes one escape. `rest` starts right after the backslash; returns the
/// escape's byte length (without the backslash) and its value.
fn escape(rest: &str, quote: Quote) -> (usize, Result<char, LiteralError>) {
    let hex_run = |skip: usize, exact: Option<usize>| {
        let digits = rest[skip..].bytes().take_while(u8::is_ascii_hexdigit).count();
        let len = exact.map_or(digits, |exact| digits.min(exact));
        (skip + len, digits >= exact.unwrap_or(2))
    };
    let invalid = |len: usize| LiteralError::InvalidEscape(format!("\\{}", &rest[..len]));
    let code_point = |len: usize, skip: usize, radix: u32| {
        u32::from_str_radix(&rest[skip..len], radix)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| invalid(len))
    };

    let Some(first) = rest.chars().next() else {
        return (0, Err(LiteralError::InvalidEscape("\\".to_owned())));
    };

    match first {
        'x' => {
            let exact = (quote == Quote::Rune).then_some(2);
            let (len, ok) = hex_run(1, exact);
            (len, if ok { code_point(len, 1, 16) } else { Err(invalid(len)) })
        }
        'u' | 'U' => {
            let count = if first == 'u' { 4 } else { 8 };
            let (len, ok) = hex_run(1, Some(count));
            (len, if ok && len == count + 1 { code_point(len, 1, 16) } else { Err(invalid(len)) })
        }
        '0'..='9' => {
            let len = rest.bytes().take(3).take_while(u8::is_ascii_digit).count();
            let octal = rest[..len].bytes().all(|b| (b'0'..=b'7').contains(&b));
            let long_enough = len >= if quote == Quote::Rune { 3 } else { 2 };
            if octal && long_enough {
                (len, code_point(len, 0, 8))
            } else {
                (len, Err(invalid(len)))
            }
        }
        named => {
            let len = named.len_utf8();
            let value = match named {
                'a' => '\u{07}',
                'b' => '\u{08}',
                'f' => '\u{0C}',
                'n' => '\n',
                'r' => '\r',
                't' => '\t',
                'v' => '\u{0B}',
                '\\' | '\'' | '"' => named,
                other if quote == Quote::String => other,
                _ => return (len, Err(invalid(len))),
            };
            (len, Ok(value))
        }
    }
}

/// Walks the body of a quoted literal, yielding each decoded character with
/// the range of its source text relative to the token start.
fn decode(
    text: &str,
    delimiter: char,
    quote: Quote,
) -> Result<Vec<(TextRange, bool, Result<char, LiteralError>)>, LiteralError> {
    let body = text
        .strip_prefix(delimiter)
        .and_then(|text| text.strip_suffix(delimiter))
        .filter(|_| text.len() >= 2)
        .ok_or_else(|| LiteralError::Malformed(text.to_owned()))?;

    let mut decoded = Vec::new();
    let mut offset = 1usize;
    let mut rest = body;
    while let Some(c) = rest.chars().next() {
        let (len, is_escape, value) = if c == '\\' {
            let (len, value) = escape(&rest[1..], quote);
            (len + 1, true, value)
        } else {
            (c.len_utf8(), false, Ok(c))
        };
        let range = TextRange::at(TextSize::new(offset as u32), TextSize::new(len as u32));
        decoded.push((range, is_escape, value));
        offset += len;
        rest = &rest[len..];
    }
    Ok(decoded)
}

/// Contents of a `STRING` token with escapes resolved.
pub fn unescape_string(text: &str) -> Result<String, LiteralError> {
    decode(text, '"', Quote::String)?.into_iter().map(|(_, _, value)| value).collect()
}

/// Character denoted by a `RUNE` token.
pub fn unescape_rune(text: &str) -> Result<char, LiteralError> {
    let mut decoded = decode(text, '\'', Quote::Rune)?.into_iter();
    match (decoded.next(), decoded.next()) {
        (Some((_, _, value)), None) => value,
        _ => Err(LiteralError::RuneLength),
    }
}

/// Ranges of escape sequences inside a `STRING` or `RUNE` token, relative to
/// the start of the token. Invalid escapes are included.
pub fn escape_sequences(kind: SyntaxKind, text: &str) -> Vec<TextRange> {
    let decoded = match kind {
        SyntaxKind::STRING => decode(text, '"', Quote::String),
        SyntaxKind::RUNE => decode(text, '\'', Quote::Rune),
        _ => return Vec::new(),
    };
    decoded
        .map(|decoded| {
            decoded.into_iter().filter(|(_, is_escape, _)| *is_escape).map(|(range, ..)| range).collect()
        })
        .unwrap_or_default()
}
