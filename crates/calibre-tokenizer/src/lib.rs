mod cursor;
pub mod literals;

use std::ops::Range;

pub use calibre_yellow::SyntaxKind;
use calibre_yellow::SyntaxKind::*;
use calibre_yellow::{TriviaPiece, TriviaPieceKind};
use cursor::Cursor;
use text_size::{TextRange, TextSize};

/// Lexical details of a token that its kind does not capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenFlags(u8);

impl TokenFlags {
    pub const EMPTY: Self = Self(0);
    pub const BIN: Self = Self(1 << 0);
    pub const OCT: Self = Self(1 << 1);
    pub const HEX: Self = Self(1 << 2);
    /// Octal written with a bare leading zero, as in `017`.
    pub const LEGACY_OCTAL: Self = Self(1 << 3);
    pub const HAS_ESCAPES: Self = Self(1 << 4);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub flags: TokenFlags,
}

/// A lexical failure. The offending text is still covered by a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub range: TextRange,
}

#[derive(Debug, Clone)]
struct TokenTrivia {
    leading: Range<u32>,
    trailing: Range<u32>,
}

/// Streaming tokenizer. Significant tokens are indexed in order, each owning
/// its leading and trailing trivia.
///
/// Trailing trivia stops before the first newline or `;`, so a statement
/// terminator always lands in the leading trivia of the token after it.
pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
    trivia: Vec<TokenTrivia>,
    trivia_pieces: Vec<TriviaPiece>,
    errors: Vec<LexError>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        assert!(u32::try_from(text.len()).is_ok(), "source text is larger than 4GiB");
        Self {
            text,
            cursor: Cursor::new(text),
            tokens: Vec::with_capacity(text.len() / 4),
            trivia: Vec::with_capacity(text.len() / 4),
            trivia_pieces: Vec::with_capacity(text.len() / 4),
            errors: Vec::new(),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Lexes the next significant token and returns its index. Once the input
    /// is exhausted this keeps returning the index of the `EOF` token.
    pub fn next_token_index(&mut self) -> usize {
        if let Some(last) = self.tokens.last()
            && last.kind == EOF
        {
            return self.tokens.len() - 1;
        }

        let leading = self.trivia(true);
        let (kind, flags) = self.syntax_kind();
        let range = self.range();
        self.cursor.reset_pos_within_token();
        let trailing = if kind == EOF { self.empty_trivia() } else { self.trivia(false) };

        self.tokens.push(Token { kind, range, flags });
        self.trivia.push(TokenTrivia { leading, trailing });
        self.tokens.len() - 1
    }

    /// Number of tokens lexed so far.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[track_caller]
    pub fn token(&self, index: usize) -> Token {
        self.tokens[index]
    }

    pub fn leading_trivia(&self, index: usize) -> &[TriviaPiece] {
        let range = &self.trivia[index].leading;
        &self.trivia_pieces[range.start as usize..range.end as usize]
    }

    pub fn trailing_trivia(&self, index: usize) -> &[TriviaPiece] {
        let range = &self.trivia[index].trailing;
        &self.trivia_pieces[range.start as usize..range.end as usize]
    }

    /// `true` when a newline or `;` separates token `index` from the one
    /// before it, or when the token is `EOF`.
    pub fn has_terminator_before(&self, index: usize) -> bool {
        self.tokens[index].kind == EOF
            || self.leading_trivia(index).iter().any(|piece| piece.kind.is_terminator())
    }

    /// `true` when token `index` directly follows the previous one.
    pub fn is_joint_to_previous(&self, index: usize) -> bool {
        index > 0 && self.trailing_trivia(index - 1).is_empty() && self.leading_trivia(index).is_empty()
    }

    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    fn offset(&self) -> TextSize {
        TextSize::new(self.text.len() as u32) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn token_text(&self) -> &'a str {
        &self.text[self.range()]
    }

    fn error(&mut self, message: impl Into<String>, range: TextRange) {
        self.errors.push(LexError { message: message.into(), range });
    }

    fn empty_trivia(&self) -> Range<u32> {
        let at = self.trivia_pieces.len() as u32;
        at..at
    }

    fn trivia(&mut self, leading: bool) -> Range<u32> {
        let start = self.trivia_pieces.len() as u32;
        loop {
            let kind = match self.cursor.peek() {
                _ if self.cursor.is_eof() => break,
                '\n' | ';' if !leading => break,
                '\r' if !leading && self.cursor.second() == '\n' => break,
                '\n' => {
                    self.newlines();
                    TriviaPieceKind::Newline
                }
                '\r' if self.cursor.second() == '\n' => {
                    self.newlines();
                    TriviaPieceKind::Newline
                }
                ';' => {
                    self.cursor.advance();
                    TriviaPieceKind::Semicolon
                }
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n');
                    TriviaPieceKind::LineComment
                }
                '/' if self.cursor.second() == '*' => {
                    self.block_comment();
                    TriviaPieceKind::BlockComment
                }
                c if is_whitespace(c) => {
                    self.whitespace();
                    TriviaPieceKind::Whitespace
                }
                _ => break,
            };

            self.trivia_pieces.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
            self.cursor.reset_pos_within_token();
        }
        start..self.trivia_pieces.len() as u32
    }

    fn newlines(&mut self) {
        loop {
            if self.cursor.matches('\r') && self.cursor.second() == '\n' {
                self.cursor.advance();
            }
            if !self.cursor.eat('\n') {
                break;
            }
        }
    }

    fn whitespace(&mut self) {
        while !self.cursor.is_eof() {
            let c = self.cursor.peek();
            if !is_whitespace(c) || (c == '\r' && self.cursor.second() == '\n') {
                break;
            }
            self.cursor.advance();
        }
    }

    fn block_comment(&mut self) {
        self.cursor.advance();
        self.cursor.advance();
        loop {
            if self.cursor.is_eof() {
                let range = self.range();
                self.error("unterminated block comment", range);
                return;
            }
            if self.cursor.advance() == '*' && self.cursor.matches('/') {
                self.cursor.advance();
                return;
            }
        }
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TokenFlags) {
        if self.cursor.is_eof() {
            return (EOF, TokenFlags::EMPTY);
        }

        let kind = match self.cursor.advance() {
            '(' => L_PAREN,
            ')' => R_PAREN,
            '[' => L_BRACKET,
            ']' => R_BRACKET,
            '{' => L_BRACE,
            '}' => R_BRACE,
            ',' => COMMA,
            ':' => COLON,
            '?' => QUESTION,
            '.' if self.cursor.peek().is_ascii_digit() => {
                return self.number('.');
            }
            '.' => {
                if self.cursor.eat('.') {
                    if self.cursor.eat('=') { DOT2EQ } else { DOT2 }
                } else {
                    DOT
                }
            }
            '=' => {
                if self.cursor.eat('>') {
                    FAT_ARROW
                } else if self.cursor.eat('=') {
                    EQ2
                } else {
                    EQ
                }
            }
            '!' => self.with_eq(BANG, NEQ),
            '<' => {
                if self.cursor.eat('-') {
                    LEFT_ARROW
                } else if self.cursor.eat('<') {
                    self.with_eq(SHL, SHLEQ)
                } else {
                    self.with_eq(LT, LTEQ)
                }
            }
            // `>=`, `>>` and `>>=` are glued by the parser so that nested
            // generic lists like `list<list<int>>` stay unambiguous.
            '>' => GT,
            '-' => {
                if self.cursor.eat('>') {
                    THIN_ARROW
                } else {
                    self.with_eq(MINUS, MINUSEQ)
                }
            }
            '+' => self.with_eq(PLUS, PLUSEQ),
            '*' => {
                if self.cursor.eat('*') {
                    STAR2
                } else {
                    self.with_eq(STAR, STAREQ)
                }
            }
            '/' => self.with_eq(SLASH, SLASHEQ),
            '%' => self.with_eq(PERCENT, PERCENTEQ),
            '^' => self.with_eq(CARET, CARETEQ),
            '&' => {
                if self.cursor.eat('&') {
                    self.with_eq(AMP2, AMP2EQ)
                } else {
                    self.with_eq(AMP, AMPEQ)
                }
            }
            '|' => {
                if self.cursor.eat('|') {
                    self.with_eq(PIPE2, PIPE2EQ)
                } else if self.cursor.eat('>') {
                    PIPE_GT
                } else {
                    self.with_eq(PIPE, PIPEEQ)
                }
            }
            '"' => return self.string(),
            '\'' => return self.rune(),
            first_char @ '0'..='9' => return self.number(first_char),
            'r' if self.cursor.matches('#') && is_ident_start(self.cursor.second()) => {
                self.cursor.advance();
                self.cursor.advance_while(is_ident_continue);
                NAME
            }
            first_char if is_ident_start(first_char) => {
                self.cursor.advance_while(is_ident_continue);
                SyntaxKind::from_keyword(self.token_text()).unwrap_or(NAME)
            }
            first_char => {
                let range = self.range();
                self.error(format!("unexpected character `{}`", first_char.escape_debug()), range);
                UNKNOWN
            }
        };

        (kind, TokenFlags::EMPTY)
    }

    fn with_eq(&mut self, plain: SyntaxKind, with_eq: SyntaxKind) -> SyntaxKind {
        if self.cursor.eat('=') { with_eq } else { plain }
    }

    fn number(&mut self, first_char: char) -> (SyntaxKind, TokenFlags) {
        if first_char == '.' {
            self.decimal_digits();
            self.decimal_exponent();
            return self.imaginary_suffix(FLOAT_NUMBER, TokenFlags::EMPTY);
        }

        if first_char == '0' {
            match self.cursor.peek() {
                'x' | 'X' => {
                    self.cursor.advance();
                    return self.hex_number();
                }
                'b' | 'B' => {
                    self.cursor.advance();
                    self.radix_digits(2, "binary");
                    return self.imaginary_suffix(INT_NUMBER, TokenFlags::BIN);
                }
                'o' | 'O' => {
                    self.cursor.advance();
                    self.radix_digits(8, "octal");
                    return self.imaginary_suffix(INT_NUMBER, TokenFlags::OCT);
                }
                _ => {}
            }
        }

        self.decimal_digits();
        let mut kind = INT_NUMBER;
        if self.at_fraction() {
            self.cursor.advance();
            self.decimal_digits();
            kind = FLOAT_NUMBER;
        }
        if self.decimal_exponent() {
            kind = FLOAT_NUMBER;
        }

        let mut flags = TokenFlags::EMPTY;
        let text = self.token_text();
        if kind == INT_NUMBER && first_char == '0' && text.len() > 1 {
            flags = TokenFlags::OCT.union(TokenFlags::LEGACY_OCTAL);
            // Digit runs followed by `i` are decimal imaginary literals.
            if !self.at_imaginary_suffix() {
                self.check_digits(text, 8, "octal");
            }
        }

        self.imaginary_suffix(kind, flags)
    }

    fn hex_number(&mut self) -> (SyntaxKind, TokenFlags) {
        let mut digits = self.cursor.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
        let mut kind = INT_NUMBER;
        let hex_fraction = |c: char| c.is_ascii_hexdigit() || matches!(c, 'p' | 'P' | '_');
        if self.cursor.matches('.') && hex_fraction(self.cursor.second()) {
            self.cursor.advance();
            digits += self.cursor.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
            kind = FLOAT_NUMBER;
        }

        if matches!(self.cursor.peek(), 'p' | 'P') && self.exponent_follows() {
            self.cursor.advance();
            if matches!(self.cursor.peek(), '+' | '-') {
                self.cursor.advance();
            }
            self.decimal_digits();
            kind = FLOAT_NUMBER;
        } else if kind == FLOAT_NUMBER {
            let range = self.range();
            self.error("hexadecimal float literal requires a `p` exponent", range);
        }

        if digits == 0 {
            let range = self.range();
            self.error("missing digits after the integer base prefix", range);
        }

        self.imaginary_suffix(kind, TokenFlags::HEX)
    }

    /// Consumes `[0-9_]*` and reports digits that do not fit `radix`.
    fn radix_digits(&mut self, radix: u32, name: &str) {
        let start = self.cursor.pos_within_token();
        let count = self.cursor.advance_while(|c| c.is_ascii_digit() || c == '_');
        let text = &self.token_text()[usize::from(start)..];
        if count == 0 {
            let range = self.range();
            self.error("missing digits after the integer base prefix", range);
        } else {
            self.check_digits(text, radix, name);
        }
    }

    fn check_digits(&mut self, digits: &str, radix: u32, name: &str) {
        if let Some(invalid) = digits.chars().find(|&c| c != '_' && !c.is_digit(radix)) {
            let range = self.range();
            self.error(format!("invalid digit `{invalid}` in {name} literal"), range);
        }
    }

    fn decimal_digits(&mut self) -> usize {
        self.cursor.advance_while(|c| c.is_ascii_digit() || c == '_')
    }

    /// A `.` continues a number unless it starts a range or a member access.
    /// `1.e5` is a float, `1.exp` a member access.
    fn at_fraction(&self) -> bool {
        let mut rest = self.cursor.rest().chars();
        if rest.next() != Some('.') {
            return false;
        }
        match rest.next() {
            Some('.') => false,
            Some('e' | 'E') => match rest.next() {
                Some('+' | '-') => rest.next().is_some_and(|c| c.is_ascii_digit()),
                next => next.is_some_and(|c| c.is_ascii_digit()),
            },
            Some(next) => !is_ident_start(next),
            None => true,
        }
    }

    fn exponent_follows(&self) -> bool {
        match self.cursor.second() {
            '0'..='9' => true,
            '+' | '-' => self.cursor.third().is_ascii_digit(),
            _ => false,
        }
    }

    fn decimal_exponent(&mut self) -> bool {
        if !matches!(self.cursor.peek(), 'e' | 'E') || !self.exponent_follows() {
            return false;
        }
        self.cursor.advance();
        if matches!(self.cursor.peek(), '+' | '-') {
            self.cursor.advance();
        }
        self.decimal_digits();
        true
    }

    fn at_imaginary_suffix(&self) -> bool {
        self.cursor.matches('i') && !is_ident_continue(self.cursor.second())
    }

    fn imaginary_suffix(&mut self, kind: SyntaxKind, flags: TokenFlags) -> (SyntaxKind, TokenFlags) {
        if self.at_imaginary_suffix() {
            self.cursor.advance();
            return (IMAGINARY_NUMBER, flags);
        }
        (kind, flags)
    }

    fn string(&mut self) -> (SyntaxKind, TokenFlags) {
        let mut flags = TokenFlags::EMPTY;
        loop {
            match self.cursor.peek() {
                _ if self.cursor.is_eof() => return self.unterminated("string"),
                '\n' => return self.unterminated("string"),
                '"' => {
                    self.cursor.advance();
                    return (STRING, flags);
                }
                '\\' => {
                    flags = TokenFlags::HAS_ESCAPES;
                    self.string_escape();
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn string_escape(&mut self) {
        let start = self.offset();
        self.cursor.advance();
        let valid = match self.cursor.peek() {
            _ if self.cursor.is_eof() => return,
            'x' => {
                self.cursor.advance();
                self.cursor.advance_while(|c| c.is_ascii_hexdigit()) >= 2
            }
            'u' => {
                self.cursor.advance();
                self.hex_digits_exactly(4)
            }
            'U' => {
                self.cursor.advance();
                self.hex_digits_exactly(8)
            }
            '0'..='9' => {
                self.cursor.advance();
                for _ in 0..2 {
                    if self.cursor.peek().is_ascii_digit() {
                        self.cursor.advance();
                    }
                }
                true
            }
            _ => {
                self.cursor.advance();
                true
            }
        };

        if !valid {
            let range = TextRange::new(start, self.offset());
            self.error("invalid escape sequence", range);
        }
    }

    fn hex_digits_exactly(&mut self, count: usize) -> bool {
        for _ in 0..count {
            if !self.cursor.peek().is_ascii_hexdigit() || self.cursor.is_eof() {
                return false;
            }
            self.cursor.advance();
        }
        true
    }

    fn rune(&mut self) -> (SyntaxKind, TokenFlags) {
        let mut flags = TokenFlags::EMPTY;
        match self.cursor.peek() {
            _ if self.cursor.is_eof() => return self.unterminated("rune"),
            '\n' => return self.unterminated("rune"),
            '\'' => {
                self.cursor.advance();
                let range = self.range();
                self.error("empty rune literal", range);
                return (RUNE, flags);
            }
            '\\' => {
                flags = TokenFlags::HAS_ESCAPES;
                self.rune_escape();
            }
            _ => {
                self.cursor.advance();
            }
        }

        if self.cursor.eat('\'') {
            return (RUNE, flags);
        }

        // `'ab'` is one bad rune; `'a + b` ends the rune after its body.
        let extra = self.cursor.advance_while(is_ident_continue);
        if extra > 0 && self.cursor.eat('\'') {
            let range = self.range();
            self.error("rune literal may only contain one character", range);
            return (RUNE, flags);
        }

        let range = self.range();
        self.error("unterminated rune literal", range);
        (UNKNOWN, TokenFlags::EMPTY)
    }

    fn rune_escape(&mut self) {
        let start = self.offset();
        self.cursor.advance();
        let valid = match self.cursor.peek() {
            _ if self.cursor.is_eof() => false,
            'x' => {
                self.cursor.advance();
                self.hex_digits_exactly(2)
            }
            'u' => {
                self.cursor.advance();
                self.hex_digits_exactly(4)
            }
            'U' => {
                self.cursor.advance();
                self.hex_digits_exactly(8)
            }
            '0'..='7' => {
                (0..3).all(|_| {
                    let is_octal = matches!(self.cursor.peek(), '0'..='7');
                    if is_octal {
                        self.cursor.advance();
                    }
                    is_octal
                })
            }
            'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '\'' | '"' => {
                self.cursor.advance();
                true
            }
            '\n' => false,
            _ => {
                self.cursor.advance();
                false
            }
        };

        if !valid {
            let range = TextRange::new(start, self.offset());
            self.error("invalid escape sequence", range);
        }
    }

    /// Extends the token to the end of the line and reports it.
    fn unterminated(&mut self, what: &str) -> (SyntaxKind, TokenFlags) {
        self.cursor.advance_while(|c| c != '\n');
        let range = self.range();
        self.error(format!("unterminated {what} literal"), range);
        (UNKNOWN, TokenFlags::EMPTY)
    }
}

fn is_whitespace(c: char) -> bool {
    c != '\n' && c.is_whitespace()
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Lexes `text` completely, returning every significant token (ending with
/// `EOF`) and the lexical errors.
pub fn tokenize(text: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut tokenizer = Tokenizer::new(text);
    loop {
        let index = tokenizer.next_token_index();
        if tokenizer.token(index).kind == EOF {
            break;
        }
    }
    let errors = tokenizer.take_errors();
    (tokenizer.tokens, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(SyntaxKind, &str)> {
        let (tokens, _) = tokenize(text);
        tokens.iter().map(|token| (token.kind, &text[token.range])).collect()
    }

    fn single(text: &str) -> (Token, Vec<LexError>) {
        let mut tokenizer = Tokenizer::new(text);
        let index = tokenizer.next_token_index();
        let token = tokenizer.token(index);
        assert_eq!(token.range.len(), TextSize::of(text), "token did not cover '{text}'");
        (token, tokenizer.take_errors())
    }

    #[test]
    fn test_integer_literals() {
        let inputs = [
            ("123", TokenFlags::EMPTY),
            ("0", TokenFlags::EMPTY),
            ("1_000", TokenFlags::EMPTY),
            ("0b101", TokenFlags::BIN),
            ("0B1_0", TokenFlags::BIN),
            ("0o17", TokenFlags::OCT),
            ("017", TokenFlags::OCT.union(TokenFlags::LEGACY_OCTAL)),
            ("0x1A", TokenFlags::HEX),
            ("0X_ff", TokenFlags::HEX),
        ];

        for (input, flags) in inputs {
            let (token, errors) = single(input);
            assert_eq!(token.kind, INT_NUMBER, "Input: '{input}'");
            assert_eq!(token.flags, flags, "Input: '{input}'");
            assert!(errors.is_empty(), "Input: '{input}': {errors:?}");
        }
    }

    #[test]
    fn test_float_literals() {
        let inputs = [
            "1.5e10", "0.0", "1.", ".5", "1e10", "1.0e-5", "1.e5", "1.E-3", "123_456.789_012",
            "0x1p4", "0x1.8P-3",
        ];

        for input in inputs {
            let (token, errors) = single(input);
            assert_eq!(token.kind, FLOAT_NUMBER, "Input: '{input}'");
            assert!(errors.is_empty(), "Input: '{input}': {errors:?}");
        }
    }

    #[test]
    fn dot_without_exponent_digits_is_member_access() {
        assert_eq!(kinds("1.exp"), [(INT_NUMBER, "1"), (DOT, "."), (NAME, "exp"), (EOF, "")]);
        assert_eq!(kinds("1.e"), [(INT_NUMBER, "1"), (DOT, "."), (NAME, "e"), (EOF, "")]);
    }

    #[test]
    fn test_imaginary_literals() {
        for input in ["3i", "0x1Fi", "1.5i", "017i", "089i", "1e3i"] {
            let (token, errors) = single(input);
            assert_eq!(token.kind, IMAGINARY_NUMBER, "Input: '{input}'");
            assert!(errors.is_empty(), "Input: '{input}': {errors:?}");
        }
    }

    #[test]
    fn invalid_digits_keep_the_literal_kind() {
        let (token, errors) = single("0b102");
        assert_eq!(token.kind, INT_NUMBER);
        assert_eq!(errors[0].message, "invalid digit `2` in binary literal");

        let (token, errors) = single("089");
        assert_eq!(token.kind, INT_NUMBER);
        assert_eq!(errors[0].message, "invalid digit `8` in octal literal");

        let (token, errors) = single("0x1.8");
        assert_eq!(token.kind, FLOAT_NUMBER);
        assert_eq!(errors[0].message, "hexadecimal float literal requires a `p` exponent");
    }

    #[test]
    fn ranges_and_members_are_not_floats() {
        assert_eq!(
            kinds("1..2"),
            [(INT_NUMBER, "1"), (DOT2, ".."), (INT_NUMBER, "2"), (EOF, "")]
        );
        assert_eq!(
            kinds("1..=2"),
            [(INT_NUMBER, "1"), (DOT2EQ, "..="), (INT_NUMBER, "2"), (EOF, "")]
        );
        assert_eq!(kinds("x.y"), [(NAME, "x"), (DOT, "."), (NAME, "y"), (EOF, "")]);
    }

    #[test]
    fn test_operators() {
        let text = "a <- b |> c => d -> e <<= f ** g &&= h ||= i != j";
        let operators: Vec<_> =
            kinds(text).into_iter().map(|(kind, _)| kind).filter(|kind| *kind != NAME).collect();
        assert_eq!(
            operators,
            [LEFT_ARROW, PIPE_GT, FAT_ARROW, THIN_ARROW, SHLEQ, STAR2, AMP2EQ, PIPE2EQ, NEQ, EOF]
        );
    }

    #[test]
    fn greater_than_is_never_combined() {
        assert_eq!(
            kinds(">>= >="),
            [(GT, ">"), (GT, ">"), (EQ, "="), (GT, ">"), (EQ, "="), (EOF, "")]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("fn r#fn int _x ünïcode"),
            [(FN_KW, "fn"), (NAME, "r#fn"), (NAME, "int"), (NAME, "_x"), (NAME, "ünïcode"), (EOF, "")]
        );
    }

    #[test]
    fn test_strings() {
        let (token, errors) = single(r#""a \n \x41 \101 é \U0001F600 \q""#);
        assert_eq!(token.kind, STRING);
        assert!(token.flags.contains(TokenFlags::HAS_ESCAPES));
        assert!(errors.is_empty(), "{errors:?}");

        let (token, errors) = single(r#""\u12""#);
        assert_eq!(token.kind, STRING);
        assert_eq!(errors[0].message, "invalid escape sequence");
    }

    #[test]
    fn unterminated_string_ends_at_line_end() {
        let text = "\"abc\nx";
        assert_eq!(kinds(text), [(UNKNOWN, "\"abc"), (NAME, "x"), (EOF, "")]);
        let (_, errors) = tokenize(text);
        assert_eq!(errors[0].message, "unterminated string literal");
    }

    #[test]
    fn test_runes() {
        for input in ["'a'", r"'\n'", r"'\x41'", r"'\101'", r"'é'", r"'\U0001F600'", "'é'"] {
            let (token, errors) = single(input);
            assert_eq!(token.kind, RUNE, "Input: {input}");
            assert!(errors.is_empty(), "Input: {input}: {errors:?}");
        }

        let (token, errors) = single("'ab'");
        assert_eq!(token.kind, RUNE);
        assert_eq!(errors[0].message, "rune literal may only contain one character");

        let (token, errors) = single(r"'\q'");
        assert_eq!(token.kind, RUNE);
        assert_eq!(errors[0].message, "invalid escape sequence");
    }

    #[test]
    fn unterminated_rune_ends_after_its_body() {
        let text = "'a + f('x')";
        assert_eq!(
            kinds(text),
            [
                (UNKNOWN, "'a"),
                (PLUS, "+"),
                (NAME, "f"),
                (L_PAREN, "("),
                (RUNE, "'x'"),
                (R_PAREN, ")"),
                (EOF, ""),
            ]
        );
        let (_, errors) = tokenize(text);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unterminated rune literal");
        assert_eq!(errors[0].range, TextRange::new(0.into(), 2.into()));
    }

    #[test]
    fn unknown_characters_make_progress() {
        assert_eq!(kinds("a @ b"), [(NAME, "a"), (UNKNOWN, "@"), (NAME, "b"), (EOF, "")]);
        assert_eq!(kinds("\0"), [(UNKNOWN, "\0"), (EOF, "")]);
    }

    #[test]
    fn trivia_attachment() {
        let text = "a // note\n  ; b /* c */ c";
        let mut tokenizer = Tokenizer::new(text);

        let a = tokenizer.next_token_index();
        let kinds = |pieces: &[TriviaPiece]| pieces.iter().map(|piece| piece.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds(tokenizer.trailing_trivia(a)),
            [TriviaPieceKind::Whitespace, TriviaPieceKind::LineComment]
        );

        let b = tokenizer.next_token_index();
        assert_eq!(
            kinds(tokenizer.leading_trivia(b)),
            [
                TriviaPieceKind::Newline,
                TriviaPieceKind::Whitespace,
                TriviaPieceKind::Semicolon,
                TriviaPieceKind::Whitespace
            ]
        );
        assert!(tokenizer.has_terminator_before(b));
        assert_eq!(
            kinds(tokenizer.trailing_trivia(b)),
            [TriviaPieceKind::Whitespace, TriviaPieceKind::BlockComment, TriviaPieceKind::Whitespace]
        );

        let c = tokenizer.next_token_index();
        assert!(!tokenizer.has_terminator_before(c));
        let eof = tokenizer.next_token_index();
        assert_eq!(tokenizer.token(eof).kind, EOF);
        assert!(tokenizer.has_terminator_before(eof));
        assert_eq!(tokenizer.next_token_index(), eof);
    }

    #[test]
    fn unterminated_block_comment_is_trivia() {
        let text = "a /* never closed";
        let (tokens, errors) = tokenize(text);
        assert_eq!(tokens.len(), 2);
        assert_eq!(errors[0].message, "unterminated block comment");
        assert_eq!(errors[0].range, TextRange::new(2.into(), TextSize::of(text)));
    }

    #[test]
    fn trivia_and_tokens_cover_the_text() {
        let text = "let x = \"s\" ;; // c\r\n\t/* * */ 0x_1p-2i\n";
        let mut tokenizer = Tokenizer::new(text);
        let mut rebuilt = String::new();
        let mut offset = 0usize;
        let mut push = |len: TextSize, rebuilt: &mut String| {
            let end = offset + usize::from(len);
            rebuilt.push_str(&text[offset..end]);
            offset = end;
        };
        loop {
            let index = tokenizer.next_token_index();
            for piece in tokenizer.leading_trivia(index) {
                push(piece.len, &mut rebuilt);
            }
            push(tokenizer.token(index).range.len(), &mut rebuilt);
            for piece in tokenizer.trailing_trivia(index) {
                push(piece.len, &mut rebuilt);
            }
            if tokenizer.token(index).kind == EOF {
                break;
            }
        }
        assert_eq!(rebuilt, text);
    }
}
