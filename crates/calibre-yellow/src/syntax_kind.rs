#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,
    COMMA,
    COLON,
    DOT,
    DOT2,
    DOT2EQ,
    QUESTION,
    FAT_ARROW,
    THIN_ARROW,
    LEFT_ARROW,
    PIPE_GT,
    EQ,
    EQ2,
    NEQ,
    LT,
    LTEQ,
    GT,
    GTEQ,
    SHL,
    SHR,
    BANG,
    PLUS,
    MINUS,
    STAR,
    STAR2,
    SLASH,
    PERCENT,
    AMP,
    AMP2,
    PIPE,
    PIPE2,
    CARET,
    PLUSEQ,
    MINUSEQ,
    STAREQ,
    SLASHEQ,
    PERCENTEQ,
    AMPEQ,
    PIPEEQ,
    CARETEQ,
    AMP2EQ,
    PIPE2EQ,
    SHLEQ,
    SHREQ,

    FN_KW,
    ASYNC_KW,
    IMPL_KW,
    TYPE_KW,
    ENUM_KW,
    STRUCT_KW,
    IF_KW,
    ELSE_KW,
    LET_KW,
    MUT_KW,
    CONST_KW,
    MATCH_KW,
    FOR_KW,
    IN_KW,
    BREAK_KW,
    CONTINUE_KW,
    RETURN_KW,
    TRY_KW,
    AS_KW,
    IS_KW,

    // Contextual: only produced by remapping a `NAME` in type position.
    INT_KW,
    FLOAT_KW,
    DYN_KW,
    BOOL_KW,
    STR_KW,
    CHAR_KW,
    RANGE_KW,
    LIST_KW,

    NAME,
    INT_NUMBER,
    FLOAT_NUMBER,
    IMAGINARY_NUMBER,
    STRING,
    RUNE,

    WHITESPACE,
    NEWLINE,
    SEMICOLON,
    LINE_COMMENT,
    BLOCK_COMMENT,

    UNKNOWN,
    EOF,

    SOURCE_FILE,
    IDENTIFIER,
    TYPE_IDENTIFIER,
    FIELD_IDENTIFIER,
    FUNC_EXPRESSION,
    PARAMETER_LIST,
    PARAMETER,
    IMPL_DECLARATION,
    TYPE_DECLARATION,
    ENUM_DECLARATION,
    ENUM_MEMBER_DECLARATION,
    STRUCT_DECLARATION,
    KEY_TYPE_LIST,
    PARENS,
    TUPLE_LITERAL,
    LIST_LITERAL,
    OR_LIST,
    CONDITIONALS_LIST,
    IF_DECLARATION,
    IF_LET_COMPARISON,
    IF_COMPARISON,
    MATCH_DECLARATION,
    MATCH_PATTERN,
    VAR_DECLARATION,
    LOOP_DECLARATION,
    LOOP_TYPE,
    FOR_LOOP_TYPE,
    FOREACH_LOOP_TYPE,
    MUTABILITY,
    BLOCK,
    SCOPE,
    STATEMENT_LIST,
    MEMBER_EXPRESSION,
    MEMBER_EXPR_MEMBER,
    STOP_STATEMENT,
    OBJECT_EXPRESSION,
    KEY_VALUE,
    PIPE_EXPRESSION,
    DATA_TYPE,
    ASSIGNMENT_EXPRESSION,
    TRY_EXPRESSION,
    NOT_EXPRESSION,
    CALL_EXPRESSION,
    CALL_NODE_EXPRESSION,
    ARGUMENT_LIST,
    BINARY_EXPRESSION,
    TYPE_BINARY_EXPRESSION,
    SPECIAL_BINARY_EXPRESSION,
    STRING_LITERAL,
    INT_LITERAL,
    FLOAT_LITERAL,
    IMAGINARY_LITERAL,
    RUNE_LITERAL,
    ERROR,
    TOMBSTONE,
}

use SyntaxKind::*;

impl SyntaxKind {
    pub const fn is_trivia(self) -> bool {
        matches!(self, WHITESPACE | NEWLINE | SEMICOLON | LINE_COMMENT | BLOCK_COMMENT)
    }

    pub const fn is_keyword(self) -> bool {
        self as u16 >= FN_KW as u16 && self as u16 <= LIST_KW as u16
    }

    pub const fn is_punct(self) -> bool {
        self as u16 <= SHREQ as u16
    }

    pub const fn is_literal(self) -> bool {
        matches!(self, INT_NUMBER | FLOAT_NUMBER | IMAGINARY_NUMBER | STRING | RUNE)
    }

    /// Tokens occupy the kinds before `SOURCE_FILE`; everything after is a node.
    pub const fn is_token(self) -> bool {
        (self as u16) < SOURCE_FILE as u16
    }

    /// Reserved words. Primitive type names are deliberately absent, see
    /// [`SyntaxKind::from_contextual_keyword`].
    pub fn from_keyword(ident: &str) -> Option<Self> {
        let kind = match ident {
            "fn" => FN_KW,
            "async" => ASYNC_KW,
            "impl" => IMPL_KW,
            "type" => TYPE_KW,
            "enum" => ENUM_KW,
            "struct" => STRUCT_KW,
            "if" => IF_KW,
            "else" => ELSE_KW,
            "let" => LET_KW,
            "mut" => MUT_KW,
            "const" => CONST_KW,
            "match" => MATCH_KW,
            "for" => FOR_KW,
            "in" => IN_KW,
            "break" => BREAK_KW,
            "continue" => CONTINUE_KW,
            "return" => RETURN_KW,
            "try" => TRY_KW,
            "as" => AS_KW,
            "is" => IS_KW,
            _ => return None,
        };
        Some(kind)
    }

    pub fn from_contextual_keyword(ident: &str) -> Option<Self> {
        let kind = match ident {
            "int" => INT_KW,
            "float" => FLOAT_KW,
            "dyn" => DYN_KW,
            "bool" => BOOL_KW,
            "str" => STR_KW,
            "char" => CHAR_KW,
            "range" => RANGE_KW,
            "list" => LIST_KW,
            _ => return None,
        };
        Some(kind)
    }

    /// Fixed spelling of punctuation and keywords, used in diagnostics.
    pub const fn text(self) -> Option<&'static str> {
        let text = match self {
            L_PAREN => "(",
            R_PAREN => ")",
            L_BRACKET => "[",
            R_BRACKET => "]",
            L_BRACE => "{",
            R_BRACE => "}",
            COMMA => ",",
            COLON => ":",
            DOT => ".",
            DOT2 => "..",
            DOT2EQ => "..=",
            QUESTION => "?",
            FAT_ARROW => "=>",
            THIN_ARROW => "->",
            LEFT_ARROW => "<-",
            PIPE_GT => "|>",
            EQ => "=",
            EQ2 => "==",
            NEQ => "!=",
            LT => "<",
            LTEQ => "<=",
            GT => ">",
            GTEQ => ">=",
            SHL => "<<",
            SHR => ">>",
            BANG => "!",
            PLUS => "+",
            MINUS => "-",
            STAR => "*",
            STAR2 => "**",
            SLASH => "/",
            PERCENT => "%",
            AMP => "&",
            AMP2 => "&&",
            PIPE => "|",
            PIPE2 => "||",
            CARET => "^",
            PLUSEQ => "+=",
            MINUSEQ => "-=",
            STAREQ => "*=",
            SLASHEQ => "/=",
            PERCENTEQ => "%=",
            AMPEQ => "&=",
            PIPEEQ => "|=",
            CARETEQ => "^=",
            AMP2EQ => "&&=",
            PIPE2EQ => "||=",
            SHLEQ => "<<=",
            SHREQ => ">>=",
            FN_KW => "fn",
            ASYNC_KW => "async",
            IMPL_KW => "impl",
            TYPE_KW => "type",
            ENUM_KW => "enum",
            STRUCT_KW => "struct",
            IF_KW => "if",
            ELSE_KW => "else",
            LET_KW => "let",
            MUT_KW => "mut",
            CONST_KW => "const",
            MATCH_KW => "match",
            FOR_KW => "for",
            IN_KW => "in",
            BREAK_KW => "break",
            CONTINUE_KW => "continue",
            RETURN_KW => "return",
            TRY_KW => "try",
            AS_KW => "as",
            IS_KW => "is",
            INT_KW => "int",
            FLOAT_KW => "float",
            DYN_KW => "dyn",
            BOOL_KW => "bool",
            STR_KW => "str",
            CHAR_KW => "char",
            RANGE_KW => "range",
            LIST_KW => "list",
            _ => return None,
        };
        Some(text)
    }
}
