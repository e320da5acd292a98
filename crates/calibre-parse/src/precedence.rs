//! Operator precedence table.
//!
//! Binding power grows with the level. The expression parser reads this table
//! and never hardcodes a level, so associativity and ordering can be checked
//! here in isolation.

use calibre_yellow::SyntaxKind::{self, *};
use calibre_yellow::SyntaxSet;

pub const PRIMARY: u8 = 150;
pub const UNARY: u8 = 140;
/// Operands of an or-list bind tighter than `|`, which separates alternatives.
pub const OR_LIST_OPERAND: u8 = Level::BITWISE + 1;
/// Lowest level: a full statement.
pub const STATEMENT: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// Node shape produced by an infix level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixClass {
    /// `left op right`, both expressions.
    Binary,
    /// `left op type`, with a type on the right.
    TypeBinary,
    /// `left in statement`.
    Special,
    /// Flat `stage |> stage |> ...`.
    Pipe,
    /// `target op= statement`.
    Assignment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub level: u8,
    pub assoc: Assoc,
    pub class: InfixClass,
    pub operators: SyntaxSet,
}

impl Level {
    pub const AS: u8 = 130;
    pub const POWER: u8 = 120;
    pub const MULTIPLICATIVE: u8 = 110;
    pub const ADDITIVE: u8 = 100;
    pub const SHIFT: u8 = 90;
    pub const BITWISE: u8 = 80;
    pub const IS: u8 = 70;
    pub const IN: u8 = 60;
    pub const COMPARATIVE: u8 = 50;
    pub const BOOLEAN: u8 = 40;
    pub const RANGE: u8 = 30;
    pub const PIPE: u8 = 10;
    pub const ASSIGNMENT: u8 = 0;

    const fn new(level: u8, assoc: Assoc, class: InfixClass, operators: SyntaxSet) -> Self {
        Self { level, assoc, class, operators }
    }

    /// Minimum level for the right operand.
    pub const fn right_bp(&self) -> u8 {
        match self.assoc {
            Assoc::Left => self.level + 1,
            Assoc::Right => self.level,
        }
    }
}

pub const ASSIGNMENT_OPERATORS: SyntaxSet = SyntaxSet::new([
    EQ, PLUSEQ, MINUSEQ, STAREQ, SLASHEQ, PERCENTEQ, AMPEQ, PIPEEQ, CARETEQ, AMP2EQ, PIPE2EQ,
    SHLEQ, SHREQ,
]);

/// Infix levels, tightest first.
pub const TABLE: &[Level] = &[
    Level::new(Level::AS, Assoc::Left, InfixClass::TypeBinary, SyntaxSet::new([AS_KW])),
    Level::new(Level::POWER, Assoc::Left, InfixClass::Binary, SyntaxSet::new([STAR2])),
    Level::new(
        Level::MULTIPLICATIVE,
        Assoc::Left,
        InfixClass::Binary,
        SyntaxSet::new([STAR, SLASH, PERCENT]),
    ),
    Level::new(Level::ADDITIVE, Assoc::Left, InfixClass::Binary, SyntaxSet::new([PLUS, MINUS])),
    Level::new(Level::SHIFT, Assoc::Left, InfixClass::Binary, SyntaxSet::new([SHL, SHR])),
    Level::new(Level::BITWISE, Assoc::Left, InfixClass::Binary, SyntaxSet::new([AMP, PIPE, CARET])),
    Level::new(Level::IS, Assoc::Left, InfixClass::TypeBinary, SyntaxSet::new([IS_KW])),
    Level::new(Level::IN, Assoc::Left, InfixClass::Special, SyntaxSet::new([IN_KW])),
    Level::new(
        Level::COMPARATIVE,
        Assoc::Left,
        InfixClass::Binary,
        SyntaxSet::new([EQ2, NEQ, LT, LTEQ, GT, GTEQ]),
    ),
    Level::new(Level::BOOLEAN, Assoc::Left, InfixClass::Binary, SyntaxSet::new([AMP2, PIPE2])),
    Level::new(Level::RANGE, Assoc::Left, InfixClass::Binary, SyntaxSet::new([DOT2, DOT2EQ])),
    Level::new(Level::PIPE, Assoc::Left, InfixClass::Pipe, SyntaxSet::new([PIPE_GT])),
    // Assignment targets are checked by the parser; the value is a whole
    // statement, so `a = b = c` nests to the right.
    Level::new(Level::ASSIGNMENT, Assoc::Right, InfixClass::Assignment, ASSIGNMENT_OPERATORS),
];

/// The infix level `kind` belongs to, if it is an infix operator.
pub fn infix(kind: SyntaxKind) -> Option<&'static Level> {
    TABLE.iter().find(|level| level.operators.contains(kind))
}
