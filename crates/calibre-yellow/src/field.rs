//! Field names labelling the role of a child inside its parent.

/// A named, labelled view over some of a node's children.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Field {
    Args,
    Async,
    Body,
    Caller,
    Comparison,
    Conditionals,
    Default,
    Functions,
    Key,
    Left,
    LoopType,
    Mutability,
    Name,
    Operand,
    Operator,
    Otherwise,
    Parameters,
    Patterns,
    Result,
    Return,
    Right,
    Root,
    Then,
    Type,
    Types,
    Value,
    Values,
}

impl Field {
    pub const ALL: [Self; 27] = [
        Self::Args,
        Self::Async,
        Self::Body,
        Self::Caller,
        Self::Comparison,
        Self::Conditionals,
        Self::Default,
        Self::Functions,
        Self::Key,
        Self::Left,
        Self::LoopType,
        Self::Mutability,
        Self::Name,
        Self::Operand,
        Self::Operator,
        Self::Otherwise,
        Self::Parameters,
        Self::Patterns,
        Self::Result,
        Self::Return,
        Self::Right,
        Self::Root,
        Self::Then,
        Self::Type,
        Self::Types,
        Self::Value,
        Self::Values,
    ];

    /// The spelling used by tree dumps and structural queries.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Args => "args",
            Self::Async => "async",
            Self::Body => "body",
            Self::Caller => "caller",
            Self::Comparison => "comparison",
            Self::Conditionals => "conditionals",
            Self::Default => "default",
            Self::Functions => "functions",
            Self::Key => "key",
            Self::Left => "left",
            Self::LoopType => "loop_type",
            Self::Mutability => "mutability",
            Self::Name => "name",
            Self::Operand => "operand",
            Self::Operator => "operator",
            Self::Otherwise => "otherwise",
            Self::Parameters => "parameters",
            Self::Patterns => "patterns",
            Self::Result => "result",
            Self::Return => "return",
            Self::Right => "right",
            Self::Root => "root",
            Self::Then => "then",
            Self::Type => "type",
            Self::Types => "types",
            Self::Value => "value",
            Self::Values => "values",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}
