use crate::SyntaxKind::{self, *};
use crate::{Field, SyntaxNode, SyntaxToken};

pub trait AstNode<'a>: Copy {
    fn can_cast(kind: SyntaxKind) -> bool;

    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>;

    fn syntax(self) -> SyntaxNode<'a>;
}

macro_rules! ast_node {
    ($($name:ident => $kind:ident),* $(,)?) => {$(
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> AstNode<'a> for $name<'a> {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == $kind
            }

            fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
                Self::can_cast(syntax.kind()).then_some(Self(syntax))
            }

            fn syntax(self) -> SyntaxNode<'a> {
                self.0
            }
        }
    )*};
}

ast_node! {
    SourceFile => SOURCE_FILE,
    Identifier => IDENTIFIER,
    FuncExpression => FUNC_EXPRESSION,
    Parameter => PARAMETER,
    ImplDeclaration => IMPL_DECLARATION,
    TypeDeclaration => TYPE_DECLARATION,
    EnumMemberDeclaration => ENUM_MEMBER_DECLARATION,
    KeyTypeList => KEY_TYPE_LIST,
    Parens => PARENS,
    TupleLiteral => TUPLE_LITERAL,
    ListLiteral => LIST_LITERAL,
    OrList => OR_LIST,
    ConditionalsList => CONDITIONALS_LIST,
    IfDeclaration => IF_DECLARATION,
    IfLetComparison => IF_LET_COMPARISON,
    MatchDeclaration => MATCH_DECLARATION,
    MatchPattern => MATCH_PATTERN,
    VarDeclaration => VAR_DECLARATION,
    LoopDeclaration => LOOP_DECLARATION,
    LoopType => LOOP_TYPE,
    MemberExpression => MEMBER_EXPRESSION,
    ObjectExpression => OBJECT_EXPRESSION,
    KeyValue => KEY_VALUE,
    PipeExpression => PIPE_EXPRESSION,
    DataType => DATA_TYPE,
    AssignmentExpression => ASSIGNMENT_EXPRESSION,
    NotExpression => NOT_EXPRESSION,
    CallExpression => CALL_EXPRESSION,
    CallNodeExpression => CALL_NODE_EXPRESSION,
    ArgumentList => ARGUMENT_LIST,
    BinaryExpression => BINARY_EXPRESSION,
    TypeBinaryExpression => TYPE_BINARY_EXPRESSION,
    SpecialBinaryExpression => SPECIAL_BINARY_EXPRESSION,
}

fn node<'a>(syntax: SyntaxNode<'a>, field: Field) -> Option<SyntaxNode<'a>> {
    syntax.children_by_field(field).find_map(|child| child.into_node())
}

fn nodes<'a>(syntax: SyntaxNode<'a>, field: Field) -> impl Iterator<Item = SyntaxNode<'a>> {
    syntax.children_by_field(field).filter_map(|child| child.into_node())
}

fn token<'a>(syntax: SyntaxNode<'a>, field: Field) -> Option<SyntaxToken<'a>> {
    syntax.children_by_field(field).find_map(|child| child.into_token())
}

fn has_token(syntax: SyntaxNode<'_>, kind: SyntaxKind) -> bool {
    syntax.children_with_tokens().any(|child| child.kind() == kind)
}

impl<'a> SourceFile<'a> {
    /// Top-level statements, including `ERROR` nodes.
    pub fn statements(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.0.children()
    }
}

impl<'a> Identifier<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        self.0.children_with_tokens().find_map(|child| child.into_token())
    }
}

impl<'a> FuncExpression<'a> {
    pub fn parameters(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Parameters)
    }

    pub fn params(self) -> impl Iterator<Item = Parameter<'a>> {
        self.parameters().into_iter().flat_map(SyntaxNode::children).filter_map(Parameter::cast)
    }

    pub fn is_async(self) -> bool {
        token(self.0, Field::Async).is_some()
    }

    pub fn result(self) -> Option<DataType<'a>> {
        node(self.0, Field::Result).and_then(DataType::cast)
    }

    pub fn body(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Body)
    }
}

impl<'a> Parameter<'a> {
    pub fn names(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        nodes(self.0, Field::Name)
    }

    pub fn ty(self) -> Option<DataType<'a>> {
        node(self.0, Field::Type).and_then(DataType::cast)
    }

    pub fn default(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Default)
    }
}

impl<'a> ImplDeclaration<'a> {
    pub fn name(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Name)
    }

    pub fn functions(self) -> impl Iterator<Item = VarDeclaration<'a>> {
        nodes(self.0, Field::Functions).filter_map(VarDeclaration::cast)
    }
}

impl<'a> TypeDeclaration<'a> {
    pub fn name(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Name)
    }

    /// The declared body: a `DATA_TYPE`, `ENUM_DECLARATION` or `STRUCT_DECLARATION`.
    pub fn body(self) -> Option<SyntaxNode<'a>> {
        self.0.children().find(|child| child.field().is_none())
    }
}

impl<'a> EnumMemberDeclaration<'a> {
    pub fn name(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Name)
    }

    pub fn fields(self) -> Option<KeyTypeList<'a>> {
        self.0.children().find_map(KeyTypeList::cast)
    }
}

impl<'a> KeyTypeList<'a> {
    pub fn keys(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        nodes(self.0, Field::Name)
    }

    pub fn types(self) -> impl Iterator<Item = DataType<'a>> {
        nodes(self.0, Field::Types).filter_map(DataType::cast)
    }

    /// `true` for the positional `( T, ... )` form.
    pub fn is_positional(self) -> bool {
        has_token(self.0, L_PAREN)
    }
}

impl<'a> Parens<'a> {
    pub fn inner(self) -> Option<SyntaxNode<'a>> {
        self.0.children().next()
    }
}

impl<'a> TupleLiteral<'a> {
    pub fn elements(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.0.children()
    }
}

impl<'a> ListLiteral<'a> {
    pub fn elements(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.0.children()
    }
}

impl<'a> OrList<'a> {
    pub fn alternatives(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.0.children()
    }
}

impl<'a> ConditionalsList<'a> {
    pub fn guards(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.0.children()
    }
}

impl<'a> IfDeclaration<'a> {
    /// Either an `IF_LET_COMPARISON` or an `IF_COMPARISON`.
    pub fn comparison(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Comparison)
    }

    pub fn then(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Then)
    }

    /// A nested `IF_DECLARATION` or a block.
    pub fn otherwise(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Otherwise)
    }
}

impl<'a> IfLetComparison<'a> {
    pub fn patterns(self) -> Option<OrList<'a>> {
        node(self.0, Field::Patterns).and_then(OrList::cast)
    }

    pub fn conditionals(self) -> Option<ConditionalsList<'a>> {
        node(self.0, Field::Conditionals).and_then(ConditionalsList::cast)
    }

    pub fn mutability(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Mutability)
    }

    pub fn value(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Value)
    }
}

impl<'a> MatchDeclaration<'a> {
    pub fn is_async(self) -> bool {
        token(self.0, Field::Async).is_some()
    }

    pub fn mutability(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Mutability)
    }

    pub fn ty(self) -> Option<DataType<'a>> {
        node(self.0, Field::Type).and_then(DataType::cast)
    }

    pub fn default(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Default)
    }

    pub fn return_type(self) -> Option<DataType<'a>> {
        node(self.0, Field::Return).and_then(DataType::cast)
    }

    pub fn patterns(self) -> impl Iterator<Item = MatchPattern<'a>> {
        self.0.children().filter_map(MatchPattern::cast)
    }
}

impl<'a> MatchPattern<'a> {
    pub fn values(self) -> Option<OrList<'a>> {
        node(self.0, Field::Values).and_then(OrList::cast)
    }

    pub fn conditionals(self) -> Option<ConditionalsList<'a>> {
        node(self.0, Field::Conditionals).and_then(ConditionalsList::cast)
    }

    pub fn body(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Body)
    }
}

impl<'a> VarDeclaration<'a> {
    pub fn is_const(self) -> bool {
        has_token(self.0, CONST_KW)
    }

    pub fn is_mut(self) -> bool {
        has_token(self.0, MUT_KW)
    }

    pub fn name(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Name)
    }

    pub fn ty(self) -> Option<DataType<'a>> {
        node(self.0, Field::Type).and_then(DataType::cast)
    }

    pub fn value(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Value)
    }
}

impl<'a> LoopDeclaration<'a> {
    pub fn loop_type(self) -> Option<LoopType<'a>> {
        node(self.0, Field::LoopType).and_then(LoopType::cast)
    }

    pub fn body(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Body)
    }
}

impl<'a> LoopType<'a> {
    /// A `FOR_LOOP_TYPE`, `FOREACH_LOOP_TYPE`, or the condition statement.
    pub fn kind(self) -> Option<SyntaxNode<'a>> {
        self.0.children().next()
    }
}

impl<'a> MemberExpression<'a> {
    pub fn root(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Root)
    }

    pub fn members(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.0.children().filter(|child| child.field().is_none())
    }
}

impl<'a> ObjectExpression<'a> {
    pub fn key_value(self) -> Option<KeyValue<'a>> {
        self.0.children().find_map(KeyValue::cast)
    }
}

impl<'a> KeyValue<'a> {
    /// `(key, value)` pairs in source order. Bare field names have no key.
    pub fn entries(self) -> impl Iterator<Item = (Option<SyntaxNode<'a>>, SyntaxNode<'a>)> {
        let mut key = None;
        self.0.children().filter_map(move |child| match child.field() {
            Some(Field::Key) => {
                key = Some(child);
                None
            }
            Some(Field::Value) => Some((key.take(), child)),
            _ => None,
        })
    }
}

impl<'a> PipeExpression<'a> {
    pub fn stages(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.0.children()
    }
}

impl<'a> DataType<'a> {
    pub fn types(self) -> impl Iterator<Item = DataType<'a>> {
        nodes(self.0, Field::Types).filter_map(DataType::cast)
    }

    pub fn parameters(self) -> impl Iterator<Item = DataType<'a>> {
        nodes(self.0, Field::Parameters).filter_map(DataType::cast)
    }

    pub fn return_type(self) -> Option<DataType<'a>> {
        node(self.0, Field::Return).and_then(DataType::cast)
    }

    pub fn is_optional(self) -> bool {
        has_token(self.0, QUESTION)
    }
}

impl<'a> AssignmentExpression<'a> {
    pub fn left(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Left)
    }

    pub fn operator(self) -> Option<SyntaxToken<'a>> {
        token(self.0, Field::Operator)
    }

    pub fn right(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Right)
    }
}

impl<'a> NotExpression<'a> {
    pub fn operator(self) -> Option<SyntaxToken<'a>> {
        token(self.0, Field::Operator)
    }

    pub fn operand(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Operand)
    }
}

impl<'a> CallExpression<'a> {
    pub fn caller(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Caller)
    }

    pub fn args(self) -> Option<ArgumentList<'a>> {
        node(self.0, Field::Args).and_then(ArgumentList::cast)
    }
}

impl<'a> CallNodeExpression<'a> {
    pub fn caller(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Caller)
    }

    pub fn args(self) -> Option<ArgumentList<'a>> {
        node(self.0, Field::Args).and_then(ArgumentList::cast)
    }
}

impl<'a> ArgumentList<'a> {
    pub fn values(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        nodes(self.0, Field::Value)
    }
}

impl<'a> BinaryExpression<'a> {
    pub fn left(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Left)
    }

    pub fn operator(self) -> Option<SyntaxToken<'a>> {
        token(self.0, Field::Operator)
    }

    pub fn right(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Right)
    }
}

impl<'a> TypeBinaryExpression<'a> {
    pub fn left(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Left)
    }

    pub fn operator(self) -> Option<SyntaxToken<'a>> {
        token(self.0, Field::Operator)
    }

    pub fn ty(self) -> Option<DataType<'a>> {
        node(self.0, Field::Type).and_then(DataType::cast)
    }
}

impl<'a> SpecialBinaryExpression<'a> {
    pub fn left(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Left)
    }

    pub fn operator(self) -> Option<SyntaxToken<'a>> {
        token(self.0, Field::Operator)
    }

    /// The right operand, labelled `type` in the tree.
    pub fn right(self) -> Option<SyntaxNode<'a>> {
        node(self.0, Field::Type)
    }
}
