use super::node::Node;
use super::token::Token;
use crate::NodeOrToken;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TreeInner {
    pub(crate) text: Box<str>,
    /// Always starts with a fake token.
    pub(crate) tokens: Box<[Token]>,
    /// The root is always at index 0.
    pub(crate) nodes: Box<[Node]>,
    pub(crate) children: Box<[NodeOrToken<u32, u32>]>,
}
