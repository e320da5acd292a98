mod node;
mod token;
mod tree;

pub(crate) use node::Node;
pub(crate) use token::{AttachedTrivia, Token, TokenRef, TokenRefIter};
pub(crate) use tree::TreeInner;
