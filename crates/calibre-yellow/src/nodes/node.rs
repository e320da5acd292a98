//! Node storage.

use text_size::{TextRange, TextSize};

use super::token::{TokenRef, TokenRefIter};
use super::tree::TreeInner;
use crate::{Field, NodeOrToken, SyntaxKind, TokenAtOffset};

/// Raw node stored in the tree arena.
///
/// A node without tokens has `first_token == last_token + 1`, which makes
/// its range empty at the end of the preceding token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) parent: Option<u32>,
    pub(crate) field: Option<Field>,
    pub(crate) kind: SyntaxKind,
    pub(crate) children_start: u32,
    pub(crate) children_len: u32,
    pub(crate) first_token: u32,
    pub(crate) last_token: u32,
}

impl Node {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.first_token > self.last_token
    }

    /// Returns the text range covered by this node.
    #[inline]
    pub(crate) fn text_range(&self, tree: &TreeInner) -> TextRange {
        let start = tree.tokens[self.first_token as usize - 1].end;
        let end = tree.tokens[self.last_token as usize].end;
        TextRange::new(start, end.max(start))
    }

    /// Returns the child slice (nodes and tokens).
    #[inline]
    pub(crate) fn children<'a>(&self, tree: &'a TreeInner) -> &'a [NodeOrToken<u32, u32>] {
        let start = self.children_start as usize;
        &tree.children[start..start + self.children_len as usize]
    }

    /// Every token, trivia included, spanned by this node.
    #[inline]
    pub(crate) fn tokens<'a>(&self, tree: &'a TreeInner) -> TokenRefIter<'a> {
        if self.is_empty() {
            return TokenRefIter::new(tree, 0..0);
        }
        TokenRefIter::new(tree, self.first_token..self.last_token + 1)
    }

    /// Finds the token at the given offset within this node.
    pub(crate) fn token_at_offset<'a>(
        &self,
        tree: &'a TreeInner,
        offset: TextSize,
    ) -> TokenAtOffset<TokenRef<'a>> {
        let range = self.text_range(tree);
        if self.is_empty() || !range.contains_inclusive(offset) {
            return TokenAtOffset::None;
        }

        let tokens = &tree.tokens[self.first_token as usize..=self.last_token as usize];
        let index = tokens.partition_point(|token| token.end <= offset);
        let index = self.first_token + index as u32;

        if index > self.last_token {
            // `offset` is the end of the node.
            return TokenAtOffset::Single(TokenRef { index: self.last_token, tree });
        }

        let second = TokenRef { index, tree };
        if index > self.first_token && second.start() == offset {
            TokenAtOffset::Between(TokenRef { index: index - 1, tree }, second)
        } else {
            TokenAtOffset::Single(second)
        }
    }
}
