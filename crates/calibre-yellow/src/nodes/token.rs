//! Token storage and trivia attachment helpers.

use std::ops::Range;

use text_size::{TextRange, TextSize};

use super::tree::TreeInner;
use crate::{Field, SyntaxKind};

/// Raw token stored in the tree arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: SyntaxKind,
    pub(crate) field: Option<Field>,
    pub(crate) attached_trivia: AttachedTrivia,
    pub(crate) end: TextSize,
    pub(crate) parent: u32,
}

/// Compact encoding for trivia attachment metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AttachedTrivia {
    /// Encodes leading/trailing presence and trivia length in a single `u32`.
    ///
    /// Layout:
    /// - bit 0: has leading trivia
    /// - bit 1: has trailing trivia
    /// - bits 2..: trivia length (leading for real tokens, trailing for first
    ///   trailing token)
    raw: u32,
}

impl AttachedTrivia {
    const MAX_TRIVIA_LEN: usize = (1 << (u32::BITS - 2)) - 1;
    pub(crate) const NONE: Self = Self { raw: 0 };

    #[inline]
    pub(crate) fn new(
        has_leading_trivia: bool,
        has_trailing_trivia: bool,
        trivia_len: usize,
    ) -> Self {
        assert!(trivia_len <= Self::MAX_TRIVIA_LEN);
        Self {
            raw: ((trivia_len << 2)
                | (usize::from(has_trailing_trivia) << 1)
                | usize::from(has_leading_trivia)) as u32,
        }
    }

    #[inline]
    pub(crate) fn has_leading_trivia(self) -> bool {
        (self.raw & 0b01) != 0
    }

    #[inline]
    pub(crate) fn has_trailing_trivia(self) -> bool {
        (self.raw & 0b10) != 0
    }

    #[inline]
    pub(crate) fn trivia_len(self) -> usize {
        (self.raw >> 2) as usize
    }
}

/// Index of a real token (never the sentinel at 0).
#[derive(Clone, Copy)]
pub(crate) struct TokenRef<'a> {
    pub(crate) index: u32,
    pub(crate) tree: &'a TreeInner,
}

impl PartialEq for TokenRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && std::ptr::eq(self.tree, other.tree)
    }
}

impl Eq for TokenRef<'_> {}

impl<'a> TokenRef<'a> {
    #[inline]
    pub(crate) fn get(self) -> &'a Token {
        &self.tree.tokens[self.index as usize]
    }

    #[inline]
    pub(crate) fn start(self) -> TextSize {
        self.tree.tokens[self.index as usize - 1].end
    }

    #[inline]
    pub(crate) fn end(self) -> TextSize {
        self.get().end
    }

    #[inline]
    pub(crate) fn text_range(self) -> TextRange {
        TextRange::new(self.start(), self.end())
    }

    #[inline]
    pub(crate) fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    #[inline]
    pub(crate) fn prev_token(self) -> Option<Self> {
        (self.index > 1).then(|| Self { index: self.index - 1, tree: self.tree })
    }

    #[inline]
    pub(crate) fn next_token(self) -> Option<Self> {
        let next = self.index + 1;
        ((next as usize) < self.tree.tokens.len()).then_some(Self { index: next, tree: self.tree })
    }

    #[inline]
    pub(crate) fn leading_trivia(self) -> TokenRefIter<'a> {
        let attached = self.get().attached_trivia;
        if !attached.has_leading_trivia() {
            return TokenRefIter::empty(self.tree);
        }

        let len = attached.trivia_len() as u32;
        TokenRefIter { tree: self.tree, range: self.index - len..self.index }
    }

    #[inline]
    pub(crate) fn trailing_trivia(self) -> TokenRefIter<'a> {
        if !self.get().attached_trivia.has_trailing_trivia() {
            return TokenRefIter::empty(self.tree);
        }

        let start = self.index + 1;
        let len = self.tree.tokens[start as usize].attached_trivia.trivia_len() as u32;
        TokenRefIter { tree: self.tree, range: start..start + len }
    }

    #[inline]
    pub(crate) fn parent(self) -> u32 {
        self.get().parent
    }
}

/// Iterator over a contiguous run of tokens.
#[derive(Clone)]
pub(crate) struct TokenRefIter<'a> {
    tree: &'a TreeInner,
    range: Range<u32>,
}

impl<'a> TokenRefIter<'a> {
    #[inline]
    pub(crate) fn new(tree: &'a TreeInner, range: Range<u32>) -> Self {
        Self { tree, range }
    }

    #[inline]
    fn empty(tree: &'a TreeInner) -> Self {
        Self { tree, range: 0..0 }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.range.len()
    }
}

impl<'a> Iterator for TokenRefIter<'a> {
    type Item = TokenRef<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let index = self.range.next()?;
        Some(TokenRef { index, tree: self.tree })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for TokenRefIter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.range.next_back()?;
        Some(TokenRef { index, tree: self.tree })
    }
}

#[cfg(test)]
mod tests {
    use super::AttachedTrivia;

    #[test]
    fn attached_trivia_packs_flags_and_len() {
        let trivia = AttachedTrivia::new(true, false, 7);
        assert!(trivia.has_leading_trivia());
        assert!(!trivia.has_trailing_trivia());
        assert_eq!(trivia.trivia_len(), 7);

        let trivia = AttachedTrivia::new(false, true, 0);
        assert!(!trivia.has_leading_trivia());
        assert!(trivia.has_trailing_trivia());
        assert_eq!(AttachedTrivia::NONE.trivia_len(), 0);
    }
}
