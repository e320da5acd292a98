//! Incremental builder for the immutable syntax tree.

use std::mem;

use text_size::TextSize;

use crate::nodes::{AttachedTrivia, Node, Token, TreeInner};
use crate::{Field, NodeOrToken, SyntaxKind, SyntaxTree, TriviaPiece};

struct OpenNode {
    parent: Option<u32>,
    field: Option<Field>,
    kind: SyntaxKind,
    children: Vec<NodeOrToken<u32, u32>>,
    children_start: u32,
    children_len: u32,
    first_last_token: Option<(u32, u32)>,
}

/// Builds a `SyntaxTree` from parser events.
pub struct Builder {
    nodes: Vec<OpenNode>,
    node_children: Vec<NodeOrToken<u32, u32>>,
    tokens: Vec<Token>,
    text: Box<str>,

    node_children_pool: Vec<Vec<NodeOrToken<u32, u32>>>,
    opened: Vec<u32>,
    text_len: TextSize,
    last_token_index: u32,
}

impl Drop for Builder {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.opened.is_empty() {
            panic!("you should call `Builder::finish()`");
        }
    }
}

const DEFAULT_TREE_DEPTH: usize = 128;
const DEFAULT_TREE_SIZE: usize = 1024;
const DEFAULT_CHILDREN_LEN: usize = 10;

impl Builder {
    /// Creates a new builder for `text`.
    ///
    /// The internal token buffer is seeded with a fake token at index 0 to make
    /// token ranges uniform.
    pub fn new(text: &str) -> Self {
        let mut tokens = Vec::with_capacity(DEFAULT_TREE_SIZE);
        tokens.push(Token {
            kind: SyntaxKind::TOMBSTONE,
            field: None,
            attached_trivia: AttachedTrivia::NONE,
            end: TextSize::new(0),
            parent: 0,
        });
        Self {
            nodes: Vec::with_capacity(DEFAULT_TREE_SIZE),
            node_children: Vec::with_capacity(DEFAULT_TREE_SIZE),
            tokens,
            text: text.into(),

            node_children_pool: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            text_len: TextSize::new(0),
            last_token_index: 0,
        }
    }

    /// Retrieves a recycled node-children buffer or allocates a new one.
    fn new_node_children_vec(&mut self) -> Vec<NodeOrToken<u32, u32>> {
        self.node_children_pool.pop().unwrap_or_else(|| Vec::with_capacity(DEFAULT_CHILDREN_LEN))
    }

    /// Returns the most recently opened node.
    #[track_caller]
    fn last_opened(&self) -> u32 {
        *self.opened.last().expect("no opened nodes?")
    }

    /// Starts a new node of the given kind, labelled with `field` in its parent.
    pub fn start_node(&mut self, kind: SyntaxKind, field: Option<Field>) {
        let parent = self.opened.last().copied();
        assert!(parent.is_some() || self.nodes.is_empty(), "a tree has exactly one root");
        let new_node = u32::try_from(self.nodes.len()).expect("too many nodes");
        let children = self.new_node_children_vec();
        self.nodes.push(OpenNode {
            parent,
            field,
            kind,
            children,
            children_start: 0,
            children_len: 0,
            first_last_token: None,
        });
        if let Some(parent) = parent {
            self.nodes[parent as usize].children.push(NodeOrToken::Node(new_node));
        }
        self.opened.push(new_node);
    }

    /// Finishes the most recently started node.
    pub fn finish_node(&mut self) {
        let node = self.last_opened();
        self.opened.pop();
        let children_start = u32::try_from(self.node_children.len()).expect("too many children");
        let last_token_index = self.last_token_index;
        let node = &mut self.nodes[node as usize];
        if node.first_last_token.is_none() {
            // Empty nodes are anchored right after the last token seen so far.
            node.first_last_token = Some((last_token_index + 1, last_token_index));
        }
        let mut children = mem::take(&mut node.children);
        node.children_start = children_start;
        node.children_len = u32::try_from(children.len()).expect("too many children");
        self.node_children.append(&mut children);
        self.node_children_pool.push(children);
    }

    /// Adds a token with its leading and trailing trivia.
    pub fn token(
        &mut self,
        leading_trivia: impl ExactSizeIterator<Item = TriviaPiece>,
        kind: SyntaxKind,
        text_len: TextSize,
        trailing_trivia: impl ExactSizeIterator<Item = TriviaPiece>,
        field: Option<Field>,
    ) {
        let parent = self.last_opened();
        let trivia_token = |builder: &mut Self, piece: TriviaPiece| {
            let end = builder.push_text_len(piece.len);
            builder.tokens.push(Token {
                kind: piece.kind.syntax_kind(),
                field: None,
                attached_trivia: AttachedTrivia::NONE,
                end,
                parent,
            });
        };

        let first_token = self.tokens.len();
        for piece in leading_trivia {
            trivia_token(self, piece);
        }
        let leading_len = self.tokens.len() - first_token;

        let token = self.tokens.len();
        let end = self.push_text_len(text_len);
        self.tokens.push(Token {
            kind,
            field,
            attached_trivia: AttachedTrivia::new(leading_len != 0, false, leading_len),
            end,
            parent,
        });
        let token = u32::try_from(token).expect("too many tokens");
        self.nodes[parent as usize].children.push(NodeOrToken::Token(token));

        let trailing_start = self.tokens.len();
        for piece in trailing_trivia {
            trivia_token(self, piece);
        }
        let trailing_len = self.tokens.len() - trailing_start;
        if trailing_len != 0 {
            let has_leading = leading_len != 0;
            self.tokens[token as usize].attached_trivia =
                AttachedTrivia::new(has_leading, true, leading_len);
            self.tokens[trailing_start].attached_trivia =
                AttachedTrivia::new(false, false, trailing_len);
        }

        let first_token = u32::try_from(first_token).expect("too many tokens");
        let last_token = u32::try_from(self.tokens.len() - 1).expect("too many tokens");
        self.update_first_last_tokens(first_token, last_token);
        self.last_token_index = last_token;
    }

    fn push_text_len(&mut self, len: TextSize) -> TextSize {
        self.text_len += len;
        assert!(self.text.is_char_boundary(usize::from(self.text_len)));
        self.text_len
    }

    /// Updates token ranges for all open ancestor nodes.
    fn update_first_last_tokens(&mut self, first_token: u32, last_token: u32) {
        for &node in &self.opened {
            let node = &mut self.nodes[node as usize];
            match &mut node.first_last_token {
                // First token inside this node, so also first and last token.
                None => node.first_last_token = Some((first_token, last_token)),
                // There was already a token. It is the first token, but we're after it so (maybe)
                // we're last.
                Some((_f, l)) => *l = last_token,
            }
        }
    }

    /// Finishes building and returns the immutable `SyntaxTree`.
    pub fn finish(mut self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "unfinished nodes");
        assert!(!self.nodes.is_empty(), "tree without a root");
        debug_assert_eq!(usize::from(self.text_len), self.text.len(), "tokens must cover the text");

        let nodes = mem::take(&mut self.nodes)
            .into_iter()
            .map(|node| {
                let (first_token, last_token) = node.first_last_token.unwrap_or_default();
                Node {
                    parent: node.parent,
                    field: node.field,
                    kind: node.kind,
                    children_start: node.children_start,
                    children_len: node.children_len,
                    first_token,
                    last_token,
                }
            })
            .collect();

        let tree = TreeInner {
            text: mem::take(&mut self.text),
            tokens: mem::take(&mut self.tokens).into_boxed_slice(),
            nodes,
            children: mem::take(&mut self.node_children).into_boxed_slice(),
        };
        SyntaxTree { tree }
    }
}

#[cfg(test)]
mod tests {
    use text_size::{TextRange, TextSize};

    use super::Builder;
    use crate::SyntaxKind::*;
    use crate::{Field, NodeOrToken, SyntaxTree, TokenAtOffset, TriviaPiece, TriviaPieceKind};

    fn ws(len: u32) -> TriviaPiece {
        TriviaPiece::new(TriviaPieceKind::Whitespace, TextSize::new(len))
    }

    /// `a + b\n` as `BINARY_EXPRESSION(IDENTIFIER(a) + IDENTIFIER(b))`.
    fn binary() -> SyntaxTree {
        let mut builder = Builder::new("a + b\n");
        builder.start_node(SOURCE_FILE, None);
        builder.start_node(BINARY_EXPRESSION, None);
        builder.start_node(IDENTIFIER, Some(Field::Left));
        builder.token([].into_iter(), NAME, TextSize::new(1), [ws(1)].into_iter(), None);
        builder.finish_node();
        builder.token(
            [].into_iter(),
            PLUS,
            TextSize::new(1),
            [ws(1)].into_iter(),
            Some(Field::Operator),
        );
        builder.start_node(IDENTIFIER, Some(Field::Right));
        builder.token([].into_iter(), NAME, TextSize::new(1), [].into_iter(), None);
        builder.finish_node();
        builder.finish_node();
        let newline = TriviaPiece::new(TriviaPieceKind::Newline, TextSize::new(1));
        builder.token([newline].into_iter(), EOF, TextSize::new(0), [].into_iter(), None);
        builder.finish_node();
        builder.finish()
    }

    #[test]
    fn round_trips_text() {
        let tree = binary();
        let text: String = tree.tokens().map(|token| token.text_trimmed()).collect();
        assert_eq!(text, "a + b\n");
        assert_eq!(tree.root().text(), "a + b\n");
    }

    #[test]
    fn fields_label_children() {
        let tree = binary();
        let binary = tree.root().children().next().unwrap();
        assert_eq!(binary.kind(), BINARY_EXPRESSION);

        let left = binary.child_by_field(Field::Left).unwrap();
        assert_eq!(left.kind(), IDENTIFIER);
        assert_eq!(left.text_trimmed(), "a");

        let operator = binary.child_by_field(Field::Operator).unwrap();
        assert_eq!(operator.kind(), PLUS);

        let right = binary.child_by_field(Field::Right).unwrap();
        assert_eq!(right.trimmed_range(), TextRange::new(4.into(), 5.into()));
        assert!(binary.child_by_field(Field::Body).is_none());
    }

    #[test]
    fn trivia_is_attached() {
        let tree = binary();
        let plus = tree.tokens().find(|token| token.kind() == PLUS).unwrap();
        assert_eq!(plus.text(), "+ ");
        assert_eq!(plus.trailing_trivia().len(), 1);
        assert_eq!(plus.leading_trivia().len(), 0);

        let eof = tree.tokens().last().unwrap();
        assert_eq!(eof.kind(), EOF);
        assert_eq!(eof.leading_trivia().next().unwrap().kind(), NEWLINE);
        assert_eq!(eof.prev_token().unwrap().kind(), NEWLINE);
    }

    #[test]
    fn offsets_and_covering() {
        let tree = binary();
        let root = tree.root();
        match root.token_at_offset(TextSize::new(2)) {
            TokenAtOffset::Between(left, right) => {
                assert_eq!(left.kind(), WHITESPACE);
                assert_eq!(right.kind(), PLUS);
            }
            other => panic!("unexpected {other:?}"),
        }

        let covering = root.covering_element(TextRange::new(0.into(), 3.into())).unwrap();
        assert_eq!(covering.kind(), BINARY_EXPRESSION);

        let covering = root.covering_element(TextRange::new(4.into(), 5.into())).unwrap();
        assert!(matches!(covering, NodeOrToken::Token(token) if token.kind() == NAME));
        assert!(root.covering_element(TextRange::new(0.into(), 99.into())).is_none());
    }

    #[test]
    fn empty_nodes_have_empty_ranges() {
        let mut builder = Builder::new("x");
        builder.start_node(SOURCE_FILE, None);
        builder.token([].into_iter(), NAME, TextSize::new(1), [].into_iter(), None);
        builder.start_node(ERROR, None);
        builder.finish_node();
        builder.token([].into_iter(), EOF, TextSize::new(0), [].into_iter(), None);
        builder.finish_node();
        let tree = builder.finish();

        let error = tree.root().children().next().unwrap();
        assert_eq!(error.text_range(), TextRange::empty(1.into()));
        assert!(error.first_token().is_none());
    }

    #[test]
    fn dump_shows_fields() {
        let tree = binary();
        let dump = tree.debug_dump();
        assert!(dump.contains("  BINARY_EXPRESSION@0..5\n"), "{dump}");
        assert!(dump.contains("    left: IDENTIFIER@0..1\n"), "{dump}");
        assert!(dump.contains("    operator: PLUS@2..3 \"+\"\n"), "{dump}");
    }
}
