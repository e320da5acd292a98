use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};

use calibre_errors::Diagnostic;
use calibre_tokenizer::Tokenizer;
use calibre_yellow::SyntaxKind::{self, *};
use calibre_yellow::{Builder, Field, SyntaxSet, SyntaxTree};
use drop_bomb::DropBomb;
use text_size::TextRange;

const STEP_LIMIT: u32 = 1_000_000;

pub(crate) struct Parser<'t> {
    tokenizer: Tokenizer<'t>,
    /// Index of the current raw token.
    pos: usize,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
    /// Parallel to `diagnostics`: whether each one is already enclosed by a
    /// recovered `ERROR` node.
    recovered: Vec<bool>,
    steps: Cell<u32>,
    cancel: Option<&'t AtomicBool>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(text: &'t str, cancel: Option<&'t AtomicBool>) -> Self {
        let mut tokenizer = Tokenizer::new(text);
        loop {
            let index = tokenizer.next_token_index();
            if tokenizer.token(index).kind == EOF {
                break;
            }
        }

        Self {
            tokenizer,
            pos: 0,
            events: Vec::new(),
            diagnostics: Vec::new(),
            recovered: Vec::new(),
            steps: Cell::new(0),
            cancel,
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn raw_index(&self, n: usize) -> usize {
        if cfg!(debug_assertions) {
            let steps = self.steps.get();
            assert!(steps <= STEP_LIMIT, "the parser seems stuck");
            self.steps.set(steps + 1);
        }
        (self.pos + n).min(self.tokenizer.len() - 1)
    }

    /// Kind of the `n`th raw token ahead, without gluing.
    pub(crate) fn nth_raw(&self, n: usize) -> SyntaxKind {
        self.tokenizer.token(self.raw_index(n)).kind
    }

    /// The current token, gluing `>` with adjacent `>` and `=` into one
    /// operator. Returns the kind and the number of raw tokens it spans.
    fn current_glued(&self) -> (SyntaxKind, usize) {
        let kind = self.nth_raw(0);
        if kind != GT {
            return (kind, 1);
        }

        let joint = |n: usize| self.tokenizer.is_joint_to_previous(self.raw_index(n));
        match self.nth_raw(1) {
            GT if joint(1) => {
                if self.nth_raw(2) == EQ && joint(2) {
                    (SHREQ, 3)
                } else {
                    (SHR, 2)
                }
            }
            EQ if joint(1) => (GTEQ, 2),
            _ => (GT, 1),
        }
    }

    pub(crate) fn current(&self) -> SyntaxKind {
        self.current_glued().0
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        if n == 0 { self.current() } else { self.nth_raw(n) }
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_ts(&self, set: &SyntaxSet) -> bool {
        set.contains(self.current())
    }

    /// `true` when a newline or `;` separates the current token from the
    /// previous one, or at the end of input.
    pub(crate) fn at_terminator(&self) -> bool {
        self.tokenizer.has_terminator_before(self.raw_index(0))
    }

    pub(crate) fn current_range(&self) -> TextRange {
        let (_, n_raw) = self.current_glued();
        let first = self.tokenizer.token(self.raw_index(0)).range;
        let last = self.tokenizer.token(self.raw_index(n_raw - 1)).range;
        first.cover(last)
    }

    pub(crate) fn current_text(&self) -> &'t str {
        &self.tokenizer.text()[self.current_range()]
    }

    /// Number of tokens consumed so far.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Number of diagnostics reported so far.
    pub(crate) fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// `true` if a diagnostic reported at or after `since` is not yet
    /// enclosed by a recovered statement.
    pub(crate) fn has_unrecovered_errors(&self, since: usize) -> bool {
        self.recovered[since..].contains(&false)
    }

    /// Marks every diagnostic from `since` onward as recovered.
    pub(crate) fn mark_recovered(&mut self, since: usize) {
        self.recovered[since..].fill(true);
    }

    pub(crate) fn bump_any(&mut self) {
        self.bump_field(None);
    }

    pub(crate) fn bump(&mut self, kind: SyntaxKind) {
        debug_assert_eq!(self.current(), kind);
        self.bump_any();
    }

    pub(crate) fn bump_field(&mut self, field: Option<Field>) {
        let (kind, n_raw) = self.current_glued();
        self.do_bump(kind, n_raw, field);
    }

    /// Consumes the current raw token as `kind`, used for contextual keywords
    /// and for a lone `>` closing a generic list.
    pub(crate) fn bump_remap(&mut self, kind: SyntaxKind, field: Option<Field>) {
        self.do_bump(kind, 1, field);
    }

    fn do_bump(&mut self, kind: SyntaxKind, n_raw: usize, field: Option<Field>) {
        if self.nth_raw(0) == EOF {
            return;
        }
        self.pos += n_raw;
        self.steps.set(0);
        self.events.push(Event::Token { kind, n_raw: n_raw as u8, field });
    }

    /// Consumes the final `EOF` token so that trailing trivia lands in the tree.
    pub(crate) fn bump_eof(&mut self) {
        debug_assert_eq!(self.nth_raw(0), EOF);
        self.events.push(Event::Token { kind: EOF, n_raw: 1, field: None });
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.bump_any();
        true
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let expected = kind.text().map_or_else(|| format!("{kind:?}"), |text| format!("`{text}`"));
        self.error(format!("expected {expected}"));
        false
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let range = self.current_range();
        self.diagnostics.push(Diagnostic::error(message, range));
        self.recovered.push(false);
    }

    /// Reports `message` and wraps the current token in an `ERROR` node,
    /// unless the token belongs to `recovery` or starts a new line.
    pub(crate) fn error_recover(&mut self, message: &str, recovery: &SyntaxSet) {
        self.error(message);
        if self.at(EOF) || self.at_ts(recovery) || self.at_terminator() {
            return;
        }
        let m = self.start();
        self.bump_any();
        m.complete(self, ERROR);
    }

    /// Runs `parse` and labels the node it produced with `field`.
    pub(crate) fn labelled(
        &mut self,
        field: Field,
        parse: impl FnOnce(&mut Self) -> Option<CompletedMarker>,
    ) -> Option<CompletedMarker> {
        let marker = parse(self)?;
        Some(marker.with_field(self, field))
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn finish(self) -> (SyntaxTree, Vec<Diagnostic>) {
        let Parser { tokenizer, mut events, mut diagnostics, .. } = self;
        let mut builder = Builder::new(tokenizer.text());
        let mut forward_parents = Vec::new();
        let mut raw = 0usize;

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent, field } => {
                    if kind == TOMBSTONE {
                        continue;
                    }

                    forward_parents.push((kind, field));
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent, field } => {
                                if kind != TOMBSTONE {
                                    forward_parents.push((kind, field));
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for (kind, field) in forward_parents.drain(..).rev() {
                        builder.start_node(kind, field);
                    }
                }
                Event::Finish => builder.finish_node(),
                Event::Token { kind, n_raw, field } => {
                    let first = raw;
                    let last = raw + usize::from(n_raw) - 1;
                    raw = last + 1;

                    let range = tokenizer.token(first).range.cover(tokenizer.token(last).range);
                    builder.token(
                        tokenizer.leading_trivia(first).iter().copied(),
                        kind,
                        range.len(),
                        tokenizer.trailing_trivia(last).iter().copied(),
                        field,
                    );
                }
            }
        }

        diagnostics.extend(
            tokenizer.errors().iter().map(|error| Diagnostic::error(&error.message, error.range)),
        );
        diagnostics.sort_by_key(|diagnostic| diagnostic.range().start());

        (builder.finish(), diagnostics)
    }
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32>, field: Option<Field> },
    Token { kind: SyntaxKind, n_raw: u8, field: Option<Field> },
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Event::Start { kind: TOMBSTONE, forward_parent: None, field: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Self {
        Self { position: pos, bomb: DropBomb::new("Marker must be either completed or abandoned") }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position)
    }

    /// Drops the node. Its children are attached to the enclosing node.
    pub(crate) fn abandon(mut self, _p: &mut Parser<'_>) {
        self.bomb.defuse();
    }
}

#[derive(Clone, Copy)]
pub(crate) struct CompletedMarker {
    pos: u32,
}

impl CompletedMarker {
    fn new(pos: u32) -> Self {
        Self { pos }
    }

    pub(crate) fn kind(self, p: &Parser<'_>) -> SyntaxKind {
        match &p.events[self.pos as usize] {
            Event::Start { kind, .. } => *kind,
            _ => unreachable!(),
        }
    }

    pub(crate) fn with_field(self, p: &mut Parser<'_>, field: Field) -> Self {
        match &mut p.events[self.pos as usize] {
            Event::Start { field: slot, .. } => *slot = Some(field),
            _ => unreachable!(),
        }
        self
    }

    pub(crate) fn change_kind(self, p: &mut Parser<'_>, kind: SyntaxKind) -> Self {
        match &mut p.events[self.pos as usize] {
            Event::Start { kind: slot, .. } => *slot = kind,
            _ => unreachable!(),
        }
        self
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
