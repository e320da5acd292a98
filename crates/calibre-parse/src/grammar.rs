use calibre_yellow::SyntaxKind::{self, *};
use calibre_yellow::{Field, SyntaxSet};

use crate::parser::{CompletedMarker, Parser};
use crate::precedence;

pub(crate) mod exprs;
pub(crate) mod items;
mod types;

/// Keywords that begin a statement that is not an expression.
pub(crate) const STATEMENT_FIRST: SyntaxSet = SyntaxSet::new([
    LET_KW,
    CONST_KW,
    FOR_KW,
    IMPL_KW,
    TYPE_KW,
    BREAK_KW,
    CONTINUE_KW,
    RETURN_KW,
]);

pub(crate) const CLOSING: SyntaxSet = SyntaxSet::new([R_PAREN, R_BRACKET, R_BRACE]);

/// Tokens never swallowed into an `ERROR` node by local recovery.
pub(crate) const RECOVERY: SyntaxSet = STATEMENT_FIRST
    .union(&CLOSING)
    .union(&SyntaxSet::new([FAT_ARROW, COMMA, ELSE_KW, L_BRACE]));

const NAME_RECOVERY: SyntaxSet = RECOVERY.union(&SyntaxSet::new([EQ, COLON, L_PAREN]));

pub(crate) fn name_field(p: &mut Parser<'_>, kind: SyntaxKind, field: Field) -> bool {
    if p.at(NAME) {
        let m = p.start();
        p.bump(NAME);
        m.complete(p, kind).with_field(p, field);
        true
    } else {
        p.error_recover("expected a name", &NAME_RECOVERY);
        false
    }
}

/// `=> statement`
pub(crate) fn block(p: &mut Parser<'_>, field: Field) {
    if !p.at(FAT_ARROW) {
        p.error_recover("expected `=>`", &RECOVERY);
        return;
    }

    let m = p.start();
    p.bump(FAT_ARROW);
    exprs::required_statement(p, precedence::STATEMENT);
    m.complete(p, BLOCK).with_field(p, field);
}

pub(crate) fn at_mutability(p: &Parser<'_>) -> bool {
    p.at(AMP) || p.at(MUT_KW)
}

/// `&`, `&mut` or `mut`.
pub(crate) fn mutability(p: &mut Parser<'_>) -> CompletedMarker {
    debug_assert!(at_mutability(p));
    let m = p.start();
    if p.eat(AMP) {
        p.eat(MUT_KW);
    } else {
        p.bump(MUT_KW);
    }
    m.complete(p, MUTABILITY)
}

/// Parses `bra (element (delim element)* delim?)? ket`. `element` returns
/// `false` when nothing could be parsed, which ends the list.
pub(crate) fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    unexpected_delim_message: &'static str,
    element: impl FnMut(&mut Parser<'_>) -> bool,
) {
    delimited_list(p, bra, ket, unexpected_delim_message, false, element);
}

/// Like [`delimited`], but an empty list reports `message`.
pub(crate) fn delimited_nonempty(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    message: &'static str,
    element: impl FnMut(&mut Parser<'_>) -> bool,
) {
    delimited_list(p, bra, ket, message, true, element);
}

fn delimited_list(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    message: &'static str,
    required: bool,
    mut element: impl FnMut(&mut Parser<'_>) -> bool,
) {
    p.bump(bra);
    let errors = p.error_count();
    let mut elements = 0usize;

    while !p.at(ket) && !p.at(EOF) {
        if p.at(COMMA) {
            let m = p.start();
            p.error(message);
            p.bump(COMMA);
            m.complete(p, ERROR);
            continue;
        }

        let before = p.position();
        if !element(p) || p.position() == before {
            break;
        }
        elements += 1;

        if !p.eat(COMMA) {
            break;
        }
    }

    if required && elements == 0 && p.at(ket) && p.error_count() == errors {
        p.error(message);
    }
    p.expect(ket);
}

/// Statements up to `ket`, each wrapped for recovery.
pub(crate) fn statements_until(p: &mut Parser<'_>, ket: SyntaxKind) -> usize {
    let mut count = 0;
    while !p.at(ket) && !p.at(EOF) {
        statement_with_recovery(p, &SyntaxSet::new([ket]), exprs::statement);
        count += 1;
    }
    count
}

/// Runs `statement`. When it reported an error that no nested statement
/// already recovered from, the statement and the rest of its line become an
/// `ERROR` node so the next statement starts clean. Skipping stops at a
/// terminator or at one of `closing`.
pub(crate) fn statement_with_recovery(
    p: &mut Parser<'_>,
    closing: &SyntaxSet,
    statement: impl FnOnce(&mut Parser<'_>),
) {
    let m = p.start();
    let start = p.position();
    let errors = p.error_count();

    statement(p);

    if !p.has_unrecovered_errors(errors) {
        m.abandon(p);
        return;
    }

    if p.position() == start && !p.at(EOF) && !p.at_ts(closing) {
        p.bump_any();
    }

    let mut depth = 0usize;
    while !p.at(EOF) && !p.at_terminator() {
        match p.current() {
            L_PAREN | L_BRACKET | L_BRACE => depth += 1,
            kind if CLOSING.contains(kind) => {
                if depth == 0 && closing.contains(kind) {
                    break;
                }
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
        p.bump_any();
    }

    p.mark_recovered(errors);
    if p.position() == start {
        m.abandon(p);
    } else {
        tracing::trace!(statement_start = start, resumed_at = p.position(), "recovered statement");
        m.complete(p, ERROR);
    }
}
