use calibre_yellow::SyntaxKind::*;
use calibre_yellow::{Field, SyntaxKind, SyntaxSet};

use super::{RECOVERY, delimited};
use crate::parser::{CompletedMarker, Parser};

const TYPE_FIRST: SyntaxSet = SyntaxSet::new([NAME, STRUCT_KW, LT, BANG, FN_KW]);

pub(crate) fn at_type_start(p: &Parser<'_>) -> bool {
    p.at_ts(&TYPE_FIRST)
}

/// A type atom followed by `?`, `!` or `!atom` suffixes on the same line.
/// Each suffix wraps everything before it in a new `DATA_TYPE`.
pub(crate) fn data_type(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let Some(mut lhs) = type_atom(p) else {
        p.error_recover("expected a type", &RECOVERY);
        return None;
    };

    while !p.at_terminator() {
        let kind = p.nth_raw(0);
        if !matches!(kind, QUESTION | BANG) {
            break;
        }
        let m = lhs.precede(p);
        p.bump(kind);
        if kind == BANG && !p.at_terminator() && at_type_start(p) && !p.at(BANG) {
            type_atom(p);
        }
        lhs = m.complete(p, DATA_TYPE);
    }

    Some(lhs)
}

fn type_atom(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    match p.nth_raw(0) {
        NAME => match SyntaxKind::from_contextual_keyword(p.current_text()) {
            Some(LIST_KW) => {
                p.bump_remap(LIST_KW, None);
                if p.nth_raw(0) == LT && !p.at_terminator() {
                    p.bump(LT);
                    p.labelled(Field::Types, data_type);
                    expect_closing_angle(p);
                }
            }
            Some(keyword) => p.bump_remap(keyword, None),
            None => {
                let name = p.start();
                p.bump(NAME);
                name.complete(p, TYPE_IDENTIFIER);
            }
        },
        STRUCT_KW => p.bump(STRUCT_KW),
        LT => {
            p.bump(LT);
            while p.labelled(Field::Types, data_type).is_some() && p.eat(COMMA) {}
            expect_closing_angle(p);
        }
        BANG => {
            p.bump(BANG);
            if type_atom(p).is_none() {
                p.error_recover("expected a type", &RECOVERY);
            }
        }
        FN_KW => {
            p.bump(FN_KW);
            if p.at(L_PAREN) {
                delimited(p, L_PAREN, R_PAREN, "expected a parameter type", |p| {
                    at_type_start(p) && p.labelled(Field::Parameters, data_type).is_some()
                });
            } else {
                p.error_recover("expected `(`", &RECOVERY);
            }
            if p.expect(THIN_ARROW) {
                p.labelled(Field::Return, data_type);
            }
        }
        _ => {
            m.abandon(p);
            return None;
        }
    }
    Some(m.complete(p, DATA_TYPE))
}

/// Consumes a single raw `>`, so `list<list<int>>` closes twice instead of
/// seeing a shift operator.
fn expect_closing_angle(p: &mut Parser<'_>) {
    if p.nth_raw(0) == GT {
        p.bump_remap(GT, None);
    } else {
        p.error("expected `>`");
    }
}
