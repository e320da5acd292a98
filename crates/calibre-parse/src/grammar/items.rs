use calibre_yellow::SyntaxKind::*;
use calibre_yellow::{Field, SyntaxSet};

use super::exprs::{self, required_statement};
use super::{
    RECOVERY, block, delimited_nonempty, mutability, name_field, statement_with_recovery, types,
};
use crate::Cancelled;
use crate::parser::{CompletedMarker, Parser};
use crate::precedence;

const IMPL_CLOSING: SyntaxSet = SyntaxSet::new([R_BRACE]);

/// Parses the whole input. Returns the number of top-level statements.
pub(crate) fn source_file(p: &mut Parser<'_>) -> Result<usize, Cancelled> {
    let m = p.start();
    let mut statements = 0;

    while !p.at(EOF) {
        if p.is_cancelled() {
            m.abandon(p);
            return Err(Cancelled);
        }
        statement_with_recovery(p, &SyntaxSet::EMPTY, exprs::statement);
        statements += 1;
    }

    p.bump_eof();
    m.complete(p, SOURCE_FILE);
    Ok(statements)
}

/// `let [mut] name [: type] = value` or `const name [: type] = value`.
pub(crate) fn var_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if p.eat(LET_KW) {
        p.eat(MUT_KW);
    } else {
        p.bump(CONST_KW);
    }

    name_field(p, IDENTIFIER, Field::Name);
    if p.eat(COLON) {
        p.labelled(Field::Type, types::data_type);
    }
    if p.expect(EQ) {
        p.labelled(Field::Value, |p| required_statement(p, precedence::STATEMENT));
    }
    m.complete(p, VAR_DECLARATION)
}

/// `for loop_type => body`
pub(crate) fn loop_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(FOR_KW);
    loop_type(p);
    block(p, Field::Body);
    m.complete(p, LOOP_DECLARATION)
}

fn loop_type(p: &mut Parser<'_>) {
    let m = p.start();
    let start = p.position();

    if p.at(NAME) && p.nth(1) == IN_KW {
        let foreach = matches!(p.nth(2), AMP | MUT_KW);
        let header = p.start();
        name_field(p, IDENTIFIER, Field::Name);
        p.bump(IN_KW);
        if foreach {
            mutability(p).with_field(p, Field::Mutability);
        }
        p.labelled(Field::Value, |p| required_statement(p, precedence::STATEMENT));
        header.complete(p, if foreach { FOREACH_LOOP_TYPE } else { FOR_LOOP_TYPE });
    } else {
        required_statement(p, precedence::STATEMENT);
    }

    if p.position() == start {
        m.abandon(p);
    } else {
        m.complete(p, LOOP_TYPE).with_field(p, Field::LoopType);
    }
}

/// `impl Name { declarations }`
pub(crate) fn impl_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(IMPL_KW);
    name_field(p, TYPE_IDENTIFIER, Field::Name);

    if p.expect(L_BRACE) {
        while !p.at(R_BRACE) && !p.at(EOF) {
            statement_with_recovery(p, &IMPL_CLOSING, |p| {
                if p.at(LET_KW) || p.at(CONST_KW) {
                    var_declaration(p).with_field(p, Field::Functions);
                } else {
                    p.error_recover("expected a `let` or `const` declaration", &RECOVERY);
                }
            });
        }
        p.expect(R_BRACE);
    }
    m.complete(p, IMPL_DECLARATION)
}

/// `type Name = enum {...} | struct [...] | data_type`
pub(crate) fn type_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(TYPE_KW);
    name_field(p, FIELD_IDENTIFIER, Field::Name);

    if p.expect(EQ) {
        match p.current() {
            ENUM_KW => enum_declaration(p),
            // `struct?` and `struct!` are type expressions over the bare keyword.
            STRUCT_KW if !matches!(p.nth(1), QUESTION | BANG) => struct_declaration(p),
            _ => {
                types::data_type(p);
            }
        }
    }
    m.complete(p, TYPE_DECLARATION)
}

fn enum_declaration(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(ENUM_KW);
    if p.at(L_BRACE) {
        delimited_nonempty(p, L_BRACE, R_BRACE, "expected an enum member", |p| {
            if !p.at(NAME) {
                return false;
            }
            let member = p.start();
            name_field(p, FIELD_IDENTIFIER, Field::Name);
            if at_key_type_list(p) {
                key_type_list(p);
            }
            member.complete(p, ENUM_MEMBER_DECLARATION);
            true
        });
    } else {
        p.error_recover("expected `{`", &RECOVERY);
    }
    m.complete(p, ENUM_DECLARATION);
}

fn struct_declaration(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(STRUCT_KW);
    if at_key_type_list(p) {
        key_type_list(p);
    }
    m.complete(p, STRUCT_DECLARATION);
}

fn at_key_type_list(p: &Parser<'_>) -> bool {
    (p.at(L_BRACE) || p.at(L_PAREN)) && !p.at_terminator()
}

/// `{ name [: [type] data_type], ... }` or `( data_type, ... )`.
fn key_type_list(p: &mut Parser<'_>) {
    let m = p.start();
    if p.at(L_BRACE) {
        delimited_nonempty(p, L_BRACE, R_BRACE, "expected a field", |p| {
            if !p.at(NAME) {
                return false;
            }
            name_field(p, IDENTIFIER, Field::Name);
            if p.eat(COLON) {
                p.eat(TYPE_KW);
                p.labelled(Field::Types, types::data_type);
            }
            true
        });
    } else {
        delimited_nonempty(p, L_PAREN, R_PAREN, "expected a type", |p| {
            if !types::at_type_start(p) {
                return false;
            }
            p.labelled(Field::Types, types::data_type);
            true
        });
    }
    m.complete(p, KEY_TYPE_LIST);
}

/// `break`, `continue` or `return [value]`.
pub(crate) fn stop_statement(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    if p.eat(RETURN_KW) {
        if !p.at_terminator() && exprs::at_expr_start(p) {
            exprs::required_expr(p, precedence::STATEMENT);
        }
    } else {
        p.bump_any();
    }
    m.complete(p, STOP_STATEMENT)
}
