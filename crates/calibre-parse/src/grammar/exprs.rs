use calibre_yellow::SyntaxKind::*;
use calibre_yellow::{Field, SyntaxSet};

use super::{
    RECOVERY, STATEMENT_FIRST, at_mutability, block, delimited, delimited_nonempty, items,
    mutability, statements_until, types,
};
use crate::parser::{CompletedMarker, Parser};
use crate::precedence::{self, InfixClass};

/// Tokens that can begin an expression.
pub(crate) const EXPR_FIRST: SyntaxSet = SyntaxSet::new([
    NAME,
    STRING,
    INT_NUMBER,
    FLOAT_NUMBER,
    IMAGINARY_NUMBER,
    RUNE,
    FN_KW,
    L_PAREN,
    L_BRACKET,
    L_BRACE,
    IF_KW,
    MATCH_KW,
    TRY_KW,
    MINUS,
    BANG,
]);

/// A top-level or scope-level statement.
pub(crate) fn statement(p: &mut Parser<'_>) {
    if statement_bp(p, precedence::STATEMENT).is_none() {
        p.error_recover("expected a statement", &RECOVERY);
    }
}

pub(crate) fn statement_bp(p: &mut Parser<'_>, min_bp: u8) -> Option<CompletedMarker> {
    match p.current() {
        LET_KW | CONST_KW => Some(items::var_declaration(p)),
        FOR_KW => Some(items::loop_declaration(p)),
        IMPL_KW => Some(items::impl_declaration(p)),
        TYPE_KW => Some(items::type_declaration(p)),
        BREAK_KW | CONTINUE_KW | RETURN_KW => Some(items::stop_statement(p)),
        _ => expr_bp(p, min_bp),
    }
}

/// A statement that must be present; reports an error otherwise.
pub(crate) fn required_statement(p: &mut Parser<'_>, min_bp: u8) -> Option<CompletedMarker> {
    let statement = statement_bp(p, min_bp);
    if statement.is_none() {
        p.error_recover("expected an expression", &RECOVERY);
    }
    statement
}

pub(crate) fn required_expr(p: &mut Parser<'_>, min_bp: u8) -> Option<CompletedMarker> {
    let expr = expr_bp(p, min_bp);
    if expr.is_none() {
        let message = if p.at_ts(&STATEMENT_FIRST) {
            "expected an expression, found a statement"
        } else {
            "expected an expression"
        };
        p.error_recover(message, &RECOVERY);
    }
    expr
}

pub(crate) fn at_expr_start(p: &Parser<'_>) -> bool {
    p.at_ts(&EXPR_FIRST)
}

pub(crate) fn expr_bp(p: &mut Parser<'_>, min_bp: u8) -> Option<CompletedMarker> {
    let mut lhs = prefix_expr(p)?;

    loop {
        let Some(level) = precedence::infix(p.current()) else {
            break;
        };
        if level.level < min_bp {
            break;
        }
        // A line break ends the expression, except before a pipe stage.
        if p.at_terminator() && level.class != InfixClass::Pipe {
            break;
        }

        lhs = match level.class {
            InfixClass::Binary => {
                let m = lhs.with_field(p, Field::Left).precede(p);
                p.bump_field(Some(Field::Operator));
                p.labelled(Field::Right, |p| required_expr(p, level.right_bp()));
                m.complete(p, BINARY_EXPRESSION)
            }
            InfixClass::TypeBinary => {
                let m = lhs.with_field(p, Field::Left).precede(p);
                p.bump_field(Some(Field::Operator));
                p.labelled(Field::Type, types::data_type);
                m.complete(p, TYPE_BINARY_EXPRESSION)
            }
            InfixClass::Special => {
                let m = lhs.with_field(p, Field::Left).precede(p);
                p.bump_field(Some(Field::Operator));
                p.labelled(Field::Type, |p| required_statement(p, level.right_bp()));
                m.complete(p, SPECIAL_BINARY_EXPRESSION)
            }
            InfixClass::Pipe => {
                let m = lhs.precede(p);
                while p.at(PIPE_GT) {
                    p.bump(PIPE_GT);
                    required_statement(p, level.right_bp());
                }
                m.complete(p, PIPE_EXPRESSION)
            }
            InfixClass::Assignment => {
                if !matches!(lhs.kind(p), IDENTIFIER | MEMBER_EXPRESSION) {
                    p.error("invalid assignment target");
                }
                let m = lhs.with_field(p, Field::Left).precede(p);
                p.bump_field(Some(Field::Operator));
                p.labelled(Field::Right, |p| required_statement(p, level.right_bp()));
                m.complete(p, ASSIGNMENT_EXPRESSION)
            }
        };
    }

    Some(lhs)
}

fn prefix_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    match p.current() {
        MINUS | BANG => {
            let m = p.start();
            p.bump_field(Some(Field::Operator));
            p.labelled(Field::Operand, |p| required_statement(p, precedence::UNARY));
            Some(m.complete(p, NOT_EXPRESSION))
        }
        TRY_KW => {
            let m = p.start();
            p.bump(TRY_KW);
            required_expr(p, precedence::PRIMARY);
            Some(m.complete(p, TRY_EXPRESSION))
        }
        _ => postfix_expr(p),
    }
}

fn postfix_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let mut lhs = primary_expr(p)?;
    loop {
        lhs = match p.current() {
            L_PAREN if !p.at_terminator() => call(p, lhs),
            L_BRACKET if !p.at_terminator() => member_expression(p, lhs),
            DOT => member_expression(p, lhs),
            _ => break,
        };
    }
    Some(lhs)
}

fn primary_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let kind = match p.current() {
        NAME => IDENTIFIER,
        STRING => STRING_LITERAL,
        INT_NUMBER => INT_LITERAL,
        FLOAT_NUMBER => FLOAT_LITERAL,
        IMAGINARY_NUMBER => IMAGINARY_LITERAL,
        RUNE => RUNE_LITERAL,
        FN_KW => return Some(func_expression(p)),
        L_PAREN => return Some(paren_or_tuple(p)),
        L_BRACKET => return Some(list_literal(p)),
        L_BRACE if p.nth(1) == NAME && matches!(p.nth(2), COLON | COMMA) => {
            return Some(object_expression(p));
        }
        L_BRACE => return Some(scope(p)),
        IF_KW => return Some(if_declaration(p)),
        MATCH_KW => return Some(match_declaration(p)),
        _ => return None,
    };

    let m = p.start();
    p.bump_any();
    Some(m.complete(p, kind))
}

/// `callee(args)`. A plain name is a direct call, anything else a call on the
/// value of an expression.
fn call(p: &mut Parser<'_>, callee: CompletedMarker) -> CompletedMarker {
    let kind = if callee.kind(p) == IDENTIFIER { CALL_EXPRESSION } else { CALL_NODE_EXPRESSION };
    let m = callee.with_field(p, Field::Caller).precede(p);
    argument_list(p);
    m.complete(p, kind)
}

fn argument_list(p: &mut Parser<'_>) {
    let m = p.start();
    delimited(p, L_PAREN, R_PAREN, "expected an argument", |p| {
        p.labelled(Field::Value, |p| statement_bp(p, precedence::STATEMENT)).is_some()
    });
    m.complete(p, ARGUMENT_LIST).with_field(p, Field::Args);
}

fn member_expression(p: &mut Parser<'_>, root: CompletedMarker) -> CompletedMarker {
    if root.kind(p) == IDENTIFIER {
        root.change_kind(p, TYPE_IDENTIFIER);
    }
    let m = root.with_field(p, Field::Root).precede(p);

    member(p);
    if p.at(L_BRACE) && !p.at_terminator() && at_member_key_value(p) {
        key_value(p);
        return m.complete(p, MEMBER_EXPRESSION);
    }

    while p.at(DOT) || (p.at(L_BRACKET) && !p.at_terminator()) {
        member(p);
    }
    m.complete(p, MEMBER_EXPRESSION)
}

/// `[index]`, `.name` or `.name(args)`.
fn member(p: &mut Parser<'_>) {
    let m = p.start();
    if p.eat(L_BRACKET) {
        required_expr(p, precedence::STATEMENT);
        p.expect(R_BRACKET);
    } else {
        p.bump(DOT);
        if p.at(NAME) {
            let name = p.start();
            p.bump(NAME);
            if p.at(L_PAREN) && !p.at_terminator() {
                let name = name.complete(p, IDENTIFIER).with_field(p, Field::Caller);
                let call = name.precede(p);
                argument_list(p);
                call.complete(p, CALL_EXPRESSION);
            } else {
                name.complete(p, FIELD_IDENTIFIER);
            }
        } else {
            p.error_recover("expected a field name", &RECOVERY);
        }
    }
    m.complete(p, MEMBER_EXPR_MEMBER);
}

/// After a member, `{ name: ...`, `{ name, ...` and `{ name }` start a
/// key-value list.
fn at_member_key_value(p: &Parser<'_>) -> bool {
    p.nth(1) == NAME && matches!(p.nth(2), COLON | COMMA | R_BRACE)
}

fn object_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    key_value(p);
    m.complete(p, OBJECT_EXPRESSION)
}

/// `{ key: value, shorthand, ... }`
fn key_value(p: &mut Parser<'_>) {
    let m = p.start();
    delimited(p, L_BRACE, R_BRACE, "expected a field", |p| {
        if !p.at(NAME) {
            return false;
        }
        let name = p.start();
        p.bump(NAME);
        let name = name.complete(p, FIELD_IDENTIFIER);
        if p.eat(COLON) {
            name.with_field(p, Field::Key);
            p.labelled(Field::Value, |p| required_statement(p, precedence::STATEMENT));
        } else {
            name.with_field(p, Field::Value);
        }
        true
    });
    m.complete(p, KEY_VALUE);
}

fn scope(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(L_BRACE);
    if p.at(R_BRACE) || p.at(EOF) {
        p.error("expected a statement");
    } else {
        let list = p.start();
        statements_until(p, R_BRACE);
        list.complete(p, STATEMENT_LIST);
    }
    p.expect(R_BRACE);
    m.complete(p, SCOPE)
}

/// `()` and `(a, b)` are tuples, `(a)` is a parenthesized statement.
fn paren_or_tuple(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(L_PAREN);
    if p.eat(R_PAREN) {
        return m.complete(p, TUPLE_LITERAL);
    }

    required_statement(p, precedence::STATEMENT);
    if !p.at(COMMA) {
        p.expect(R_PAREN);
        return m.complete(p, PARENS);
    }

    while p.eat(COMMA) {
        if p.at(R_PAREN) || required_statement(p, precedence::STATEMENT).is_none() {
            break;
        }
    }
    p.expect(R_PAREN);
    m.complete(p, TUPLE_LITERAL)
}

fn list_literal(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    delimited(p, L_BRACKET, R_BRACKET, "expected a list element", |p| {
        statement_bp(p, precedence::STATEMENT).is_some()
    });
    m.complete(p, LIST_LITERAL)
}

/// `fn (params) [async] [-> type] => body`
fn func_expression(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(FN_KW);
    if p.at(L_PAREN) {
        parameter_list(p);
    } else {
        p.error_recover("expected a parameter list", &RECOVERY);
    }
    if p.at(ASYNC_KW) {
        p.bump_field(Some(Field::Async));
    }
    if p.eat(THIN_ARROW) {
        p.labelled(Field::Result, types::data_type);
    }
    block(p, Field::Body);
    m.complete(p, FUNC_EXPRESSION)
}

fn parameter_list(p: &mut Parser<'_>) {
    let m = p.start();
    delimited(p, L_PAREN, R_PAREN, "expected a parameter", |p| {
        if !p.at(NAME) {
            return false;
        }
        parameter(p);
        true
    });
    m.complete(p, PARAMETER_LIST).with_field(p, Field::Parameters);
}

/// `name+ [: type] [= default]`
fn parameter(p: &mut Parser<'_>) {
    let m = p.start();
    while p.at(NAME) {
        let name = p.start();
        p.bump(NAME);
        name.complete(p, IDENTIFIER).with_field(p, Field::Name);
    }
    if p.eat(COLON) {
        p.labelled(Field::Type, types::data_type);
    }
    if p.eat(EQ) {
        p.labelled(Field::Default, |p| required_expr(p, precedence::STATEMENT));
    }
    m.complete(p, PARAMETER);
}

pub(crate) fn if_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(IF_KW);

    if p.at(LET_KW) {
        if_let_comparison(p);
    } else {
        let comparison = p.start();
        if required_expr(p, precedence::STATEMENT).is_some() {
            comparison.complete(p, IF_COMPARISON).with_field(p, Field::Comparison);
        } else {
            comparison.abandon(p);
        }
    }

    block(p, Field::Then);

    if p.eat(ELSE_KW) {
        if p.at(IF_KW) {
            if_declaration(p).with_field(p, Field::Otherwise);
        } else {
            block(p, Field::Otherwise);
        }
    }
    m.complete(p, IF_DECLARATION)
}

/// `let patterns [if guard]* <- [mutability] value`
fn if_let_comparison(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(LET_KW);
    or_list(p, Field::Patterns);
    conditionals(p);
    if p.expect(LEFT_ARROW) {
        if at_mutability(p) {
            mutability(p).with_field(p, Field::Mutability);
        }
        p.labelled(Field::Value, |p| required_statement(p, precedence::STATEMENT));
    }
    m.complete(p, IF_LET_COMPARISON).with_field(p, Field::Comparison);
}

/// Alternatives separated by `|`.
fn or_list(p: &mut Parser<'_>, field: Field) {
    let m = p.start();
    let start = p.position();
    while required_statement(p, precedence::OR_LIST_OPERAND).is_some() && p.eat(PIPE) {}

    if p.position() == start {
        m.abandon(p);
    } else {
        m.complete(p, OR_LIST).with_field(p, field);
    }
}

/// Zero or more `if guard` clauses.
fn conditionals(p: &mut Parser<'_>) {
    if !p.at(IF_KW) {
        return;
    }
    let m = p.start();
    while p.eat(IF_KW) {
        required_statement(p, precedence::STATEMENT);
    }
    m.complete(p, CONDITIONALS_LIST).with_field(p, Field::Conditionals);
}

/// `match [async] [mutability] [type] [= default] [-> return] { pattern, ... }`
fn match_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(MATCH_KW);

    if p.at(ASYNC_KW) {
        p.bump_field(Some(Field::Async));
    }
    if at_mutability(p) {
        mutability(p).with_field(p, Field::Mutability);
    }
    if types::at_type_start(p) {
        p.labelled(Field::Type, types::data_type);
    }
    if p.eat(EQ) {
        p.labelled(Field::Default, |p| required_statement(p, precedence::STATEMENT));
    }
    if p.eat(THIN_ARROW) {
        p.labelled(Field::Return, types::data_type);
    }

    if p.at(L_BRACE) {
        delimited_nonempty(p, L_BRACE, R_BRACE, "expected a match arm", match_pattern);
    } else {
        p.error_recover("expected `{`", &RECOVERY);
    }
    m.complete(p, MATCH_DECLARATION)
}

/// `values [if guard]* => body`
fn match_pattern(p: &mut Parser<'_>) -> bool {
    let m = p.start();
    let start = p.position();
    or_list(p, Field::Values);
    conditionals(p);
    block(p, Field::Body);

    if p.position() == start {
        m.abandon(p);
        return false;
    }
    m.complete(p, MATCH_PATTERN);
    true
}

