use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use calibre_tokenizer::Tokenizer;
use calibre_yellow::ast::{self, AstNode as _};
use calibre_yellow::{Field, SyntaxKind, SyntaxNode};
use expect_test::expect_file;
use proptest::prelude::*;

use crate::{Cancelled, parse, parse_cancellable, tokenize};

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TestCase {
    input: PathBuf,
    expected: PathBuf,
    text: String,
}

impl TestCase {
    fn list() -> Vec<Self> {
        let test_data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");

        let mut cases = fs::read_dir(&test_data_dir)
            .unwrap_or_else(|err| {
                panic!("Cannot read directory {}: {err}", test_data_dir.display())
            })
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? == "calibre" {
                    let expected = path.with_extension("ir");
                    let text = fs::read_to_string(&path).ok()?;
                    Some(Self { input: path, expected, text })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        cases.sort();
        cases
    }
}

#[test]
fn parse_test_data() {
    let test_cases = TestCase::list();
    assert!(!test_cases.is_empty());

    for case in test_cases {
        let parse = parse(&case.text);
        assert_eq!(parse.root().text(), case.text, "{}", case.input.display());
        expect_file![&case.expected].assert_eq(&parse.debug_dump());
    }
}

/// The only top-level statement of `text`, which must parse cleanly.
fn statement(text: &str) -> (crate::Parse, usize) {
    let parse = parse(text);
    assert!(!parse.has_errors(), "{text:?}: {:?}", parse.errors());
    let count = parse.source_file().statements().count();
    (parse, count)
}

fn first(parse: &crate::Parse) -> SyntaxNode<'_> {
    parse.source_file().statements().next().expect("no statement")
}

fn child(node: SyntaxNode<'_>, field: Field) -> SyntaxNode<'_> {
    node.children_by_field(field)
        .find_map(|child| child.into_node())
        .unwrap_or_else(|| panic!("{node:?} has no `{}`", field.name()))
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let (parse, count) = statement("a + b * c");
    assert_eq!(count, 1);
    let sum = first(&parse);
    assert_eq!(sum.kind(), SyntaxKind::BINARY_EXPRESSION);
    assert_eq!(child(sum, Field::Left).text_trimmed(), "a");
    let product = child(sum, Field::Right);
    assert_eq!(product.kind(), SyntaxKind::BINARY_EXPRESSION);
    assert_eq!(product.text_trimmed(), "b * c");
}

#[test]
fn power_and_range_are_left_associative() {
    for (text, left) in [("a ** b ** c", "a ** b"), ("a..b..c", "a..b")] {
        let (parse, _) = statement(text);
        let outer = first(&parse);
        assert_eq!(outer.kind(), SyntaxKind::BINARY_EXPRESSION);
        assert_eq!(child(outer, Field::Left).text_trimmed(), left, "{text}");
        assert_eq!(child(outer, Field::Right).text_trimmed(), "c", "{text}");
    }
}

#[test]
fn chained_assignment_nests_to_the_right() {
    let (parse, _) = statement("a = b = c");
    let outer = ast::AssignmentExpression::cast(first(&parse)).unwrap();
    assert_eq!(outer.left().unwrap().text_trimmed(), "a");
    let inner = ast::AssignmentExpression::cast(outer.right().unwrap()).unwrap();
    assert_eq!(inner.left().unwrap().text_trimmed(), "b");
    assert_eq!(inner.right().unwrap().text_trimmed(), "c");
}

#[test]
fn assignment_needs_a_name_or_member_target() {
    let parse = parse("a + b = c");
    let messages = parse.errors().iter().map(|error| error.message()).collect::<Vec<_>>();
    assert_eq!(messages, ["invalid assignment target"]);
}

#[test]
fn parens_and_tuples() {
    let cases = [
        ("()", SyntaxKind::TUPLE_LITERAL, 0),
        ("(1)", SyntaxKind::PARENS, 1),
        ("(1,)", SyntaxKind::TUPLE_LITERAL, 1),
        ("(1, 2)", SyntaxKind::TUPLE_LITERAL, 2),
    ];
    for (text, kind, elements) in cases {
        let (parse, _) = statement(text);
        let node = first(&parse);
        assert_eq!(node.kind(), kind, "{text}");
        assert_eq!(node.children().count(), elements, "{text}");
    }
}

#[test]
fn if_let_chain_nests_in_otherwise() {
    let text = "if let x <- a => 1 else if let y <- b => 2 else => 3";
    let (parse, _) = statement(text);
    let outer = ast::IfDeclaration::cast(first(&parse)).unwrap();
    assert_eq!(outer.comparison().unwrap().kind(), SyntaxKind::IF_LET_COMPARISON);

    let inner = ast::IfDeclaration::cast(outer.otherwise().unwrap()).unwrap();
    let comparison = ast::IfLetComparison::cast(inner.comparison().unwrap()).unwrap();
    assert_eq!(comparison.value().unwrap().text_trimmed(), "b");
    assert_eq!(comparison.patterns().unwrap().alternatives().count(), 1);

    let last = inner.otherwise().unwrap();
    assert_eq!(last.kind(), SyntaxKind::BLOCK);
    assert_eq!(last.text_trimmed(), "=> 3");
}

#[test]
fn or_list_separates_alternatives() {
    let (parse, _) = statement("match { A | B(x) | c => 1 }");
    let match_ = ast::MatchDeclaration::cast(first(&parse)).unwrap();
    let pattern = match_.patterns().next().unwrap();
    let alternatives = pattern.values().unwrap().alternatives().map(|alt| alt.kind());
    assert_eq!(
        alternatives.collect::<Vec<_>>(),
        [SyntaxKind::IDENTIFIER, SyntaxKind::CALL_EXPRESSION, SyntaxKind::IDENTIFIER]
    );
}

#[test]
fn nested_generic_closes_on_split_angles() {
    let (parse, _) = statement("let xs: list<list<int>> = []");
    let declaration = ast::VarDeclaration::cast(first(&parse)).unwrap();
    let outer = declaration.ty().unwrap();
    let inner = outer.types().next().unwrap();
    assert_eq!(inner.syntax().text_trimmed(), "list<int>");
    assert_eq!(inner.types().next().unwrap().syntax().text_trimmed(), "int");
}

#[test]
fn shift_operators_still_glue_in_expressions() {
    let (parse, _) = statement("a >> b");
    let node = ast::BinaryExpression::cast(first(&parse)).unwrap();
    assert_eq!(node.operator().unwrap().kind(), SyntaxKind::SHR);

    let (parse, _) = statement("a >>= 1");
    let node = ast::AssignmentExpression::cast(first(&parse)).unwrap();
    assert_eq!(node.operator().unwrap().kind(), SyntaxKind::SHREQ);

    let parse = crate::parse("a > > b");
    assert_eq!(parse.errors()[0].message(), "expected an expression");
}

#[test]
fn direct_and_node_calls() {
    let (parse, _) = statement("f(1)");
    assert_eq!(first(&parse).kind(), SyntaxKind::CALL_EXPRESSION);

    let (parse, _) = statement("(f)(1)");
    let call = ast::CallNodeExpression::cast(first(&parse)).unwrap();
    assert_eq!(call.caller().unwrap().kind(), SyntaxKind::PARENS);
    assert_eq!(call.args().unwrap().values().count(), 1);
}

#[test]
fn call_does_not_cross_a_newline() {
    let (_, count) = statement("f\n(1)");
    assert_eq!(count, 2);
}

#[test]
fn infix_does_not_cross_a_newline_but_pipe_does() {
    let (_, count) = statement("a\n- b");
    assert_eq!(count, 2);

    let (parse, count) = statement("a\n|> b\n|> c");
    assert_eq!(count, 1);
    let pipe = ast::PipeExpression::cast(first(&parse)).unwrap();
    assert_eq!(pipe.stages().count(), 3);
}

#[test]
fn statements_need_no_separator() {
    let (_, count) = statement("let a = 1 let b = 2; let c = 3");
    assert_eq!(count, 3);
}

#[test]
fn object_versus_scope() {
    let (parse, _) = statement("{ a: 1, b }");
    let object = ast::ObjectExpression::cast(first(&parse)).unwrap();
    let entries = object
        .key_value()
        .unwrap()
        .entries()
        .map(|(key, value)| (key.map(|key| key.text_trimmed()), value.text_trimmed()))
        .collect::<Vec<_>>();
    assert_eq!(entries, [(Some("a"), "1"), (None, "b")]);

    let (parse, _) = statement("{ a }");
    assert_eq!(first(&parse).kind(), SyntaxKind::SCOPE);
}

#[test]
fn member_with_key_value_payload() {
    let (parse, _) = statement("Shape.Circle { radius: 1 }");
    let member = ast::MemberExpression::cast(first(&parse)).unwrap();
    assert_eq!(member.root().unwrap().kind(), SyntaxKind::TYPE_IDENTIFIER);
    assert_eq!(member.members().count(), 2);
    assert!(member.syntax().children().any(|child| child.kind() == SyntaxKind::KEY_VALUE));
}

#[test]
fn return_value_is_optional() {
    let (parse, count) = statement("fn() => { return\nreturn 1 }");
    assert_eq!(count, 1);
    let stops = parse
        .root()
        .preorder()
        .filter_map(|event| match event {
            calibre_yellow::WalkEvent::Enter(node) if node.kind() == SyntaxKind::STOP_STATEMENT => {
                Some(node.text_trimmed())
            }
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(stops, ["return", "return 1"]);
}

#[test]
fn loop_types() {
    let cases = [
        ("for x in xs => x", SyntaxKind::FOR_LOOP_TYPE),
        ("for x in &mut xs => x", SyntaxKind::FOREACH_LOOP_TYPE),
        ("for running => step()", SyntaxKind::IDENTIFIER),
    ];
    for (text, kind) in cases {
        let (parse, _) = statement(text);
        let declaration = ast::LoopDeclaration::cast(first(&parse)).unwrap();
        assert_eq!(declaration.loop_type().unwrap().kind().unwrap().kind(), kind, "{text}");
    }
}

#[test]
fn error_containment() {
    let parse = parse("let a = 1\nlet = 2\nlet c = 3");
    let kinds = parse.source_file().statements().map(|node| node.kind()).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [SyntaxKind::VAR_DECLARATION, SyntaxKind::ERROR, SyntaxKind::VAR_DECLARATION]
    );

    let clean = crate::parse("let a = 1\nlet c = 3");
    let statements = |parse: &crate::Parse| {
        parse
            .source_file()
            .statements()
            .filter(|node| node.kind() != SyntaxKind::ERROR)
            .map(|node| node.text_trimmed().to_owned())
            .collect::<Vec<_>>()
    };
    assert_eq!(statements(&parse), statements(&clean));
}

#[test]
fn errors_in_a_scope_stay_in_the_scope() {
    let parse = parse("let f = fn() => {\n  let = 1\n  g()\n}\nlet h = 2");
    assert_eq!(parse.errors().len(), 1);
    let kinds = parse.source_file().statements().map(|node| node.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [SyntaxKind::VAR_DECLARATION, SyntaxKind::VAR_DECLARATION]);
}

#[test]
fn outer_error_before_a_recovered_scope_still_wraps_the_statement() {
    let parse = parse("let x = (1 + ) + { let = 1 }\nlet y = 2");
    let messages = parse.errors().iter().map(|error| error.message()).collect::<Vec<_>>();
    assert_eq!(messages, ["expected an expression", "expected a name"]);
    let kinds = parse.source_file().statements().map(|node| node.kind()).collect::<Vec<_>>();
    assert_eq!(kinds, [SyntaxKind::ERROR, SyntaxKind::VAR_DECLARATION]);
}

#[test]
fn member_lists_need_at_least_one_entry() {
    for (text, message) in [
        ("type E = enum {}", "expected an enum member"),
        ("type S = struct {}", "expected a field"),
        ("type S = struct ()", "expected a type"),
        ("match {}", "expected a match arm"),
    ] {
        let parse = parse(text);
        let messages = parse.errors().iter().map(|error| error.message()).collect::<Vec<_>>();
        assert_eq!(messages, [message], "{text}");
        assert_eq!(parse.root().text(), text);
    }
}

#[test]
fn realistic_program_parses_cleanly() {
    let text = r#"
type Shape = enum {
    Circle(float),
    Rect { w: float, h: float },
}

impl Shape {
    let area = fn(self: Shape) -> float => match self {
        Circle(r) => 3.14 * r ** 2,
        Rect(s) if s.w > 0 => s.w * s.h,
    }
}

let total = fn(shapes: list<Shape>) -> float => {
    let mut sum = 0.0
    for s in shapes => sum += s.area()
    return sum
}

let names = ["a", "b", "c"] |> join(",")
if let Some(x) <- lookup(names) => print(x) else => print("none")
"#;
    let (_, count) = statement(text);
    assert_eq!(count, 5);
}

#[test]
fn lexical_errors_are_reported() {
    let parse = parse("let s = \"open\nlet t = 1");
    assert!(parse.errors().iter().any(|error| error.message() == "unterminated string literal"));
    assert_eq!(parse.root().text(), "let s = \"open\nlet t = 1");
}

#[test]
fn empty_input() {
    let parse = parse("");
    assert!(!parse.has_errors());
    assert_eq!(parse.source_file().statements().count(), 0);
    assert_eq!(parse.root().kind(), SyntaxKind::SOURCE_FILE);
}

#[test]
fn tokenize_reports_significant_tokens() {
    let (tokens, errors) = tokenize("a // note\n+ 1");
    let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [SyntaxKind::NAME, SyntaxKind::PLUS, SyntaxKind::INT_NUMBER, SyntaxKind::EOF]
    );
    assert!(errors.is_empty());
}

#[test]
fn cancellation() {
    let flag = AtomicBool::new(true);
    assert_eq!(parse_cancellable("let a = 1", &flag), Err(Cancelled));
    // Nothing to check on empty input.
    assert!(parse_cancellable("", &flag).is_ok());

    flag.store(false, Ordering::Relaxed);
    let parse = parse_cancellable("let a = 1", &flag).unwrap();
    assert_eq!(parse, crate::parse("let a = 1"));
}

#[test]
fn trivia_tokens_are_materialized() {
    let text = r#"
let main = fn() => {
    let x = 1 // comment
}
"#;
    let mut saw_trivia = false;
    let mut saw_non_trivia = false;
    let mut tokenizer = Tokenizer::new(text);

    loop {
        let token_index = tokenizer.next_token_index();
        let token = tokenizer.token(token_index);

        if token.kind != SyntaxKind::EOF && !token.kind.is_trivia() {
            saw_non_trivia = true;
        }

        if !tokenizer.leading_trivia(token_index).is_empty()
            || !tokenizer.trailing_trivia(token_index).is_empty()
        {
            saw_trivia = true;
        }

        if token.kind == SyntaxKind::EOF {
            break;
        }
    }

    assert!(saw_trivia, "expected trivia pieces in the tokenizer");
    assert!(saw_non_trivia, "expected non-trivia tokens in the stream");

    let parse = parse(text);
    let comments = parse.tree().tokens().filter(|token| token.kind() == SyntaxKind::LINE_COMMENT);
    assert_eq!(comments.count(), 1);
}

const FRAGMENTS: &[&str] = &[
    "let", "x", "=", "1", "+", "(", ")", "[", "]", "{", "}", ",", ":", "=>", "->", "<-", "|>",
    "fn", "if", "else", "match", "for", "in", "type", "enum", "struct", "impl", "return", ".",
    "\"s\"", "'c'", "2.5", "0x1F", "list", "<", ">", ">>", "!", "?", "|", "@", "\n", ";", " ",
    "// c\n", "/* b */", "\"open", "&", "mut", "try", "as", "is", "**", "..",
];

proptest! {
    #[test]
    fn tree_text_round_trips(parts in proptest::collection::vec(0..FRAGMENTS.len(), 0..40)) {
        let text = parts.iter().map(|&index| FRAGMENTS[index]).collect::<Vec<_>>().join(" ");
        let parse = parse(&text);
        prop_assert_eq!(parse.root().text(), text.as_str());
        let joined = parse.tree().tokens().map(|token| token.text_trimmed()).collect::<String>();
        prop_assert_eq!(joined, text.as_str());
    }

    #[test]
    fn children_lie_inside_their_parent(parts in proptest::collection::vec(0..FRAGMENTS.len(), 0..40)) {
        let text = parts.iter().map(|&index| FRAGMENTS[index]).collect::<String>();
        let parse = parse(&text);
        for event in parse.root().preorder() {
            if let calibre_yellow::WalkEvent::Enter(node) = event {
                for child in node.children() {
                    prop_assert!(node.text_range().contains_range(child.text_range()));
                }
                for pair in node.children().collect::<Vec<_>>().windows(2) {
                    prop_assert!(pair[0].text_range().end() <= pair[1].text_range().start());
                }
            }
        }
    }
}
