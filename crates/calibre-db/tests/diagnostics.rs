use calibre_db::{FileParse as _, RootDatabase, check_file};
use calibre_errors::Diagnostic;
use calibre_inputs::File;
use salsa::Setter as _;

#[derive(Debug, PartialEq, Eq)]
struct ExpectedDiag {
    line: usize,
    message: String,
}

#[derive(Debug, PartialEq, Eq)]
struct ActualDiag {
    line: usize,
    message: String,
}

fn parse_expectations(fixture: &str) -> Vec<ExpectedDiag> {
    let mut expected = Vec::new();

    for (idx, line) in fixture.lines().enumerate() {
        let Some((_, comment)) = line.split_once("//~") else {
            continue;
        };
        let comment = comment.trim();
        let comment = comment.strip_prefix("ERROR").unwrap_or(comment).trim();
        if comment.is_empty() {
            continue;
        }
        expected.push(ExpectedDiag { line: idx + 1, message: comment.to_owned() });
    }

    expected
}

fn collect_actual(db: &RootDatabase, file: File, diagnostics: &[Diagnostic]) -> Vec<ActualDiag> {
    let mut actual = diagnostics
        .iter()
        .map(|diag| {
            let (line, _) = file.line_col(db, diag.range().start());
            ActualDiag { line: line as usize, message: diag.message().to_owned() }
        })
        .collect::<Vec<_>>();
    actual.sort_by_key(|diag| (diag.line, diag.message.clone()));
    actual
}

#[track_caller]
fn check(fixture: &str) {
    let db = RootDatabase::default();
    let file = File::new(&db, "check.calibre".into(), fixture.to_owned());

    let diagnostics = check_file(&db, file);
    let mut actual = collect_actual(&db, file, diagnostics);
    let mut expected = parse_expectations(fixture);

    expected.sort_by_key(|diag| (diag.line, diag.message.clone()));

    assert_eq!(
        expected.len(),
        actual.len(),
        "expected {} diagnostic(s), got {}\nexpected: {expected:#?}\nactual: {actual:#?}",
        expected.len(),
        actual.len(),
    );

    for expected_diag in expected {
        let Some(pos) = actual.iter().position(|diag| {
            diag.line == expected_diag.line && diag.message.contains(&expected_diag.message)
        }) else {
            panic!(
                "missing diagnostic on line {} containing `{}`\nactual: {actual:#?}",
                expected_diag.line, expected_diag.message
            );
        };
        actual.remove(pos);
    }

    assert!(actual.is_empty(), "unexpected diagnostics:\n{actual:#?}");
}

#[test]
fn clean_file() {
    check(
        r#"
type Point = struct { x: int, y: int }

let origin = { x: 0, y: 0 }
let f = fn(a: int, b: int) -> int => {
    a + b
}
"#,
    );
}

#[test]
fn missing_binding_name() {
    check(
        r#"
let a = 1
let = 2 //~ ERROR expected a name
let d = 4
"#,
    );
}

#[test]
fn missing_operands() {
    check(
        r#"
let g = { x + } //~ ERROR expected an expression
let c = ) //~ ERROR expected an expression
"#,
    );
}

#[test]
fn invalid_assignment_target() {
    check(
        r#"
let a = 1
a + b = c //~ ERROR invalid assignment target
"#,
    );
}

#[test]
fn errors_inside_function_bodies() {
    check(
        r#"
let f = fn() => {
    let = 1 //~ ERROR expected a name
    g()
}
let h = 2
"#,
    );
}

#[test]
fn columns_are_one_based() {
    let db = RootDatabase::default();
    let file = File::new(&db, "columns.calibre".into(), "let a = 1\nlet = 2\n".to_owned());

    let diagnostics = check_file(&db, file);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(file.line_col(&db, diagnostics[0].range().start()), (2, 5));
}

#[test]
fn reparses_after_edit() {
    let mut db = RootDatabase::default();
    let file = File::new(&db, "edit.calibre".into(), "let = 1".to_owned());
    assert_eq!(check_file(&db, file).len(), 1);

    file.set_text(&mut db).to("let a = 1".to_owned());
    assert!(check_file(&db, file).is_empty());
    assert_eq!(file.parse(&db).root().text(), "let a = 1");
}
