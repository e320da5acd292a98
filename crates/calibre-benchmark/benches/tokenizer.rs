use codspeed_criterion_compat::{
    Criterion, Throughput, black_box, criterion_group, criterion_main,
};

static SOURCE: &str = "
let x = fn(a b: int) -> int => { a <- b |> c >>= 0x1F as int is dyn; return a ** 2 }
let x = fn(a b: int) -> int => { a <- b |> c >>= 0x1F as int is dyn; return a ** 2 }
let x = fn(a b: int) -> int => { a <- b |> c >>= 0x1F as int is dyn; return a ** 2 }
let x = fn(a b: int) -> int => { a <- b |> c >>= 0x1F as int is dyn; return a ** 2 }
let x = fn(a b: int) -> int => { a <- b |> c >>= 0x1F as int is dyn; return a ** 2 }
let x = fn(a b: int) -> int => { a <- b |> c >>= 0x1F as int is dyn; return a ** 2 }
let x = fn(a b: int) -> int => { a <- b |> c >>= 0x1F as int is dyn; return a ** 2 }
let x = fn(a b: int) -> int => { a <- b |> c >>= 0x1F as int is dyn; return a ** 2 }
let x = fn(a b: int) -> int => { a <- b |> c >>= 0x1F as int is dyn; return a ** 2 }
let x = fn(a b: int) -> int => { a <- b |> c >>= 0x1F as int is dyn; return a ** 2 }
";

static LITERALS: &str = r#"
"hello\tworld\n" 'x' 'é' 1_000_000 0b1010 0o777 0755 1.5e-3 2.0i "\x41\u{1F600}"
"hello\tworld\n" 'x' 'é' 1_000_000 0b1010 0o777 0755 1.5e-3 2.0i "\x41\u{1F600}"
"hello\tworld\n" 'x' 'é' 1_000_000 0b1010 0o777 0755 1.5e-3 2.0i "\x41\u{1F600}"
"hello\tworld\n" 'x' 'é' 1_000_000 0b1010 0o777 0755 1.5e-3 2.0i "\x41\u{1F600}"
"hello\tworld\n" 'x' 'é' 1_000_000 0b1010 0o777 0755 1.5e-3 2.0i "\x41\u{1F600}"
"#;

static IDENTIFIERS: &str =
    "It was the year when they finally immanentized the Eschaton It was the year when they \
     finally immanentized the Eschaton It was the year when they finally immanentized the \
     Eschaton It was the year when they finally immanentized the Eschaton It was the year when \
     they finally immanentized the Eschaton It was the year when they finally immanentized the \
     Eschaton";

static CANDIDATES: [(&str, &str); 3] = [
    ("identifiers", IDENTIFIERS),
    ("keywords_operators_and_punctuation", SOURCE),
    ("literals", LITERALS),
];

fn iterate(s: &str) {
    use calibre_tokenizer::{SyntaxKind, Tokenizer};

    let mut tokenizer = Tokenizer::new(s);

    loop {
        let token_index = tokenizer.next_token_index();
        let next_token = tokenizer.token(token_index);

        if next_token.kind == SyntaxKind::EOF {
            break;
        }

        black_box(next_token);
    }
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    for (name, source) in CANDIDATES {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, &s| b.iter(|| iterate(s)));
    }
}

criterion_group!(benches, bench_iterate);
criterion_main!(benches);
