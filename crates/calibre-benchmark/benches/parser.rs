use std::hint::black_box;

use calibre_db::{FileParse as _, RootDatabase};
use calibre_inputs::File;
use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};

const SIMPLE: &str = r#"
let answer = 42
let f = fn(x: int) -> int => x * 2 + 1
"#;

const MEDIUM: &str = r#"
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

fn benchmark_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for (name, text) in [("simple", SIMPLE), ("medium", MEDIUM)] {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("text", name), text, |b, text| {
            b.iter(|| black_box(calibre_parse::parse(text)));
        });
    }

    group.finish();
}

fn benchmark_cached(c: &mut Criterion) {
    let db = RootDatabase::default();
    let file = File::new(&db, "medium.calibre".into(), MEDIUM.repeat(20));

    let mut group = c.benchmark_group("parse_query");
    group.throughput(Throughput::Bytes(file.text(&db).len() as u64));
    group.bench_with_input(BenchmarkId::new("file", file.path(&db)), &file, |b, &file| {
        b.iter(|| black_box(file.parse(&db)));
    });
    group.finish();
}

criterion_group!(benches, benchmark_query, benchmark_cached);
criterion_main!(benches);
