use criterion::{Criterion, black_box, criterion_group, criterion_main};
use markup::Lexer;

fn build_document(elements: usize) -> String {
    let mut doc = String::new();
    for i in 0..elements {
        doc.push_str(&format!(
            "<item id=\"i{i}\" class='row' data-n={i}>cell text {i} &amp; more</item>\n"
        ));
    }
    doc
}

/// Raw content littered with `>` characters and near-miss closing tags, the
/// worst case for the closing-tag suffix match.
fn build_raw_document(lines: usize) -> String {
    let mut doc = String::from("<script>");
    for i in 0..lines {
        doc.push_str(&format!("if (a > {i}) {{ emit(\"</scripted>\"); }}\n"));
    }
    doc.push_str("</script>");
    doc
}

fn ascii_chunks(input: &str, size: usize) -> Vec<&str> {
    input.as_bytes().chunks(size).map(|chunk| std::str::from_utf8(chunk).unwrap()).collect()
}

fn lex_whole(input: &str) -> usize {
    let mut lexer = Lexer::<String>::new();
    lexer.feed(input);
    lexer.tokens().len()
}

fn lex_chunked(chunks: &[&str]) -> usize {
    let mut lexer = Lexer::<String>::new();
    for chunk in chunks {
        lexer.feed(chunk);
    }
    lexer.tokens().len()
}

fn bench_whole_document(c: &mut Criterion) {
    let small = build_document(10);
    let large = build_document(1_000);
    c.bench_function("whole/small", |b| b.iter(|| lex_whole(black_box(&small))));
    c.bench_function("whole/large", |b| b.iter(|| lex_whole(black_box(&large))));
}

fn bench_chunked_document(c: &mut Criterion) {
    let large = build_document(1_000);
    let chunks = ascii_chunks(&large, 64);
    c.bench_function("chunked/64b", |b| {
        b.iter(|| lex_chunked(black_box(&chunks)))
    });
}

fn bench_raw_content(c: &mut Criterion) {
    let raw = build_raw_document(500);
    c.bench_function("raw/near-miss-closes", |b| {
        b.iter(|| lex_whole(black_box(&raw)))
    });
}

criterion_group!(
    benches,
    bench_whole_document,
    bench_chunked_document,
    bench_raw_content
);
criterion_main!(benches);
