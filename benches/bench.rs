use criterion::{criterion_group, criterion_main, Criterion};
use jstream::options::ParserOptionsBuilder;
use jstream::{NumberParsing, Parser};
use serde_json::Value;

/// A large, deeply repetitive document: 10,000 properties, each holding the
/// same small JSON fragment.
fn make_large(fragment: &str) -> String {
    let mut large = String::from("{");
    for i in 0..10_000 {
        if large.len() > 1 {
            large.push(',');
        }
        large.push_str(&format!(r#""{i}":"#));
        large.push_str(fragment);
    }
    large.push('}');
    large
}

fn jstream_parse(json_bytes: &[u8], number_parsing: NumberParsing) {
    let options = ParserOptionsBuilder::default()
        .with_number_parsing(number_parsing)
        .build();
    let mut parser = Parser::from_slice_with_options(json_bytes, options);
    while parser.read().unwrap().is_some() {}
}

fn serde_json_parse(json_bytes: &[u8]) {
    let _: Value = serde_json::from_slice(json_bytes).unwrap();
}

fn bench_small_fragment(c: &mut Criterion) {
    let json = make_large(r#"{"name":"Elvis","age":42,"active":true}"#);
    let json_bytes = json.as_bytes();

    let mut group = c.benchmark_group("small_fragment");
    group.bench_function("jstream/int_double", |b| {
        b.iter(|| jstream_parse(json_bytes, NumberParsing::IntDouble))
    });
    group.bench_function("jstream/all_decimal", |b| {
        b.iter(|| jstream_parse(json_bytes, NumberParsing::AllDecimal))
    });
    group.bench_function("serde_json", |b| b.iter(|| serde_json_parse(json_bytes)));
    group.finish();
}

fn bench_string_heavy_fragment(c: &mut Criterion) {
    let json = make_large(r#""the quick brown fox jumps over the lazy dog""#);
    let json_bytes = json.as_bytes();

    let mut group = c.benchmark_group("string_heavy_fragment");
    group.bench_function("jstream", |b| {
        b.iter(|| jstream_parse(json_bytes, NumberParsing::IntDouble))
    });
    group.bench_function("serde_json", |b| b.iter(|| serde_json_parse(json_bytes)));
    group.finish();
}

fn bench_small_buffer(c: &mut Criterion) {
    let json = make_large(r#"{"name":"Elvis","age":42,"active":true}"#);
    let json_bytes = json.as_bytes();

    c.bench_function("small_buffer_capacity/1kib", |b| {
        b.iter(|| {
            let options = ParserOptionsBuilder::default()
                .with_buffer_capacity(1024)
                .build();
            let mut parser = Parser::from_slice_with_options(json_bytes, options);
            while parser.read().unwrap().is_some() {}
        })
    });
}

criterion_group!(
    benches,
    bench_small_fragment,
    bench_string_heavy_fragment,
    bench_small_buffer
);
criterion_main!(benches);
