//! Benchmarks for rendering annotated text into a nested tree.
//!
//! Run with: `cargo bench --bench render_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glosstrack::render::html::to_html;
use glosstrack::{render, AnnotatedText, AnnotationData};

/// A line of `len` characters with ruby on every other pair, a lemma per
/// word and a few long highlights crossing word boundaries.
fn generate_text(len: usize) -> AnnotatedText {
    let raw: String = "漢字かなカナ".chars().cycle().take(len).collect();
    let mut text = AnnotatedText::new(raw.as_str());
    for begin in (0..len.saturating_sub(2)).step_by(4) {
        text = text
            .add_annotation(begin, begin + 2, AnnotationData::Ruby("かんじ".into()))
            .and_then(|t| t.add_annotation(begin, begin + 3, AnnotationData::Lemma("漢字".into())))
            .expect("ranges fit the text");
    }
    for begin in (1..len.saturating_sub(7)).step_by(11) {
        text = text
            .add_annotation(
                begin,
                begin + 7,
                AnnotationData::Custom {
                    kind: "note".into(),
                    value: serde_json::Value::Null,
                },
            )
            .expect("ranges fit the text");
    }
    text
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for len in [16, 64, 256] {
        let text = generate_text(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("tree", len), &text, |b, text| {
            b.iter(|| black_box(render(black_box(text))));
        });
        group.bench_with_input(BenchmarkId::new("html", len), &text, |b, text| {
            b.iter(|| black_box(to_html(&render(black_box(text)))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_render);

criterion_main!(benches);
