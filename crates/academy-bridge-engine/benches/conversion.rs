use academy_bridge_engine::{RelationshipConfig, build_graph, convert_corpus, convert_markdown};
use criterion::{Criterion, criterion_group, criterion_main};
mod common;

fn bench_convert_article(c: &mut Criterion) {
    let mut group = c.benchmark_group("conversion");
    group.sample_size(10);

    let content = common::generate_article_body(100);
    group.bench_function("convert_markdown", |b| {
        b.iter(|| {
            let converted = convert_markdown(std::hint::black_box(&content));
            std::hint::black_box(converted);
        });
    });

    group.finish();
}

fn bench_build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");
    group.sample_size(10);

    let corpus = common::generate_corpus(200);
    let converted = convert_corpus(&corpus);
    let config = RelationshipConfig::new();
    group.bench_function("build_graph", |b| {
        b.iter(|| {
            let build = build_graph(&corpus, std::hint::black_box(&converted), &config);
            std::hint::black_box(build.graph.link_count());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_convert_article, bench_build_graph);
criterion_main!(benches);
