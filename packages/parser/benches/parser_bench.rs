use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagedraft_parser::{parse, serialize, RegionDocument};

fn page(sections: usize) -> String {
    let mut main = String::new();
    for i in 0..sections {
        main.push_str(&format!(
            "<h2 id=\"s{i}\">Section {i}</h2>\n<p class=\"lead\">Intro with <em>emphasis</em> and <a href=\"/s/{i}\">a link</a>.</p>\n<ul><li>one</li><li>two</li></ul>\n<img src=\"/img/{i}.png\" alt=\"figure\">\n"
        ));
    }
    format!(
        "<!doctype html>\n<html><head><title>Bench</title><style>p {{ margin: 0 }}</style></head>\n<body><!-- pagedraft:hero:start --><h1>Hero</h1><!-- pagedraft:hero:end -->\n<!-- pagedraft:main:start -->\n{}<!-- pagedraft:main:end --></body></html>\n",
        main
    )
}

fn parse_small_fragment(c: &mut Criterion) {
    let source = r#"<p class="lead">Hello <strong>world</strong>, <a href="/x">read more</a></p>"#;

    c.bench_function("parse_small_fragment", |b| {
        b.iter(|| parse(black_box(source)))
    });
}

fn parse_large_page(c: &mut Criterion) {
    let source = page(100);

    c.bench_function("parse_large_page", |b| b.iter(|| parse(black_box(&source))));
}

fn serialize_large_page(c: &mut Criterion) {
    let nodes = parse(&page(100)).unwrap();

    c.bench_function("serialize_large_page", |b| {
        b.iter(|| serialize(black_box(&nodes)))
    });
}

fn scan_regions(c: &mut Criterion) {
    let source = page(100);

    c.bench_function("scan_regions", |b| {
        b.iter(|| RegionDocument::parse(black_box(&source)))
    });
}

criterion_group!(
    benches,
    parse_small_fragment,
    parse_large_page,
    serialize_large_page,
    scan_regions
);
criterion_main!(benches);
