use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pagedraft_editor::{
    canonicalize, merge, parse_blocks, signature, Anchor, EditLog, MergeOptions, Placement,
};

fn main_region(blocks: usize) -> String {
    let mut html = String::new();
    for i in 0..blocks {
        match i % 4 {
            0 => html.push_str(&format!("<h2>Section {}</h2>\n", i)),
            1 => html.push_str(&format!(
                "<p class=\"lead\">Paragraph {} with <a href=\"/x/{}\">a link</a>.</p>\n",
                i, i
            )),
            2 => html.push_str("<hr>\n"),
            _ => html.push_str(&format!(
                "<pre><code class=\"language-rust hljs\"><span class=\"hljs-keyword\">fn</span> f{}() {{}}</code></pre>\n",
                i
            )),
        }
    }
    html
}

fn signature_only(c: &mut Criterion) {
    let html = r#"<pre><code class="language-rust hljs"><span class="hljs-keyword">fn</span> main() {}</code></pre>"#;

    c.bench_function("signature_only", |b| b.iter(|| signature(black_box(html))));
}

fn parse_blocks_medium(c: &mut Criterion) {
    let source = main_region(100);

    c.bench_function("parse_blocks_medium", |b| {
        b.iter(|| parse_blocks(black_box(&source)))
    });
}

fn merge_with_edits(c: &mut Criterion) {
    let baseline = parse_blocks(&main_region(200)).unwrap();
    let mut log = EditLog::new();
    for (i, block) in baseline.iter().enumerate().step_by(10) {
        log.insert(Anchor::of(block), Placement::After, &format!("<p>new {}</p>", i))
            .unwrap();
    }
    for block in baseline.iter().skip(3).step_by(17) {
        log.remove(Anchor::of(block));
    }
    log.mark_edited(Anchor::of(&baseline[5]), "<p>edited</p>")
        .unwrap();
    log.reorder(baseline.iter().rev().map(|b| b.identity.clone()).collect());

    c.bench_function("merge_with_edits", |b| {
        b.iter(|| merge(black_box(&baseline), black_box(&log), MergeOptions::preview()))
    });
}

fn canonicalize_page(c: &mut Criterion) {
    let page = format!(
        "<html><body><!-- pagedraft:hero:start --><h1>Hero</h1><!-- pagedraft:hero:end -->\n<!-- pagedraft:main:start -->\n{}<!-- pagedraft:main:end --></body></html>",
        main_region(100)
    );

    c.bench_function("canonicalize_page", |b| {
        b.iter(|| canonicalize(black_box(&page)))
    });
}

criterion_group!(
    benches,
    signature_only,
    parse_blocks_medium,
    merge_with_edits,
    canonicalize_page
);
criterion_main!(benches);
