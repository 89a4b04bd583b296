//! Benchmarks for the page enhancement pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use pagefix::dom::parse_document;
use pagefix::{CrossRefTable, EnhanceOptions, Outline, PageConfig, StaticSource, enhance_html};

/// A long chapter page with every kind of placeholder the pipeline handles.
fn sample_page(sections: usize) -> String {
    let mut html = String::from(
        "<!DOCTYPE html><html><head><title>Sample</title></head><body>\
         <div class=\"headings\"></div><div class=\"main\"><h1>Sample</h1>",
    );
    for i in 0..sections {
        html.push_str(&format!(
            "<h2 id=\"s:section-{i}\">Section {i}</h2>\
             <p>See <a href=\"../chapter-{i}/\">CHAPTER</a> and \
             <a href=\"#BIB\">key{i},other{i}</a> for an \
             <a href=\"#g:term-{i}\">explanation</a>.</p>\
             <table><tr><td>{i}</td></tr></table>"
        ));
    }
    html.push_str("</div><script src=\"../site.js\"></script></body></html>");
    html
}

fn sample_table(chapters: usize) -> CrossRefTable {
    let outline = Outline {
        chapters: (0..chapters).map(|i| format!("chapter-{i}")).collect(),
        appendices: vec!["tools".to_string()],
        bibliography: Some("bib".to_string()),
    };
    CrossRefTable::from_outline(&outline).unwrap()
}

// ============================================================================
// Parsing
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let html = sample_page(200);

    c.bench_function("parse_document", |b| {
        b.iter(|| parse_document(&html));
    });
}

fn bench_serialize(c: &mut Criterion) {
    let dom = parse_document(&sample_page(200));

    c.bench_function("to_html", |b| {
        b.iter(|| dom.to_html());
    });
}

// ============================================================================
// Pipeline
// ============================================================================

fn bench_enhance_full(c: &mut Criterion) {
    let html = sample_page(200);
    let source = StaticSource::table(sample_table(200));
    let options = EnhanceOptions::new(PageConfig::nested());

    c.bench_function("enhance_full", |b| {
        b.iter(|| enhance_html(&html, &options, &source).unwrap());
    });
}

fn bench_enhance_without_table(c: &mut Criterion) {
    let html = sample_page(200);
    let source = StaticSource::failed("offline");
    let options = EnhanceOptions::new(PageConfig::nested());

    c.bench_function("enhance_without_table", |b| {
        b.iter(|| enhance_html(&html, &options, &source).unwrap());
    });
}

criterion_group!(
    benches,
    // Parsing
    bench_parse,
    bench_serialize,
    // Pipeline
    bench_enhance_full,
    bench_enhance_without_table,
);
criterion_main!(benches);
