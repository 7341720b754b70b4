//! Benchmarks for book list serialization.
//!
//! Run with: cargo bench

use std::collections::BTreeMap;

use criterion::{Criterion, criterion_group, criterion_main};

use bookreport::booklist::{generate_booklist, parse_booklist};
use bookreport::{Book, BookItem, ItemRegistry, Scalar, catalog};

/// Fifty books of ten stock items each, every item carrying a list option.
fn sample_books(registry: &ItemRegistry) -> BTreeMap<String, Book> {
    let kinds: Vec<&str> = registry.iter().map(|r| r.name.as_str()).collect();
    let mut books = BTreeMap::new();

    for b in 0..50 {
        let name = format!("Book {b}");
        let mut book = Book::new(name.clone());
        book.set_data_source_id(format!("/data/tree-{b}.grdb"));
        for i in 0..10 {
            let mut item = BookItem::from_registry(registry, kinds[i % kinds.len()]);
            let options = item.option_set_mut();
            options.set_person_id(format!("I{:04}", b * 10 + i));
            options.set(
                "filters",
                vec![Scalar::from("all"), Scalar::Int(i as i64), Scalar::Float(0.5)],
            );
            book.append_item(item);
        }
        books.insert(name, book);
    }
    books
}

fn bench_generate(c: &mut Criterion) {
    let registry = catalog::stock_registry().unwrap();
    let books = sample_books(&registry);

    c.bench_function("generate_booklist", |b| {
        b.iter(|| generate_booklist(&books).unwrap());
    });
}

fn bench_parse(c: &mut Criterion) {
    let registry = catalog::stock_registry().unwrap();
    let xml = generate_booklist(&sample_books(&registry)).unwrap();

    c.bench_function("parse_booklist", |b| {
        b.iter(|| parse_booklist(&xml, &registry).unwrap());
    });
}

criterion_group!(benches, bench_generate, bench_parse);
criterion_main!(benches);
