//! Benchmarks for order book operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lobsynth_book::{write_history_csv, PriceLevelBook};
use lobsynth_core::traits::OrderBook as OrderBookTrait;
use lobsynth_core::types::Side;

fn create_book(levels: usize) -> PriceLevelBook {
    let mut book = PriceLevelBook::new();
    for i in 0..levels {
        let offset = i as f64 * 0.01;
        book.update_bid(100.0 - offset, 10.0 + i as f64);
        book.update_ask(100.01 + offset, 10.0 + i as f64);
    }
    book
}

fn bench_orderbook_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("orderbook");

    // Upsert into the middle of an existing side
    group.bench_function("update_bid_10_levels", |b| {
        let mut book = create_book(10);
        b.iter(|| {
            book.update_bid(black_box(99.955), black_box(42.0));
        });
    });

    group.bench_function("best_bid_ask", |b| {
        let book = create_book(10);
        b.iter(|| {
            let _ = black_box(book.best_bid());
            let _ = black_box(book.best_ask());
        });
    });

    group.bench_function("mid_price", |b| {
        let book = create_book(10);
        b.iter(|| {
            black_box(book.mid_price());
        });
    });

    group.bench_function("top_levels_5", |b| {
        let book = create_book(10);
        b.iter(|| {
            black_box(book.top_levels(Side::Bid, 5));
            black_box(book.top_levels(Side::Ask, 5));
        });
    });

    group.bench_function("snapshot", |b| {
        let book = create_book(10);
        b.iter(|| {
            black_box(book.snapshot());
        });
    });

    group.finish();
}

fn bench_book_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("book_depth");

    for levels in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("top_levels_5", levels), &levels, |b, &levels| {
            let book = create_book(levels);
            b.iter(|| black_box(book.top_levels(Side::Bid, 5)));
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let book = create_book(50);

    c.bench_function("write_history_csv_100", |b| {
        b.iter(|| {
            let mut buffer = Vec::with_capacity(64 * 1024);
            write_history_csv(&mut buffer, black_box(book.history())).unwrap();
            black_box(buffer)
        });
    });
}

criterion_group!(benches, bench_orderbook_operations, bench_book_depth, bench_export);
criterion_main!(benches);
