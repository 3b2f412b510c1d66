use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use wordfreq_rs::engine::{BoundaryStrategy, CountMode, CountOptions, count_words};
use wordfreq_rs::scan::{WordPolicy, count_words_in, scan_chunk};

fn generate_text(lines: usize, words_per_line: usize) -> Vec<u8> {
    let vocab: [&[u8]; 6] = [b"hello", b"world", b"chunk", b"words", b"fast", b"scan"];
    let mut data = Vec::new();
    for i in 0..lines {
        for j in 0..words_per_line {
            if j > 0 {
                data.push(b' ');
            }
            data.extend_from_slice(vocab[(i + j) % vocab.len()]);
        }
        data.push(b'\n');
    }
    data
}

fn bench_scalar_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_words");
    for size_mb in [1, 10] {
        let lines = size_mb * 1024 * 1024 / 36; // ~36 bytes per line with 5 words
        let data = generate_text(lines, 5);
        group.bench_with_input(
            BenchmarkId::new("branchless", format!("{}MB", size_mb)),
            &data,
            |b, data| b.iter(|| count_words_in(black_box(data), WordPolicy::NonSpace)),
        );
    }
    group.finish();
}

fn bench_frequency_scan(c: &mut Criterion) {
    let data = generate_text(100_000, 5);
    c.bench_function("scan_frequencies_3MB", |b| {
        b.iter(|| scan_chunk(black_box(&data), WordPolicy::Alnum, true))
    });
}

fn bench_parallel_total(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_total");
    let data = generate_text(300_000, 5); // ~10MB
    for chunk_kb in [256, 1024, 4096] {
        let opts = CountOptions {
            chunk_size: chunk_kb * 1024,
            ..CountOptions::default()
        };
        group.bench_with_input(
            BenchmarkId::new("range_extend", format!("{}KB", chunk_kb)),
            &data,
            |b, data| b.iter(|| count_words(black_box(data.as_slice()), &opts).unwrap()),
        );
        let opts = CountOptions {
            strategy: BoundaryStrategy::FlagSubtract,
            ..opts
        };
        group.bench_with_input(
            BenchmarkId::new("flag_subtract", format!("{}KB", chunk_kb)),
            &data,
            |b, data| b.iter(|| count_words(black_box(data.as_slice()), &opts).unwrap()),
        );
    }
    group.finish();
}

fn bench_parallel_frequencies(c: &mut Criterion) {
    let data = generate_text(300_000, 5); // ~10MB
    let opts = CountOptions {
        mode: CountMode::WithFrequencies,
        ..CountOptions::default()
    };
    c.bench_function("engine_frequencies_10MB", |b| {
        b.iter(|| count_words(black_box(data.as_slice()), &opts).unwrap())
    });
}

criterion_group!(
    benches,
    bench_scalar_scan,
    bench_frequency_scan,
    bench_parallel_total,
    bench_parallel_frequencies
);
criterion_main!(benches);
