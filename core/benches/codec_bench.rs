// Text vs binary encode/decode throughput over a fixed batch of records.
//
//   cargo bench -p objio-core --bench codec_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use objio::codec::{BinaryCodec, TextCodec};
use objio::config::CodecConfig;
use objio::io::ObjectIo;
use objio::persist_record;

#[derive(Debug, Clone, PartialEq, Default)]
struct Row {
    id: u64,
    name: String,
    scores: Vec<f64>,
}
persist_record!(Row => "row" { id, name, scores });

const BATCH_SIZES: &[usize] = &[10, 100, 1_000];

fn rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| Row {
            id: i as u64,
            name: format!("row-{i}"),
            scores: (0..8).map(|j| (i * j) as f64 * 0.5).collect(),
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for &n in BATCH_SIZES {
        let batch = rows(n);
        group.throughput(Throughput::Elements(n as u64));

        let mut text: ObjectIo<TextCodec> = ObjectIo::text(CodecConfig::default()).unwrap();
        group.bench_with_input(BenchmarkId::new("text", n), &batch, |b, batch| {
            b.iter(|| text.to_bytes(black_box(batch)).unwrap())
        });

        let mut binary: ObjectIo<BinaryCodec> = ObjectIo::binary(CodecConfig::default()).unwrap();
        group.bench_with_input(BenchmarkId::new("binary", n), &batch, |b, batch| {
            b.iter(|| binary.to_bytes(black_box(batch)).unwrap())
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for &n in BATCH_SIZES {
        let batch = rows(n);
        group.throughput(Throughput::Elements(n as u64));

        let mut text = ObjectIo::text(CodecConfig::default()).unwrap();
        let text_bytes = text.to_bytes(&batch).unwrap();
        group.bench_with_input(BenchmarkId::new("text", n), &text_bytes, |b, bytes| {
            b.iter(|| text.from_bytes::<Vec<Row>>(black_box(bytes)).unwrap())
        });

        let mut binary = ObjectIo::binary(CodecConfig::default()).unwrap();
        let binary_bytes = binary.to_bytes(&batch).unwrap();
        group.bench_with_input(BenchmarkId::new("binary", n), &binary_bytes, |b, bytes| {
            b.iter(|| binary.from_bytes::<Vec<Row>>(black_box(bytes)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
