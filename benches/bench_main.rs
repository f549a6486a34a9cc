use chunkcopy::batch::BatchReplayer;
use chunkcopy::{ChunkBuffer, CpuFeatures, Functable, Token};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

const OUT_SIZE: usize = 1 << 20;

/// Token stream of `len`-byte matches at a fixed distance, the shape a
/// DEFLATE stream of a period-`dist` input decodes to.
fn periodic_tokens(dist: usize, len: usize, total: usize) -> Vec<Token> {
    let mut tokens: Vec<Token> = (0..dist).map(|i| Token::Literal(i as u8)).collect();
    let mut produced = dist;
    while produced + len <= total {
        tokens.push(Token::Match { dist, len });
        produced += len;
    }
    tokens
}

fn bench_pattern_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pattern fill");

    for table in Functable::supported(CpuFeatures::detect()) {
        for &dist in &[1usize, 2, 3, 4, 5, 8, 16, 32] {
            let len = 258;
            let mut buf = vec![0u8; OUT_SIZE + table.slack()];
            for (i, b) in buf[..dist].iter_mut().enumerate() {
                *b = i as u8;
            }

            group.throughput(Throughput::Bytes((OUT_SIZE - dist) as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{} offset{}", table.backend(), dist), len),
                &len,
                |b, &len| {
                    b.iter(|| {
                        let base = buf.as_mut_ptr();
                        let mut pos = dist;
                        while pos + len <= OUT_SIZE {
                            unsafe { table.pattern_fill(base.add(pos), dist, len) };
                            pos += len;
                        }
                        black_box(pos)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("Copy");

    for table in Functable::supported(CpuFeatures::detect()) {
        for &len in &[3usize, 8, 16, 31, 64, 258] {
            let src: Vec<u8> = (0..OUT_SIZE + table.slack()).map(|i| i as u8).collect();
            let mut dst = vec![0u8; OUT_SIZE + table.slack()];

            group.throughput(Throughput::Bytes(OUT_SIZE as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{}", table.backend()), len),
                &len,
                |b, &len| {
                    b.iter(|| {
                        let mut pos = 0;
                        while pos + len <= OUT_SIZE {
                            unsafe {
                                table.copy(dst.as_mut_ptr().add(pos), src.as_ptr().add(pos), len)
                            };
                            pos += len;
                        }
                        black_box(pos)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_buffer_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("Replay");

    for table in Functable::supported(CpuFeatures::detect()) {
        for &dist in &[1usize, 3, 7, 40] {
            let tokens = periodic_tokens(dist, 130, OUT_SIZE);
            let size = chunkcopy::lz77::output_len(&tokens).unwrap();

            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{} offset{}", table.backend(), dist), size),
                &size,
                |b, &size| {
                    let mut out = ChunkBuffer::with_table(size, table);
                    b.iter(|| {
                        out.clear();
                        chunkcopy::lz77::replay_into(&tokens, &mut out).unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let streams: Vec<Vec<Token>> = (1..=16)
        .map(|d| periodic_tokens(d, 258, 256 * 1024))
        .collect();
    let refs: Vec<&[Token]> = streams.iter().map(|s| s.as_slice()).collect();
    let total: usize = refs
        .iter()
        .map(|t| chunkcopy::lz77::output_len(t).unwrap())
        .sum();

    let mut group = c.benchmark_group("Batch replay");
    group.throughput(Throughput::Bytes(total as u64));

    let replayer = BatchReplayer::new();
    group.bench_function("16 streams", |b| {
        b.iter(|| replayer.replay_batch(&refs));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_pattern_fill,
    bench_copy,
    bench_buffer_replay,
    bench_batch,
);
criterion_main!(benches);
