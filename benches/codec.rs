use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use huffpack::{compress_bytes, decompress_bytes, CodecConfig, FrequencyTable, HuffmanCodec, HuffmanTree};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SIZES: &[usize] = &[8192, 65536, 1_048_576];

fn generate_text(size: usize) -> Vec<u8> {
    let base = b"The quick brown fox jumps over the lazy dog. Huffman encoding is a greedy \
                 algorithm that builds optimal prefix codes from symbol frequencies. ";
    base.iter().copied().cycle().take(size).collect()
}

fn generate_skewed(size: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size)
        .map(|_| {
            let x: f64 = rng.gen();
            (x * x * x * 255.0) as u8
        })
        .collect()
}

fn bench_frequency(c: &mut Criterion) {
    let mut group = c.benchmark_group("frequency");
    for &size in SIZES {
        let data = generate_skewed(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("sequential", size), &data, |b, data| {
            b.iter(|| FrequencyTable::count(black_box(data)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &data, |b, data| {
            b.iter(|| FrequencyTable::count_parallel(black_box(data), 64 * 1024).unwrap());
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman");
    for &size in SIZES {
        let data = generate_text(size);
        group.throughput(Throughput::Bytes(size as u64));

        let codec = HuffmanCodec::new(HuffmanTree::from_symbols(&data).unwrap());
        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            b.iter(|| codec.encode(black_box(data)).unwrap());
        });

        let bits = codec.encode(&data).unwrap();
        group.bench_with_input(BenchmarkId::new("decode", size), &bits, |b, bits| {
            b.iter(|| codec.decode(black_box(bits)).unwrap());
        });

        let artifact = compress_bytes(&data).unwrap();
        group.bench_with_input(BenchmarkId::new("round_trip", size), &data, |b, data| {
            b.iter(|| decompress_bytes(&compress_bytes(black_box(data)).unwrap()).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decompress", size), &artifact, |b, artifact| {
            b.iter(|| decompress_bytes(black_box(artifact)).unwrap());
        });
    }
    group.finish();
}

fn bench_compress_parallel(c: &mut Criterion) {
    let data = generate_skewed(4 * 1_048_576);
    let config = CodecConfig {
        parallel_threshold: 0,
        ..CodecConfig::default()
    };
    c.bench_function("compress_parallel_4mb", |b| {
        b.iter(|| HuffmanCodec::compress_with(black_box(&data), &config).unwrap())
    });
}

criterion_group!(benches, bench_frequency, bench_codec, bench_compress_parallel);
criterion_main!(benches);
