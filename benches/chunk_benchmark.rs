use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndchunk_codec::aligned_buffer::{as_bytes, as_bytes_mut};
use ndchunk_codec::{compress_chunk, decompress_chunk, CodecConfig, Compression, DataType};
use rand::Rng;

const DIM0_SIZE: u64 = 1024;
const DIM1_SIZE: u64 = 1024;
const CHUNK0_SIZE: u64 = 20;
const CHUNK1_SIZE: u64 = 20;

fn random_data() -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..DIM0_SIZE * DIM1_SIZE)
        .map(|_| rng.gen_range(-50.0..50.0))
        .collect()
}

pub fn benchmark_compress_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress_chunk");
    group.sample_size(20);

    let cfg = CodecConfig::new(
        10.0,
        0.0,
        Compression::PforDelta2DInt16,
        DataType::FloatArray,
        vec![DIM0_SIZE, DIM1_SIZE],
        vec![CHUNK0_SIZE, CHUNK1_SIZE],
    )
    .unwrap();
    let data = random_data();
    let src_bytes = as_bytes(&data);
    let mut chunk_buffer = vec![0u8; cfg.chunk_buffer_size() as usize];
    let mut out = vec![0u8; cfg.compressed_chunk_buffer_size() as usize];

    group.bench_function("pfor_delta2d_int16_lossy_float", |b| {
        b.iter(|| {
            for chunk_index in 0..cfg.count_chunks() {
                black_box(compress_chunk(
                    &cfg,
                    src_bytes,
                    &[DIM0_SIZE, DIM1_SIZE],
                    &[0, 0],
                    &[DIM0_SIZE, DIM1_SIZE],
                    chunk_index,
                    0,
                    &mut out,
                    &mut chunk_buffer,
                ));
            }
        })
    });

    group.finish();
}

pub fn benchmark_decompress_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress_chunk");
    group.sample_size(20);

    let cfg = CodecConfig::new(
        10.0,
        0.0,
        Compression::PforDelta2DInt16,
        DataType::FloatArray,
        vec![DIM0_SIZE, DIM1_SIZE],
        vec![CHUNK0_SIZE, CHUNK1_SIZE],
    )
    .unwrap();
    let data = random_data();
    let src_bytes = as_bytes(&data);
    let mut chunk_buffer = vec![0u8; cfg.chunk_buffer_size() as usize];
    let mut out = vec![0u8; cfg.compressed_chunk_buffer_size() as usize];
    let written = compress_chunk(
        &cfg,
        src_bytes,
        &[DIM0_SIZE, DIM1_SIZE],
        &[0, 0],
        &[DIM0_SIZE, DIM1_SIZE],
        0,
        0,
        &mut out,
        &mut chunk_buffer,
    );

    let mut decoded = vec![0.0f32; (DIM0_SIZE * DIM1_SIZE) as usize];
    group.bench_function("pfor_delta2d_int16_lossy_float", |b| {
        b.iter(|| {
            let decoded_bytes = as_bytes_mut(&mut decoded);
            black_box(
                decompress_chunk(
                    &cfg,
                    &mut out[..written],
                    decoded_bytes,
                    &[DIM0_SIZE, DIM1_SIZE],
                    &[0, 0],
                    &[DIM0_SIZE, DIM1_SIZE],
                    0,
                    0,
                    &mut chunk_buffer,
                )
                .unwrap(),
            );
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_compress_chunk, benchmark_decompress_chunk);
criterion_main!(benches);
