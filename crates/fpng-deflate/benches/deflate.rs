use std::io::{Cursor, Read, Write};
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fpng_deflate::{DeflateDecoder, DeflateEncoder, DeflateEncodingOptions, DeflateEncodingStrategy};

/// Row-like data, repeated with small perturbations
fn bench_data() -> Vec<u8>
{
    let mut data = Vec::with_capacity(1 << 22);
    let mut state = 0x2545_F491_u32;

    while data.len() < 1 << 22
    {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;

        let row = (state % 7) as u8;
        data.extend((0..255_u8).map(|x| x.wrapping_mul(row) >> 2));
    }
    data
}

fn decode_writer_flate(bytes: &[u8]) -> Vec<u8>
{
    let mut writer = Vec::new();

    let mut deflater = flate2::read::ZlibDecoder::new(Cursor::new(bytes));

    deflater.read_to_end(&mut writer).unwrap();

    writer
}

fn encode_writer_flate(bytes: &[u8]) -> Vec<u8>
{
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());

    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn encode_fpng(bytes: &[u8], strategy: DeflateEncodingStrategy) -> Vec<u8>
{
    let options = DeflateEncodingOptions::default().set_strategy(strategy);

    DeflateEncoder::new_with_options(bytes, options).encode_zlib()
}

fn encode_test(c: &mut Criterion)
{
    let data = bench_data();

    let mut group = c.benchmark_group("ZLIB encoding");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("FLATE-fast", |b| {
        b.iter(|| black_box(encode_writer_flate(data.as_slice())))
    });

    group.bench_function("FPNG-global", |b| {
        b.iter(|| {
            black_box(encode_fpng(
                data.as_slice(),
                DeflateEncodingStrategy::GlobalTables
            ))
        })
    });

    group.bench_function("FPNG-custom", |b| {
        b.iter(|| {
            black_box(encode_fpng(
                data.as_slice(),
                DeflateEncodingStrategy::CustomTables
            ))
        })
    });
}

fn decode_test(c: &mut Criterion)
{
    let data = encode_writer_flate(&bench_data());

    let mut group = c.benchmark_group("ZLIB decoding");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("FLATE", |b| {
        b.iter(|| black_box(decode_writer_flate(data.as_slice())))
    });

    group.bench_function("FPNG", |b| {
        b.iter(|| black_box(DeflateDecoder::new(data.as_slice()).decode_zlib().unwrap()))
    });
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(10))
      };
    targets=encode_test, decode_test);

criterion_main!(benches);
