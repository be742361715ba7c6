use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use fpng::CompressionFlags;

const WIDTH: usize = 1024;
const HEIGHT: usize = 768;

/// Smooth gradients with a bit of noise
fn bench_image(channels: usize) -> Vec<u8>
{
    let mut state = 0x9E37_79B9_u32;

    (0..WIDTH * HEIGHT * channels)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;

            let px = i / channels;
            let smooth = ((px % WIDTH) / 4 + (px / WIDTH) / 3 + (i % channels) * 50) as u8;
            smooth.wrapping_add((state & 3) as u8)
        })
        .collect()
}

fn encode_ref(data: &[u8], channels: usize) -> Vec<u8>
{
    let color = if channels == 3
    {
        png::ColorType::Rgb
    }
    else
    {
        png::ColorType::Rgba
    };
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, WIDTH as u32, HEIGHT as u32);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);

        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }
    out
}

fn decode_ref(data: &[u8]) -> Vec<u8>
{
    let decoder = png::Decoder::new(data);
    let mut reader = decoder.read_info().unwrap();

    let mut buf = vec![0; reader.output_buffer_size()];
    let _ = reader.next_frame(&mut buf).unwrap();

    buf
}

fn encode_test(c: &mut Criterion)
{
    for channels in [3, 4]
    {
        let data = bench_image(channels);

        let mut group = c.benchmark_group(format!("[fpng]: encoding {channels} channels"));
        group.throughput(Throughput::Bytes(data.len() as u64));

        for (name, flags) in [
            ("default", CompressionFlags::NONE),
            ("slower", CompressionFlags::ENCODE_SLOWER),
            ("uncompressed", CompressionFlags::FORCE_UNCOMPRESSED)
        ]
        {
            group.bench_function(format!("fpng {name}"), |b| {
                b.iter(|| {
                    black_box(fpng::encode(&data, WIDTH, HEIGHT, channels, flags).unwrap())
                })
            });
        }
        group.bench_function("image-rs fast", |b| {
            b.iter(|| black_box(encode_ref(&data, channels)))
        });
    }
}

fn decode_test(c: &mut Criterion)
{
    for channels in [3, 4]
    {
        let data = bench_image(channels);
        let png = fpng::encode(&data, WIDTH, HEIGHT, channels, CompressionFlags::NONE).unwrap();

        let mut group = c.benchmark_group(format!("[fpng]: decoding {channels} channels"));
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_function("fpng", |b| {
            b.iter(|| black_box(fpng::decode(&png, channels).unwrap()))
        });

        group.bench_function("image-rs", |b| b.iter(|| black_box(decode_ref(&png))));
    }
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(20))
      };
    targets=encode_test,decode_test);

criterion_main!(benches);
