/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Cross checks against the png crate

use fpng::error::PngErrors;
use fpng::{decode, encode, CompressionFlags};
use nanorand::{Rng, WyRand};

fn decode_ref(data: &[u8]) -> (Vec<u8>, png::ColorType) {
    let decoder = png::Decoder::new(data);
    let mut reader = decoder.read_info().unwrap();

    // Allocate the output buffer.
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).unwrap();
    buf.truncate(info.buffer_size());

    (buf, info.color_type)
}

fn encode_ref(
    data: &[u8], width: u32, height: u32, color: png::ColorType, depth: png::BitDepth,
    filter: png::FilterType, adaptive: bool
) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        encoder.set_filter(filter);

        if adaptive {
            encoder.set_adaptive_filter(png::AdaptiveFilterType::Adaptive);
        }
        if color == png::ColorType::Indexed {
            let palette: Vec<u8> = (0..=255).flat_map(|x: u8| [x, 255 - x, x / 2]).collect();
            encoder.set_palette(palette);
        }
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }
    out
}

fn image(width: usize, height: usize, channels: usize, seed: u64) -> Vec<u8> {
    let mut rng = WyRand::new_seed(seed);

    (0..width * height * channels)
        .map(|i| {
            let px = i / channels;
            let smooth = (px % width + px / width) as u8;
            smooth.wrapping_add(rng.generate_range(0_u8..8))
        })
        .collect()
}

#[test]
fn png_crate_reads_our_output() {
    for (channels, color) in [(3, png::ColorType::Rgb), (4, png::ColorType::Rgba)] {
        let pixels = image(77, 41, channels, channels as u64);

        for flags in [
            CompressionFlags::NONE,
            CompressionFlags::ENCODE_SLOWER,
            CompressionFlags::FORCE_UNCOMPRESSED
        ] {
            let png = encode(&pixels, 77, 41, channels, flags).unwrap();
            let (decoded, color_type) = decode_ref(&png);

            assert_eq!(color_type, color);
            assert!(decoded == pixels, "{flags:?}");
        }
    }
}

#[test]
fn we_read_png_crate_output() {
    let filters = [
        png::FilterType::NoFilter,
        png::FilterType::Sub,
        png::FilterType::Up,
        png::FilterType::Avg,
        png::FilterType::Paeth
    ];

    for (channels, color) in [(3, png::ColorType::Rgb), (4, png::ColorType::Rgba)] {
        let pixels = image(53, 29, channels, 19);

        for filter in filters {
            for adaptive in [false, true] {
                let png = encode_ref(
                    &pixels,
                    53,
                    29,
                    color,
                    png::BitDepth::Eight,
                    filter,
                    adaptive
                );
                let decoded = decode(&png, channels).unwrap();

                assert_eq!(decoded.pixels, pixels, "{filter:?} adaptive: {adaptive}");
                assert_eq!(decoded.channels, channels);
            }
        }
    }
}

#[test]
fn palette_is_unsupported() {
    let indices = image(16, 16, 1, 4);
    let png = encode_ref(
        &indices,
        16,
        16,
        png::ColorType::Indexed,
        png::BitDepth::Eight,
        png::FilterType::Sub,
        false
    );

    assert!(matches!(decode(&png, 3), Err(PngErrors::UnsupportedFormat(_))));
}

#[test]
fn sixteen_bit_is_unsupported() {
    for (color, channels) in [(png::ColorType::Rgb, 6), (png::ColorType::Rgba, 8)] {
        let data = &image(16, 16, channels, 5)[..];
        let png = encode_ref(
            data,
            16,
            16,
            color,
            png::BitDepth::Sixteen,
            png::FilterType::Sub,
            false
        );
        let err = decode(&png, 4).unwrap_err();

        assert!(matches!(err, PngErrors::UnsupportedFormat(_)), "{err:?}");
        assert!(matches!(fpng::get_info(&png), Err(PngErrors::UnsupportedFormat(_))));
    }
}

#[test]
fn grayscale_is_unsupported() {
    for (color, channels) in [(png::ColorType::Grayscale, 1), (png::ColorType::GrayscaleAlpha, 2)] {
        let data = image(9, 9, channels, 6);
        let png = encode_ref(
            &data,
            9,
            9,
            color,
            png::BitDepth::Eight,
            png::FilterType::Up,
            false
        );

        assert!(matches!(decode(&png, 3), Err(PngErrors::UnsupportedFormat(_))));
    }
}

#[test]
fn chunk_crcs_agree_with_reference() {
    let data = image(40, 40, 4, 8);
    let png = encode_ref(
        &data,
        40,
        40,
        png::ColorType::Rgba,
        png::BitDepth::Eight,
        png::FilterType::Paeth,
        true
    );

    let mut pos = 8;
    while pos < png.len() {
        let length = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
        let stored = u32::from_be_bytes(
            png[pos + 8 + length..pos + 12 + length]
                .try_into()
                .unwrap()
        );

        assert_eq!(fpng::crc32(&png[pos + 4..pos + 8 + length], 0), stored);
        pos += 12 + length;
    }
}
