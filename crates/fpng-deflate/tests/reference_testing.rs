use std::io::prelude::*;
use std::io::Cursor;

use flate2::Compression;
use fpng_deflate::errors::DecodeErrorStatus;
use fpng_deflate::{
    DeflateDecoder, DeflateEncoder, DeflateEncodingOptions, DeflateEncodingStrategy,
    DeflateOptions
};
use nanorand::{Rng, WyRand};

const STRATEGIES: [DeflateEncodingStrategy; 3] = [
    DeflateEncodingStrategy::NoCompression,
    DeflateEncodingStrategy::GlobalTables,
    DeflateEncodingStrategy::CustomTables
];

fn decode_writer_flate(bytes: &[u8]) -> Vec<u8>
{
    let mut writer = Vec::new();

    let mut deflater = flate2::read::ZlibDecoder::new(Cursor::new(bytes));

    deflater.read_to_end(&mut writer).unwrap();

    writer
}

fn encode_writer_flate(bytes: &[u8], level: u32) -> Vec<u8>
{
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), Compression::new(level));

    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn encode_raw_flate(bytes: &[u8], level: u32) -> Vec<u8>
{
    let mut encoder = flate2::write::DeflateEncoder::new(Vec::new(), Compression::new(level));

    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn encode_fpng(bytes: &[u8], strategy: DeflateEncodingStrategy) -> Vec<u8>
{
    let options = DeflateEncodingOptions::default().set_strategy(strategy);

    DeflateEncoder::new_with_options(bytes, options).encode_zlib()
}

fn decode_fpng(bytes: &[u8]) -> Vec<u8>
{
    DeflateDecoder::new(bytes).decode_zlib().unwrap()
}

/// Data with a mix of runs, repeats at varying distances and noise
fn sample_data(size: usize, seed: u64) -> Vec<u8>
{
    let mut rng = WyRand::new_seed(seed);
    let mut data = Vec::with_capacity(size);

    while data.len() < size
    {
        match rng.generate_range(0_u8..4)
        {
            0 =>
            {
                let byte = rng.generate::<u8>();
                let run = rng.generate_range(1_usize..300);
                data.extend(std::iter::repeat(byte).take(run));
            }
            1 if data.len() > 10 =>
            {
                let dist = rng.generate_range(1..data.len().min(40000));
                let len = rng.generate_range(3_usize..400);
                let start = data.len() - dist;

                for i in 0..len
                {
                    data.push(data[start + i]);
                }
            }
            _ =>
            {
                let mut noise = vec![0_u8; rng.generate_range(1_usize..64)];
                rng.fill(&mut noise);
                data.extend_from_slice(&noise);
            }
        }
    }
    data.truncate(size);
    data
}

#[test]
fn flate_decodes_our_output()
{
    for (size, seed) in [(0, 1), (1, 2), (100, 3), (70_000, 4), (600_000, 5)]
    {
        let data = sample_data(size, seed);

        for strategy in STRATEGIES
        {
            let compressed = encode_fpng(&data, strategy);

            assert_eq!(
                decode_writer_flate(&compressed),
                data,
                "{strategy:?} failed for {size} bytes"
            );
        }
    }
}

#[test]
fn we_decode_flate_output()
{
    let data = sample_data(300_000, 11);

    for level in [0, 1, 6, 9]
    {
        let compressed = encode_writer_flate(&data, level);

        assert_eq!(decode_fpng(&compressed), data, "level {level}");
    }
}

#[test]
fn we_decode_raw_deflate()
{
    let data = sample_data(5000, 12);

    for level in [0, 1, 9]
    {
        let compressed = encode_raw_flate(&data, level);
        let decoded = DeflateDecoder::new(&compressed).decode_deflate().unwrap();

        assert_eq!(decoded, data, "level {level}");
    }
}

#[test]
fn tiny_inputs_with_fixed_codes()
{
    // short inputs make zlib pick the fixed huffman codes
    for data in [&b"a"[..], b"abcabcabcabc", b"hello hello hello"]
    {
        let compressed = encode_writer_flate(data, 6);
        assert_eq!(decode_fpng(&compressed), data);
    }
}

#[test]
fn our_roundtrip_all_strategies()
{
    let data = sample_data(200_000, 13);

    for strategy in STRATEGIES
    {
        assert_eq!(decode_fpng(&encode_fpng(&data, strategy)), data);
    }
}

#[test]
fn custom_tables_never_lose_to_global()
{
    for seed in 20..25
    {
        let data = sample_data(100_000, seed);

        let global = encode_fpng(&data, DeflateEncodingStrategy::GlobalTables);
        let custom = encode_fpng(&data, DeflateEncodingStrategy::CustomTables);

        assert!(custom.len() <= global.len(), "{} > {}", custom.len(), global.len());
    }
}

#[test]
fn stored_blocks_are_split()
{
    let data = sample_data(200_000, 30);
    let compressed = encode_fpng(&data, DeflateEncodingStrategy::NoCompression);

    // 2 header bytes, 4 trailer bytes and 5 bytes per 65535 byte block
    assert_eq!(compressed.len(), 2 + 4 + data.len() + 5 * 4);
    assert_eq!(&compressed[..2], &[0x78, 0x01]);
}

#[test]
fn zlib_headers_follow_strategy()
{
    let header = |s| encode_fpng(b"abc", s)[..2].to_vec();

    assert_eq!(header(DeflateEncodingStrategy::GlobalTables), [0x78, 0x5E]);
    assert_eq!(header(DeflateEncodingStrategy::CustomTables), [0x78, 0x9C]);
}

#[test]
fn mismatched_adler_is_reported()
{
    let mut compressed = encode_fpng(b"some data some data", DeflateEncodingStrategy::GlobalTables);
    let last = compressed.len() - 1;
    compressed[last] ^= 1;

    let err = DeflateDecoder::new(&compressed).decode_zlib().unwrap_err();
    assert!(matches!(err.error, DecodeErrorStatus::MismatchedAdler(..)));

    // the same stream passes when the checksum is not confirmed
    let options = DeflateOptions::default().set_confirm_checksum(false);
    let decoded = DeflateDecoder::new_with_options(&compressed, options)
        .decode_zlib()
        .unwrap();
    assert_eq!(decoded, b"some data some data");
}

#[test]
fn truncated_streams_are_reported()
{
    let data = sample_data(50_000, 40);

    for strategy in STRATEGIES
    {
        let compressed = encode_fpng(&data, strategy);

        for cut in [1, 3, compressed.len() / 2, compressed.len() - 5]
        {
            let err = DeflateDecoder::new(&compressed[..cut])
                .decode_zlib()
                .unwrap_err();

            assert!(
                matches!(err.error, DecodeErrorStatus::InsufficientData),
                "{strategy:?} cut at {cut}: {err:?}"
            );
        }
    }
}

#[test]
fn empty_input_is_insufficient()
{
    let err = DeflateDecoder::new(&[]).decode_deflate().unwrap_err();
    assert!(matches!(err.error, DecodeErrorStatus::InsufficientData));
}

#[test]
fn reserved_block_type_is_corrupt()
{
    // BFINAL = 1, BTYPE = 3
    let err = DeflateDecoder::new(&[0x07, 0, 0, 0])
        .decode_deflate()
        .unwrap_err();
    assert!(matches!(err.error, DecodeErrorStatus::CorruptData(_)));
}

#[test]
fn distance_before_start_is_corrupt()
{
    // fixed block whose first symbol is a length 3 match at distance 1
    let err = DeflateDecoder::new(&[0x03, 0x02, 0, 0])
        .decode_deflate()
        .unwrap_err();
    assert!(matches!(err.error, DecodeErrorStatus::CorruptData(_)));
}

#[test]
fn bad_stored_length_is_corrupt()
{
    // final stored block with LEN = 1 and NLEN = 0
    let err = DeflateDecoder::new(&[0x01, 0x01, 0x00, 0x00, 0x00, 0xAA])
        .decode_deflate()
        .unwrap_err();
    assert!(matches!(err.error, DecodeErrorStatus::CorruptData(_)));
}

#[test]
fn bad_zlib_header_is_rejected()
{
    let mut compressed = encode_fpng(b"abc", DeflateEncodingStrategy::GlobalTables);
    compressed[1] ^= 1;

    assert!(DeflateDecoder::new(&compressed).decode_zlib().is_err());
}

#[test]
fn output_limit_is_respected()
{
    let data = vec![7_u8; 10_000];

    for strategy in STRATEGIES
    {
        let compressed = encode_fpng(&data, strategy);

        let options = DeflateOptions::default().set_limit(9_999);
        let err = DeflateDecoder::new_with_options(&compressed, options)
            .decode_zlib()
            .unwrap_err();
        assert!(matches!(err.error, DecodeErrorStatus::OutputLimitExceeded(..)));

        let options = DeflateOptions::default().set_limit(10_000);
        let decoded = DeflateDecoder::new_with_options(&compressed, options)
            .decode_zlib()
            .unwrap();
        assert_eq!(decoded, data);
    }
}

#[test]
fn oversized_size_hint_is_not_preallocated()
{
    // expands far past both the hint cap and the minimum reservation
    let data = vec![0_u8; 2 << 20];

    for strategy in STRATEGIES
    {
        let compressed = encode_fpng(&data, strategy);

        let options = DeflateOptions::default()
            .set_size_hint(usize::MAX)
            .set_limit(usize::MAX);
        let decoded = DeflateDecoder::new_with_options(&compressed, options)
            .decode_zlib()
            .unwrap();
        assert_eq!(decoded, data);
    }
}

#[test]
fn adler32_matches_flate()
{
    let data = sample_data(10_000, 50);
    let compressed = encode_writer_flate(&data, 1);
    let trailer = &compressed[compressed.len() - 4..];

    let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);

    assert_eq!(fpng_deflate::adler32(&data, 1), expected);
    assert_eq!(
        fpng_deflate::adler32(&data[5000..], fpng_deflate::adler32(&data[..5000], 1)),
        expected
    );
}
