//! A fast png encoder and decoder for 8 bit RGB and RGBA images
//!
//! This trades format coverage for speed. Only 8 bit, non-interlaced,
//! truecolour images (with or without alpha) are read or written,
//! anything else is reported as [`PngErrors::UnsupportedFormat`] so that
//! callers can fall back to a general purpose decoder such as the
//! [png](https://crates.io/crates/png) crate.
//!
//! # Features
//! - Fast deflate compressor with precomputed Huffman tables, see [`fpng_deflate`]
//! - Platform specific intrinsics for accelerated filtering on x86
//! - Strict validation, no partially decoded images are ever returned
//!
//! # Usage
//!
//! #### Encoding and decoding
//!
//! ```
//! use fpng::CompressionFlags;
//!
//! let pixels = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
//! let png = fpng::encode(&pixels, 2, 2, 3, CompressionFlags::NONE).unwrap();
//!
//! let image = fpng::decode(&png, 3).unwrap();
//! assert_eq!(image.pixels, pixels);
//! assert_eq!((image.width, image.height, image.channels), (2, 2, 3));
//! ```
//!
//! #### Smaller files
//!
//! [`CompressionFlags::ENCODE_SLOWER`] builds Huffman tables for each image,
//! which is slower but smaller, [`CompressionFlags::FORCE_UNCOMPRESSED`]
//! stores the data as is.
//!
//! ```
//! use fpng::CompressionFlags;
//!
//! let pixels = vec![17; 64 * 64 * 4];
//! let small = fpng::encode(&pixels, 64, 64, 4, CompressionFlags::ENCODE_SLOWER).unwrap();
//! let stored = fpng::encode(&pixels, 64, 64, 4, CompressionFlags::FORCE_UNCOMPRESSED).unwrap();
//!
//! assert!(small.len() < stored.len());
//! ```
//!
//! # Extracting metadata
//!
//! [`get_info`] reads the image header without decompressing anything
//!
//!```no_run
//! let info = fpng::get_info(&[]).unwrap();
//! println!("{}x{} {} channels", info.width, info.height, info.channels);
//!```
//!
//! # Crate features
//! - `std`: file helpers, runtime cpu feature detection
//! - `sse`: SSE accelerated filters on x86 and x86_64
//! - `crc`: chunk crc verification, can also be switched off at runtime
//!   via [`DecoderOptions::set_confirm_crc`]
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

use alloc::format;
use alloc::vec::Vec;

pub use decoder::{DecodeState, PngDecoder, PngInfo};
pub use encoder::PngEncoder;
pub use error::PngErrors;
pub use fpng_core;
pub use fpng_core::colorspace::ColorSpace;
pub use fpng_core::cpu::capabilities_supported;
pub use fpng_core::options::{CompressionFlags, DecoderOptions, EncoderOptions, FilterStrategy};
pub use fpng_deflate;
pub use fpng_deflate::adler32;

pub use crate::crc::crc32;

mod constants;
mod crc;
mod decoder;
mod encoder;
mod enums;
pub mod error;
mod filters;
mod headers;
mod utils;

/// A decoded image
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DecodedImage
{
    /// Pixels in the layout requested at decode time
    pub pixels:   Vec<u8>,
    pub width:    usize,
    pub height:   usize,
    /// Channels stored in the file, which may differ from the
    /// layout of `pixels`
    pub channels: usize
}

fn colorspace_for(channels: usize) -> Result<ColorSpace, PngErrors>
{
    ColorSpace::from_components(channels).ok_or_else(|| {
        PngErrors::InvalidParameter(format!("Channels must be 3 or 4, found {channels}"))
    })
}

/// Encode 8 bit RGB or RGBA pixels into a png
///
/// `channels` is 3 or 4, or 0 to infer it from the buffer length.
///
/// # Errors
/// - [`PngErrors::InvalidDimensions`] for zero or oversized dimensions, or when
///   `pixels.len() != width * height * channels`
/// - [`PngErrors::InvalidParameter`] for a channel count other than 0, 3 or 4
pub fn encode(
    pixels: &[u8], width: usize, height: usize, channels: usize, flags: CompressionFlags
) -> Result<Vec<u8>, PngErrors>
{
    let channels = if channels == 0
    {
        let area = width.checked_mul(height).filter(|x| *x != 0).ok_or_else(|| {
            PngErrors::InvalidDimensions(format!("Cannot infer channels for a {width}x{height} image"))
        })?;
        pixels.len() / area
    }
    else
    {
        channels
    };
    let options = EncoderOptions::new(width, height, colorspace_for(channels)?).set_flags(flags);

    encode_with_options(pixels, options)
}

/// Encode pixels with full control over the encoder
pub fn encode_with_options(pixels: &[u8], options: EncoderOptions) -> Result<Vec<u8>, PngErrors>
{
    PngEncoder::new(pixels, options).encode()
}

/// Encode with flags passed as a raw integer, as bindings receive them
///
/// Values with bits other than the two defined flags are rejected
pub fn encode_flags_raw(
    pixels: &[u8], width: usize, height: usize, channels: usize, flags: u32
) -> Result<Vec<u8>, PngErrors>
{
    let flags = CompressionFlags::from_raw(flags)
        .ok_or_else(|| PngErrors::InvalidParameter(format!("Unknown compression flags {flags}")))?;

    encode(pixels, width, height, channels, flags)
}

/// Decode a png, converting the pixels to `expected_channels` (3 or 4)
///
/// Missing alpha is filled with 255, surplus alpha is dropped.
/// The returned `channels` is the count stored in the file.
pub fn decode(png: &[u8], expected_channels: usize) -> Result<DecodedImage, PngErrors>
{
    decode_with_options(png, expected_channels, DecoderOptions::default())
}

/// [`decode`] with custom decoder options
pub fn decode_with_options(
    png: &[u8], expected_channels: usize, options: DecoderOptions
) -> Result<DecodedImage, PngErrors>
{
    colorspace_for(expected_channels)?;

    let mut decoder = PngDecoder::new_with_options(png, options);
    let pixels = decoder.decode_raw()?;

    let info = decoder
        .get_info()
        .ok_or(PngErrors::DecodeError("Headers missing after decoding"))?;

    Ok(DecodedImage {
        pixels:   utils::convert_channels(pixels, info.channels, expected_channels),
        width:    info.width,
        height:   info.height,
        channels: info.channels
    })
}

/// Read image information without decompressing the image
pub fn get_info(png: &[u8]) -> Result<PngInfo, PngErrors>
{
    let mut decoder = PngDecoder::new(png);
    decoder.decode_headers()?;

    decoder
        .get_info()
        .ok_or(PngErrors::DecodeError("Headers missing after decoding"))
}

/// Encode an image and write it to `path`
#[cfg(feature = "std")]
pub fn encode_to_file<P: AsRef<std::path::Path>>(
    path: P, pixels: &[u8], width: usize, height: usize, channels: usize,
    flags: CompressionFlags
) -> Result<(), PngErrors>
{
    let png = encode(pixels, width, height, channels, flags)?;
    std::fs::write(path, png)?;
    Ok(())
}

/// Read and decode the png at `path`
#[cfg(feature = "std")]
pub fn decode_from_file<P: AsRef<std::path::Path>>(
    path: P, expected_channels: usize
) -> Result<DecodedImage, PngErrors>
{
    let png = std::fs::read(path)?;
    decode(&png, expected_channels)
}
