/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::format;
use alloc::vec::Vec;

use fpng_core::bytestream::ZByteWriter;
use fpng_core::options::{CompressionFlags, EncoderOptions};
use fpng_deflate::{DeflateEncoder, DeflateEncodingOptions, DeflateEncodingStrategy};
use log::{debug, trace};

use crate::constants::{MAX_DIMENSIONS, PNG_SIGNATURE};
use crate::error::PngErrors;
use crate::filters::filter_scanlines;
use crate::headers::writers::{ihdr_bytes, write_chunk};

/// A png encoder for 8 bit RGB and RGBA images
///
/// # Example
/// ```
/// use fpng::{ColorSpace, EncoderOptions, PngEncoder};
///
/// let pixels = [255_u8; 3 * 2 * 4];
/// let options = EncoderOptions::new(3, 2, ColorSpace::RGBA);
///
/// let png = PngEncoder::new(&pixels, options).encode().unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
pub struct PngEncoder<'a> {
    pub(crate) options: EncoderOptions,
    pub(crate) data:    &'a [u8]
}

impl<'a> PngEncoder<'a> {
    /// Create a new encoder that can encode an image into a PNG chunk
    ///
    /// `data` holds `width * height * channels` bytes, rows top to bottom
    pub fn new(data: &'a [u8], options: EncoderOptions) -> PngEncoder<'a> {
        PngEncoder { options, data }
    }

    /// Map the compression flags to a deflate strategy
    ///
    /// Stored wins when both flags are present
    pub(crate) fn deflate_strategy(flags: CompressionFlags) -> DeflateEncodingStrategy {
        if flags.contains(CompressionFlags::FORCE_UNCOMPRESSED) {
            DeflateEncodingStrategy::NoCompression
        } else if flags.contains(CompressionFlags::ENCODE_SLOWER) {
            DeflateEncodingStrategy::CustomTables
        } else {
            DeflateEncodingStrategy::GlobalTables
        }
    }

    fn validate(&self) -> Result<(), PngErrors> {
        let width = self.options.get_width();
        let height = self.options.get_height();

        if width == 0 || height == 0 {
            return Err(PngErrors::InvalidDimensions(format!(
                "Width and height must be non zero, found {width}x{height}"
            )));
        }
        if width > MAX_DIMENSIONS || height > MAX_DIMENSIONS {
            return Err(PngErrors::InvalidDimensions(format!(
                "Dimensions {width}x{height} exceed the maximum of {MAX_DIMENSIONS}"
            )));
        }
        let components = self.options.get_colorspace().num_components();

        let overflow = || {
            PngErrors::InvalidDimensions(format!(
                "Dimensions {width}x{height}x{components} overflow the address space"
            ))
        };
        let expected = width
            .checked_mul(height)
            .and_then(|x| x.checked_mul(components))
            .ok_or_else(overflow)?;

        // the filtered image carries one extra byte per row
        width
            .checked_mul(components)
            .and_then(|x| x.checked_add(1))
            .and_then(|x| x.checked_mul(height))
            .ok_or_else(overflow)?;

        if self.data.len() != expected {
            return Err(PngErrors::InvalidDimensions(format!(
                "Expected {expected} bytes for a {width}x{height}x{components} image, found {}",
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Encode the image into a complete png stream
    pub fn encode(&self) -> Result<Vec<u8>, PngErrors> {
        self.validate()?;

        let width = self.options.get_width();
        let height = self.options.get_height();
        let colorspace = self.options.get_colorspace();
        let flags = self.options.get_flags();

        let filtered = filter_scanlines(
            self.data,
            width,
            height,
            colorspace.num_components(),
            self.options.get_filter_strategy(),
            self.options.use_sse41()
        );

        let strategy = Self::deflate_strategy(flags);

        debug!("Encoding {width}x{height} {colorspace:?} image, flags {flags:?}, {strategy:?}");

        let deflate_options = DeflateEncodingOptions::default()
            .set_strategy(strategy)
            .set_max_chain(usize::from(self.options.get_max_chain()));

        let compressed = DeflateEncoder::new_with_options(&filtered, deflate_options).encode_zlib();

        trace!("Compressed {} bytes to {}", filtered.len(), compressed.len());

        if compressed.len() < 6 {
            return Err(PngErrors::EncodeError("Zlib stream too short"));
        }
        let chunk_size = self.options.get_idat_chunk_size();
        let num_idat = (compressed.len() + chunk_size - 1) / chunk_size;

        // signature + IHDR + IDAT chunks + IEND
        let mut writer = ZByteWriter::with_capacity(8 + 25 + compressed.len() + 12 * num_idat + 12);

        writer.write_all(&PNG_SIGNATURE);
        // both dimensions are below MAX_DIMENSIONS, so they fit
        write_chunk(
            &mut writer,
            b"IHDR",
            &ihdr_bytes(width as u32, height as u32, colorspace)
        );
        for chunk in compressed.chunks(chunk_size) {
            write_chunk(&mut writer, b"IDAT", chunk);
        }
        write_chunk(&mut writer, b"IEND", &[]);

        Ok(writer.into_inner())
    }
}
