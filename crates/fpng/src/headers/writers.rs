/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use fpng_core::bytestream::ZByteWriter;
use fpng_core::colorspace::ColorSpace;

use crate::constants::IHDR_LENGTH;
use crate::crc::chunk_crc;
use crate::enums::PngColor;

/// Build the 13 byte IHDR payload
pub(crate) fn ihdr_bytes(width: u32, height: u32, colorspace: ColorSpace) -> [u8; IHDR_LENGTH] {
    let color = match colorspace {
        ColorSpace::RGB => PngColor::RGB,
        ColorSpace::RGBA => PngColor::RGBA
    };
    let mut ihdr = [0; IHDR_LENGTH];

    ihdr[0..4].copy_from_slice(&width.to_be_bytes());
    ihdr[4..8].copy_from_slice(&height.to_be_bytes());
    // depth
    ihdr[8] = 8;
    ihdr[9] = color.to_int();
    // compression, filter and interlace methods stay zero
    ihdr
}

/// Write one chunk, i.e length, chunk type, data and crc
///
/// The crc covers the chunk type and data but not the length
pub(crate) fn write_chunk(writer: &mut ZByteWriter, name: &[u8; 4], data: &[u8]) {
    writer.write_u32_be(data.len() as u32);
    writer.write_all(name);
    writer.write_all(data);
    writer.write_u32_be(chunk_crc(name, data));
}

#[cfg(test)]
mod tests {
    use fpng_core::bytestream::ZByteWriter;
    use fpng_core::colorspace::ColorSpace;

    use super::{ihdr_bytes, write_chunk};

    #[test]
    fn iend_layout() {
        let mut writer = ZByteWriter::with_capacity(12);
        write_chunk(&mut writer, b"IEND", &[]);

        assert_eq!(
            writer.into_inner(),
            [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn ihdr_fields() {
        let ihdr = ihdr_bytes(640, 2, ColorSpace::RGBA);

        assert_eq!(ihdr, [0, 0, 2, 128, 0, 0, 0, 2, 8, 6, 0, 0, 0]);
    }
}
