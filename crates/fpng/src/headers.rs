use alloc::format;

use fpng_core::bytestream::ZByteReader;
use fpng_core::colorspace::ColorSpace;
use log::info;

use crate::constants::IHDR_LENGTH;
use crate::decoder::{PngChunk, PngDecoder};
use crate::enums::PngColor;
use crate::error::PngErrors;

pub(crate) mod writers;

impl<'a> PngDecoder<'a>
{
    pub(crate) fn parse_ihdr(&mut self, chunk: PngChunk<'a>) -> Result<(), PngErrors>
    {
        if self.seen_hdr
        {
            return Err(PngErrors::CorruptData("Multiple IHDR chunks".into()));
        }

        if chunk.length != IHDR_LENGTH
        {
            return Err(PngErrors::CorruptData(format!(
                "Bad IHDR length {}, expected {IHDR_LENGTH}",
                chunk.length
            )));
        }
        let mut stream = ZByteReader::new(chunk.data);

        let width = stream.get_u32_be_err()? as usize;
        let height = stream.get_u32_be_err()? as usize;

        if width == 0 || height == 0
        {
            return Err(PngErrors::InvalidDimensions(
                "Width or height cannot be zero".into()
            ));
        }

        if width > self.options.get_max_width()
        {
            return Err(PngErrors::InvalidDimensions(format!(
                "Image width {width}, larger than maximum configured width {}, aborting",
                self.options.get_max_width()
            )));
        }

        if height > self.options.get_max_height()
        {
            return Err(PngErrors::InvalidDimensions(format!(
                "Image height {height}, larger than maximum configured height {}, aborting",
                self.options.get_max_height()
            )));
        }

        let depth = stream.get_u8_err()?;
        let color_int = stream.get_u8_err()?;

        let color = PngColor::from_int(color_int).ok_or_else(|| {
            PngErrors::CorruptData(format!("Unknown color value {color_int}"))
        })?;

        if depth != 8
        {
            return Err(PngErrors::UnsupportedFormat(format!(
                "Bit depth {depth} is not supported, only 8 bit images are"
            )));
        }

        let colorspace = match color
        {
            PngColor::RGB => ColorSpace::RGB,
            PngColor::RGBA => ColorSpace::RGBA,
            _ =>
            {
                return Err(PngErrors::UnsupportedFormat(format!(
                    "Color type {color:?} is not supported, only RGB and RGBA are"
                )))
            }
        };

        if stream.get_u8_err()? != 0
        {
            return Err(PngErrors::CorruptData("Unknown compression method".into()));
        }

        let filter_method = stream.get_u8_err()?;

        if filter_method != 0
        {
            return Err(PngErrors::CorruptData(format!(
                "Unknown filter method {filter_method}"
            )));
        }

        match stream.get_u8_err()?
        {
            0 => (),
            1 =>
            {
                return Err(PngErrors::UnsupportedFormat(
                    "Interlaced (Adam7) images are not supported".into()
                ))
            }
            method =>
            {
                return Err(PngErrors::CorruptData(format!(
                    "Unknown interlace method {method}"
                )))
            }
        }

        let components = colorspace.num_components();

        // filtered size, one filter byte per row
        let filtered_len = width
            .checked_mul(components)
            .and_then(|row| row.checked_add(1))
            .and_then(|row| row.checked_mul(height))
            .ok_or_else(|| {
                PngErrors::InvalidDimensions(format!(
                    "Dimensions {width}x{height} overflow the address space"
                ))
            })?;

        info!("Width: {width}");
        info!("Height: {height}");
        info!("Color type: {color:?}");
        info!("Depth: {depth}");

        self.png_info.width = width;
        self.png_info.height = height;
        self.png_info.colorspace = colorspace;
        self.png_info.channels = components;
        self.filtered_len = filtered_len;
        self.seen_hdr = true;

        Ok(())
    }
}
