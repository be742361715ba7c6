use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use fpng_core::bytestream::ZByteReader;
use fpng_core::colorspace::ColorSpace;
use fpng_core::options::DecoderOptions;
use fpng_deflate::{DeflateDecoder, DeflateOptions};
use log::{debug, trace};

use crate::constants::{MAX_CHUNK_LENGTH, PNG_SIGNATURE};
use crate::enums::{FilterMethod, PngChunkType};
use crate::error::PngErrors;
use crate::filters::de_filter_row;

/// Where the decoder is in the container
///
/// `Done` and `Failed` are terminal, every error moves the
/// decoder to `Failed` regardless of the state it was in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecodeState
{
    Start,
    SignatureChecked,
    HeaderValidated,
    DataAccumulating,
    TrailerSeen,
    Done,
    Failed
}

#[derive(Copy, Clone)]
pub(crate) struct PngChunk<'a>
{
    pub length:     usize,
    pub chunk_type: PngChunkType,
    pub chunk:      [u8; 4],
    pub data:       &'a [u8]
}

/// Image information gathered from the IHDR chunk
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
pub struct PngInfo
{
    pub width:      usize,
    pub height:     usize,
    /// Channels stored in the file, 3 or 4
    pub channels:   usize,
    pub colorspace: ColorSpace
}

/// A png decoder for 8 bit, non-interlaced RGB and RGBA images
///
/// Anything outside that subset is reported as
/// [`PngErrors::UnsupportedFormat`] so callers can hand the image
/// to a general decoder.
///
/// # Example
/// ```
/// use fpng::{PngDecoder, DecodeState};
///
/// let png = fpng::encode(&[7; 2 * 2 * 3], 2, 2, 3, fpng::CompressionFlags::NONE).unwrap();
/// let mut decoder = PngDecoder::new(&png);
///
/// decoder.decode_headers().unwrap();
/// assert_eq!(decoder.get_info().unwrap().channels, 3);
///
/// let pixels = decoder.decode_raw().unwrap();
/// assert_eq!(pixels, [7; 12]);
/// assert_eq!(decoder.state(), DecodeState::Done);
/// ```
pub struct PngDecoder<'a>
{
    pub(crate) seen_hdr:     bool,
    pub(crate) stream:       ZByteReader<'a>,
    pub(crate) options:      DecoderOptions,
    pub(crate) png_info:     PngInfo,
    pub(crate) state:        DecodeState,
    pub(crate) idat_chunks:  Vec<u8>,
    pub(crate) idat_ended:   bool,
    pub(crate) filtered_len: usize
}

impl<'a> PngDecoder<'a>
{
    pub fn new(data: &'a [u8]) -> PngDecoder<'a>
    {
        PngDecoder::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PngDecoder<'a>
    {
        PngDecoder {
            seen_hdr: false,
            stream: ZByteReader::new(data),
            options,
            png_info: PngInfo::default(),
            state: DecodeState::Start,
            idat_chunks: Vec::new(),
            idat_ended: false,
            filtered_len: 0
        }
    }

    /// Current position in the decode state machine
    pub const fn state(&self) -> DecodeState
    {
        self.state
    }

    /// Image information, or `None` if the headers have not been decoded
    pub const fn get_info(&self) -> Option<PngInfo>
    {
        if !self.seen_hdr
        {
            return None;
        }
        Some(self.png_info)
    }

    /// Get image dimensions, or `None` if the headers have not been decoded
    pub const fn get_dimensions(&self) -> Option<(usize, usize)>
    {
        if !self.seen_hdr
        {
            return None;
        }
        Some((self.png_info.width, self.png_info.height))
    }

    /// Read the signature and the chunks before the first IDAT
    ///
    /// After this, [`get_info`](Self::get_info) returns the image information.
    /// Calling this more than once is a no-op.
    pub fn decode_headers(&mut self) -> Result<(), PngErrors>
    {
        let result = self.decode_headers_inner();
        self.fail_on_error(result)
    }

    /// Decode the image, returning pixels in the colorspace stored in the file
    ///
    /// The output is `width * height * channels` bytes, rows top to bottom
    pub fn decode_raw(&mut self) -> Result<Vec<u8>, PngErrors>
    {
        let result = self.decode_raw_inner();
        self.fail_on_error(result)
    }

    fn fail_on_error<T>(&mut self, result: Result<T, PngErrors>) -> Result<T, PngErrors>
    {
        if result.is_err()
        {
            self.state = DecodeState::Failed;
        }
        result
    }

    fn decode_headers_inner(&mut self) -> Result<(), PngErrors>
    {
        match self.state
        {
            DecodeState::Start => (),
            DecodeState::Failed => return Err(PngErrors::DecodeError("Decoder previously failed")),
            _ => return Ok(())
        }

        if !self.stream.has(PNG_SIGNATURE.len())
        {
            return Err(PngErrors::TruncatedInput);
        }
        let signature = self.stream.get_fixed_bytes_or_err::<8>()?;

        if signature != PNG_SIGNATURE
        {
            return Err(PngErrors::CorruptData(format!(
                "Bad png signature {signature:?}"
            )));
        }
        self.state = DecodeState::SignatureChecked;

        let header = self.read_chunk_header()?;

        if header.chunk_type != PngChunkType::IHDR
        {
            return Err(PngErrors::CorruptData(
                "First chunk not IHDR, corrupt PNG".into()
            ));
        }
        self.parse_ihdr(header)?;
        self.state = DecodeState::HeaderValidated;

        // stop at the first IDAT without consuming it
        while self.stream.peek_at(4, 4)? != b"IDAT"
        {
            let header = self.read_chunk_header()?;
            self.handle_chunk(header)?;
        }
        Ok(())
    }

    fn decode_raw_inner(&mut self) -> Result<Vec<u8>, PngErrors>
    {
        match self.state
        {
            DecodeState::Done => return Err(PngErrors::DecodeError("Image already decoded")),
            DecodeState::Failed => return Err(PngErrors::DecodeError("Decoder previously failed")),
            _ => ()
        }
        self.decode_headers_inner()?;

        while self.state != DecodeState::TrailerSeen
        {
            let header = self.read_chunk_header()?;
            self.handle_chunk(header)?;
        }
        if !self.stream.eof()
        {
            debug!(
                "Ignoring {} bytes after IEND",
                self.stream.get_bytes_left()
            );
        }

        let filtered = self.inflate()?;
        // done with the compressed data
        self.idat_chunks = Vec::new();

        let pixels = self.unfilter(&filtered)?;

        self.state = DecodeState::Done;

        Ok(pixels)
    }

    /// Read a whole chunk, confirming its crc
    ///
    /// On return the stream points to the next chunk
    fn read_chunk_header(&mut self) -> Result<PngChunk<'a>, PngErrors>
    {
        // Format is length - chunk type - [data] -  crc chunk
        let chunk_length = self.stream.get_u32_be_err()? as usize;
        let chunk = self.stream.get_fixed_bytes_or_err::<4>()?;

        if chunk_length > MAX_CHUNK_LENGTH
        {
            return Err(PngErrors::CorruptData(format!(
                "Chunk length {chunk_length} exceeds the maximum of {MAX_CHUNK_LENGTH}"
            )));
        }
        if !self.stream.has(chunk_length + 4 /*crc*/)
        {
            return Err(PngErrors::TruncatedInput);
        }
        let chunk_type = PngChunkType::from_name(chunk);

        trace!(
            "Chunk {:?}, length {chunk_length}",
            core::str::from_utf8(&chunk).unwrap_or("????")
        );

        let data = self.stream.get_as_ref(chunk_length)?;
        let crc = self.stream.get_u32_be_err()?;

        #[cfg(feature = "crc")]
        {
            if self.options.get_confirm_crc()
            {
                let calc_crc = crate::crc::chunk_crc(&chunk, data);

                if crc != calc_crc
                {
                    return Err(PngErrors::CorruptData(format!(
                        "Bad chunk crc, expected {crc:#010X} but found {calc_crc:#010X}"
                    )));
                }
            }
        }
        #[cfg(not(feature = "crc"))]
        {
            let _ = crc;
        }

        Ok(PngChunk {
            length: chunk_length,
            chunk_type,
            chunk,
            data
        })
    }

    fn handle_chunk(&mut self, header: PngChunk<'a>) -> Result<(), PngErrors>
    {
        let in_data = self.state == DecodeState::DataAccumulating;

        if in_data && header.chunk_type != PngChunkType::IDAT
        {
            self.idat_ended = true;
        }

        match header.chunk_type
        {
            PngChunkType::IHDR => Err(PngErrors::CorruptData("Multiple IHDR chunks".into())),
            PngChunkType::IDAT =>
            {
                if self.idat_ended
                {
                    return Err(PngErrors::CorruptData(
                        "IDAT chunks are not contiguous".into()
                    ));
                }
                self.idat_chunks.extend_from_slice(header.data);
                self.state = DecodeState::DataAccumulating;
                Ok(())
            }
            PngChunkType::PLTE =>
            {
                if in_data || self.idat_ended
                {
                    return Err(PngErrors::CorruptData("PLTE chunk after IDAT".into()));
                }
                // a suggested palette for truecolour images, not needed
                Ok(())
            }
            PngChunkType::IEND =>
            {
                if !in_data
                {
                    return Err(PngErrors::CorruptData("IEND before any IDAT chunk".into()));
                }
                if header.length != 0
                {
                    return Err(PngErrors::CorruptData("IEND chunk carries data".into()));
                }
                self.state = DecodeState::TrailerSeen;
                Ok(())
            }
            PngChunkType::Ancillary => Ok(()),
            PngChunkType::UnknownCritical => Err(PngErrors::UnsupportedFormat(format!(
                "Unknown critical chunk {:?}",
                core::str::from_utf8(&header.chunk).unwrap_or("????")
            )))
        }
    }

    fn inflate(&mut self) -> Result<Vec<u8>, PngErrors>
    {
        // the exact size is known, so anything beyond it is an error
        let expected = self.filtered_len;

        let options = DeflateOptions::default()
            .set_size_hint(expected)
            .set_limit(expected)
            .set_confirm_checksum(self.options.get_confirm_adler());

        let mut decoder = DeflateDecoder::new_with_options(&self.idat_chunks, options);

        let data = decoder.decode_zlib()?;

        if data.len() != expected
        {
            return Err(PngErrors::CorruptData(format!(
                "Decompressed data is {} bytes, expected {expected}",
                data.len()
            )));
        }
        Ok(data)
    }

    fn unfilter(&self, filtered: &[u8]) -> Result<Vec<u8>, PngErrors>
    {
        let info = self.png_info;
        let components = info.channels;
        let row_bytes = info.width * components;
        let use_sse41 = self.options.use_sse41();

        let mut out = vec![0; row_bytes * info.height];
        let zero_row = vec![0; row_bytes];

        let mut prev_start = None;

        for (i, in_row) in filtered.chunks_exact(row_bytes + 1).enumerate()
        {
            let filter = FilterMethod::from_int(in_row[0]).ok_or_else(|| {
                PngErrors::CorruptData(format!("Unknown filter byte {} at row {i}", in_row[0]))
            })?;

            let start = i * row_bytes;

            match prev_start
            {
                None =>
                {
                    de_filter_row(
                        filter,
                        &zero_row,
                        &in_row[1..],
                        &mut out[..row_bytes],
                        components,
                        use_sse41
                    );
                }
                Some(prev) =>
                {
                    let (before, current) = out.split_at_mut(start);

                    de_filter_row(
                        filter,
                        &before[prev..],
                        &in_row[1..],
                        &mut current[..row_bytes],
                        components,
                        use_sse41
                    );
                }
            }
            prev_start = Some(start);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests
{
    use alloc::vec::Vec;

    use fpng_core::options::DecoderOptions;

    use super::{DecodeState, PngDecoder};
    use crate::error::PngErrors;
    use crate::{encode, CompressionFlags};

    fn small_png() -> Vec<u8>
    {
        let pixels: Vec<u8> = (0..4 * 3 * 3).map(|x| x as u8).collect();
        encode(&pixels, 4, 3, 3, CompressionFlags::NONE).unwrap()
    }

    #[test]
    fn states_progress()
    {
        let png = small_png();
        let mut decoder = PngDecoder::new(&png);

        assert_eq!(decoder.state(), DecodeState::Start);
        assert!(decoder.get_info().is_none());

        decoder.decode_headers().unwrap();
        assert_eq!(decoder.state(), DecodeState::HeaderValidated);
        assert_eq!(decoder.get_dimensions(), Some((4, 3)));

        decoder.decode_raw().unwrap();
        assert_eq!(decoder.state(), DecodeState::Done);

        // terminal
        assert!(decoder.decode_raw().is_err());
        assert_eq!(decoder.state(), DecodeState::Done);
    }

    #[test]
    fn failure_is_terminal()
    {
        let mut png = small_png();
        png[0] = 0;

        let mut decoder = PngDecoder::new(&png);

        assert!(matches!(decoder.decode_raw(), Err(PngErrors::CorruptData(_))));
        assert_eq!(decoder.state(), DecodeState::Failed);
        assert!(matches!(decoder.decode_headers(), Err(PngErrors::DecodeError(_))));
    }

    #[test]
    fn short_signature_is_truncated()
    {
        let mut decoder = PngDecoder::new(&[137, 80, 78]);

        assert!(matches!(decoder.decode_headers(), Err(PngErrors::TruncatedInput)));
    }

    #[test]
    fn max_dimensions_are_enforced()
    {
        let png = small_png();
        let options = DecoderOptions::default().set_max_width(3);
        let mut decoder = PngDecoder::new_with_options(&png, options);

        assert!(matches!(decoder.decode_headers(), Err(PngErrors::InvalidDimensions(_))));
    }

    #[test]
    fn trailing_bytes_are_ignored()
    {
        let mut png = small_png();
        png.extend_from_slice(b"garbage after the end");

        let mut decoder = PngDecoder::new(&png);
        assert_eq!(decoder.decode_raw().unwrap().len(), 4 * 3 * 3);
    }
}
