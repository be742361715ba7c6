//! A table driven deflate/zlib decoder
//!
//! Huffman decoding follows libdeflate: a main table indexed by the next
//! `TABLE_BITS` bits, with long codewords resolved through subtables.
//! Every block type is supported so streams from other encoders decode too.
#[cfg(feature = "zlib")]
use alloc::format;
use alloc::vec::Vec;

use log::trace;

use crate::bitstream::BitStreamReader;
use crate::constants::{
    DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN, DEFLATE_BLOCKTYPE_STATIC, DEFLATE_BLOCKTYPE_UNCOMPRESSED,
    DEFLATE_END_OF_BLOCK, DEFLATE_FIRST_LEN_SYM, DEFLATE_MAX_CODEWORD_LENGTH,
    DEFLATE_MAX_LITLEN_CODEWORD_LENGTH, DEFLATE_MAX_OFFSET_CODEWORD_LENGTH,
    DEFLATE_MAX_PRE_CODEWORD_LEN, DEFLATE_MAX_USED_LITLEN_SYMS, DEFLATE_MAX_USED_OFFSET_SYMS,
    DEFLATE_NUM_LITLEN_SYMS, DEFLATE_NUM_OFFSET_SYMS, DEFLATE_NUM_PRECODE_SYMS,
    DEFLATE_PRECODE_LENS_PERMUTATION, HUFFDEC_EXCEPTIONAL, HUFFDEC_SUBTABLE_POINTER, LENGTH_BASE,
    LENGTH_EXTRA, LITLEN_ENOUGH, LITLEN_TABLE_BITS, OFFSET_BASE, OFFSET_ENOUGH, OFFSET_EXTRA,
    OFFSET_TABLE_BITS, PRECODE_ENOUGH, PRECODE_TABLE_BITS
};
use crate::errors::{DecodeErrorStatus, InflateDecodeErrors};

/// Upper bound on how many output bytes are reserved per input byte
/// before decoding starts
const MAX_INITIAL_EXPANSION: usize = 16;
/// Smallest up front reservation regardless of input size
const MIN_INITIAL_CAPACITY: usize = 1 << 16;

/// Options that influence decompression
#[derive(Copy, Clone, Debug)]
pub struct DeflateOptions
{
    limit:            usize,
    confirm_checksum: bool,
    size_hint:        usize
}

impl Default for DeflateOptions
{
    fn default() -> Self
    {
        DeflateOptions {
            limit:            1 << 30,
            confirm_checksum: true,
            size_hint:        37000
        }
    }
}

impl DeflateOptions
{
    /// Get deflate/zlib limit option
    ///
    /// The decoder won't extend the inbuilt limit and will
    /// return an error if the limit is exceeded
    pub const fn get_limit(&self) -> usize
    {
        self.limit
    }
    /// Set a limit to the internal vector
    /// used to store decoded zlib/deflate output.
    pub fn set_limit(mut self, limit: usize) -> Self
    {
        self.limit = limit;
        self
    }

    /// Get whether the decoder will confirm a checksum
    /// after decoding
    pub const fn get_confirm_checksum(&self) -> bool
    {
        self.confirm_checksum
    }
    /// Set whether the decoder should confirm a checksum
    /// after decoding
    ///
    /// When false a missing zlib trailer is tolerated too
    pub fn set_confirm_checksum(mut self, yes: bool) -> Self
    {
        self.confirm_checksum = yes;
        self
    }

    /// Get the default set size hint for the decompressor
    pub const fn get_size_hint(&self) -> usize
    {
        self.size_hint
    }
    /// Set the size hint for the decompressor
    ///
    /// This can be used to prevent multiple re-allocations
    pub fn set_size_hint(mut self, hint: usize) -> Self
    {
        self.size_hint = hint;
        self
    }
}

pub struct DeflateDecoder<'a>
{
    data:                 &'a [u8],
    position:             usize,
    stream:               BitStreamReader<'a>,
    is_last_block:        bool,
    static_codes_loaded:  bool,
    options:              DeflateOptions,
    litlen_decode_table:  [u32; LITLEN_ENOUGH],
    offset_decode_table:  [u32; OFFSET_ENOUGH],
    precode_decode_table: [u32; PRECODE_ENOUGH]
}

impl<'a> DeflateDecoder<'a>
{
    /// Create a new decompressor that will read compressed
    /// data from `data` and return a new vector containing new data
    pub fn new(data: &'a [u8]) -> DeflateDecoder<'a>
    {
        let options = DeflateOptions::default();

        Self::new_with_options(data, options)
    }
    /// Create new decoder with specified options
    pub fn new_with_options(data: &'a [u8], options: DeflateOptions) -> DeflateDecoder<'a>
    {
        DeflateDecoder {
            data,
            position: 0,
            stream: BitStreamReader::new(data),
            is_last_block: false,
            static_codes_loaded: false,
            options,
            litlen_decode_table: [0; LITLEN_ENOUGH],
            offset_decode_table: [0; OFFSET_ENOUGH],
            precode_decode_table: [0; PRECODE_ENOUGH]
        }
    }

    /// Decode zlib-encoded data returning the uncompressed in a `Vec<u8>`
    /// or an error if something went wrong.
    #[cfg(feature = "zlib")]
    pub fn decode_zlib(&mut self) -> Result<Vec<u8>, InflateDecodeErrors>
    {
        if self.data.len() < 2
        {
            return Err(InflateDecodeErrors::new(
                DecodeErrorStatus::InsufficientData
            ));
        }

        // Zlib flags
        // See https://www.ietf.org/rfc/rfc1950.txt for
        // the RFC
        let cmf = self.data[0];
        let flg = self.data[1];

        let cm = cmf & 0xF;
        let cinfo = cmf >> 4;

        // confirm we have the right deflate methods
        if cm != 8
        {
            return Err(InflateDecodeErrors::new(DecodeErrorStatus::GenericStr(
                format!("Unknown zlib compression method {cm}")
            )));
        }
        if cinfo > 7
        {
            return Err(InflateDecodeErrors::new(DecodeErrorStatus::GenericStr(
                format!("Unknown cinfo `{cinfo}` greater than 7, not allowed")
            )));
        }
        let flag_checks = (u16::from(cmf) * 256) + u16::from(flg);

        if flag_checks % 31 != 0
        {
            return Err(InflateDecodeErrors::new(DecodeErrorStatus::Generic(
                "FCHECK integrity not preserved"
            )));
        }
        if flg & 0x20 != 0
        {
            return Err(InflateDecodeErrors::new(DecodeErrorStatus::Generic(
                "Preset dictionaries are not supported"
            )));
        }

        self.position = 2;

        let data = self.decode_deflate_inner()?;

        if self.options.confirm_checksum
        {
            if !self.stream.align_and_rewind()
            {
                return Err(InflateDecodeErrors::new(
                    DecodeErrorStatus::InsufficientData
                ));
            }
            let trailer = self
                .stream
                .read_aligned_bytes(4)
                .ok_or(InflateDecodeErrors::new(DecodeErrorStatus::InsufficientData))?;

            let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
            let found = crate::utils::calc_adler_hash(&data);

            if expected != found
            {
                return Err(InflateDecodeErrors::new(
                    DecodeErrorStatus::MismatchedAdler(expected, found)
                ));
            }
        }

        Ok(data)
    }

    /// Decode a raw deflate stream
    pub fn decode_deflate(&mut self) -> Result<Vec<u8>, InflateDecodeErrors>
    {
        self.position = 0;
        self.decode_deflate_inner()
    }

    fn decode_deflate_inner(&mut self) -> Result<Vec<u8>, InflateDecodeErrors>
    {
        self.stream = BitStreamReader::new(&self.data[self.position..]);
        self.static_codes_loaded = false;
        self.is_last_block = false;

        // size_hint may come from an untrusted header, cap the up front
        // allocation by the input size and let the vector grow past it
        let input_bound = self
            .data
            .len()
            .saturating_mul(MAX_INITIAL_EXPANSION)
            .max(MIN_INITIAL_CAPACITY);
        let capacity = self
            .options
            .size_hint
            .min(self.options.limit)
            .min(input_bound);

        let mut out = Vec::with_capacity(capacity);

        while !self.is_last_block
        {
            self.stream.refill();

            self.is_last_block = self.stream.get_bits(1) == 1;
            let block_type = self.stream.get_bits(2);

            if self.stream.overran()
            {
                return Err(InflateDecodeErrors::new(
                    DecodeErrorStatus::InsufficientData
                ));
            }

            match block_type
            {
                DEFLATE_BLOCKTYPE_UNCOMPRESSED =>
                {
                    trace!("Stored block, last: {}", self.is_last_block);
                    self.decode_stored_block(&mut out)?;
                }
                DEFLATE_BLOCKTYPE_STATIC =>
                {
                    trace!("Static huffman block, last: {}", self.is_last_block);

                    if !self.static_codes_loaded
                    {
                        self.load_static_tables()?;
                    }
                    self.decode_huffman_block(&mut out)?;
                }
                DEFLATE_BLOCKTYPE_DYNAMIC_HUFFMAN =>
                {
                    trace!("Dynamic huffman block, last: {}", self.is_last_block);

                    self.static_codes_loaded = false;
                    self.read_dynamic_tables()?;
                    self.decode_huffman_block(&mut out)?;
                }
                _ =>
                {
                    return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                        "Reserved block type 3"
                    )));
                }
            }
        }
        Ok(out)
    }

    fn decode_stored_block(&mut self, out: &mut Vec<u8>) -> Result<(), InflateDecodeErrors>
    {
        let insufficient = || InflateDecodeErrors::new(DecodeErrorStatus::InsufficientData);

        if !self.stream.align_and_rewind()
        {
            return Err(insufficient());
        }
        let header = self.stream.read_aligned_bytes(4).ok_or_else(insufficient)?;

        let len = u16::from_le_bytes([header[0], header[1]]);
        let nlen = u16::from_le_bytes([header[2], header[3]]);

        if len != !nlen
        {
            return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                "Stored block length does not match its complement"
            )));
        }
        let len = usize::from(len);

        if out.len() + len > self.options.limit
        {
            return Err(InflateDecodeErrors::new(
                DecodeErrorStatus::OutputLimitExceeded(self.options.limit, out.len() + len)
            ));
        }
        let bytes = self.stream.read_aligned_bytes(len).ok_or_else(insufficient)?;

        out.extend_from_slice(bytes);

        Ok(())
    }

    fn load_static_tables(&mut self) -> Result<(), InflateDecodeErrors>
    {
        let mut litlen_lens = [0_u8; DEFLATE_NUM_LITLEN_SYMS];

        litlen_lens[..144].fill(8);
        litlen_lens[144..256].fill(9);
        litlen_lens[256..280].fill(7);
        litlen_lens[280..].fill(8);

        let offset_lens = [5_u8; DEFLATE_NUM_OFFSET_SYMS];

        self.build_main_tables(&litlen_lens, &offset_lens)?;
        self.static_codes_loaded = true;

        Ok(())
    }

    fn read_dynamic_tables(&mut self) -> Result<(), InflateDecodeErrors>
    {
        let mut precode_lens = [0_u8; DEFLATE_NUM_PRECODE_SYMS];
        let mut lens = [0_u8; DEFLATE_MAX_USED_LITLEN_SYMS + DEFLATE_MAX_USED_OFFSET_SYMS];

        self.stream.refill();

        // Read codeword lengths
        let num_litlen_syms = 257 + self.stream.get_bits(5) as usize;
        let num_offset_syms = 1 + self.stream.get_bits(5) as usize;
        let num_explicit_precode_lens = 4 + self.stream.get_bits(4) as usize;

        if num_litlen_syms > DEFLATE_MAX_USED_LITLEN_SYMS
            || num_offset_syms > DEFLATE_MAX_USED_OFFSET_SYMS
        {
            return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                "Too many length or distance symbols"
            )));
        }

        for sym in DEFLATE_PRECODE_LENS_PERMUTATION
            .iter()
            .take(num_explicit_precode_lens)
        {
            self.stream.refill();
            precode_lens[usize::from(*sym)] = self.stream.get_bits(3) as u8;
        }

        if !build_decode_table(
            &precode_lens,
            &mut self.precode_decode_table,
            PRECODE_TABLE_BITS,
            DEFLATE_MAX_PRE_CODEWORD_LEN
        )
        {
            return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                "Invalid precode"
            )));
        }

        // decode litlen and offset codeword lengths
        let total = num_litlen_syms + num_offset_syms;
        let mut i = 0;

        while i < total
        {
            self.stream.refill();

            if self.stream.overran()
            {
                return Err(InflateDecodeErrors::new(
                    DecodeErrorStatus::InsufficientData
                ));
            }

            let presym = decode_symbol::<PRECODE_TABLE_BITS>(
                &mut self.stream,
                &self.precode_decode_table
            );

            if presym < 16
            {
                lens[i] = presym as u8;
                i += 1;
                continue;
            }

            let (value, repeat) = match presym
            {
                16 =>
                {
                    if i == 0
                    {
                        return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                            "Repeat code with no previous length"
                        )));
                    }
                    (lens[i - 1], 3 + self.stream.get_bits(2) as usize)
                }
                17 => (0, 3 + self.stream.get_bits(3) as usize),
                _ => (0, 11 + self.stream.get_bits(7) as usize)
            };

            if i + repeat > total
            {
                return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                    "Code length repeat overruns the code"
                )));
            }
            lens[i..i + repeat].fill(value);
            i += repeat;
        }

        if self.stream.overran()
        {
            return Err(InflateDecodeErrors::new(
                DecodeErrorStatus::InsufficientData
            ));
        }
        if lens[DEFLATE_END_OF_BLOCK] == 0
        {
            return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                "Missing end of block code"
            )));
        }

        let (litlen_lens, offset_lens) = lens[..total].split_at(num_litlen_syms);

        self.build_main_tables(litlen_lens, offset_lens)
    }

    fn build_main_tables(
        &mut self, litlen_lens: &[u8], offset_lens: &[u8]
    ) -> Result<(), InflateDecodeErrors>
    {
        if !build_decode_table(
            litlen_lens,
            &mut self.litlen_decode_table,
            LITLEN_TABLE_BITS,
            DEFLATE_MAX_LITLEN_CODEWORD_LENGTH
        )
        {
            return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                "Invalid literal/length code"
            )));
        }
        if !build_decode_table(
            offset_lens,
            &mut self.offset_decode_table,
            OFFSET_TABLE_BITS,
            DEFLATE_MAX_OFFSET_CODEWORD_LENGTH
        )
        {
            return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                "Invalid distance code"
            )));
        }
        Ok(())
    }

    fn decode_huffman_block(&mut self, out: &mut Vec<u8>) -> Result<(), InflateDecodeErrors>
    {
        let limit = self.options.limit;

        loop
        {
            // 15 + 5 + 15 + 13 bits at most are consumed below
            self.stream.refill();

            if self.stream.overran()
            {
                return Err(InflateDecodeErrors::new(
                    DecodeErrorStatus::InsufficientData
                ));
            }

            let sym =
                decode_symbol::<LITLEN_TABLE_BITS>(&mut self.stream, &self.litlen_decode_table);

            if sym < DEFLATE_END_OF_BLOCK
            {
                if out.len() >= limit
                {
                    return Err(InflateDecodeErrors::new(
                        DecodeErrorStatus::OutputLimitExceeded(limit, out.len() + 1)
                    ));
                }
                out.push(sym as u8);
                continue;
            }
            if sym == DEFLATE_END_OF_BLOCK
            {
                break;
            }

            let len_sym = sym - DEFLATE_FIRST_LEN_SYM;

            if len_sym >= LENGTH_BASE.len()
            {
                return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                    "Invalid length symbol"
                )));
            }
            let length = usize::from(LENGTH_BASE[len_sym])
                + self.stream.get_bits(LENGTH_EXTRA[len_sym]) as usize;

            let offset_sym =
                decode_symbol::<OFFSET_TABLE_BITS>(&mut self.stream, &self.offset_decode_table);

            if offset_sym >= OFFSET_BASE.len()
            {
                return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                    "Invalid distance symbol"
                )));
            }
            let distance = usize::from(OFFSET_BASE[offset_sym])
                + self.stream.get_bits(OFFSET_EXTRA[offset_sym]) as usize;

            if distance > out.len()
            {
                return Err(InflateDecodeErrors::new(DecodeErrorStatus::CorruptData(
                    "Distance goes past the start of the output"
                )));
            }
            if out.len() + length > limit
            {
                return Err(InflateDecodeErrors::new(
                    DecodeErrorStatus::OutputLimitExceeded(limit, out.len() + length)
                ));
            }
            copy_match(out, distance, length);
        }

        if self.stream.overran()
        {
            return Err(InflateDecodeErrors::new(
                DecodeErrorStatus::InsufficientData
            ));
        }
        Ok(())
    }
}

/// Append `length` bytes copied from `distance` bytes back,
/// the source may overlap the bytes being written
#[inline(always)]
fn copy_match(out: &mut Vec<u8>, distance: usize, length: usize)
{
    let start = out.len() - distance;

    if distance >= length
    {
        out.extend_from_within(start..start + length);
        return;
    }
    out.reserve(length);

    for i in start..start + length
    {
        let byte = out[i];
        out.push(byte);
    }
}

/// Decode one symbol using a table built by [`build_decode_table`]
#[inline(always)]
fn decode_symbol<const TABLE_BITS: usize>(stream: &mut BitStreamReader, table: &[u32]) -> usize
{
    let mut entry = table[stream.peek_bits::<TABLE_BITS>()];

    if entry & HUFFDEC_SUBTABLE_POINTER != 0
    {
        // low byte holds the main table bits
        stream.drop_bits(entry as u8);

        let subtable_bits = ((entry >> 8) & 0x3F) as usize;

        entry = table[(entry >> 16) as usize + stream.peek_var_bits(subtable_bits)];
    }
    stream.drop_bits(entry as u8);

    (entry >> 16) as usize
}

#[inline(always)]
const fn make_decode_table_entry(sym: usize, len: u32) -> u32
{
    ((sym as u32) << 16) | (len << 8) | len
}

#[inline(always)]
fn bsr(value: usize) -> usize
{
    (usize::BITS - 1 - value.leading_zeros()) as usize
}

/// Build a decode table for the canonical code with codeword lengths `lens`
///
/// Returns false if the lengths do not describe a valid code, that is an
/// over-subscribed code or an incomplete one with more than a single codeword.
/// See libdeflate's build_decode_table for the table layout.
fn build_decode_table(
    lens: &[u8], decode_table: &mut [u32], table_bits: usize, mut max_codeword_len: usize
) -> bool
{
    let mut len_counts = [0_u32; DEFLATE_MAX_CODEWORD_LENGTH + 1];
    let mut offsets = [0_u32; DEFLATE_MAX_CODEWORD_LENGTH + 1];
    let mut sorted_syms = [0_u16; DEFLATE_NUM_LITLEN_SYMS];

    // Count how many codewords have each length, including 0.
    for len in lens
    {
        let len = usize::from(*len);

        if len > max_codeword_len
        {
            return false;
        }
        len_counts[len] += 1;
    }

    // Determine the actual maximum codeword length that was used
    while max_codeword_len > 1 && len_counts[max_codeword_len] == 0
    {
        max_codeword_len -= 1;
    }

    // Sort the symbols primarily by increasing codeword length and
    // secondarily by increasing symbol value, while summing the
    // codespace used scaled to the longest codeword
    offsets[1] = len_counts[0];

    let mut codespace_used = 0_u32;

    for len in 1..max_codeword_len
    {
        offsets[len + 1] = offsets[len] + len_counts[len];
        codespace_used = (codespace_used << 1) + len_counts[len];
    }
    codespace_used = (codespace_used << 1) + len_counts[max_codeword_len];

    for (sym, len) in lens.iter().enumerate()
    {
        let len = usize::from(*len);

        sorted_syms[offsets[len] as usize] = sym as u16;
        offsets[len] += 1;
    }
    // skip unused symbols
    let mut sorted = sorted_syms[len_counts[0] as usize..lens.len()].iter().copied();

    if codespace_used > (1 << max_codeword_len)
    {
        // over-subscribed
        return false;
    }

    if codespace_used < (1 << max_codeword_len)
    {
        // Incomplete code, only a code with no codewords
        // or a single codeword of length 1 is allowed
        let sym = if codespace_used == 0
        {
            0
        }
        else
        {
            if codespace_used != (1 << (max_codeword_len - 1)) || len_counts[1] != 1
            {
                return false;
            }
            match sorted.next()
            {
                Some(sym) => sym,
                None => return false
            }
        };
        let entry = make_decode_table_entry(usize::from(sym), 1);

        decode_table[..1 << table_bits].fill(entry);

        return true;
    }

    // The code is complete. Fill the main table for codewords no
    // longer than table_bits, doubling the table as lengths grow.
    let mut codeword = 0_usize;
    let mut len = 1;
    let mut count = len_counts[len];

    while count == 0
    {
        len += 1;
        count = len_counts[len];
    }
    let mut cur_table_end = 1 << len;

    while len <= table_bits
    {
        // Process all 'count' codewords with length 'len' bits.
        loop
        {
            let Some(sym) = sorted.next()
            else
            {
                return false;
            };
            decode_table[codeword] = make_decode_table_entry(usize::from(sym), len as u32);

            if codeword == cur_table_end - 1
            {
                // Last codeword (all 1's)
                while len < table_bits
                {
                    decode_table.copy_within(0..cur_table_end, cur_table_end);
                    cur_table_end <<= 1;
                    len += 1;
                }
                return true;
            }
            // codewords are bit reversed, so increment from the top:
            // set the highest clear bit and clear everything above it
            let bit = 1 << bsr(codeword ^ (cur_table_end - 1));

            codeword &= bit - 1;
            codeword |= bit;

            count -= 1;

            if count == 0
            {
                break;
            }
        }
        // Advance to the next codeword length.
        loop
        {
            len += 1;

            if len > max_codeword_len
            {
                return false;
            }
            if len <= table_bits
            {
                decode_table.copy_within(0..cur_table_end, cur_table_end);
                cur_table_end <<= 1;
            }
            count = len_counts[len];

            if count != 0
            {
                break;
            }
        }
    }

    // Process codewords with len > table_bits. These require subtables.
    let table_mask = (1 << table_bits) - 1;
    let mut subtable_prefix = usize::MAX;
    let mut subtable_start = 0;

    cur_table_end = 1 << table_bits;

    loop
    {
        // Start a new subtable if the first 'table_bits' bits of the
        // codeword don't match the prefix of the current subtable.
        if codeword & table_mask != subtable_prefix
        {
            subtable_prefix = codeword & table_mask;
            subtable_start = cur_table_end;

            // grow the subtable until the remaining codewords fill it
            let mut subtable_bits = len - table_bits;
            let mut codespace = count;

            while codespace < (1 << subtable_bits)
            {
                subtable_bits += 1;

                if table_bits + subtable_bits > max_codeword_len
                {
                    return false;
                }
                codespace = (codespace << 1) + len_counts[table_bits + subtable_bits];
            }
            cur_table_end = subtable_start + (1 << subtable_bits);

            decode_table[subtable_prefix] = ((subtable_start as u32) << 16)
                | HUFFDEC_EXCEPTIONAL
                | HUFFDEC_SUBTABLE_POINTER
                | ((subtable_bits as u32) << 8)
                | table_bits as u32;
        }

        // Fill the subtable entries for the current codeword.
        let Some(sym) = sorted.next()
        else
        {
            return false;
        };
        let entry = make_decode_table_entry(usize::from(sym), (len - table_bits) as u32);
        let stride = 1 << (len - table_bits);
        let mut i = subtable_start + (codeword >> table_bits);

        while i < cur_table_end
        {
            decode_table[i] = entry;
            i += stride;
        }

        // Advance to the next codeword.
        if codeword == (1 << len) - 1
        {
            return true;
        }
        let bit = 1 << bsr(codeword ^ ((1 << len) - 1));

        codeword &= bit - 1;
        codeword |= bit;
        count -= 1;

        while count == 0
        {
            len += 1;

            if len > max_codeword_len
            {
                return false;
            }
            count = len_counts[len];
        }
    }
}
