//! `BitWriter` API
//!
//! Deflate packs bits starting from the least significant bit
//! of each byte, huffman codes are therefore stored pre-reversed
//! and written as plain integers.
use alloc::vec::Vec;

pub struct BitWriter
{
    out:            Vec<u8>,
    buffer:         u64,
    bits_in_buffer: u8
}

impl BitWriter
{
    /// Create a writer with `capacity` bytes preallocated
    pub fn with_capacity(capacity: usize) -> BitWriter
    {
        BitWriter {
            out:            Vec::with_capacity(capacity),
            buffer:         0,
            bits_in_buffer: 0
        }
    }

    /// Append `nbits` low bits of `bits` to the stream
    ///
    /// `nbits` must not exceed 32 and `bits` must not have
    /// any bit set above `nbits`
    #[inline(always)]
    pub fn put_bits(&mut self, nbits: u8, bits: u64)
    {
        debug_assert!(nbits <= 32);
        debug_assert!(bits >> nbits == 0);

        if self.bits_in_buffer + nbits > 56
        {
            self.flush_bytes();
        }
        self.buffer |= bits << self.bits_in_buffer;
        self.bits_in_buffer += nbits;
    }

    /// Move whole bytes from the bit buffer into the output
    #[inline(always)]
    fn flush_bytes(&mut self)
    {
        let bytes = usize::from(self.bits_in_buffer >> 3);

        self.out
            .extend_from_slice(&self.buffer.to_le_bytes()[..bytes]);

        // at most 7 bytes are ever moved, so the shift stays below 64
        self.buffer >>= bytes * 8;
        self.bits_in_buffer &= 7;
    }

    /// Pad with zero bits up to the next byte boundary
    pub fn align_to_byte(&mut self)
    {
        let pad = (8 - (self.bits_in_buffer & 7)) & 7;
        self.put_bits(pad, 0);
    }

    /// Align to a byte boundary and append raw bytes
    pub fn write_aligned_bytes(&mut self, bytes: &[u8])
    {
        self.align_to_byte();
        self.flush_bytes();
        debug_assert_eq!(self.bits_in_buffer, 0);
        self.out.extend_from_slice(bytes);
    }

    /// Number of bits written so far, including buffered ones
    #[cfg(test)]
    pub(crate) fn bits_written(&self) -> usize
    {
        self.out.len() * 8 + usize::from(self.bits_in_buffer)
    }

    /// Pad the last byte and return the written bytes
    pub fn finish(mut self) -> Vec<u8>
    {
        self.align_to_byte();
        self.flush_bytes();
        self.out
    }
}

#[cfg(test)]
mod tests
{
    use super::BitWriter;
    use crate::bitstream::BitStreamReader;

    #[test]
    fn bits_are_packed_lsb_first()
    {
        let mut writer = BitWriter::with_capacity(4);
        writer.put_bits(1, 1);
        writer.put_bits(2, 0b10);
        writer.put_bits(5, 0b10101);
        writer.put_bits(3, 0b011);
        assert_eq!(writer.bits_written(), 11);
        assert_eq!(writer.finish(), [0b1010_1101, 0b011]);
    }

    #[test]
    fn writer_and_reader_agree()
    {
        let mut writer = BitWriter::with_capacity(64);
        let values: Vec<(u8, u64)> = (0..200_u64)
            .map(|i| {
                let nbits = (i % 32 + 1) as u8;
                (nbits, (i * 2_654_435_761) & ((1 << nbits) - 1))
            })
            .collect();

        for (nbits, value) in &values
        {
            writer.put_bits(*nbits, *value);
        }
        writer.write_aligned_bytes(&[0xAA, 0xBB]);
        let bytes = writer.finish();

        let mut reader = BitStreamReader::new(&bytes);
        for (nbits, value) in &values
        {
            reader.refill();
            assert_eq!(reader.get_bits(*nbits), *value);
        }
        assert!(reader.align_and_rewind());
        assert_eq!(reader.read_aligned_bytes(2), Some(&[0xAA_u8, 0xBB][..]));
    }
}
