//! `BitStreamReader` API
//!
//! This module provides an interface to read bits (and bytes) for
//! huffman decoding.
//!
//! Reads past the end of the input are satisfied with zero bytes,
//! the reader keeps count of them so the decoder can tell a stream
//! that merely ends near a refill boundary from one that is truncated.

pub struct BitStreamReader<'src>
{
    // buffer from which we are pulling in bits from
    // used in decompression.
    src:       &'src [u8],
    // position in our buffer,
    position:  usize,
    // zero bytes appended after the end of `src`
    over_read: usize,

    pub bits_left: u8,
    pub buffer:    u64
}

impl<'src> BitStreamReader<'src>
{
    /// Create a new `BitStreamReader` instance
    pub fn new(in_buffer: &'src [u8]) -> BitStreamReader<'src>
    {
        BitStreamReader {
            bits_left: 0,
            buffer:    0,
            src:       in_buffer,
            position:  0,
            over_read: 0
        }
    }
    /// Refill the bitstream ensuring the buffer has bits between
    /// 56 and 63.
    #[inline(always)]
    pub fn refill(&mut self)
    {
        /*
         * The refill always guarantees refills between 56-63
         *
         * Bits stored will never go above 63 and if bits are in the range 56-63 no refills occur.
         */
        let mut buf = [0; 8];

        match self.src.get(self.position..self.position + 8)
        {
            Some(bytes) =>
            {
                buf.copy_from_slice(bytes);
                // create a u64 from an array of u8's
                let new_buffer = u64::from_le_bytes(buf);
                // num indicates how many bytes we actually consumed.
                let num = 63 ^ self.bits_left;
                // offset position
                self.position += (num >> 3) as usize;
                // shift number of bits
                self.buffer |= new_buffer << self.bits_left;
                // update bits left
                // bits left are now between 56-63
                self.bits_left |= 56;
            }
            None => self.refill_slow()
        }
    }
    #[inline(never)]
    fn refill_slow(&mut self)
    {
        while self.bits_left < 56
        {
            let byte = match self.src.get(self.position)
            {
                Some(byte) =>
                {
                    self.position += 1;
                    *byte
                }
                None =>
                {
                    self.over_read += 1;
                    0
                }
            };
            self.buffer |= u64::from(byte) << self.bits_left;
            self.bits_left += 8;
        }
    }

    #[inline(always)]
    pub const fn peek_bits<const LOOKAHEAD: usize>(&self) -> usize
    {
        (self.buffer & ((1 << LOOKAHEAD) - 1)) as usize
    }
    #[inline(always)]
    pub fn peek_var_bits(&self, lookahead: usize) -> usize
    {
        (self.buffer & ((1 << lookahead) - 1)) as usize
    }

    #[inline(always)]
    pub fn get_bits(&mut self, num_bits: u8) -> u64
    {
        debug_assert!(self.bits_left >= num_bits);

        let mask = (1_u64 << num_bits) - 1;

        let value = self.buffer & mask;

        self.buffer >>= num_bits;

        self.bits_left -= num_bits;

        value
    }
    #[inline(always)]
    pub fn drop_bits(&mut self, bits: u8)
    {
        debug_assert!(self.bits_left >= bits);
        self.bits_left -= bits;
        self.buffer >>= bits;
    }
    /// Return true if some of the bits consumed so far were
    /// zero padding from beyond the end of the input
    #[inline(always)]
    pub const fn overran(&self) -> bool
    {
        self.over_read * 8 > self.bits_left as usize
    }

    /// Discard bits up to the next byte boundary and hand the whole
    /// bytes still buffered back to the byte stream.
    ///
    /// After this the bit buffer is empty and reads continue
    /// at a byte aligned `position`, as stored blocks and the
    /// zlib trailer need.
    ///
    /// Returns false if the stream had already run out of input
    pub fn align_and_rewind(&mut self) -> bool
    {
        self.drop_bits(self.bits_left & 7);

        let buffered = usize::from(self.bits_left >> 3);

        if buffered < self.over_read
        {
            return false;
        }
        self.position -= buffered - self.over_read;
        self.over_read = 0;
        self.reset();

        true
    }
    /// Read `num` bytes directly from the input.
    ///
    /// Only meaningful after [`align_and_rewind`](Self::align_and_rewind),
    /// returns `None` if the input does not have that many bytes
    pub fn read_aligned_bytes(&mut self, num: usize) -> Option<&'src [u8]>
    {
        debug_assert_eq!(self.bits_left, 0);

        let end = self.position.checked_add(num)?;
        let bytes = self.src.get(self.position..end)?;

        self.position = end;

        Some(bytes)
    }
    /// Reset buffer and bits left to zero.
    pub fn reset(&mut self)
    {
        self.buffer = 0;
        self.bits_left = 0;
    }
}
