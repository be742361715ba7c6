use crate::bytestream::ZByteIoError;

/// An encapsulation of a byte stream reader
///
/// This provides an interface similar to [std::io::Cursor] but
/// with big endian reads and bounds checked lookahead,
/// which is all the png chunk parser needs.
pub struct ZByteReader<'a> {
    stream:   &'a [u8],
    position: usize
}

impl<'a> ZByteReader<'a> {
    /// Create a new instance of the byte stream
    pub const fn new(buf: &'a [u8]) -> ZByteReader<'a> {
        ZByteReader {
            stream:   buf,
            position: 0
        }
    }

    /// Return whether the underlying buffer has
    /// `num` bytes available for reading
    ///
    /// ```
    /// use fpng_core::bytestream::ZByteReader;
    /// let data = [0_u8; 10];
    /// let reader = ZByteReader::new(&data);
    /// assert!(reader.has(10));
    /// assert!(!reader.has(11));
    /// ```
    #[inline]
    pub const fn has(&self, num: usize) -> bool {
        match self.position.checked_add(num) {
            Some(end) => end <= self.stream.len(),
            None => false
        }
    }
    /// Number of bytes not yet consumed
    pub const fn get_bytes_left(&self) -> usize {
        // Must be saturating to prevent underflow
        self.stream.len().saturating_sub(self.position)
    }
    /// Return true if every byte has been consumed
    pub const fn eof(&self) -> bool {
        self.position >= self.stream.len()
    }

    /// Look `position` bytes ahead and return a reference to
    /// `num_bytes` bytes from there without advancing the stream
    pub fn peek_at(&self, position: usize, num_bytes: usize) -> Result<&'a [u8], ZByteIoError> {
        let start = self.position.saturating_add(position);
        let end = start.saturating_add(num_bytes);

        match self.stream.get(start..end) {
            Some(bytes) => Ok(bytes),
            None => Err(ZByteIoError::NotEnoughBytes(
                num_bytes,
                self.stream.len().saturating_sub(start)
            ))
        }
    }

    /// Read `num_bytes` from the stream, advancing past them
    pub fn get_as_ref(&mut self, num_bytes: usize) -> Result<&'a [u8], ZByteIoError> {
        let bytes = self.peek_at(0, num_bytes)?;
        self.position += num_bytes;
        Ok(bytes)
    }

    /// Read a fixed number of bytes, erroring if the stream
    /// does not have them
    pub fn get_fixed_bytes_or_err<const N: usize>(&mut self) -> Result<[u8; N], ZByteIoError> {
        let mut byte_store = [0; N];
        byte_store.copy_from_slice(self.get_as_ref(N)?);
        Ok(byte_store)
    }

    /// Retrieve a byte or error out if the stream is exhausted
    #[inline(always)]
    pub fn get_u8_err(&mut self) -> Result<u8, ZByteIoError> {
        match self.stream.get(self.position) {
            Some(byte) => {
                self.position += 1;
                Ok(*byte)
            }
            None => Err(ZByteIoError::NotEnoughBytes(1, 0))
        }
    }

    /// Read a u32 as a big endian integer
    ///
    /// Returning an error if the underlying buffer cannot support a u32 read.
    #[inline]
    pub fn get_u32_be_err(&mut self) -> Result<u32, ZByteIoError> {
        let bytes = self.get_fixed_bytes_or_err::<4>()?;
        Ok(u32::from_be_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::ZByteReader;

    #[test]
    fn read_big_endian() {
        let data = [0x00, 0x00, 0x01, 0x02, 0xAB];
        let mut reader = ZByteReader::new(&data);

        assert_eq!(reader.get_u32_be_err().unwrap(), 0x0102);
        assert!(reader.get_u32_be_err().is_err());
        assert_eq!(reader.get_u8_err().unwrap(), 0xAB);
        assert!(reader.eof());
    }

    #[test]
    fn peek_does_not_advance() {
        let data = *b"IHDRxyz";
        let mut reader = ZByteReader::new(&data);

        assert_eq!(reader.peek_at(0, 4).unwrap(), b"IHDR");
        assert_eq!(reader.get_bytes_left(), 7);
        assert!(reader.peek_at(4, 4).is_err());

        assert_eq!(reader.get_as_ref(4).unwrap(), b"IHDR");
        assert_eq!(reader.get_fixed_bytes_or_err::<3>().unwrap(), *b"xyz");
        assert!(reader.get_u8_err().is_err());
    }

    #[test]
    fn oversized_requests_fail() {
        let data = [1, 2, 3];
        let mut reader = ZByteReader::new(&data);
        assert!(!reader.has(usize::MAX));
        assert!(reader.get_as_ref(usize::MAX).is_err());
        assert_eq!(reader.get_bytes_left(), 3);
    }
}
