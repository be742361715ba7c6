use alloc::vec::Vec;

/// Encapsulates a simple growable byte writer with
/// support for big endian writes
///
/// Unlike a fixed slice writer this never runs out of space,
/// encoders reserve an estimate up front and let the vector grow
/// when the estimate is off.
pub struct ZByteWriter {
    buffer: Vec<u8>
}

impl ZByteWriter {
    /// Create a writer with `capacity` bytes preallocated
    ///
    /// ```
    /// use fpng_core::bytestream::ZByteWriter;
    /// let mut stream = ZByteWriter::with_capacity(4);
    /// stream.write_u32_be(10);
    /// assert_eq!(stream.into_inner(), [0, 0, 0, 10]);
    /// ```
    pub fn with_capacity(capacity: usize) -> ZByteWriter {
        ZByteWriter {
            buffer: Vec::with_capacity(capacity)
        }
    }

    /// Write a u32 as a big endian integer
    #[inline]
    pub fn write_u32_be(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }
    /// Append all of `bytes`
    #[inline]
    pub fn write_all(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }
    /// Consume the writer returning the bytes written
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::ZByteWriter;

    #[test]
    fn writes_are_big_endian() {
        let mut writer = ZByteWriter::with_capacity(2);
        writer.write_u32_be(0x0102_0304);
        writer.write_all(&[5, 6]);
        writer.write_u32_be(7);
        assert_eq!(writer.into_inner(), [1, 2, 3, 4, 5, 6, 0, 0, 0, 7]);
    }
}
