//! CRC-32 as used by png chunks
//!
//! Slice by 8 over tables built at compile time, reflected
//! polynomial 0xEDB88320.

static CRC_TABLES: [[u32; 256]; 8] = build_crc_tables();

const fn build_crc_tables() -> [[u32; 256]; 8]
{
    let mut tables = [[0_u32; 256]; 8];
    let mut i = 0;

    while i < 256
    {
        let mut crc = i as u32;
        let mut j = 0;

        while j < 8
        {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
            j += 1;
        }
        tables[0][i] = crc;
        i += 1;
    }

    let mut i = 0;

    while i < 256
    {
        let mut t = 1;

        while t < 8
        {
            let prev = tables[t - 1][i];
            tables[t][i] = (prev >> 8) ^ tables[0][(prev & 0xFF) as usize];
            t += 1;
        }
        i += 1;
    }
    tables
}

/// Update the raw crc register with `data`
///
/// The register is not inverted on entry or exit,
/// see [`crc32`] for the usual convention
pub(crate) fn crc32_slice8(data: &[u8], mut crc: u32) -> u32
{
    let t = &CRC_TABLES;
    let mut chunks = data.chunks_exact(8);

    for chunk in chunks.by_ref()
    {
        let one = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) ^ crc;
        let two = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);

        crc = t[7][(one & 0xFF) as usize]
            ^ t[6][((one >> 8) & 0xFF) as usize]
            ^ t[5][((one >> 16) & 0xFF) as usize]
            ^ t[4][(one >> 24) as usize]
            ^ t[3][(two & 0xFF) as usize]
            ^ t[2][((two >> 8) & 0xFF) as usize]
            ^ t[1][((two >> 16) & 0xFF) as usize]
            ^ t[0][(two >> 24) as usize];
    }
    for byte in chunks.remainder()
    {
        crc = (crc >> 8) ^ t[0][((crc ^ u32::from(*byte)) & 0xFF) as usize];
    }
    crc
}

/// Compute the CRC-32 of `data`, continuing from `previous`
///
/// Start with `previous == 0`, feeding data in pieces gives
/// the same result as one call over the whole buffer.
///
/// ```
/// let whole = fpng::crc32(b"123456789", 0);
/// assert_eq!(whole, 0xCBF4_3926);
/// assert_eq!(fpng::crc32(b"56789", fpng::crc32(b"1234", 0)), whole);
/// ```
pub fn crc32(data: &[u8], previous: u32) -> u32
{
    !crc32_slice8(data, !previous)
}

/// CRC of a chunk, covering its type and payload
pub(crate) fn chunk_crc(name: &[u8; 4], data: &[u8]) -> u32
{
    !crc32_slice8(data, crc32_slice8(name, u32::MAX))
}

#[cfg(test)]
mod tests
{
    use super::{chunk_crc, crc32};

    #[test]
    fn iend_crc()
    {
        assert_eq!(chunk_crc(b"IEND", &[]), 0xAE42_6082);
    }

    #[test]
    fn long_input_matches_bytewise()
    {
        let data: alloc::vec::Vec<u8> = (0..1000_u32).map(|x| (x * 31 % 251) as u8).collect();

        // split at every offset in the first block to exercise the remainder path
        let whole = crc32(&data, 0);

        for split in 0..17
        {
            assert_eq!(crc32(&data[split..], crc32(&data[..split], 0)), whole);
        }
        assert_eq!(crc32(&[], 0), 0);
    }
}
