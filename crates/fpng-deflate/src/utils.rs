//! Checksum helpers
#![cfg(feature = "zlib")]

/// Calculate the adler hash of a piece of data
#[inline(never)]
pub fn calc_adler_hash(data: &[u8]) -> u32
{
    use simd_adler32::Adler32;
    let mut hasher = Adler32::new();

    hasher.write(data);

    hasher.finish()
}

/// Continue an adler32 checksum from `previous`
///
/// Start a fresh checksum with `previous == 1`. Feeding data in pieces
/// gives the same value as hashing it in one go.
///
/// ```
/// use fpng_deflate::adler32;
/// let whole = adler32(b"Wikipedia", 1);
/// assert_eq!(whole, 0x11E6_0398);
/// assert_eq!(adler32(b"pedia", adler32(b"Wiki", 1)), whole);
/// ```
pub fn adler32(data: &[u8], previous: u32) -> u32
{
    use simd_adler32::Adler32;
    let mut hasher = Adler32::from_checksum(previous);

    hasher.write(data);

    hasher.finish()
}
