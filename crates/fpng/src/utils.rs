use alloc::vec::Vec;

/// Convert packed pixels between 3 and 4 channels
///
/// Adding an alpha channel fills it with 255, dropping one discards it.
/// Same channel counts hand the buffer back untouched.
pub(crate) fn convert_channels(pixels: Vec<u8>, from: usize, to: usize) -> Vec<u8>
{
    match (from, to)
    {
        (3, 4) =>
        {
            let mut out = Vec::with_capacity(pixels.len() / 3 * 4);

            for px in pixels.chunks_exact(3)
            {
                out.extend_from_slice(px);
                out.push(255);
            }
            out
        }
        (4, 3) =>
        {
            let mut out = Vec::with_capacity(pixels.len() / 4 * 3);

            for px in pixels.chunks_exact(4)
            {
                out.extend_from_slice(&px[..3]);
            }
            out
        }
        _ => pixels
    }
}
