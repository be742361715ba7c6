use bitflags::bitflags;

use crate::colorspace::ColorSpace;

bitflags! {
    /// Flags selecting how much effort the compressor spends
    ///
    /// The flags are independent of each other and any combination
    /// is legal. When both are set the output is stored,
    /// since stored blocks bypass Huffman coding entirely.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct CompressionFlags: u32 {
        /// Compute per-file Huffman tables, slower but smaller
        const ENCODE_SLOWER      = 0b0000_0001;
        /// Emit stored (uncompressed) deflate blocks only
        const FORCE_UNCOMPRESSED = 0b0000_0010;
    }
}

impl CompressionFlags {
    /// Neither flag set, global tables are used
    pub const NONE: CompressionFlags = CompressionFlags::empty();

    /// Convert a raw caller supplied value, rejecting unknown bits
    ///
    /// ```
    /// use fpng_core::options::CompressionFlags;
    /// assert_eq!(CompressionFlags::from_raw(1), Some(CompressionFlags::ENCODE_SLOWER));
    /// assert_eq!(CompressionFlags::from_raw(8), None);
    /// ```
    pub const fn from_raw(value: u32) -> Option<CompressionFlags> {
        CompressionFlags::from_bits(value)
    }
}

/// How the encoder picks the per-scanline predictor
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum FilterStrategy {
    /// Choose between sub and up per row, cheap to evaluate
    #[default]
    Fast,
    /// Try every predictor per row and keep the cheapest
    Adaptive,
    /// Always use no prediction
    None,
    /// Always use the sub predictor
    Sub,
    /// Always use the up predictor
    Up,
    /// Always use the average predictor
    Average,
    /// Always use the paeth predictor
    Paeth
}

/// Options respected by the png encoder
#[derive(Debug, Copy, Clone)]
pub struct EncoderOptions {
    width:           usize,
    height:          usize,
    colorspace:      ColorSpace,
    flags:           CompressionFlags,
    filter:          FilterStrategy,
    max_chain:       u16,
    idat_chunk_size: usize,
    use_unsafe:      bool
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            width:           0,
            height:          0,
            colorspace:      ColorSpace::RGB,
            flags:           CompressionFlags::NONE,
            filter:          FilterStrategy::Fast,
            max_chain:       8,
            idat_chunk_size: 1 << 16,
            use_unsafe:      true
        }
    }
}

impl EncoderOptions {
    /// Create options for an image of the given dimensions and colorspace
    pub fn new(width: usize, height: usize, colorspace: ColorSpace) -> EncoderOptions {
        EncoderOptions::default()
            .set_width(width)
            .set_height(height)
            .set_colorspace(colorspace)
    }

    /// Get the width for which the image will be encoded in
    pub const fn get_width(&self) -> usize {
        self.width
    }
    /// Get height for which the image will be encoded in
    pub const fn get_height(&self) -> usize {
        self.height
    }
    /// Get the colorspace for which the image will be encoded in
    pub const fn get_colorspace(&self) -> ColorSpace {
        self.colorspace
    }
    /// Get the compression flags
    pub const fn get_flags(&self) -> CompressionFlags {
        self.flags
    }
    /// Get the scanline filter strategy
    pub const fn get_filter_strategy(&self) -> FilterStrategy {
        self.filter
    }
    /// Maximum number of hash chain links followed per position
    pub const fn get_max_chain(&self) -> u16 {
        self.max_chain
    }
    /// Maximum payload of a single IDAT chunk
    pub const fn get_idat_chunk_size(&self) -> usize {
        self.idat_chunk_size
    }
    /// Return true if the encoder may use platform specific intrinsics
    pub const fn get_use_unsafe(&self) -> bool {
        self.use_unsafe
    }

    /// Set width for the image to be encoded
    pub fn set_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
    /// Set height for the image to be encoded
    pub fn set_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }
    /// Set colorspace for the image to be encoded
    pub fn set_colorspace(mut self, colorspace: ColorSpace) -> Self {
        self.colorspace = colorspace;
        self
    }
    /// Set compression flags
    pub fn set_flags(mut self, flags: CompressionFlags) -> Self {
        self.flags = flags;
        self
    }
    /// Set the scanline filter strategy
    pub fn set_filter_strategy(mut self, filter: FilterStrategy) -> Self {
        self.filter = filter;
        self
    }
    /// Set the maximum hash chain length, clamped to at least 1
    pub fn set_max_chain(mut self, max_chain: u16) -> Self {
        self.max_chain = max_chain.max(1);
        self
    }
    /// Set the maximum IDAT chunk payload
    ///
    /// Clamped to `1..=(1<<31)-1` as the container allows
    pub fn set_idat_chunk_size(mut self, size: usize) -> Self {
        self.idat_chunk_size = size.clamp(1, (1 << 31) - 1);
        self
    }
    /// Whether the encoder may use platform specific intrinsics
    pub fn set_use_unsafe(mut self, yes: bool) -> Self {
        self.use_unsafe = yes;
        self
    }
    /// Return true if the SSE code paths should be used
    pub fn use_sse41(&self) -> bool {
        self.use_unsafe && crate::cpu::capabilities_supported()
    }
}

#[cfg(test)]
mod tests {
    use super::{CompressionFlags, EncoderOptions};

    #[test]
    fn flags_combine() {
        let both = CompressionFlags::ENCODE_SLOWER | CompressionFlags::FORCE_UNCOMPRESSED;
        assert_eq!(both.bits(), 3);
        assert_eq!(CompressionFlags::NONE.bits(), 0);
        assert_eq!(CompressionFlags::from_raw(3), Some(both));
        assert_eq!(CompressionFlags::from_raw(4), None);
    }

    #[test]
    fn setters_clamp() {
        let opts = EncoderOptions::default()
            .set_max_chain(0)
            .set_idat_chunk_size(0);
        assert_eq!(opts.get_max_chain(), 1);
        assert_eq!(opts.get_idat_chunk_size(), 1);
    }
}
