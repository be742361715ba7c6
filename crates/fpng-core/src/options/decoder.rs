//! Global Decoder options

/// Decoder options that are flags
#[derive(Copy, Debug, Clone)]
struct DecoderFlags {
    /// Whether the inflate step should confirm the adler trailer
    confirm_adler: bool,
    /// Whether the chunk parser should confirm chunk crc's
    confirm_crc:   bool,
    /// Whether the decoder should use platform specific intrinsics
    use_unsafe:    bool
}

impl Default for DecoderFlags {
    fn default() -> Self {
        DecoderFlags {
            confirm_adler: true,
            confirm_crc:   true,
            use_unsafe:    true
        }
    }
}

/// Decoder options
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions {
    /// Maximum width for which the decoder will
    /// not try to decode images larger than
    /// the specified width.
    ///
    /// - Default value: 1<<24
    max_width:  usize,
    /// Maximum height for which the decoder will not
    /// try to decode images larger than the
    /// specified height
    ///
    /// - Default value: 1<<24
    max_height: usize,
    flags:      DecoderFlags
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_width:  1 << 24,
            max_height: 1 << 24,
            flags:      DecoderFlags::default()
        }
    }
}

impl DecoderOptions {
    /// Create the decoder with options that skip
    /// the crc and adler confirmations
    ///
    /// Corrupt chunks may then go unnoticed until the
    /// compressed stream itself fails to decode
    pub fn new_fast() -> DecoderOptions {
        DecoderOptions::default()
            .set_confirm_crc(false)
            .set_confirm_adler(false)
    }

    /// Get maximum width configured for which the decoder
    /// should not try to decode images greater than this width
    pub const fn get_max_width(&self) -> usize {
        self.max_width
    }
    /// Get maximum height configured for which the decoder should
    /// not try to decode images greater than this height
    pub const fn get_max_height(&self) -> usize {
        self.max_height
    }
    /// Return true if chunk crc's are confirmed
    pub const fn get_confirm_crc(&self) -> bool {
        self.flags.confirm_crc
    }
    /// Return true if the zlib adler trailer is confirmed
    pub const fn get_confirm_adler(&self) -> bool {
        self.flags.confirm_adler
    }
    /// Return true if the decoder should use unsafe
    /// routines where possible
    pub const fn get_use_unsafe(&self) -> bool {
        self.flags.use_unsafe
    }

    /// Set maximum width for which the decoder should not try
    /// decoding images greater than that width
    pub fn set_max_width(mut self, width: usize) -> Self {
        self.max_width = width;
        self
    }
    /// Set maximum height for which the decoder should not try
    /// decoding images greater than that height
    pub fn set_max_height(mut self, height: usize) -> Self {
        self.max_height = height;
        self
    }
    /// Whether chunk crc's should be confirmed
    pub fn set_confirm_crc(mut self, yes: bool) -> Self {
        self.flags.confirm_crc = yes;
        self
    }
    /// Whether the zlib adler trailer should be confirmed
    pub fn set_confirm_adler(mut self, yes: bool) -> Self {
        self.flags.confirm_adler = yes;
        self
    }
    /// Whether the decoder may use platform specific intrinsics
    ///
    /// Turning this off forces the scalar routines
    pub fn set_use_unsafe(mut self, yes: bool) -> Self {
        self.flags.use_unsafe = yes;
        self
    }
    /// Use the SSE4.1 code paths where possible
    ///
    /// This checks the capability probe first and returns
    /// false if the machine lacks support
    pub fn use_sse41(&self) -> bool {
        self.flags.use_unsafe && crate::cpu::capabilities_supported()
    }
}
