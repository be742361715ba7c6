//! Errors possible when decoding deflate/zlib streams
use alloc::string::String;
use core::fmt::{Debug, Display, Formatter};

/// A struct returned when decompression fails
///
/// No partially decoded data is carried, decoding either
/// produces the whole stream or nothing
pub struct InflateDecodeErrors
{
    /// reason why decompression fails
    pub error: DecodeErrorStatus
}

impl InflateDecodeErrors
{
    /// Create a new decode error wrapper
    pub fn new(error: DecodeErrorStatus) -> InflateDecodeErrors
    {
        InflateDecodeErrors { error }
    }
}

impl Debug for InflateDecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        writeln!(f, "{:?}", self.error)
    }
}

impl Display for InflateDecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        writeln!(f, "{:?}", self.error)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InflateDecodeErrors {}

impl From<DecodeErrorStatus> for InflateDecodeErrors
{
    fn from(error: DecodeErrorStatus) -> Self
    {
        InflateDecodeErrors::new(error)
    }
}

pub enum DecodeErrorStatus
{
    /// Input ended before the final block (or the zlib trailer) was read
    InsufficientData,
    Generic(&'static str),
    GenericStr(String),
    /// The stream violates the deflate format
    CorruptData(&'static str),
    /// limit, current
    OutputLimitExceeded(usize, usize),
    /// expected, found
    MismatchedAdler(u32, u32)
}

impl Debug for DecodeErrorStatus
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        match self
        {
            Self::InsufficientData => writeln!(f, "Insufficient data"),
            Self::Generic(reason) => writeln!(f, "{reason}"),
            Self::GenericStr(reason) => writeln!(f, "{reason}"),
            Self::CorruptData(reason) => writeln!(f, "Corrupt data: {reason}"),
            Self::OutputLimitExceeded(limit, current) => writeln!(
                f,
                "Output limit exceeded, set limit was {limit} and output size is {current}"
            ),
            Self::MismatchedAdler(expected, found) =>
            {
                writeln!(f, "Mismatched Adler, expected {expected} but found {found}")
            }
        }
    }
}
