//! Errors returned by the encoder and decoder
use alloc::string::String;
use core::fmt::{Debug, Display, Formatter};

use fpng_core::bytestream::ZByteIoError;
use fpng_deflate::errors::{DecodeErrorStatus, InflateDecodeErrors};

/// Possible errors that may occur during encoding or decoding
///
/// Encoding and decoding are all or nothing, no partially
/// filled pixel buffer is ever handed back alongside an error.
pub enum PngErrors
{
    /// Zero or too large dimensions, or a pixel buffer whose
    /// length does not match `width * height * channels`
    InvalidDimensions(String),
    /// A valid png that uses features this codec does not
    /// handle (palette, grayscale, 16 bit, interlacing).
    ///
    /// Callers should retry with a general purpose decoder
    UnsupportedFormat(String),
    /// A checksum or structural invariant does not hold
    CorruptData(String),
    /// The stream ended before the image was complete
    TruncatedInput,
    /// An internal invariant broke while encoding
    EncodeError(&'static str),
    /// An internal invariant broke while decoding
    DecodeError(&'static str),
    /// A caller supplied argument is out of range
    InvalidParameter(String),
    /// Reading or writing a file failed
    #[cfg(feature = "std")]
    IoError(std::io::Error)
}

impl Debug for PngErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        match self
        {
            Self::InvalidDimensions(reason) => writeln!(f, "Invalid dimensions: {reason}"),
            Self::UnsupportedFormat(reason) => writeln!(f, "Unsupported png: {reason}"),
            Self::CorruptData(reason) => writeln!(f, "Corrupt png: {reason}"),
            Self::TruncatedInput => writeln!(f, "Input ended before the image was complete"),
            Self::EncodeError(reason) => writeln!(f, "Encoding failed: {reason}"),
            Self::DecodeError(reason) => writeln!(f, "Decoding failed: {reason}"),
            Self::InvalidParameter(reason) => writeln!(f, "Invalid parameter: {reason}"),
            #[cfg(feature = "std")]
            Self::IoError(err) => writeln!(f, "I/O error: {err}")
        }
    }
}

impl Display for PngErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        Debug::fmt(self, f)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PngErrors
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
    {
        match self
        {
            Self::IoError(err) => Some(err),
            _ => None
        }
    }
}

impl From<InflateDecodeErrors> for PngErrors
{
    fn from(err: InflateDecodeErrors) -> Self
    {
        match err.error
        {
            DecodeErrorStatus::InsufficientData => Self::TruncatedInput,
            status => Self::CorruptData(alloc::format!("zlib stream: {status:?}"))
        }
    }
}

impl From<ZByteIoError> for PngErrors
{
    fn from(err: ZByteIoError) -> Self
    {
        match err
        {
            ZByteIoError::NotEnoughBytes(..) => Self::TruncatedInput
        }
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for PngErrors
{
    fn from(err: std::io::Error) -> Self
    {
        Self::IoError(err)
    }
}
