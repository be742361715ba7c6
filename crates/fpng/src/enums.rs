#![allow(clippy::upper_case_acronyms)]

/// Chunk types the parser tells apart, see
/// table 5.3 of https://www.w3.org/TR/2003/REC-PNG-20031110/
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngChunkType
{
    IHDR,
    PLTE,
    IDAT,
    IEND,
    /// Any chunk with the ancillary bit set
    Ancillary,
    /// A critical chunk this codec does not understand
    UnknownCritical
}

impl PngChunkType
{
    pub fn from_name(name: [u8; 4]) -> PngChunkType
    {
        match &name
        {
            b"IHDR" => Self::IHDR,
            b"PLTE" => Self::PLTE,
            b"IDAT" => Self::IDAT,
            b"IEND" => Self::IEND,
            // bit 5 of the first byte set means lowercase, i.e ancillary
            _ if name[0] & (1 << 5) != 0 => Self::Ancillary,
            _ => Self::UnknownCritical
        }
    }
}

/// Per scanline predictor
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterMethod
{
    None,
    Sub,
    Up,
    Average,
    Paeth
}

impl FilterMethod
{
    /// All methods in the order ties are resolved
    pub const ALL: [FilterMethod; 5] = [
        FilterMethod::None,
        FilterMethod::Sub,
        FilterMethod::Up,
        FilterMethod::Average,
        FilterMethod::Paeth
    ];

    pub const fn from_int(int: u8) -> Option<FilterMethod>
    {
        match int
        {
            0 => Some(FilterMethod::None),
            1 => Some(FilterMethod::Sub),
            2 => Some(FilterMethod::Up),
            3 => Some(FilterMethod::Average),
            4 => Some(FilterMethod::Paeth),
            _ => None
        }
    }

    pub const fn to_int(self) -> u8
    {
        match self
        {
            FilterMethod::None => 0,
            FilterMethod::Sub => 1,
            FilterMethod::Up => 2,
            FilterMethod::Average => 3,
            FilterMethod::Paeth => 4
        }
    }
}

/// Colour types from the IHDR chunk
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngColor
{
    Luma,
    Palette,
    LumaA,
    RGB,
    RGBA
}

impl PngColor
{
    pub(crate) const fn from_int(int: u8) -> Option<PngColor>
    {
        match int
        {
            0 => Some(Self::Luma),
            2 => Some(Self::RGB),
            3 => Some(Self::Palette),
            4 => Some(Self::LumaA),
            6 => Some(Self::RGBA),
            _ => None
        }
    }

    pub(crate) const fn to_int(self) -> u8
    {
        match self
        {
            Self::Luma => 0,
            Self::RGB => 2,
            Self::Palette => 3,
            Self::LumaA => 4,
            Self::RGBA => 6
        }
    }
}
