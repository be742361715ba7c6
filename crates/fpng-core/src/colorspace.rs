//! Image colorspace information
//!
//! Only the two truecolour layouts the codec understands are represented

/// All possible image colorspaces
/// the codec can read or write
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
#[allow(clippy::upper_case_acronyms)]
pub enum ColorSpace {
    /// Red, Green, Blue
    #[default]
    RGB,
    /// Red, Green, Blue, Alpha
    RGBA
}

impl ColorSpace {
    /// Number of color channels present for a certain colorspace
    ///
    /// E.g. RGB returns 3 since it contains R,G and B colors to make up a pixel
    pub const fn num_components(&self) -> usize {
        match self {
            Self::RGB => 3,
            Self::RGBA => 4
        }
    }

    /// Returns true if this colorspace carries an alpha channel
    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::RGBA)
    }

    /// Map a channel count to a colorspace
    ///
    /// Returns `None` for anything other than 3 or 4
    pub const fn from_components(components: usize) -> Option<ColorSpace> {
        match components {
            3 => Some(Self::RGB),
            4 => Some(Self::RGBA),
            _ => None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ColorSpace;

    #[test]
    fn components_round_trip() {
        for c in [ColorSpace::RGB, ColorSpace::RGBA] {
            assert_eq!(ColorSpace::from_components(c.num_components()), Some(c));
        }
        assert_eq!(ColorSpace::from_components(1), None);
        assert_eq!(ColorSpace::from_components(0), None);
        assert!(ColorSpace::RGBA.has_alpha());
        assert!(!ColorSpace::RGB.has_alpha());
    }
}
