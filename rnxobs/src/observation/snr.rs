/// Signal strength indicator, the 0..9 digit following an observation.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SNR(u8);

impl SNR {
    /// Builds from a single digit, None if not in 0..=9.
    pub fn new(digit: u8) -> Option<Self> {
        if digit <= 9 {
            Some(Self(digit))
        } else {
            None
        }
    }
    /// Parses one SSI column. Blank columns carry no indicator.
    pub fn from_column(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(d as u8))
    }
}

impl std::fmt::LowerHex for SNR {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
