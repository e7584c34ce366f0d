//! Satellite systems and satellite identifiers, keyed by their RINEX letter.
use std::str::FromStr;

use crate::{
    error::Error,
    prelude::{Constellation, SV},
};

use super::SYSTEM_PRIORITY;

/// Satellite system, identified by its RINEX letter.
/// All SBAS services share the `S` letter. Letters that [Constellation]
/// does not describe (`Q`, ...) are valid systems too.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct System(char);

impl System {
    pub const GPS: Self = Self('G');
    pub const GLONASS: Self = Self('R');
    pub const GALILEO: Self = Self('E');
    pub const BEIDOU: Self = Self('C');
    pub const QZSS: Self = Self('J');
    pub const IRNSS: Self = Self('I');
    pub const SBAS: Self = Self('S');

    /// System of this letter. `M` (mixed) is not a system.
    pub fn from_letter(letter: char) -> Option<Self> {
        if letter.is_ascii_uppercase() && letter != 'M' {
            Some(Self(letter))
        } else {
            None
        }
    }
    pub fn letter(&self) -> char {
        self.0
    }
    /// [Constellation] counterpart, when there is one
    pub fn constellation(&self) -> Option<Constellation> {
        Constellation::from_str(&self.0.to_string())
            .ok()
            .filter(|c| *c != Constellation::Mixed)
    }
    /// Rank in [SYSTEM_PRIORITY]. Unlisted systems come last, by letter.
    pub(crate) fn rank(&self) -> (usize, char) {
        let rank = SYSTEM_PRIORITY
            .find(self.0)
            .unwrap_or(SYSTEM_PRIORITY.len());
        (rank, self.0)
    }
}

impl From<Constellation> for System {
    fn from(constellation: Constellation) -> Self {
        let letter = format!("{:x}", constellation);
        Self(letter.chars().next().unwrap_or('M'))
    }
}

impl std::fmt::Display for System {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Satellite identifier: system and PRN number, like "G06" or "Q01".
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SatId {
    pub system: System,
    pub prn: u8,
}

impl SatId {
    pub fn new(system: System, prn: u8) -> Self {
        Self { system, prn }
    }
}

impl From<SV> for SatId {
    fn from(sv: SV) -> Self {
        Self::new(System::from(sv.constellation), sv.prn)
    }
}

impl std::fmt::Display for SatId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{:02}", self.system, self.prn)
    }
}

impl FromStr for SatId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || Error::InvalidSatellite(s.to_string());
        let mut chars = s.chars();
        let system = chars
            .next()
            .and_then(System::from_letter)
            .ok_or_else(invalid)?;
        let prn = chars.as_str().trim().parse::<u8>().map_err(|_| invalid())?;
        Ok(Self::new(system, prn))
    }
}
