//! Loss of Lock Indicator
use bitflags::bitflags;

bitflags! {
    /// LLI digit attached to one observation. Unknown bits are retained
    /// so any digit written by a receiver survives a round trip.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LliFlags: u8 {
        /// Ok or unknown status
        const OK_OR_UNKNOWN = 0x00;
        /// Lock lost since previous observation, cycle slip possible
        const LOCK_LOSS = 0x01;
        /// Half cycle ambiguity
        const HALF_CYCLE_SLIP = 0x02;
        /// Observing under anti spoofing (RINEX2),
        /// or BOC tracking of MBOC modulated signal (RINEX3)
        const UNDER_ANTI_SPOOFING = 0x04;
    }
}

impl LliFlags {
    /// Parses one LLI column. Blank columns carry no indicator.
    pub fn from_column(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self::from_bits_retain(d as u8))
    }
}

#[cfg(test)]
mod test {
    use super::LliFlags;
    #[test]
    fn lli_columns() {
        assert_eq!(LliFlags::from_column(' '), None);
        assert_eq!(LliFlags::from_column('0'), Some(LliFlags::OK_OR_UNKNOWN));
        assert_eq!(LliFlags::from_column('1'), Some(LliFlags::LOCK_LOSS));
        let flags = LliFlags::from_column('5').unwrap();
        assert!(flags.contains(LliFlags::LOCK_LOSS));
        assert!(flags.contains(LliFlags::UNDER_ANTI_SPOOFING));
        assert_eq!(LliFlags::from_column('9').unwrap().bits(), 9);
    }
}
