use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unknown epoch flag \"{0}\"")]
    UnknownValue(String),
}

/// Epoch event flag, column 29 (RINEX2) or 32 (RINEX3) of the marker.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EpochFlag {
    /// Epoch is sane
    #[default]
    Ok,
    /// Power failure since previous epoch
    PowerFailure,
    /// Antenna is being moved at current epoch
    AntennaBeingMoved,
    /// Receiver has moved to a new site
    NewSiteOccupation,
    /// Header records follow
    HeaderInformationFollows,
    /// External event
    ExternalEvent,
    /// Cycle slip records follow
    CycleSlip,
}

impl EpochFlag {
    /// True when the epoch carries satellite observations.
    /// Other flags announce special records instead.
    pub fn carries_observations(&self) -> bool {
        matches!(self, Self::Ok | Self::PowerFailure | Self::CycleSlip)
    }
}

impl std::str::FromStr for EpochFlag {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" | "" => Ok(Self::Ok),
            "1" => Ok(Self::PowerFailure),
            "2" => Ok(Self::AntennaBeingMoved),
            "3" => Ok(Self::NewSiteOccupation),
            "4" => Ok(Self::HeaderInformationFollows),
            "5" => Ok(Self::ExternalEvent),
            "6" => Ok(Self::CycleSlip),
            other => Err(Error::UnknownValue(other.to_string())),
        }
    }
}

impl std::fmt::Display for EpochFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let value = match self {
            Self::Ok => 0,
            Self::PowerFailure => 1,
            Self::AntennaBeingMoved => 2,
            Self::NewSiteOccupation => 3,
            Self::HeaderInformationFollows => 4,
            Self::ExternalEvent => 5,
            Self::CycleSlip => 6,
        };
        write!(f, "{}", value)
    }
}

#[cfg(test)]
mod test {
    use super::EpochFlag;
    use std::str::FromStr;
    #[test]
    fn flag_parsing() {
        for (desc, flag, observations) in [
            ("0", EpochFlag::Ok, true),
            ("1", EpochFlag::PowerFailure, true),
            ("2", EpochFlag::AntennaBeingMoved, false),
            ("3", EpochFlag::NewSiteOccupation, false),
            ("4", EpochFlag::HeaderInformationFollows, false),
            ("5", EpochFlag::ExternalEvent, false),
            ("6", EpochFlag::CycleSlip, true),
        ] {
            let parsed = EpochFlag::from_str(desc).unwrap();
            assert_eq!(parsed, flag);
            assert_eq!(parsed.to_string(), desc);
            assert_eq!(parsed.carries_observations(), observations);
        }
        assert!(EpochFlag::from_str("7").is_err());
    }
}
