use crate::error::Error;

/// RINEX revision, as declared by the first header line.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
    /// Revision we produce when converting to RINEX3
    pub const V3_04: Self = Self::new(3, 4);
    /// Revision we produce when converting to RINEX2
    pub const V2_11: Self = Self::new(2, 11);
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl std::str::FromStr for Version {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || Error::InvalidVersion(s.to_string());
        match s.split_once('.') {
            Some((major, minor)) => {
                let major = major.trim().parse::<u8>().map_err(|_| invalid())?;
                let minor = if minor.trim().is_empty() {
                    0
                } else {
                    minor.trim().parse::<u8>().map_err(|_| invalid())?
                };
                Ok(Self { major, minor })
            },
            None => {
                let major = s.parse::<u8>().map_err(|_| invalid())?;
                Ok(Self { major, minor: 0 })
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::Version;
    use std::str::FromStr;
    #[test]
    fn version_parsing() {
        for (desc, major, minor) in [
            ("2.11", 2, 11),
            ("3.04", 3, 4),
            ("  3.05", 3, 5),
            ("2", 2, 0),
        ] {
            let version = Version::from_str(desc).unwrap();
            assert_eq!(version, Version::new(major, minor), "\"{}\"", desc);
        }
        assert_eq!(Version::new(3, 4).to_string(), "3.04");
        assert!(Version::from_str("x.yz").is_err());
    }
}
