use super::System;
use crate::error::Error;

/// Observation code: 2 characters in RINEX2 ("L1", "P2"),
/// 3 characters in RINEX3 ("C1C", "L2W").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observable(String);

impl std::fmt::Display for Observable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Observable {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let bytes = code.as_bytes();
        if !(2..=3).contains(&bytes.len()) || !code.is_ascii() {
            return Err(Error::InvalidObservable(code.to_string()));
        }
        if !matches!(bytes[0], b'C' | b'L' | b'D' | b'S' | b'P' | b'I' | b'X') {
            return Err(Error::InvalidObservable(code.to_string()));
        }
        if !bytes[1].is_ascii_digit() {
            return Err(Error::InvalidObservable(code.to_string()));
        }
        if bytes.len() == 3 && !bytes[2].is_ascii_alphabetic() {
            return Err(Error::InvalidObservable(code.to_string()));
        }
        Ok(Self(code.to_string()))
    }
}

impl Observable {
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// True for RINEX2 (2 character) codes
    pub fn is_v2(&self) -> bool {
        self.0.len() == 2
    }
    pub fn is_phase(&self) -> bool {
        self.0.starts_with('L')
    }
    pub fn is_signal_strength(&self) -> bool {
        self.0.starts_with('S')
    }
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
    /// Converts a RINEX2 code to its RINEX3 equivalent for given [System].
    /// RINEX3 codes are returned unchanged.
    pub fn to_v3(&self, system: System) -> Self {
        if !self.is_v2() {
            return self.clone();
        }
        let bytes = self.0.as_bytes();
        let (kind, band) = (bytes[0] as char, bytes[1] as char);
        let attribute = match system {
            System::GPS => match (kind, band) {
                ('P', _) => 'W',
                (_, '1') => 'C',
                ('C', '2') => 'X',
                (_, '2') => 'W',
                _ => 'X',
            },
            System::GLONASS => match (kind, band) {
                ('P', _) => 'P',
                (_, '1') | ('C', '2') => 'C',
                (_, '2') => 'P',
                _ => 'X',
            },
            System::SBAS => match band {
                '1' => 'C',
                _ => 'X',
            },
            _ => 'X',
        };
        // P codes are pseudo ranges
        let kind = if kind == 'P' { 'C' } else { kind };
        Self(format!("{}{}{}", kind, band, attribute))
    }
}

#[cfg(test)]
mod test {
    use super::Observable;
    use crate::observation::System;
    use std::str::FromStr;
    #[test]
    fn observable_parsing() {
        for desc in ["L1", "C1", "P2", "S1", "D2", "C1C", "L2W", "S5X", " C1C "] {
            let code = Observable::from_str(desc);
            assert!(code.is_ok(), "failed to parse \"{}\"", desc);
            assert_eq!(code.unwrap().to_string(), desc.trim());
        }
        for desc in ["", "L", "Q1C", "L1CC", "LXC", "C12"] {
            assert!(Observable::from_str(desc).is_err(), "\"{}\" parsed", desc);
        }
    }
    #[test]
    fn v2_to_v3_codes() {
        for (system, v2, v3) in [
            (System::GPS, "C1", "C1C"),
            (System::GPS, "P1", "C1W"),
            (System::GPS, "L1", "L1C"),
            (System::GPS, "D1", "D1C"),
            (System::GPS, "S1", "S1C"),
            (System::GPS, "C2", "C2X"),
            (System::GPS, "P2", "C2W"),
            (System::GPS, "L2", "L2W"),
            (System::GPS, "S2", "S2W"),
            (System::GPS, "L5", "L5X"),
            (System::GLONASS, "C1", "C1C"),
            (System::GLONASS, "P1", "C1P"),
            (System::GLONASS, "L1", "L1C"),
            (System::GLONASS, "C2", "C2C"),
            (System::GLONASS, "P2", "C2P"),
            (System::GLONASS, "L2", "L2P"),
            (System::GALILEO, "C1", "C1X"),
            (System::GALILEO, "L5", "L5X"),
            (System::SBAS, "C1", "C1C"),
            (System::SBAS, "L5", "L5X"),
        ] {
            let code = Observable::from_str(v2).unwrap();
            assert_eq!(
                code.to_v3(system).to_string(),
                v3,
                "{} {}",
                system,
                v2
            );
        }
        let v3 = Observable::from_str("L1C").unwrap();
        assert_eq!(v3.to_v3(System::GPS), v3);
    }
}
