//! File production: standardized long file names.
//!
//! A RINEX3 long name reads `SSSSMRCCC_O_YYYYDDDHHMM_PPU_FFU_MO.rnx`:
//! station, monument/receiver index, country, data source, start time,
//! period and sampling.
use std::path::Path;

use num_integer::div_ceil;

use crate::{
    epoch::day_of_year,
    error::Error,
    prelude::{Duration, Epoch},
    Rinex,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unit of a file period
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PeriodUnit {
    Minute,
    Hour,
    Day,
    Week,
}

impl PeriodUnit {
    /// Duration of one unit, in seconds
    pub const fn seconds(&self) -> u64 {
        match self {
            Self::Minute => 60,
            Self::Hour => 3_600,
            Self::Day => 86_400,
            Self::Week => 604_800,
        }
    }
    /// Largest count expressed in this unit before moving to the next one
    const fn rollover(&self) -> Option<u64> {
        match self {
            Self::Minute => Some(59),
            Self::Hour => Some(23),
            Self::Day => Some(7),
            Self::Week => None,
        }
    }
    const fn next(&self) -> Option<Self> {
        match self {
            Self::Minute => Some(Self::Hour),
            Self::Hour => Some(Self::Day),
            Self::Day => Some(Self::Week),
            Self::Week => None,
        }
    }
    fn letter(&self) -> char {
        match self {
            Self::Minute => 'M',
            Self::Hour => 'H',
            Self::Day => 'D',
            Self::Week => 'W',
        }
    }
}

/// File period, like `01H` or `15M`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Period {
    pub count: u64,
    pub unit: PeriodUnit,
}

impl Period {
    pub fn new(count: u64, unit: PeriodUnit) -> Self {
        Self { count, unit }
    }
    /// Expresses `count` units in the coarsest unit that keeps the count
    /// within its rollover, rounding up.
    fn escalate(mut count: u64, mut unit: PeriodUnit) -> Self {
        while let (Some(rollover), Some(next)) = (unit.rollover(), unit.next()) {
            if count <= rollover {
                break;
            }
            count = div_ceil(count * unit.seconds(), next.seconds());
            unit = next;
        }
        Self { count, unit }
    }
    /// Period covering a file span, escalating from minutes
    pub fn from_span(span: Duration) -> Self {
        let seconds = span.to_seconds().max(0.0).ceil() as u64;
        Self::escalate(div_ceil(seconds, 60).max(1), PeriodUnit::Minute)
    }
    /// Nominal period of a file span, escalating from hours
    pub fn nominal(span: Duration) -> Self {
        let seconds = span.to_seconds().max(0.0).ceil() as u64;
        Self::escalate(div_ceil(seconds, 3_600).max(1), PeriodUnit::Hour)
    }
    /// Total duration, in seconds
    pub fn seconds(&self) -> u64 {
        self.count * self.unit.seconds()
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:02}{}", self.count, self.unit.letter())
    }
}

impl std::str::FromStr for Period {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || Error::ProductionAttribute(s.to_string());
        let unit = match s.chars().last().ok_or_else(invalid)? {
            'M' => PeriodUnit::Minute,
            'H' => PeriodUnit::Hour,
            'D' => PeriodUnit::Day,
            'W' => PeriodUnit::Week,
            _ => return Err(invalid()),
        };
        let count = s[..s.len() - 1].parse::<u64>().map_err(|_| invalid())?;
        if count == 0 {
            return Err(invalid());
        }
        Ok(Self { count, unit })
    }
}

impl TryFrom<String> for Period {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

/// Origin of the data
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum DataSource {
    /// Receiver
    Receiver,
    /// Data stream
    #[default]
    Stream,
    /// Unknown
    Unknown,
}

impl DataSource {
    pub fn to_char(&self) -> char {
        match self {
            Self::Receiver => 'R',
            Self::Stream => 'S',
            Self::Unknown => 'U',
        }
    }
}

impl std::str::FromStr for DataSource {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "R" => Ok(Self::Receiver),
            "S" => Ok(Self::Stream),
            "U" => Ok(Self::Unknown),
            other => Err(Error::ProductionAttribute(other.to_string())),
        }
    }
}

/// What a standard file name tells about its content
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductionAttributes {
    /// 4 letter station name
    pub station: String,
    /// 3 letter country code (long names only)
    pub country: Option<String>,
    /// Data source (long names only)
    pub source: Option<DataSource>,
}

impl ProductionAttributes {
    /// Best effort recognition of a standard file name: long RINEX3 names
    /// (`SSSSMRCCC_O_YYYYDDDHHMM_...`) or short RINEX2 names (`ssssdddf.yyo`).
    pub fn from_filename<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::ProductionAttribute(path.display().to_string()))?
            .to_uppercase();
        let invalid = || Error::ProductionAttribute(name.clone());

        if !name.is_ascii() {
            return Err(invalid());
        }

        let bytes = name.as_bytes();
        let is_long = bytes.len() >= 23
            && bytes[9] == b'_'
            && bytes[11] == b'_'
            && bytes[12..23].iter().all(|b| b.is_ascii_digit());

        if is_long {
            let source = name[10..11].parse::<DataSource>()?;
            Ok(Self {
                station: name[..4].to_string(),
                country: Some(name[6..9].to_string()),
                source: Some(source),
            })
        } else if name.find('.') == Some(8) && bytes.len() >= 12 {
            Ok(Self {
                station: name[..4].to_string(),
                country: None,
                source: None,
            })
        } else {
            Err(invalid())
        }
    }
}

/// Validates a country code: three letters or digits, uppercased
fn country_code(code: &str) -> Result<String, Error> {
    let code = code.trim().to_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(code)
    } else {
        Err(Error::ProductionAttribute(code))
    }
}

/// First four characters of the marker name, uppercased, padded with X
fn station_name(marker: &str) -> String {
    let mut station = marker
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(4)
        .collect::<String>()
        .to_uppercase();
    while station.chars().count() < 4 {
        station.push('X');
    }
    station
}

impl Rinex {
    /// Derives the standard long file name of this observation file.
    ///
    /// The country is `country` when given, otherwise the skeleton's,
    /// otherwise the one found in `attrs`, and `XXX` as a last resort.
    /// The data source comes from `attrs` and defaults to [DataSource::Stream].
    pub fn long_filename(
        &self,
        country: Option<&str>,
        attrs: Option<&ProductionAttributes>,
    ) -> Result<String, Error> {
        let (first, last) = match (self.first_epoch(), self.last_epoch()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(Error::EmptyEpochSequence),
        };
        let interval = self
            .sampling_interval()
            .ok_or(Error::UndeterminedInterval)?;

        let marker = if self.header.marker_name.trim().is_empty() {
            attrs.map(|attrs| attrs.station.as_str()).unwrap_or("")
        } else {
            self.header.marker_name.as_str()
        };

        let country = match country {
            Some(code) => country_code(code)?,
            None => self
                .header
                .country
                .as_deref()
                .or(attrs.and_then(|attrs| attrs.country.as_deref()))
                .and_then(|code| country_code(code).ok())
                .unwrap_or_else(|| "XXX".to_string()),
        };

        let source = attrs
            .and_then(|attrs| attrs.source)
            .unwrap_or_default();

        Ok(format!(
            "{}00{}_{}_{}_{}_{:02}S_MO.rnx",
            station_name(marker),
            country,
            source.to_char(),
            start_time(first),
            Period::from_span(last - first),
            interval.to_seconds().round() as u64,
        ))
    }
}

/// "YYYYDDDHHMM"
fn start_time(epoch: Epoch) -> String {
    let (y, _, _, h, m, _, _) = epoch.to_gregorian_utc();
    format!("{:04}{:03}{:02}{:02}", y, day_of_year(epoch), h, m)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::header::Header;
    use crate::observation::{EpochEntry, EpochFlag, Record};
    use hifitime::Unit;
    use std::str::FromStr;

    #[test]
    fn period_escalation() {
        for (span, expected) in [
            (45.0 * Unit::Minute, "45M"),
            (59.5 * Unit::Minute, "01H"),
            (90.0 * Unit::Minute, "02H"),
            (23.0 * Unit::Hour, "23H"),
            (30.0 * Unit::Hour, "02D"),
            (86370.0 * Unit::Second, "01D"),
            (10.0 * Unit::Day, "02W"),
            (0.0 * Unit::Second, "01M"),
        ] {
            assert_eq!(Period::from_span(span).to_string(), expected, "{}", span);
        }
        for (span, expected) in [
            (15.0 * Unit::Minute, "01H"),
            (6.0 * Unit::Hour, "06H"),
            (86370.0 * Unit::Second, "01D"),
            (8.0 * Unit::Day, "02W"),
        ] {
            assert_eq!(Period::nominal(span).to_string(), expected, "{}", span);
        }
    }

    #[test]
    fn period_parsing() {
        let period = Period::from_str("01D").unwrap();
        assert_eq!(period, Period::new(1, PeriodUnit::Day));
        assert_eq!(period.seconds(), 86_400);
        assert_eq!(Period::from_str("15M").unwrap().seconds(), 900);
        assert!(Period::from_str("00H").is_err());
        assert!(Period::from_str("1Y").is_err());
        assert!(Period::from_str("").is_err());
    }

    #[test]
    fn production_attributes() {
        let attrs =
            ProductionAttributes::from_filename("/data/AGOC00SVK_R_20250750000_01H_30S_MO.rnx")
                .unwrap();
        assert_eq!(attrs.station, "AGOC");
        assert_eq!(attrs.country.as_deref(), Some("SVK"));
        assert_eq!(attrs.source, Some(DataSource::Receiver));

        let attrs = ProductionAttributes::from_filename("graz2540.18o").unwrap();
        assert_eq!(attrs.station, "GRAZ");
        assert!(attrs.country.is_none());

        assert!(ProductionAttributes::from_filename("observations.txt").is_err());
    }

    fn hourly_rinex() -> Rinex {
        let mut header = Header::default();
        header.marker_name = "agoc".to_string();
        header.interval = Some(Duration::from_seconds(30.0));
        let t0 = Epoch::from_gregorian_utc_hms(2025, 3, 16, 0, 0, 0);
        let record = Record::from(
            (0..120)
                .map(|i| EpochEntry::new(t0 + i as f64 * 30.0 * Unit::Second, EpochFlag::Ok))
                .collect::<Vec<_>>(),
        );
        Rinex::new(header, record)
    }

    #[test]
    fn long_filename() {
        let mut rinex = hourly_rinex();
        assert_eq!(
            rinex.long_filename(None, None).unwrap(),
            "AGOC00XXX_S_20250750000_01H_30S_MO.rnx"
        );
        assert_eq!(
            rinex.long_filename(Some("aut"), None).unwrap(),
            "AGOC00AUT_S_20250750000_01H_30S_MO.rnx"
        );
        assert!(rinex.long_filename(Some("AUSTRIA"), None).is_err());

        let attrs = ProductionAttributes {
            station: "AGOC".to_string(),
            country: Some("SVK".to_string()),
            source: Some(DataSource::Receiver),
        };
        assert_eq!(
            rinex.long_filename(None, Some(&attrs)).unwrap(),
            "AGOC00SVK_R_20250750000_01H_30S_MO.rnx"
        );

        rinex.header.country = Some("DEU".to_string());
        assert_eq!(
            rinex.long_filename(None, Some(&attrs)).unwrap(),
            "AGOC00DEU_R_20250750000_01H_30S_MO.rnx"
        );

        rinex.header.marker_name = "W1".to_string();
        assert!(rinex
            .long_filename(None, None)
            .unwrap()
            .starts_with("W1XX00DEU_S_"));

        rinex.header.interval = None;
        assert!(matches!(
            rinex.long_filename(None, None),
            Err(Error::UndeterminedInterval)
        ));
    }
}
