//! Header decoding
use std::io::BufRead;
use std::str::FromStr;

use log::debug;

use super::{Antenna, Header, Receiver};
use crate::{
    epoch::{parse_header_time, to_absolute_time},
    error::Error,
    observation::{Observable, System},
    prelude::{Constellation, Duration, Epoch},
    reader::LineFeed,
    version::Version,
};

/// Labels made stale by any filtering: never retained
const STALE_LABELS: [&str; 2] = ["PRN / # OF OBS", "# OF SATELLITES"];

/// Splits a header line into its content (columns 1-60) and its label.
pub(crate) fn split_label(line: &str) -> (&str, &str) {
    match (line.get(..60), line.get(60..)) {
        (Some(content), Some(label)) => (content, label.trim()),
        _ => (line, ""),
    }
}

/// Parses the `RINEX VERSION / TYPE` line
pub(crate) fn parse_version_line(line: &str) -> Result<(Version, Option<Constellation>), Error> {
    let (content, label) = split_label(line);
    if !label.contains("RINEX VERSION / TYPE") {
        return Err(Error::NotObservationData);
    }
    let version = Version::from_str(content.get(..9).unwrap_or(content))?;
    if content.get(20..21) != Some("O") {
        return Err(Error::NotObservationData);
    }
    let constellation = content
        .get(40..41)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .and_then(|s| Constellation::from_str(s).ok());
    Ok((version, constellation))
}

pub(crate) fn parse_triplet(content: &str) -> Option<(f64, f64, f64)> {
    let items = content
        .split_ascii_whitespace()
        .map(|item| item.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    match items.as_slice() {
        [a, b, c] => Some((*a, *b, *c)),
        _ => None,
    }
}

pub(crate) fn field(content: &str, start: usize, end: usize) -> String {
    content
        .get(start..end)
        .or_else(|| content.get(start..))
        .unwrap_or("")
        .trim()
        .to_string()
}

fn parse_obs_time(content: &str) -> Result<Epoch, Error> {
    let malformed = || Error::MalformedTimestamp(content.trim().to_string());
    let fields = parse_header_time(content).map_err(|_| malformed())?;
    to_absolute_time(&fields).map_err(|_| malformed())
}

fn parse_codes(content: &str) -> Result<Vec<Observable>, Error> {
    content
        .split_ascii_whitespace()
        .map(Observable::from_str)
        .collect()
}

/// Observation codes, collected across continuation lines
#[derive(Default)]
struct ObsTypes {
    /// single RINEX2 list
    v2: Vec<Observable>,
    /// RINEX3 lists, per system
    v3: Vec<(System, Vec<Observable>)>,
}

impl ObsTypes {
    fn parse_v2(&mut self, content: &str) -> Result<(), Error> {
        self.v2.extend(parse_codes(content.get(6..).unwrap_or(""))?);
        Ok(())
    }
    fn parse_v3(&mut self, content: &str) -> Result<(), Error> {
        let codes = parse_codes(content.get(6..).unwrap_or(""))?;
        match content.chars().next().unwrap_or(' ') {
            ' ' => match self.v3.last_mut() {
                Some((_, previous)) => previous.extend(codes),
                None => return Err(Error::HeaderParsing(content.to_string())),
            },
            letter => {
                let system = System::from_letter(letter)
                    .ok_or_else(|| Error::HeaderParsing(content.to_string()))?;
                self.v3.push((system, codes));
            },
        }
        Ok(())
    }
}

impl Header {
    /// Interprets one labeled line
    fn parse_line(
        &mut self,
        line: &str,
        content: &str,
        label: &str,
        obs_types: &mut ObsTypes,
    ) -> Result<(), Error> {
        if label.contains("RINEX VERSION / TYPE") {
            let (version, constellation) = parse_version_line(line)?;
            self.version = version;
            self.constellation = constellation;
        } else if label.contains("PGM / RUN BY / DATE") {
            self.program = field(content, 0, 20);
            self.run_by = field(content, 20, 40);
            self.date = field(content, 40, 60);
        } else if label.contains("COMMENT") {
            self.comments.push(content.trim_end().to_string());
        } else if label.contains("MARKER NAME") {
            self.marker_name = content.trim().to_string();
        } else if label.contains("MARKER NUMBER") {
            self.marker_number = Some(content.trim().to_string());
        } else if label.contains("MARKER TYPE") {
            self.marker_type = Some(content.trim().to_string());
        } else if label.contains("OBSERVER / AGENCY") {
            self.observer = field(content, 0, 20);
            self.agency = field(content, 20, 60);
        } else if label.contains("REC # / TYPE / VERS") {
            self.receiver = Some(Receiver {
                sn: field(content, 0, 20),
                model: field(content, 20, 40),
                firmware: field(content, 40, 60),
            });
        } else if label.contains("ANT # / TYPE") {
            self.antenna = Some(Antenna {
                sn: field(content, 0, 20),
                model: field(content, 20, 40),
            });
        } else if label.contains("APPROX POSITION XYZ") {
            self.approx_position = parse_triplet(content);
        } else if label.contains("ANTENNA: DELTA H/E/N") {
            self.antenna_delta = parse_triplet(content);
        } else if label.contains("# / TYPES OF OBSERV") {
            obs_types.parse_v2(content)?;
        } else if label.contains("SYS / # / OBS TYPES") {
            obs_types.parse_v3(content)?;
        } else if label.contains("INTERVAL") {
            self.interval = field(content, 0, 10)
                .parse::<f64>()
                .ok()
                .filter(|dt| *dt > 0.0)
                .map(Duration::from_seconds);
        } else if label.contains("TIME OF FIRST OBS") {
            self.first_obs = Some(parse_obs_time(content)?);
            let time_system = field(content, 48, 51);
            if !time_system.is_empty() {
                self.time_system = time_system;
            }
        } else if label.contains("TIME OF LAST OBS") {
            self.last_obs = Some(parse_obs_time(content)?);
        } else if self.version.major > 2 && !STALE_LABELS.iter().any(|l| label.contains(l)) {
            self.verbatim.push(line.trim_end().to_string());
        } else {
            debug!("dropped header line \"{}\"", line.trim_end());
        }
        Ok(())
    }

    /// Declares the collected codes in the registry
    fn register_obs_types(&mut self, obs_types: ObsTypes) {
        if self.version.major < 3 {
            let systems = match self.constellation {
                Some(Constellation::Mixed) => {
                    vec![System::GPS, System::GLONASS, System::GALILEO, System::SBAS]
                },
                Some(c) => vec![System::from(c)],
                None => vec![System::GPS],
            };
            for system in systems {
                self.obs.register_declared(system, obs_types.v2.clone());
            }
        } else {
            for (system, codes) in obs_types.v3 {
                self.obs.register_declared(system, codes);
            }
        }
    }
}

/// Consumes the header section, up to and including END OF HEADER.
pub(crate) fn decode_header<R: BufRead>(feed: &mut LineFeed<R>) -> Result<Header, Error> {
    let mut header = Header::default();
    let mut obs_types = ObsTypes::default();
    let mut first = true;

    loop {
        let Some(line) = feed.next_line()? else {
            return Err(Error::MissingEndOfHeader);
        };
        let (content, label) = split_label(&line);
        if first {
            if !label.contains("RINEX VERSION / TYPE") {
                return Err(Error::NotObservationData);
            }
            first = false;
        }
        if label.contains("END OF HEADER") {
            break;
        }
        header.parse_line(&line, content, label, &mut obs_types)?;
    }

    header.register_obs_types(obs_types);
    Ok(header)
}

#[cfg(test)]
mod test {
    use super::{decode_header, parse_version_line, split_label};
    use crate::observation::{Observable, System};
    use crate::prelude::{Constellation, Duration, Epoch};
    use crate::reader::LineFeed;
    use crate::version::Version;
    use std::io::Cursor;
    use std::str::FromStr;
    #[test]
    fn version_line() {
        let (version, constellation) = parse_version_line(
            "     3.04           OBSERVATION DATA    M                   RINEX VERSION / TYPE",
        )
        .unwrap();
        assert_eq!(version, Version::new(3, 4));
        assert_eq!(constellation, Some(Constellation::Mixed));

        let (version, constellation) = parse_version_line(
            "     2.11           OBSERVATION DATA    G (GPS)             RINEX VERSION / TYPE",
        )
        .unwrap();
        assert_eq!(version, Version::new(2, 11));
        assert_eq!(constellation, Some(Constellation::GPS));

        assert!(parse_version_line(
            "     3.04           N: GNSS NAV DATA    M: MIXED            RINEX VERSION / TYPE"
        )
        .is_err());
    }
    #[test]
    fn label_split() {
        let (content, label) = split_label(
            "AGOC                                                        MARKER NAME",
        );
        assert_eq!(content.trim(), "AGOC");
        assert_eq!(label, "MARKER NAME");
        assert_eq!(split_label("short"), ("short", ""));
    }
    #[test]
    fn v3_header_decoding() {
        let content = "     3.04           OBSERVATION DATA    M                   RINEX VERSION / TYPE
sbf2rin-13.4.5                          20250316 010000 UTC PGM / RUN BY / DATE
AGOC                                                        MARKER NAME
G   15 C1C L1C D1C S1C C1W L1W D1W S1W C2W L2W D2W S2W C5Q  SYS / # / OBS TYPES
       L5Q D5Q                                              SYS / # / OBS TYPES
R    4 C1C L1C D1C S1C                                      SYS / # / OBS TYPES
    30.000                                                  INTERVAL
  2025     3    16     0     0    0.0000000     GPS         TIME OF FIRST OBS
    18                                                      LEAP SECONDS
    12                                                      # OF SATELLITES
                                                            END OF HEADER
";
        let mut feed = LineFeed::new(Cursor::new(content));
        let header = decode_header(&mut feed).unwrap();
        assert_eq!(header.version, Version::new(3, 4));
        assert_eq!(header.program, "sbf2rin-13.4.5");
        assert_eq!(header.date, "20250316 010000 UTC");
        assert_eq!(header.marker_name, "AGOC");
        assert_eq!(header.interval, Some(Duration::from_seconds(30.0)));
        assert_eq!(
            header.first_obs,
            Some(Epoch::from_gregorian_utc_at_midnight(2025, 3, 16))
        );
        assert_eq!(header.time_system, "GPS");

        let gps = header.obs.declared(&System::GPS).unwrap();
        assert_eq!(gps.len(), 15);
        assert_eq!(gps[14], Observable::from_str("D5Q").unwrap());
        assert_eq!(header.obs.declared(&System::GLONASS).unwrap().len(), 4);

        assert_eq!(header.verbatim.len(), 1, "only LEAP SECONDS is kept verbatim");
        assert!(header.verbatim[0].contains("LEAP SECONDS"));
    }
    #[test]
    fn v2_header_decoding() {
        let content = "     2.11           OBSERVATION DATA    M (MIXED)           RINEX VERSION / TYPE
     7    C1    L1    L2    P2    S1    S2    D1            # / TYPES OF OBSERV
                                                            END OF HEADER
";
        let mut feed = LineFeed::new(Cursor::new(content));
        let header = decode_header(&mut feed).unwrap();
        for system in [System::GPS, System::GLONASS, System::GALILEO, System::SBAS] {
            assert_eq!(header.obs.declared(&system).unwrap().len(), 7);
        }
        assert!(header.interval.is_none());
    }
    #[test]
    fn v3_header_other_systems() {
        let content = "     3.05           OBSERVATION DATA    M                   RINEX VERSION / TYPE
G    2 C1C L1C                                              SYS / # / OBS TYPES
Q    2 C1C L1C                                              SYS / # / OBS TYPES
                                                            END OF HEADER
";
        let mut feed = LineFeed::new(Cursor::new(content));
        let header = decode_header(&mut feed).unwrap();
        let q = System::from_letter('Q').unwrap();
        assert_eq!(header.obs.declared(&q).map(|codes| codes.len()), Some(2));
        assert_eq!(header.obs.systems(), vec![System::GPS, q]);

        let content = "     3.05           OBSERVATION DATA    M                   RINEX VERSION / TYPE
7    2 C1C L1C                                              SYS / # / OBS TYPES
                                                            END OF HEADER
";
        let mut feed = LineFeed::new(Cursor::new(content));
        assert!(matches!(
            decode_header(&mut feed),
            Err(crate::error::Error::HeaderParsing(_))
        ));
    }
    #[test]
    fn missing_end_of_header() {
        let content = "     3.04           OBSERVATION DATA    M                   RINEX VERSION / TYPE
AGOC                                                        MARKER NAME
";
        let mut feed = LineFeed::new(Cursor::new(content));
        assert!(matches!(
            decode_header(&mut feed),
            Err(crate::error::Error::MissingEndOfHeader)
        ));
    }
}
