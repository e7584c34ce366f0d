use super::Error;
use gnss_rs::prelude::{Constellation, SV};
use hifitime::Epoch;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum MaskToken {
    /// Epoch
    Epoch(Epoch),
    /// List of Satellite Vehicles
    SV(Vec<SV>),
    /// List of GNSS observables (standard RINEX codes)
    Observables(Vec<String>),
    /// List of GNSS Constellations
    Constellations(Vec<Constellation>),
}

impl MaskToken {
    pub fn parse_epoch(s: &str) -> Result<Self, Error> {
        Ok(Self::Epoch(
            Epoch::from_str(s.trim()).map_err(|_| Error::InvalidEpoch)?,
        ))
    }
    pub fn parse_satellites(s: &str) -> Result<Self, Error> {
        let svs = s
            .trim()
            .split(',')
            .filter_map(|sv| SV::from_str(sv.trim()).ok())
            .collect::<Vec<_>>();
        if svs.is_empty() {
            Err(Error::InvalidSatellite)
        } else {
            Ok(Self::SV(svs))
        }
    }
    pub fn parse_observables(s: &str) -> Result<Self, Error> {
        let codes = s
            .trim()
            .split(',')
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect::<Vec<_>>();
        if codes.is_empty() {
            Err(Error::InvalidMask)
        } else {
            Ok(Self::Observables(codes))
        }
    }
    pub fn parse_constellations(s: &str) -> Result<Self, Error> {
        let constells = s
            .trim()
            .split(',')
            .filter_map(|s| Constellation::from_str(s.trim()).ok())
            .collect::<Vec<_>>();
        if constells.is_empty() {
            Err(Error::InvalidConstellation)
        } else {
            Ok(Self::Constellations(constells))
        }
    }
}
