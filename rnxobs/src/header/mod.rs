//! Observation RINEX header
use crate::{
    observation::{registry::ObsTypeRegistry, System},
    prelude::{Constellation, Duration, Epoch},
    version::Version,
};

pub(crate) mod formatting;
pub(crate) mod parsing;
mod skeleton;

pub use skeleton::Skeleton;

/// GNSS receiver description (`REC # / TYPE / VERS`)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Receiver {
    pub sn: String,
    pub model: String,
    pub firmware: String,
}

/// Receiver antenna description (`ANT # / TYPE`)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Antenna {
    pub sn: String,
    pub model: String,
}

/// Header of an observation file.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// File revision
    pub version: Version,
    /// System letter of the first line, [Constellation::Mixed] for multi GNSS files
    pub constellation: Option<Constellation>,
    /// Program that produced this file
    pub program: String,
    /// Who produced this file
    pub run_by: String,
    /// Production date, kept as found
    pub date: String,
    pub comments: Vec<String>,
    pub marker_name: String,
    pub marker_number: Option<String>,
    pub marker_type: Option<String>,
    pub observer: String,
    pub agency: String,
    pub receiver: Option<Receiver>,
    pub antenna: Option<Antenna>,
    /// Approximate marker position (ECEF, m)
    pub approx_position: Option<(f64, f64, f64)>,
    /// Antenna eccentricities: height, east, north (m)
    pub antenna_delta: Option<(f64, f64, f64)>,
    /// Sampling interval. None when not declared or not positive.
    pub interval: Option<Duration>,
    pub first_obs: Option<Epoch>,
    pub last_obs: Option<Epoch>,
    /// Time system label of the first/last obs lines
    pub time_system: String,
    /// Declared and observed codes
    pub obs: ObsTypeRegistry,
    /// Country code, from a skeleton `CountryCode=` comment
    pub country: Option<String>,
    /// RINEX3 lines we do not interpret, kept verbatim
    pub(crate) verbatim: Vec<String>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            version: Version::V3_04,
            constellation: None,
            program: String::new(),
            run_by: String::new(),
            date: String::new(),
            comments: Vec::new(),
            marker_name: String::new(),
            marker_number: None,
            marker_type: None,
            observer: String::new(),
            agency: String::new(),
            receiver: None,
            antenna: None,
            approx_position: None,
            antenna_delta: None,
            interval: None,
            first_obs: None,
            last_obs: None,
            time_system: "GPS".to_string(),
            obs: ObsTypeRegistry::default(),
            country: None,
            verbatim: Vec::new(),
        }
    }
}

impl Header {
    /// Copies the fields a [Skeleton] defines into self.
    /// Skeleton comments are appended to ours.
    pub fn merge_skeleton(&mut self, skeleton: &Skeleton) {
        if let Some(name) = &skeleton.marker_name {
            self.marker_name = name.clone();
        }
        if let Some(number) = &skeleton.marker_number {
            self.marker_number = Some(number.clone());
        }
        if let Some(marker_type) = &skeleton.marker_type {
            self.marker_type = Some(marker_type.clone());
        }
        if let Some((observer, agency)) = &skeleton.observer_agency {
            self.observer = observer.clone();
            self.agency = agency.clone();
        }
        if let Some(receiver) = &skeleton.receiver {
            self.receiver = Some(receiver.clone());
        }
        if let Some(antenna) = &skeleton.antenna {
            self.antenna = Some(antenna.clone());
        }
        if let Some(position) = skeleton.approx_position {
            self.approx_position = Some(position);
        }
        if let Some(delta) = skeleton.antenna_delta {
            self.antenna_delta = Some(delta);
        }
        self.comments.extend(skeleton.comments.iter().cloned());
        if let Some(country) = &skeleton.country {
            self.country = Some(country.clone());
        }
    }
    /// System letter to declare: the single system observed, or `M`.
    pub(crate) fn system_letter(&self) -> char {
        let systems = self.obs.systems();
        match systems.as_slice() {
            [single] => single.letter(),
            [] => match self.constellation {
                Some(Constellation::Mixed) | None => 'M',
                Some(c) => System::from(c).letter(),
            },
            _ => 'M',
        }
    }
}
