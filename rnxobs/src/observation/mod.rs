//! Observation records
use std::collections::BTreeMap;

use crate::prelude::Epoch;

mod flag;
mod lli;
mod observable;
mod snr;
mod system;

pub(crate) mod formatting;
pub(crate) mod parsing;
pub mod registry;

pub use flag::EpochFlag;
pub use lli::LliFlags;
pub use observable::Observable;
pub use snr::SNR;
pub use system::{SatId, System};

/// Systems in order of appearance, in headers and epoch bodies.
pub const SYSTEM_PRIORITY: &str = "CEGIJRQS";

/// One observation slot: a value and its optional indicators.
/// Absent slots are simply not stored.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservationData {
    /// Observed value
    pub value: f64,
    /// Loss of lock indicator
    pub lli: Option<LliFlags>,
    /// Signal strength indicator
    pub snr: Option<SNR>,
}

impl ObservationData {
    pub fn new(value: f64, lli: Option<LliFlags>, snr: Option<SNR>) -> Self {
        Self { value, lli, snr }
    }
}

/// Observations of one satellite, indexed by code.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SvObservations {
    pub sv: SatId,
    pub observations: BTreeMap<Observable, ObservationData>,
}

impl SvObservations {
    pub fn new(sv: SatId) -> Self {
        Self {
            sv,
            observations: BTreeMap::new(),
        }
    }
}

/// One epoch block of an observation file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EpochEntry {
    /// Sampling instant
    pub epoch: Epoch,
    /// Event flag
    pub flag: EpochFlag,
    /// Receiver clock offset [s]
    pub clock_offset: Option<f64>,
    /// Satellites, in file order
    pub satellites: Vec<SvObservations>,
    /// Verbatim RINEX3 text of this block, only kept in pass-through mode
    /// and dropped whenever the satellite content is modified.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub raw: Option<String>,
}

impl EpochEntry {
    pub fn new(epoch: Epoch, flag: EpochFlag) -> Self {
        Self {
            epoch,
            flag,
            clock_offset: None,
            satellites: Vec::new(),
            raw: None,
        }
    }
    /// Number of satellites
    pub fn num_sat(&self) -> usize {
        self.satellites.len()
    }
    /// Observations of given satellite, if any
    pub fn satellite(&self, sv: &SatId) -> Option<&SvObservations> {
        self.satellites.iter().find(|s| s.sv == *sv)
    }
    /// Total number of observation slots
    pub(crate) fn num_observations(&self) -> usize {
        self.satellites.iter().map(|s| s.observations.len()).sum()
    }
}

/// Observation record: epochs in file order (duplicates allowed).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub(crate) inner: Vec<EpochEntry>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn push(&mut self, entry: EpochEntry) {
        self.inner.push(entry);
    }
    pub fn len(&self) -> usize {
        self.inner.len()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
    pub fn first(&self) -> Option<&EpochEntry> {
        self.inner.first()
    }
    pub fn last(&self) -> Option<&EpochEntry> {
        self.inner.last()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, EpochEntry> {
        self.inner.iter()
    }
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, EpochEntry> {
        self.inner.iter_mut()
    }
    /// Drops the verbatim text of every epoch
    pub(crate) fn clear_raw(&mut self) {
        for entry in self.inner.iter_mut() {
            entry.raw = None;
        }
    }
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&EpochEntry) -> bool,
    {
        self.inner.retain(f)
    }
}

impl From<Vec<EpochEntry>> for Record {
    fn from(inner: Vec<EpochEntry>) -> Self {
        Self { inner }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a EpochEntry;
    type IntoIter = std::slice::Iter<'a, EpochEntry>;
    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
