//! Recoverable anomalies, collected while reading.
use log::{debug, warn};
use thiserror::Error;

use crate::{
    observation::{SatId, System},
    prelude::{Epoch, Observable},
};

/// One recoverable anomaly. Reading always continues after an [Incident].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Incident {
    #[error("line {line}: unexpected content \"{content}\"")]
    UnexpectedLine { line: usize, content: String },
    #[error("line {line}: {sv} non numerical values for {codes:?}")]
    MalformedObservationLine {
        line: usize,
        sv: SatId,
        codes: Vec<Observable>,
    },
    #[error("line {line}: unknown satellite \"{id}\"")]
    UnknownSatellite { line: usize, id: String },
    #[error("line {line}: {sv} has no declared observables")]
    UndeclaredSystem { line: usize, sv: SatId },
    #[error("{epoch}: truncated epoch, {found}/{expected} satellites")]
    TruncatedEpoch {
        epoch: Epoch,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: {sv} has {found} values, only {declared} declared")]
    ExtraObservations {
        line: usize,
        sv: SatId,
        declared: usize,
        found: usize,
    },
    #[error("{system} declared but never observed: {codes:?}")]
    ObsTypeMismatch {
        system: System,
        codes: Vec<Observable>,
    },
}

impl Incident {
    /// True for anomalies worth a warning. Skipped lines are only traced.
    pub fn is_severe(&self) -> bool {
        !matches!(self, Self::UnexpectedLine { .. })
    }
}

/// Collects the [Incident]s raised by one reading or conversion run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    incidents: Vec<Incident>,
}

impl Diagnostics {
    /// Records (and logs) a new [Incident]
    pub fn record(&mut self, incident: Incident) {
        if incident.is_severe() {
            warn!("{}", incident);
        } else {
            debug!("{}", incident);
        }
        self.incidents.push(incident);
    }
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
    pub fn len(&self) -> usize {
        self.incidents.len()
    }
    /// Number of incidents matching the predicate
    pub fn count<F: Fn(&Incident) -> bool>(&self, f: F) -> usize {
        self.incidents.iter().filter(|i| f(i)).count()
    }
}
