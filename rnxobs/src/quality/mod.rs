//! Data quality: valid epochs, gaps and availability.
use itertools::Itertools;
use log::debug;

use crate::{
    epoch::day_of_year,
    error::Error,
    observation::{EpochEntry, System},
    prelude::{Constellation, Duration, Epoch},
    production::Period,
    Rinex,
};

mod availability;
mod rinstat;

pub use availability::{session_code, AvailabilityWindow};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One validity condition: enough satellites of `constellation`
/// observing a code starting with `prefix`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidityCriterion {
    pub constellation: Constellation,
    pub prefix: String,
}

impl ValidityCriterion {
    pub fn new(constellation: Constellation, prefix: &str) -> Self {
        Self {
            constellation,
            prefix: prefix.to_string(),
        }
    }
}

/// Quality check options
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct QcOpts {
    /// Gaps up to `gap_size` intervals are "small" ones
    pub gap_size: u32,
    /// Satellites required by each criterion
    pub min_satellites: usize,
    /// Every criterion must be met for an epoch to be valid
    pub validity: Vec<ValidityCriterion>,
    /// Nominal file period. Derived from the file span when None.
    pub period: Option<Period>,
}

impl Default for QcOpts {
    fn default() -> Self {
        Self {
            gap_size: 5,
            min_satellites: 5,
            validity: vec![
                ValidityCriterion::new(Constellation::GPS, "L1"),
                ValidityCriterion::new(Constellation::GPS, "L2"),
            ],
            period: None,
        }
    }
}

impl QcOpts {
    pub fn with_gap_size(&self, gap_size: u32) -> Self {
        let mut s = self.clone();
        s.gap_size = gap_size;
        s
    }
}

/// Interruption between two consecutive valid epochs
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Gap {
    /// Last valid epoch before the gap
    pub begin: Epoch,
    /// First valid epoch after the gap
    pub end: Epoch,
    /// Elapsed intervals, rounded down
    pub epoch_count: u64,
    /// Elapsed seconds, rounded down
    pub duration_seconds: u64,
}

/// Returns the gaps of a series of valid epochs: every step longer than
/// `interval`, once sorted and deduplicated.
pub fn detect_gaps(epochs: &[Epoch], interval: Duration) -> Vec<Gap> {
    let dt = interval.to_seconds();
    if dt <= 0.0 {
        return Vec::new();
    }
    epochs
        .iter()
        .sorted()
        .dedup()
        .tuple_windows()
        .filter_map(|(begin, end)| {
            let delta = (*end - *begin).to_seconds();
            if delta > dt {
                Some(Gap {
                    begin: *begin,
                    end: *end,
                    epoch_count: (delta / dt).floor() as u64,
                    duration_seconds: delta.floor() as u64,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Quality report of one file
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct QualityReport {
    /// Name of the analyzed file
    pub filename: String,
    pub station: String,
    pub first_epoch: Epoch,
    pub last_epoch: Epoch,
    /// Day of year of the first epoch
    pub doy: u32,
    /// Nominal sampling interval, in seconds
    pub interval: u64,
    /// Seconds between first and last epoch
    pub total_seconds: u64,
    pub period: Period,
    pub gap_size: u32,
    pub epochs_max: u64,
    pub epochs_valid: u64,
    pub epochs_missing: u64,
    pub gaps: Vec<Gap>,
    /// Gaps longer than `gap_size` intervals
    pub gaps_more: usize,
    /// Gaps up to `gap_size` intervals
    pub gaps_less: usize,
    pub windows: Vec<AvailabilityWindow>,
}

/// Runs the quality checks on observation files
#[derive(Debug, Clone, Default)]
pub struct QualityAnalyzer {
    opts: QcOpts,
}

impl QualityAnalyzer {
    pub fn new(opts: QcOpts) -> Self {
        Self { opts }
    }
    pub fn opts(&self) -> &QcOpts {
        &self.opts
    }
    /// True if this epoch meets every validity criterion.
    /// A satellite counts once per criterion.
    pub fn is_valid_epoch(&self, entry: &EpochEntry) -> bool {
        self.opts.validity.iter().all(|criterion| {
            let count = entry
                .satellites
                .iter()
                .filter(|sat| sat.sv.system == System::from(criterion.constellation))
                .filter(|sat| {
                    sat.observations.iter().any(|(code, data)| {
                        code.starts_with(&criterion.prefix) && !data.value.is_nan()
                    })
                })
                .count();
            count >= self.opts.min_satellites
        })
    }
    /// Timestamps of the valid epochs, sorted and deduplicated
    pub fn valid_epochs(&self, rinex: &Rinex) -> Vec<Epoch> {
        rinex
            .record
            .iter()
            .filter(|entry| self.is_valid_epoch(entry))
            .map(|entry| entry.epoch)
            .sorted()
            .dedup()
            .collect()
    }
    /// Analyzes `rinex`, read from `filename`
    pub fn analyze(&self, rinex: &Rinex, filename: &str) -> Result<QualityReport, Error> {
        let interval = rinex
            .sampling_interval()
            .ok_or(Error::UndeterminedInterval)?;
        let first_epoch = rinex
            .header
            .first_obs
            .or(rinex.first_epoch())
            .ok_or(Error::EmptyEpochSequence)?;
        let last_epoch = rinex
            .header
            .last_obs
            .or(rinex.last_epoch())
            .ok_or(Error::EmptyEpochSequence)?;

        let interval_s = interval.to_seconds();
        let span = last_epoch - first_epoch;
        let period = self.opts.period.unwrap_or_else(|| Period::nominal(span));

        let valid = self.valid_epochs(rinex);
        let gaps = detect_gaps(&valid, interval);
        let gaps_less = gaps
            .iter()
            .filter(|gap| {
                (gap.end - gap.begin).to_seconds() <= self.opts.gap_size as f64 * interval_s
            })
            .count();
        let gaps_more = gaps.len() - gaps_less;

        let epochs_max = (period.seconds() as f64 / interval_s).floor() as u64;
        let epochs_valid = valid.len() as u64;

        let windows = match (valid.first(), valid.last()) {
            (Some(first), Some(last)) => {
                availability::availability_windows(*first, *last, &gaps, interval)
            },
            _ => Vec::new(),
        };

        debug!(
            "{}: {}/{} valid epochs, {} gaps",
            filename,
            epochs_valid,
            rinex.record.len(),
            gaps.len()
        );

        Ok(QualityReport {
            filename: filename.to_string(),
            station: rinex.header.marker_name.trim().to_string(),
            first_epoch,
            last_epoch,
            doy: day_of_year(first_epoch),
            interval: interval_s.round() as u64,
            total_seconds: span.to_seconds().max(0.0).floor() as u64,
            period,
            gap_size: self.opts.gap_size,
            epochs_max,
            epochs_valid,
            epochs_missing: epochs_max.saturating_sub(epochs_valid),
            gaps_more,
            gaps_less,
            gaps,
            windows,
        })
    }
}
