#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

pub mod codec;
pub mod diagnostics;
pub mod epoch;
pub mod header;
pub mod observation;
pub mod production;
pub mod quality;
pub mod reader;
pub mod version;
pub mod writer;

mod error;
mod processing;

#[cfg(test)]
mod tests;

use std::{collections::BTreeMap, fs::File, io::Write, path::Path};

use itertools::Itertools;
use log::{info, warn};

use crate::{
    codec::{Codec, Format},
    observation::{Observable, Record},
    writer::RinexWriter,
};

use prelude::*;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        codec::{Codec, Format},
        diagnostics::{Diagnostics, Incident},
        error::Error,
        header::{Header, Skeleton},
        observation::{
            EpochEntry, EpochFlag, LliFlags, ObservationData, Observable, Record, SatId,
            SvObservations, System, SNR,
        },
        production::{DataSource, Period, ProductionAttributes},
        quality::{QcOpts, QualityAnalyzer, QualityReport},
        reader::{Reader, ReaderSettings},
        version::Version,
        Rinex,
    };

    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch};

    /// Filters, shared with the command line
    pub mod processing {
        pub use rnxobs_qc_traits::{
            DecimationFilter, Filter, MaskFilter, MaskOperand, MaskToken, Masking,
            Preprocessing, Resampling, ResamplingFilter,
        };
    }
}

/// Formats one header line: `content` padded to 60 columns, then the label.
/// Longer content is wrapped over several lines.
pub(crate) fn fmt_rinex(content: &str, marker: &str) -> String {
    let chars = content.chars().collect::<Vec<_>>();
    if chars.len() <= 60 {
        format!("{:<padding$}{}", content, marker, padding = 60)
    } else {
        chars
            .chunks(60)
            .map(|chunk| {
                format!(
                    "{:<padding$}{}",
                    chunk.iter().collect::<String>(),
                    marker,
                    padding = 60
                )
            })
            .join("\n")
    }
}

/// Formats a comment
pub(crate) fn fmt_comment(content: &str) -> String {
    fmt_rinex(content, "COMMENT")
}

/// An observation file: [Header] and [Record].
/// ```
/// use rnxobs::prelude::*;
/// let rinex = Rinex::from_file("../test_resources/OBS/V2/graz2540.18o")
///     .unwrap();
/// assert_eq!(rinex.header.version, Version::new(2, 11));
/// assert_eq!(rinex.header.marker_name, "GRAZ");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rinex {
    pub header: Header,
    pub record: Record,
}

impl Rinex {
    /// Builds a new [Rinex] from both sections
    pub fn new(header: Header, record: Record) -> Self {
        Self { header, record }
    }
    /// Reads a file with default [ReaderSettings].
    /// Recoverable incidents are logged, not returned.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let (rinex, _) = Reader::default().read_file(path)?;
        Ok(rinex)
    }
    /// Iterates epochs in file order
    pub fn epochs(&self) -> impl Iterator<Item = Epoch> + '_ {
        self.record.iter().map(|entry| entry.epoch)
    }
    /// Oldest epoch
    pub fn first_epoch(&self) -> Option<Epoch> {
        self.epochs().min()
    }
    /// Most recent epoch
    pub fn last_epoch(&self) -> Option<Epoch> {
        self.epochs().max()
    }
    /// Nominal sampling interval
    pub fn sampling_interval(&self) -> Option<Duration> {
        self.header.interval
    }
    /// Removes the declared codes that were never observed, considering
    /// the current content of the record. Returns what was removed.
    pub fn prune_unused_observables(&mut self) -> BTreeMap<System, Vec<Observable>> {
        self.header.obs.reset_found();
        for entry in self.record.iter() {
            self.header.obs.observe_epoch(entry);
        }
        let removed = self.header.obs.prune_unused();
        for (system, codes) in removed.iter() {
            info!("{}: removed unused {}", system, codes.iter().join(" "));
        }
        for system in self.header.obs.emptied_systems() {
            warn!("{}: no observation left", system);
        }
        if !removed.is_empty() {
            self.record.clear_raw();
        }
        removed
    }
    /// Signal strength observations, per epoch and satellite.
    /// Considers all `S` codes unless a list is given.
    pub fn signal_strength(
        &self,
        codes: Option<&[Observable]>,
    ) -> BTreeMap<Epoch, BTreeMap<SatId, Vec<(Observable, f64)>>> {
        let mut ret = BTreeMap::<Epoch, BTreeMap<SatId, Vec<(Observable, f64)>>>::new();
        for entry in self.record.iter() {
            let per_sv = ret.entry(entry.epoch).or_default();
            for sat in entry.satellites.iter() {
                let values = sat
                    .observations
                    .iter()
                    .filter(|(code, data)| {
                        let selected = match codes {
                            Some(codes) => codes.contains(code),
                            None => code.is_signal_strength(),
                        };
                        selected && !data.value.is_nan()
                    })
                    .map(|(code, data)| (code.clone(), data.value))
                    .collect::<Vec<_>>();
                if !values.is_empty() {
                    per_sv.entry(sat.sv).or_default().extend(values);
                }
            }
        }
        ret
    }
    /// Satellites of given [System] encountered in the record
    pub fn satellites(&self, system: System) -> Vec<SatId> {
        self.record
            .iter()
            .flat_map(|entry| entry.satellites.iter().map(|sat| sat.sv))
            .filter(|sv| sv.system == system)
            .unique()
            .sorted()
            .collect()
    }
    /// Encodes self in the requested revision
    pub fn format<W: Write>(&self, w: &mut W, format: Format) -> Result<(), Error> {
        format.encode_header(&self.header, w)?;
        for entry in self.record.iter() {
            format.encode_epoch(&self.header, entry, w)?;
        }
        Ok(())
    }
    /// Writes self into a file, gzip compressed when `gzip` is set
    pub fn to_file<P: AsRef<Path>>(
        &self,
        path: P,
        format: Format,
        gzip: bool,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        let fd = File::create(path)?;
        let mut writer = if gzip {
            #[cfg(feature = "flate2")]
            {
                RinexWriter::new_gzip(fd, writer::GZIP_LEVEL)
            }
            #[cfg(not(feature = "flate2"))]
            {
                return Err(Error::CompressionNotSupported);
            }
        } else {
            RinexWriter::new(fd)
        };
        self.format(&mut writer, format)?;
        writer.finish()?;
        info!("{} generated", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{fmt_comment, fmt_rinex};
    #[test]
    fn header_line_formatting() {
        let line = fmt_rinex("AGOC", "MARKER NAME");
        assert_eq!(line.find("MARKER NAME"), Some(60));
        assert_eq!(line.len(), 71);

        let comment = fmt_comment("just a basic comment");
        assert_eq!(comment.find("COMMENT"), Some(60));

        let long = "x".repeat(130);
        let wrapped = fmt_comment(&long);
        assert_eq!(wrapped.lines().count(), 3);
        for line in wrapped.lines() {
            assert_eq!(line.find("COMMENT"), Some(60));
        }
    }
}
