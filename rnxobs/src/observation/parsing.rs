//! Observation record decoding
use std::io::BufRead;
use std::num::ParseFloatError;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::{
    EpochEntry, EpochFlag, LliFlags, ObservationData, Observable, SatId, SvObservations, System,
    SNR,
};
use crate::{
    diagnostics::{Diagnostics, Incident},
    epoch::{parse_epoch_marker, to_absolute_time},
    error::Error,
    header::Header,
    prelude::{Constellation, Epoch},
    reader::LineFeed,
};

/// Width of one observation group: F14.3 value, LLI digit, SSI digit
pub(crate) const GROUP_WIDTH: usize = 16;

/// Observation groups per RINEX2 line
pub(crate) const V2_GROUPS_PER_LINE: usize = 5;

/// Satellite identifiers per RINEX2 marker line
pub(crate) const V2_SV_PER_LINE: usize = 12;

lazy_static! {
    /// Trailing group that does not sit on the 16 column grid:
    /// a bare decimal, possibly followed by its indicators.
    static ref RAGGED_GROUP: Regex =
        Regex::new(r"^\s*(?P<value>-?\d*\.\d{3})(?P<lli>[0-9 ])?(?P<ssi>[0-9 ])?\s*$").unwrap();
}

/// Splits the observation section of a data line into 16 column groups.
/// The last group may be shorter, trailing blanks are not significant.
pub(crate) fn observation_groups(data: &str) -> Vec<&str> {
    let data = data.trim_end();
    let mut groups = Vec::with_capacity(num_integer::div_ceil(data.len(), GROUP_WIDTH));
    let mut offset = 0;
    while offset < data.len() {
        let end = std::cmp::min(offset + GROUP_WIDTH, data.len());
        match data.get(offset..end) {
            Some(group) => groups.push(group),
            None => break,
        }
        offset = end;
    }
    groups
}

/// Parses one group. Blank values are absent slots.
pub(crate) fn parse_group(group: &str) -> Result<Option<ObservationData>, ParseFloatError> {
    let value = group.get(..14).unwrap_or(group);
    if value.trim().is_empty() {
        return Ok(None);
    }
    match f64::from_str(value.trim()) {
        Ok(value) => {
            let mut indicators = group.chars().skip(14);
            let lli = indicators.next().and_then(LliFlags::from_column);
            let snr = indicators.next().and_then(SNR::from_column);
            Ok(Some(ObservationData::new(value, lli, snr)))
        },
        Err(e) => {
            let captures = RAGGED_GROUP.captures(group).ok_or(e)?;
            let value = captures
                .name("value")
                .map(|m| m.as_str().trim())
                .unwrap_or("");
            let value = f64::from_str(value)?;
            let lli = captures
                .name("lli")
                .and_then(|m| m.as_str().chars().next())
                .and_then(LliFlags::from_column);
            let snr = captures
                .name("ssi")
                .and_then(|m| m.as_str().chars().next())
                .and_then(SNR::from_column);
            Ok(Some(ObservationData::new(value, lli, snr)))
        },
    }
}

/// Parses a satellite identifier like "G06", "R 5" or " 12".
/// A blank system letter stands for `default`.
pub(crate) fn parse_satellite_id(id: &str, default: System) -> Option<SatId> {
    let letter = id.chars().next()?;
    let prn = id.get(1..)?.trim().parse::<u8>().ok()?;
    let system = if letter == ' ' {
        default
    } else {
        System::from_letter(letter)?
    };
    Some(SatId::new(system, prn))
}

/// System standing for blank satellite letters
fn default_system(header: &Header) -> System {
    match header.constellation {
        Some(Constellation::Mixed) | None => System::GPS,
        Some(c) => System::from(c),
    }
}

/// Fills `sat` from the groups of one line, starting at declared code `first`.
/// Returns the number of groups that had no declared code.
fn parse_groups(
    groups: &[&str],
    codes: &[Observable],
    first: usize,
    sat: &mut SvObservations,
    malformed: &mut Vec<Observable>,
) -> usize {
    let mut extra = 0;
    for (i, group) in groups.iter().enumerate() {
        let Some(code) = codes.get(first + i) else {
            extra += 1;
            continue;
        };
        match parse_group(group) {
            Ok(Some(data)) => {
                sat.observations.insert(code.clone(), data);
            },
            Ok(None) => {},
            Err(_) => malformed.push(code.clone()),
        }
    }
    extra
}

/// Resolves a satellite identifier and its declared codes,
/// recording an [Incident] when either is missing.
fn resolve_satellite<'h>(
    header: &'h Header,
    id: &str,
    line: usize,
    diag: &mut Diagnostics,
) -> Option<(SatId, &'h [Observable])> {
    let Some(sv) = parse_satellite_id(id, default_system(header)) else {
        diag.record(Incident::UnknownSatellite {
            line,
            id: id.to_string(),
        });
        return None;
    };
    match header.obs.codes_for(&sv) {
        Some(codes) if !codes.is_empty() => Some((sv, codes)),
        _ => {
            diag.record(Incident::UndeclaredSystem { line, sv });
            None
        },
    }
}

/// Parses one RINEX3 satellite line
fn parse_v3_satellite(
    header: &Header,
    content: &str,
    line: usize,
    diag: &mut Diagnostics,
) -> Option<SvObservations> {
    if !content.is_ascii() || content.len() < 3 {
        diag.record(Incident::UnexpectedLine {
            line,
            content: content.to_string(),
        });
        return None;
    }
    let (id, data) = content.split_at(3);
    let (sv, codes) = resolve_satellite(header, id, line, diag)?;

    let groups = observation_groups(data);
    let mut sat = SvObservations::new(sv);
    let mut malformed = Vec::new();
    let extra = parse_groups(&groups, codes, 0, &mut sat, &mut malformed);

    if extra > 0 {
        diag.record(Incident::ExtraObservations {
            line,
            sv,
            declared: codes.len(),
            found: groups.len(),
        });
    }
    if !malformed.is_empty() {
        diag.record(Incident::MalformedObservationLine {
            line,
            sv,
            codes: malformed,
        });
    }
    Some(sat)
}

/// Skips the special records announced by an event flag
fn skip_event_records<R: BufRead, F: Fn(&str) -> bool>(
    epoch: Option<Epoch>,
    flag: EpochFlag,
    count: usize,
    feed: &mut LineFeed<R>,
    stop: F,
) -> Result<(), Error> {
    for _ in 0..count {
        match feed.next_line_unless(&stop)? {
            Some(record) => debug!("{:?} - event {}: \"{}\"", epoch, flag, record.trim_end()),
            None => break,
        }
    }
    Ok(())
}

/// Decodes the next RINEX3 epoch. Returns None once the feed is exhausted.
pub(crate) fn decode_v3_epoch<R: BufRead>(
    header: &Header,
    feed: &mut LineFeed<R>,
    diag: &mut Diagnostics,
) -> Result<Option<EpochEntry>, Error> {
    loop {
        let Some(marker) = feed.next_line()? else {
            return Ok(None);
        };
        if !marker.starts_with('>') {
            if !marker.trim().is_empty() {
                diag.record(Incident::UnexpectedLine {
                    line: feed.line_number(),
                    content: marker,
                });
            }
            continue;
        }

        let malformed = || Error::MalformedTimestamp(marker.clone());

        let fields = parse_epoch_marker(&marker).map_err(|_| malformed())?;
        let epoch = to_absolute_time(&fields).map_err(|_| malformed())?;

        let flag = EpochFlag::from_str(marker.get(31..32).unwrap_or("0")).map_err(|_| malformed())?;

        let num_sat = marker
            .get(32..35)
            .map(|s| s.trim())
            .unwrap_or("")
            .parse::<usize>()
            .map_err(|_| malformed())?;

        if !flag.carries_observations() {
            skip_event_records(Some(epoch), flag, num_sat, feed, |l| l.starts_with('>'))?;
            continue;
        }

        let mut entry = EpochEntry::new(epoch, flag);
        entry.clock_offset = marker
            .get(35..)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok());

        for nth in 0..num_sat {
            let Some(content) = feed.next_line_unless(|l| l.starts_with('>'))? else {
                diag.record(Incident::TruncatedEpoch {
                    epoch,
                    expected: num_sat,
                    found: nth,
                });
                break;
            };
            if let Some(sat) = parse_v3_satellite(header, &content, feed.line_number(), diag) {
                entry.satellites.push(sat);
            }
        }
        return Ok(Some(entry));
    }
}

/// Collects the satellite identifiers of a RINEX2 marker (or continuation) line
fn collect_v2_ids(content: &str, ids: &mut Vec<String>, num_sat: usize) {
    for i in 0..V2_SV_PER_LINE {
        if ids.len() == num_sat {
            return;
        }
        let start = 32 + 3 * i;
        match content.get(start..start + 3) {
            Some(id) => ids.push(id.to_string()),
            None => return,
        }
    }
}

/// Decodes the next RINEX2 epoch. Returns None once the feed is exhausted.
pub(crate) fn decode_v2_epoch<R: BufRead>(
    header: &Header,
    feed: &mut LineFeed<R>,
    diag: &mut Diagnostics,
) -> Result<Option<EpochEntry>, Error> {
    // every satellite spans the same number of lines
    let num_codes = header.obs.flattened().len();
    let lines_per_sat = std::cmp::max(num_integer::div_ceil(num_codes, V2_GROUPS_PER_LINE), 1);

    loop {
        let Some(marker) = feed.next_line()? else {
            return Ok(None);
        };
        if marker.trim().is_empty() {
            continue;
        }

        let flag = marker
            .get(26..29)
            .and_then(|s| EpochFlag::from_str(s).ok());
        let num_sat = marker
            .get(29..32)
            .and_then(|s| s.trim().parse::<usize>().ok());

        let (Some(flag), Some(num_sat)) = (flag, num_sat) else {
            diag.record(Incident::UnexpectedLine {
                line: feed.line_number(),
                content: marker,
            });
            continue;
        };

        if !flag.carries_observations() {
            // date may be blank on event records
            let epoch = parse_epoch_marker(&marker)
                .ok()
                .and_then(|fields| to_absolute_time(&fields).ok());
            skip_event_records(epoch, flag, num_sat, feed, |_| false)?;
            continue;
        }

        let fields =
            parse_epoch_marker(&marker).map_err(|_| Error::MalformedTimestamp(marker.clone()))?;
        let epoch =
            to_absolute_time(&fields).map_err(|_| Error::MalformedTimestamp(marker.clone()))?;

        let mut entry = EpochEntry::new(epoch, flag);
        entry.clock_offset = marker
            .get(68..)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok());

        let mut ids = Vec::with_capacity(num_sat);
        collect_v2_ids(&marker, &mut ids, num_sat);

        while ids.len() < num_sat {
            let Some(content) = feed.next_line()? else {
                diag.record(Incident::TruncatedEpoch {
                    epoch,
                    expected: num_sat,
                    found: 0,
                });
                return Ok(Some(entry));
            };
            let before = ids.len();
            collect_v2_ids(&content, &mut ids, num_sat);
            if ids.len() == before {
                // continuation line without identifiers
                diag.record(Incident::UnexpectedLine {
                    line: feed.line_number(),
                    content,
                });
                break;
            }
        }

        'satellites: for (nth, id) in ids.iter().enumerate() {
            let mut lines = Vec::with_capacity(lines_per_sat);
            for _ in 0..lines_per_sat {
                match feed.next_line()? {
                    Some(content) => lines.push(content),
                    None => {
                        diag.record(Incident::TruncatedEpoch {
                            epoch,
                            expected: num_sat,
                            found: nth,
                        });
                        break 'satellites;
                    },
                }
            }

            let line = feed.line_number() + 1 - lines.len();
            let Some((sv, codes)) = resolve_satellite(header, id, line, diag) else {
                continue;
            };

            let mut sat = SvObservations::new(sv);
            let mut malformed = Vec::new();
            let mut found = 0;
            let mut extra = 0;
            for (i, content) in lines.iter().enumerate() {
                if !content.is_ascii() {
                    diag.record(Incident::UnexpectedLine {
                        line: line + i,
                        content: content.to_string(),
                    });
                    continue;
                }
                let groups = observation_groups(content);
                found += groups.len();
                let (groups, overflow) = if groups.len() > V2_GROUPS_PER_LINE {
                    groups.split_at(V2_GROUPS_PER_LINE)
                } else {
                    (groups.as_slice(), &[][..])
                };
                extra += overflow.len();
                extra += parse_groups(
                    groups,
                    codes,
                    i * V2_GROUPS_PER_LINE,
                    &mut sat,
                    &mut malformed,
                );
            }

            if extra > 0 {
                diag.record(Incident::ExtraObservations {
                    line,
                    sv,
                    declared: codes.len(),
                    found,
                });
            }
            if !malformed.is_empty() {
                diag.record(Incident::MalformedObservationLine {
                    line,
                    sv,
                    codes: malformed,
                });
            }
            entry.satellites.push(sat);
        }
        return Ok(Some(entry));
    }
}
