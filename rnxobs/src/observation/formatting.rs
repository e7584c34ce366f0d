//! Observation record encoding
use itertools::Itertools;

use super::parsing::{V2_GROUPS_PER_LINE, V2_SV_PER_LINE};
use super::{EpochEntry, ObservationData, Observable, SvObservations};
use crate::{
    epoch::{format_v2_marker_time, format_v3_marker_time, EpochFields},
    error::Error,
    header::Header,
};

/// Formats one observation group, blank when absent.
/// Phase observations that only carry an SSI get an explicit "0" LLI.
fn format_group(code: &Observable, data: Option<&ObservationData>) -> String {
    let Some(data) = data else {
        return " ".repeat(16);
    };
    let mut group = format!("{:14.3}", data.value);
    match (data.lli, data.snr) {
        (Some(lli), _) => group.push_str(&lli.bits().to_string()),
        (None, Some(_)) if code.is_phase() => group.push('0'),
        _ => group.push(' '),
    }
    match data.snr {
        Some(snr) => group.push_str(&format!("{:x}", snr)),
        None => group.push(' '),
    }
    group
}

/// Satellites that have declared codes, in system priority order.
/// Input order is preserved within a system.
fn encodable_satellites<'a>(header: &Header, entry: &'a EpochEntry) -> Vec<&'a SvObservations> {
    entry
        .satellites
        .iter()
        .filter(|sat| {
            header
                .obs
                .codes_for(&sat.sv)
                .map(|codes| !codes.is_empty())
                .unwrap_or(false)
        })
        .sorted_by_key(|sat| sat.sv.system.rank())
        .collect()
}

/// Encodes one epoch in RINEX3 format. Verbatim text is emitted when retained.
pub(crate) fn encode_v3_epoch(header: &Header, entry: &EpochEntry) -> String {
    if let Some(raw) = &entry.raw {
        return raw.clone();
    }

    let satellites = encodable_satellites(header, entry);
    let fields = EpochFields::from(entry.epoch);

    let mut lines = format!(
        "> {}  {}{:3}",
        format_v3_marker_time(&fields),
        entry.flag,
        satellites.len()
    );
    if let Some(clock_offset) = entry.clock_offset {
        lines.push_str(&format!("{:6}{:12.9}", "", clock_offset));
    }
    lines.push('\n');

    for sat in satellites {
        let mut line = sat.sv.to_string();
        let codes = header.obs.codes_for(&sat.sv).unwrap_or(&[]);
        for code in codes {
            line.push_str(&format_group(code, sat.observations.get(code)));
        }
        lines.push_str(line.trim_end());
        lines.push('\n');
    }
    lines
}

/// Encodes one epoch in RINEX2 format, using the single (flattened) code list
pub(crate) fn encode_v2_epoch(header: &Header, entry: &EpochEntry) -> Result<String, Error> {
    let codes = header.obs.flattened();
    if let Some(code) = codes.iter().find(|code| !code.is_v2()) {
        return Err(Error::UnsupportedConversion(format!("observable {}", code)));
    }

    let satellites = encodable_satellites(header, entry);
    let fields = EpochFields::from(entry.epoch);

    let ids = satellites
        .iter()
        .map(|sat| sat.sv.to_string())
        .collect::<Vec<_>>();

    let mut lines = format!(
        "{}  {}{:3}",
        format_v2_marker_time(&fields),
        entry.flag,
        satellites.len()
    );

    let head = ids.iter().take(V2_SV_PER_LINE).join("");
    lines.push_str(&head);
    if let Some(clock_offset) = entry.clock_offset {
        let padding = 3 * V2_SV_PER_LINE - head.len();
        lines.push_str(&format!("{:padding$}{:12.9}", "", clock_offset, padding = padding));
    }

    let continuations = ids.iter().skip(V2_SV_PER_LINE).chunks(V2_SV_PER_LINE);
    for chunk in &continuations {
        lines.push('\n');
        lines.push_str(&format!("{:32}{}", "", chunk.map(|id| id.as_str()).collect::<String>()));
    }
    lines.push('\n');

    for sat in satellites {
        for line_codes in codes.chunks(V2_GROUPS_PER_LINE) {
            let line = line_codes
                .iter()
                .map(|code| format_group(code, sat.observations.get(code)))
                .join("");
            lines.push_str(line.trim_end());
            lines.push('\n');
        }
    }
    Ok(lines)
}
