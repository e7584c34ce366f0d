//! Header encoding
use itertools::Itertools;

use super::Header;
use crate::{
    epoch::{format_header_time, EpochFields},
    error::Error,
    fmt_comment, fmt_rinex,
    prelude::Epoch,
    version::Version,
};

/// Codes per `SYS / # / OBS TYPES` line
const V3_CODES_PER_LINE: usize = 13;

/// Codes per `# / TYPES OF OBSERV` line
const V2_CODES_PER_LINE: usize = 9;

fn fmt_obs_time(epoch: Epoch, time_system: &str, label: &str) -> String {
    let fields = EpochFields::from(epoch);
    fmt_rinex(
        &format!("{}{:>8}", format_header_time(&fields), time_system),
        label,
    )
}

impl Header {
    /// Lines shared by both revisions, up to the observation codes
    fn fmt_preamble(&self, version: Version, lines: &mut Vec<String>) {
        let system = self.system_letter();
        lines.push(fmt_rinex(
            &format!(
                "{:>9}{:11}{:<20}{:<20}",
                version.to_string(),
                "",
                "OBSERVATION DATA",
                system
            ),
            "RINEX VERSION / TYPE",
        ));
        lines.push(fmt_rinex(
            &format!("{:<20}{:<20}{:<20}", self.program, self.run_by, self.date),
            "PGM / RUN BY / DATE",
        ));
        for comment in self.comments.iter() {
            lines.push(fmt_comment(comment));
        }
        lines.push(fmt_rinex(&self.marker_name, "MARKER NAME"));
        if let Some(number) = &self.marker_number {
            lines.push(fmt_rinex(number, "MARKER NUMBER"));
        }
        if version.major > 2 {
            if let Some(marker_type) = &self.marker_type {
                lines.push(fmt_rinex(marker_type, "MARKER TYPE"));
            }
        }
        lines.push(fmt_rinex(
            &format!("{:<20}{:<40}", self.observer, self.agency),
            "OBSERVER / AGENCY",
        ));
        if let Some(receiver) = &self.receiver {
            lines.push(fmt_rinex(
                &format!(
                    "{:<20}{:<20}{:<20}",
                    receiver.sn, receiver.model, receiver.firmware
                ),
                "REC # / TYPE / VERS",
            ));
        }
        if let Some(antenna) = &self.antenna {
            lines.push(fmt_rinex(
                &format!("{:<20}{:<20}", antenna.sn, antenna.model),
                "ANT # / TYPE",
            ));
        }
        if let Some((x, y, z)) = self.approx_position {
            lines.push(fmt_rinex(
                &format!("{:14.4}{:14.4}{:14.4}", x, y, z),
                "APPROX POSITION XYZ",
            ));
        }
        if let Some((h, e, n)) = self.antenna_delta {
            lines.push(fmt_rinex(
                &format!("{:14.4}{:14.4}{:14.4}", h, e, n),
                "ANTENNA: DELTA H/E/N",
            ));
        }
    }

    /// Sampling and time frame lines
    fn fmt_time_frame(&self, lines: &mut Vec<String>) {
        if let Some(interval) = self.interval {
            lines.push(fmt_rinex(
                &format!("{:10.3}", interval.to_seconds()),
                "INTERVAL",
            ));
        }
        if let Some(first) = self.first_obs {
            lines.push(fmt_obs_time(first, &self.time_system, "TIME OF FIRST OBS"));
        }
        if let Some(last) = self.last_obs {
            lines.push(fmt_obs_time(last, &self.time_system, "TIME OF LAST OBS"));
        }
    }

    /// Formats self as a RINEX3 header. RINEX2 codes are renamed.
    pub(crate) fn fmt_v3(&self) -> String {
        let version = Version::V3_04;

        let mut lines = Vec::<String>::with_capacity(32);
        self.fmt_preamble(version, &mut lines);

        for system in self.obs.systems() {
            let Some(codes) = self.obs.declared(&system) else {
                continue;
            };
            let codes = codes
                .iter()
                .map(|code| code.to_v3(system))
                .collect::<Vec<_>>();
            let mut content = format!("{}  {:3}", system, codes.len());
            for (nth, code) in codes.iter().enumerate() {
                if nth > 0 && nth % V3_CODES_PER_LINE == 0 {
                    lines.push(fmt_rinex(&content, "SYS / # / OBS TYPES"));
                    content = " ".repeat(6);
                }
                content.push_str(&format!(" {}", code));
            }
            lines.push(fmt_rinex(&content, "SYS / # / OBS TYPES"));
        }

        self.fmt_time_frame(&mut lines);
        lines.extend(self.verbatim.iter().cloned());
        lines.push(fmt_rinex("", "END OF HEADER"));
        lines.join("\n") + "\n"
    }

    /// Formats self as a RINEX2 header
    pub(crate) fn fmt_v2(&self) -> Result<String, Error> {
        let codes = self.obs.flattened();
        if let Some(code) = codes.iter().find(|code| !code.is_v2()) {
            return Err(Error::UnsupportedConversion(format!("observable {}", code)));
        }
        let version = if self.version.major == 2 {
            self.version
        } else {
            Version::V2_11
        };

        let mut lines = Vec::<String>::with_capacity(32);
        self.fmt_preamble(version, &mut lines);

        let chunks = codes.iter().chunks(V2_CODES_PER_LINE);
        for (nth, chunk) in (&chunks).into_iter().enumerate() {
            let mut content = if nth == 0 {
                format!("{:6}", codes.len())
            } else {
                " ".repeat(6)
            };
            for code in chunk {
                content.push_str(&format!("{:>6}", code.to_string()));
            }
            lines.push(fmt_rinex(&content, "# / TYPES OF OBSERV"));
        }

        self.fmt_time_frame(&mut lines);
        lines.push(fmt_rinex("", "END OF HEADER"));
        Ok(lines.join("\n") + "\n")
    }
}
