//! Availability windows and session codes
use super::{Gap, QualityReport};
use crate::{
    epoch::{format_date, second_of_day, start_of_hour},
    prelude::{Duration, Epoch},
};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Hourly session letter, 'A' for 00:00 to 'X' for 23:00
pub fn session_code(second_of_day: f64) -> char {
    let hour = (second_of_day.max(0.0) / 3600.0).floor() as u8;
    (b'A' + hour.min(23)) as char
}

/// Continuous data availability
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct AvailabilityWindow {
    pub valid_from: Epoch,
    pub valid_until: Epoch,
    pub session: char,
}

impl AvailabilityWindow {
    fn new(valid_from: Epoch, valid_until: Epoch) -> Self {
        Self {
            valid_from,
            valid_until,
            session: session_code(second_of_day(valid_from)),
        }
    }
}

/// Splits windows longer than one hour at hour boundaries.
/// Each piece but the last stops one interval before the boundary.
fn split_hourly(from: Epoch, until: Epoch, interval: Duration) -> Vec<AvailabilityWindow> {
    let one_hour = Duration::from_seconds(3600.0);
    if until - from <= one_hour {
        return vec![AvailabilityWindow::new(from, until)];
    }
    let mut windows = Vec::new();
    let mut start = from;
    loop {
        let boundary = start_of_hour(start) + one_hour;
        if boundary < until {
            windows.push(AvailabilityWindow::new(start, boundary - interval));
            start = boundary;
        } else {
            windows.push(AvailabilityWindow::new(start, until));
            break;
        }
    }
    windows
}

/// Windows between `first` and `last`, interrupted by every gap
pub(crate) fn availability_windows(
    first: Epoch,
    last: Epoch,
    gaps: &[Gap],
    interval: Duration,
) -> Vec<AvailabilityWindow> {
    let mut windows = Vec::new();
    let mut from = first;
    for gap in gaps {
        windows.extend(split_hourly(from, gap.begin, interval));
        from = gap.end;
    }
    windows.extend(split_hourly(from, last, interval));
    windows
}

impl QualityReport {
    /// One `DATE;STATION;SECOND_FROM;SECOND_UNTIL;EPOCH_INTERVAL;SESSION_CODE;IS_ONLINE`
    /// line per availability window
    pub fn availability_lines(&self) -> Vec<String> {
        self.windows
            .iter()
            .map(|w| {
                format!(
                    "{};{};{};{};{};{};1",
                    format_date(w.valid_from),
                    self.station,
                    second_of_day(w.valid_from).floor() as u32,
                    second_of_day(w.valid_until).floor() as u32,
                    self.interval,
                    w.session,
                )
            })
            .collect()
    }
    /// Availability block, one window per line
    pub fn availability(&self) -> String {
        self.availability_lines().join("\n")
    }
}
