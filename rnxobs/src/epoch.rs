//! Timestamp codec: epoch markers, header dates and time of day helpers.
//! Timestamps are naive calendar times (no leap second correction),
//! interpreted in the system the file declares.
use hifitime::Epoch;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParsingError {
    #[error("timestamp is too short")]
    FormatError,
    #[error("failed to parse year from \"{0}\"")]
    YearField(String),
    #[error("failed to parse month from \"{0}\"")]
    MonthField(String),
    #[error("failed to parse day from \"{0}\"")]
    DayField(String),
    #[error("failed to parse hours from \"{0}\"")]
    HoursField(String),
    #[error("failed to parse minutes from \"{0}\"")]
    MinutesField(String),
    #[error("failed to parse seconds from \"{0}\"")]
    SecondsField(String),
    #[error("{0:04}-{1:02}-{2:02} is not a valid date")]
    InvalidDate(i32, u8, u8),
}

/// Calendar fields of a timestamp, as they appear in a RINEX file.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EpochFields {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// Seconds, including fraction
    pub second: f64,
}

impl From<Epoch> for EpochFields {
    fn from(epoch: Epoch) -> Self {
        let (year, month, day, hour, minute, s, ns) = epoch.to_gregorian_utc();
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second: s as f64 + ns as f64 * 1.0E-9,
        }
    }
}

const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        },
        _ => 0,
    }
}

/// Expands a two digit year: 80..99 are 19xx, 00..79 are 20xx.
pub fn expand_year(year: i32) -> i32 {
    if year < 80 {
        year + 2000
    } else if year < 100 {
        year + 1900
    } else {
        year
    }
}

/// Parses the date of an epoch marker.
/// RINEX3 markers start with '>' and carry a 4 digit year,
/// RINEX2 markers carry a 2 digit year.
pub fn parse_epoch_marker(line: &str) -> Result<EpochFields, ParsingError> {
    let (datetime, v3) = if line.starts_with('>') {
        (line.get(1..29).ok_or(ParsingError::FormatError)?, true)
    } else {
        (line.get(0..26).ok_or(ParsingError::FormatError)?, false)
    };

    let items = datetime.split_ascii_whitespace().collect::<Vec<_>>();
    if items.len() != 6 {
        return Err(ParsingError::FormatError);
    }

    let mut year = items[0]
        .parse::<i32>()
        .map_err(|_| ParsingError::YearField(items[0].to_string()))?;
    if !v3 {
        year = expand_year(year);
    }
    let month = items[1]
        .parse::<u8>()
        .map_err(|_| ParsingError::MonthField(items[1].to_string()))?;
    let day = items[2]
        .parse::<u8>()
        .map_err(|_| ParsingError::DayField(items[2].to_string()))?;
    let hour = items[3]
        .parse::<u8>()
        .map_err(|_| ParsingError::HoursField(items[3].to_string()))?;
    let minute = items[4]
        .parse::<u8>()
        .map_err(|_| ParsingError::MinutesField(items[4].to_string()))?;
    let second = items[5]
        .parse::<f64>()
        .map_err(|_| ParsingError::SecondsField(items[5].to_string()))?;

    Ok(EpochFields {
        year,
        month,
        day,
        hour,
        minute,
        second,
    })
}

/// Parses a header date like "  2025     3    16     0     0    0.0000000     GPS".
pub fn parse_header_time(content: &str) -> Result<EpochFields, ParsingError> {
    let items = content.split_ascii_whitespace().collect::<Vec<_>>();
    if items.len() < 6 {
        return Err(ParsingError::FormatError);
    }
    let year = items[0]
        .parse::<i32>()
        .map_err(|_| ParsingError::YearField(items[0].to_string()))?;
    let month = items[1]
        .parse::<u8>()
        .map_err(|_| ParsingError::MonthField(items[1].to_string()))?;
    let day = items[2]
        .parse::<u8>()
        .map_err(|_| ParsingError::DayField(items[2].to_string()))?;
    let hour = items[3]
        .parse::<u8>()
        .map_err(|_| ParsingError::HoursField(items[3].to_string()))?;
    let minute = items[4]
        .parse::<u8>()
        .map_err(|_| ParsingError::MinutesField(items[4].to_string()))?;
    let second = items[5]
        .parse::<f64>()
        .map_err(|_| ParsingError::SecondsField(items[5].to_string()))?;
    Ok(EpochFields {
        year: expand_year(year),
        month,
        day,
        hour,
        minute,
        second,
    })
}

/// Builds an absolute timestamp, rejecting any out of range field.
pub fn to_absolute_time(fields: &EpochFields) -> Result<Epoch, ParsingError> {
    if !(1..=12).contains(&fields.month) {
        return Err(ParsingError::MonthField(fields.month.to_string()));
    }
    if fields.day == 0 || fields.day > days_in_month(fields.year, fields.month) {
        return Err(ParsingError::InvalidDate(
            fields.year,
            fields.month,
            fields.day,
        ));
    }
    if fields.hour > 23 {
        return Err(ParsingError::HoursField(fields.hour.to_string()));
    }
    if fields.minute > 59 {
        return Err(ParsingError::MinutesField(fields.minute.to_string()));
    }
    if !(0.0..61.0).contains(&fields.second) {
        return Err(ParsingError::SecondsField(fields.second.to_string()));
    }

    let mut secs = fields.second.trunc() as u8;
    let mut nanos = ((fields.second - fields.second.trunc()) * 1.0E9).round() as u32;
    if nanos >= 1_000_000_000 {
        secs += 1;
        nanos = 0;
    }

    Epoch::maybe_from_gregorian_utc(
        fields.year,
        fields.month,
        fields.day,
        fields.hour,
        fields.minute,
        secs,
        nanos,
    )
    .map_err(|_| ParsingError::SecondsField(fields.second.to_string()))
}

/// Formats the date section of a RINEX3 epoch marker, "YYYY MM DD HH MM SS.SSSSSSS"
pub fn format_v3_marker_time(fields: &EpochFields) -> String {
    format!(
        "{:04} {:02} {:02} {:02} {:02}{:11.7}",
        fields.year, fields.month, fields.day, fields.hour, fields.minute, fields.second
    )
}

/// Formats the date section of a RINEX2 epoch marker, " YY MM DD HH MM SS.SSSSSSS"
pub fn format_v2_marker_time(fields: &EpochFields) -> String {
    format!(
        " {:02} {:>2} {:>2} {:>2} {:>2}{:11.7}",
        fields.year.rem_euclid(100),
        fields.month,
        fields.day,
        fields.hour,
        fields.minute,
        fields.second
    )
}

/// Formats a header date (TIME OF FIRST / LAST OBS), without the time system
pub fn format_header_time(fields: &EpochFields) -> String {
    format!(
        "  {:04}    {:02}    {:02}    {:02}    {:02}  {:11.7}",
        fields.year, fields.month, fields.day, fields.hour, fields.minute, fields.second
    )
}

/// Seconds elapsed since midnight
pub fn second_of_day(epoch: Epoch) -> f64 {
    let (_, _, _, h, m, s, ns) = epoch.to_gregorian_utc();
    (h as f64) * 3600.0 + (m as f64) * 60.0 + s as f64 + ns as f64 * 1.0E-9
}

/// Day of year, starting at 1 on January 1st
pub fn day_of_year(epoch: Epoch) -> u32 {
    let (y, m, d, _, _, _, _) = epoch.to_gregorian_utc();
    let mut doy = d as u32;
    for month in 1..m {
        doy += days_in_month(y, month) as u32;
    }
    doy
}

/// Start of the hour `epoch` belongs to
pub fn start_of_hour(epoch: Epoch) -> Epoch {
    let (y, m, d, h, _, _, _) = epoch.to_gregorian_utc();
    Epoch::from_gregorian_utc_hms(y, m, d, h, 0, 0)
}

/// "YYYY-MM-DD"
pub fn format_date(epoch: Epoch) -> String {
    let (y, m, d, _, _, _, _) = epoch.to_gregorian_utc();
    format!("{:04}-{:02}-{:02}", y, m, d)
}

/// "HH:MM:SS"
pub fn format_time(epoch: Epoch) -> String {
    let (_, _, _, h, m, s, _) = epoch.to_gregorian_utc();
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// "YYYY-MM-DD HH:MM:SS"
pub fn format_datetime(epoch: Epoch) -> String {
    format!("{} {}", format_date(epoch), format_time(epoch))
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn v3_marker_parsing() {
        let fields = parse_epoch_marker("> 2025 03 16 00 00  0.0000000  0 12").unwrap();
        assert_eq!(
            fields,
            EpochFields {
                year: 2025,
                month: 3,
                day: 16,
                hour: 0,
                minute: 0,
                second: 0.0,
            }
        );
        let fields = parse_epoch_marker("> 2021 12 21 23 59 30.5000000  0  8").unwrap();
        assert_eq!(fields.second, 30.5);
        let epoch = to_absolute_time(&fields).unwrap();
        assert_eq!(
            epoch,
            Epoch::from_gregorian_utc(2021, 12, 21, 23, 59, 30, 500_000_000)
        );
    }
    #[test]
    fn v2_marker_parsing() {
        for (line, year) in [
            (" 18  9 11  0  0  0.0000000  0 14G01G03", 2018),
            (" 99  9 11  0  0  0.0000000  0 14G01G03", 1999),
            (" 79  9 11  0  0  0.0000000  0 14G01G03", 2079),
            (" 80  9 11  0  0  0.0000000  0 14G01G03", 1980),
        ] {
            let fields = parse_epoch_marker(line).unwrap();
            assert_eq!(fields.year, year, "{}", line);
            assert_eq!(fields.month, 9);
            assert_eq!(fields.day, 11);
        }
    }
    #[test]
    fn invalid_markers() {
        assert_eq!(
            parse_epoch_marker("> 2025 03"),
            Err(ParsingError::FormatError)
        );
        assert!(matches!(
            parse_epoch_marker("> 2025 AB 16 00 00  0.0000000  0 12"),
            Err(ParsingError::MonthField(_))
        ));
        for fields in [
            EpochFields {
                year: 2025,
                month: 13,
                day: 1,
                hour: 0,
                minute: 0,
                second: 0.0,
            },
            EpochFields {
                year: 2025,
                month: 2,
                day: 29,
                hour: 0,
                minute: 0,
                second: 0.0,
            },
            EpochFields {
                year: 2025,
                month: 2,
                day: 1,
                hour: 24,
                minute: 0,
                second: 0.0,
            },
            EpochFields {
                year: 2025,
                month: 2,
                day: 1,
                hour: 0,
                minute: 60,
                second: 0.0,
            },
            EpochFields {
                year: 2025,
                month: 2,
                day: 1,
                hour: 0,
                minute: 0,
                second: 61.0,
            },
        ] {
            assert!(to_absolute_time(&fields).is_err(), "{:?}", fields);
        }
        let leap_day = EpochFields {
            year: 2024,
            month: 2,
            day: 29,
            hour: 0,
            minute: 0,
            second: 0.0,
        };
        assert!(to_absolute_time(&leap_day).is_ok());
    }
    #[test]
    fn marker_formatting() {
        let fields = EpochFields::from(Epoch::from_gregorian_utc(2018, 9, 11, 0, 0, 30, 0));
        assert_eq!(format_v3_marker_time(&fields), "2018 09 11 00 00 30.0000000");
        assert_eq!(format_v2_marker_time(&fields), " 18  9 11  0  0 30.0000000");
        assert_eq!(
            format_header_time(&fields),
            "  2018    09    11    00    00   30.0000000"
        );
    }
    #[test]
    fn header_time_parsing() {
        let fields =
            parse_header_time("  2025     3    16     0     0    0.0000000     GPS").unwrap();
        assert_eq!(fields.year, 2025);
        assert_eq!(fields.month, 3);
        assert_eq!(fields.day, 16);
    }
    #[test]
    fn calendar_helpers() {
        let t = Epoch::from_gregorian_utc(2025, 3, 16, 13, 20, 30, 0);
        assert_eq!(day_of_year(t), 75);
        assert_eq!(second_of_day(t), 48030.0);
        assert_eq!(format_datetime(t), "2025-03-16 13:20:30");
        assert_eq!(start_of_hour(t), Epoch::from_gregorian_utc_hms(2025, 3, 16, 13, 0, 0));
        assert_eq!(day_of_year(Epoch::from_gregorian_utc_at_midnight(2024, 12, 31)), 366);
    }
}
