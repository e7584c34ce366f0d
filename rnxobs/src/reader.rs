//! Buffered reading, with integrated .gz decompression,
//! and the streaming observation reader.
#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use itertools::{Itertools, MinMaxResult};
use log::{debug, info};

use crate::{
    codec::{Codec, Format},
    diagnostics::{Diagnostics, Incident},
    error::Error,
    header::parsing::parse_version_line,
    observation::{EpochEntry, Record},
    processing::mask_declared,
    prelude::{Duration, Epoch},
    Rinex,
};

use rnxobs_qc_traits::{
    DecimationFilter, Filter, MaskFilter, MaskOperand, MaskToken, Masking, Resampling,
    ResamplingFilter, ResamplingOps,
};

#[derive(Debug)]
pub enum BufferedReader {
    /// Readable RINEX
    Plain(BufReader<File>),
    /// gzip compressed RINEX
    #[cfg(feature = "flate2")]
    Gzip(BufReader<GzDecoder<File>>),
}

impl BufferedReader {
    /// Opens a file, decompressing .gz files on the fly
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let f = File::open(path)?;
        let gzip = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);
        if gzip {
            #[cfg(feature = "flate2")]
            {
                Ok(Self::Gzip(BufReader::new(GzDecoder::new(f))))
            }
            #[cfg(not(feature = "flate2"))]
            {
                Err(Error::CompressionNotSupported)
            }
        } else {
            Ok(Self::Plain(BufReader::new(f)))
        }
    }
}

impl Read for BufferedReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, std::io::Error> {
        match self {
            Self::Plain(ref mut h) => h.read(buf),
            #[cfg(feature = "flate2")]
            Self::Gzip(ref mut h) => h.read(buf),
        }
    }
}

impl BufRead for BufferedReader {
    fn fill_buf(&mut self) -> Result<&[u8], std::io::Error> {
        match self {
            Self::Plain(ref mut bufreader) => bufreader.fill_buf(),
            #[cfg(feature = "flate2")]
            Self::Gzip(ref mut bufreader) => bufreader.fill_buf(),
        }
    }
    fn consume(&mut self, s: usize) {
        match self {
            Self::Plain(ref mut bufreader) => bufreader.consume(s),
            #[cfg(feature = "flate2")]
            Self::Gzip(ref mut bufreader) => bufreader.consume(s),
        }
    }
}

/// Line iterator with one line of look ahead and line numbering.
/// Invalid UTF-8 is replaced, line terminators are stripped.
pub struct LineFeed<R: BufRead> {
    inner: R,
    peeked: Option<String>,
    /// number of the last consumed line
    line: usize,
    /// verbatim copy of the consumed lines, when active
    capture: Option<String>,
}

impl<R: BufRead> LineFeed<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            peeked: None,
            line: 0,
            capture: None,
        }
    }
    fn read_line(&mut self) -> Result<Option<String>, Error> {
        let mut buf = Vec::with_capacity(82);
        if self.inner.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
            buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
    /// Consumes the next line
    pub fn next_line(&mut self) -> Result<Option<String>, Error> {
        let line = match self.peeked.take() {
            Some(line) => Some(line),
            None => self.read_line()?,
        };
        if let Some(line) = &line {
            self.line += 1;
            if let Some(capture) = &mut self.capture {
                capture.push_str(line);
                capture.push('\n');
            }
        }
        Ok(line)
    }
    /// Returns the next line without consuming it
    pub fn peek_line(&mut self) -> Result<Option<&str>, Error> {
        if self.peeked.is_none() {
            self.peeked = self.read_line()?;
        }
        Ok(self.peeked.as_deref())
    }
    /// Consumes the next line, unless it matches `stop` (or the feed is exhausted)
    pub fn next_line_unless<F>(&mut self, stop: F) -> Result<Option<String>, Error>
    where
        F: Fn(&str) -> bool,
    {
        match self.peek_line()? {
            None => return Ok(None),
            Some(line) if stop(line) => return Ok(None),
            Some(_) => {},
        }
        self.next_line()
    }
    /// Number of the last consumed line, starting at 1
    pub fn line_number(&self) -> usize {
        self.line
    }
    pub(crate) fn start_capture(&mut self) {
        self.capture = Some(String::new());
    }
    pub(crate) fn take_capture(&mut self) -> Option<String> {
        self.capture.take()
    }
}

/// Reading options
#[derive(Debug, Clone, Default)]
pub struct ReaderSettings {
    /// Only retain epochs whose time of day is a multiple of this interval
    pub sampling: Option<Duration>,
    /// Filters applied while reading: masks first, then resampling
    pub filters: Vec<Filter>,
    /// Retain the verbatim text of RINEX3 epochs
    pub passthrough: bool,
}

impl ReaderSettings {
    /// Only retain epochs aligned to this interval
    pub fn with_sampling(&self, sampling: Duration) -> Self {
        let mut s = self.clone();
        s.sampling = Some(sampling);
        s
    }
    /// Adds one [Filter]
    pub fn with_filter(&self, filter: Filter) -> Self {
        let mut s = self.clone();
        s.filters.push(filter);
        s
    }
    /// Retains the closed time window `[begin, end]`
    pub fn with_time_window(&self, begin: Option<Epoch>, end: Option<Epoch>) -> Self {
        let mut s = self.clone();
        if let Some(begin) = begin {
            s.filters.push(Filter::Mask(MaskFilter {
                operand: MaskOperand::GreaterEquals,
                token: MaskToken::Epoch(begin),
            }));
        }
        if let Some(end) = end {
            s.filters.push(Filter::Mask(MaskFilter {
                operand: MaskOperand::LowerEquals,
                token: MaskToken::Epoch(end),
            }));
        }
        s
    }
    /// Retains verbatim RINEX3 epochs
    pub fn with_passthrough(&self, passthrough: bool) -> Self {
        let mut s = self.clone();
        s.passthrough = passthrough;
        s
    }
}

/// Streaming observation reader
#[derive(Debug, Clone, Default)]
pub struct Reader {
    settings: ReaderSettings,
}

impl Reader {
    pub fn new(settings: ReaderSettings) -> Self {
        Self { settings }
    }
    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }
    /// Reads a file, possibly gzip compressed
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<(Rinex, Diagnostics), Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let reader = BufferedReader::new(path)?;
        let (rinex, diag) = self.read(reader)?;
        info!(
            "{}: {} epochs, {} incidents",
            path.display(),
            rinex.record.len(),
            diag.len()
        );
        Ok((rinex, diag))
    }
    /// True if this epoch passes live masks. Satellite masks reduce the content,
    /// the epoch itself is retained even once empty.
    fn apply_masks(&self, entry: &mut EpochEntry) -> bool {
        if let Some(sampling) = self.settings.sampling {
            if !DecimationFilter::ByInterval(sampling).retains(0, entry.epoch) {
                return false;
            }
        }
        for filter in self.settings.filters.iter() {
            if let Filter::Mask(mask) = filter {
                match &mask.token {
                    MaskToken::Epoch(t) => {
                        if !mask.operand.compare(&entry.epoch, t) {
                            return false;
                        }
                    },
                    _ => entry.mask_mut(mask),
                }
            }
        }
        true
    }
    /// Reads from any buffered source
    pub fn read<R: BufRead>(&self, reader: R) -> Result<(Rinex, Diagnostics), Error> {
        let mut feed = LineFeed::new(reader);

        let first = feed
            .peek_line()?
            .ok_or(Error::MissingEndOfHeader)?
            .to_string();
        let (version, _) = parse_version_line(&first)?;
        let format = Format::from_version(&version)?;

        let mut header = format.decode_header(&mut feed)?;
        let mut diag = Diagnostics::default();
        let mut record = Record::new();

        let passthrough = self.settings.passthrough && format == Format::V3;

        loop {
            if passthrough {
                feed.start_capture();
            }
            let Some(mut entry) = format.decode_epoch(&header, &mut feed, &mut diag)? else {
                break;
            };
            if passthrough {
                entry.raw = feed.take_capture();
            }
            if self.apply_masks(&mut entry) {
                record.push(entry);
            }
        }

        let mut sampling = self.settings.sampling;
        for filter in self.settings.filters.iter() {
            match filter {
                Filter::Mask(mask) => {
                    if mask_declared(&mut header, mask) {
                        record.clear_raw();
                    }
                },
                Filter::Resampling(resampling) => {
                    record.resample_mut(resampling);
                    if let Some(dt) = resampled_interval(resampling, &record) {
                        if sampling.map(|s| dt > s).unwrap_or(true) {
                            sampling = Some(dt);
                        }
                    }
                },
            }
        }

        if record.is_empty() {
            return Err(Error::EmptyEpochSequence);
        }

        for entry in record.iter() {
            header.obs.observe_epoch(entry);
        }
        for system in header.obs.systems() {
            let declared = header.obs.declared(&system).unwrap_or(&[]);
            let found = header.obs.found(&system);
            let unused = declared
                .iter()
                .filter(|code| !found.map(|f| f.contains(*code)).unwrap_or(false))
                .cloned()
                .collect::<Vec<_>>();
            if !unused.is_empty() {
                diag.record(Incident::ObsTypeMismatch {
                    system,
                    codes: unused,
                });
            }
        }

        update_time_frame(&mut header, &record, sampling);

        debug!(
            "{} ({}): {} epochs",
            header.marker_name,
            header.version,
            record.len()
        );
        Ok((Rinex::new(header, record), diag))
    }
}

/// Most frequent interval between successive epochs. Ties go to the shortest one.
pub(crate) fn dominant_interval(record: &Record) -> Option<Duration> {
    let mut histogram = BTreeMap::<Duration, usize>::new();
    for (lhs, rhs) in record.iter().tuple_windows() {
        let dt = rhs.epoch - lhs.epoch;
        if dt.to_seconds() > 0.0 {
            *histogram.entry(dt).or_default() += 1;
        }
    }
    histogram
        .into_iter()
        .max_by(|(dt_a, n_a), (dt_b, n_b)| n_a.cmp(n_b).then(dt_b.cmp(dt_a)))
        .map(|(dt, _)| dt)
}

/// Sampling interval of `record` once `resampling` was applied.
/// None when the decimation only concerns a subset.
pub(crate) fn resampled_interval(
    resampling: &ResamplingFilter,
    record: &Record,
) -> Option<Duration> {
    if resampling.mask.is_some() {
        return None;
    }
    let ResamplingOps::Decimation(decim) = &resampling.ops;
    match decim {
        DecimationFilter::ByInterval(dt) => Some(*dt),
        DecimationFilter::ByRatio(_) => dominant_interval(record),
    }
}

/// Updates sampling interval and first/last obs to describe `record`.
/// `sampling` only replaces a finer interval.
pub(crate) fn update_time_frame(
    header: &mut crate::header::Header,
    record: &Record,
    sampling: Option<Duration>,
) {
    if header.interval.is_none() {
        header.interval = match (record.iter().next(), record.iter().nth(1)) {
            (Some(first), Some(second)) => {
                Some(second.epoch - first.epoch).filter(|dt| dt.to_seconds() > 0.0)
            },
            _ => None,
        };
    }
    if let Some(sampling) = sampling.filter(|dt| dt.to_seconds() > 0.0) {
        if header.interval.map(|dt| sampling > dt).unwrap_or(true) {
            header.interval = Some(sampling);
        }
    }
    match record.iter().map(|entry| entry.epoch).minmax() {
        MinMaxResult::NoElements => {},
        MinMaxResult::OneElement(t) => {
            header.first_obs = Some(t);
            header.last_obs = Some(t);
        },
        MinMaxResult::MinMax(first, last) => {
            header.first_obs = Some(first);
            header.last_obs = Some(last);
        },
    }
}

