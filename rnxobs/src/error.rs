use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors: reading or writing stops when one of these is returned.
/// Recoverable anomalies are reported as [crate::diagnostics::Incident]s instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found: \"{0}\"")]
    FileNotFound(PathBuf),
    #[error("i/o error")]
    IoError(#[from] std::io::Error),
    #[error("unsupported RINEX revision \"{0}\"")]
    InvalidVersion(String),
    #[error("not an observation RINEX")]
    NotObservationData,
    #[error("header is not terminated by END OF HEADER")]
    MissingEndOfHeader,
    #[error("malformed epoch timestamp \"{0}\"")]
    MalformedTimestamp(String),
    #[error("invalid observable \"{0}\"")]
    InvalidObservable(String),
    #[error("invalid satellite \"{0}\"")]
    InvalidSatellite(String),
    #[error("invalid header line \"{0}\"")]
    HeaderParsing(String),
    #[error("no epoch survived reading")]
    EmptyEpochSequence,
    #[error("sampling interval is not determined")]
    UndeterminedInterval,
    #[error("can't express {0} in the requested revision")]
    UnsupportedConversion(String),
    #[error("invalid production attribute \"{0}\"")]
    ProductionAttribute(String),
    #[error("gzip compressed data is not supported: enable the flate2 feature")]
    CompressionNotSupported,
}
