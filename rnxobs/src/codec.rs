//! Revision specific codecs
use std::io::{BufRead, Write};

use crate::{
    diagnostics::Diagnostics,
    error::Error,
    header::{parsing::decode_header, Header},
    observation::{
        formatting::{encode_v2_epoch, encode_v3_epoch},
        parsing::{decode_v2_epoch, decode_v3_epoch},
        EpochEntry,
    },
    reader::LineFeed,
    version::Version,
};

/// Decodes and encodes one RINEX revision.
pub trait Codec {
    /// Consumes the header section
    fn decode_header<R: BufRead>(&self, feed: &mut LineFeed<R>) -> Result<Header, Error>;
    /// Decodes the next epoch block, None once the feed is exhausted.
    /// Recoverable anomalies are recorded into `diag`.
    fn decode_epoch<R: BufRead>(
        &self,
        header: &Header,
        feed: &mut LineFeed<R>,
        diag: &mut Diagnostics,
    ) -> Result<Option<EpochEntry>, Error>;
    fn encode_header<W: Write>(&self, header: &Header, w: &mut W) -> Result<(), Error>;
    fn encode_epoch<W: Write>(
        &self,
        header: &Header,
        entry: &EpochEntry,
        w: &mut W,
    ) -> Result<(), Error>;
}

/// Supported revisions
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Format {
    V2,
    #[default]
    V3,
}

impl Format {
    /// Picks the codec for this revision
    pub fn from_version(version: &Version) -> Result<Self, Error> {
        Self::from_major(version.major)
    }
    pub fn from_major(major: u8) -> Result<Self, Error> {
        match major {
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            other => Err(Error::InvalidVersion(other.to_string())),
        }
    }
}

impl std::str::FromStr for Format {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let major = s
            .trim()
            .parse::<u8>()
            .map_err(|_| Error::InvalidVersion(s.trim().to_string()))?;
        Self::from_major(major)
    }
}

impl Codec for Format {
    fn decode_header<R: BufRead>(&self, feed: &mut LineFeed<R>) -> Result<Header, Error> {
        let header = decode_header(feed)?;
        if Format::from_version(&header.version)? != *self {
            return Err(Error::InvalidVersion(header.version.to_string()));
        }
        Ok(header)
    }
    fn decode_epoch<R: BufRead>(
        &self,
        header: &Header,
        feed: &mut LineFeed<R>,
        diag: &mut Diagnostics,
    ) -> Result<Option<EpochEntry>, Error> {
        match self {
            Self::V2 => decode_v2_epoch(header, feed, diag),
            Self::V3 => decode_v3_epoch(header, feed, diag),
        }
    }
    fn encode_header<W: Write>(&self, header: &Header, w: &mut W) -> Result<(), Error> {
        let content = match self {
            Self::V2 => header.fmt_v2()?,
            Self::V3 => header.fmt_v3(),
        };
        w.write_all(content.as_bytes())?;
        Ok(())
    }
    fn encode_epoch<W: Write>(
        &self,
        header: &Header,
        entry: &EpochEntry,
        w: &mut W,
    ) -> Result<(), Error> {
        let content = match self {
            Self::V2 => encode_v2_epoch(header, entry)?,
            Self::V3 => encode_v3_epoch(header, entry),
        };
        w.write_all(content.as_bytes())?;
        Ok(())
    }
}
