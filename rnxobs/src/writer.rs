//! Buffered RINEX production, with optional .gz compression
#[cfg(feature = "flate2")]
use flate2::{write::GzEncoder, Compression};
use std::io::{BufWriter, Write};

use crate::error::Error;

/// Default gzip compression level
#[cfg(feature = "flate2")]
pub const GZIP_LEVEL: u32 = 6;

#[derive(Debug)]
pub enum RinexWriter<W: Write> {
    /// Readable RINEX
    Plain(BufWriter<W>),
    /// Gzip compressed RINEX
    #[cfg(feature = "flate2")]
    Gzip(BufWriter<GzEncoder<W>>),
}

impl<W: Write> RinexWriter<W> {
    pub fn new(w: W) -> Self {
        Self::Plain(BufWriter::new(w))
    }
    /// Creates a writer that gzip compresses on the fly
    #[cfg(feature = "flate2")]
    #[cfg_attr(docrs, doc(cfg(feature = "flate2")))]
    pub fn new_gzip(w: W, compression_lvl: u32) -> Self {
        Self::Gzip(BufWriter::new(GzEncoder::new(
            w,
            Compression::new(compression_lvl),
        )))
    }
    /// Flushes everything and terminates the gzip stream, if any.
    /// Returns the underlying writer.
    pub fn finish(self) -> Result<W, Error> {
        match self {
            Self::Plain(writer) => writer.into_inner().map_err(|e| Error::IoError(e.into_error())),
            #[cfg(feature = "flate2")]
            Self::Gzip(writer) => {
                let encoder = writer
                    .into_inner()
                    .map_err(|e| Error::IoError(e.into_error()))?;
                Ok(encoder.finish()?)
            },
        }
    }
}

impl<W: Write> Write for RinexWriter<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, std::io::Error> {
        match self {
            Self::Plain(ref mut writer) => writer.write(buf),
            #[cfg(feature = "flate2")]
            Self::Gzip(ref mut writer) => writer.write(buf),
        }
    }
    fn flush(&mut self) -> Result<(), std::io::Error> {
        match self {
            Self::Plain(ref mut writer) => writer.flush(),
            #[cfg(feature = "flate2")]
            Self::Gzip(ref mut writer) => writer.flush(),
        }
    }
}
