//! Filter designer
use thiserror::Error;

mod token;
pub use token::MaskToken;

pub mod masking;
pub use masking::{MaskFilter, MaskOperand, Masking};

pub mod resampling;
pub use resampling::{DecimationFilter, Resampling, ResamplingFilter, ResamplingOps};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid mask operand")]
    InvalidOperand,
    #[error("invalid mask description")]
    InvalidMask,
    #[error("invalid epoch description")]
    InvalidEpoch,
    #[error("invalid duration description")]
    InvalidDuration,
    #[error("invalid constellation description")]
    InvalidConstellation,
    #[error("invalid satellite description")]
    InvalidSatellite,
    #[error("invalid filter description")]
    InvalidFilter,
    #[error("invalid decimation ratio")]
    InvalidDecimationRatio,
}

/// Supported Filter types
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Mask filter to retain or discard data subsets
    Mask(MaskFilter),
    /// Resampling filter to resample entire datasets or subsets
    Resampling(ResamplingFilter),
}

impl std::str::FromStr for Filter {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(content) = s.strip_prefix("d:") {
            let filter = ResamplingFilter::parse_decimation(content)?;
            Ok(Self::Resampling(filter))
        } else if let Some(content) = s.strip_prefix("m:") {
            let filter = MaskFilter::from_str(content)?;
            Ok(Self::Mask(filter))
        } else if s.is_empty() {
            Err(Error::InvalidFilter)
        } else {
            // mask prefix is optional
            let filter = MaskFilter::from_str(s)?;
            Ok(Self::Mask(filter))
        }
    }
}

impl From<MaskFilter> for Filter {
    fn from(mask: MaskFilter) -> Self {
        Self::Mask(mask)
    }
}

impl From<DecimationFilter> for Filter {
    fn from(decim: DecimationFilter) -> Self {
        Self::Resampling(ResamplingFilter {
            mask: None,
            ops: ResamplingOps::Decimation(decim),
        })
    }
}

/// Data sets that can be reworked by any [Filter].
pub trait Preprocessing: Masking + Resampling {
    /// Apply [Filter] to self returning a new Self.
    fn filter(&self, f: &Filter) -> Self
    where
        Self: Sized;
    /// Apply [Filter] to mutable self, reworking self in place.
    fn filter_mut(&mut self, f: &Filter) {
        match f {
            Filter::Mask(m) => self.mask_mut(m),
            Filter::Resampling(r) => self.resample_mut(r),
        }
    }
}
