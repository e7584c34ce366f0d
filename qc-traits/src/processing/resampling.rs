use super::Error;
use crate::processing::MaskFilter;
use hifitime::{Duration, Epoch};
use std::str::FromStr;

/// Supported Decimation Filters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecimationFilter {
    /// Retain one sample out of `r`
    ByRatio(u32),
    /// Retain samples whose time of day is a multiple of this interval
    ByInterval(Duration),
}

impl Default for DecimationFilter {
    fn default() -> Self {
        Self::ByRatio(1)
    }
}

impl std::str::FromStr for DecimationFilter {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(r) = s.parse::<u32>() {
            if r == 0 {
                return Err(Error::InvalidDecimationRatio);
            }
            Ok(Self::ByRatio(r))
        } else {
            let dt = Duration::from_str(s).map_err(|_| Error::InvalidDuration)?;
            Ok(Self::ByInterval(dt))
        }
    }
}

impl DecimationFilter {
    /// Returns true when the `index`-th sample, observed at `t`,
    /// survives this decimation. A null (or negative) interval retains everything.
    pub fn retains(&self, index: usize, t: Epoch) -> bool {
        match self {
            Self::ByRatio(r) => *r <= 1 || index % (*r as usize) == 0,
            Self::ByInterval(dt) => {
                let interval = dt.to_seconds();
                if interval <= 0.0 {
                    return true;
                }
                let (_, _, _, h, m, s, ns) = t.to_gregorian_utc();
                let sod = (h as f64) * 3600.0 + (m as f64) * 60.0 + s as f64 + ns as f64 * 1.0E-9;
                let rem = sod % interval;
                rem.abs() < 1.0E-6 || (interval - rem).abs() < 1.0E-6
            },
        }
    }
}

/// Supported Resampling Operations
#[derive(Debug, Clone, PartialEq)]
pub enum ResamplingOps {
    /// Decimate to reduce data rate
    Decimation(DecimationFilter),
}

/// Resampling Filter to resample entire set or subsets
#[derive(Debug, Clone, PartialEq)]
pub struct ResamplingFilter {
    /// Possible [MaskFilter]
    pub mask: Option<MaskFilter>,
    /// [ResamplingOps] to describe how to resample
    pub ops: ResamplingOps,
}

impl ResamplingFilter {
    pub(crate) fn parse_decimation(s: &str) -> Result<Self, Error> {
        match s.rfind('*') {
            Some(offset) => {
                let mask = MaskFilter::from_str(s[..offset].trim())?;
                let decim = DecimationFilter::from_str(s[offset + 1..].trim())?;
                Ok(Self {
                    mask: Some(mask),
                    ops: ResamplingOps::Decimation(decim),
                })
            },
            None => {
                let decim = DecimationFilter::from_str(s.trim())?;
                Ok(Self {
                    mask: None,
                    ops: ResamplingOps::Decimation(decim),
                })
            },
        }
    }
}

/// Resampling Trait, to resample entire datasets or subsets
pub trait Resampling {
    /// Applies [ResamplingFilter] returning a copied Self.
    fn resample(&self, resamp: &ResamplingFilter) -> Self
    where
        Self: Sized;
    /// Applies [ResamplingFilter] in place with mutable access.
    fn resample_mut(&mut self, resamp: &ResamplingFilter);
}

#[cfg(test)]
mod test {
    use super::DecimationFilter;
    use hifitime::{Duration, Epoch};
    use std::str::FromStr;
    #[test]
    fn decimation_parsing() {
        assert_eq!(
            DecimationFilter::from_str("4"),
            Ok(DecimationFilter::ByRatio(4))
        );
        assert_eq!(
            DecimationFilter::from_str("30 s"),
            Ok(DecimationFilter::ByInterval(Duration::from_seconds(30.0)))
        );
        assert!(DecimationFilter::from_str("0").is_err());
        assert!(DecimationFilter::from_str("often").is_err());
    }
    #[test]
    fn decimation_by_ratio() {
        let t = Epoch::from_gregorian_utc_at_midnight(2025, 3, 16);
        let filter = DecimationFilter::ByRatio(3);
        let kept = (0..10).filter(|i| filter.retains(*i, t)).collect::<Vec<_>>();
        assert_eq!(kept, vec![0, 3, 6, 9]);
    }
    #[test]
    fn decimation_by_interval() {
        let filter = DecimationFilter::ByInterval(Duration::from_seconds(60.0));
        for (h, m, s, retained) in [
            (0, 0, 0, true),
            (0, 0, 30, false),
            (0, 1, 0, true),
            (12, 59, 30, false),
            (23, 59, 0, true),
        ] {
            let t = Epoch::from_gregorian_utc(2025, 3, 16, h, m, s, 0);
            assert_eq!(filter.retains(0, t), retained, "{}", t);
        }
        let everything = DecimationFilter::ByInterval(Duration::ZERO);
        let t = Epoch::from_gregorian_utc(2025, 3, 16, 0, 0, 17, 0);
        assert!(everything.retains(5, t));
    }
}
