//! Traits to rework RINEX observation data sets prior to conversion
//! or quality analysis: masking (retain or discard subsets) and
//! resampling (decimation).

mod processing;
pub use processing::{
    DecimationFilter, Error, Filter, MaskFilter, MaskOperand, MaskToken, Masking,
    Preprocessing, Resampling, ResamplingFilter, ResamplingOps,
};
