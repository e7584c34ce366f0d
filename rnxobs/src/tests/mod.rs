//! integrated tests
pub mod toolkit;

#[cfg(feature = "flate2")]
mod compression;
mod production;
mod qc;
