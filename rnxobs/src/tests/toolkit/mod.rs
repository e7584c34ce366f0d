use std::path::PathBuf;
use std::str::FromStr;

use crate::prelude::*;

/// Path to a test resource, from this crate
pub fn test_resource(parts: &[&str]) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("test_resources");
    for part in parts {
        path.push(part);
    }
    path
}

/// Our hourly RINEX3 test file
pub fn agoc_v3_path() -> PathBuf {
    test_resource(&["OBS", "V3", "AGOC00SVK_S_20250750000_01H_30S_MO.rnx"])
}

/// Our RINEX2 test file
pub fn graz_v2_path() -> PathBuf {
    test_resource(&["OBS", "V2", "graz2540.18o"])
}

pub fn utc(y: i32, m: u8, d: u8, hh: u8, mm: u8, ss: u8) -> Epoch {
    Epoch::from_gregorian_utc_hms(y, m, d, hh, mm, ss)
}

pub fn sv(desc: &str) -> SatId {
    SatId::from_str(desc).unwrap()
}

/*
 * Test: panic if declared codes of given system differ from `expected`
 */
pub fn obsrinex_check_observables(rinex: &Rinex, system: System, expected: &[&str]) {
    let declared = rinex
        .header
        .obs
        .declared(&system)
        .unwrap_or_else(|| panic!("{} has no declared observables", system));
    let declared = declared.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    assert_eq!(declared, expected, "bad {} observables", system);
}

/*
 * Test: panic if any observation uses a code its system does not declare
 */
pub fn obsrinex_check_declared(rinex: &Rinex) {
    for entry in rinex.record.iter() {
        for sat in entry.satellites.iter() {
            let codes = rinex.header.obs.codes_for(&sat.sv).unwrap_or(&[]);
            for code in sat.observations.keys() {
                assert!(
                    codes.contains(code),
                    "{:?} {}: {} is not declared",
                    entry.epoch,
                    sat.sv,
                    code
                );
            }
        }
    }
}

/// Encodes `rinex` into a string
pub fn formatted(rinex: &Rinex, format: Format) -> String {
    let mut buf = Vec::<u8>::new();
    rinex.format(&mut buf, format).unwrap();
    String::from_utf8(buf).unwrap()
}

/// Content following END OF HEADER
pub fn epoch_section(content: &str) -> &str {
    let offset = content
        .find("END OF HEADER\n")
        .expect("missing END OF HEADER");
    &content[offset + "END OF HEADER\n".len()..]
}

/// Header lines carrying given label
pub fn header_lines<'a>(content: &'a str, label: &str) -> Vec<&'a str> {
    content
        .lines()
        .take_while(|l| !l.ends_with("END OF HEADER"))
        .filter(|l| l.get(60..).map(|l| l.trim_end() == label).unwrap_or(false))
        .collect()
}

/// Observation value of given code, at this epoch
pub fn observation(rinex: &Rinex, t: Epoch, sv: SatId, code: &str) -> Option<ObservationData> {
    let code = Observable::from_str(code).unwrap();
    rinex
        .record
        .iter()
        .find(|entry| entry.epoch == t)?
        .satellite(&sv)?
        .observations
        .get(&code)
        .copied()
}
