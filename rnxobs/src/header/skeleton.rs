//! Skeleton headers: station metadata templates merged into converted files.
use std::path::Path;

use super::{
    parsing::{field, parse_triplet, split_label},
    Antenna, Receiver,
};
use crate::error::Error;

/// Station metadata extracted from a skeleton file.
/// Only allow-listed labels are retained: everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    pub marker_name: Option<String>,
    pub marker_number: Option<String>,
    pub marker_type: Option<String>,
    pub observer_agency: Option<(String, String)>,
    pub receiver: Option<Receiver>,
    pub antenna: Option<Antenna>,
    pub approx_position: Option<(f64, f64, f64)>,
    pub antenna_delta: Option<(f64, f64, f64)>,
    pub comments: Vec<String>,
    /// From a `CountryCode=` comment
    pub country: Option<String>,
}

impl std::str::FromStr for Skeleton {
    type Err = Error;
    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let mut skeleton = Self::default();
        for line in content.lines() {
            let (content, label) = split_label(line);
            if label.contains("END OF HEADER") {
                break;
            }
            if label.contains("COMMENT") {
                let comment = content.trim_end();
                if let Some((_, code)) = comment.split_once("CountryCode=") {
                    let code = code.trim().chars().take(3).collect::<String>();
                    if code.len() == 3 {
                        skeleton.country = Some(code.to_uppercase());
                    }
                }
                skeleton.comments.push(comment.to_string());
            } else if label.contains("MARKER NAME") {
                skeleton.marker_name = Some(content.trim().to_string());
            } else if label.contains("MARKER NUMBER") {
                skeleton.marker_number = Some(content.trim().to_string());
            } else if label.contains("MARKER TYPE") {
                skeleton.marker_type = Some(content.trim().to_string());
            } else if label.contains("OBSERVER / AGENCY") {
                skeleton.observer_agency =
                    Some((field(content, 0, 20), field(content, 20, 60)));
            } else if label.contains("REC # / TYPE / VERS") {
                skeleton.receiver = Some(Receiver {
                    sn: field(content, 0, 20),
                    model: field(content, 20, 40),
                    firmware: field(content, 40, 60),
                });
            } else if label.contains("ANT # / TYPE") {
                skeleton.antenna = Some(Antenna {
                    sn: field(content, 0, 20),
                    model: field(content, 20, 40),
                });
            } else if label.contains("APPROX POSITION XYZ") {
                skeleton.approx_position = parse_triplet(content);
            } else if label.contains("ANTENNA: DELTA H/E/N") {
                skeleton.antenna_delta = parse_triplet(content);
            }
        }
        Ok(skeleton)
    }
}

impl Skeleton {
    /// Loads a skeleton file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }
}

#[cfg(test)]
mod test {
    use super::Skeleton;
    use crate::header::Header;
    use std::str::FromStr;
    #[test]
    fn skeleton_merge() {
        let skeleton = Skeleton::from_str(
            "AGOC                                                        MARKER NAME
12345M001                                                   MARKER NUMBER
CountryCode=svk                                             COMMENT
OPERATOR            GEODETIC AGENCY                         OBSERVER / AGENCY
3001234             SEPT POLARX5        5.5.0               REC # / TYPE / VERS
                                                            END OF HEADER
AGOC2                                                       MARKER NAME
",
        )
        .unwrap();
        assert_eq!(skeleton.marker_name.as_deref(), Some("AGOC"));
        assert_eq!(skeleton.country.as_deref(), Some("SVK"));
        assert!(skeleton.antenna.is_none());

        let mut header = Header::default();
        header.marker_name = "UNKNOWN".to_string();
        header.comments.push("converted".to_string());
        header.approx_position = Some((1.0, 2.0, 3.0));
        header.merge_skeleton(&skeleton);

        assert_eq!(header.marker_name, "AGOC");
        assert_eq!(header.marker_number.as_deref(), Some("12345M001"));
        assert_eq!(header.observer, "OPERATOR");
        assert_eq!(header.agency, "GEODETIC AGENCY");
        assert_eq!(
            header.receiver.as_ref().map(|rcvr| rcvr.model.as_str()),
            Some("SEPT POLARX5")
        );
        assert_eq!(header.comments, vec!["converted", "CountryCode=svk"]);
        // untouched fields
        assert_eq!(header.approx_position, Some((1.0, 2.0, 3.0)));
        assert!(header.antenna.is_none());
        assert_eq!(header.country.as_deref(), Some("SVK"));
    }
}
