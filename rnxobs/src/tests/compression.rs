#[cfg(test)]
mod test {
    use crate::{
        prelude::*,
        tests::toolkit::{agoc_v3_path, graz_v2_path},
    };
    use std::path::PathBuf;
    fn tmp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rnxobs-{}-{}", std::process::id(), name))
    }
    #[test]
    fn gzip_v3_roundtrip() {
        let reader = Reader::new(ReaderSettings::default().with_passthrough(true));
        let (rinex, _) = reader.read_file(agoc_v3_path()).unwrap();

        let path = tmp_path("AGOC00SVK_S_20250750000_01H_30S_MO.rnx.gz");
        rinex.to_file(&path, Format::V3, true).unwrap();

        let (parsed, diag) = reader.read_file(&path).unwrap();
        assert_eq!(parsed.record.len(), rinex.record.len());
        assert_eq!(parsed.header.obs, rinex.header.obs);
        assert_eq!(diag.len(), 1);
        for (lhs, rhs) in rinex.record.iter().zip(parsed.record.iter()) {
            assert_eq!(lhs.raw, rhs.raw, "{:?}", lhs.epoch);
        }
        let _ = std::fs::remove_file(&path);
    }
    #[test]
    fn gzip_v2_conversion() {
        let mut rinex = Rinex::from_file(graz_v2_path()).unwrap();
        rinex.prune_unused_observables();

        let path = tmp_path("GRAZ00XXX_S_20182540000_05M_30S_MO.rnx.gz");
        rinex.to_file(&path, Format::V3, true).unwrap();

        let parsed = Rinex::from_file(&path).unwrap();
        assert_eq!(parsed.header.version, Version::new(3, 4));
        assert_eq!(parsed.header.marker_name, "GRAZ");
        assert_eq!(parsed.record.len(), 10);
        assert_eq!(parsed.satellites(System::GPS).len(), 10);
        let _ = std::fs::remove_file(&path);
    }
}
