#[cfg(test)]
mod test {
    use crate::{
        prelude::*,
        tests::toolkit::{agoc_v3_path, graz_v2_path, test_resource},
    };
    #[test]
    fn long_filename_from_v3() {
        let path = agoc_v3_path();
        let attrs = ProductionAttributes::from_filename(&path).unwrap();
        assert_eq!(attrs.station, "AGOC");
        assert_eq!(attrs.country.as_deref(), Some("SVK"));
        assert_eq!(attrs.source, Some(DataSource::Stream));

        let rinex = Rinex::from_file(&path).unwrap();
        assert_eq!(
            rinex.long_filename(None, Some(&attrs)).unwrap(),
            "AGOC00SVK_S_20250750000_01H_30S_MO.rnx"
        );
        // no hint
        assert_eq!(
            rinex.long_filename(None, None).unwrap(),
            "AGOC00XXX_S_20250750000_01H_30S_MO.rnx"
        );
        // user input has priority
        assert_eq!(
            rinex.long_filename(Some("aut"), Some(&attrs)).unwrap(),
            "AGOC00AUT_S_20250750000_01H_30S_MO.rnx"
        );
        assert!(rinex.long_filename(Some("AUSTRIA"), None).is_err());
    }
    #[test]
    fn long_filename_from_v2() {
        let path = graz_v2_path();
        let attrs = ProductionAttributes::from_filename(&path).unwrap();
        assert_eq!(attrs.station, "GRAZ");
        assert!(attrs.country.is_none());
        assert!(attrs.source.is_none());

        let mut rinex = Rinex::from_file(&path).unwrap();
        assert_eq!(
            rinex.long_filename(None, Some(&attrs)).unwrap(),
            "GRAZ00XXX_S_20182540000_05M_30S_MO.rnx"
        );

        let skeleton = Skeleton::from_file(test_resource(&["SKEL", "agoc.skl"])).unwrap();
        rinex.header.merge_skeleton(&skeleton);
        // skeleton renames the marker and defines the country
        assert_eq!(
            rinex.long_filename(None, Some(&attrs)).unwrap(),
            "AGOC00SVK_S_20182540000_05M_30S_MO.rnx"
        );
    }
}
