#[cfg(test)]
mod test {
    use crate::{
        prelude::*,
        quality::{Gap, ValidityCriterion},
        tests::toolkit::{agoc_v3_path, graz_v2_path, utc},
    };
    #[test]
    fn agoc_quality_report() {
        let rinex = Rinex::from_file(agoc_v3_path()).unwrap();
        let report = QualityAnalyzer::default()
            .analyze(&rinex, "AGOC00SVK_S_20250750000_01H_30S_MO.rnx")
            .unwrap();

        assert_eq!(report.station, "AGOC");
        assert_eq!(report.doy, 75);
        assert_eq!(report.interval, 30);
        assert_eq!(report.total_seconds, 3570);
        assert_eq!(report.period.to_string(), "01H");
        assert_eq!(report.epochs_max, 120);
        // 10 missing epochs, one epoch without enough L2 tracking
        assert_eq!(report.epochs_valid, 109);
        assert_eq!(report.epochs_missing, 11);
        assert_eq!(report.gaps_more, 1);
        assert_eq!(report.gaps_less, 1);
        assert_eq!(
            report.gaps,
            vec![
                Gap {
                    begin: utc(2025, 3, 16, 0, 19, 30),
                    end: utc(2025, 3, 16, 0, 25, 0),
                    epoch_count: 11,
                    duration_seconds: 330,
                },
                Gap {
                    begin: utc(2025, 3, 16, 0, 39, 30),
                    end: utc(2025, 3, 16, 0, 40, 30),
                    epoch_count: 2,
                    duration_seconds: 60,
                },
            ]
        );

        assert_eq!(
            report.rinstat(),
            "+++ >>>   AGOC00SVK_S_20250750000_01H_30S_MO.rnx
--- GAP:  2025-03-16 00:20:00 - 2025-03-16 00:25:00       300.0 s         10 e
--- GAP:  2025-03-16 00:40:00 - 2025-03-16 00:40:30        30.0 s          1 e
+++ RNX.SUM   2025-03-16 (075)   AGOC   00:00:00 - 00:59:30   3570 s   30 s       2
+++    #maxepo #aepoch #mepoch #gaps>5 #gaps<5
+++        120     109      11       1       1
+++ <<<"
        );

        assert_eq!(
            report.availability(),
            "2025-03-16;AGOC;0;1170;30;A;1
2025-03-16;AGOC;1500;2370;30;A;1
2025-03-16;AGOC;2430;3570;30;A;1"
        );
    }
    #[test]
    fn relaxed_validity() {
        let rinex = Rinex::from_file(agoc_v3_path()).unwrap();
        let opts = QcOpts {
            min_satellites: 4,
            ..Default::default()
        };
        let report = QualityAnalyzer::new(opts)
            .analyze(&rinex, "agoc.rnx")
            .unwrap();
        assert_eq!(report.epochs_valid, 110);
        assert_eq!(report.gaps.len(), 1);
        assert_eq!(report.windows.len(), 2);

        // Glonass only tracks 2 vehicles
        let opts = QcOpts {
            validity: vec![ValidityCriterion::new(Constellation::Glonass, "L1")],
            ..Default::default()
        };
        let report = QualityAnalyzer::new(opts)
            .analyze(&rinex, "agoc.rnx")
            .unwrap();
        assert_eq!(report.epochs_valid, 0);
        assert!(report.windows.is_empty());
        assert_eq!(report.epochs_missing, 120);
    }
    #[test]
    fn graz_quality_report() {
        let rinex = Rinex::from_file(graz_v2_path()).unwrap();
        let report = QualityAnalyzer::default()
            .analyze(&rinex, "graz2540.18o")
            .unwrap();
        assert_eq!(report.station, "GRAZ");
        assert_eq!(report.doy, 254);
        assert_eq!(report.total_seconds, 270);
        assert_eq!(report.period.to_string(), "01H");
        assert_eq!(report.epochs_max, 120);
        assert_eq!(report.epochs_valid, 10);
        assert!(report.gaps.is_empty());
        assert_eq!(report.availability(), "2018-09-11;GRAZ;0;270;30;A;1");
    }
}
