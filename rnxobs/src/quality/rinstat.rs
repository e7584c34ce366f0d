//! Rinstat summary block
use super::QualityReport;
use crate::epoch::{format_date, format_datetime, format_time};
use hifitime::Unit;

impl QualityReport {
    /// Formats the rinstat summary block. Gap lines describe the missing
    /// epochs: from one interval after the last valid epoch, to the next one.
    pub fn rinstat(&self) -> String {
        let interval = self.interval as f64;
        let mut lines = Vec::with_capacity(self.gaps.len() + 5);
        lines.push(format!("+++ >>>   {}", self.filename));
        for gap in self.gaps.iter() {
            lines.push(format!(
                "--- GAP:  {} - {}  {:10.1} s {:10} e",
                format_datetime(gap.begin + interval * Unit::Second),
                format_datetime(gap.end),
                gap.duration_seconds as f64 - interval,
                gap.epoch_count.saturating_sub(1),
            ));
        }
        lines.push(format!(
            "+++ RNX.SUM   {} ({:03})   {}   {} - {}   {} s   {} s {:7}",
            format_date(self.first_epoch),
            self.doy,
            self.station,
            format_time(self.first_epoch),
            format_time(self.last_epoch),
            self.total_seconds,
            self.interval,
            self.gaps.len(),
        ));
        lines.push(format!(
            "+++    #maxepo #aepoch #mepoch #gaps>{0} #gaps<{0}",
            self.gap_size
        ));
        lines.push(format!(
            "+++      {:5}   {:5}   {:5}   {:5}   {:5}",
            self.epochs_max, self.epochs_valid, self.epochs_missing, self.gaps_more, self.gaps_less
        ));
        lines.push("+++ <<<".to_string());
        lines.join("\n")
    }
}

#[cfg(test)]
mod test {
    use crate::quality::{test::gapped_rinex, QcOpts, QualityAnalyzer};

    #[test]
    fn rinstat_text() {
        let report = QualityAnalyzer::default()
            .analyze(&gapped_rinex(), "AGOC00XXX_S_20250750000_01H_30S_MO.rnx")
            .unwrap();
        assert_eq!(
            report.rinstat(),
            "+++ >>>   AGOC00XXX_S_20250750000_01H_30S_MO.rnx
--- GAP:  2025-03-16 00:10:30 - 2025-03-16 00:15:00       270.0 s          9 e
--- GAP:  2025-03-16 00:30:30 - 2025-03-16 00:31:00        30.0 s          1 e
+++ RNX.SUM   2025-03-16 (075)   AGOC   00:00:00 - 00:59:30   3570 s   30 s       2
+++    #maxepo #aepoch #mepoch #gaps>5 #gaps<5
+++        120     110      10       1       1
+++ <<<"
        );
    }

    #[test]
    fn gap_size_threshold() {
        let report = QualityAnalyzer::new(QcOpts::default().with_gap_size(10))
            .analyze(&gapped_rinex(), "agoc0750.25o")
            .unwrap();
        assert_eq!(report.gaps_more, 0);
        assert_eq!(report.gaps_less, 2);
        assert!(report
            .rinstat()
            .contains("+++    #maxepo #aepoch #mepoch #gaps>10 #gaps<10"));
    }
}
