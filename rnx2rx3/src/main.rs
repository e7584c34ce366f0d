//! RINEX2/3 Observation to RINEX3 converter
mod cli;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use env_logger::{Builder, Target};
use log::{error, info, warn};
use thiserror::Error;

use rnxobs::prelude::*;

use cli::Cli;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    RinexError(#[from] rnxobs::prelude::Error),
    #[error("invalid filter: {0}")]
    FilterError(#[from] rnxobs_qc_traits::Error),
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("invalid {0} \"{1}\"")]
    InvalidArgument(&'static str, String),
}

/// Reads the input with all preprocessing applied on the fly
fn read_input(cli: &Cli) -> Result<Rinex, Error> {
    let mut settings = ReaderSettings::default()
        .with_passthrough(cli.passthrough())
        .with_time_window(cli.crop_begin()?, cli.crop_end()?);
    if let Some(sampling) = cli.sampling()? {
        settings = settings.with_sampling(sampling);
    }
    for filter in cli.filters()? {
        settings = settings.with_filter(filter);
    }

    let input = cli.input_path();
    let (rinex, diagnostics) = Reader::new(settings).read_file(&input)?;
    if !diagnostics.is_empty() {
        warn!(
            "{}: {} recoverable incident(s)",
            input.display(),
            diagnostics.len()
        );
    }
    Ok(rinex)
}

/// Runs the quality analysis and emits the requested outputs
fn quality_check(cli: &Cli, rinex: &Rinex) -> Result<(), Error> {
    let mut opts = match cli.qc_cfg() {
        Some(path) => {
            let fd = File::open(&path)?;
            let opts: QcOpts = serde_json::from_reader(BufReader::new(fd))?;
            info!("qc options loaded from {}", path.display());
            opts
        },
        None => QcOpts::default(),
    };
    if let Some(gap_size) = cli.gap_size()? {
        opts = opts.with_gap_size(gap_size);
    }

    let input = cli.input_path();
    let filename = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let report = QualityAnalyzer::new(opts).analyze(rinex, filename)?;

    if cli.rinstat() {
        println!("{}", report.rinstat());
    }
    if cli.availability() {
        println!("{}", report.availability());
    }
    if let Some(path) = cli.json() {
        let fd = File::create(&path)?;
        serde_json::to_writer_pretty(fd, &report)?;
        info!("{} generated", path.display());
    }
    Ok(())
}

/// Resolves the output file path.
/// Bare file names are placed next to the input file.
fn output_path(cli: &Cli, rinex: &Rinex) -> Result<PathBuf, Error> {
    let input = cli.input_path();
    let name = if cli.long_name() {
        let attrs = match ProductionAttributes::from_filename(&input) {
            Ok(attrs) => Some(attrs),
            Err(e) => {
                info!("{}: no production attributes ({})", input.display(), e);
                None
            },
        };
        rinex.long_filename(cli.country().map(|s| s.as_str()), attrs.as_ref())?
    } else {
        cli.output_name().to_string()
    };

    let path = Path::new(&name);
    let mut path = match (path.parent(), input.parent()) {
        (Some(parent), Some(input_dir)) if parent.as_os_str().is_empty() => input_dir.join(path),
        _ => path.to_path_buf(),
    };

    if cli.gzip() && path.extension().map_or(true, |ext| ext != "gz") {
        let mut gzipped = path.into_os_string();
        gzipped.push(".gz");
        path = PathBuf::from(gzipped);
    }
    Ok(path)
}

fn run(cli: &Cli) -> Result<(), Error> {
    let format = cli.format()?;
    let mut rinex = read_input(cli)?;

    if !cli.no_prune() {
        rinex.prune_unused_observables();
    }

    if let Some(path) = cli.skeleton() {
        let skeleton = Skeleton::from_file(&path)?;
        rinex.header.merge_skeleton(&skeleton);
        info!("merged skeleton {}", path.display());
    }

    if cli.quality_check() {
        quality_check(cli, &rinex)?;
    }

    if cli.quiet() {
        return Ok(());
    }

    let path = output_path(cli, &rinex)?;
    rinex.to_file(&path, format, cli.gzip())?;
    Ok(())
}

pub fn main() {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();
    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    fn test_resource(path: &str) -> String {
        format!("{}/../test_resources/{}", env!("CARGO_MANIFEST_DIR"), path)
    }
    fn parse_args(args: &[&str]) -> Cli {
        let mut argv = vec!["rnx2rx3"];
        argv.extend_from_slice(args);
        Cli::try_from_args(argv).unwrap()
    }
    #[test]
    fn long_name_next_to_input() {
        let input = test_resource("OBS/V2/graz2540.18o");
        let cli = parse_args(&["-i", &input, "--country", "aut", "-z"]);
        let rinex = read_input(&cli).unwrap();
        let path = output_path(&cli, &rinex).unwrap();
        assert_eq!(
            path,
            Path::new(&test_resource("OBS/V2")).join("GRAZ00AUT_S_20182540000_05M_30S_MO.rnx.gz")
        );
    }
    #[test]
    fn explicit_output() {
        let input = test_resource("OBS/V3/AGOC00SVK_S_20250750000_01H_30S_MO.rnx");
        let cli = parse_args(&["-i", &input, "-o", "/tmp/agoc.rnx"]);
        let rinex = read_input(&cli).unwrap();
        assert_eq!(
            output_path(&cli, &rinex).unwrap(),
            PathBuf::from("/tmp/agoc.rnx")
        );

        let cli = parse_args(&["-i", &input, "-o", "agoc.rnx"]);
        assert_eq!(
            output_path(&cli, &rinex).unwrap(),
            Path::new(&test_resource("OBS/V3")).join("agoc.rnx")
        );
    }
    #[test]
    fn preprocessed_input() {
        let input = test_resource("OBS/V3/AGOC00SVK_S_20250750000_01H_30S_MO.rnx");
        let cli = parse_args(&[
            "-i",
            &input,
            "-F",
            "c=GPS",
            "--smp",
            "60",
            "--crop-end",
            "1742085000",
        ]);
        let rinex = read_input(&cli).unwrap();
        // up to 00:30:00, every minute, 00:20:00 to 00:24:00 are missing
        assert_eq!(rinex.record.len(), 26);
        assert!(rinex.record.iter().all(|entry| entry.num_sat() == 6));
    }
    #[test]
    fn quiet_run_with_report() {
        let input = test_resource("OBS/V2/graz2540.18o");
        let json = std::env::temp_dir().join("rnx2rx3-graz-report.json");
        let json = json.to_string_lossy().to_string();
        let cli = parse_args(&["-i", &input, "--quiet", "--json", &json, "--gapsize", "3"]);
        run(&cli).unwrap();

        let content = std::fs::read_to_string(&json).unwrap();
        let report: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(report["gap_size"], 3);
        assert_eq!(report["epochs_valid"], 10);
    }
}
