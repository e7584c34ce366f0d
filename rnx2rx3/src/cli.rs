use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rnxobs::prelude::{processing::Filter, Duration, Epoch, Format};

use crate::Error;

/// Output name that requests the standard long file name
pub const LONG_NAME_MARKER: &str = "::RX3::";

pub struct Cli {
    /// arguments passed by user
    pub matches: ArgMatches,
}

fn command() -> Command {
    Command::new("rnx2rx3")
        .version(env!("CARGO_PKG_VERSION"))
        .about("RINEX2/3 Observation to RINEX3 converter, with quality analysis")
        .arg_required_else_help(true)
        .color(ColorChoice::Always)
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Input RINEX2 or RINEX3 Observation file, possibly gzip compressed")
                .required(true),
        )
        .next_help_heading("Preprocessing")
        .arg(
            Arg::new("smp")
                .long("smp")
                .value_name("SECONDS")
                .help("Resample to this interval. Epochs that are not aligned are dropped."),
        )
        .arg(
            Arg::new("crop-beg")
                .long("crop-beg")
                .value_name("EPOCH")
                .help("Drop epochs prior this instant: Unix timestamp or Epoch description"),
        )
        .arg(
            Arg::new("crop-end")
                .long("crop-end")
                .value_name("EPOCH")
                .help("Drop epochs past this instant: Unix timestamp or Epoch description"),
        )
        .arg(
            Arg::new("filter")
                .short('F')
                .long("filter")
                .value_name("EXPR")
                .action(ArgAction::Append)
                .help(
                    "Mask filter (for example \"sv=G01,G02\", \"c!=GLO\", \"o=L1C,C1C\")
or decimation filter (\"d:30 s\", \"d:2\"). May be repeated.",
                ),
        )
        .arg(
            Arg::new("no-prune")
                .long("no-prune")
                .action(ArgAction::SetTrue)
                .help("Keep declared observables that were never observed"),
        )
        .arg(
            Arg::new("skeleton")
                .long("skeleton")
                .value_name("FILE")
                .help("Merge this skeleton header into the output header"),
        )
        .next_help_heading("Output")
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("NAME")
                .default_value(LONG_NAME_MARKER)
                .help(
                    "Output file. A bare file name is placed next to the input file.
Default derives the standard RINEX3 long file name.",
                ),
        )
        .arg(
            Arg::new("country")
                .long("country")
                .value_name("CCC")
                .help("Three letter country code, for the long file name"),
        )
        .arg(
            Arg::new("rnx-version")
                .long("rnx-version")
                .value_name("MAJOR")
                .default_value("3")
                .help("Output revision: 2 or 3"),
        )
        .arg(
            Arg::new("passthrough")
                .long("passthrough")
                .action(ArgAction::SetTrue)
                .help("Copy untouched RINEX3 epochs verbatim"),
        )
        .arg(
            Arg::new("gzip")
                .short('z')
                .long("gzip")
                .action(ArgAction::SetTrue)
                .help("Gzip compress the output file"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Do not write the output file, only run the quality analysis"),
        )
        .next_help_heading("Quality analysis")
        .arg(
            Arg::new("rinstat")
                .long("rinstat")
                .action(ArgAction::SetTrue)
                .help("Print the rinstat summary"),
        )
        .arg(
            Arg::new("availability")
                .long("availability")
                .action(ArgAction::SetTrue)
                .help("Print data availability windows"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .value_name("FILE")
                .help("Dump the quality report in JSON"),
        )
        .arg(
            Arg::new("qc-cfg")
                .long("qc-cfg")
                .value_name("FILE")
                .help("Quality analysis options (JSON)"),
        )
        .arg(
            Arg::new("gapsize")
                .long("gapsize")
                .value_name("N")
                .help("Gaps spanning up to N intervals are small ones (default 5)"),
        )
}

/// Unix timestamp (seconds) or any [Epoch] description
fn parse_epoch(content: &str) -> Result<Epoch, Error> {
    let content = content.trim();
    if let Ok(secs) = content.parse::<f64>() {
        Ok(Epoch::from_unix_seconds(secs))
    } else {
        Epoch::from_str(content)
            .map_err(|_| Error::InvalidArgument("epoch", content.to_string()))
    }
}

impl Cli {
    pub fn new() -> Self {
        Self {
            matches: command().get_matches(),
        }
    }
    #[cfg(test)]
    /// Builds from an argument list, the first one being the program name
    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self {
            matches: command().try_get_matches_from(args)?,
        })
    }
    pub fn input_path(&self) -> PathBuf {
        self.matches
            .get_one::<String>("input")
            .map(|path| Path::new(path).to_path_buf())
            .unwrap_or_default()
    }
    /// True when the long file name should be derived
    pub fn long_name(&self) -> bool {
        self.output_name() == LONG_NAME_MARKER
    }
    pub fn output_name(&self) -> &str {
        self.matches
            .get_one::<String>("output")
            .map(|name| name.as_str())
            .unwrap_or(LONG_NAME_MARKER)
    }
    pub fn country(&self) -> Option<&String> {
        self.matches.get_one::<String>("country")
    }
    pub fn format(&self) -> Result<Format, Error> {
        let major = self
            .matches
            .get_one::<String>("rnx-version")
            .map(|s| s.as_str())
            .unwrap_or("3");
        Ok(Format::from_str(major)?)
    }
    pub fn sampling(&self) -> Result<Option<Duration>, Error> {
        match self.matches.get_one::<String>("smp") {
            Some(secs) => match secs.trim().parse::<f64>() {
                Ok(secs) if secs > 0.0 => Ok(Some(Duration::from_seconds(secs))),
                _ => Err(Error::InvalidArgument("sampling interval", secs.to_string())),
            },
            None => Ok(None),
        }
    }
    pub fn crop_begin(&self) -> Result<Option<Epoch>, Error> {
        self.matches
            .get_one::<String>("crop-beg")
            .map(|s| parse_epoch(s))
            .transpose()
    }
    pub fn crop_end(&self) -> Result<Option<Epoch>, Error> {
        self.matches
            .get_one::<String>("crop-end")
            .map(|s| parse_epoch(s))
            .transpose()
    }
    pub fn filters(&self) -> Result<Vec<Filter>, Error> {
        let mut filters = Vec::new();
        if let Some(descs) = self.matches.get_many::<String>("filter") {
            for desc in descs {
                filters.push(Filter::from_str(desc)?);
            }
        }
        Ok(filters)
    }
    pub fn skeleton(&self) -> Option<PathBuf> {
        self.matches
            .get_one::<String>("skeleton")
            .map(|path| Path::new(path).to_path_buf())
    }
    pub fn passthrough(&self) -> bool {
        self.matches.get_flag("passthrough")
    }
    pub fn no_prune(&self) -> bool {
        self.matches.get_flag("no-prune")
    }
    pub fn gzip(&self) -> bool {
        self.matches.get_flag("gzip")
    }
    pub fn quiet(&self) -> bool {
        self.matches.get_flag("quiet")
    }
    pub fn rinstat(&self) -> bool {
        self.matches.get_flag("rinstat")
    }
    pub fn availability(&self) -> bool {
        self.matches.get_flag("availability")
    }
    pub fn json(&self) -> Option<PathBuf> {
        self.matches
            .get_one::<String>("json")
            .map(|path| Path::new(path).to_path_buf())
    }
    pub fn qc_cfg(&self) -> Option<PathBuf> {
        self.matches
            .get_one::<String>("qc-cfg")
            .map(|path| Path::new(path).to_path_buf())
    }
    pub fn gap_size(&self) -> Result<Option<u32>, Error> {
        match self.matches.get_one::<String>("gapsize") {
            Some(n) => n
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|_| Error::InvalidArgument("gap size", n.to_string())),
            None => Ok(None),
        }
    }
    /// True when any quality analysis output is requested
    pub fn quality_check(&self) -> bool {
        self.rinstat() || self.availability() || self.json().is_some()
    }
}
