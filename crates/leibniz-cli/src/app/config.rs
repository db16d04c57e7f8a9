use super::duration::parse_duration;
use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use core::{num::NonZeroUsize, time::Duration};
use leibniz_sink::Destination;

/// Runtime configuration for the `leibniz` binary.
///
/// All values are parsed from CLI arguments or environment variables, with
/// defaults that reproduce a ten second time-bounded run printed to the log.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "leibniz",
    version,
    about = "Approximate π with the Leibniz series and optionally upload the result"
)]
pub struct CliArgs {
    /// Which strategy to run.
    ///
    /// `time` sums terms sequentially until `--calc-time` elapses. `count`
    /// sums exactly `--terms + 1` terms computed concurrently.
    ///
    /// Environment variable: `LEIBNIZ_MODE`
    #[arg(long, env = "LEIBNIZ_MODE", value_enum, default_value_t = Mode::Time)]
    pub mode: Mode,

    /// How long to sum terms for in `time` mode.
    ///
    /// Accepts Go-style durations such as `10s`, `1m30s` or `250ms`. Negative
    /// values are treated as zero.
    ///
    /// Environment variable: `CALC_TIME`
    #[arg(
        long,
        env = "CALC_TIME",
        default_value = "10s",
        value_parser = parse_duration,
        allow_hyphen_values = true
    )]
    pub calc_time: Duration,

    /// Highest term index to sum in `count` mode (`N`, giving `N + 1` terms).
    ///
    /// Environment variable: `NUM_TERMS`
    #[arg(long, env = "NUM_TERMS", default_value_t = 1_000)]
    pub terms: u64,

    /// Number of workers in `count` mode.
    ///
    /// `0` starts one task per term with no cap. Any other value bounds
    /// concurrency to that many workers.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = 0)]
    pub workers: usize,

    /// Write the result to this bucket.
    ///
    /// A bare name or `gs://name` targets Google Cloud Storage,
    /// `file:///dir/name` a local directory and `memory://name` an in-process
    /// store. Empty disables the upload.
    ///
    /// Environment variable: `BUCKET`
    #[arg(long, env = "BUCKET", default_value_t = String::new())]
    pub bucket: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Sum sequentially until a deadline.
    Time,
    /// Sum a fixed number of concurrently computed terms.
    Count,
}

/// How the estimate is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    TimeBounded {
        calc_time: Duration,
    },
    FixedCount {
        terms: u64,
        /// `None` for one task per term.
        workers: Option<NonZeroUsize>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub strategy: Strategy,
    pub destination: Option<Destination>,
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let strategy = match args.mode {
            Mode::Time => {
                if args.workers != 0 {
                    bail!("NUM_WORKERS only applies to `count` mode");
                }
                Strategy::TimeBounded {
                    calc_time: args.calc_time,
                }
            }
            Mode::Count => {
                if args.terms == u64::MAX {
                    bail!("NUM_TERMS ({}) leaves no room for the final term", args.terms);
                }
                Strategy::FixedCount {
                    terms: args.terms,
                    workers: NonZeroUsize::new(args.workers),
                }
            }
        };

        let destination = match args.bucket.trim() {
            "" => None,
            bucket => Some(
                bucket
                    .parse::<Destination>()
                    .context("BUCKET is not a valid destination")?,
            ),
        };

        Ok(Self {
            strategy,
            destination,
        })
    }
}
