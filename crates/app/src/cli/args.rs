//! Command-line surface

use audiodefault_core::domain::{
    LegacyOptions, RateSpec, TargetSpec, DEFAULT_DEVICE_NAME, DEFAULT_RATE_HZ,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "mac-audio-default")]
#[command(version, about = "Set the default audio output device and its sample rate", long_about = None)]
pub struct Cli {
    /// Output device to select (exact name, or a case-insensitive fragment)
    #[arg(long, value_name = "NAME", default_value = DEFAULT_DEVICE_NAME)]
    pub device: String,

    /// Nominal sample rate to apply, in Hz
    #[arg(long, value_name = "HZ", default_value_t = DEFAULT_RATE_HZ, value_parser = parse_rate)]
    pub rate: f64,

    /// Use the current default output device instead of --device
    #[arg(long)]
    pub current: bool,

    /// Apply the device's highest available rate instead of --rate
    #[arg(long)]
    pub max: bool,

    /// Attempts before giving up
    #[arg(long, value_name = "N", default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    pub tries: u32,

    /// Seconds to wait between attempts
    #[arg(long, value_name = "SECONDS", default_value = "1", value_parser = parse_wait)]
    pub wait: Duration,

    /// Print the device's available sample-rate ranges before applying
    #[arg(long)]
    pub print_rates: bool,

    /// JSON priority list of devices; replaces --device/--rate handling
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the configured check frequency in seconds and exit
    #[arg(long, requires = "config")]
    pub print_interval: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// List every audio device
    List,
    /// Show the current default output device
    Default,
    /// Set the sample rate of the current default output device
    SetRate {
        /// Rate in Hz
        #[arg(value_parser = parse_rate)]
        hz: f64,
    },
}

/// What a parsed command line asks for
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    List,
    ShowDefault,
    Legacy(LegacyOptions),
    Config {
        path: PathBuf,
        print_interval_only: bool,
    },
}

impl Cli {
    /// Subcommands win over `--config`, which wins over the retry flags
    pub fn into_mode(self) -> Mode {
        match self.command {
            Some(Command::List) => return Mode::List,
            Some(Command::Default) => return Mode::ShowDefault,
            Some(Command::SetRate { hz }) => {
                return Mode::Legacy(LegacyOptions {
                    target: TargetSpec::CurrentDefault,
                    rate: RateSpec::Fixed(hz),
                    tries: 1,
                    wait: self.wait,
                    print_rates: self.print_rates,
                })
            }
            None => {}
        }

        if let Some(path) = self.config {
            return Mode::Config {
                path,
                print_interval_only: self.print_interval,
            };
        }

        Mode::Legacy(LegacyOptions {
            target: if self.current {
                TargetSpec::CurrentDefault
            } else {
                TargetSpec::Named(self.device)
            },
            rate: if self.max {
                RateSpec::Max
            } else {
                RateSpec::Fixed(self.rate)
            },
            tries: self.tries,
            wait: self.wait,
            print_rates: self.print_rates,
        })
    }
}

fn parse_rate(s: &str) -> Result<f64, String> {
    let hz: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    RateSpec::fixed(hz).map(|_| hz)
}

fn parse_wait(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("wait must be a non-negative number of seconds, got {}", s))
}
