//! Terminal rendering of status reports
//!
//! Success lines and the bare interval go to stdout. Warnings, failures and
//! rate listings go to stderr so stdout stays scriptable.

use audiodefault_core::domain::{DeviceListing, Origin, Report, Reporter};
use std::io::{self, Write};

/// Which stream a line belongs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Out,
    Err,
}

/// Render one report
pub fn render(report: &Report) -> (Channel, String) {
    match report {
        Report::Applied {
            device,
            rate,
            origin,
        } => {
            let source = match origin {
                Origin::CommandLine => "",
                Origin::Config => " (from config)",
            };
            (
                Channel::Out,
                format!("✅ Default output set to '{}' at {:.0} Hz{}", device, rate, source),
            )
        }
        Report::FallbackApplied { device } => (
            Channel::Out,
            format!(
                "ℹ️  No configured device present; kept current default '{}'",
                device
            ),
        ),
        Report::AvailableRates { device, ranges } => {
            let mut text = format!("ℹ️  Available sample rates for '{}':", device);
            if ranges.is_empty() {
                text.push_str(" none reported");
            }
            for range in ranges {
                text.push_str(&format!("\n    {}", range));
            }
            (Channel::Err, text)
        }
        Report::NotFoundYet {
            target,
            attempt,
            tries,
        } => (
            Channel::Err,
            format!(
                "⚠️  Device '{}' not found yet (attempt {}/{})",
                target, attempt, tries
            ),
        ),
        Report::AttemptFailed {
            error,
            attempt,
            tries,
        } => (
            Channel::Err,
            format!("⚠️  Attempt {}/{} failed: {}", attempt, tries, error),
        ),
        Report::Exhausted => (
            Channel::Err,
            "❌ Could not set the default output device".to_string(),
        ),
        Report::NoConfiguredDevice => (
            Channel::Err,
            "❌ None of the configured devices are present".to_string(),
        ),
        Report::Failed(error) => (Channel::Err, format!("❌ {}", error)),
        Report::ConfigRejected(message) => (Channel::Err, format!("❌ {}", message)),
        Report::Interval(seconds) => (Channel::Out, seconds.to_string()),
        Report::Device(listing) => (Channel::Out, listing_line(listing)),
        Report::CurrentDefault { device, rate } => {
            let rate = match rate {
                Some(hz) => format!("{:.0} Hz", hz),
                None => "rate unknown".to_string(),
            };
            (Channel::Out, format!("✅ {} @ {}", device, rate))
        }
    }
}

fn listing_line(listing: &DeviceListing) -> String {
    let role = if listing.output_capable { "out" } else { "in " };
    let mut line = format!("{:>5}  [{}] {}", listing.id, role, listing.name);

    if listing.is_default {
        line.push_str(" (default)");
    }
    if let Some(hz) = listing.rate {
        line.push_str(&format!("  @ {:.0} Hz", hz));
    }
    if !listing.ranges.is_empty() {
        let ranges: Vec<String> = listing.ranges.iter().map(|r| r.to_string()).collect();
        line.push_str(&format!("  [{}]", ranges.join(", ")));
    }
    line
}

/// Writes rendered reports to a pair of streams
pub struct ConsoleReporter<O, E> {
    out: O,
    err: E,
}

impl ConsoleReporter<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ConsoleReporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }
}

impl<O: Write, E: Write> Reporter for ConsoleReporter<O, E> {
    fn report(&mut self, report: Report) {
        let (channel, text) = render(&report);
        let sink: &mut dyn Write = match channel {
            Channel::Out => &mut self.out,
            Channel::Err => &mut self.err,
        };
        if let Err(e) = writeln!(sink, "{}", text) {
            tracing::debug!(error = %e, "Dropped status line");
        }
    }
}
