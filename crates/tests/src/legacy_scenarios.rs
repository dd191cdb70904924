//! Retry-mode scenarios
//!
//! Each test drives `run_legacy` end to end: resolution, capability check,
//! default assignment and rate application, with retries and sleeps recorded.

use audiodefault_core::domain::{
    run_legacy, AudioError, ExitStatus, LegacyOptions, Origin, RateRange, RateSpec, Report,
    TargetSpec,
};
use audiodefault_core::fake::{FakeDevice, FakeHost, Mutation, RecordingReporter, RecordingSleeper};
use std::time::Duration;

fn options(target: TargetSpec, rate: RateSpec, tries: u32) -> LegacyOptions {
    LegacyOptions {
        target,
        rate,
        tries,
        wait: Duration::from_millis(250),
        print_rates: false,
    }
}

fn named(name: &str) -> TargetSpec {
    TargetSpec::Named(name.to_string())
}

fn run(host: &FakeHost, options: &LegacyOptions) -> (ExitStatus, Vec<Report>, Vec<Duration>) {
    let mut reporter = RecordingReporter::default();
    let mut sleeper = RecordingSleeper::default();
    let status = run_legacy(host, options, &mut reporter, &mut sleeper);
    (status, reporter.reports, sleeper.sleeps)
}

fn desk() -> FakeHost {
    FakeHost::new(vec![
        FakeDevice::input(10, "Built-in Microphone"),
        FakeDevice::output(11, "MacBook Pro Speakers")
            .with_ranges(vec![RateRange::new(44100.0, 96000.0)])
            .with_rate(48000.0),
        FakeDevice::output(12, "JDS Labs Element IV").with_ranges(vec![
            RateRange::new(48000.0, 192000.0),
            RateRange::discrete(44100.0),
        ]),
    ])
    .with_default(11)
}

// ============================================================================
// RETRY BEHAVIOUR
// ============================================================================

#[test]
fn test_exhaustion_runs_every_attempt() {
    let host = desk();
    let opts = options(named("Focusrite"), RateSpec::Fixed(96000.0), 4);

    let (status, reports, sleeps) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Failure);
    assert_eq!(status.code(), 1);
    assert_eq!(host.listings(), 4);
    assert_eq!(sleeps, vec![Duration::from_millis(250); 3]);

    let attempts: Vec<u32> = reports
        .iter()
        .filter_map(|r| match r {
            Report::NotFoundYet { attempt, tries: 4, .. } => Some(*attempt),
            _ => None,
        })
        .collect();
    assert_eq!(attempts, vec![1, 2, 3, 4]);
    assert_eq!(reports.last(), Some(&Report::Exhausted));
    assert!(host.mutations().is_empty());
}

#[test]
fn test_found_on_second_attempt() {
    let host = FakeHost::new(vec![
        FakeDevice::output(1, "MacBook Pro Speakers"),
        FakeDevice::output(2, "JDS Labs Element IV").appears_on_listing(2),
    ]);
    let opts = options(named("JDS Labs Element IV"), RateSpec::Fixed(192000.0), 3);

    let (status, reports, sleeps) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(
        reports,
        vec![
            Report::NotFoundYet {
                target: named("JDS Labs Element IV"),
                attempt: 1,
                tries: 3,
            },
            Report::Applied {
                device: "JDS Labs Element IV".into(),
                rate: 192000.0,
                origin: Origin::CommandLine,
            },
        ]
    );
    assert_eq!(sleeps.len(), 1);
    assert_eq!(host.listings(), 2);
    assert_eq!(host.default_output(), Some(2));
    assert_eq!(host.default_system_output(), Some(2));
    assert_eq!(host.rate_of(2), Some(192000.0));
}

#[test]
fn test_single_try_never_sleeps() {
    let host = desk();
    let opts = options(named("Focusrite"), RateSpec::Max, 1);

    let (status, _, sleeps) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Failure);
    assert!(sleeps.is_empty());
}

// ============================================================================
// RESOLUTION
// ============================================================================

#[test]
fn test_exact_name_beats_earlier_fuzzy_match() {
    let host = FakeHost::new(vec![
        FakeDevice::output(1, "JDS Labs Element IV (Aggregate)"),
        FakeDevice::output(2, "JDS Labs Element IV"),
    ]);
    let opts = options(named("JDS Labs Element IV"), RateSpec::Fixed(96000.0), 1);

    let (status, _, _) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(host.default_output(), Some(2));
}

#[test]
fn test_fuzzy_name_applies_first_in_order() {
    let host = desk();
    let opts = options(named("element"), RateSpec::Fixed(96000.0), 1);

    let (status, reports, _) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Success);
    assert!(matches!(&reports[0], Report::Applied { device, .. } if device == "JDS Labs Element IV"));
}

#[test]
fn test_input_only_device_is_never_selected() {
    let host = desk();
    let opts = options(named("Built-in Microphone"), RateSpec::Fixed(48000.0), 2);

    let (status, reports, _) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Failure);
    assert!(matches!(reports[0], Report::NotFoundYet { attempt: 1, .. }));
    assert!(host.mutations().is_empty());
}

// ============================================================================
// RATE APPLICATION
// ============================================================================

#[test]
fn test_max_rate_with_listing() {
    let host = desk();
    let opts = LegacyOptions {
        print_rates: true,
        ..options(named("JDS Labs Element IV"), RateSpec::Max, 1)
    };

    let (status, reports, _) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(
        reports[0],
        Report::AvailableRates {
            device: "JDS Labs Element IV".into(),
            ranges: vec![
                RateRange::discrete(44100.0),
                RateRange::new(48000.0, 192000.0),
            ],
        }
    );
    assert_eq!(
        host.mutations(),
        vec![Mutation::DefaultOutput(12), Mutation::SampleRate(12, 192000.0)]
    );
}

#[test]
fn test_max_rate_without_ranges() {
    let host = FakeHost::new(vec![FakeDevice::output(4, "USB DAC")]);
    let opts = options(named("USB DAC"), RateSpec::Max, 1);

    let (status, reports, _) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Failure);
    assert!(matches!(
        &reports[0],
        Report::AttemptFailed { error: AudioError::NoAvailableRates(_), .. }
    ));
}

#[test]
fn test_rate_not_settable_is_reported_per_attempt() {
    let host = FakeHost::new(vec![FakeDevice::output(5, "LG HDR 4K").rate_locked()]);
    let opts = options(named("LG HDR 4K"), RateSpec::Fixed(48000.0), 2);

    let (status, reports, sleeps) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Failure);
    assert_eq!(
        reports,
        vec![
            Report::AttemptFailed {
                error: AudioError::RateNotSettable("LG HDR 4K".into()),
                attempt: 1,
                tries: 2,
            },
            Report::AttemptFailed {
                error: AudioError::RateNotSettable("LG HDR 4K".into()),
                attempt: 2,
                tries: 2,
            },
            Report::Exhausted,
        ]
    );
    assert_eq!(sleeps.len(), 1);
    // Default assignment succeeded; only the rate was refused
    assert_eq!(host.default_output(), Some(5));
    assert_eq!(host.rate_of(5), Some(44100.0));
}

#[test]
fn test_rejected_rate_write_is_a_mutation_error() {
    let host = desk().rejecting_sample_rate();
    let opts = options(named("JDS Labs Element IV"), RateSpec::Fixed(96000.0), 1);

    let (status, reports, _) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Failure);
    let Report::AttemptFailed { error, .. } = &reports[0] else {
        panic!("expected a failed attempt, got {:?}", reports[0]);
    };
    assert!(matches!(error, AudioError::HostMutation(_)), "{:?}", error);
    // The new default stays in place
    assert_eq!(host.mutations(), vec![Mutation::DefaultOutput(12)]);
    assert_eq!(host.default_output(), Some(12));
    assert_eq!(host.rate_of(12), Some(44100.0));
}

#[test]
fn test_empty_device_name_matches_nothing() {
    let host = desk();
    let opts = options(named(""), RateSpec::Fixed(48000.0), 1);

    let (status, reports, _) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Failure);
    assert!(matches!(reports[0], Report::NotFoundYet { .. }));
    assert!(host.mutations().is_empty());
}

#[test]
fn test_current_default_rate_change() {
    let host = desk();
    let opts = options(TargetSpec::CurrentDefault, RateSpec::Fixed(44100.0), 1);

    let (status, reports, _) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(
        reports,
        vec![Report::Applied {
            device: "MacBook Pro Speakers".into(),
            rate: 44100.0,
            origin: Origin::CommandLine,
        }]
    );
    assert_eq!(host.rate_of(11), Some(44100.0));
}

#[test]
fn test_rejected_default_assignment_skips_rate() {
    let host = desk().rejecting_default_output();
    let opts = options(named("JDS Labs Element IV"), RateSpec::Fixed(96000.0), 1);

    let (status, reports, _) = run(&host, &opts);

    assert_eq!(status, ExitStatus::Failure);
    assert!(matches!(
        &reports[0],
        Report::AttemptFailed { error: AudioError::HostMutation(_), .. }
    ));
    assert!(host.mutations().is_empty());
}
