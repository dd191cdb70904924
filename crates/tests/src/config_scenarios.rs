//! Config-file scenarios, from the JSON document to the exit status

use audiodefault_core::domain::{
    run_config_file, AudioError, ExitStatus, Origin, RateRange, Report,
};
use audiodefault_core::fake::{FakeDevice, FakeHost, Mutation, RecordingReporter};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

fn run(host: &FakeHost, json: &str, print_interval_only: bool) -> (ExitStatus, Vec<Report>) {
    let file = write_config(json);
    let mut reporter = RecordingReporter::default();
    let status = run_config_file(host, file.path(), print_interval_only, &mut reporter);
    (status, reporter.reports)
}

fn studio() -> FakeHost {
    FakeHost::new(vec![
        FakeDevice::output(1, "MacBook Pro Speakers").with_rate(48000.0),
        FakeDevice::output(2, "JDS Element IV").with_ranges(vec![
            RateRange::discrete(44100.0),
            RateRange::new(48000.0, 192000.0),
        ]),
    ])
    .with_default(1)
}

#[test]
fn test_max_rate_entry() {
    let host = studio();
    let (status, reports) = run(
        &host,
        r#"{"devices":[{"name":"Element","rate":"max"}],"fallback_to_current":true}"#,
        false,
    );

    assert_eq!(status.code(), 0);
    assert_eq!(
        reports,
        vec![Report::Applied {
            device: "JDS Element IV".into(),
            rate: 192000.0,
            origin: Origin::Config,
        }]
    );
    assert_eq!(host.rate_of(2), Some(192000.0));
    assert_eq!(host.default_system_output(), Some(2));
}

#[test]
fn test_priority_order_decides() {
    let host = studio();
    let (status, _) = run(
        &host,
        r#"{"devices":[
            {"name":"Focusrite","rate":96000},
            {"name":"speakers","rate":44100},
            {"name":"element","rate":"MAX"}
        ]}"#,
        false,
    );

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(
        host.mutations(),
        vec![Mutation::DefaultOutput(1), Mutation::SampleRate(1, 44100.0)]
    );
}

#[test]
fn test_no_match_without_fallback() {
    let host = studio();
    let (status, reports) = run(
        &host,
        r#"{"devices":[{"name":"Focusrite","rate":96000}],"fallback_to_current":false}"#,
        false,
    );

    assert_eq!(status.code(), 1);
    assert_eq!(reports, vec![Report::NoConfiguredDevice]);
    assert!(host.mutations().is_empty());
}

#[test]
fn test_fallback_keeps_current_rate() {
    let host = studio();
    let (status, reports) = run(
        &host,
        r#"{"devices":[{"name":"Focusrite","rate":96000}],"fallback_to_current":true}"#,
        false,
    );

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(
        reports,
        vec![Report::FallbackApplied {
            device: "MacBook Pro Speakers".into()
        }]
    );
    assert_eq!(host.rate_of(1), Some(48000.0));
}

#[test]
fn test_print_interval_default() {
    let host = studio();
    let (status, reports) = run(&host, r#"{"devices":[]}"#, true);

    assert_eq!(status.code(), 0);
    assert_eq!(reports, vec![Report::Interval(3600)]);
    assert_eq!(host.query_count(), 0);
    assert!(host.mutations().is_empty());
}

#[test]
fn test_print_interval_echoes_configured_value() {
    let host = studio();
    let (status, reports) = run(&host, r#"{"check_frequency_seconds":-5,"devices":[]}"#, true);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(reports, vec![Report::Interval(-5)]);
    assert_eq!(host.query_count(), 0);
}

#[test]
fn test_rate_not_settable() {
    let host = FakeHost::new(vec![FakeDevice::output(7, "LG HDR 4K").rate_locked()]);
    let (status, reports) = run(&host, r#"{"devices":[{"name":"LG","rate":48000}]}"#, false);

    assert_eq!(status, ExitStatus::Failure);
    assert_eq!(
        reports,
        vec![Report::Failed(AudioError::RateNotSettable("LG HDR 4K".into()))]
    );
}

#[test]
fn test_rejected_rate_write_is_a_mutation_error() {
    let host = studio().rejecting_sample_rate();
    let (status, reports) = run(&host, r#"{"devices":[{"name":"element","rate":96000}]}"#, false);

    assert_eq!(status.code(), 1);
    let Report::Failed(error) = &reports[0] else {
        panic!("expected a failure report, got {:?}", reports[0]);
    };
    assert!(matches!(error, AudioError::HostMutation(_)), "{:?}", error);
    assert_eq!(host.mutations(), vec![Mutation::DefaultOutput(2)]);
    assert_eq!(host.default_output(), Some(2));
}

#[test]
fn test_empty_pattern_matches_nothing() {
    let host = studio();
    let (status, reports) = run(&host, r#"{"devices":[{"name":"","rate":48000}]}"#, false);

    assert_eq!(status, ExitStatus::Failure);
    assert_eq!(reports, vec![Report::NoConfiguredDevice]);
    assert!(host.mutations().is_empty());
}

#[test]
fn test_unreadable_and_malformed_configs() {
    let host = studio();
    let mut reporter = RecordingReporter::default();

    let status = run_config_file(&host, "/nonexistent/devices.json", false, &mut reporter);
    assert_eq!(status.code(), 2);

    for json in [
        "not json",
        r#"{"devices":[{"name":"DAC","rate":"fastest"}]}"#,
        r#"{"devices":[{"name":"DAC","rate":0}]}"#,
    ] {
        let (status, reports) = run(&host, json, false);
        assert_eq!(status, ExitStatus::ConfigError, "{}", json);
        assert!(matches!(reports[0], Report::ConfigRejected(_)));
    }
    assert_eq!(host.query_count(), 0);
}
