use chrono::TimeZone;

use super::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

#[test]
fn ten_seconds_ahead_is_remaining() {
    let target = (now() + chrono::Duration::seconds(10)).to_rfc3339();
    let state = resolve_time(&target, now()).unwrap();
    assert_eq!(
        state,
        TimeState::Remaining {
            duration_ms: 10_000
        }
    );
}

#[test]
fn past_and_exact_targets_are_expired() {
    let past = (now() - chrono::Duration::seconds(1)).to_rfc3339();
    let state = resolve_time(&past, now()).unwrap();
    assert!(state.is_expired());
    assert_eq!(
        state,
        TimeState::Expired {
            message: EXPIRED_MESSAGE.to_owned()
        }
    );

    let exact = now().to_rfc3339();
    assert!(resolve_time(&exact, now()).unwrap().is_expired());
}

#[test]
fn accepts_common_timestamp_shapes() {
    let expected = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 0).unwrap();
    for s in [
        "2026-12-31T23:59:00Z",
        "2026-12-31T23:59:00.000Z",
        "2027-01-01T01:59:00+02:00",
        "2026-12-31T23:59:00",
        "2026-12-31 23:59:00",
        "2026-12-31T23:59",
        "2026-12-31 23:59",
        "  2026-12-31 23:59  ",
        "Thu, 31 Dec 2026 23:59:00 +0000",
        "2026-12-31 23:59:00+00:00",
    ] {
        assert_eq!(parse_target_time(s).unwrap(), expected, "input {s:?}");
    }

    assert_eq!(
        parse_target_time("2026-12-31").unwrap(),
        Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap()
    );
}

#[test]
fn missing_or_garbage_time_is_a_time_error() {
    for s in ["", "   ", "tomorrow", "31/12/2026", "2026-13-01"] {
        let err = parse_target_time(s).unwrap_err();
        assert!(matches!(err, CountdownError::Time(_)), "input {s:?}");
    }
}

#[test]
fn remaining_labels_step_one_second() {
    let state = TimeState::Remaining {
        duration_ms: 90_061_000,
    };
    let labels: Vec<String> = state.labels(3).collect();
    assert_eq!(
        labels,
        vec!["01d 01h 01m 01s", "01d 01h 01m 00s", "01d 01h 00m 59s"]
    );
}

#[test]
fn expired_yields_one_label_regardless_of_frames() {
    let state = TimeState::Expired {
        message: EXPIRED_MESSAGE.to_owned(),
    };
    let labels = state.labels(90);
    assert_eq!(labels.len(), 1);
    assert_eq!(labels.collect::<Vec<_>>(), vec![EXPIRED_MESSAGE.to_owned()]);
    assert_eq!(state.frame_count(90), 1);
}

#[test]
fn labels_report_exact_size() {
    let state = TimeState::Remaining { duration_ms: 5_000 };
    let mut labels = state.labels(30);
    assert_eq!(labels.len(), 30);
    labels.next();
    assert_eq!(labels.len(), 29);
    assert_eq!(state.frame_count(30), 30);
}
