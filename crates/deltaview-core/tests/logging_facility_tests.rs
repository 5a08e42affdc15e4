#![allow(clippy::unwrap_used, clippy::expect_used)]

use deltaview_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
    FIELD_OP_COUNT, FIELD_REQUEST_ID,
};
use deltaview_core::errors::{DeltaViewError, ExErrorKind};
use deltaview_core::logging_facility::test_capture::init_test_capture;
use deltaview_core::{compute_delta, open_session, DiffOptions, ViewerConfig};
use deltaview_core::{log_op_end, log_op_error, log_op_start};
use serde_json::json;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture.events_for(op_name, EVENT_END);
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = DeltaViewError::ValueMismatch {
        path: "/a".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events = capture.events_for(op_name, EVENT_END_ERROR);
    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(error_events[0].field(FIELD_ERR_CODE), Some("ERR_PATCH_CONFLICT"));
    assert_eq!(
        error_events[0].field(FIELD_ERR_KIND),
        Some(format!("{:?}", ExErrorKind::PatchConflict).as_str())
    );
}

#[test]
fn test_log_macros_with_multiple_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_4";

    log_op_start!(op_name, strategy = "lcs", op_count = 3u64);

    let start = capture.events_for(op_name, EVENT_START);
    assert_eq!(start[0].field("strategy"), Some("lcs"));
    assert_eq!(start[0].field("op_count"), Some("3"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_compute_delta_logs_boundaries() {
    let capture = init_test_capture();

    compute_delta(&json!({"a": 1}), &json!({"a": 2}), &DiffOptions::default()).unwrap();

    let ends = capture.events_for("compute_delta", EVENT_END);
    assert!(!ends.is_empty());
    assert!(ends.iter().all(|e| e.field(FIELD_OP_COUNT).is_some()));
    assert!(ends.iter().all(|e| e.field(FIELD_DURATION_MS).is_some()));
}

#[test]
fn test_open_session_error_is_logged_with_code() {
    let capture = init_test_capture();

    let err = open_session("{\"marker\": \"unique-5\"", "{}", &ViewerConfig::default()).unwrap_err();
    let request_id = err.request_id().unwrap().to_string();

    let matching = capture.count_events(|e| {
        e.op.as_deref() == Some("open_session")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_PARSE")
    });
    assert!(matching >= 1);

    // Snapshot text never reaches the log, only its size.
    assert!(capture
        .events()
        .iter()
        .all(|e| e.fields.values().all(|v| !v.contains("unique-5"))));
    assert!(capture
        .events_for("open_session", EVENT_START)
        .iter()
        .any(|e| e.field(FIELD_REQUEST_ID) == Some(request_id.as_str())));
}
