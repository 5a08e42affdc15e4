//! End-to-end: snapshot texts to render session.

use deltaview_core::core_types::{RequestContext, RequestId, TraceId};
use deltaview_core::errors::ExErrorKind;
use deltaview_core::render::render_error_html;
use deltaview_core::{
    open_session, open_session_with_context, ArrayStrategy, NodeStatus, Side, ToggleState,
    ViewerConfig,
};

#[test]
fn test_session_for_reference_example() {
    let mut session = open_session(
        r#"{"a":1,"b":2}"#,
        r#"{"a":1,"b":3,"c":4}"#,
        &ViewerConfig::default(),
    )
    .unwrap();

    assert_eq!(session.redraws(), 1);
    assert_eq!(session.tree().status, NodeStatus::Modified);
    assert_eq!(
        session.render_text(),
        "~ (root): {3 fields}\n    a: 1\n~   b: 2 → 3\n+   c: 4\n"
    );

    assert_eq!(session.toggle(), ToggleState::Off);
    assert_eq!(
        session.render_text(),
        "~ (root): {3 fields}\n    … (1 unchanged)\n~   b: 2 → 3\n+   c: 4\n"
    );
    assert_eq!(session.redraws(), 2);
}

#[test]
fn test_toggle_does_not_recompute_delta() {
    let mut session = open_session("[1,2,3]", "[1,3]", &ViewerConfig::default()).unwrap();
    let delta_before = session.delta().clone();
    session.toggle();
    session.toggle();
    assert_eq!(session.delta(), &delta_before);
}

#[test]
fn test_html_checkbox_follows_toggle() {
    let mut session = open_session("[1]", "[2]", &ViewerConfig::default()).unwrap();
    assert!(session.render_html("dv").contains(" checked>"));
    session.set_show_unchanged(false);
    assert!(!session.render_html("dv").contains(" checked>"));
}

#[test]
fn test_parse_error_yields_no_session() {
    let ctx = RequestContext::with_request_id(RequestId::from_string("req-42".to_string()))
        .with_trace_id(TraceId::from_string("trace-1".to_string()));
    let err = open_session_with_context(ctx, "{}", "{not valid json", &ViewerConfig::default())
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Parse);
    assert_eq!(err.side(), Some(Side::Right));
    assert_eq!(err.op(), Some("open_session"));
    assert_eq!(err.request_id().map(RequestId::as_str), Some("req-42"));
    assert_eq!(err.trace_id().map(TraceId::as_str), Some("trace-1"));

    let panel = render_error_html(&err, "dv");
    assert!(panel.contains("ERR_PARSE"));
    assert!(panel.contains("<dd>right</dd>"));
}

#[test]
fn test_invalid_config_rejected_before_parsing() {
    let config = ViewerConfig {
        max_value_width: 1,
        ..ViewerConfig::default()
    };
    let err = open_session("{}", "{}", &config).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
}

#[test]
fn test_positional_config_is_used() {
    let config = ViewerConfig {
        array_strategy: ArrayStrategy::Positional,
        ..ViewerConfig::default()
    };
    let session = open_session("[1,2,3]", "[3,1,2]", &config).unwrap();
    assert_eq!(session.delta().stats.modified, 3);
    assert_eq!(session.delta().stats.moved, 0);
}

#[test]
fn test_summary_from_session() {
    let session = open_session("{\"a\":1}", "{\"a\":1}", &ViewerConfig::default()).unwrap();
    assert!(session.render_summary().contains("_No changes detected._"));
}

#[test]
fn test_session_over_float_snapshot() {
    let session = open_session("1.0715660391465826e-75", "null", &ViewerConfig::default()).unwrap();
    assert_eq!(session.delta().len(), 1);
    assert_eq!(session.tree().status, NodeStatus::Modified);
}
