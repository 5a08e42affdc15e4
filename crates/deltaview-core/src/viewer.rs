//! Viewer entry point: two snapshot texts in, one ready render session out.

use crate::config::ViewerConfig;
use crate::core_types::RequestContext;
use crate::delta::engine::compute_delta;
use crate::errors::Result;
use crate::render::session::RenderSession;
use crate::render::tree::build_tree;
use crate::snapshot::{Side, Snapshot};
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Open a render session for two snapshot texts with a fresh request id.
///
/// # Errors
///
/// See [`open_session_with_context`].
pub fn open_session(
    left_text: &str,
    right_text: &str,
    config: &ViewerConfig,
) -> Result<RenderSession> {
    open_session_with_context(RequestContext::new(), left_text, right_text, config)
}

/// Open a render session for two snapshot texts.
///
/// Computes the delta exactly once, builds the tree and performs the
/// initial render. On failure nothing is returned but the error, which
/// carries the request id of `context`.
///
/// # Errors
///
/// - `Parse` - either text is not JSON (side, line and column recorded)
/// - `Render` - the delta could not be replayed into a tree
/// - `InvalidConfig` - `config` fails validation
pub fn open_session_with_context(
    context: RequestContext,
    left_text: &str,
    right_text: &str,
    config: &ViewerConfig,
) -> Result<RenderSession> {
    open_session_from_bytes_with_context(
        context,
        left_text.as_bytes(),
        right_text.as_bytes(),
        config,
    )
}

/// Open a render session for two raw snapshot files with a fresh request id.
///
/// # Errors
///
/// See [`open_session_from_bytes_with_context`].
pub fn open_session_from_bytes(
    left: &[u8],
    right: &[u8],
    config: &ViewerConfig,
) -> Result<RenderSession> {
    open_session_from_bytes_with_context(RequestContext::new(), left, right, config)
}

/// Bytes that are not UTF-8 are a `Parse` error for their side, like any
/// other malformed snapshot.
///
/// # Errors
///
/// As [`open_session_with_context`].
pub fn open_session_from_bytes_with_context(
    context: RequestContext,
    left: &[u8],
    right: &[u8],
    config: &ViewerConfig,
) -> Result<RenderSession> {
    let started = Instant::now();
    log_op_start!(
        "open_session",
        request_id = %context.request_id,
        left_bytes = left.len(),
        right_bytes = right.len()
    );

    match build_session(&context, left, right, config) {
        Ok(session) => {
            log_op_end!(
                "open_session",
                duration_ms = started.elapsed().as_millis() as u64,
                request_id = %context.request_id,
                op_count = session.delta().len(),
                visible_count = session.view().visible_count()
            );
            Ok(session)
        }
        Err(err) => {
            let mut err = err.with_request_id(context.request_id.clone());
            if let Some(trace_id) = &context.trace_id {
                err = err.with_trace_id(trace_id.clone());
            }
            log_op_error!(
                "open_session",
                err.clone(),
                duration_ms = started.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

fn build_session(
    context: &RequestContext,
    left: &[u8],
    right: &[u8],
    config: &ViewerConfig,
) -> Result<RenderSession> {
    config.validate().map_err(|e| e.with_op("open_session"))?;

    let left = Snapshot::parse_bytes(Side::Left, left).map_err(|e| e.with_op("open_session"))?;
    let right =
        Snapshot::parse_bytes(Side::Right, right).map_err(|e| e.with_op("open_session"))?;

    let delta = compute_delta(left.value(), right.value(), &config.diff_options())?;
    let tree = build_tree(left.value(), &delta)?;

    Ok(RenderSession::new(
        context.clone(),
        delta,
        tree,
        config.initial_toggle(),
        config.max_value_width,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::RequestId;
    use crate::errors::ExErrorKind;
    use crate::render::session::ToggleState;

    #[test]
    fn test_open_session_renders_once() {
        let session =
            open_session(r#"{"a":1,"b":2}"#, r#"{"a":1,"b":3,"c":4}"#, &ViewerConfig::default())
                .unwrap();
        assert_eq!(session.redraws(), 1);
        assert_eq!(session.delta().len(), 2);
        assert_eq!(session.toggle_state(), ToggleState::On);
    }

    #[test]
    fn test_parse_error_carries_request_id() {
        let ctx = RequestContext::with_request_id(RequestId::from_string("req-7".to_string()));
        let err = open_session_with_context(ctx, "{not valid json", "{}", &ViewerConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Parse);
        assert_eq!(err.side(), Some(Side::Left));
        assert_eq!(err.request_id().map(|r| r.as_str()), Some("req-7"));
    }

    #[test]
    fn test_invalid_utf8_is_parse_error_for_its_side() {
        let err = open_session_from_bytes(b"{}", b"{\"a\":\"\xff\"}", &ViewerConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Parse);
        assert_eq!(err.side(), Some(Side::Right));
        assert_eq!(err.op(), Some("open_session"));
    }

    #[test]
    fn test_config_initial_toggle() {
        let config = ViewerConfig {
            show_unchanged: false,
            ..ViewerConfig::default()
        };
        let session = open_session("[1,2]", "[1,3]", &config).unwrap();
        assert_eq!(session.toggle_state(), ToggleState::Off);
        assert_eq!(session.view().hidden_count(), 1);
    }
}
