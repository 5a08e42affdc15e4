//! Viewer API Demonstration
//!
//! Compares two versions of a plugin result set the way a review page would.
#![allow(clippy::unwrap_used, clippy::expect_used)]
//!
//! Key concepts illustrated:
//! 1. One session per view (delta computed once)
//! 2. The show-unchanged toggle re-filters without recomputing
//! 3. Applying and reverting the delta
//! 4. Parse errors as a visible error state

use deltaview_core::render::render_error_text;
use deltaview_core::{apply_delta, open_session, revert_delta, Side, Snapshot, ViewerConfig};

const BEFORE: &str = r#"{
  "plugin": "windows.pslist",
  "rows": [
    {"pid": 4, "name": "System", "threads": 120},
    {"pid": 88, "name": "smss.exe", "threads": 2},
    {"pid": 412, "name": "csrss.exe", "threads": 11}
  ]
}"#;

const AFTER: &str = r#"{
  "plugin": "windows.pslist",
  "rows": [
    {"pid": 4, "name": "System", "threads": 124},
    {"pid": 412, "name": "csrss.exe", "threads": 11},
    {"pid": 500, "name": "wininit.exe", "threads": 1}
  ],
  "truncated": false
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== DeltaView Viewer Demo ===\n");

    // ===== Part 1: Open a session =====
    let mut session = open_session(BEFORE, AFTER, &ViewerConfig::default())?;
    println!("## Full view\n");
    print!("{}", session.render_text());

    // ===== Part 2: Toggle =====
    session.toggle();
    println!("\n## Changes only\n");
    print!("{}", session.render_text());
    println!("\n(redraws so far: {})\n", session.redraws());

    // ===== Part 3: Summary and round-trip =====
    print!("{}", session.render_summary());

    let left = Snapshot::parse(Side::Left, BEFORE)?;
    let right = Snapshot::parse(Side::Right, AFTER)?;
    assert_eq!(&apply_delta(left.value(), session.delta())?, right.value());
    assert_eq!(&revert_delta(right.value(), session.delta())?, left.value());
    println!("✓ apply and revert reproduce both snapshots\n");

    // ===== Part 4: Broken input =====
    let err = open_session(BEFORE, "{\"rows\": [", &ViewerConfig::default()).unwrap_err();
    print!("{}", render_error_text(&err));

    Ok(())
}
