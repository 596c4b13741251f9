// LogcatLens - tests/e2e_session.rs
//
// End-to-end tests for the load / filter / mark / save pipeline.
//
// These tests read real fixture files from disk, run real format detection,
// and write real files through the atomic save path. No mocks.

use logcatlens::app::feed::{LiveFeed, ReaderSource};
use logcatlens::app::history::FilterHistory;
use logcatlens::app::session::{LineOutcome, LogSession};
use logcatlens::core::converter::LogFormat;
use logcatlens::core::filter::{FilterField, FilterInputs, MatchMode};
use logcatlens::core::model::Level;
use logcatlens::platform::config;
use logcatlens::util::error::{DetectError, FileError, LogcatLensError};
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn messages(session: &LogSession) -> Vec<String> {
    session
        .visible_records()
        .map(|r| r.message.clone())
        .collect()
}

// =============================================================================
// Load and detection
// =============================================================================

#[test]
fn e2e_threadtime_fixture_detects_completely() {
    let mut session = LogSession::new();
    let summary = session
        .load_file(&fixture("threadtime_sample.log"), None)
        .unwrap();

    assert_eq!(summary.format, LogFormat::Threadtime);
    assert_eq!(summary.stats.line_count, 9);
    assert!(summary.stats.is_complete());
    assert_eq!(session.total_count(), 9);
    assert_eq!(session.converter(), LogFormat::Threadtime);

    let first = session.record_at(0).unwrap();
    assert_eq!(first.tag, "ActivityManager");
    assert_eq!(first.pid, "584");
    assert_eq!(first.tid, "601");
    assert_eq!(first.level, Level::Info);
    assert!(first.date.as_deref().unwrap().ends_with("-02-10"));
}

#[test]
fn e2e_brief_fixture_detects_with_partial_parse() {
    let mut session = LogSession::new();
    let summary = session.load_file(&fixture("brief_sample.log"), None).unwrap();

    assert_eq!(summary.format, LogFormat::Brief);
    assert_eq!(summary.stats.line_count, 6);
    assert_eq!(summary.stats.parsed_count, 5);
    assert_eq!(session.converter(), LogFormat::Brief);
    assert_eq!(session.record_at(2).unwrap().tag, "PowerUI");
    assert_eq!(session.record_at(2).unwrap().pid, "2577");
}

#[test]
fn e2e_unparseable_file_leaves_session_untouched() {
    let mut session = LogSession::new();
    session
        .load_file(&fixture("threadtime_sample.log"), None)
        .unwrap();
    session.mark(3);

    let err = session
        .load_file(&fixture("not_a_log.txt"), None)
        .unwrap_err();
    assert!(
        matches!(
            err,
            LogcatLensError::Detect(DetectError::NoMatchingFormat { line_count: 3, .. })
        ),
        "unexpected error: {err:?}"
    );
    assert_eq!(session.total_count(), 9);
    assert_eq!(session.marks().len(), 1);
    assert_eq!(session.converter(), LogFormat::Threadtime);
}

#[test]
fn e2e_missing_file_is_not_found() {
    let mut session = LogSession::new();
    let err = session
        .load_file(&fixture("does_not_exist.log"), None)
        .unwrap_err();
    assert!(matches!(
        err,
        LogcatLensError::File(FileError::NotFound { .. })
    ));
}

// =============================================================================
// Filtering and marks
// =============================================================================

#[test]
fn e2e_filters_combine() {
    let mut session = LogSession::new();
    session
        .load_file(&fixture("threadtime_sample.log"), None)
        .unwrap();

    session.set_inputs(FilterInputs {
        min_level: "W".to_string(),
        ..Default::default()
    });
    assert_eq!(session.visible_count(), 3);

    session.set_inputs(FilterInputs {
        tag: "PowerUI||Choreographer".to_string(),
        start_time: "12:34:24.000".to_string(),
        end_time: "12:34:28.000".to_string(),
        ..Default::default()
    });
    assert_eq!(
        messages(&session),
        vec![
            "Battery level 15",
            "Skipped 31 frames!  The application may be doing too much work"
        ]
    );

    session.set_inputs(FilterInputs {
        message: "PowerUI".to_string(),
        ..Default::default()
    });
    assert_eq!(session.visible_count(), 0);

    session.set_inputs(FilterInputs {
        pid: "584".to_string(),
        tid: "601".to_string(),
        ..Default::default()
    });
    assert_eq!(session.visible_count(), 2);
}

#[test]
fn e2e_add_keyword_then_refilter() {
    let mut session = LogSession::new();
    session
        .load_file(&fixture("threadtime_sample.log"), None)
        .unwrap();

    assert!(session
        .inputs_mut()
        .add_keyword(FilterField::Pid, "2577", MatchMode::Or));
    assert!(session
        .inputs_mut()
        .add_keyword(FilterField::Pid, "1023", MatchMode::Or));
    assert!(!session
        .inputs_mut()
        .add_keyword(FilterField::Pid, "1023", MatchMode::Or));
    assert_eq!(session.inputs().pid, "2577||1023");

    session.refilter();
    assert_eq!(session.visible_count(), 5);
}

#[test]
fn e2e_marks_follow_records_across_filters() {
    let mut session = LogSession::new();
    session
        .load_file(&fixture("threadtime_sample.log"), None)
        .unwrap();

    // Marked out of time order; the list stays time-ordered.
    assert_eq!(session.toggle_mark(4), Some(true)); // FATAL EXCEPTION
    assert_eq!(session.toggle_mark(1), Some(true)); // Slow operation
    assert_eq!(session.marks().get(0).unwrap().record.pid, "584");

    session.set_inputs(FilterInputs {
        tag: "AndroidRuntime".to_string(),
        ..Default::default()
    });
    assert_eq!(session.marks().len(), 1);
    assert_eq!(session.hidden_mark_count(), 1);
    let row = session.scroll_target(0).unwrap();
    assert_eq!(row, 0);
    assert_eq!(
        session.record_at(row).unwrap().message,
        "FATAL EXCEPTION: main"
    );

    session.set_inputs(FilterInputs::default());
    assert_eq!(session.marks().len(), 2);
    assert_eq!(session.scroll_target(0), Some(1));
    assert_eq!(session.scroll_target(1), Some(4));
}

// =============================================================================
// Save
// =============================================================================

#[test]
fn e2e_save_then_reload_round_trips() {
    let dir = TempDir::new().unwrap();
    let saved = dir.path().join("saved.log");

    let mut session = LogSession::new();
    session
        .load_file(&fixture("threadtime_sample.log"), None)
        .unwrap();
    session.save_file(&saved).unwrap();

    let text = std::fs::read_to_string(&saved).unwrap();
    assert!(text.starts_with("# Log file saved by LogcatLens\n"));
    assert!(text.contains("# Total entries: 9\n"));
    assert!(text.contains("02-10 12:34:20.101    584    601 I ActivityManager: Start proc"));

    let mut reloaded = LogSession::new();
    let summary = reloaded.load_file(&saved, None).unwrap();
    assert_eq!(summary.format, LogFormat::Threadtime);
    assert!(summary.stats.is_complete());
    assert_eq!(reloaded.records(), session.records());
}

#[test]
fn e2e_save_over_existing_file_is_atomic() {
    let dir = TempDir::new().unwrap();
    let saved = dir.path().join("saved.log");
    std::fs::write(&saved, "previous contents").unwrap();

    let mut session = LogSession::new();
    session.load_file(&fixture("brief_sample.log"), None).unwrap();
    assert_eq!(session.save_file(&saved).unwrap(), 5);

    let text = std::fs::read_to_string(&saved).unwrap();
    assert!(text.contains("# Total entries: 5"));
    assert!(!text.contains("previous contents"));
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

// =============================================================================
// Live feed
// =============================================================================

#[test]
fn e2e_live_stream_of_fixture() {
    let content = std::fs::read_to_string(fixture("threadtime_sample.log")).unwrap();
    let mut session = LogSession::new();
    session.inputs_mut().tag = "PowerUI".to_string();

    let mut rows = Vec::new();
    let stats = LiveFeed::new()
        .pump(
            &mut session,
            &mut ReaderSource::new(Cursor::new(content)),
            |_, outcome| {
                if let LineOutcome::Visible { row } = outcome {
                    rows.push(row);
                }
            },
        )
        .unwrap();

    assert_eq!(rows, vec![0, 1, 2]);
    assert_eq!(stats.hidden, 6);
    // The two buffer banners reach the converter and are rejected.
    assert_eq!(stats.rejected, 2);
    assert_eq!(session.total_count(), 9);
}

// =============================================================================
// Config and history
// =============================================================================

#[test]
fn e2e_config_drives_candidates_and_filters() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[detection]\ncandidates = [\"brief\"]\n\n[filters]\nmin_level = \"E\"\n",
    )
    .unwrap();

    let (app_config, warnings) = config::load_config(&path);
    assert!(warnings.is_empty(), "{warnings:?}");

    let mut session = LogSession::with_candidates(app_config.candidates.clone());
    let err = session
        .load_file(&fixture("threadtime_sample.log"), None)
        .unwrap_err();
    assert!(matches!(err, LogcatLensError::Detect(_)));

    session.load_file(&fixture("brief_sample.log"), None).unwrap();
    session.set_inputs(app_config.default_filters.clone());
    assert_eq!(messages(&session), vec!["FATAL EXCEPTION: main"]);
}

#[test]
fn e2e_history_tracks_applied_filters_across_loads() {
    let mut session = LogSession::new().with_history_capacity(5);
    session
        .load_file(&fixture("threadtime_sample.log"), None)
        .unwrap();
    session.set_inputs(FilterInputs {
        tag: "PowerUI".to_string(),
        min_level: "W".to_string(),
        ..Default::default()
    });

    // A new load clears the inputs but keeps what was applied before.
    session.load_file(&fixture("brief_sample.log"), None).unwrap();
    assert_eq!(session.inputs(), &FilterInputs::default());
    session.inputs_mut().tag = "ActivityManager".to_string();
    session.refilter();
    assert_eq!(session.visible_count(), 3);

    let history: &FilterHistory = session.history();
    assert_eq!(
        history.entries(FilterField::Tag),
        vec!["PowerUI", "ActivityManager"]
    );

    session.inputs_mut().tag = "draft".to_string();
    assert!(session.recall_previous(FilterField::Tag));
    assert!(session.recall_previous(FilterField::Tag));
    assert_eq!(session.inputs().tag, "PowerUI");
    assert!(session.recall_next(FilterField::Tag));
    assert!(session.recall_next(FilterField::Tag));
    assert_eq!(session.inputs().tag, "draft");
}
