// IssueTag - tests/e2e_convert.rs
//
// End-to-end tests for the convert pipeline: a build log fixture on disk,
// a real profile store in a temporary directory, real config.toml parsing,
// and an in-memory clipboard standing in for the system one.

use issuetag::app::profile_store::ProfileStore;
use issuetag::app::state::AppState;
use issuetag::app::watch::{ClipboardWatcher, PollOutcome, WatchSettings};
use issuetag::core::extractor::IssueExtractor;
use issuetag::platform::clipboard::MemoryClipboard;
use issuetag::platform::config::load_config;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to an on-disk fixture file.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn build_log() -> String {
    std::fs::read_to_string(fixture("xcode_build.log")).expect("fixture must exist")
}

const EXPECTED_ISSUES: &[&str] = &[
    "/Users/dev/MyApp/Sources/ContentView.swift:12:9: error: cannot find 'viewModel' in scope",
    "/Users/dev/MyApp/Sources/ContentView.swift:30:5: warning: variable 'x' was never mutated; consider changing to 'let' constant",
    "/Users/dev/MyApp/Sources/Network.swift:3:8: error: no such module 'Alamofire'",
    "/Users/dev/MyApp/Sources/Helpers.swift:44:17: Initialization of immutable value 'unused' was never used",
    "Undefined symbol: _OBJC_CLASS_$_Analytics",
    "Command SwiftCompile failed with a nonzero exit code",
    "** BUILD FAILED **",
];

// =============================================================================
// Extraction E2E
// =============================================================================

/// The fixture log yields its project diagnostics in order, once each.
#[test]
fn e2e_extracts_fixture_issues_in_order() {
    let extraction = IssueExtractor::default().extract_issues(&build_log());
    assert_eq!(extraction.issues, EXPECTED_ISSUES);
    assert_eq!(extraction.duplicate_lines, 1);
}

/// System header and toolchain lines never appear in the output.
#[test]
fn e2e_system_paths_are_excluded() {
    let output = issuetag::extract(&build_log());
    assert!(!output.contains("/Applications/"), "output: {output}");
    assert!(!output.contains("/Library/"), "output: {output}");
}

/// Rendered output numbers issues from 1 with blank lines between them.
#[test]
fn e2e_rendered_tags_are_numbered() {
    let output = issuetag::extract(&build_log());
    let blocks: Vec<&str> = output.split("\n\n").collect();
    assert_eq!(blocks.len(), EXPECTED_ISSUES.len());
    for (i, (block, issue)) in blocks.iter().zip(EXPECTED_ISSUES).enumerate() {
        let n = i + 1;
        assert_eq!(*block, format!("<issue{n}>{issue}</issue{n}>"));
    }
}

/// Converting already-converted output gives the same result.
#[test]
fn e2e_reconverting_output_is_stable() {
    let once = issuetag::extract(&build_log());
    assert_eq!(issuetag::extract(&once), once);
}

// =============================================================================
// Profiles + conversion E2E
// =============================================================================

/// A saved profile chosen in one session frames output in the next.
#[test]
fn e2e_last_used_profile_frames_next_session() {
    let dir = TempDir::new().unwrap();
    let store = ProfileStore::new(dir.path());

    {
        let mut state = AppState::load(&store).unwrap();
        state
            .save_profile(&store, "ci", "Hi team, please fix:", "Thanks")
            .unwrap();
        state.select(&store, "ci").unwrap();
    }

    let state = AppState::load(&store).unwrap();
    assert_eq!(state.selected.as_deref(), Some("ci"));

    let conversion = state.convert(&IssueExtractor::default(), "warning: something odd");
    assert_eq!(
        conversion.output,
        "Hi team, please fix:\n\n<issue1>warning: something odd</issue1>\n\nThanks"
    );
}

/// Deleting the selected profile falls back to unframed output.
#[test]
fn e2e_deleted_profile_is_not_applied() {
    let dir = TempDir::new().unwrap();
    let store = ProfileStore::new(dir.path());
    store.save("ci", "Hi team", "Thanks").unwrap();
    store.set_last_used("ci").unwrap();
    store.delete("ci").unwrap();

    assert!(!store.load_all().unwrap().contains_key("ci"));
    let state = AppState::load(&store).unwrap();
    let conversion = state.convert(&IssueExtractor::default(), "error: x");
    assert_eq!(conversion.output, "<issue1>error: x</issue1>");
}

/// Extra rules from config.toml change classification end to end.
#[test]
fn e2e_config_rules_reach_the_extractor() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "[extractor]\nignore_paths = [\"Sources/Helpers.swift\"]\nkeywords = [\"BUILD\"]\n",
    )
    .unwrap();

    let (config, warnings) = load_config(&config_path);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let extractor =
        IssueExtractor::with_extra_rules(&config.extra_ignore_paths, &config.extra_keywords);
    let extraction = extractor.extract_issues(&build_log());

    assert!(!extraction
        .issues
        .iter()
        .any(|i| i.contains("Helpers.swift")));
    assert!(extraction
        .issues
        .iter()
        .any(|i| i.starts_with("Build target MyApp")));
}

// =============================================================================
// Watch E2E
// =============================================================================

/// Copying the build log converts it in place; the next poll leaves it alone.
#[test]
fn e2e_watch_converts_copied_log() {
    let dir = TempDir::new().unwrap();
    let store = ProfileStore::new(dir.path());
    store.save("ci", "Hi team", "Thanks").unwrap();
    store.set_last_used("ci").unwrap();

    let state = AppState::load(&store).unwrap();
    let extractor = IssueExtractor::default();
    let settings = WatchSettings {
        poll_interval: Duration::ZERO,
        settle_delay: Duration::from_millis(1),
    };
    let mut watcher = ClipboardWatcher::new(&state, &extractor, settings);
    let mut clipboard = MemoryClipboard::with_text(&build_log());

    match watcher.poll_once(&mut clipboard).unwrap() {
        PollOutcome::Converted(conversion) => {
            assert_eq!(conversion.extraction.len(), EXPECTED_ISSUES.len());
            assert_eq!(conversion.profile.as_deref(), Some("ci"));
        }
        other => panic!("expected a conversion, got {other:?}"),
    }

    let content = clipboard.content.clone().unwrap();
    assert!(content.starts_with("Hi team\n\n<issue1>"));
    assert!(content.ends_with("</issue7>\n\nThanks"));

    assert_eq!(watcher.poll_once(&mut clipboard).unwrap(), PollOutcome::Unchanged);
    assert_eq!(clipboard.writes, 1);
}
