//! End-to-end sync flows against the in-memory provider
//!
//! These tests exercise the complete push path: workspace discovery,
//! collection, reference merging, and reconciliation.

use csync_core::{Compression, ProjectConfig, ProjectIdConfig, Workspace, sync};
use integration_tests::{MockProvider, fast_settings, setup_project, write_file};
use pretty_assertions::assert_eq;
use std::path::Path;

#[test]
fn first_push_uploads_everything() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py"]);
    write_file(dir.path(), "a.py", "x = 1\n");
    write_file(dir.path(), "b.py", "y = 2\n");

    let provider = MockProvider::new();
    let report = sync::push(&provider, &ws, &fast_settings(), None, "demo", false).unwrap();

    assert_eq!(report.uploaded, 2);
    assert_eq!(report.updated, 0);
    let mut names = provider.file_names();
    names.sort();
    assert_eq!(names, vec!["a.py", "b.py"]);
}

#[test]
fn second_push_of_unchanged_tree_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py"]);
    write_file(dir.path(), "a.py", "x = 1\n");

    let provider = MockProvider::new();
    sync::push(&provider, &ws, &fast_settings(), None, "demo", false).unwrap();
    provider.clear_log();

    let report = sync::push(&provider, &ws, &fast_settings(), None, "demo", false).unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.remote_mutations(), 0);
    assert!(provider.mutations().is_empty(), "no mutations expected");
}

#[test]
fn modified_file_is_replaced_with_one_delete_and_one_upload() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py"]);
    write_file(dir.path(), "a.py", "x = 1\n");
    write_file(dir.path(), "b.py", "y = 2\n");

    let provider = MockProvider::new();
    sync::push(&provider, &ws, &fast_settings(), None, "demo", false).unwrap();
    provider.clear_log();

    write_file(dir.path(), "a.py", "x = 99\n");
    let report = sync::push(&provider, &ws, &fast_settings(), None, "demo", false).unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.uploaded, 0);
    assert_eq!(provider.mutations(), vec!["delete a.py", "upload a.py"]);
}

#[test]
fn dry_run_reports_the_plan_without_mutating() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py"]);
    write_file(dir.path(), "a.py", "x = 1\n");
    write_file(dir.path(), "b.py", "y = 2\n");

    let provider = MockProvider::new();
    provider.seed_file("b.py", "old b\n", "2024-06-01T10:00:00.000000Z");
    provider.seed_file("stray.py", "s\n", "2024-06-01T10:00:00.000000Z");

    let mut settings = fast_settings();
    settings.prune_remote_files = true;
    let report = sync::push(&provider, &ws, &settings, None, "demo", true).unwrap();

    assert_eq!(report.uploaded, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(report.pruned, 1);
    assert!(provider.mutations().is_empty(), "dry run must not mutate");
    assert_eq!(provider.files().len(), 2);
}

#[test]
fn remote_strays_survive_unless_prune_is_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py"]);
    write_file(dir.path(), "kept.py", "k = 1\n");

    let provider = MockProvider::new();
    provider.seed_file("stray.py", "old\n", "2024-06-01T10:00:00.000000Z");

    let report = sync::push(&provider, &ws, &fast_settings(), None, "demo", false).unwrap();
    assert_eq!(report.pruned, 0);
    assert!(provider.file_names().contains(&"stray.py".to_string()));

    let mut settings = fast_settings();
    settings.prune_remote_files = true;
    let report = sync::push(&provider, &ws, &settings, None, "demo", false).unwrap();
    assert_eq!(report.pruned, 1);
    assert!(!provider.file_names().contains(&"stray.py".to_string()));
}

#[test]
fn two_way_downloads_remote_only_files_instead_of_pruning() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py"]);

    let provider = MockProvider::new();
    provider.seed_file(
        "remote/new.py",
        "from_remote = True\n",
        "2024-06-01T10:00:00.000000Z",
    );

    let mut settings = fast_settings();
    settings.two_way_sync = true;
    settings.prune_remote_files = true;
    let report = sync::push(&provider, &ws, &settings, None, "demo", false).unwrap();

    assert_eq!(report.downloaded, 1);
    assert_eq!(report.pruned, 0, "downloaded files must not be pruned");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("remote/new.py")).unwrap(),
        "from_remote = True\n"
    );
    assert!(provider.file_names().contains(&"remote/new.py".to_string()));
}

#[test]
fn downloaded_file_mtime_matches_remote_created_at() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py"]);

    let provider = MockProvider::new();
    provider.seed_file("old.py", "x\n", "2024-06-01T10:00:00.000000Z");

    let mut settings = fast_settings();
    settings.two_way_sync = true;
    sync::push(&provider, &ws, &settings, None, "demo", false).unwrap();

    let expected = chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp();
    let meta = std::fs::metadata(dir.path().join("old.py")).unwrap();
    let mtime = filetime::FileTime::from_last_modification_time(&meta);
    assert_eq!(mtime.unix_seconds(), expected);
}

#[test]
fn rate_limited_uploads_are_retried_until_they_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py"]);
    write_file(dir.path(), "a.py", "x = 1\n");

    let provider = MockProvider::new();
    provider.fail_next(2, Some(403), "403 Forbidden");

    let report = sync::push(&provider, &ws, &fast_settings(), None, "demo", false).unwrap();
    assert_eq!(report.uploaded, 1);
    assert_eq!(provider.file_names(), vec!["a.py"]);
}

#[test]
fn non_rate_limit_errors_fail_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py"]);
    write_file(dir.path(), "a.py", "x = 1\n");

    let provider = MockProvider::new();
    provider.fail_next(1, Some(500), "server error");

    let err = sync::push(&provider, &ws, &fast_settings(), None, "demo", false).unwrap_err();
    assert!(err.to_string().contains("server error"));
    assert!(provider.files().is_empty());
}

#[test]
fn missing_organization_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py"]);

    let mut settings = fast_settings();
    settings.active_organization_id = None;
    let err = sync::push(&MockProvider::new(), &ws, &settings, None, "demo", false).unwrap_err();
    assert!(err.to_string().contains("organization"));
}

#[test]
fn packed_push_uploads_one_artifact_that_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py", "*.md"]);
    write_file(dir.path(), "a.py", "x = 1\n");
    // Content that looks like packed framing for another path
    write_file(
        dir.path(),
        "notes.md",
        "--- BEGIN FILE: fake.txt ---\nnot a frame\n--- END FILE: fake.txt ---\n",
    );

    let provider = MockProvider::new();
    provider.seed_file(
        "claudesync_packed_20240101000000.dat",
        "stale artifact",
        "2024-01-01T00:00:00.000000Z",
    );

    let mut settings = fast_settings();
    settings.compression_algorithm = Compression::Gzip;
    let report = sync::push(&provider, &ws, &settings, None, "demo", false).unwrap();

    assert_eq!(report.uploaded, 2);
    let files = provider.files();
    assert_eq!(files.len(), 1, "stale artifact must be cleaned up");

    let packed = sync::pack::decode(&files[0].content, Compression::Gzip).unwrap();
    let contents = sync::pack::unpack(&packed);
    assert_eq!(contents["a.py"], "x = 1\n");
    assert_eq!(
        contents["notes.md"],
        "--- BEGIN FILE: fake.txt ---\nnot a frame\n--- END FILE: fake.txt ---\n"
    );
}

#[test]
fn packed_two_way_materializes_only_files_that_differ() {
    use std::collections::BTreeMap;

    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["*.py"]);
    write_file(dir.path(), "a.py", "x = 1\n");

    // Pin a sentinel mtime so an unnecessary rewrite would show up
    let sentinel = filetime::FileTime::from_unix_time(1_000_000, 0);
    filetime::set_file_mtime(dir.path().join("a.py"), sentinel).unwrap();

    let remote_contents = BTreeMap::from([
        ("a.py".to_string(), "x = 1\n".to_string()),
        ("remote/new.py".to_string(), "z = 3\n".to_string()),
    ]);
    let artifact = sync::pack::encode(
        &sync::pack::pack_contents(&remote_contents),
        Compression::Gzip,
    )
    .unwrap();
    let provider = MockProvider::new();
    provider.seed_file(
        "claudesync_packed_20240101000000.dat",
        &artifact,
        "2024-01-01T00:00:00.000000Z",
    );

    let mut settings = fast_settings();
    settings.compression_algorithm = Compression::Gzip;
    settings.two_way_sync = true;
    let report = sync::push(&provider, &ws, &settings, None, "demo", false).unwrap();

    assert_eq!(report.downloaded, 1, "identical a.py must not be rewritten");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("remote/new.py")).unwrap(),
        "z = 3\n"
    );
    let mtime = filetime::FileTime::from_last_modification_time(
        &std::fs::metadata(dir.path().join("a.py")).unwrap(),
    );
    assert_eq!(mtime.unix_seconds(), sentinel.unix_seconds());
}

fn link_reference(ws: &Workspace, project: &str, ref_id: &str, ref_config: &Path) {
    let mut config = ws.load_project_config(project).unwrap();
    config.references.push(ref_id.to_string());
    ws.save_project_config(project, &config).unwrap();

    let mut id_config = ws.load_project_id(project).unwrap();
    id_config.reference_paths.insert(
        ref_id.to_string(),
        ref_config.to_string_lossy().into_owned(),
    );
    ws.save_project_id(project, &id_config).unwrap();
}

#[test]
fn push_includes_referenced_project_files() {
    let main_dir = tempfile::tempdir().unwrap();
    let ref_dir = tempfile::tempdir().unwrap();

    let ws = setup_project(main_dir.path(), "app", &["*.py"]);
    write_file(main_dir.path(), "main.py", "m = 1\n");

    setup_project(ref_dir.path(), "lib", &["*.py"]);
    write_file(ref_dir.path(), "util.py", "u = 2\n");

    link_reference(
        &ws,
        "app",
        "lib",
        &ref_dir.path().join(".claudesync/lib.project.json"),
    );

    let provider = MockProvider::new();
    let report = sync::push(&provider, &ws, &fast_settings(), None, "app", false).unwrap();

    assert_eq!(report.uploaded, 2);
    let mut names = provider.file_names();
    names.sort();
    assert_eq!(names, vec!["main.py", "util.py"]);
}

#[test]
fn broken_reference_falls_back_to_main_project_only() {
    let main_dir = tempfile::tempdir().unwrap();
    let ws = setup_project(main_dir.path(), "app", &["*.py"]);
    write_file(main_dir.path(), "main.py", "m = 1\n");

    // Reference declared but with no path mapping
    let mut config = ws.load_project_config("app").unwrap();
    config.references.push("ghost".to_string());
    ws.save_project_config("app", &config).unwrap();

    let provider = MockProvider::new();
    let report = sync::push(&provider, &ws, &fast_settings(), None, "app", false).unwrap();

    assert_eq!(report.uploaded, 1);
    assert_eq!(provider.file_names(), vec!["main.py"]);
}

#[test]
fn main_project_wins_reference_collisions_on_push() {
    let main_dir = tempfile::tempdir().unwrap();
    let ref_dir = tempfile::tempdir().unwrap();

    let ws = setup_project(main_dir.path(), "app", &["*.py"]);
    write_file(main_dir.path(), "shared.py", "main = True\n");

    setup_project(ref_dir.path(), "lib", &["*.py"]);
    write_file(ref_dir.path(), "shared.py", "main = False\n");

    link_reference(
        &ws,
        "app",
        "lib",
        &ref_dir.path().join(".claudesync/lib.project.json"),
    );

    let provider = MockProvider::new();
    sync::push(&provider, &ws, &fast_settings(), None, "app", false).unwrap();

    let files = provider.files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].content, "main = True\n");
}

#[test]
fn push_without_remote_id_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join(".claudesync");
    std::fs::create_dir_all(&config_dir).unwrap();
    let ws = Workspace::from_config_dir(&config_dir);
    ws.save_project_config("new", &ProjectConfig::new("new"))
        .unwrap();
    ws.save_project_id("new", &ProjectIdConfig::default())
        .unwrap();

    let err = sync::push(&MockProvider::new(), &ws, &fast_settings(), None, "new", false).unwrap_err();
    assert!(err.to_string().contains("remote project id"));
}
