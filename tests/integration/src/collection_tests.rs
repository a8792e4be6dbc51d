//! Collection and merge behavior across whole workspaces

use csync_core::{
    ProjectFileCollector, ReferenceResolver, Workspace, format_conflicts_report,
    references::MAIN_PROJECT_KEY,
};
use integration_tests::{setup_project, write_file};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeMap;

#[test]
fn collection_respects_ignores_excludes_and_skip_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["**/*.py"]);
    let mut config = ws.load_project_config("demo").unwrap();
    config.excludes = vec!["generated/".to_string()];
    ws.save_project_config("demo", &config).unwrap();

    write_file(dir.path(), ".gitignore", "build/\n*.log\n");
    write_file(dir.path(), ".claudeignore", "secrets.py\n");
    write_file(dir.path(), "src/app.py", "a = 1\n");
    write_file(dir.path(), "src/secrets.py", "token = 'x'\n");
    write_file(dir.path(), "build/out.py", "compiled\n");
    write_file(dir.path(), "generated/gen.py", "gen\n");
    write_file(dir.path(), ".git/hooks/hook.py", "vcs\n");

    let config = ws.load_project_config("demo").unwrap();
    let files = ProjectFileCollector::new(dir.path(), &config)
        .collect()
        .unwrap();

    assert_eq!(files.keys().collect::<Vec<_>>(), vec!["src/app.py"]);
}

#[test]
fn claudeignore_applies_to_nested_paths() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["**/*.py"]);
    write_file(dir.path(), ".claudeignore", "**/internal/**\n");
    write_file(dir.path(), "pkg/internal/hidden.py", "h = 1\n");
    write_file(dir.path(), "pkg/public.py", "p = 1\n");

    let config = ws.load_project_config("demo").unwrap();
    let files = ProjectFileCollector::new(dir.path(), &config)
        .collect()
        .unwrap();
    assert_eq!(files.keys().collect::<Vec<_>>(), vec!["pkg/public.py"]);
}

#[test]
fn negated_patterns_reinclude_files() {
    let dir = tempfile::tempdir().unwrap();
    let ws = setup_project(dir.path(), "demo", &["**/*.py"]);
    write_file(dir.path(), ".gitignore", "*.py\n!keep.py\n");
    write_file(dir.path(), "keep.py", "k = 1\n");
    write_file(dir.path(), "drop.py", "d = 1\n");

    let config = ws.load_project_config("demo").unwrap();
    let files = ProjectFileCollector::new(dir.path(), &config)
        .collect()
        .unwrap();
    assert_eq!(files.keys().collect::<Vec<_>>(), vec!["keep.py"]);
}

#[test]
fn collect_all_keys_projects_by_reference_id() {
    let main_dir = tempfile::tempdir().unwrap();
    let ref_a = tempfile::tempdir().unwrap();
    let ref_b = tempfile::tempdir().unwrap();

    let ws = setup_project(main_dir.path(), "app", &["*.py"]);
    write_file(main_dir.path(), "main.py", "m = 1\n");
    setup_project(ref_a.path(), "liba", &["*.py"]);
    write_file(ref_a.path(), "a.py", "a = 1\n");
    setup_project(ref_b.path(), "libb", &["*.py"]);
    write_file(ref_b.path(), "b.py", "b = 1\n");

    let mut config = ws.load_project_config("app").unwrap();
    config.references = vec!["liba".to_string(), "libb".to_string()];
    ws.save_project_config("app", &config).unwrap();
    let mut id_config = ws.load_project_id("app").unwrap();
    for (ref_id, dir) in [("liba", &ref_a), ("libb", &ref_b)] {
        id_config.reference_paths.insert(
            ref_id.to_string(),
            dir.path()
                .join(format!(".claudesync/{ref_id}.project.json"))
                .to_string_lossy()
                .into_owned(),
        );
    }
    ws.save_project_id("app", &id_config).unwrap();

    let mut resolver = ReferenceResolver::new(&ws);
    let by_project = resolver.collect_all("app").unwrap();

    assert_eq!(
        by_project.keys().collect::<Vec<_>>(),
        vec!["liba", "libb", MAIN_PROJECT_KEY]
    );
    assert_eq!(by_project[MAIN_PROJECT_KEY].len(), 1);
    assert_eq!(by_project["liba"].len(), 1);
    assert!(by_project["liba"]["a.py"].project_id.as_deref() == Some("liba"));
}

#[test]
fn identical_collisions_are_reported_as_identical() {
    let main_dir = tempfile::tempdir().unwrap();
    let ref_dir = tempfile::tempdir().unwrap();

    let ws = setup_project(main_dir.path(), "app", &["*.txt"]);
    write_file(main_dir.path(), "same.txt", "identical body\n");
    setup_project(ref_dir.path(), "lib", &["*.txt"]);
    write_file(ref_dir.path(), "same.txt", "identical body\n");

    let mut config = ws.load_project_config("app").unwrap();
    config.references = vec!["lib".to_string()];
    ws.save_project_config("app", &config).unwrap();
    let mut id_config = ws.load_project_id("app").unwrap();
    id_config.reference_paths.insert(
        "lib".to_string(),
        ref_dir
            .path()
            .join(".claudesync/lib.project.json")
            .to_string_lossy()
            .into_owned(),
    );
    ws.save_project_id("app", &id_config).unwrap();

    let mut resolver = ReferenceResolver::new(&ws);
    let outcome = resolver.collect_merged("app").unwrap();

    assert_eq!(outcome.conflicts.len(), 1);
    assert!(outcome.conflicts[0].identical);
    let report = format_conflicts_report(&outcome.conflicts);
    assert!(report.contains("identical"));
}

#[test]
fn workspace_discovery_from_nested_directory() {
    let dir = tempfile::tempdir().unwrap();
    setup_project(dir.path(), "demo", &["*.py"]);
    let nested = dir.path().join("src/deep/module");
    std::fs::create_dir_all(&nested).unwrap();

    let ws = Workspace::discover(&nested).unwrap();
    assert!(ws.list_projects().unwrap().contains_key("demo"));
}

proptest! {
    /// Packed framing round-trips arbitrary text content.
    #[test]
    fn packed_framing_round_trips(
        contents in proptest::collection::btree_map(
            "[a-z][a-z0-9_/]{0,20}\\.txt",
            "\\PC{0,200}",
            0..8,
        )
    ) {
        use csync_core::sync::pack;
        let contents: BTreeMap<String, String> = contents;
        let unpacked = pack::unpack(&pack::pack_contents(&contents));
        prop_assert_eq!(unpacked, contents);
    }
}
