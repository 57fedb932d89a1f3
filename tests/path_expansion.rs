// tests/path_expansion.rs

use std::fs;
use std::path::{Path, PathBuf};

use pausewatch::fs::mock::MockFileSystem;
use pausewatch::fs::RealFileSystem;
use pausewatch::watch::path_utils::{files_under, resolve_paths, watch_targets};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn blank_entries_are_dropped() {
    let resolved = resolve_paths(&strings(&["src", "  ", "", " docs "]), Path::new("/work"));
    assert_eq!(resolved, vec![PathBuf::from("src"), PathBuf::from("docs")]);
}

#[test]
fn nothing_usable_means_the_default_directory() {
    assert_eq!(resolve_paths(&[], Path::new("/work")), vec![PathBuf::from("/work")]);
    assert_eq!(
        resolve_paths(&strings(&["", "\t"]), Path::new("/work")),
        vec![PathBuf::from("/work")]
    );
}

#[test]
fn mock_tree_expands_to_sorted_files() {
    let fs = MockFileSystem::new();
    fs.add_file("./src/main.rs");
    fs.add_file("./src/deep/er/mod.rs");
    fs.add_file("./README.md");
    fs.add_dir("./empty");

    let files = files_under(&fs, Path::new(".")).unwrap();

    assert_eq!(
        files,
        vec![
            PathBuf::from("./README.md"),
            PathBuf::from("./src/deep/er/mod.rs"),
            PathBuf::from("./src/main.rs"),
        ]
    );
    assert!(watch_targets(&fs, Path::new("./empty"), true).unwrap().is_empty());
}

#[test]
fn files_and_non_recursive_roots_are_watched_as_given() {
    let fs = MockFileSystem::new();
    fs.add_file("./src/main.rs");

    assert_eq!(
        watch_targets(&fs, Path::new("./src/main.rs"), true).unwrap(),
        vec![PathBuf::from("./src/main.rs")]
    );
    assert_eq!(
        watch_targets(&fs, Path::new("./src"), false).unwrap(),
        vec![PathBuf::from("./src")]
    );
}

#[test]
fn real_directory_tree_is_walked() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a/b")).unwrap();
    fs::write(dir.path().join("a/b/c.txt"), "c").unwrap();
    fs::write(dir.path().join("top.txt"), "t").unwrap();

    let files = files_under(&RealFileSystem, dir.path()).unwrap();

    assert_eq!(
        files,
        vec![dir.path().join("a/b/c.txt"), dir.path().join("top.txt")]
    );
}
