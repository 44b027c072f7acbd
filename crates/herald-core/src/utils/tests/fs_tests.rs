use std::fs::{self, File};
use tempfile::tempdir;

use crate::utils::fs::{files_with_extensions, subdirectory_names};

#[test]
fn test_files_with_extensions_filters_and_sorts() {
    let temp_dir = tempdir().unwrap();
    let base_path = temp_dir.path();

    let nested = base_path.join("nested");
    fs::create_dir(&nested).unwrap();

    File::create(base_path.join("20-second.yaml")).unwrap();
    File::create(base_path.join("10-first.YML")).unwrap(); // For case-insensitivity test
    File::create(base_path.join("30-third.json")).unwrap();
    File::create(base_path.join("notes.txt")).unwrap();
    File::create(base_path.join("no_ext")).unwrap();
    File::create(nested.join("deep.yaml")).unwrap();

    let files = files_with_extensions(base_path, &["yaml", "yml", "json"]).unwrap();
    assert_eq!(
        files,
        vec![
            base_path.join("10-first.YML"),
            base_path.join("20-second.yaml"),
            base_path.join("30-third.json"),
        ],
        "Only direct children with a wanted extension, in path order"
    );
}

#[test]
fn test_files_with_extensions_missing_or_empty_dir() {
    let temp_dir = tempdir().unwrap();

    let missing = temp_dir.path().join("not_real_at_all");
    assert!(files_with_extensions(&missing, &["yaml"]).unwrap().is_empty());

    let empty_dir = temp_dir.path().join("empty_dir");
    fs::create_dir(&empty_dir).unwrap();
    assert!(files_with_extensions(&empty_dir, &["yaml"]).unwrap().is_empty());
}

#[test]
fn test_subdirectory_names() {
    let temp_dir = tempdir().unwrap();
    let base_path = temp_dir.path();

    fs::create_dir(base_path.join("user.login")).unwrap();
    fs::create_dir(base_path.join("app.start")).unwrap();
    File::create(base_path.join("stray.yaml")).unwrap();

    let names = subdirectory_names(base_path).unwrap();
    assert_eq!(names, vec!["app.start".to_string(), "user.login".to_string()]);

    assert!(subdirectory_names(base_path.join("missing")).unwrap().is_empty());
}
