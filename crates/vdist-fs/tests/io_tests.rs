use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use vdist_fs::io;

#[test]
fn test_list_names_includes_files_and_directories() {
    let temp = TempDir::new().unwrap();
    temp.child("0xbb").create_dir_all().unwrap();
    temp.child("0xaa").write_str("pw").unwrap();
    temp.child("slashing-db").create_dir_all().unwrap();

    let names = io::list_names(temp.path()).unwrap();

    assert_eq!(names, vec!["0xaa", "0xbb", "slashing-db"]);
}

#[test]
fn test_list_names_missing_dir_is_error() {
    let temp = TempDir::new().unwrap();
    assert!(io::list_names(&temp.path().join("absent")).is_err());
}

#[test]
fn test_copy_tree_copies_verbatim_and_lists_created_paths() {
    let src = TempDir::new().unwrap();
    src.child("0xaa/keystore.json").write_str(r#"{"crypto":{}}"#).unwrap();
    src.child("0xaa/nested/extra").write_str("x").unwrap();
    let dst = TempDir::new().unwrap();
    let target = dst.child("0xaa");

    let created = io::copy_tree(&src.path().join("0xaa"), target.path()).unwrap();

    target
        .child("keystore.json")
        .assert(predicate::str::diff(r#"{"crypto":{}}"#));
    target.child("nested/extra").assert("x");
    assert_eq!(
        created,
        vec![
            target.path().to_path_buf(),
            target.path().join("keystore.json"),
            target.path().join("nested"),
            target.path().join("nested/extra"),
        ]
    );
}

#[test]
fn test_copy_tree_refuses_existing_destination() {
    let src = TempDir::new().unwrap();
    src.child("0xaa/keystore.json").write_str("{}").unwrap();
    let dst = TempDir::new().unwrap();
    dst.child("0xaa").create_dir_all().unwrap();

    let result = io::copy_tree(&src.path().join("0xaa"), &dst.path().join("0xaa"));

    assert!(result.is_err());
}

#[test]
fn test_copy_file() {
    let src = TempDir::new().unwrap();
    src.child("0xaa").write_str("passphrase").unwrap();
    let dst = TempDir::new().unwrap();

    io::copy_file(&src.path().join("0xaa"), &dst.path().join("0xaa")).unwrap();

    dst.child("0xaa").assert("passphrase");
}

#[test]
fn test_remove_validator_deletes_keystore_and_directory() {
    let temp = TempDir::new().unwrap();
    temp.child("0xaa/keystore.json").write_str("{}").unwrap();

    io::remove_validator(&temp.path().join("0xaa")).unwrap();

    temp.child("0xaa").assert(predicate::path::missing());
}

#[test]
fn test_remove_validator_keeps_unexpected_content() {
    let temp = TempDir::new().unwrap();
    temp.child("0xaa/keystore.json").write_str("{}").unwrap();
    temp.child("0xaa/notes.txt").write_str("keep me").unwrap();

    let result = io::remove_validator(&temp.path().join("0xaa"));

    assert!(result.is_err(), "non-empty validator directory must not be removed");
    temp.child("0xaa/notes.txt").assert("keep me");
}

#[test]
fn test_remove_secret() {
    let temp = TempDir::new().unwrap();
    temp.child("0xaa").write_str("pw").unwrap();

    io::remove_secret(&temp.path().join("0xaa")).unwrap();

    temp.child("0xaa").assert(predicate::path::missing());
}
