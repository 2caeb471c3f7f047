//! CLI command tests

use std::path::PathBuf;

use tempfile::TempDir;

use crate::commands;

fn temp_db() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("paisa.db");
    (dir, path)
}

fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}

#[test]
fn test_init_creates_database() {
    let (_dir, db_path) = temp_db();
    commands::cmd_init(&db_path).unwrap();
    assert!(db_path.exists());
}

#[test]
fn test_user_add_and_duplicate() {
    let (_dir, db_path) = temp_db();
    commands::cmd_user_add(&db_path, "asha", 5, Some("a long password")).unwrap();

    let err = commands::cmd_user_add(&db_path, "asha", 5, Some("a long password")).unwrap_err();
    assert!(err.to_string().contains("taken"), "{}", err);
}

#[test]
fn test_import_then_export_round_trip() {
    let (dir, db_path) = temp_db();
    commands::cmd_user_add(&db_path, "asha", 1, Some("a long password")).unwrap();

    let csv_path = dir.path().join("in.csv");
    std::fs::write(
        &csv_path,
        format!("date,category,amount,description\n{},Food,120.50,groceries\n", today()),
    )
    .unwrap();
    commands::cmd_import(&db_path, "asha", &csv_path).unwrap();

    let out_path = dir.path().join("out.csv");
    commands::cmd_export(&db_path, "asha", None, None, Some(&out_path)).unwrap();

    let exported = std::fs::read_to_string(&out_path).unwrap();
    assert!(exported.starts_with("date,category,kind,amount,description\n"));
    assert!(exported.contains("Food,expense,120.50,groceries"));
}

#[test]
fn test_import_unknown_user_fails() {
    let (dir, db_path) = temp_db();
    commands::cmd_init(&db_path).unwrap();

    let csv_path = dir.path().join("in.csv");
    std::fs::write(&csv_path, "date,category,amount,description\n").unwrap();

    let err = commands::cmd_import(&db_path, "ghost", &csv_path).unwrap_err();
    assert!(err.to_string().contains("No user named"), "{}", err);
}

#[test]
fn test_seed_demo_is_idempotent() {
    let (_dir, db_path) = temp_db();
    commands::cmd_seed_demo(&db_path).unwrap();
    // Second run is a no-op, not an error
    commands::cmd_seed_demo(&db_path).unwrap();
}
