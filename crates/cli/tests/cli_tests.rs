#![allow(clippy::unwrap_used, reason = "test code")]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn shelfscore(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shelfscore").unwrap();
    cmd.env_remove("DATABASE_URL")
        .env_remove("SHELFSCORE_DATASET")
        .env_remove("SHELFSCORE_INGEST_MODE")
        .env_remove("SHELFSCORE_SCORE_MODE")
        .env("SHELFSCORE_INGEST_PACING_MS", "0")
        .arg("--db-path")
        .arg(temp_dir.path().join("catalog.db"));
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("shelfscore").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Book catalogue with critic-score aggregation"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("shelfscore").unwrap();
    cmd.arg("serve").arg("--help").assert().success().stdout(predicate::str::contains("port"));
}

#[test]
fn test_ingest_all_prints_both_results() {
    let temp_dir = TempDir::new().unwrap();
    shelfscore(&temp_dir)
        .args(["ingest", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"booksAdded\": 6"))
        .stdout(predicate::str::contains("\"reviewsAdded\": 28"))
        .stdout(predicate::str::contains("\"validationErrors\": 1"));

    shelfscore(&temp_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"book_count\": 6"))
        .stdout(predicate::str::contains("\"review_count\": 28"));
}

#[test]
fn test_books_sorted_by_score() {
    let temp_dir = TempDir::new().unwrap();
    shelfscore(&temp_dir).args(["ingest", "all"]).assert().success();
    shelfscore(&temp_dir)
        .args(["books", "--sort", "critic_score", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project Hail Mary"))
        .stdout(predicate::str::contains("\"total\": 6"));
}

#[test]
fn test_unknown_sort_fails() {
    let temp_dir = TempDir::new().unwrap();
    shelfscore(&temp_dir)
        .args(["books", "--sort", "rating"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown book sort"));
}

#[test]
fn test_reviews_ingest_without_books_skips_everything() {
    let temp_dir = TempDir::new().unwrap();
    shelfscore(&temp_dir)
        .args(["ingest", "reviews"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reviewsAdded\": 0"))
        .stdout(predicate::str::contains("\"skippedMissingBook\": 29"));
}

#[test]
fn test_custom_dataset_file() {
    let temp_dir = TempDir::new().unwrap();
    let dataset = temp_dir.path().join("seed.json");
    std::fs::write(
        &dataset,
        r#"{"books": [{"title": "Educated", "author": "Tara Westover", "isbn": "9780399590504"}],
            "reviews": []}"#,
    )
    .unwrap();

    shelfscore(&temp_dir)
        .arg("--dataset")
        .arg(&dataset)
        .args(["ingest", "books"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"booksAdded\": 1"));
}

#[test]
fn test_recompute_requires_id_or_all() {
    let temp_dir = TempDir::new().unwrap();
    shelfscore(&temp_dir).arg("recompute").assert().failure();
    shelfscore(&temp_dir)
        .args(["recompute", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"updated\": []"));
}

#[test]
fn test_recompute_unknown_book_fails() {
    let temp_dir = TempDir::new().unwrap();
    shelfscore(&temp_dir)
        .args(["recompute", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[cfg(not(feature = "postgres"))]
#[test]
fn test_database_url_without_postgres_falls_back_to_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    shelfscore(&temp_dir)
        .env("DATABASE_URL", "postgres://catalog@localhost/shelfscore")
        .env("RUST_LOG", "warn")
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"book_count\": 0"))
        .stderr(predicate::str::contains("postgres support is not built in"));
    assert!(temp_dir.path().join("catalog.db").exists());
}
