//! CLI integration tests using assert_cmd.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BANK: &str = "\
1. Capital of France?
A. Lyon
B. Paris*
C. Nice
D. Lille

2. 2 + 2?
A. 4*
B. 3
C. 5
D. 22
";

fn quizshow() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quizshow").unwrap()
}

fn write_bank(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn validate_valid_bank() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, "quiz.txt", BANK);

    quizshow()
        .arg("validate")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .success()
        .stdout(predicate::str::contains("quiz.txt (2 questions)"))
        .stdout(predicate::str::contains("All banks valid"));
}

#[test]
fn validate_reports_skipped_block() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(
        &dir,
        "broken.txt",
        "1. Complete?\nA. a*\nB. b\nC. c\nD. d\n2. Broken?\nA. a\nB. b\nC. c\n",
    );

    quizshow()
        .arg("validate")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 questions)"))
        .stdout(predicate::str::contains("[#2] WARNING"))
        .stdout(predicate::str::contains("only 3 of 4 options recognized"));
}

#[test]
fn validate_directory() {
    let dir = TempDir::new().unwrap();
    write_bank(&dir, "first.txt", BANK);
    write_bank(&dir, "second.txt", BANK);
    write_bank(&dir, "notes.md", "not a bank");

    quizshow()
        .arg("validate")
        .arg("--bank")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("first.txt"))
        .stdout(predicate::str::contains("second.txt"))
        .stdout(predicate::str::contains("notes.md").not());
}

#[test]
fn validate_nonexistent_file() {
    quizshow()
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn play_full_game() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, "quiz.txt", BANK);

    quizshow()
        .current_dir(dir.path())
        .arg("play")
        .arg("--bank")
        .arg(&bank)
        .write_stdin("b\nA\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 2"))
        .stdout(predicate::str::contains("Final result: 2 / 2"))
        .stdout(predicate::str::contains("¡PERFECTO!"));
}

#[test]
fn play_reviews_incorrect_answers() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, "quiz.txt", BANK);

    quizshow()
        .current_dir(dir.path())
        .arg("play")
        .arg("--bank")
        .arg(&bank)
        .write_stdin("Z\nC\nA\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("invalid answer label 'Z'"))
        .stdout(predicate::str::contains("Final result: 1 / 2"))
        .stdout(predicate::str::contains("Incorrect answers"))
        .stdout(predicate::str::contains("Your answer: C. Nice"))
        .stdout(predicate::str::contains("Sigue practicando"));
}

#[test]
fn play_eof_mid_game_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, "quiz.txt", BANK);

    quizshow()
        .current_dir(dir.path())
        .arg("play")
        .arg("--bank")
        .arg(&bank)
        .write_stdin("B\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 2 of 2"))
        .stdout(predicate::str::contains("Final result").not());
}

#[test]
fn play_writes_json_report() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, "quiz.txt", BANK);
    let reports = dir.path().join("reports");

    quizshow()
        .current_dir(dir.path())
        .arg("play")
        .arg("--bank")
        .arg(&bank)
        .arg("--report-dir")
        .arg(&reports)
        .write_stdin("B\nA\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Results saved to"));

    let entries: Vec<_> = std::fs::read_dir(&reports).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let content = std::fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
    assert!(content.contains("\"bank\": \"quiz.txt\""));
}

#[test]
fn play_empty_bank_fails() {
    let dir = TempDir::new().unwrap();
    let bank = write_bank(&dir, "empty.txt", "no questions here\n");

    quizshow()
        .current_dir(dir.path())
        .arg("play")
        .arg("--bank")
        .arg(&bank)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no complete questions"));
}

#[test]
fn play_from_local_source() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("banks")).unwrap();
    std::fs::write(dir.path().join("banks/quiz.txt"), BANK).unwrap();
    std::fs::write(
        dir.path().join("quizshow.toml"),
        "default_source = \"local\"\n\
         default_bank = \"quiz.txt\"\n\
         [sources.local]\n\
         type = \"local\"\n\
         path = \"banks\"\n",
    )
    .unwrap();

    quizshow()
        .current_dir(dir.path())
        .arg("play")
        .write_stdin("B\nA\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Final result: 2 / 2"));
}

#[test]
fn list_local_source() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("banks")).unwrap();
    std::fs::write(dir.path().join("banks/b.txt"), BANK).unwrap();
    std::fs::write(dir.path().join("banks/a.txt"), BANK).unwrap();
    std::fs::write(
        dir.path().join("quizshow.toml"),
        "default_source = \"local\"\n[sources.local]\ntype = \"local\"\npath = \"banks\"\n",
    )
    .unwrap();

    quizshow()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Source: local (default)"))
        .stdout(predicate::str::is_match(r"(?s)a\.txt.*b\.txt").unwrap());
}

#[test]
fn list_continues_past_broken_source() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("banks")).unwrap();
    std::fs::write(dir.path().join("banks/a.txt"), BANK).unwrap();
    std::fs::write(
        dir.path().join("quizshow.toml"),
        "[sources.broken]\ntype = \"local\"\npath = \"missing\"\n\
         [sources.local]\ntype = \"local\"\npath = \"banks\"\n",
    )
    .unwrap();

    quizshow()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Source: broken (unavailable"))
        .stdout(predicate::str::contains("Source: local"))
        .stdout(predicate::str::contains("a.txt"));
}

#[test]
fn list_fails_when_every_source_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("quizshow.toml"),
        "[sources.broken]\ntype = \"local\"\npath = \"missing\"\n",
    )
    .unwrap();

    quizshow()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no source could be listed"));
}

#[test]
fn list_unknown_source_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("quizshow.toml"),
        "[sources.local]\ntype = \"local\"\npath = \".\"\n",
    )
    .unwrap();

    quizshow()
        .current_dir(dir.path())
        .arg("list")
        .arg("--source")
        .arg("nope")
        .assert()
        .failure()
        .stderr(predicate::str::contains("source 'nope' not found"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizshow()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizshow.toml"))
        .stdout(predicate::str::contains("Created banks/example.txt"));

    assert!(dir.path().join("quizshow.toml").exists());
    assert!(dir.path().join("banks/example.txt").exists());

    quizshow()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--bank")
        .arg("banks/example.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("(3 questions)"))
        .stdout(predicate::str::contains("All banks valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizshow()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    quizshow()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    quizshow()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("multiple-choice"))
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn version_output() {
    quizshow()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizshow"));
}
