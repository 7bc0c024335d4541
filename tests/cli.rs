use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Fixture {
    corpus: TempDir,
    data: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let corpus = tempfile::tempdir().unwrap();
        let book = corpus.path().join("1");
        fs::create_dir_all(&book).unwrap();
        fs::write(
            book.join("tunes.abc"),
            "X:1\nT:Cooley's\nR:reel\nK:Emin\nEBBA B2EB\nX:2\nT:The Musical Reel\nR:reel\nabc\n",
        )
        .unwrap();
        let other = corpus.path().join("2");
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join("jigs.abc"), "X:7\nT:The Kesh\nR:jig\nGAG\n").unwrap();

        Self {
            corpus,
            data: tempfile::tempdir().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tunebook").unwrap();
        cmd.env_remove("TUNEBOOK_ROOT")
            .env_remove("TUNEBOOK_LOG")
            .env("TUNEBOOK_DB", self.data.path().join("tunes.sqlite"));
        cmd
    }

    fn build(&self) {
        self.cmd()
            .args(["build", "--wipe", "--root"])
            .arg(self.corpus.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Inserted 3 tunes from 2 files."));
    }
}

#[test]
fn build_reports_counts() {
    let fixture = Fixture::new();
    fixture.build();
    fixture.build();

    fixture
        .cmd()
        .args(["build", "--root"])
        .arg(fixture.corpus.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("The store now holds 6."));
}

#[test]
fn build_creates_nested_database_directory() {
    let fixture = Fixture::new();
    let db = fixture.data.path().join("a").join("b").join("tunes.sqlite");
    fixture
        .cmd()
        .env("TUNEBOOK_DB", &db)
        .args(["build", "--root"])
        .arg(fixture.corpus.path())
        .assert()
        .success();
    assert!(db.is_file());
}

#[test]
fn list_filters_by_book_type_and_title() {
    let fixture = Fixture::new();
    fixture.build();

    fixture
        .cmd()
        .args(["list", "--book", "2"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?m)^\s+3  book 2\s+7 - The Kesh$").unwrap())
        .stdout(predicate::str::contains("Cooley's").not());

    fixture
        .cmd()
        .args(["list", "--type", "REEL", "--title", "musical"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 - The Musical Reel"))
        .stdout(predicate::str::contains("Cooley's").not());

    fixture
        .cmd()
        .args(["list", "--title", "hornpipe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tunes matched."));
}

#[test]
fn non_numeric_book_is_rejected() {
    let fixture = Fixture::new();
    fixture.build();
    fixture
        .cmd()
        .args(["list", "--book", "two"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Book must be a number"));
}

#[test]
fn show_prints_details() {
    let fixture = Fixture::new();
    fixture.build();
    fixture
        .cmd()
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title: Cooley's"))
        .stdout(predicate::str::contains("Key: Emin"))
        .stdout(predicate::str::contains("Body:\nEBBA B2EB\n"));
}

#[test]
fn build_fails_for_missing_root() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["build", "--root"])
        .arg(fixture.corpus.path().join("absent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("rebuild aborted after 0 files and 0 tunes"));
}
