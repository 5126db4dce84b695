use crate::common::command::{
    commit_files, find_commits, init_repository_dir, repository_dir, run_twig_command, twig_add,
    twig_commit, twig_commit_at,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn commit_without_staged_changes_is_rejected(init_repository_dir: TempDir) {
    twig_commit(init_repository_dir.path(), "nothing here")
        .assert()
        .success()
        .stdout("No changes added to the commit.\n");
}

#[rstest]
#[case::blank_message(&["commit", ""])]
#[case::whitespace_message(&["commit", "   "])]
#[case::missing_message(&["commit"])]
fn commit_without_message_is_rejected(init_repository_dir: TempDir, #[case] args: &[&str]) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("3.txt"), "three\n".to_string()));
    twig_add(dir, &["3.txt"]);

    run_twig_command(dir, args)
        .assert()
        .success()
        .stdout("Please enter a commit message.\n");
}

#[rstest]
fn commit_clears_the_staging_area(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_files(dir, &[("3.txt", "three\n")], "Add three");

    run_twig_command(dir, &["status"])
        .assert()
        .success()
        .stdout(
            "=== Branches ===\n\
             *master\n\
             \n\
             === Staged Files ===\n\
             \n\
             === Removed Files ===\n\
             \n\
             === Modifications Not Staged For Commit ===\n\
             \n\
             === Untracked Files ===\n\
             \n",
        );

    assert_eq!(find_commits(dir, "Add three").len(), 1);
}

#[rstest]
fn committed_snapshot_keeps_unchanged_files(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_files(dir, &[("1.txt", "changed\n")], "Change one");
    let change_id = find_commits(dir, "Change one").remove(0);

    std::fs::remove_file(dir.join("2.txt")).unwrap();
    run_twig_command(dir, &["checkout", &change_id, "--", "2.txt"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(read_file(&dir.join("2.txt")), "two\n");
}

#[rstest]
fn commit_records_staged_removals(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["rm", "2.txt"])
        .assert()
        .success();
    twig_commit(dir, "Remove two").assert().success().stdout("");

    run_twig_command(dir, &["checkout", "--", "2.txt"])
        .assert()
        .success()
        .stdout("File does not exist in that commit.\n");
}

#[rstest]
fn commit_ignores_unstaged_working_changes(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "unstaged\n".to_string()));
    commit_files(dir, &[("3.txt", "three\n")], "Add three");

    run_twig_command(dir, &["checkout", "--", "1.txt"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("1.txt")), "one\n");
}

#[rstest]
fn commit_uses_the_configured_date(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_twig_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("a.txt"), "a\n".to_string()));
    twig_add(dir, &["a.txt"]);

    twig_commit_at(dir, "first", "2023-01-01 12:00:00 +0000")
        .assert()
        .success()
        .stdout("");

    let first_id = find_commits(dir, "first").remove(0);
    let root_id = find_commits(dir, "initial commit").remove(0);

    run_twig_command(dir, &["log"])
        .assert()
        .success()
        .stdout(predicates::str::diff(format!(
            "===\ncommit {first_id}\nDate: Sun Jan 1 12:00:00 2023 +0000\nfirst\n\n\
             ===\ncommit {root_id}\nDate: Thu Jan 1 00:00:00 1970 +0000\ninitial commit\n\n"
        )));
}
