use crate::common::command::{
    checkout_branch, commit_files, create_branch, find_commits, init_repository_dir,
    run_twig_command,
};
use crate::common::log_entry_pattern;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use regex::Regex;
use rstest::rstest;

mod common;

fn command_output(dir: &std::path::Path, args: &[&str]) -> String {
    let output = run_twig_command(dir, args)
        .output()
        .expect("Failed to run twig");
    String::from_utf8(output.stdout).expect("twig output is not UTF-8")
}

#[rstest]
fn log_lists_the_current_branch_newest_first(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_files(dir, &[("3.txt", "three\n")], "Add three");

    let expected = format!(
        "^{}{}{}$",
        log_entry_pattern("Add three"),
        log_entry_pattern("Initial files"),
        log_entry_pattern("initial commit"),
    );

    let log = command_output(dir, &["log"]);
    assert!(Regex::new(&expected).unwrap().is_match(&log), "{log}");
}

#[rstest]
fn log_ignores_commits_on_other_branches(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    create_branch(dir, "other");
    checkout_branch(dir, "other");
    commit_files(dir, &[("3.txt", "three\n")], "Only on other");
    checkout_branch(dir, "master");

    let log = command_output(dir, &["log"]);
    assert!(!log.contains("Only on other"));

    let global_log = command_output(dir, &["global-log"]);
    assert!(global_log.contains("Only on other"));
}

#[rstest]
fn global_log_shows_every_commit_once(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_files(dir, &[("3.txt", "three\n")], "Add three");
    let initial_id = find_commits(dir, "Initial files").remove(0);

    // reset leaves "Add three" unreachable from any branch
    run_twig_command(dir, &["reset", &initial_id])
        .assert()
        .success()
        .stdout("");

    let global_log = command_output(dir, &["global-log"]);
    let entries = Regex::new(&log_entry_pattern("Add three"))
        .unwrap()
        .find_iter(&global_log)
        .count();

    assert_eq!(entries, 1);
    assert_eq!(global_log.matches("===\n").count(), 3);
}

#[rstest]
fn log_marks_merge_commits(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    create_branch(dir, "other");
    commit_files(dir, &[("3.txt", "three\n")], "Master work");
    checkout_branch(dir, "other");
    commit_files(dir, &[("4.txt", "four\n")], "Other work");
    checkout_branch(dir, "master");

    run_twig_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout("");

    let master_id = find_commits(dir, "Master work").remove(0);
    let other_id = find_commits(dir, "Other work").remove(0);

    let log = command_output(dir, &["log"]);
    let expected_head = format!(
        "===\ncommit [0-9a-f]{{40}}\nMerge: {} {}\nDate: .+\nMerged other into master.\n\n",
        &master_id[..7],
        &other_id[..7]
    );

    assert!(Regex::new(&format!("^{expected_head}")).unwrap().is_match(&log), "{log}");
    // first parents only
    assert!(!log.contains("Other work"));
    assert!(log.contains("Master work"));
}

#[rstest]
fn find_prints_every_matching_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_files(dir, &[("3.txt", "three\n")], "Same message");
    commit_files(dir, &[("4.txt", "four\n")], "Same message");

    let found = find_commits(dir, "Same message");

    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|id| id.len() == 40));
    assert_ne!(found[0], found[1]);
}

#[rstest]
fn find_matches_whole_messages_only(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["find", "Initial"])
        .assert()
        .success()
        .stdout("Found no commit with that message.\n");
}
