use crate::common::command::{
    create_branch, init_repository_dir, run_twig_command, twig_add,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

mod common;

#[rstest]
fn status_of_a_clean_repository(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["status"])
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
}

#[rstest]
fn status_reports_every_kind_of_change(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    create_branch(dir, "other");

    write_file(FileSpec::new(dir.join("3.txt"), "three\n".to_string()));
    twig_add(dir, &["3.txt"]);

    run_twig_command(dir, &["rm", "2.txt"]).assert().success();

    write_file(FileSpec::new(dir.join("1.txt"), "changed\n".to_string()));
    write_file(FileSpec::new(dir.join("4.txt"), "four\n".to_string()));

    write_file(FileSpec::new(dir.join("5.txt"), "five\n".to_string()));
    twig_add(dir, &["5.txt"]);
    std::fs::remove_file(dir.join("5.txt")).unwrap();

    run_twig_command(dir, &["status"])
        .assert()
        .success()
        .stdout(
            "=== Branches ===\n\
             *master\n\
             other\n\
             \n\
             === Staged Files ===\n\
             3.txt\n\
             5.txt\n\
             \n\
             === Removed Files ===\n\
             2.txt\n\
             \n\
             === Modifications Not Staged For Commit ===\n\
             1.txt (modified)\n\
             5.txt (deleted)\n\
             \n\
             === Untracked Files ===\n\
             4.txt\n\
             \n",
        );
}

#[rstest]
fn staged_file_changed_again_is_modified(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("3.txt"), "three\n".to_string()));
    twig_add(dir, &["3.txt"]);
    write_file(FileSpec::new(dir.join("3.txt"), "three again\n".to_string()));

    run_twig_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "=== Staged Files ===\n3.txt\n\n",
        ))
        .stdout(predicates::str::contains(
            "=== Modifications Not Staged For Commit ===\n3.txt (modified)\n\n",
        ));
}

#[rstest]
fn tracked_file_deleted_without_rm_is_deleted(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    std::fs::remove_file(dir.join("1.txt")).unwrap();

    run_twig_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicates::str::contains(
            "=== Modifications Not Staged For Commit ===\n1.txt (deleted)\n\n",
        ));
}

#[rstest]
fn removed_file_recreated_is_untracked(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_twig_command(dir, &["rm", "2.txt"]).assert().success();
    write_file(FileSpec::new(dir.join("2.txt"), "two\n".to_string()));

    run_twig_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicates::str::contains("=== Removed Files ===\n2.txt\n\n"))
        .stdout(predicates::str::contains(
            "=== Modifications Not Staged For Commit ===\n\n",
        ))
        .stdout(predicates::str::contains("=== Untracked Files ===\n2.txt\n\n"));
}
