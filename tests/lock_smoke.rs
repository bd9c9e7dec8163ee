// Multi-process lock smoke test for catalog session serialization.
use std::process::{Command, Stdio};

use shelf::api::Shelf;

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_shelf");
    Command::new(exe)
}

#[test]
fn concurrent_adds_never_tear_the_catalog() {
    let temp = tempfile::tempdir().expect("tempdir");
    let file = temp.path().join("catalog.shelf");

    let workers = 8u64;
    let mut children = Vec::new();
    for i in 0..workers {
        let child = cmd()
            .args([
                "--file",
                file.to_str().unwrap(),
                "add",
                &format!("Book {i}"),
                "Author",
            ])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn");
        children.push(child);
    }

    // A worker either wins the session lock and commits, or exits Busy.
    let mut succeeded = 0u64;
    for mut child in children {
        let status = child.wait().expect("wait");
        match status.code() {
            Some(0) => succeeded += 1,
            Some(6) => {}
            other => panic!("unexpected exit code: {other:?}"),
        }
    }
    assert!(succeeded >= 1);

    let shelf = Shelf::open(&file).expect("open");
    let ids: Vec<u64> = shelf.books().iter().map(|record| record.id).collect();
    assert_eq!(ids.len() as u64, succeeded);
    assert_eq!(ids, (1..=succeeded).collect::<Vec<u64>>());
    assert!(
        shelf
            .books()
            .iter()
            .all(|record| !record.issued && record.issued_to.is_empty())
    );
}
