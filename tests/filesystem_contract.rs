mod harness;

use fsgate::{Filesystem, FsErrorKind, FsOperation, LockMode, OpenMode, RecordFormat};
use harness::TestContext;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;

fn relative_tree(fs: &Filesystem, root: &Path) -> BTreeSet<PathBuf> {
    fs.list_directory_recursive(root)
        .unwrap()
        .into_iter()
        .map(|path| path.strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

#[test]
fn copied_tree_matches_source() {
    let ctx = TestContext::new();
    let source = ctx.seed_tree("project");
    let destination = ctx.path("backup/project");
    let facade = Filesystem::local();

    facade.copy_directory(&source, &destination).unwrap();

    let source_tree = relative_tree(&facade, &source);
    assert_eq!(source_tree, relative_tree(&facade, &destination));
    for relative in &source_tree {
        let original = source.join(relative);
        if original.is_file() {
            assert_eq!(fs::read(&original).unwrap(), fs::read(destination.join(relative)).unwrap());
        }
    }
    assert!(destination.join("empty").is_dir());
}

#[test]
fn delete_after_copy_leaves_nothing() {
    let ctx = TestContext::new();
    let source = ctx.seed_tree("project");
    let destination = ctx.path("scratch");
    let facade = Filesystem::local();

    facade.copy_directory(&source, &destination).unwrap();
    facade.delete_directory(&destination).unwrap();

    assert!(!facade.exists(&destination).unwrap());
    assert!(facade.exists(&source).unwrap());
}

#[test]
fn clear_keeps_the_root() {
    let ctx = TestContext::new();
    let root = ctx.seed_tree("cache");
    let facade = Filesystem::local();

    facade.clear_directory(&root).unwrap();

    assert!(facade.is_directory(&root).unwrap());
    assert!(facade.list_directory(&root).unwrap().is_empty());
}

#[test]
fn concurrent_creators_of_the_same_tree_all_succeed() {
    let ctx = TestContext::new();
    let target = ctx.path("var/lib/app/releases/current");
    let workers = 8;
    let barrier = Arc::new(Barrier::new(workers));

    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let target = target.clone();
            thread::spawn(move || {
                barrier.wait();
                Filesystem::local().create_directory(&target, 0o755)
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }
    assert!(target.is_dir());
    assert_eq!(fs::read_dir(ctx.path("var/lib/app/releases")).unwrap().count(), 1);
}

#[test]
fn missing_entries_are_negatives() {
    let ctx = TestContext::new();
    let facade = Filesystem::local();
    let missing = ctx.path("does/not/exist");

    assert!(!facade.exists(&missing).unwrap());
    assert!(!facade.is_file(&missing).unwrap());
    assert!(!facade.is_directory(&missing).unwrap());
    assert!(facade.stat(&missing).unwrap().is_none());
    assert!(facade.real_path(&missing).is_none());
    facade.remove(&missing).unwrap();
}

#[test]
fn error_message_names_operation_and_paths() {
    let ctx = TestContext::new();
    let facade = Filesystem::local();
    let from = ctx.path("ghost.txt");
    let to = ctx.path("renamed.txt");

    let err = facade.rename(&from, &to).unwrap_err();

    assert_eq!(err.operation(), FsOperation::Rename);
    let message = err.to_string();
    assert!(message.starts_with("failed to rename"));
    assert!(message.contains("ghost.txt"));
    assert!(message.contains("renamed.txt"));
    assert!(message.contains("No such file or directory"));
}

#[test]
fn stream_round_trip_with_records() {
    let ctx = TestContext::new();
    let path = ctx.path("report.csv");
    let facade = Filesystem::local();
    let format = RecordFormat::default();

    let mut writer = facade.open(&path, OpenMode::Truncate { read: false }).unwrap();
    writer.write_record(&["name", "balance"], format).unwrap();
    writer.write_record(&["alice", "-12"], format).unwrap();
    writer.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "name,balance\nalice, -12\n");

    let mut reader = facade.open_with(&path, "r").unwrap();
    let mut records = Vec::new();
    while let Some(record) = reader.read_record(format).unwrap() {
        records.push(record);
    }
    reader.close().unwrap();
    assert_eq!(records, vec![vec!["name", "balance"], vec!["alice", " -12"]]);
}

#[test]
fn closed_stream_rejects_further_use() {
    let ctx = TestContext::new();
    let path = ctx.path("log.txt");
    let facade = Filesystem::local();
    let mut stream = facade.open(&path, OpenMode::Append { read: false }).unwrap();

    stream.write(b"line\n").unwrap();
    stream.close().unwrap();
    stream.close().unwrap();

    let err = stream.write(b"more\n").unwrap_err();
    assert_eq!(err.kind(), FsErrorKind::InvalidHandle);
    assert_eq!(fs::read_to_string(&path).unwrap(), "line\n");
}

#[cfg(unix)]
#[test]
fn advisory_lock_is_exclusive_across_handles() {
    let ctx = TestContext::new();
    let path = ctx.path("deploy.lock");
    let facade = Filesystem::local();
    let mut first = facade.open(&path, OpenMode::Create { read: true }).unwrap();
    let mut second = facade.open(&path, OpenMode::Create { read: true }).unwrap();

    first.lock(LockMode::EXCLUSIVE).unwrap();
    assert!(second.lock(LockMode::EXCLUSIVE.non_blocking()).is_err());

    first.close().unwrap();
    second.lock(LockMode::EXCLUSIVE.non_blocking()).unwrap();
    second.close().unwrap();
}

#[cfg(unix)]
#[test]
fn recursive_chmod_applies_modes_by_type() {
    use std::os::unix::fs::PermissionsExt;

    let ctx = TestContext::new();
    let root = ctx.seed_tree("site");
    let facade = Filesystem::local();

    facade.change_permissions_recursively(&root, 0o750, 0o640).unwrap();

    let mode = |path: PathBuf| fs::metadata(path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(root.clone()), 0o750);
    assert_eq!(mode(root.join("src/util")), 0o750);
    assert_eq!(mode(root.join("src/main.rs")), 0o640);
    assert_eq!(mode(root.join("README.md")), 0o640);
}
