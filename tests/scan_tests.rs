//! End-to-end scans over real temporary trees.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use dupescan::config::ScanConfig;
use dupescan::duplicates::DuplicateFinder;
use dupescan::progress::ProgressTracker;
use dupescan::signal::ShutdownHandler;

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(content).unwrap();
    path
}

fn subdir(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::create_dir(&path).unwrap();
    path
}

#[test]
fn same_name_and_content_group_different_name_does_not() {
    let dir = TempDir::new().unwrap();
    let content = vec![b'x'; 1024];

    // A and B: same content, different names -> never a group.
    let a = write_file(dir.path(), "a.dat", &content);
    write_file(dir.path(), "b.dat", &content);
    // C: same name and content as A, different directory -> group {A, C}.
    let other = subdir(dir.path(), "other");
    let c = write_file(&other, "a.dat", &content);

    let finder = DuplicateFinder::new(ScanConfig::new(dir.path()).with_workers(2));
    let report = finder.run().unwrap();

    assert_eq!(report.groups.len(), 1);
    let group = &report.groups[0];
    assert_eq!(group.identity.name, "a.dat");
    assert_eq!(group.identity.size, 1024);
    assert_eq!(group.paths, vec![a, c]);
}

#[test]
fn min_size_excludes_small_duplicates() {
    let dir = TempDir::new().unwrap();
    let content = vec![b'x'; 1024];
    write_file(dir.path(), "small.dat", &content);
    let other = subdir(dir.path(), "copy");
    write_file(&other, "small.dat", &content);

    let config = ScanConfig::new(dir.path()).with_min_size(Some(2048));
    let report = DuplicateFinder::new(config).run().unwrap();

    assert!(report.groups.is_empty());
    assert_eq!(report.stats.discovered, 0);
    assert_eq!(report.stats.filtered, 2);
}

#[test]
fn exclude_all_pattern_yields_empty_report() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.log", b"same");
    write_file(dir.path(), "b.log", b"same");

    let config = ScanConfig::new(dir.path()).with_exclude_patterns(vec!["*".to_string()]);
    let report = DuplicateFinder::new(config).run().unwrap();

    assert!(report.groups.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!(report.stats.discovered, 0);
    assert_eq!(report.stats.hashed, 0);
    assert_eq!(report.stats.filtered, 2);
}

#[test]
fn worker_count_does_not_change_the_report() {
    let dir = TempDir::new().unwrap();

    // A tree with several groups and several unique files.
    for sub in ["one", "two", "three"] {
        let d = subdir(dir.path(), sub);
        write_file(&d, "shared.bin", b"shared content across directories");
        write_file(&d, "notes.txt", sub.as_bytes());
    }
    write_file(dir.path(), "shared.bin", b"shared content across directories");
    write_file(dir.path(), "unique.bin", b"only one of these");

    let run_with = |workers: usize| {
        let config = ScanConfig::new(dir.path()).with_workers(workers);
        DuplicateFinder::new(config).run().unwrap()
    };

    let serial = run_with(1);
    let parallel = run_with(4);

    assert_eq!(serial.groups, parallel.groups);
    assert_eq!(serial.failures, parallel.failures);
    assert_eq!(serial.stats.discovered, parallel.stats.discovered);
    assert_eq!(serial.stats.hashed, parallel.stats.hashed);
    assert_eq!(serial.stats.duplicate_files, parallel.stats.duplicate_files);

    assert_eq!(serial.groups.len(), 1);
    assert_eq!(serial.groups[0].len(), 4);
}

#[test]
fn repeated_scans_are_identical() {
    let dir = TempDir::new().unwrap();
    let d = subdir(dir.path(), "nested");
    write_file(dir.path(), "doc.txt", b"stable content");
    write_file(&d, "doc.txt", b"stable content");
    write_file(&d, "other.txt", b"something else");

    let run = || {
        DuplicateFinder::new(ScanConfig::new(dir.path()))
            .run()
            .unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first.groups, second.groups);
    assert_eq!(first.stats.discovered, second.stats.discovered);
}

#[test]
fn stats_arithmetic_holds() {
    let dir = TempDir::new().unwrap();
    for sub in ["a", "b", "c"] {
        let d = subdir(dir.path(), sub);
        write_file(&d, "triple.bin", &vec![b'1'; 100]);
    }
    let d = subdir(dir.path(), "d");
    write_file(&d, "pair.bin", &vec![b'2'; 200]);
    write_file(dir.path(), "pair.bin", &vec![b'2'; 200]);

    let report = DuplicateFinder::new(ScanConfig::new(dir.path()))
        .run()
        .unwrap();

    assert_eq!(report.groups.len(), 2);

    // Reclaimable copies = sum of group sizes minus group count.
    let member_total: usize = report.groups.iter().map(dupescan::duplicates::DuplicateGroup::len).sum();
    assert_eq!(
        report.stats.duplicate_files,
        member_total - report.groups.len()
    );
    assert_eq!(report.stats.reclaimable_bytes, 2 * 100 + 200);

    // Every path appears in exactly one group.
    let mut all_paths: Vec<_> = report
        .groups
        .iter()
        .flat_map(|g| g.paths.iter().cloned())
        .collect();
    let before = all_paths.len();
    all_paths.sort();
    all_paths.dedup();
    assert_eq!(before, all_paths.len());
}

#[test]
#[cfg(unix)]
fn symlinks_are_skipped_unless_followed() {
    let dir = TempDir::new().unwrap();
    let target = write_file(dir.path(), "real.dat", &vec![b'x'; 4096]);
    std::os::unix::fs::symlink(&target, dir.path().join("alias.dat")).unwrap();

    let report = DuplicateFinder::new(ScanConfig::new(dir.path()))
        .run()
        .unwrap();
    assert_eq!(report.stats.discovered, 1);
    assert_eq!(report.stats.filtered, 1);
    assert!(report.groups.is_empty());

    let config = ScanConfig::new(dir.path()).with_follow_symlinks(true);
    let report = DuplicateFinder::new(config).run().unwrap();
    assert_eq!(report.stats.discovered, 2);
    // alias.dat and real.dat differ in name, so still no group.
    assert!(report.groups.is_empty());
}

#[test]
#[cfg(unix)]
fn unreadable_file_is_reported_not_fatal() {
    use dupescan::scanner::FailureKind;
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let d = subdir(dir.path(), "copy");
    write_file(dir.path(), "fine.txt", b"still grouped");
    write_file(&d, "fine.txt", b"still grouped");
    let locked = write_file(dir.path(), "locked.bin", b"cannot read this");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let readable_anyway = File::open(&locked).is_ok(); // true when running as root
    let report = DuplicateFinder::new(ScanConfig::new(dir.path()))
        .run()
        .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    // The healthy pair is grouped no matter what happened to locked.bin.
    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].identity.name, "fine.txt");

    if readable_anyway {
        assert!(report.failures.is_empty());
    } else {
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, locked);
        assert_eq!(report.failures[0].kind, FailureKind::PermissionDenied);
        assert_eq!(report.stats.failed, 1);
    }
}

#[test]
fn cancellation_yields_partial_report() {
    let dir = TempDir::new().unwrap();
    let block = vec![b'z'; 32 * 1024];
    for i in 0..800 {
        write_file(dir.path(), &format!("file{i:04}.bin"), &block);
    }

    let tracker = Arc::new(ProgressTracker::new());
    let handler = ShutdownHandler::new();
    let finder = DuplicateFinder::new(ScanConfig::new(dir.path()).with_workers(2))
        .with_shutdown_flag(handler.get_flag())
        .with_progress(Arc::clone(&tracker));

    let scan = thread::spawn(move || finder.run().unwrap());

    // As soon as the first file lands, pull the plug.
    loop {
        let snapshot = tracker.snapshot();
        if snapshot.processed >= 1 || snapshot.done {
            break;
        }
        thread::yield_now();
    }
    handler.request_shutdown();

    let report = scan.join().unwrap();
    if !report.interrupted {
        // The whole tree was hashed before the signal landed; nothing
        // partial to assert on this machine.
        assert_eq!(report.stats.hashed, 800);
        return;
    }

    let processed = report.stats.hashed + report.stats.failed;
    assert!(processed < report.stats.discovered);
    assert!(processed < 800);
}

#[test]
fn hidden_directories_are_never_entered() {
    let dir = TempDir::new().unwrap();
    let hidden = subdir(dir.path(), ".git");
    write_file(&hidden, "same.bin", b"identical");
    write_file(dir.path(), "same.bin", b"identical");

    let report = DuplicateFinder::new(ScanConfig::new(dir.path()))
        .run()
        .unwrap();

    // The copy inside .git is invisible, so no group forms.
    assert!(report.groups.is_empty());
    assert_eq!(report.stats.discovered, 1);
}

#[test]
fn empty_tree_gives_empty_report() {
    let dir = TempDir::new().unwrap();
    let report = DuplicateFinder::new(ScanConfig::new(dir.path()))
        .run()
        .unwrap();

    assert!(report.groups.is_empty());
    assert!(report.failures.is_empty());
    assert!(!report.interrupted);
    assert_eq!(report.stats.discovered, 0);
}
