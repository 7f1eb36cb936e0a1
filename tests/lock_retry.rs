//! Waiting out file locks held by someone else.

mod common;

use std::thread;
use std::time::Duration;

use hostedit::error::HostsError;
use hostedit::file::HostsFile;
use hostedit::resource::FileResource;

fn open_locked(path: &std::path::Path) -> std::fs::File {
    let file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .unwrap();
    fs2::FileExt::lock_exclusive(&file).unwrap();
    file
}

#[test]
fn load_waits_for_a_lock_released_in_time() {
    let dir = common::temp_hosts_dir();
    let path = common::write_hosts(&dir, "127.0.0.1\tslow.localhost\n");

    let lock = open_locked(&path);
    let holder = thread::spawn(move || {
        thread::sleep(Duration::from_millis(500));
        drop(lock);
    });

    let resource = FileResource::new(path.to_str().unwrap());
    let file = HostsFile::with_lock_wait(Box::new(resource), Duration::from_secs(2)).unwrap();
    assert_eq!(file.entries()[0].hostname(), "slow.localhost");

    holder.join().unwrap();
}

#[test]
fn load_gives_up_when_the_lock_outlives_the_wait() {
    let dir = common::temp_hosts_dir();
    let path = common::write_hosts(&dir, "127.0.0.1\tslow.localhost\n");

    let lock = open_locked(&path);
    let holder = thread::spawn(move || {
        thread::sleep(Duration::from_millis(1000));
        drop(lock);
    });

    let resource = FileResource::new(path.to_str().unwrap());
    let err =
        HostsFile::with_lock_wait(Box::new(resource), Duration::from_millis(500)).unwrap_err();
    assert!(matches!(err, HostsError::LockTimeout { .. }));
    assert_eq!(
        err.to_string(),
        "unable to acquire file lock after 0.5 seconds"
    );

    holder.join().unwrap();
}

#[test]
fn save_waits_for_a_lock_released_in_time() {
    let dir = common::temp_hosts_dir();
    let path = common::write_hosts(&dir, "127.0.0.1\tslow.localhost\n");

    let resource = FileResource::new(path.to_str().unwrap());
    let mut file = HostsFile::with_lock_wait(Box::new(resource), Duration::from_secs(2)).unwrap();
    file.entries_mut()[0].set_enabled(false);

    let lock = open_locked(&path);
    let holder = thread::spawn(move || {
        thread::sleep(Duration::from_millis(500));
        drop(lock);
    });

    file.save().unwrap();
    holder.join().unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "# 127.0.0.1\tslow.localhost\n"
    );
}

#[test]
fn save_gives_up_when_the_lock_outlives_the_wait() {
    let dir = common::temp_hosts_dir();
    let path = common::write_hosts(&dir, "127.0.0.1\tslow.localhost\n");

    let resource = FileResource::new(path.to_str().unwrap());
    let mut file =
        HostsFile::with_lock_wait(Box::new(resource), Duration::from_millis(500)).unwrap();
    file.entries_mut()[0].set_enabled(false);

    let lock = open_locked(&path);
    let holder = thread::spawn(move || {
        thread::sleep(Duration::from_millis(1000));
        drop(lock);
    });

    let err = file.save().unwrap_err();
    assert!(matches!(err, HostsError::LockTimeout { .. }));

    holder.join().unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "127.0.0.1\tslow.localhost\n"
    );
}

#[test]
fn zero_wait_reports_the_raw_contention_error() {
    let dir = common::temp_hosts_dir();
    let path = common::write_hosts(&dir, "127.0.0.1\tslow.localhost\n");

    let lock = open_locked(&path);

    let resource = FileResource::new(path.to_str().unwrap());
    let err = HostsFile::with_lock_wait(Box::new(resource), Duration::ZERO).unwrap_err();
    assert!(matches!(err, HostsError::Io(_)));

    drop(lock);
}
