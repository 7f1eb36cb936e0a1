//! Shared test helpers.

use std::path::PathBuf;
use tempfile::TempDir;

use hostedit::file::HostsFile;
use hostedit::resource::MemoryResource;

/// Create a temp directory for scratch hosts files.
/// Uses current dir (workspace) so sandbox allows full access.
pub fn temp_hosts_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("hostedit_test_")
        .tempdir_in(std::env::current_dir().unwrap_or_else(|_| std::path::Path::new(".").into()))
        .expect("temp dir")
}

/// Write `content` to a fresh hosts file under `dir` and return its path.
pub fn write_hosts(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("hosts");
    std::fs::write(&path, content).expect("write hosts file");
    path
}

/// An in-memory hosts file plus an engine loaded over it. The returned
/// resource shares the engine's buffer, so tests can inspect saved bytes.
pub fn memory_hosts(content: &str) -> (MemoryResource, HostsFile) {
    let resource = MemoryResource::with_content(content);
    let file = HostsFile::open(Box::new(resource.clone())).expect("load hosts");
    (resource, file)
}

/// A stock platform hosts file: comment banner and reserved sample entries
/// first, then live entries on lines 22 and 23 (zero-based).
pub fn sample_hosts() -> String {
    sample_lines().join("\n") + "\n"
}

/// The sample file as separate lines, for building expected output.
pub fn sample_lines() -> Vec<String> {
    [
        "# Copyright (c) 1993-2009 Microsoft Corp.",
        "#",
        "# This is a sample HOSTS file used by Microsoft TCP/IP for Windows.",
        "#",
        "# This file contains the mappings of IP addresses to host names. Each",
        "# entry should be kept on an individual line. The IP address should",
        "# be placed in the first column followed by the corresponding host name.",
        "# The IP address and the host name should be separated by at least one",
        "# space.",
        "#",
        "# Additionally, comments (such as these) may be inserted on individual",
        "# lines or following the machine name denoted by a '#' symbol.",
        "#",
        "# For example:",
        "#",
        "#      102.54.94.97     rhino.acme.com          # source server",
        "#       38.25.63.10     x.acme.com              # x client host",
        "",
        "# localhost name resolution is handled within DNS itself.",
        "#\t127.0.0.1       localhost",
        "#\t::1             localhost",
        "",
        "127.0.0.1\thost1.localhost",
        "# 127.0.0.1\thost2.localhost",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}
