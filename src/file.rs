//! The hosts-file engine: load, edit, save.

use std::collections::BTreeSet;
use std::fmt;
use std::io::{Read, SeekFrom};
use std::time::Duration;

use crate::entry::{is_reserved_hostname, HostEntry};
use crate::error::{HostsError, Result};
use crate::lock::retry_on_lock;
use crate::parser::parse_line;
use crate::resource::{Resource, ResourceHandle};

/// How long to wait for the file lock before giving up.
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(5);

/// An editable view of one hosts file.
///
/// Loading keeps every raw line of the file alongside the entries parsed
/// from them. Lines that are not entries (comments, blanks, malformed
/// text) are written back byte for byte, as are entries nobody modified;
/// only dirty entries have their lines regenerated. Saving re-checks the
/// file on disk first and refuses to clobber lines that changed under us.
pub struct HostsFile {
    resource: Box<dyn Resource>,
    lines: Vec<String>,
    entries: Vec<HostEntry>,
    deleted: BTreeSet<usize>,
    lock_wait: Duration,
}

impl HostsFile {
    /// Opens `resource` and loads it, waiting up to
    /// [`DEFAULT_LOCK_WAIT`] for the file lock.
    pub fn open(resource: Box<dyn Resource>) -> Result<Self> {
        Self::with_lock_wait(resource, DEFAULT_LOCK_WAIT)
    }

    /// Opens `resource` with an explicit lock-wait deadline. A zero wait
    /// means a single attempt with no retries.
    pub fn with_lock_wait(resource: Box<dyn Resource>, lock_wait: Duration) -> Result<Self> {
        let mut file = Self {
            resource,
            lines: Vec::new(),
            entries: Vec::new(),
            deleted: BTreeSet::new(),
            lock_wait,
        };
        file.load()?;
        Ok(file)
    }

    /// Re-reads the backing store, discarding any unsaved changes.
    pub fn load(&mut self) -> Result<()> {
        let wait = self.lock_wait;
        retry_on_lock(wait, || {
            let mut reader = self.resource.open_read()?;
            let lines = read_all_lines(reader.as_mut())?;
            self.reset_from(lines);
            Ok(())
        })
    }

    /// The entries parsed from the file, in file order, followed by any
    /// added entries.
    pub fn entries(&self) -> &[HostEntry] {
        &self.entries
    }

    /// Mutable access to the entries; edits are staged until
    /// [`save`](Self::save).
    pub fn entries_mut(&mut self) -> &mut [HostEntry] {
        &mut self.entries
    }

    /// Stages `entry` for the next save.
    ///
    /// Reserved sample hostnames are rejected. Adding an entry that is
    /// structurally equal to one already present is a no-op.
    pub fn add_entry(&mut self, entry: HostEntry) -> Result<()> {
        if is_reserved_hostname(entry.hostname()) {
            return Err(HostsError::ReservedHostname);
        }
        if !self.entries.contains(&entry) {
            self.entries.push(entry);
        }
        Ok(())
    }

    /// Removes the entry structurally equal to `entry`, queueing its line
    /// for deletion on the next save. Absent entries are a silent no-op;
    /// removing a never-saved entry leaves the file untouched.
    pub fn delete_entry(&mut self, entry: &HostEntry) {
        let Some(index) = self.entries.iter().position(|e| e == entry) else {
            return;
        };
        let removed = self.entries.remove(index);
        if let Some(position) = removed.position() {
            self.deleted.insert(position);
        }
    }

    /// Whether anything would be written by [`save`](Self::save).
    pub fn is_dirty(&self) -> bool {
        !self.deleted.is_empty() || self.entries.iter().any(HostEntry::is_dirty)
    }

    /// Writes staged changes back to the resource.
    ///
    /// The current content is re-read through the exclusive write handle
    /// first. Every line this instance wants to rewrite or delete must
    /// still read exactly as it did at load time, or the save fails with
    /// [`HostsError::WriteConflict`] before a single byte is written.
    /// Unrelated external edits are adopted and survive the save. On
    /// success the instance reloads itself from the stream, so entry
    /// positions always reflect the file.
    pub fn save(&mut self) -> Result<()> {
        let wait = self.lock_wait;
        retry_on_lock(wait, || {
            let mut handle = self.resource.open_write()?;
            self.save_to(handle.as_mut())
        })
    }

    fn save_to(&mut self, handle: &mut dyn ResourceHandle) -> Result<()> {
        let current = read_all_lines(&mut *handle)?;
        self.check_concurrency(&current)?;
        self.lines = current;
        self.apply_changes();

        let mut output = String::new();
        for (position, line) in self.lines.iter().enumerate() {
            if self.deleted.contains(&position) {
                continue;
            }
            output.push_str(line);
            output.push('\n');
        }

        handle.seek(SeekFrom::Start(0))?;
        handle.write_all(output.as_bytes())?;
        handle.flush()?;
        handle.truncate(output.len() as u64)?;

        tracing::info!(
            entries = self.entries.len(),
            deleted = self.deleted.len(),
            bytes = output.len(),
            "saved hosts file"
        );

        handle.seek(SeekFrom::Start(0))?;
        let lines = read_all_lines(&mut *handle)?;
        self.reset_from(lines);
        Ok(())
    }

    /// Fails if any line this instance intends to touch differs from the
    /// loaded baseline.
    fn check_concurrency(&self, current: &[String]) -> Result<()> {
        for entry in &self.entries {
            if !entry.is_dirty() {
                continue;
            }
            if let Some(position) = entry.position() {
                self.check_line_unchanged(position, current)?;
            }
        }
        for &position in &self.deleted {
            self.check_line_unchanged(position, current)?;
        }
        Ok(())
    }

    fn check_line_unchanged(&self, position: usize, current: &[String]) -> Result<()> {
        if position >= current.len()
            || position >= self.lines.len()
            || current[position] != self.lines[position]
        {
            return Err(HostsError::WriteConflict { line: position });
        }
        Ok(())
    }

    /// Folds dirty entries into the line list: positioned entries
    /// overwrite their line, new entries append.
    fn apply_changes(&mut self) {
        for entry in &self.entries {
            if !entry.is_dirty() {
                continue;
            }
            match entry.position() {
                Some(position) => self.lines[position] = entry.render(),
                None => self.lines.push(entry.render()),
            }
        }
    }

    fn reset_from(&mut self, lines: Vec<String>) {
        self.deleted.clear();

        let mut entries = Vec::new();
        for (position, line) in lines.iter().enumerate() {
            let Some(entry) = parse_line(position, line) else {
                continue;
            };
            if is_reserved_hostname(entry.hostname()) {
                tracing::debug!(
                    line = position,
                    hostname = entry.hostname(),
                    "skipping reserved sample entry"
                );
                continue;
            }
            entries.push(entry);
        }

        tracing::info!(
            lines = lines.len(),
            entries = entries.len(),
            "loaded hosts file"
        );
        self.lines = lines;
        self.entries = entries;
    }
}

impl fmt::Debug for HostsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostsFile")
            .field("lines", &self.lines.len())
            .field("entries", &self.entries)
            .field("deleted", &self.deleted)
            .finish_non_exhaustive()
    }
}

/// Reads the whole stream into lines, accepting both `\n` and `\r\n`
/// terminators. Content must be valid UTF-8.
fn read_all_lines<R: Read + ?Sized>(reader: &mut R) -> Result<Vec<String>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text.lines().map(str::to_owned).collect())
}
