//! A single hosts-file entry with change tracking.

use std::fmt;
use std::net::IpAddr;

/// Spacer used for entries that were never parsed from an existing line.
const DEFAULT_SPACER: &str = "\t";

/// Prefix written before disabled entries and inline comments.
const COMMENT_PREFIX: &str = "# ";

/// Sample hostnames shipped with platform hosts files. They parse like any
/// other line but are never exposed as editable entries, and adding one is
/// rejected.
pub const RESERVED_HOSTNAMES: &[&str] = &["rhino.acme.com", "x.acme.com", "localhost"];

/// Whether `hostname` is one of the reserved sample names (case-insensitive).
pub fn is_reserved_hostname(hostname: &str) -> bool {
    RESERVED_HOSTNAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(hostname))
}

/// One mapping line of a hosts file.
///
/// An entry remembers the exact line it was parsed from and serializes back
/// to it verbatim until a field actually changes. Setters only mark the
/// entry dirty when the new value differs from the old one, so rewriting a
/// field with its current value never causes a line to be regenerated.
#[derive(Debug, Clone)]
pub struct HostEntry {
    position: Option<usize>,
    original: Option<String>,
    spacer: String,
    enabled: bool,
    hostname: String,
    address: String,
    comment: Option<String>,
    dirty: bool,
}

impl HostEntry {
    /// Creates an enabled entry that has not yet been assigned a line.
    pub fn new(
        hostname: impl Into<String>,
        address: impl Into<String>,
        comment: Option<String>,
    ) -> Self {
        Self {
            position: None,
            original: None,
            spacer: DEFAULT_SPACER.to_string(),
            enabled: true,
            hostname: hostname.into(),
            address: address.into(),
            comment,
            dirty: false,
        }
    }

    /// Reconstructs an entry exactly as parsed from line `position` of the
    /// backing file.
    pub fn from_line(
        position: usize,
        original: impl Into<String>,
        spacer: impl Into<String>,
        enabled: bool,
        hostname: impl Into<String>,
        address: impl Into<String>,
        comment: Option<String>,
    ) -> Self {
        Self {
            position: Some(position),
            original: Some(original.into()),
            spacer: spacer.into(),
            enabled,
            hostname: hostname.into(),
            address: address.into(),
            comment,
            dirty: false,
        }
    }

    /// Zero-based line this entry occupies, or `None` for a new entry.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// The verbatim line this entry was parsed from, if any.
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_hostname(&mut self, hostname: impl Into<String>) {
        let hostname = hostname.into();
        if self.hostname != hostname {
            self.hostname = hostname;
            self.dirty = true;
        }
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        let address = address.into();
        if self.address != address {
            self.address = address;
            self.dirty = true;
        }
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        if self.comment != comment {
            self.comment = comment;
            self.dirty = true;
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.dirty = true;
        }
    }

    /// Exchanges file positions with `other`.
    ///
    /// Swapping with a new entry transfers "new" status along with the
    /// unassigned position: the former new entry will overwrite the line it
    /// received, and this entry will be appended on the next save.
    pub fn swap_position(&mut self, other: &mut HostEntry) {
        let position = self.position;
        self.set_position(other.position);
        other.set_position(position);
    }

    fn set_position(&mut self, position: Option<usize>) {
        if self.position != position {
            self.position = position;
            self.dirty = true;
        }
    }

    /// Whether this entry has never been assigned a line in the file.
    pub fn is_new(&self) -> bool {
        self.position.is_none()
    }

    /// Whether this entry must be written on the next save. New entries and
    /// entries without an original line are always dirty.
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.is_new() || self.original.is_none()
    }

    /// The address parsed strictly as an IP, or `None` when it is not one.
    pub fn ip_address(&self) -> Option<IpAddr> {
        self.address.parse().ok()
    }

    /// Whether the address is a loopback address. `false` when unparsable.
    pub fn is_loopback(&self) -> bool {
        self.ip_address().is_some_and(|address| address.is_loopback())
    }

    /// The line this entry serializes to: the original text verbatim while
    /// clean, a regenerated line once dirty.
    pub fn render(&self) -> String {
        if !self.is_dirty() {
            if let Some(original) = &self.original {
                return original.clone();
            }
        }

        let mut line = String::new();
        if !self.enabled {
            line.push_str(COMMENT_PREFIX);
        }
        line.push_str(&self.address);
        line.push_str(&self.spacer);
        line.push_str(&self.hostname);
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            line.push(' ');
            line.push_str(COMMENT_PREFIX);
            line.push_str(comment);
        }
        line
    }
}

impl fmt::Display for HostEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// The spacer is not part of equality: two entries that differ only in the
// whitespace captured between address and hostname are the same record.
impl PartialEq for HostEntry {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.original == other.original
            && self.enabled == other.enabled
            && self.dirty == other.dirty
            && self.hostname == other.hostname
            && self.address == other.address
            && self.comment == other.comment
    }
}

impl Eq for HostEntry {}
