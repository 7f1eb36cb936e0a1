//! CLI definitions and command routing.

use std::io::Write;
use std::net::IpAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::entry::HostEntry;
use crate::file::{HostsFile, DEFAULT_LOCK_WAIT};
use crate::platform;
use crate::resource::FileResource;

/// Environment variable that overrides the hosts file location.
const HOSTS_PATH_ENV: &str = "HOSTEDIT_HOSTS_PATH";

#[derive(Parser)]
#[command(name = "hostedit")]
#[command(about = "Edit the system hosts file in place, preserving formatting")]
pub struct Cli {
    /// Hosts file to edit (default: $HOSTEDIT_HOSTS_PATH, then the platform hosts file)
    #[arg(long, global = true)]
    pub path: Option<String>,

    /// Seconds to wait for the file lock before giving up (0 = try once)
    #[arg(long, global = true, default_value_t = DEFAULT_LOCK_WAIT.as_secs_f64())]
    pub lock_wait: f64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a host entry
    Add {
        /// Hostname to map
        name: String,
        /// IP address the hostname resolves to
        address: String,
        /// Inline comment stored after the entry
        comment: Option<String>,
        /// Create the entry disabled (commented out)
        #[arg(long)]
        disabled: bool,
        /// Skip the confirmation prompt when the hostname already exists
        #[arg(long)]
        force: bool,
    },

    /// Print entries, optionally filtered by name or wildcard pattern
    Get {
        /// Exact hostname or pattern with `*` and `?` wildcards
        name: Option<String>,
    },

    /// Update fields on matching entries
    Set {
        /// Exact hostname or pattern with `*` and `?` wildcards
        name: String,
        /// Select by exact line number instead of name
        #[arg(long)]
        line: Option<usize>,
        /// New IP address
        #[arg(long)]
        address: Option<String>,
        /// Shorthand for --address 127.0.0.1
        #[arg(long, conflicts_with = "address")]
        loopback: bool,
        /// Shorthand for --address ::1
        #[arg(long, conflicts_with_all = ["address", "loopback"])]
        ipv6_loopback: bool,
        /// New inline comment
        #[arg(long)]
        comment: Option<String>,
        /// Enable or disable the entry
        #[arg(long)]
        enabled: Option<bool>,
        /// New hostname for the selected entries
        #[arg(long)]
        rename: Option<String>,
    },

    /// Enable matching entries
    Enable {
        name: String,
        /// Select by exact line number instead of name
        #[arg(long)]
        line: Option<usize>,
    },

    /// Disable matching entries (comment them out)
    Disable {
        name: String,
        /// Select by exact line number instead of name
        #[arg(long)]
        line: Option<usize>,
    },

    /// Remove matching entries
    Remove {
        name: String,
        /// Select by exact line number instead of name
        #[arg(long)]
        line: Option<usize>,
    },

    /// Print true/false whether any entry matches
    Test {
        /// Exact hostname or pattern with `*` and `?` wildcards
        name: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Covers negative, NaN, and waits too large for a Duration.
    let Ok(lock_wait) = Duration::try_from_secs_f64(cli.lock_wait) else {
        anyhow::bail!("--lock-wait must be a non-negative number of seconds");
    };
    let path = resolve_hosts_path(cli.path.as_deref());

    match cli.command {
        Commands::Add {
            name,
            address,
            comment,
            disabled,
            force,
        } => cmd_add(&path, lock_wait, &name, &address, comment, disabled, force),
        Commands::Get { name } => cmd_get(&path, lock_wait, name.as_deref()),
        Commands::Set {
            name,
            line,
            address,
            loopback,
            ipv6_loopback,
            comment,
            enabled,
            rename,
        } => {
            let address = if loopback {
                Some("127.0.0.1".to_string())
            } else if ipv6_loopback {
                Some("::1".to_string())
            } else {
                address
            };
            cmd_set(&path, lock_wait, &name, line, address, comment, enabled, rename)
        }
        Commands::Enable { name, line } => cmd_toggle(&path, lock_wait, &name, line, true),
        Commands::Disable { name, line } => cmd_toggle(&path, lock_wait, &name, line, false),
        Commands::Remove { name, line } => cmd_remove(&path, lock_wait, &name, line),
        Commands::Test { name } => cmd_test(&path, lock_wait, name.as_deref()),
    }
}

fn resolve_hosts_path(flag: Option<&str>) -> String {
    if let Some(path) = flag {
        return path.to_string();
    }
    if let Ok(path) = std::env::var(HOSTS_PATH_ENV) {
        if !path.is_empty() {
            return path;
        }
    }
    platform::default_hosts_path()
}

fn open_hosts(path: &str, lock_wait: Duration) -> Result<HostsFile> {
    let resource = FileResource::new(path);
    HostsFile::with_lock_wait(Box::new(resource), lock_wait)
        .with_context(|| format!("could not open hosts file {path}"))
}

fn save_if_dirty(file: &mut HostsFile, path: &str) -> Result<()> {
    if file.is_dirty() {
        file.save()
            .with_context(|| format!("could not save hosts file {path}"))?;
    }
    Ok(())
}

fn cmd_add(
    path: &str,
    lock_wait: Duration,
    name: &str,
    address: &str,
    comment: Option<String>,
    disabled: bool,
    force: bool,
) -> Result<()> {
    warn_if_invalid_address(address);

    let mut file = open_hosts(path, lock_wait)?;

    let duplicate = file
        .entries()
        .iter()
        .any(|e| e.hostname().eq_ignore_ascii_case(name));
    if duplicate && !force && !confirm_duplicate(name)? {
        return Ok(());
    }

    let mut entry = HostEntry::new(name, address, comment);
    if disabled {
        entry.set_enabled(false);
    }
    file.add_entry(entry.clone())?;
    println!("{entry}");

    save_if_dirty(&mut file, path)
}

fn cmd_get(path: &str, lock_wait: Duration, name: Option<&str>) -> Result<()> {
    let file = open_hosts(path, lock_wait)?;
    for index in select_entries(&file, name, None, false) {
        let entry = &file.entries()[index];
        let position = entry
            .position()
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        println!("{position}\t{entry}");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_set(
    path: &str,
    lock_wait: Duration,
    name: &str,
    line: Option<usize>,
    address: Option<String>,
    comment: Option<String>,
    enabled: Option<bool>,
    rename: Option<String>,
) -> Result<()> {
    if let Some(address) = &address {
        warn_if_invalid_address(address);
    }

    let mut file = open_hosts(path, lock_wait)?;
    for index in select_entries(&file, Some(name), line, true) {
        let entry = &mut file.entries_mut()[index];
        if let Some(address) = &address {
            entry.set_address(address.clone());
        }
        if let Some(comment) = &comment {
            entry.set_comment(Some(comment.clone()));
        }
        if let Some(enabled) = enabled {
            entry.set_enabled(enabled);
        }
        if let Some(rename) = &rename {
            entry.set_hostname(rename.clone());
        }
    }

    save_if_dirty(&mut file, path)
}

fn cmd_toggle(
    path: &str,
    lock_wait: Duration,
    name: &str,
    line: Option<usize>,
    enabled: bool,
) -> Result<()> {
    let mut file = open_hosts(path, lock_wait)?;
    for index in select_entries(&file, Some(name), line, true) {
        file.entries_mut()[index].set_enabled(enabled);
    }
    save_if_dirty(&mut file, path)
}

fn cmd_remove(path: &str, lock_wait: Duration, name: &str, line: Option<usize>) -> Result<()> {
    let mut file = open_hosts(path, lock_wait)?;
    let targets: Vec<HostEntry> = select_entries(&file, Some(name), line, true)
        .into_iter()
        .map(|index| file.entries()[index].clone())
        .collect();
    for target in &targets {
        file.delete_entry(target);
    }
    save_if_dirty(&mut file, path)
}

fn cmd_test(path: &str, lock_wait: Duration, name: Option<&str>) -> Result<()> {
    let file = open_hosts(path, lock_wait)?;
    let found = !select_entries(&file, name, None, false).is_empty();
    println!("{found}");
    if !found {
        std::process::exit(1);
    }
    Ok(())
}

fn warn_if_invalid_address(address: &str) {
    if address.parse::<IpAddr>().is_err() {
        eprintln!("Warning: '{address}' is not a valid IP address");
    }
}

fn confirm_duplicate(name: &str) -> Result<bool> {
    eprint!("Host entry '{name}' already exists. Create a duplicate? [y/N] ");
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Indices of the entries a command should operate on.
///
/// `--line` targets one exact file position and overrides name matching.
/// An empty name selects everything. Names with `*` or `?` match as
/// case-insensitive wildcards; anything else must equal a hostname
/// case-insensitively. An exact-name miss warns on stderr when
/// `require_match` is set; a miss never aborts the run.
fn select_entries(
    file: &HostsFile,
    name: Option<&str>,
    line: Option<usize>,
    require_match: bool,
) -> Vec<usize> {
    let entries = file.entries();

    if let Some(line) = line {
        let hits: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.position() == Some(line))
            .map(|(index, _)| index)
            .collect();
        return if hits.len() == 1 { hits } else { Vec::new() };
    }

    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return (0..entries.len()).collect();
    };

    if name.contains('*') || name.contains('?') {
        return entries
            .iter()
            .enumerate()
            .filter(|(_, e)| wildcard_match(name, e.hostname()))
            .map(|(index, _)| index)
            .collect();
    }

    let hits: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.hostname().eq_ignore_ascii_case(name))
        .map(|(index, _)| index)
        .collect();
    if hits.is_empty() && require_match {
        eprintln!("Host entry '{name}' not found");
    }
    hits
}

/// Case-insensitive glob match supporting `*` (any run) and `?` (any one
/// character).
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let name: Vec<char> = name.to_lowercase().chars().collect();

    let (mut p, mut n) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while n < name.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, n));
            p += 1;
        } else if let Some((star_p, star_n)) = star {
            p = star_p + 1;
            n = star_n + 1;
            star = Some((star_p, star_n + 1));
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}
