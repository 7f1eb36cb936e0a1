//! Line grammar for hosts-file entries.

use std::net::IpAddr;

use crate::entry::HostEntry;

/// Parses one line of a hosts file into an entry.
///
/// A line is an entry when it reads `[#] <address> <spacer> <hostname>
/// [# comment]`: an optional disabled marker in the first column, a token of
/// hex digits, dots, and colons that parses as a real IP address, at least
/// one whitespace character, and a hostname. Anything after the hostname
/// becomes the comment, with one leading `#` and surrounding whitespace
/// stripped. Blank lines, plain comments, and lines whose address token is
/// not a valid IP yield `None`; the engine keeps such lines verbatim and
/// never exposes them for editing.
pub fn parse_line(position: usize, line: &str) -> Option<HostEntry> {
    if line.is_empty() {
        return None;
    }

    let mut rest = line;
    let enabled = match rest.strip_prefix('#') {
        Some(stripped) => {
            rest = stripped;
            false
        }
        None => true,
    };
    rest = rest.trim_start();

    let (address, rest) = split_while(rest, is_address_char);
    if address.is_empty() {
        return None;
    }

    let (spacer, rest) = split_while(rest, char::is_whitespace);
    if spacer.is_empty() {
        return None;
    }

    let (hostname, rest) = split_while(rest, |c| !c.is_whitespace() && c != '#');
    if hostname.is_empty() {
        return None;
    }

    // Strict address validation; near-miss lines stay raw text.
    address.parse::<IpAddr>().ok()?;

    let tail = rest.trim_start();
    let tail = tail.strip_prefix('#').unwrap_or(tail);
    let tail = tail.trim_start();
    let comment = (!tail.is_empty()).then(|| tail.to_string());

    Some(HostEntry::from_line(
        position, line, spacer, enabled, hostname, address, comment,
    ))
}

/// Splits `input` at the end of its leading run of characters matching
/// `pred`.
fn split_while(input: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
    let end = input
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(input.len(), |(index, _)| index);
    input.split_at(end)
}

fn is_address_char(c: char) -> bool {
    c.is_ascii_hexdigit() || c == '.' || c == ':'
}
