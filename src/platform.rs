//! Platform defaults for the hosts file location.

/// Where the system hosts file lives on this platform.
pub fn default_hosts_path() -> String {
    #[cfg(unix)]
    {
        "/etc/hosts".to_string()
    }
    #[cfg(windows)]
    {
        expand_env(r"%windir%\system32\drivers\etc\hosts")
    }
    #[cfg(not(any(unix, windows)))]
    {
        "hosts".to_string()
    }
}

/// Expands `%VAR%` environment references in `input`.
///
/// References to unset variables are left verbatim, as are stray `%`
/// characters.
pub fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let expanded = after.find('%').and_then(|end| {
            let name = &after[..end];
            if name.is_empty() {
                return None;
            }
            std::env::var(name).ok().map(|value| (value, end))
        });
        match expanded {
            Some((value, end)) => {
                out.push_str(&value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
