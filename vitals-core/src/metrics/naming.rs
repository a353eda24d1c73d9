//! Metric key construction for dynamically enumerated sub-items.

/// Turn a raw mount point or interface name into a metric-key-safe token.
///
/// Drive delimiters become `_drive`, every other character outside
/// `[A-Za-z0-9_]` becomes `_`, runs of `_` collapse and the ends are trimmed.
/// An empty result (the filesystem root) becomes `root`.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut token = String::with_capacity(raw.len() + 6);
    for ch in raw.chars() {
        match ch {
            ':' => token.push_str("_drive_"),
            c if c.is_ascii_alphanumeric() => token.push(c),
            _ => token.push('_'),
        }
    }

    let mut collapsed = String::with_capacity(token.len());
    for ch in token.chars() {
        if ch == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(ch);
    }

    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        "root".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<category>_<token>_<suffix>` key for a sanitized sub-item.
pub fn item_key(prefix: &str, token: &str, suffix: &str) -> String {
    format!("{prefix}_{token}_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_mount() {
        assert_eq!(sanitize_identifier("/"), "root");
        assert_eq!(sanitize_identifier(""), "root");
    }

    #[test]
    fn test_unix_mounts() {
        assert_eq!(sanitize_identifier("/home"), "home");
        assert_eq!(sanitize_identifier("/var/lib/docker"), "var_lib_docker");
        assert_eq!(sanitize_identifier("/mnt//data/"), "mnt_data");
    }

    #[test]
    fn test_windows_drives() {
        assert_eq!(sanitize_identifier("C:\\"), "C_drive");
        assert_eq!(sanitize_identifier("D:\\Games"), "D_drive_Games");
    }

    #[test]
    fn test_interface_names() {
        assert_eq!(sanitize_identifier("eth0"), "eth0");
        assert_eq!(sanitize_identifier("Wi-Fi 2"), "Wi_Fi_2");
        assert_eq!(sanitize_identifier("br-4f1a.100"), "br_4f1a_100");
    }

    #[test]
    fn test_item_key() {
        assert_eq!(
            item_key("disk", &sanitize_identifier("/"), "usage_percent"),
            "disk_root_usage_percent"
        );
    }
}
