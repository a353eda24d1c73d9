//! Linux counters sysinfo does not expose.

use std::path::Path;

/// Page-cache and buffer sizes in bytes, parsed from `/proc/meminfo` text.
pub(crate) fn parse_meminfo(contents: &str) -> (u64, u64) {
    let mut cached = 0;
    let mut buffers = 0;

    for line in contents.lines() {
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        let kib = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        match name.trim() {
            "Cached" => cached = kib * 1024,
            "Buffers" => buffers = kib * 1024,
            _ => {}
        }
    }

    (cached, buffers)
}

/// Cached and buffer bytes for this host; zero when unreadable.
pub(crate) fn meminfo() -> (u64, u64) {
    if !cfg!(target_os = "linux") {
        return (0, 0);
    }
    std::fs::read_to_string("/proc/meminfo")
        .map(|c| parse_meminfo(&c))
        .unwrap_or((0, 0))
}

fn read_counter(path: &Path) -> u64 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

/// Receive and transmit drop counters of one interface.
pub(crate) fn interface_drops(iface: &str) -> (u64, u64) {
    if !cfg!(target_os = "linux") {
        return (0, 0);
    }
    let stats = Path::new("/sys/class/net").join(iface).join("statistics");
    (
        read_counter(&stats.join("rx_dropped")),
        read_counter(&stats.join("tx_dropped")),
    )
}

/// Number of sockets listed in one `/proc/net/{tcp,udp}` table.
pub(crate) fn count_sockets(contents: &str) -> u64 {
    contents
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .count() as u64
}

/// Open TCP and UDP sockets across IPv4 and IPv6; `None` when no table is readable.
pub(crate) fn connections() -> Option<u64> {
    if !cfg!(target_os = "linux") {
        return None;
    }
    let counts: Vec<u64> = ["tcp", "tcp6", "udp", "udp6"]
        .iter()
        .filter_map(|table| std::fs::read_to_string(Path::new("/proc/net").join(table)).ok())
        .map(|contents| count_sockets(&contents))
        .collect();

    if counts.is_empty() {
        None
    } else {
        Some(counts.iter().sum())
    }
}
