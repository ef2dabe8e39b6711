// Human-readable byte counts and durations for the upload screen.

use std::time::Duration;

const UNIT: u64 = 1024;
const PREFIXES: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// Binary units with one decimal: `0 B`, `1.5 KB`, `1.0 MB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < UNIT {
        return format!("{bytes} B");
    }
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}B", bytes as f64 / div as f64, PREFIXES[exp])
}

/// `SSs` under a minute, `MM:SS` under an hour, `HH:MM:SS` beyond.
pub fn format_duration(d: Duration) -> String {
    if d < Duration::from_secs(60) {
        return format!("{:02.0}s", d.as_secs_f64());
    }
    let total = d.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);
    if hours == 0 {
        format!("{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}
