//! Small UI helpers: GB formatting and truncation.

// Always in GiB with two decimals, like the memory card totals.
pub fn gib(b: u64) -> String {
    format!("{:.2} GB", b as f64 / (1024.0 * 1024.0 * 1024.0))
}

pub fn truncate_middle(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    if max <= 3 {
        return "...".into();
    }
    let keep = max - 3;
    let left = keep / 2;
    let right = keep - left;
    let head: String = s.chars().take(left).collect();
    let tail: String = s.chars().skip(len - right).collect();
    format!("{head}...{tail}")
}
