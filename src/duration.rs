//! Threshold duration parsing.

use anyhow::Context;

/// Parse a lag threshold like "900", "900s", "15m" or "1h" into seconds.
///
/// Plain numbers are seconds. Negative values are rejected.
pub fn parse_threshold_secs(s: &str) -> anyhow::Result<i64> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("Empty duration string");
    }

    let (num_str, unit) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        (s, 1)
    };

    let value: i64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid duration value: {s}"))?;
    if value < 0 {
        anyhow::bail!("Duration must not be negative: {s}");
    }

    value
        .checked_mul(unit)
        .with_context(|| format!("Duration is too large: {s}"))
}
