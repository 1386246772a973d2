use chrono::Utc;
use std::time::Duration;

/// Current Unix timestamp in seconds.
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Parses a duration the way the Vault CLI reads `VAULT_CLIENT_TIMEOUT`.
///
/// Accepts a bare number of seconds (`"30"`) or a number with a single unit
/// suffix: `s`, `m` or `h` (`"30s"`, `"2m"`, `"1h"`).
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (digits, multiplier) = match value.chars().last()? {
        's' => (&value[..value.len() - 1], 1),
        'm' => (&value[..value.len() - 1], 60),
        'h' => (&value[..value.len() - 1], 60 * 60),
        _ => (value, 1),
    };
    let amount = digits.parse::<u64>().ok()?;
    amount.checked_mul(multiplier).map(Duration::from_secs)
}
