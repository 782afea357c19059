/// Parses a CLI timestamp into epoch milliseconds.
///
/// Accepts a plain integer (`1700000000000`), `now`, or `now-<n><unit>` where
/// unit is one of `ms`, `s`, `m`, `h`, `d`. Relative forms resolve against
/// `now_millis`.
pub fn parse_timestamp(input: &str, now_millis: i64) -> Result<i64, String> {
    let input = input.trim().to_lowercase();

    if input == "now" {
        return Ok(now_millis);
    }

    let Some(offset) = input.strip_prefix("now-") else {
        return input
            .parse::<i64>()
            .map_err(|_| format!("Failed to parse timestamp: {}", input));
    };

    // Find the position where the numeric part ends
    let num_end = offset
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(offset.len());

    let (num_part, unit_part) = offset.split_at(num_end);

    let multiplier: i64 = match unit_part {
        "ms" => 1,
        "" | "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        "d" => 86_400_000,
        _ => return Err(format!("Invalid time unit: {}", unit_part)),
    };

    num_part
        .parse::<i64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .map(|delta| now_millis.saturating_sub(delta))
        .ok_or_else(|| format!("Failed to parse relative timestamp: {}", input))
}
