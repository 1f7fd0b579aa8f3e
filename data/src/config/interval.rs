use std::sync::LazyLock;

use regex::Regex;

use crate::Error;

static INTERVAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)(ms|s|m|h|d|w|M|y)$").expect("interval pattern is valid")
});

const SECOND_MS: f64 = 1_000.0;

fn unit_ms(unit: &str) -> Option<f64> {
    let ms = match unit {
        "ms" => 1.0,
        "s" => SECOND_MS,
        "m" => 60.0 * SECOND_MS,
        "h" => 3_600.0 * SECOND_MS,
        "d" => 86_400.0 * SECOND_MS,
        "w" => 604_800.0 * SECOND_MS,
        "M" => 2_592_000.0 * SECOND_MS,
        "y" => 31_536_000.0 * SECOND_MS,
        _ => return None,
    };
    Some(ms)
}

pub fn is_interval(text: &str) -> bool {
    INTERVAL_RE.is_match(text.trim())
}

/// Parses interval strings such as `"30s"`, `"5m"` or `"100ms"` into milliseconds.
pub fn interval_to_ms(text: &str) -> Result<f64, Error> {
    let invalid = || Error::Interval(text.to_string());

    let caps = INTERVAL_RE.captures(text.trim()).ok_or_else(invalid)?;
    let amount = caps[1].parse::<f64>().map_err(|_| invalid())?;
    let unit = unit_ms(&caps[2]).ok_or_else(invalid)?;

    Ok(amount * unit)
}
