// ---------------------------------------------------------------------------
// Headline number formatting
// ---------------------------------------------------------------------------

const UNITS: [&str; 2] = ["", "thousand"];
const LAST_UNIT: &str = "million";

/// Scale `value` down by 1000 until it drops below 1000 and label it with
/// the matching unit, e.g. `format_magnitude(1500.0, "$") == "$ 1.50 thousand"`.
///
/// Anything that is still ≥ 1000 after the thousand step is reported in
/// millions. The unit slot is always present, so unscaled values keep a
/// trailing space (`"$ 500.00 "`).
pub fn format_magnitude(value: f64, prefix: &str) -> String {
    let mut scaled = value;
    for unit in UNITS {
        if scaled < 1000.0 {
            return format!("{prefix} {scaled:.2} {unit}");
        }
        scaled /= 1000.0;
    }
    format!("{prefix} {scaled:.2} {LAST_UNIT}")
}
