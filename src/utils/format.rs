/// Renders a count with comma thousands separators (`1234567` -> `1,234,567`).
pub fn thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Rounds to zero decimals (ties to even) and groups thousands. Non-finite
/// input renders as-is.
pub fn thousands_f64(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = format!("{:.0}", value.abs());
    let grouped = group_digits(&digits);
    if value < 0.0 && digits != "0" {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Keeps the first `max_chars` characters and always appends `...`.
pub fn ellipsize(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_thousands_f64_rounds() {
        assert_eq!(thousands_f64(200.0), "200");
        assert_eq!(thousands_f64(1234.6), "1,235");
        assert_eq!(thousands_f64(0.0), "0");
    }

    #[test]
    fn test_thousands_f64_ties_round_to_even() {
        assert_eq!(thousands_f64(2.5), "2");
        assert_eq!(thousands_f64(0.5), "0");
        assert_eq!(thousands_f64(3.5), "4");
        assert_eq!(thousands_f64(1_234_566.5), "1,234,566");
        assert_eq!(thousands_f64(1e20), "100,000,000,000,000,000,000");
    }

    #[test]
    fn test_ellipsize_counts_chars_not_bytes() {
        assert_eq!(ellipsize("Máx: Antioquia y más", 15), "Máx: Antioquia ...");
        assert_eq!(ellipsize("Máx: B", 15), "Máx: B...");
    }
}
