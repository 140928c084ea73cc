//! Number formatting for metric cards and chart labels.

/// Whole dollars with thousands separators, e.g. `$1,234,568`.
///
/// Digits come from the `f64` itself, so magnitudes past `u64::MAX` print in
/// full. Non-finite values print as `inf` / `NaN`.
pub fn usd(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(&format!("{:.0}", rounded.abs())))
}

/// Integer count with thousands separators, e.g. `12,345`.
pub fn count(value: usize) -> String {
    group_thousands(&value.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dollars() {
        assert_eq!(usd(0.0), "$0");
        assert_eq!(usd(999.4), "$999");
        assert_eq!(usd(1_234_567.5), "$1,234,568");
        assert_eq!(usd(-1500.0), "-$1,500");
    }

    #[test]
    fn dollars_beyond_u64_keep_every_digit() {
        assert_eq!(usd(1e20), "$100,000,000,000,000,000,000");
        assert_eq!(usd(-2.5e19), "-$25,000,000,000,000,000,000");
        assert_eq!(usd(f64::INFINITY), "inf");
    }

    #[test]
    fn formats_counts() {
        assert_eq!(count(7), "7");
        assert_eq!(count(1000), "1,000");
        assert_eq!(count(123_456), "123,456");
    }
}
