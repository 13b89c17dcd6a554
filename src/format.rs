//! Number formatting for rendered results.
//!
//! Non-finite values print as `N/A` rather than `NaN`/`inf`.

/// Placeholder for values that cannot be displayed
pub const NOT_AVAILABLE: &str = "N/A";

/// Fixed-point formatting
pub fn fixed(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", decimals, value)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// A [0,1] ratio as a percentage with one decimal, e.g. `0.873` → `87.3%`
pub fn ratio_percent(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{:.1}%", ratio * 100.0)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

/// US dollar amount with two decimals: `-1234.5` → `-$1,234.50`
pub fn currency(amount: f64) -> String {
    if !amount.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let cents = format!("{:.2}", amount.abs());
    let (int_part, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let sign = if amount < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, group_digits(int_part), frac)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(4.8, 2), "4.80");
        assert_eq!(fixed(7.26, 1), "7.3");
        assert_eq!(fixed(f64::NAN, 1), "N/A");
        assert_eq!(fixed(f64::INFINITY, 2), "N/A");
    }

    #[test]
    fn test_ratio_percent() {
        assert_eq!(ratio_percent(0.873), "87.3%");
        assert_eq!(ratio_percent(1.0), "100.0%");
        assert_eq!(ratio_percent(f64::NAN), "N/A");
    }

    #[test]
    fn test_currency() {
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(19.999), "$20.00");
        assert_eq!(currency(1234.5), "$1,234.50");
        assert_eq!(currency(-1234.5), "-$1,234.50");
        assert_eq!(currency(-0.001), "$0.00");
    }
}
