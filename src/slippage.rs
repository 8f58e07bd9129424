use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_SLIPPAGE: f64 = 0.1;

/// Quick-pick values offered next to the custom input, in percent.
pub const PRESETS: [&str; 4] = ["0.1", "0.5", "1", "5"];

// Leading junk, then digits with at most four decimal places, then the rest.
static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\D*(\d*(?:\.\d{0,4})?).*$").unwrap());

static LEADING_ZERO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0(\d+)").unwrap());

/// Filter free-form input for the slippage percentage field.
///
/// Commas count as decimal points, a bare "." becomes "0." so the user can
/// start with the dot, everything that is not part of the leading number is
/// stripped, at most four decimal places survive, and a redundant leading
/// zero before further digits is dropped ("05" -> "5", "0.5" untouched).
pub fn sanitize(input: &str) -> String {
    let cleaned = input.replace(',', ".");

    if cleaned == "." {
        return "0.".to_string();
    }

    let cleaned = NUMERIC.replace(&cleaned, "$1");
    LEADING_ZERO.replace(&cleaned, "$1").into_owned()
}

/// Sanitize and parse. Returns None for input with no digits left.
pub fn parse(input: &str) -> Option<f64> {
    sanitize(input).parse().ok()
}

/// A slippage percentage the settings form will accept.
pub fn is_valid(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_becomes_decimal_point() {
        assert_eq!(sanitize("1,5"), "1.5");
    }

    #[test]
    fn bare_dot_becomes_zero_dot() {
        assert_eq!(sanitize("."), "0.");
        assert_eq!(sanitize(","), "0.");
    }

    #[test]
    fn strips_surrounding_junk() {
        assert_eq!(sanitize("abc1.25xyz"), "1.25");
        assert_eq!(sanitize("%0.5"), "0.5");
        assert_eq!(sanitize("no digits"), "");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn keeps_at_most_four_decimal_places() {
        assert_eq!(sanitize("12.345678"), "12.3456");
        assert_eq!(sanitize("0.0001"), "0.0001");
        assert_eq!(sanitize("1.2.3"), "1.2");
    }

    #[test]
    fn drops_redundant_leading_zero() {
        assert_eq!(sanitize("05"), "5");
        assert_eq!(sanitize("007"), "07");
        assert_eq!(sanitize("0.5"), "0.5");
        assert_eq!(sanitize("0"), "0");
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("garbage"), None);
        assert_eq!(parse("2,5"), Some(2.5));
    }

    #[test]
    fn validity_caps_at_one_hundred_percent() {
        assert!(is_valid(DEFAULT_SLIPPAGE));
        assert!(is_valid(100.0));
        assert!(is_valid(0.0));
        assert!(!is_valid(100.0001));
        assert!(!is_valid(-1.0));
        assert!(!is_valid(f64::NAN));
    }
}
