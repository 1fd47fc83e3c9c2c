/// Lowest percentage the form accepts
pub const PERCENT_MIN: f64 = -90.0;
/// Highest percentage the form accepts
pub const PERCENT_MAX: f64 = 1000.0;

/// Parse the percentage typed into the bulk update form.
///
/// Accepts a decimal comma and a trailing `%`. The range here is narrower
/// than what the batch itself tolerates (anything from -100 up).
pub fn parse_percent_input(raw: &str) -> Result<f64, String> {
    let cleaned = raw.trim().trim_end_matches('%').trim().replace(',', ".");
    if cleaned.is_empty() {
        return Err("Enter a percentage".into());
    }
    let percent: f64 = cleaned
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw.trim()))?;
    if !percent.is_finite() {
        return Err(format!("'{}' is not a number", raw.trim()));
    }
    if percent == 0.0 {
        return Err("A 0% change would not modify any price".into());
    }
    if !(PERCENT_MIN..=PERCENT_MAX).contains(&percent) {
        return Err(format!(
            "Percentage must be between {} and {}",
            PERCENT_MIN, PERCENT_MAX
        ));
    }
    Ok(percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent_input() {
        assert_eq!(parse_percent_input("10"), Ok(10.0));
        assert_eq!(parse_percent_input(" -12,5 % "), Ok(-12.5));
        assert_eq!(parse_percent_input("1000"), Ok(1000.0));
        assert_eq!(parse_percent_input("-90"), Ok(-90.0));
    }

    #[test]
    fn test_parse_percent_input_rejects() {
        assert!(parse_percent_input("").is_err());
        assert!(parse_percent_input("abc").is_err());
        assert!(parse_percent_input("0").is_err());
        assert!(parse_percent_input("-95").is_err());
        assert!(parse_percent_input("1001").is_err());
        assert!(parse_percent_input("inf").is_err());
    }
}
