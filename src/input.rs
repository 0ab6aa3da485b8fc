use crate::error::CliError;

/// Strips non-digit characters before parsing, the same forgiving treatment
/// the app gives free-text numeric fields. `"1,200 kcal"` reads as 1200.
/// Empty after filtering is a usage error.
pub fn parse_filtered_u32(raw: &str, label: &str) -> Result<u32, CliError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(CliError::usage(format!("Invalid {}: {}", label, raw)));
    }
    digits
        .parse::<u32>()
        .map_err(|_| CliError::usage(format!("Invalid {}: {}", label, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_non_digits() {
        assert_eq!(parse_filtered_u32("1,200 kcal", "calories").unwrap(), 1200);
        assert_eq!(parse_filtered_u32("450", "calories").unwrap(), 450);
        assert_eq!(parse_filtered_u32(" 09 ", "hour").unwrap(), 9);
    }

    #[test]
    fn rejects_text_without_digits() {
        assert!(parse_filtered_u32("lots", "calories").is_err());
        assert!(parse_filtered_u32("", "calories").is_err());
    }
}
