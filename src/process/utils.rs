/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Header cleanup: drops a leading UTF-8 BOM, then behaves like [`clean_str`].
pub fn clean_header(raw: &str) -> String {
    clean_str(raw.trim_start_matches('\u{feff}'))
}

/// Cell tokens that load as missing values.
const NA_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "#N/A", "-"];

pub fn is_na_token(s: &str) -> bool {
    NA_TOKENS.contains(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_quotes_and_whitespace() {
        assert_eq!(clean_str("  \"Total [MWh]\" "), "Total [MWh]");
        assert_eq!(clean_str("\""), "\"");
        assert_eq!(clean_str(" plain "), "plain");
    }

    #[test]
    fn header_bom_is_removed() {
        assert_eq!(clean_header("\u{feff}Start date"), "Start date");
    }

    #[test]
    fn na_tokens() {
        assert!(is_na_token(""));
        assert!(is_na_token("-"));
        assert!(is_na_token("N/A"));
        assert!(!is_na_token("0"));
    }
}
