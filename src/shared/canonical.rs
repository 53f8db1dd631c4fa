use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// First numeric token in an amount string, decimal comma or point.
    /// - "42,30€" -> "42,30"
    /// - "  15.00 EUR" -> "15.00"
    static ref AMOUNT_TOKEN: Regex = Regex::new(r"\d+(?:[.,]\d+)?").unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Canonical form of an amount-like field for exact duplicate comparison.
/// Strips currency glyphs and padding down to the numeric token; text with
/// no numeric token (e.g. a sentinel) is kept verbatim after trimming.
pub fn canonical_amount(raw: &str) -> String {
    match AMOUNT_TOKEN.find(raw) {
        Some(token) => token.as_str().to_string(),
        None => raw.trim().to_string(),
    }
}

/// Canonical form of a due-date-like field: trimmed, inner runs of
/// whitespace collapsed. Portal markup pads these unpredictably.
pub fn canonical_date(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_keeps_numeric_token_only() {
        assert_eq!(canonical_amount("42,30€"), "42,30");
        assert_eq!(canonical_amount("  15.00 EUR"), "15.00");
        assert_eq!(canonical_amount("1234"), "1234");
    }

    #[test]
    fn amount_without_digits_is_trimmed_verbatim() {
        assert_eq!(canonical_amount("  Not found "), "Not found");
        assert_eq!(canonical_amount(""), "");
    }

    #[test]
    fn date_collapses_padding() {
        assert_eq!(canonical_date("  12/05  "), "12/05");
        assert_eq!(canonical_date("12   May\n2026"), "12 May 2026");
    }
}
