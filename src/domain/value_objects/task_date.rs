use chrono::NaiveDate;

/// Storage and wire format for task dates, e.g. `20250701`
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Parse a date in the fixed 8-digit `YYYYMMDD` form.
///
/// chrono alone accepts single-digit months/days and leading whitespace for
/// this pattern, so the shape is checked first.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compact_dates() {
        assert_eq!(
            parse_date("20250701"),
            NaiveDate::from_ymd_opt(2025, 7, 1)
        );
        assert_eq!(parse_date("20240229"), NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in ["2025-07-01", "2025071", "202507011", " 2025071", "20251301", "20230229", ""] {
            assert!(parse_date(bad).is_none(), "{bad} should not parse");
        }
    }

    #[test]
    fn formats_with_zero_padding() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(date), "20250105");
    }
}
