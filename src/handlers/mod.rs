// handlers/mod.rs - Public (no auth) and Protected (JWT auth, /api/*) tiers
pub mod protected;
pub mod public;

use crate::dates::CalendarDate;
use crate::error::ApiError;

/// Parse a `YYYY-MM-DD` path or query value, reporting the offending field
pub(crate) fn parse_date(field: &str, value: &str) -> Result<CalendarDate, ApiError> {
    value
        .parse()
        .map_err(|e: crate::dates::DateError| ApiError::field_error(field, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_canonical_dates_are_field_errors() {
        let err = parse_date("date", "2024-1-5").unwrap_err();
        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"]["date"].is_string());
        assert!(parse_date("date", "2024-01-05").is_ok());
    }
}
