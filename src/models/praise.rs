use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::dates::CalendarDate;

/// Upper bound on praise length, in characters
pub const MAX_PRAISE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Praise {
    pub id: i64,
    pub user_id: Uuid,
    pub praise_date: CalendarDate,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PraiseInput {
    pub content: String,
}

/// Trim and bound praise content, returning the text to store
pub fn normalize_content(content: &str) -> Result<String, String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err("Praise content cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_PRAISE_CHARS {
        return Err(format!(
            "Praise content must be at most {} characters",
            MAX_PRAISE_CHARS
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_is_trimmed() {
        assert_eq!(normalize_content("  kind to myself \n").unwrap(), "kind to myself");
    }

    #[test]
    fn blank_and_oversized_content_is_rejected() {
        assert!(normalize_content("   ").is_err());
        let long = "가".repeat(MAX_PRAISE_CHARS + 1);
        assert!(normalize_content(&long).is_err());
        let max = "가".repeat(MAX_PRAISE_CHARS);
        assert!(normalize_content(&max).is_ok());
    }
}
