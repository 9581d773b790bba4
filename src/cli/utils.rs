use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::dates::CalendarDate;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print `data` as pretty JSON, or hand it to `text` for the human format
pub fn output_data<T, F>(output_format: &OutputFormat, data: &T, text: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Text => text(data),
    }
    Ok(())
}

/// Parse a date argument: `YYYY-MM-DD` or `today`
pub fn parse_date_arg(value: &str) -> anyhow::Result<CalendarDate> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(CalendarDate::today());
    }
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("{} (use YYYY-MM-DD or 'today')", e))
}
