use serde_json::{json, Value};

use crate::cli::config::load_config;
use crate::cli::utils::output_data;
use crate::cli::OutputFormat;

/// Ping the configured server: service description plus store health
pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let client = load_config()?.client()?;

    let info = client.root().await?;
    let health = match client.health().await {
        Ok(data) => data,
        Err(e) => json!({ "status": "degraded", "error": e.to_string() }),
    };

    let summary = json!({
        "server_url": client.base_url().as_str(),
        "name": info.get("name").cloned().unwrap_or(Value::Null),
        "version": info.get("version").cloned().unwrap_or(Value::Null),
        "health": health,
    });
    output_data(&output_format, &summary, |summary| {
        println!("Server:  {}", summary["server_url"].as_str().unwrap_or("-"));
        println!(
            "Service: {} {}",
            summary["name"].as_str().unwrap_or("unknown"),
            summary["version"].as_str().unwrap_or("")
        );
        println!("Health:  {}", summary["health"]["status"].as_str().unwrap_or("unknown"));
    })
}
