use clap::Subcommand;
use serde_json::json;

use crate::cli::config::load_config;
use crate::cli::utils::{output_data, output_success, parse_date_arg};
use crate::cli::OutputFormat;
use crate::models::StampAsset;

#[derive(Subcommand)]
pub enum StampCommands {
    #[command(about = "List available stamps")]
    Assets,

    #[command(about = "Show a day's stamp")]
    Show {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
    },

    #[command(about = "Stamp a day, replacing any existing stamp")]
    Set {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
        #[arg(help = "Stamp key or id")]
        stamp: String,
    },

    #[command(about = "Remove a day's stamp")]
    Remove {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
    },
}

pub async fn handle(cmd: StampCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = load_config()?.client()?;

    match cmd {
        StampCommands::Assets => {
            let assets = client.stamp_assets().await?;
            output_data(&output_format, &assets, |assets| {
                for asset in assets {
                    println!("{:>3}  {:<10} {}", asset.id, asset.key, asset.label);
                }
            })
        }
        StampCommands::Show { date } => {
            let date = parse_date_arg(&date)?;
            let stamp = client.day_stamp(date).await?;
            output_data(&output_format, &stamp, |stamp| match stamp {
                Some(s) => println!("{}: {} ({})", date, s.stamp_asset.label, s.stamp_asset.key),
                None => println!("No stamp on {}", date),
            })
        }
        StampCommands::Set { date, stamp } => {
            let date = parse_date_arg(&date)?;
            let assets = client.stamp_assets().await?;
            let asset_id = resolve_asset(&assets, &stamp)?;
            let saved = client.set_day_stamp(date, asset_id).await?;
            output_success(
                &output_format,
                &format!("Stamped {} with '{}'", date, saved.stamp_asset.label),
                Some(json!(saved)),
            )
        }
        StampCommands::Remove { date } => {
            let date = parse_date_arg(&date)?;
            let removed = client.remove_day_stamp(date).await?;
            let message = if removed {
                format!("Removed stamp from {}", date)
            } else {
                format!("No stamp on {}", date)
            };
            output_success(&output_format, &message, Some(json!({ "removed": removed })))
        }
    }
}

/// Match a stamp by key first, then by numeric id
fn resolve_asset(assets: &[StampAsset], wanted: &str) -> anyhow::Result<i64> {
    if let Some(asset) = assets.iter().find(|a| a.key == wanted) {
        return Ok(asset.id);
    }
    wanted
        .parse::<i64>()
        .ok()
        .filter(|id| assets.iter().any(|a| a.id == *id))
        .ok_or_else(|| anyhow::anyhow!("Unknown stamp '{}'; run `daypat stamp assets`", wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn asset(id: i64, key: &str) -> StampAsset {
        StampAsset {
            id,
            key: key.to_string(),
            label: key.to_uppercase(),
            asset_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn stamps_resolve_by_key_or_id() {
        let assets = vec![asset(1, "excellent"), asset(2, "great")];
        assert_eq!(resolve_asset(&assets, "great").unwrap(), 2);
        assert_eq!(resolve_asset(&assets, "1").unwrap(), 1);
        assert!(resolve_asset(&assets, "9").is_err());
        assert!(resolve_asset(&assets, "nope").is_err());
    }
}
