use clap::Subcommand;
use serde_json::json;

use crate::cli::config::load_config;
use crate::cli::utils::{output_data, output_error, output_success, parse_date_arg};
use crate::cli::OutputFormat;
use crate::journal::{DayPraises, MutationOutcome};
use crate::models::Praise;

#[derive(Subcommand)]
pub enum PraiseCommands {
    #[command(about = "List a day's praises, newest first")]
    List {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
    },

    #[command(about = "Add a praise to a day")]
    Add {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
        #[arg(help = "Praise text (up to 500 characters)")]
        content: String,
    },

    #[command(about = "Replace a praise's text")]
    Edit {
        #[arg(help = "Day the praise belongs to")]
        date: String,
        #[arg(help = "Praise id")]
        id: i64,
        #[arg(help = "New text")]
        content: String,
    },

    #[command(about = "Delete a praise")]
    Delete {
        #[arg(help = "Day the praise belongs to")]
        date: String,
        #[arg(help = "Praise id")]
        id: i64,
    },
}

pub async fn handle(cmd: PraiseCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = load_config()?.client()?;

    match cmd {
        PraiseCommands::List { date } => {
            let date = parse_date_arg(&date)?;
            let praises = client.list_praises(date).await?;
            output_data(&output_format, &praises, |praises| print_praises(praises))
        }
        PraiseCommands::Add { date, content } => {
            let mut day = DayPraises::new(client, parse_date_arg(&date)?);
            day.refresh().await?;
            match day.add(&content).await? {
                MutationOutcome::Committed(praise) => output_success(
                    &output_format,
                    &format!("Added praise {} on {}", praise.id, day.date()),
                    Some(json!(praise)),
                ),
                MutationOutcome::RolledBack { error, .. } => {
                    rolled_back(&output_format, "save", error)
                }
            }
        }
        PraiseCommands::Edit { date, id, content } => {
            let mut day = DayPraises::new(client, parse_date_arg(&date)?);
            day.refresh().await?;
            match day.update(id, &content).await? {
                MutationOutcome::Committed(praise) => output_success(
                    &output_format,
                    &format!("Updated praise {}", praise.id),
                    Some(json!(praise)),
                ),
                MutationOutcome::RolledBack { error, .. } => {
                    rolled_back(&output_format, "save", error)
                }
            }
        }
        PraiseCommands::Delete { date, id } => {
            let mut day = DayPraises::new(client, parse_date_arg(&date)?);
            day.refresh().await?;
            match day.delete(id).await? {
                MutationOutcome::Committed(()) => output_success(
                    &output_format,
                    &format!("Deleted praise {} from {}", id, day.date()),
                    Some(json!({ "id": id, "date": day.date() })),
                ),
                MutationOutcome::RolledBack { error, .. } => {
                    rolled_back(&output_format, "delete", error)
                }
            }
        }
    }
}

fn rolled_back(
    output_format: &OutputFormat,
    action: &str,
    error: crate::client::ClientError,
) -> anyhow::Result<()> {
    output_error(output_format, &format!("Failed to {} praise: {}", action, error), None)?;
    Err(anyhow::anyhow!("{} failed", action))
}

fn print_praises(praises: &[Praise]) {
    if praises.is_empty() {
        println!("No praises for this day yet");
        return;
    }
    for praise in praises {
        println!("[{}] {}  {}", praise.id, praise.created_at.format("%H:%M"), praise.content);
    }
}
