pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "daypat")]
#[command(about = "DayPat CLI - daily praise journal from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show or change the server and session token")]
    Config {
        #[command(subcommand)]
        cmd: commands::config::ConfigCommands,
    },

    #[command(about = "Check that the configured server is up")]
    Status,

    #[command(about = "Mint a development session token with the local JWT secret")]
    DevToken(commands::auth::DevTokenArgs),

    #[command(about = "Month calendar with per-day activity")]
    Month(commands::calendar::MonthArgs),

    #[command(about = "Week view (Monday to Sunday) with per-day activity")]
    Week(commands::calendar::WeekArgs),

    #[command(about = "Current and selected-day streaks")]
    Streak(commands::calendar::StreakArgs),

    #[command(about = "Praise notes for a day")]
    Praise {
        #[command(subcommand)]
        cmd: commands::praise::PraiseCommands,
    },

    #[command(about = "Polaroid card for a day")]
    Card {
        #[command(subcommand)]
        cmd: commands::card::CardCommands,
    },

    #[command(about = "Day stamps")]
    Stamp {
        #[command(subcommand)]
        cmd: commands::stamp::StampCommands,
    },

    #[command(about = "PDF export planning")]
    Export {
        #[command(subcommand)]
        cmd: commands::export::ExportCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Config { cmd } => commands::config::handle(cmd, output_format).await,
        Commands::Status => commands::status::handle(output_format).await,
        Commands::DevToken(args) => commands::auth::handle(args, output_format).await,
        Commands::Month(args) => commands::calendar::month(args, output_format).await,
        Commands::Week(args) => commands::calendar::week(args, output_format).await,
        Commands::Streak(args) => commands::calendar::streak(args, output_format).await,
        Commands::Praise { cmd } => commands::praise::handle(cmd, output_format).await,
        Commands::Card { cmd } => commands::card::handle(cmd, output_format).await,
        Commands::Stamp { cmd } => commands::stamp::handle(cmd, output_format).await,
        Commands::Export { cmd } => commands::export::handle(cmd, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_praise_command() {
        let args = ["daypat", "--json", "praise", "add", "2024-03-01", "stretched"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Praise { .. }));
    }

    #[test]
    fn parses_sticker_scale_command() {
        let args = ["daypat", "card", "sticker", "scale", "today", "2", "up"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Card {
                cmd: commands::card::CardCommands::Sticker {
                    cmd: commands::card::StickerCommands::Scale { number, step, .. },
                },
            } => {
                assert_eq!(number, 2);
                assert_eq!(step, commands::card::ScaleStep::Up);
            }
            _ => panic!("expected card sticker scale"),
        }
    }

    #[test]
    fn parses_status_command() {
        let cli = Cli::try_parse_from(["daypat", "status"]).unwrap();
        assert!(matches!(cli.command, Commands::Status));
    }
}
