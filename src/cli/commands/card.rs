use clap::{Subcommand, ValueEnum};
use serde_json::json;

use crate::cli::config::load_config;
use crate::cli::utils::{output_data, output_success, parse_date_arg};
use crate::cli::OutputFormat;
use crate::models::{DayCard, DayCardUpdate, StickerEdit};

#[derive(Subcommand)]
pub enum CardCommands {
    #[command(about = "Show a day's polaroid card")]
    Show {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
    },

    #[command(about = "Set or clear the caption")]
    Caption {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
        #[arg(help = "Caption text, up to 100 characters (omit to clear)")]
        text: Option<String>,
    },

    #[command(about = "Attach an uploaded photo")]
    Photo {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
        #[arg(help = "Photo URL")]
        url: String,
        #[arg(long, help = "Thumbnail URL")]
        thumb: Option<String>,
    },

    #[command(about = "Place and adjust emoji stickers")]
    Sticker {
        #[command(subcommand)]
        cmd: StickerCommands,
    },
}

#[derive(Subcommand)]
pub enum StickerCommands {
    #[command(about = "Drop a sticker at the center of the photo")]
    Add {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
        #[arg(help = "Emoji to place")]
        emoji: String,
    },

    #[command(about = "Move a sticker (coordinates are 0 to 1 across the photo)")]
    Move {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
        #[arg(help = "Sticker number as shown by 'card show'")]
        number: usize,
        x: f64,
        y: f64,
    },

    #[command(about = "Grow or shrink a sticker by 10%")]
    Scale {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
        #[arg(help = "Sticker number as shown by 'card show'")]
        number: usize,
        #[arg(value_enum)]
        step: ScaleStep,
    },

    #[command(about = "Rotate a sticker by 15 degrees")]
    Rotate {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
        #[arg(help = "Sticker number as shown by 'card show'")]
        number: usize,
    },

    #[command(about = "Remove a sticker")]
    Remove {
        #[arg(help = "Day, YYYY-MM-DD or 'today'")]
        date: String,
        #[arg(help = "Sticker number as shown by 'card show'")]
        number: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScaleStep {
    Up,
    Down,
}

impl StickerCommands {
    /// Target day and the list edit, with 1-based sticker numbers made 0-based
    fn into_edit(self) -> anyhow::Result<(String, StickerEdit)> {
        let index = |number: usize| {
            number
                .checked_sub(1)
                .ok_or_else(|| anyhow::anyhow!("Sticker numbers start at 1"))
        };

        Ok(match self {
            StickerCommands::Add { date, emoji } => (date, StickerEdit::Add(emoji)),
            StickerCommands::Move { date, number, x, y } => {
                (date, StickerEdit::Move { index: index(number)?, x, y })
            }
            StickerCommands::Scale { date, number, step } => {
                let i = index(number)?;
                let edit = match step {
                    ScaleStep::Up => StickerEdit::Grow(i),
                    ScaleStep::Down => StickerEdit::Shrink(i),
                };
                (date, edit)
            }
            StickerCommands::Rotate { date, number } => (date, StickerEdit::Rotate(index(number)?)),
            StickerCommands::Remove { date, number } => (date, StickerEdit::Remove(index(number)?)),
        })
    }
}

pub async fn handle(cmd: CardCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = load_config()?.client()?;

    match cmd {
        CardCommands::Show { date } => {
            let date = parse_date_arg(&date)?;
            let card = client.day_card(date).await?;
            output_data(&output_format, &card, |card| match card {
                Some(card) => print_card(card),
                None => println!("No card for {}", date),
            })
        }
        CardCommands::Caption { date, text } => {
            let date = parse_date_arg(&date)?;
            let update = DayCardUpdate {
                caption: Some(text),
                ..Default::default()
            };
            let card = client.update_day_card(date, &update).await?;
            output_success(
                &output_format,
                &format!("Caption updated for {}", card.card_date),
                Some(json!(card)),
            )
        }
        CardCommands::Photo { date, url, thumb } => {
            let date = parse_date_arg(&date)?;
            let update = DayCardUpdate {
                photo_url: Some(Some(url)),
                thumb_url: Some(thumb),
                ..Default::default()
            };
            let card = client.update_day_card(date, &update).await?;
            output_success(
                &output_format,
                &format!("Photo attached to {}", card.card_date),
                Some(json!(card)),
            )
        }
        CardCommands::Sticker { cmd } => {
            let (date, edit) = cmd.into_edit()?;
            let date = parse_date_arg(&date)?;

            // The whole list is sent back, so start from what is stored
            let current = client
                .day_card(date)
                .await?
                .map(|card| card.sticker_state)
                .unwrap_or_default();
            let stickers = edit.apply(&current).map_err(|msg| anyhow::anyhow!(msg))?;

            let update = DayCardUpdate {
                sticker_state: Some(stickers),
                ..Default::default()
            };
            let card = client.update_day_card(date, &update).await?;
            let message = format!(
                "Stickers updated for {} ({} on card)",
                card.card_date,
                card.sticker_state.len()
            );
            output_success(&output_format, &message, Some(json!(card)))
        }
    }
}

fn print_card(card: &DayCard) {
    println!("Card for {}", card.card_date);
    println!("Photo:    {}", card.photo_url.as_deref().unwrap_or("-"));
    println!("Caption:  {}", card.caption.as_deref().unwrap_or("-"));
    if card.sticker_state.is_empty() {
        println!("Stickers: -");
        return;
    }
    println!("Stickers:");
    for (i, s) in card.sticker_state.iter().enumerate() {
        println!(
            "  {}. {}  at ({:.2}, {:.2})  {:.0}%  {:.0}°",
            i + 1,
            s.emoji,
            s.x,
            s.y,
            s.scale * 100.0,
            s.rotate
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sticker_numbers_are_one_based() {
        let cmd = StickerCommands::Scale {
            date: "today".into(),
            number: 2,
            step: ScaleStep::Down,
        };
        let (date, edit) = cmd.into_edit().unwrap();
        assert_eq!(date, "today");
        assert_eq!(edit, StickerEdit::Shrink(1));

        let zero = StickerCommands::Remove {
            date: "2024-03-01".into(),
            number: 0,
        };
        assert!(zero.into_edit().is_err());
    }

    #[test]
    fn move_keeps_coordinates() {
        let cmd = StickerCommands::Move {
            date: "2024-03-01".into(),
            number: 1,
            x: 0.25,
            y: 0.75,
        };
        let (_, edit) = cmd.into_edit().unwrap();
        assert_eq!(edit, StickerEdit::Move { index: 0, x: 0.25, y: 0.75 });
    }
}
