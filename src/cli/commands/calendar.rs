use chrono::Datelike;
use clap::Args;

use crate::aggregation::{ActivityMap, ActivityRecord};
use crate::cli::config::load_config;
use crate::cli::utils::{output_data, parse_date_arg};
use crate::cli::OutputFormat;
use crate::dates::CalendarDate;

#[derive(Args)]
pub struct MonthArgs {
    #[arg(help = "Year (defaults to the current year)")]
    pub year: Option<i32>,
    #[arg(help = "Month 1-12 (defaults to the current month)")]
    pub month: Option<u32>,
}

#[derive(Args)]
pub struct WeekArgs {
    #[arg(help = "Any day in the week, YYYY-MM-DD or 'today'")]
    pub anchor: Option<String>,
}

#[derive(Args)]
pub struct StreakArgs {
    #[arg(help = "Day to compute the selected streak for (defaults to today)")]
    pub selected: Option<String>,
}

const WEEKDAY_HEADER: &str = " Mo  Tu  We  Th  Fr  Sa  Su";

pub async fn month(args: MonthArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let today = CalendarDate::today().naive();
    let year = args.year.unwrap_or(today.year());
    let month = args.month.unwrap_or(today.month());

    let client = load_config()?.client()?;
    let view = client.month(year, month).await?;

    output_data(&output_format, &view, |view| {
        println!("{:04}-{:02}", view.year, view.month);
        println!("{}", WEEKDAY_HEADER);
        for week in view.cells.chunks(7) {
            let row: Vec<String> = week
                .iter()
                .map(|cell| {
                    if cell.in_month {
                        cell_label(cell.date, view.activity.get(&cell.date))
                    } else {
                        "    ".to_string()
                    }
                })
                .collect();
            println!("{}", row.join(""));
        }
        println!("{}", legend(&view.activity));
    })
}

pub async fn week(args: WeekArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let anchor = args.anchor.as_deref().map(parse_date_arg).transpose()?;

    let client = load_config()?.client()?;
    let view = client.week(anchor).await?;

    output_data(&output_format, &view, |view| {
        println!("{} .. {}", view.range.start, view.range.end);
        for day in &view.days {
            let weekday = day.naive().weekday();
            match view.activity.get(day) {
                Some(record) => println!(
                    "{} {}  {} praise(s){}{}",
                    weekday,
                    day,
                    record.entry_count,
                    if record.thumbnail_ref.is_some() { ", photo" } else { "" },
                    if record.has_stamp { ", stamped" } else { "" }
                ),
                None => println!("{} {}  -", weekday, day),
            }
        }
    })
}

pub async fn streak(args: StreakArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let today = CalendarDate::today();
    let selected = args.selected.as_deref().map(parse_date_arg).transpose()?;

    let client = load_config()?.client()?;
    let info = client.streak(selected, Some(today)).await?;

    output_data(&output_format, &info, |info| {
        println!("Current streak:  {} day(s)", info.current_streak);
        if let Some(selected) = selected {
            println!("Streak at {}: {} day(s)", selected, info.selected_streak);
        }
    })
}

/// Four-character cell: day number plus a marker for the busiest kind of activity
fn cell_label(date: CalendarDate, record: Option<&ActivityRecord>) -> String {
    let marker = match record {
        Some(r) if r.has_stamp => '*',
        Some(r) if r.thumbnail_ref.is_some() => '#',
        Some(r) if r.has_entry => '.',
        _ => ' ',
    };
    format!(" {:>2}{}", date.naive().day(), marker)
}

fn legend(activity: &ActivityMap) -> String {
    let entries: u32 = activity.values().map(|r| r.entry_count).sum();
    format!(
        "{} active day(s), {} praise(s)   . praise  # photo  * stamp",
        activity.values().filter(|r| r.has_activity()).count(),
        entries
    )
}
