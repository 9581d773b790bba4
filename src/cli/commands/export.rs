use clap::Subcommand;

use crate::cli::config::load_config;
use crate::cli::utils::{output_data, parse_date_arg};
use crate::cli::OutputFormat;
use crate::export::ExportMode;

#[derive(Subcommand)]
pub enum ExportCommands {
    #[command(about = "Show the pages and file name a PDF export would produce")]
    Plan {
        #[arg(help = "day, week or month")]
        mode: String,
        #[arg(help = "First day, YYYY-MM-DD")]
        from: String,
        #[arg(help = "Last day, YYYY-MM-DD or 'today'")]
        to: String,
    },
}

pub async fn handle(cmd: ExportCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ExportCommands::Plan { mode, from, to } => {
            let mode: ExportMode = mode.parse()?;
            let from = parse_date_arg(&from)?;
            let to = parse_date_arg(&to)?;

            let client = load_config()?.client()?;
            let plan = client.export_plan(mode, from, to).await?;

            output_data(&output_format, &plan, |plan| {
                println!("{}", plan.filename);
                for (i, page) in plan.pages.iter().enumerate() {
                    println!("{:>3}. {}  ({} active day(s))", i + 1, page.label, page.active_days);
                }
            })
        }
    }
}
