use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_config, save_config};
use crate::cli::utils::{output_data, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the current server and whether a token is stored")]
    Show,

    #[command(about = "Point the CLI at a DayPat API server")]
    SetServer {
        #[arg(help = "Server base URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "Store a session token (JWT) for API calls")]
    SetToken {
        #[arg(help = "Bearer token")]
        token: String,
    },
}

pub async fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = load_config()?;
            let summary = json!({
                "server_url": config.server_url,
                "token_set": config.token.is_some(),
                "updated_at": config.updated_at,
            });
            output_data(&output_format, &summary, |_| {
                println!("Server: {}", config.server_url);
                println!("Token:  {}", if config.token.is_some() { "set" } else { "not set" });
            })
        }
        ConfigCommands::SetServer { url } => {
            url::Url::parse(&url)
                .map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", url, e))?;
            let mut config = load_config()?;
            config.server_url = url.clone();
            config.touch();
            save_config(&config)?;
            output_success(
                &output_format,
                &format!("Server set to {}", url),
                Some(json!({ "server_url": url })),
            )
        }
        ConfigCommands::SetToken { token } => {
            let mut config = load_config()?;
            config.token = Some(token.trim().to_string());
            config.touch();
            save_config(&config)?;
            output_success(&output_format, "Token saved", None)
        }
    }
}
