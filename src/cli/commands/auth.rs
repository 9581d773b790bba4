use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::config::{load_config, save_config};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Args)]
pub struct DevTokenArgs {
    #[arg(long, help = "User id to sign for (random when omitted)")]
    pub user: Option<Uuid>,

    #[arg(long, help = "Email claim")]
    pub email: Option<String>,

    #[arg(long, help = "Store the token in the CLI config")]
    pub save: bool,
}

/// Sign a token with the server's `DAYPAT_JWT_SECRET`.
///
/// Only useful against a server sharing that secret.
pub async fn handle(args: DevTokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let app_config = AppConfig::from_env();
    let user_id = args.user.unwrap_or_else(Uuid::new_v4);
    let claims = Claims::new(user_id, args.email, &app_config.security);
    let token = generate_jwt(&claims, &app_config.security)?;

    if args.save {
        let mut config = load_config()?;
        config.token = Some(token.clone());
        config.touch();
        save_config(&config)?;
    }

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Development token issued",
            Some(json!({
                "token": token,
                "user_id": user_id,
                "expires_at": claims.exp,
                "saved": args.save
            })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            eprintln!("user_id: {}{}", user_id, if args.save { " (saved)" } else { "" });
            Ok(())
        }
    }
}
