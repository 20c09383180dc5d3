use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use token_gate::config::auth_config_from_env;

/// Issue tokens with the server's signing configuration (read from the environment / .env).
///
/// Outputs:
/// - auth token (and refresh token unless `--auth-only`)
/// - a ready-to-paste header line for the configured carrier
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Principal the token asserts.
    #[arg(long)]
    username: String,

    /// Auth token lifetime in seconds. Default: AUTH_TOKEN_VALID_SECONDS or the built-in default.
    #[arg(long)]
    valid_seconds: Option<u64>,

    /// Issue only an auth token.
    #[arg(long, default_value_t = false)]
    auth_only: bool,

    /// Print JSON instead of plain lines.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = auth_config_from_env()?;
    if let Some(secs) = args.valid_seconds {
        config = config.with_auth_token_valid_time(Duration::from_secs(secs));
    }

    let valid_time = config.effective_auth_token_valid_time();
    let auth_token = config.issue_new_token(&args.username, valid_time)?;
    let refresh_token = if args.auth_only {
        None
    } else {
        Some(config.issue_refresh_token(&args.username)?)
    };

    if args.json {
        let out = serde_json::json!({
            "auth_token": auth_token,
            "refresh_token": refresh_token,
            "expires_in": valid_time.as_secs(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let header = if config.bearer_tokens {
        format!("Authorization: Bearer {auth_token}")
    } else {
        format!("{}: {auth_token}", config.effective_auth_token_name())
    };

    println!("{header}");
    if let Some(refresh_token) = refresh_token {
        println!("{}: {refresh_token}", config.effective_refresh_token_name());
    }

    Ok(())
}
