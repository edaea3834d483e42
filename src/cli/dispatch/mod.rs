use crate::cli::{actions::Action, commands};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Build the [`Action`] from parsed CLI matches.
///
/// # Errors
///
/// Returns an error if a defaulted argument is unexpectedly missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches
            .get_one::<u16>(commands::ARG_PORT)
            .copied()
            .unwrap_or(8080),
        dsn: matches
            .get_one::<String>(commands::ARG_DSN)
            .cloned()
            .context("missing argument: --dsn")?,
        site_url: matches
            .get_one::<String>(commands::ARG_SITE_URL)
            .cloned()
            .context("missing argument: --site-url")?,
        session_ttl_seconds: matches
            .get_one::<i64>(commands::ARG_SESSION_TTL)
            .copied()
            .unwrap_or(604_800),
        resend_api_key: matches
            .get_one::<String>(commands::ARG_RESEND_API_KEY)
            .map(|key| SecretString::from(key.clone())),
        contact_from: matches
            .get_one::<String>(commands::ARG_CONTACT_FROM)
            .cloned()
            .context("missing argument: --contact-from")?,
        contact_to: matches
            .get_one::<String>(commands::ARG_CONTACT_TO)
            .cloned()
            .context("missing argument: --contact-to")?,
        live_trading: matches.get_flag(commands::ARG_LIVE_TRADING),
        paper_trading: matches
            .get_one::<bool>(commands::ARG_PAPER_TRADING)
            .copied()
            .unwrap_or(true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn handler_builds_server_action_from_defaults() -> Result<()> {
        temp_env::with_vars(
            [
                ("TRADEPILOT_DSN", None::<&str>),
                ("TRADEPILOT_RESEND_API_KEY", None::<&str>),
            ],
            || {
                let matches = commands::new().get_matches_from(vec!["tradepilot"]);
                let action = handler(&matches)?;
                let Action::Server {
                    port,
                    dsn,
                    site_url,
                    session_ttl_seconds,
                    resend_api_key,
                    live_trading,
                    paper_trading,
                    ..
                } = action;
                assert_eq!(port, 8080);
                assert_eq!(dsn, "postgres://postgres@localhost:5432/tradepilot");
                assert_eq!(site_url, "http://localhost:3000");
                assert_eq!(session_ttl_seconds, 604_800);
                assert!(resend_api_key.is_none());
                assert!(!live_trading);
                assert!(paper_trading);
                Ok(())
            },
        )
    }
}
