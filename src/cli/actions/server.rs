use crate::api;
use crate::api::{behavior::LogBehaviorTracker, email::ContactMailer, handlers::auth::AuthConfig};
use crate::cli::actions::Action;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Handle the server action
///
/// # Errors
///
/// Returns an error if the mail client cannot be built or the server fails to
/// start.
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            site_url,
            session_ttl_seconds,
            resend_api_key,
            contact_from,
            contact_to,
            live_trading,
            paper_trading,
        } => {
            let auth_config = AuthConfig::new(site_url)
                .with_session_ttl_seconds(session_ttl_seconds)
                .with_live_trading(live_trading)
                .with_paper_trading(paper_trading);

            // The key is checked before any mail client exists; without it the
            // contact endpoint stays disabled instead of failing per request.
            let mailer = match resend_api_key {
                Some(api_key) => ContactMailer::resend(api_key, contact_from, contact_to)?,
                None => {
                    warn!("TRADEPILOT_RESEND_API_KEY not set; contact endpoint disabled");
                    ContactMailer::disabled(contact_from, contact_to)
                }
            };

            info!(live_trading, paper_trading, "trading feature flags");

            api::new(
                port,
                dsn,
                auth_config,
                Arc::new(mailer),
                Arc::new(LogBehaviorTracker),
            )
            .await?;
        }
    }

    Ok(())
}
