pub mod server;

use secrecy::SecretString;

/// Action to perform once the CLI has been parsed.
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        dsn: String,
        site_url: String,
        session_ttl_seconds: i64,
        resend_api_key: Option<SecretString>,
        contact_from: String,
        contact_to: String,
        live_trading: bool,
        paper_trading: bool,
    },
}
