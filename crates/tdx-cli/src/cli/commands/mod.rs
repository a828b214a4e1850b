//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod todos;

use anyhow::Result;
use tdx_core::auth::AuthGateway;
use tdx_core::config::Config;
use tdx_core::http;
use tdx_core::session::Session;
use tdx_core::todos::HttpTodoClient;

/// Printed whenever the route guard sends the user to login.
pub const LOGIN_HINT: &str = "Not logged in. Run `tdx login` first.";

/// What the network-facing commands share: one HTTP client and the resolved
/// backend.
pub struct Context<'a> {
    http: reqwest::Client,
    base_url: String,
    config: &'a Config,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        let base_url = config.effective_base_url()?;
        tracing::debug!(%base_url, "using backend");
        Ok(Self {
            http: http::build_client(config.request_timeout())?,
            base_url,
            config,
        })
    }

    pub fn auth_gateway(&self) -> AuthGateway {
        AuthGateway::new(self.http.clone(), &self.base_url, self.config)
    }

    pub fn todo_client(&self, session: &Session) -> HttpTodoClient {
        HttpTodoClient::new(self.http.clone(), &self.base_url, self.config, session)
    }
}
