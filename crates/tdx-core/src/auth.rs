//! Credential exchange with the backend (register, login).
//!
//! The gateway owns no state: a successful login hands back a
//! [`LoginResult`] that the caller stores in the
//! [`SessionStore`](crate::session::SessionStore).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::http::{describe_reqwest_error, endpoint_url, json_headers, server_message};
use crate::session::User;

const LOGIN_FALLBACK: &str = "Login failed. Check your credentials.";
const REGISTER_FALLBACK: &str = "Registration failed. Please try again.";

/// A required field was left blank. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is required", self.field)
    }
}

impl std::error::Error for ValidationError {}

/// Why an auth call failed.
///
/// `Rejected` and `Unreachable` are shown to the user the same way; the
/// distinction only exists for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    Validation,
    Rejected,
    Unreachable,
}

/// Login/register failure carrying the message to show the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthError {
    fn rejected(body: &str, fallback: &str) -> Self {
        Self {
            kind: AuthErrorKind::Rejected,
            message: server_message(body).unwrap_or_else(|| fallback.to_string()),
        }
    }

    fn unreachable(fallback: &str) -> Self {
        Self {
            kind: AuthErrorKind::Unreachable,
            message: fallback.to_string(),
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(e: ValidationError) -> Self {
        Self {
            kind: AuthErrorKind::Validation,
            message: e.to_string(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AuthError {}

/// Token and profile returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    name: String,
    email: String,
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError { field })
    } else {
        Ok(())
    }
}

/// Performs register/login against the configured backend.
pub struct AuthGateway {
    http: reqwest::Client,
    login_url: String,
    register_url: String,
}

impl AuthGateway {
    pub fn new(http: reqwest::Client, base_url: &str, config: &Config) -> Self {
        Self {
            http,
            login_url: endpoint_url(base_url, &config.endpoints.login),
            register_url: endpoint_url(base_url, &config.endpoints.register),
        }
    }

    /// Creates an account. Success carries no data; the user logs in next.
    ///
    /// # Errors
    /// Returns an [`AuthError`] for blank fields, any non-success response,
    /// or a transport failure.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        require("name", name)?;
        require("email", email)?;
        require("password", password)?;

        let request = RegisterRequest {
            name: name.trim(),
            email: email.trim(),
            password,
        };
        tracing::debug!(url = %self.register_url, "register");

        let response = self
            .http
            .post(&self.register_url)
            .headers(json_headers(None))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("register transport failure: {}", describe_reqwest_error(&e));
                AuthError::unreachable(REGISTER_FALLBACK)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "register rejected");
            return Err(AuthError::rejected(&body, REGISTER_FALLBACK));
        }
        Ok(())
    }

    /// Exchanges credentials for a token and user profile.
    ///
    /// # Errors
    /// Returns an [`AuthError`] whose message is the server's own message
    /// when it sent one, or a generic fallback otherwise.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        require("email", email)?;
        require("password", password)?;

        let request = LoginRequest {
            email: email.trim(),
            password,
        };
        tracing::debug!(url = %self.login_url, "login");

        let response = self
            .http
            .post(&self.login_url)
            .headers(json_headers(None))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("login transport failure: {}", describe_reqwest_error(&e));
                AuthError::unreachable(LOGIN_FALLBACK)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "login rejected");
            return Err(AuthError::rejected(&body, LOGIN_FALLBACK));
        }

        let body: LoginResponse = response.json().await.map_err(|e| {
            tracing::warn!("login response unreadable: {}", describe_reqwest_error(&e));
            AuthError::unreachable(LOGIN_FALLBACK)
        })?;

        Ok(LoginResult {
            token: body.token,
            user: User {
                name: body.name,
                email: body.email,
            },
        })
    }
}
