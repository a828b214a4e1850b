//! reqwest implementation of [`TodoApi`].

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use super::api::TodoApi;
use super::error::{FetchError, FetchErrorKind};
use super::model::Todo;
use crate::config::Config;
use crate::http::{describe_reqwest_error, endpoint_url, json_headers};
use crate::session::Session;

#[derive(Serialize)]
struct StatusPatch {
    done: bool,
}

/// Todo backend client. Only constructible from a [`Session`], whose token
/// is sent as a bearer credential on every request.
pub struct HttpTodoClient {
    http: reqwest::Client,
    todos_url: String,
    token: String,
}

impl HttpTodoClient {
    pub fn new(http: reqwest::Client, base_url: &str, config: &Config, session: &Session) -> Self {
        Self {
            http,
            todos_url: endpoint_url(base_url, &config.endpoints.todos),
            token: session.token.clone(),
        }
    }

    /// `<todos_url>/<id>` with `id` percent-encoded as a single path segment.
    fn item_url(&self, id: &str) -> Result<Url, FetchError> {
        let kind = FetchErrorKind::Update;
        let mut url = Url::parse(&self.todos_url)
            .map_err(|e| FetchError::with_details(kind, format!("Invalid todos URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| FetchError::with_details(kind, "Todos URL cannot take a path"))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

fn classify(kind: FetchErrorKind) -> impl Fn(reqwest::Error) -> FetchError {
    move |e| {
        let details = describe_reqwest_error(&e);
        tracing::warn!(%kind, "{details}");
        FetchError::with_details(kind, details)
    }
}

async fn ensure_success(
    response: reqwest::Response,
    kind: FetchErrorKind,
) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%kind, status = status.as_u16(), "todo request rejected");
    Err(FetchError::http_status(kind, status.as_u16(), &body))
}

#[async_trait]
impl TodoApi for HttpTodoClient {
    async fn list(&self) -> Result<Vec<Todo>, FetchError> {
        let kind = FetchErrorKind::Fetch;
        tracing::debug!(url = %self.todos_url, "list todos");
        let response = self
            .http
            .get(&self.todos_url)
            .headers(json_headers(Some(&self.token)))
            .send()
            .await
            .map_err(classify(kind))?;

        ensure_success(response, kind)
            .await?
            .json::<Vec<Todo>>()
            .await
            .map_err(classify(kind))
    }

    async fn create(&self, text: &str) -> Result<Todo, FetchError> {
        let kind = FetchErrorKind::Create;
        let candidate = Todo::candidate(text);
        tracing::debug!(url = %self.todos_url, candidate = %candidate.id, "create todo");
        let response = self
            .http
            .post(&self.todos_url)
            .headers(json_headers(Some(&self.token)))
            .json(&candidate)
            .send()
            .await
            .map_err(classify(kind))?;

        ensure_success(response, kind)
            .await?
            .json::<Todo>()
            .await
            .map_err(classify(kind))
    }

    async fn set_status(&self, id: &str, done: bool) -> Result<(), FetchError> {
        let kind = FetchErrorKind::Update;
        let url = self.item_url(id)?;
        tracing::debug!(%url, done, "patch todo");
        let response = self
            .http
            .patch(url)
            .headers(json_headers(Some(&self.token)))
            .json(&StatusPatch { done })
            .send()
            .await
            .map_err(classify(kind))?;

        // Body may be the updated todo or empty; only `done` is merged locally.
        ensure_success(response, kind).await?;
        Ok(())
    }
}
