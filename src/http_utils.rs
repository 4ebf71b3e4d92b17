//! HTTP client used by `dsctl`.

use std::future::Future;

use handled::Handle;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cli_utils;
use crate::commands::errors::{UserError, format_cli_error};
use crate::errors::ErrorBody;

/// Failure of one API call.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The request never produced a response, or its body could not be decoded.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Status code.
        status: u16,
        /// The `message` of the error body, or the raw body if it was not JSON.
        message: String,
        /// Validation errors listed in the body.
        errors: Vec<String>,
    },
}

impl HttpError {
    /// The HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Transport(e) => e.status().map(|s| s.as_u16()),
            HttpError::Status { status, .. } => Some(*status),
        }
    }

    async fn from_response(response: Response) -> Self {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => HttpError::Status {
                status,
                message: match body.error {
                    Some(cause) => format!("{} ({})", body.message, cause),
                    None => body.message,
                },
                errors: body.errors.unwrap_or_default(),
            },
            Err(_) => HttpError::Status {
                status,
                message: if text.is_empty() {
                    "No error details".to_string()
                } else {
                    text
                },
                errors: Vec::new(),
            },
        }
    }
}

/// Thin JSON client over the `/api` routes.
pub struct DynaschemaClient {
    client: Client,
    base_url: String,
}

impl DynaschemaClient {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Constructs a full API URL from a path
    pub fn api_url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/api/{}", self.base_url, path)
    }

    /// Makes a GET request and handles the response
    pub async fn get<T>(&self, path: &str) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let response = self.client.get(self.api_url(path)).send().await?;
        handle_response(response).await
    }

    /// Makes a POST request with JSON body and handles the response
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.api_url(path)).json(body).send().await?;
        handle_response(response).await
    }

    /// Makes a PUT request with JSON body and handles the response
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, HttpError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self.client.put(self.api_url(path)).json(body).send().await?;
        handle_response(response).await
    }

    /// Makes a DELETE request and handles the response
    pub async fn delete<T>(&self, path: &str) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let response = self.client.delete(self.api_url(path)).send().await?;
        handle_response(response).await
    }
}

async fn handle_response<T>(response: Response) -> Result<T, HttpError>
where
    T: DeserializeOwned,
{
    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        Err(HttpError::from_response(response).await)
    }
}

/// Execute an HTTP operation and exit on error with formatted message
pub async fn execute_or_exit<T, E, F, Fut>(operation: F, context: &str) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Handle<UserError> + std::fmt::Display,
{
    match operation().await {
        Ok(result) => result,
        Err(e) => cli_utils::exit_with_error(&format!("{}: {}", context, format_cli_error(&e))),
    }
}
