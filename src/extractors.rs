//! Request body extraction shared by the schema and instance routes.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ApiError;

/// Extracts a body as JSON or YAML depending on its `Content-Type`.
///
/// Any content type mentioning `yaml` or `yml` is parsed as YAML; everything else, including a
/// missing header, as JSON. An empty body deserializes from `null` so that handlers can report
/// the missing field themselves.
pub struct JsonOrYaml<T = Value>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrYaml<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_yaml = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("yaml") || ct.contains("yml"))
            .unwrap_or(false);

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read request body".to_string()))?;

        parse_body(&bytes, is_yaml).map(JsonOrYaml)
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8], is_yaml: bool) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(Value::Null)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")));
    }
    if is_yaml {
        serde_yml::from_slice(bytes).map_err(|e| ApiError::BadRequest(format!("Invalid yaml: {e}")))
    } else {
        serde_json::from_slice(bytes).map_err(|e| ApiError::BadRequest(format!("Invalid json: {e}")))
    }
}
