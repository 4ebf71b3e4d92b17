//! # Instances
//!
//! Instances are records of one schema. Their `data` must pass
//! [`crate::validate_data_against_schema`] against the schema's attributes as they are at the
//! moment of the create or update; later schema edits do not revisit existing instances.
//!
//! All routes are nested under `/schemas/:schema_id/instances`.

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data_store::now;
use crate::extractors::JsonOrYaml;
use crate::router::{AppState, MessageResponse};
use crate::schema::{SCHEMA_NOT_FOUND, parse_schema_id};
use crate::{ApiError, DataStoreError, InstanceId, InstanceUpdate, Schema, SchemaId};

const INSTANCE_NOT_FOUND: &str = "Instance not found";
const INVALID_NAME: &str = "Name is required and must be a string";
const INVALID_DATA: &str = "Data is required and must be an object";
const INSTANCE_NAME_TAKEN: &str = "Instance with this name already exists for this schema";

/// A stored instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Unique id.
    pub id: InstanceId,
    /// Trimmed name, unique within the schema.
    pub name: String,
    /// The schema this instance conforms to.
    pub schema_id: SchemaId,
    /// The data exactly as supplied.
    pub data: Value,
    /// When the instance was created.
    pub created_at: DateTime<Utc>,
    /// When the instance was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Instance {
    /// Creates an instance with a fresh id and both timestamps set to now.
    pub fn new(schema_id: SchemaId, name: impl Into<String>, data: Value) -> Self {
        let timestamp = now();
        Self {
            id: InstanceId::generate(),
            name: name.into(),
            schema_id,
            data,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

/// Body of instance create and update requests.
///
/// `name` is required on create and optional on update; `data` is always required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRequest {
    /// Instance name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Instance data.
    pub data: Value,
}

impl InstanceRequest {
    /// Reads a request out of a loosely-typed body.
    pub fn from_body(body: &Value, name_required: bool) -> Result<Self, ApiError> {
        let name = name_field(body, name_required)?;
        let data = match body.get("data") {
            Some(data @ Value::Object(_)) => data.clone(),
            _ => return Err(ApiError::BadRequest(INVALID_DATA.to_string())),
        };
        Ok(Self { name, data })
    }
}

fn name_field(body: &Value, required: bool) -> Result<Option<String>, ApiError> {
    match body.get("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => Ok(Some(name.trim().to_string())),
        None | Some(Value::Null) if !required => Ok(None),
        _ => Err(ApiError::BadRequest(INVALID_NAME.to_string())),
    }
}

fn parse_instance_id(raw: &str) -> Result<InstanceId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid instance id".to_string()))
}

fn name_conflict(err: DataStoreError) -> ApiError {
    match err {
        DataStoreError::AlreadyExists => ApiError::Conflict(INSTANCE_NAME_TAKEN.to_string()),
        DataStoreError::NotFound => ApiError::NotFound(SCHEMA_NOT_FOUND.to_string()),
        other => ApiError::Internal(other),
    }
}

async fn load_schema(state: &AppState, schema_id: &SchemaId) -> Result<Schema, ApiError> {
    state
        .store
        .get_schema(schema_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(SCHEMA_NOT_FOUND.to_string()))
}

fn check_data(schema: &Schema, data: &Value) -> Result<(), ApiError> {
    let result = schema.validate_data(data);
    if !result.is_valid {
        tracing::debug!(schema_id = %schema.id, errors = ?result.errors(), "rejected instance data");
    }
    result.into_data_mismatch().map_err(ApiError::from)
}

async fn create_instance(
    State(state): State<AppState>,
    Path(schema_id): Path<String>,
    JsonOrYaml(body): JsonOrYaml,
) -> Result<(StatusCode, Json<Instance>), ApiError> {
    let schema_id = parse_schema_id(&schema_id)?;
    name_field(&body, true)?;
    let schema = load_schema(&state, &schema_id).await?;
    let request = InstanceRequest::from_body(&body, true)?;
    check_data(&schema, &request.data)?;

    let name = request.name.unwrap_or_default();
    let instance = Instance::new(schema.id, name, request.data);
    state
        .store
        .create_instance(&instance)
        .await
        .map_err(name_conflict)?;
    tracing::info!(instance_id = %instance.id, %schema_id, "created instance");
    Ok((StatusCode::CREATED, Json(instance)))
}

async fn list_instances(
    State(state): State<AppState>,
    Path(schema_id): Path<String>,
) -> Result<Json<Vec<Instance>>, ApiError> {
    let schema_id = parse_schema_id(&schema_id)?;
    Ok(Json(state.store.list_instances(&schema_id).await?))
}

async fn get_instance(
    State(state): State<AppState>,
    Path((schema_id, instance_id)): Path<(String, String)>,
) -> Result<Json<Instance>, ApiError> {
    let schema_id = parse_schema_id(&schema_id)?;
    let instance_id = parse_instance_id(&instance_id)?;
    match state.store.get_instance(&schema_id, &instance_id).await? {
        Some(instance) => Ok(Json(instance)),
        None => Err(ApiError::NotFound(INSTANCE_NOT_FOUND.to_string())),
    }
}

async fn update_instance(
    State(state): State<AppState>,
    Path((schema_id, instance_id)): Path<(String, String)>,
    JsonOrYaml(body): JsonOrYaml,
) -> Result<Json<Instance>, ApiError> {
    let schema_id = parse_schema_id(&schema_id)?;
    let instance_id = parse_instance_id(&instance_id)?;
    let schema = load_schema(&state, &schema_id).await?;
    let request = InstanceRequest::from_body(&body, false)?;
    check_data(&schema, &request.data)?;

    let update = InstanceUpdate {
        name: request.name,
        data: request.data,
    };
    match state
        .store
        .update_instance(&schema_id, &instance_id, update)
        .await
        .map_err(name_conflict)?
    {
        Some(instance) => {
            tracing::info!(%instance_id, %schema_id, "updated instance");
            Ok(Json(instance))
        }
        None => Err(ApiError::NotFound(INSTANCE_NOT_FOUND.to_string())),
    }
}

async fn delete_instance(
    State(state): State<AppState>,
    Path((schema_id, instance_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let schema_id = parse_schema_id(&schema_id)?;
    let instance_id = parse_instance_id(&instance_id)?;
    if !state
        .store
        .delete_instance(&schema_id, &instance_id)
        .await?
    {
        return Err(ApiError::NotFound(INSTANCE_NOT_FOUND.to_string()));
    }
    tracing::info!(%instance_id, %schema_id, "deleted instance");
    Ok(Json(MessageResponse::new("Instance deleted successfully")))
}

/// Creates the router for the instance routes.
pub fn create_instance_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/schemas/:schema_id/instances",
            get(list_instances).post(create_instance),
        )
        .route(
            "/schemas/:schema_id/instances/:instance_id",
            get(get_instance)
                .put(update_instance)
                .delete(delete_instance),
        )
        .with_state(state)
}
