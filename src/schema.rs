//! # Schemas
//!
//! A schema is a named attribute map. Creating or updating one runs the structural check from
//! [`crate::validate_schema_structure`] first, so every stored schema compiles to an [`AttributeMap`] that data
//! validation can walk.
//!
//! ## Routes
//!
//! | method | path | result |
//! |---|---|---|
//! | `POST` | `/schemas` | `201` with the stored schema |
//! | `GET` | `/schemas` | every schema, oldest first |
//! | `GET` | `/schemas/:schema_id` | one schema |
//! | `PUT` | `/schemas/:schema_id` | the updated schema |
//! | `DELETE` | `/schemas/:schema_id` | `{"message": "Schema deleted successfully"}` |
//!
//! Bodies may be JSON or YAML (see [`JsonOrYaml`]).

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data_store::now;
use crate::extractors::JsonOrYaml;
use crate::router::{AppState, MessageResponse};
use crate::{
    ApiError, AttributeMap, DataStoreError, SchemaId, SchemaUpdate, ValidationLimits,
    ValidationResult, validate_data_against_schema, validate_schema_structure_with_limits,
};

pub(crate) const SCHEMA_NOT_FOUND: &str = "Schema not found";
const INVALID_SCHEMA_NAME: &str = "Invalid schema name";
const INVALID_ATTRIBUTES: &str = "Invalid attributes";
const SCHEMA_NAME_TAKEN: &str = "Schema with this name already exists";

/// A stored schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Unique id.
    pub id: SchemaId,
    /// Unique, trimmed name.
    pub name: String,
    /// The attribute map exactly as the client supplied it.
    pub attributes: Value,
    /// When the schema was created.
    pub created_at: DateTime<Utc>,
    /// When the schema was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Schema {
    /// Creates a schema with a fresh id and both timestamps set to now.
    ///
    /// The attributes are not validated here.
    pub fn new(name: impl Into<String>, attributes: Value) -> Self {
        let timestamp = now();
        Self {
            id: SchemaId::generate(),
            name: name.into(),
            attributes,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Compiles the stored attributes for data validation.
    pub fn attribute_map(&self) -> AttributeMap {
        AttributeMap::from_value(&self.attributes)
    }

    /// Validates candidate instance data against this schema's current attributes.
    pub fn validate_data(&self, data: &Value) -> ValidationResult {
        validate_data_against_schema(data, &self.attribute_map())
    }
}

/// Body of `POST /schemas`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSchemaRequest {
    /// Name for the new schema.
    pub name: String,
    /// Attribute definitions keyed by field name.
    pub attributes: Map<String, Value>,
}

impl CreateSchemaRequest {
    /// Reads a create request out of a loosely-typed body.
    ///
    /// Checks run in the order the API reports them: the name first, then the attributes. The
    /// structural check happens separately so the name conflict can be reported in between.
    pub fn from_body(body: &Value) -> Result<Self, ApiError> {
        let name = name_field(body)?.ok_or_else(invalid_name)?;
        let attributes = attributes_field(body)?.ok_or_else(invalid_attributes)?;
        Ok(Self { name, attributes })
    }
}

/// Body of `PUT /schemas/:schema_id`. Absent members are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSchemaRequest {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement attributes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
}

impl UpdateSchemaRequest {
    /// Reads an update request out of a loosely-typed body.
    ///
    /// `null` members count as absent.
    pub fn from_body(body: &Value) -> Result<Self, ApiError> {
        if !body.is_object() && !body.is_null() {
            return Err(ApiError::BadRequest("Invalid request body".to_string()));
        }
        Ok(Self {
            name: name_field(body)?,
            attributes: attributes_field(body)?,
        })
    }
}

fn invalid_name() -> ApiError {
    ApiError::BadRequest(INVALID_SCHEMA_NAME.to_string())
}

fn invalid_attributes() -> ApiError {
    ApiError::BadRequest(INVALID_ATTRIBUTES.to_string())
}

fn name_field(body: &Value) -> Result<Option<String>, ApiError> {
    match body.get("name") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(name)) if !name.trim().is_empty() => Ok(Some(name.trim().to_string())),
        Some(_) => Err(invalid_name()),
    }
}

fn attributes_field(body: &Value) -> Result<Option<Map<String, Value>>, ApiError> {
    match body.get("attributes") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(attributes)) => Ok(Some(attributes.clone())),
        Some(_) => Err(invalid_attributes()),
    }
}

/// Runs the structural check, turning failures into a `400` with the aggregated errors.
pub fn check_structure(
    attributes: &Map<String, Value>,
    limits: &ValidationLimits,
) -> Result<(), ApiError> {
    let result = validate_schema_structure_with_limits(attributes, limits);
    if !result.is_valid {
        tracing::debug!(errors = ?result.errors(), "rejected schema structure");
    }
    result.into_structural().map_err(ApiError::from)
}

pub(crate) fn parse_schema_id(raw: &str) -> Result<SchemaId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest("Invalid schema id".to_string()))
}

fn name_conflict(err: DataStoreError) -> ApiError {
    match err {
        DataStoreError::AlreadyExists => ApiError::Conflict(SCHEMA_NAME_TAKEN.to_string()),
        other => ApiError::Internal(other),
    }
}

async fn create_schema(
    State(state): State<AppState>,
    JsonOrYaml(body): JsonOrYaml,
) -> Result<(StatusCode, Json<Schema>), ApiError> {
    let name = name_field(&body)?.ok_or_else(invalid_name)?;
    if state.store.find_schema_by_name(&name).await?.is_some() {
        return Err(ApiError::Conflict(SCHEMA_NAME_TAKEN.to_string()));
    }
    let request = CreateSchemaRequest::from_body(&body)?;
    check_structure(&request.attributes, &state.limits)?;

    let schema = Schema::new(request.name, Value::Object(request.attributes));
    state
        .store
        .create_schema(&schema)
        .await
        .map_err(name_conflict)?;
    tracing::info!(schema_id = %schema.id, name = %schema.name, "created schema");
    Ok((StatusCode::CREATED, Json(schema)))
}

async fn list_schemas(State(state): State<AppState>) -> Result<Json<Vec<Schema>>, ApiError> {
    Ok(Json(state.store.list_schemas().await?))
}

async fn get_schema(
    State(state): State<AppState>,
    Path(schema_id): Path<String>,
) -> Result<Json<Schema>, ApiError> {
    let schema_id = parse_schema_id(&schema_id)?;
    match state.store.get_schema(&schema_id).await? {
        Some(schema) => Ok(Json(schema)),
        None => Err(ApiError::NotFound(SCHEMA_NOT_FOUND.to_string())),
    }
}

async fn update_schema(
    State(state): State<AppState>,
    Path(schema_id): Path<String>,
    JsonOrYaml(body): JsonOrYaml,
) -> Result<Json<Schema>, ApiError> {
    let schema_id = parse_schema_id(&schema_id)?;
    let request = UpdateSchemaRequest::from_body(&body)?;
    if let Some(attributes) = &request.attributes {
        check_structure(attributes, &state.limits)?;
    }

    let update = SchemaUpdate {
        name: request.name,
        attributes: request.attributes.map(Value::Object),
    };
    match state
        .store
        .update_schema(&schema_id, update)
        .await
        .map_err(name_conflict)?
    {
        Some(schema) => {
            tracing::info!(schema_id = %schema.id, "updated schema");
            Ok(Json(schema))
        }
        None => Err(ApiError::NotFound(SCHEMA_NOT_FOUND.to_string())),
    }
}

async fn delete_schema(
    State(state): State<AppState>,
    Path(schema_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let schema_id = parse_schema_id(&schema_id)?;
    if !state.store.delete_schema(&schema_id).await? {
        return Err(ApiError::NotFound(SCHEMA_NOT_FOUND.to_string()));
    }
    tracing::info!(%schema_id, "deleted schema");
    Ok(Json(MessageResponse::new("Schema deleted successfully")))
}

/// Creates the router for the schema routes.
pub fn create_schema_router(state: AppState) -> Router {
    Router::new()
        .route("/schemas", get(list_schemas).post(create_schema))
        .route(
            "/schemas/:schema_id",
            get(get_schema).put(update_schema).delete(delete_schema),
        )
        .with_state(state)
}
