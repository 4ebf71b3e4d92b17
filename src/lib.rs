//! # Dynaschema: Content Types Defined at Runtime
//!
//! Dynaschema serves a small content API where the shape of the data is itself data. Clients
//! register **schemas** describing named attributes, then store **instances** whose payloads are
//! checked against those schemas on every write.
//!
//! This crate provides:
//!
//! - **Schema Validation**: a recursive validator for attribute maps and a matching data
//!   validator for instance payloads
//! - **HTTP API**: RESTful endpoints for schemas and their instances, accepting JSON or YAML
//! - **Storage**: an in-memory store for development and tests, and a PostgreSQL store
//! - **CLI**: `dsctl`, a client for the HTTP API that can also validate attribute maps offline
//!
//! ## Attribute Maps
//!
//! A schema's `attributes` map field names to definitions:
//!
//! ```json
//! {
//!   "name": { "type": "string", "required": true },
//!   "tags": { "type": "array", "isArray": true },
//!   "address": {
//!     "type": "object",
//!     "isObject": true,
//!     "properties": { "city": { "type": "string" } }
//!   }
//! }
//! ```
//!
//! Valid types are `string`, `number`, `boolean`, `date`, `array` and `object`. Nested
//! `properties` of object-typed fields are validated recursively.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ HTTP API Layer (Axum routes)            │
//! ├─────────────────────────────────────────┤
//! │ Validation (attribute maps, data)       │
//! ├─────────────────────────────────────────┤
//! │ Data Store (Trait-based abstraction)    │
//! ├─────────────────────────────────────────┤
//! │ Persistence (memory or PostgreSQL)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage Examples
//!
//! ### Validating Attributes and Data
//!
//! ```rust
//! # use dynaschema::{AttributeMap, validate_data_against_schema, validate_schema_structure};
//! # use serde_json::json;
//! let attributes = json!({
//!     "age": { "type": "number" },
//!     "born": { "type": "date" }
//! });
//! let attributes = attributes.as_object().unwrap();
//! assert!(validate_schema_structure(attributes).is_valid);
//!
//! let schema = AttributeMap::compile(attributes);
//! let result = validate_data_against_schema(&json!({"age": "old", "born": "1990-01-01"}), &schema);
//! assert_eq!(result.errors(), ["Invalid value for field: age"]);
//! ```
//!
//! ### Serving the API
//!
//! ```rust,no_run
//! # use dynaschema::{AppState, create_router};
//! # #[tokio::main]
//! # async fn main() {
//! let app = create_router(AppState::in_memory());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

#![warn(missing_docs)]

mod attribute;
mod data_store;
mod errors;
mod id;
mod validate;

/// Schema records and the `/schemas` routes.
pub mod schema;

/// Instance records and the `/schemas/:schema_id/instances` routes.
pub mod instance;

/// Request extractors shared by the HTTP handlers.
pub mod extractors;

/// Application state and the top-level router.
pub mod router;

/// Server configuration from flags and environment.
pub mod config;

/// PostgreSQL-backed storage.
pub mod sql;

// CLI utility modules

/// Command-line interface utilities for program termination and output formatting.
pub mod cli_utils;

/// Command-line interface command handlers for `dsctl`.
pub mod commands;

/// HTTP client for the dynaschema API.
pub mod http_utils;

pub use attribute::{AttributeDefinition, AttributeMap, AttributeType};
pub use config::{ConfigError, ServerArgs, ServerConfig};
pub use data_store::{DataStore, InMemoryDataStore, InstanceUpdate, SchemaUpdate};
pub use errors::{ApiError, DataStoreError, ErrorBody};
pub use id::{IdParseError, InstanceId, SchemaId};
pub use instance::{Instance, InstanceRequest, create_instance_router};
pub use router::{AppState, MessageResponse, create_router};
pub use schema::{CreateSchemaRequest, Schema, UpdateSchemaRequest, create_schema_router};
pub use sql::PostgresDataStore;
pub use validate::{
    DEFAULT_MAX_DEPTH, ValidationError, ValidationLimits, ValidationResult, parses_as_date,
    validate_data_against_schema, validate_field, validate_type, validate_schema_structure,
    validate_schema_structure_with_limits,
};
