//! # Data Storage Abstraction
//!
//! Every backend implements [`DataStore`], which offers CRUD over the two record kinds:
//!
//! ```text
//! Schema (id, unique name, attributes) ──┬── Instance (id, name unique per schema, data)
//!                                        └── Instance ...
//! ```
//!
//! Deleting a schema deletes its instances. Uniqueness of schema names, and of instance names
//! within a schema, is enforced by the store itself so that concurrent creates cannot both win.
//!
//! ## Implementations
//!
//! - [`InMemoryDataStore`]: a single `Mutex` over insertion-ordered tables.
//! - [`crate::sql::PostgresDataStore`]: PostgreSQL through `sqlx`.
//!
//! ```rust
//! use dynaschema::{DataStore, InMemoryDataStore, Schema};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = InMemoryDataStore::new();
//! let schema = Schema::new("person", json!({"age": {"type": "number"}}));
//! store.create_schema(&schema).await.unwrap();
//! let found = store.find_schema_by_name("person").await.unwrap();
//! assert_eq!(found, Some(schema));
//! # }
//! ```

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SubsecRound, Utc};
use serde_json::Value;

use crate::{DataStoreError, Instance, InstanceId, Schema, SchemaId};

/// The current time at the microsecond precision PostgreSQL stores.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Changes applied by [`DataStore::update_schema`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaUpdate {
    /// New unique name.
    pub name: Option<String>,
    /// Replacement attributes, already structurally validated.
    pub attributes: Option<Value>,
}

/// Changes applied by [`DataStore::update_instance`].
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceUpdate {
    /// New name, unique within the schema.
    pub name: Option<String>,
    /// Replacement data, already validated against the schema.
    pub data: Value,
}

/// Storage interface for schemas and instances.
///
/// Lookups return `Ok(None)` for missing records. Deletes return whether anything was removed.
///
/// # Errors
///
/// - `AlreadyExists`: a create or rename would duplicate a unique name
/// - `NotFound`: an instance was created for a schema that does not exist
/// - `Internal`: the backend failed
#[axum::async_trait]
pub trait DataStore: Send + Sync {
    // Schema operations

    /// Stores a new schema.
    async fn create_schema(&self, schema: &Schema) -> Result<(), DataStoreError>;

    /// Retrieves a schema by id.
    async fn get_schema(&self, id: &SchemaId) -> Result<Option<Schema>, DataStoreError>;

    /// Retrieves a schema by its unique name.
    async fn find_schema_by_name(&self, name: &str) -> Result<Option<Schema>, DataStoreError>;

    /// Lists every schema, oldest first.
    async fn list_schemas(&self) -> Result<Vec<Schema>, DataStoreError>;

    /// Applies `update` and advances `updated_at`.
    ///
    /// Returns the updated schema, or `None` when no schema has this id.
    async fn update_schema(
        &self,
        id: &SchemaId,
        update: SchemaUpdate,
    ) -> Result<Option<Schema>, DataStoreError>;

    /// Deletes a schema together with all of its instances.
    async fn delete_schema(&self, id: &SchemaId) -> Result<bool, DataStoreError>;

    // Instance operations

    /// Stores a new instance.
    ///
    /// Fails with `NotFound` when `instance.schema_id` names no schema.
    async fn create_instance(&self, instance: &Instance) -> Result<(), DataStoreError>;

    /// Retrieves an instance belonging to `schema_id`.
    async fn get_instance(
        &self,
        schema_id: &SchemaId,
        id: &InstanceId,
    ) -> Result<Option<Instance>, DataStoreError>;

    /// Lists the instances of one schema, oldest first.
    ///
    /// An unknown schema simply has no instances.
    async fn list_instances(&self, schema_id: &SchemaId) -> Result<Vec<Instance>, DataStoreError>;

    /// Applies `update` and advances `updated_at`.
    async fn update_instance(
        &self,
        schema_id: &SchemaId,
        id: &InstanceId,
        update: InstanceUpdate,
    ) -> Result<Option<Instance>, DataStoreError>;

    /// Deletes one instance.
    async fn delete_instance(
        &self,
        schema_id: &SchemaId,
        id: &InstanceId,
    ) -> Result<bool, DataStoreError>;
}

#[derive(Default)]
struct Tables {
    schemas: Vec<Schema>,
    instances: Vec<Instance>,
}

impl Tables {
    fn schema_name_taken(&self, name: &str, except: Option<&SchemaId>) -> bool {
        self.schemas
            .iter()
            .any(|s| s.name == name && Some(&s.id) != except)
    }

    fn instance_name_taken(
        &self,
        schema_id: &SchemaId,
        name: &str,
        except: Option<&InstanceId>,
    ) -> bool {
        self.instances
            .iter()
            .any(|i| &i.schema_id == schema_id && i.name == name && Some(&i.id) != except)
    }
}

/// Thread-safe in-memory data store.
///
/// All tables sit behind one lock, so every uniqueness check happens atomically with the write
/// it guards. Lists come back in insertion order.
#[derive(Default)]
pub struct InMemoryDataStore {
    tables: Mutex<Tables>,
}

impl InMemoryDataStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, DataStoreError> {
        self.tables
            .lock()
            .map_err(|_| DataStoreError::Internal("data store lock poisoned".to_string()))
    }
}

#[axum::async_trait]
impl DataStore for InMemoryDataStore {
    async fn create_schema(&self, schema: &Schema) -> Result<(), DataStoreError> {
        let mut tables = self.tables()?;
        if tables.schema_name_taken(&schema.name, None)
            || tables.schemas.iter().any(|s| s.id == schema.id)
        {
            return Err(DataStoreError::AlreadyExists);
        }
        tables.schemas.push(schema.clone());
        Ok(())
    }

    async fn get_schema(&self, id: &SchemaId) -> Result<Option<Schema>, DataStoreError> {
        let tables = self.tables()?;
        Ok(tables.schemas.iter().find(|s| &s.id == id).cloned())
    }

    async fn find_schema_by_name(&self, name: &str) -> Result<Option<Schema>, DataStoreError> {
        let tables = self.tables()?;
        Ok(tables.schemas.iter().find(|s| s.name == name).cloned())
    }

    async fn list_schemas(&self) -> Result<Vec<Schema>, DataStoreError> {
        Ok(self.tables()?.schemas.clone())
    }

    async fn update_schema(
        &self,
        id: &SchemaId,
        update: SchemaUpdate,
    ) -> Result<Option<Schema>, DataStoreError> {
        let mut tables = self.tables()?;
        let Some(index) = tables.schemas.iter().position(|s| &s.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            if tables.schema_name_taken(name, Some(id)) {
                return Err(DataStoreError::AlreadyExists);
            }
        }
        let schema = &mut tables.schemas[index];
        if let Some(name) = update.name {
            schema.name = name;
        }
        if let Some(attributes) = update.attributes {
            schema.attributes = attributes;
        }
        schema.updated_at = now();
        Ok(Some(schema.clone()))
    }

    async fn delete_schema(&self, id: &SchemaId) -> Result<bool, DataStoreError> {
        let mut tables = self.tables()?;
        let before = tables.schemas.len();
        tables.schemas.retain(|s| &s.id != id);
        if tables.schemas.len() == before {
            return Ok(false);
        }
        tables.instances.retain(|i| &i.schema_id != id);
        Ok(true)
    }

    async fn create_instance(&self, instance: &Instance) -> Result<(), DataStoreError> {
        let mut tables = self.tables()?;
        if !tables.schemas.iter().any(|s| s.id == instance.schema_id) {
            return Err(DataStoreError::NotFound);
        }
        if tables.instance_name_taken(&instance.schema_id, &instance.name, None)
            || tables.instances.iter().any(|i| i.id == instance.id)
        {
            return Err(DataStoreError::AlreadyExists);
        }
        tables.instances.push(instance.clone());
        Ok(())
    }

    async fn get_instance(
        &self,
        schema_id: &SchemaId,
        id: &InstanceId,
    ) -> Result<Option<Instance>, DataStoreError> {
        let tables = self.tables()?;
        Ok(tables
            .instances
            .iter()
            .find(|i| &i.id == id && &i.schema_id == schema_id)
            .cloned())
    }

    async fn list_instances(&self, schema_id: &SchemaId) -> Result<Vec<Instance>, DataStoreError> {
        let tables = self.tables()?;
        Ok(tables
            .instances
            .iter()
            .filter(|i| &i.schema_id == schema_id)
            .cloned()
            .collect())
    }

    async fn update_instance(
        &self,
        schema_id: &SchemaId,
        id: &InstanceId,
        update: InstanceUpdate,
    ) -> Result<Option<Instance>, DataStoreError> {
        let mut tables = self.tables()?;
        let Some(index) = tables
            .instances
            .iter()
            .position(|i| &i.id == id && &i.schema_id == schema_id)
        else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            if tables.instance_name_taken(schema_id, name, Some(id)) {
                return Err(DataStoreError::AlreadyExists);
            }
        }
        let instance = &mut tables.instances[index];
        if let Some(name) = update.name {
            instance.name = name;
        }
        instance.data = update.data;
        instance.updated_at = now();
        Ok(Some(instance.clone()))
    }

    async fn delete_instance(
        &self,
        schema_id: &SchemaId,
        id: &InstanceId,
    ) -> Result<bool, DataStoreError> {
        let mut tables = self.tables()?;
        let before = tables.instances.len();
        tables
            .instances
            .retain(|i| !(&i.id == id && &i.schema_id == schema_id));
        Ok(tables.instances.len() != before)
    }
}
