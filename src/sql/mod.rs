//! PostgreSQL database operations for dynaschema.
//!
//! Functions in [`schema`] and [`instance`] each run inside a caller-provided transaction.
//! [`PostgresDataStore`] wraps them behind the [`DataStore`] trait, one transaction per call.

use sqlx::PgPool;

use crate::{
    DataStore, DataStoreError, Instance, InstanceId, InstanceUpdate, Schema, SchemaId,
    SchemaUpdate,
};

/// Schema operations.
pub mod schema;

/// Instance operations.
pub mod instance;

/// Result type for database operations.
pub type SqlResult<T> = Result<T, DataStoreError>;

/// Runs the embedded migrations against `pool`.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// [`DataStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PostgresDataStore {
    pool: PgPool,
}

impl PostgresDataStore {
    /// Wraps an existing pool. Migrations must already have been applied.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` and applies pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, DataStoreError> {
        let pool = PgPool::connect(database_url).await?;
        migrate(&pool)
            .await
            .map_err(|e| DataStoreError::Internal(e.to_string()))?;
        Ok(Self::new(pool))
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

macro_rules! in_transaction {
    ($pool:expr, |$tx:ident| $body:expr) => {{
        let mut $tx = $pool.begin().await?;
        let result = $body;
        $tx.commit().await?;
        Ok(result)
    }};
}

#[axum::async_trait]
impl DataStore for PostgresDataStore {
    async fn create_schema(&self, record: &Schema) -> Result<(), DataStoreError> {
        in_transaction!(self.pool, |tx| schema::create(&mut tx, record).await?)
    }

    async fn get_schema(&self, id: &SchemaId) -> Result<Option<Schema>, DataStoreError> {
        in_transaction!(self.pool, |tx| schema::get(&mut tx, id).await?)
    }

    async fn find_schema_by_name(&self, name: &str) -> Result<Option<Schema>, DataStoreError> {
        in_transaction!(self.pool, |tx| schema::find_by_name(&mut tx, name).await?)
    }

    async fn list_schemas(&self) -> Result<Vec<Schema>, DataStoreError> {
        in_transaction!(self.pool, |tx| schema::list(&mut tx).await?)
    }

    async fn update_schema(
        &self,
        id: &SchemaId,
        update: SchemaUpdate,
    ) -> Result<Option<Schema>, DataStoreError> {
        in_transaction!(self.pool, |tx| schema::update(&mut tx, id, &update).await?)
    }

    async fn delete_schema(&self, id: &SchemaId) -> Result<bool, DataStoreError> {
        in_transaction!(self.pool, |tx| schema::delete(&mut tx, id).await?)
    }

    async fn create_instance(&self, record: &Instance) -> Result<(), DataStoreError> {
        in_transaction!(self.pool, |tx| instance::create(&mut tx, record).await?)
    }

    async fn get_instance(
        &self,
        schema_id: &SchemaId,
        id: &InstanceId,
    ) -> Result<Option<Instance>, DataStoreError> {
        in_transaction!(self.pool, |tx| instance::get(&mut tx, schema_id, id).await?)
    }

    async fn list_instances(&self, schema_id: &SchemaId) -> Result<Vec<Instance>, DataStoreError> {
        in_transaction!(self.pool, |tx| instance::list(&mut tx, schema_id).await?)
    }

    async fn update_instance(
        &self,
        schema_id: &SchemaId,
        id: &InstanceId,
        update: InstanceUpdate,
    ) -> Result<Option<Instance>, DataStoreError> {
        in_transaction!(self.pool, |tx| instance::update(&mut tx, schema_id, id, &update)
            .await?)
    }

    async fn delete_instance(
        &self,
        schema_id: &SchemaId,
        id: &InstanceId,
    ) -> Result<bool, DataStoreError> {
        in_transaction!(self.pool, |tx| instance::delete(&mut tx, schema_id, id).await?)
    }
}
