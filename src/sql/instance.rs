//! Instance operations for PostgreSQL database.
//!
//! Rows live in the `instances` table. `(schema_id, name)` is unique, and `schema_id` references
//! `schemas` so an instance of a missing schema is rejected as a foreign key violation.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::SqlResult;
use crate::{Instance, InstanceId, InstanceUpdate, SchemaId};

#[derive(sqlx::FromRow)]
struct InstanceRow {
    instance_id: Uuid,
    schema_id: Uuid,
    name: String,
    data: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InstanceRow> for Instance {
    fn from(row: InstanceRow) -> Self {
        Instance {
            id: InstanceId::from_uuid(row.instance_id),
            name: row.name,
            schema_id: SchemaId::from_uuid(row.schema_id),
            data: row.data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "instance_id, schema_id, name, data, created_at, updated_at";

/// Inserts an instance.
///
/// # Returns
/// * `Ok(())` - Instance created successfully
/// * `Err(DataStoreError::NotFound)` - The schema does not exist
/// * `Err(DataStoreError::AlreadyExists)` - The name is taken within the schema
pub async fn create(tx: &mut Transaction<'_, Postgres>, instance: &Instance) -> SqlResult<()> {
    sqlx::query(
        r#"
        INSERT INTO instances (instance_id, schema_id, name, data, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(instance.id.as_uuid())
    .bind(instance.schema_id.as_uuid())
    .bind(&instance.name)
    .bind(&instance.data)
    .bind(instance.created_at)
    .bind(instance.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Retrieves an instance of `schema_id`.
pub async fn get(
    tx: &mut Transaction<'_, Postgres>,
    schema_id: &SchemaId,
    id: &InstanceId,
) -> SqlResult<Option<Instance>> {
    let row = sqlx::query_as::<_, InstanceRow>(&format!(
        "SELECT {COLUMNS} FROM instances WHERE instance_id = $1 AND schema_id = $2"
    ))
    .bind(id.as_uuid())
    .bind(schema_id.as_uuid())
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row.map(Instance::from))
}

/// Lists the instances of one schema, oldest first.
pub async fn list(
    tx: &mut Transaction<'_, Postgres>,
    schema_id: &SchemaId,
) -> SqlResult<Vec<Instance>> {
    let rows = sqlx::query_as::<_, InstanceRow>(&format!(
        "SELECT {COLUMNS} FROM instances WHERE schema_id = $1 ORDER BY created_at, name"
    ))
    .bind(schema_id.as_uuid())
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows.into_iter().map(Instance::from).collect())
}

/// Replaces an instance's data, and its name when one is given.
pub async fn update(
    tx: &mut Transaction<'_, Postgres>,
    schema_id: &SchemaId,
    id: &InstanceId,
    update: &InstanceUpdate,
) -> SqlResult<Option<Instance>> {
    let row = sqlx::query_as::<_, InstanceRow>(&format!(
        r#"
        UPDATE instances
        SET name = COALESCE($3, name),
            data = $4,
            updated_at = CURRENT_TIMESTAMP
        WHERE instance_id = $1 AND schema_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id.as_uuid())
    .bind(schema_id.as_uuid())
    .bind(update.name.as_deref())
    .bind(&update.data)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row.map(Instance::from))
}

/// Deletes one instance. Returns whether a row was deleted.
pub async fn delete(
    tx: &mut Transaction<'_, Postgres>,
    schema_id: &SchemaId,
    id: &InstanceId,
) -> SqlResult<bool> {
    let result = sqlx::query("DELETE FROM instances WHERE instance_id = $1 AND schema_id = $2")
        .bind(id.as_uuid())
        .bind(schema_id.as_uuid())
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected() > 0)
}
