//! Schema operations for PostgreSQL database.
//!
//! Rows live in the `schemas` table. Names are unique through a table constraint, and deleting a
//! row cascades to its instances.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::SqlResult;
use crate::{Schema, SchemaId, SchemaUpdate};

#[derive(sqlx::FromRow)]
struct SchemaRow {
    schema_id: Uuid,
    name: String,
    attributes: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SchemaRow> for Schema {
    fn from(row: SchemaRow) -> Self {
        Schema {
            id: SchemaId::from_uuid(row.schema_id),
            name: row.name,
            attributes: row.attributes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "schema_id, name, attributes, created_at, updated_at";

/// Inserts a schema.
///
/// # Returns
/// * `Ok(())` - Schema created successfully
/// * `Err(DataStoreError::AlreadyExists)` - The name or id is taken
/// * `Err(DataStoreError::Internal)` - Database error
///
/// # Examples
/// ```no_run
/// # use dynaschema::{Schema, sql};
/// # use serde_json::json;
/// # use sqlx::PgPool;
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let schema = Schema::new("person", json!({"age": {"type": "number"}}));
/// let mut tx = pool.begin().await?;
/// sql::schema::create(&mut tx, &schema).await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```
pub async fn create(tx: &mut Transaction<'_, Postgres>, schema: &Schema) -> SqlResult<()> {
    sqlx::query(
        r#"
        INSERT INTO schemas (schema_id, name, attributes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(schema.id.as_uuid())
    .bind(&schema.name)
    .bind(&schema.attributes)
    .bind(schema.created_at)
    .bind(schema.updated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Retrieves a schema by id.
pub async fn get(tx: &mut Transaction<'_, Postgres>, id: &SchemaId) -> SqlResult<Option<Schema>> {
    let row = sqlx::query_as::<_, SchemaRow>(&format!(
        "SELECT {COLUMNS} FROM schemas WHERE schema_id = $1"
    ))
    .bind(id.as_uuid())
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row.map(Schema::from))
}

/// Retrieves a schema by name.
pub async fn find_by_name(
    tx: &mut Transaction<'_, Postgres>,
    name: &str,
) -> SqlResult<Option<Schema>> {
    let row = sqlx::query_as::<_, SchemaRow>(&format!(
        "SELECT {COLUMNS} FROM schemas WHERE name = $1"
    ))
    .bind(name)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row.map(Schema::from))
}

/// Lists every schema, oldest first.
pub async fn list(tx: &mut Transaction<'_, Postgres>) -> SqlResult<Vec<Schema>> {
    let rows = sqlx::query_as::<_, SchemaRow>(&format!(
        "SELECT {COLUMNS} FROM schemas ORDER BY created_at, name"
    ))
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows.into_iter().map(Schema::from).collect())
}

/// Applies an update, bumping `updated_at` to the transaction timestamp.
///
/// # Returns
/// * `Ok(Some(Schema))` - The updated schema
/// * `Ok(None)` - No schema has this id
/// * `Err(DataStoreError::AlreadyExists)` - The new name is taken
pub async fn update(
    tx: &mut Transaction<'_, Postgres>,
    id: &SchemaId,
    update: &SchemaUpdate,
) -> SqlResult<Option<Schema>> {
    let row = sqlx::query_as::<_, SchemaRow>(&format!(
        r#"
        UPDATE schemas
        SET name = COALESCE($2, name),
            attributes = COALESCE($3::jsonb, attributes),
            updated_at = CURRENT_TIMESTAMP
        WHERE schema_id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id.as_uuid())
    .bind(update.name.as_deref())
    .bind(update.attributes.as_ref())
    .fetch_optional(&mut **tx)
    .await?;
    Ok(row.map(Schema::from))
}

/// Deletes a schema; its instances go with it.
///
/// Returns whether a row was deleted.
pub async fn delete(tx: &mut Transaction<'_, Postgres>, id: &SchemaId) -> SqlResult<bool> {
    let result = sqlx::query("DELETE FROM schemas WHERE schema_id = $1")
        .bind(id.as_uuid())
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DataStoreError;
    use serde_json::json;

    #[tokio::test]
    async fn create_and_get() {
        let Some(pool) = super::super::tests::setup_test_db().await else {
            return;
        };
        let schema = Schema::new("person", json!({"age": {"type": "number"}}));

        let mut tx = pool.begin().await.unwrap();
        create(&mut tx, &schema).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let fetched = get(&mut tx, &schema.id).await.unwrap();
        let by_name = find_by_name(&mut tx, "person").await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(fetched, Some(schema.clone()));
        assert_eq!(by_name, Some(schema));
    }

    #[tokio::test]
    async fn create_duplicate_name_fails() {
        let Some(pool) = super::super::tests::setup_test_db().await else {
            return;
        };
        let mut tx = pool.begin().await.unwrap();
        create(&mut tx, &Schema::new("dup", json!({})))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let result = create(&mut tx, &Schema::new("dup", json!({}))).await;
        assert_eq!(result, Err(DataStoreError::AlreadyExists));
    }

    #[tokio::test]
    async fn update_keeps_absent_fields() {
        let Some(pool) = super::super::tests::setup_test_db().await else {
            return;
        };
        let schema = Schema::new("person", json!({"age": {"type": "number"}}));
        let mut tx = pool.begin().await.unwrap();
        create(&mut tx, &schema).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let rename = SchemaUpdate {
            name: Some("people".to_string()),
            attributes: None,
        };
        let updated = update(&mut tx, &schema.id, &rename).await.unwrap().unwrap();
        tx.commit().await.unwrap();
        assert_eq!(updated.name, "people");
        assert_eq!(updated.attributes, schema.attributes);
        assert_eq!(updated.created_at, schema.created_at);
        assert!(updated.updated_at >= schema.updated_at);

        let mut tx = pool.begin().await.unwrap();
        let missing = update(&mut tx, &SchemaId::generate(), &SchemaUpdate::default())
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn list_and_delete() {
        let Some(pool) = super::super::tests::setup_test_db().await else {
            return;
        };
        let first = Schema::new("first", json!({}));
        let second = Schema::new("second", json!({}));
        let mut tx = pool.begin().await.unwrap();
        create(&mut tx, &first).await.unwrap();
        create(&mut tx, &second).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        assert_eq!(list(&mut tx).await.unwrap().len(), 2);
        assert!(delete(&mut tx, &first.id).await.unwrap());
        assert!(!delete(&mut tx, &first.id).await.unwrap());
        let remaining = list(&mut tx).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(remaining, vec![second]);
    }
}
