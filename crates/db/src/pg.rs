//! PostgreSQL [`Store`] backend.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::{PgPool, Postgres};

use crate::record::{FieldValue, Filter, PgQueryAs, Record};
use crate::store::{Store, StoreError};

type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// A [`Store`] over one table of a PostgreSQL database.
pub struct PgStore<R> {
    pool: PgPool,
    _record: PhantomData<fn() -> R>,
}

impl<R> PgStore<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

impl<R> Clone for PgStore<R> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

/// Render `filter` as `col = $n AND ` fragments starting at `$first`.
///
/// Returns the fragment and the next free placeholder index.
fn filter_clause(filter: Filter<'_>, first: usize) -> (String, usize) {
    let mut clause = String::new();
    let mut next = first;
    for (column, _) in filter {
        clause.push_str(&format!("{column} = ${next} AND "));
        next += 1;
    }
    (clause, next)
}

fn bind_filter_as<'q, R>(mut query: PgQueryAs<'q, R>, filter: Filter<'_>) -> PgQueryAs<'q, R> {
    for (_, value) in filter {
        query = match value {
            FieldValue::Int(v) => query.bind(*v),
            FieldValue::Uuid(v) => query.bind(*v),
            FieldValue::Text(v) => query.bind(v.clone()),
        };
    }
    query
}

fn bind_filter<'q>(mut query: PgQuery<'q>, filter: Filter<'_>) -> PgQuery<'q> {
    for (_, value) in filter {
        query = match value {
            FieldValue::Int(v) => query.bind(*v),
            FieldValue::Uuid(v) => query.bind(*v),
            FieldValue::Text(v) => query.bind(v.clone()),
        };
    }
    query
}

/// Unique violations (SQLSTATE 23505) become [`StoreError::Conflict`].
fn classify(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            return StoreError::Conflict(constraint);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl<R: Record> Store<R> for PgStore<R> {
    async fn create(&self, input: R::Create) -> Result<R, StoreError> {
        let placeholders = (1..=R::INSERT_COLUMNS.len())
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders}) RETURNING {}",
            R::TABLE,
            R::INSERT_COLUMNS.join(", "),
            R::COLUMNS,
        );
        R::bind_create(sqlx::query_as::<_, R>(&query), &input)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_by_id(&self, id: R::Id) -> Result<Option<R>, StoreError> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1 AND deleted_at IS NULL",
            R::COLUMNS,
            R::TABLE,
        );
        sqlx::query_as::<_, R>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn find_one(&self, filter: Filter<'_>) -> Result<Option<R>, StoreError> {
        let (clause, _) = filter_clause(filter, 1);
        let query = format!(
            "SELECT {} FROM {} WHERE {clause}deleted_at IS NULL LIMIT 1",
            R::COLUMNS,
            R::TABLE,
        );
        bind_filter_as(sqlx::query_as::<_, R>(&query), filter)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn list(&self, filter: Filter<'_>) -> Result<Vec<R>, StoreError> {
        let (clause, _) = filter_clause(filter, 1);
        let query = format!(
            "SELECT {} FROM {} WHERE {clause}deleted_at IS NULL
             ORDER BY created_at DESC, id DESC",
            R::COLUMNS,
            R::TABLE,
        );
        bind_filter_as(sqlx::query_as::<_, R>(&query), filter)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)
    }

    async fn update(&self, id: R::Id, input: R::Update) -> Result<Option<R>, StoreError> {
        let assignments = R::UPDATE_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{column} = COALESCE(${}, {column})", i + 2))
            .chain(std::iter::once("updated_at = NOW()".to_string()))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "UPDATE {} SET {assignments} WHERE id = $1 AND deleted_at IS NULL RETURNING {}",
            R::TABLE,
            R::COLUMNS,
        );
        R::bind_update(sqlx::query_as::<_, R>(&query).bind(id), &input)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)
    }

    async fn soft_delete(&self, id: R::Id) -> Result<bool, StoreError> {
        let query = format!(
            "UPDATE {} SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
            R::TABLE,
        );
        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete_where(
        &self,
        filter: Filter<'_>,
        except: Option<R::Id>,
    ) -> Result<u64, StoreError> {
        let (clause, next) = filter_clause(filter, 1);
        let mut query = format!(
            "UPDATE {} SET deleted_at = NOW(), updated_at = NOW()
             WHERE {clause}deleted_at IS NULL",
            R::TABLE,
        );
        if except.is_some() {
            query.push_str(&format!(" AND id <> ${next}"));
        }

        let mut statement = bind_filter(sqlx::query(&query), filter);
        if let Some(keep) = except {
            statement = statement.bind(keep);
        }
        let result = statement.execute(&self.pool).await.map_err(classify)?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
