//! In-process [`Store`] backend.
//!
//! Mirrors the PostgreSQL semantics (soft deletes, partial unique indexes,
//! newest-first listing) so the auth flow behaves the same with or without a
//! database. Every operation runs under one write or read guard, which makes
//! a read-modify-write such as a refresh "touch" atomic against a concurrent
//! delete of the same row.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::record::{unique_constraint_name, FieldValue, Filter, Record, RecordId};
use crate::store::{Store, StoreError};

struct Table<R: Record> {
    rows: BTreeMap<R::Id, R>,
    seq: i64,
}

/// A [`Store`] kept entirely in memory.
pub struct MemoryStore<R: Record> {
    table: RwLock<Table<R>>,
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                seq: 0,
            }),
        }
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject `candidate` if a different live row already holds any of its
/// unique column groups. Groups containing a NULL never clash.
fn check_unique<R: Record>(rows: &BTreeMap<R::Id, R>, candidate: &R) -> Result<(), StoreError> {
    for group in R::UNIQUE {
        let values: Option<Vec<FieldValue>> = group.iter().map(|c| candidate.field(c)).collect();
        let Some(values) = values else {
            continue;
        };

        let clash = rows.values().any(|row| {
            row.id() != candidate.id()
                && !row.is_deleted()
                && group
                    .iter()
                    .zip(&values)
                    .all(|(column, value)| row.field(column).as_ref() == Some(value))
        });
        if clash {
            return Err(StoreError::Conflict(unique_constraint_name(R::TABLE, group)));
        }
    }
    Ok(())
}

#[async_trait]
impl<R: Record> Store<R> for MemoryStore<R> {
    async fn create(&self, input: R::Create) -> Result<R, StoreError> {
        let mut table = self.table.write().await;
        let id = R::Id::generate(table.seq + 1);
        let record = R::from_create(id, input, Utc::now());
        check_unique(&table.rows, &record)?;

        table.seq += 1;
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: R::Id) -> Result<Option<R>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).filter(|r| !r.is_deleted()).cloned())
    }

    async fn find_one(&self, filter: Filter<'_>) -> Result<Option<R>, StoreError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .find(|r| !r.is_deleted() && r.matches(filter))
            .cloned())
    }

    async fn list(&self, filter: Filter<'_>) -> Result<Vec<R>, StoreError> {
        let table = self.table.read().await;
        let mut rows: Vec<R> = table
            .rows
            .values()
            .filter(|r| !r.is_deleted() && r.matches(filter))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.timestamps()
                .created_at
                .cmp(&a.timestamps().created_at)
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(rows)
    }

    async fn update(&self, id: R::Id, input: R::Update) -> Result<Option<R>, StoreError> {
        let mut table = self.table.write().await;
        let Some(existing) = table.rows.get(&id).filter(|r| !r.is_deleted()) else {
            return Ok(None);
        };

        let mut candidate = existing.clone();
        candidate.apply_update(input);
        candidate.timestamps_mut().updated_at = Utc::now();
        check_unique(&table.rows, &candidate)?;

        table.rows.insert(id, candidate.clone());
        Ok(Some(candidate))
    }

    async fn soft_delete(&self, id: R::Id) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(row) if !row.is_deleted() => {
                let now = Utc::now();
                let stamps = row.timestamps_mut();
                stamps.deleted_at = Some(now);
                stamps.updated_at = now;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn soft_delete_where(
        &self,
        filter: Filter<'_>,
        except: Option<R::Id>,
    ) -> Result<u64, StoreError> {
        let mut table = self.table.write().await;
        let now = Utc::now();
        let mut deleted = 0;
        for row in table.rows.values_mut() {
            if row.is_deleted() || !row.matches(filter) || Some(row.id()) == except {
                continue;
            }
            let stamps = row.timestamps_mut();
            stamps.deleted_at = Some(now);
            stamps.updated_at = now;
            deleted += 1;
        }
        Ok(deleted)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
