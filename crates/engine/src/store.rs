//! Persistence of vocabulary entries.
//!
//! The engine only talks to the [`WordStore`] trait; [`SqlWordStore`] is the
//! sea-orm backed implementation used by the binary.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    Category, NewEntry, OwnerId, StoreError, VocabEntry,
    entry::{self, encode_examples},
};

/// Record service holding the vocabulary of every owner.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// Entries of `owner`, optionally restricted to `category`, ordered by index.
    async fn entries(
        &self,
        owner: OwnerId,
        category: Option<Category>,
    ) -> Result<Vec<VocabEntry>, StoreError>;

    /// Persist a new entry with the next free index of `owner`.
    async fn insert(&self, owner: OwnerId, entry: NewEntry) -> Result<VocabEntry, StoreError>;

    /// Append `example` to the entry `index` of `owner`. `None` when there is
    /// no such entry.
    async fn append_example(
        &self,
        owner: OwnerId,
        index: i64,
        example: &str,
    ) -> Result<Option<VocabEntry>, StoreError>;
}

#[derive(Clone, Debug)]
pub struct SqlWordStore {
    database: DatabaseConnection,
}

impl SqlWordStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

fn corrupt(index: i64, err: serde_json::Error) -> StoreError {
    StoreError::Corrupt {
        index,
        reason: format!("examples: {err}"),
    }
}

#[async_trait]
impl WordStore for SqlWordStore {
    async fn entries(
        &self,
        owner: OwnerId,
        category: Option<Category>,
    ) -> Result<Vec<VocabEntry>, StoreError> {
        let mut query = entry::Entity::find().filter(entry::Column::OwnerId.eq(owner.key()));
        if let Some(category) = category {
            query = query.filter(entry::Column::Category.eq(category.as_str()));
        }

        query
            .order_by_asc(entry::Column::EntryIndex)
            .all(&self.database)
            .await?
            .into_iter()
            .map(VocabEntry::try_from)
            .collect()
    }

    async fn insert(&self, owner: OwnerId, new: NewEntry) -> Result<VocabEntry, StoreError> {
        let db_tx = self.database.begin().await?;

        let last = entry::Entity::find()
            .filter(entry::Column::OwnerId.eq(owner.key()))
            .order_by_desc(entry::Column::EntryIndex)
            .one(&db_tx)
            .await?;
        let index = last.map_or(1, |model| model.entry_index + 1);

        let examples = encode_examples(&new.examples).map_err(|err| corrupt(index, err))?;
        let active = entry::ActiveModel {
            id: ActiveValue::NotSet,
            owner_id: ActiveValue::Set(owner.key()),
            entry_index: ActiveValue::Set(index),
            word: ActiveValue::Set(new.word),
            meaning: ActiveValue::Set(new.meaning),
            examples: ActiveValue::Set(examples),
            category: ActiveValue::Set(new.category.map(|c| c.as_str().to_string())),
            created_at: ActiveValue::Set(Utc::now()),
        };
        let model = active.insert(&db_tx).await?;
        db_tx.commit().await?;

        VocabEntry::try_from(model)
    }

    async fn append_example(
        &self,
        owner: OwnerId,
        index: i64,
        example: &str,
    ) -> Result<Option<VocabEntry>, StoreError> {
        let db_tx = self.database.begin().await?;

        let Some(model) = entry::Entity::find()
            .filter(entry::Column::OwnerId.eq(owner.key()))
            .filter(entry::Column::EntryIndex.eq(index))
            .one(&db_tx)
            .await?
        else {
            return Ok(None);
        };

        let mut current = VocabEntry::try_from(model.clone())?;
        current.examples.push(example.to_string());

        let mut active: entry::ActiveModel = model.into();
        active.examples =
            ActiveValue::Set(encode_examples(&current.examples).map_err(|err| corrupt(index, err))?);
        let model = active.update(&db_tx).await?;
        db_tx.commit().await?;

        VocabEntry::try_from(model).map(Some)
    }
}
