//! Vocabulary entries.
//!
//! A [`VocabEntry`] is one saved word with its meaning, the example sentences
//! collected so far and an optional grammatical [`Category`]. Rows live in the
//! `words` table; `entry_index` numbers the entries of one owner starting
//! from 1.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, StoreError};

/// Telegram user id of the caller or of an entry's owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub u64);

impl OwnerId {
    /// Column value. Bit-preserving, so ids above `i64::MAX` still round-trip.
    pub(crate) fn key(self) -> i64 {
        self.0 as i64
    }

    pub(crate) fn from_key(key: i64) -> Self {
        Self(key as u64)
    }
}

impl core::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grammatical category of a German word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Nomen,
    Verb,
    Adjektiv,
    Adverb,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Nomen,
        Category::Verb,
        Category::Adjektiv,
        Category::Adverb,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Nomen => "Nomen",
            Category::Verb => "Verb",
            Category::Adjektiv => "Adjektiv",
            Category::Adverb => "Adverb",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    /// Accepts the German label or its English name, case-insensitively.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "nomen" | "noun" => Ok(Category::Nomen),
            "verb" => Ok(Category::Verb),
            "adjektiv" | "adjective" => Ok(Category::Adjektiv),
            "adverb" => Ok(Category::Adverb),
            _ => Err(EngineError::InvalidCategory(value.trim().to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub owner: OwnerId,
    pub index: i64,
    pub word: String,
    pub meaning: String,
    pub examples: Vec<String>,
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
}

/// Fields collected by a capture session, before the store assigns an index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub word: String,
    pub meaning: String,
    pub examples: Vec<String>,
    pub category: Option<Category>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "words")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i64,
    pub entry_index: i64,
    pub word: String,
    pub meaning: String,
    /// JSON array of strings.
    pub examples: String,
    pub category: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn encode_examples(examples: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(examples)
}

impl TryFrom<Model> for VocabEntry {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let examples: Vec<String> =
            serde_json::from_str(&model.examples).map_err(|err| StoreError::Corrupt {
                index: model.entry_index,
                reason: format!("examples: {err}"),
            })?;
        let category = match model.category.as_deref() {
            None => None,
            Some(raw) => Some(Category::try_from(raw).map_err(|_| StoreError::Corrupt {
                index: model.entry_index,
                reason: format!("category: {raw}"),
            })?),
        };

        Ok(Self {
            owner: OwnerId::from_key(model.owner_id),
            index: model.entry_index,
            word: model.word,
            meaning: model.meaning,
            examples,
            category,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn model(examples: &str, category: Option<&str>) -> Model {
        Model {
            id: 1,
            owner_id: 42,
            entry_index: 3,
            word: "Haus".to_string(),
            meaning: "house".to_string(),
            examples: examples.to_string(),
            category: category.map(str::to_string),
            created_at: Utc.timestamp_opt(0, 0).unwrap(),
        }
    }

    #[test]
    fn category_accepts_german_and_english_names() {
        assert_eq!(Category::try_from("nomen").unwrap(), Category::Nomen);
        assert_eq!(Category::try_from(" Noun ").unwrap(), Category::Nomen);
        assert_eq!(Category::try_from("ADJEKTIV").unwrap(), Category::Adjektiv);
        assert_eq!(Category::try_from("adverb").unwrap(), Category::Adverb);
        assert_eq!(
            Category::try_from("Artikel").unwrap_err(),
            EngineError::InvalidCategory("Artikel".to_string())
        );
    }

    #[test]
    fn owner_key_round_trips_large_ids() {
        let owner = OwnerId(u64::MAX - 1);
        assert_eq!(OwnerId::from_key(owner.key()), owner);
    }

    #[test]
    fn model_into_entry() {
        let entry = VocabEntry::try_from(model(r#"["Das Haus ist alt."]"#, Some("Nomen"))).unwrap();

        assert_eq!(entry.owner, OwnerId(42));
        assert_eq!(entry.index, 3);
        assert_eq!(entry.examples, vec!["Das Haus ist alt.".to_string()]);
        assert_eq!(entry.category, Some(Category::Nomen));
    }

    #[test]
    fn corrupt_examples_are_reported() {
        let err = VocabEntry::try_from(model("not json", None)).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { index: 3, .. }));
    }
}
