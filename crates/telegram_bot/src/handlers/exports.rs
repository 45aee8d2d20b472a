//! Handler for the csv export of the vocabulary

use csv::Writer;
use engine::{OwnerId, VocabEntry};
use serde::Serialize;
use teloxide::{prelude::*, types::InputFile};
use thiserror::Error;

use crate::ConfigParameters;

const EXPORT_FILE_NAME: &str = "vocabulary.csv";
const EXAMPLE_SEPARATOR: &str = " | ";

#[derive(Error, Debug)]
pub(crate) enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("failed to finalize export: {0}")]
    Finish(String),
}

#[derive(Serialize)]
struct ExportRow<'a> {
    index: i64,
    word: &'a str,
    meaning: &'a str,
    category: Option<&'static str>,
    examples: String,
    created_at: String,
}

pub(crate) fn entries_csv(entries: &[VocabEntry]) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::from_writer(vec![]);
    for entry in entries {
        writer.serialize(ExportRow {
            index: entry.index,
            word: &entry.word,
            meaning: &entry.meaning,
            category: entry.category.map(|c| c.as_str()),
            examples: entry.examples.join(EXAMPLE_SEPARATOR),
            created_at: entry.created_at.to_rfc3339(),
        })?;
    }

    writer
        .into_inner()
        .map_err(|err| ExportError::Finish(err.to_string()))
}

pub(super) async fn send_export(
    bot: &Bot,
    chat_id: ChatId,
    cfg: &ConfigParameters,
    owner: OwnerId,
) -> ResponseResult<()> {
    let entries = match cfg.engine.list(owner, None).await {
        Ok(entries) => entries,
        Err(err) => {
            bot.send_message(chat_id, super::user_message_for_error(&err))
                .await?;
            return Ok(());
        }
    };

    if entries.is_empty() {
        bot.send_message(chat_id, "📭 Nothing to export yet.").await?;
        return Ok(());
    }

    let data = match entries_csv(&entries) {
        Ok(data) => data,
        Err(err) => {
            tracing::error!("failed to build export: {err}");
            bot.send_message(chat_id, "⚠️ Export failed, please try again later.")
                .await?;
            return Ok(());
        }
    };

    tracing::info!("exporting {} entries", entries.len());
    bot.send_document(chat_id, InputFile::memory(data).file_name(EXPORT_FILE_NAME))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use engine::Category;

    use super::*;

    #[test]
    fn csv_has_header_and_joined_examples() {
        let entries = vec![
            VocabEntry {
                owner: OwnerId(1),
                index: 1,
                word: "Haus".to_string(),
                meaning: "house".to_string(),
                examples: vec!["Das Haus ist alt.".to_string(), "Es ist groß.".to_string()],
                category: Some(Category::Nomen),
                created_at: Utc.timestamp_opt(0, 0).unwrap(),
            },
            VocabEntry {
                owner: OwnerId(1),
                index: 2,
                word: "schnell".to_string(),
                meaning: "fast, quick".to_string(),
                examples: vec![],
                category: None,
                created_at: Utc.timestamp_opt(0, 0).unwrap(),
            },
        ];

        let data = String::from_utf8(entries_csv(&entries).unwrap()).unwrap();
        let lines: Vec<&str> = data.lines().collect();

        assert_eq!(lines[0], "index,word,meaning,category,examples,created_at");
        assert_eq!(
            lines[1],
            "1,Haus,house,Nomen,Das Haus ist alt. | Es ist groß.,1970-01-01T00:00:00+00:00"
        );
        assert_eq!(
            lines[2],
            "2,schnell,\"fast, quick\",,,1970-01-01T00:00:00+00:00"
        );
    }
}
