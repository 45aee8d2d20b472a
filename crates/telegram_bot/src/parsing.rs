//! Callback data carried by inline buttons.
//!
//! Quiz options encode `quiz:<session>:<question>:<option>`, category picks
//! encode `cat:<name>` (`cat:-` skips the field). Telegram caps callback data
//! at 64 bytes, so the session id uses the 32-character simple form.

use engine::AnswerToken;
use uuid::Uuid;

const QUIZ_PREFIX: &str = "quiz:";
const CATEGORY_PREFIX: &str = "cat:";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CallbackData {
    Answer(AnswerToken),
    Category(String),
}

pub(crate) fn answer_data(token: AnswerToken) -> String {
    format!(
        "{QUIZ_PREFIX}{}:{}:{}",
        token.session.simple(),
        token.question,
        token.option
    )
}

pub(crate) fn category_data(value: &str) -> String {
    format!("{CATEGORY_PREFIX}{value}")
}

pub(crate) fn parse_callback(data: &str) -> Option<CallbackData> {
    if let Some(rest) = data.strip_prefix(QUIZ_PREFIX) {
        let mut parts = rest.split(':');
        let session = Uuid::parse_str(parts.next()?).ok()?;
        let question = parts.next()?.parse().ok()?;
        let option = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        return Some(CallbackData::Answer(AnswerToken {
            session,
            question,
            option,
        }));
    }

    data.strip_prefix(CATEGORY_PREFIX)
        .filter(|value| !value.is_empty())
        .map(|value| CallbackData::Category(value.to_string()))
}
