use engine::{
    CaptureReply, CaptureStep, Category, EngineError, OwnerId, QuizProgress, capture::SKIP,
};
use teloxide::{
    prelude::*,
    types::{CallbackQuery, ChatId, User},
    utils::command::BotCommands,
};

use crate::{
    ConfigParameters,
    commands::VocabCommands,
    parsing::{CallbackData, parse_callback},
    ui,
};

mod exports;

const NOT_OWNER: &str = "⛔ Sorry, this bot only works for its owner.";
const NO_ACTIVE_QUIZ: &str = "🤷 No active quiz. Send /quiz to start one.";

pub(crate) async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: VocabCommands,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    let Some(owner) = owner_of(&cfg, msg.from.as_ref()) else {
        bot.send_message(chat_id, NOT_OWNER).await?;
        return Ok(());
    };

    match cmd {
        VocabCommands::Help => {
            bot.send_message(chat_id, VocabCommands::descriptions().to_string())
                .await?;
        }
        VocabCommands::Start => match cfg.engine.start_capture(owner).await {
            Ok(step) => send_prompt(&bot, chat_id, step).await?,
            Err(err) => {
                bot.send_message(chat_id, user_message_for_error(&err))
                    .await?;
            }
        },
        VocabCommands::List { category } => {
            let filter = if category.is_empty() {
                None
            } else {
                match Category::try_from(category.as_str()) {
                    Ok(category) => Some(category),
                    Err(err) => {
                        bot.send_message(chat_id, user_message_for_error(&err))
                            .await?;
                        return Ok(());
                    }
                }
            };

            match cfg.engine.list(owner, filter).await {
                Ok(entries) if entries.is_empty() => {
                    bot.send_message(chat_id, "📭 No words saved yet. Send /start to add one.")
                        .await?;
                }
                Ok(entries) => {
                    for chunk in ui::render_list(&entries) {
                        bot.send_message(chat_id, chunk).await?;
                    }
                }
                Err(err) => {
                    bot.send_message(chat_id, user_message_for_error(&err))
                        .await?;
                }
            }
        }
        VocabCommands::Quiz => match cfg.engine.start_quiz(owner).await {
            Ok(question) => {
                let (text, kb) = ui::render_question(&question);
                bot.send_message(chat_id, text).reply_markup(kb).await?;
            }
            Err(err) => {
                bot.send_message(chat_id, user_message_for_error(&err))
                    .await?;
            }
        },
        VocabCommands::Example { index, sentence } => {
            let Some(index) = index.filter(|_| !sentence.is_empty()) else {
                bot.send_message(chat_id, "Usage: /example <index> <sentence>")
                    .await?;
                return Ok(());
            };

            match cfg.engine.add_example(owner, index, &sentence).await {
                Ok(entry) => {
                    bot.send_message(
                        chat_id,
                        format!("✍️ Example added.\n{}", ui::format_entry(&entry)),
                    )
                    .await?;
                }
                Err(err) => {
                    bot.send_message(chat_id, user_message_for_error(&err))
                        .await?;
                }
            }
        }
        VocabCommands::Export => exports::send_export(&bot, chat_id, &cfg, owner).await?,
    }

    Ok(())
}

/// Plain text feeds the running capture. Strangers get no answer.
pub(crate) async fn handle_text(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let Some(owner) = owner_of(&cfg, msg.from.as_ref()) else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    if text.starts_with('/') {
        bot.send_message(chat_id, "Unknown command. Send /help for the list.")
            .await?;
        return Ok(());
    }

    let result = cfg.engine.capture_text(owner, text).await;
    reply_capture(&bot, chat_id, &cfg, owner, result).await
}

pub(crate) async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let Some(owner) = owner_of(&cfg, Some(&q.from)) else {
        return Ok(());
    };

    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let chat_id = message.chat().id;
    let message_id = message.id();

    let _ = bot.answer_callback_query(q.id.clone()).await;

    let Some(data) = q.data.as_deref().and_then(parse_callback) else {
        tracing::warn!("unrecognized callback data: {:?}", q.data);
        return Ok(());
    };

    match data {
        CallbackData::Answer(token) => match cfg.engine.answer_quiz(owner, token).await {
            Ok(outcome) => {
                bot.edit_message_text(chat_id, message_id, ui::render_verdict(&outcome.answered))
                    .await?;
                match outcome.progress {
                    QuizProgress::Question(question) => {
                        let (text, kb) = ui::render_question(&question);
                        bot.send_message(chat_id, text).reply_markup(kb).await?;
                    }
                    QuizProgress::Finished { score, total } => {
                        bot.send_message(chat_id, ui::render_score(score, total))
                            .await?;
                    }
                }
            }
            Err(err) => match quiz_answer_message(&err) {
                Some(text) => {
                    bot.send_message(chat_id, text).await?;
                }
                None => tracing::debug!("ignored stale answer {token:?}"),
            },
        },
        CallbackData::Category(value) => {
            let category = if value == SKIP {
                None
            } else {
                match Category::try_from(value.as_str()) {
                    Ok(category) => Some(category),
                    Err(err) => {
                        tracing::warn!("bad category button: {err}");
                        return Ok(());
                    }
                }
            };

            let _ = bot.edit_message_reply_markup(chat_id, message_id).await;
            match cfg.engine.capture_category(owner, category).await {
                Err(EngineError::StaleAnswer) => {
                    tracing::debug!("ignored stale category button {value}");
                }
                result => reply_capture(&bot, chat_id, &cfg, owner, result).await?,
            }
        }
    }

    Ok(())
}

async fn reply_capture(
    bot: &Bot,
    chat_id: ChatId,
    cfg: &ConfigParameters,
    owner: OwnerId,
    result: Result<CaptureReply, EngineError>,
) -> ResponseResult<()> {
    match result {
        Ok(CaptureReply::Next(step)) => send_prompt(bot, chat_id, step).await,
        Ok(CaptureReply::Saved(entry)) => {
            bot.send_message(chat_id, ui::render_saved(&entry)).await?;
            Ok(())
        }
        Err(err @ (EngineError::EmptyInput | EngineError::InvalidCategory(_))) => {
            bot.send_message(chat_id, user_message_for_error(&err))
                .await?;
            // The step did not move, ask for it again.
            if let Some(session) = cfg.engine.current_capture(owner).await {
                send_prompt(bot, chat_id, session.step()).await?;
            }
            Ok(())
        }
        Err(err) => {
            bot.send_message(chat_id, user_message_for_error(&err))
                .await?;
            Ok(())
        }
    }
}

async fn send_prompt(bot: &Bot, chat_id: ChatId, step: CaptureStep) -> ResponseResult<()> {
    let request = bot.send_message(chat_id, ui::step_prompt(step));
    if step == CaptureStep::Category {
        request.reply_markup(ui::category_keyboard()).await?;
    } else {
        request.await?;
    }
    Ok(())
}

fn owner_of(cfg: &ConfigParameters, from: Option<&User>) -> Option<OwnerId> {
    let from = from?;
    let caller = OwnerId(from.id.0);
    (caller == cfg.engine.owner()).then_some(caller)
}

/// Reply to a failed quiz answer. Stale buttons get none.
fn quiz_answer_message(err: &EngineError) -> Option<String> {
    match err {
        EngineError::StaleAnswer => None,
        EngineError::NoActiveSession => Some(NO_ACTIVE_QUIZ.to_string()),
        err => Some(user_message_for_error(err)),
    }
}

fn user_message_for_error(err: &EngineError) -> String {
    match err {
        EngineError::PermissionDenied => NOT_OWNER.to_string(),
        EngineError::NoActiveSession => {
            "Nothing in progress. Send /start to add a word or /quiz to practice.".to_string()
        }
        EngineError::StaleAnswer => "That question is no longer active.".to_string(),
        EngineError::InsufficientData { have, need } => format!(
            "📚 You need at least {need} words for a quiz, you have {have}. Send /start to add more."
        ),
        EngineError::EmptyInput => "Please send some text.".to_string(),
        EngineError::InvalidCategory(value) => {
            let known = Category::ALL
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("Unknown category \"{value}\". Use one of: {known}.")
        }
        EngineError::EntryNotFound(index) => format!("No word with index {index}."),
        EngineError::Store(_) => "⚠️ Storage problem, please try again later.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_answers_without_quiz_point_to_quiz() {
        assert_eq!(
            quiz_answer_message(&EngineError::NoActiveSession).as_deref(),
            Some("🤷 No active quiz. Send /quiz to start one.")
        );
        assert_eq!(quiz_answer_message(&EngineError::StaleAnswer), None);
        assert_eq!(
            quiz_answer_message(&EngineError::PermissionDenied).as_deref(),
            Some(NOT_OWNER)
        );
    }

    #[test]
    fn error_messages_name_the_problem() {
        assert_eq!(
            user_message_for_error(&EngineError::InsufficientData { have: 2, need: 4 }),
            "📚 You need at least 4 words for a quiz, you have 2. Send /start to add more."
        );
        assert_eq!(
            user_message_for_error(&EngineError::InvalidCategory("Tier".to_string())),
            "Unknown category \"Tier\". Use one of: Nomen, Verb, Adjektiv, Adverb."
        );
        assert_eq!(
            user_message_for_error(&EngineError::EntryNotFound(9)),
            "No word with index 9."
        );
    }
}
