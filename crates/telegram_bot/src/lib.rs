//! Telegram bot.
//!
//! The bot is a thin client of the [`Engine`]: it turns commands, text
//! messages and button presses into engine calls and renders the replies.

use std::sync::Arc;

use engine::Engine;
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::commands::VocabCommands;

mod commands;
mod handlers;
mod parsing;
mod ui;

#[derive(Clone)]
pub struct ConfigParameters {
    engine: Arc<Engine>,
}

pub struct Bot {
    token: String,
    engine: Arc<Engine>,
}

impl Bot {
    pub fn builder() -> BotBuilder {
        BotBuilder::default()
    }

    pub async fn run(&self) {
        tracing::info!("Starting telegram bot...");

        let bot = teloxide::Bot::new(&self.token);

        if let Err(err) = bot.set_my_commands(VocabCommands::bot_commands()).await {
            tracing::warn!("failed to register bot commands: {err}");
        }

        let parameters = ConfigParameters {
            engine: self.engine.clone(),
        };

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<VocabCommands>()
                    .endpoint(handlers::handle_command),
            )
            .branch(Update::filter_message().endpoint(handlers::handle_text))
            .branch(Update::filter_callback_query().endpoint(handlers::handle_callback));

        Dispatcher::builder(bot, handler)
            .dependencies(dptree::deps![parameters])
            .default_handler(|upd| async move {
                tracing::warn!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error has occurred in the dispatcher",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

#[derive(Default, Debug)]
pub struct BotBuilder {
    token: String,
    engine: Option<Arc<Engine>>,
}

impl BotBuilder {
    pub fn token(mut self, token: &str) -> BotBuilder {
        self.token = token.to_string();
        self
    }

    pub fn engine(mut self, engine: Arc<Engine>) -> BotBuilder {
        self.engine = Some(engine);
        self
    }

    pub fn build(self) -> Result<Bot, String> {
        tracing::info!("Initializing telegram bot...");
        if self.token.is_empty() {
            return Err("telegram token is missing".to_string());
        }
        let engine = self.engine.ok_or("engine is missing")?;

        Ok(Bot {
            token: self.token,
            engine,
        })
    }
}
