//! Command structs

use teloxide::utils::command::{BotCommands, ParseError};

/// Passes the whole argument string through, trimmed. Empty when missing.
pub fn trailing_arg(input: String) -> Result<(String,), ParseError> {
    Ok((input.trim().to_string(),))
}

/// Splits `<index> <sentence>`. A missing or non numeric index is reported as
/// `None` so the handler can answer with the usage.
pub fn split_example(input: String) -> Result<(Option<i64>, String), ParseError> {
    let trimmed = input.trim();
    let (index, sentence) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));

    Ok((index.parse().ok(), sentence.trim().to_string()))
}

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Vocabulary commands:")]
pub enum VocabCommands {
    #[command(description = "show this message.")]
    Help,
    #[command(description = "add a new word.")]
    Start,
    #[command(
        description = "list saved words, optionally only one category (Nomen, Verb, Adjektiv, Adverb).",
        parse_with = trailing_arg
    )]
    List { category: String },
    #[command(description = "start a multiple-choice quiz.")]
    Quiz,
    #[command(
        description = "add an example to a saved word: /example <index> <sentence>.",
        parse_with = split_example
    )]
    Example {
        index: Option<i64>,
        sentence: String,
    },
    #[command(description = "export saved words as a csv file.")]
    Export,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_and_without_category() {
        assert_eq!(
            VocabCommands::parse("/list", "vocab_bot").unwrap(),
            VocabCommands::List {
                category: String::new()
            }
        );
        assert_eq!(
            VocabCommands::parse("/list Verb", "vocab_bot").unwrap(),
            VocabCommands::List {
                category: "Verb".to_string()
            }
        );
    }

    #[test]
    fn parses_example_arguments() {
        assert_eq!(
            VocabCommands::parse("/example 12 Das Haus ist alt.", "vocab_bot").unwrap(),
            VocabCommands::Example {
                index: Some(12),
                sentence: "Das Haus ist alt.".to_string()
            }
        );
        assert_eq!(
            split_example("abc Satz".to_string()).unwrap(),
            (None, "Satz".to_string())
        );
        assert_eq!(split_example("  7 ".to_string()).unwrap(), (Some(7), String::new()));
    }

    #[test]
    fn plain_commands() {
        assert_eq!(
            VocabCommands::parse("/quiz", "vocab_bot").unwrap(),
            VocabCommands::Quiz
        );
        assert_eq!(
            VocabCommands::parse("/start@vocab_bot", "vocab_bot").unwrap(),
            VocabCommands::Start
        );
    }
}
