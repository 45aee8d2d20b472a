use engine::{Answered, CaptureStep, Category, QuizQuestion, VocabEntry, capture::SKIP};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::parsing::{answer_data, category_data};

/// Telegram rejects messages above 4096 characters.
const MESSAGE_LIMIT: usize = 4000;

pub(crate) fn step_prompt(step: CaptureStep) -> &'static str {
    match step {
        CaptureStep::Word => "📝 Send the word.",
        CaptureStep::Meaning => "🧠 Now send its meaning.",
        CaptureStep::Example => "✍️ Send an example sentence, or - to skip.",
        CaptureStep::Category => "🏷 Pick a category, or - to skip.",
    }
}

pub(crate) fn category_keyboard() -> InlineKeyboardMarkup {
    let categories = Category::ALL
        .iter()
        .map(|c| InlineKeyboardButton::callback(c.as_str(), category_data(c.as_str())))
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(vec![
        categories,
        vec![InlineKeyboardButton::callback("⏭ Skip", category_data(SKIP))],
    ])
}

pub(crate) fn format_entry(entry: &VocabEntry) -> String {
    let mut line = format!("{}. {} ➜ {}", entry.index, entry.word, entry.meaning);
    if let Some(category) = entry.category {
        line.push_str(&format!(" ({category})"));
    }
    line
}

pub(crate) fn render_saved(entry: &VocabEntry) -> String {
    format!("✅ Saved!\n{}", format_entry(entry))
}

/// Entries, one per line with their examples indented below, split into
/// messages that fit Telegram's limit. Chunks break between lines; a single
/// line longer than the limit is cut on a char boundary.
pub(crate) fn render_list(entries: &[VocabEntry]) -> Vec<String> {
    let lines = entries.iter().flat_map(|entry| {
        std::iter::once(format_entry(entry)).chain(
            entry
                .examples
                .iter()
                .map(|example| format!("    ✍️ {example}")),
        )
    });

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in lines.flat_map(|line| split_long(&line)) {
        let len = line.chars().count();
        if current_len > 0 && current_len + 1 + len > MESSAGE_LIMIT {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(&line);
        current_len += len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_long(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= MESSAGE_LIMIT {
        return vec![line.to_string()];
    }
    chars
        .chunks(MESSAGE_LIMIT)
        .map(|piece| piece.iter().collect())
        .collect()
}

pub(crate) fn render_question(question: &QuizQuestion) -> (String, InlineKeyboardMarkup) {
    let text = format!(
        "❓ {}/{}: what does \"{}\" mean?",
        question.number + 1,
        question.total,
        question.word
    );

    let rows = question
        .options
        .iter()
        .enumerate()
        .map(|(idx, option)| {
            vec![InlineKeyboardButton::callback(
                option.clone(),
                answer_data(question.token(idx)),
            )]
        })
        .collect::<Vec<_>>();

    (text, InlineKeyboardMarkup::new(rows))
}

pub(crate) fn render_verdict(answered: &Answered) -> String {
    if answered.correct {
        format!("✅ Correct! {} ➜ {}", answered.word, answered.expected)
    } else {
        format!(
            "❌ Wrong: you picked \"{}\".\n{} ➜ {}",
            answered.chosen, answered.word, answered.expected
        )
    }
}

pub(crate) fn render_score(score: usize, total: usize) -> String {
    format!("🏁 Quiz finished! Your score: {score} out of {total}.")
}
