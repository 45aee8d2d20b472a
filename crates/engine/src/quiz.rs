//! Multiple-choice self test.
//!
//! A [`QuizSession`] samples up to `max_questions` entries without
//! replacement and asks for the meaning of each word in turn. Every question
//! shows the correct meaning once among distinct distractors. An answer
//! always moves to the next question; a correct one also bumps the score.
//! The session is over once every sampled entry was asked.

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};
use serde::Deserialize;
use uuid::Uuid;

use crate::{EngineError, ResultEngine, VocabEntry};

/// Where distractor meanings are drawn from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistractorPool {
    /// Every stored meaning of the owner. Four distinct options are
    /// guaranteed whenever the owner has four distinct meanings.
    #[default]
    Widen,
    /// Only the meanings of the sampled questions. Questions show fewer
    /// options when those meanings are too alike.
    Sample,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    /// Stored entries needed before a quiz can start.
    pub min_entries: usize,
    pub max_questions: usize,
    /// Options per question, correct one included.
    pub options: usize,
    pub distractors: DistractorPool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            min_entries: 4,
            max_questions: 10,
            options: 4,
            distractors: DistractorPool::Widen,
        }
    }
}

/// Selection bound to one option button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerToken {
    pub session: Uuid,
    pub question: usize,
    pub option: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizQuestion {
    pub session: Uuid,
    /// Zero-based position in the quiz.
    pub number: usize,
    pub total: usize,
    pub word: String,
    pub options: Vec<String>,
}

impl QuizQuestion {
    pub fn token(&self, option: usize) -> AnswerToken {
        AnswerToken {
            session: self.session,
            question: self.number,
            option,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answered {
    pub word: String,
    pub correct: bool,
    pub chosen: String,
    pub expected: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizProgress {
    Question(QuizQuestion),
    Finished { score: usize, total: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOutcome {
    pub answered: Answered,
    pub progress: QuizProgress,
}

#[derive(Clone, Debug)]
pub struct QuizSession {
    id: Uuid,
    items: Vec<VocabEntry>,
    pool: Vec<String>,
    options: usize,
    current: usize,
    score: usize,
    pending: Option<Vec<String>>,
}

fn distinct_meanings(entries: &[VocabEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(|entry| entry.meaning.trim())
        .filter(|meaning| seen.insert(*meaning))
        .map(str::to_string)
        .collect()
}

impl QuizSession {
    /// Sample a new quiz out of every stored entry of the owner.
    pub fn start<R: Rng + ?Sized>(
        entries: Vec<VocabEntry>,
        settings: &QuizSettings,
        rng: &mut R,
    ) -> ResultEngine<Self> {
        if entries.len() < settings.min_entries || entries.is_empty() {
            return Err(EngineError::InsufficientData {
                have: entries.len(),
                need: settings.min_entries.max(1),
            });
        }

        let owner_pool = distinct_meanings(&entries);

        let mut items = entries;
        items.shuffle(rng);
        items.truncate(settings.max_questions.max(1));

        let pool = match settings.distractors {
            DistractorPool::Widen => owner_pool,
            DistractorPool::Sample => distinct_meanings(&items),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            items,
            pool,
            options: settings.options,
            current: 0,
            score: 0,
            pending: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.items.len()
    }

    pub fn items(&self) -> &[VocabEntry] {
        &self.items
    }

    /// Draw the options of the current question and remember them as pending.
    /// `None` once the quiz is over.
    pub fn question<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<QuizQuestion> {
        let item = self.items.get(self.current)?;
        let correct = item.meaning.trim();

        let mut distractors: Vec<&String> = self
            .pool
            .iter()
            .filter(|meaning| meaning.as_str() != correct)
            .collect();
        distractors.shuffle(rng);

        let mut options: Vec<String> = distractors
            .into_iter()
            .take(self.options.saturating_sub(1))
            .cloned()
            .collect();
        options.push(correct.to_string());
        options.shuffle(rng);

        let question = QuizQuestion {
            session: self.id,
            number: self.current,
            total: self.items.len(),
            word: item.word.clone(),
            options: options.clone(),
        };
        self.pending = Some(options);
        Some(question)
    }

    /// Grade `token` against the pending question and move to the next one.
    pub fn answer(&mut self, token: AnswerToken) -> ResultEngine<Answered> {
        if token.session != self.id || token.question != self.current {
            return Err(EngineError::StaleAnswer);
        }
        let chosen = self
            .pending
            .as_ref()
            .and_then(|options| options.get(token.option))
            .cloned()
            .ok_or(EngineError::StaleAnswer)?;
        let item = self.items.get(self.current).ok_or(EngineError::StaleAnswer)?;
        let word = item.word.clone();
        let expected = item.meaning.trim().to_string();

        let correct = chosen == expected;
        if correct {
            self.score += 1;
        }
        self.current += 1;
        self.pending = None;

        Ok(Answered {
            word,
            correct,
            chosen,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::OwnerId;

    fn entry(index: i64, word: &str, meaning: &str) -> VocabEntry {
        VocabEntry {
            owner: OwnerId(1),
            index,
            word: word.to_string(),
            meaning: meaning.to_string(),
            examples: vec![],
            category: None,
            created_at: Utc.timestamp_opt(0, 0).unwrap(),
        }
    }

    fn entries(n: usize) -> Vec<VocabEntry> {
        (0..n)
            .map(|i| entry(i as i64 + 1, &format!("Wort{i}"), &format!("word {i}")))
            .collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn correct_option(session: &QuizSession, question: &QuizQuestion) -> usize {
        let expected = &session.items()[question.number].meaning;
        question
            .options
            .iter()
            .position(|o| o == expected)
            .unwrap()
    }

    #[test]
    fn start_needs_min_entries() {
        let err = QuizSession::start(entries(3), &QuizSettings::default(), &mut rng()).unwrap_err();
        assert_eq!(err, EngineError::InsufficientData { have: 3, need: 4 });
    }

    #[test]
    fn start_samples_at_most_max_questions_without_replacement() {
        let session = QuizSession::start(entries(25), &QuizSettings::default(), &mut rng()).unwrap();

        assert_eq!(session.len(), 10);
        assert_eq!(session.current(), 0);
        assert_eq!(session.score(), 0);
        let indexes: HashSet<i64> = session.items().iter().map(|e| e.index).collect();
        assert_eq!(indexes.len(), 10);
    }

    #[test]
    fn options_contain_correct_meaning_once_and_are_distinct() {
        let mut rng = rng();
        for policy in [DistractorPool::Widen, DistractorPool::Sample] {
            let settings = QuizSettings {
                distractors: policy,
                ..QuizSettings::default()
            };
            let mut session = QuizSession::start(entries(12), &settings, &mut rng).unwrap();

            while let Some(question) = session.question(&mut rng) {
                assert_eq!(question.options.len(), 4);
                let expected = session.items()[question.number].meaning.clone();
                assert_eq!(
                    question.options.iter().filter(|o| **o == expected).count(),
                    1
                );
                let distinct: HashSet<&String> = question.options.iter().collect();
                assert_eq!(distinct.len(), question.options.len());

                let option = correct_option(&session, &question);
                session.answer(question.token(option)).unwrap();
            }
        }
    }

    #[test]
    fn widen_pool_fills_options_from_unsampled_entries() {
        let settings = QuizSettings {
            max_questions: 1,
            distractors: DistractorPool::Widen,
            ..QuizSettings::default()
        };
        let mut rng = rng();
        let mut session = QuizSession::start(entries(5), &settings, &mut rng).unwrap();
        let question = session.question(&mut rng).unwrap();
        assert_eq!(question.options.len(), 4);
    }

    #[test]
    fn sample_pool_degrades_without_duplicates() {
        let settings = QuizSettings {
            max_questions: 2,
            distractors: DistractorPool::Sample,
            ..QuizSettings::default()
        };
        let mut rng = rng();
        let mut session = QuizSession::start(entries(6), &settings, &mut rng).unwrap();
        let question = session.question(&mut rng).unwrap();
        assert_eq!(question.options.len(), 2);
        assert_ne!(question.options[0], question.options[1]);
    }

    #[test]
    fn homogeneous_meanings_degrade_to_distinct_options() {
        let items = vec![
            entry(1, "Haus", "house"),
            entry(2, "Gebäude", "house"),
            entry(3, "Heim", "house"),
            entry(4, "Baum", "tree"),
        ];
        let mut rng = rng();
        let mut session = QuizSession::start(items, &QuizSettings::default(), &mut rng).unwrap();
        let question = session.question(&mut rng).unwrap();

        assert_eq!(question.options.len(), 2);
        assert!(question.options.contains(&"house".to_string()));
        assert!(question.options.contains(&"tree".to_string()));
    }

    #[test]
    fn correct_answer_bumps_score_and_position() {
        let mut rng = rng();
        let mut session = QuizSession::start(entries(4), &QuizSettings::default(), &mut rng).unwrap();
        let question = session.question(&mut rng).unwrap();
        let option = correct_option(&session, &question);

        let answered = session.answer(question.token(option)).unwrap();

        assert!(answered.correct);
        assert_eq!(session.score(), 1);
        assert_eq!(session.current(), 1);
    }

    #[test]
    fn wrong_answer_only_bumps_position() {
        let mut rng = rng();
        let mut session = QuizSession::start(entries(4), &QuizSettings::default(), &mut rng).unwrap();
        let question = session.question(&mut rng).unwrap();
        let wrong = (correct_option(&session, &question) + 1) % question.options.len();

        let answered = session.answer(question.token(wrong)).unwrap();

        assert!(!answered.correct);
        assert_eq!(answered.expected, session.items()[0].meaning);
        assert_eq!(session.score(), 0);
        assert_eq!(session.current(), 1);
    }

    #[test]
    fn stale_tokens_are_rejected() {
        let mut rng = rng();
        let mut session = QuizSession::start(entries(4), &QuizSettings::default(), &mut rng).unwrap();
        let first = session.question(&mut rng).unwrap();
        session.answer(first.token(0)).unwrap();
        session.question(&mut rng).unwrap();

        assert_eq!(
            session.answer(first.token(0)).unwrap_err(),
            EngineError::StaleAnswer
        );
        let foreign = AnswerToken {
            session: Uuid::new_v4(),
            question: 1,
            option: 0,
        };
        assert_eq!(session.answer(foreign).unwrap_err(), EngineError::StaleAnswer);
        let out_of_range = AnswerToken {
            session: session.id(),
            question: 1,
            option: 99,
        };
        assert_eq!(
            session.answer(out_of_range).unwrap_err(),
            EngineError::StaleAnswer
        );
        assert_eq!(session.current(), 1);
    }

    #[test]
    fn session_finishes_after_last_question() {
        let mut rng = rng();
        let mut session = QuizSession::start(entries(4), &QuizSettings::default(), &mut rng).unwrap();
        for _ in 0..4 {
            let question = session.question(&mut rng).unwrap();
            session.answer(question.token(0)).unwrap();
        }

        assert!(session.is_finished());
        assert!(session.question(&mut rng).is_none());
    }
}
