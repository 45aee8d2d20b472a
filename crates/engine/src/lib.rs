//! Vocabulary engine.
//!
//! [`Engine`] is the only entry point the bot uses. Every operation first
//! checks that the caller is the configured owner, then drives one of the two
//! per-owner dialogues ([`CaptureSession`], [`QuizSession`]) or reads and
//! writes the [`WordStore`].

use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::Mutex;

pub use capture::{Advance, CaptureSession, CaptureStep, CaptureSteps};
pub use entry::{Category, NewEntry, OwnerId, VocabEntry};
pub use error::{EngineError, StoreError};
pub use quiz::{
    AnswerToken, Answered, DistractorPool, QuizOutcome, QuizProgress, QuizQuestion, QuizSession,
    QuizSettings,
};
pub use sessions::SessionStore;
pub use store::{SqlWordStore, WordStore};

pub mod capture;
mod entry;
mod error;
pub mod quiz;
mod sessions;
mod store;

type ResultEngine<T> = Result<T, EngineError>;

pub struct Engine {
    owner: OwnerId,
    store: Arc<dyn WordStore>,
    capture_steps: CaptureSteps,
    quiz_settings: QuizSettings,
    captures: SessionStore<OwnerId, CaptureSession>,
    quizzes: SessionStore<OwnerId, QuizSession>,
    rng: Mutex<StdRng>,
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("owner", &self.owner)
            .field("capture_steps", &self.capture_steps)
            .field("quiz_settings", &self.quiz_settings)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn capture_steps(&self) -> CaptureSteps {
        self.capture_steps
    }

    fn authorize(&self, caller: OwnerId) -> ResultEngine<()> {
        if caller == self.owner {
            Ok(())
        } else {
            tracing::debug!("rejected caller {caller}");
            Err(EngineError::PermissionDenied)
        }
    }

    /// Open a fresh capture for the owner, dropping any incomplete one.
    pub async fn start_capture(&self, caller: OwnerId) -> ResultEngine<CaptureStep> {
        self.authorize(caller)?;
        if self.captures.remove(&caller).await.is_some() {
            tracing::debug!("discarded incomplete capture of {caller}");
        }
        let session = CaptureSession::new();
        let step = session.step();
        self.captures.put(caller, session).await;
        Ok(step)
    }

    /// Feed one text message to the owner's capture.
    ///
    /// When the last step is filled the entry is written to the store and the
    /// session is gone, whether the write succeeds or not.
    pub async fn capture_text(&self, caller: OwnerId, text: &str) -> ResultEngine<CaptureReply> {
        self.authorize(caller)?;
        let steps = self.capture_steps;
        self.drive_capture(caller, |session| session.advance(text, steps))
            .await
    }

    /// Fill the category step from a button. `StaleAnswer` when the capture
    /// is on any other step.
    pub async fn capture_category(
        &self,
        caller: OwnerId,
        category: Option<Category>,
    ) -> ResultEngine<CaptureReply> {
        self.authorize(caller)?;
        let steps = self.capture_steps;
        self.drive_capture(caller, |session| session.choose_category(category, steps))
            .await
    }

    async fn drive_capture<F>(&self, caller: OwnerId, step: F) -> ResultEngine<CaptureReply>
    where
        F: FnOnce(&mut CaptureSession) -> ResultEngine<Advance>,
    {
        let advance = self
            .captures
            .update(caller, |slot| {
                let session = slot.as_mut().ok_or(EngineError::NoActiveSession)?;
                let advance = step(session)?;
                if matches!(advance, Advance::Complete(_)) {
                    *slot = None;
                }
                Ok::<_, EngineError>(advance)
            })
            .await?;

        match advance {
            Advance::Next(step) => Ok(CaptureReply::Next(step)),
            Advance::Complete(new) => {
                let word = new.word.clone();
                match self.store.insert(caller, new).await {
                    Ok(entry) => {
                        tracing::info!("saved entry {} ({})", entry.index, entry.word);
                        Ok(CaptureReply::Saved(entry))
                    }
                    Err(err) => {
                        tracing::error!("failed to save \"{word}\": {err}");
                        Err(err.into())
                    }
                }
            }
        }
    }

    pub async fn current_capture(&self, caller: OwnerId) -> Option<CaptureSession> {
        self.captures.get(&caller).await
    }

    /// Owner's entries ordered by index, optionally filtered by category.
    pub async fn list(
        &self,
        caller: OwnerId,
        category: Option<Category>,
    ) -> ResultEngine<Vec<VocabEntry>> {
        self.authorize(caller)?;
        self.store.entries(caller, category).await.map_err(|err| {
            tracing::error!("failed to list entries: {err}");
            err.into()
        })
    }

    /// Append an example sentence to the owner's entry `index`.
    pub async fn add_example(
        &self,
        caller: OwnerId,
        index: i64,
        example: &str,
    ) -> ResultEngine<VocabEntry> {
        self.authorize(caller)?;
        let example = example.trim();
        if example.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        match self.store.append_example(caller, index, example).await {
            Ok(Some(entry)) => Ok(entry),
            Ok(None) => Err(EngineError::EntryNotFound(index)),
            Err(err) => {
                tracing::error!("failed to add example to {index}: {err}");
                Err(err.into())
            }
        }
    }

    /// Start a quiz for the owner and return its first question.
    ///
    /// A quiz already in progress is replaced.
    pub async fn start_quiz(&self, caller: OwnerId) -> ResultEngine<QuizQuestion> {
        self.authorize(caller)?;
        let entries = self.store.entries(caller, None).await.map_err(|err| {
            tracing::error!("failed to load quiz entries: {err}");
            EngineError::from(err)
        })?;

        let mut rng = self.rng.lock().await;
        let mut session = QuizSession::start(entries, &self.quiz_settings, &mut *rng)?;
        let question = session
            .question(&mut *rng)
            .ok_or(EngineError::InsufficientData {
                have: 0,
                need: self.quiz_settings.min_entries,
            })?;
        tracing::info!("quiz {} started with {} questions", session.id(), session.len());
        self.quizzes.put(caller, session).await;

        Ok(question)
    }

    /// Grade an answer and move the owner's quiz forward.
    pub async fn answer_quiz(
        &self,
        caller: OwnerId,
        token: AnswerToken,
    ) -> ResultEngine<QuizOutcome> {
        self.authorize(caller)?;

        let mut rng = self.rng.lock().await;
        self.quizzes
            .update(caller, |slot| {
                let session = slot.as_mut().ok_or(EngineError::NoActiveSession)?;
                let answered = session.answer(token)?;
                let progress = match session.question(&mut *rng) {
                    Some(question) => QuizProgress::Question(question),
                    None => {
                        let progress = QuizProgress::Finished {
                            score: session.score(),
                            total: session.len(),
                        };
                        tracing::info!("quiz {} finished", session.id());
                        *slot = None;
                        progress
                    }
                };
                Ok(QuizOutcome { answered, progress })
            })
            .await
    }

    pub async fn current_quiz(&self, caller: OwnerId) -> Option<QuizSession> {
        self.quizzes.get(&caller).await
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureReply {
    /// Waiting for this step.
    Next(CaptureStep),
    /// Entry committed to the store.
    Saved(VocabEntry),
}

#[derive(Default)]
pub struct EngineBuilder {
    owner: Option<OwnerId>,
    store: Option<Arc<dyn WordStore>>,
    capture_steps: CaptureSteps,
    quiz_settings: QuizSettings,
    seed: Option<u64>,
}

impl EngineBuilder {
    pub fn owner(mut self, owner: OwnerId) -> EngineBuilder {
        self.owner = Some(owner);
        self
    }

    pub fn store(mut self, store: impl WordStore + 'static) -> EngineBuilder {
        self.store = Some(Arc::new(store));
        self
    }

    pub fn capture_steps(mut self, steps: CaptureSteps) -> EngineBuilder {
        self.capture_steps = steps;
        self
    }

    pub fn quiz_settings(mut self, settings: QuizSettings) -> EngineBuilder {
        self.quiz_settings = settings;
        self
    }

    /// Fixed seed for quiz sampling; the OS seeds it otherwise.
    pub fn seed(mut self, seed: u64) -> EngineBuilder {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Engine, String> {
        let owner = self.owner.ok_or("owner is required")?;
        let store = self.store.ok_or("word store is required")?;
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Engine {
            owner,
            store,
            capture_steps: self.capture_steps,
            quiz_settings: self.quiz_settings,
            captures: SessionStore::default(),
            quizzes: SessionStore::default(),
            rng: Mutex::new(rng),
        })
    }
}
