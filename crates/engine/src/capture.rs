//! Word capture dialogue.
//!
//! A capture walks `Word -> Meaning -> [Example] -> [Category]` one text
//! message at a time. The optional steps are switched on by [`CaptureSteps`].
//! When the last enabled step is filled the session yields a [`NewEntry`].

use serde::Deserialize;

use crate::{Category, EngineError, NewEntry, ResultEngine};

/// Input that leaves an optional field empty.
pub const SKIP: &str = "-";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureStep {
    Word,
    Meaning,
    Example,
    Category,
}

/// Which optional steps a capture asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptureSteps {
    pub ask_example: bool,
    pub ask_category: bool,
}

impl Default for CaptureSteps {
    fn default() -> Self {
        Self {
            ask_example: true,
            ask_category: false,
        }
    }
}

impl CaptureSteps {
    /// Word and meaning only.
    pub const MINIMAL: CaptureSteps = CaptureSteps {
        ask_example: false,
        ask_category: false,
    };

    fn after(self, step: CaptureStep) -> Option<CaptureStep> {
        match step {
            CaptureStep::Word => Some(CaptureStep::Meaning),
            CaptureStep::Meaning if self.ask_example => Some(CaptureStep::Example),
            CaptureStep::Meaning | CaptureStep::Example if self.ask_category => {
                Some(CaptureStep::Category)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The session now waits for this step.
    Next(CaptureStep),
    /// Every step is filled; the session is over.
    Complete(NewEntry),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureSession {
    step: CaptureStep,
    draft: NewEntry,
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureSession {
    pub fn new() -> Self {
        Self {
            step: CaptureStep::Word,
            draft: NewEntry::default(),
        }
    }

    pub fn step(&self) -> CaptureStep {
        self.step
    }

    pub fn draft(&self) -> &NewEntry {
        &self.draft
    }

    /// Store `input` into the field of the current step and move on.
    ///
    /// Blank input and unknown categories are rejected without moving.
    pub fn advance(&mut self, input: &str, steps: CaptureSteps) -> ResultEngine<Advance> {
        let text = input.trim();
        if text.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        match self.step {
            CaptureStep::Word => self.draft.word = text.to_string(),
            CaptureStep::Meaning => self.draft.meaning = text.to_string(),
            CaptureStep::Example => {
                if text != SKIP {
                    self.draft.examples.push(text.to_string());
                }
            }
            CaptureStep::Category => {
                self.draft.category = if text == SKIP {
                    None
                } else {
                    Some(Category::try_from(text)?)
                };
            }
        }

        Ok(self.step_done(steps))
    }

    /// Fill the category step from a button press. A press that arrives at
    /// any other step is stale and changes nothing.
    pub fn choose_category(
        &mut self,
        category: Option<Category>,
        steps: CaptureSteps,
    ) -> ResultEngine<Advance> {
        if self.step != CaptureStep::Category {
            return Err(EngineError::StaleAnswer);
        }
        self.draft.category = category;
        Ok(self.step_done(steps))
    }

    fn step_done(&mut self, steps: CaptureSteps) -> Advance {
        match steps.after(self.step) {
            Some(next) => {
                self.step = next;
                Advance::Next(next)
            }
            None => Advance::Complete(self.draft.clone()),
        }
    }
}
