//! The module contains the errors the engine can throw.
//!
//! Session errors ([`PermissionDenied`], [`NoActiveSession`], [`StaleAnswer`],
//! [`InsufficientData`]) leave the session stores untouched. Input errors
//! ([`EmptyInput`], [`InvalidCategory`]) keep the capture step where it was.
//! [`Store`] wraps every failure of the word store.
//!
//!  [`PermissionDenied`]: EngineError::PermissionDenied
//!  [`NoActiveSession`]: EngineError::NoActiveSession
//!  [`StaleAnswer`]: EngineError::StaleAnswer
//!  [`InsufficientData`]: EngineError::InsufficientData
//!  [`EmptyInput`]: EngineError::EmptyInput
//!  [`InvalidCategory`]: EngineError::InvalidCategory
//!  [`Store`]: EngineError::Store
use sea_orm::DbErr;
use thiserror::Error;

/// Failures of the word store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("corrupt row {index}: {reason}")]
    Corrupt { index: i64, reason: String },
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("caller is not the owner")]
    PermissionDenied,
    #[error("no active session")]
    NoActiveSession,
    #[error("answer does not belong to the pending question")]
    StaleAnswer,
    #[error("not enough entries: have {have}, need {need}")]
    InsufficientData { have: usize, need: usize },
    #[error("empty input")]
    EmptyInput,
    #[error("invalid category: \"{0}\"")]
    InvalidCategory(String),
    #[error("entry {0} not found")]
    EntryNotFound(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DbErr> for EngineError {
    fn from(err: DbErr) -> Self {
        Self::Store(StoreError::Database(err))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::PermissionDenied, Self::PermissionDenied) => true,
            (Self::NoActiveSession, Self::NoActiveSession) => true,
            (Self::StaleAnswer, Self::StaleAnswer) => true,
            (
                Self::InsufficientData { have: a, need: b },
                Self::InsufficientData { have: c, need: d },
            ) => a == c && b == d,
            (Self::EmptyInput, Self::EmptyInput) => true,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::EntryNotFound(a), Self::EntryNotFound(b)) => a == b,
            (Self::Store(a), Self::Store(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
