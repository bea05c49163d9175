use thiserror::Error;

use crate::engine::Skill;
use crate::settings::Language;

/// Data and integrity faults raised by the engine. These are never expected
/// during normal play; the session controller logs them and falls back to a
/// safe screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown skill key: {0:?}")]
    UnknownSkill(String),

    #[error("stats table has no entry for skill {0}")]
    MissingStats(Skill),

    #[error("no questions for {skill} at level {level} ({language})")]
    NoQuestions {
        skill: Skill,
        level: u32,
        language: Language,
    },

    #[error("malformed question {id:?}: {reason}")]
    MalformedQuestion { id: String, reason: String },

    #[error("invalid persisted stats: {0}")]
    InvalidStats(String),
}

/// Expected outcomes of parsing a learner's answer. These are shown to the
/// learner and leave all state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("empty answer")]
    Empty,
    #[error("incomplete answer")]
    Incomplete,
    #[error("invalid answer")]
    Invalid,
}

impl AnswerError {
    pub fn as_key(self) -> &'static str {
        match self {
            AnswerError::Empty => "empty",
            AnswerError::Incomplete => "incomplete",
            AnswerError::Invalid => "invalid",
        }
    }
}
