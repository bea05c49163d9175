use rust_i18n::t;

use crate::engine::Skill;
use crate::error::AnswerError;
use crate::settings::Language;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Drill,
    Settings,
    Summary,
    Stats,
    Learn(Skill),
}

/// Outcome of the most recently answered question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub expected: String,
    pub ms: u64,
    pub skill: Skill,
    pub level: u32,
    pub timed_out: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionCounts {
    pub correct: u32,
    pub wrong: u32,
}

impl SessionCounts {
    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }

    pub fn accuracy(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (100.0 * self.correct as f64 / total as f64).round() as u32
    }

    pub(crate) fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
        } else {
            self.wrong += 1;
        }
    }
}

/// Non-fatal problems shown to the learner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionError {
    Answer(AnswerError),
    StartFailed,
    RecordFailed,
    NextFailed,
}

impl SessionError {
    pub fn message(self, language: Language) -> String {
        let locale = language.as_str();
        let message = match self {
            SessionError::Answer(AnswerError::Empty) => t!("errors.empty", locale = locale),
            SessionError::Answer(AnswerError::Incomplete) => {
                t!("errors.incomplete", locale = locale)
            }
            SessionError::Answer(AnswerError::Invalid) => t!("errors.invalid", locale = locale),
            SessionError::StartFailed => t!("errors.start", locale = locale),
            SessionError::RecordFailed => t!("errors.record", locale = locale),
            SessionError::NextFailed => t!("errors.next", locale = locale),
        };
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accuracy() {
        let mut counts = SessionCounts::default();
        assert_eq!(counts.accuracy(), 0);
        for correct in [true, true, true, false] {
            counts.record(correct);
        }
        assert_eq!(counts.correct, 3);
        assert_eq!(counts.wrong, 1);
        assert_eq!(counts.accuracy(), 75);
    }

    #[test]
    fn error_messages_are_localized() {
        let en = SessionError::Answer(AnswerError::Empty).message(Language::En);
        let id = SessionError::Answer(AnswerError::Empty).message(Language::Id);
        assert_eq!(en, "Please select an answer.");
        assert_ne!(en, id);
        assert!(!SessionError::StartFailed.message(Language::En).is_empty());
    }
}
