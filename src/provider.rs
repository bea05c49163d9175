use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::bank::{FallbackPolicy, Question, QuestionSource, generate_question};
use crate::engine::{Skill, StatsTable, create_default_stats, focus, update_stats};
use crate::error::{AnswerError, EngineError};
use crate::settings::{Language, SETTING_CONTROLS, SettingControl};

/// The capabilities a training domain offers the session controller.
pub trait TrainingProvider {
    fn id(&self) -> &'static str;

    fn create_default_stats(&self) -> StatsTable;

    fn create_question(
        &mut self,
        skill: Skill,
        level: u32,
        language: Language,
    ) -> Result<Question, EngineError>;

    /// Sanitize and parse raw input, then grade it. `Ok(true)` is a correct
    /// answer; parse failures leave all state untouched.
    fn grade_answer(&self, question: &Question, raw: &str) -> Result<bool, AnswerError>;

    fn format_expected(&self, question: &Question) -> String;

    fn update_stats(
        &self,
        stats: &StatsTable,
        skill: Skill,
        correct: bool,
        elapsed_ms: u64,
    ) -> Result<StatsTable, EngineError>;

    fn pick_skill(&self, stats: &StatsTable) -> Skill;

    fn settings_controls(&self) -> &'static [SettingControl];
}

/// Trim and collapse runs of whitespace.
pub fn sanitize_input(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve multiple-choice input to one of `options`.
///
/// Order of interpretation: exact option text (case-insensitive), then a
/// 1-based option number, then a prefix of some option (incomplete).
pub fn parse_choice<'a>(input: &str, options: &'a [String]) -> Result<&'a str, AnswerError> {
    if input.is_empty() {
        return Err(AnswerError::Empty);
    }
    let lowered = input.to_lowercase();

    if let Some(option) = options.iter().find(|o| o.to_lowercase() == lowered) {
        return Ok(option.as_str());
    }

    if let Ok(n) = input.parse::<usize>() {
        return match n.checked_sub(1).and_then(|i| options.get(i)) {
            Some(option) => Ok(option.as_str()),
            None => Err(AnswerError::Invalid),
        };
    }

    if options.iter().any(|o| o.to_lowercase().starts_with(&lowered)) {
        return Err(AnswerError::Incomplete);
    }

    Err(AnswerError::Invalid)
}

/// Multiple-choice logic drills over a question bank.
pub struct LogicProvider {
    source: Box<dyn QuestionSource>,
    policy: FallbackPolicy,
    rng: SmallRng,
}

impl LogicProvider {
    pub fn new(source: Box<dyn QuestionSource>, policy: FallbackPolicy) -> Self {
        Self {
            source,
            policy,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(source: Box<dyn QuestionSource>, policy: FallbackPolicy, seed: u64) -> Self {
        Self {
            source,
            policy,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl TrainingProvider for LogicProvider {
    fn id(&self) -> &'static str {
        "logic"
    }

    fn create_default_stats(&self) -> StatsTable {
        create_default_stats()
    }

    fn create_question(
        &mut self,
        skill: Skill,
        level: u32,
        language: Language,
    ) -> Result<Question, EngineError> {
        generate_question(
            self.source.as_ref(),
            skill,
            level,
            language,
            self.policy,
            &mut self.rng,
        )
    }

    fn grade_answer(&self, question: &Question, raw: &str) -> Result<bool, AnswerError> {
        let cleaned = sanitize_input(raw);
        let choice = parse_choice(&cleaned, &question.options)?;
        Ok(choice.to_lowercase() == question.answer.to_lowercase())
    }

    fn format_expected(&self, question: &Question) -> String {
        question.answer.clone()
    }

    fn update_stats(
        &self,
        stats: &StatsTable,
        skill: Skill,
        correct: bool,
        elapsed_ms: u64,
    ) -> Result<StatsTable, EngineError> {
        update_stats(stats, skill, correct, elapsed_ms)
    }

    fn pick_skill(&self, stats: &StatsTable) -> Skill {
        focus::pick_skill(stats)
    }

    fn settings_controls(&self) -> &'static [SettingControl] {
        SETTING_CONTROLS
    }
}
