pub mod catalog;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::engine::{MAX_LEVEL, MIN_LEVEL, Skill, clamp_level};
use crate::error::EngineError;
use crate::settings::Language;

pub use catalog::QuestionCatalog;

/// A bank entry as stored on disk: the skill, level and language are implied
/// by where it sits in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEntry {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuestionEntry {
    pub fn validate(&self) -> Result<(), EngineError> {
        let fail = |reason: &str| EngineError::MalformedQuestion {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.trim().is_empty() {
            return Err(fail("empty id"));
        }
        if self.text.trim().is_empty() {
            return Err(fail("empty text"));
        }
        if self.options.len() < 2 {
            return Err(fail("fewer than two options"));
        }
        if !self
            .options
            .iter()
            .any(|o| o.to_lowercase() == self.answer.to_lowercase())
        {
            return Err(fail("answer is not one of the options"));
        }
        Ok(())
    }
}

/// A question handed to the learner. Immutable once generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub skill: Skill,
    pub level: u32,
    pub text: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Read-only access to a question bank. The engine only ever goes through
/// this trait, so a larger or differently sourced bank can be swapped in.
pub trait QuestionSource {
    fn questions(&self, skill: Skill, level: u32, language: Language) -> &[QuestionEntry];

    /// Levels that have at least one question for `skill` in `language`.
    fn levels(&self, skill: Skill, language: Language) -> Vec<u32> {
        (MIN_LEVEL..=MAX_LEVEL)
            .filter(|&l| !self.questions(skill, l, language).is_empty())
            .collect()
    }
}

/// What to do when the requested skill/level/language has no questions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Fail with `NoQuestions`.
    Strict,
    /// Use the nearest populated level in the same language; ties prefer the
    /// easier level.
    #[default]
    Nearest,
}

fn nearest_level(available: &[u32], level: u32) -> Option<u32> {
    available
        .iter()
        .copied()
        .min_by_key(|&l| (l.abs_diff(level), l))
}

/// Pick a question uniformly at random for `skill` at `level` (clamped to
/// 1..=10). The returned question always carries the requested skill and the
/// clamped level, even when the entry was borrowed from a neighbouring level.
pub fn generate_question<R: Rng + ?Sized>(
    source: &dyn QuestionSource,
    skill: Skill,
    level: u32,
    language: Language,
    policy: FallbackPolicy,
    rng: &mut R,
) -> Result<Question, EngineError> {
    let level = clamp_level(level);
    let no_questions = EngineError::NoQuestions {
        skill,
        level,
        language,
    };

    let mut pool = source.questions(skill, level, language);
    if pool.is_empty() {
        if policy == FallbackPolicy::Strict {
            return Err(no_questions);
        }
        let source_level =
            nearest_level(&source.levels(skill, language), level).ok_or(no_questions.clone())?;
        tracing::debug!("no {skill} questions at level {level} ({language}), using level {source_level}");
        pool = source.questions(skill, source_level, language);
    }

    let entry = pool.choose(rng).ok_or(no_questions)?;
    entry.validate()?;

    Ok(Question {
        id: entry.id.clone(),
        skill,
        level,
        text: entry.text.clone(),
        options: entry.options.clone(),
        answer: entry.answer.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn entry(id: &str) -> QuestionEntry {
        QuestionEntry {
            id: id.to_string(),
            text: format!("prompt {id}"),
            options: vec!["Valid".to_string(), "Invalid".to_string()],
            answer: "Valid".to_string(),
        }
    }

    fn sparse_catalog() -> QuestionCatalog {
        let mut catalog = QuestionCatalog::default();
        catalog.insert(Skill::Syllogism, 1, Language::En, entry("s1"));
        catalog.insert(Skill::Syllogism, 4, Language::En, entry("s4"));
        catalog.insert(Skill::Syllogism, 8, Language::En, entry("s8"));
        catalog
    }

    #[test]
    fn exact_level_is_used_when_present() {
        let mut rng = SmallRng::seed_from_u64(7);
        let q = generate_question(
            &sparse_catalog(),
            Skill::Syllogism,
            4,
            Language::En,
            FallbackPolicy::Strict,
            &mut rng,
        )
        .unwrap();
        assert_eq!(q.id, "s4");
        assert_eq!(q.skill, Skill::Syllogism);
        assert_eq!(q.level, 4);
    }

    #[test]
    fn strict_policy_fails_on_gap() {
        let mut rng = SmallRng::seed_from_u64(7);
        let err = generate_question(
            &sparse_catalog(),
            Skill::Syllogism,
            6,
            Language::En,
            FallbackPolicy::Strict,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::NoQuestions { level: 6, .. }));
    }

    #[test]
    fn nearest_policy_borrows_neighbour_and_keeps_requested_level() {
        let mut rng = SmallRng::seed_from_u64(7);
        let catalog = sparse_catalog();
        let q = generate_question(&catalog, Skill::Syllogism, 7, Language::En, FallbackPolicy::Nearest, &mut rng)
            .unwrap();
        assert_eq!(q.id, "s8");
        assert_eq!(q.level, 7);

        // 6 is equidistant from 4 and 8; the easier level wins.
        let q = generate_question(&catalog, Skill::Syllogism, 6, Language::En, FallbackPolicy::Nearest, &mut rng)
            .unwrap();
        assert_eq!(q.id, "s4");
    }

    #[test]
    fn level_is_clamped_before_lookup() {
        let mut rng = SmallRng::seed_from_u64(1);
        let catalog = sparse_catalog();
        let q = generate_question(&catalog, Skill::Syllogism, 0, Language::En, FallbackPolicy::Strict, &mut rng)
            .unwrap();
        assert_eq!(q.level, 1);
        let q = generate_question(&catalog, Skill::Syllogism, 99, Language::En, FallbackPolicy::Nearest, &mut rng)
            .unwrap();
        assert_eq!(q.level, 10);
        assert_eq!(q.id, "s8");
    }

    #[test]
    fn missing_language_fails_under_both_policies() {
        let mut rng = SmallRng::seed_from_u64(1);
        for policy in [FallbackPolicy::Strict, FallbackPolicy::Nearest] {
            let err = generate_question(&sparse_catalog(), Skill::Syllogism, 1, Language::Id, policy, &mut rng)
                .unwrap_err();
            assert!(matches!(err, EngineError::NoQuestions { .. }));
        }
    }

    #[test]
    fn malformed_entry_is_rejected() {
        let mut bad = entry("bad");
        bad.answer = "Maybe".to_string();
        assert!(matches!(bad.validate(), Err(EngineError::MalformedQuestion { .. })));

        let mut bad = entry("bad");
        bad.options.truncate(1);
        assert!(bad.validate().is_err());
    }
}
