use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{
    HISTORY_LIMIT, LEVEL_DOWN_MISTAKES, LEVEL_UP_STREAK, MAX_LEVEL, MIN_LEVEL, Skill,
};
use crate::error::EngineError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub correct: bool,
    pub ms: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillStats {
    pub level: u32,
    pub streak: u32,
    pub mistake_streak: u32,
    pub history: Vec<Attempt>,
}

impl Default for SkillStats {
    fn default() -> Self {
        Self {
            level: MIN_LEVEL,
            streak: 0,
            mistake_streak: 0,
            history: Vec::new(),
        }
    }
}

impl SkillStats {
    /// Apply one attempt: append to history, then race the two counters.
    /// Whichever counter reaches its threshold moves the level one step and
    /// resets itself; the other counter was already zeroed by this attempt.
    pub fn record_attempt(&mut self, correct: bool, ms: u64, timestamp: DateTime<Utc>) {
        self.history.push(Attempt {
            correct,
            ms,
            timestamp,
        });
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }

        if correct {
            self.streak = self.streak.saturating_add(1);
            self.mistake_streak = 0;
            if self.streak >= LEVEL_UP_STREAK {
                self.level = (self.level + 1).min(MAX_LEVEL);
                self.streak = 0;
            }
        } else {
            self.mistake_streak = self.mistake_streak.saturating_add(1);
            self.streak = 0;
            if self.mistake_streak >= LEVEL_DOWN_MISTAKES {
                self.level = self.level.saturating_sub(1).max(MIN_LEVEL);
                self.mistake_streak = 0;
            }
        }
        self.level = self.level.clamp(MIN_LEVEL, MAX_LEVEL);
    }

    fn check(&self, skill: Skill) -> Result<(), EngineError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return Err(EngineError::InvalidStats(format!(
                "{skill} level {} out of range",
                self.level
            )));
        }
        if self.streak > 0 && self.mistake_streak > 0 {
            return Err(EngineError::InvalidStats(format!(
                "{skill} has both streak counters set"
            )));
        }
        if self.streak >= LEVEL_UP_STREAK || self.mistake_streak >= LEVEL_DOWN_MISTAKES {
            return Err(EngineError::InvalidStats(format!(
                "{skill} streak counters past their thresholds"
            )));
        }
        if self.history.len() > HISTORY_LIMIT {
            return Err(EngineError::InvalidStats(format!(
                "{skill} history has {} entries",
                self.history.len()
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsTable {
    pub skills: BTreeMap<Skill, SkillStats>,
}

impl Default for StatsTable {
    fn default() -> Self {
        create_default_stats()
    }
}

impl StatsTable {
    pub fn get(&self, skill: Skill) -> Option<&SkillStats> {
        self.skills.get(&skill)
    }

    pub fn level(&self, skill: Skill) -> Result<u32, EngineError> {
        self.get(skill)
            .map(|s| s.level)
            .ok_or(EngineError::MissingStats(skill))
    }

    pub fn all_attempts(&self) -> impl Iterator<Item = &Attempt> {
        self.skills.values().flat_map(|s| s.history.iter())
    }

    /// Structural check applied to data read back from storage.
    pub fn validate(&self) -> Result<(), EngineError> {
        for &skill in Skill::all() {
            match self.skills.get(&skill) {
                Some(stats) => stats.check(skill)?,
                None => return Err(EngineError::MissingStats(skill)),
            }
        }
        Ok(())
    }
}

pub fn create_default_stats() -> StatsTable {
    StatsTable {
        skills: Skill::all()
            .iter()
            .map(|&skill| (skill, SkillStats::default()))
            .collect(),
    }
}

/// Returns a new table with one attempt applied to `skill`. The input table is
/// left untouched.
pub fn update_stats(
    stats: &StatsTable,
    skill: Skill,
    correct: bool,
    elapsed_ms: u64,
) -> Result<StatsTable, EngineError> {
    update_stats_at(stats, skill, correct, elapsed_ms, Utc::now())
}

pub fn update_stats_at(
    stats: &StatsTable,
    skill: Skill,
    correct: bool,
    elapsed_ms: u64,
    timestamp: DateTime<Utc>,
) -> Result<StatsTable, EngineError> {
    let mut next = stats.clone();
    let entry = next
        .skills
        .get_mut(&skill)
        .ok_or(EngineError::MissingStats(skill))?;
    entry.record_attempt(correct, elapsed_ms, timestamp);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn with_skill(level: u32, streak: u32, mistake_streak: u32) -> StatsTable {
        let mut table = create_default_stats();
        let entry = table.skills.get_mut(&Skill::Syllogism).unwrap();
        entry.level = level;
        entry.streak = streak;
        entry.mistake_streak = mistake_streak;
        table
    }

    #[test]
    fn default_table_has_every_skill_at_level_one() {
        let table = create_default_stats();
        assert_eq!(table.skills.len(), 4);
        for &skill in Skill::all() {
            let s = table.get(skill).unwrap();
            assert_eq!(s.level, 1);
            assert_eq!(s.streak, 0);
            assert_eq!(s.mistake_streak, 0);
            assert!(s.history.is_empty());
        }
        assert!(table.validate().is_ok());
    }

    #[test]
    fn fifth_correct_answer_levels_up() {
        let table = with_skill(3, 4, 0);
        let next = update_stats(&table, Skill::Syllogism, true, 1200).unwrap();
        let s = next.get(Skill::Syllogism).unwrap();
        assert_eq!(s.level, 4);
        assert_eq!(s.streak, 0);
    }

    #[test]
    fn level_up_happens_on_fifth_not_fourth() {
        let mut table = create_default_stats();
        for _ in 0..4 {
            table = update_stats(&table, Skill::Fallacy, true, 900).unwrap();
        }
        assert_eq!(table.get(Skill::Fallacy).unwrap().level, 1);
        assert_eq!(table.get(Skill::Fallacy).unwrap().streak, 4);

        table = update_stats(&table, Skill::Fallacy, true, 900).unwrap();
        assert_eq!(table.get(Skill::Fallacy).unwrap().level, 2);
        assert_eq!(table.get(Skill::Fallacy).unwrap().streak, 0);
    }

    #[test]
    fn second_mistake_levels_down_and_clamps_at_one() {
        let table = with_skill(5, 0, 1);
        let next = update_stats(&table, Skill::Syllogism, false, 3000).unwrap();
        let s = next.get(Skill::Syllogism).unwrap();
        assert_eq!(s.level, 4);
        assert_eq!(s.mistake_streak, 0);

        let table = with_skill(1, 0, 1);
        let next = update_stats(&table, Skill::Syllogism, false, 3000).unwrap();
        let s = next.get(Skill::Syllogism).unwrap();
        assert_eq!(s.level, 1);
        assert_eq!(s.mistake_streak, 0);
    }

    #[test]
    fn level_clamps_at_max() {
        let table = with_skill(10, 4, 0);
        let next = update_stats(&table, Skill::Syllogism, true, 500).unwrap();
        assert_eq!(next.get(Skill::Syllogism).unwrap().level, 10);
        assert_eq!(next.get(Skill::Syllogism).unwrap().streak, 0);
    }

    #[test]
    fn counters_stay_mutually_exclusive() {
        let table = with_skill(4, 3, 0);
        let next = update_stats(&table, Skill::Syllogism, false, 500).unwrap();
        let s = next.get(Skill::Syllogism).unwrap();
        assert_eq!(s.streak, 0);
        assert_eq!(s.mistake_streak, 1);

        let next = update_stats(&next, Skill::Syllogism, true, 500).unwrap();
        let s = next.get(Skill::Syllogism).unwrap();
        assert_eq!(s.streak, 1);
        assert_eq!(s.mistake_streak, 0);
    }

    #[test]
    fn level_never_leaves_bounds_from_odd_inputs() {
        for level in [0, 1, 5, 10, 11, 99] {
            for (streak, mistakes) in [
                (0, 0),
                (40, 0),
                (0, 40),
                (7, 7),
                (u32::MAX, 0),
                (0, u32::MAX),
                (u32::MAX, u32::MAX),
            ] {
                for correct in [true, false] {
                    let table = with_skill(level, streak, mistakes);
                    let next = update_stats(&table, Skill::Syllogism, correct, 1).unwrap();
                    let lvl = next.get(Skill::Syllogism).unwrap().level;
                    assert!(
                        (MIN_LEVEL..=MAX_LEVEL).contains(&lvl),
                        "level {lvl} from start {level}"
                    );
                }
            }
        }
    }

    #[test]
    fn input_table_is_not_mutated() {
        let table = with_skill(3, 4, 0);
        let before = table.clone();
        let _ = update_stats(&table, Skill::Syllogism, true, 100).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn history_keeps_most_recent_hundred_in_order() {
        let start = Utc::now();
        let mut table = create_default_stats();
        for i in 0..150u64 {
            table = update_stats_at(
                &table,
                Skill::Deduction,
                i % 3 != 0,
                i,
                start + Duration::seconds(i as i64),
            )
            .unwrap();
        }
        let history = &table.get(Skill::Deduction).unwrap().history;
        assert_eq!(history.len(), 100);
        let ms: Vec<u64> = history.iter().map(|a| a.ms).collect();
        assert_eq!(ms, (50..150).collect::<Vec<u64>>());
        assert!(history.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn missing_entry_is_an_error() {
        let mut table = create_default_stats();
        table.skills.remove(&Skill::Induction);
        let err = update_stats(&table, Skill::Induction, true, 10).unwrap_err();
        assert_eq!(err, EngineError::MissingStats(Skill::Induction));
    }

    #[test]
    fn validate_rejects_out_of_range_level() {
        let table = with_skill(12, 0, 0);
        assert!(matches!(table.validate(), Err(EngineError::InvalidStats(_))));
    }

    #[test]
    fn validate_rejects_counters_past_thresholds() {
        let json = r#"{
            "syllogism": { "level": 3, "streak": 4294967295, "mistakeStreak": 0, "history": [] },
            "fallacy": { "level": 1, "streak": 0, "mistakeStreak": 0, "history": [] },
            "deduction": { "level": 1, "streak": 0, "mistakeStreak": 0, "history": [] },
            "induction": { "level": 1, "streak": 0, "mistakeStreak": 0, "history": [] }
        }"#;
        let table: StatsTable = serde_json::from_str(json).unwrap();
        assert!(matches!(table.validate(), Err(EngineError::InvalidStats(_))));

        let next = update_stats(&table, Skill::Syllogism, true, 10).unwrap();
        let s = next.get(Skill::Syllogism).unwrap();
        assert_eq!(s.level, 4);
        assert_eq!(s.streak, 0);

        assert!(with_skill(3, 0, 2).validate().is_err());
        assert!(with_skill(3, 4, 0).validate().is_ok());
        assert!(with_skill(3, 0, 1).validate().is_ok());
    }

    #[test]
    fn json_uses_camel_case_field_names() {
        let table = with_skill(2, 0, 1);
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"mistakeStreak\":1"));
        assert!(json.contains("\"syllogism\""));
        let back: StatsTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
