use crate::engine::{Attempt, MAX_LEVEL, Skill, StatsTable, clamp_level};

const TARGET_MS_EASIEST: f64 = 6000.0;
const TARGET_MS_HARDEST: f64 = 3000.0;

/// Window used by the statistics screen.
pub const RECENT_WINDOW: usize = 12;

/// Percentage of correct attempts, rounded to the nearest integer. 0 when empty.
pub fn accuracy<'a>(attempts: impl IntoIterator<Item = &'a Attempt>) -> u32 {
    let (correct, total) = attempts
        .into_iter()
        .fold((0usize, 0usize), |(c, t), a| (c + a.correct as usize, t + 1));
    if total == 0 {
        return 0;
    }
    (100.0 * correct as f64 / total as f64).round() as u32
}

/// Mean response time in milliseconds. 0 when empty.
pub fn average_ms<'a>(attempts: impl IntoIterator<Item = &'a Attempt>) -> f64 {
    let (sum, total) = attempts
        .into_iter()
        .fold((0u64, 0usize), |(s, t), a| (s + a.ms, t + 1));
    if total == 0 {
        return 0.0;
    }
    sum as f64 / total as f64
}

pub fn table_accuracy(stats: &StatsTable) -> u32 {
    accuracy(stats.all_attempts())
}

pub fn table_average_ms(stats: &StatsTable) -> f64 {
    average_ms(stats.all_attempts())
}

/// Target answer time for a level: 6s at level 1 sliding linearly to 3s at
/// level 10. Shown to the learner, never enforced.
pub fn target_ms(level: u32) -> f64 {
    let level = clamp_level(level);
    let span = (MAX_LEVEL - 1) as f64;
    TARGET_MS_EASIEST - (level - 1) as f64 / span * (TARGET_MS_EASIEST - TARGET_MS_HARDEST)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RecentSummary {
    pub attempts: usize,
    pub accuracy: u32,
    pub average_ms: f64,
}

impl RecentSummary {
    fn from_attempts(attempts: &[&Attempt]) -> Self {
        Self {
            attempts: attempts.len(),
            accuracy: accuracy(attempts.iter().copied()),
            average_ms: average_ms(attempts.iter().copied()),
        }
    }
}

/// Summary over the last `window` attempts of one skill.
pub fn recent_summary(stats: &StatsTable, skill: Skill, window: usize) -> RecentSummary {
    let recent: Vec<&Attempt> = stats
        .get(skill)
        .map(|s| {
            let skip = s.history.len().saturating_sub(window);
            s.history.iter().skip(skip).collect()
        })
        .unwrap_or_default();
    RecentSummary::from_attempts(&recent)
}

/// Summary over every skill's recent window combined.
pub fn overall_recent_summary(stats: &StatsTable, window: usize) -> RecentSummary {
    let recent: Vec<&Attempt> = stats
        .skills
        .values()
        .flat_map(|s| {
            let skip = s.history.len().saturating_sub(window);
            s.history.iter().skip(skip)
        })
        .collect();
    RecentSummary::from_attempts(&recent)
}
