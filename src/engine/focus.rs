use std::cmp::Ordering;

use crate::engine::{MAX_LEVEL, Skill, SkillStats, StatsTable};

/// Tie-break prior for a skill that has never been attempted.
const EMPTY_HISTORY_ACCURACY: f64 = 0.5;

fn tie_break_accuracy(stats: &SkillStats) -> f64 {
    if stats.history.is_empty() {
        return EMPTY_HISTORY_ACCURACY;
    }
    let correct = stats.history.iter().filter(|a| a.correct).count();
    correct as f64 / stats.history.len() as f64
}

/// The skill with the lowest level; ties go to the lowest accuracy, then to
/// the earlier skill in menu order. A skill missing from the table sorts as
/// an untouched level-1 skill.
pub fn weakest_skill(stats: &StatsTable) -> Skill {
    let fresh = SkillStats::default();
    let mut best: Option<(Skill, u32, f64)> = None;

    for &skill in Skill::all() {
        let entry = stats.get(skill).unwrap_or(&fresh);
        let level = entry.level.min(MAX_LEVEL);
        let acc = tie_break_accuracy(entry);

        let better = match best {
            None => true,
            Some((_, best_level, best_acc)) => match level.cmp(&best_level) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => acc < best_acc,
            },
        };
        if better {
            best = Some((skill, level, acc));
        }
    }

    best.map(|(skill, _, _)| skill).unwrap_or(Skill::Syllogism)
}

/// Skill for the next mix-mode question: always steer toward the weakest area.
pub fn pick_skill(stats: &StatsTable) -> Skill {
    weakest_skill(stats)
}
