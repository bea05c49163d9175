pub mod focus;
pub mod scoring;
pub mod skill_stats;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

pub use skill_stats::{Attempt, SkillStats, StatsTable, create_default_stats, update_stats};

pub const MIN_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 10;
pub const HISTORY_LIMIT: usize = 100;
pub const LEVEL_UP_STREAK: u32 = 5;
pub const LEVEL_DOWN_MISTAKES: u32 = 2;

pub fn clamp_level(level: u32) -> u32 {
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Syllogism,
    Fallacy,
    Deduction,
    Induction,
}

impl Skill {
    pub fn to_key(self) -> &'static str {
        match self {
            Skill::Syllogism => "syllogism",
            Skill::Fallacy => "fallacy",
            Skill::Deduction => "deduction",
            Skill::Induction => "induction",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "syllogism" => Some(Skill::Syllogism),
            "fallacy" => Some(Skill::Fallacy),
            "deduction" => Some(Skill::Deduction),
            "induction" => Some(Skill::Induction),
            _ => None,
        }
    }

    /// Menu and tie-break order.
    pub fn all() -> &'static [Skill] {
        &[
            Skill::Syllogism,
            Skill::Fallacy,
            Skill::Deduction,
            Skill::Induction,
        ]
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Skill::Syllogism => "S",
            Skill::Fallacy => "F",
            Skill::Deduction => "D",
            Skill::Induction => "I",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_key())
    }
}

impl FromStr for Skill {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Skill::from_key(s).ok_or_else(|| EngineError::UnknownSkill(s.to_string()))
    }
}

/// What a session practices: the weakest skill on every turn, or one fixed skill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Mode {
    #[default]
    Mix,
    Single(Skill),
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Mix => "mix",
            Mode::Single(skill) => skill.to_key(),
        }
    }

    pub fn skill(self) -> Option<Skill> {
        match self {
            Mode::Mix => None,
            Mode::Single(skill) => Some(skill),
        }
    }

    /// Mix first, then each skill in menu order.
    pub fn all() -> Vec<Mode> {
        std::iter::once(Mode::Mix)
            .chain(Skill::all().iter().map(|&s| Mode::Single(s)))
            .collect()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_string()
    }
}

impl TryFrom<String> for Mode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for Mode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "mix" {
            Ok(Mode::Mix)
        } else {
            s.parse().map(Mode::Single)
        }
    }
}
