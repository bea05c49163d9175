use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use rust_embed::Embed;

use crate::bank::{QuestionEntry, QuestionSource};
use crate::engine::{Skill, clamp_level};
use crate::settings::Language;

#[derive(Embed)]
#[folder = "assets/questions/"]
struct QuestionAssets;

/// Per-skill file layout: level -> language -> entries.
type SkillFile = BTreeMap<u32, BTreeMap<Language, Vec<QuestionEntry>>>;

/// In-memory question bank keyed by skill, level and language.
#[derive(Clone, Debug, Default)]
pub struct QuestionCatalog {
    entries: HashMap<(Skill, u32, Language), Vec<QuestionEntry>>,
}

impl QuestionCatalog {
    /// The bank compiled into the binary. Files that fail to parse and
    /// entries that fail validation are skipped with a warning.
    pub fn embedded() -> Self {
        let mut catalog = Self::default();
        for &skill in Skill::all() {
            let filename = format!("{}.json", skill.to_key());
            let Some(file) = QuestionAssets::get(&filename) else {
                tracing::warn!("question bank has no {filename}");
                continue;
            };
            let loaded = std::str::from_utf8(file.data.as_ref())
                .context("question file is not UTF-8")
                .and_then(|json| catalog.load_skill_json(skill, json));
            if let Err(e) = loaded {
                tracing::warn!("skipping {filename}: {e:#}");
            }
        }
        catalog
    }

    /// Merge one skill's JSON file into the catalog. Returns the number of
    /// entries accepted.
    pub fn load_skill_json(&mut self, skill: Skill, json: &str) -> Result<usize> {
        let file: SkillFile = serde_json::from_str(json)
            .with_context(|| format!("parsing {} questions", skill.to_key()))?;
        let mut accepted = 0;
        for (level, languages) in file {
            if clamp_level(level) != level {
                tracing::warn!("{skill}: ignoring out-of-range level {level}");
                continue;
            }
            for (language, entries) in languages {
                for entry in entries {
                    match entry.validate() {
                        Ok(()) => {
                            self.insert(skill, level, language, entry);
                            accepted += 1;
                        }
                        Err(e) => tracing::warn!("{e}"),
                    }
                }
            }
        }
        Ok(accepted)
    }

    pub fn insert(&mut self, skill: Skill, level: u32, language: Language, entry: QuestionEntry) {
        self.entries
            .entry((skill, level, language))
            .or_default()
            .push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QuestionSource for QuestionCatalog {
    fn questions(&self, skill: Skill, level: u32, language: Language) -> &[QuestionEntry] {
        self.entries
            .get(&(skill, level, language))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
