use serde::{Deserialize, Serialize};

use crate::engine::{Mode, StatsTable};
use crate::settings::{Settings, SettingControl, merge_saved};
use crate::store::json_store::JsonStore;

/// Session blob: cumulative stats plus the last chosen mode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub stats: StatsTable,
    #[serde(default)]
    pub mode: Mode,
}

/// Persisted theme choice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeData {
    pub name: String,
}

/// Read the session blob, discarding it when the stats fail the structural
/// check. Always returns usable data.
pub fn load_session(store: &JsonStore, key: &str) -> SessionData {
    let Some(data) = store.read_json::<SessionData>(key) else {
        return SessionData::default();
    };
    match data.stats.validate() {
        Ok(()) => data,
        Err(e) => {
            tracing::warn!("discarding persisted stats: {e}");
            SessionData {
                stats: StatsTable::default(),
                mode: data.mode,
            }
        }
    }
}

/// Read settings merged field by field over the defaults, then clamped.
pub fn load_settings(store: &JsonStore, key: &str, controls: &[SettingControl]) -> Settings {
    match store.read_json::<serde_json::Value>(key) {
        Some(saved) => merge_saved(&saved, controls),
        None => Settings::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Skill, update_stats};
    use crate::settings::{Language, SETTING_CONTROLS};
    use std::fs;
    use tempfile::TempDir;

    const SESSION: &str = "logic-training:session:logic";
    const SETTINGS: &str = "logic-training:settings";

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn session_round_trips() {
        let (_dir, store) = make_test_store();
        let stats = update_stats(&StatsTable::default(), Skill::Fallacy, true, 1500).unwrap();
        let data = SessionData {
            stats,
            mode: Mode::Single(Skill::Fallacy),
        };
        store.write_json(SESSION, &data).unwrap();
        assert_eq!(load_session(&store, SESSION), data);
    }

    #[test]
    fn missing_session_gives_defaults() {
        let (_dir, store) = make_test_store();
        assert_eq!(load_session(&store, SESSION), SessionData::default());
    }

    #[test]
    fn structurally_invalid_stats_are_discarded() {
        let (dir, store) = make_test_store();
        let json = r#"{
            "stats": {
                "syllogism": { "level": 42, "streak": 0, "mistakeStreak": 0, "history": [] },
                "fallacy": { "level": 1, "streak": 0, "mistakeStreak": 0, "history": [] },
                "deduction": { "level": 1, "streak": 0, "mistakeStreak": 0, "history": [] },
                "induction": { "level": 1, "streak": 0, "mistakeStreak": 0, "history": [] }
            },
            "mode": "deduction"
        }"#;
        fs::write(dir.path().join("logic-training_session_logic.json"), json).unwrap();
        let data = load_session(&store, SESSION);
        assert_eq!(data.stats, StatsTable::default());
        assert_eq!(data.mode, Mode::Single(Skill::Deduction));
    }

    #[test]
    fn missing_skill_is_discarded() {
        let (dir, store) = make_test_store();
        let json = r#"{ "stats": { "syllogism": { "level": 3, "streak": 1, "mistakeStreak": 0, "history": [] } }, "mode": "mix" }"#;
        fs::write(dir.path().join("logic-training_session_logic.json"), json).unwrap();
        assert_eq!(load_session(&store, SESSION).stats, StatsTable::default());
    }

    #[test]
    fn garbage_session_gives_defaults() {
        let (dir, store) = make_test_store();
        fs::write(dir.path().join("logic-training_session_logic.json"), "[1, 2").unwrap();
        assert_eq!(load_session(&store, SESSION), SessionData::default());
    }

    #[test]
    fn settings_are_merged_and_clamped() {
        let (dir, store) = make_test_store();
        fs::write(
            dir.path().join("logic-training_settings.json"),
            r#"{ "questionCount": 400, "language": "id" }"#,
        )
        .unwrap();
        let settings = load_settings(&store, SETTINGS, SETTING_CONTROLS);
        assert_eq!(settings.question_count, 50);
        assert_eq!(settings.time_limit_seconds, 20);
        assert_eq!(settings.language, Language::Id);
    }

    #[test]
    fn one_bad_setting_keeps_the_rest() {
        let (dir, store) = make_test_store();
        fs::write(
            dir.path().join("logic-training_settings.json"),
            r#"{ "questionCount": -3, "timeLimitSeconds": 45, "language": "id" }"#,
        )
        .unwrap();
        let settings = load_settings(&store, SETTINGS, SETTING_CONTROLS);
        assert_eq!(settings.question_count, 5);
        assert_eq!(settings.time_limit_seconds, 45);
        assert_eq!(settings.language, Language::Id);
    }

    #[test]
    fn mistyped_setting_falls_back_to_its_default() {
        let (dir, store) = make_test_store();
        fs::write(
            dir.path().join("logic-training_settings.json"),
            r#"{ "questionCount": "many", "timeLimitSeconds": 30, "language": "fr" }"#,
        )
        .unwrap();
        let settings = load_settings(&store, SETTINGS, SETTING_CONTROLS);
        assert_eq!(settings.question_count, 10);
        assert_eq!(settings.time_limit_seconds, 30);
        assert_eq!(settings.language, Language::En);
    }
}
