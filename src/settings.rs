use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Id,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Id => "id",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "id" => Some(Language::Id),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    #[serde(default = "default_time_limit_seconds")]
    pub time_limit_seconds: u32,
    #[serde(default)]
    pub language: Language,
}

fn default_question_count() -> u32 {
    10
}
fn default_time_limit_seconds() -> u32 {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            time_limit_seconds: default_time_limit_seconds(),
            language: Language::default(),
        }
    }
}

/// One adjustable setting, addressed by `id` from the settings screen.
pub struct SettingControl {
    pub id: &'static str,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub get: fn(&Settings) -> i64,
    pub set: fn(&mut Settings, i64),
}

impl SettingControl {
    pub fn clamp(&self, value: i64) -> i64 {
        value.clamp(self.min, self.max)
    }
}

pub const QUESTION_COUNT: &str = "questionCount";
pub const TIME_LIMIT_SECONDS: &str = "timeLimitSeconds";
pub const LANGUAGE: &str = "language";

pub static SETTING_CONTROLS: &[SettingControl] = &[
    SettingControl {
        id: QUESTION_COUNT,
        min: 5,
        max: 50,
        step: 1,
        get: |s| s.question_count as i64,
        set: |s, v| s.question_count = v.clamp(5, 50) as u32,
    },
    SettingControl {
        id: TIME_LIMIT_SECONDS,
        min: 10,
        max: 120,
        step: 5,
        get: |s| s.time_limit_seconds as i64,
        set: |s, v| s.time_limit_seconds = v.clamp(10, 120) as u32,
    },
    SettingControl {
        id: LANGUAGE,
        min: 0,
        max: 1,
        step: 1,
        get: |s| match s.language {
            Language::En => 0,
            Language::Id => 1,
        },
        set: |s, v| {
            s.language = if v <= 0 { Language::En } else { Language::Id };
        },
    },
];

pub fn find_control<'a>(controls: &'a [SettingControl], id: &str) -> Option<&'a SettingControl> {
    controls.iter().find(|c| c.id == id)
}

/// Clamp every control into its declared bounds. Applied after every load
/// and every mutation so out-of-range values never reach the session.
pub fn normalize(mut settings: Settings, controls: &[SettingControl]) -> Settings {
    for control in controls {
        let value = (control.get)(&settings);
        let clamped = control.clamp(value);
        if clamped != value {
            (control.set)(&mut settings, clamped);
        }
    }
    settings
}

/// Overlay a saved settings blob on the defaults one field at a time, then
/// clamp. A field with the wrong type keeps its default without affecting
/// the others. Numbers are read as integers before clamping, so negative or
/// oversized counts land on the nearest bound.
pub fn merge_saved(saved: &serde_json::Value, controls: &[SettingControl]) -> Settings {
    let mut settings = Settings::default();
    let Some(fields) = saved.as_object() else {
        return settings;
    };
    for control in controls {
        let Some(value) = fields.get(control.id) else {
            continue;
        };
        if control.id == LANGUAGE {
            match value.as_str().and_then(Language::from_code) {
                Some(language) => settings.language = language,
                None => tracing::warn!("ignoring saved language {value}"),
            }
            continue;
        }
        let number = value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f.round() as i64));
        match number {
            Some(n) => (control.set)(&mut settings, control.clamp(n)),
            None => tracing::warn!("ignoring saved {} {value}", control.id),
        }
    }
    normalize(settings, controls)
}

/// `clamp(current + step * delta, min, max)` for the named control. Unknown
/// ids leave the settings unchanged.
pub fn adjust(settings: &Settings, controls: &[SettingControl], id: &str, delta: i64) -> Settings {
    let mut next = settings.clone();
    if let Some(control) = find_control(controls, id) {
        let current = (control.get)(&next);
        let value = control.clamp(current.saturating_add(control.step.saturating_mul(delta)));
        (control.set)(&mut next, value);
    }
    normalize(next, controls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn saved_fields_merge_over_defaults() {
        let merged = merge_saved(&json!({ "timeLimitSeconds": 7.6 }), SETTING_CONTROLS);
        assert_eq!(merged.time_limit_seconds, 10);
        assert_eq!(merged.question_count, 10);

        let merged = merge_saved(&json!({ "questionCount": 12, "extra": true }), SETTING_CONTROLS);
        assert_eq!(merged.question_count, 12);
        assert_eq!(merged.language, Language::En);

        assert_eq!(merge_saved(&json!([1, 2]), SETTING_CONTROLS), Settings::default());
    }

    #[test]
    fn defaults_are_in_bounds() {
        let settings = Settings::default();
        assert_eq!(settings.question_count, 10);
        assert_eq!(settings.time_limit_seconds, 20);
        assert_eq!(settings.language, Language::En);
        assert_eq!(normalize(settings.clone(), SETTING_CONTROLS), settings);
    }

    #[test]
    fn question_count_floors_at_five() {
        let mut settings = Settings::default();
        for _ in 0..5 {
            settings = adjust(&settings, SETTING_CONTROLS, QUESTION_COUNT, -1);
        }
        assert_eq!(settings.question_count, 5);
        settings = adjust(&settings, SETTING_CONTROLS, QUESTION_COUNT, -1);
        assert_eq!(settings.question_count, 5);
    }

    #[test]
    fn time_limit_moves_in_steps_of_five() {
        let settings = adjust(&Settings::default(), SETTING_CONTROLS, TIME_LIMIT_SECONDS, 2);
        assert_eq!(settings.time_limit_seconds, 30);
        let settings = adjust(&settings, SETTING_CONTROLS, TIME_LIMIT_SECONDS, 100);
        assert_eq!(settings.time_limit_seconds, 120);
    }

    #[test]
    fn language_toggles_and_clamps() {
        let settings = adjust(&Settings::default(), SETTING_CONTROLS, LANGUAGE, 1);
        assert_eq!(settings.language, Language::Id);
        let settings = adjust(&settings, SETTING_CONTROLS, LANGUAGE, 1);
        assert_eq!(settings.language, Language::Id);
        let settings = adjust(&settings, SETTING_CONTROLS, LANGUAGE, -3);
        assert_eq!(settings.language, Language::En);
    }

    #[test]
    fn unknown_control_is_ignored() {
        let settings = Settings::default();
        assert_eq!(adjust(&settings, SETTING_CONTROLS, "volume", 3), settings);
    }

    #[test]
    fn normalize_clamps_loaded_values() {
        let settings = Settings {
            question_count: 500,
            time_limit_seconds: 2,
            language: Language::Id,
        };
        let settings = normalize(settings, SETTING_CONTROLS);
        assert_eq!(settings.question_count, 50);
        assert_eq!(settings.time_limit_seconds, 10);
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"timeLimitSeconds": 45}"#).unwrap();
        assert_eq!(settings.question_count, 10);
        assert_eq!(settings.time_limit_seconds, 45);
        assert_eq!(settings.language, Language::En);
    }
}
