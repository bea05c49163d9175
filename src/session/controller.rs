use std::time::{Duration, Instant};

use crate::bank::Question;
use crate::config::Config;
use crate::engine::{Mode, Skill, StatsTable, focus, scoring};
use crate::error::EngineError;
use crate::provider::TrainingProvider;
use crate::session::clock::{Clock, SystemClock};
use crate::session::turn::{Feedback, Screen, SessionCounts, SessionError};
use crate::settings::{self, Language, Settings};
use crate::store::json_store::JsonStore;
use crate::store::schema::{self, SessionData};

const TICK: Duration = Duration::from_secs(1);

pub type CompletionCallback = Box<dyn FnMut(&SessionCounts)>;

/// Drives a timed run of questions and owns all mutable quiz state. The
/// presentation layer only reads through accessors and calls actions.
pub struct SessionController {
    provider: Box<dyn TrainingProvider>,
    store: Option<JsonStore>,
    session_key: String,
    settings_key: String,
    clock: Box<dyn Clock>,
    auto_advance: Duration,
    on_complete: Option<CompletionCallback>,

    screen: Screen,
    mode: Mode,
    stats: StatsTable,
    settings: Settings,
    question: Option<Question>,
    answer: String,
    feedback: Option<Feedback>,
    error: Option<SessionError>,
    session: SessionCounts,
    question_index: u32,
    time_left: u32,
    answered: bool,
    question_started: Option<Instant>,
    next_tick_at: Option<Instant>,
    advance_at: Option<Instant>,
}

impl SessionController {
    /// Restores stats, mode and settings from `store` when present; anything
    /// missing or malformed falls back to defaults.
    pub fn new(provider: Box<dyn TrainingProvider>, store: Option<JsonStore>, config: &Config) -> Self {
        let session_key = config.session_key(provider.id());
        let settings_key = config.settings_key();

        let (data, settings) = match store {
            Some(ref s) => (
                schema::load_session(s, &session_key),
                schema::load_settings(s, &settings_key, provider.settings_controls()),
            ),
            None => (
                SessionData {
                    stats: provider.create_default_stats(),
                    mode: Mode::Mix,
                },
                settings::normalize(Settings::default(), provider.settings_controls()),
            ),
        };

        Self {
            provider,
            store,
            session_key,
            settings_key,
            clock: Box::new(SystemClock),
            auto_advance: Duration::from_millis(config.auto_advance_ms),
            on_complete: None,
            screen: Screen::Menu,
            mode: data.mode,
            stats: data.stats,
            time_left: settings.time_limit_seconds,
            settings,
            question: None,
            answer: String::new(),
            feedback: None,
            error: None,
            session: SessionCounts::default(),
            question_index: 1,
            answered: false,
            question_started: None,
            next_tick_at: None,
            advance_at: None,
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Called once each time a run reaches the summary screen.
    pub fn set_on_complete(&mut self, callback: CompletionCallback) {
        self.on_complete = Some(callback);
    }

    // --- accessors ---

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn stats(&self) -> &StatsTable {
        &self.stats
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn language(&self) -> Language {
        self.settings.language
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn error(&self) -> Option<SessionError> {
        self.error
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.message(self.settings.language))
    }

    pub fn session(&self) -> SessionCounts {
        self.session
    }

    pub fn question_index(&self) -> u32 {
        self.question_index
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn answered(&self) -> bool {
        self.answered
    }

    pub fn weakest_skill(&self) -> Skill {
        focus::weakest_skill(&self.stats)
    }

    pub fn target_ms(&self) -> Option<f64> {
        self.question.as_ref().map(|q| scoring::target_ms(q.level))
    }

    pub fn store(&self) -> Option<&JsonStore> {
        self.store.as_ref()
    }

    pub fn controls(&self) -> &'static [settings::SettingControl] {
        self.provider.settings_controls()
    }

    // --- navigation ---

    pub fn go_to_menu(&mut self) {
        self.leave_drill();
        self.screen = Screen::Menu;
        self.error = None;
    }

    pub fn go_to_stats(&mut self) {
        self.leave_drill();
        self.screen = Screen::Stats;
    }

    pub fn go_to_settings(&mut self) {
        self.leave_drill();
        self.screen = Screen::Settings;
    }

    pub fn go_to_learn(&mut self, skill: Skill) {
        self.leave_drill();
        self.screen = Screen::Learn(skill);
    }

    fn leave_drill(&mut self) {
        self.cancel_timers();
        self.question = None;
        self.feedback = None;
        self.answer.clear();
        self.answered = false;
    }

    fn cancel_timers(&mut self) {
        self.next_tick_at = None;
        self.advance_at = None;
    }

    // --- session flow ---

    pub fn start_session(&mut self, mode: Mode) {
        self.cancel_timers();
        self.mode = mode;
        self.session = SessionCounts::default();
        self.question_index = 1;
        self.screen = Screen::Drill;
        self.error = None;
        self.persist_session();

        match self.create_question() {
            Ok(question) => {
                tracing::info!("started {} session", mode.as_str());
                self.begin_question(question);
            }
            Err(e) => {
                tracing::error!("failed to start {} session: {e}", mode.as_str());
                self.leave_drill();
                self.error = Some(SessionError::StartFailed);
                self.screen = Screen::Menu;
            }
        }
    }

    fn create_question(&mut self) -> Result<Question, EngineError> {
        let skill = match self.mode.skill() {
            Some(skill) => skill,
            None => self.provider.pick_skill(&self.stats),
        };
        let level = self.stats.level(skill)?;
        self.provider
            .create_question(skill, level, self.settings.language)
    }

    fn begin_question(&mut self, question: Question) {
        let now = self.clock.now();
        tracing::debug!("question {} ({} level {})", question.id, question.skill, question.level);
        self.question = Some(question);
        self.answer.clear();
        self.error = None;
        self.feedback = None;
        self.answered = false;
        self.question_started = Some(now);
        self.time_left = self.settings.time_limit_seconds;
        self.next_tick_at = Some(now + TICK);
        self.advance_at = None;
    }

    /// Edit the pending answer. Ignored once the question is answered.
    pub fn answer_changed(&mut self, raw: &str) {
        if self.answered {
            return;
        }
        self.answer = raw.to_string();
        self.error = None;
    }

    pub fn submit_current_answer(&mut self) {
        let raw = self.answer.clone();
        self.submit_answer(&raw);
    }

    /// Submit the text of the `n`th option (1-based).
    pub fn select_option(&mut self, n: usize) {
        let Some(text) = self
            .question
            .as_ref()
            .and_then(|q| n.checked_sub(1).and_then(|i| q.options.get(i)))
            .cloned()
        else {
            self.error = Some(SessionError::Answer(crate::error::AnswerError::Invalid));
            return;
        };
        self.answer_changed(&text);
        self.submit_answer(&text);
    }

    pub fn submit_answer(&mut self, raw: &str) {
        let Some(question) = self.question.as_ref() else {
            return;
        };
        if self.answered {
            return;
        }

        let correct = match self.provider.grade_answer(question, raw) {
            Ok(correct) => correct,
            Err(e) => {
                self.error = Some(SessionError::Answer(e));
                return;
            }
        };
        let elapsed = self.elapsed_ms();
        self.apply_result(correct, elapsed, false);
    }

    pub fn handle_timeout(&mut self) {
        if self.question.is_none() || self.answered {
            return;
        }
        let elapsed = self.elapsed_ms();
        self.apply_result(false, elapsed, true);
    }

    fn elapsed_ms(&self) -> u64 {
        self.question_started
            .map(|start| self.clock.now().saturating_duration_since(start).as_millis() as u64)
            .unwrap_or(0)
    }

    fn apply_result(&mut self, correct: bool, elapsed_ms: u64, timed_out: bool) {
        let Some(question) = self.question.as_ref() else {
            tracing::warn!("result without an active question");
            return;
        };

        match self
            .provider
            .update_stats(&self.stats, question.skill, correct, elapsed_ms)
        {
            Ok(next) => {
                let feedback = Feedback {
                    correct,
                    expected: self.provider.format_expected(question),
                    ms: elapsed_ms,
                    skill: question.skill,
                    level: question.level,
                    timed_out,
                };
                self.stats = next;
                self.feedback = Some(feedback);
                self.session.record(correct);
                self.error = None;
                self.answered = true;
                self.next_tick_at = None;
                if correct || timed_out {
                    self.advance_at = Some(self.clock.now() + self.auto_advance);
                }
                self.persist_session();
            }
            Err(e) => {
                tracing::error!("failed to record answer: {e}");
                self.error = Some(SessionError::RecordFailed);
            }
        }
    }

    pub fn advance_to_next(&mut self) {
        if self.question.is_none() || !self.answered {
            return;
        }
        self.cancel_timers();

        let next_index = self.question_index + 1;
        if next_index > self.settings.question_count {
            self.screen = Screen::Summary;
            self.question = None;
            self.answered = false;
            tracing::info!(
                correct = self.session.correct,
                wrong = self.session.wrong,
                "session complete"
            );
            if let Some(callback) = self.on_complete.as_mut() {
                callback(&self.session);
            }
            return;
        }

        match self.create_question() {
            Ok(question) => {
                self.question_index = next_index;
                self.begin_question(question);
            }
            Err(e) => {
                tracing::error!("failed to load next question: {e}");
                self.error = Some(SessionError::NextFailed);
            }
        }
    }

    /// One second of countdown. At zero the unanswered question times out,
    /// exactly once.
    pub fn countdown_tick(&mut self) {
        if self.screen != Screen::Drill || self.question.is_none() || self.answered {
            return;
        }
        if self.time_left <= 1 {
            self.time_left = 0;
            self.next_tick_at = None;
            self.handle_timeout();
        } else {
            self.time_left -= 1;
        }
    }

    /// Fire whichever timers are due: the one-second countdown and the
    /// auto-advance after a correct or timed-out answer.
    pub fn poll_timers(&mut self) {
        let now = self.clock.now();
        while let Some(at) = self.next_tick_at {
            if now < at {
                break;
            }
            self.next_tick_at = Some(at + TICK);
            self.countdown_tick();
        }
        if let Some(at) = self.advance_at
            && now >= at
        {
            self.advance_at = None;
            self.advance_to_next();
        }
    }

    // --- stats and settings ---

    pub fn reset_stats(&mut self) {
        self.stats = self.provider.create_default_stats();
        tracing::info!("stats reset");
        self.persist_session();
    }

    pub fn adjust_setting(&mut self, id: &str, delta: i64) {
        if settings::find_control(self.provider.settings_controls(), id).is_none() {
            tracing::debug!("ignoring unknown setting {id}");
            return;
        }
        self.settings = settings::adjust(&self.settings, self.provider.settings_controls(), id, delta);
        self.persist_settings();
    }

    /// Replace all settings at once (command-line overrides), clamped.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings::normalize(settings, self.provider.settings_controls());
        self.persist_settings();
    }

    fn persist_session(&self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let data = SessionData {
            stats: self.stats.clone(),
            mode: self.mode,
        };
        if let Err(e) = store.write_json(&self.session_key, &data) {
            tracing::warn!("failed to save session: {e:#}");
        }
    }

    fn persist_settings(&self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if let Err(e) = store.write_json(&self.settings_key, &self.settings) {
            tracing::warn!("failed to save settings: {e:#}");
        }
    }
}
