use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::Config;
use crate::engine::{Mode, Skill};
use crate::session::{Screen, SessionController};
use crate::settings::{LANGUAGE, QUESTION_COUNT, TIME_LIMIT_SECONDS};
use crate::store::schema::ThemeData;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    Start(Mode),
    Learn,
    Stats,
    Settings,
}

pub fn menu_entries() -> Vec<MenuEntry> {
    let mut entries: Vec<MenuEntry> = Mode::all().into_iter().map(MenuEntry::Start).collect();
    entries.extend([MenuEntry::Learn, MenuEntry::Stats, MenuEntry::Settings]);
    entries
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsRow {
    Control(&'static str),
    Theme,
    Reset,
}

pub const SETTINGS_ROWS: &[SettingsRow] = &[
    SettingsRow::Control(QUESTION_COUNT),
    SettingsRow::Control(TIME_LIMIT_SECONDS),
    SettingsRow::Control(LANGUAGE),
    SettingsRow::Theme,
    SettingsRow::Reset,
];

/// Terminal front end state wrapped around the session controller.
pub struct App {
    pub controller: SessionController,
    pub theme: Theme,
    pub menu_selected: usize,
    pub settings_selected: usize,
    pub confirm_reset: bool,
    pub reset_notice: bool,
    pub should_quit: bool,
    theme_key: String,
}

impl App {
    pub fn new(controller: SessionController, config: &Config) -> Self {
        let theme_key = config.theme_key();
        let theme_name = controller
            .store()
            .and_then(|s| s.read_json::<ThemeData>(&theme_key))
            .map(|d| d.name)
            .unwrap_or_else(|| config.theme.clone());
        let theme = Theme::load(&theme_name).unwrap_or_else(|| {
            tracing::warn!("unknown theme {theme_name}, using default");
            Theme::default()
        });

        Self {
            controller,
            theme,
            menu_selected: 0,
            settings_selected: 0,
            confirm_reset: false,
            reset_notice: false,
            should_quit: false,
            theme_key,
        }
    }

    pub fn locale(&self) -> &'static str {
        self.controller.language().as_str()
    }

    pub fn set_theme(&mut self, name: &str) -> bool {
        let Some(theme) = Theme::load(name) else {
            return false;
        };
        self.theme = theme;
        if let Some(store) = self.controller.store() {
            let data = ThemeData {
                name: self.theme.name.clone(),
            };
            if let Err(e) = store.write_json(&self.theme_key, &data) {
                tracing::warn!("failed to save theme: {e:#}");
            }
        }
        true
    }

    pub fn toggle_theme(&mut self) {
        let next = Theme::next_name(&self.theme.name);
        self.set_theme(&next);
    }

    pub fn tick(&mut self) {
        self.controller.poll_timers();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.controller.screen() {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Drill => self.handle_drill_key(key),
            Screen::Summary => self.handle_summary_key(key),
            Screen::Stats => self.handle_stats_key(key),
            Screen::Settings => self.handle_settings_key(key),
            Screen::Learn(skill) => self.handle_learn_key(key, skill),
        }
    }

    fn activate(&mut self, entry: MenuEntry) {
        match entry {
            MenuEntry::Start(mode) => self.controller.start_session(mode),
            MenuEntry::Learn => {
                let skill = self.controller.weakest_skill();
                self.controller.go_to_learn(skill);
            }
            MenuEntry::Stats => self.controller.go_to_stats(),
            MenuEntry::Settings => {
                self.settings_selected = 0;
                self.confirm_reset = false;
                self.reset_notice = false;
                self.controller.go_to_settings();
            }
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let entries = menu_entries();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(ch @ '1'..='5') => {
                let index = ch as usize - '1' as usize;
                if let Some(&entry) = entries.get(index) {
                    self.activate(entry);
                }
            }
            KeyCode::Char('l') => self.activate(MenuEntry::Learn),
            KeyCode::Char('s') => self.activate(MenuEntry::Stats),
            KeyCode::Char('c') => self.activate(MenuEntry::Settings),
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_selected = if self.menu_selected == 0 {
                    entries.len() - 1
                } else {
                    self.menu_selected - 1
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_selected = (self.menu_selected + 1) % entries.len();
            }
            KeyCode::Enter => {
                if let Some(&entry) = entries.get(self.menu_selected) {
                    self.activate(entry);
                }
            }
            _ => {}
        }
    }

    fn handle_drill_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.controller.go_to_menu();
            return;
        }

        if self.controller.answered() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                self.controller.advance_to_next();
            }
            return;
        }

        match key.code {
            KeyCode::Enter => self.controller.submit_current_answer(),
            KeyCode::Backspace => {
                let mut answer = self.controller.answer().to_string();
                answer.pop();
                self.controller.answer_changed(&answer);
            }
            KeyCode::Char(ch) => {
                if let Some(n) = self.quick_pick(ch) {
                    self.controller.select_option(n);
                } else {
                    let mut answer = self.controller.answer().to_string();
                    answer.push(ch);
                    self.controller.answer_changed(&answer);
                }
            }
            _ => {}
        }
    }

    /// A lone digit picks an option straight away, unless some option text
    /// itself starts with a digit and the learner may be typing it.
    fn quick_pick(&self, ch: char) -> Option<usize> {
        if !self.controller.answer().is_empty() {
            return None;
        }
        let question = self.controller.question()?;
        let n = ch.to_digit(10)? as usize;
        let numeric_options = question
            .options
            .iter()
            .any(|o| o.starts_with(|c: char| c.is_ascii_digit()));
        if numeric_options || n == 0 || n > question.options.len() {
            return None;
        }
        Some(n)
    }

    fn handle_summary_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => {
                let mode = self.controller.mode();
                self.controller.start_session(mode);
            }
            KeyCode::Char('s') => self.controller.go_to_stats(),
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => self.controller.go_to_menu(),
            _ => {}
        }
    }

    fn handle_stats_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            self.controller.go_to_menu();
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        if self.confirm_reset {
            self.confirm_reset = false;
            if key.code == KeyCode::Char('y') {
                self.controller.reset_stats();
                self.reset_notice = true;
            }
            return;
        }

        let row = SETTINGS_ROWS[self.settings_selected.min(SETTINGS_ROWS.len() - 1)];
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.controller.go_to_menu(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.settings_selected = self.settings_selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.settings_selected + 1 < SETTINGS_ROWS.len() {
                    self.settings_selected += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.change_row(row, -1),
            KeyCode::Right | KeyCode::Char('l') => self.change_row(row, 1),
            KeyCode::Enter => match row {
                SettingsRow::Reset => {
                    self.reset_notice = false;
                    self.confirm_reset = true;
                }
                other => self.change_row(other, 1),
            },
            _ => {}
        }
    }

    fn change_row(&mut self, row: SettingsRow, delta: i64) {
        match row {
            SettingsRow::Control(id) => self.controller.adjust_setting(id, delta),
            SettingsRow::Theme => self.toggle_theme(),
            SettingsRow::Reset => {}
        }
    }

    fn handle_learn_key(&mut self, key: KeyEvent, skill: Skill) {
        let skills = Skill::all();
        let i = skills.iter().position(|s| *s == skill).unwrap_or(0);
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.controller.go_to_menu(),
            KeyCode::Left | KeyCode::Char('h') => {
                let prev = skills[(i + skills.len() - 1) % skills.len()];
                self.controller.go_to_learn(prev);
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                let next = skills[(i + 1) % skills.len()];
                self.controller.go_to_learn(next);
            }
            KeyCode::Enter => self.controller.start_session(Mode::Single(skill)),
            _ => {}
        }
    }
}
