use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::app::MenuEntry;
use crate::session::SessionController;
use crate::ui::theme::Theme;
use crate::ui::{mode_label, skill_label, skill_subtitle};

pub struct Menu<'a> {
    pub entries: Vec<MenuEntry>,
    pub selected: usize,
    pub controller: &'a SessionController,
    pub error: Option<String>,
    pub theme: &'a Theme,
    pub locale: &'a str,
}

impl Menu<'_> {
    fn item_text(&self, entry: MenuEntry) -> (String, String, String) {
        let locale = self.locale;
        match entry {
            MenuEntry::Start(mode) => {
                let subtitle = match mode.skill() {
                    Some(skill) => skill_subtitle(skill, locale),
                    None => t!("menu.mix_subtitle", locale = locale).to_string(),
                };
                let key = match mode.skill() {
                    Some(skill) => skill.symbol().to_string(),
                    None => "*".to_string(),
                };
                (key, mode_label(mode, locale), subtitle)
            }
            MenuEntry::Learn => (
                "l".to_string(),
                t!("menu.learn", locale = locale).to_string(),
                t!("menu.learn_subtitle", locale = locale).to_string(),
            ),
            MenuEntry::Stats => (
                "s".to_string(),
                t!("menu.stats", locale = locale).to_string(),
                t!("menu.stats_subtitle", locale = locale).to_string(),
            ),
            MenuEntry::Settings => (
                "c".to_string(),
                t!("menu.settings", locale = locale).to_string(),
                t!("menu.settings_subtitle", locale = locale).to_string(),
            ),
        }
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let locale = self.locale;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let settings = self.controller.settings();
        let weakest = if self.controller.stats().all_attempts().next().is_some() {
            t!(
                "menu.weakest",
                locale = locale,
                skill = skill_label(self.controller.weakest_skill(), locale)
            )
            .to_string()
        } else {
            t!("menu.no_data", locale = locale).to_string()
        };
        let info = format!(
            "{}  |  {}",
            t!(
                "menu.summary_line",
                locale = locale,
                count = settings.question_count,
                seconds = settings.time_limit_seconds
            ),
            weakest
        );

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                t!("app.name", locale = locale).to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("app.tagline", locale = locale).to_string(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(info, Style::default().fg(colors.text_muted()))),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        if let Some(ref error) = self.error {
            Paragraph::new(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(colors.error()),
            )))
            .alignment(Alignment::Center)
            .render(layout[1], buf);
        }

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.entries
                    .iter()
                    .map(|_| Constraint::Length(2))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, entry) in self.entries.iter().enumerate() {
            if i >= menu_layout.len() {
                break;
            }
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let (symbol, label, description) = self.item_text(*entry);
            let hotkey = match entry {
                MenuEntry::Start(_) => format!("{}", i + 1),
                _ => symbol.clone(),
            };

            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            let lines = vec![
                Line::from(vec![
                    Span::styled(format!(" {indicator} [{hotkey}] "), label_style),
                    Span::styled(label, label_style),
                    Span::styled(
                        if matches!(entry, MenuEntry::Start(_)) {
                            format!("  {symbol}")
                        } else {
                            String::new()
                        },
                        Style::default().fg(colors.accent_dim()),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("       {description}"),
                    Style::default().fg(colors.text_muted()),
                )),
            ];
            Paragraph::new(lines).render(menu_layout[i], buf);
        }
    }
}
