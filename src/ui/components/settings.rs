use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::app::{SETTINGS_ROWS, SettingsRow};
use crate::settings::{LANGUAGE, QUESTION_COUNT, Settings, TIME_LIMIT_SECONDS};
use crate::ui::language_label;
use crate::ui::theme::Theme;

pub struct SettingsView<'a> {
    pub settings: &'a Settings,
    pub theme_name: &'a str,
    pub selected: usize,
    pub confirm_reset: bool,
    pub reset_notice: bool,
    pub theme: &'a Theme,
    pub locale: &'a str,
}

impl SettingsView<'_> {
    fn row_text(&self, row: SettingsRow) -> (String, Option<String>) {
        let locale = self.locale;
        match row {
            SettingsRow::Control(QUESTION_COUNT) => (
                t!("settings.question_count", locale = locale).to_string(),
                Some(self.settings.question_count.to_string()),
            ),
            SettingsRow::Control(TIME_LIMIT_SECONDS) => (
                t!("settings.time_limit", locale = locale).to_string(),
                Some(self.settings.time_limit_seconds.to_string()),
            ),
            SettingsRow::Control(LANGUAGE) => (
                t!("settings.language", locale = locale).to_string(),
                Some(language_label(self.settings.language)),
            ),
            SettingsRow::Control(other) => (other.to_string(), None),
            SettingsRow::Theme => (
                t!("settings.theme", locale = locale).to_string(),
                Some(self.theme_name.to_string()),
            ),
            SettingsRow::Reset => (t!("settings.reset", locale = locale).to_string(), None),
        }
    }
}

impl Widget for SettingsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let locale = self.locale;

        let block = Block::bordered()
            .title(format!(" {} ", t!("settings.title", locale = locale)))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(SETTINGS_ROWS.len() as u16 * 3),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            format!("  {}", t!("settings.intro", locale = locale)),
            Style::default().fg(colors.text_muted()),
        )))
        .render(layout[0], buf);

        let field_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                SETTINGS_ROWS
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[1]);

        for (i, row) in SETTINGS_ROWS.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { " > " } else { "   " };
            let (label, value) = self.row_text(*row);

            let label_style = Style::default()
                .fg(match row {
                    SettingsRow::Reset => colors.error(),
                    _ if is_selected => colors.accent(),
                    _ => colors.fg(),
                })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            let value_style = Style::default().fg(if is_selected {
                colors.warning()
            } else {
                colors.text_muted()
            });

            let mut lines = vec![Line::from(Span::styled(
                format!("{indicator}{label}"),
                label_style,
            ))];
            if let Some(value) = value {
                lines.push(Line::from(Span::styled(
                    format!("     < {value} >"),
                    value_style,
                )));
            }
            Paragraph::new(lines).render(field_layout[i], buf);
        }

        let notice = if self.confirm_reset {
            Some((t!("settings.reset_confirm", locale = locale), colors.warning()))
        } else if self.reset_notice {
            Some((t!("settings.reset_done", locale = locale), colors.success()))
        } else {
            None
        };
        if let Some((text, color)) = notice {
            Paragraph::new(Line::from(Span::styled(
                format!("  {text}"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .render(layout[3], buf);
        }
    }
}
