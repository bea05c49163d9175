use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::engine::Skill;
use crate::ui::theme::Theme;

/// Study notes for one skill, plus a tab strip for switching skills.
pub struct LearnView<'a> {
    skill: Skill,
    theme: &'a Theme,
    locale: &'a str,
}

impl<'a> LearnView<'a> {
    pub fn new(skill: Skill, theme: &'a Theme, locale: &'a str) -> Self {
        Self {
            skill,
            theme,
            locale,
        }
    }
}

pub fn study_text(skill: Skill, locale: &str) -> (String, String, String) {
    let (title, description, body) = match skill {
        Skill::Syllogism => (
            t!("learn.syllogism.title", locale = locale),
            t!("learn.syllogism.description", locale = locale),
            t!("learn.syllogism.body", locale = locale),
        ),
        Skill::Fallacy => (
            t!("learn.fallacy.title", locale = locale),
            t!("learn.fallacy.description", locale = locale),
            t!("learn.fallacy.body", locale = locale),
        ),
        Skill::Deduction => (
            t!("learn.deduction.title", locale = locale),
            t!("learn.deduction.description", locale = locale),
            t!("learn.deduction.body", locale = locale),
        ),
        Skill::Induction => (
            t!("learn.induction.title", locale = locale),
            t!("learn.induction.description", locale = locale),
            t!("learn.induction.body", locale = locale),
        ),
    };
    (title.to_string(), description.to_string(), body.to_string())
}

impl Widget for LearnView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (title, description, body) = study_text(self.skill, self.locale);

        let block = Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let tabs: Vec<Span> = Skill::all()
            .iter()
            .flat_map(|&skill| {
                let style = if skill == self.skill {
                    Style::default()
                        .fg(colors.accent())
                        .bg(colors.selected_bg())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.text_muted())
                };
                [
                    Span::styled(format!(" {} ", skill.symbol()), style),
                    Span::raw(" "),
                ]
            })
            .collect();
        Paragraph::new(Line::from(tabs)).render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            description,
            Style::default().fg(colors.fg()).add_modifier(Modifier::ITALIC),
        )))
        .wrap(Wrap { trim: true })
        .render(layout[1], buf);

        let lines: Vec<Line> = body
            .lines()
            .map(|line| {
                let heading = !line.is_empty() && !line.starts_with(' ') && !line.ends_with('.');
                let style = if heading {
                    Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(Span::styled(line.to_string(), style))
            })
            .collect();
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(layout[2], buf);
    }
}
