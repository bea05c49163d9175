use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::session::SessionController;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;
use crate::ui::{format_seconds, skill_label};

pub struct DrillView<'a> {
    controller: &'a SessionController,
    theme: &'a Theme,
    locale: &'a str,
}

impl<'a> DrillView<'a> {
    pub fn new(controller: &'a SessionController, theme: &'a Theme, locale: &'a str) -> Self {
        Self {
            controller,
            theme,
            locale,
        }
    }

    fn feedback_line(&self) -> Option<Line<'static>> {
        let colors = &self.theme.colors;
        let locale = self.locale;

        if let Some(error) = self.controller.error_message() {
            return Some(Line::from(Span::styled(
                error,
                Style::default().fg(colors.warning()),
            )));
        }

        let feedback = self.controller.feedback()?;
        let (text, color) = if feedback.correct {
            (
                t!("feedback.correct", locale = locale, seconds = format_seconds(feedback.ms as f64)),
                colors.success(),
            )
        } else if feedback.timed_out {
            (
                t!("feedback.timeout", locale = locale, answer = feedback.expected.as_str()),
                colors.error(),
            )
        } else {
            (
                t!("feedback.wrong", locale = locale, answer = feedback.expected.as_str()),
                colors.error(),
            )
        };
        Some(Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
    }
}

impl Widget for DrillView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let locale = self.locale;
        let ctl = self.controller;

        let Some(question) = ctl.question() else {
            return;
        };
        let settings = ctl.settings();
        let session = ctl.session();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Length(2),
            ])
            .split(area);

        let status = [
            t!(
                "drill.question",
                locale = locale,
                index = ctl.question_index(),
                total = settings.question_count
            ),
            t!("drill.level", locale = locale, level = question.level),
            t!(
                "drill.target",
                locale = locale,
                seconds = format_seconds(ctl.target_ms().unwrap_or_default())
            ),
            t!(
                "drill.score",
                locale = locale,
                correct = session.correct,
                total = session.total()
            ),
        ]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("  |  ");
        Paragraph::new(Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(colors.text_muted()),
        )))
        .render(layout[0], buf);

        let limit = settings.time_limit_seconds.max(1);
        let time_ratio = ctl.time_left() as f64 / limit as f64;
        let time_label = t!("drill.time", locale = locale, seconds = ctl.time_left()).to_string();
        let mut bar = ProgressBar::new(&time_label, String::new(), time_ratio, self.theme);
        if ctl.time_left() <= 5 {
            bar = bar.fill(colors.warning());
        }
        bar.render(layout[1], buf);

        let block = Block::bordered()
            .title(format!(" {} ", skill_label(question.skill, locale)))
            .border_style(Style::default().fg(colors.border_focused()));
        let inner = block.inner(layout[2]);
        block.render(layout[2], buf);

        let feedback = ctl.feedback();
        let mut lines = vec![
            Line::from(Span::styled(
                question.text.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (i, option) in question.options.iter().enumerate() {
            let is_expected = option.eq_ignore_ascii_case(&question.answer);
            let is_chosen = ctl.answered() && option.eq_ignore_ascii_case(ctl.answer().trim());
            let style = match feedback {
                Some(_) if is_expected => Style::default().fg(colors.success()),
                Some(_) if is_chosen => Style::default().fg(colors.error()),
                Some(_) => Style::default().fg(colors.text_muted()),
                None => Style::default().fg(colors.fg()),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {}. ", i + 1), Style::default().fg(colors.accent())),
                Span::styled(option.clone(), style),
            ]));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);

        let input_block = Block::bordered()
            .title(format!(" {} ", t!("drill.answer", locale = locale)))
            .border_style(Style::default().fg(if ctl.answered() {
                colors.border()
            } else {
                colors.accent()
            }));
        let input_inner = input_block.inner(layout[3]);
        input_block.render(layout[3], buf);
        let input_line = if ctl.answer().is_empty() && !ctl.answered() {
            Line::from(Span::styled(
                t!("drill.placeholder", locale = locale).to_string(),
                Style::default().fg(colors.text_muted()),
            ))
        } else {
            let cursor = if ctl.answered() { "" } else { "_" };
            Line::from(vec![
                Span::styled(ctl.answer().to_string(), Style::default().fg(colors.fg())),
                Span::styled(cursor, Style::default().fg(colors.accent())),
            ])
        };
        Paragraph::new(input_line).render(input_inner, buf);

        if let Some(line) = self.feedback_line() {
            Paragraph::new(line)
                .wrap(Wrap { trim: true })
                .render(layout[4], buf);
        }
    }
}
