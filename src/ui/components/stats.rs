use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::engine::scoring::{self, RECENT_WINDOW, RecentSummary};
use crate::engine::{MAX_LEVEL, Skill, StatsTable};
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;
use crate::ui::{format_seconds, skill_label};

pub struct StatsView<'a> {
    stats: &'a StatsTable,
    theme: &'a Theme,
    locale: &'a str,
}

impl<'a> StatsView<'a> {
    pub fn new(stats: &'a StatsTable, theme: &'a Theme, locale: &'a str) -> Self {
        Self {
            stats,
            theme,
            locale,
        }
    }

    fn summary_text(&self, summary: &RecentSummary) -> String {
        let locale = self.locale;
        if summary.attempts == 0 {
            return t!("stats.no_attempts", locale = locale).to_string();
        }
        format!(
            "{} {}  |  {} {}%  |  {} {}s",
            t!("stats.attempts", locale = locale),
            summary.attempts,
            t!("stats.accuracy", locale = locale),
            summary.accuracy,
            t!("stats.avg_time", locale = locale),
            format_seconds(summary.average_ms),
        )
    }
}

impl Widget for StatsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let locale = self.locale;

        let block = Block::bordered()
            .title(format!(" {} ", t!("stats.title", locale = locale)))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut constraints = vec![Constraint::Length(2)];
        constraints.extend(Skill::all().iter().map(|_| Constraint::Length(4)));
        constraints.push(Constraint::Length(3));
        constraints.push(Constraint::Min(0));
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            t!("stats.intro", locale = locale, window = RECENT_WINDOW).to_string(),
            Style::default().fg(colors.text_muted()),
        )))
        .wrap(Wrap { trim: true })
        .render(layout[0], buf);

        for (i, &skill) in Skill::all().iter().enumerate() {
            let row = layout[i + 1];
            let summary = scoring::recent_summary(self.stats, skill, RECENT_WINDOW);
            let level = self.stats.get(skill).map(|s| s.level).unwrap_or_default();

            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(3)])
                .split(row);

            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!(" {} {} ", skill.symbol(), skill_label(skill, locale)),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        " {} {level}/{MAX_LEVEL}  |  {}",
                        t!("stats.level", locale = locale),
                        self.summary_text(&summary)
                    ),
                    Style::default().fg(colors.text_muted()),
                ),
            ]))
            .render(parts[0], buf);

            let caption = if summary.attempts == 0 {
                String::new()
            } else {
                format!("{}%", summary.accuracy)
            };
            let fill = if summary.accuracy >= 70 {
                colors.success()
            } else if summary.accuracy >= 40 {
                colors.warning()
            } else {
                colors.error()
            };
            ProgressBar::new(
                &t!("stats.accuracy", locale = locale),
                caption,
                summary.accuracy as f64 / 100.0,
                self.theme,
            )
            .fill(fill)
            .render(parts[1], buf);
        }

        let overall = scoring::overall_recent_summary(self.stats, RECENT_WINDOW);
        let overall_block = Block::bordered()
            .title(format!(" {} ", t!("stats.overall", locale = locale)))
            .border_style(Style::default().fg(colors.border()));
        let overall_area = layout[Skill::all().len() + 1];
        let overall_inner = overall_block.inner(overall_area);
        overall_block.render(overall_area, buf);
        Paragraph::new(Line::from(Span::styled(
            self.summary_text(&overall),
            Style::default().fg(colors.accent()),
        )))
        .render(overall_inner, buf);
    }
}
