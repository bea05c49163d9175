use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::session::SessionCounts;
use crate::ui::theme::Theme;

pub struct SummaryView<'a> {
    counts: SessionCounts,
    theme: &'a Theme,
    locale: &'a str,
}

impl<'a> SummaryView<'a> {
    pub fn new(counts: SessionCounts, theme: &'a Theme, locale: &'a str) -> Self {
        Self {
            counts,
            theme,
            locale,
        }
    }
}

impl Widget for SummaryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let locale = self.locale;

        let block = Block::bordered()
            .title(format!(" {} ", t!("summary.title", locale = locale)))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let row = |label: String, value: String, color: Color| {
            Line::from(vec![
                Span::styled(format!("{label}: "), Style::default().fg(colors.fg())),
                Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            ])
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{}%", self.counts.accuracy()),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("summary.accuracy", locale = locale).to_string(),
                Style::default().fg(colors.text_muted()),
            )),
            Line::from(""),
            row(
                t!("summary.correct", locale = locale).to_string(),
                self.counts.correct.to_string(),
                colors.success(),
            ),
            row(
                t!("summary.wrong", locale = locale).to_string(),
                self.counts.wrong.to_string(),
                colors.error(),
            ),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
