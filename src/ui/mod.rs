pub mod components;
pub mod layout;
pub mod theme;

use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;

use crate::app::{App, menu_entries};
use crate::engine::{Mode, Skill};
use crate::session::Screen;
use crate::settings::Language;
use components::drill::DrillView;
use components::learn::LearnView;
use components::menu::Menu;
use components::settings::SettingsView;
use components::stats::StatsView;
use components::summary::SummaryView;
use layout::{AppLayout, centered_rect};

pub fn skill_label(skill: Skill, locale: &str) -> String {
    let label = match skill {
        Skill::Syllogism => t!("skills.syllogism.label", locale = locale),
        Skill::Fallacy => t!("skills.fallacy.label", locale = locale),
        Skill::Deduction => t!("skills.deduction.label", locale = locale),
        Skill::Induction => t!("skills.induction.label", locale = locale),
    };
    label.to_string()
}

pub fn skill_subtitle(skill: Skill, locale: &str) -> String {
    let subtitle = match skill {
        Skill::Syllogism => t!("skills.syllogism.subtitle", locale = locale),
        Skill::Fallacy => t!("skills.fallacy.subtitle", locale = locale),
        Skill::Deduction => t!("skills.deduction.subtitle", locale = locale),
        Skill::Induction => t!("skills.induction.subtitle", locale = locale),
    };
    subtitle.to_string()
}

pub fn mode_label(mode: Mode, locale: &str) -> String {
    match mode {
        Mode::Mix => t!("menu.mix", locale = locale).to_string(),
        Mode::Single(skill) => skill_label(skill, locale),
    }
}

pub fn language_label(language: Language) -> String {
    let locale = language.as_str();
    let label = match language {
        Language::En => t!("languages.en", locale = locale),
        Language::Id => t!("languages.id", locale = locale),
    };
    label.to_string()
}

pub fn format_seconds(ms: f64) -> String {
    format!("{:.1}", ms / 1000.0)
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let locale = app.locale();

    frame.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

    let layout = AppLayout::new(area);
    let ctl = &app.controller;

    let title = match ctl.screen() {
        Screen::Menu => t!("app.name", locale = locale).to_string(),
        Screen::Drill => t!("drill.title", locale = locale, mode = mode_label(ctl.mode(), locale)).to_string(),
        Screen::Summary => t!("summary.title", locale = locale).to_string(),
        Screen::Stats => t!("stats.title", locale = locale).to_string(),
        Screen::Settings => t!("settings.title", locale = locale).to_string(),
        Screen::Learn(skill) => {
            t!("learn.title", locale = locale, skill = skill_label(skill, locale)).to_string()
        }
    };
    let header = Paragraph::new(Line::from(Span::styled(
        format!(" {title} "),
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let footer = match ctl.screen() {
        Screen::Menu => t!("menu.footer", locale = locale),
        Screen::Drill if ctl.answered() => t!("drill.footer_answered", locale = locale),
        Screen::Drill => t!("drill.footer_open", locale = locale),
        Screen::Summary => t!("summary.footer", locale = locale),
        Screen::Stats => t!("stats.footer", locale = locale),
        Screen::Settings => t!("settings.footer", locale = locale),
        Screen::Learn(_) => t!("learn.footer", locale = locale),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            footer.to_string(),
            Style::default().fg(colors.text_muted()),
        ))),
        layout.footer,
    );

    match ctl.screen() {
        Screen::Menu => {
            let menu = Menu {
                entries: menu_entries(),
                selected: app.menu_selected,
                controller: ctl,
                error: ctl.error_message(),
                theme: &app.theme,
                locale,
            };
            frame.render_widget(&menu, centered_rect(60, 90, layout.main));
        }
        Screen::Drill => {
            let view = DrillView::new(ctl, &app.theme, locale);
            frame.render_widget(view, layout.main);
        }
        Screen::Summary => {
            let view = SummaryView::new(ctl.session(), &app.theme, locale);
            frame.render_widget(view, centered_rect(50, 60, layout.main));
        }
        Screen::Stats => {
            let view = StatsView::new(ctl.stats(), &app.theme, locale);
            frame.render_widget(view, layout.main);
        }
        Screen::Settings => {
            let view = SettingsView {
                settings: ctl.settings(),
                theme_name: &app.theme.name,
                selected: app.settings_selected,
                confirm_reset: app.confirm_reset,
                reset_notice: app.reset_notice,
                theme: &app.theme,
                locale,
            };
            frame.render_widget(view, centered_rect(60, 80, layout.main));
        }
        Screen::Learn(skill) => {
            let view = LearnView::new(skill, &app.theme, locale);
            frame.render_widget(view, centered_rect(70, 90, layout.main));
        }
    }
}
