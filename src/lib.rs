//! Adaptive logic-reasoning drills: a difficulty engine that levels each
//! skill up and down from streaks, and a timed session controller on top.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod provider;
pub mod session;
pub mod settings;
pub mod store;
pub mod ui;
