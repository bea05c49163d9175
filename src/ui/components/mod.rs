pub mod drill;
pub mod learn;
pub mod menu;
pub mod progress_bar;
pub mod settings;
pub mod stats;
pub mod summary;
