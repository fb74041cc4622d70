//! Terminal front-end over the dashboard engine.

pub mod entry;
pub mod history;
pub mod setup;
pub mod show;
pub mod ui;
