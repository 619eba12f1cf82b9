pub mod app;
pub mod chat;
pub mod chat_view;
pub mod config;
pub mod constants;
pub mod endpoints;
pub mod errors;
pub mod evidence_view;
pub mod jury_view;
pub mod log_view;
pub mod logging;
pub mod models;
pub mod service_view;
pub mod splash_screen;
pub mod status_indicator;
pub mod ui;

pub use app::{App, AppScreen};
