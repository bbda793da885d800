mod app;
mod effects;
mod history;
mod logging;
mod ui;

pub use app::run_app;
