pub mod config;
pub mod event;
pub mod format;
pub mod metrics;
pub mod scheduler;
pub mod ui;
