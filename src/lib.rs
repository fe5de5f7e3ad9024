pub mod app;
pub mod client;
pub mod config;
pub mod state;
pub mod types;
pub mod ui;
pub mod verdict;
