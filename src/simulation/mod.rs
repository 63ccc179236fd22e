pub mod config;
pub mod consumption;
pub mod engine;
pub mod history;
