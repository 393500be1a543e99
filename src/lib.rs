pub mod ai;
pub mod config;
pub mod engine;
