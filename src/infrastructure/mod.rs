pub mod config;
pub mod pdf;
pub mod persistence;
pub mod templates;
