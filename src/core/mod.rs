pub mod config;
pub mod geo;
