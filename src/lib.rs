pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod filter;
pub mod indicator;
pub mod input;
pub mod model;
pub mod summary;
pub mod ui;

#[cfg(feature = "png")]
pub mod chart_png;
