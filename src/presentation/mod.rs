//! Presentation layer: command line parsing and console output

pub mod cli;
pub mod ui;
