/// Presentation layer: command line parsing and terminal output
pub mod cli;
pub mod ui;
