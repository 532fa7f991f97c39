pub mod checks;
pub mod cli;
pub mod command;
pub mod config;
pub mod detect;
pub mod error;
pub mod output;
pub mod platform;
pub mod report;
pub mod runner;
pub mod suite;
