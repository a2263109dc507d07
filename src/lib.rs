pub mod cli;
pub mod command_utils;
pub mod config;
pub mod error;
pub mod generate;
pub mod repository;
pub mod schedule;
pub mod synth;
pub mod system_config;
