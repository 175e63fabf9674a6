//! CLI module for the mattertime command-line interface

pub mod args;
pub mod commands;
