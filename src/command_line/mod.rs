#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Command-line definitions and the handlers behind each subcommand.

pub(crate) mod cli;
