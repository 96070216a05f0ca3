//! CLI module for the bloglist server

pub mod serve;

use clap::{Parser, Subcommand};

/// Bloglist - blog entries with user registration and token login
#[derive(Parser)]
#[command(name = "bloglist")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),
}
