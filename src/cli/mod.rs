//! Command-line interface wiring for the `tarotgif` binary.
//!
//! This module owns the clap definitions and delegates execution to one
//! submodule per command.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod convert;
pub mod gif;
pub mod order;
pub mod resize;
pub mod utils;

/// Parsed CLI entrypoint for the `tarotgif` binary.
#[derive(Parser, Debug)]
#[command(
    name = "tarotgif",
    version,
    about = "Tarot deck ordering, card-spread GIFs and image prep"
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compose an animated GIF from a directory of card images.
    Gif(gif::GifArgs),
    /// Resize every image in a directory.
    Resize(resize::ResizeArgs),
    /// Convert non-JPEG images in a directory to JPEG.
    Convert(convert::ConvertArgs),
    /// Print the canonical deck order of a directory.
    Order(order::OrderArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Gif(args) => gif::handle(args),
        Command::Resize(args) => resize::handle(args),
        Command::Convert(args) => convert::handle(args),
        Command::Order(args) => order::handle(args),
    }
}
