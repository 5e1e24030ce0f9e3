//! Shared clap helper types for CLI commands.

use clap::ValueEnum;
use tarotgif::{CardFilter, LayoutKind};

/// Layout selector accepted by `tarotgif gif --type`.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LayoutArg {
    /// Whole deck, one card per frame.
    All,
    /// A name-filtered subset, one card per frame.
    Filtered,
    /// One randomly drawn card per frame.
    Single,
    /// Three-card row per frame.
    Three,
    /// Ten-card Celtic cross per frame.
    Celtic,
    /// Small three-card row for chat stickers.
    #[value(alias = "telegram")]
    Compact,
    /// Shuffled subset, one card per frame.
    Random,
}

impl From<LayoutArg> for LayoutKind {
    fn from(value: LayoutArg) -> LayoutKind {
        match value {
            LayoutArg::All => LayoutKind::All,
            LayoutArg::Filtered => LayoutKind::Filtered,
            LayoutArg::Single => LayoutKind::Single,
            LayoutArg::Three => LayoutKind::Three,
            LayoutArg::Celtic => LayoutKind::Celtic,
            LayoutArg::Compact => LayoutKind::Compact,
            LayoutArg::Random => LayoutKind::Random,
        }
    }
}

/// Clap-friendly filter parser: `major|minor|<suit>|<substring>`.
pub fn parse_filter(input: &str) -> Result<CardFilter, String> {
    if input.trim().is_empty() {
        return Err("filter cannot be empty".to_string());
    }
    Ok(CardFilter::parse(input))
}

/// JPEG quality must stay within 1..=100.
pub fn parse_quality(input: &str) -> Result<u8, String> {
    let value: u8 = input
        .parse()
        .map_err(|_| "quality must be a number".to_string())?;
    if !(1..=100).contains(&value) {
        return Err("quality must be between 1 and 100".to_string());
    }
    Ok(value)
}
