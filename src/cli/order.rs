//! Deck listing command (`tarotgif order ...`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tarotgif::{CardFile, Suit};

/// Arguments for `tarotgif order`.
#[derive(Args, Debug)]
pub struct OrderArgs {
    /// Directory holding the card images.
    #[arg(short = 's', long = "source")]
    pub source: PathBuf,
    /// Emit JSON instead of a text listing.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct OrderEntry {
    position: usize,
    file: String,
    suit: Suit,
    rank: Option<u32>,
}

impl OrderEntry {
    fn new(position: usize, card: &CardFile) -> Self {
        Self {
            position,
            file: card.file_name(),
            suit: card.suit,
            rank: (!card.key().is_unordered()).then_some(card.rank),
        }
    }
}

/// Execute `tarotgif order`.
pub fn handle(args: OrderArgs) -> Result<()> {
    let cards = tarotgif::deck_order(&args.source)
        .with_context(|| format!("failed to read cards from {}", args.source.display()))?;

    let entries: Vec<OrderEntry> = cards
        .iter()
        .enumerate()
        .map(|(idx, card)| OrderEntry::new(idx + 1, card))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        let rank = entry
            .rank
            .map(|rank| format!("{rank:>3}"))
            .unwrap_or_else(|| "  -".to_string());
        println!("{:>3}. {:<9} {} {}", entry.position, entry.suit, rank, entry.file);
    }
    println!("{} cards", entries.len());
    Ok(())
}
