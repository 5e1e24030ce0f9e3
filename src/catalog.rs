//! Card discovery: directory enumeration, name filters and aspect probing.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, TarotError};
use crate::ordering::{CardFile, Suit, sort_key};

/// Aspect ratio (width / height) assumed when no candidate can be probed.
pub const DEFAULT_ASPECT_RATIO: f64 = 0.6;

/// How many candidates the aspect probe looks at.
pub const ASPECT_SAMPLE: usize = 10;

const CARD_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// List card images (`*.jpg` / `*.jpeg`, any case) in `dir`, ordered by
/// file name.
///
/// The name ordering stands in for the OS enumeration order so that seeded
/// runs pick the same cards on every platform.
pub fn scan_cards(dir: &Path) -> Result<Vec<CardFile>> {
    if !dir.is_dir() {
        return Err(TarotError::MissingSource(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|err| TarotError::io(dir, err))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| TarotError::io(dir, err))?.path();
        if path.is_file() && has_extension(&path, CARD_EXTENSIONS) {
            paths.push(path);
        }
    }
    paths.sort();
    debug!(dir = %dir.display(), count = paths.len(), "scanned card directory");
    Ok(paths.into_iter().map(CardFile::new).collect())
}

pub(crate) fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| ext.eq_ignore_ascii_case(a)))
        .unwrap_or(false)
}

/// Cover and card-back images are named with "cover".
pub fn is_cover(card: &CardFile) -> bool {
    card.file_name().to_lowercase().contains("cover")
}

/// Drop cover/back images from a candidate list.
pub fn exclude_covers(cards: Vec<CardFile>) -> Vec<CardFile> {
    cards.into_iter().filter(|card| !is_cover(card)).collect()
}

/// Name-based restriction applied before a filtered strip is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardFilter {
    Major,
    Minor,
    Wands,
    Cups,
    Swords,
    Pentacles,
    /// Case-insensitive substring of the file name.
    Custom(String),
}

impl CardFilter {
    /// Parse a filter expression. Unknown words become [`CardFilter::Custom`].
    pub fn parse(expr: &str) -> Self {
        match expr.trim().to_lowercase().as_str() {
            "major" => CardFilter::Major,
            "minor" => CardFilter::Minor,
            "wands" => CardFilter::Wands,
            "cups" => CardFilter::Cups,
            "swords" => CardFilter::Swords,
            "pentacles" | "pents" => CardFilter::Pentacles,
            other => CardFilter::Custom(other.to_string()),
        }
    }

    pub fn matches(&self, card: &CardFile) -> bool {
        let name = card.file_name().to_lowercase();
        match self {
            CardFilter::Major => {
                name.contains("rws_tarot_") && sort_key(&name).suit == Suit::Major.ordinal()
            }
            CardFilter::Minor => ["wands", "cups", "swords", "pents", "pentacles"]
                .iter()
                .any(|suit| name.contains(suit)),
            CardFilter::Wands => name.contains("wands"),
            CardFilter::Cups => name.contains("cups"),
            CardFilter::Swords => name.contains("swords"),
            CardFilter::Pentacles => name.contains("pents") || name.contains("pentacles"),
            CardFilter::Custom(pattern) => name.contains(pattern.as_str()),
        }
    }

    pub fn apply(&self, cards: Vec<CardFile>) -> Vec<CardFile> {
        cards.into_iter().filter(|card| self.matches(card)).collect()
    }
}

impl fmt::Display for CardFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardFilter::Major => f.write_str("major"),
            CardFilter::Minor => f.write_str("minor"),
            CardFilter::Wands => f.write_str("wands"),
            CardFilter::Cups => f.write_str("cups"),
            CardFilter::Swords => f.write_str("swords"),
            CardFilter::Pentacles => f.write_str("pentacles"),
            CardFilter::Custom(pattern) => write!(f, "custom({pattern})"),
        }
    }
}

/// Mean width/height over the first [`ASPECT_SAMPLE`] readable candidates.
///
/// Only image headers are read. Falls back to [`DEFAULT_ASPECT_RATIO`].
pub fn measure_aspect_ratio(cards: &[CardFile]) -> f64 {
    let mut ratios = Vec::with_capacity(ASPECT_SAMPLE);
    for card in cards.iter().take(ASPECT_SAMPLE) {
        match image::image_dimensions(&card.path) {
            Ok((w, h)) if h > 0 => ratios.push(f64::from(w) / f64::from(h)),
            Ok(_) => {}
            Err(err) => warn!(path = %card.path.display(), %err, "cannot probe card size"),
        }
    }
    if ratios.is_empty() {
        return DEFAULT_ASPECT_RATIO;
    }
    ratios.iter().sum::<f64>() / ratios.len() as f64
}
