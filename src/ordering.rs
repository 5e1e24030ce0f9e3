//! Canonical deck ordering derived from card file names.
//!
//! A directory listing comes back in whatever order the OS likes. Decks are
//! presented Major Arcana 0–21, then Wands, Cups, Swords and Pentacles 1–14,
//! so every file name is mapped to a [`SortKey`] and the listing is
//! stable-sorted on it. Names that follow none of the known conventions
//! (covers, card backs, stray files) get the [`SortKey::UNORDERED`] sentinel
//! and keep their enumeration order at the end of the deck.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Sentinel used for both halves of an unrecognised key.
pub const UNORDERED: u32 = 999;

/// Top-level card category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Major,
    Wands,
    Cups,
    Swords,
    Pentacles,
    Unknown,
}

impl Suit {
    /// Position of the suit in the canonical deck order.
    pub fn ordinal(self) -> u32 {
        match self {
            Suit::Major => 0,
            Suit::Wands => 1,
            Suit::Cups => 2,
            Suit::Swords => 3,
            Suit::Pentacles => 4,
            Suit::Unknown => UNORDERED,
        }
    }

    fn from_ordinal(ordinal: u32) -> Self {
        match ordinal {
            0 => Suit::Major,
            1 => Suit::Wands,
            2 => Suit::Cups,
            3 => Suit::Swords,
            4 => Suit::Pentacles,
            _ => Suit::Unknown,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Suit::Major => "major",
            Suit::Wands => "wands",
            Suit::Cups => "cups",
            Suit::Swords => "swords",
            Suit::Pentacles => "pentacles",
            Suit::Unknown => "unknown",
        };
        f.pad(label)
    }
}

/// Total order over card files: `(suit ordinal, rank)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SortKey {
    pub suit: u32,
    pub rank: u32,
}

impl SortKey {
    pub const UNORDERED: SortKey = SortKey {
        suit: UNORDERED,
        rank: UNORDERED,
    };

    pub fn new(suit: Suit, rank: u32) -> Self {
        Self {
            suit: suit.ordinal(),
            rank,
        }
    }

    pub fn is_unordered(&self) -> bool {
        self.suit == UNORDERED
    }
}

/// Naming conventions in priority order: suit, accepted prefixes, and the
/// character that must follow the two-digit rank (if any).
const CONVENTIONS: &[(Suit, &[&str], Option<char>)] = &[
    (Suit::Major, &["rws_tarot_"], Some('_')),
    (Suit::Wands, &["wands"], None),
    (Suit::Cups, &["cups"], None),
    (Suit::Swords, &["swords"], None),
    (Suit::Pentacles, &["pents", "pentacles"], None),
];

/// Derive the sort key for a file name (or path; only the base name is used).
///
/// This never fails: anything that matches no convention maps to
/// [`SortKey::UNORDERED`].
pub fn sort_key(name: &str) -> SortKey {
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name)
        .to_lowercase();

    for (suit, prefixes, terminator) in CONVENTIONS {
        let rank = prefixes
            .iter()
            .find_map(|prefix| two_digits_after(&base, prefix, *terminator));
        if let Some(rank) = rank {
            return SortKey::new(*suit, rank);
        }
    }
    SortKey::UNORDERED
}

/// First occurrence of `prefix` immediately followed by two ASCII digits (and
/// `terminator`, when given).
fn two_digits_after(haystack: &str, prefix: &str, terminator: Option<char>) -> Option<u32> {
    for (idx, _) in haystack.match_indices(prefix) {
        let rest = &haystack.as_bytes()[idx + prefix.len()..];
        if rest.len() < 2 || !rest[0].is_ascii_digit() || !rest[1].is_ascii_digit() {
            continue;
        }
        if let Some(term) = terminator {
            if rest.get(2).map(|b| *b as char) != Some(term) {
                continue;
            }
        }
        return Some(u32::from(rest[0] - b'0') * 10 + u32::from(rest[1] - b'0'));
    }
    None
}

/// A card image on disk together with its derived ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardFile {
    pub path: PathBuf,
    pub suit: Suit,
    pub rank: u32,
}

impl CardFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let key = sort_key(&path.to_string_lossy());
        Self {
            suit: Suit::from_ordinal(key.suit),
            rank: key.rank,
            path,
        }
    }

    pub fn key(&self) -> SortKey {
        SortKey {
            suit: self.suit.ordinal(),
            rank: self.rank,
        }
    }

    /// Base file name, lossily converted for display and matching.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Stable-sort cards into canonical deck order.
pub fn sort_cards(cards: &mut [CardFile]) {
    cards.sort_by_key(CardFile::key);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_arcana_keys_follow_the_number() {
        for n in 0..=21 {
            let name = format!("RWS_Tarot_{n:02}_Card.jpg");
            assert_eq!(sort_key(&name), SortKey::new(Suit::Major, n));
        }
        assert!(sort_key("rws_tarot_02_x.jpg") < sort_key("rws_tarot_10_x.jpg"));
    }

    #[test]
    fn major_pattern_requires_trailing_underscore() {
        assert_eq!(sort_key("rws_tarot_05.jpg"), SortKey::UNORDERED);
    }

    #[test]
    fn minor_suits_map_to_their_ordinals() {
        assert_eq!(sort_key("Wands03.jpg"), SortKey::new(Suit::Wands, 3));
        assert_eq!(sort_key("cups14.jpg"), SortKey::new(Suit::Cups, 14));
        assert_eq!(sort_key("SWORDS01.JPG"), SortKey::new(Suit::Swords, 1));
        assert_eq!(sort_key("Pents07.jpg"), SortKey::new(Suit::Pentacles, 7));
        assert_eq!(
            sort_key("pentacles11.jpg"),
            SortKey::new(Suit::Pentacles, 11)
        );
    }

    #[test]
    fn minor_suits_sort_between_major_and_sentinel() {
        let major = sort_key("rws_tarot_21_world.jpg");
        let sentinel = sort_key("cover.jpg");
        for name in ["wands01.jpg", "cups14.jpg", "swords07.jpg", "pents14.jpg"] {
            let key = sort_key(name);
            assert!(major < key, "{name} should sort after major arcana");
            assert!(key < sentinel, "{name} should sort before unordered");
        }
    }

    #[test]
    fn suit_without_number_is_unordered() {
        assert_eq!(sort_key("wands_ace.jpg"), SortKey::UNORDERED);
        assert_eq!(sort_key("cups1.jpg"), SortKey::UNORDERED);
    }

    #[test]
    fn later_occurrence_of_prefix_still_matches() {
        assert_eq!(sort_key("wands-wands09.jpg"), SortKey::new(Suit::Wands, 9));
    }

    #[test]
    fn only_base_name_is_inspected() {
        assert_eq!(
            sort_key("decks/cups02/swords05.jpg"),
            SortKey::new(Suit::Swords, 5)
        );
    }

    #[test]
    fn sort_is_stable_for_unordered_names() {
        let mut cards: Vec<CardFile> = ["zeta.jpg", "cups02.jpg", "alpha.jpg", "rws_tarot_00_fool.jpg"]
            .into_iter()
            .map(CardFile::new)
            .collect();
        sort_cards(&mut cards);
        let names: Vec<String> = cards.iter().map(CardFile::file_name).collect();
        assert_eq!(
            names,
            ["rws_tarot_00_fool.jpg", "cups02.jpg", "zeta.jpg", "alpha.jpg"]
        );
    }
}
