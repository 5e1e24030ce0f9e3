//! Layout descriptions: canvas geometry, slot tables and selection strategy.
//!
//! A [`LayoutSpec`] is plain data. Every layout variant is the same
//! compositing loop driven by a different spec, so adding a variant means
//! adding a preset in [`presets`], not a new code path in the compositor.

mod presets;

use std::fmt;

use serde::Serialize;

use crate::error::{Result, TarotError};

/// Largest frame or card side a GIF logical screen can describe.
pub const MAX_SIDE: u32 = u16::MAX as u32;

/// Canvas fill used by every layout.
pub const BACKGROUND: [u8; 4] = [20, 20, 20, 255];

/// The supported animation layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// Whole deck in canonical order, one card per frame.
    All,
    /// Like [`LayoutKind::All`] over a name-filtered subset.
    Filtered,
    /// One card per frame drawn from a sampled pool.
    Single,
    /// Three cards in a row per frame drawn from a sampled pool.
    Three,
    /// Ten-card Celtic cross spread per frame.
    Celtic,
    /// Three-card row on a small canvas sized in multiples of 16.
    Compact,
    /// Random permutation of a sampled subset, one card per frame.
    Random,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 7] = [
        LayoutKind::All,
        LayoutKind::Filtered,
        LayoutKind::Single,
        LayoutKind::Three,
        LayoutKind::Celtic,
        LayoutKind::Compact,
        LayoutKind::Random,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::All => "all",
            LayoutKind::Filtered => "filtered",
            LayoutKind::Single => "single",
            LayoutKind::Three => "three",
            LayoutKind::Celtic => "celtic",
            LayoutKind::Compact => "compact",
            LayoutKind::Random => "random",
        }
    }

    /// Whether a frame holds exactly one card that fills the canvas.
    pub fn is_strip(self) -> bool {
        matches!(
            self,
            LayoutKind::All | LayoutKind::Filtered | LayoutKind::Random
        )
    }

    /// Cover/back images are dropped from the candidates of composed layouts.
    pub fn excludes_covers(self) -> bool {
        !self.is_strip()
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Caller overrides; anything left `None` takes the layout default.
#[derive(Debug, Clone, Default)]
pub struct LayoutParams {
    pub frames: Option<usize>,
    pub duration_ms: Option<u32>,
    pub pool: Option<usize>,
    pub cards: Option<usize>,
    pub card_width: Option<u32>,
    pub card_height: Option<u32>,
    pub loop_count: u16,
}

/// One card position on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub id: &'static str,
    pub x: i64,
    pub y: i64,
    /// Rotated a quarter turn and painted over a drop shadow.
    pub rotated: bool,
    /// Paint order; lower first, ties keep table order.
    pub z: i32,
}

impl Slot {
    pub fn at(id: &'static str, x: i64, y: i64) -> Self {
        Self {
            id,
            x,
            y,
            rotated: false,
            z: 0,
        }
    }

    pub fn rotated(mut self) -> Self {
        self.rotated = true;
        self
    }

    pub fn z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }
}

/// How cards are chosen for each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Selection {
    /// Every candidate in canonical deck order, one per frame.
    DeckOrder,
    /// `count` distinct candidates in random order, one per frame.
    Shuffled { count: usize },
    /// A pool is sampled once (`None` takes every candidate); each frame
    /// then draws distinct cards from it for its slots.
    PerFrame { pool: Option<usize> },
}

/// Immutable description of one animation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSpec {
    pub kind: LayoutKind,
    pub frame_width: u32,
    pub frame_height: u32,
    pub card_width: u32,
    pub card_height: u32,
    pub slots: Vec<Slot>,
    pub selection: Selection,
    /// Frame count for [`Selection::PerFrame`]; the other strategies emit
    /// one frame per selected card.
    pub frames: Option<usize>,
    pub frame_duration_ms: u32,
    /// 0 loops forever.
    pub loop_count: u16,
    /// Palette size each frame is reduced to.
    pub colors: u16,
    pub background: [u8; 4],
}

impl LayoutSpec {
    /// Build the spec for `kind`, applying `params` over the layout defaults.
    ///
    /// `aspect_ratio` (card width / height) sizes cards on composed layouts;
    /// strip layouts use fixed card dimensions.
    pub fn build(kind: LayoutKind, params: &LayoutParams, aspect_ratio: f64) -> Result<Self> {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(TarotError::InvalidLayout(format!(
                "aspect ratio must be positive, got {aspect_ratio}"
            )));
        }
        let spec = match kind {
            LayoutKind::All | LayoutKind::Filtered => presets::deck_strip(kind, params),
            LayoutKind::Random => presets::random_strip(params),
            LayoutKind::Single => presets::single(params, aspect_ratio),
            LayoutKind::Three => presets::three_row(params, aspect_ratio),
            LayoutKind::Compact => presets::compact_row(params, aspect_ratio),
            LayoutKind::Celtic => presets::celtic_cross(params, aspect_ratio),
        };
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(TarotError::InvalidLayout(msg)) };
        if self.frame_width == 0 || self.frame_height == 0 {
            return invalid(format!(
                "frame size {}x{} is empty",
                self.frame_width, self.frame_height
            ));
        }
        if self.card_width == 0 || self.card_height == 0 {
            return invalid(format!(
                "card size {}x{} is empty",
                self.card_width, self.card_height
            ));
        }
        let longest = [
            self.frame_width,
            self.frame_height,
            self.card_width,
            self.card_height,
        ]
        .into_iter()
        .max()
        .unwrap_or(0);
        if longest > MAX_SIDE {
            return invalid(format!(
                "frame {}x{} with card {}x{} exceeds the {MAX_SIDE} px limit",
                self.frame_width, self.frame_height, self.card_width, self.card_height
            ));
        }
        if self.frame_duration_ms == 0 {
            return invalid("frame duration must be at least 1 ms".to_string());
        }
        if self.frames == Some(0) {
            return invalid("frame count must be at least 1".to_string());
        }
        match self.selection {
            Selection::Shuffled { count: 0 } => invalid("card count must be at least 1".into()),
            Selection::PerFrame { pool: Some(pool) } if pool < self.slots.len() => invalid(format!(
                "pool of {pool} cannot fill {} slots per frame",
                self.slots.len()
            )),
            _ => Ok(()),
        }
    }

    /// Minimum number of candidates the layout needs before any frame is built.
    pub fn required_cards(&self) -> usize {
        match self.selection {
            Selection::DeckOrder => 1,
            Selection::Shuffled { count } => count,
            Selection::PerFrame { pool } => pool.unwrap_or(0).max(self.slots.len()),
        }
    }

    /// Slot indices in paint order (ascending z, stable).
    pub fn paint_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.slots.len()).collect();
        order.sort_by_key(|&idx| self.slots[idx].z);
        order
    }
}
