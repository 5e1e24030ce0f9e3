//! Core library for tarot deck ordering and card-spread GIF composition.

mod catalog;
mod compose;
mod encode;
mod error;
mod layout;
mod ordering;
mod palette;
mod pipeline;
mod prep;
mod sampling;

pub use catalog::{
    CardFilter, DEFAULT_ASPECT_RATIO, exclude_covers, is_cover, measure_aspect_ratio, scan_cards,
};
pub use compose::{CardImageSource, Frame, FsImageSource, PaintKind, PaintOp, compose};
pub use encode::{Animation, GifSummary, write_gif};
pub use error::{Result, TarotError};
pub use layout::{LayoutKind, LayoutParams, LayoutSpec, Selection, Slot};
pub use ordering::{CardFile, SortKey, Suit, UNORDERED, sort_cards, sort_key};
pub use palette::reduce_palette;
pub use pipeline::{GifPlan, GifRequest, create_gif, plan, render};
pub use prep::{
    DEFAULT_JPEG_QUALITY, PrepReport, convert_directory, fit_dimensions, flatten_on_white,
    resize_directory,
};
pub use sampling::DeckRng;

/// Scan `dir` and return its cards in canonical deck order.
pub fn deck_order(dir: &std::path::Path) -> Result<Vec<CardFile>> {
    let mut cards = scan_cards(dir)?;
    sort_cards(&mut cards);
    Ok(cards)
}
