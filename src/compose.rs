//! Frame composition: picks cards for every frame and paints them onto a
//! canvas according to a [`LayoutSpec`].

use std::path::PathBuf;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{Blend, draw_filled_rect_mut};
use imageproc::rect::Rect;
use tracing::{debug, info, warn};

use crate::error::{Result, TarotError};
use crate::layout::{LayoutSpec, Selection, Slot};
use crate::ordering::{CardFile, sort_cards};
use crate::palette::reduce_palette;
use crate::sampling::DeckRng;

/// Semi-transparent fill painted under rotated cards.
const SHADOW: Rgba<u8> = Rgba([0, 0, 0, 100]);
/// Shadow displacement relative to the card, in pixels.
const SHADOW_OFFSET: (i64, i64) = (-2, 2);

/// Decodes card images. The filesystem implementation is [`FsImageSource`];
/// tests substitute in-memory sources.
pub trait CardImageSource {
    fn load(&mut self, card: &CardFile) -> Result<DynamicImage>;
}

/// Reads card images from disk with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageSource;

impl CardImageSource for FsImageSource {
    fn load(&mut self, card: &CardFile) -> Result<DynamicImage> {
        image::open(&card.path).map_err(|err| TarotError::image(&card.path, err))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintKind {
    Shadow,
    Card,
}

/// One paint operation applied to a frame, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintOp {
    pub slot: &'static str,
    pub card: PathBuf,
    pub kind: PaintKind,
}

/// A finished, palette-reduced frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: RgbaImage,
    pub paints: Vec<PaintOp>,
}

impl Frame {
    /// Number of cards actually pasted (shadows excluded).
    pub fn cards_painted(&self) -> usize {
        self.paints
            .iter()
            .filter(|op| op.kind == PaintKind::Card)
            .count()
    }

    /// Source files of the pasted cards, in paint order.
    pub fn cards(&self) -> Vec<&PathBuf> {
        self.paints
            .iter()
            .filter(|op| op.kind == PaintKind::Card)
            .map(|op| &op.card)
            .collect()
    }
}

/// Render every frame of `spec` from `candidates`.
///
/// Fails before painting anything when the candidates cannot satisfy the
/// layout. Individual unreadable cards are logged and skipped: a composed
/// frame keeps the slot empty, a strip frame (the card is the frame) is
/// dropped. Fails with [`TarotError::NoFrames`] if nothing survives.
pub fn compose<S: CardImageSource>(
    spec: &LayoutSpec,
    candidates: &[CardFile],
    rng: &mut DeckRng,
    source: &mut S,
) -> Result<Vec<Frame>> {
    let required = spec.required_cards();
    if candidates.len() < required {
        return Err(TarotError::InsufficientCards {
            found: candidates.len(),
            required,
        });
    }

    let mut frames = Vec::new();
    match spec.selection {
        Selection::DeckOrder => {
            let mut deck = candidates.to_vec();
            sort_cards(&mut deck);
            render_sequence(spec, &deck, source, &mut frames);
        }
        Selection::Shuffled { count } => {
            let picked = rng.sample(candidates, count).ok_or(TarotError::InsufficientCards {
                found: candidates.len(),
                required: count,
            })?;
            render_sequence(spec, &picked, source, &mut frames);
        }
        Selection::PerFrame { pool } => {
            let pool = match pool {
                Some(size) => rng.sample(candidates, size).ok_or(TarotError::InsufficientCards {
                    found: candidates.len(),
                    required: size,
                })?,
                None => candidates.to_vec(),
            };
            let per_frame = spec.slots.len();
            let frame_count = spec.frames.unwrap_or(1);
            for frame_idx in 0..frame_count {
                let picks = rng
                    .sample(&pool, per_frame)
                    .ok_or(TarotError::InsufficientCards {
                        found: pool.len(),
                        required: per_frame,
                    })?;
                let frame = render_frame(spec, &picks, source);
                debug!(
                    frame = frame_idx + 1,
                    total = frame_count,
                    painted = frame.cards_painted(),
                    "composed frame"
                );
                frames.push(frame);
            }
        }
    }

    if frames.is_empty() {
        return Err(TarotError::NoFrames);
    }
    info!(layout = %spec.kind, frames = frames.len(), "composition finished");
    Ok(frames)
}

/// One card per frame, in the given order; frames whose card fails are dropped.
fn render_sequence<S: CardImageSource>(
    spec: &LayoutSpec,
    cards: &[CardFile],
    source: &mut S,
    frames: &mut Vec<Frame>,
) {
    for card in cards {
        let frame = render_frame(spec, std::slice::from_ref(card), source);
        if frame.cards_painted() == 0 {
            warn!(card = %card.path.display(), "dropping frame for unreadable card");
            continue;
        }
        debug!(card = %card.file_name(), "composed frame");
        frames.push(frame);
    }
}

/// Paint `cards[i]` into `spec.slots[i]` in z-order and reduce the palette.
fn render_frame<S: CardImageSource>(spec: &LayoutSpec, cards: &[CardFile], source: &mut S) -> Frame {
    let mut canvas =
        RgbaImage::from_pixel(spec.frame_width, spec.frame_height, Rgba(spec.background));
    let mut paints = Vec::with_capacity(cards.len() + 1);

    for idx in spec.paint_order() {
        let (Some(slot), Some(card)) = (spec.slots.get(idx), cards.get(idx)) else {
            continue;
        };
        let image = match prepare_card(spec, slot, card, source) {
            Ok(image) => image,
            Err(err) => {
                warn!(slot = slot.id, %err, "skipping card");
                continue;
            }
        };
        if slot.rotated {
            canvas = paint_shadow(canvas, slot, &image);
            paints.push(PaintOp {
                slot: slot.id,
                card: card.path.clone(),
                kind: PaintKind::Shadow,
            });
        }
        imageops::overlay(&mut canvas, &image, slot.x, slot.y);
        paints.push(PaintOp {
            slot: slot.id,
            card: card.path.clone(),
            kind: PaintKind::Card,
        });
    }

    Frame {
        image: reduce_palette(&canvas, spec.colors),
        paints,
    }
}

/// Decode, resize and (for rotated slots) turn a card. The decoded source
/// is dropped before returning.
fn prepare_card<S: CardImageSource>(
    spec: &LayoutSpec,
    slot: &Slot,
    card: &CardFile,
    source: &mut S,
) -> Result<RgbaImage> {
    let decoded = source.load(card)?;
    let resized = imageops::resize(
        &decoded.to_rgba8(),
        spec.card_width,
        spec.card_height,
        FilterType::Lanczos3,
    );
    if slot.rotated {
        // Quarter turn counter-clockwise; the buffer swaps width and height.
        Ok(imageops::rotate270(&resized))
    } else {
        Ok(resized)
    }
}

fn paint_shadow(canvas: RgbaImage, slot: &Slot, card: &RgbaImage) -> RgbaImage {
    let rect = Rect::at(
        (slot.x + SHADOW_OFFSET.0) as i32,
        (slot.y + SHADOW_OFFSET.1) as i32,
    )
    .of_size(card.width(), card.height());
    let mut blended = Blend(canvas);
    draw_filled_rect_mut(&mut blended, rect, SHADOW);
    blended.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutKind, LayoutParams};

    /// Solid-colour cards; any path containing "broken" fails to decode.
    struct SolidSource {
        loads: usize,
    }

    impl CardImageSource for SolidSource {
        fn load(&mut self, card: &CardFile) -> Result<DynamicImage> {
            self.loads += 1;
            if card.file_name().contains("broken") {
                return Err(TarotError::image(
                    &card.path,
                    image::ImageError::IoError(std::io::Error::other("corrupt")),
                ));
            }
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                30,
                50,
                Rgba([250, 250, 250, 255]),
            )))
        }
    }

    fn cards(names: &[&str]) -> Vec<CardFile> {
        names.iter().map(|n| CardFile::new(*n)).collect()
    }

    fn small(kind: LayoutKind, frames: usize) -> LayoutSpec {
        let params = LayoutParams {
            frames: Some(frames),
            card_width: Some(12),
            card_height: Some(20),
            pool: Some(4),
            ..LayoutParams::default()
        };
        LayoutSpec::build(kind, &params, 0.6).unwrap()
    }

    #[test]
    fn rotated_card_is_painted_last_over_its_shadow() {
        let spec = small(LayoutKind::Celtic, 3);
        let names: Vec<String> = (0..12).map(|i| format!("card{i:02}.jpg")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut source = SolidSource { loads: 0 };
        let frames = compose(&spec, &cards(&refs), &mut DeckRng::new(5), &mut source).unwrap();

        assert_eq!(frames.len(), 3);
        for frame in &frames {
            assert_eq!(frame.cards_painted(), 10);
            let n = frame.paints.len();
            assert_eq!(frame.paints[n - 1].slot, "challenge");
            assert_eq!(frame.paints[n - 1].kind, PaintKind::Card);
            assert_eq!(frame.paints[n - 2].slot, "challenge");
            assert_eq!(frame.paints[n - 2].kind, PaintKind::Shadow);
            assert_eq!(frame.paints[n - 3].slot, "present");

            let mut distinct = frame.cards();
            distinct.sort();
            distinct.dedup();
            assert_eq!(distinct.len(), 10);
        }
        assert_eq!(source.loads, 30);
    }

    #[test]
    fn single_and_compact_fill_every_frame() {
        let deck = cards(&["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg", "f.jpg"]);
        for (kind, frame_count, per_frame) in
            [(LayoutKind::Single, 5, 1), (LayoutKind::Compact, 4, 3)]
        {
            let spec = small(kind, frame_count);
            let mut source = SolidSource { loads: 0 };
            let frames = compose(&spec, &deck, &mut DeckRng::new(8), &mut source).unwrap();

            assert_eq!(frames.len(), frame_count, "{kind}");
            for frame in &frames {
                assert_eq!(frame.cards_painted(), per_frame, "{kind}");
                assert_eq!(
                    frame.image.dimensions(),
                    (spec.frame_width, spec.frame_height)
                );
                let mut distinct = frame.cards();
                distinct.sort();
                distinct.dedup();
                assert_eq!(distinct.len(), per_frame);
            }
            // Every pick comes from the sampled pool of four.
            let pool: std::collections::HashSet<&PathBuf> =
                frames.iter().flat_map(|f| f.cards()).collect();
            assert!(pool.len() <= 4, "{kind}: {} distinct cards", pool.len());
            assert_eq!(source.loads, frame_count * per_frame);
        }
    }

    #[test]
    fn broken_card_leaves_its_slot_empty() {
        let params = LayoutParams {
            frames: Some(2),
            pool: Some(3),
            card_width: Some(12),
            card_height: Some(20),
            ..LayoutParams::default()
        };
        let spec = LayoutSpec::build(LayoutKind::Three, &params, 0.6).unwrap();
        let deck = cards(&["a.jpg", "b.jpg", "broken.jpg"]);
        let mut source = SolidSource { loads: 0 };
        let frames = compose(&spec, &deck, &mut DeckRng::new(1), &mut source).unwrap();
        assert_eq!(frames.len(), 2);
        for frame in &frames {
            assert_eq!(frame.cards_painted(), 2);
            assert_eq!(frame.image.dimensions(), (720, 360));
        }
    }

    #[test]
    fn broken_strip_card_drops_its_frame() {
        let spec = small(LayoutKind::All, 1);
        let deck = cards(&["cups02.jpg", "broken.jpg", "cups01.jpg"]);
        let frames = compose(&spec, &deck, &mut DeckRng::new(1), &mut SolidSource { loads: 0 }).unwrap();
        let order: Vec<String> = frames
            .iter()
            .map(|f| f.cards()[0].display().to_string())
            .collect();
        assert_eq!(order, vec!["cups01.jpg", "cups02.jpg"]);
    }

    #[test]
    fn all_broken_is_an_error() {
        let spec = small(LayoutKind::All, 1);
        let deck = cards(&["broken1.jpg", "broken2.jpg"]);
        let err = compose(&spec, &deck, &mut DeckRng::new(1), &mut SolidSource { loads: 0 }).unwrap_err();
        assert!(matches!(err, TarotError::NoFrames));
    }

    #[test]
    fn pool_shortfall_fails_before_loading() {
        let params = LayoutParams::default();
        let spec = LayoutSpec::build(LayoutKind::Three, &params, 0.6).unwrap();
        let names: Vec<String> = (0..10).map(|i| format!("c{i}.jpg")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut source = SolidSource { loads: 0 };
        let err = compose(&spec, &cards(&refs), &mut DeckRng::new(1), &mut source).unwrap_err();
        match err {
            TarotError::InsufficientCards { found, required } => {
                assert_eq!((found, required), (10, 36));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(source.loads, 0);
    }

    #[test]
    fn shadow_darkens_the_canvas() {
        let canvas = RgbaImage::from_pixel(10, 10, Rgba([200, 200, 200, 255]));
        let slot = Slot::at("x", 4, 2).rotated();
        let card = RgbaImage::new(3, 3);
        let shaded = paint_shadow(canvas, &slot, &card);
        assert!(shaded.get_pixel(2, 4).0[0] < 200);
        assert_eq!(shaded.get_pixel(9, 9).0[0], 200);
    }
}
