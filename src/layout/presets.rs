use super::{BACKGROUND, LayoutKind, LayoutParams, LayoutSpec, Selection, Slot};

const STRIP_CARD: (u32, u32) = (400, 600);
const RANDOM_CARD: (u32, u32) = (200, 300);
const RANDOM_CARDS: usize = 24;
const RANDOM_DURATION_MS: u32 = 83;
const DEFAULT_DURATION_MS: u32 = 500;

const SINGLE_CARD_HEIGHT: u32 = 320;
const SINGLE_PADDING: u32 = 20;
const SINGLE_POOL: usize = 12;
const SINGLE_FRAMES: usize = 12;

const THREE_FRAME: (u32, u32) = (720, 360);
const THREE_CARD_HEIGHT: u32 = 320;
const THREE_SIDE_PADDING: u32 = 20;
const THREE_GAP: u32 = 15;
const THREE_POOL: usize = 36;
const THREE_FRAMES: usize = 30;

const COMPACT_FRAME: (u32, u32) = (256, 144);
const COMPACT_CARD_HEIGHT: u32 = 128;
const COMPACT_POOL: usize = 12;
const COMPACT_FRAMES: usize = 10;
const COMPACT_DURATION_MS: u32 = 100;

const CELTIC_FRAME: (u32, u32) = (500, 600);
const CELTIC_CARD_HEIGHT: u32 = 120;
const CELTIC_CENTER_X: i64 = 180;
const CELTIC_GAP: i64 = 15;
const CELTIC_MARGIN: i64 = 30;
const CELTIC_FRAMES: usize = 12;

fn base(kind: LayoutKind, params: &LayoutParams, default_duration: u32, colors: u16) -> LayoutSpec {
    LayoutSpec {
        kind,
        frame_width: 0,
        frame_height: 0,
        card_width: 0,
        card_height: 0,
        slots: Vec::new(),
        selection: Selection::DeckOrder,
        frames: None,
        frame_duration_ms: params.duration_ms.unwrap_or(default_duration),
        loop_count: params.loop_count,
        colors,
        background: BACKGROUND,
    }
}

/// Card size from explicit overrides, else `base_height` and the measured ratio.
fn card_size(params: &LayoutParams, base_height: u32, aspect_ratio: f64) -> (u32, u32) {
    let height = params.card_height.unwrap_or(base_height);
    let width = params
        .card_width
        .unwrap_or_else(|| (f64::from(height) * aspect_ratio) as u32);
    (width, height)
}

fn strip(kind: LayoutKind, params: &LayoutParams, default_card: (u32, u32)) -> LayoutSpec {
    let width = params.card_width.unwrap_or(default_card.0);
    let height = params.card_height.unwrap_or(default_card.1);
    LayoutSpec {
        frame_width: width,
        frame_height: height,
        card_width: width,
        card_height: height,
        slots: vec![Slot::at("card", 0, 0)],
        ..base(kind, params, DEFAULT_DURATION_MS, 32)
    }
}

pub(super) fn deck_strip(kind: LayoutKind, params: &LayoutParams) -> LayoutSpec {
    strip(kind, params, STRIP_CARD)
}

pub(super) fn random_strip(params: &LayoutParams) -> LayoutSpec {
    let count = params.cards.unwrap_or(RANDOM_CARDS);
    let mut spec = strip(LayoutKind::Random, params, RANDOM_CARD);
    spec.selection = Selection::Shuffled { count };
    spec.frame_duration_ms = params.duration_ms.unwrap_or(RANDOM_DURATION_MS);
    spec
}

pub(super) fn single(params: &LayoutParams, aspect_ratio: f64) -> LayoutSpec {
    let (card_width, card_height) = card_size(params, SINGLE_CARD_HEIGHT, aspect_ratio);
    let frame_width = card_width.saturating_add(SINGLE_PADDING * 2);
    let frame_height = card_height.saturating_add(SINGLE_PADDING * 2);
    let x = i64::from((frame_width - card_width) / 2);
    let y = i64::from((frame_height - card_height) / 2);
    LayoutSpec {
        frame_width,
        frame_height,
        card_width,
        card_height,
        slots: vec![Slot::at("card", x, y)],
        selection: Selection::PerFrame {
            pool: Some(params.pool.unwrap_or(SINGLE_POOL)),
        },
        frames: Some(params.frames.unwrap_or(SINGLE_FRAMES)),
        ..base(LayoutKind::Single, params, DEFAULT_DURATION_MS, 64)
    }
}

struct RowGeometry {
    frame: (u32, u32),
    base_height: u32,
    side_padding: u32,
    gap: u32,
}

/// Three cards side by side, evenly spaced and vertically centred. Cards
/// too wide for the canvas shrink, keeping their proportions.
fn row(mut spec: LayoutSpec, params: &LayoutParams, geometry: RowGeometry, aspect_ratio: f64) -> LayoutSpec {
    const CARDS: u32 = 3;
    let (frame_width, frame_height) = geometry.frame;
    let (mut card_width, mut card_height) = card_size(params, geometry.base_height, aspect_ratio);

    let reserved = geometry.side_padding * 2 + geometry.gap * (CARDS - 1);
    let max_width = frame_width.saturating_sub(reserved) / CARDS;
    if card_width > max_width {
        let ratio = f64::from(card_width) / f64::from(card_height);
        card_width = max_width;
        card_height = (f64::from(card_width) / ratio) as u32;
    }

    let pad = i64::from(frame_width.saturating_sub(card_width * CARDS) / (CARDS + 1));
    let y = (i64::from(frame_height) - i64::from(card_height)) / 2;
    let step = i64::from(card_width) + pad;

    spec.frame_width = frame_width;
    spec.frame_height = frame_height;
    spec.card_width = card_width;
    spec.card_height = card_height;
    spec.slots = ["left", "center", "right"]
        .into_iter()
        .enumerate()
        .map(|(i, id)| Slot::at(id, pad + i as i64 * step, y))
        .collect();
    spec
}

pub(super) fn three_row(params: &LayoutParams, aspect_ratio: f64) -> LayoutSpec {
    let spec = LayoutSpec {
        selection: Selection::PerFrame {
            pool: Some(params.pool.unwrap_or(THREE_POOL)),
        },
        frames: Some(params.frames.unwrap_or(THREE_FRAMES)),
        ..base(LayoutKind::Three, params, DEFAULT_DURATION_MS, 128)
    };
    let geometry = RowGeometry {
        frame: THREE_FRAME,
        base_height: THREE_CARD_HEIGHT,
        side_padding: THREE_SIDE_PADDING,
        gap: THREE_GAP,
    };
    row(spec, params, geometry, aspect_ratio)
}

pub(super) fn compact_row(params: &LayoutParams, aspect_ratio: f64) -> LayoutSpec {
    let spec = LayoutSpec {
        selection: Selection::PerFrame {
            pool: Some(params.pool.unwrap_or(COMPACT_POOL)),
        },
        frames: Some(params.frames.unwrap_or(COMPACT_FRAMES)),
        ..base(LayoutKind::Compact, params, COMPACT_DURATION_MS, 64)
    };
    let geometry = RowGeometry {
        frame: COMPACT_FRAME,
        base_height: COMPACT_CARD_HEIGHT,
        side_padding: 0,
        gap: 0,
    };
    row(spec, params, geometry, aspect_ratio)
}

/// Ten-card Celtic cross: a six-card cross left of centre and a four-card
/// column on the right, read bottom to top.
pub(super) fn celtic_cross(params: &LayoutParams, aspect_ratio: f64) -> LayoutSpec {
    let (frame_width, frame_height) = CELTIC_FRAME;
    let (card_width, card_height) = card_size(params, CELTIC_CARD_HEIGHT, aspect_ratio);
    let (w, h) = (i64::from(card_width), i64::from(card_height));
    let (cx, cy) = (CELTIC_CENTER_X, i64::from(frame_height) / 2);
    let gap = CELTIC_GAP;
    let column_x = i64::from(frame_width) - w - CELTIC_MARGIN;
    let column_y = |n: i64| i64::from(frame_height) - h * n - gap * (n - 1) - CELTIC_MARGIN;

    let slots = vec![
        Slot::at("present", cx - w / 2, cy - h / 2).z(1),
        // The crossing card sits on top of "present", turned sideways.
        Slot::at("challenge", cx - h / 2, cy - w / 2).rotated().z(2),
        Slot::at("distant_past", cx - w * 2 - gap, cy - h / 2),
        Slot::at("recent_past", cx - w / 2, cy + h / 2 + gap),
        Slot::at("possible_future", cx - w / 2, cy - h - gap - h / 2),
        Slot::at("near_future", cx + w + gap, cy - h / 2),
        Slot::at("self", column_x, column_y(1)),
        Slot::at("environment", column_x, column_y(2)),
        Slot::at("hopes_and_fears", column_x, column_y(3)),
        Slot::at("outcome", column_x, column_y(4)),
    ];

    LayoutSpec {
        frame_width,
        frame_height,
        card_width,
        card_height,
        slots,
        selection: Selection::PerFrame { pool: None },
        frames: Some(params.frames.unwrap_or(CELTIC_FRAMES)),
        ..base(LayoutKind::Celtic, params, DEFAULT_DURATION_MS, 128)
    }
}
