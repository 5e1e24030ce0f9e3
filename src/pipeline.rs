//! End-to-end GIF run: scan → select → compose → encode.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::catalog::{CardFilter, exclude_covers, measure_aspect_ratio, scan_cards};
use crate::compose::{CardImageSource, compose};
use crate::encode::{Animation, GifSummary, write_gif};
use crate::error::Result;
use crate::layout::{LayoutKind, LayoutParams, LayoutSpec};
use crate::ordering::CardFile;
use crate::sampling::DeckRng;

/// Everything needed to produce one animation.
#[derive(Debug, Clone)]
pub struct GifRequest {
    pub source_dir: PathBuf,
    pub kind: LayoutKind,
    pub params: LayoutParams,
    /// Only consulted by [`LayoutKind::Filtered`].
    pub filter: Option<CardFilter>,
    pub seed: Option<u64>,
}

impl GifRequest {
    pub fn new(source_dir: impl Into<PathBuf>, kind: LayoutKind) -> Self {
        Self {
            source_dir: source_dir.into(),
            kind,
            params: LayoutParams::default(),
            filter: None,
            seed: None,
        }
    }
}

/// A resolved run: the layout, its candidates and the seed that drives it.
#[derive(Debug, Clone)]
pub struct GifPlan {
    pub spec: LayoutSpec,
    pub candidates: Vec<CardFile>,
    pub aspect_ratio: f64,
    pub seed: u64,
}

/// Scan the source directory and build the layout without decoding any card.
pub fn plan(request: &GifRequest) -> Result<GifPlan> {
    let mut candidates = scan_cards(&request.source_dir)?;
    if request.kind.excludes_covers() {
        candidates = exclude_covers(candidates);
    }
    if request.kind == LayoutKind::Filtered {
        if let Some(filter) = &request.filter {
            candidates = filter.apply(candidates);
            debug!(%filter, remaining = candidates.len(), "applied card filter");
        }
    }

    let aspect_ratio = if request.kind.is_strip() {
        crate::catalog::DEFAULT_ASPECT_RATIO
    } else {
        measure_aspect_ratio(&candidates)
    };
    let spec = LayoutSpec::build(request.kind, &request.params, aspect_ratio)?;
    let seed = request.seed.unwrap_or_else(|| DeckRng::from_entropy().seed());

    info!(
        layout = %request.kind,
        candidates = candidates.len(),
        aspect_ratio = format_args!("{aspect_ratio:.3}"),
        seed,
        "planned animation"
    );
    Ok(GifPlan {
        spec,
        candidates,
        aspect_ratio,
        seed,
    })
}

/// Compose every frame of a plan.
pub fn render<S: CardImageSource>(plan: &GifPlan, source: &mut S) -> Result<Animation> {
    let mut rng = DeckRng::new(plan.seed);
    let frames = compose(&plan.spec, &plan.candidates, &mut rng, source)?;
    Ok(Animation {
        frames,
        frame_duration_ms: plan.spec.frame_duration_ms,
        loop_count: plan.spec.loop_count,
    })
}

/// Plan, render and write in one go. Nothing is written if planning or
/// composition fails.
pub fn create_gif<S: CardImageSource>(
    request: &GifRequest,
    output: &Path,
    source: &mut S,
) -> Result<GifSummary> {
    let plan = plan(request)?;
    let animation = render(&plan, source)?;
    write_gif(animation, output)
}
