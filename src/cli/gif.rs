//! Animation command (`tarotgif gif ...`).

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use tarotgif::{CardFilter, FsImageSource, GifRequest, LayoutKind, LayoutParams};

use crate::cli::common::{LayoutArg, parse_filter};
use crate::cli::utils::{ensure_dir, gif_output_path, size_kib};

/// Arguments for `tarotgif gif`.
#[derive(Args, Debug)]
pub struct GifArgs {
    /// Directory holding the card images.
    #[arg(short = 's', long = "source")]
    pub source: PathBuf,
    /// Directory the GIF is written into.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Layout to compose.
    #[arg(short = 't', long = "type", value_enum)]
    pub layout: LayoutArg,
    /// Output file name (default `<type>_cards.gif`).
    #[arg(long)]
    pub name: Option<String>,
    /// Number of frames for spread layouts.
    #[arg(long)]
    pub frames: Option<usize>,
    /// Frame duration in milliseconds.
    #[arg(long)]
    pub duration: Option<u32>,
    /// Size of the sampled card pool.
    #[arg(long)]
    pub pool: Option<usize>,
    /// Number of cards shuffled into a `random` animation.
    #[arg(long)]
    pub cards: Option<usize>,
    /// Card width in pixels.
    #[arg(long)]
    pub width: Option<u32>,
    /// Card height in pixels.
    #[arg(long)]
    pub height: Option<u32>,
    /// Loop count (0 loops forever).
    #[arg(long = "loop", default_value_t = 0)]
    pub loop_count: u16,
    /// Card filter for `filtered`: major, minor, wands, cups, swords,
    /// pentacles or a file-name substring.
    #[arg(long, value_parser = parse_filter)]
    pub filter: Option<CardFilter>,
    /// Seed for reproducible card draws.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Print the resolved layout as JSON instead of rendering.
    #[arg(long)]
    pub plan: bool,
}

impl GifArgs {
    fn request(&self) -> GifRequest {
        let kind = LayoutKind::from(self.layout);
        GifRequest {
            source_dir: self.source.clone(),
            kind,
            params: LayoutParams {
                frames: self.frames,
                duration_ms: self.duration,
                pool: self.pool,
                cards: self.cards,
                card_width: self.width,
                card_height: self.height,
                loop_count: self.loop_count,
            },
            filter: self.filter.clone(),
            seed: self.seed,
        }
    }
}

/// Execute `tarotgif gif`.
pub fn handle(args: GifArgs) -> Result<()> {
    let request = args.request();
    if request.kind == LayoutKind::Filtered && request.filter.is_none() {
        bail!("--filter is required for the filtered layout");
    }

    let plan = tarotgif::plan(&request)
        .with_context(|| format!("failed to plan {} animation", request.kind))?;
    if args.plan {
        let json = serde_json::to_string_pretty(&plan.spec)?;
        println!("{json}");
        return Ok(());
    }

    ensure_dir(&args.output)?;
    let path = gif_output_path(&args.output, args.name.as_deref(), request.kind);
    let animation = tarotgif::render(&plan, &mut FsImageSource)
        .with_context(|| format!("failed to compose {} animation", request.kind))?;
    let summary = tarotgif::write_gif(animation, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!(
        "Wrote {} ({} frames, {}x{}, {} ms/frame, seed {})",
        path.display(),
        summary.frames,
        summary.width,
        summary.height,
        summary.frame_duration_ms,
        plan.seed
    );
    if let Some(kib) = size_kib(&path) {
        println!("Size: {kib:.1} KiB");
    }
    Ok(())
}
