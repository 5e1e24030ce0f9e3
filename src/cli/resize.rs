//! Bulk resize command (`tarotgif resize ...`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use tarotgif::DEFAULT_JPEG_QUALITY;

use crate::cli::common::parse_quality;

/// Arguments for `tarotgif resize`.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).multiple(true).args(["width", "height"])))]
pub struct ResizeArgs {
    /// Directory with the original images.
    #[arg(short = 's', long = "source")]
    pub source: PathBuf,
    /// Directory the resized images are written into.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Target width in pixels.
    #[arg(short = 'w', long)]
    pub width: Option<u32>,
    /// Target height in pixels.
    #[arg(short = 'H', long)]
    pub height: Option<u32>,
    /// JPEG quality (1-100).
    #[arg(short = 'q', long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = parse_quality)]
    pub quality: u8,
    /// Stretch to the exact target instead of fitting inside it.
    #[arg(long = "no-preserve-aspect")]
    pub no_preserve_aspect: bool,
}

/// Execute `tarotgif resize`.
pub fn handle(args: ResizeArgs) -> Result<()> {
    let report = tarotgif::resize_directory(
        &args.source,
        &args.output,
        args.width,
        args.height,
        args.quality,
        !args.no_preserve_aspect,
    )
    .with_context(|| format!("failed to resize images in {}", args.source.display()))?;

    println!(
        "Resized {} images into {} ({} failed)",
        report.processed,
        args.output.display(),
        report.failed
    );
    Ok(())
}
