//! JPEG conversion command (`tarotgif convert ...`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tarotgif::DEFAULT_JPEG_QUALITY;

use crate::cli::common::parse_quality;

/// Arguments for `tarotgif convert`.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Directory whose images are converted in place.
    #[arg(short = 'd', long = "dir")]
    pub dir: PathBuf,
    /// JPEG quality (1-100).
    #[arg(short = 'q', long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = parse_quality)]
    pub quality: u8,
    /// Keep the source files after conversion.
    #[arg(long = "keep-originals")]
    pub keep_originals: bool,
}

/// Execute `tarotgif convert`.
pub fn handle(args: ConvertArgs) -> Result<()> {
    let report = tarotgif::convert_directory(&args.dir, args.quality, args.keep_originals)
        .with_context(|| format!("failed to convert images in {}", args.dir.display()))?;
    println!(
        "Converted {} images, skipped {}, failed {}",
        report.processed, report.skipped, report.failed
    );
    Ok(())
}
