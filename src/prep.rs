//! Source preparation: bulk resizing and JPEG conversion of card images.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, imageops};
use tracing::{info, warn};

use crate::catalog::has_extension;
use crate::error::{Result, TarotError};

/// Inputs accepted by [`resize_directory`].
pub const RESIZE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];
/// Inputs rewritten by [`convert_directory`].
pub const CONVERT_EXTENSIONS: &[&str] = &["png", "gif", "bmp", "tiff", "tif", "webp"];

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Outcome counters for a bulk operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepReport {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Target size for an `orig_w`×`orig_h` image.
///
/// With `preserve_aspect`, a single target scales the other side to match
/// (rounded); two targets fit the image inside the box so the relatively
/// longer side lands exactly on its target. Without it, missing targets keep
/// the original side. Sides never drop below 1.
pub fn fit_dimensions(
    orig_w: u32,
    orig_h: u32,
    width: Option<u32>,
    height: Option<u32>,
    preserve_aspect: bool,
) -> (u32, u32) {
    if orig_w == 0 || orig_h == 0 {
        return (width.unwrap_or(orig_w), height.unwrap_or(orig_h));
    }
    let (ow, oh) = (f64::from(orig_w), f64::from(orig_h));
    let scaled = |v: f64| (v.round() as u32).max(1);

    if !preserve_aspect {
        return (width.unwrap_or(orig_w).max(1), height.unwrap_or(orig_h).max(1));
    }
    match (width, height) {
        (Some(w), None) => (w.max(1), scaled(oh * f64::from(w) / ow)),
        (None, Some(h)) => (scaled(ow * f64::from(h) / oh), h.max(1)),
        (Some(w), Some(h)) => {
            let aspect = ow / oh;
            let target_aspect = f64::from(w) / f64::from(h);
            if aspect > target_aspect {
                (w.max(1), scaled(f64::from(w) / aspect).min(h.max(1)))
            } else {
                (scaled(f64::from(h) * aspect).min(w.max(1)), h.max(1))
            }
        }
        (None, None) => (orig_w, orig_h),
    }
}

/// Files in `dir` whose extension is in `allowed`, sorted by name.
fn list_images(dir: &Path, allowed: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(TarotError::MissingSource(dir.to_path_buf()));
    }
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|err| TarotError::io(dir, err))? {
        let path = entry.map_err(|err| TarotError::io(dir, err))?.path();
        if path.is_file() && has_extension(&path, allowed) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Drop alpha by compositing over white.
pub fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut out = RgbImage::from_pixel(rgba.width(), rgba.height(), Rgb([255, 255, 255]));
    for (x, y, px) in rgba.enumerate_pixels() {
        let alpha = u32::from(px.0[3]);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(px.0[0]), blend(px.0[1]), blend(px.0[2])]));
    }
    out
}

fn save_jpeg(image: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    let file = File::create(path).map_err(|err| TarotError::io(path, err))?;
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality.clamp(1, 100));
    encoder
        .encode_image(image)
        .map_err(|err| TarotError::image(path, err))
}

fn is_jpeg(path: &Path) -> bool {
    has_extension(path, &["jpg", "jpeg"])
}

/// Resize every supported image in `source` into `output`, keeping names.
pub fn resize_directory(
    source: &Path,
    output: &Path,
    width: Option<u32>,
    height: Option<u32>,
    quality: u8,
    preserve_aspect: bool,
) -> Result<PrepReport> {
    let inputs = list_images(source, RESIZE_EXTENSIONS)?;
    fs::create_dir_all(output).map_err(|err| TarotError::io(output, err))?;
    info!(count = inputs.len(), ?width, ?height, "resizing images");

    let mut report = PrepReport::default();
    for input in inputs {
        let Some(name) = input.file_name() else {
            report.skipped += 1;
            continue;
        };
        let target = output.join(name);
        match resize_one(&input, &target, width, height, quality, preserve_aspect) {
            Ok((before, after)) => {
                info!(
                    file = %name.to_string_lossy(),
                    from = format_args!("{}x{}", before.0, before.1),
                    to = format_args!("{}x{}", after.0, after.1),
                    "resized"
                );
                report.processed += 1;
            }
            Err(err) => {
                warn!(%err, "resize failed");
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

fn resize_one(
    input: &Path,
    target: &Path,
    width: Option<u32>,
    height: Option<u32>,
    quality: u8,
    preserve_aspect: bool,
) -> Result<((u32, u32), (u32, u32))> {
    let image = image::open(input).map_err(|err| TarotError::image(input, err))?;
    let before = (image.width(), image.height());
    let after = fit_dimensions(before.0, before.1, width, height, preserve_aspect);
    let resized = image.resize_exact(after.0, after.1, imageops::FilterType::Lanczos3);

    if is_jpeg(target) {
        save_jpeg(&flatten_on_white(&resized), target, quality)?;
    } else {
        let format =
            ImageFormat::from_path(target).map_err(|err| TarotError::image(target, err))?;
        resized
            .save_with_format(target, format)
            .map_err(|err| TarotError::image(target, err))?;
    }
    Ok((before, after))
}

/// Convert non-JPEG rasters in `dir` to `<stem>.jpg`.
///
/// An existing JPEG twin is left alone. Originals are deleted afterwards
/// (also when a twin already existed) unless `keep_originals` is set.
pub fn convert_directory(dir: &Path, quality: u8, keep_originals: bool) -> Result<PrepReport> {
    let inputs = list_images(dir, CONVERT_EXTENSIONS)?;
    info!(count = inputs.len(), quality, "converting images to jpeg");

    let mut report = PrepReport::default();
    for input in inputs {
        match convert_one(&input, quality, keep_originals) {
            Ok(ConvertOutcome::Converted) => report.processed += 1,
            Ok(ConvertOutcome::Skipped) => report.skipped += 1,
            Err(err) => {
                warn!(%err, "conversion failed");
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConvertOutcome {
    Converted,
    Skipped,
}

fn convert_one(input: &Path, quality: u8, keep_originals: bool) -> Result<ConvertOutcome> {
    let target = input.with_extension("jpg");
    let outcome = if target.exists() {
        warn!(file = %target.display(), "jpeg already exists, skipping conversion");
        ConvertOutcome::Skipped
    } else {
        let image = image::open(input).map_err(|err| TarotError::image(input, err))?;
        save_jpeg(&flatten_on_white(&image), &target, quality)?;
        info!(from = %input.display(), to = %target.display(), "converted");
        ConvertOutcome::Converted
    };
    if !keep_originals {
        fs::remove_file(input).map_err(|err| TarotError::io(input, err))?;
    }
    Ok(outcome)
}
