//! Convenience helpers shared across command handlers.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tarotgif::LayoutKind;

/// `<dir>/<name>.gif`, defaulting the name to `<layout>_cards`.
pub fn gif_output_path(dir: &Path, name: Option<&str>, kind: LayoutKind) -> PathBuf {
    let stem = match name {
        Some(name) => name.strip_suffix(".gif").unwrap_or(name).to_string(),
        None => format!("{kind}_cards"),
    };
    dir.join(format!("{stem}.gif"))
}

/// Create `dir` and its parents if missing.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
}

/// File size in KiB for reporting, or `None` if it cannot be read.
pub fn size_kib(path: &Path) -> Option<f64> {
    fs::metadata(path).ok().map(|meta| meta.len() as f64 / 1024.0)
}
