//! Serialising composed frames into an animated GIF.

use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame as GifFrame};
use tempfile::NamedTempFile;
use tracing::info;

use crate::compose::Frame;
use crate::error::{Result, TarotError};

/// Quantiser speed handed to the encoder. Frames arrive already reduced, so
/// the encoder only has to index them.
const ENCODER_SPEED: i32 = 10;

/// Ordered frames plus playback settings.
#[derive(Debug, Clone)]
pub struct Animation {
    pub frames: Vec<Frame>,
    pub frame_duration_ms: u32,
    /// 0 loops forever.
    pub loop_count: u16,
}

impl Animation {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|f| f.image.dimensions())
    }

    pub fn summary(&self) -> GifSummary {
        let (width, height) = self.dimensions().unwrap_or_default();
        GifSummary {
            frames: self.len(),
            width,
            height,
            frame_duration_ms: self.frame_duration_ms,
            loop_count: self.loop_count,
        }
    }

    fn repeat(&self) -> Repeat {
        match self.loop_count {
            0 => Repeat::Infinite,
            n => Repeat::Finite(n),
        }
    }
}

/// What was written by [`write_gif`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifSummary {
    pub frames: usize,
    pub width: u32,
    pub height: u32,
    pub frame_duration_ms: u32,
    pub loop_count: u16,
}

/// Encode `animation` to `path`, consuming its frames one at a time.
///
/// The GIF is written to a temporary file next to `path` and renamed into
/// place once the last frame is encoded, so a failed run never leaves a
/// truncated file behind.
pub fn write_gif(animation: Animation, path: &Path) -> Result<GifSummary> {
    if animation.is_empty() {
        return Err(TarotError::NoFrames);
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let summary = animation.summary();
    let repeat = animation.repeat();
    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| TarotError::io(dir, err))?;

    let mut writer = BufWriter::new(tmp.as_file_mut());
    {
        // The trailer is written when the encoder drops.
        let mut encoder = GifEncoder::new_with_speed(&mut writer, ENCODER_SPEED);
        encoder.set_repeat(repeat)?;
        let delay = Delay::from_numer_denom_ms(summary.frame_duration_ms, 1);
        for frame in animation.frames {
            encoder.encode_frame(GifFrame::from_parts(frame.image, 0, 0, delay))?;
        }
    }
    writer.flush().map_err(|err| TarotError::io(path, err))?;
    drop(writer);

    tmp.persist(path)
        .map_err(|err| TarotError::io(path, err.error))?;
    info!(
        path = %path.display(),
        frames = summary.frames,
        delay_ms = summary.frame_duration_ms,
        "wrote animation"
    );
    Ok(summary)
}
