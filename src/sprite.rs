//! Sprite-sheet animation state machine.
//!
//! A sprite addresses its sheet through a 2D frame table: one row per
//! animation, one source rect per frame. The table is optional; without it
//! the sprite presents the whole image and animation is a no-op.

use crate::data::FrameRow;
use crate::geom::Rect;
use anyhow::{anyhow, Result};

#[derive(Debug, Clone)]
pub struct Sprite {
    frames: Option<Vec<Vec<Rect>>>,
    sec_per_frame: f32,
    cur_seconds: f32,
    cur_anim: usize,
    cur_frame: usize,
    /// On-screen position of the sprite's upper-left corner.
    pub x: f32,
    pub y: f32,
    /// On-screen size. Zero means "draw at the frame's native size".
    pub width: f32,
    pub height: f32,
}

impl Sprite {
    /// Build a sprite from sheet rows. A `frames_per_second` of zero yields
    /// an infinite frame duration, i.e. a static sprite.
    pub fn new(frame_data: Option<&[FrameRow]>, frames_per_second: f32) -> Self {
        let frames = frame_data.map(|rows| {
            rows.iter()
                .map(|row| {
                    (0..row.num_frames)
                        .map(|j| Rect::new(row.x + j as f32 * row.w, row.y, row.w, row.h))
                        .collect()
                })
                .collect()
        });

        Sprite {
            frames,
            sec_per_frame: 1.0 / frames_per_second,
            cur_seconds: 0.0,
            cur_anim: 0,
            cur_frame: 0,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn has_frames(&self) -> bool {
        self.frames.is_some()
    }

    pub fn cur_anim(&self) -> usize {
        self.cur_anim
    }

    pub fn cur_frame(&self) -> usize {
        self.cur_frame
    }

    /// Source rect of the current animation frame. Without a frame table
    /// (or on an empty row) this is the zero rect, which the renderer reads
    /// as "draw the whole image".
    pub fn anim_frame(&self) -> Rect {
        self.frames
            .as_ref()
            .and_then(|frames| frames.get(self.cur_anim))
            .and_then(|row| row.get(self.cur_frame))
            .copied()
            .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Switch to another animation row, restarting at frame 0. There is no
    /// cross-fade; the new row shows from its first frame on the next draw.
    ///
    /// Rows have different lengths, so a stale frame index could reach past
    /// the new row; resetting first keeps the `(anim, frame)` pair valid.
    pub fn set_anim(&mut self, anim_index: usize) -> Result<()> {
        if let Some(frames) = &self.frames {
            if anim_index >= frames.len() {
                return Err(anyhow!(
                    "invalid animation index {} (sheet has {} rows)",
                    anim_index,
                    frames.len()
                ));
            }
        }
        self.cur_frame = 0;
        self.cur_anim = anim_index;
        Ok(())
    }

    /// Advance the time accumulator and step the frame once it reaches the
    /// per-frame duration. The accumulator resets to zero instead of
    /// carrying the remainder, so playback drifts slightly with the frame
    /// rate of the caller.
    pub fn update(&mut self, sec_elapsed: f32) {
        let row_len = match &self.frames {
            Some(frames) => frames.get(self.cur_anim).map_or(0, Vec::len),
            None => return,
        };
        if row_len == 0 {
            return;
        }

        self.cur_seconds += sec_elapsed;
        if self.cur_seconds >= self.sec_per_frame {
            self.cur_frame += 1;
            self.cur_seconds = 0.0;
            if self.cur_frame >= row_len {
                self.cur_frame = 0;
            }
        }
    }
}
