//! Parallax scrolling background.
//!
//! Layers scroll horizontally at `scroll_ratio * dx`, so layers with smaller
//! ratios appear further away. Each layer keeps an offset into its image and
//! wraps it at one image width to tile forever; drawing splits the tile into
//! at most two clipped segments so the seam never shows.

use crate::data::{BackgroundData, LayerData};
use crate::engine::{self, Renderer};
use crate::geom::Rect;
use anyhow::Result;
use futures::future::try_join_all;
use web_sys::HtmlImageElement;

/// A horizontal slice of the layer image mapped onto the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    src_x: f32,
    dest_x: f32,
    width: f32,
}

/// Scroll state of one layer, free of any image handle so the wrap math is
/// testable on its own.
#[derive(Debug, Clone, Copy)]
struct LayerScroll {
    offset: f32,
    img_width: f32,
    scroll_ratio: f32,
}

impl LayerScroll {
    fn new(img_width: f32, scroll_ratio: f32) -> Self {
        LayerScroll {
            offset: 0.0,
            img_width,
            scroll_ratio,
        }
    }

    /// Move opposite to the implied walk direction, then wrap the offset
    /// back into `(-img_width, img_width)` by exactly one image width.
    fn advance(&mut self, dx: f32, sec_elapsed: f32) {
        self.offset -= dx * sec_elapsed * self.scroll_ratio;

        if self.offset >= self.img_width {
            self.offset -= self.img_width;
        } else if self.offset <= -self.img_width {
            self.offset += self.img_width;
        }
    }

    /// The visible window `[offset, offset + view_width)` mapped onto the
    /// image tile. When the window crosses the tile edge a second segment
    /// picks up from the start of the image, clipped so the two never
    /// overlap.
    fn segments(&self, view_width: f32) -> (Segment, Option<Segment>) {
        let start = if self.offset < 0.0 {
            self.offset + self.img_width
        } else {
            self.offset
        };

        let first_width = (self.img_width - start).min(view_width);
        let first = Segment {
            src_x: start,
            dest_x: 0.0,
            width: first_width,
        };

        if first_width < view_width {
            let second = Segment {
                src_x: 0.0,
                dest_x: first_width,
                width: view_width - first_width,
            };
            (first, Some(second))
        } else {
            (first, None)
        }
    }
}

/// One parallax layer: a tiling image strip at a fixed vertical position.
pub struct BackLayer {
    image: HtmlImageElement,
    scroll: LayerScroll,
    y: f32,
    height: f32,
    view_width: f32,
}

impl BackLayer {
    fn new(data: &LayerData, image: HtmlImageElement, view_width: f32) -> Self {
        let img_width = image.width() as f32;
        BackLayer {
            image,
            scroll: LayerScroll::new(img_width, data.scroll_ratio),
            y: data.y,
            height: data.h,
            view_width,
        }
    }

    fn update(&mut self, dx: f32, sec_elapsed: f32) {
        self.scroll.advance(dx, sec_elapsed);
    }

    fn draw(&self, renderer: &Renderer) {
        let (first, second) = self.scroll.segments(self.view_width);
        self.draw_segment(renderer, &first);
        if let Some(second) = second {
            self.draw_segment(renderer, &second);
        }
    }

    fn draw_segment(&self, renderer: &Renderer, segment: &Segment) {
        if segment.width <= 0.0 {
            return;
        }
        renderer.draw_image(
            &self.image,
            &Rect::new(segment.src_x, 0.0, segment.width, self.height),
            &Rect::new(segment.dest_x, self.y, segment.width, self.height),
        );
    }
}

/// Ordered stack of parallax layers plus the shared walk velocity.
pub struct Background {
    layers: Vec<BackLayer>,
    walk_rate: f32,
    dx: f32,
}

impl Background {
    /// Load every layer image concurrently and assemble the stack in the
    /// order the data lists them (back to front).
    pub async fn load(data: &BackgroundData) -> Result<Self> {
        let images = try_join_all(
            data.layers
                .iter()
                .map(|layer| engine::load_image(&layer.file_name)),
        )
        .await?;

        let layers = data
            .layers
            .iter()
            .zip(images)
            .map(|(layer, image)| BackLayer::new(layer, image, data.width))
            .collect();

        Ok(Background {
            layers,
            walk_rate: data.walk_rate,
            dx: 0.0,
        })
    }

    pub fn update(&mut self, sec_elapsed: f32) {
        for layer in &mut self.layers {
            layer.update(self.dx, sec_elapsed);
        }
    }

    pub fn draw(&self, renderer: &Renderer) {
        for layer in &self.layers {
            layer.draw(renderer);
        }
    }

    // The background moves opposite to the implied character motion, so a
    // walk to the left scrolls the world to the right.
    pub fn walk_left(&mut self) {
        self.dx = self.walk_rate;
    }

    pub fn walk_right(&mut self) {
        self.dx = -self.walk_rate;
    }

    pub fn walk_toward(&mut self) {
        self.dx = 0.0;
    }

    pub fn walk_away(&mut self) {
        self.dx = 0.0;
    }

    pub fn stop(&mut self) {
        self.dx = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn offset_scales_with_scroll_ratio() {
        let mut near = LayerScroll::new(800.0, 1.0);
        let mut far = LayerScroll::new(800.0, 0.25);
        near.advance(120.0, 0.5);
        far.advance(120.0, 0.5);
        assert_relative_eq!(near.offset, -60.0);
        assert_relative_eq!(far.offset, -15.0);
    }

    #[test]
    fn offset_wraps_by_exactly_one_image_width() {
        let mut scroll = LayerScroll::new(800.0, 0.5);
        scroll.offset = 790.0;
        // dx of -80 for one second moves the offset +40, past the width.
        scroll.advance(-80.0, 1.0);
        assert_relative_eq!(scroll.offset, 30.0);

        let mut scroll = LayerScroll::new(800.0, 0.5);
        scroll.offset = -790.0;
        scroll.advance(80.0, 1.0);
        assert_relative_eq!(scroll.offset, -30.0);
    }

    #[test]
    fn wrap_never_compounds() {
        // Many small steps stay inside (-width, width) forever.
        let mut scroll = LayerScroll::new(800.0, 1.0);
        for _ in 0..10_000 {
            scroll.advance(123.0, 0.016);
            assert!(scroll.offset.abs() < 800.0);
        }
    }

    #[test]
    fn centered_tile_draws_one_segment() {
        let scroll = LayerScroll::new(800.0, 1.0);
        let (first, second) = scroll.segments(800.0);
        assert_eq!(
            first,
            Segment {
                src_x: 0.0,
                dest_x: 0.0,
                width: 800.0
            }
        );
        assert!(second.is_none());
    }

    #[test]
    fn negative_offset_splits_at_the_seam() {
        let mut scroll = LayerScroll::new(800.0, 1.0);
        scroll.offset = -200.0;
        let (first, second) = scroll.segments(800.0);
        // Seam clip width is min(|offset|, view width).
        assert_eq!(
            first,
            Segment {
                src_x: 600.0,
                dest_x: 0.0,
                width: 200.0
            }
        );
        assert_eq!(
            second,
            Some(Segment {
                src_x: 0.0,
                dest_x: 200.0,
                width: 600.0
            })
        );
    }

    #[test]
    fn positive_offset_splits_at_the_seam() {
        let mut scroll = LayerScroll::new(800.0, 1.0);
        scroll.offset = 300.0;
        let (first, second) = scroll.segments(800.0);
        assert_eq!(
            first,
            Segment {
                src_x: 300.0,
                dest_x: 0.0,
                width: 500.0
            }
        );
        assert_eq!(
            second,
            Some(Segment {
                src_x: 0.0,
                dest_x: 500.0,
                width: 300.0
            })
        );
    }

    #[test]
    fn segments_cover_the_view_without_overlap() {
        for offset in [-799.0, -400.5, -1.0, 0.0, 1.0, 400.5, 799.0] {
            let mut scroll = LayerScroll::new(800.0, 1.0);
            scroll.offset = offset;
            let (first, second) = scroll.segments(800.0);
            let covered = first.width + second.map_or(0.0, |s| s.width);
            assert_relative_eq!(covered, 800.0);
            if let Some(second) = second {
                assert_relative_eq!(second.dest_x, first.width);
            }
        }
    }

    #[test]
    fn walk_commands_set_scroll_velocity() {
        let mut background = Background {
            layers: Vec::new(),
            walk_rate: 120.0,
            dx: 0.0,
        };
        background.walk_left();
        assert_eq!(background.dx, 120.0);
        background.walk_right();
        assert_eq!(background.dx, -120.0);
        background.walk_toward();
        assert_eq!(background.dx, 0.0);
        background.walk_left();
        background.stop();
        assert_eq!(background.dx, 0.0);
        background.walk_away();
        assert_eq!(background.dx, 0.0);
    }
}
