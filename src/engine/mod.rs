//! Game driver and rendering context.
//!
//! `GameLoop` owns the requestAnimationFrame plumbing and calls the `Game`
//! hooks in a fixed order every tick:
//! pre_update -> begin_frame -> update -> draw -> post_update -> end_frame.

pub mod input;

use crate::browser;
use crate::geom::{Circle, Rect};
use crate::sprite::Sprite;
use anyhow::{anyhow, Error, Result};
use async_trait::async_trait;
use futures::channel::oneshot::channel;
use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;
// wasm is single threaded, so Rc<RefCell<...>> stands in for Arc<Mutex<...>>
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    /// Runs before anything else in the tick; the place to poll input.
    fn pre_update(&mut self, sec_elapsed: f32);
    fn update(&mut self, sec_elapsed: f32);
    fn draw(&self, renderer: &Renderer);
    fn post_update(&mut self, sec_elapsed: f32);
}

/// Upper bound on a single tick, in milliseconds. A backgrounded tab can
/// sit for seconds between frames; integrating that as one step would
/// tunnel entities through the arena walls.
const MAX_FRAME_MS: f64 = 50.0;

pub struct GameLoop {
    last_frame: f64,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
        };
        let renderer = Renderer::new(browser::canvas()?, browser::context()?);

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            let elapsed = (perf - game_loop.last_frame).min(MAX_FRAME_MS) as f32 / 1000.0;
            game_loop.last_frame = perf;

            game.pre_update(elapsed);
            renderer.begin_frame();
            game.update(elapsed);
            game.draw(&renderer);
            game.post_update(elapsed);
            renderer.end_frame();

            let _ = browser::request_animation_frame(f.borrow().as_ref().unwrap());
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: loop closure is None"))?,
        )?;

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Fill,
    Stroke,
}

pub struct Renderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    draw_mode: Cell<DrawMode>,
    clear_screen: bool,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement, context: CanvasRenderingContext2d) -> Self {
        context.set_font("16px Arial");
        Renderer {
            canvas,
            context,
            draw_mode: Cell::new(DrawMode::Fill),
            clear_screen: true,
        }
    }

    pub fn screen_width(&self) -> f32 {
        self.canvas.width() as f32
    }

    pub fn screen_height(&self) -> f32 {
        self.canvas.height() as f32
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode.get()
    }

    pub fn set_draw_mode(&self, mode: DrawMode) {
        self.draw_mode.set(mode);
    }

    /// Set the style for the current draw mode only; the other mode keeps
    /// whatever style it had.
    pub fn set_color(&self, color: &str) {
        match self.draw_mode.get() {
            DrawMode::Stroke => self.context.set_stroke_style_str(color),
            DrawMode::Fill => self.context.set_fill_style_str(color),
        }
    }

    pub fn set_color_rgb(&self, r: u8, g: u8, b: u8) {
        self.set_color(&format!("rgb({}, {}, {})", r, g, b));
    }

    pub fn set_color_rgba(&self, r: u8, g: u8, b: u8, a: f32) {
        self.set_color(&format!("rgba({}, {}, {}, {})", r, g, b, a));
    }

    pub fn set_font(&self, font: &str) {
        self.context.set_font(font);
    }

    pub fn set_line_width(&self, width: f32) {
        self.context.set_line_width(width.into());
    }

    /// `dashes` is `[on-length, off-length]` in pixels; empty restores a
    /// solid line.
    pub fn set_line_dashes(&self, dashes: &[f32]) {
        let segments = serde_wasm_bindgen::to_value(dashes)
            .expect("Line dash pattern failed to serialize! Unrecoverable error");
        self.context
            .set_line_dash(&segments)
            .expect("Setting line dash is throwing exceptions! Unrecoverable error");
    }

    pub fn begin_frame(&self) {
        if self.clear_screen {
            self.context.clear_rect(
                0.0,
                0.0,
                self.screen_width().into(),
                self.screen_height().into(),
            );
        }
    }

    pub fn end_frame(&self) {}

    pub fn draw_circle(&self, circle: &Circle) {
        self.context.begin_path();
        self.context
            .arc(
                circle.x.into(),
                circle.y.into(),
                circle.radius.into(),
                0.0,
                TAU,
            )
            .expect("Drawing is throwing exceptions! Unrecoverable error");
        match self.draw_mode.get() {
            DrawMode::Stroke => self.context.stroke(),
            DrawMode::Fill => self.context.fill(),
        }
        self.context.close_path();
    }

    pub fn draw_rect(&self, rect: &Rect) {
        self.context.begin_path();
        self.context.rect(
            rect.x.into(),
            rect.y.into(),
            rect.width.into(),
            rect.height.into(),
        );
        match self.draw_mode.get() {
            DrawMode::Stroke => self.context.stroke(),
            DrawMode::Fill => self.context.fill(),
        }
        self.context.close_path();
    }

    /// Blit `frame` of `image` onto `destination`. Skipped until the image
    /// has finished decoding.
    pub fn draw_image(&self, image: &HtmlImageElement, frame: &Rect, destination: &Rect) {
        if !image.complete() {
            return;
        }
        self.context
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                frame.x.into(),
                frame.y.into(),
                frame.width.into(),
                frame.height.into(),
                destination.x.into(),
                destination.y.into(),
                destination.width.into(),
                destination.height.into(),
            )
            .expect("Drawing is throwing exceptions! Unrecoverable error");
    }

    /// Draw a sprite at its own position: the current animation frame when
    /// it has a sheet, the whole image otherwise; scaled only when the
    /// sprite carries an explicit on-screen size.
    pub fn draw_sprite(&self, image: &HtmlImageElement, sprite: &Sprite) {
        if !image.complete() {
            return;
        }

        let unscaled = sprite.width == 0.0 || sprite.height == 0.0;
        if sprite.has_frames() {
            let frame = sprite.anim_frame();
            let (width, height) = if unscaled {
                (frame.width, frame.height)
            } else {
                (sprite.width, sprite.height)
            };
            self.draw_image(
                image,
                &frame,
                &Rect::new(sprite.x, sprite.y, width, height),
            );
        } else if unscaled {
            self.context
                .draw_image_with_html_image_element(image, sprite.x.into(), sprite.y.into())
                .expect("Drawing is throwing exceptions! Unrecoverable error");
        } else {
            self.context
                .draw_image_with_html_image_element_and_dw_and_dh(
                    image,
                    sprite.x.into(),
                    sprite.y.into(),
                    sprite.width.into(),
                    sprite.height.into(),
                )
                .expect("Drawing is throwing exceptions! Unrecoverable error");
        }
    }

    /// Text always fills, whatever the draw mode.
    pub fn draw_text(&self, text: &str, x: f32, y: f32) {
        self.context
            .fill_text(text, x.into(), y.into())
            .expect("Drawing is throwing exceptions! Unrecoverable error");
    }
}

/// Asynchronously load an image from a path or URL, resolving once the
/// browser reports the load finished or failed.
pub async fn load_image(source: &str) -> Result<HtmlImageElement> {
    let image = browser::new_image()?;
    let (tx, rx) = channel::<Result<(), Error>>();
    let success_tx = Rc::new(RefCell::new(Some(tx)));
    let error_tx = success_tx.clone();

    let success_callback = browser::closure_once(move || {
        if let Some(tx) = success_tx.borrow_mut().take() {
            let _ = tx.send(Ok(()));
        }
    });

    let error_callback = browser::closure_once(move |err: JsValue| {
        if let Some(tx) = error_tx.borrow_mut().take() {
            let _ = tx.send(Err(anyhow!("Error loading image: {:#?}", err)));
        }
    });

    image.set_onload(Some(success_callback.as_ref().unchecked_ref()));
    image.set_onerror(Some(error_callback.as_ref().unchecked_ref()));
    image.set_src(source);

    // keep the callbacks alive until the browser fires one of them
    success_callback.forget();
    error_callback.forget();

    // outer ? is the channel, inner ? the load result
    rx.await??;

    Ok(image)
}
