//! The unified demo: a parallax background, an animated player, and a pen
//! of bouncing balls and blocks that flash on contact.

use crate::background::Background;
use crate::browser;
use crate::data::{BackgroundData, PlayerData};
use crate::engine::input::{self, SharedInput};
use crate::engine::{self, DrawMode, Game, Renderer};
use crate::geom::{Circle, Rect, Vector2d};
use crate::physics;
use crate::player::Player;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use futures::join;
use rand::Rng;

const BACKGROUND_DATA_PATH: &str = "background.json";
const PLAYER_DATA_PATH: &str = "player-anim-frames.json";

const DEFAULT_COLOR: &str = "#0095DD";
const BALL_COLOR: &str = "#00ff00";
const BLOCK_COLOR: &str = "#0000ff";
const HIT_COLOR: &str = "#ff0000";

// Keys the game tracks
mod keys {
    pub const ARROW_LEFT: &str = "ArrowLeft";
    pub const ARROW_RIGHT: &str = "ArrowRight";
    pub const ARROW_UP: &str = "ArrowUp";
    pub const ARROW_DOWN: &str = "ArrowDown";
    pub const DEBUG_TOGGLE: &str = "d";
}

/// How many of each entity the pen starts with.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub ball_count: usize,
    pub block_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            ball_count: 10,
            block_count: 10,
        }
    }
}

/// A bouncing ball: bounding circle, velocity, and the color it will be
/// drawn with this frame.
pub struct Ball {
    pub circle: Circle,
    pub velocity: Vector2d,
    color: &'static str,
}

impl Ball {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Ball {
            circle: Circle::new(x, y, radius),
            velocity: Vector2d::default(),
            color: BALL_COLOR,
        }
    }

    pub fn update(&mut self, sec_elapsed: f32) {
        self.circle.x += self.velocity.x * sec_elapsed;
        self.circle.y += self.velocity.y * sec_elapsed;
    }

    /// Mass proxied by covered area. The update loop never reads it;
    /// collisions are visual-only.
    pub fn mass(&self) -> f32 {
        self.circle.area()
    }
}

/// A bouncing block, the rectangular sibling of `Ball`.
pub struct Block {
    pub rect: Rect,
    pub velocity: Vector2d,
    color: &'static str,
}

impl Block {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Block {
            rect: Rect::new(x, y, width, height),
            velocity: Vector2d::default(),
            color: BLOCK_COLOR,
        }
    }

    pub fn update(&mut self, sec_elapsed: f32) {
        self.rect.x += self.velocity.x * sec_elapsed;
        self.rect.y += self.velocity.y * sec_elapsed;
    }

    /// See [`Ball::mass`].
    pub fn mass(&self) -> f32 {
        self.rect.area()
    }
}

fn random_velocity(base: f32, spread: f32, rng: &mut impl Rng) -> Vector2d {
    let mut velocity = Vector2d::new(
        base + rng.gen_range(0.0..spread),
        base + rng.gen_range(0.0..spread),
    );
    if rng.gen_bool(0.5) {
        velocity.x = -velocity.x;
    }
    if rng.gen_bool(0.5) {
        velocity.y = -velocity.y;
    }
    velocity
}

/// The arena holding the bouncing entities.
pub struct BouncePen {
    balls: Vec<Ball>,
    blocks: Vec<Block>,
    bounds: Rect,
}

impl BouncePen {
    pub fn new(bounds: Rect, config: &GameConfig, rng: &mut impl Rng) -> Self {
        let mut balls = Vec::with_capacity(config.ball_count);
        for i in 0..config.ball_count {
            let fi = i as f32;
            let mut ball = Ball::new(1.0 + fi * 35.0, 1.0 + fi * 35.0, 10.0 + fi);
            ball.velocity = random_velocity(80.0, 200.0, rng);
            balls.push(ball);
        }

        let mut blocks = Vec::with_capacity(config.block_count);
        for i in 0..config.block_count {
            let fi = i as f32;
            let mut block = Block::new(
                bounds.width - fi * 35.0,
                1.0 + fi * 35.0,
                25.0 + fi,
                20.0 + fi,
            );
            block.velocity = random_velocity(60.0, 150.0, rng);
            blocks.push(block);
        }

        BouncePen {
            balls,
            blocks,
            bounds,
        }
    }

    /// One tick: integrate, bounce off the arena, then flag every pairwise
    /// contact. Colors reset at the top so a flag lasts exactly one frame.
    pub fn update(&mut self, sec_elapsed: f32) {
        for ball in &mut self.balls {
            ball.update(sec_elapsed);
            ball.color = BALL_COLOR;

            let overlap = physics::contains(&ball.circle, &self.bounds);
            if overlap.dx != 0.0 {
                // Clamp back inside before flipping, otherwise a deep
                // overshoot could leave the ball outside for another frame.
                ball.circle.x -= overlap.dx;
                ball.velocity.x = -ball.velocity.x;
            }
            if overlap.dy != 0.0 {
                ball.circle.y -= overlap.dy;
                ball.velocity.y = -ball.velocity.y;
            }
        }

        for block in &mut self.blocks {
            block.update(sec_elapsed);
            block.color = BLOCK_COLOR;

            let overlap = physics::contains(&block.rect, &self.bounds);
            if overlap.dx != 0.0 {
                block.rect.x -= overlap.dx;
                block.velocity.x = -block.velocity.x;
            }
            if overlap.dy != 0.0 {
                block.rect.y -= overlap.dy;
                block.velocity.y = -block.velocity.y;
            }
        }

        // Pairwise scans; hits recolor both participants, nothing more.
        for i in 0..self.balls.len() {
            for j in (i + 1)..self.balls.len() {
                if physics::circle_circle(&self.balls[i].circle, &self.balls[j].circle) {
                    self.balls[i].color = HIT_COLOR;
                    self.balls[j].color = HIT_COLOR;
                }
            }

            for j in 0..self.blocks.len() {
                if physics::circle_rect(&self.balls[i].circle, &self.blocks[j].rect) {
                    self.balls[i].color = HIT_COLOR;
                    self.blocks[j].color = HIT_COLOR;
                }
            }
        }

        for i in 0..self.blocks.len() {
            for j in (i + 1)..self.blocks.len() {
                if physics::rect_rect(&self.blocks[i].rect, &self.blocks[j].rect) {
                    self.blocks[i].color = HIT_COLOR;
                    self.blocks[j].color = HIT_COLOR;
                }
            }
        }
    }

    pub fn draw(&self, renderer: &Renderer) {
        for ball in &self.balls {
            renderer.set_color(ball.color);
            renderer.draw_circle(&ball.circle);
        }
        for block in &self.blocks {
            renderer.set_color(block.color);
            renderer.draw_rect(&block.rect);
        }
    }
}

/// Frames counted over rolling one-second windows.
#[derive(Debug, Default)]
struct FpsCounter {
    cur_frames: u32,
    last_frames: u32,
    cur_sec: f32,
}

impl FpsCounter {
    fn tick(&mut self, sec_elapsed: f32) {
        self.cur_frames += 1;
        self.cur_sec += sec_elapsed;
        if self.cur_sec > 1.0 {
            self.cur_sec = 0.0;
            self.last_frames = self.cur_frames;
            self.cur_frames = 0;
        }
    }

    fn last_frames(&self) -> u32 {
        self.last_frames
    }
}

/// ┌────────────── Walk Commands ────────────────┐
/// │  Key          ->  Player anim  /  Scroll dx  │
/// ├─────────────────────────────────────────────-┤
/// │  ArrowLeft    ->  left         /  +walk_rate │
/// │  ArrowRight   ->  right        /  -walk_rate │
/// │  ArrowUp      ->  away         /  0          │
/// │  ArrowDown    ->  toward       /  0          │
/// │  (release)    ->  stopped      /  0          │
/// └──────────────────────────────────────────────┘
pub struct GameMain {
    input: SharedInput,
    background: Background,
    player: Player,
    pen: BouncePen,
    debug: bool,
    fps: FpsCounter,
}

impl GameMain {
    fn handle_input(&mut self) {
        let input = self.input.borrow();

        if input.just_pressed(keys::ARROW_LEFT) {
            self.player.walk_left();
            self.background.walk_left();
        } else if input.just_released(keys::ARROW_LEFT) {
            self.player.stop();
            self.background.stop();
        } else if input.just_pressed(keys::ARROW_RIGHT) {
            self.player.walk_right();
            self.background.walk_right();
        } else if input.just_released(keys::ARROW_RIGHT) {
            self.player.stop();
            self.background.stop();
        } else if input.just_pressed(keys::ARROW_UP) {
            self.player.walk_away();
            self.background.walk_away();
        } else if input.just_released(keys::ARROW_UP) {
            self.player.stop();
            self.background.stop();
        } else if input.just_pressed(keys::ARROW_DOWN) {
            self.player.walk_toward();
            self.background.walk_toward();
        } else if input.just_released(keys::ARROW_DOWN) {
            self.player.stop();
            self.background.stop();
        }

        if input.just_pressed(keys::DEBUG_TOGGLE) {
            self.debug = !self.debug;
        }
    }

    fn update(&mut self, sec_elapsed: f32) {
        self.handle_input();
        self.fps.tick(sec_elapsed);

        self.background.update(sec_elapsed);
        self.player.update(sec_elapsed);
        self.pen.update(sec_elapsed);
    }

    fn draw(&self, renderer: &Renderer) {
        renderer.set_draw_mode(DrawMode::Stroke);
        renderer.set_line_dashes(&[4.0, 2.0]);
        renderer.set_color(DEFAULT_COLOR);

        // Draw order matters: background -> player -> entities
        self.background.draw(renderer);
        self.player.draw(renderer);
        self.pen.draw(renderer);

        if self.debug {
            renderer.set_draw_mode(DrawMode::Fill);
            renderer.set_color("#ffffff");
            renderer.draw_text(&format!("FPS: {}", self.fps.last_frames()), 10.0, 20.0);
            renderer.draw_text(
                &format!(
                    "Anim[{}][{}]",
                    self.player.cur_anim(),
                    self.player.cur_frame()
                ),
                10.0,
                40.0,
            );
        }
    }
}

/// Loading until the data and images arrive, then a running `GameMain`.
pub enum Walkabout {
    Loading { config: GameConfig },
    Loaded(GameMain),
}

impl Walkabout {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Walkabout::Loading { config }
    }
}

impl Default for Walkabout {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Game for Walkabout {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            Walkabout::Loading { config } => {
                // Both records are independent; fetch them together.
                let (background_data, player_data) = join!(
                    browser::fetch_json::<BackgroundData>(BACKGROUND_DATA_PATH),
                    browser::fetch_json::<PlayerData>(PLAYER_DATA_PATH),
                );
                let background_data = background_data.with_context(|| {
                    format!("Failed to load background data from: {}", BACKGROUND_DATA_PATH)
                })?;
                let player_data = player_data.with_context(|| {
                    format!("Failed to load player data from: {}", PLAYER_DATA_PATH)
                })?;

                let (background, player_image) = join!(
                    Background::load(&background_data),
                    engine::load_image(&player_data.image_file_name),
                );
                let background = background?;
                let player_image = player_image.with_context(|| {
                    format!(
                        "Failed to load player image from: {}",
                        player_data.image_file_name
                    )
                })?;
                let player = Player::new(
                    &player_data,
                    player_image,
                    background_data.player_position,
                )?;

                let input = input::new_shared_input();
                {
                    let mut keystate = input.borrow_mut();
                    keystate.register(keys::ARROW_LEFT);
                    keystate.register(keys::ARROW_RIGHT);
                    keystate.register(keys::ARROW_UP);
                    keystate.register(keys::ARROW_DOWN);
                    keystate.register(keys::DEBUG_TOGGLE);
                }
                input::attach_input(&input)?;

                let canvas = browser::canvas()?;
                let arena = Rect::new(0.0, 0.0, canvas.width() as f32, canvas.height() as f32);
                let pen = BouncePen::new(arena, config, &mut rand::thread_rng());

                Ok(Box::new(Walkabout::Loaded(GameMain {
                    input,
                    background,
                    player,
                    pen,
                    debug: false,
                    fps: FpsCounter::default(),
                })))
            }
            Walkabout::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn pre_update(&mut self, _sec_elapsed: f32) {
        if let Walkabout::Loaded(main) = self {
            main.input.borrow_mut().update();
        }
    }

    fn update(&mut self, sec_elapsed: f32) {
        if let Walkabout::Loaded(main) = self {
            main.update(sec_elapsed);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let Walkabout::Loaded(main) = self {
            main.draw(renderer);
        }
    }

    fn post_update(&mut self, _sec_elapsed: f32) {}
}
