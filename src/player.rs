//! The player character: a sprite whose animation row follows walk commands.

use crate::data::{PlayerAnims, PlayerData, PointData};
use crate::engine::Renderer;
use crate::sprite::Sprite;
use anyhow::{anyhow, Result};
use web_sys::HtmlImageElement;

const ANIM_FPS: f32 = 10.0;

pub struct Player {
    sprite: Sprite,
    image: HtmlImageElement,
    anims: PlayerAnims,
}

impl Player {
    /// Build the player from its sheet data, validating every named
    /// animation row up front so the walk commands can't fail later.
    pub fn new(data: &PlayerData, image: HtmlImageElement, position: PointData) -> Result<Self> {
        let row_count = data.frames.len();
        for (name, index) in [
            ("stopped", data.anims.stopped),
            ("left", data.anims.left),
            ("right", data.anims.right),
            ("toward", data.anims.toward),
            ("away", data.anims.away),
        ] {
            if index >= row_count {
                return Err(anyhow!(
                    "player animation '{}' points at row {} but the sheet has {} rows",
                    name,
                    index,
                    row_count
                ));
            }
        }

        let mut sprite = Sprite::new(Some(&data.frames), ANIM_FPS);
        sprite.x = position.x;
        sprite.y = position.y;
        sprite.set_anim(data.anims.stopped)?;

        Ok(Player {
            sprite,
            image,
            anims: data.anims,
        })
    }

    pub fn update(&mut self, sec_elapsed: f32) {
        self.sprite.update(sec_elapsed);
    }

    pub fn draw(&self, renderer: &Renderer) {
        renderer.draw_sprite(&self.image, &self.sprite);
    }

    pub fn cur_anim(&self) -> usize {
        self.sprite.cur_anim()
    }

    pub fn cur_frame(&self) -> usize {
        self.sprite.cur_frame()
    }

    pub fn walk_left(&mut self) {
        self.set_anim(self.anims.left);
    }

    pub fn walk_right(&mut self) {
        self.set_anim(self.anims.right);
    }

    pub fn walk_toward(&mut self) {
        self.set_anim(self.anims.toward);
    }

    pub fn walk_away(&mut self) {
        self.set_anim(self.anims.away);
    }

    pub fn stop(&mut self) {
        self.set_anim(self.anims.stopped);
    }

    fn set_anim(&mut self, anim_index: usize) {
        // Indices were validated in new(); a rejection here means the sheet
        // changed under us, which is worth a console note but not a crash.
        if let Err(err) = self.sprite.set_anim(anim_index) {
            log!("Warning: player animation rejected: {:#}", err);
        }
    }
}
