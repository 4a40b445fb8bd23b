// Canvas rendering - world backdrop, avatar sprites, name labels.

use std::collections::HashMap;

use glam::Vec2;
use protocol::{Avatar, Facing, Player};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::camera::Viewport;
use crate::world::WorldStore;

/// Entities whose screen position falls this far outside the canvas are
/// culled before any draw work. Cheap test, not pixel-exact.
const CULL_MARGIN: f32 = 50.0;

/// Avatar frame bitmaps, decoded eagerly when the definitions arrive and
/// keyed by (avatar name, facing, frame index).
///
/// Filling the cache up front keeps load callbacks out of the draw path: a
/// sprite renders at the entity's position as of the draw call, never at
/// load-completion time.
#[derive(Default)]
pub struct SpriteCache {
    frames: HashMap<(String, Facing, usize), SpriteFrame>,
}

struct SpriteFrame {
    image: HtmlImageElement,
    /// Drawn with a negative horizontal scale (west reusing east frames).
    mirrored: bool,
}

impl SpriteCache {
    /// Kick off the browser fetch/decode for every frame of `avatar`.
    /// Re-inserting a known avatar is a no-op: definitions are immutable
    /// after first receipt.
    pub fn insert_avatar(&mut self, avatar: &Avatar) {
        for facing in [Facing::North, Facing::South, Facing::East, Facing::West] {
            let Some((sources, mirrored)) = avatar.frames_for(facing) else {
                continue;
            };
            for (index, source) in sources.iter().enumerate() {
                let key = (avatar.name.clone(), facing, index);
                if self.frames.contains_key(&key) {
                    continue;
                }
                let Ok(image) = HtmlImageElement::new() else {
                    continue;
                };
                image.set_src(source);
                self.frames.insert(key, SpriteFrame { image, mirrored });
            }
        }
    }

    fn frame(&self, avatar: &str, facing: Facing, index: usize) -> Option<&SpriteFrame> {
        self.frames.get(&(avatar.to_string(), facing, index))
    }
}

pub struct Renderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    backdrop: HtmlImageElement,
    sprites: SpriteCache,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement, backdrop_url: &str) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or("Failed to get 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let backdrop = HtmlImageElement::new()?;
        backdrop.set_src(backdrop_url);

        Ok(Self {
            canvas,
            ctx,
            backdrop,
            sprites: SpriteCache::default(),
        })
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    pub fn surface_size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn cache_avatar(&mut self, avatar: &Avatar) {
        self.sprites.insert_avatar(avatar);
    }

    /// Draw one full frame. No-op until the backdrop has decoded.
    pub fn draw_frame(&self, store: &WorldStore, viewport: &Viewport) {
        if !self.backdrop.complete() || self.backdrop.natural_width() == 0 {
            return;
        }

        let width = self.width() as f64;
        let height = self.height() as f64;
        self.ctx.clear_rect(0.0, 0.0, width, height);

        // Backdrop: sample the source rect at the viewport offset, sized to
        // the surface, mapped onto the full canvas.
        let offset = viewport.offset();
        self.ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                &self.backdrop,
                offset.x as f64,
                offset.y as f64,
                width,
                height,
                0.0,
                0.0,
                width,
                height,
            )
            .ok();

        for player in store.players() {
            self.draw_player(store, viewport, player);
        }
    }

    fn draw_player(&self, store: &WorldStore, viewport: &Viewport, player: &Player) {
        let screen_pos = viewport.world_to_screen(player.position());
        if screen_pos.x < -CULL_MARGIN
            || screen_pos.y < -CULL_MARGIN
            || screen_pos.x > self.width() + CULL_MARGIN
            || screen_pos.y > self.height() + CULL_MARGIN
        {
            return;
        }

        // Missing avatar, facing sequence, frame index, or a bitmap that has
        // not decoded yet: skip this entity, carry on with the frame.
        if store.avatar(&player.avatar).is_none() {
            return;
        }
        let Some(sprite) = self
            .sprites
            .frame(&player.avatar, player.facing, player.animation_frame)
        else {
            return;
        };
        if !sprite.image.complete() || sprite.image.natural_width() == 0 {
            return;
        }

        let w = sprite.image.natural_width() as f64;
        let h = sprite.image.natural_height() as f64;
        let x = screen_pos.x as f64;
        let y = screen_pos.y as f64;

        if sprite.mirrored {
            // Sign-flip the horizontal scale around the draw point.
            self.ctx.save();
            let _ = self.ctx.translate(x, y);
            let _ = self.ctx.scale(-1.0, 1.0);
            self.ctx
                .draw_image_with_html_image_element(&sprite.image, -w / 2.0, -h / 2.0)
                .ok();
            self.ctx.restore();
        } else {
            self.ctx
                .draw_image_with_html_image_element(&sprite.image, x - w / 2.0, y - h / 2.0)
                .ok();
        }

        self.draw_name(&player.username, screen_pos, h as f32);
    }

    /// Display name as outlined text directly above the sprite.
    fn draw_name(&self, name: &str, screen_pos: Vec2, sprite_height: f32) {
        if name.is_empty() {
            return;
        }

        self.ctx.set_font("bold 14px Arial");
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("bottom");

        let x = screen_pos.x as f64;
        let y = (screen_pos.y - sprite_height / 2.0 - 4.0) as f64;

        self.ctx.set_stroke_style_str("black");
        self.ctx.set_line_width(3.0);
        self.ctx.stroke_text(name, x, y).ok();
        self.ctx.set_fill_style_str("white");
        self.ctx.fill_text(name, x, y).ok();
    }
}
