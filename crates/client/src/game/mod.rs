// The game client: one explicit context object owning connection, movement,
// world state, viewport and renderer, with a single dispatch point for every
// inbound frame.

use glam::Vec2;
use protocol::{ClientMessage, Direction, ServerMessage};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, window};

use crate::camera::Viewport;
use crate::movement::{MovementController, Transition};
use crate::network::Connection;
use crate::render::Renderer;
use crate::world::{WORLD_SIZE, WorldStore};

/// Relative URL of the world backdrop image, fetched once at startup.
const BACKDROP_URL: &str = "./assets/world.png";

pub struct GameClient {
    connection: Connection,
    movement: MovementController,
    store: WorldStore,
    viewport: Viewport,
    renderer: Renderer,
    username: String,
    /// Interval handle for the 100 ms move-intent resend, when armed.
    resend_timer: Option<i32>,
}

impl GameClient {
    pub fn new(canvas_id: &str, server_url: &str, username: &str) -> Result<GameClient, JsValue> {
        let window = window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("Canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        canvas.set_width(window.inner_width()?.as_f64().unwrap_or(800.0) as u32);
        canvas.set_height(window.inner_height()?.as_f64().unwrap_or(600.0) as u32);

        let renderer = Renderer::new(canvas, BACKDROP_URL)?;
        let connection = Connection::new(server_url)?;

        Ok(Self {
            connection,
            movement: MovementController::new(),
            store: WorldStore::new(),
            viewport: Viewport::new(),
            renderer,
            username: username.to_string(),
            resend_timer: None,
        })
    }

    pub fn websocket(&self) -> web_sys::WebSocket {
        self.connection.websocket().clone()
    }

    /// The transport opened: ask to join.
    pub(crate) fn handle_open(&self) {
        self.connection.send(&ClientMessage::JoinGame {
            username: self.username.clone(),
        });
    }

    /// Dispatch one inbound frame. Store mutation completes before the
    /// redraw it triggers, so drawing always observes post-mutation state.
    pub(crate) fn handle_frame(&mut self, data: &JsValue) {
        let message = match crate::network::parse_frame(data) {
            Ok(message) => message,
            Err(e) => {
                web_sys::console::warn_1(&format!("Dropping inbound frame: {e}").into());
                return;
            }
        };

        // Start decoding avatar bitmaps the moment their definitions arrive,
        // so the draw path never waits on a load callback.
        match &message {
            ServerMessage::JoinGame(reply) if reply.success => {
                for avatar in reply.avatars.values() {
                    self.renderer.cache_avatar(avatar);
                }
            }
            ServerMessage::PlayerJoined { avatar, .. } => {
                self.renderer.cache_avatar(avatar);
            }
            _ => {}
        }

        let applied = self.store.apply(message);
        if let Some(reason) = applied.rejected {
            web_sys::console::error_1(&format!("Join rejected: {reason}").into());
        }
        if applied.recentre {
            self.recentre();
        }
        if applied.redraw {
            self.redraw();
        }
    }

    pub(crate) fn recentre(&mut self) {
        if let Some(player) = self.store.local_player() {
            let target = player.position();
            self.viewport
                .recentre_on(target, self.renderer.surface_size(), Vec2::splat(WORLD_SIZE));
        }
    }

    pub(crate) fn redraw(&self) {
        self.renderer.draw_frame(&self.store, &self.viewport);
    }

    /// Resize: match the canvas to the window and redraw. The viewport keeps
    /// its offset until the next recentre.
    pub(crate) fn handle_resize(&mut self) {
        if let Some(window) = window() {
            let width = window
                .inner_width()
                .ok()
                .and_then(|w| w.as_f64())
                .unwrap_or(800.0) as u32;
            let height = window
                .inner_height()
                .ok()
                .and_then(|h| h.as_f64())
                .unwrap_or(600.0) as u32;
            self.renderer.resize(width, height);
        }
        self.redraw();
    }

    // --- movement glue (transitions are applied by the shell in lib.rs) ---

    pub(crate) fn key_down(&mut self, key: &str) -> Transition {
        self.movement.key_down(key)
    }

    pub(crate) fn key_up(&mut self, key: &str) -> Transition {
        self.movement.key_up(key)
    }

    pub(crate) fn focus_lost(&mut self) -> Transition {
        self.movement.focus_lost()
    }

    pub(crate) fn active_direction(&self) -> Option<Direction> {
        self.movement.active()
    }

    pub(crate) fn send_move(&self, direction: Direction) {
        self.connection.send(&ClientMessage::Move { direction });
    }

    pub(crate) fn send_stop(&self) {
        self.connection.send(&ClientMessage::Stop);
    }

    pub(crate) fn set_resend_timer(&mut self, handle: i32) {
        self.resend_timer = Some(handle);
    }

    pub(crate) fn clear_resend_timer(&mut self) {
        if let Some(handle) = self.resend_timer.take() {
            if let Some(window) = window() {
                window.clear_interval_with_handle(handle);
            }
        }
    }
}
