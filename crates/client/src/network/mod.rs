// WebSocket connection and JSON frame handling.

use protocol::{ClientMessage, ProtocolError, ServerMessage};
use wasm_bindgen::prelude::*;
use web_sys::WebSocket;

pub struct Connection {
    ws: WebSocket,
}

impl Connection {
    /// Open the transport. Only URL-shape problems surface here; connection
    /// failures arrive later through the error and close events.
    pub fn new(url: &str) -> Result<Self, JsValue> {
        let ws_url = if url.starts_with("ws://") || url.starts_with("wss://") {
            url.to_string()
        } else {
            // Match the page's scheme when given a bare host
            let is_https = web_sys::window()
                .and_then(|w| w.location().protocol().ok())
                .map(|p| p == "https:")
                .unwrap_or(false);

            format!("ws{}://{}", if is_https { "s" } else { "" }, url)
        };

        web_sys::console::log_1(&format!("Connecting to: {}", ws_url).into());
        let ws = WebSocket::new(&ws_url)?;

        Ok(Self { ws })
    }

    pub fn websocket(&self) -> &WebSocket {
        &self.ws
    }

    /// Serialize and send one intent. Silently dropped, not queued, unless
    /// the socket is OPEN: a stale intent is worthless by the time the
    /// socket recovers.
    pub fn send(&self, message: &ClientMessage) {
        if self.ws.ready_state() != WebSocket::OPEN {
            return;
        }
        match message.encode() {
            Ok(frame) => {
                if let Err(e) = self.ws.send_with_str(&frame) {
                    web_sys::console::error_1(&format!("Failed to send frame: {:?}", e).into());
                }
            }
            Err(e) => {
                web_sys::console::error_1(&format!("Failed to encode intent: {e}").into());
            }
        }
    }
}

/// Decode one inbound frame into a typed message.
pub fn parse_frame(data: &JsValue) -> Result<ServerMessage, ProtocolError> {
    let text = data.as_string().ok_or(ProtocolError::NonTextFrame)?;
    ServerMessage::parse(&text)
}
