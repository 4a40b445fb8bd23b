// WASM entry point for the plaza world client.
//
// The client is one explicit GameClient behind Rc<RefCell<…>>; this file
// only constructs it and wires the browser events (WebSocket lifecycle,
// keyboard, focus loss, resize) into its dispatchers.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, KeyboardEvent, MessageEvent, window};

// Module structure - each module handles a specific concern
mod camera; // viewport offset, world<->screen transform
mod game; // the client context object, inbound dispatch
mod movement; // key-press state machine, direction intents
mod network; // WebSocket connection, frame codec
mod render; // canvas drawing, sprite cache
mod world; // server-mirrored entity table

pub use game::GameClient;
use movement::{MOVE_RESEND_INTERVAL_MS, Transition};

/// Initialize panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Create and return a GameClient that JS can interact with
#[wasm_bindgen]
pub struct GameClientWrapper {
    client: Rc<RefCell<GameClient>>,
}

#[wasm_bindgen]
impl GameClientWrapper {
    /// Create a new game client and attach every event listener.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        server_url: &str,
        username: &str,
    ) -> Result<GameClientWrapper, JsValue> {
        init();

        let client = GameClient::new(canvas_id, server_url, username)?;
        let client_rc = Rc::new(RefCell::new(client));

        setup_websocket_handlers(client_rc.clone())?;
        setup_keyboard_handlers(client_rc.clone())?;
        setup_focus_handler(client_rc.clone())?;
        setup_resize_handler(client_rc.clone())?;

        Ok(GameClientWrapper { client: client_rc })
    }

    /// Get the underlying WebSocket for connection status checks
    pub fn websocket(&self) -> web_sys::WebSocket {
        self.client.borrow().websocket()
    }
}

fn setup_websocket_handlers(client: Rc<RefCell<GameClient>>) -> Result<(), JsValue> {
    let ws = client.borrow().websocket();

    // onopen - join immediately
    let open_client = client.clone();
    let onopen = Closure::wrap(Box::new(move |_event: JsValue| {
        web_sys::console::log_1(&"WebSocket connected".into());
        open_client.borrow().handle_open();
    }) as Box<dyn FnMut(JsValue)>);
    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    // onmessage - dispatch the frame; each mutation triggers its own redraw
    let message_client = client.clone();
    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        message_client.borrow_mut().handle_frame(&event.data());
    }) as Box<dyn FnMut(MessageEvent)>);
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    // onerror - logged, non-fatal, no reconnect
    let onerror = Closure::wrap(Box::new(move |e: JsValue| {
        web_sys::console::error_1(&format!("WebSocket error: {:?}", e).into());
    }) as Box<dyn FnMut(JsValue)>);
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    let onclose = Closure::wrap(Box::new(move |event: CloseEvent| {
        web_sys::console::log_1(&format!("WebSocket closed: {}", event.code()).into());
    }) as Box<dyn FnMut(CloseEvent)>);
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    onclose.forget();

    Ok(())
}

fn setup_keyboard_handlers(client: Rc<RefCell<GameClient>>) -> Result<(), JsValue> {
    let window = window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    // Keydown handler
    {
        let client = client.clone();
        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let key = event.key();
            if movement::is_direction_key(&key) {
                event.prevent_default();
            }
            let transition = client.borrow_mut().key_down(&key);
            apply_transition(&client, transition);
        }) as Box<dyn FnMut(_)>);

        document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Keyup handler
    {
        let client = client.clone();
        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let transition = client.borrow_mut().key_up(&event.key());
            apply_transition(&client, transition);
        }) as Box<dyn FnMut(_)>);

        document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Losing window focus releases every held key (forces a stop).
fn setup_focus_handler(client: Rc<RefCell<GameClient>>) -> Result<(), JsValue> {
    let win = window().ok_or("No window")?;

    let closure = Closure::wrap(Box::new(move |_event: JsValue| {
        let transition = client.borrow_mut().focus_lost();
        apply_transition(&client, transition);
    }) as Box<dyn FnMut(JsValue)>);

    win.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
    closure.forget();

    Ok(())
}

/// Resize the canvas when the browser window is resized.
fn setup_resize_handler(client: Rc<RefCell<GameClient>>) -> Result<(), JsValue> {
    let win = window().ok_or("No window")?;

    let closure = Closure::wrap(Box::new(move || {
        client.borrow_mut().handle_resize();
    }) as Box<dyn FnMut()>);

    win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();

    Ok(())
}

/// Map a movement transition onto the wire and the resend timer.
fn apply_transition(client: &Rc<RefCell<GameClient>>, transition: Transition) {
    match transition {
        Transition::None => {}
        Transition::Stop => {
            let mut c = client.borrow_mut();
            c.clear_resend_timer();
            c.send_stop();
        }
        Transition::Start(direction) => {
            {
                let mut c = client.borrow_mut();
                c.clear_resend_timer();
                c.send_move(direction);
            }

            // Re-emit the current move intent every tick while a direction
            // stays active.
            let tick_client = client.clone();
            let callback = Closure::wrap(Box::new(move || {
                let c = tick_client.borrow();
                if let Some(direction) = c.active_direction() {
                    c.send_move(direction);
                }
            }) as Box<dyn FnMut()>);

            if let Some(win) = window() {
                match win.set_interval_with_callback_and_timeout_and_arguments_0(
                    callback.as_ref().unchecked_ref(),
                    MOVE_RESEND_INTERVAL_MS,
                ) {
                    Ok(handle) => client.borrow_mut().set_resend_timer(handle),
                    Err(e) => {
                        web_sys::console::error_1(
                            &format!("Failed to arm resend timer: {:?}", e).into(),
                        );
                    }
                }
            }
            callback.forget();
        }
    }
}
