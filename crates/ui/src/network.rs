use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, CloseEvent, Event, MessageEvent, WebSocket};

use crate::adapter::ConnectionAdapter;
use crate::connection::{ConnectionEvent, Generation, ReconnectRequest, WebSocketConnection};
use crate::dom::DocumentStore;
use crate::error::js_detail;

/// The page's adapter over real browser objects
pub type Panel = ConnectionAdapter<WebSocketConnection, DocumentStore>;
pub type SharedPanel = Rc<RefCell<Panel>>;

/// Hostname the page was served from; the controller serves both
fn page_hostname() -> String {
    window()
        .and_then(|w| w.location().hostname().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| {
            warn!("page hostname unavailable, defaulting to localhost");
            "localhost".to_string()
        })
}

/// Open a new WebSocket to the controller and hand it to the panel
pub fn initialize(panel: &SharedPanel) {
    let url = panel.borrow().endpoint(&page_hostname());
    info!("opening WebSocket connection to {url}");

    let ws = match WebSocket::new(&url) {
        Ok(ws) => ws,
        Err(e) => {
            let request = panel.borrow_mut().connect_failed(&js_detail(&e));
            schedule_reconnect(panel, request);
            return;
        }
    };

    let generation = panel
        .borrow_mut()
        .attach(WebSocketConnection::new(ws.clone()));
    setup_websocket_handlers(&ws, panel, generation);
}

fn setup_websocket_handlers(ws: &WebSocket, panel: &SharedPanel, generation: Generation) {
    // ON OPEN
    let panel_open = panel.clone();
    let onopen = Closure::wrap(Box::new(move || {
        dispatch(&panel_open, generation, ConnectionEvent::Open);
    }) as Box<dyn FnMut()>);
    ws.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    // ON MESSAGE
    let panel_msg = panel.clone();
    let onmessage = Closure::wrap(Box::new(move |e: MessageEvent| {
        match e.data().as_string() {
            Some(text) => dispatch(&panel_msg, generation, ConnectionEvent::Message(text)),
            None => debug!("ignoring non-text frame"),
        }
    }) as Box<dyn FnMut(_)>);
    ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    // ON ERROR
    let panel_err = panel.clone();
    let onerror = Closure::wrap(Box::new(move |e: Event| {
        dispatch(&panel_err, generation, ConnectionEvent::Error(e.type_()));
    }) as Box<dyn FnMut(_)>);
    ws.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    // ON CLOSE
    let panel_close = panel.clone();
    let onclose = Closure::wrap(Box::new(move |e: CloseEvent| {
        let event = ConnectionEvent::Close {
            code: e.code(),
            reason: e.reason(),
        };
        dispatch(&panel_close, generation, event);
    }) as Box<dyn FnMut(_)>);
    ws.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    onclose.forget();
}

/// Run one event through the panel, then act on any reconnect request
/// once the borrow is released.
fn dispatch(panel: &SharedPanel, generation: Generation, event: ConnectionEvent) {
    let request = panel.borrow_mut().handle_event(generation, event);
    if let Some(request) = request {
        schedule_reconnect(panel, request);
    }
}

/// Reopen the connection after the requested delay. Never cancelled.
fn schedule_reconnect(panel: &SharedPanel, request: ReconnectRequest) {
    let panel = panel.clone();
    let callback = Closure::once(move || {
        debug!("attempting reconnection");
        initialize(&panel);
    });

    let timeout = i32::try_from(request.delay.as_millis()).unwrap_or(i32::MAX);
    match window() {
        Some(win) => {
            if let Err(e) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout,
            ) {
                warn!("could not schedule reconnect: {}", js_detail(&e));
            }
        }
        None => warn!("no window, reconnect attempt {} dropped", request.attempt),
    }
    callback.forget();
}
