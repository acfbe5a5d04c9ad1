//! pwm-panel browser front-end
//!
//! Keeps one WebSocket open to the ESP32 controller, sends slider moves as
//! `<n>s<value>` commands and renders the JSON readings it pushes back.

pub mod adapter;
pub mod config;
pub mod connection;
pub mod dom;
pub mod error;
mod network;
mod sliders;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{error, info, Level};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub use adapter::ConnectionAdapter;
pub use config::{ConfigOverrides, PanelConfig, ReconnectPolicy};
pub use connection::{Connection, ConnectionEvent, ConnectionState, Generation, ReconnectRequest};
pub use dom::ElementStore;
pub use error::UiError;

use crate::dom::DocumentStore;

/// Install the panic hook and the console subscriber
#[allow(unused_variables)]
fn init_logging(level: Level) {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default_with_config(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(level)
                .build(),
        );
    }
}

#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no global `window` exists")?;
    let document = window.document().ok_or("should have a document on window")?;

    let overrides = ConfigOverrides::from_window(&window);
    init_logging(overrides.log_level());
    let config = PanelConfig::default().apply(overrides);

    let ready_state = js_sys::Reflect::get(&document, &"readyState".into())?.as_string();
    if ready_state.as_deref() == Some("complete") {
        return start_panel(config);
    }

    let onload = Closure::once(move || {
        if let Err(e) = start_panel(config) {
            error!("panel failed to start: {}", error::js_detail(&e));
        }
    });
    window.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
    onload.forget();
    Ok(())
}

/// Page loaded: build the adapter, wire sliders and connect
fn start_panel(config: PanelConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no global `window` exists")?;
    let document = window.document().ok_or("should have a document on window")?;

    let bind_sliders = config.bind_sliders;
    let panel: network::SharedPanel = Rc::new(RefCell::new(ConnectionAdapter::new(
        config,
        DocumentStore::new(document.clone()),
    )));

    sliders::publish_update_handler(&window, &panel)?;
    if bind_sliders {
        let bound = sliders::bind_slider_controls(&document, &panel)?;
        info!("bound {bound} slider controls");
    }

    network::initialize(&panel);
    Ok(())
}
