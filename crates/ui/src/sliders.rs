//! Slider input wiring
//!
//! Range controls named `slider<N>` report their position through
//! `ConnectionAdapter::update_slider_pwm`, either via listeners bound here
//! or via `window.updateSliderPWM(this)` from inline markup.

use pwm_panel_protocol::{SLIDER_LABEL_PREFIX, SLIDER_PREFIX};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement, Window};

use crate::dom::element_id;
use crate::network::SharedPanel;

/// Forward one slider interaction. Failures are logged, never thrown.
fn on_slider_input(panel: &SharedPanel, control_id: &str) {
    if let Err(e) = panel.borrow().update_slider_pwm(control_id) {
        warn!("slider '{control_id}' update not sent: {e}");
    }
}

/// Attach an `input` listener to every `slider<N>` range control that has
/// no inline handler of its own. Returns how many controls were bound.
pub fn bind_slider_controls(document: &Document, panel: &SharedPanel) -> Result<u32, JsValue> {
    let nodes = document.query_selector_all("input[type=range]")?;
    let mut bound = 0;

    for i in 0..nodes.length() {
        let Some(input) = nodes.get(i).and_then(|n| n.dyn_into::<HtmlInputElement>().ok()) else {
            continue;
        };
        let id = input.id();
        let inline = INLINE_HANDLERS.iter().any(|attr| input.has_attribute(attr));
        if !needs_listener(&id, inline) {
            if inline {
                debug!("slider control '{id}' already has an inline handler");
            }
            continue;
        }

        let panel = panel.clone();
        let control_id = id.clone();
        let on_input = Closure::wrap(Box::new(move || {
            on_slider_input(&panel, &control_id);
        }) as Box<dyn FnMut()>);
        input.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();

        debug!("bound slider control '{id}'");
        bound += 1;
    }

    Ok(bound)
}

/// Expose `window.updateSliderPWM(element)` for inline handlers
pub fn publish_update_handler(window: &Window, panel: &SharedPanel) -> Result<(), JsValue> {
    let panel = panel.clone();
    let handler = Closure::wrap(Box::new(move |element: JsValue| match element_id(&element) {
        Ok(id) => on_slider_input(&panel, &id),
        Err(e) => warn!("updateSliderPWM called without a slider element: {e}"),
    }) as Box<dyn FnMut(JsValue)>);

    js_sys::Reflect::set(window, &"updateSliderPWM".into(), handler.as_ref())?;
    handler.forget();
    Ok(())
}

/// Attributes through which markup already calls `updateSliderPWM(this)`
const INLINE_HANDLERS: [&str; 2] = ["onchange", "oninput"];

/// `slider3` yes; `sliderValue3` (a label) and `volume` no
fn is_slider_control(id: &str) -> bool {
    id.starts_with(SLIDER_PREFIX) && !id.starts_with(SLIDER_LABEL_PREFIX)
}

/// A second listener on a control with an inline handler would send twice
fn needs_listener(id: &str, has_inline_handler: bool) -> bool {
    is_slider_control(id) && !has_inline_handler
}
