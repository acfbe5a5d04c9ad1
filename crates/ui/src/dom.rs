use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

use crate::error::{js_detail, UiError};

/// Elements addressable by id: slider controls, their labels and plain
/// display elements.
pub trait ElementStore {
    fn contains(&self, id: &str) -> bool;

    /// Replace the displayed text of an element
    fn set_text(&self, id: &str, text: &str) -> Result<(), UiError>;

    /// Set the value of an input control
    fn set_value(&self, id: &str, value: &str) -> Result<(), UiError>;

    /// Current value of an input control, `None` if there is no such control
    fn value(&self, id: &str) -> Option<String>;
}

/// `ElementStore` backed by the page document
#[derive(Clone)]
pub struct DocumentStore {
    document: Document,
}

impl DocumentStore {
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Result<Element, UiError> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| UiError::MissingElement(id.to_string()))
    }

    fn input(&self, id: &str) -> Result<HtmlInputElement, UiError> {
        self.element(id)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|el| UiError::Dom(format!("'{id}' is a <{}>, not an input", el.tag_name().to_lowercase())))
    }
}

impl ElementStore for DocumentStore {
    fn contains(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn set_text(&self, id: &str, text: &str) -> Result<(), UiError> {
        self.element(id)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_value(&self, id: &str, value: &str) -> Result<(), UiError> {
        self.input(id)?.set_value(value);
        Ok(())
    }

    fn value(&self, id: &str) -> Option<String> {
        self.input(id).ok().map(|input| input.value())
    }
}

/// Id of the element an event handler was attached to
pub fn element_id(target: &wasm_bindgen::JsValue) -> Result<String, UiError> {
    js_sys::Reflect::get(target, &"id".into())
        .map_err(|e| UiError::Dom(js_detail(&e)))?
        .as_string()
        .ok_or_else(|| UiError::Dom("element has no id".to_string()))
}
