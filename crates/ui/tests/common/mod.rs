//! In-memory stand-ins for the browser document and WebSocket

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use pwm_panel_ui::{Connection, ConnectionAdapter, ElementStore, PanelConfig, UiError};

/// Records every text frame sent through it
#[derive(Clone, Default)]
pub struct MockSocket {
    sent: Rc<RefCell<Vec<String>>>,
    closed: Rc<RefCell<bool>>,
}

impl MockSocket {
    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    pub fn was_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

impl Connection for MockSocket {
    fn send_text(&self, text: &str) -> Result<(), UiError> {
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }

    fn close(&self) {
        *self.closed.borrow_mut() = true;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockElement {
    pub text: String,
    pub value: Option<String>,
    writes: usize,
}

/// Element map keyed by id; counts writes so tests can assert "untouched"
#[derive(Default)]
pub struct MockDocument {
    elements: RefCell<HashMap<String, MockElement>>,
}

impl MockDocument {
    /// Plain display element (`pot1`, `sliderValue1`, ...)
    pub fn with_text(self, id: &str) -> Self {
        self.elements.borrow_mut().insert(id.to_string(), MockElement::default());
        self
    }

    /// Input control with an initial value (`slider1`, ...)
    pub fn with_input(self, id: &str, value: &str) -> Self {
        self.elements.borrow_mut().insert(
            id.to_string(),
            MockElement {
                value: Some(value.to_string()),
                ..MockElement::default()
            },
        );
        self
    }

    pub fn text(&self, id: &str) -> String {
        self.elements.borrow()[id].text.clone()
    }

    pub fn input_value(&self, id: &str) -> Option<String> {
        self.elements.borrow()[id].value.clone()
    }

    /// User drags a slider
    pub fn move_slider(&self, id: &str, value: &str) {
        if let Some(el) = self.elements.borrow_mut().get_mut(id) {
            el.value = Some(value.to_string());
        }
    }

    pub fn total_writes(&self) -> usize {
        self.elements.borrow().values().map(|e| e.writes).sum()
    }
}

impl ElementStore for MockDocument {
    fn contains(&self, id: &str) -> bool {
        self.elements.borrow().contains_key(id)
    }

    fn set_text(&self, id: &str, text: &str) -> Result<(), UiError> {
        let mut elements = self.elements.borrow_mut();
        let el = elements
            .get_mut(id)
            .ok_or_else(|| UiError::MissingElement(id.to_string()))?;
        el.text = text.to_string();
        el.writes += 1;
        Ok(())
    }

    fn set_value(&self, id: &str, value: &str) -> Result<(), UiError> {
        let mut elements = self.elements.borrow_mut();
        let el = elements
            .get_mut(id)
            .ok_or_else(|| UiError::MissingElement(id.to_string()))?;
        if el.value.is_none() {
            return Err(UiError::Dom(format!("'{id}' is not an input")));
        }
        el.value = Some(value.to_string());
        el.writes += 1;
        Ok(())
    }

    fn value(&self, id: &str) -> Option<String> {
        self.elements.borrow().get(id).and_then(|e| e.value.clone())
    }
}

pub type TestPanel = ConnectionAdapter<MockSocket, MockDocument>;

pub fn panel(document: MockDocument) -> TestPanel {
    ConnectionAdapter::new(PanelConfig::default(), document)
}

/// The page from the controller firmware: two sliders, two pots
pub fn standard_page() -> MockDocument {
    MockDocument::default()
        .with_input("slider1", "0")
        .with_text("sliderValue1")
        .with_input("slider2", "0")
        .with_text("sliderValue2")
        .with_text("pot1")
        .with_text("pot2")
}
