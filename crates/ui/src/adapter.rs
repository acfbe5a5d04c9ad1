//! Connection adapter: slider input out, controller readings in
//!
//! Owns the single live connection of a panel and dispatches its events.
//! Browser wiring lives in `network`; this module only needs a
//! `Connection` and an `ElementStore`, so it runs the same in tests.

use pwm_panel_protocol::{gateway_url, InboundReading, OutboundCommand, ReadingTarget, SliderIndex};
use tracing::{debug, error, info, warn};

use crate::config::PanelConfig;
use crate::connection::{Connection, ConnectionEvent, ConnectionState, Generation, ReconnectRequest};
use crate::dom::ElementStore;
use crate::error::UiError;

pub struct ConnectionAdapter<C, E> {
    config: PanelConfig,
    elements: E,
    connection: Option<C>,
    state: ConnectionState,
    generation: Generation,
    reconnect_attempt: u32,
}

impl<C: Connection, E: ElementStore> ConnectionAdapter<C, E> {
    pub const fn new(config: PanelConfig, elements: E) -> Self {
        Self {
            config,
            elements,
            connection: None,
            state: ConnectionState::Closed,
            generation: 0,
            reconnect_attempt: 0,
        }
    }

    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    pub const fn generation(&self) -> Generation {
        self.generation
    }

    pub const fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub const fn elements(&self) -> &E {
        &self.elements
    }

    pub const fn is_attached(&self) -> bool {
        self.connection.is_some()
    }

    /// Gateway URL for a page served from `hostname`
    pub fn endpoint(&self, hostname: &str) -> String {
        gateway_url(hostname, &self.config.ws_path)
    }

    /// Take ownership of a freshly opened connection.
    ///
    /// Any previous connection is closed and dropped; its events will carry
    /// an old generation and be ignored.
    pub fn attach(&mut self, connection: C) -> Generation {
        if let Some(previous) = self.connection.take() {
            warn!(generation = self.generation, "replacing a live connection");
            previous.close();
        }
        self.generation += 1;
        self.connection = Some(connection);
        self.state = ConnectionState::Connecting;
        debug!(generation = self.generation, "connection attached");
        self.generation
    }

    /// The transport could not even be constructed: `Connecting -> Closed`
    pub fn connect_failed(&mut self, detail: &str) -> ReconnectRequest {
        error!("WebSocket could not be opened: {detail}");
        self.generation += 1;
        self.connection = None;
        self.schedule_reconnect()
    }

    /// Dispatch one event from the connection of `generation`
    pub fn handle_event(
        &mut self,
        generation: Generation,
        event: ConnectionEvent,
    ) -> Option<ReconnectRequest> {
        if generation != self.generation {
            debug!(generation, current = self.generation, ?event, "ignoring event from stale connection");
            return None;
        }

        match event {
            ConnectionEvent::Open => {
                self.on_open();
                None
            }
            ConnectionEvent::Close { code, reason } => Some(self.on_close(code, &reason)),
            ConnectionEvent::Error(detail) => {
                self.on_error(&detail);
                None
            }
            ConnectionEvent::Message(payload) => {
                self.on_message(&payload);
                None
            }
        }
    }

    /// Connection ready: ask the controller for a full snapshot
    pub fn on_open(&mut self) {
        info!("WebSocket connection open");
        self.state = ConnectionState::Open;
        self.reconnect_attempt = 0;
        if let Err(e) = self.send(&OutboundCommand::GetReadings) {
            warn!("snapshot request not sent: {e}");
        }
    }

    /// Connection dropped for any reason; always schedule a reconnect
    pub fn on_close(&mut self, code: u16, reason: &str) -> ReconnectRequest {
        info!(code, reason, "WebSocket connection closed");
        self.connection = None;
        self.schedule_reconnect()
    }

    /// Transport error. Recovery is left to the close event that follows.
    pub fn on_error(&self, detail: &str) {
        error!("WebSocket error observed: {detail}");
    }

    /// Apply a reading frame to the page. Returns the number of keys applied.
    pub fn on_message(&self, payload: &str) -> usize {
        debug!("message received: {payload}");
        let reading = match InboundReading::parse(payload) {
            Ok(reading) => reading,
            Err(e) => {
                error!("dropping reading: {e} (payload: {payload})");
                return 0;
            }
        };

        if reading.is_empty() {
            debug!("reading carried no keys");
            return 0;
        }

        debug!(keys = reading.len(), "applying reading");
        let mut applied = 0;
        for (key, target, text) in reading.updates() {
            if !self.elements.contains(key) {
                warn!("element with id '{key}' not found");
                continue;
            }

            let result = match target {
                ReadingTarget::SliderLabel { label_id, slider_id } => {
                    self.sync_slider(&slider_id, &text);
                    self.elements.set_text(label_id, &text)
                }
                ReadingTarget::Display { id } => self.elements.set_text(id, &text),
            };

            match result {
                Ok(()) => applied += 1,
                Err(e) => warn!("could not update '{key}': {e}"),
            }
        }
        applied
    }

    /// User moved a slider: show the value locally, then tell the controller.
    ///
    /// The label is updated before (and regardless of) the send.
    pub fn update_slider_pwm(&self, control_id: &str) -> Result<OutboundCommand, UiError> {
        let index = SliderIndex::from_control_id(control_id)?;
        let value = self
            .elements
            .value(control_id)
            .ok_or_else(|| UiError::MissingElement(control_id.to_string()))?;

        let label_id = index.label_id();
        if let Err(e) = self.elements.set_text(&label_id, &value) {
            warn!("slider label not updated: {e}");
        }

        info!("slider {index} value: {value}");
        let command = OutboundCommand::set_slider(index, value);
        self.send(&command)?;
        Ok(command)
    }

    fn sync_slider(&self, slider_id: &str, value: &str) {
        if !self.elements.contains(slider_id) {
            warn!("slider control '{slider_id}' not found");
            return;
        }
        if let Err(e) = self.elements.set_value(slider_id, value) {
            warn!("could not set '{slider_id}': {e}");
        }
    }

    fn send(&self, command: &OutboundCommand) -> Result<(), UiError> {
        let connection = self.connection.as_ref().ok_or(UiError::NotConnected)?;
        connection.send_text(&command.to_string())
    }

    fn schedule_reconnect(&mut self) -> ReconnectRequest {
        self.state = ConnectionState::Closed;
        let delay = self.config.reconnect.delay_for(self.reconnect_attempt);
        self.reconnect_attempt = self.reconnect_attempt.saturating_add(1);
        info!("reconnecting in {}ms (attempt {})", delay.as_millis(), self.reconnect_attempt);
        ReconnectRequest {
            delay,
            attempt: self.reconnect_attempt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct Wire(Rc<RefCell<Vec<String>>>);

    impl Connection for Wire {
        fn send_text(&self, text: &str) -> Result<(), UiError> {
            self.0.borrow_mut().push(text.to_string());
            Ok(())
        }

        fn close(&self) {}
    }

    #[derive(Default)]
    struct Texts(RefCell<HashMap<String, String>>);

    impl Texts {
        fn with(ids: &[&str]) -> Self {
            let store = Self::default();
            for id in ids {
                store.0.borrow_mut().insert((*id).to_string(), String::new());
            }
            store
        }
    }

    impl ElementStore for Texts {
        fn contains(&self, id: &str) -> bool {
            self.0.borrow().contains_key(id)
        }

        fn set_text(&self, id: &str, text: &str) -> Result<(), UiError> {
            match self.0.borrow_mut().get_mut(id) {
                Some(slot) => {
                    *slot = text.to_string();
                    Ok(())
                }
                None => Err(UiError::MissingElement(id.to_string())),
            }
        }

        fn set_value(&self, id: &str, value: &str) -> Result<(), UiError> {
            self.set_text(id, value)
        }

        fn value(&self, id: &str) -> Option<String> {
            self.0.borrow().get(id).cloned()
        }
    }

    fn adapter(ids: &[&str]) -> ConnectionAdapter<Wire, Texts> {
        ConnectionAdapter::new(PanelConfig::default(), Texts::with(ids))
    }

    #[test]
    fn test_state_machine_cycle() {
        let mut panel = adapter(&[]);
        assert_eq!(panel.state(), ConnectionState::Closed);

        let generation = panel.attach(Wire::default());
        assert_eq!(panel.state(), ConnectionState::Connecting);

        panel.handle_event(generation, ConnectionEvent::Open);
        assert_eq!(panel.state(), ConnectionState::Open);

        let request = panel.handle_event(
            generation,
            ConnectionEvent::Close { code: 1006, reason: String::new() },
        );
        assert_eq!(panel.state(), ConnectionState::Closed);
        assert!(!panel.is_attached());
        assert_eq!(request.map(|r| r.delay), Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_connecting_to_closed() {
        let mut panel = adapter(&[]);
        let generation = panel.attach(Wire::default());
        let request = panel
            .handle_event(generation, ConnectionEvent::Close { code: 1006, reason: String::new() })
            .unwrap();
        assert_eq!(panel.state(), ConnectionState::Closed);
        assert_eq!(request.attempt, 1);
    }

    #[test]
    fn test_connect_failed_schedules_reconnect() {
        let mut panel = adapter(&[]);
        let request = panel.connect_failed("SyntaxError");
        assert_eq!(request.delay, Duration::from_millis(2000));
        assert_eq!(panel.state(), ConnectionState::Closed);
    }

    #[test]
    fn test_stale_generation_ignored() {
        let mut panel = adapter(&[]);
        let old = panel.attach(Wire::default());
        let wire = Wire::default();
        let current = panel.attach(wire.clone());
        assert_ne!(old, current);

        assert!(panel
            .handle_event(old, ConnectionEvent::Close { code: 1000, reason: String::new() })
            .is_none());
        panel.handle_event(old, ConnectionEvent::Open);
        assert_eq!(panel.state(), ConnectionState::Connecting);
        assert!(wire.0.borrow().is_empty());
    }

    #[test]
    fn test_error_does_not_reconnect() {
        let mut panel = adapter(&[]);
        let generation = panel.attach(Wire::default());
        panel.handle_event(generation, ConnectionEvent::Open);
        let request = panel.handle_event(generation, ConnectionEvent::Error("boom".into()));
        assert!(request.is_none());
        assert_eq!(panel.state(), ConnectionState::Open);
    }

    #[test]
    fn test_slider_without_connection() {
        let panel = adapter(&["slider2", "sliderValue2"]);
        panel.elements().set_value("slider2", "30").unwrap();

        let err = panel.update_slider_pwm("slider2").unwrap_err();
        assert!(matches!(err, UiError::NotConnected));
        assert_eq!(panel.elements().value("sliderValue2").as_deref(), Some("30"));
    }

    #[test]
    fn test_slider_missing_control() {
        let mut panel = adapter(&[]);
        let wire = Wire::default();
        panel.attach(wire.clone());
        assert!(matches!(
            panel.update_slider_pwm("slider9"),
            Err(UiError::MissingElement(_))
        ));
        assert!(wire.0.borrow().is_empty());
    }

    #[test]
    fn test_message_non_object_applies_nothing() {
        let panel = adapter(&["pot1"]);
        assert_eq!(panel.on_message("42"), 0);
        assert_eq!(panel.elements().value("pot1").as_deref(), Some(""));
    }
}
