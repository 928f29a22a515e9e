/// Input collector.
///
/// Drains all pending terminal events once per frame and keeps key
/// presses in arrival order, which is what a line editor wants.
/// Release events are dropped so terminals speaking the keyboard
/// enhancement protocol do not double-type.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Key events collected during the last drain, in arrival order.
    keys: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            keys: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events. Call this once per frame.
    /// Resize events are consumed here; the renderer re-measures the
    /// terminal on its own every frame.
    pub fn drain_events(&mut self) {
        self.keys.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                self.keys.push(key);
            }
        }
    }

    pub fn keys(&self) -> &[KeyEvent] {
        &self.keys
    }

    /// Check if any event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        self.keys.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
