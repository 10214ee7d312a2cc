use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::SwitcherConfig;
use crate::switcher::{Direction, Input};

const IDLE_POLL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    Quit,
    Switch(Direction),
    /// Focus gained or lost, or the terminal was resized.
    Frame,
    InputChar(char),
    Backspace,
    Submit,
    Cancel,
    /// A key press with no binding of its own.
    Unbound,
}

impl AppEvent {
    pub fn switch_input(self) -> Input {
        match self {
            AppEvent::Switch(direction) => Input::Trigger(direction),
            AppEvent::Frame | AppEvent::Tick => Input::FrameEvent,
            _ => Input::Other,
        }
    }
}

fn map_key_event(key_event: KeyEvent, keymap: &SwitcherConfig) -> AppEvent {
    if key_event.kind != KeyEventKind::Press {
        return AppEvent::Tick;
    }

    if let Some(direction) = keymap.direction_for(&key_event) {
        return AppEvent::Switch(direction);
    }
    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return AppEvent::Quit;
    }
    if key_event.code == KeyCode::Char('g') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return AppEvent::Cancel;
    }

    match key_event.code {
        KeyCode::Backspace => AppEvent::Backspace,
        KeyCode::Enter => AppEvent::Submit,
        KeyCode::Esc => AppEvent::Cancel,
        KeyCode::Char(c) => AppEvent::InputChar(c),
        _ => AppEvent::Unbound,
    }
}

fn map_event(event: Event, keymap: &SwitcherConfig) -> AppEvent {
    match event {
        Event::Key(key_event) => map_key_event(key_event, keymap),
        Event::FocusGained | Event::FocusLost | Event::Resize(..) => AppEvent::Frame,
        _ => AppEvent::Tick,
    }
}

pub fn next_event(keymap: &SwitcherConfig) -> io::Result<AppEvent> {
    Ok(wait_for_event(keymap, IDLE_POLL)?.unwrap_or(AppEvent::Tick))
}

/// Blocks for at most `timeout`; `None` means the wait ran out with no input.
pub fn wait_for_event(keymap: &SwitcherConfig, timeout: Duration) -> io::Result<Option<AppEvent>> {
    if event::poll(timeout)? {
        return Ok(Some(map_event(event::read()?, keymap)));
    }
    Ok(None)
}
