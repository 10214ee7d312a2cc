use crate::buffers::{Buffer, BufferId, BufferList};
use crate::events::AppEvent;
use crate::switcher::{Host, StatusLine};

pub const SCRATCH_BUFFER: &str = "*scratch*";
pub const MESSAGES_BUFFER: &str = "*Messages*";
pub const HELP_BUFFER: &str = "*Help*";
pub const MINIBUFFER: &str = " *Minibuf-0*";
const PROMPT_LABEL: &str = "Switch to buffer: ";

const SCRATCH_TEXT: &str = "This buffer is for notes you don't want to keep.\n";
const HELP_TEXT: &str = "Buffer switching\n\
\n\
Press a forward or backward trigger key to start cycling through open buffers.\n\
Keep pressing to move along the list shown in the echo area; the selection is\n\
committed once the keys stop for the idle timeout or any other key is pressed.\n\
\n\
Other keys\n\
\n\
  :       switch to (or create) a buffer by name\n\
  k       kill the displayed buffer\n\
  q       quit (Ctrl+C works everywhere)\n\
  Esc     cancel the prompt\n";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Prompt {
    input: String,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub ticks: u64,
    buffers: BufferList,
    prompt: Option<Prompt>,
    switch_status: Option<StatusLine>,
    echo: Option<String>,
    key_hint: String,
    status_width: u16,
}

impl Default for App {
    fn default() -> Self {
        Self::with_buffers(std::iter::empty::<String>())
    }
}

impl App {
    pub fn with_buffers<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buffers = BufferList::new(SCRATCH_BUFFER, SCRATCH_TEXT);
        let mut extra = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() {
                extra.push(buffers.create(name, ""));
            }
        }
        buffers.create(MESSAGES_BUFFER, "");
        buffers.create(HELP_BUFFER, HELP_TEXT);
        buffers.create(MINIBUFFER, "");
        // Buffers named on the command line are opened last-to-first so the first one
        // ends up displayed and most recent.
        for id in extra.into_iter().rev() {
            buffers.select(id);
        }

        Self {
            running: true,
            ticks: 0,
            buffers,
            prompt: None,
            switch_status: None,
            echo: None,
            key_hint: String::new(),
            status_width: 80,
        }
    }

    pub fn on_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn buffers(&self) -> &BufferList {
        &self.buffers
    }

    pub fn displayed_buffer(&self) -> Option<&Buffer> {
        self.buffers.displayed_buffer()
    }

    pub fn switch_status(&self) -> Option<&StatusLine> {
        self.switch_status.as_ref()
    }

    pub fn echo(&self) -> Option<&str> {
        self.echo.as_deref()
    }

    pub fn is_prompt_open(&self) -> bool {
        self.prompt.is_some()
    }

    pub fn prompt_text(&self) -> Option<String> {
        self.prompt
            .as_ref()
            .map(|prompt| format!("{PROMPT_LABEL}{}", prompt.input))
    }

    pub fn key_hint(&self) -> &str {
        &self.key_hint
    }

    pub fn set_key_hint(&mut self, hint: impl Into<String>) {
        self.key_hint = hint.into();
    }

    pub fn set_status_width(&mut self, width: u16) {
        self.status_width = width.max(1);
    }

    /// Handles an event the switcher did not consume.
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => self.quit(),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Switch(_) | AppEvent::Frame => {}
            _ if self.prompt.is_some() => self.apply_prompt_event(event),
            AppEvent::InputChar(':') => self.open_prompt(),
            AppEvent::InputChar('k') => self.kill_displayed(),
            AppEvent::InputChar('q') => self.quit(),
            AppEvent::Cancel => self.echo = Some("Quit".to_string()),
            AppEvent::InputChar(c) => {
                self.echo = Some(format!("'{c}' is undefined"));
            }
            AppEvent::Backspace | AppEvent::Submit | AppEvent::Unbound => {
                self.echo = Some("Key is undefined".to_string());
            }
        }
    }

    fn apply_prompt_event(&mut self, event: AppEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match event {
            AppEvent::InputChar(c) => prompt.input.push(c),
            AppEvent::Backspace => {
                prompt.input.pop();
            }
            AppEvent::Submit => self.submit_prompt(),
            AppEvent::Cancel => {
                self.prompt = None;
                self.echo = Some("Quit".to_string());
            }
            _ => {}
        }
    }

    pub fn open_prompt(&mut self) {
        self.echo = None;
        self.prompt = Some(Prompt::default());
    }

    fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let name = prompt.input.trim();
        if name.is_empty() {
            return;
        }
        let id = match self.buffers.find_by_name(name) {
            Some(id) => id,
            None => {
                self.echo = Some(format!("(New buffer {name})"));
                self.buffers.create(name, "")
            }
        };
        self.buffers.select(id);
    }

    pub fn kill_displayed(&mut self) {
        let id = self.buffers.displayed();
        let name = self.buffer_name(id);
        if self.buffers.kill(id) {
            tracing::info!(%name, "buffer killed");
            self.echo = Some(format!("Killed {name}"));
        } else {
            self.echo = Some(format!("Cannot kill {name}: it is the last buffer"));
        }
    }

    /// Appends a line to `*Messages*`, recreating the buffer if it was killed.
    fn log_message(&mut self, line: &str) {
        let id = match self.buffers.find_by_name(MESSAGES_BUFFER) {
            Some(id) => id,
            None => self.buffers.create(MESSAGES_BUFFER, ""),
        };
        self.buffers.append(id, line);
    }

    fn buffer_name(&self, id: BufferId) -> String {
        self.buffers
            .get(id)
            .map(|buffer| buffer.name.clone())
            .unwrap_or_default()
    }
}

impl Host for App {
    type Item = BufferId;

    fn list_items(&self) -> Vec<BufferId> {
        self.buffers.ids_by_recency()
    }

    fn current_item(&self) -> BufferId {
        self.buffers.displayed()
    }

    fn item_name(&self, item: &BufferId) -> String {
        self.buffer_name(*item)
    }

    fn display_item(&mut self, item: &BufferId) {
        self.buffers.display(*item);
    }

    fn is_restricted_context(&self) -> bool {
        self.prompt.is_some()
    }

    fn demote(&mut self, item: &BufferId) {
        self.buffers.demote(*item);
    }

    fn status_width(&self) -> u16 {
        self.status_width
    }

    fn set_status_line(&mut self, line: StatusLine) {
        self.echo = None;
        self.switch_status = Some(line);
    }

    fn clear_status_line(&mut self) {
        if self.switch_status.take().is_some() {
            let name = self.buffer_name(self.buffers.displayed());
            self.log_message(&format!("Switched to {name}"));
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/app_tests.rs"]
mod tests;
