use std::fmt;
use std::time::{Duration, Instant};

mod status_line;
mod walk;

pub use status_line::{StatusLine, render_status_line};
pub use walk::{Entry, Snapshot, WorkingSet, advance, capture, is_switchable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// The editor-side environment a switching session reads from and writes back to.
pub trait Host {
    type Item: Clone + PartialEq + fmt::Debug;

    /// All items, most recently shown first.
    fn list_items(&self) -> Vec<Self::Item>;
    fn current_item(&self) -> Self::Item;
    fn item_name(&self, item: &Self::Item) -> String;
    /// Shows `item` without touching the recency order.
    fn display_item(&mut self, item: &Self::Item);
    fn is_restricted_context(&self) -> bool;
    /// Moves `item` to the least recently used end, keeping everything else in order.
    fn demote(&mut self, item: &Self::Item);
    fn status_width(&self) -> u16;
    fn set_status_line(&mut self, line: StatusLine);
    fn clear_status_line(&mut self);
}

/// Input observed by the event loop, classified for the switcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Trigger(Direction),
    /// Focus changes, resizes and other frame noise that must not end a session.
    FrameEvent,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The switcher did nothing; the caller handles the input as usual.
    Ignored,
    /// The switcher used the input and the session is still running.
    Consumed,
    /// The session was committed. `replay` asks the caller to still run the input.
    Finished { replay: bool },
}

#[derive(Debug)]
struct Session<I> {
    snapshot: Snapshot<I>,
    working_set: WorkingSet<I>,
    index: usize,
    deadline: Instant,
}

impl<I> Session<I> {
    fn show_status<H>(&self, host: &mut H)
    where
        H: Host<Item = I>,
    {
        let line = render_status_line(
            &self.working_set.names(),
            self.index,
            usize::from(host.status_width()),
        );
        host.set_status_line(line);
    }
}

#[derive(Debug)]
pub struct Switcher<I> {
    idle_timeout: Duration,
    session: Option<Session<I>>,
}

impl<I: Clone + PartialEq + fmt::Debug> Switcher<I> {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|session| session.index)
    }

    pub fn working_set(&self) -> Option<&WorkingSet<I>> {
        self.session.as_ref().map(|session| &session.working_set)
    }

    /// How long the event loop may block before the session commits on its own.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.session
            .as_ref()
            .map(|session| session.deadline.saturating_duration_since(now))
    }

    pub fn trigger<H>(&mut self, host: &mut H, direction: Direction, now: Instant) -> Disposition
    where
        H: Host<Item = I>,
    {
        if self.session.is_none() {
            if host.is_restricted_context() {
                tracing::debug!("switch refused in restricted context");
                return Disposition::Ignored;
            }
            self.session = Some(self.start(host, now));
        }
        let idle_timeout = self.idle_timeout;
        let Some(session) = self.session.as_mut() else {
            return Disposition::Ignored;
        };

        let next = advance(session.index, direction, session.working_set.len());
        if next != session.index {
            session.index = next;
            if let Some(entry) = session.working_set.get(next) {
                host.display_item(&entry.item);
                tracing::debug!(index = next, name = %entry.name, "switcher advanced");
            }
        }
        session.show_status(host);
        session.deadline = now + idle_timeout;
        Disposition::Consumed
    }

    pub fn handle_input<H>(&mut self, host: &mut H, input: Input, now: Instant) -> Disposition
    where
        H: Host<Item = I>,
    {
        match input {
            Input::Trigger(direction) => self.trigger(host, direction, now),
            Input::FrameEvent => match self.session.as_ref() {
                // The echo area may have been resized; the deadline stays where it was.
                Some(session) => {
                    session.show_status(host);
                    Disposition::Consumed
                }
                None => Disposition::Ignored,
            },
            Input::Other if self.is_active() => {
                self.finish(host);
                Disposition::Finished { replay: true }
            }
            Input::Other => Disposition::Ignored,
        }
    }

    pub fn handle_timeout<H>(&mut self, host: &mut H, now: Instant) -> Disposition
    where
        H: Host<Item = I>,
    {
        let Some(deadline) = self.session.as_ref().map(|session| session.deadline) else {
            return Disposition::Ignored;
        };
        if now < deadline {
            return Disposition::Consumed;
        }
        self.finish(host);
        Disposition::Finished { replay: false }
    }

    fn start<H>(&self, host: &H, now: Instant) -> Session<I>
    where
        H: Host<Item = I>,
    {
        let snapshot = capture(host);
        let current = host.current_item();
        let name = host.item_name(&current);
        let working_set = WorkingSet::build(&snapshot, Entry::new(current, name));
        tracing::info!(items = working_set.len(), "switch session started");
        Session {
            snapshot,
            working_set,
            index: 0,
            deadline: now + self.idle_timeout,
        }
    }

    fn finish<H>(&mut self, host: &mut H)
    where
        H: Host<Item = I>,
    {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Some(chosen) = session.working_set.get(session.index) {
            for entry in session.snapshot.entries() {
                if entry.item != chosen.item {
                    host.demote(&entry.item);
                }
            }
            tracing::info!(name = %chosen.name, index = session.index, "switch session committed");
        }
        host.clear_status_line();
    }
}

#[cfg(test)]
#[path = "../tests/unit/switcher_tests.rs"]
mod tests;
