use crate::switcher::is_switchable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    pub id: BufferId,
    pub name: String,
    pub contents: String,
    /// Logical clock value of the last recorded display.
    pub last_shown: u64,
}

/// Open buffers kept most recently shown first.
#[derive(Debug, Clone)]
pub struct BufferList {
    buffers: Vec<Buffer>,
    displayed: BufferId,
    next_id: u32,
    clock: u64,
}

impl BufferList {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        let first = Buffer {
            id: BufferId(0),
            name: name.into(),
            contents: contents.into(),
            last_shown: 1,
        };
        Self {
            displayed: first.id,
            buffers: vec![first],
            next_id: 1,
            clock: 1,
        }
    }

    /// Adds a buffer at the least recently used end. Clashing names get a `<N>` suffix.
    pub fn create(&mut self, name: &str, contents: impl Into<String>) -> BufferId {
        let id = BufferId(self.next_id);
        self.next_id += 1;
        let name = self.unique_name(name);
        self.buffers.push(Buffer {
            id,
            name,
            contents: contents.into(),
            last_shown: 0,
        });
        id
    }

    fn unique_name(&self, name: &str) -> String {
        if self.find_by_name(name).is_none() {
            return name.to_string();
        }
        (2u32..)
            .map(|n| format!("{name}<{n}>"))
            .find(|candidate| self.find_by_name(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }

    pub fn find_by_name(&self, name: &str) -> Option<BufferId> {
        self.buffers
            .iter()
            .find(|buffer| buffer.name == name)
            .map(|buffer| buffer.id)
    }

    pub fn get(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.iter().find(|buffer| buffer.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Buffer> {
        self.buffers.iter()
    }

    pub fn ids_by_recency(&self) -> Vec<BufferId> {
        self.buffers.iter().map(|buffer| buffer.id).collect()
    }

    pub fn displayed(&self) -> BufferId {
        self.displayed
    }

    pub fn displayed_buffer(&self) -> Option<&Buffer> {
        self.get(self.displayed)
    }

    /// Makes `id` visible and stamps `last_shown` without touching the recency order.
    pub fn display(&mut self, id: BufferId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        self.clock += 1;
        self.buffers[pos].last_shown = self.clock;
        self.displayed = id;
        true
    }

    /// Makes `id` visible and records it as the most recently shown buffer.
    pub fn select(&mut self, id: BufferId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        self.clock += 1;
        let mut buffer = self.buffers.remove(pos);
        buffer.last_shown = self.clock;
        self.buffers.insert(0, buffer);
        self.displayed = id;
        true
    }

    pub fn demote(&mut self, id: BufferId) {
        if let Some(pos) = self.position(id) {
            let buffer = self.buffers.remove(pos);
            self.buffers.push(buffer);
        }
    }

    /// Removes a buffer. The last switchable buffer cannot be killed; killing the
    /// displayed buffer selects the most recent remaining switchable one.
    pub fn kill(&mut self, id: BufferId) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        let remaining_switchable = self
            .buffers
            .iter()
            .filter(|buffer| buffer.id != id && is_switchable(&buffer.name))
            .count();
        if remaining_switchable == 0 {
            return false;
        }
        self.buffers.remove(pos);
        if self.displayed == id {
            let next = self
                .buffers
                .iter()
                .find(|buffer| is_switchable(&buffer.name))
                .map(|buffer| buffer.id);
            if let Some(next) = next {
                self.select(next);
            }
        }
        true
    }

    pub fn append(&mut self, id: BufferId, line: &str) {
        if let Some(buffer) = self.buffers.iter_mut().find(|buffer| buffer.id == id) {
            if !buffer.contents.is_empty() && !buffer.contents.ends_with('\n') {
                buffer.contents.push('\n');
            }
            buffer.contents.push_str(line);
        }
    }

    fn position(&self, id: BufferId) -> Option<usize> {
        self.buffers.iter().position(|buffer| buffer.id == id)
    }
}
