use super::{Direction, Host};

/// Leading character that marks an internal buffer which never takes part in cycling.
pub const HIDDEN_MARKER: char = ' ';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<I> {
    pub item: I,
    pub name: String,
}

impl<I> Entry<I> {
    pub fn new(item: I, name: impl Into<String>) -> Self {
        Self {
            item,
            name: name.into(),
        }
    }
}

/// The host's item list as it stood when a session began, most recently shown first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<I> {
    entries: Vec<Entry<I>>,
}

impl<I> Snapshot<I> {
    pub fn entries(&self) -> &[Entry<I>] {
        &self.entries
    }
}

pub fn capture<H: Host>(host: &H) -> Snapshot<H::Item> {
    let entries = host
        .list_items()
        .into_iter()
        .map(|item| {
            let name = host.item_name(&item);
            Entry { item, name }
        })
        .collect();
    Snapshot { entries }
}

pub fn is_switchable(name: &str) -> bool {
    !name.starts_with(HIDDEN_MARKER)
}

/// Ordered items a session cycles through. Slot 0 is the item that was current when the
/// session began, whether or not its name is hidden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingSet<I> {
    entries: Vec<Entry<I>>,
}

impl<I: Clone + PartialEq> WorkingSet<I> {
    pub fn build(snapshot: &Snapshot<I>, current: Entry<I>) -> Self {
        let mut entries = vec![current];
        for entry in snapshot.entries() {
            if is_switchable(&entry.name) && entry.item != entries[0].item {
                entries.push(entry.clone());
            }
        }
        Self { entries }
    }
}

impl<I> WorkingSet<I> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&Entry<I>> {
        self.entries.get(index)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }
}

pub fn advance(index: usize, direction: Direction, len: usize) -> usize {
    let len = len.max(1) as isize;
    ((index as isize + direction.step()) % len + len) as usize % len as usize
}
