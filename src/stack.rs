use crate::triangle::TriangleId;

/// Triangles the current row is inside of, most recently opened on top.
///
/// A triangle is held at most once. Removal can happen anywhere in the
/// stack since spans close in x order, not in LIFO order.
#[derive(Debug, Clone, Default)]
pub struct ActiveStack {
    entries: Vec<TriangleId>,
}

impl ActiveStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ActiveStack { entries: Vec::with_capacity(capacity) }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: TriangleId) -> bool {
        self.entries.contains(&id)
    }

    pub fn top(&self) -> Option<TriangleId> {
        self.entries.last().copied()
    }

    /// Pushes `id` unless it is already open. Returns whether it was pushed.
    pub fn push(&mut self, id: TriangleId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.entries.push(id);
        true
    }

    /// Removes `id` wherever it sits, keeping the order of the rest.
    pub fn remove(&mut self, id: TriangleId) -> bool {
        match self.entries.iter().position(|&entry| entry == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Closes `id` if open, opens it otherwise. Returns true when it opened.
    pub fn toggle(&mut self, id: TriangleId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.entries.push(id);
            true
        }
    }
}
