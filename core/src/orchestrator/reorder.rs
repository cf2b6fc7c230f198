/// Releases items strictly in index order, whatever order they arrive in.
///
/// Items land in their slot; every insert drains the longest run of filled
/// slots starting at the release cursor.
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    slots: Vec<Option<T>>,
    cursor: usize,
}

impl<T> ReorderBuffer<T> {
    pub fn new(len: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(len).collect(),
            cursor: 0,
        }
    }

    /// Stores `item` at `index` and returns everything that became releasable.
    ///
    /// Indices out of range or already released are ignored.
    pub fn insert(&mut self, index: usize, item: T) -> Vec<T> {
        if index < self.cursor {
            return Vec::new();
        }
        match self.slots.get_mut(index) {
            Some(slot) => *slot = Some(item),
            None => return Vec::new(),
        }

        let mut released: Vec<T> = Vec::new();
        while let Some(item) = self.slots.get_mut(self.cursor).and_then(Option::take) {
            released.push(item);
            self.cursor += 1;
        }
        released
    }

    /// Number of items released so far.
    pub fn released(&self) -> usize {
        self.cursor
    }

    /// Every slot has been filled and released.
    pub fn is_complete(&self) -> bool {
        self.cursor == self.slots.len()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
