// Row id allocator
// Issues ids one at a time, strictly increasing from `max_existing_id + 1`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    last_issued: i64,
}

impl IdAllocator {
    pub fn seed(max_existing_id: i64) -> Self {
        Self {
            last_issued: max_existing_id,
        }
    }

    pub fn allocate(&mut self) -> i64 {
        self.last_issued += 1;
        self.last_issued
    }

    /// The id the next `allocate` call would return.
    pub fn peek(&self) -> i64 {
        self.last_issued + 1
    }
}
