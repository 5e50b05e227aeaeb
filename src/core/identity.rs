/// Monotonic identity source owned by a single registry
///
/// Each registry holds its own allocator instead of sharing a process-wide counter, so a
/// fresh restaurant always starts numbering from the same base.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    base: u64,
    next: u64,
}

impl IdAllocator {
    /// Create an allocator whose first identity is 1
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create an allocator whose first identity is `base`
    pub fn starting_at(base: u64) -> Self {
        Self { base, next: base }
    }

    /// Hand out the next identity
    pub fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Identity the next call to `allocate` will return
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Number of identities handed out so far
    pub fn issued(&self) -> u64 {
        self.next - self.base
    }

    /// Restart numbering from the base
    pub fn reset(&mut self) {
        self.next = self.base;
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocates_monotonically() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), 1);
        assert_eq!(ids.allocate(), 2);
        assert_eq!(ids.peek(), 3);
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_reset_restarts_from_base() {
        let mut ids = IdAllocator::starting_at(101);
        ids.allocate();
        ids.allocate();
        ids.reset();
        assert_eq!(ids.allocate(), 101);
        assert_eq!(ids.issued(), 1);
    }
}
