use std::fmt;

/// Session-unique name for a blob, written as `:<n>` in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark(u32);

impl Mark {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Mark {
    fn from(n: u32) -> Self {
        Mark(n)
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

/// Hands out 1, 2, 3, ... for one encoding session. No reuse, no gaps.
#[derive(Debug)]
pub struct MarkAllocator {
    next: u32,
}

impl MarkAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> Mark {
        let mark = Mark(self.next);
        self.next += 1;
        mark
    }

    /// Number of marks issued so far.
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

impl Default for MarkAllocator {
    fn default() -> Self {
        Self::new()
    }
}
