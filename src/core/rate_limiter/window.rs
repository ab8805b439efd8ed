//! Fixed window arithmetic

use serde::{Deserialize, Serialize};

/// A fixed-size time bucket aligned to multiples of its size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Unix seconds, a multiple of `size`
    pub start: u64,
    /// Window size in seconds
    pub size: u64,
}

impl Window {
    /// The window of `size` seconds containing `now`
    pub fn containing(now: u64, size: u64) -> Self {
        let size = size.max(1);
        Self {
            start: now / size * size,
            size,
        }
    }

    /// First second after the window
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.size)
    }

    /// When a counter for this window stops being readable
    pub fn expire_at(&self, grace: u64) -> u64 {
        self.end().saturating_add(grace)
    }

    /// The window immediately before this one
    pub fn previous(&self) -> Option<Self> {
        self.start.checked_sub(self.size).map(|start| Self {
            start,
            size: self.size,
        })
    }
}
