use std::collections::HashMap;

/// Hands out sequence numbers for asynchronous probes and remembers the
/// latest one per field. Numbers are never reused, so a result that arrives
/// after its field was forgotten or re-probed is always stale.
#[derive(Debug, Clone, Default)]
pub struct ProbeTracker {
    next: u64,
    latest: HashMap<String, u64>,
}

impl ProbeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new probe for `field` and return its sequence number.
    pub fn issue(&mut self, field: &str) -> u64 {
        self.next += 1;
        self.latest.insert(field.to_string(), self.next);
        self.next
    }

    /// Whether `seq` is still the latest probe issued for `field`.
    pub fn is_current(&self, field: &str, seq: u64) -> bool {
        self.latest.get(field) == Some(&seq)
    }

    pub fn forget(&mut self, field: &str) {
        self.latest.remove(field);
    }
}
