use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    Toggle,
    Delete,
}

/// Row ids with a mutation in flight. At most one action per id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingActions {
    inner: HashMap<String, PendingKind>,
}

impl PendingActions {
    /// Marks `id` as busy. Returns false if it already was.
    pub fn claim(&mut self, id: &str, kind: PendingKind) -> bool {
        if self.inner.contains_key(id) {
            return false;
        }
        self.inner.insert(id.to_string(), kind);
        true
    }

    pub fn release(&mut self, id: &str) -> bool {
        self.inner.remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<PendingKind> {
        self.inner.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_exclusive_per_id() {
        let mut pending = PendingActions::default();
        assert!(pending.claim("r1", PendingKind::Toggle));
        assert!(!pending.claim("r1", PendingKind::Delete));
        assert!(pending.claim("r2", PendingKind::Delete));
        assert_eq!(pending.get("r1"), Some(PendingKind::Toggle));
        assert_eq!(pending.len(), 2);

        assert!(pending.release("r1"));
        assert!(!pending.release("r1"));
        assert!(pending.claim("r1", PendingKind::Delete));
    }
}
