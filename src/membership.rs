use std::collections::HashSet;

/// Read-only set of selected pair indices.
#[derive(Debug, Clone, Default)]
pub struct MembershipIndex {
    indices: HashSet<u64>,
}

impl MembershipIndex {
    pub fn from_indices<I: IntoIterator<Item = u64>>(indices: I) -> Self {
        Self {
            indices: indices.into_iter().collect(),
        }
    }

    #[inline]
    pub fn contains(&self, index: u64) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
