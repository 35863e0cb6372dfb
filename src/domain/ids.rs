//! Deterministic identifiers for groups, links and layers

use std::collections::HashMap;

pub const GROUP_PREFIX: &str = "tree-group-";
pub const LINK_PREFIX: &str = "tree-link-";
pub const LAYER_PREFIX: &str = "tree-link-layer-";

/// Source of identifiers for generated structure.
///
/// Injected into a [`Forest`](crate::domain::Forest) so that two runs over the
/// same snapshot produce identical ids.
pub trait IdSource {
    fn next_id(&mut self, prefix: &str) -> String;
}

/// One monotonic counter per prefix, starting at 1.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    counters: HashMap<String, u64>,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{prefix}{counter}")
    }
}

/// Caller-supplied ids.
impl<F> IdSource for F
where
    F: FnMut(&str) -> String,
{
    fn next_id(&mut self, prefix: &str) -> String {
        self(prefix)
    }
}
