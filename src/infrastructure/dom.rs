//! Output regions of the hosting page.

use std::collections::HashMap;
use std::sync::Mutex;

/// Replaces the content of a page region. Rendering is synchronous and
/// overwrites whatever the region held before.
pub trait Renderer {
    fn render(&self, region: &str, content: &str);
}

#[derive(Debug, Default)]
struct DocumentState {
    regions: HashMap<String, String>,
    mutations: HashMap<String, usize>,
}

/// In-memory page used by the CLI and by tests in place of a live document.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    state: Mutex<DocumentState>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a region without counting it as a mutation.
    pub fn with_region(self, region: &str, content: &str) -> Self {
        self.lock().regions.insert(region.to_string(), content.to_string());
        self
    }

    pub fn content(&self, region: &str) -> Option<String> {
        self.lock().regions.get(region).cloned()
    }

    pub fn mutation_count(&self, region: &str) -> usize {
        self.lock().mutations.get(region).copied().unwrap_or(0)
    }

    pub fn total_mutations(&self) -> usize {
        self.lock().mutations.values().sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DocumentState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Renderer for MemoryDocument {
    fn render(&self, region: &str, content: &str) {
        let mut state = self.lock();
        state.regions.insert(region.to_string(), content.to_string());
        *state.mutations.entry(region.to_string()).or_insert(0) += 1;
    }
}
