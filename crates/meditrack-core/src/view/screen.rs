//! Mounted containers and handler dispatch.

use std::collections::{BTreeMap, HashMap};

use super::{Action, HandlerId, ViewNode};

#[derive(Debug, Clone)]
struct Mounted {
    generation: u64,
    root: ViewNode,
    handlers: HashMap<HandlerId, Action>,
}

/// The set of named containers a page renders into.
///
/// Mounting replaces a container's whole tree in one step. Handler ids from
/// the previous tree are dropped with it, so a stale click resolves to
/// nothing.
#[derive(Debug, Default)]
pub struct Screen {
    containers: BTreeMap<String, Mounted>,
    next_generation: u64,
    next_handler: HandlerId,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a fully built tree, binding every action in it. Returns the
    /// container's new generation.
    pub fn mount(&mut self, container: &str, mut root: ViewNode) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;

        let mut handlers = HashMap::new();
        let next_handler = &mut self.next_handler;
        root.for_each_mut(&mut |node| {
            node.handler = None;
            if let Some(action) = &node.action {
                *next_handler += 1;
                node.handler = Some(*next_handler);
                handlers.insert(*next_handler, action.clone());
            }
        });

        tracing::debug!(container, generation, handlers = handlers.len(), "mounted view");
        self.containers.insert(
            container.to_string(),
            Mounted {
                generation,
                root,
                handlers,
            },
        );
        generation
    }

    /// Mount a single text node into a field container.
    pub fn set_text(&mut self, container: &str, text: impl Into<String>) -> u64 {
        self.mount(container, ViewNode::span(text))
    }

    /// Action bound to a live handler id.
    pub fn resolve(&self, handler: HandlerId) -> Option<Action> {
        self.containers
            .values()
            .find_map(|m| m.handlers.get(&handler).cloned())
    }

    pub fn get(&self, container: &str) -> Option<&ViewNode> {
        self.containers.get(container).map(|m| &m.root)
    }

    /// Text content of a container, empty when not mounted.
    pub fn text(&self, container: &str) -> String {
        self.get(container)
            .map(ViewNode::text_content)
            .unwrap_or_default()
    }

    pub fn generation(&self, container: &str) -> Option<u64> {
        self.containers.get(container).map(|m| m.generation)
    }

    /// Live handler ids of a container bound to `action`.
    pub fn handlers_for(&self, container: &str, action: &Action) -> Vec<HandlerId> {
        let Some(mounted) = self.containers.get(container) else {
            return Vec::new();
        };
        let mut ids: Vec<_> = mounted
            .handlers
            .iter()
            .filter(|(_, a)| *a == action)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn container_names(&self) -> Vec<String> {
        self.containers.keys().cloned().collect()
    }

    /// Forget every container.
    pub fn clear(&mut self) {
        self.containers.clear();
    }
}
