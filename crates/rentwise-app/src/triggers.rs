// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Roving-focus bookkeeping for step triggers.
//!
//! Handles are kept in registration order, which is also traversal order.
//! Indices passed to the focus helpers are positions in that order, not
//! step numbers.

use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRegistry<H> {
    handles: Vec<H>,
}

impl<H> Default for TriggerRegistry<H> {
    fn default() -> Self {
        Self {
            handles: Vec::new(),
        }
    }
}

impl<H: PartialEq + Clone + std::fmt::Debug> TriggerRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handle` unless it is already registered.
    pub fn register(&mut self, handle: H) -> bool {
        if self.handles.contains(&handle) {
            return false;
        }
        trace!(?handle, position = self.handles.len(), "trigger registered");
        self.handles.push(handle);
        true
    }

    pub fn unregister(&mut self, handle: &H) -> bool {
        let before = self.handles.len();
        self.handles.retain(|existing| existing != handle);
        let removed = self.handles.len() != before;
        if removed {
            trace!(?handle, "trigger unregistered");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handles(&self) -> &[H] {
        &self.handles
    }

    pub fn position(&self, handle: &H) -> Option<usize> {
        self.handles.iter().position(|existing| existing == handle)
    }

    pub fn contains(&self, handle: &H) -> bool {
        self.handles.contains(handle)
    }

    pub fn target(&self, intent: FocusIntent, current_index: usize) -> Option<&H> {
        intent
            .target_index(current_index, self.handles.len())
            .and_then(|index| self.handles.get(index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusIntent {
    Next,
    Previous,
    First,
    Last,
}

impl FocusIntent {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
            Self::First => "first",
            Self::Last => "last",
        }
    }

    pub fn target_index(self, current_index: usize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let index = match self {
            Self::Next => (current_index % len + 1) % len,
            Self::Previous => (current_index % len + len - 1) % len,
            Self::First => 0,
            Self::Last => len - 1,
        };
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::{FocusIntent, TriggerRegistry};

    fn registry(handles: &[&'static str]) -> TriggerRegistry<&'static str> {
        let mut registry = TriggerRegistry::new();
        for handle in handles {
            registry.register(*handle);
        }
        registry
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut registry = registry(&["a"]);
        let before = registry.len();

        assert!(registry.register("b"));
        assert!(!registry.register("b"));
        assert_eq!(registry.len(), before + 1);
        assert_eq!(registry.handles(), &["a", "b"]);
    }

    #[test]
    fn unregister_absent_handle_is_noop() {
        let mut registry = registry(&["a", "b"]);
        assert!(!registry.unregister(&"z"));
        assert_eq!(registry.handles(), &["a", "b"]);
    }

    #[test]
    fn navigation_wraps_in_both_directions() {
        for len in 1..6 {
            assert_eq!(FocusIntent::Previous.target_index(0, len), Some(len - 1));
            assert_eq!(FocusIntent::Next.target_index(len - 1, len), Some(0));
        }
    }

    #[test]
    fn next_follows_registration_order() {
        let registry = registry(&["a", "b", "c"]);
        assert_eq!(registry.target(FocusIntent::Next, 1), Some(&"c"));
        assert_eq!(registry.target(FocusIntent::Next, 2), Some(&"a"));
    }

    #[test]
    fn next_skips_unregistered_handle() {
        let mut registry = registry(&["a", "b", "c"]);
        registry.unregister(&"b");
        assert_eq!(registry.handles(), &["a", "c"]);
        assert_eq!(registry.target(FocusIntent::Next, 0), Some(&"c"));
    }

    #[test]
    fn first_and_last_pick_ends() {
        let registry = registry(&["a", "b", "c"]);
        assert_eq!(registry.target(FocusIntent::First, 1), Some(&"a"));
        assert_eq!(registry.target(FocusIntent::Last, 0), Some(&"c"));
    }

    #[test]
    fn empty_registry_has_no_targets() {
        let registry: TriggerRegistry<&str> = TriggerRegistry::new();
        for intent in [
            FocusIntent::Next,
            FocusIntent::Previous,
            FocusIntent::First,
            FocusIntent::Last,
        ] {
            assert_eq!(registry.target(intent, 0), None, "{}", intent.label());
        }
    }

    #[test]
    fn registration_order_is_not_step_order() {
        let registry = registry(&["step-3", "step-1", "step-2"]);
        assert_eq!(registry.target(FocusIntent::Next, 0), Some(&"step-1"));
        assert_eq!(registry.position(&"step-2"), Some(2));
    }
}
