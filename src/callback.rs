//! Listeners keyed by document title.
//!
//! Dialogs and other short-lived collaborators register interest in a title (typically a
//! temporary result document) and get called when it shows up in a change set.

use crate::{context::Context, wiki::ChangeSet};

pub type Callback = Box<dyn FnMut(&Context, &str)>;

struct Entry {
    title: String,
    callback: Callback,
    one_shot: bool,
}

#[derive(Default)]
pub struct CallbackRegistry {
    entries: Vec<Entry>,
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (&e.title, e.one_shot)))
            .finish()
    }
}

impl CallbackRegistry {
    pub fn new() -> Self {
        CallbackRegistry::default()
    }

    /// Register `callback` for `title`. Several callbacks may share a title; they fire in
    /// registration order.
    pub fn add<T, F>(&mut self, title: T, callback: F, one_shot: bool)
    where
        T: Into<String>,
        F: FnMut(&Context, &str) + 'static,
    {
        let title = title.into();
        tracing::debug!("[CallbackRegistry] + {title} (one-shot: {one_shot})");
        self.entries.push(Entry {
            title,
            callback: Box::new(callback),
            one_shot,
        });
    }

    /// Drop every callback registered for `title`. Returns how many were removed.
    pub fn remove(&mut self, title: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.title != title);
        before - self.entries.len()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.iter().any(|e| e.title == title)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fire callbacks whose title is in `changes`. One-shot callbacks are dropped after they
    /// fired. Returns the number of invocations.
    pub fn handle_changes(&mut self, ctx: &Context, changes: &ChangeSet) -> usize {
        let mut fired = 0;
        self.entries.retain_mut(|entry| {
            if !changes.contains(&entry.title) {
                return true;
            }
            tracing::debug!("[CallbackRegistry] Firing {}", entry.title);
            (entry.callback)(ctx, &entry.title);
            fired += 1;
            !entry.one_shot
        });
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::ChangeInfo;
    use std::{cell::RefCell, rc::Rc};
    use test_log::test;

    #[test]
    fn test_one_shot_and_persistent() {
        let ctx = Context::default();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CallbackRegistry::new();

        let log = calls.clone();
        registry.add("a", move |_ctx: &Context, t: &str| log.borrow_mut().push(format!("once {t}")), true);
        let log = calls.clone();
        registry.add("a", move |_ctx: &Context, t: &str| log.borrow_mut().push(format!("keep {t}")), false);
        let log = calls.clone();
        registry.add("b", move |_ctx: &Context, t: &str| log.borrow_mut().push(format!("b {t}")), false);

        let changes = ChangeSet::from_iter([("a", ChangeInfo::Modified)]);
        assert_eq!(registry.handle_changes(&ctx, &changes), 2);
        assert_eq!(registry.handle_changes(&ctx, &changes), 1);
        assert_eq!(*calls.borrow(), vec!["once a", "keep a", "keep a"]);
        assert_eq!(registry.len(), 2);

        assert_eq!(registry.remove("a"), 1);
        assert!(!registry.contains("a"));
        assert!(registry.contains("b"));
    }
}
