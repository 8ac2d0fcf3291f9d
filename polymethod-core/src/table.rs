//! Dispatch table: key → handler, plus a single default.
//!
//! The table is pure data and lookup. It knows nothing about how keys are
//! derived from arguments; that is the job of [`DispatchFunction`].
//!
//! [`DispatchFunction`]: crate::DispatchFunction

use std::{collections::HashMap, hash::Hash};

/// The default slot of a [`DispatchTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback<H> {
    /// The harmless no-op: resolves to an absent result.
    Absent,
    /// A caller-supplied default handler.
    Handler(H),
}

impl<H> Default for Fallback<H> {
    fn default() -> Self {
        Fallback::Absent
    }
}

impl<H> Fallback<H> {
    /// Returns the default handler, if one is set.
    pub fn handler(&self) -> Option<&H> {
        match self {
            Fallback::Absent => None,
            Fallback::Handler(h) => Some(h),
        }
    }
}

/// Result of a table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<'a, H> {
    /// The key is bound; contains its handler.
    Matched(&'a H),
    /// The key is unbound and resolved through the default handler.
    Default(&'a H),
    /// The key is unbound and the default is the no-op.
    Absent,
}

impl<'a, H> Lookup<'a, H> {
    /// Returns true if the key itself was bound.
    pub fn is_matched(&self) -> bool {
        matches!(self, Lookup::Matched(_))
    }

    /// Returns the handler that will run, if any.
    pub fn handler(self) -> Option<&'a H> {
        match self {
            Lookup::Matched(h) | Lookup::Default(h) => Some(h),
            Lookup::Absent => None,
        }
    }

    /// Short label for logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            Lookup::Matched(_) => "matched",
            Lookup::Default(_) => "default",
            Lookup::Absent => "absent",
        }
    }
}

/// A mapping from dispatch key to handler with one default slot.
///
/// No operation fails: an unbound key is not an error, it resolves through
/// the default.
#[derive(Debug, Clone)]
pub struct DispatchTable<K, H> {
    map: HashMap<K, H>,
    fallback: Fallback<H>,
}

impl<K, H> DispatchTable<K, H> {
    /// Create an empty table whose default is the no-op.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            fallback: Fallback::Absent,
        }
    }

    /// Get the number of bound keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if no key is bound.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over the bound keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// The current default slot.
    pub fn fallback(&self) -> &Fallback<H> {
        &self.fallback
    }

    /// Replace the default handler, returning the previous one.
    pub fn set_default(&mut self, handler: H) -> Option<H> {
        match std::mem::replace(&mut self.fallback, Fallback::Handler(handler)) {
            Fallback::Handler(prev) => Some(prev),
            Fallback::Absent => None,
        }
    }

    /// Restore the no-op default, returning the previous handler.
    pub fn clear_default(&mut self) -> Option<H> {
        match std::mem::take(&mut self.fallback) {
            Fallback::Handler(prev) => Some(prev),
            Fallback::Absent => None,
        }
    }
}

impl<K, H> DispatchTable<K, H>
where
    K: Hash + Eq,
{
    /// Look up the handler for `key`, falling back to the default.
    pub fn lookup(&self, key: &K) -> Lookup<'_, H> {
        match self.map.get(key) {
            Some(h) => Lookup::Matched(h),
            None => match &self.fallback {
                Fallback::Handler(h) => Lookup::Default(h),
                Fallback::Absent => Lookup::Absent,
            },
        }
    }

    /// Insert or replace the handler for `key`, returning the previous one.
    pub fn bind(&mut self, key: K, handler: H) -> Option<H> {
        self.map.insert(key, handler)
    }

    /// Check if `key` is bound.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }
}

impl<K, H> Default for DispatchTable<K, H> {
    fn default() -> Self {
        Self::new()
    }
}
